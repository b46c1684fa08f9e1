use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use log::{error, info};
use warp::{Filter, Reply};

use crate::catalog::id_generator::TimestampIdGenerator;
use crate::catalog::query_engine::QueryEngine;
use crate::catalog::submission_handler::SubmissionHandler;
use crate::configuration::config::Config;
use crate::error_handling::types::WebError;
use crate::storage::file_storage::JsonFileStore;
use crate::storage::storage_trait::RecordStore;
use crate::uploads::disk_attachment_store::DiskAttachmentStore;
use crate::web_interface::routes::{
    create_story_route, get_story_route, handle_rejection, list_stories_route, public_route,
    uploads_route,
};

/// Web server for the story HTTP API and its static files
pub struct WebServer {
    engine: Arc<QueryEngine>,
    submissions: Arc<SubmissionHandler>,
    uploads_dir: PathBuf,
    public_dir: Option<PathBuf>,
    max_upload_bytes: u64,
}

impl WebServer {
    /// Create a new WebServer instance around already wired catalog halves
    pub fn new(engine: Arc<QueryEngine>, submissions: Arc<SubmissionHandler>, config: &Config) -> Self {
        Self {
            engine,
            submissions,
            uploads_dir: config.uploads_dir.clone(),
            public_dir: config.public_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Wire the JSON file store, the upload directory and the id generator
    /// described by `config`.
    ///
    /// The catalog is loaded once here, which creates an empty document on
    /// first start and lets new ids continue after the newest existing one.
    pub fn from_config(config: &Config) -> Result<Self, WebError> {
        let store: Arc<dyn RecordStore> = Arc::new(
            JsonFileStore::new(&config.stories_file)
                .map_err(|e| WebError::InitializationFailed(e.to_string()))?,
        );
        let attachments = Arc::new(
            DiskAttachmentStore::new(&config.uploads_dir)
                .map_err(|e| WebError::InitializationFailed(e.to_string()))?,
        );

        let existing = store
            .load()
            .map_err(|e| WebError::InitializationFailed(e.to_string()))?;
        let newest_id = existing
            .iter()
            .filter_map(|s| s.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        info!("Catalog holds {} story(ies)", existing.len());

        let engine = Arc::new(QueryEngine::new(store.clone()));
        let submissions = Arc::new(SubmissionHandler::new(
            store,
            attachments,
            Arc::new(TimestampIdGenerator::starting_after(newest_id)),
        ));
        Ok(Self::new(engine, submissions, config))
    }

    /// Compose every route with the JSON rejection handler
    pub fn routes(&self) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
        let list_stories = list_stories_route(self.engine.clone());
        let create_story = create_story_route(self.submissions.clone(), self.max_upload_bytes);
        let get_story = get_story_route(self.engine.clone());
        let uploads = uploads_route(self.uploads_dir.clone());
        let public = public_route(self.public_dir.clone());

        list_stories
            .or(create_story)
            .or(get_story)
            .or(uploads)
            .or(public)
            .recover(handle_rejection)
            .with(warp::log("storyhub::http"))
    }

    /// Serve until Ctrl-C is received
    pub async fn start(&self, addr: SocketAddr) -> Result<(), WebError> {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Unable to listen for shutdown signal: {}", e);
            }
        };

        let (bound, server) = warp::serve(self.routes())
            .try_bind_with_graceful_shutdown(addr, shutdown)
            .map_err(|e| WebError::BindFailed(e.to_string()))?;

        info!("Listening on http://{}", bound);
        info!("Uploaded photos served from {}", self.uploads_dir.display());
        if let Some(ref dir) = self.public_dir {
            info!("Static frontend served from {} at /public", dir.display());
        }

        server.await;
        info!("Web server stopped");
        Ok(())
    }
}
