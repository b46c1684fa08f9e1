use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::BufMut;
use futures_util::TryStreamExt;
use log::{error, warn};
use serde::Serialize;
use warp::http::StatusCode;
use warp::multipart::{FormData, Part};
use warp::reply::Response;
use warp::{reply, Filter, Rejection, Reply};

use crate::catalog::query_engine::QueryEngine;
use crate::catalog::submission_handler::SubmissionHandler;
use crate::catalog::types::{NewStory, StoryQuery};
use crate::error_handling::types::{CatalogError, UploadError};
use crate::uploads::attachment_store::Attachment;
use crate::web_interface::types::{ApiError, ListParams, Submission};

/// Multipart field carrying the story photo.
const PHOTO_FIELD: &str = "photo";

/// GET /api/stories
pub fn list_stories_route(
    engine: Arc<QueryEngine>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "stories")
        .and(warp::get())
        .and(warp::query::<ListParams>())
        .and_then(move |params: ListParams| {
            let engine = engine.clone();
            async move {
                let res = respond(StatusCode::OK, "Failed to fetch story list", move || {
                    let query = StoryQuery::from_params(
                        params.page.as_deref(),
                        params.limit.as_deref(),
                        params.generation.as_deref(),
                        params.search.as_deref(),
                    )?;
                    engine.query(&query)
                })
                .await;
                Ok::<_, Rejection>(res)
            }
        })
}

/// POST /api/stories
///
/// Accepts either a multipart form, which may carry a photo, or a plain JSON
/// body with the text fields only.
pub fn create_story_route(
    handler: Arc<SubmissionHandler>,
    max_upload_bytes: u64,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let form_handler = handler.clone();
    let from_form = warp::multipart::form()
        .max_length(max_upload_bytes)
        .and_then(move |form: FormData| {
            let handler = form_handler.clone();
            async move {
                let submission = match read_submission(form).await {
                    Ok(s) => s,
                    Err(e) => {
                        warn!("Rejected malformed story submission: {}", e);
                        return Ok::<_, Rejection>(api_error(
                            StatusCode::BAD_REQUEST,
                            "Malformed multipart body",
                        ));
                    }
                };

                let res = respond(StatusCode::CREATED, "Failed to submit story", move || {
                    handler.submit(submission.story, submission.photo.as_ref())
                })
                .await;
                Ok::<_, Rejection>(res)
            }
        });

    let from_json = warp::body::content_length_limit(max_upload_bytes)
        .and(warp::body::json::<NewStory>())
        .and_then(move |story: NewStory| {
            let handler = handler.clone();
            async move {
                let res = respond(StatusCode::CREATED, "Failed to submit story", move || {
                    handler.submit(story, None)
                })
                .await;
                Ok::<_, Rejection>(res)
            }
        });

    warp::path!("api" / "stories")
        .and(warp::post())
        .and(from_form.or(from_json).unify())
}

/// GET /api/stories/:id
pub fn get_story_route(
    engine: Arc<QueryEngine>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "stories" / String)
        .and(warp::get())
        .and_then(move |id: String| {
            let engine = engine.clone();
            async move {
                let res = respond(StatusCode::OK, "Failed to fetch story", move || {
                    engine.get_by_id(&id)
                })
                .await;
                Ok::<_, Rejection>(res)
            }
        })
}

/// GET /uploads/*
pub fn uploads_route(
    dir: PathBuf,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("uploads").and(warp::get()).and(warp::fs::dir(dir))
}

/// GET /public/*, only when a frontend directory is configured.
pub fn public_route(
    dir: Option<PathBuf>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let enabled = dir.is_some();
    let dir = dir.unwrap_or_default();
    warp::path("public")
        .and(warp::get())
        .and_then(move || async move {
            if enabled {
                Ok(())
            } else {
                Err(warp::reject::not_found())
            }
        })
        .untuple_one()
        .and(warp::fs::dir(dir))
        .map(|file: warp::fs::File| file.into_response())
}

/// Turns every unmatched or malformed request into a JSON error.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Upload too large")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content length required")
    } else if err.find::<warp::reject::InvalidQuery>().is_some()
        || err.find::<warp::reject::MissingHeader>().is_some()
        || err.find::<warp::reject::InvalidHeader>().is_some()
        || err.find::<warp::reject::UnsupportedMediaType>().is_some()
        || err.find::<warp::body::BodyDeserializeError>().is_some()
    {
        (StatusCode::BAD_REQUEST, "Malformed request")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        error!("Unhandled request failure: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };
    Ok(api_error(status, message))
}

/// Runs a blocking catalog operation and renders its outcome.
///
/// `context` is the only text a client sees when the operation fails
/// server-side; the underlying cause goes to the log.
async fn respond<T, F>(status: StatusCode, context: &'static str, job: F) -> Response
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> Result<T, CatalogError> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(Ok(body)) => reply::with_status(reply::json(&body), status).into_response(),
        Ok(Err(e)) => catalog_error_reply(&e, context),
        Err(e) => {
            error!("{}: worker task failed: {}", context, e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, context)
        }
    }
}

fn catalog_error_reply(err: &CatalogError, context: &str) -> Response {
    match err {
        CatalogError::Validation(msg) => {
            warn!("{}: {}", context, err);
            api_error(
                StatusCode::BAD_REQUEST,
                &format!("Name, title and content are required ({})", msg),
            )
        }
        CatalogError::BadRequest(msg) => {
            warn!("{}: {}", context, err);
            api_error(StatusCode::BAD_REQUEST, msg)
        }
        CatalogError::NotFound(_) => api_error(StatusCode::NOT_FOUND, "Story not found"),
        CatalogError::Upload(UploadError::EmptyFile) => {
            warn!("{}: {}", context, err);
            api_error(StatusCode::BAD_REQUEST, "Uploaded photo is empty")
        }
        CatalogError::StoreUnavailable(_) | CatalogError::Upload(_) => {
            error!("{}: {}", context, err);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, context)
        }
    }
}

pub fn api_error(status: StatusCode, message: &str) -> Response {
    reply::with_status(
        reply::json(&ApiError {
            error: message.to_string(),
        }),
        status,
    )
    .into_response()
}

async fn read_submission(form: FormData) -> Result<Submission, warp::Error> {
    form.try_fold(Submission::default(), |mut submission, part| async move {
        let field = part.name().to_string();
        let filename = part.filename().map(String::from);
        let content_type = part.content_type().map(String::from);
        let data = read_part(part).await?;

        if field == PHOTO_FIELD {
            submission.photo = Some(Attachment {
                filename,
                content_type,
                data,
            });
            return Ok::<_, warp::Error>(submission);
        }

        let text = Some(String::from_utf8_lossy(&data).into_owned());
        match field.as_str() {
            "name" => submission.story.name = text,
            "generation" => submission.story.generation = text,
            "title" => submission.story.title = text,
            "content" => submission.story.content = text,
            "contact" => submission.story.contact = text,
            _ => {}
        }
        Ok::<_, warp::Error>(submission)
    })
    .await
}

async fn read_part(part: Part) -> Result<Vec<u8>, warp::Error> {
    part.stream()
        .try_fold(Vec::new(), |mut buf, chunk| async move {
            buf.put(chunk);
            Ok::<_, warp::Error>(buf)
        })
        .await
}
