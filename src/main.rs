use clap::Parser;
use log::{error, info};
use storyhub::configuration::config::CliArgs;
use storyhub::web_interface::web_server::WebServer;

#[tokio::main]
async fn main() {
    // https://docs.rs/env_logger/latest/env_logger/
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    info!("Importing configuration");

    let config = match CliArgs::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to import configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration imported successfully");
    info!("Catalog document: {}", config.stories_file.display());

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid listen address: {}", e);
            std::process::exit(1);
        }
    };

    let server = match WebServer::from_config(&config) {
        Ok(server) => server,
        Err(e) => {
            error!("Unable to create the web server: {}, exiting...", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start(addr).await {
        error!("Error occurred in the web server: {}, exiting...", e);
        std::process::exit(1);
    }
}
