use repair_directory::Client;
use web::{config::DirectoryConfig, init_tracing, start_web_server, store::DirectoryStore, WebState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();
    if let Err(why) = init_tracing() {
        log::warn!("could not install the tracing subscriber, request traces are off: {}", why);
    }

    // configuration
    let config = DirectoryConfig::from_env().expect("invalid configuration in env.");

    // store
    log::info!("using the {} store", config.store.name());
    let store = DirectoryStore::connect(config.store)
        .await
        .expect("could not connect to the location store.");

    // geocoder
    log::warn!(
        "coordinates are assigned by the placeholder geocoder around {:?} and do not match the submitted address",
        config.geocoder.reference
    );
    let directory = Client::with_geocoder(store, config.geocoder);

    // web server
    if let Err(why) = start_web_server(WebState { directory }, &config.web).await {
        log::error!("web server stopped: {}", why);
    }
}
