use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use log::info;

use feed_predictor::client::PredictionClient;
use feed_predictor::config::{ClientConfig, ServerConfig};
use feed_predictor::form::FormState;
use feed_predictor::routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    info!("🚀 Starting Livestock Feed Predictor");

    let server_config = ServerConfig::from_env();
    let client_config = ClientConfig::default();
    let bind_address = server_config.bind_address();

    let state = web::Data::new(FormState::new(PredictionClient::new(client_config.clone())));
    state.initialize();

    info!("🌐 Form available on: http://{}/", bind_address);
    info!("🔮 Prediction service: {}", client_config.base_url);
    info!("👷 Workers: {}", server_config.workers);
    info!("🔧 Endpoints:");
    info!("   GET  /                   - Input form and results");
    info!("   POST /                   - Submit form");
    info!("   GET  /api/state          - Current form state");
    info!("   PUT  /api/inputs/{{key}}   - Update one input");
    info!("   POST /api/submit         - Run a prediction");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .workers(server_config.workers)
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
