mod api_doc;
mod constants;
mod error;
mod handlers;
mod setup;
mod state;
mod telemetry;

use factura_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // .env is optional; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    telemetry::init_telemetry();

    // Initialize the application (database, storage, routes)
    let (_state, router) = setup::initialize_app(config.clone()).await?;

    // Start the server
    setup::server::start_server(&config, router).await?;

    Ok(())
}
