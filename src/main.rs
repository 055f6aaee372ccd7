use std::net::TcpListener;

use chirpy::configuration::get_configuration;
use chirpy::startup::{build_state, run};
use chirpy::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let state = build_state(&configuration).map_err(|e| {
        tracing::error!("Failed to open store: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, "Store error")
    })?;

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!(address = %address, platform = %configuration.application.platform, "Server listening");

    let server = run(listener, state)?;
    server.await
}
