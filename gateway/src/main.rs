use clap::Parser;
use gateway::{config::Config, create_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=debug,tower_http=info,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    let state = AppState::from_config(&config)?;
    tracing::info!(
        "backend at {}, road routing via {} ({})",
        state.backend.base_url(),
        config.osrm_url,
        config.osrm_profile
    );

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("starting gateway on http://{}", config.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
