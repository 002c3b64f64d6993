use tracing::info;
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blackhole_server=info,rocket=warn".into()),
        )
        .init();
    info!("🚀 Starting black hole sweeper server");

    let rocket = blackhole_server::build()?;
    rocket.launch().await?;

    Ok(())
}
