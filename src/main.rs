use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use delivery_predictor::{
    config::ServerConfig, encoder::Encoder, expander::Expander, pipeline, server, ArtifactBundle,
};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = ServerConfig::from_env();

    let bundle = ArtifactBundle::load(&cfg.bundle_path)?;
    for (col, enc) in bundle.encoders().iter() {
        tracing::info!("encoder {}: {:?}", col, enc.classes());
    }

    // Warmup so artifact skew surfaces before we accept requests
    let probe = pipeline::warmup_record(&bundle);
    let p = pipeline::predict(&bundle, &probe).context("warmup prediction failed")?;
    tracing::info!("warmup forward ok ({:.2})", p.value);

    tracing::info!(
        "loaded bundle from {}; degree={} in_dim={} expanded_dim={}",
        cfg.bundle_path.display(),
        bundle.expander().degree(),
        bundle.expander().n_features_in(),
        bundle.expander().n_features_out()
    );

    let app = server::router(server::AppState::new(bundle, cfg.log_predictions));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
