use hedgescan::api::router::create_router;
use hedgescan::config::AppConfig;
use hedgescan::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    let metrics_handle = hedgescan::metrics::init_metrics()?;

    tracing::info!(
        price_threshold = config.default_price_threshold,
        confidence_threshold = config.default_confidence_threshold,
        include_close_price = config.default_include_close_price,
        timezone = ?config.timestamp_zone,
        auth = config.api_token.is_some(),
        "Detection defaults loaded"
    );

    let state = AppState {
        config,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    // LOG_FORMAT=json switches to structured output for log shippers.
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}
