use financial_agent_router::{
    activity::ActivityRecorder,
    agent::Orchestrator,
    agents::GeminiAgentTeam,
    api::{start_server, ApiState},
    config::Config,
    executor::Executor,
    fallback::FallbackCoordinator,
    market::MarketDataClient,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = Config::from_env()?;

    info!("Financial Agent Router - API Server");
    info!("Port: {}", config.api_port);

    // Create components
    let agents = Arc::new(GeminiAgentTeam::new(config.gemini_api_key.clone()));
    let recorder = Arc::new(ActivityRecorder::new(config.activity_log_dir.clone()));
    let executor = Executor::new(agents, recorder);
    let orchestrator = Arc::new(Orchestrator::new(FallbackCoordinator::new(executor)));

    let market = config
        .market_api_base_url
        .clone()
        .map(|url| Arc::new(MarketDataClient::new(url)));
    if market.is_none() {
        info!("MARKET_API_BASE_URL not set; market routes disabled");
    }

    info!("Orchestrator initialized");
    info!("Starting API server...");

    let state = ApiState {
        orchestrator,
        market,
    };

    start_server(state, config.api_port).await?;

    Ok(())
}
