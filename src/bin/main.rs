use financial_agent_router::{
    activity::ActivityRecorder,
    agent::Orchestrator,
    agents::GeminiAgentTeam,
    config::Config,
    executor::Executor,
    fallback::FallbackCoordinator,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = Config::from_env()?;

    info!("Financial Agent Router starting");

    // Create components
    let agents = Arc::new(GeminiAgentTeam::new(config.gemini_api_key.clone()));
    let recorder = Arc::new(ActivityRecorder::new(config.activity_log_dir.clone()));
    let executor = Executor::new(agents, recorder);
    let orchestrator = Orchestrator::new(FallbackCoordinator::new(executor));

    // Query from args, or a sample
    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let query = if query.is_empty() {
        "What is the current price of AAPL?".to_string()
    } else {
        query
    };

    info!(query = %query, "running query");

    let (response, metadata) = orchestrator.handle(&query).await;

    println!("\n=== RESPONSE ===");
    println!("{}", response);
    println!("\n=== METADATA ===");
    println!("Status: {}", metadata.status);
    println!(
        "Capabilities: {}",
        metadata.active_capabilities.join(", ")
    );
    for (i, msg) in metadata.messages.iter().enumerate() {
        println!("  {}: {}", i + 1, msg);
    }

    Ok(())
}
