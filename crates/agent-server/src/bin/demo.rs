//! One-shot demo: run a single task and print the answer.
//!
//! ```text
//! agent-demo "What is 12 * (3 + 4)?"
//! ```

use agent_core::AgentConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_TASK: &str = "What is machine learning?";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let task = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_TASK.into());
    let agent = agent_runtime::build_agent(AgentConfig::from_env()?)?;

    let answer = agent.run(&task).await?;
    println!("Result: {answer}");

    Ok(())
}
