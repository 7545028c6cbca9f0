// ABOUTME: Entry point for the protogen binary.
// ABOUTME: Parses CLI arguments, initializes tracing, builds the completion client, and serves or runs the pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use protogen_agent::{AgentInvoker, Pipeline, create_completion_client};
use protogen_core::AgentRegistry;
use protogen_server::{AppState, ProtogenConfig, create_router};

const DEFAULT_LOG_FILTER: &str = "protogen=info,tower_http=info";

#[derive(Parser)]
#[command(name = "protogen", version, about = "Turn an idea into a single-file HTML prototype")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API and web front end (default)
    Serve,
    /// Print the agents in pipeline order
    Agents {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run all five stages for an idea and write the prototype to disk
    Generate {
        /// Description of the idea
        #[arg(long)]
        idea: String,
        /// Output file (default: prototype-<timestamp>.html)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    let config = ProtogenConfig::from_env().context("invalid configuration")?;
    let registry = load_registry(&config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Agents { json } => print_agents(&registry, json),
        Command::Serve => serve(config, registry).await,
        Command::Generate { idea, out } => generate(config, registry, &idea, out).await,
    }
}

fn load_registry(config: &ProtogenConfig) -> anyhow::Result<AgentRegistry> {
    match &config.prompts_dir {
        Some(dir) => AgentRegistry::with_prompt_overrides(dir)
            .with_context(|| format!("failed to load prompts from {}", dir.display())),
        None => Ok(AgentRegistry::builtin()),
    }
}

/// Build the invoker, failing immediately when the provider credential is
/// missing or malformed.
fn build_invoker(config: &ProtogenConfig, registry: AgentRegistry) -> anyhow::Result<AgentInvoker> {
    let client = create_completion_client(&config.provider, config.model.as_deref(), config.timeout)
        .context("failed to initialize completion provider")?;

    tracing::info!(
        provider = client.provider_name(),
        model = client.model_name(),
        timeout_secs = config.timeout.as_secs(),
        "completion provider ready"
    );

    Ok(AgentInvoker::new(Arc::new(registry), client).with_timeout(config.timeout))
}

fn print_agents(registry: &AgentRegistry, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&registry.list_agents())?);
        return Ok(());
    }
    for (index, spec) in registry.iter().enumerate() {
        println!(
            "{}. {:<15} {:<42} temperature={} max_tokens={}",
            index + 1,
            spec.id,
            spec.display_name,
            spec.temperature,
            spec.max_tokens
        );
    }
    Ok(())
}

async fn serve(config: ProtogenConfig, registry: AgentRegistry) -> anyhow::Result<()> {
    let invoker = build_invoker(&config, registry)?;
    let state = Arc::new(AppState::new(invoker));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!("protogen listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("protogen stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
    }
}

async fn generate(
    config: ProtogenConfig,
    registry: AgentRegistry,
    idea: &str,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    if idea.trim().is_empty() {
        anyhow::bail!("--idea must not be empty");
    }

    let invoker = build_invoker(&config, registry)?;
    let outcome = Pipeline::new(&invoker).run(idea).await;

    for stage in &outcome.stages {
        tracing::info!(
            agent = %stage.agent_id,
            chars = stage.response.chars().count(),
            "stage done"
        );
    }

    if let Some((stage, message)) = &outcome.failed {
        anyhow::bail!("pipeline stopped at stage '{}': {}", stage, message);
    }

    let html = outcome
        .prototype_html()
        .filter(|html| !html.trim().is_empty())
        .context("pipeline produced no output")?;
    let path = out.unwrap_or_else(|| {
        PathBuf::from(format!(
            "prototype-{}.html",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        ))
    });
    std::fs::write(&path, html).with_context(|| format!("failed to write {}", path.display()))?;

    println!("{}", path.display());
    Ok(())
}
