use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, info_span, Instrument};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use network_ai_assistant::{
    config::{Config, LogFormat},
    knowledge::read_knowledge_base,
    AppError, NetworkAgent, Response,
};

/// Network troubleshooting assistant
#[derive(Parser, Debug)]
#[command(name = "netassist", version, about)]
struct Cli {
    /// Answer a single query and exit
    #[arg(long, short)]
    query: Option<String>,

    /// Print responses as JSON
    #[arg(long)]
    json: bool,

    /// Route complex queries through the analysis chain
    #[arg(long)]
    advanced_chain: bool,

    /// Knowledge base file to load
    #[arg(long, value_name = "PATH")]
    knowledge_base: Option<PathBuf>,

    /// Check that a knowledge base file parses, then exit
    #[arg(long, value_name = "PATH", conflicts_with = "query")]
    validate_knowledge_base: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if cli.advanced_chain {
        config.agent.use_advanced_chain = true;
    }
    if let Some(path) = &cli.knowledge_base {
        config.network_tools.knowledge_base_path = Some(path.clone());
    }

    init_logging(&config);

    if let Some(path) = &cli.validate_knowledge_base {
        let knowledge_base = read_knowledge_base(path).map_err(AppError::from)?;
        println!(
            "{}: {} entries (version {})",
            path.display(),
            knowledge_base.entries.len(),
            knowledge_base.version.as_deref().unwrap_or("unversioned")
        );
        return Ok(());
    }

    let session_id = Uuid::new_v4();
    let span = info_span!("session", session_id = %session_id);
    run(cli, config).instrument(span).await
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "Network AI Assistant starting");

    let mut agent = match NetworkAgent::new(&config) {
        Ok(a) => a,
        Err(e) => {
            error!(error = %e, "Failed to initialize agent");
            return Err(e.into());
        }
    };
    let model_info = agent.model().model_info();
    info!(
        model = %model_info.model_name,
        backend = %model_info.backend,
        "Narration model ready"
    );
    info!(
        memory_limit = agent.config().memory_limit,
        advanced_chain = agent.config().use_advanced_chain,
        "Agent ready"
    );

    match &cli.query {
        Some(query) => {
            let response = agent.process_query(query).await;
            render(&response, cli.json)?;
        }
        None => repl(&mut agent, cli.json).await?,
    }

    info!("Session complete");
    Ok(())
}

/// Read one query per line until EOF or `exit`.
async fn repl(agent: &mut NetworkAgent, json: bool) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        let query = line.trim();
        if query.eq_ignore_ascii_case("exit") {
            break;
        }
        if query.is_empty() {
            continue;
        }

        let response = agent.process_query(query).await;
        render(&response, json)?;
    }

    Ok(())
}

fn render(response: &Response, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    println!("\n{}\n", response.answer);
    println!("Reasoning: {}\n", response.reasoning);
    println!("Recommended actions:");
    for (i, action) in response.actions.iter().enumerate() {
        println!("  {}. {}", i + 1, action);
    }
    println!();
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
