//! Command-line interface for runviz.
//!
//! Provides commands for rendering a run's DAG to a standalone HTML file,
//! dumping the raw payload, and inspecting the resolved configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::adapters::{DagSource, FileSource, ServerClient};
use crate::config;
use crate::controller::DagController;
use crate::render::IconSet;

/// runviz - Pipeline-run DAG visualizer
#[derive(Parser, Debug)]
#[command(name = "runviz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a run's DAG to an HTML document
    Render {
        /// Run ID (UUID); optional when --input is given
        run_id: Option<String>,

        /// Render from a payload JSON file instead of the server
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output HTML path
        #[arg(short, long, default_value = "dag.html")]
        out: PathBuf,
    },

    /// Fetch and print the raw DAG payload for a run (debugging aid)
    Fetch {
        /// Run ID (UUID)
        run_id: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Render { run_id, input, out } => render(run_id, input, &out).await,
            Commands::Fetch { run_id } => fetch(&run_id).await,
            Commands::Config => show_config(),
        }
    }
}

async fn render(run_id: Option<String>, input: Option<PathBuf>, out: &Path) -> Result<()> {
    let cfg = config::get()?;

    match input {
        Some(path) => {
            let run_id = run_id.unwrap_or_else(|| "local".to_string());
            render_with(FileSource::new(path), &run_id, out).await
        }
        None => {
            let run_id = run_id.context("a run id is required unless --input is given")?;
            validate_run_id(&run_id)?;
            let source = ServerClient::new(&cfg.server_url, cfg.api_token.clone());
            render_with(source, &run_id, out).await
        }
    }
}

async fn render_with<S: DagSource>(source: S, run_id: &str, out: &Path) -> Result<()> {
    let cfg = config::get()?;
    let icons = IconSet::load(&cfg.icon_dir);
    let mut controller =
        DagController::new(source, icons, cfg.layout.clone(), cfg.assets.clone());

    let session = controller.render_run(run_id).await;
    std::fs::write(out, &session.html)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    println!("Rendered run {} to {}", run_id, out.display());
    if !session.status.is_empty() {
        println!("Run status: {}", session.status);
    }
    Ok(())
}

async fn fetch(run_id: &str) -> Result<()> {
    let cfg = config::get()?;
    validate_run_id(run_id)?;

    let source = ServerClient::new(&cfg.server_url, cfg.api_token.clone());
    let payload = source.fetch_dag(run_id).await?;

    // Round-trip through the validated graph so malformed payloads fail here
    // rather than silently printing garbage.
    let graph = payload.clone().into_graph()?;
    println!("{}", serde_json::to_string_pretty(&summary(&graph))?);
    Ok(())
}

fn summary(graph: &crate::domain::DagGraph) -> serde_json::Value {
    match graph {
        crate::domain::DagGraph::Full {
            name,
            status,
            nodes,
            edges,
        } => serde_json::json!({
            "name": name,
            "status": status,
            "nodes": nodes.len(),
            "edges": edges.len(),
        }),
        crate::domain::DagGraph::Unavailable { status, message } => serde_json::json!({
            "status": status,
            "message": message,
        }),
    }
}

fn show_config() -> Result<()> {
    let cfg = config::get()?;

    println!("server_url: {}", cfg.server_url);
    println!(
        "api_token: {}",
        if cfg.api_token.is_some() { "set" } else { "unset" }
    );
    println!("icon_dir: {}", cfg.icon_dir.display());
    println!("script_uri: {}", cfg.assets.script_uri);
    println!("style_uri: {}", cfg.assets.style_uri);
    match &cfg.config_file {
        Some(path) => println!("config_file: {}", path.display()),
        None => println!("config_file: (none found)"),
    }
    Ok(())
}

fn validate_run_id(run_id: &str) -> Result<()> {
    Uuid::parse_str(run_id)
        .map(|_| ())
        .with_context(|| format!("run id '{run_id}' is not a valid UUID"))
}
