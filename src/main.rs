mod render;
mod walker;

use anyhow::{bail, Context, Result};
use clap::Parser;
use graph::{GraphEvent, GraphModel};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{info, warn};
use walker::GitWalker;

#[derive(Parser)]
#[command(name = "loggraph")]
#[command(about = "Print the commit graph of a git repository", long_about = None)]
struct Cli {
    /// Path to the repository
    #[arg(default_value = ".")]
    path: PathBuf,
    /// Maximum number of commits to load
    #[arg(short = 'n', long)]
    limit: Option<usize>,
    /// Load history in batches of this many commits
    #[arg(long)]
    batch: Option<usize>,
    /// Only show history reachable from these branches
    #[arg(short, long = "branch")]
    branches: Vec<String>,
    /// Collapse every collapsible region
    #[arg(long)]
    collapse: bool,
    /// Print graph statistics after the rows
    #[arg(long)]
    stats: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loggraph=info,graph=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let walker = GitWalker::open(&cli.path)?;
    let commits = walker.commits(cli.limit)?;
    if commits.is_empty() {
        println!("No commits");
        return Ok(());
    }

    let batch = match cli.batch {
        Some(0) => bail!("--batch must be at least 1"),
        Some(size) => size,
        None => commits.len(),
    };
    let mut batches = commits.chunks(batch);
    let first = batches.next().context("No commits to lay out")?;
    let mut model = GraphModel::new(first)?;

    let (_subscription, events) = model.subscribe_channel();
    for chunk in batches {
        model.append_commits(chunk)?;
    }

    let heads = walker.branch_heads()?;
    if !cli.branches.is_empty() {
        let wanted: HashSet<&str> = cli.branches.iter().map(String::as_str).collect();
        let targets: HashSet<String> = heads
            .iter()
            .filter(|(name, _)| wanted.contains(name.as_str()))
            .map(|(_, target)| target.clone())
            .collect();
        for name in &cli.branches {
            if !heads.iter().any(|(head, _)| head == name) {
                warn!(branch = %name, "unknown branch");
            }
        }
        model.set_visible_branches(move |node| node.is_commit() && targets.contains(node.hash()));
    }

    if cli.collapse {
        let hidden = model.hide_all()?;
        info!(fragments = hidden, "collapsed");
    }

    for event in events.try_iter() {
        let GraphEvent::Replace { old, new } = event;
        info!(?old, ?new, "rows replaced");
    }

    let mut labels: HashMap<String, Vec<String>> = HashMap::new();
    for (name, target) in heads {
        labels.entry(target).or_default().push(name);
    }
    for line in render::render_rows(&model.view(), &labels) {
        println!("{}", line);
    }

    if cli.stats {
        let stats = model.graph().stats();
        println!();
        println!("commits:       {}", stats.commit_nodes);
        println!("merges:        {}", stats.merge_commits);
        println!("edge nodes:    {}", stats.edge_nodes);
        println!("end nodes:     {}", stats.end_nodes);
        println!("rows:          {}", stats.total_rows);
        println!("visible rows:  {}", model.node_rows().len());
        println!("branches:      {}", stats.branches);
    }

    Ok(())
}
