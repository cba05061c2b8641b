//! Noticeboard CLI
//!
//! Hosts a notice board in a terminal: simulated producers publish the outcome
//! of fake remote calls, and a renderer subscriber prints every snapshot.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use noticeboard_core::traits::Notifier;
use noticeboard_core::types::{Notice, NoticeAction, NoticeContent, NoticePatch, Snapshot};
use noticeboard_store::{NoticeBoard, StoreConfig};

/// Noticeboard - ephemeral notification store
#[derive(Parser)]
#[command(name = "noticeboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted producer/renderer session
    Demo {
        /// Number of notices kept at once
        #[arg(short, long, env = "NOTICEBOARD_CAPACITY", default_value = "1")]
        capacity: usize,
        /// Delay between dismissal and eviction (milliseconds)
        #[arg(short, long, env = "NOTICEBOARD_EVICTION_DELAY_MS", default_value = "1500")]
        delay_ms: u64,
        /// Number of simulated remote calls
        #[arg(short, long, default_value = "4")]
        requests: u32,
    },

    /// Print the configuration read from the environment
    Config {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "noticeboard=debug,info"
    } else {
        "noticeboard=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Demo {
            capacity,
            delay_ms,
            requests,
        } => cmd_demo(capacity, delay_ms, requests).await,
        Commands::Config { json } => cmd_config(json),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMMANDS
// ═══════════════════════════════════════════════════════════════════════════════

async fn cmd_demo(capacity: usize, delay_ms: u64, requests: u32) -> Result<()> {
    let config = StoreConfig {
        capacity,
        eviction_delay_ms: delay_ms,
    };
    let board = NoticeBoard::with_config(config.clone()).context("Invalid demo configuration")?;
    info!(capacity, delay_ms, "Board ready");

    println!("{}", "📣 Noticeboard demo".cyan().bold());
    let subscription = board.subscribe(render);

    // Producers only see the trait
    let notifier: Arc<dyn Notifier> = Arc::new(board.clone());
    for attempt in 1..=requests {
        println!("\n{} {}", "→ request".dimmed(), attempt);
        let outcome = fake_remote_call(attempt).await;
        let id = notifier.report_result(
            outcome
                .as_ref()
                .map(|_| ())
                .map_err(|err| err as &dyn Display),
        );
        if let Ok(body) = outcome {
            notifier.update(id, NoticePatch::new().with_description(body));
        }
    }

    println!("\n{}", "→ publishing with an action, then closing it from the renderer".dimmed());
    let handle = board.toast(
        NoticeContent::new()
            .with_title("Block written")
            .with_action(NoticeAction::new("undo", "Undo")),
    );
    if let Some(notice) = board.state().get(handle.id()) {
        notice.visibility_changed(false);
    }

    println!("\n{}", "→ dismissing everything".dimmed());
    board.dismiss(None);
    debug!(pending = board.pending_evictions().len(), "Waiting for evictions");

    tokio::time::sleep(config.eviction_delay() + Duration::from_millis(50)).await;

    println!(
        "\n{} {}",
        "✓ Final state:".green().bold(),
        serde_json::to_string(&board.state())?
    );
    subscription.unsubscribe();
    Ok(())
}

fn cmd_config(json: bool) -> Result<()> {
    let config = StoreConfig::from_env().context("Failed to read configuration")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", "Noticeboard configuration".cyan().bold());
        println!("   Capacity:       {}", config.capacity);
        println!("   Eviction delay: {:?}", config.eviction_delay());
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Stand-in for a remote API call: every third attempt fails.
async fn fake_remote_call(attempt: u32) -> Result<String> {
    tokio::time::sleep(Duration::from_millis(20)).await;
    if attempt % 3 == 0 {
        anyhow::bail!("Failed to fetch!");
    }
    Ok(format!("request {attempt} accepted"))
}

fn render(snapshot: &Snapshot) {
    if snapshot.is_empty() {
        println!("   {}", "(no notices)".dimmed());
        return;
    }
    for notice in snapshot.iter() {
        println!("   {}", render_line(notice));
    }
}

fn render_line(notice: &Notice) -> String {
    let title = notice.title().unwrap_or("");
    let title = if notice.content.is_destructive() {
        title.red().bold()
    } else {
        title.green().bold()
    };
    let mut line = format!("[{}] {}", notice.id, title);
    if let Some(description) = notice.description() {
        line.push_str(&format!(" - {description}"));
    }
    if let Some(action) = &notice.content.action {
        line.push_str(&format!(" [{}]", action.label));
    }
    if notice.visible {
        line
    } else {
        line.dimmed().strikethrough().to_string()
    }
}
