// crates/cli/src/main.rs
//! jobwatch CLI: start or attach to a server-side batch job and render its
//! progress in the terminal.

mod credentials;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use jobwatch_client::{
    JobStarter, JobTracker, JobWatcher, PollerConfig, ProgressClient, StopReason, TrackerPhase,
};
use jobwatch_types::TrackedId;

#[derive(Debug, Parser)]
#[command(name = "jobwatch", version, about = "Track long-running batch jobs")]
struct Cli {
    /// Base URL of the job server.
    #[arg(long, default_value = "http://127.0.0.1:48620")]
    url: String,

    /// Bearer token (overrides JOBWATCH_TOKEN and the token file).
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a job and watch it to completion.
    Start {
        /// Operation name, used for the placeholder id and default params.
        operation: String,

        /// Initiation endpoint to POST to.
        #[arg(long, default_value = "/api/collect")]
        path: String,

        /// JSON body for the initiation request.
        #[arg(long)]
        params: Option<String>,

        /// Tail the per-item log (polls faster).
        #[arg(long)]
        follow_log: bool,
    },
    /// Attach to an already-running job by id.
    Watch {
        job_id: String,

        /// Tail the per-item log (polls faster).
        #[arg(long)]
        follow_log: bool,
    },
}

fn poll_config(follow_log: bool) -> PollerConfig {
    if follow_log {
        PollerConfig::follow()
    } else {
        PollerConfig::default()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let creds = credentials::resolve(cli.token.clone());
    let client = ProgressClient::new(&cli.url, creds).context("building HTTP client")?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            cancel.cancel();
        });
    }

    match cli.command {
        Command::Start {
            operation,
            path,
            params,
            follow_log,
        } => {
            let params = match params {
                Some(raw) => serde_json::from_str(&raw).context("--params must be valid JSON")?,
                None => serde_json::json!({ "source": operation }),
            };

            let starter = JobStarter::new(client, poll_config(follow_log));
            let watcher = starter
                .start(&operation, &path, params, &cancel)
                .await
                .context("failed to start job")?;

            watch(watcher, follow_log, cancel).await
        }
        Command::Watch { job_id, follow_log } => {
            let watcher = JobTracker::spawn(
                client,
                TrackedId::Real(job_id),
                poll_config(follow_log),
                cancel.clone(),
            );
            watch(watcher, follow_log, cancel).await
        }
    }
}

/// Redraw the progress surface on every tracker update until it stops.
async fn watch(watcher: JobWatcher, follow_log: bool, cancel: CancellationToken) -> Result<()> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40} {pos:>3}% {msg}")
            .expect("valid bar template"),
    );

    let mut rx = watcher.subscribe();
    let mut printed_log = 0usize;
    let mut last_warning: Option<String> = None;

    // The surface appears before the first poll result (or even the real
    // job id) arrives.
    {
        let state = rx.borrow().clone();
        bar.set_position(render::percent(&state));
        bar.set_message(render::progress_line(&state));
    }

    loop {
        if rx.changed().await.is_err() {
            // Tracker task gone without a terminal phase: cancellation.
            bar.finish_and_clear();
            if cancel.is_cancelled() {
                eprintln!("cancelled");
            }
            return Ok(());
        }

        let state = rx.borrow().clone();

        bar.set_position(render::percent(&state));
        bar.set_message(render::progress_line(&state));

        // Only announce a transient failure once per distinct message.
        let warning = render::transient_line(&state);
        if warning != last_warning {
            if let Some(msg) = &warning {
                bar.println(msg.clone());
            }
            last_warning = warning;
        }

        if follow_log {
            for line in render::new_log_lines(&state, &mut printed_log) {
                bar.println(line);
            }
        }

        if let TrackerPhase::Stopped(reason) = state.phase {
            bar.finish_and_clear();
            if let Some(line) = render::outcome_line(&state) {
                println!("{line}");
            }
            if reason == StopReason::Failed {
                std::process::exit(1);
            }
            return Ok(());
        }
    }
}
