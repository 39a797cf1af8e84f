mod render;
mod watch;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{debug, LevelFilter};
use render::{Format, Renderer};
use std::io::Write;
use tokio::{io::BufReader, spawn};
use tokio_util::sync::CancellationToken;
use torquemon_common::{
    decode, parse_status_byte,
    scenarios::{scenario, SCENARIOS},
};

/// Torque sensor status monitor
#[derive(Parser)]
#[command(name = "torquemon", version)]
struct Args {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Only show active alerts instead of every indicator
    #[arg(long, default_value_t = false, global = true)]
    compact: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode status bytes (decimal, 0x hex or 0b binary)
    Decode {
        #[arg(required = true, value_parser = parse_status_byte)]
        bytes: Vec<u8>,
    },

    /// List the demo scenarios, or show one of them
    Scenario { id: Option<String> },

    /// Decode every possible status byte
    Table,

    /// Read status bytes from stdin, one per line, and show each as it arrives
    Watch {
        /// Flash the marker of critical states
        #[arg(long, default_value_t = false)]
        blink: bool,
    },
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _ = env_logger::builder()
        .filter_level(log_level(args.verbose))
        .parse_default_env()
        .try_init();

    let renderer = Renderer {
        format: args.format,
        compact: args.compact,
    };

    match args.command {
        Command::Decode { bytes } => {
            let mut out = std::io::stdout().lock();
            for b in bytes {
                let status = decode(b);
                debug!("decoded {status:?}");
                renderer.status(&mut out, &status)?;
            }
            out.flush()?;
        }

        Command::Scenario { id: None } => {
            let mut out = std::io::stdout().lock();
            for s in &SCENARIOS {
                renderer.scenario(&mut out, s)?;
            }
        }

        Command::Scenario { id: Some(id) } => {
            let s = scenario(&id).ok_or_else(|| {
                let known: Vec<_> = SCENARIOS.iter().map(|s| s.id).collect();
                anyhow!("Unknown scenario {id:?} (known: {})", known.join(", "))
            })?;

            if renderer.format == Format::Text {
                println!("{}", s.label);
            }
            renderer.status(&mut std::io::stdout().lock(), &s.status())?;
        }

        Command::Table => {
            let mut out = std::io::stdout().lock();
            for b in 0..=u8::MAX {
                renderer.line(&mut out, &decode(b))?;
            }
        }

        Command::Watch { blink } => {
            let cancel_parent = CancellationToken::new();
            let cancel = cancel_parent.child_token();
            spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel_parent.cancel();
                }
            });

            let input = BufReader::new(tokio::io::stdin());
            let ended = watch::run(input, &mut std::io::stdout(), renderer, blink, cancel)
                .await
                .context("watching stdin")?;

            if ended == watch::Ending::Cancelled {
                // the runtime would wait forever on the blocked stdin read
                std::process::exit(0);
            }
        }
    }

    Ok(())
}
