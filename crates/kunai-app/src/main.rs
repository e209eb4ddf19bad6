mod commands;

use clap::{Parser, Subcommand};
use kunai_core::config::load_config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kunai")]
#[command(about = "Expand RFC 5545 recurrence rules into concrete occurrences")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the occurrences of a rule inside a window
    Expand {
        /// RRULE value, e.g. "FREQ=WEEKLY;BYDAY=MO,WE"
        #[arg(short, long)]
        rule: String,

        /// First occurrence (YYYYMMDD or YYYYMMDDTHHMMSS)
        #[arg(short, long)]
        anchor: String,

        /// Window start; defaults to the anchor
        #[arg(long)]
        from: Option<String>,

        /// Window end; defaults to the configured window length after the start
        #[arg(long)]
        to: Option<String>,

        /// Emit JSON instead of one key per line
        #[arg(long)]
        json: bool,

        /// Bypass the specialized generators
        #[arg(long)]
        general: bool,
    },
    /// Print the generator a rule is routed to
    Classify {
        #[arg(short, long)]
        rule: String,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    let output = match cli.command {
        Commands::Expand {
            rule,
            anchor,
            from,
            to,
            json,
            general,
        } => commands::expand(
            &config,
            &commands::ExpandArgs {
                rule: &rule,
                anchor: &anchor,
                from: from.as_deref(),
                to: to.as_deref(),
                json,
                force_general: general,
            },
        )?,
        Commands::Classify { rule, json } => commands::classify(&rule, json)?,
    };
    println!("{output}");

    Ok(())
}
