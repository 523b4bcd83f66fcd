//! Skybrief - weather briefing agent
//!
//! Main entry point for the CLI application.

use clap::Parser;
use skybrief::{Agent, Config, RunInput};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Skybrief - check the weather and email a briefing
#[derive(Parser, Debug)]
#[command(name = "skybrief")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// City to look up the weather for
    #[arg(long, short = 'c')]
    city: String,

    /// Recipient email address
    #[arg(long, short = 't')]
    to: String,

    /// Subject line (the model picks one when omitted)
    #[arg(long, short = 's')]
    subject: Option<String>,

    /// Model name override
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(ref model) = args.model {
        config.llm.model = model.clone();
    }

    if args.debug {
        config.agent.debug = true;
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                if config.agent.debug {
                    "skybrief=debug".into()
                } else {
                    "skybrief=warn".into()
                }
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let input = RunInput::new(args.city, args.to, args.subject);

    // Any fatal error propagates through anyhow: diagnostic on stderr,
    // non-zero exit, and no partial output on stdout.
    let agent = Agent::new(config)?;
    let answer = agent.run(&input).await?;

    println!("{}", answer);
    Ok(())
}
