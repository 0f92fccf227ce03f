//! typeout - deliver text via clipboard or simulated typing
//!
//! Run `typeout send` to deliver stdin using the configured default mode.
//! Use `typeout status` to see which tools will be used.

use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;
use typeout::config::{self, Config};
use typeout::output::{self, Capability, OutputContext};
use typeout::{status, Cli, Commands, Environment, OutputMode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging once; library code only emits events
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("typeout={},warn", log_level))),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Send { text: None });

    if let Commands::Config { init: true } = command {
        let path = cli
            .config
            .clone()
            .or_else(Config::default_path)
            .context("Could not determine config directory")?;
        config::write_default_config(&path)?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    // Load configuration
    let mut config = config::load_config(cli.config.as_deref())?;

    // Apply CLI overrides
    if let Some(tool) = cli.clipboard_tool {
        config.output.clipboard_tool = tool;
    }
    if let Some(tool) = cli.type_tool {
        config.output.type_tool = tool;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.output.timeout_ms = timeout_ms;
    }

    match command {
        Commands::Send { text } => {
            let mode = config.output.default_mode;
            send(&config, mode, text).await?;
        }
        Commands::Copy { text } => send(&config, OutputMode::Clipboard, text).await?,
        Commands::Type { text } => send(&config, OutputMode::ActiveWindow, text).await?,
        Commands::Status { no_tray } => {
            let env = Environment::detect();
            let ctx = context(&config);
            let report = if no_tray {
                status::collect(&env, &config.output, &ctx)
            } else {
                status::detect(&env, &config.output, &ctx).await
            };
            status::print_status(&report);
        }
        Commands::Config { .. } => {
            let rendered =
                toml::to_string_pretty(&config).context("Failed to serialize config")?;
            println!("{}", rendered);
        }
    }

    Ok(())
}

fn context(config: &Config) -> OutputContext {
    OutputContext::new(config.security.policy().into()).with_timeout_ms(config.output.timeout_ms)
}

async fn send(config: &Config, mode: OutputMode, text: Option<String>) -> anyhow::Result<()> {
    let text = match text {
        Some(text) => text,
        None => read_stdin().await?,
    };

    let env = Environment::detect();
    tracing::debug!("Environment: {} ({})", env.display_server, env.desktop);

    let outputter = output::create_outputter(
        Capability::for_mode(mode),
        &config.output,
        &env,
        &context(config),
    )?;
    output::deliver(outputter.as_ref(), mode, &text).await?;
    Ok(())
}

/// Read the payload from stdin, dropping one trailing newline
async fn read_stdin() -> anyhow::Result<String> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("Failed to read text from stdin")?;

    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}
