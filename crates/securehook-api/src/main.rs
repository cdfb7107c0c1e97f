//! SecureHook CLI and webhook server entry point.
//!
//! Binary name: `shook`
//!
//! Parses CLI arguments, loads `config.toml`, initializes tracing and the
//! database, then dispatches to the command handler.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use securehook_infra::config::{read_server_config, resolve_data_dir};
use securehook_observe::tracing_setup::{LogConfig, init_tracing, shutdown_tracing};

use cli::{Cli, Commands, CreateResource, DeleteResource, ListResource};
use state::AppState;

/// Default filter directive for a verbosity level.
///
/// The server logs at `info` by default; one-shot commands stay quiet.
fn log_directive(verbose: u8, quiet: bool, serving: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 if serving => "info",
        0 => "warn",
        1 => "info,securehook=debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "shook", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let config_result = read_server_config(&data_dir).await;
    let mut config = config_result.as_ref().ok().cloned().unwrap_or_default();

    let serving = matches!(cli.command, Commands::Serve { .. });
    init_tracing(&LogConfig {
        format: config.log_format,
        otel: config.otel && serving,
        directive: log_directive(cli.verbose, cli.quiet, serving).to_string(),
    })
    .map_err(|e| anyhow::anyhow!(e))?;

    if let Err(e) = &config_result {
        tracing::warn!("{e}, using defaults");
    }

    if let Commands::Serve { host, port } = &cli.command {
        if let Some(host) = host {
            config.host = host.clone();
        }
        if let Some(port) = port {
            config.port = *port;
        }
    }

    let state = AppState::init(data_dir, config).await?;

    let result = match cli.command {
        Commands::Create { resource } => match resource {
            CreateResource::Endpoint {
                name,
                token,
                generate,
            } => cli::endpoint::create_endpoint(&state, name, token, generate, cli.json).await,
        },

        Commands::List { resource } => match resource {
            ListResource::Endpoints => cli::endpoint::list_endpoints(&state, cli.json).await,
        },

        Commands::Delete { resource } => match resource {
            DeleteResource::Endpoint { id, force } => {
                cli::endpoint::delete_endpoint(&state, &id, force, cli.json).await
            }
        },

        Commands::Serve { .. } => cli::serve::serve(&state, cli.quiet).await,

        Commands::Completions { .. } => Ok(()),
    };

    shutdown_tracing();
    result
}
