//! CLI command definitions for the `shook` binary.
//!
//! Verb-noun layout: `shook create endpoint`, `shook list endpoints`.

pub mod endpoint;
pub mod serve;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Bearer-token secured webhook endpoints.
#[derive(Parser)]
#[command(name = "shook", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new resource.
    Create {
        #[command(subcommand)]
        resource: CreateResource,
    },

    /// List resources.
    #[command(alias = "ls")]
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Delete a resource.
    #[command(alias = "rm")]
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },

    /// Start the webhook server.
    Serve {
        /// Port to listen on (overrides config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CreateResource {
    /// Provision a webhook endpoint and print its token once.
    Endpoint {
        /// Endpoint id; normalized to lowercase with underscores.
        name: Option<String>,

        /// Use this token instead of generating one.
        #[arg(long, conflicts_with = "generate")]
        token: Option<String>,

        /// Generate a token without prompting.
        #[arg(long)]
        generate: bool,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// List provisioned endpoints.
    Endpoints,
}

#[derive(Subcommand)]
pub enum DeleteResource {
    /// Delete an endpoint and its stored credential.
    Endpoint {
        /// Endpoint id to delete.
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_endpoint() {
        let cli = Cli::parse_from(["shook", "create", "endpoint", "garage", "--generate"]);
        match cli.command {
            Commands::Create {
                resource: CreateResource::Endpoint { name, token, generate },
            } => {
                assert_eq!(name.as_deref(), Some("garage"));
                assert!(token.is_none());
                assert!(generate);
            }
            _ => panic!("expected create endpoint"),
        }
    }

    #[test]
    fn token_conflicts_with_generate() {
        let result = Cli::try_parse_from([
            "shook", "create", "endpoint", "garage", "--token", "t", "--generate",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli = Cli::parse_from(["shook", "serve", "-p", "9000", "-v"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(9000));
                assert!(host.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["shook", "list", "endpoints", "--json"]);
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::List { resource: ListResource::Endpoints }
        ));
    }
}
