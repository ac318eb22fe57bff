//! CLI command parsing and output.

pub mod display;

use clap::{Parser, Subcommand};

use crate::core::focus::Bucket;

/// ClearPlate - agent-driven weekly focus dashboard.
#[derive(Parser)]
#[command(name = "clearplate")]
#[command(about = "Agent-driven weekly focus dashboard")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Keep focus items in memory instead of the configured store.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered tools and components.
    #[command(visible_alias = "caps")]
    Capabilities {
        /// Output format (table or json).
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Invoke a tool with JSON arguments.
    Invoke {
        /// Tool name, e.g. `update-focus-item`.
        name: String,

        /// Arguments as a JSON object.
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Validate component props as the renderer would receive them.
    Render {
        /// Component name, e.g. `WeeklyFocusBoard`.
        name: String,

        /// Props as a JSON object.
        #[arg(short, long, default_value = "{}")]
        props: String,
    },

    /// Read and edit focus items.
    Focus {
        #[command(subcommand)]
        command: FocusCommands,
    },

    /// Show the weekly focus board.
    Board {
        /// Label shown under the heading.
        #[arg(short, long, default_value = "This Week")]
        week_label: String,
    },

    /// Show upcoming deadlines.
    Deadlines,

    /// Show upcoming bills and subscriptions.
    Money,

    /// Start the HTTP API server.
    Serve {
        /// Host to bind to (overrides config).
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum FocusCommands {
    /// List focus items.
    List {
        /// Output format (table or json).
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Move an item to another week.
    Move {
        /// Item id.
        id: String,

        /// Target bucket (thisWeek or nextWeek).
        bucket: Bucket,
    },

    /// Mark an item done.
    Done {
        /// Item id.
        id: String,

        /// Mark as not done instead.
        #[arg(long)]
        undo: bool,
    },

    /// Rename an item.
    Rename {
        /// Item id.
        id: String,

        /// New title.
        title: String,
    },

    /// Restore the default focus items.
    Reset,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration.
    Show,

    /// Show the configuration file path.
    Path,

    /// Generate a new API token for remote access.
    GenerateToken,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_parses_verbose_flag() {
        let cli = Cli::parse_from(["clearplate", "-vv", "board"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.ephemeral);
    }

    #[test]
    fn cli_requires_a_command() {
        assert!(Cli::try_parse_from(["clearplate"]).is_err());
    }

    #[test]
    fn cli_parses_invoke_with_args() {
        let cli = Cli::parse_from([
            "clearplate",
            "invoke",
            "update-focus-item",
            "--args",
            r#"{"id":"f3","bucket":"nextWeek"}"#,
        ]);
        match cli.command {
            Commands::Invoke { name, args } => {
                assert_eq!(name, "update-focus-item");
                assert!(args.contains("f3"));
            }
            _ => panic!("expected Invoke command"),
        }
    }

    #[test]
    fn cli_invoke_defaults_to_empty_object() {
        let cli = Cli::parse_from(["clearplate", "invoke", "get-deadlines"]);
        match cli.command {
            Commands::Invoke { args, .. } => assert_eq!(args, "{}"),
            _ => panic!("expected Invoke command"),
        }
    }

    #[test]
    fn cli_parses_capabilities_alias() {
        let cli = Cli::parse_from(["clearplate", "caps", "-f", "json"]);
        match cli.command {
            Commands::Capabilities { format } => assert_eq!(format, "json"),
            _ => panic!("expected Capabilities command"),
        }
    }

    #[test]
    fn cli_parses_focus_move() {
        let cli = Cli::parse_from(["clearplate", "--ephemeral", "focus", "move", "f3", "next"]);
        assert!(cli.ephemeral);
        match cli.command {
            Commands::Focus {
                command: FocusCommands::Move { id, bucket },
            } => {
                assert_eq!(id, "f3");
                assert_eq!(bucket, Bucket::NextWeek);
            }
            _ => panic!("expected Focus Move command"),
        }
    }

    #[test]
    fn cli_rejects_unknown_bucket() {
        assert!(Cli::try_parse_from(["clearplate", "focus", "move", "f3", "someday"]).is_err());
    }

    #[test]
    fn cli_parses_focus_done_undo() {
        let cli = Cli::parse_from(["clearplate", "focus", "done", "f2", "--undo"]);
        assert!(matches!(
            cli.command,
            Commands::Focus {
                command: FocusCommands::Done { undo: true, .. }
            }
        ));
    }

    #[test]
    fn cli_parses_serve_overrides() {
        let cli = Cli::parse_from(["clearplate", "serve", "-p", "8080"]);
        match cli.command {
            Commands::Serve { host, port } => {
                assert!(host.is_none());
                assert_eq!(port, Some(8080));
            }
            _ => panic!("expected Serve command"),
        }
    }
}
