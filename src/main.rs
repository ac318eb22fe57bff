use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use clearplate::{
    Config, Dashboard,
    build_info,
    cli::{Cli, Commands, ConfigCommands, FocusCommands, display},
    config::StoreBackend,
    core::{
        catalog::GET_FOCUS_ITEMS,
        deadline::demo_deadlines,
        focus::{FocusItem, FocusPatch},
        money::demo_money_items,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if cli.ephemeral {
        config.store.backend = StoreBackend::Memory;
    }

    match cli.command {
        Commands::Capabilities { format } => {
            let dashboard = Dashboard::from_config(&config.store)?;
            let definitions = dashboard.definitions();
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&definitions)?);
            } else {
                println!("ClearPlate {}\n", build_info::version_string());
                print!("{}", display::capabilities(&definitions));
            }
        }

        Commands::Invoke { name, args } => {
            let dashboard = Dashboard::from_config(&config.store)?;
            let result = dashboard.invoke_json(&name, &args)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Render { name, props } => {
            let dashboard = Dashboard::from_config(&config.store)?;
            let props = dashboard.render_json(&name, &props)?;
            println!("{}", serde_json::to_string_pretty(&props)?);
        }

        Commands::Focus { command } => {
            let dashboard = Dashboard::from_config(&config.store)?;
            handle_focus_command(&dashboard, command)?;
        }

        Commands::Board { week_label } => {
            let dashboard = Dashboard::from_config(&config.store)?;
            let items: Vec<FocusItem> =
                serde_json::from_value(dashboard.invoke(GET_FOCUS_ITEMS, &serde_json::json!({}))?)?;
            print!("{}", display::board(&items, &week_label));
        }

        Commands::Deadlines => {
            print!("{}", display::deadlines(&demo_deadlines()));
        }

        Commands::Money => {
            print!("{}", display::money(&demo_money_items()));
        }

        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.api.host.clone());
            let port = port.unwrap_or(config.api.port);
            let dashboard = Dashboard::from_config(&config.store)?;
            clearplate::api::serve(&host, port, dashboard, config.api.token()).await?;
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                println!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigCommands::Path => {
                let path = Config::config_path()?;
                println!("{}", path.display());
            }
            ConfigCommands::GenerateToken => {
                let token = clearplate::config::ApiConfig::generate_token();
                println!("Generated API token:\n");
                println!("  {token}\n");
                println!("Add to your config.toml:");
                println!("  [api]");
                println!("  token = \"{token}\"\n");
                println!("Or set environment variable:");
                println!("  export CLEARPLATE_API_TOKEN=\"{token}\"");
            }
        },
    }

    Ok(())
}

fn handle_focus_command(dashboard: &Dashboard, command: FocusCommands) -> anyhow::Result<()> {
    let items = match command {
        FocusCommands::List { format } => {
            let items = dashboard.store().load_all();
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&items)?);
                return Ok(());
            }
            items
        }

        FocusCommands::Move { id, bucket } => {
            let patch = FocusPatch {
                bucket: Some(bucket),
                ..FocusPatch::default()
            };
            dashboard.edit_focus(&id, &patch)?
        }

        FocusCommands::Done { id, undo } => {
            let patch = FocusPatch {
                done: Some(!undo),
                ..FocusPatch::default()
            };
            dashboard.edit_focus(&id, &patch)?
        }

        FocusCommands::Rename { id, title } => {
            let patch = FocusPatch {
                title: Some(title),
                ..FocusPatch::default()
            };
            dashboard.edit_focus(&id, &patch)?
        }

        FocusCommands::Reset => {
            dashboard.store().reset()?;
            println!("Focus items restored to defaults.");
            dashboard.store().load_all()
        }
    };

    print!("{}", display::focus_table(&items));
    Ok(())
}
