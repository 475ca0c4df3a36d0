use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use doorway::cli::logging::{LogHandle, init_tracing};
use doorway::cli::{DoorCommands, run_door_edit, run_door_show, run_info, run_init, run_tree};
use doorway::config::AppConfig;
use doorway::store::bootstrap;
use doorway::tui::{run_ui, show_error_dialog};

#[derive(Parser)]
#[command(name = "doorway")]
#[command(about = "Access-control hardware inventory", long_about = None)]
struct Cli {
    /// Path of the SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and edit the inventory in the terminal UI (default)
    Ui,

    /// Create the database and insert the example dataset if empty
    Init,

    /// Show row counts for every table
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the Building > Floor > Room > Door hierarchy
    Tree {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect and edit doors
    Door {
        #[command(subcommand)]
        command: DoorCommands,
    },
}

fn run_default(config: &AppConfig, logs: &LogHandle) -> anyhow::Result<()> {
    match bootstrap(config) {
        Ok((store, _report)) => {
            if !std::io::stdout().is_terminal() {
                anyhow::bail!(
                    "The terminal UI needs an interactive terminal. Use a subcommand such as 'doorway tree'."
                );
            }
            logs.silence_on_terminal()?;
            run_ui(store)
        }
        Err(e) => {
            let message = format!("Cannot open {}: {e}", config.db_path().display());
            if std::io::stdout().is_terminal() {
                logs.silence_on_terminal()?;
                show_error_dialog(&message)?;
            }
            anyhow::bail!(message)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logs = init_tracing();

    let config = AppConfig::resolve(cli.config.as_deref(), cli.db)?;

    match cli.command {
        None | Some(Commands::Ui) => run_default(&config, &logs)?,
        Some(Commands::Init) => run_init(&config)?,
        Some(Commands::Info { json }) => run_info(&config, json)?,
        Some(Commands::Tree { json }) => run_tree(&config, json)?,
        Some(Commands::Door { command }) => match command {
            DoorCommands::Show { id, json } => run_door_show(&config, id, json)?,
            DoorCommands::Edit {
                id,
                name,
                room,
                no_room,
                notes,
                non_interactive,
            } => run_door_edit(&config, id, name, room, no_room, notes, non_interactive)?,
        },
    }

    Ok(())
}
