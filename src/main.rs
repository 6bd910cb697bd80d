//! DIY Horn - a four-button terminal soundboard.
//!
//! Two entry points share one button store:
//!
//! 1. **Board** (`horn`, optional feature): a terminal UI with four colored
//!    buttons that play a sound when tapped and can be relabelled, recolored
//!    and pointed at a different sound file.
//!
//! 2. **Listener** (`horn listen`): a background process that plays the
//!    first button (or the first two) when a hardware volume key is pressed,
//!    taking turns with other players through an audio focus lock.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use diyhorn::listener::TriggerMode;
use std::error::Error;
use std::io;

mod cli;

#[derive(Parser)]
#[command(name = "horn")]
#[command(about = "Four-button soundboard with a volume-key listener")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the button board (default)
    Ui,
    /// Play buttons when volume keys are pressed
    Listen {
        /// Which keys play which buttons: first-slot or direction
        #[arg(short, long)]
        trigger: Option<TriggerMode>,
    },
    /// Install bundled sounds and create the default board
    Init,
    /// List the configured buttons
    Slots {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play one button's sound
    Play {
        /// Button id (0-3)
        slot: usize,
    },
    /// Change a button's label, color or sound
    Edit {
        /// Button id (0-3)
        slot: usize,
        /// New label (cut to 8 characters)
        #[arg(short, long)]
        label: Option<String>,
        /// New color, #RRGGBB or #AARRGGBB
        #[arg(short, long)]
        color: Option<String>,
        /// Audio file to copy in and play
        #[arg(short, long)]
        sound: Option<String>,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new([
            "data_dir",
            "downloads_dir",
            "media_dir",
            "log_dir",
            "listener.trigger",
            "listener.focus",
            "listener.focus_stale_secs",
        ]))]
        key: String,
        /// Configuration value
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
    /// Print the configuration file path
    Path,
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => {
            cli::ui::handle_ui()?;
        }
        Commands::Listen { trigger } => {
            cli::listen::handle_listen(trigger)?;
        }
        Commands::Init => {
            cli::init::handle_init()?;
        }
        Commands::Slots { json } => {
            cli::slots::handle_slots(json)?;
        }
        Commands::Play { slot } => {
            cli::play::handle_play(slot)?;
        }
        Commands::Edit {
            slot,
            label,
            color,
            sound,
        } => {
            cli::edit::handle_edit(slot, label.as_deref(), color.as_deref(), sound.as_deref())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
            ConfigAction::Path => {
                cli::config::handle_config_path()?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
    }

    Ok(())
}
