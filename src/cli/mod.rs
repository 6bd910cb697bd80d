pub mod config;
pub mod edit;
pub mod init;
pub mod listen;
pub mod play;
pub mod slots;
pub mod ui;

use diyhorn::config::Config;
use diyhorn::slots::ButtonConfig;
use diyhorn::sounds::install_bundled;
use diyhorn::store::{SqliteStore, load_or_seed};
use std::error::Error;

/// Open the store with bundled sounds in place and the board seeded.
pub fn prepare_board(config: &Config) -> Result<(SqliteStore, Vec<ButtonConfig>), Box<dyn Error>> {
    install_bundled(&config.bundled_sound_dir())?;
    let store = SqliteStore::open(&config.database_path())?;
    let slots = load_or_seed(&store, &config.bundled_sound_dir())?;
    Ok((store, slots))
}
