pub mod app;
pub mod edit_dialog;
pub mod edit_dialog_ui;
pub mod picker;
pub mod ui;

use std::error::Error;

use crate::config::Config;

pub fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    app::run_board(config)
}
