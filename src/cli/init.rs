use diyhorn::config::Config;
use owo_colors::OwoColorize;
use std::error::Error;

use super::slots::print_slot;

pub fn handle_init() -> Result<(), Box<dyn Error>> {
    let config = if Config::exists()? {
        Config::load()?
    } else {
        let config = Config::new();
        config.save()?;
        println!(
            "{} {}",
            "Configuration saved to:".bright_black(),
            Config::config_path()?.display().to_string().cyan()
        );
        config
    };

    let (_store, slots) = super::prepare_board(&config)?;

    println!("{}", "✓ Board ready".green().bold());
    println!(
        "  {} {}",
        "Sounds:".bright_black(),
        config.bundled_sound_dir().display()
    );
    println!(
        "  {} {}",
        "Database:".bright_black(),
        config.database_path().display()
    );
    println!();
    for slot in &slots {
        print_slot(slot);
    }

    Ok(())
}
