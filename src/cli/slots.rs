use diyhorn::config::Config;
use diyhorn::slots::{ButtonConfig, format_color};
use diyhorn::store::{ButtonStore, SqliteStore};
use owo_colors::OwoColorize;
use std::error::Error;

pub fn print_slot(slot: &ButtonConfig) {
    let (r, g, b) = slot.rgb();
    println!(
        "  {}  {}  {:<8}  {}  {}",
        slot.id.to_string().bold(),
        "██".truecolor(r, g, b),
        slot.text,
        format_color(slot.color).bright_black(),
        slot.sound_path.display()
    );
}

pub fn handle_slots(json: bool) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let store = SqliteStore::open(&config.database_path())?;
    let slots = store.get_all()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&slots)?);
        return Ok(());
    }

    if slots.is_empty() {
        println!(
            "{} No buttons yet. Run {} to set up the board.",
            "Note:".yellow(),
            "horn init".cyan()
        );
        return Ok(());
    }

    for slot in &slots {
        let missing = !slot.sound_path.exists();
        print_slot(slot);
        if missing {
            println!("     {}", "sound file is missing".red());
        }
    }

    Ok(())
}
