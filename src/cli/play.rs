use diyhorn::HornError;
use diyhorn::config::Config;
use diyhorn::playback::{PlaybackEvent, Player, RodioOutput};
use diyhorn::store::{ButtonStore, SqliteStore};
use owo_colors::OwoColorize;
use std::error::Error;
use std::thread;
use std::time::Duration;

/// Play one button's sound and wait for it to finish.
pub fn handle_play(slot: usize) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let store = SqliteStore::open(&config.database_path())?;
    let button = store
        .get_all()?
        .into_iter()
        .find(|b| b.id == slot)
        .ok_or(HornError::UnknownSlot(slot))?;

    let mut player = Player::new(RodioOutput::open_default()?);
    player.play(&button.sound_path)?;
    println!(
        "{} {} ({})",
        "▶".green(),
        button.text.bold(),
        button.sound_path.display()
    );

    while player.is_active() {
        if let Some(PlaybackEvent::Completed(_)) = player.poll() {
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }

    Ok(())
}
