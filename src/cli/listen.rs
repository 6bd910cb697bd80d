use diyhorn::config::Config;
use diyhorn::focus::{AudioFocus, LockFileFocus};
use diyhorn::listener::{Listener, TriggerMode, keys};
use diyhorn::logging::{self, LISTENER_LOG_FILE};
use diyhorn::playback::{AudioOutput, Player, RodioOutput};
use diyhorn::store::SqliteStore;
use log::info;
use owo_colors::OwoColorize;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

pub fn handle_listen(trigger: Option<TriggerMode>) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let log_file = logging::init(&config.log_dir, LISTENER_LOG_FILE, true)?;
    info!("Listener logging to {}", log_file.display());

    let trigger = trigger.unwrap_or(config.listener.trigger);
    let store = SqliteStore::open(&config.database_path())?;
    let output = RodioOutput::open_default()?;

    if config.listener.focus {
        let focus = LockFileFocus::new(config.focus_lock_path(), config.focus_stale_after());
        let listener = Listener::activate(&store, Player::with_focus(output, focus), trigger)?;
        run_listener(listener)
    } else {
        let listener = Listener::activate(&store, Player::new(output), trigger)?;
        run_listener(listener)
    }
}

fn run_listener<O: AudioOutput, F: AudioFocus>(
    mut listener: Listener<O, F>,
) -> Result<(), Box<dyn Error>> {
    let running = Arc::new(AtomicBool::new(true));
    let running_handler = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Stop requested");
        running_handler.store(false, Ordering::Relaxed);
    })?;

    let (tx, rx) = mpsc::channel();
    let readers = keys::spawn_readers(tx)?;

    println!(
        "{} Listening for volume keys on {} device(s), trigger {}. Press Ctrl-C to stop.",
        "📯".cyan(),
        readers.len(),
        listener.trigger().to_string().cyan()
    );

    listener.run(&rx, &running);
    info!("Listener stopped");
    Ok(())
}
