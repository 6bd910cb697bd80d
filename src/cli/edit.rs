use diyhorn::HornError;
use diyhorn::config::Config;
use diyhorn::slots::parse_color;
use diyhorn::sounds::import_picked;
use diyhorn::store::ButtonStore;
use owo_colors::OwoColorize;
use std::error::Error;
use std::path::Path;

use super::slots::print_slot;

/// Change a button without opening the board. A new sound relabels the
/// button after its file name unless `label` is given too.
pub fn handle_edit(
    slot: usize,
    label: Option<&str>,
    color: Option<&str>,
    sound: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    if label.is_none() && color.is_none() && sound.is_none() {
        return Err("Nothing to change; pass --label, --color or --sound".into());
    }

    // Validate before touching anything on disk
    let color = color.map(parse_color).transpose()?;

    let config = Config::load()?;
    let (store, slots) = super::prepare_board(&config)?;
    let mut button = slots
        .into_iter()
        .find(|b| b.id == slot)
        .ok_or(HornError::UnknownSlot(slot))?;

    if let Some(sound) = sound {
        let source = shellexpand::tilde(sound);
        let imported = import_picked(Path::new(source.as_ref()), &config.private_sound_dir())?;
        button = button.with_sound(imported);
    }
    if let Some(label) = label {
        button = button.with_text(label);
    }
    if let Some(color) = color {
        button = button.with_color(color);
    }

    store.upsert(std::slice::from_ref(&button))?;

    println!("{}", "✓ Button updated".green().bold());
    print_slot(&button);

    Ok(())
}
