use diyhorn::config::Config;
use std::error::Error;
use std::process::Command;

pub fn handle_config_view() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    println!("Current DIY Horn configuration:");
    println!("  data_dir: {}", config.data_dir.display());
    println!("  downloads_dir: {}", config.downloads_dir.display());
    println!("  media_dir: {}", config.media_dir.display());
    println!("  log_dir: {}", config.log_dir.display());
    println!("  listener.trigger: {}", config.listener.trigger);
    println!("  listener.focus: {}", config.listener.focus);
    println!(
        "  listener.focus_stale_secs: {}",
        config.listener.focus_stale_secs
    );

    Ok(())
}

pub fn handle_config_set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;

    config.set_value(key, value)?;
    config.save()?;

    println!("Configuration updated: {key} = {value}");

    Ok(())
}

pub fn handle_config_path() -> Result<(), Box<dyn Error>> {
    println!("{}", Config::config_path()?.display());
    Ok(())
}

pub fn handle_config_edit() -> Result<(), Box<dyn Error>> {
    // Write the defaults out so there is something to edit
    if !Config::exists()? {
        Config::new().save()?;
    }

    let config_path = Config::config_path()?;
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    println!("Opening {} in {}", config_path.display(), editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                format!("Editor '{editor}' not found. Set $EDITOR to a valid editor path.")
            } else {
                format!("Failed to launch editor '{editor}': {e}")
            }
        })?;

    if !status.success() {
        return Err(format!("Editor '{editor}' exited with error").into());
    }

    // Validate the config after editing
    match Config::load() {
        Ok(_) => println!("Configuration saved successfully"),
        Err(e) => {
            return Err(format!("Configuration validation failed: {e}").into());
        }
    }

    Ok(())
}
