use diyhorn::config::Config;
use std::error::Error;

pub fn handle_ui() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    #[cfg(feature = "player")]
    {
        diyhorn::player::run(&config)
    }

    #[cfg(not(feature = "player"))]
    {
        let _ = config;
        use owo_colors::OwoColorize;
        println!("{} {}", "📯".cyan(), "DIY Horn board".bold());
        println!();
        println!(
            "{} The button board requires the 'player' feature to be enabled.",
            "Note:".yellow()
        );
        println!();
        println!("To enable it, install with:");
        println!("  {}", "cargo install diyhorn --features player".cyan());
        println!();
        println!(
            "Meanwhile {} and {} work without it.",
            "horn play <slot>".cyan(),
            "horn edit <slot>".cyan()
        );

        Ok(())
    }
}
