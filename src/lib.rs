pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod focus;
pub mod listener;
pub mod logging;
pub mod playback;
pub mod slots;
pub mod sounds;
pub mod store;

#[cfg(feature = "player")]
pub mod player;

pub use error::{HornError, Result};
