//! Bundled default sounds and picked-file import.
//!
//! The default board ships four short clips. They are rendered
//! deterministically from tone recipes into 16-bit mono WAV files the first
//! time the app starts, so installing twice produces identical bytes. Files
//! the user picks are copied into the private sounds directory under their
//! source name with the extension stripped.

use hound::{SampleFormat, WavSpec, WavWriter};
use log::{debug, info};
use std::f32::consts::PI;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{HornError, Result};

const SAMPLE_RATE: u32 = 22_050;
const AMPLITUDE: f32 = 0.6;
const FADE_SECS: f32 = 0.01;

/// One step of a tone recipe: a frequency (0.0 for silence) held for `ms`.
#[derive(Debug, Clone, Copy)]
pub struct Tone {
    pub freq: f32,
    pub ms: u32,
}

const fn tone(freq: f32, ms: u32) -> Tone {
    Tone { freq, ms }
}

#[derive(Debug)]
pub struct BundledSound {
    pub file_name: &'static str,
    pub label: &'static str,
    pub recipe: &'static [Tone],
}

pub const BUNDLED_SOUNDS: [BundledSound; 4] = [
    BundledSound {
        file_name: "honk.wav",
        label: "Honk",
        recipe: &[tone(311.0, 180), tone(0.0, 60), tone(311.0, 420)],
    },
    BundledSound {
        file_name: "chime.wav",
        label: "Chime",
        recipe: &[tone(1046.5, 160), tone(1318.5, 160), tone(1568.0, 360)],
    },
    BundledSound {
        file_name: "siren.wav",
        label: "Siren",
        recipe: &[
            tone(660.0, 220),
            tone(880.0, 220),
            tone(660.0, 220),
            tone(880.0, 220),
        ],
    },
    BundledSound {
        file_name: "woof.wav",
        label: "Woof",
        recipe: &[tone(180.0, 120), tone(0.0, 90), tone(150.0, 160)],
    },
];

impl BundledSound {
    fn render(&self) -> Vec<i16> {
        self.recipe.iter().flat_map(|t| render_tone(*t)).collect()
    }

    /// Write this clip as a WAV file at `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let file = fs::File::create(path).map_err(|e| HornError::io(path, e))?;
        let mut writer =
            WavWriter::new(BufWriter::new(file), spec).map_err(|e| wav_error(path, e))?;
        for sample in self.render() {
            writer.write_sample(sample).map_err(|e| wav_error(path, e))?;
        }
        writer.finalize().map_err(|e| wav_error(path, e))?;
        Ok(())
    }
}

fn render_tone(tone: Tone) -> Vec<i16> {
    let count = (SAMPLE_RATE as u64 * tone.ms as u64 / 1000) as usize;
    if tone.freq <= 0.0 {
        return vec![0; count];
    }

    let fade = ((SAMPLE_RATE as f32 * FADE_SECS) as usize).max(1);
    (0..count)
        .map(|n| {
            let t = n as f32 / SAMPLE_RATE as f32;
            // Short linear ramps at both ends avoid clicks between steps
            let edge = n.min(count - 1 - n);
            let envelope = (edge as f32 / fade as f32).min(1.0);
            let value = (2.0 * PI * tone.freq * t).sin() * AMPLITUDE * envelope;
            (value * i16::MAX as f32) as i16
        })
        .collect()
}

fn wav_error(path: &Path, err: hound::Error) -> HornError {
    match err {
        hound::Error::IoError(source) => HornError::io(path, source),
        other => HornError::Decode {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}

/// Install the bundled sounds into `dir`, skipping files that already exist.
/// Returns the paths that were written.
pub fn install_bundled(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| HornError::io(dir, e))?;

    let mut written = Vec::new();
    for sound in &BUNDLED_SOUNDS {
        let target = dir.join(sound.file_name);
        if target.exists() {
            debug!("Bundled sound already present: {}", target.display());
            continue;
        }

        // Render next to the target and move it into place once complete
        let partial = dir.join(format!("{}.part", sound.file_name));
        sound.write_to(&partial)?;
        fs::rename(&partial, &target).map_err(|e| HornError::io(&target, e))?;

        info!("Installed bundled sound: {}", target.display());
        written.push(target);
    }

    Ok(written)
}

/// Copy a picked audio file into `private_dir`, named after the source file
/// without its extension. An existing file of the same name is replaced;
/// picking a file that already is the target leaves it untouched.
pub fn import_picked(source: &Path, private_dir: &Path) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| HornError::NotFound(source.to_path_buf()))?;

    fs::create_dir_all(private_dir).map_err(|e| HornError::io(private_dir, e))?;

    let target = private_dir.join(stem);
    if is_same_file(source, &target) {
        debug!("{} is already imported", target.display());
        return Ok(target);
    }

    let partial = private_dir.join(format!("{stem}.part"));
    let mut input = fs::File::open(source).map_err(|e| HornError::io(source, e))?;
    let mut output = fs::File::create(&partial).map_err(|e| HornError::io(&partial, e))?;
    let copied = std::io::copy(&mut input, &mut output)
        .and_then(|_| output.flush())
        .map_err(|e| HornError::io(&partial, e));
    drop(output);
    if let Err(e) = copied {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }
    fs::rename(&partial, &target).map_err(|e| HornError::io(&target, e))?;

    info!(
        "Imported {} as {}",
        source.display(),
        target.display()
    );
    Ok(target)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
