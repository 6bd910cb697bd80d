//! rodio-backed audio output.
//!
//! One output stream is opened per process and kept for its lifetime. Each
//! voice gets a fresh `Sink`, decoded by `rodio::Decoder`, which sniffs the
//! container so picked files work without an extension.

use log::info;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{AudioOutput, Voice};
use crate::error::{HornError, Result};

pub struct RodioOutput {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
}

impl RodioOutput {
    pub fn open_default() -> Result<Self> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| HornError::Output(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }
}

pub struct RodioVoice {
    sink: Sink,
}

impl Voice for RodioVoice {
    fn stop(&mut self) {
        self.sink.stop();
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}

impl AudioOutput for RodioOutput {
    type Voice = RodioVoice;

    fn start(&mut self, path: &Path) -> Result<RodioVoice> {
        let file = BufReader::new(File::open(path).map_err(|e| HornError::io(path, e))?);

        let source = Decoder::new(file).map_err(|e| HornError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        info!(
            "Decoded {}: {} Hz, {} channels, duration {:?}",
            path.display(),
            source.sample_rate(),
            source.channels(),
            source.total_duration()
        );

        let sink =
            Sink::try_new(&self.stream_handle).map_err(|e| HornError::Output(e.to_string()))?;
        sink.append(source);
        sink.play();

        Ok(RodioVoice { sink })
    }
}
