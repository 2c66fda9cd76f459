//! Clip persistence seam.
//!
//! The core never touches durable storage itself; hosts implement `ClipSink`
//! (asset database, filesystem, browser download) and `save_clip` validates
//! before delegating. Failures are reported once, never retried.

use crate::data::Clip;
use crate::error::ClipError;

/// Host-owned writer for finished clips.
pub trait ClipSink {
    /// Write `clip` under the caller-chosen `name`. The error string is the
    /// host's own diagnostic.
    fn save(&mut self, name: &str, clip: &Clip) -> Result<(), String>;
}

/// Validate `clip` and hand it to the sink under `name`.
pub fn save_clip(sink: &mut dyn ClipSink, name: &str, clip: &Clip) -> Result<(), ClipError> {
    clip.validate_basic()
        .map_err(|reason| ClipError::MalformedClip { reason })?;
    match sink.save(name, clip) {
        Ok(()) => {
            log::info!("saved clip '{name}' ({} channels)", clip.channels.len());
            Ok(())
        }
        Err(reason) => {
            log::error!("save failed for '{name}': {reason}");
            Err(ClipError::SaveFailed {
                name: name.to_string(),
                reason,
            })
        }
    }
}
