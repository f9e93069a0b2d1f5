//! Patch model and library
//!
//! A patch is one Genos voice: a display name, a grouping category, and the
//! MIDI numbers (Program Change + Bank Select MSB/LSB) that select it on the
//! instrument. Libraries are loaded from a JSON array of patch records.

mod filename;
mod library;

pub use filename::sanitize_filename;
pub use library::{LibraryError, PatchLibrary};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest value a 7-bit MIDI data byte can carry.
pub const MIDI_VALUE_MAX: u8 = 127;

/// One synthesizer voice, identified by Program Change + Bank MSB/LSB.
///
/// All three numbers use the 0-indexed MIDI wire convention. `category` is
/// for grouping only; it is not part of the exported preset or the derived
/// filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    /// Display name, arbitrary Unicode
    pub name: String,
    /// Grouping category (e.g. "Piano", "Strings")
    pub category: String,
    /// Program Change number (0-127)
    pub pc: u8,
    /// Bank Select LSB (0-127)
    pub lsb: u8,
    /// Bank Select MSB (0-127)
    pub msb: u8,
}

/// A patch field outside its MIDI range.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{field} {value} out of range (0-127)")]
pub struct PatchFieldError {
    /// Which field was rejected
    pub field: &'static str,
    /// The offending value
    pub value: u8,
}

impl Patch {
    /// Check that pc/lsb/msb are valid 7-bit MIDI values.
    ///
    /// `u8` admits 128-255, which would be truncated on the wire and shifted
    /// into the wrong bank in an exported preset, so both the MIDI transport
    /// and the preset encoder reject them up front.
    pub fn validate(&self) -> Result<(), PatchFieldError> {
        for (field, value) in [("pc", self.pc), ("lsb", self.lsb), ("msb", self.msb)] {
            if value > MIDI_VALUE_MAX {
                return Err(PatchFieldError { field, value });
            }
        }
        Ok(())
    }

    /// Filesystem-safe base filename (no extension) for this patch.
    pub fn filename(&self) -> String {
        sanitize_filename(&self.name)
    }
}
