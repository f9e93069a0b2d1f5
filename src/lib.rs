//! patchdeck - Genos patch librarian with Logic Pro preset export
//!
//! Browse a library of Genos voice patches, audition them over a MIDI
//! output device, and export them as External Instrument `.pst` presets
//! that Logic Pro loads directly.

pub mod export;
pub mod logging;
pub mod midi;
pub mod patch;
pub mod prefs;
pub mod pst;
