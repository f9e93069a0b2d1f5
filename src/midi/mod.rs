//! MIDI output transport
//!
//! Auditioning a patch sends Bank Select + Program Change to an output
//! port; the instrument switches voices immediately. The preset encoder
//! never touches this module - it only shares the patch numeric fields.

mod device;

pub use device::{MidiDeviceInfo, MidiError, MidiOutputManager};
