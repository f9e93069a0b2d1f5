//! External Instrument preset (.pst) encoding
//!
//! Logic Pro's External Instrument plugin stores its presets as a fixed
//! 376-byte binary record. The format was reverse-engineered byte by byte
//! from files the plugin writes; [`layout`] holds the resulting table and
//! [`encoder`] walks it.

pub mod encoder;
pub mod layout;

pub use encoder::{encode, EncodeError, EncoderConfig, DEFAULT_MIDI_DESTINATION};
pub use layout::PST_SIZE;
