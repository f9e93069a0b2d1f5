//! Preset record writer
//!
//! Produces the exact 376-byte record Logic Pro's External Instrument
//! plugin expects for a preset bound to a MIDI bank/program and device.
//! Pure and deterministic: a patch plus a config either yields the same
//! bytes every time or a typed error - malformed inputs never produce a
//! silently corrupt file.

use thiserror::Error;

use super::layout::{
    self, ParamSource, StringField, DEVICE_ID, DEVICE_ID_VALUE, DISPLAY_LABEL,
    DISPLAY_LABEL_VALUE, MIDI_DESTINATION, PST_SIZE,
};
use crate::patch::{Patch, PatchFieldError};

/// Device name stored in presets when the caller does not override it.
pub const DEFAULT_MIDI_DESTINATION: &str = "MD-BT01";

/// Per-export device configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// MIDI channel stored in the preset (1-16)
    pub midi_channel: u8,
    /// Name of the MIDI destination device, at most 31 ASCII bytes
    pub midi_destination: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            midi_channel: 1,
            midi_destination: DEFAULT_MIDI_DESTINATION.to_string(),
        }
    }
}

/// Rejected encoder input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error(transparent)]
    Field(#[from] PatchFieldError),

    #[error("MIDI channel {0} out of range (1-16)")]
    ChannelOutOfRange(u8),

    #[error("{field} is {len} bytes, at most {capacity} fit before the next field")]
    StringTooLong {
        field: &'static str,
        len: usize,
        capacity: usize,
    },

    #[error("{field} must be ASCII")]
    NotAscii { field: &'static str },
}

/// Convert a semantic 0-indexed MIDI value to the 1-indexed form the
/// consuming application stores. Parameters 12-14 are the only users;
/// everything else in the record is written as-is.
fn to_stored_index(value: u8) -> u32 {
    u32::from(value) + 1
}

/// Encode a patch as a 376-byte External Instrument preset record.
pub fn encode(patch: &Patch, config: &EncoderConfig) -> Result<[u8; PST_SIZE], EncodeError> {
    patch.validate()?;
    if !(1..=16).contains(&config.midi_channel) {
        return Err(EncodeError::ChannelOutOfRange(config.midi_channel));
    }

    let mut buf = [0u8; PST_SIZE];

    for &(offset, value) in layout::FIXED_BYTES {
        buf[offset] = value;
    }
    for &(offset, value) in layout::FIXED_U32S {
        write_u32(&mut buf, offset, value);
    }

    write_ascii(&mut buf, &DEVICE_ID, DEVICE_ID_VALUE)?;
    write_ascii(&mut buf, &DISPLAY_LABEL, DISPLAY_LABEL_VALUE)?;
    write_ascii(&mut buf, &MIDI_DESTINATION, &config.midi_destination)?;

    let mut offset = layout::PARAM_BLOCK_OFFSET;
    for (id, source) in &layout::PARAMS {
        let value = match source {
            ParamSource::Fixed(v) => *v,
            ParamSource::Channel => u32::from(config.midi_channel),
            ParamSource::Program => to_stored_index(patch.pc),
            ParamSource::BankLsb => to_stored_index(patch.lsb),
            ParamSource::BankMsb => to_stored_index(patch.msb),
        };
        write_u32(&mut buf, offset, *id);
        write_u32(&mut buf, offset + 4, value);
        offset += 8;
    }

    Ok(buf)
}

fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Write a raw ASCII string into its field, bounds-checked against the gap
/// before the next field. At least one pre-zeroed pad byte must remain so
/// readers scanning for a terminator stop inside the gap.
fn write_ascii(buf: &mut [u8], field: &StringField, value: &str) -> Result<(), EncodeError> {
    if !value.is_ascii() {
        return Err(EncodeError::NotAscii { field: field.name });
    }
    if value.len() > field.capacity() {
        return Err(EncodeError::StringTooLong {
            field: field.name,
            len: value.len(),
            capacity: field.capacity(),
        });
    }
    buf[field.offset..field.offset + value.len()].copy_from_slice(value.as_bytes());
    Ok(())
}
