//! MIDI output device handling
//!
//! Provides enumeration and connection to MIDI output devices (hardware and
//! virtual). One port is held open at a time; connecting again replaces the
//! previous connection.

use midir::{MidiOutput, MidiOutputConnection};
use parking_lot::Mutex;
use thiserror::Error;

use crate::patch::{Patch, PatchFieldError};

/// Information about a MIDI output device
#[derive(Debug, Clone, serde::Serialize)]
pub struct MidiDeviceInfo {
    /// Device index (for connection)
    pub index: usize,
    /// Device name
    pub name: String,
}

/// MIDI transport failure.
#[derive(Debug, Error)]
pub enum MidiError {
    #[error("failed to initialize MIDI output: {0}")]
    Init(#[from] midir::InitError),

    #[error("MIDI device index {0} not found")]
    UnknownDevice(usize),

    #[error("failed to connect to {name}: {message}")]
    Connect { name: String, message: String },

    #[error("no MIDI device connected")]
    NotConnected,

    #[error("failed to send to {name}: {source}")]
    Send {
        name: String,
        #[source]
        source: midir::SendError,
    },

    #[error("MIDI channel {0} out of range (1-16)")]
    InvalidChannel(u8),

    #[error(transparent)]
    Field(#[from] PatchFieldError),
}

/// Active MIDI output connection
struct ActiveConnection {
    connection: MidiOutputConnection,
    /// Name of connected device
    device_name: String,
}

/// MIDI output manager - owns at most one open port at a time.
///
/// The connection is an owned handle behind a mutex, replaced atomically on
/// reconnect and closed on drop.
pub struct MidiOutputManager {
    connection: Mutex<Option<ActiveConnection>>,
}

impl MidiOutputManager {
    /// Create a new MIDI output manager
    pub fn new() -> Self {
        Self {
            connection: Mutex::new(None),
        }
    }

    /// List available MIDI output devices
    pub fn list_devices(&self) -> Result<Vec<MidiDeviceInfo>, MidiError> {
        let midi_out = MidiOutput::new("patchdeck-enumerate")?;

        let ports = midi_out.ports();
        let mut devices = Vec::with_capacity(ports.len());

        for (index, port) in ports.iter().enumerate() {
            let name = midi_out
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown Device {}", index));
            devices.push(MidiDeviceInfo { index, name });
        }

        Ok(devices)
    }

    /// Connect to a MIDI output device by index, replacing any existing
    /// connection. Returns the device name.
    pub fn connect(&self, device_index: usize) -> Result<String, MidiError> {
        self.disconnect();

        let midi_out = MidiOutput::new("patchdeck-output")?;

        let ports = midi_out.ports();
        let port = ports
            .get(device_index)
            .ok_or(MidiError::UnknownDevice(device_index))?;

        let device_name = midi_out
            .port_name(port)
            .unwrap_or_else(|_| format!("Device {}", device_index));

        log::info!("Connecting to MIDI device: {}", device_name);

        let connection = midi_out
            .connect(port, "patchdeck-midi-out")
            .map_err(|e| MidiError::Connect {
                name: device_name.clone(),
                message: e.to_string(),
            })?;

        *self.connection.lock() = Some(ActiveConnection {
            connection,
            device_name: device_name.clone(),
        });

        log::info!("Successfully connected to MIDI device: {}", device_name);
        Ok(device_name)
    }

    /// Disconnect from the current MIDI device
    pub fn disconnect(&self) {
        if let Some(active) = self.connection.lock().take() {
            log::info!("Disconnecting from MIDI device: {}", active.device_name);
            active.connection.close();
        }
    }

    /// Check if connected to a device
    pub fn is_connected(&self) -> bool {
        self.connection.lock().is_some()
    }

    /// Get the name of the connected device (if any)
    pub fn connected_device_name(&self) -> Option<String> {
        self.connection
            .lock()
            .as_ref()
            .map(|c| c.device_name.clone())
    }

    /// Select a patch on the instrument: Bank Select MSB (CC#0), Bank Select
    /// LSB (CC#32), then Program Change.
    ///
    /// Wire order matters - the instrument latches the bank only when the
    /// program change arrives. `channel` is 1-16.
    pub fn send_patch(&self, channel: u8, patch: &Patch) -> Result<(), MidiError> {
        if !(1..=16).contains(&channel) {
            return Err(MidiError::InvalidChannel(channel));
        }
        patch.validate()?;

        let mut guard = self.connection.lock();
        let active = guard.as_mut().ok_or(MidiError::NotConnected)?;

        // MIDI status bytes carry the 0-indexed channel
        let ch = channel - 1;
        let messages: [&[u8]; 3] = [
            &[0xB0 | ch, 0x00, patch.msb],
            &[0xB0 | ch, 0x20, patch.lsb],
            &[0xC0 | ch, patch.pc],
        ];
        for message in messages {
            active
                .connection
                .send(message)
                .map_err(|source| MidiError::Send {
                    name: active.device_name.clone(),
                    source,
                })?;
        }

        log::debug!(
            "Sent {:?} (MSB {} LSB {} PC {}) on channel {}",
            patch.name,
            patch.msb,
            patch.lsb,
            patch.pc,
            channel
        );
        Ok(())
    }
}

impl Default for MidiOutputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MidiOutputManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch() -> Patch {
        Patch {
            name: "Concert Grand".to_string(),
            category: "Piano".to_string(),
            pc: 0,
            lsb: 0,
            msb: 104,
        }
    }

    #[test]
    fn test_manager_creation() {
        let manager = MidiOutputManager::new();
        assert!(!manager.is_connected());
        assert!(manager.connected_device_name().is_none());
    }

    #[test]
    fn test_send_requires_connection() {
        let manager = MidiOutputManager::new();
        assert!(matches!(
            manager.send_patch(1, &patch()),
            Err(MidiError::NotConnected)
        ));
    }

    #[test]
    fn test_send_rejects_invalid_channel() {
        let manager = MidiOutputManager::new();
        for channel in [0u8, 17] {
            assert!(matches!(
                manager.send_patch(channel, &patch()),
                Err(MidiError::InvalidChannel(c)) if c == channel
            ));
        }
    }

    #[test]
    fn test_send_rejects_out_of_range_patch() {
        let manager = MidiOutputManager::new();
        let mut bad = patch();
        bad.msb = 200;
        assert!(matches!(
            manager.send_patch(1, &bad),
            Err(MidiError::Field(_))
        ));
    }
}
