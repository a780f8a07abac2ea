/// MIDI output using midir
use log::{debug, info};
use midir::{MidiOutput, MidiOutputConnection};

use crate::error::{Error, Result};
use crate::sequencer::Note;

const CLIENT_NAME: &str = "Music Box MIDI Output";
const VELOCITY: u8 = 100;

pub struct MidiOutputDevice {
    connection: Option<MidiOutputConnection>,
    reference_note: u8,
    sounding: Vec<u8>,
}

impl MidiOutputDevice {
    pub fn new(reference_note: u8) -> Self {
        Self {
            connection: None,
            reference_note,
            sounding: Vec::new(),
        }
    }

    pub fn available_ports() -> Vec<String> {
        if let Ok(midi_out) = MidiOutput::new(CLIENT_NAME) {
            midi_out
                .ports()
                .iter()
                .filter_map(|p| midi_out.port_name(p).ok())
                .collect()
        } else {
            vec![]
        }
    }

    /// Connect to the first port whose name contains `name`.
    pub fn connect_by_name(&mut self, name: &str) -> Result<()> {
        let index = Self::available_ports()
            .iter()
            .position(|port| port.contains(name))
            .ok_or_else(|| Error::Midi(format!("no port matching {name:?}")))?;
        self.connect(index)
    }

    pub fn connect(&mut self, port_index: usize) -> Result<()> {
        let midi_out = MidiOutput::new(CLIENT_NAME)
            .map_err(|e| Error::Midi(format!("Failed to create MIDI output: {}", e)))?;

        let ports = midi_out.ports();
        let port = ports
            .get(port_index)
            .ok_or_else(|| Error::Midi("Invalid port index".to_string()))?;
        let port_name = midi_out.port_name(port).unwrap_or_default();

        let connection = midi_out
            .connect(port, "musicbox")
            .map_err(|e| Error::Midi(format!("Failed to connect: {}", e)))?;

        info!("Connected MIDI output {port_name:?}");
        self.connection = Some(connection);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn note_number(&self, note: &Note) -> u8 {
        (self.reference_note as f32 + note.semitones).round().clamp(0.0, 127.0) as u8
    }

    pub fn send_note_on(&mut self, note: &Note) -> Result<()> {
        let number = self.note_number(note);
        if let Some(ref mut conn) = self.connection {
            conn.send(&[0x90, number, VELOCITY])
                .map_err(|e| Error::Midi(format!("Failed to send note on: {}", e)))?;
            self.sounding.push(number);
        }
        Ok(())
    }

    /// Release every note sent since the last call.
    pub fn release_all(&mut self) -> Result<()> {
        if let Some(ref mut conn) = self.connection {
            for number in self.sounding.drain(..) {
                conn.send(&[0x80, number, 0])
                    .map_err(|e| Error::Midi(format!("Failed to send note off: {}", e)))?;
            }
        }
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Err(err) = self.release_all() {
            debug!("{err}");
        }
        self.connection = None;
    }
}

impl Default for MidiOutputDevice {
    fn default() -> Self {
        Self::new(86)
    }
}

pub fn midi_note_name(note: u8) -> String {
    let note_names = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
    let octave = (note / 12) as i32 - 1;
    let note_index = (note % 12) as usize;
    format!("{}{}", note_names[note_index], octave)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::SEMITONES_DEFAULT;

    #[test]
    fn test_note_numbers() {
        let midi = MidiOutputDevice::default();
        assert_eq!(midi_note_name(midi.note_number(&Note { semitones: 0.0 })), "D6");
        let top = midi.note_number(&Note { semitones: SEMITONES_DEFAULT });
        assert_eq!(midi_note_name(top), "C#7");
        assert_eq!(midi.note_number(&Note { semitones: -200.0 }), 0);
        assert_eq!(midi.note_number(&Note { semitones: 200.0 }), 127);
    }

    #[test]
    fn test_unconnected_is_noop() {
        let mut midi = MidiOutputDevice::new(60);
        assert!(!midi.is_connected());
        midi.send_note_on(&Note { semitones: 1.0 }).unwrap();
        midi.release_all().unwrap();
        midi.disconnect();
    }
}
