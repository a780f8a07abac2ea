/// Audio output using cpal - a small bank of decaying music-box voices
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{info, warn};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::sequencer::Note;

// Pitch of a note with zero semitones (D6).
const REFERENCE_FREQUENCY: f32 = 1174.66;
const DECAY_SECONDS: f32 = 0.6;
const MAX_VOICES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Voice {
    phase: f32,
    frequency: f32,
    amplitude: f32,
}

#[derive(Debug, Default)]
struct Voices {
    voices: Vec<Voice>,
}

impl Voices {
    fn trigger(&mut self, frequency: f32) {
        if self.voices.len() >= MAX_VOICES {
            self.voices.remove(0);
        }
        self.voices.push(Voice {
            phase: 0.0,
            frequency,
            amplitude: 1.0,
        });
    }

    fn next_sample(&mut self, sample_rate: f32, volume: f32) -> f32 {
        let decay = (-1.0 / (DECAY_SECONDS * sample_rate)).exp();
        let mut sample = 0.0;
        for voice in &mut self.voices {
            sample += (voice.phase * 2.0 * std::f32::consts::PI).sin() * voice.amplitude;
            voice.phase = (voice.phase + voice.frequency / sample_rate).fract();
            voice.amplitude *= decay;
        }
        self.voices.retain(|voice| voice.amplitude > 1e-3);
        sample * volume
    }
}

pub struct AudioOutput {
    _stream: Option<cpal::Stream>,
    voices: Arc<Mutex<Voices>>,
}

impl AudioOutput {
    pub fn new(volume: f32) -> Result<Self> {
        let voices = Arc::new(Mutex::new(Voices::default()));
        let stream = Self::setup_audio_stream(Arc::clone(&voices), volume)?;
        Ok(Self {
            _stream: Some(stream),
            voices,
        })
    }

    /// Output that accepts notes but plays nothing.
    pub fn silent() -> Self {
        Self {
            _stream: None,
            voices: Arc::new(Mutex::new(Voices::default())),
        }
    }

    pub fn is_silent(&self) -> bool {
        self._stream.is_none()
    }

    fn setup_audio_stream(voices: Arc<Mutex<Voices>>, volume: f32) -> Result<cpal::Stream> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device".into()))?;
        let config = device
            .default_output_config()
            .map_err(|e| Error::Audio(e.to_string()))?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let Ok(mut voices) = voices.lock() else {
                        return;
                    };
                    for frame in data.chunks_mut(channels) {
                        let sample = voices.next_sample(sample_rate, volume);
                        frame.fill(sample);
                    }
                },
                |err| warn!("Audio stream error: {}", err),
                None,
            ),
            format => return Err(Error::Audio(format!("unsupported sample format {format:?}"))),
        }
        .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        info!("Audio output at {} Hz, {} channels", sample_rate, channels);
        Ok(stream)
    }

    pub fn trigger_note(&mut self, note: &Note) {
        if let Ok(mut voices) = self.voices.lock() {
            voices.trigger(semitones_to_frequency(note.semitones));
        }
    }

    pub fn stop_all(&mut self) {
        if let Ok(mut voices) = self.voices.lock() {
            voices.voices.clear();
        }
    }
}

impl Default for AudioOutput {
    fn default() -> Self {
        Self::new(0.2).unwrap_or_else(|err| {
            warn!("{err}, continuing without sound");
            Self::silent()
        })
    }
}

pub fn semitones_to_frequency(semitones: f32) -> f32 {
    REFERENCE_FREQUENCY * 2.0_f32.powf(semitones / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semitones_to_frequency() {
        assert!((semitones_to_frequency(0.0) - REFERENCE_FREQUENCY).abs() < 1e-3);
        assert!((semitones_to_frequency(12.0) - 2.0 * REFERENCE_FREQUENCY).abs() < 1e-2);
        // Ten semitones up from D6 is C7.
        assert!((semitones_to_frequency(10.0) - 2093.0).abs() < 1.0);
    }

    #[test]
    fn test_voices_decay_and_drop() {
        let mut voices = Voices::default();
        voices.trigger(440.0);
        let first = voices.next_sample(48000.0, 1.0);
        assert_eq!(first, 0.0);
        assert!(voices.next_sample(48000.0, 1.0) > 0.0);
        for _ in 0..48000 * 5 {
            voices.next_sample(48000.0, 1.0);
        }
        assert!(voices.voices.is_empty());
    }

    #[test]
    fn test_voice_limit() {
        let mut voices = Voices::default();
        for i in 0..MAX_VOICES + 5 {
            voices.trigger(100.0 + i as f32);
        }
        assert_eq!(voices.voices.len(), MAX_VOICES);
        assert_eq!(voices.voices[0].frequency, 105.0);
    }

    #[test]
    fn test_silent_output_accepts_notes() {
        let mut output = AudioOutput::silent();
        assert!(output.is_silent());
        output.trigger_note(&Note { semitones: 3.0 });
        output.stop_all();
    }
}
