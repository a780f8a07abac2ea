/// User settings loaded from `musicbox.toml`
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sequencer::playback;
use crate::sequencer::Song;

pub const CONFIG_PATH: &str = "musicbox.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host frames per second.
    pub frame_rate: f32,
    /// Overrides the tempo-derived frame count when set.
    pub frames_per_tick: Option<usize>,
    pub volume: f32,
    /// Substring of the MIDI output port to connect at startup.
    pub midi_port: Option<String>,
    /// MIDI note of a note with zero semitones (D6).
    pub midi_reference_note: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            frames_per_tick: None,
            volume: 0.2,
            midi_port: None,
            midi_reference_note: 86,
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let s = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&s)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let s = toml::to_string(self)?;
        std::fs::write(path, s)?;
        Ok(())
    }

    pub fn frames_per_tick(&self, song: &Song) -> usize {
        match self.frames_per_tick {
            Some(frames) => frames.max(1),
            None => playback::frames_per_tick(self.frame_rate, song.ticks_per_second()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sequencer::FRAMES_PER_TICK;

    #[test]
    fn test_defaults_match_reference_rate() {
        let config = Config::default();
        assert_eq!(config.frames_per_tick(&Song::default()), FRAMES_PER_TICK);
    }

    #[test]
    fn test_override_and_tempo() {
        let song = Song::new(6.0, 16).unwrap();
        let mut config = Config::default();
        assert_eq!(config.frames_per_tick(&song), 10);
        config.frames_per_tick = Some(0);
        assert_eq!(config.frames_per_tick(&song), 1);
        config.frames_per_tick = Some(7);
        assert_eq!(config.frames_per_tick(&song), 7);
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str("volume = 0.5\nmidi_port = \"IAC\"\n").unwrap();
        assert_eq!(config.volume, 0.5);
        assert_eq!(config.midi_port.as_deref(), Some("IAC"));
        assert_eq!(config.frame_rate, 60.0);
        assert_eq!(config.frames_per_tick, None);
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load("does/not/exist/musicbox.toml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("musicbox-test-{}.toml", std::process::id()));
        let config = Config {
            frames_per_tick: Some(3),
            midi_reference_note: 60,
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);

        std::fs::write(&path, "volume = \"loud\"").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::ConfigParse(_))));
        std::fs::remove_file(&path).unwrap();
    }
}
