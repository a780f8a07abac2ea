use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("song length {0} out of range (expected 1..={})", crate::sequencer::MAX_TICKS)]
    SongLength(usize),
    #[error("Audio error: {0}")]
    Audio(String),
    #[error("MIDI error: {0}")]
    Midi(String),
    #[error("Config IO error: {0}")]
    ConfigIo(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
