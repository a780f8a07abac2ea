//! Music Box - a step sequencer library
//!
//! This library provides the core components for a grid step sequencer:
//! - Song data with a fixed number of ticks and pitch rows
//! - Pointer to grid mapping with NDC draw geometry
//! - A frame-driven playback clock
//! - An edit controller toggling notes and driving the transport
//! - Audio output for the music box tone and MIDI output for production use

pub mod app;
pub mod audio;
pub mod config;
pub mod draw;
pub mod error;
pub mod midi;
pub mod sequencer;
pub mod vec;

// Re-export commonly used types
pub use app::{run_frame, App, Effect, Event, Host, WindowState};
pub use audio::AudioOutput;
pub use config::Config;
pub use error::{Error, Result};
pub use midi::{midi_note_name, MidiOutputDevice};
pub use sequencer::grid::{calc_bands, BandInfo};
pub use sequencer::playback::{PlaybackClock, PlaybackEvent, PlaybackState};
pub use sequencer::{Note, Song, Tick};
pub use vec::Vec2f;
