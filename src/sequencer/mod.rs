/// Core sequencer logic - song data and the per-frame pieces acting on it
use std::fmt;

use crate::error::{Error, Result};

pub mod edit;
pub mod grid;
pub mod playback;

pub use edit::DrawMode;

pub const MAX_TICKS: usize = 48;
pub const MAX_PITCHES: usize = 25;

// Which means 12 ticks/second at 60 frames/second.
pub const FRAMES_PER_TICK: usize = 5;
pub const TICKS_PER_SECOND_DEFAULT: f32 = 12.0;

// Semitones of the top pitch row above the D6 sample.
pub const SEMITONES_DEFAULT: f32 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub semitones: f32,
}

impl Note {
    /// Note for a pitch row, counted down from the top row.
    pub fn from_pitch(pitch: usize) -> Self {
        Self {
            semitones: SEMITONES_DEFAULT - pitch as f32,
        }
    }
}

/// Notes sounding at one step, one bit per pitch row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tick {
    pitches: u32,
}

impl Tick {
    pub fn contains(&self, pitch: usize) -> bool {
        assert!(pitch < MAX_PITCHES, "pitch {pitch} out of range");
        self.pitches & (1 << pitch) != 0
    }

    pub fn insert(&mut self, pitch: usize) {
        assert!(pitch < MAX_PITCHES, "pitch {pitch} out of range");
        self.pitches |= 1 << pitch;
    }

    pub fn remove(&mut self, pitch: usize) {
        assert!(pitch < MAX_PITCHES, "pitch {pitch} out of range");
        self.pitches &= !(1 << pitch);
    }

    pub fn is_empty(&self) -> bool {
        self.pitches == 0
    }

    pub fn len(&self) -> usize {
        self.pitches.count_ones() as usize
    }

    pub fn pitches(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MAX_PITCHES).filter(|&pitch| self.contains(pitch))
    }

    /// Notes in ascending pitch row order.
    pub fn notes(&self) -> impl Iterator<Item = Note> + '_ {
        self.pitches().map(Note::from_pitch)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    ticks_per_second: f32,
    ticks: [Tick; MAX_TICKS],
    len: usize,
}

impl Song {
    pub fn new(ticks_per_second: f32, len: usize) -> Result<Self> {
        if len == 0 || len > MAX_TICKS {
            return Err(Error::SongLength(len));
        }
        Ok(Self {
            ticks_per_second,
            ticks: [Tick::default(); MAX_TICKS],
            len,
        })
    }

    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.ticks().iter().all(Tick::is_empty)
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks[..self.len]
    }

    pub fn tick(&self, tick: usize) -> &Tick {
        &self.ticks()[tick]
    }

    /// True if `(tick, pitch)` addresses a cell of this song.
    pub fn in_bounds(&self, tick: usize, pitch: usize) -> bool {
        tick < self.len && pitch < MAX_PITCHES
    }

    pub fn contains(&self, tick: usize, pitch: usize) -> bool {
        self.tick(tick).contains(pitch)
    }

    pub fn insert(&mut self, tick: usize, pitch: usize) {
        self.ticks[..self.len][tick].insert(pitch);
    }

    pub fn remove(&mut self, tick: usize, pitch: usize) {
        self.ticks[..self.len][tick].remove(pitch);
    }

    /// Flip the note at `(tick, pitch)`, reporting which way it went.
    pub fn toggle(&mut self, tick: usize, pitch: usize) -> DrawMode {
        if self.contains(tick, pitch) {
            self.remove(tick, pitch);
            DrawMode::Remove
        } else {
            self.insert(tick, pitch);
            DrawMode::Add
        }
    }

    pub fn clear(&mut self) {
        for tick in &mut self.ticks {
            *tick = Tick::default();
        }
    }

    pub fn note_count(&self) -> usize {
        self.ticks().iter().map(Tick::len).sum()
    }
}

impl Default for Song {
    fn default() -> Self {
        Self {
            ticks_per_second: TICKS_PER_SECOND_DEFAULT,
            ticks: [Tick::default(); MAX_TICKS],
            len: MAX_TICKS,
        }
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tick in self.ticks() {
            writeln!(f, "---")?;
            for note in tick.notes() {
                writeln!(f, "semitones: {}", note.semitones)?;
            }
        }
        writeln!(f, "---")
    }
}
