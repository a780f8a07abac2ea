/// Edit controller - turns pointer presses into song edits and transport actions
use log::{debug, info};

use super::grid::BandInfo;
use super::playback::PlaybackClock;
use super::Song;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawMode {
    #[default]
    Start,
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Toggle {
        tick: usize,
        pitch: usize,
        mode: DrawMode,
    },
    Rewind,
    TogglePlay,
}

impl EditAction {
    pub fn apply(self, song: &mut Song, clock: &mut PlaybackClock) {
        match self {
            EditAction::Toggle { tick, pitch, mode } => {
                match mode {
                    DrawMode::Add => song.insert(tick, pitch),
                    DrawMode::Remove => song.remove(tick, pitch),
                    DrawMode::Start => {}
                }
                debug!("{mode:?} note at tick {tick}, pitch {pitch}");
            }
            EditAction::Rewind => {
                clock.rewind();
                info!("Rewind");
            }
            EditAction::TogglePlay => {
                clock.toggle_play();
                info!("{}", if clock.is_playing() { "Play" } else { "Pause" });
            }
        }
    }
}

/// Detects the rising edge of the pointer button across frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct PressEdge {
    was_pressed: bool,
}

impl PressEdge {
    /// True only on the first frame of a press.
    pub fn update(&mut self, pressed: bool) -> bool {
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        edge
    }
}

#[derive(Debug, Default)]
pub struct EditController {
    press: PressEdge,
    draw_mode: DrawMode,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Decide what this frame's pointer state does, without mutating the song.
    pub fn update(&mut self, bands: &BandInfo, pressed: bool, song: &Song) -> Option<EditAction> {
        if !pressed {
            self.draw_mode = DrawMode::Start;
        }
        if !self.press.update(pressed) {
            return None;
        }

        if let Some((tick, pitch)) = bands.cell() {
            // The mapper allows one cell past the song on each axis.
            if !song.in_bounds(tick, pitch) {
                return None;
            }
            self.draw_mode = if song.contains(tick, pitch) {
                DrawMode::Remove
            } else {
                DrawMode::Add
            };
            Some(EditAction::Toggle {
                tick,
                pitch,
                mode: self.draw_mode,
            })
        } else if bands.over_back_button() {
            Some(EditAction::Rewind)
        } else if bands.over_play_button() {
            Some(EditAction::TogglePlay)
        } else {
            None
        }
    }
}
