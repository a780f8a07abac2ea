#[cfg(feature = "gui")]
use eframe::egui;

#[cfg(feature = "gui")]
use std::time::{Duration, Instant};

#[cfg(feature = "gui")]
use log::{debug, info, warn};

#[cfg(feature = "gui")]
use musicbox::{
    config::CONFIG_PATH,
    draw::{self, DrawInstance, Triangle},
    run_frame, App, AudioOutput, BandInfo, Config, Event, Host, MidiOutputDevice, Note,
    PlaybackState, Song, Vec2f, WindowState,
};

#[cfg(feature = "gui")]
fn main() -> Result<(), eframe::Error> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = Config::load(CONFIG_PATH).unwrap_or_else(|err| {
        warn!("{err}, using default settings");
        Config::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_title("Music Box"),
        ..Default::default()
    };

    eframe::run_native(
        "Music Box",
        options,
        Box::new(|_cc| Ok(Box::new(MusicBoxApp::new(config)))),
    )
}

#[cfg(not(feature = "gui"))]
fn main() {
    eprintln!("This binary requires the 'gui' feature to be enabled");
    std::process::exit(1);
}

#[cfg(feature = "gui")]
#[derive(Default)]
struct DrawState {
    instances: Vec<DrawInstance>,
    triangles: Vec<Triangle>,
    window_size: Vec2f,
}

/// Host bindings for one core frame.
#[cfg(feature = "gui")]
struct FrameHost<'a> {
    window: WindowState,
    audio: &'a mut AudioOutput,
    midi: &'a mut MidiOutputDevice,
    draw: &'a mut DrawState,
}

#[cfg(feature = "gui")]
impl Host for FrameHost<'_> {
    fn window_state(&self) -> WindowState {
        self.window
    }

    fn trigger_sound(&mut self, note: &Note) {
        self.audio.trigger_note(note);
        if let Err(err) = self.midi.send_note_on(note) {
            warn!("{err}");
        }
    }

    fn tick_advanced(&mut self, _tick: usize) {
        if let Err(err) = self.midi.release_all() {
            warn!("{err}");
        }
    }

    fn advance_draw_state(&mut self, bands: &BandInfo, song: &Song, play: &PlaybackState) {
        self.draw.instances = draw::build_instances(bands, song, play);
        self.draw.triangles = draw::button_triangles(bands, play.playing).to_vec();
        self.draw.window_size = bands.window_size;
    }
}

#[cfg(feature = "gui")]
struct MusicBoxApp {
    app: App,
    audio_output: AudioOutput,
    midi_output: MidiOutputDevice,
    draw_state: DrawState,
    frame_duration: Duration,
    last_update: Instant,
    pending: Duration,

    // UI state
    available_midi_ports: Vec<String>,
    selected_port: Option<usize>,
}

#[cfg(feature = "gui")]
impl MusicBoxApp {
    fn new(config: Config) -> Self {
        let song = Song::default();
        debug!("Song:\n{song}");

        let mut app = App::new(song, &config);
        let audio_output = AudioOutput::new(config.volume).unwrap_or_else(|err| {
            warn!("{err}, continuing without sound");
            AudioOutput::silent()
        });
        app.handle_event(Event::SoundsLoaded);

        let available_midi_ports = MidiOutputDevice::available_ports();
        let mut midi_output = MidiOutputDevice::new(config.midi_reference_note);
        let mut selected_port = None;
        if let Some(name) = &config.midi_port {
            match midi_output.connect_by_name(name) {
                Ok(()) => {
                    selected_port = available_midi_ports.iter().position(|p| p.contains(name.as_str()))
                }
                Err(err) => warn!("{err}"),
            }
        }

        Self {
            app,
            audio_output,
            midi_output,
            draw_state: DrawState::default(),
            frame_duration: Duration::from_secs_f32(1.0 / config.frame_rate.max(1.0)),
            last_update: Instant::now(),
            pending: Duration::ZERO,
            available_midi_ports,
            selected_port,
        }
    }

    /// Run as many fixed-rate core frames as real time has covered.
    fn step_frames(&mut self, window: WindowState) {
        let now = Instant::now();
        self.pending += now - self.last_update;
        self.last_update = now;
        // Don't try to catch up after a long stall.
        self.pending = self.pending.min(self.frame_duration * 10);

        while self.pending >= self.frame_duration {
            self.pending -= self.frame_duration;
            let mut host = FrameHost {
                window,
                audio: &mut self.audio_output,
                midi: &mut self.midi_output,
                draw: &mut self.draw_state,
            };
            run_frame(&mut self.app, &mut host);
        }
    }

    fn paint(&self, painter: &egui::Painter, origin: egui::Pos2) {
        let window_size = self.draw_state.window_size;
        let to_pos = |ndc: Vec2f| {
            let p = draw::ndc_to_window(ndc, window_size);
            origin + egui::vec2(p.x, p.y)
        };
        for instance in &self.draw_state.instances {
            let (min, max) = instance.corners(window_size);
            let rect = egui::Rect::from_min_max(
                origin + egui::vec2(min.x, min.y),
                origin + egui::vec2(max.x, max.y),
            );
            painter.rect_filled(rect, 2.0, light_color(instance.light));
        }
        for triangle in &self.draw_state.triangles {
            painter.add(egui::Shape::convex_polygon(
                triangle.points.iter().map(|&p| to_pos(p)).collect(),
                light_color(triangle.light),
                egui::Stroke::NONE,
            ));
        }
    }

    fn midi_panel(&mut self, ui: &mut egui::Ui) {
        let mut selected_port_changed = None;
        ui.horizontal(|ui| {
            ui.label("MIDI Output:");
            if self.available_midi_ports.is_empty() {
                ui.label("No MIDI ports available");
            } else {
                egui::ComboBox::from_label("")
                    .selected_text(
                        self.selected_port
                            .map(|i| self.available_midi_ports[i].as_str())
                            .unwrap_or("Select port..."),
                    )
                    .show_ui(ui, |ui| {
                        for (i, port_name) in self.available_midi_ports.iter().enumerate() {
                            if ui
                                .selectable_label(self.selected_port == Some(i), port_name)
                                .clicked()
                            {
                                selected_port_changed = Some(i);
                            }
                        }
                    });
            }
            ui.separator();
            ui.label(format!(
                "Tick {} / {}",
                self.app.clock().tick() + 1,
                self.app.song().len()
            ));
            ui.label(format!("{} notes", self.app.song().note_count()));
        });

        if let Some(port_idx) = selected_port_changed {
            self.midi_output.disconnect();
            match self.midi_output.connect(port_idx) {
                Ok(()) => self.selected_port = Some(port_idx),
                Err(err) => warn!("{err}"),
            }
        }
    }
}

#[cfg(feature = "gui")]
fn light_color(light: f32) -> egui::Color32 {
    let v = (light.clamp(0.0, 1.0) * 255.0) as u8;
    egui::Color32::from_rgb(v, v, (v as f32 * 0.8) as u8)
}

#[cfg(feature = "gui")]
impl eframe::App for MusicBoxApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        egui::TopBottomPanel::bottom("midi").show(ctx, |ui| self.midi_panel(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let (hover, press) =
                    ctx.input(|i| (i.pointer.hover_pos(), i.pointer.primary_down()));
                let pointer = hover
                    .map(|pos| Vec2f::new(pos.x - rect.min.x, pos.y - rect.min.y))
                    .unwrap_or(Vec2f::splat(-1.0));
                let window = WindowState {
                    size: Vec2f::new(rect.width().max(1.0), rect.height().max(1.0)),
                    pointer,
                    // Presses on the MIDI panel belong to egui.
                    press: press && hover.is_some_and(|pos| rect.contains(pos)),
                };

                let was_playing = self.app.clock().is_playing();
                self.step_frames(window);
                if was_playing && !self.app.clock().is_playing() {
                    self.audio_output.stop_all();
                    if let Err(err) = self.midi_output.release_all() {
                        warn!("{err}");
                    }
                    info!("Stopped at tick {}", self.app.clock().tick());
                }

                self.paint(ui.painter(), rect.min);
            });
    }
}
