//! gw-core: a libretro core adapter for Game & Watch style handheld
//! simulators.
//!
//! The emulated device is self-paced: it advances on its own wall-clock and
//! keeps an independent, variable-length mono sound running. The libretro
//! frontend is pull-based: it calls the core exactly once per display
//! refresh and consumes one video frame plus one fixed-size stereo audio
//! block per call. This crate is the synchronization layer between the two:
//!
//! - `input`: frontend joypad → device button re-assertion, one full set
//!   per run.
//! - `driver`: the per-run sequence (poll → buttons → tick → video → audio)
//!   over small injected host capabilities.
//! - `av`: the mono-clip-to-stereo-block renderer and the conditional video
//!   presenter.
//! - `state`: the single device-state container threaded through each run.
//! - `engine` / `loader`: the trait boundaries of the external simulator
//!   engine and the opaque `.mgw` ROM container.
//!
//! The simulator engine lives in its own crate. It implements
//! [`engine::Engine`] and instantiates the core on a concrete alias:
//!
//! ```ignore
//! type Core = gw_core::RetroCore<MyEngine>;
//! libretro_backend::libretro_core!(Core);
//! ```

pub mod av;
pub mod driver;
pub mod engine;
pub mod input;
pub mod loader;
pub mod state;

use libretro_backend::{
    AudioVideoInfo, Core, CoreInfo, GameData, JoypadButton, LoadGameResult, PixelFormat,
    RuntimeHandle,
};
use log::{debug, error, info};

use crate::av::video::Frame;
use crate::av::{FRAME_RATE, SAMPLE_RATE};
use crate::driver::{AudioSink, FrameDriver, InputSource, MonotonicClock, TimeSource, VideoSink};
use crate::engine::Engine;
use crate::loader::Rom;

/// The libretro core: an [`Engine`] behind the frontend's callback surface.
pub struct RetroCore<E: Engine> {
    session: Option<FrameDriver<E, MonotonicClock>>,
    /// Bytes of the last uploaded frame. libretro-backend wants a frame on
    /// every run, so a "no update" presentation re-uploads these unchanged.
    last_frame: Vec<u8>,
    game_data: Option<GameData>,
}

impl<E: Engine> Default for RetroCore<E> {
    fn default() -> Self {
        Self {
            session: None,
            last_frame: Vec::new(),
            game_data: None,
        }
    }
}

impl<E: Engine> RetroCore<E> {
    /// Load the ROM, boot the engine and set up the session state.
    ///
    /// Any failure here is fatal for the session: the frontend gets a failed
    /// load and there is no partial-success state to clean up.
    fn start_session(&mut self, data: &[u8]) -> anyhow::Result<()> {
        let rom = Rom::load(data)?;
        info!("loaded ROM image, {} bytes", rom.len());

        let mut clock = MonotonicClock::new();
        let (engine, device) = E::boot(&rom, clock.now_micros())?;

        let screen = &device.screen;
        info!(
            "device reports {}x{} RGB565, {} Hz audio at {} fps",
            screen.width(),
            screen.height(),
            SAMPLE_RATE,
            FRAME_RATE
        );

        // Geometry-sized black frame until the engine's first repaint.
        self.last_frame = vec![0; screen.pixels().len() * size_of::<u16>()];
        self.session = Some(FrameDriver::new(engine, device, clock));
        Ok(())
    }
}

impl<E: Engine> Core for RetroCore<E> {
    fn info() -> CoreInfo {
        CoreInfo::new("Game & Watch", env!("CARGO_PKG_VERSION")).supports_roms_with_extension("mgw")
    }

    // Save states and memory maps are deliberately unsupported: the device
    // has no battery-backed storage, and the engine cannot snapshot itself.
    // The frontend sees zero-size memory regions and failing serialization.
    fn save_memory(&mut self) -> Option<&mut [u8]> {
        None
    }

    fn rtc_memory(&mut self) -> Option<&mut [u8]> {
        None
    }

    fn system_memory(&mut self) -> Option<&mut [u8]> {
        None
    }

    fn video_memory(&mut self) -> Option<&mut [u8]> {
        None
    }

    fn on_load_game(&mut self, game_data: GameData) -> LoadGameResult {
        let result = match game_data.data() {
            Some(data) => self.start_session(data),
            None => Err(anyhow::anyhow!("frontend provided no ROM data")),
        };

        if let Err(err) = result {
            error!("cannot start core: {err:#}");
            return LoadGameResult::Failed(game_data);
        }

        let Some(session) = self.session.as_ref() else {
            return LoadGameResult::Failed(game_data);
        };

        let screen = session.surface();
        let av_info = AudioVideoInfo::new()
            .video(
                screen.width(),
                screen.height(),
                FRAME_RATE as f64,
                PixelFormat::RGB565,
            )
            .audio(SAMPLE_RATE as f64);

        self.game_data = Some(game_data);
        LoadGameResult::Success(av_info)
    }

    fn on_unload_game(&mut self) -> GameData {
        debug!("unloading game");
        self.session = None;
        self.last_frame = Vec::new();
        self.game_data.take().unwrap()
    }

    fn on_run(&mut self, handle: &mut RuntimeHandle) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let mut host = RetroHost {
            handle,
            last_frame: &mut self.last_frame,
        };
        session.run_frame(&mut host);
    }

    fn on_reset(&mut self) {
        debug!("resetting device");
        if let Some(session) = self.session.as_mut() {
            session.reset();
        }
    }
}

/// Host capabilities for one run, backed by the frontend's runtime handle.
struct RetroHost<'a> {
    handle: &'a mut RuntimeHandle,
    last_frame: &'a mut Vec<u8>,
}

impl InputSource for RetroHost<'_> {
    fn poll(&mut self) {
        // libretro-backend issues the frontend's input poll before
        // dispatching the run; the state is already latched here.
    }

    fn pressed(&mut self, button: JoypadButton) -> bool {
        self.handle.is_joypad_button_pressed(0, button)
    }
}

impl VideoSink for RetroHost<'_> {
    fn video_frame(&mut self, frame: Option<Frame<'_>>) {
        if let Some(frame) = frame {
            self.last_frame.clear();
            self.last_frame
                .extend_from_slice(bytemuck::cast_slice(frame.pixels()));
        }
        self.handle.upload_video_frame(self.last_frame);
    }
}

impl AudioSink for RetroHost<'_> {
    fn audio_frame(&mut self, samples: &[i16]) {
        self.handle.upload_audio_frame(samples);
    }
}
