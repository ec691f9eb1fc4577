//! Per-run frame driver.
//!
//! The frontend calls the core exactly once per display refresh; the device
//! advances on its own internal clock. [`FrameDriver::run_frame`] performs
//! the fixed synchronization sequence between the two:
//!
//! 1. poll host inputs and re-assert the full button set,
//! 2. tick the engine with the current monotonic timestamp,
//! 3. present the video frame (or "no update"),
//! 4. render and deliver one stereo audio block.
//!
//! Audio is rendered after the tick on purpose: a sound the engine starts
//! during this tick is audible in this same run, not one run later.
//!
//! The host side is injected as small capability traits rather than held as
//! ambient callbacks, so the driver runs unchanged against the libretro
//! binding in `lib.rs` or against recording fakes in tests.

use std::time::Instant;

use libretro_backend::JoypadButton;

use crate::av::audio::{self, StereoBuffer};
use crate::av::video::{self, Frame};
use crate::av::FRAMES_PER_RUN;
use crate::engine::Engine;
use crate::input;
use crate::state::{DeviceState, FrameSurface};

/// Digital input state, queried per run.
pub trait InputSource {
    /// Latch the current input state for this run.
    fn poll(&mut self);

    /// Current level of one frontend button.
    fn pressed(&mut self, button: JoypadButton) -> bool;
}

/// Consumer of the per-run video frame.
pub trait VideoSink {
    /// `None` means the screen did not change; show the previous frame again.
    fn video_frame(&mut self, frame: Option<Frame<'_>>);
}

/// Consumer of the per-run stereo audio block.
pub trait AudioSink {
    /// `samples` is one full block of interleaved (left, right) `i16` pairs.
    fn audio_frame(&mut self, samples: &[i16]);
}

/// Monotonic microsecond clock driving the engine's sense of time.
///
/// The engine cannot run without one, so a session acquires its clock at
/// construction; per-run acquisition cannot fail.
pub trait TimeSource {
    fn now_micros(&mut self) -> i64;
}

/// Process-monotonic [`TimeSource`] counting from its creation.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn now_micros(&mut self) -> i64 {
        self.origin.elapsed().as_micros() as i64
    }
}

/// One loaded session: the engine, its device state, the session clock and
/// the reusable audio output block.
pub struct FrameDriver<E: Engine, C: TimeSource> {
    engine: E,
    device: DeviceState,
    clock: C,
    out: StereoBuffer,
}

impl<E: Engine, C: TimeSource> FrameDriver<E, C> {
    /// Wrap a booted engine. `clock` must be the same time source the boot
    /// timestamp came from.
    pub fn new(engine: E, device: DeviceState, clock: C) -> Self {
        Self {
            engine,
            device,
            clock,
            out: StereoBuffer::new(FRAMES_PER_RUN),
        }
    }

    /// The device screen, e.g. for geometry negotiation at load time.
    pub fn surface(&self) -> &FrameSurface {
        &self.device.screen
    }

    /// Produce one frame of video and one block of audio.
    pub fn run_frame<H>(&mut self, host: &mut H)
    where
        H: InputSource + VideoSink + AudioSink,
    {
        host.poll();
        input::assert_buttons(host, &mut self.engine);

        self.engine.tick(&mut self.device, self.clock.now_micros());

        host.video_frame(video::present(&self.device.screen));

        audio::render(&mut self.device.playback, &mut self.out);
        host.audio_frame(self.out.samples());
    }

    /// Power-cycle the device, keeping the loaded ROM.
    pub fn reset(&mut self) {
        self.engine.reset(&mut self.device);
    }
}
