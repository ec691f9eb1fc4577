//! Emulation-engine boundary.
//!
//! The simulator itself (timing model, artwork, game logic) lives in a
//! separate crate; this module pins down the narrow surface the frame driver
//! consumes from it:
//!
//! - [`Engine::boot`] builds the engine and its [`DeviceState`] from a loaded
//!   ROM and the startup timestamp.
//! - [`Engine::tick`] advances the device by wall-clock time; it is the only
//!   place the screen gets repainted or a sound gets started/stopped.
//! - [`Engine::set_button`] re-asserts one button level.
//!
//! Engines interpret elapsed time themselves; the driver just forwards a
//! monotonic microsecond timestamp once per run, unmodified.

use crate::loader::Rom;
use crate::state::DeviceState;

/// Buttons of the emulated device.
///
/// Simulated games bind whatever subset they need; unbound buttons are
/// simply ignored by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeviceButton {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
    L1,
    R1,
    L2,
    R2,
    L3,
    R3,
    Select,
    Start,
}

/// The handheld-simulator engine, as seen by the frame driver.
///
/// All methods are total: once `boot` succeeds there are no per-run failure
/// paths, and every call completes in bounded time.
pub trait Engine: Sized {
    /// Build an engine instance and its device state from a ROM.
    ///
    /// `now_micros` is the session's startup timestamp; subsequent `tick`
    /// timestamps come from the same monotonic clock. A `boot` failure is
    /// fatal: the frontend rejects the session and never retries.
    fn boot(rom: &Rom, now_micros: i64) -> anyhow::Result<(Self, DeviceState)>;

    /// Advance the device to `now_micros`.
    ///
    /// May repaint `device.screen` (raising its `updated` flag for this tick,
    /// clearing it otherwise) and may start or stop sounds through
    /// `device.playback`.
    fn tick(&mut self, device: &mut DeviceState, now_micros: i64);

    /// Assert the current level of one button.
    ///
    /// Called for every device button on every run, whether or not the level
    /// changed; engines must treat this as a level set, not an edge.
    fn set_button(&mut self, button: DeviceButton, pressed: bool);

    /// Return the device to its power-on state, keeping the loaded ROM.
    fn reset(&mut self, device: &mut DeviceState);
}
