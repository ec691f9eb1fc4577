//! Input mapping.
//!
//! One fixed table from frontend joypad buttons to device buttons, asserted
//! in full on every run. There is no debouncing and no edge detection here:
//! each entry is independent, the engine receives the current level of every
//! button every run, and iteration order is irrelevant.

use libretro_backend::JoypadButton;

use crate::driver::InputSource;
use crate::engine::{DeviceButton, Engine};

/// Frontend button → device button, fixed at build time.
pub const BUTTON_MAP: [(JoypadButton, DeviceButton); 16] = [
    (JoypadButton::Up, DeviceButton::Up),
    (JoypadButton::Down, DeviceButton::Down),
    (JoypadButton::Left, DeviceButton::Left),
    (JoypadButton::Right, DeviceButton::Right),
    (JoypadButton::A, DeviceButton::A),
    (JoypadButton::B, DeviceButton::B),
    (JoypadButton::X, DeviceButton::X),
    (JoypadButton::Y, DeviceButton::Y),
    (JoypadButton::L1, DeviceButton::L1),
    (JoypadButton::R1, DeviceButton::R1),
    (JoypadButton::L2, DeviceButton::L2),
    (JoypadButton::R2, DeviceButton::R2),
    (JoypadButton::L3, DeviceButton::L3),
    (JoypadButton::R3, DeviceButton::R3),
    (JoypadButton::Select, DeviceButton::Select),
    (JoypadButton::Start, DeviceButton::Start),
];

/// Re-assert the full button set from the host's current digital state.
pub fn assert_buttons<E: Engine>(input: &mut impl InputSource, engine: &mut E) {
    for (host, device) in BUTTON_MAP {
        engine.set_button(device, input.pressed(host));
    }
}
