//! Conditional video presentation.
//!
//! The engine repaints the surface only when the simulated display actually
//! changed; on every other tick the frontend is told to keep showing its
//! previous frame. [`present`] is a pure read of the surface — it mutates
//! nothing and borrows the live pixels.

use crate::state::FrameSurface;

/// One frame of RGB565 video, borrowed from the device surface.
#[derive(Copy, Clone)]
pub struct Frame<'a> {
    pixels: &'a [u16],
    width: u32,
    height: u32,
}

impl<'a> Frame<'a> {
    pub fn pixels(&self) -> &'a [u16] {
        self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row. Rows are packed, so this is just `width * 2`.
    pub fn pitch_bytes(&self) -> usize {
        self.width as usize * size_of::<u16>()
    }
}

/// Borrow the surface as a presentable frame, or `None` when the last tick
/// left the screen untouched.
pub fn present(surface: &FrameSurface) -> Option<Frame<'_>> {
    surface.updated().then(|| Frame {
        pixels: surface.pixels(),
        width: surface.width(),
        height: surface.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_surface_presents_nothing() {
        let surface = FrameSurface::new(8, 4);
        assert!(present(&surface).is_none());
    }

    #[test]
    fn updated_surface_presents_the_live_pixels() {
        let mut surface = FrameSurface::new(8, 4);
        surface.pixels_mut()[0] = 0xF800;
        surface.set_updated(true);

        let frame = present(&surface).expect("updated surface must present");
        assert_eq!(frame.width(), 8);
        assert_eq!(frame.height(), 4);
        assert_eq!(frame.pitch_bytes(), 16);
        assert_eq!(frame.pixels()[0], 0xF800);
        assert_eq!(frame.pixels().len(), 32);
    }
}
