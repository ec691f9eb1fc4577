//! Device-side shared state.
//!
//! This module owns the mutable state that bridges the engine and the
//! per-run host callbacks:
//!
//! - [`FrameSurface`]: the RGB565 screen the engine repaints during a tick.
//! - [`SoundDescriptor`] / [`Playback`]: the engine-owned PCM clips and the
//!   cursor of whichever clip is currently audible.
//! - [`DeviceState`]: the container the frame driver threads through the
//!   per-run sequence by exclusive reference.
//!
//! Design goals:
//! - No ambient globals; exactly one `DeviceState` per session, owned by the
//!   frame driver and lent to the engine for the duration of a tick.
//! - Each consumer touches only its part: the engine writes the surface and
//!   starts/stops sounds, the audio renderer advances the playback cursor,
//!   the video presenter only reads.

use std::io::Cursor;
use std::sync::Arc;

use crate::av;

/// Mutable device state shared between the frame driver and the engine.
pub struct DeviceState {
    /// Screen contents plus the repaint flag for the current tick.
    pub screen: FrameSurface,

    /// Sound playback position. At most one sound is audible at a time.
    pub playback: Playback,
}

impl DeviceState {
    /// Create device state for a device with the given screen geometry.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            screen: FrameSurface::new(width, height),
            playback: Playback::default(),
        }
    }
}

/// The device screen: a fixed-geometry RGB565 pixel buffer.
///
/// The engine repaints it (and raises `updated`) during `tick`; the video
/// presenter reads it afterwards. Rows are packed, so the byte pitch is
/// always `width * 2`.
pub struct FrameSurface {
    width: u32,
    height: u32,
    updated: bool,
    pixels: Vec<u16>,
}

impl FrameSurface {
    /// Allocate a cleared surface. Geometry is fixed for the session.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            updated: false,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the engine repainted the surface during the last tick.
    pub fn updated(&self) -> bool {
        self.updated
    }

    /// Engines flip this as part of `tick`: clear it when a tick leaves the
    /// screen untouched, raise it after repainting.
    pub fn set_updated(&mut self, updated: bool) {
        self.updated = updated;
    }

    /// Row-major RGB565 pixels, `width * height` of them.
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// Mutable pixel access for the engine's repaint path.
    pub fn pixels_mut(&mut self) -> &mut [u16] {
        &mut self.pixels
    }
}

/// An immutable mono PCM clip owned by the engine.
///
/// Descriptors are shared with [`Playback`] via `Arc`, so a clip stays alive
/// for as long as either the engine or the playback cursor refers to it. The
/// audio renderer never mutates sample data.
pub struct SoundDescriptor {
    pcm: Vec<i16>,
}

impl SoundDescriptor {
    /// Wrap raw 16-bit signed mono samples at the device rate.
    pub fn from_pcm(pcm: Vec<i16>) -> Self {
        Self { pcm }
    }

    /// Decode a WAV clip into a descriptor.
    ///
    /// ROM containers carry sounds as WAV entries; the device mixes a single
    /// mono source at a fixed rate, so anything other than 16-bit mono at
    /// 44.1 kHz is rejected rather than resampled.
    pub fn from_wav(bytes: &[u8]) -> Result<Self, SoundError> {
        let reader = hound::WavReader::new(Cursor::new(bytes)).map_err(SoundError::Decode)?;
        let spec = reader.spec();

        if spec.channels != 1 {
            return Err(SoundError::NotMono {
                channels: spec.channels,
            });
        }
        if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
            return Err(SoundError::NotSixteenBitInt {
                bits: spec.bits_per_sample,
            });
        }
        if spec.sample_rate != av::SAMPLE_RATE {
            return Err(SoundError::SampleRateMismatch {
                rate: spec.sample_rate,
            });
        }

        let pcm = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<i16>, hound::Error>>()
            .map_err(SoundError::Decode)?;

        Ok(Self { pcm })
    }

    /// Number of mono samples in the clip.
    pub fn len(&self) -> usize {
        self.pcm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pcm.is_empty()
    }

    pub fn pcm(&self) -> &[i16] {
        &self.pcm
    }
}

/// Error building a [`SoundDescriptor`] from WAV bytes.
#[derive(Debug)]
pub enum SoundError {
    /// The bytes are not a readable WAV stream.
    Decode(hound::Error),
    /// The clip has more than one channel; the device plays mono sources.
    NotMono { channels: u16 },
    /// The clip is not 16-bit signed integer PCM.
    NotSixteenBitInt { bits: u16 },
    /// The clip is not at the device rate; there is no resampler.
    SampleRateMismatch { rate: u32 },
}

impl core::fmt::Display for SoundError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SoundError::Decode(e) => write!(f, "failed to decode WAV clip: {e}"),
            SoundError::NotMono { channels } => {
                write!(f, "expected a mono clip, got {channels} channels")
            }
            SoundError::NotSixteenBitInt { bits } => {
                write!(f, "expected 16-bit signed PCM, got {bits}-bit samples")
            }
            SoundError::SampleRateMismatch { rate } => {
                write!(f, "expected {} Hz, got {rate} Hz", av::SAMPLE_RATE)
            }
        }
    }
}

impl std::error::Error for SoundError {}

/// Playback cursor over the engine's active sound.
///
/// Mutated from exactly two places: the engine's [`play`](Playback::play) /
/// [`stop_all`](Playback::stop_all) calls during a tick, and the audio
/// renderer advancing `cursor` while filling the output block. The cursor
/// stays within `0..=active.len()`; it is meaningless while `active` is
/// `None` and is reset by the next `play`.
#[derive(Default)]
pub struct Playback {
    pub(crate) active: Option<Arc<SoundDescriptor>>,
    pub(crate) cursor: usize,
    pub(crate) looping: bool,
}

impl Playback {
    /// Start a sound from its beginning. Replaces whatever was playing;
    /// the last call wins, with no fade and no overlap.
    pub fn play(&mut self, sound: &Arc<SoundDescriptor>, looping: bool) {
        self.active = Some(Arc::clone(sound));
        self.cursor = 0;
        self.looping = looping;
    }

    /// Silence the device immediately.
    pub fn stop_all(&mut self) {
        self.active = None;
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    /// Sample index the next render pass will resume from.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
