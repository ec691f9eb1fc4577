//! Mono clip → stereo block rendering.
//!
//! The device keeps an independent, possibly-looping mono waveform going;
//! the frontend consumes exactly [`FRAMES_PER_RUN`](super::FRAMES_PER_RUN)
//! interleaved stereo frames per run. [`render`] drains the active clip into
//! one output block using only the persistent cursor — no lookahead, no
//! carry-over buffering between runs.

use crate::state::Playback;

/// Fixed-capacity interleaved stereo `i16` block.
///
/// Fully overwritten by every [`render`] call; nothing persists in it
/// across runs. Capacity is a constructor argument so the renderer can be
/// exercised at small sizes.
pub struct StereoBuffer {
    samples: Box<[i16]>,
}

impl StereoBuffer {
    /// Allocate a silent block holding `frame_capacity` stereo frames.
    pub fn new(frame_capacity: usize) -> Self {
        Self {
            samples: vec![0i16; frame_capacity * 2].into_boxed_slice(),
        }
    }

    /// Stereo frame slots available per run.
    pub fn frame_capacity(&self) -> usize {
        self.samples.len() / 2
    }

    /// Interleaved (left, right) samples, `2 * frame_capacity` of them.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    fn silence(&mut self) {
        self.samples.fill(0);
    }
}

/// Fill one output block from the active clip.
///
/// Each mono sample is duplicated into both channels, unattenuated. When the
/// cursor hits the end of the clip, a non-looping clip stops (leaving the
/// tail of the block silent); a looping clip rewinds and keeps filling, so
/// the wrap is seamless within the same block. A clip shorter than the block
/// wraps as many times as it takes to fill it. With no active clip the block
/// is silent and the playback state is left untouched.
pub fn render(playback: &mut Playback, out: &mut StereoBuffer) {
    out.silence();

    let capacity = out.frame_capacity();
    let mut filled = 0;

    while filled < capacity {
        let Some(sound) = playback.active.clone() else {
            break;
        };

        // An empty clip can never make progress; treat it as a stop so a
        // looping one does not spin here forever.
        if sound.is_empty() {
            playback.stop_all();
            break;
        }

        let remaining = sound.len() - playback.cursor;
        let take = remaining.min(capacity - filled);

        let src = &sound.pcm()[playback.cursor..playback.cursor + take];
        for (i, &mono) in src.iter().enumerate() {
            let at = (filled + i) * 2;
            out.samples[at] = mono;
            out.samples[at + 1] = mono;
        }

        playback.cursor += take;
        filled += take;

        if playback.cursor == sound.len() {
            if playback.looping {
                playback.cursor = 0;
            } else {
                playback.active = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SoundDescriptor;
    use std::sync::Arc;

    fn clip(samples: &[i16]) -> Arc<SoundDescriptor> {
        Arc::new(SoundDescriptor::from_pcm(samples.to_vec()))
    }

    fn playing(samples: &[i16], looping: bool) -> Playback {
        let mut playback = Playback::default();
        playback.play(&clip(samples), looping);
        playback
    }

    /// Stereo frames of `out` as (left, right) pairs.
    fn frames(out: &StereoBuffer) -> Vec<(i16, i16)> {
        out.samples()
            .chunks_exact(2)
            .map(|lr| (lr[0], lr[1]))
            .collect()
    }

    #[test]
    fn silent_when_nothing_is_playing() {
        let mut playback = Playback::default();
        let mut out = StereoBuffer::new(8);

        render(&mut playback, &mut out);

        assert!(out.samples().iter().all(|&s| s == 0));
        assert!(!playback.is_playing());
        assert_eq!(playback.cursor(), 0);
    }

    #[test]
    fn each_frame_is_the_mono_sample_on_both_channels() {
        let mut playback = playing(&[10, -20, 30], false);
        let mut out = StereoBuffer::new(8);

        render(&mut playback, &mut out);

        let got = frames(&out);
        assert_eq!(got[0], (10, 10));
        assert_eq!(got[1], (-20, -20));
        assert_eq!(got[2], (30, 30));
    }

    #[test]
    fn short_clip_without_loop_leaves_tail_silent_and_stops() {
        let mut playback = playing(&[1, 2, 3, 4, 5], false);
        let mut out = StereoBuffer::new(8);

        render(&mut playback, &mut out);

        let got = frames(&out);
        assert_eq!(
            got,
            vec![
                (1, 1),
                (2, 2),
                (3, 3),
                (4, 4),
                (5, 5),
                (0, 0),
                (0, 0),
                (0, 0)
            ]
        );
        assert!(!playback.is_playing(), "clip must stop at its end");
    }

    #[test]
    fn exact_fit_clip_ends_at_the_block_boundary() {
        let mut playback = playing(&[7; 8], false);
        let mut out = StereoBuffer::new(8);

        render(&mut playback, &mut out);

        assert!(out.samples().iter().all(|&s| s == 7));
        assert!(!playback.is_playing());
    }

    #[test]
    fn looping_clip_wraps_seamlessly_across_two_runs() {
        // 10-sample clip, 8-frame blocks: run 1 plays [0..8), run 2 plays
        // [8..10) then wraps into [0..6) with no silent gap.
        let samples: Vec<i16> = (100..110).collect();
        let mut playback = playing(&samples, true);
        let mut out = StereoBuffer::new(8);

        render(&mut playback, &mut out);
        assert_eq!(playback.cursor(), 8);
        let run1: Vec<i16> = frames(&out).iter().map(|&(l, _)| l).collect();
        assert_eq!(run1, (100..108).collect::<Vec<i16>>());

        render(&mut playback, &mut out);
        assert_eq!(playback.cursor(), 6);
        let run2: Vec<i16> = frames(&out).iter().map(|&(l, _)| l).collect();
        assert_eq!(run2, vec![108, 109, 100, 101, 102, 103, 104, 105]);
    }

    #[test]
    fn looping_clip_shorter_than_the_block_fills_it_completely() {
        let mut playback = playing(&[1, 2, 3, 4, 5], true);
        let mut out = StereoBuffer::new(8);

        render(&mut playback, &mut out);

        let got: Vec<i16> = frames(&out).iter().map(|&(l, _)| l).collect();
        assert_eq!(got, vec![1, 2, 3, 4, 5, 1, 2, 3], "no gap at the wrap");
        assert_eq!(playback.cursor(), 8 % 5);
        assert!(playback.is_playing());
    }

    #[test]
    fn tiny_looping_clip_wraps_as_often_as_needed() {
        let mut playback = playing(&[9, -9], true);
        let mut out = StereoBuffer::new(735);

        render(&mut playback, &mut out);

        let got = frames(&out);
        assert!(got.iter().step_by(2).all(|&f| f == (9, 9)));
        assert!(got.iter().skip(1).step_by(2).all(|&f| f == (-9, -9)));
        assert_eq!(playback.cursor(), 735 % 2);
    }

    #[test]
    fn empty_clip_stops_instead_of_looping_forever() {
        let mut playback = playing(&[], true);
        let mut out = StereoBuffer::new(8);

        render(&mut playback, &mut out);

        assert!(out.samples().iter().all(|&s| s == 0));
        assert!(!playback.is_playing());
    }

    #[test]
    fn replacing_the_clip_mid_playback_starts_over() {
        let mut playback = playing(&[1; 20], false);
        let mut out = StereoBuffer::new(8);
        render(&mut playback, &mut out);
        assert_eq!(playback.cursor(), 8);

        playback.play(&clip(&[2; 20]), false);
        render(&mut playback, &mut out);

        assert!(
            out.samples().iter().all(|&s| s == 2),
            "no residue of the replaced clip may appear"
        );
        assert_eq!(playback.cursor(), 8);
    }

    #[test]
    fn render_overwrites_the_whole_block_every_run() {
        let mut playback = playing(&[5; 8], false);
        let mut out = StereoBuffer::new(8);
        render(&mut playback, &mut out);
        assert!(out.samples().iter().all(|&s| s == 5));

        // Next run: nothing is playing, the previous contents must not leak.
        render(&mut playback, &mut out);
        assert!(out.samples().iter().all(|&s| s == 0));
    }
}
