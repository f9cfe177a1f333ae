//! Time math: per-frame duration, progress and frame index mapping.

use crate::error::{Result, TimelineError};

/// Recordings are captured at 120 frames per second.
pub const DEFAULT_FPS: f64 = 120.0;
pub const DEFAULT_FRAME_DURATION_MS: f64 = 1000.0 / DEFAULT_FPS;

/// Milliseconds per frame for a playback rate in frames per second.
pub fn frame_duration_from_fps(fps: f64) -> Result<f64> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(TimelineError::InvalidRate {
            reason: format!("fps must be finite and > 0, got {fps}"),
        });
    }
    Ok(1000.0 / fps)
}

pub fn validate_frame_duration(ms: f64) -> Result<f64> {
    if !ms.is_finite() || ms <= 0.0 {
        return Err(TimelineError::InvalidRate {
            reason: format!("frame duration must be finite and > 0 ms, got {ms}"),
        });
    }
    Ok(ms)
}

#[inline]
pub fn total_duration_ms(len: usize, frame_duration_ms: f64) -> f64 {
    len as f64 * frame_duration_ms
}

/// Clamp a progress ratio into [0, 1]; NaN maps to 0.
#[inline]
pub fn clamp_progress(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Discrete frame for a progress ratio: `floor(progress * len)`, with
/// progress 1 mapping onto the last frame rather than one past it.
pub fn frame_index_for_progress(progress: f64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let idx = (clamp_progress(progress) * len as f64).floor() as usize;
    Some(idx.min(len - 1))
}

/// Progress ratio at the middle of frame `index`. The midpoint keeps the
/// round trip through `frame_index_for_progress` exact under float error.
pub fn progress_for_frame(index: usize, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    let index = index.min(len - 1);
    clamp_progress((index as f64 + 0.5) / len as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_conversion() {
        assert!((frame_duration_from_fps(120.0).unwrap() - 8.333_333).abs() < 1e-5);
        assert_eq!(frame_duration_from_fps(50.0).unwrap(), 20.0);
        assert!(frame_duration_from_fps(0.0).is_err());
        assert!(frame_duration_from_fps(f64::NAN).is_err());
        assert!(validate_frame_duration(-1.0).is_err());
    }

    #[test]
    fn index_mapping_floors_and_clamps() {
        assert_eq!(frame_index_for_progress(0.0, 10), Some(0));
        assert_eq!(frame_index_for_progress(0.099, 10), Some(0));
        assert_eq!(frame_index_for_progress(0.1, 10), Some(1));
        assert_eq!(frame_index_for_progress(0.95, 10), Some(9));
        assert_eq!(frame_index_for_progress(1.0, 10), Some(9));
        assert_eq!(frame_index_for_progress(7.0, 10), Some(9));
        assert_eq!(frame_index_for_progress(-1.0, 10), Some(0));
        assert_eq!(frame_index_for_progress(0.5, 0), None);
    }

    #[test]
    fn progress_for_frame_inverts_index() {
        for len in [1, 7, 10, 100, 977] {
            for i in 0..len {
                let p = progress_for_frame(i, len);
                assert_eq!(frame_index_for_progress(p, len), Some(i), "len={len} i={i}");
            }
        }
        assert_eq!(progress_for_frame(99, 4), progress_for_frame(3, 4));
        assert_eq!(total_duration_ms(4, 25.0), 100.0);
    }
}
