use std::ops::{Add, Mul};

/// A value pinned to a frame number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    pub frame: i32,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(frame: i32, value: T) -> Self {
        Self { frame, value }
    }
}

/// Linear interpolation `a + (b - a) * t`, written as `a * (1 - t) + b * t`
/// so it only needs `Add` and `Mul<f64>`.
#[inline]
pub fn lerp<T>(a: T, b: T, t: f64) -> T
where
    T: Copy + Add<Output = T> + Mul<f64, Output = T>,
{
    a * (1.0 - t) + b * t
}

/// Samples a keyframe track at `frame`.
///
/// `keys` must be sorted by frame. Frames before the first key or after the
/// last one hold the boundary value. Returns `None` for an empty track.
pub fn sample_track<T>(keys: &[Keyframe<T>], frame: i32) -> Option<T>
where
    T: Copy + Add<Output = T> + Mul<f64, Output = T>,
{
    let first = keys.first()?;
    let last = keys.last()?;

    if frame <= first.frame {
        return Some(first.value);
    }
    if frame >= last.frame {
        return Some(last.value);
    }

    // First key strictly after `frame`; the one before it brackets from below.
    let upper = keys.partition_point(|k| k.frame <= frame);
    let (k0, k1) = (&keys[upper - 1], &keys[upper]);
    if k0.frame == frame {
        return Some(k0.value);
    }

    let span = (k1.frame - k0.frame) as f64;
    let t = (frame - k0.frame) as f64 / span;
    Some(lerp(k0.value, k1.value, t))
}
