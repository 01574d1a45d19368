use nalgebra::Vector3;
use serde::{Serialize, Serializer};

/// Wavelength (nm) of a fully saturated hue of 0 (red).
const RED_WAVELENGTH: f64 = 650.0;
/// Span covered when hue goes from 0 to 1.
const HUE_WAVELENGTH_SPAN: f64 = 262.5;
/// Half-width of the band at zero saturation, shrinking linearly to 0 at full saturation.
const DESATURATION_HALF_BAND: f64 = 300.0;

/// Hue/saturation/value triple, each component in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    /// Converts linear RGB in [0, 1] to HSV.
    /// Hue wraps to [0, 1); greys get hue 0 and saturation 0.
    pub fn from_rgb(rgb: &Vector3<f64>) -> Self {
        let (r, g, b) = (rgb.x, rgb.y, rgb.z);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let s = if max > 0.0 { delta / max } else { 0.0 };
        if delta <= f64::EPSILON {
            return Self::new(0.0, s, max);
        }

        let sector = if max == r {
            ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        Self::new((sector / 6.0).rem_euclid(1.0), s, max)
    }
}

/// Dominant wavelength of a light color, in the shape the renderer expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wavelength {
    /// No dominant wavelength: white light. Serialized as `0`.
    White,
    /// A single wavelength in nm.
    Single(f64),
    /// An inclusive band `[start, end]` in nm.
    Band(f64, f64),
}

impl Serialize for Wavelength {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Wavelength::White => serializer.serialize_u32(0),
            Wavelength::Single(w) => serializer.serialize_f64(w),
            Wavelength::Band(start, end) => [start, end].serialize(serializer),
        }
    }
}

/// Maps a hue/saturation color to its approximate dominant wavelength.
///
/// Saturation 0 is white, saturation 1 is a single wavelength
/// `650 - h * 262.5`, anything in between is a band centred on that
/// wavelength whose half-width grows as `300 * (1 - s)`.
pub fn color_to_wavelength(color: &Hsv) -> Wavelength {
    if color.s == 0.0 {
        return Wavelength::White;
    }

    let wavelength = RED_WAVELENGTH - color.h * HUE_WAVELENGTH_SPAN;
    if color.s == 1.0 {
        return Wavelength::Single(wavelength);
    }

    let half = DESATURATION_HALF_BAND * (1.0 - color.s);
    Wavelength::Band(wavelength - half, wavelength + half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn desaturated_is_white_for_any_hue() {
        for h in [0.0, 0.25, 0.5, 0.99] {
            assert_eq!(color_to_wavelength(&Hsv::new(h, 0.0, 1.0)), Wavelength::White);
        }
    }

    #[test]
    fn saturated_hue_maps_to_single_wavelength() {
        assert_eq!(
            color_to_wavelength(&Hsv::new(0.0, 1.0, 1.0)),
            Wavelength::Single(650.0)
        );
        let Wavelength::Single(blue) = color_to_wavelength(&Hsv::new(0.7619, 1.0, 1.0)) else {
            panic!("expected a single wavelength");
        };
        assert_relative_eq!(blue, 450.0, epsilon = 0.01);
    }

    #[test]
    fn saturated_wavelength_decreases_with_hue() {
        let mut previous = f64::INFINITY;
        for i in 0..10 {
            let h = i as f64 / 10.0;
            let Wavelength::Single(w) = color_to_wavelength(&Hsv::new(h, 1.0, 1.0)) else {
                panic!("expected a single wavelength");
            };
            assert!(w < previous);
            previous = w;
        }
    }

    #[test]
    fn partial_saturation_widens_into_band() {
        let Wavelength::Band(start, end) = color_to_wavelength(&Hsv::new(0.0, 0.5, 1.0)) else {
            panic!("expected a band");
        };
        assert_relative_eq!(start, 500.0);
        assert_relative_eq!(end, 800.0);
    }

    #[test]
    fn rgb_to_hsv_primaries() {
        let red = Hsv::from_rgb(&Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(red.h, 0.0);
        assert_relative_eq!(red.s, 1.0);

        let blue = Hsv::from_rgb(&Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(blue.h, 2.0 / 3.0, epsilon = 1e-12);

        let grey = Hsv::from_rgb(&Vector3::new(0.5, 0.5, 0.5));
        assert_eq!(grey.s, 0.0);
        assert_relative_eq!(grey.v, 0.5);
    }

    #[test]
    fn wavelength_wire_shapes() {
        assert_eq!(serde_json::to_string(&Wavelength::White).unwrap(), "0");
        assert_eq!(serde_json::to_string(&Wavelength::Single(650.0)).unwrap(), "650.0");
        assert_eq!(
            serde_json::to_string(&Wavelength::Band(400.0, 700.0)).unwrap(),
            "[400.0,700.0]"
        );
    }
}
