use crate::core::color::{Hsv, Wavelength, color_to_wavelength};

/// Shape of the emission cone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Emits in all directions.
    Point,
    /// Emits inside a cone of `spot_size_deg` (full angle) around the object's -Z axis.
    Spot { spot_size_deg: f64 },
}

/// What the light emits, as a color or as an explicit spectral band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Emission {
    Color(Hsv),
    /// Band in nm, nominally within 400..700.
    Spectral { start: f64, end: f64 },
}

/// Represents a light source in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    /// Intensity, >= 0.
    pub energy: f64,
    pub emission: Emission,
    /// Radial falloff start/end as fractions of the vertical resolution.
    pub falloff: (f64, f64),
    /// Set by the host for lights that only block light; those never get exported.
    pub obstacle: bool,
}

impl Light {
    /// Creates a white point light with no falloff.
    pub fn new_point(energy: f64) -> Self {
        Self {
            kind: LightKind::Point,
            energy,
            emission: Emission::Color(Hsv::new(0.0, 0.0, 1.0)),
            falloff: (0.0, 0.0),
            obstacle: false,
        }
    }

    /// Creates a white spot light with the given full cone angle in degrees.
    pub fn new_spot(energy: f64, spot_size_deg: f64) -> Self {
        Self {
            kind: LightKind::Spot { spot_size_deg },
            ..Self::new_point(energy)
        }
    }

    pub fn with_emission(mut self, emission: Emission) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_falloff(mut self, start: f64, end: f64) -> Self {
        self.falloff = (start, end);
        self
    }

    /// Wavelength field emitted for this light.
    pub fn wavelength(&self) -> Wavelength {
        match self.emission {
            Emission::Color(hsv) => color_to_wavelength(&hsv),
            Emission::Spectral { start, end } => Wavelength::Band(start, end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectral_band_wins_over_color() {
        let light = Light::new_point(1.0).with_emission(Emission::Spectral {
            start: 420.0,
            end: 480.0,
        });
        assert_eq!(light.wavelength(), Wavelength::Band(420.0, 480.0));
    }

    #[test]
    fn default_light_is_white() {
        assert_eq!(Light::new_spot(2.0, 45.0).wavelength(), Wavelength::White);
    }
}
