use crate::core::color::Wavelength;
use crate::export::projector::CameraProjector;
use crate::scene::light::LightKind;
use crate::scene::scene_object::SceneObject;
use log::trace;
use nalgebra::Point3;
use serde::Serialize;

/// Emission window of a light that radiates in every direction.
pub const FULL_CIRCLE: [f64; 2] = [0.0, 360.0];

/// One light on the wire:
/// `[intensity, x, y, [angMin, angMax], [fStart, fEnd], [angMin2, angMax2], wavelength]`.
///
/// The second angular range repeats the first. It has no meaning of its
/// own for the renderer as far as we know but is kept for compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightRecord(
    pub f64,
    pub f64,
    pub f64,
    pub [f64; 2],
    pub [f64; 2],
    pub [f64; 2],
    pub Wavelength,
);

impl LightRecord {
    pub fn intensity(&self) -> f64 {
        self.0
    }

    pub fn position(&self) -> (f64, f64) {
        (self.1, self.2)
    }

    pub fn cone(&self) -> [f64; 2] {
        self.3
    }

    pub fn falloff(&self) -> [f64; 2] {
        self.4
    }

    pub fn wavelength(&self) -> Wavelength {
        self.6
    }
}

/// Encodes every visible, non-obstacle light in front of the camera.
///
/// Lights behind the camera (depth <= 0, or no finite depth) are dropped without a trace in the
/// output, so the record count can change between frames.
pub fn encode_lights(objects: &[SceneObject], projector: &CameraProjector) -> Vec<LightRecord> {
    let mut records = Vec::new();

    for obj in objects {
        let Some(light) = obj.data.as_light() else {
            continue;
        };
        if !obj.visible || light.obstacle {
            trace!("Skipping non-participating light '{}'", obj.name);
            continue;
        }

        let matrix = obj.matrix_world();
        let location = Point3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
        let view = projector.view(&location);
        // NaN depth (singular camera) counts as not in front.
        if view.z.is_nan() || view.z <= 0.0 {
            trace!("Light '{}' is behind the camera", obj.name);
            continue;
        }

        let x = view.x * projector.width();
        let y = projector.height() - view.y * projector.height();

        let cone = match light.kind {
            LightKind::Spot { spot_size_deg } => {
                let center = projector.object_rotation(matrix);
                let half = spot_size_deg / 2.0;
                [center - half, center + half]
            }
            LightKind::Point => FULL_CIRCLE,
        };

        let (start, end) = light.falloff;
        let falloff = [start * projector.height(), end * projector.height()];

        records.push(LightRecord(
            light.energy,
            x,
            y,
            cone,
            falloff,
            cone,
            light.wavelength(),
        ));
    }

    records
}
