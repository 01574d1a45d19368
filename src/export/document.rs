use crate::export::ExportError;
use crate::export::geometry::EdgeRecord;
use crate::export::lights::LightRecord;
use crate::export::materials::MaterialRecord;
use serde::Serialize;

/// The per-frame document read by the renderer.
///
/// Fields are declared in alphabetical order so both output modes carry
/// sorted keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub exposure: f64,
    pub gamma: f64,
    pub lights: Vec<LightRecord>,
    pub materials: Vec<MaterialRecord>,
    pub objects: Vec<EdgeRecord>,
    pub rays: u64,
    pub resolution: [u32; 2],
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timelimit: Option<f64>,
    /// `[0, 0, width, height]` with the unrounded scaled size.
    pub viewport: (u32, u32, f64, f64),
}

impl Document {
    /// Serializes to JSON, indented with two spaces or on a single line.
    pub fn to_json(&self, compact: bool) -> Result<String, ExportError> {
        let text = if compact {
            serde_json::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Wavelength;
    use crate::export::lights::FULL_CIRCLE;
    use nalgebra::Point2;

    fn sample() -> Document {
        Document {
            exposure: 0.5,
            gamma: 2.2,
            lights: vec![LightRecord(
                1.0,
                5.0,
                5.0,
                FULL_CIRCLE,
                [0.0, 0.0],
                FULL_CIRCLE,
                Wavelength::White,
            )],
            materials: vec![[(1.0, "d"), (0.0, "t"), (0.0, "r")]],
            objects: vec![EdgeRecord {
                material_id: 0,
                start: Point2::new(1.0, 2.0),
                normals: None,
            }],
            rays: 1000,
            resolution: [10, 10],
            seed: 7,
            timelimit: None,
            viewport: (0, 0, 10.0, 10.0),
        }
    }

    #[test]
    fn compact_output_has_sorted_keys_and_no_whitespace() {
        let json = sample().to_json(true).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"exposure":0.5,"gamma":2.2,"#,
                r#""lights":[[1.0,5.0,5.0,[0.0,360.0],[0.0,0.0],[0.0,360.0],0]],"#,
                r#""materials":[[[1.0,"d"],[0.0,"t"],[0.0,"r"]]],"#,
                r#""objects":[[0,1.0,2.0]],"rays":1000,"resolution":[10,10],"#,
                r#""seed":7,"viewport":[0,0,10.0,10.0]}"#
            )
        );
    }

    #[test]
    fn pretty_output_is_indented() {
        let json = sample().to_json(false).unwrap();
        assert!(json.starts_with("{\n  \"exposure\": 0.5,\n  \"gamma\": 2.2,"));
    }

    #[test]
    fn timelimit_only_when_set() {
        let mut doc = sample();
        assert!(!doc.to_json(true).unwrap().contains("timelimit"));
        doc.timelimit = Some(60.0);
        assert!(doc.to_json(true).unwrap().contains(r#""timelimit":60.0"#));
    }
}
