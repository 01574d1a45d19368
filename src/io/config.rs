use nalgebra::Vector3;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub materials: Vec<MaterialConfig>,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ExportConfig {
    // --- Paths ---
    /// Output path prefix; frames land at `<output>.<frame:04>.json`.
    #[serde(default)]
    pub output: String,
    /// Renderer binary, only needed by whoever renders the documents later.
    #[serde(default)]
    pub hqz_bin_path: Option<String>,

    // --- Image settings ---
    #[serde(default = "default_exposure")]
    pub exposure: f64,
    #[serde(default = "default_gamma")]
    pub gamma: f64,

    // --- Stopping conditions ---
    #[serde(default = "default_rays")]
    pub rays: u64,
    /// Seconds before the renderer gives up, 0 for no limit.
    #[serde(default)]
    pub time_limit: f64,
    #[serde(default)]
    pub seed: u64,

    // --- Geometry & output ---
    #[serde(default = "default_true")]
    pub normals_export: bool,
    #[serde(default)]
    pub normals_invert: bool,
    #[serde(default)]
    pub animation: bool,
    /// Single-line JSON instead of indented.
    #[serde(default)]
    pub compact: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: String::new(),
            hqz_bin_path: None,
            exposure: default_exposure(),
            gamma: default_gamma(),
            rays: default_rays(),
            time_limit: 0.0,
            seed: 0,
            normals_export: true,
            normals_invert: false,
            animation: false,
            compact: false,
        }
    }
}

fn default_exposure() -> f64 {
    0.5
}
fn default_gamma() -> f64 {
    2.2
}
fn default_rays() -> u64 {
    100_000
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_resolution_x")]
    pub resolution_x: u32,
    #[serde(default = "default_resolution_y")]
    pub resolution_y: u32,
    #[serde(default = "default_percentage")]
    pub resolution_percentage: u32,
    #[serde(default = "default_frame")]
    pub frame_start: i32,
    #[serde(default = "default_frame_end")]
    pub frame_end: i32,
    #[serde(default = "default_frame")]
    pub frame_current: i32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution_x: default_resolution_x(),
            resolution_y: default_resolution_y(),
            resolution_percentage: default_percentage(),
            frame_start: default_frame(),
            frame_end: default_frame_end(),
            frame_current: default_frame(),
        }
    }
}

fn default_resolution_x() -> u32 {
    1920
}
fn default_resolution_y() -> u32 {
    1080
}
fn default_percentage() -> u32 {
    100
}
fn default_frame() -> i32 {
    1
}
fn default_frame_end() -> i32 {
    250
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f64; 3],
    #[serde(default)]
    pub target: [f64; 3],
    #[serde(default = "default_up")]
    pub up: [f64; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f64,
    #[serde(default = "default_projection")]
    pub projection: String, // "perspective", "orthographic"
    #[serde(default = "default_ortho_height")]
    pub ortho_height: f64,
    #[serde(default = "default_near")]
    pub near: f64,
    #[serde(default = "default_far")]
    pub far: f64,
    #[serde(default)]
    pub keyframes: Vec<CameraKeyframeConfig>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            target: [0.0, 0.0, 0.0],
            up: default_up(),
            fov: default_fov(),
            projection: default_projection(),
            ortho_height: default_ortho_height(),
            near: default_near(),
            far: default_far(),
            keyframes: Vec::new(),
        }
    }
}

fn default_camera_position() -> [f64; 3] {
    [0.0, 0.0, 10.0]
}
fn default_up() -> [f64; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> f64 {
    39.6
}
fn default_projection() -> String {
    "perspective".to_string()
}
fn default_ortho_height() -> f64 {
    10.0
}
fn default_near() -> f64 {
    0.1
}
fn default_far() -> f64 {
    1000.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraKeyframeConfig {
    pub frame: i32,
    pub position: Option<[f64; 3]>,
    pub target: Option<[f64; 3]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialConfig {
    #[serde(default = "default_material_name")]
    pub name: String,
    #[serde(default)]
    pub diffuse: f64,
    #[serde(default)]
    pub specular: f64,
    #[serde(default)]
    pub transmission: f64,
}

fn default_material_name() -> String {
    "Material".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyframeConfig {
    pub frame: i32,
    pub position: Option<[f64; 3]>,
    pub rotation: Option<[f64; 3]>,
    pub scale: Option<[f64; 3]>,
}

#[derive(Debug, Deserialize)]
pub struct ObjectConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_object_type")]
    pub r#type: String, // "mesh", "curve", "surface", "text", "empty"
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub material: usize,

    // --- Transform ---
    #[serde(default)]
    pub position: [f64; 3],
    /// XYZ euler angles in degrees.
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "default_scale")]
    pub scale: [f64; 3],
    #[serde(default)]
    pub keyframes: Vec<KeyframeConfig>,

    // --- Mesh Data (OBJ file or inline) ---
    pub path: Option<String>,
    #[serde(default)]
    pub vertices: Vec<[f64; 3]>,
    #[serde(default)]
    pub faces: Vec<Vec<u32>>,
    #[serde(default)]
    pub edges: Vec<[u32; 2]>,
    pub normals: Option<Vec<[f64; 3]>>,
    /// Vertex pairs whose edge must not be exported.
    #[serde(default)]
    pub excluded_edges: Vec<[u32; 2]>,

    // --- Curve Data ---
    #[serde(default)]
    pub points: Vec<[f64; 3]>,
    #[serde(default)]
    pub cyclic: bool,
}

fn default_object_type() -> String {
    "mesh".to_string()
}
fn default_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_light_type")]
    pub r#type: String, // "point", "spot"
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub obstacle: bool,

    // --- Transform ---
    #[serde(default)]
    pub position: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default)]
    pub keyframes: Vec<KeyframeConfig>,

    // --- Emission ---
    #[serde(default = "default_energy")]
    pub energy: f64,
    #[serde(default = "default_light_color")]
    pub color: [f64; 3],
    /// Full cone angle in degrees, spot lights only.
    #[serde(default = "default_spot_size")]
    pub spot_size: f64,
    #[serde(default)]
    pub light_start: f64,
    #[serde(default)]
    pub light_end: f64,

    // --- Spectral ---
    #[serde(default)]
    pub spectral: bool,
    #[serde(default = "default_spectral_start")]
    pub spectral_start: f64,
    #[serde(default = "default_spectral_end")]
    pub spectral_end: f64,
}

fn default_light_type() -> String {
    "point".to_string()
}
fn default_energy() -> f64 {
    1.0
}
fn default_light_color() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}
fn default_spot_size() -> f64 {
    45.0
}
fn default_spectral_start() -> f64 {
    400.0
}
fn default_spectral_end() -> f64 {
    700.0
}

/// Visible band the renderer accepts for spectral lights, nm.
pub const SPECTRAL_MIN: f64 = 400.0;
pub const SPECTRAL_MAX: f64 = 700.0;

impl CameraConfig {
    /// Rejects poses and projections that would yield a singular view or projection matrix.
    /// Every keyframed pose is checked too, with un-keyed values taken from the base pose.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_pose(self.position, self.target, self.up, "camera")?;
        for k in &self.keyframes {
            check_pose(
                k.position.unwrap_or(self.position),
                k.target.unwrap_or(self.target),
                self.up,
                &format!("camera keyframe {}", k.frame),
            )?;
        }

        match self.projection.as_str() {
            "perspective" if !(self.fov > 0.0 && self.fov < 180.0) => {
                return Err(ConfigError::Invalid(format!(
                    "camera fov = {} must be in (0, 180)",
                    self.fov
                )));
            }
            "orthographic" if self.ortho_height.is_nan() || self.ortho_height <= 0.0 => {
                return Err(ConfigError::Invalid(format!(
                    "camera ortho_height = {} must be > 0",
                    self.ortho_height
                )));
            }
            _ => {}
        }

        if self.near.is_nan() || self.far.is_nan() || self.near >= self.far {
            return Err(ConfigError::Invalid(format!(
                "camera near ({}) must be less than far ({})",
                self.near, self.far
            )));
        }
        Ok(())
    }
}

fn check_pose(
    position: [f64; 3],
    target: [f64; 3],
    up: [f64; 3],
    what: &str,
) -> Result<(), ConfigError> {
    let forward = Vector3::from(target) - Vector3::from(position);
    let up = Vector3::from(up);
    let Some(forward) = forward.try_normalize(1e-9) else {
        return Err(ConfigError::Invalid(format!("{}: position equals target", what)));
    };
    if up.cross(&forward).norm() <= 1e-9 * up.norm().max(1.0) {
        return Err(ConfigError::Invalid(format!(
            "{}: up is zero or parallel to the view direction",
            what
        )));
    }
    Ok(())
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the bounds the host UI would otherwise enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let render = &self.render;
        if render.resolution_x == 0 || render.resolution_y == 0 {
            return Err(ConfigError::Invalid("resolution must be non-zero".into()));
        }
        if render.resolution_percentage == 0 {
            return Err(ConfigError::Invalid(
                "resolution_percentage must be > 0".into(),
            ));
        }
        if render.frame_end < render.frame_start {
            return Err(ConfigError::Invalid(format!(
                "frame_end ({}) is before frame_start ({})",
                render.frame_end, render.frame_start
            )));
        }

        self.camera.validate()?;

        let export = &self.export;
        if export.exposure < 0.0 || export.gamma < 0.0 || export.time_limit < 0.0 {
            return Err(ConfigError::Invalid(
                "exposure, gamma and time_limit must be >= 0".into(),
            ));
        }

        for (i, m) in self.materials.iter().enumerate() {
            for (label, value) in [
                ("diffuse", m.diffuse),
                ("specular", m.specular),
                ("transmission", m.transmission),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigError::Invalid(format!(
                        "material {} '{}': {} = {} is outside [0, 1]",
                        i, m.name, label, value
                    )));
                }
            }
        }

        for l in &self.lights {
            if l.energy < 0.0 || l.light_start < 0.0 || l.light_end < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "light '{}': energy and falloff must be >= 0",
                    l.name
                )));
            }
            for (label, value) in [
                ("spectral_start", l.spectral_start),
                ("spectral_end", l.spectral_end),
            ] {
                if !(SPECTRAL_MIN..=SPECTRAL_MAX).contains(&value) {
                    return Err(ConfigError::Invalid(format!(
                        "light '{}': {} = {} is outside [{}, {}] nm",
                        l.name, label, value, SPECTRAL_MIN, SPECTRAL_MAX
                    )));
                }
            }
            if l.spectral && l.spectral_start > l.spectral_end {
                return Err(ConfigError::Invalid(format!(
                    "light '{}': spectral_start > spectral_end",
                    l.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.export.rays, 100_000);
        assert_eq!(config.export.exposure, 0.5);
        assert!(config.export.normals_export);
        assert!(!config.export.compact);
        assert_eq!(config.render.resolution_percentage, 100);
        assert!(config.materials.is_empty());
    }

    #[test]
    fn parses_scene_tables() {
        let config = Config::from_toml_str(
            r#"
            [export]
            output = "out/scene"
            rays = 5000
            time_limit = 30

            [render]
            resolution_x = 640
            resolution_y = 480

            [[materials]]
            name = "glass"
            transmission = 0.9
            specular = 0.1

            [[objects]]
            name = "wall"
            vertices = [[0, 0, 0], [1, 0, 0]]
            edges = [[0, 1]]
            material = 0

            [[lights]]
            type = "spot"
            spot_size = 40
            spectral = true
            "#,
        )
        .unwrap();
        assert_eq!(config.export.output, "out/scene");
        assert_eq!(config.export.time_limit, 30.0);
        assert_eq!(config.materials[0].transmission, 0.9);
        assert_eq!(config.objects[0].edges, vec![[0, 1]]);
        assert_eq!(config.lights[0].r#type, "spot");
        assert_eq!(config.lights[0].spectral_end, 700.0);
    }

    #[test]
    fn rejects_out_of_range_material() {
        let err = Config::from_toml_str(
            r#"
            [[materials]]
            diffuse = 1.5
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_reversed_frame_range() {
        let err = Config::from_toml_str(
            r#"
            [render]
            frame_start = 10
            frame_end = 2
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    fn camera_error(toml: &str) -> String {
        match Config::from_toml_str(toml) {
            Err(ConfigError::Invalid(msg)) => msg,
            other => panic!("expected an invalid camera, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn rejects_degenerate_camera_pose() {
        let msg = camera_error(
            r#"
            [camera]
            position = [0, 0, 10]
            target = [0, 0, 0]
            up = [0, 0, 1]
            "#,
        );
        assert!(msg.contains("parallel"));

        let msg = camera_error(
            r#"
            [camera]
            position = [1, 2, 3]
            target = [1, 2, 3]
            "#,
        );
        assert!(msg.contains("position equals target"));

        let msg = camera_error(
            r#"
            [camera]
            keyframes = [{ frame = 4, position = [0, 0, 0] }]
            "#,
        );
        assert!(msg.contains("keyframe 4"));
    }

    #[test]
    fn rejects_degenerate_projection() {
        assert!(camera_error("[camera]\nfov = 180").contains("fov"));
        assert!(camera_error("[camera]\nfov = 0").contains("fov"));
        assert!(
            camera_error("[camera]\nprojection = \"orthographic\"\northo_height = 0")
                .contains("ortho_height")
        );
        assert!(camera_error("[camera]\nnear = 5\nfar = 5").contains("near"));
        // fov only matters for perspective cameras.
        let ortho = "[camera]\nprojection = \"orthographic\"\nfov = 0";
        assert!(Config::from_toml_str(ortho).is_ok());
    }

    #[test]
    fn spectral_band_must_stay_visible() {
        for light in [
            "spectral = true\nspectral_start = 350",
            "spectral = true\nspectral_end = 720",
            "spectral_start = 399.5",
        ] {
            let err = Config::from_toml_str(&format!("[[lights]]\n{}", light)).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "accepted {:?}", light);
        }
        let edges = "[[lights]]\nspectral = true\nspectral_start = 400\nspectral_end = 700";
        assert!(Config::from_toml_str(edges).is_ok());
    }
}
