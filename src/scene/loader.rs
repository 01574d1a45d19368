use crate::core::color::Hsv;
use crate::core::math::interpolation::Keyframe;
use crate::export::ExportSettings;
use crate::io::config::{CameraConfig, Config, KeyframeConfig, LightConfig, ObjectConfig};
use crate::io::obj_loader::{LoadError, load_obj};
use crate::scene::camera::Camera;
use crate::scene::context::{RenderSettings, SceneContext};
use crate::scene::light::{Emission, Light, LightKind};
use crate::scene::material::Material;
use crate::scene::mesh::{Curve, Mesh};
use crate::scene::scene_object::{ObjectData, ObjectTransform, SceneObject};
use log::{debug, info};
use nalgebra::{Point3, Vector3};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("object '{name}': {reason}")]
    InvalidObject { name: String, reason: String },
}

fn invalid(name: &str, reason: impl Into<String>) -> SceneError {
    SceneError::InvalidObject {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Builds the immutable per-run export settings (scalar options + material list).
pub fn build_export_settings(config: &Config) -> ExportSettings {
    let export = &config.export;
    ExportSettings {
        output: export.output.clone(),
        hqz_bin_path: export.hqz_bin_path.clone(),
        exposure: export.exposure,
        gamma: export.gamma,
        rays: export.rays,
        time_limit: export.time_limit,
        seed: export.seed,
        normals_export: export.normals_export,
        normals_invert: export.normals_invert,
        animation: export.animation,
        compact: export.compact,
        materials: config
            .materials
            .iter()
            .map(|m| Material::new(m.name.clone(), m.diffuse, m.specular, m.transmission))
            .collect(),
    }
}

/// Builds the scene (camera, objects, lights) described by the config and activates `frame_current`.
pub fn build_scene(config: &Config) -> Result<SceneContext, SceneError> {
    let render = RenderSettings {
        resolution_x: config.render.resolution_x,
        resolution_y: config.render.resolution_y,
        resolution_percentage: config.render.resolution_percentage,
        frame_start: config.render.frame_start,
        frame_end: config.render.frame_end,
        frame_current: config.render.frame_current,
    };

    // 1. Camera
    let camera = build_camera(&config.camera, render.aspect_ratio())?;

    // 2. Drawable objects
    let mut objects = Vec::with_capacity(config.objects.len() + config.lights.len());
    for obj_conf in &config.objects {
        objects.push(build_object(obj_conf)?);
    }

    // 3. Lights
    for light_conf in &config.lights {
        objects.push(build_light(light_conf)?);
    }

    info!(
        "Scene initialized with {} objects ({} lights).",
        objects.len(),
        config.lights.len()
    );

    Ok(SceneContext::new(camera, render, objects))
}

fn build_camera(conf: &CameraConfig, aspect_ratio: f64) -> Result<Camera, SceneError> {
    let position = Point3::from(conf.position);
    let target = Point3::from(conf.target);
    let up = Vector3::from(conf.up);

    let mut camera = match conf.projection.as_str() {
        "perspective" => Camera::new_perspective(
            position,
            target,
            up,
            conf.fov.to_radians(),
            aspect_ratio,
            conf.near,
            conf.far,
        ),
        "orthographic" => Camera::new_orthographic(
            position,
            target,
            up,
            conf.ortho_height,
            aspect_ratio,
            conf.near,
            conf.far,
        ),
        other => {
            return Err(invalid("camera", format!("unknown projection '{}'", other)));
        }
    };

    let mut keys = conf.keyframes.clone();
    keys.sort_by_key(|k| k.frame);
    camera.position_keys = keys
        .iter()
        .filter_map(|k| k.position.map(|p| Keyframe::new(k.frame, Vector3::from(p))))
        .collect();
    camera.target_keys = keys
        .iter()
        .filter_map(|k| k.target.map(|t| Keyframe::new(k.frame, Vector3::from(t))))
        .collect();
    Ok(camera)
}

fn build_transform(
    position: [f64; 3],
    rotation: [f64; 3],
    scale: [f64; 3],
    keyframes: &[KeyframeConfig],
) -> ObjectTransform {
    let mut keys = keyframes.to_vec();
    keys.sort_by_key(|k| k.frame);
    let track = |pick: fn(&KeyframeConfig) -> Option<[f64; 3]>| -> Vec<Keyframe<Vector3<f64>>> {
        keys.iter()
            .filter_map(|k| pick(k).map(|v| Keyframe::new(k.frame, Vector3::from(v))))
            .collect()
    };

    ObjectTransform {
        position_keys: track(|k| k.position),
        rotation_keys: track(|k| k.rotation),
        scale_keys: track(|k| k.scale),
        ..ObjectTransform::new(
            Vector3::from(position),
            Vector3::from(rotation),
            Vector3::from(scale),
        )
    }
}

fn build_object(conf: &ObjectConfig) -> Result<SceneObject, SceneError> {
    let data = match conf.r#type.as_str() {
        "mesh" => ObjectData::Mesh(build_mesh(conf)?),
        "surface" => ObjectData::Surface(build_mesh(conf)?),
        "text" => ObjectData::Text(build_mesh(conf)?),
        "curve" => ObjectData::Curve(Curve::new(
            conf.points.iter().map(|p| Point3::from(*p)).collect(),
            conf.cyclic,
        )),
        "empty" => ObjectData::Empty,
        other => return Err(invalid(&conf.name, format!("unknown type '{}'", other))),
    };

    let transform = build_transform(conf.position, conf.rotation, conf.scale, &conf.keyframes);
    debug!("Built object '{}' ({})", conf.name, conf.r#type);

    Ok(SceneObject::new(conf.name.clone(), transform, data)
        .with_material(conf.material)
        .with_visibility(conf.visible))
}

fn build_mesh(conf: &ObjectConfig) -> Result<Mesh, SceneError> {
    let mut mesh = if let Some(path) = &conf.path {
        load_obj(path)?
    } else {
        let count = conf.vertices.len() as u32;
        let out_of_range = conf
            .faces
            .iter()
            .flatten()
            .chain(conf.edges.iter().flatten())
            .any(|&i| i >= count);
        if out_of_range {
            return Err(invalid(&conf.name, "vertex index out of range"));
        }

        let normals = match &conf.normals {
            Some(n) if n.len() != conf.vertices.len() => {
                return Err(invalid(&conf.name, "normals and vertices differ in length"));
            }
            Some(n) => Some(n.iter().map(|v| Vector3::from(*v)).collect()),
            None => None,
        };

        // Loose edges go in as two-vertex polygons after the faces.
        let polygons: Vec<Vec<u32>> = conf
            .faces
            .iter()
            .cloned()
            .chain(conf.edges.iter().map(|e| e.to_vec()))
            .collect();

        Mesh::from_polygons(
            conf.vertices.iter().map(|v| Point3::from(*v)).collect(),
            &polygons,
            normals,
        )
    };

    mesh.mark_excluded(&conf.excluded_edges);
    Ok(mesh)
}

fn build_light(conf: &LightConfig) -> Result<SceneObject, SceneError> {
    let kind = match conf.r#type.as_str() {
        "point" => LightKind::Point,
        "spot" => LightKind::Spot {
            spot_size_deg: conf.spot_size,
        },
        other => {
            return Err(invalid(&conf.name, format!("unknown light type '{}'", other)));
        }
    };

    let emission = if conf.spectral {
        Emission::Spectral {
            start: conf.spectral_start,
            end: conf.spectral_end,
        }
    } else {
        Emission::Color(Hsv::from_rgb(&Vector3::from(conf.color)))
    };

    let light = Light {
        kind,
        energy: conf.energy,
        emission,
        falloff: (conf.light_start, conf.light_end),
        obstacle: conf.obstacle,
    };

    let transform = build_transform(conf.position, conf.rotation, [1.0; 3], &conf.keyframes);
    Ok(
        SceneObject::new(conf.name.clone(), transform, ObjectData::Light(light))
            .with_visibility(conf.visible),
    )
}
