use crate::export::document::Document;
use crate::export::geometry::{NormalOptions, extract_edges};
use crate::export::lights::encode_lights;
use crate::export::materials::encode_materials;
use crate::export::projector::CameraProjector;
use crate::export::{ExportError, ExportSettings};
use crate::scene::camera::Projector;
use crate::scene::context::SceneContext;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Extension of every written document.
pub const DOCUMENT_EXTENSION: &str = "json";

/// `<output>.<frame, zero padded to 4>.json`
pub fn frame_path(output: &str, frame: i32) -> PathBuf {
    PathBuf::from(format!("{}.{:04}.{}", output, frame, DOCUMENT_EXTENSION))
}

/// Paths written by one export run, in frame order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub frames: Vec<(i32, PathBuf)>,
}

/// Runs the export: one document per requested frame, strictly in order.
pub struct SceneSerializer<'a> {
    settings: &'a ExportSettings,
}

impl<'a> SceneSerializer<'a> {
    pub fn new(settings: &'a ExportSettings) -> Self {
        Self { settings }
    }

    /// Frames to export: the whole range when animating, else the current frame.
    pub fn frames(&self, scene: &SceneContext) -> Vec<i32> {
        if self.settings.animation {
            scene.render.animation_range().collect()
        } else {
            vec![scene.render.frame_current]
        }
    }

    /// Builds the document for the scene's active frame using its own camera.
    pub fn build_document(&self, scene: &SceneContext) -> Document {
        self.build_document_with(scene, &scene.camera)
    }

    /// Builds the document for the active frame through an arbitrary projection.
    pub fn build_document_with(&self, scene: &SceneContext, projection: &dyn Projector) -> Document {
        let settings = self.settings;
        let render = &scene.render;
        let projector = CameraProjector::new(projection, render);

        let lights = encode_lights(&scene.objects, &projector);
        let objects = extract_edges(
            &scene.objects,
            &projector,
            NormalOptions {
                export: settings.normals_export,
                invert: settings.normals_invert,
            },
        );
        let materials = encode_materials(&settings.materials);
        debug!(
            "Frame {}: {} lights, {} edges, {} materials",
            scene.frame(),
            lights.len(),
            objects.len(),
            materials.len()
        );

        Document {
            exposure: settings.exposure,
            gamma: settings.gamma,
            lights,
            materials,
            objects,
            rays: settings.rays,
            resolution: render.pixel_resolution(),
            seed: settings.seed,
            timelimit: (settings.time_limit > 0.0).then_some(settings.time_limit),
            viewport: (0, 0, render.width(), render.height()),
        }
    }

    /// Exports every requested frame and writes it to its frame-numbered file.
    ///
    /// Fails before touching the filesystem when no output path is set. A
    /// failure on one frame stops the run; files of earlier frames stay.
    pub fn export(&self, scene: &mut SceneContext) -> Result<ExportReport, ExportError> {
        let settings = self.settings;
        if settings.output.trim().is_empty() {
            return Err(ExportError::MissingOutputPath);
        }
        if settings.hqz_bin_path.as_deref().is_none_or(str::is_empty) {
            warn!("No hqz binary path set; documents are exported but cannot be rendered as-is.");
        }

        let frames = self.frames(scene);
        if let Some(&first) = frames.first() {
            ensure_parent_dir(&frame_path(&settings.output, first))?;
        }

        let start_time = Instant::now();
        let mut report = ExportReport::default();

        for frame in frames {
            info!("Exporting frame {}", frame);
            if settings.animation {
                scene.set_frame(frame);
            }

            let text = self.build_document(scene).to_json(settings.compact)?;

            let path = frame_path(&settings.output, frame);
            ensure_parent_dir(&path)?;
            fs::write(&path, text).map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;
            debug!("Wrote '{}'", path.display());

            report.frames.push((frame, path));
        }

        info!(
            "Exported {} frame(s) in {:.2?}",
            report.frames.len(),
            start_time.elapsed()
        );
        Ok(report)
    }
}

/// Creates the parent directory of `path` if it does not exist yet.
fn ensure_parent_dir(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
