use crate::export::ExportError;
use crate::export::serializer::{ExportReport, SceneSerializer};
use crate::io::config::{Config, ConfigError};
use crate::scene::loader::{SceneError, build_export_settings, build_scene};
use log::info;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Command-line overrides applied on top of the TOML file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output: Option<String>,
    pub animation: bool,
    pub compact: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.export.output = output.clone();
        }
        config.export.animation |= self.animation;
        config.export.compact |= self.compact;
    }
}

/// Loads the scene described by `config` and exports it (headless).
pub fn run_export(config: &Config) -> Result<ExportReport, AppError> {
    let settings = build_export_settings(config);
    // Checked here too so a missing path fails before any mesh is read from disk.
    if settings.output.trim().is_empty() {
        return Err(ExportError::MissingOutputPath.into());
    }

    let mut scene = build_scene(config)?;
    info!(
        "Exporting {}x{} ({}%), {} material(s)...",
        scene.render.resolution_x,
        scene.render.resolution_y,
        scene.render.resolution_percentage,
        settings.materials.len()
    );

    let report = SceneSerializer::new(&settings).export(&mut scene)?;
    Ok(report)
}
