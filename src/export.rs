//! Scene-to-document export for the HQZ 2D path tracer.
//!
//! Each stage reads the active frame of a [`SceneContext`](crate::scene::context::SceneContext)
//! and produces one array of the output document. [`serializer::SceneSerializer`]
//! drives them frame by frame and writes one JSON file per frame.

pub mod document;
pub mod geometry;
pub mod lights;
pub mod materials;
pub mod projector;
pub mod serializer;

use crate::scene::material::Material;
use std::path::PathBuf;
use thiserror::Error;

/// Everything the user configures for one export run. Read-only during the run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Output path prefix. Required.
    pub output: String,
    /// Renderer binary. Only checked for presence, never run here.
    pub hqz_bin_path: Option<String>,
    pub exposure: f64,
    pub gamma: f64,
    pub rays: u64,
    /// Seconds; 0 means no limit and the key is left out.
    pub time_limit: f64,
    pub seed: u64,
    pub normals_export: bool,
    pub normals_invert: bool,
    /// Export the whole frame range instead of the current frame.
    pub animation: bool,
    /// Write single-line JSON instead of indented JSON.
    pub compact: bool,
    /// Referenced by objects through their index in this list.
    pub materials: Vec<Material>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output: String::new(),
            hqz_bin_path: None,
            exposure: 0.5,
            gamma: 2.2,
            rays: 100_000,
            time_limit: 0.0,
            seed: 0,
            normals_export: true,
            normals_invert: false,
            animation: false,
            compact: false,
            materials: Vec::new(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("no export file path set")]
    MissingOutputPath,

    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}
