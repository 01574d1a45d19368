use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector3};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("failed to load OBJ '{path}': {source}")]
    Obj {
        path: String,
        #[source]
        source: tobj::LoadError,
    },
}

/// Loads an OBJ file and returns a unified Mesh with polygon edges.
///
/// Faces are kept as authored (no triangulation) so the edge list matches
/// what the modeller sees. Vertex normals come from the file when present,
/// otherwise they are computed from the faces.
///
/// # Arguments
/// * `path` - The file path to the .obj file.
pub fn load_obj(path: &str) -> Result<Mesh, LoadError> {
    let path_obj = Path::new(path);
    if !path_obj.exists() {
        return Err(LoadError::NotFound(path.to_string()));
    }

    info!("Loading OBJ file: {}", path);

    let load_options = tobj::LoadOptions {
        triangulate: false,
        single_index: false, // Keep position indices so shared corners stay shared
        ..Default::default()
    };

    let (models, _materials) =
        tobj::load_obj(path_obj, &load_options).map_err(|source| LoadError::Obj {
            path: path.to_string(),
            source,
        })?;

    let mut positions = Vec::new();
    let mut normals: Vec<Vector3<f64>> = Vec::new();
    let mut faces = Vec::new();
    let mut all_have_normals = true;

    // Iterate over all models found in the OBJ file
    for model in models {
        let mesh = &model.mesh;
        let index_offset = positions.len() as u32;
        let num_vertices = mesh.positions.len() / 3;

        for p in mesh.positions.chunks_exact(3) {
            positions.push(Point3::new(p[0] as f64, p[1] as f64, p[2] as f64));
        }

        let has_normals = !mesh.normals.is_empty() && mesh.normal_indices.len() == mesh.indices.len();
        if !has_normals {
            warn!(
                "Mesh '{}' is missing normals. Computing them from faces.",
                model.name
            );
            all_have_normals = false;
        }

        // Per-position normal: last face corner referencing it wins.
        let mut model_normals = vec![Vector3::zeros(); num_vertices];
        if has_normals {
            for (pos_idx, nrm_idx) in mesh.indices.iter().zip(&mesh.normal_indices) {
                let n = *nrm_idx as usize * 3;
                if let (Some(slot), Some(v)) = (
                    model_normals.get_mut(*pos_idx as usize),
                    mesh.normals.get(n..n + 3),
                ) {
                    *slot = Vector3::new(v[0] as f64, v[1] as f64, v[2] as f64);
                }
            }
        }
        normals.extend(model_normals);

        // No face_arities means every face is a triangle.
        let arities: Vec<usize> = if mesh.face_arities.is_empty() {
            vec![3; mesh.indices.len() / 3]
        } else {
            mesh.face_arities.iter().map(|&a| a as usize).collect()
        };

        let mut cursor = 0;
        for arity in arities {
            let Some(face) = mesh.indices.get(cursor..cursor + arity) else {
                break;
            };
            faces.push(face.iter().map(|i| i + index_offset).collect::<Vec<u32>>());
            cursor += arity;
        }
    }

    let mesh = Mesh::from_polygons(positions, &faces, all_have_normals.then_some(normals));

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total edges: {}",
        mesh.vertices.len(),
        mesh.edges.len()
    );

    Ok(mesh)
}
