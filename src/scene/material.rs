/// Surface response of an edge in the 2D renderer.
///
/// The three coefficients are fractions of the incoming ray that get
/// scattered diffusely, transmitted, or mirrored. Each lies in [0, 1].
/// Materials are referenced from objects by their position in the scene's
/// material list, never by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse: f64,
    pub specular: f64,
    pub transmission: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Material".to_string(),
            diffuse: 0.0,
            specular: 0.0,
            transmission: 0.0,
        }
    }
}

impl Material {
    pub fn new(name: impl Into<String>, diffuse: f64, specular: f64, transmission: f64) -> Self {
        Self {
            name: name.into(),
            diffuse,
            specular,
            transmission,
        }
    }
}
