use crate::scene::material::Material;

/// `[[diffuse, "d"], [transmission, "t"], [specular, "r"]]` on the wire.
pub type MaterialRecord = [(f64, &'static str); 3];

pub fn encode_material(material: &Material) -> MaterialRecord {
    [
        (material.diffuse, "d"),
        (material.transmission, "t"),
        (material.specular, "r"),
    ]
}

/// Encodes the material list in order; position in the output is the material id.
pub fn encode_materials(materials: &[Material]) -> Vec<MaterialRecord> {
    materials.iter().map(encode_material).collect()
}
