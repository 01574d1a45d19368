pub mod angle;
pub mod interpolation;
pub mod transform;
