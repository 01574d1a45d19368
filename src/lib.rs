//! Exports 3D (or flat 2D) scenes to the JSON documents read by the HQZ
//! 2D spectral path tracer.

pub mod app;
pub mod core;
pub mod export;
pub mod io;
pub mod scene;
