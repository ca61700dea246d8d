//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment shader.
//! The renderer only reads game state; it never mutates it.

pub mod sdf_pipeline;

pub use sdf_pipeline::{SceneUniforms, SdfRenderState, letterbox};
