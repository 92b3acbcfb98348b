//! WebGPU rendering module
//!
//! Boxes are expanded to lit triangles and guide lines to a line list;
//! both are drawn with a depth buffer from the orbit camera.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
