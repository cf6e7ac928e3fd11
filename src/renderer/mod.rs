//! WebGPU rendering module
//!
//! Every entity is a filled rectangle, so the whole frame is one colored
//! triangle list rebuilt each frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::{Palette, entity_vertices, rect};
pub use vertex::Vertex;
