//! WebGPU rendering module
//!
//! `scene` turns the game state into flat-colored triangles in field
//! coordinates; `pipeline` maps them onto the canvas and draws them.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;
pub mod viewport;

pub use pipeline::RenderState;
pub use vertex::Vertex;
pub use viewport::Viewport;
