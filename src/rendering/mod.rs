pub mod global_uniform;
pub mod mesh_buffers;
pub mod passes;
pub mod render_common;
pub mod renderer;
pub mod texture;

pub use renderer::Renderer;
