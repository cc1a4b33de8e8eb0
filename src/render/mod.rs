//! GPU context and the textured-quad pipeline.

pub mod context;
pub mod pipeline;

pub use context::GpuContext;
pub use pipeline::QuadPipeline;
