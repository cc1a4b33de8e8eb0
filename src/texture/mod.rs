//! LOD Textures, Factory & Cache
//!
//! A [`LodTexture`] is one GPU texture holding the source image rescaled for
//! a single LOD level. The [`factory`](crate::texture::factory) produces
//! them (off-thread when possible), the [`cache`](crate::texture::cache)
//! owns at most one of them plus a staged successor awaiting the frame-
//! boundary swap.

pub mod cache;
pub mod factory;

use std::time::Instant;

pub use cache::LodCache;
pub use factory::TextureFactory;

/// One GPU texture at a specific LOD level.
pub struct LodTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,

    /// Texture width after LOD scaling and size capping.
    pub width: u32,
    /// Texture height after LOD scaling and size capping.
    pub height: u32,
    /// LOD level index this texture was produced for.
    pub level: usize,
    /// RGBA8 footprint: `4 * width * height`.
    pub byte_size: u64,
    /// Last time this texture was drawn or installed.
    pub last_used: Instant,
}

impl LodTexture {
    /// Releases the GPU allocation eagerly instead of waiting for drop.
    pub fn destroy(self) {
        self.texture.destroy();
    }
}
