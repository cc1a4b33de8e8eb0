//! Single-Entry LOD Cache
//!
//! The cache intentionally holds at most one LOD texture. A 40 MP image at
//! full resolution is ~160 MB of RGBA8; holding two or three levels
//! concurrently blows straight past the budget. The engine trades one frame
//! of visual lag at an LOD boundary for a hard `4*W*H` ceiling: the old
//! texture is destroyed *before* its replacement is allocated.
//!
//! Slot protocol: the staged successor is moved into `back` on arm and taken
//! out on the frame-boundary swap, so no draw ever observes a half-installed
//! texture and no texture is aliased across the boundary.

use super::LodTexture;

/// Front/back texture slots plus byte accounting and a request generation.
pub struct LodCache {
    front: Option<LodTexture>,
    back: Option<LodTexture>,
    texture_bytes: u64,
    generation: u64,
}

impl Default for LodCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LodCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            front: None,
            back: None,
            texture_bytes: 0,
            generation: 0,
        }
    }

    /// Total bytes currently held (front plus staged back).
    #[must_use]
    pub fn texture_bytes(&self) -> u64 {
        self.texture_bytes
    }

    /// The texture draws read from.
    #[must_use]
    pub fn front(&self) -> Option<&LodTexture> {
        self.front.as_ref()
    }

    /// LOD level of the front texture, if any.
    #[must_use]
    pub fn front_level(&self) -> Option<usize> {
        self.front.as_ref().map(|t| t.level)
    }

    /// Whether a staged texture is waiting for the next frame boundary.
    #[must_use]
    pub fn swap_armed(&self) -> bool {
        self.back.is_some()
    }

    /// Current request generation. Results produced under an older
    /// generation are stale and must be discarded.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidates in-flight production without touching textures.
    pub fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Destroys every held texture and starts a new generation.
    ///
    /// Called immediately before allocating a replacement, and on teardown.
    pub fn evict_all(&mut self) {
        if let Some(texture) = self.front.take() {
            log::debug!("evicting front LOD {} ({} bytes)", texture.level, texture.byte_size);
            self.texture_bytes -= texture.byte_size;
            texture.destroy();
        }
        self.evict_back();
        self.generation += 1;
    }

    /// Destroys the staged texture only, keeping the front visible.
    ///
    /// Used by the emergency cleanup under critical pressure.
    pub fn evict_back(&mut self) {
        if let Some(texture) = self.back.take() {
            self.texture_bytes -= texture.byte_size;
            texture.destroy();
        }
    }

    /// Installs a texture directly as the front. Bootstrap only; any staged
    /// or previous texture is destroyed first.
    pub fn install_front(&mut self, texture: LodTexture) {
        self.evict_all();
        self.texture_bytes += texture.byte_size;
        self.front = Some(texture);
    }

    /// Moves a produced texture into the back slot, arming the swap.
    pub fn arm(&mut self, texture: LodTexture) {
        self.evict_back();
        self.texture_bytes += texture.byte_size;
        self.back = Some(texture);
    }

    /// Atomically promotes `back` to `front` between frames.
    ///
    /// Returns the new front level when a swap happened.
    pub fn swap(&mut self) -> Option<usize> {
        let mut incoming = self.back.take()?;
        incoming.last_used = std::time::Instant::now();
        let level = incoming.level;
        if let Some(old) = self.front.replace(incoming) {
            self.texture_bytes -= old.byte_size;
            old.destroy();
        }
        Some(level)
    }

    /// Marks the front texture as used this frame.
    pub fn touch_front(&mut self) {
        if let Some(front) = &mut self.front {
            front.last_used = std::time::Instant::now();
        }
    }

    /// Number of textures currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.front.is_some()) + usize::from(self.back.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
