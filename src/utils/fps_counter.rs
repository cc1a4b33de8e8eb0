use std::time::Instant;

/// Frame clock: rolling one-second FPS window plus the last frame time.
pub struct FpsCounter {
    last_update: Instant,
    last_frame: Instant,
    frame_count: u32,
    pub current_fps: f32,
    pub last_frame_ms: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_update: now,
            last_frame: now,
            frame_count: 0,
            current_fps: 0.0,
            last_frame_ms: 0.0,
        }
    }

    /// Call once per frame. Returns the new FPS value once per second.
    pub fn update(&mut self) -> Option<f32> {
        self.frame_count += 1;
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.last_frame_ms = delta.as_secs_f32() * 1000.0;

        // Update statistics every 1 second
        if now.duration_since(self.last_update).as_secs_f32() >= 1.0 {
            let window = now.duration_since(self.last_update).as_secs_f32();
            self.current_fps = self.frame_count as f32 / window;

            self.last_update = now;
            self.frame_count = 0;

            return Some(self.current_fps);
        }

        None
    }
}
