//! View Transform & Constraints
//!
//! The view transform is the triple `(scale, tx, ty)`: `scale` is image-pixel
//! scale (`1.0` = one image pixel per logical pixel), `tx`/`ty` translate the
//! image center relative to the viewport center in logical units.
//!
//! All user-facing scale bounds are expressed relative to the *fit scale*
//! `F = min(Vw/W, Vh/H)`, the scale at which the image exactly fits the
//! viewport along its tighter axis. The absolute maximum is floored at `1.0`
//! so 1:1 pixel parity is always reachable.

use glam::{Mat4, Vec2, Vec3};

/// Logical viewport size plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical width.
    pub width: f32,
    /// Logical height.
    pub height: f32,
    /// Device pixel ratio reported by the host.
    pub pixel_ratio: f32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Backing-store size in physical pixels for an effective pixel ratio.
    ///
    /// The effective ratio is the device ratio after pressure capping; see
    /// [`MemoryPressure::effective_pixel_ratio`](crate::memory::MemoryPressure::effective_pixel_ratio).
    #[must_use]
    pub fn backing_size(&self, effective_ratio: f32) -> (u32, u32) {
        let w = (self.width * effective_ratio).round().max(1.0) as u32;
        let h = (self.height * effective_ratio).round().max(1.0) as u32;
        (w, h)
    }
}

/// The pan/zoom state: scale and center translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Transform {
    #[must_use]
    pub fn new(scale: f32, tx: f32, ty: f32) -> Self {
        Self { scale, tx, ty }
    }

    /// Identity-at-scale transform (centered).
    #[must_use]
    pub fn centered(scale: f32) -> Self {
        Self {
            scale,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Maps a viewport-space point (logical units, origin top-left) into
    /// image space under this transform.
    #[must_use]
    pub fn viewport_to_image(&self, point: Vec2, viewport: &Viewport) -> Vec2 {
        Vec2::new(
            (point.x - viewport.width * 0.5 - self.tx) / self.scale,
            (point.y - viewport.height * 0.5 - self.ty) / self.scale,
        )
    }
}

/// Scale bounds and translation constraints for a loaded image.
///
/// Owns the geometry-derived quantities: fit scale, absolute scale bounds,
/// the constraint rule and the anchored zoom formula. Pure math; no GPU
/// state.
#[derive(Debug, Clone, Copy)]
pub struct ViewConstraints {
    /// Intrinsic image width in pixels.
    pub image_width: f32,
    /// Intrinsic image height in pixels.
    pub image_height: f32,
    /// Current viewport.
    pub viewport: Viewport,
    /// Minimum scale relative to fit.
    pub min_rel: f32,
    /// Maximum scale relative to fit (floor-overridden to keep 1:1 reachable).
    pub max_rel: f32,
    /// Whether translation is constrained to the viewport bounds.
    pub limit_to_bounds: bool,
}

impl ViewConstraints {
    /// Fit scale `F = min(Vw/W, Vh/H)`.
    #[must_use]
    pub fn fit_scale(&self) -> f32 {
        (self.viewport.width / self.image_width).min(self.viewport.height / self.image_height)
    }

    /// Absolute minimum scale.
    #[must_use]
    pub fn min_scale(&self) -> f32 {
        self.fit_scale() * self.min_rel
    }

    /// Absolute maximum scale, floored at 1.0 so the user can always reach
    /// pixel parity.
    #[must_use]
    pub fn max_scale(&self) -> f32 {
        (self.fit_scale() * self.max_rel).max(1.0)
    }

    /// Relative scale `r = s / F`.
    #[must_use]
    pub fn relative_scale(&self, scale: f32) -> f32 {
        scale / self.fit_scale()
    }

    /// Applies the constraint rule in place.
    ///
    /// Clamps the scale to the absolute bounds; then, when
    /// `limit_to_bounds` is set, forces the image centered while it is
    /// smaller than fit and otherwise clamps the translation so the image
    /// keeps covering the viewport on each axis it exceeds.
    ///
    /// Idempotent: applying it to an already-constrained transform is a
    /// no-op.
    pub fn constrain(&self, transform: &mut Transform) {
        transform.scale = transform.scale.clamp(self.min_scale(), self.max_scale());

        if !self.limit_to_bounds {
            return;
        }

        if transform.scale <= self.fit_scale() {
            transform.tx = 0.0;
            transform.ty = 0.0;
            return;
        }

        let max_tx = ((transform.scale * self.image_width - self.viewport.width) * 0.5).max(0.0);
        let max_ty = ((transform.scale * self.image_height - self.viewport.height) * 0.5).max(0.0);
        transform.tx = transform.tx.clamp(-max_tx, max_tx);
        transform.ty = transform.ty.clamp(-max_ty, max_ty);
    }

    /// Zooms about a viewport-space anchor by `factor`, keeping the image
    /// point under the anchor stationary.
    ///
    /// Returns `None` when the resulting scale would leave the bounds; the
    /// caller treats that as a no-op (no partial scaling, no translation
    /// drift).
    #[must_use]
    pub fn zoom_at(&self, transform: &Transform, anchor: Vec2, factor: f32) -> Option<Transform> {
        let next_scale = transform.scale * factor;
        if next_scale < self.min_scale() || next_scale > self.max_scale() {
            return None;
        }
        Some(self.zoom_to_scale_about(transform, anchor, next_scale))
    }

    /// Rescales toward `target_scale` (clamped to the bounds) about a
    /// viewport-space anchor.
    ///
    /// Used by the double-activation action, which clamps rather than
    /// rejects.
    #[must_use]
    pub fn zoom_to_scale_about(
        &self,
        transform: &Transform,
        anchor: Vec2,
        target_scale: f32,
    ) -> Transform {
        let scale = target_scale.clamp(self.min_scale(), self.max_scale());
        let half = Vec2::new(self.viewport.width * 0.5, self.viewport.height * 0.5);
        let image_point = transform.viewport_to_image(anchor, &self.viewport);

        let mut next = Transform {
            scale,
            tx: anchor.x - half.x - image_point.x * scale,
            ty: anchor.y - half.y - image_point.y * scale,
        };
        self.constrain(&mut next);
        next
    }

    /// Builds the projection matrix for a unit quad at the origin.
    ///
    /// Diagonals `(s*W/Vw, s*H/Vh)` scale the quad to the displayed image
    /// extent in clip space; the translation `(2*tx/Vw, -2*ty/Vh)` moves it
    /// by the pan offset (clip-space y points up, viewport y points down).
    #[must_use]
    pub fn projection_matrix(&self, transform: &Transform) -> Mat4 {
        let sx = transform.scale * self.image_width / self.viewport.width;
        let sy = transform.scale * self.image_height / self.viewport.height;
        let ox = 2.0 * transform.tx / self.viewport.width;
        let oy = -2.0 * transform.ty / self.viewport.height;
        Mat4::from_translation(Vec3::new(ox, oy, 0.0)) * Mat4::from_scale(Vec3::new(sx, sy, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints() -> ViewConstraints {
        ViewConstraints {
            image_width: 8000.0,
            image_height: 6000.0,
            viewport: Viewport::new(800.0, 600.0, 1.0),
            min_rel: 0.1,
            max_rel: 10.0,
            limit_to_bounds: true,
        }
    }

    #[test]
    fn fit_scale_uses_tighter_axis() {
        let c = constraints();
        assert!((c.fit_scale() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn max_scale_floored_at_one() {
        let mut c = constraints();
        c.max_rel = 0.5;
        // F * max_rel = 0.05, floored to 1.0
        assert!((c.max_scale() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn constrain_centers_below_fit() {
        let c = constraints();
        let mut t = Transform::new(0.05, 40.0, -13.0);
        c.constrain(&mut t);
        assert_eq!(t.tx, 0.0);
        assert_eq!(t.ty, 0.0);
    }

    #[test]
    fn zoom_at_rejects_out_of_range() {
        let c = constraints();
        let t = Transform::centered(1.0);
        assert!(c.zoom_at(&t, Vec2::new(0.0, 0.0), 100.0).is_none());
    }
}
