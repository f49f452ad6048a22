//! Geometry primitives shared across the shell
//!
//! Vector arithmetic is provided by `kurbo`; this module re-exports the
//! handful of types the rest of the crate speaks in and adds the small
//! conversions the renderer needs when talking to pixel surfaces.

pub use kurbo::{Point, Size, Vec2};

/// Converts a logical size into concrete surface pixel dimensions.
///
/// Returns `None` for degenerate requests: non-finite components, or
/// either dimension below one pixel. Surface allocation never sees a
/// zero or negative extent.
pub(crate) fn surface_dimensions(size: Size) -> Option<(u32, u32)> {
    if !size.width.is_finite() || !size.height.is_finite() {
        return None;
    }
    if size.width < 1.0 || size.height < 1.0 {
        return None;
    }
    Some((size.width as u32, size.height as u32))
}
