//! Layered coordinate-transform renderer
//!
//! Owns the layer table and the window frame surface. Applications draw
//! through a "targeted" layer selected up front; coordinates move
//! between screen space, layer space, and view space through the four
//! transform functions, and [`Renderer::render`] composites every
//! enabled layer onto the frame in ascending id order.

mod draw;
mod layer;

pub use layer::LayerId;

use kurbo::{Point, Size, Vec2};
use tiny_skia::{Color, Pixmap, PixmapPaint};

use crate::geometry::surface_dimensions;
use layer::{Layer, LayerTable};

/// Rendering errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("failed to allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("invalid surface size: {width}x{height}")]
    InvalidSurfaceSize { width: f64, height: f64 },

    #[error("unknown layer id {0}")]
    UnknownLayer(LayerId),
}

/// Layered renderer compositing into an off-screen window frame.
///
/// The frame is blitted to the real window by the external driver; the
/// renderer itself never touches the OS.
#[derive(Debug)]
pub struct Renderer {
    table: LayerTable,
    default_layer: LayerId,
    targeted: LayerId,
    frame: Pixmap,
}

impl Renderer {
    /// Creates a renderer with a window-sized frame and a window-sized,
    /// targeted default layer.
    pub fn new(window_size: Size) -> Result<Self, RenderError> {
        let (width, height) = checked_dimensions(window_size)?;
        let frame = Pixmap::new(width, height).ok_or_else(|| {
            tracing::error!(width, height, "couldn't allocate the window frame");
            RenderError::SurfaceAllocation { width, height }
        })?;

        let mut renderer = Self {
            table: LayerTable::new(),
            default_layer: 0,
            targeted: 0,
            frame,
        };
        let default_layer = renderer.create_layer(window_size)?;
        renderer.default_layer = default_layer;
        renderer.targeted = default_layer;
        Ok(renderer)
    }

    /// Allocates a new enabled layer with identity transforms. The new
    /// id is one above the highest ever issued; ids are never reused.
    /// On failure the table is left unchanged.
    pub fn create_layer(&mut self, size: Size) -> Result<LayerId, RenderError> {
        let (width, height) = checked_dimensions(size)?;
        let id = self.table.insert(width, height).ok_or_else(|| {
            tracing::error!(width, height, "couldn't create layer surface");
            RenderError::SurfaceAllocation { width, height }
        })?;
        tracing::debug!(id, width, height, "created layer");
        Ok(id)
    }

    /// Allocates a layer matching the current window dimensions.
    pub fn create_layer_matching_window(&mut self) -> Result<LayerId, RenderError> {
        self.create_layer(self.window_size())
    }

    /// Retargets drawing and transform operations to `id`. Returns false
    /// and leaves the target unchanged when `id` does not exist.
    pub fn set_targeted_layer(&mut self, id: LayerId) -> bool {
        if self.table.contains(id) {
            self.targeted = id;
            true
        } else {
            false
        }
    }

    /// Layer currently receiving drawing and transform operations.
    pub fn targeted_layer(&self) -> LayerId {
        self.targeted
    }

    /// The layer created at initialization.
    pub fn default_layer(&self) -> LayerId {
        self.default_layer
    }

    /// Retargets the default layer.
    pub fn target_default_layer(&mut self) {
        self.targeted = self.default_layer;
    }

    /// Toggles whether `id` participates in compositing.
    pub fn enable_layer(&mut self, id: LayerId, enabled: bool) -> Result<(), RenderError> {
        let layer = self.table.get_mut(id).ok_or(RenderError::UnknownLayer(id))?;
        layer.enabled = enabled;
        tracing::debug!(id = layer.id, enabled, "layer toggled");
        Ok(())
    }

    /// Whether `id` participates in compositing.
    pub fn is_layer_enabled(&self, id: LayerId) -> Result<bool, RenderError> {
        self.table
            .get(id)
            .map(|layer| layer.enabled)
            .ok_or(RenderError::UnknownLayer(id))
    }

    /// Adds `delta` to the targeted layer's screen-space offset.
    pub fn offset_layer(&mut self, delta: Vec2) {
        self.targeted_mut().offset += delta;
    }

    /// Anchored zoom of the layer transform: the world point under
    /// `screen_anchor` stays visually stationary across the change.
    pub fn scale_layer_at(&mut self, new_scale: f64, screen_anchor: Point) {
        if !is_valid_scale(new_scale) {
            tracing::warn!(new_scale, "rejected degenerate layer scale");
            return;
        }
        let before = self.screen_to_layer(screen_anchor);
        self.targeted_mut().scale = new_scale;
        let after = self.layer_to_screen(before);
        self.targeted_mut().offset -= after - screen_anchor;
    }

    /// Pans the view transform by a screen-space `delta`. The view
    /// offset lives in layer-local units inside the already-scaled layer
    /// space, hence the double division.
    pub fn offset_view(&mut self, delta: Vec2) {
        let layer = self.targeted_mut();
        layer.view_offset -= delta / layer.view_scale / layer.scale;
    }

    /// Anchored zoom of the nested view transform; same algorithm as
    /// [`Renderer::scale_layer_at`] one level deeper.
    pub fn scale_view_at(&mut self, new_scale: f64, screen_anchor: Point) {
        if !is_valid_scale(new_scale) {
            tracing::warn!(new_scale, "rejected degenerate view scale");
            return;
        }
        let before = self.screen_to_view(screen_anchor);
        self.targeted_mut().view_scale = new_scale;
        let after = self.view_to_screen(before);
        let layer = self.targeted_mut();
        layer.view_offset += (after - screen_anchor) / new_scale / layer.scale;
    }

    /// Scale of the targeted layer's transform.
    pub fn layer_scale(&self) -> f64 {
        self.targeted().scale
    }

    /// Screen-space offset of the targeted layer.
    pub fn layer_offset(&self) -> Vec2 {
        self.targeted().offset
    }

    /// Surface dimensions of the targeted layer.
    pub fn layer_size(&self) -> Size {
        self.targeted().size()
    }

    /// Scale of the targeted layer's view transform.
    pub fn view_scale(&self) -> f64 {
        self.targeted().view_scale
    }

    /// Offset of the targeted layer's view transform.
    pub fn view_offset(&self) -> Vec2 {
        self.targeted().view_offset
    }

    /// Reallocates the targeted layer's surface. On failure the existing
    /// surface stays intact and the layer survives.
    pub fn resize_layer(&mut self, new_size: Size) -> Result<(), RenderError> {
        let (width, height) = checked_dimensions(new_size)?;
        let surface = Pixmap::new(width, height).ok_or_else(|| {
            tracing::error!(
                id = self.targeted,
                width,
                height,
                "couldn't resize layer surface"
            );
            RenderError::SurfaceAllocation { width, height }
        })?;
        self.targeted_mut().surface = surface;
        Ok(())
    }

    /// Reallocates the window frame after a window resize.
    pub fn resize_window(&mut self, new_size: Size) -> Result<(), RenderError> {
        let (width, height) = checked_dimensions(new_size)?;
        self.frame = Pixmap::new(width, height).ok_or_else(|| {
            tracing::error!(width, height, "couldn't resize the window frame");
            RenderError::SurfaceAllocation { width, height }
        })?;
        Ok(())
    }

    /// Current window frame dimensions.
    pub fn window_size(&self) -> Size {
        Size::new(f64::from(self.frame.width()), f64::from(self.frame.height()))
    }

    /// Fills the targeted layer's surface with `color`.
    pub fn clear(&mut self, color: Color) {
        self.targeted_mut().surface.fill(color);
    }

    /// Maps a screen point into the targeted layer's local space.
    pub fn screen_to_layer(&self, coord: Point) -> Point {
        let layer = self.targeted();
        ((coord.to_vec2() - layer.offset) / layer.scale).to_point()
    }

    /// Maps a layer-local point back to screen space. Exact inverse of
    /// [`Renderer::screen_to_layer`] for positive scale.
    pub fn layer_to_screen(&self, coord: Point) -> Point {
        let layer = self.targeted();
        (layer.offset + coord.to_vec2() * layer.scale).to_point()
    }

    /// Maps a screen point through both nested transforms into view space.
    pub fn screen_to_view(&self, coord: Point) -> Point {
        let layer = self.targeted();
        (layer.view_offset + self.screen_to_layer(coord).to_vec2() / layer.view_scale).to_point()
    }

    /// Maps a view-space point back to screen space. Exact inverse of
    /// [`Renderer::screen_to_view`] for positive scales.
    pub fn view_to_screen(&self, coord: Point) -> Point {
        let layer = self.targeted();
        let local = (coord.to_vec2() - layer.view_offset) * layer.view_scale;
        self.layer_to_screen(local.to_point())
    }

    /// Whether a view-space position lies within the currently visible
    /// rectangle, expanded by `radius` on all sides.
    ///
    /// The rectangle is the targeted layer's surface mapped through
    /// [`Renderer::screen_to_view`], with the lower-right corner clamped
    /// to the window extent so visibility never exceeds the physical
    /// window even when the layer surface is larger. Boundary points
    /// count as visible. This is purely a cheap reject test for the
    /// drawing operations; skipping it never changes the final image.
    pub fn is_visible(&self, world_pos: Point, radius: f64) -> bool {
        let size = self.layer_size();
        let top_left = self.screen_to_view(self.layer_to_screen(Point::ORIGIN));
        let mut bottom_right =
            self.screen_to_view(self.layer_to_screen(Point::new(size.width, size.height)));
        let window_limit = self.screen_to_view(self.window_size().to_vec2().to_point());
        bottom_right.x = bottom_right.x.min(window_limit.x);
        bottom_right.y = bottom_right.y.min(window_limit.y);

        world_pos.x >= top_left.x - radius
            && world_pos.y >= top_left.y - radius
            && world_pos.x <= bottom_right.x + radius
            && world_pos.y <= bottom_right.y + radius
    }

    /// Composites every enabled layer onto the window frame in ascending
    /// id order and returns the frame for the driver to blit.
    pub fn render(&mut self) -> &Pixmap {
        self.frame.fill(Color::BLACK);
        let paint = PixmapPaint::default();
        for layer in self.table.iter_ascending() {
            if layer.enabled {
                self.frame.draw_pixmap(
                    0,
                    0,
                    layer.surface.as_ref(),
                    &paint,
                    layer.compose_transform(),
                    None,
                );
            }
        }
        &self.frame
    }

    /// The last composited frame without re-rendering.
    pub fn frame(&self) -> &Pixmap {
        &self.frame
    }

    // The targeted id always references a live entry: it is only ever
    // set through set_targeted_layer / target_default_layer, and layers
    // are never removed from the table.
    fn targeted(&self) -> &Layer {
        self.table
            .get(self.targeted)
            .expect("targeted layer references an existing entry")
    }

    fn targeted_mut(&mut self) -> &mut Layer {
        self.table
            .get_mut(self.targeted)
            .expect("targeted layer references an existing entry")
    }
}

fn checked_dimensions(size: Size) -> Result<(u32, u32), RenderError> {
    surface_dimensions(size).ok_or(RenderError::InvalidSurfaceSize {
        width: size.width,
        height: size.height,
    })
}

fn is_valid_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: Point, expected: Point) {
        assert!(
            (actual.x - expected.x).abs() < EPSILON && (actual.y - expected.y).abs() < EPSILON,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn renderer() -> Renderer {
        Renderer::new(Size::new(800.0, 600.0)).expect("renderer")
    }

    #[test]
    fn initializes_with_a_targeted_default_layer() {
        let graphics = renderer();
        assert_eq!(graphics.targeted_layer(), graphics.default_layer());
        assert_eq!(graphics.layer_size(), Size::new(800.0, 600.0));
        assert_eq!(graphics.layer_scale(), 1.0);
    }

    #[test]
    fn create_layer_with_degenerate_size_fails_without_consuming_an_id() {
        let mut graphics = renderer();
        let result = graphics.create_layer(Size::new(0.0, 100.0));
        assert!(matches!(result, Err(RenderError::InvalidSurfaceSize { .. })));

        let next = graphics.create_layer(Size::new(10.0, 10.0)).expect("layer");
        assert_eq!(next, 2, "failed creation must not consume an id");
    }

    #[test]
    fn set_targeted_layer_rejects_unknown_ids() {
        let mut graphics = renderer();
        let before = graphics.targeted_layer();
        assert!(!graphics.set_targeted_layer(99));
        assert_eq!(graphics.targeted_layer(), before);

        let id = graphics.create_layer(Size::new(16.0, 16.0)).expect("layer");
        assert!(graphics.set_targeted_layer(id));
        assert_eq!(graphics.targeted_layer(), id);

        graphics.target_default_layer();
        assert_eq!(graphics.targeted_layer(), graphics.default_layer());
    }

    #[test]
    fn enable_layer_fails_explicitly_for_unknown_ids() {
        let mut graphics = renderer();
        assert_eq!(graphics.enable_layer(42, false), Err(RenderError::UnknownLayer(42)));
        assert_eq!(graphics.is_layer_enabled(42), Err(RenderError::UnknownLayer(42)));

        let id = graphics.default_layer();
        graphics.enable_layer(id, false).expect("known layer");
        assert_eq!(graphics.is_layer_enabled(id), Ok(false));
    }

    #[test]
    fn layer_transform_round_trips() {
        let mut graphics = renderer();
        graphics.offset_layer(Vec2::new(37.0, -12.5));
        graphics.scale_layer_at(2.5, Point::new(100.0, 100.0));

        for point in [
            Point::new(0.0, 0.0),
            Point::new(400.0, 300.0),
            Point::new(-15.0, 782.0),
        ] {
            assert_close(graphics.layer_to_screen(graphics.screen_to_layer(point)), point);
        }
    }

    #[test]
    fn view_transform_round_trips() {
        let mut graphics = renderer();
        graphics.offset_layer(Vec2::new(20.0, 10.0));
        graphics.scale_layer_at(1.5, Point::new(0.0, 0.0));
        graphics.offset_view(Vec2::new(-30.0, 45.0));
        graphics.scale_view_at(3.0, Point::new(200.0, 150.0));

        for point in [Point::new(0.0, 0.0), Point::new(400.0, 300.0)] {
            assert_close(graphics.view_to_screen(graphics.screen_to_view(point)), point);
        }
    }

    #[test]
    fn anchored_layer_zoom_keeps_the_anchor_stationary() {
        let mut graphics = renderer();
        graphics.offset_layer(Vec2::new(50.0, 80.0));

        let anchor = Point::new(400.0, 300.0);
        let world_before = graphics.screen_to_layer(anchor);
        graphics.scale_layer_at(2.0, anchor);

        assert_eq!(graphics.layer_scale(), 2.0);
        assert_close(graphics.screen_to_layer(anchor), world_before);
    }

    #[test]
    fn anchored_view_zoom_keeps_the_anchor_stationary() {
        let mut graphics = renderer();
        graphics.scale_layer_at(1.25, Point::new(10.0, 10.0));
        graphics.offset_view(Vec2::new(12.0, -7.0));

        let anchor = Point::new(250.0, 420.0);
        let world_before = graphics.screen_to_view(anchor);
        graphics.scale_view_at(0.5, anchor);

        assert_eq!(graphics.view_scale(), 0.5);
        assert_close(graphics.screen_to_view(anchor), world_before);
    }

    #[test]
    fn degenerate_scales_are_rejected() {
        let mut graphics = renderer();
        graphics.scale_layer_at(0.0, Point::new(0.0, 0.0));
        assert_eq!(graphics.layer_scale(), 1.0);

        graphics.scale_layer_at(-2.0, Point::new(0.0, 0.0));
        assert_eq!(graphics.layer_scale(), 1.0);

        graphics.scale_view_at(f64::NAN, Point::new(0.0, 0.0));
        assert_eq!(graphics.view_scale(), 1.0);
    }

    #[test]
    fn visibility_includes_the_boundary() {
        let graphics = renderer();
        // Identity transforms: visible rectangle is the window extent.
        assert!(graphics.is_visible(Point::new(0.0, 0.0), 0.0));
        assert!(graphics.is_visible(Point::new(800.0, 600.0), 0.0));
        assert!(!graphics.is_visible(Point::new(801.0, 300.0), 0.0));
        assert!(!graphics.is_visible(Point::new(400.0, -1.0), 0.0));
    }

    #[test]
    fn visibility_expands_by_radius() {
        let graphics = renderer();
        assert!(graphics.is_visible(Point::new(-10.0, 300.0), 10.0));
        assert!(!graphics.is_visible(Point::new(-10.0, 300.0), 9.0));
        assert!(graphics.is_visible(Point::new(400.0, 610.0), 10.0));
        assert!(!graphics.is_visible(Point::new(400.0, 620.5), 20.0));
    }

    #[test]
    fn visibility_clamps_to_the_window_extent() {
        let mut graphics = Renderer::new(Size::new(100.0, 100.0)).expect("renderer");
        let big = graphics.create_layer(Size::new(500.0, 500.0)).expect("layer");
        assert!(graphics.set_targeted_layer(big));

        assert!(graphics.is_visible(Point::new(100.0, 100.0), 0.0));
        assert!(
            !graphics.is_visible(Point::new(300.0, 300.0), 0.0),
            "points beyond the window are not visible even on a larger surface"
        );
    }

    #[test]
    fn scale_scenario_from_the_contract() {
        let mut graphics = renderer();
        let id = graphics.create_layer(Size::new(800.0, 600.0)).expect("layer");
        assert!(graphics.set_targeted_layer(id));

        let anchor = Point::new(400.0, 300.0);
        let world_before = graphics.screen_to_layer(anchor);
        graphics.scale_layer_at(2.0, anchor);

        assert_eq!(graphics.layer_scale(), 2.0);
        assert_close(graphics.screen_to_layer(anchor), world_before);
    }

    #[test]
    fn resize_layer_failure_keeps_the_old_surface() {
        let mut graphics = renderer();
        let result = graphics.resize_layer(Size::new(-5.0, 10.0));
        assert!(matches!(result, Err(RenderError::InvalidSurfaceSize { .. })));
        assert_eq!(
            graphics.layer_size(),
            Size::new(800.0, 600.0),
            "failed resize must leave the layer intact"
        );

        graphics.resize_layer(Size::new(64.0, 32.0)).expect("resize");
        assert_eq!(graphics.layer_size(), Size::new(64.0, 32.0));
    }

    #[test]
    fn resize_window_updates_the_frame() {
        let mut graphics = renderer();
        graphics.resize_window(Size::new(1024.0, 768.0)).expect("resize");
        assert_eq!(graphics.window_size(), Size::new(1024.0, 768.0));
    }

    #[test]
    fn render_composites_in_ascending_id_order() {
        let mut graphics = Renderer::new(Size::new(1.0, 1.0)).expect("renderer");
        graphics.clear(Color::from_rgba8(255, 0, 0, 255));

        let top = graphics.create_layer(Size::new(1.0, 1.0)).expect("layer");
        assert!(graphics.set_targeted_layer(top));
        graphics.clear(Color::from_rgba8(0, 0, 255, 255));

        let frame = graphics.render();
        let pixel = frame.pixel(0, 0).expect("pixel");
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (0, 0, 255));

        graphics.enable_layer(top, false).expect("known layer");
        let frame = graphics.render();
        let pixel = frame.pixel(0, 0).expect("pixel");
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (255, 0, 0));
    }

    #[test]
    fn render_flips_layers_vertically() {
        let mut graphics = Renderer::new(Size::new(1.0, 2.0)).expect("renderer");
        // Paint only the surface's top row; after the flip it must land
        // on the frame's bottom row.
        graphics.draw_rect(
            Point::new(0.0, 0.0),
            Size::new(1.0, 1.0),
            Color::from_rgba8(0, 255, 0, 255),
            0.0,
        );

        let frame = graphics.render();
        let bottom = frame.pixel(0, 1).expect("pixel");
        assert_eq!((bottom.red(), bottom.green(), bottom.blue()), (0, 255, 0));
        let top = frame.pixel(0, 0).expect("pixel");
        assert_eq!((top.red(), top.green(), top.blue()), (0, 0, 0));
    }
}
