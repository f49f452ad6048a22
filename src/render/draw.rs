//! Shape drawing operations
//!
//! All coordinates are in the targeted layer's view space; shapes pass
//! through the layer's view transform on their way to the backing
//! surface. Filled and outlined shapes run the visibility reject test
//! first. Line primitives draw unconditionally: a line's endpoints can
//! both sit outside the visible rectangle while the segment crosses it,
//! so lines are exempt from the cull as a matter of policy.

use kurbo::{Point, Size};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Rect, Stroke, Transform};

use super::Renderer;

impl Renderer {
    /// Draws a filled circle centered at `center`.
    pub fn draw_circle(&mut self, center: Point, radius: f64, fill: Color) {
        if !self.is_visible(center, radius) {
            return;
        }
        let mut builder = PathBuilder::new();
        builder.push_circle(center.x as f32, center.y as f32, radius as f32);
        self.fill(builder, fill, Transform::identity());
    }

    /// Draws a filled circle with an outline of `thickness` around it.
    pub fn draw_circle_outlined(
        &mut self,
        center: Point,
        radius: f64,
        thickness: f64,
        fill: Color,
        outline: Color,
    ) {
        if !self.is_visible(center, radius + thickness) {
            return;
        }
        let mut builder = PathBuilder::new();
        builder.push_circle(center.x as f32, center.y as f32, radius as f32);
        self.fill_and_stroke(builder, fill, outline, thickness, Transform::identity());
    }

    /// Draws a filled rectangle with its top-left corner at `position`,
    /// rotated by `rotation` degrees about that corner.
    pub fn draw_rect(&mut self, position: Point, size: Size, fill: Color, rotation: f64) {
        if !self.is_visible(position, size.width.max(size.height)) {
            return;
        }
        if let Some(builder) = rect_path(position, size) {
            self.fill(builder, fill, rotation_about(rotation, position));
        }
    }

    /// Draws a filled rectangle with an outline of `thickness`.
    pub fn draw_rect_outlined(
        &mut self,
        position: Point,
        size: Size,
        thickness: f64,
        fill: Color,
        outline: Color,
        rotation: f64,
    ) {
        if !self.is_visible(position, size.width.max(size.height) + thickness) {
            return;
        }
        if let Some(builder) = rect_path(position, size) {
            self.fill_and_stroke(builder, fill, outline, thickness, rotation_about(rotation, position));
        }
    }

    /// Draws a filled square of side `side`.
    pub fn draw_square(&mut self, position: Point, side: f64, fill: Color, rotation: f64) {
        self.draw_rect(position, Size::new(side, side), fill, rotation);
    }

    /// Draws a filled square with an outline of `thickness`.
    pub fn draw_square_outlined(
        &mut self,
        position: Point,
        side: f64,
        thickness: f64,
        fill: Color,
        outline: Color,
        rotation: f64,
    ) {
        self.draw_rect_outlined(position, Size::new(side, side), thickness, fill, outline, rotation);
    }

    /// Draws a one-pixel line between two points. Never culled.
    pub fn draw_line(&mut self, from: Point, to: Point, color: Color) {
        self.draw_line_thick(from, to, 1.0, color);
    }

    /// Draws a line of the given `thickness` between two points. Never
    /// culled.
    pub fn draw_line_thick(&mut self, from: Point, to: Point, thickness: f64, color: Color) {
        let mut builder = PathBuilder::new();
        builder.move_to(from.x as f32, from.y as f32);
        builder.line_to(to.x as f32, to.y as f32);

        let Some(path) = builder.finish() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color);
        let stroke = Stroke {
            width: thickness as f32,
            ..Stroke::default()
        };
        let transform = self.targeted().view_transform();
        self.targeted_mut()
            .surface
            .stroke_path(&path, &paint, &stroke, transform, None);
    }

    fn fill(&mut self, builder: PathBuilder, fill: Color, shape_transform: Transform) {
        let Some(path) = builder.finish() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(fill);
        let transform = shape_transform.post_concat(self.targeted().view_transform());
        self.targeted_mut()
            .surface
            .fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    fn fill_and_stroke(
        &mut self,
        builder: PathBuilder,
        fill: Color,
        outline: Color,
        thickness: f64,
        shape_transform: Transform,
    ) {
        let Some(path) = builder.finish() else {
            return;
        };
        let transform = shape_transform.post_concat(self.targeted().view_transform());

        let mut paint = Paint::default();
        paint.set_color(fill);
        self.targeted_mut()
            .surface
            .fill_path(&path, &paint, FillRule::Winding, transform, None);

        let mut border = Paint::default();
        border.set_color(outline);
        let stroke = Stroke {
            width: thickness as f32,
            ..Stroke::default()
        };
        self.targeted_mut()
            .surface
            .stroke_path(&path, &border, &stroke, transform, None);
    }
}

fn rect_path(position: Point, size: Size) -> Option<PathBuilder> {
    let rect = Rect::from_xywh(
        position.x as f32,
        position.y as f32,
        size.width as f32,
        size.height as f32,
    )?;
    let mut builder = PathBuilder::new();
    builder.push_rect(rect);
    Some(builder)
}

fn rotation_about(degrees: f64, position: Point) -> Transform {
    if degrees == 0.0 {
        Transform::identity()
    } else {
        Transform::from_rotate_at(degrees as f32, position.x as f32, position.y as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> Renderer {
        Renderer::new(Size::new(16.0, 16.0)).expect("renderer")
    }

    fn pixel_rgb(graphics: &Renderer, x: u32, y: u32) -> (u8, u8, u8) {
        let pixel = graphics.frame().pixel(x, y).expect("pixel");
        (pixel.red(), pixel.green(), pixel.blue())
    }

    #[test]
    fn filled_rect_lands_on_the_surface() {
        let mut graphics = renderer();
        graphics.draw_rect(
            Point::new(2.0, 2.0),
            Size::new(4.0, 4.0),
            Color::from_rgba8(255, 0, 0, 255),
            0.0,
        );
        graphics.render();

        // Surface row 3 lands on frame row 12 after the vertical flip.
        assert_eq!(pixel_rgb(&graphics, 3, 12), (255, 0, 0));
        assert_eq!(pixel_rgb(&graphics, 10, 12), (0, 0, 0));
    }

    #[test]
    fn circle_covers_its_center() {
        let mut graphics = renderer();
        graphics.draw_circle(Point::new(8.0, 8.0), 4.0, Color::from_rgba8(0, 0, 255, 255));
        graphics.render();
        assert_eq!(pixel_rgb(&graphics, 8, 7), (0, 0, 255));
    }

    #[test]
    fn offscreen_shapes_are_culled_without_changing_the_image() {
        let mut graphics = renderer();
        graphics.draw_circle(Point::new(500.0, 500.0), 3.0, Color::from_rgba8(255, 255, 255, 255));
        graphics.draw_square(Point::new(-200.0, -200.0), 5.0, Color::from_rgba8(255, 255, 255, 255), 0.0);
        graphics.render();

        for x in 0..16 {
            for y in 0..16 {
                assert_eq!(pixel_rgb(&graphics, x, y), (0, 0, 0));
            }
        }
    }

    #[test]
    fn lines_draw_even_when_both_endpoints_are_outside() {
        let mut graphics = renderer();
        // Horizontal segment crossing the whole surface at row 8.
        graphics.draw_line_thick(
            Point::new(-50.0, 8.5),
            Point::new(50.0, 8.5),
            1.0,
            Color::from_rgba8(0, 255, 0, 255),
        );
        graphics.render();
        // Surface row 8 maps to frame row 7 after the flip.
        assert_eq!(pixel_rgb(&graphics, 8, 7), (0, 255, 0));
    }

    #[test]
    fn outlined_rect_paints_fill_and_border() {
        let mut graphics = renderer();
        graphics.draw_rect_outlined(
            Point::new(4.0, 4.0),
            Size::new(8.0, 8.0),
            2.0,
            Color::from_rgba8(255, 0, 0, 255),
            Color::from_rgba8(255, 255, 255, 255),
            0.0,
        );
        graphics.render();

        // Stroke is centered on the path edge: surface row 3 is border
        // only, row 8 is interior fill.
        assert_eq!(pixel_rgb(&graphics, 8, 12), (255, 255, 255));
        assert_eq!(pixel_rgb(&graphics, 8, 7), (255, 0, 0));
    }

    #[test]
    fn shapes_respect_the_view_transform() {
        let mut graphics = renderer();
        graphics.scale_view_at(2.0, Point::new(0.0, 0.0));
        // View-space (2,2) lands at surface (4,4) under view scale 2.
        graphics.draw_rect(
            Point::new(2.0, 2.0),
            Size::new(1.0, 1.0),
            Color::from_rgba8(255, 0, 255, 255),
            0.0,
        );
        graphics.render();
        assert_eq!(pixel_rgb(&graphics, 4, 11), (255, 0, 255));
        assert_eq!(pixel_rgb(&graphics, 2, 13), (0, 0, 0));
    }
}
