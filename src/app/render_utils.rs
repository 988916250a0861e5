use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::resources::ResourceKind;

/// Layout-space area the canvas is fitted to, centered and letterboxed.
const VIEW_BOX_SIZE: Vec2 = Vec2::new(800.0, 600.0);

/// Maps view space (after pan/zoom) onto the pixels of the graph canvas.
#[derive(Clone, Copy, Debug)]
pub(super) struct ViewBox {
    origin: Pos2,
    pixels_per_unit: f32,
}

impl ViewBox {
    pub(super) fn fit(rect: Rect) -> Self {
        let pixels_per_unit = (rect.width() / VIEW_BOX_SIZE.x)
            .min(rect.height() / VIEW_BOX_SIZE.y)
            .max(0.01);
        Self {
            origin: rect.center() - (VIEW_BOX_SIZE * 0.5 * pixels_per_unit),
            pixels_per_unit,
        }
    }

    pub(super) fn to_pixels(self, view: Pos2) -> Pos2 {
        self.origin + (view.to_vec2() * self.pixels_per_unit)
    }

    pub(super) fn to_view(self, pixels: Pos2) -> Pos2 {
        ((pixels - self.origin) / self.pixels_per_unit).to_pos2()
    }

    pub(super) fn length_to_pixels(self, length: f32) -> f32 {
        length * self.pixels_per_unit
    }
}

pub(super) fn kind_fill(kind: ResourceKind) -> Color32 {
    match kind {
        ResourceKind::Html => Color32::from_rgb(59, 130, 246),
        ResourceKind::Css => Color32::from_rgb(139, 92, 246),
        ResourceKind::Js => Color32::from_rgb(234, 179, 8),
        ResourceKind::Image => Color32::from_rgb(236, 72, 153),
        ResourceKind::Font => Color32::from_rgb(16, 185, 129),
        ResourceKind::Other => Color32::from_rgb(100, 116, 139),
    }
}

pub(super) fn kind_border(kind: ResourceKind) -> Color32 {
    match kind {
        ResourceKind::Html => Color32::from_rgb(37, 99, 235),
        ResourceKind::Css => Color32::from_rgb(124, 58, 237),
        ResourceKind::Js => Color32::from_rgb(202, 138, 4),
        ResourceKind::Image => Color32::from_rgb(219, 39, 119),
        ResourceKind::Font => Color32::from_rgb(5, 150, 105),
        ResourceKind::Other => Color32::from_rgb(71, 85, 105),
    }
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(
    painter: &Painter,
    rect: Rect,
    view_box: ViewBox,
    pan: Vec2,
    scale: f32,
) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = view_box.length_to_pixels(56.0 * scale.clamp(0.6, 1.8)).max(20.0);
    let origin = view_box.to_pixels(pan.to_pos2());
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}
