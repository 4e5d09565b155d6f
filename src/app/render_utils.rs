use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
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

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));
}

/// Outline of the world canvas the simulation and pin clamping operate in.
pub(super) fn draw_canvas_frame(
    painter: &Painter,
    rect: Rect,
    pan: Vec2,
    zoom: f32,
    canvas_center: Vec2,
    canvas_size: Vec2,
) {
    let top_left = world_to_screen(rect, pan, zoom, canvas_center, Vec2::ZERO);
    let bottom_right = world_to_screen(rect, pan, zoom, canvas_center, canvas_size);
    painter.rect_stroke(
        Rect::from_two_pos(top_left, bottom_right),
        0.0,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(90, 104, 120, 120)),
        eframe::egui::StrokeKind::Outside,
    );
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

pub(super) fn world_to_screen(
    rect: Rect,
    pan: Vec2,
    zoom: f32,
    canvas_center: Vec2,
    world: Vec2,
) -> Pos2 {
    rect.center() + pan + ((world - canvas_center) * zoom)
}

pub(super) fn screen_to_world(
    rect: Rect,
    pan: Vec2,
    zoom: f32,
    canvas_center: Vec2,
    screen: Pos2,
) -> Vec2 {
    canvas_center + ((screen - rect.center() - pan) / zoom)
}

/// Maps a link's distance value into a stroke: closer neighbors draw
/// stronger. `min`/`max` are the document-wide value range.
pub(super) fn edge_color(value: f32, min: f32, max: f32) -> Color32 {
    let span = (max - min).max(f32::EPSILON);
    let t = ((value - min) / span).clamp(0.0, 1.0);
    let alpha = (200.0 - (t * 130.0)) as u8;
    Color32::from_rgba_unmultiplied(110, 126, 146, alpha)
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn world_screen_transforms_round_trip() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        let pan = vec2(13.0, -7.0);
        let zoom = 1.7;
        let center = vec2(1024.0, 512.0);

        let world = vec2(312.5, 777.25);
        let screen = world_to_screen(rect, pan, zoom, center, world);
        let back = screen_to_world(rect, pan, zoom, center, screen);
        assert!((back - world).length() < 0.001);
    }

    #[test]
    fn offscreen_circles_are_culled() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0));
        assert!(circle_visible(rect, pos2(50.0, 50.0), 5.0));
        assert!(circle_visible(rect, pos2(-2.0, 50.0), 5.0));
        assert!(!circle_visible(rect, pos2(-20.0, 50.0), 5.0));
    }

    #[test]
    fn closer_edges_draw_stronger() {
        let near = edge_color(0.1, 0.1, 0.9);
        let far = edge_color(0.9, 0.1, 0.9);
        assert!(near.a() > far.a());
    }
}
