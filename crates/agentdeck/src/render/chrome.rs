//! Overlays drawn over every slide: position counter, progress bar, nav dots.
//! All of them are read-only views of the navigator.

use eframe::egui;

use crate::navigation::Navigator;
use crate::theme::Theme;

/// Zero-padded "current/total", 1-based: `01/38`.
pub fn position_label(current: usize, total: usize) -> String {
    format!("{:02}/{:02}", current + 1, total)
}

/// Filled share of the progress track, `(current + 1) / total`.
pub fn progress_fraction(current: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (current + 1) as f32 / total as f32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub index: usize,
    pub active: bool,
}

/// One marker per slide, exactly one of them active.
pub fn markers(current: usize, total: usize) -> Vec<Marker> {
    (0..total)
        .map(|index| Marker {
            index,
            active: index == current,
        })
        .collect()
}

/// Draw all overlays. Returns the slide index of a clicked nav dot.
pub fn draw(
    ui: &egui::Ui,
    theme: &Theme,
    rect: egui::Rect,
    nav: &Navigator,
    scale: f32,
) -> Option<usize> {
    draw_counter(ui, theme, rect, nav, scale);
    draw_progress(ui, theme, rect, nav, scale);
    draw_nav_dots(ui, theme, rect, nav, scale)
}

fn draw_counter(ui: &egui::Ui, theme: &Theme, rect: egui::Rect, nav: &Navigator, scale: f32) {
    let color = theme.muted;
    let galley = ui.painter().layout_no_wrap(
        position_label(nav.current(), nav.total()),
        egui::FontId::monospace(18.0 * scale),
        color,
    );
    let pos = egui::pos2(
        rect.left() + 24.0 * scale,
        rect.bottom() - 16.0 * scale - galley.rect.height(),
    );
    ui.painter().galley(pos, galley, color);
}

fn draw_progress(ui: &egui::Ui, theme: &Theme, rect: egui::Rect, nav: &Navigator, scale: f32) {
    let target = progress_fraction(nav.current(), nav.total());
    let fraction = ui
        .ctx()
        .animate_value_with_time(egui::Id::new("progress_bar"), target, 0.2);

    let height = (2.0 * scale).max(1.0);
    let track = egui::Rect::from_min_max(
        egui::pos2(rect.left(), rect.bottom() - height),
        rect.right_bottom(),
    );
    ui.painter().rect_filled(track, 0.0, theme.surface);

    let filled = egui::Rect::from_min_size(
        track.min,
        egui::vec2(track.width() * fraction, height),
    );
    ui.painter().rect_filled(filled, 0.0, theme.accent);
}

fn draw_nav_dots(
    ui: &egui::Ui,
    theme: &Theme,
    rect: egui::Rect,
    nav: &Navigator,
    scale: f32,
) -> Option<usize> {
    let dot = 6.0 * scale;
    let hit = 10.0 * scale;
    let gap = 4.0 * scale;
    let markers = markers(nav.current(), nav.total());
    let column_height = markers.len() as f32 * (hit + gap) - gap;
    let x = rect.right() - 24.0 * scale - hit / 2.0;
    let mut y = rect.center().y - column_height / 2.0;

    let mut clicked = None;
    for marker in markers {
        let center = egui::pos2(x, y + hit / 2.0);
        let hit_rect = egui::Rect::from_center_size(center, egui::vec2(hit, hit));
        let response = ui
            .interact(
                hit_rect,
                ui.id().with(("nav_dot", marker.index)),
                egui::Sense::click(),
            )
            .on_hover_cursor(egui::CursorIcon::PointingHand);

        let (color, radius) = match (marker.active, response.hovered()) {
            (true, true) => (theme.accent, dot * 0.75),
            (true, false) => (theme.accent, dot * 0.665),
            (false, true) => (theme.teal, dot * 0.75),
            (false, false) => (theme.surface, dot * 0.5),
        };
        ui.painter().circle_filled(center, radius, color);

        if response.clicked() {
            clicked = Some(marker.index);
        }
        y += hit + gap;
    }
    clicked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_label_is_zero_padded() {
        assert_eq!(position_label(0, 38), "01/38");
        assert_eq!(position_label(9, 38), "10/38");
        assert_eq!(position_label(0, 5), "01/05");
        assert_eq!(position_label(99, 120), "100/120");
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(progress_fraction(0, 4), 0.25);
        assert_eq!(progress_fraction(3, 4), 1.0);
        assert_eq!(progress_fraction(0, 1), 1.0);
        assert_eq!(progress_fraction(0, 0), 0.0);
    }

    #[test]
    fn test_exactly_one_active_marker() {
        for current in 0..5 {
            let m = markers(current, 5);
            assert_eq!(m.len(), 5);
            let active: Vec<usize> = m.iter().filter(|m| m.active).map(|m| m.index).collect();
            assert_eq!(active, vec![current]);
        }
    }
}
