use eframe::egui::{self, FontId, Pos2, Rect};

use crate::deck::Breadcrumb;
use crate::render::image_cache::ImageCache;
use crate::render::text::{self, reveal};
use crate::render::{SlideCtx, SlideOutput};
use crate::theme::Theme;

/// Centered title over an image scaled to fit, at most 60% of the slide height.
pub fn render(
    cx: &SlideCtx,
    section: Option<&Breadcrumb>,
    title: &str,
    image_src: &str,
    image_alt: Option<&str>,
    images: &ImageCache,
) -> SlideOutput {
    let ui = cx.ui;
    let theme = cx.theme;
    let scale = cx.scale;
    let area = cx.content_rect();
    let center_x = area.center().x;

    let max_image = egui::vec2(area.width(), cx.rect.height() * 0.6);
    let texture = images.get_or_load(ui, image_src);
    let image_size = match &texture {
        Some(texture) => fit(texture.size_vec2(), max_image),
        None => egui::vec2(max_image.x * 0.5, max_image.y * 0.6),
    };

    let breadcrumb_h = section.map_or(0.0, |_| 40.0 * scale + 8.0 * scale);
    let title_font = FontId::proportional(theme.title_size * scale);
    let title_h = title_font.size * 1.2 + 32.0 * scale;
    let mut y = area.center().y - (breadcrumb_h + title_h + image_size.y) / 2.0;

    if let Some(breadcrumb) = section {
        let (opacity, rise) = cx.entrance(0.0);
        let width = breadcrumb_width(ui, breadcrumb, scale);
        text::draw_breadcrumb(
            ui,
            breadcrumb,
            theme,
            Pos2::new(center_x - width / 2.0, y + rise),
            opacity,
            scale,
        );
        y += breadcrumb_h;
    }

    let (opacity, rise) = cx.entrance(0.07);
    text::draw_label_centered(
        ui,
        title,
        title_font,
        Theme::with_opacity(theme.foreground, opacity),
        center_x,
        y + rise,
    );
    y += title_h;

    let t = reveal(cx.elapsed, 0.17, text::ENTRANCE);
    let opacity = cx.opacity * t;
    let grown = image_size * (0.95 + 0.05 * t);
    let image_rect = Rect::from_center_size(Pos2::new(center_x, y + image_size.y / 2.0), grown);
    let rounding = 12.0 * scale;

    match texture {
        Some(texture) => {
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            let tint = Theme::with_opacity(egui::Color32::WHITE, opacity);
            ui.painter().image(texture.id(), image_rect, uv, tint);
        }
        None => {
            let stroke =
                egui::Stroke::new(2.0 * scale, Theme::with_opacity(theme.surface, opacity));
            ui.painter().rect_filled(
                image_rect,
                rounding,
                Theme::with_opacity(theme.surface, opacity * 0.3),
            );
            ui.painter()
                .rect_stroke(image_rect, rounding, stroke, egui::StrokeKind::Inside);
            let label = image_alt.unwrap_or(title);
            let color = Theme::with_opacity(theme.muted, opacity);
            let galley = ui.painter().layout(
                label.to_string(),
                FontId::proportional(theme.small_size * scale),
                color,
                image_rect.width() - 32.0 * scale,
            );
            let pos = image_rect.center() - galley.rect.size() / 2.0;
            ui.painter().galley(pos, galley, color);
        }
    }

    SlideOutput::default()
}

/// Largest size with the same aspect ratio as `size` that fits in `bounds`.
pub fn fit(size: egui::Vec2, bounds: egui::Vec2) -> egui::Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return egui::Vec2::ZERO;
    }
    let factor = (bounds.x / size.x).min(bounds.y / size.y);
    size * factor
}

fn breadcrumb_width(ui: &egui::Ui, breadcrumb: &Breadcrumb, scale: f32) -> f32 {
    let title = ui
        .painter()
        .layout_no_wrap(
            breadcrumb.title.clone(),
            FontId::proportional(24.0 * scale),
            egui::Color32::WHITE,
        )
        .rect
        .width();
    40.0 * scale + 14.0 * scale + title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_keeps_aspect_ratio() {
        let bounds = egui::vec2(1600.0, 600.0);
        assert_eq!(fit(egui::vec2(800.0, 400.0), bounds), egui::vec2(1200.0, 600.0));
        assert_eq!(fit(egui::vec2(3200.0, 400.0), bounds), egui::vec2(1600.0, 200.0));
    }

    #[test]
    fn test_fit_degenerate() {
        assert_eq!(fit(egui::vec2(0.0, 10.0), egui::vec2(10.0, 10.0)), egui::Vec2::ZERO);
    }
}
