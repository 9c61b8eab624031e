pub mod agent_list;
pub mod claude_hierarchy;
pub mod content;
pub mod context_graph;
pub mod cover;
pub mod image;
pub mod llm_demo;
pub mod lost_middle;
pub mod sdd_workflow;
pub mod section;
pub mod subscription_value;
pub mod tokenizer;

use eframe::egui::{self, Color32, FontId, Pos2, Rect};

use crate::render::SlideCtx;
use crate::theme::Theme;

/// Rounded chip with monospace text, as used for tokens. Returns its size.
pub(crate) fn draw_chip(
    ui: &egui::Ui,
    label: &str,
    color: Color32,
    pos: Pos2,
    font_size: f32,
    opacity: f32,
) -> egui::Vec2 {
    let text_color = Theme::with_opacity(color, opacity);
    let galley = ui
        .painter()
        .layout_no_wrap(chip_label(label), FontId::monospace(font_size), text_color);
    let pad = chip_padding(font_size);
    let rect = Rect::from_min_size(pos, galley.rect.size() + pad * 2.0);
    ui.painter()
        .rect_filled(rect, font_size * 0.3, Theme::with_opacity(color, opacity * 0.2));
    ui.painter().galley(rect.min + pad, galley, text_color);
    rect.size()
}

pub(crate) fn chip_size(ui: &egui::Ui, label: &str, font_size: f32) -> egui::Vec2 {
    let galley = ui.painter().layout_no_wrap(
        chip_label(label),
        FontId::monospace(font_size),
        Color32::WHITE,
    );
    galley.rect.size() + chip_padding(font_size) * 2.0
}

fn chip_padding(font_size: f32) -> egui::Vec2 {
    egui::vec2(font_size * 0.35, font_size * 0.15)
}

/// Chip text with whitespace made visible, kept on one line.
fn chip_label(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '\n' => '\u{21B5}',
            '\t' => '\u{2192}',
            ' ' if label.trim().is_empty() => '\u{00B7}',
            c => c,
        })
        .collect()
}

/// Small uppercase caption in the muted color.
pub(crate) fn draw_caption(
    ui: &egui::Ui,
    text: &str,
    theme: &Theme,
    pos: Pos2,
    size: f32,
    opacity: f32,
) -> egui::Vec2 {
    let color = Theme::with_opacity(theme.muted, opacity);
    let galley = ui
        .painter()
        .layout_no_wrap(text.to_uppercase(), FontId::proportional(size), color);
    let size = galley.rect.size();
    ui.painter().galley(pos, galley, color);
    size
}

/// Horizontal bar growing from the left edge of `track` to `fraction` of its width.
pub(crate) fn draw_bar(
    ui: &egui::Ui,
    track: Rect,
    fraction: f32,
    fill: Color32,
    background: Option<Color32>,
    rounding: f32,
) {
    if let Some(bg) = background {
        ui.painter().rect_filled(track, rounding, bg);
    }
    let width = track.width() * fraction.clamp(0.0, 1.0);
    if width > 0.0 {
        let bar = Rect::from_min_size(track.min, egui::vec2(width, track.height()));
        ui.painter().rect_filled(bar, rounding, fill);
    }
}

/// Centered row of color swatches with labels. Returns its height.
pub(crate) fn draw_legend(
    cx: &SlideCtx,
    entries: &[(&str, Color32)],
    center_x: f32,
    top: f32,
    opacity: f32,
) -> f32 {
    let theme = cx.theme;
    let scale = cx.scale;
    let swatch = 16.0 * scale;
    let entry_w = 220.0 * scale;
    let font = FontId::proportional(theme.small_size * scale);
    let mut x = center_x - entry_w * entries.len() as f32 / 2.0;
    for (label, color) in entries {
        let swatch_rect = Rect::from_min_size(Pos2::new(x, top), egui::vec2(swatch, swatch));
        cx.ui
            .painter()
            .rect_filled(swatch_rect, 0.0, Theme::with_opacity(*color, opacity));
        cx.ui.painter().text(
            Pos2::new(swatch_rect.right() + 8.0 * scale, swatch_rect.center().y),
            egui::Align2::LEFT_CENTER,
            *label,
            font.clone(),
            Theme::with_opacity(theme.muted, opacity),
        );
        x += entry_w;
    }
    swatch
}

/// Make `rect` a link to `url` when the slide takes input. Returns whether the
/// pointer is over it.
pub(crate) fn link_area(cx: &SlideCtx, rect: Rect, id: egui::Id, url: &str) -> bool {
    if !cx.interactive {
        return false;
    }
    let response = cx
        .ui
        .interact(rect, id, egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    if response.clicked() {
        tracing::debug!("Opening {url}");
        cx.ui.ctx().open_url(egui::OpenUrl::new_tab(url));
    }
    response.hovered()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chip_label_shows_whitespace() {
        assert_eq!(chip_label(" world"), " world");
        assert_eq!(chip_label("  "), "\u{00B7}\u{00B7}");
        assert_eq!(chip_label("\n\n"), "\u{21B5}\u{21B5}");
    }
}
