use eframe::egui::{self, Align2, FontId, Pos2, Rect};

use crate::deck::Breadcrumb;
use crate::render::text::reveal;
use crate::render::{SlideCtx, SlideOutput};
use crate::theme::Theme;

const PAPER_URL: &str = "https://arxiv.org/abs/2307.03172";

/// Retrieval accuracy by where the answer sits in a long context.
const ACCURACY: [(&str, u32); 3] = [("Beginning", 90), ("Middle", 55), ("End", 85)];

/// The U-curve: three vertical bars plus the paper citation.
pub fn render(
    cx: &SlideCtx,
    key: egui::Id,
    section: Option<&Breadcrumb>,
    title: &str,
) -> SlideOutput {
    let ui = cx.ui;
    let theme = cx.theme;
    let scale = cx.scale;
    let area = cx.content_rect();
    let top = cx.header(section, title);
    let (body_opacity, rise) = cx.entrance(0.17);

    let bar_w = 96.0 * scale;
    let spacing = 64.0 * scale;
    let track_h = 256.0 * scale;
    let value_font = FontId::monospace(theme.small_size * 1.4 * scale);
    let label_font = FontId::proportional(theme.small_size * 1.1 * scale);
    let column_h = value_font.size * 1.3 + 16.0 * scale + track_h + 16.0 * scale + label_font.size;

    let citation_h = 40.0 * scale;
    let total_w = ACCURACY.len() as f32 * bar_w + (ACCURACY.len() - 1) as f32 * spacing;
    let mut x = area.center().x - total_w / 2.0;
    let column_top =
        top + ((area.bottom() - citation_h - top - column_h) / 2.0).max(0.0) + rise;

    let colors = [theme.teal, theme.surface, theme.accent];
    for (i, ((position, accuracy), color)) in ACCURACY.iter().zip(colors).enumerate() {
        let center_x = x + bar_w / 2.0;
        let value_opacity = cx.opacity * reveal(cx.elapsed, 0.5 + i as f32 * 0.15, 0.35);
        ui.painter().text(
            Pos2::new(center_x, column_top),
            Align2::CENTER_TOP,
            format!("{accuracy}%"),
            value_font.clone(),
            Theme::with_opacity(theme.muted, value_opacity),
        );

        let track_top = column_top + value_font.size * 1.3 + 16.0 * scale;
        let grow = reveal(cx.elapsed, 0.3 + i as f32 * 0.15, 0.6);
        let h = track_h * bar_height(*accuracy) * grow;
        let bar = Rect::from_min_max(
            Pos2::new(x, track_top + track_h - h),
            Pos2::new(x + bar_w, track_top + track_h),
        );
        ui.painter()
            .rect_filled(bar, 0.0, Theme::with_opacity(color, body_opacity));

        ui.painter().text(
            Pos2::new(center_x, track_top + track_h + 16.0 * scale),
            Align2::CENTER_TOP,
            *position,
            label_font.clone(),
            Theme::with_opacity(theme.muted, body_opacity),
        );
        x += bar_w + spacing;
    }

    let citation_opacity = cx.opacity * reveal(cx.elapsed, 1.0, 0.35);
    let citation_font = FontId::proportional(theme.small_size * 0.8 * scale);
    let pos = Pos2::new(area.left(), area.bottom() - citation_h + rise);
    let prefix = ui.painter().text(
        pos,
        Align2::LEFT_TOP,
        "Liu et al., 2023 \u{00B7} ",
        citation_font.clone(),
        Theme::with_opacity(theme.muted, citation_opacity * 0.6),
    );

    let link_pos = Pos2::new(prefix.right(), pos.y);
    let link_galley = ui.painter().layout_no_wrap(
        "Lost in the Middle".to_string(),
        citation_font,
        theme.accent,
    );
    let link_rect = Rect::from_min_size(link_pos, link_galley.rect.size());
    let hovered = super::link_area(cx, link_rect, key.with("paper"), PAPER_URL);
    let link_color = if hovered { theme.foreground } else { theme.accent };
    let link_color = Theme::with_opacity(link_color, citation_opacity);
    ui.painter().galley_with_override_text_color(link_pos, link_galley, link_color);
    ui.painter().line_segment(
        [
            Pos2::new(link_rect.left(), link_rect.bottom() + 1.0),
            Pos2::new(link_rect.right(), link_rect.bottom() + 1.0),
        ],
        egui::Stroke::new(1.0, link_color),
    );

    SlideOutput::default()
}

fn bar_height(accuracy: u32) -> f32 {
    accuracy.min(100) as f32 / 100.0
}
