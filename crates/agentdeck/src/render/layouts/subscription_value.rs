use eframe::egui::{self, Align2, FontId, Pos2, Rect};

use crate::deck::Breadcrumb;
use crate::render::text::reveal;
use crate::render::{SlideCtx, SlideOutput};
use crate::theme::Theme;

const SOURCE_URL: &str = "https://she-llac.com/claude-limits";

/// Monthly subscription price against the API usage it buys, in dollars.
struct Tier {
    label: &'static str,
    price: u32,
    api_value: u32,
}

const TIERS: [Tier; 3] = [
    Tier {
        label: "Max 20x",
        price: 200,
        api_value: 2708,
    },
    Tier {
        label: "Max 5x",
        price: 100,
        api_value: 1354,
    },
    Tier {
        label: "Pro",
        price: 20,
        api_value: 163,
    },
];

impl Tier {
    /// "13.54x"
    fn multiplier(&self) -> String {
        format!("{:.2}x", self.api_value as f32 / self.price as f32)
    }
}

fn max_value() -> u32 {
    TIERS.iter().map(|t| t.api_value).max().unwrap_or(1).max(1)
}

/// Pay/get bar pairs per subscription tier.
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

    let width = area.width().min(1000.0 * scale);
    let left = area.center().x - width / 2.0;
    let label_w = 56.0 * scale;
    let value_w = 90.0 * scale;
    let gap = 16.0 * scale;
    let bar_h = 24.0 * scale;
    let heading_h = 40.0 * scale;
    let tier_h = heading_h + bar_h * 2.0 + 4.0 * scale + 32.0 * scale;
    let legend_h = 90.0 * scale;
    let free = area.bottom() - top - TIERS.len() as f32 * tier_h - legend_h;
    let mut y = top + (free / 2.0).max(0.0) + rise;

    let small = FontId::proportional(theme.small_size * 0.8 * scale);
    let mono = FontId::monospace(theme.small_size * 0.8 * scale);
    let muted = Theme::with_opacity(theme.muted, body_opacity);
    let max = max_value() as f32;

    for (i, tier) in TIERS.iter().enumerate() {
        ui.painter().text(
            Pos2::new(left, y + heading_h / 2.0),
            Align2::LEFT_CENTER,
            tier.label,
            FontId::proportional(theme.small_size * 1.2 * scale),
            Theme::with_opacity(theme.foreground, body_opacity),
        );

        let badge_t = reveal(cx.elapsed, 0.7 + i as f32 * 0.15, 0.3);
        if badge_t > 0.0 {
            let badge_opacity = cx.opacity * badge_t;
            let galley = ui.painter().layout_no_wrap(
                format!("{} value", tier.multiplier()),
                mono.clone(),
                Theme::with_opacity(theme.accent, badge_opacity),
            );
            let pad = egui::vec2(12.0, 4.0) * scale;
            let size = (galley.rect.size() + pad * 2.0) * (0.8 + 0.2 * badge_t);
            let badge = Rect::from_min_size(
                Pos2::new(left + width - size.x, y + (heading_h - size.y) / 2.0),
                size,
            );
            ui.painter().rect_filled(
                badge,
                4.0 * scale,
                Theme::with_opacity(theme.accent, badge_opacity * 0.2),
            );
            ui.painter().galley(
                badge.center() - galley.rect.size() / 2.0,
                galley,
                theme.accent,
            );
        }
        y += heading_h;

        let rows = [
            ("Pay", tier.price, theme.surface, 0.3),
            ("Get", tier.api_value, theme.accent, 0.4),
        ];
        for (label, dollars, color, delay) in rows {
            let mid = y + bar_h / 2.0;
            ui.painter().text(
                Pos2::new(left + label_w, mid),
                Align2::RIGHT_CENTER,
                label,
                small.clone(),
                muted,
            );
            let track = Rect::from_min_size(
                Pos2::new(left + label_w + gap, y),
                egui::vec2(width - label_w - value_w - gap * 2.0, bar_h),
            );
            let grow = reveal(cx.elapsed, delay + i as f32 * 0.15, 0.6);
            super::draw_bar(
                ui,
                track,
                dollars as f32 / max * grow,
                Theme::with_opacity(color, body_opacity),
                None,
                0.0,
            );
            ui.painter().text(
                Pos2::new(track.right() + gap, mid),
                Align2::LEFT_CENTER,
                format!("${dollars}"),
                mono.clone(),
                muted,
            );
            y += bar_h + 4.0 * scale;
        }
        y += 28.0 * scale;
    }

    let footer_opacity = cx.opacity * reveal(cx.elapsed, 1.2, 0.35);
    y += 16.0 * scale;
    let legend = [("Subscription Cost", theme.surface), ("API Value", theme.accent)];
    y += super::draw_legend(cx, &legend, area.center().x, y, footer_opacity) + 20.0 * scale;

    let source_font = FontId::proportional(theme.small_size * 0.8 * scale);
    let galley = ui.painter().layout_no_wrap(
        "Source: she-llac.com/claude-limits".to_string(),
        source_font,
        theme.muted,
    );
    let source_rect = Rect::from_min_size(
        Pos2::new(area.center().x - galley.rect.width() / 2.0, y),
        galley.rect.size(),
    );
    let hovered = super::link_area(cx, source_rect, key.with("source"), SOURCE_URL);
    let alpha = if hovered { 0.8 } else { 0.6 };
    let color = Theme::with_opacity(theme.muted, footer_opacity * alpha);
    ui.painter()
        .galley_with_override_text_color(source_rect.min, galley, color);
    ui.painter().line_segment(
        [source_rect.left_bottom(), source_rect.right_bottom()],
        egui::Stroke::new(1.0, Theme::with_opacity(theme.muted, footer_opacity * 0.3)),
    );

    SlideOutput::default()
}
