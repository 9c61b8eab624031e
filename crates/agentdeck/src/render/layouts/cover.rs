use eframe::egui::{self, FontId, Pos2};

use crate::render::background::{Backdrop, RenderSurface, StaticSurface};
use crate::render::text::{self, reveal};
use crate::render::{SlideCtx, SlideOutput};
use crate::theme::Theme;

/// Seconds before the navigation hint appears.
const HINT_DELAY: f32 = 1.2;

/// One full up-and-down bob of the hint.
const HINT_PERIOD: f32 = 2.0;

pub fn render(
    cx: &SlideCtx,
    title: &str,
    subtitle: Option<&str>,
    author: Option<&str>,
    backdrop: Option<&mut Backdrop>,
) -> SlideOutput {
    let ui = cx.ui;
    let theme = cx.theme;
    let rect = cx.rect;
    let scale = cx.scale;
    let painter = ui.painter().with_clip_rect(rect);

    let mut output = SlideOutput::default();
    let animated = match backdrop {
        Some(backdrop) => {
            output.repaint_now = backdrop.paint(&painter, rect, cx.now);
            !backdrop.is_paused()
        }
        None => {
            StaticSurface::new(theme).paint(&painter, rect, 0.0);
            false
        }
    };
    // A GL surface cannot fade; cover it with the background instead.
    if cx.opacity < 1.0 {
        painter.rect_filled(
            rect,
            0.0,
            Theme::with_opacity(theme.background, 1.0 - cx.opacity),
        );
    }

    let center_x = rect.center().x;
    let gap = 24.0 * scale;

    let title_font = FontId::proportional(theme.cover_size * scale);
    let subtitle_font = FontId::proportional(theme.body_size * scale);
    let author_font = FontId::proportional(16.0 * scale);

    let title_h = ui
        .painter()
        .layout_no_wrap(title.to_string(), title_font.clone(), theme.foreground)
        .rect
        .height();
    let subtitle_h = subtitle.map_or(0.0, |_| subtitle_font.size * 1.3 + gap);
    let author_h = author.map_or(0.0, |_| 16.0 * scale + author_font.size * 1.3 + gap);
    let mut y = rect.center().y - (title_h + subtitle_h + author_h) / 2.0;

    let t = reveal(cx.elapsed, 0.15, 0.4);
    let color = Theme::with_opacity(theme.foreground, cx.opacity * t);
    text::draw_label_centered(
        ui,
        title,
        title_font,
        color,
        center_x,
        y + (1.0 - t) * 30.0 * scale,
    );
    y += title_h + gap;

    if let Some(subtitle) = subtitle {
        let t = reveal(cx.elapsed, 0.28, 0.4);
        let color = Theme::with_opacity(theme.muted, cx.opacity * t);
        let size = text::draw_label_centered(
            ui,
            subtitle,
            subtitle_font,
            color,
            center_x,
            y + (1.0 - t) * text::RISE * scale,
        );
        y += size.y + gap;
    }

    if let Some(author) = author {
        let t = reveal(cx.elapsed, 0.45, 0.4);
        let opacity = cx.opacity * t;
        let half = 48.0 * scale;
        ui.painter().line_segment(
            [Pos2::new(center_x - half, y), Pos2::new(center_x + half, y)],
            egui::Stroke::new(1.0, Theme::with_opacity(theme.muted, opacity * 0.3)),
        );
        y += 16.0 * scale;
        text::draw_label_centered(
            ui,
            spaced(author),
            author_font,
            Theme::with_opacity(theme.muted, opacity),
            center_x,
            y,
        );
    }

    let hint_opacity = 0.5 * reveal(cx.elapsed, HINT_DELAY, 0.6);
    if hint_opacity > 0.0 {
        let bob = if animated {
            hint_bob(cx.elapsed - HINT_DELAY) * 8.0 * scale
        } else {
            0.0
        };
        text::draw_label_centered(
            ui,
            "\u{2190} KEYS \u{2192}",
            FontId::monospace(16.0 * scale),
            Theme::with_opacity(theme.foreground, cx.opacity * hint_opacity),
            center_x,
            rect.bottom() - 64.0 * scale - bob,
        );
    }
    output.repaint_now |= animated;
    output
}

/// Height of the hint above its rest position, in `[0, 1]`, `t` seconds into the bob.
fn hint_bob(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    let phase = (t % HINT_PERIOD) / HINT_PERIOD;
    // Eased up over the first half, back down over the second.
    (1.0 - (phase * std::f32::consts::TAU).cos()) / 2.0
}

/// Widen letter spacing with thin spaces.
fn spaced(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for (i, c) in text.chars().enumerate() {
        if i > 0 {
            out.push('\u{2009}');
        }
        out.push(c);
    }
    out
}
