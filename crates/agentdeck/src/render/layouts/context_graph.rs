use eframe::egui::{self, Align2, FontId, Pos2, Rect};

use crate::deck::Breadcrumb;
use crate::render::text::reveal;
use crate::render::{SlideCtx, SlideOutput};
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Book,
    Model,
}

struct Bar {
    label: &'static str,
    tokens: u32,
    display: &'static str,
    source: Source,
}

const BARS: [Bar; 6] = [
    Bar { label: "The Great Gatsby", tokens: 70_000, display: "70k", source: Source::Book },
    Bar { label: "Claude Opus 4.5", tokens: 200_000, display: "200k", source: Source::Model },
    Bar { label: "Dune", tokens: 270_000, display: "270k", source: Source::Book },
    Bar { label: "GPT 5.2", tokens: 400_000, display: "400k", source: Source::Model },
    Bar { label: "War and Peace", tokens: 850_000, display: "850k", source: Source::Book },
    Bar { label: "Gemini 3.0 Pro", tokens: 1_000_000, display: "1M", source: Source::Model },
];

/// Bar length relative to the longest bar.
fn fraction(tokens: u32) -> f32 {
    let max = BARS.iter().map(|b| b.tokens).max().unwrap_or(1).max(1);
    tokens as f32 / max as f32
}

/// Context window sizes of current models next to the length of well-known books.
pub fn render(cx: &SlideCtx, section: Option<&Breadcrumb>, title: &str) -> SlideOutput {
    let ui = cx.ui;
    let theme = cx.theme;
    let scale = cx.scale;
    let area = cx.content_rect();
    let top = cx.header(section, title);

    let (body_opacity, rise) = cx.entrance(0.17);
    let chart_width = area.width().min(1000.0 * scale);
    let label_w = 240.0 * scale;
    let value_w = 90.0 * scale;
    let gap = 16.0 * scale;
    let bar_h = 36.0 * scale;
    let row_h = bar_h + 18.0 * scale;
    let legend_h = 110.0 * scale;

    let chart_h = BARS.len() as f32 * row_h + legend_h;
    let left = area.center().x - chart_width / 2.0;
    let mut y = top + ((area.bottom() - top - chart_h) / 2.0).max(0.0) + rise;

    let label_font = FontId::proportional(theme.small_size * 1.1 * scale);
    let value_font = FontId::monospace(theme.small_size * 1.1 * scale);
    let muted = Theme::with_opacity(theme.muted, body_opacity);

    for (i, bar) in BARS.iter().enumerate() {
        let mid = y + bar_h / 2.0;
        ui.painter().text(
            Pos2::new(left + label_w, mid),
            Align2::RIGHT_CENTER,
            bar.label,
            label_font.clone(),
            muted,
        );

        let track = Rect::from_min_size(
            Pos2::new(left + label_w + gap, y),
            egui::vec2(chart_width - label_w - value_w - gap * 2.0, bar_h),
        );
        let grow = reveal(cx.elapsed, 0.3 + i as f32 * 0.1, 0.6);
        let color = match bar.source {
            Source::Model => theme.accent,
            Source::Book => theme.teal,
        };
        super::draw_bar(
            ui,
            track,
            fraction(bar.tokens) * grow,
            Theme::with_opacity(color, body_opacity),
            None,
            0.0,
        );

        ui.painter().text(
            Pos2::new(track.right() + gap, mid),
            Align2::LEFT_CENTER,
            bar.display,
            value_font.clone(),
            muted,
        );
        y += row_h;
    }

    let legend_opacity = cx.opacity * reveal(cx.elapsed, 1.2, 0.35);
    y += 32.0 * scale;
    let legend = [("AI Models", theme.accent), ("Books", theme.teal)];
    let swatch = super::draw_legend(cx, &legend, area.center().x, y, legend_opacity);

    let note_font = FontId::proportional(theme.small_size * 0.8 * scale);
    let mut job = egui::text::LayoutJob::single_section(
        "Book token counts are approximate and vary by tokenizer".to_string(),
        egui::text::TextFormat {
            font_id: note_font,
            color: Theme::with_opacity(theme.muted, legend_opacity * 0.6),
            italics: true,
            ..Default::default()
        },
    );
    job.halign = egui::Align::Center;
    let galley = ui.painter().layout_job(job);
    ui.painter().galley(
        Pos2::new(area.center().x, y + swatch + 20.0 * scale),
        galley,
        muted,
    );

    SlideOutput::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_bar_fills_the_track() {
        assert_eq!(fraction(1_000_000), 1.0);
        assert!((fraction(70_000) - 0.07).abs() < 1e-6);
    }

    #[test]
    fn test_models_and_books_alternate() {
        let sources: Vec<Source> = BARS.iter().map(|b| b.source).collect();
        assert!(sources.windows(2).all(|w| w[0] != w[1]));
        assert!(BARS.windows(2).all(|w| w[0].tokens < w[1].tokens), "sorted by size");
    }
}
