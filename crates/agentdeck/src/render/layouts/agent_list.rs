use eframe::egui::{self, Align2, FontId, Pos2, Rect};

use crate::deck::Breadcrumb;
use crate::render::text::{self, reveal};
use crate::render::{SlideCtx, SlideOutput};
use crate::theme::Theme;

struct Agent {
    name: &'static str,
    url: &'static str,
    description: &'static str,
}

const AGENTS: [Agent; 3] = [
    Agent {
        name: "Claude Code",
        url: "https://docs.anthropic.com/en/docs/claude-code",
        description: "Anthropic CLI agent for software development",
    },
    Agent {
        name: "OpenAI Codex",
        url: "https://github.com/openai/codex",
        description: "OpenAI terminal-based coding assistant",
    },
    Agent {
        name: "OpenCode",
        url: "https://opencode.ai/",
        description: "Open-source AI coding agent",
    },
];

/// A row of agent cards; clicking a card opens the agent's documentation.
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

    let card = egui::vec2(288.0, 256.0) * scale;
    let gap = 32.0 * scale;
    let row_w = AGENTS.len() as f32 * card.x + (AGENTS.len() - 1) as f32 * gap;
    let mut x = area.center().x - row_w / 2.0;
    let card_top = top + ((area.bottom() - top - card.y) / 2.0).max(0.0);
    let pad = 24.0 * scale;

    for (i, agent) in AGENTS.iter().enumerate() {
        let t = reveal(cx.elapsed, 0.25 + i as f32 * 0.1, text::ENTRANCE);
        let opacity = cx.opacity * t;
        let rect = Rect::from_min_size(
            Pos2::new(x, card_top + (1.0 - t) * 30.0 * scale),
            card,
        );
        let hovered = super::link_area(cx, rect, key.with(("agent", i)), agent.url);

        let (border, fill) = if hovered {
            (theme.accent, Theme::with_opacity(theme.surface, opacity * 0.3))
        } else {
            (theme.surface, Theme::with_opacity(theme.background, opacity))
        };
        let rounding = 8.0 * scale;
        ui.painter().rect_filled(rect, rounding, fill);
        ui.painter().rect_stroke(
            rect,
            rounding,
            egui::Stroke::new(1.0, Theme::with_opacity(border, opacity)),
            egui::StrokeKind::Inside,
        );

        let badge_center = Pos2::new(
            rect.right() - pad - 20.0 * scale,
            rect.top() + pad + 20.0 * scale,
        );
        let badge_opacity = if hovered { opacity } else { opacity * 0.6 };
        ui.painter().circle_filled(
            badge_center,
            20.0 * scale,
            Theme::with_opacity(theme.surface, badge_opacity),
        );
        ui.painter().text(
            badge_center,
            Align2::CENTER_CENTER,
            monogram(agent.name),
            FontId::proportional(18.0 * scale),
            Theme::with_opacity(theme.foreground, badge_opacity),
        );

        let name_color = if hovered { theme.accent } else { theme.foreground };
        let name = ui.painter().text(
            Pos2::new(rect.left() + pad, rect.top() + pad),
            Align2::LEFT_TOP,
            agent.name,
            FontId::proportional(theme.small_size * 1.3 * scale),
            Theme::with_opacity(name_color, opacity),
        );

        let description_color = Theme::with_opacity(theme.muted, opacity);
        let galley = ui.painter().layout(
            agent.description.to_string(),
            FontId::proportional(theme.small_size * 0.95 * scale),
            description_color,
            card.x - pad * 2.0,
        );
        ui.painter().galley(
            Pos2::new(rect.left() + pad, name.bottom() + 12.0 * scale),
            galley,
            description_color,
        );

        if hovered {
            ui.painter().text(
                Pos2::new(rect.left() + pad, rect.bottom() - pad),
                Align2::LEFT_BOTTOM,
                "Open docs \u{2192}",
                FontId::monospace(14.0 * scale),
                Theme::with_opacity(theme.accent, opacity),
            );
        }

        x += card.x + gap;
    }

    SlideOutput::default()
}

/// Initials of the first two words ("Claude Code" -> "CC").
fn monogram(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .collect()
}
