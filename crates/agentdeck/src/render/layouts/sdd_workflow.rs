use eframe::egui::{self, Align2, FontId, Pos2, Rect};

use crate::deck::Breadcrumb;
use crate::render::text::{self, reveal};
use crate::render::{SlideCtx, SlideOutput};
use crate::theme::Theme;

struct Step {
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    highlighted: bool,
}

const STEPS: [Step; 7] = [
    Step {
        title: "PRD First",
        description: "Research with Gemini, ChatGPT, Claude",
        icon: "\u{1F4DD}",
        highlighted: true,
    },
    Step {
        title: "Store PRD",
        description: "Put in project, reference in CLAUDE.md",
        icon: "\u{1F4C1}",
        highlighted: false,
    },
    Step {
        title: "Task Breakdown",
        description: "Atomic standalone tasks in TASKS.md",
        icon: "\u{2702}",
        highlighted: true,
    },
    Step {
        title: "Implementation",
        description: "Plan mode, refer files/skills/commands",
        icon: "\u{2699}",
        highlighted: false,
    },
    Step {
        title: "Iteration",
        description: "Update TASKS.md or create GitHub issues",
        icon: "\u{1F504}",
        highlighted: false,
    },
    Step {
        title: "Polishing",
        description: "Plain agent mode for specific expansion",
        icon: "\u{2728}",
        highlighted: false,
    },
    Step {
        title: "Parallel Work",
        description: "Worktrees for branches and PR reviews",
        icon: "\u{1F33F}",
        highlighted: false,
    },
];

/// Steps in the first row; the rest wrap to a second, centered row.
const FIRST_ROW: usize = 4;

/// Spec-driven development as two rows of step cards joined by chevrons.
pub fn render(cx: &SlideCtx, section: Option<&Breadcrumb>, title: &str) -> SlideOutput {
    let scale = cx.scale;
    let area = cx.content_rect();
    let top = cx.header(section, title);

    let card = egui::vec2(208.0, 144.0) * scale;
    let gap = 12.0 * scale;
    let arrow_w = 24.0 * scale;
    let row_gap = 24.0 * scale;
    let total_h = card.y * 2.0 + row_gap;
    let mut y = top + ((area.bottom() - top - total_h) / 2.0).max(0.0);

    let (first, second) = STEPS.split_at(FIRST_ROW);
    for (row, offset) in [(first, 0), (second, FIRST_ROW)] {
        let n = row.len() as f32;
        let row_w = n * card.x + (n - 1.0) * (arrow_w + gap * 2.0);
        let mut x = area.center().x - row_w / 2.0;
        for (i, step) in row.iter().enumerate() {
            let index = offset + i;
            let delay = 0.25 + index as f32 * 0.08;
            let t = reveal(cx.elapsed, delay, text::ENTRANCE);
            let rect = Rect::from_min_size(Pos2::new(x, y + (1.0 - t) * text::RISE * scale), card);
            draw_step(cx, step, index, rect, cx.opacity * t);
            x += card.x + gap;

            if i + 1 < row.len() {
                let arrow_opacity = cx.opacity * reveal(cx.elapsed, delay + 0.1, 0.2);
                chevron(cx, Pos2::new(x + arrow_w / 2.0, y + card.y / 2.0), arrow_opacity);
                x += arrow_w + gap;
            }
        }
        y += card.y + row_gap;
    }

    SlideOutput::default()
}

fn draw_step(cx: &SlideCtx, step: &Step, index: usize, rect: Rect, opacity: f32) {
    let ui = cx.ui;
    let theme = cx.theme;
    let scale = cx.scale;
    let pad = 16.0 * scale;
    let rounding = 8.0 * scale;

    let (border, fill, emphasis) = if step.highlighted {
        (
            theme.accent,
            Theme::with_opacity(theme.accent, opacity * 0.1),
            theme.accent,
        )
    } else {
        (
            theme.surface,
            Theme::with_opacity(theme.background, opacity),
            theme.foreground,
        )
    };
    ui.painter().rect_filled(rect, rounding, fill);
    ui.painter().rect_stroke(
        rect,
        rounding,
        egui::Stroke::new(1.0, Theme::with_opacity(border, opacity)),
        egui::StrokeKind::Inside,
    );

    let icon = ui.painter().text(
        rect.min + egui::vec2(pad, pad),
        Align2::LEFT_TOP,
        step.icon,
        FontId::proportional(24.0 * scale),
        Theme::with_opacity(theme.foreground, opacity),
    );
    let number_color = if step.highlighted { theme.accent } else { theme.muted };
    ui.painter().text(
        Pos2::new(icon.right() + 8.0 * scale, icon.center().y),
        Align2::LEFT_CENTER,
        step_number(index),
        FontId::monospace(14.0 * scale),
        Theme::with_opacity(number_color, opacity),
    );

    let heading = ui.painter().text(
        Pos2::new(rect.left() + pad, icon.bottom() + 8.0 * scale),
        Align2::LEFT_TOP,
        step.title,
        FontId::proportional(18.0 * scale),
        Theme::with_opacity(emphasis, opacity),
    );

    let color = Theme::with_opacity(theme.muted, opacity);
    let galley = ui.painter().layout(
        step.description.to_string(),
        FontId::proportional(14.0 * scale),
        color,
        rect.width() - pad * 2.0,
    );
    ui.painter()
        .galley(Pos2::new(rect.left() + pad, heading.bottom() + 4.0 * scale), galley, color);
}

/// A `>` chevron centered on `center`.
fn chevron(cx: &SlideCtx, center: Pos2, opacity: f32) {
    let s = 6.0 * cx.scale;
    let stroke = egui::Stroke::new(2.0 * cx.scale, Theme::with_opacity(cx.theme.surface, opacity));
    cx.ui.painter().line(
        vec![
            center + egui::vec2(-s * 0.5, -s),
            center + egui::vec2(s * 0.5, 0.0),
            center + egui::vec2(-s * 0.5, s),
        ],
        stroke,
    );
}

/// "01" for the first step.
fn step_number(index: usize) -> String {
    format!("{:02}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbers() {
        assert_eq!(step_number(0), "01");
        assert_eq!(step_number(6), "07");
    }

    #[test]
    fn test_rows_split() {
        let (first, second) = STEPS.split_at(FIRST_ROW);
        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 3);
        let highlighted: Vec<usize> = STEPS
            .iter()
            .enumerate()
            .filter(|(_, s)| s.highlighted)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(highlighted, vec![0, 2]);
    }
}
