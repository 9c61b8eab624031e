use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect};

use crate::deck::Breadcrumb;
use crate::render::text::{self, reveal};
use crate::render::{SlideCtx, SlideOutput};
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Priority {
    Contextual,
    Medium,
    High,
    Highest,
}

impl Priority {
    fn label(self) -> &'static str {
        match self {
            Self::Highest => "highest",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Contextual => "contextual",
        }
    }

    fn color(self, theme: &Theme) -> Color32 {
        match self {
            Self::Highest => theme.red,
            Self::High => theme.accent,
            Self::Medium => theme.teal,
            Self::Contextual => theme.blue,
        }
    }
}

struct Row {
    level: &'static str,
    location: &'static str,
    priority: Priority,
    loaded: &'static str,
}

/// Where memory files live, from strongest to weakest.
const ROWS: [Row; 7] = [
    Row {
        level: "Enterprise",
        location: "Managed policy",
        priority: Priority::Highest,
        loaded: "Always (if configured)",
    },
    Row {
        level: "Project local",
        location: "./CLAUDE.local.md",
        priority: Priority::High,
        loaded: "Session start",
    },
    Row {
        level: "Project shared",
        location: "./CLAUDE.md",
        priority: Priority::High,
        loaded: "Session start",
    },
    Row {
        level: "Project rules",
        location: "./.claude/rules/*.md",
        priority: Priority::High,
        loaded: "Session start (or conditional)",
    },
    Row {
        level: "User rules",
        location: "~/.claude/rules/*.md",
        priority: Priority::Medium,
        loaded: "Session start",
    },
    Row {
        level: "User global",
        location: "~/.claude/CLAUDE.md",
        priority: Priority::Medium,
        loaded: "Session start",
    },
    Row {
        level: "Subfolder",
        location: "./src/CLAUDE.md",
        priority: Priority::Contextual,
        loaded: "When working in that folder",
    },
];

const HEADERS: [&str; 4] = ["Level", "Location", "Priority", "When loaded"];

/// Share of the table width given to each column.
const COLUMNS: [f32; 4] = [0.2, 0.3, 0.17, 0.33];

const INSIGHT: &str = "**Key insight:** Project overrides global, subfolder loads on demand. \
    Check active files with `/memory`";

pub fn render(cx: &SlideCtx, section: Option<&Breadcrumb>, title: &str) -> SlideOutput {
    let ui = cx.ui;
    let theme = cx.theme;
    let scale = cx.scale;
    let area = cx.content_rect();
    let top = cx.header(section, title);
    let (body_opacity, rise) = cx.entrance(0.17);

    let columns: Vec<f32> = COLUMNS.iter().map(|share| share * area.width()).collect();
    let font_size = theme.small_size * scale;
    let row_h = 52.0 * scale;
    let mut y = top + rise;

    let mut x = area.left();
    for (header, width) in HEADERS.iter().zip(&columns) {
        ui.painter().text(
            Pos2::new(x, y + row_h / 2.0),
            Align2::LEFT_CENTER,
            *header,
            FontId::proportional(font_size),
            Theme::with_opacity(theme.muted, body_opacity),
        );
        x += width;
    }
    y += row_h;
    rule(ui, area, y, Theme::with_opacity(theme.surface, body_opacity));

    for (i, row) in ROWS.iter().enumerate() {
        let t = reveal(cx.elapsed, 0.25 + i as f32 * 0.05, 0.3);
        let opacity = cx.opacity * t;
        let row_y = y + (1.0 - t) * 10.0 * scale;
        let mid = row_y + row_h / 2.0;
        let mut x = area.left();

        ui.painter().text(
            Pos2::new(x, mid),
            Align2::LEFT_CENTER,
            row.level,
            FontId::proportional(font_size),
            Theme::with_opacity(theme.foreground, opacity),
        );
        x += columns[0];

        pill(
            ui,
            row.location,
            Pos2::new(x, mid),
            FontId::monospace(font_size * 0.85),
            Theme::with_opacity(theme.accent, opacity),
            Theme::with_opacity(theme.surface, opacity),
            scale,
        );
        x += columns[1];

        pill(
            ui,
            row.priority.label(),
            Pos2::new(x, mid),
            FontId::monospace(font_size * 0.75),
            Theme::with_opacity(theme.background, opacity),
            Theme::with_opacity(row.priority.color(theme), opacity * 0.8),
            scale,
        );
        x += columns[2];

        ui.painter().text(
            Pos2::new(x, mid),
            Align2::LEFT_CENTER,
            row.loaded,
            FontId::proportional(font_size),
            Theme::with_opacity(theme.muted, opacity),
        );

        y += row_h;
        rule(ui, area, y, Theme::with_opacity(theme.surface, opacity * 0.5));
    }

    let t = reveal(cx.elapsed, 0.6, text::ENTRANCE);
    text::draw_markup(
        ui,
        INSIGHT,
        theme,
        Pos2::new(area.left(), y + 32.0 * scale + (1.0 - t) * 10.0 * scale),
        font_size,
        Theme::with_opacity(theme.muted, cx.opacity * t),
        area.width(),
    );

    SlideOutput::default()
}

fn rule(ui: &egui::Ui, area: Rect, y: f32, color: Color32) {
    ui.painter().line_segment(
        [Pos2::new(area.left(), y), Pos2::new(area.right(), y)],
        egui::Stroke::new(1.0, color),
    );
}

/// Text on a rounded background, vertically centered on `left_center`.
fn pill(
    ui: &egui::Ui,
    label: &str,
    left_center: Pos2,
    font: FontId,
    color: Color32,
    background: Color32,
    scale: f32,
) {
    let galley = ui.painter().layout_no_wrap(label.to_string(), font, color);
    let pad = egui::vec2(8.0, 4.0) * scale;
    let rect = Rect::from_min_size(
        Pos2::new(left_center.x, left_center.y - galley.rect.height() / 2.0 - pad.y),
        galley.rect.size() + pad * 2.0,
    );
    ui.painter().rect_filled(rect, 4.0 * scale, background);
    ui.painter().galley(rect.min + pad, galley, color);
}
