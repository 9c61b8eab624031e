use eframe::egui::{self, Color32, FontFamily, FontId, Pos2};

use crate::deck::inline::{self, Span};
use crate::deck::{Breadcrumb, ContentItem};
use crate::theme::Theme;

/// Entrance duration shared by every animated element.
pub const ENTRANCE: f32 = 0.35;

/// Vertical distance an element rises while it fades in.
pub const RISE: f32 = 20.0;

/// Progress of an entrance animation that starts `delay` seconds after the
/// slide became active: 0 before, 1 once `duration` has passed.
pub fn reveal(elapsed: f32, delay: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return if elapsed >= delay { 1.0 } else { 0.0 };
    }
    let t = ((elapsed - delay) / duration).clamp(0.0, 1.0);
    // ease-out
    1.0 - (1.0 - t) * (1.0 - t)
}

/// A bullet with its formatted text and any nested bullets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletNode {
    pub spans: Vec<Span>,
    pub children: Vec<BulletNode>,
}

/// Structure content items for rendering: a plain string becomes a leaf,
/// a group becomes its heading with the sub-bullets nested beneath it.
pub fn bullet_tree(items: &[ContentItem]) -> Vec<BulletNode> {
    items
        .iter()
        .map(|item| match item {
            ContentItem::Bullet(text) => BulletNode {
                spans: inline::format(text),
                children: Vec::new(),
            },
            ContentItem::Group { heading, bullets } => BulletNode {
                spans: inline::format(heading),
                children: bullets
                    .iter()
                    .map(|b| BulletNode {
                        spans: inline::format(b),
                        children: Vec::new(),
                    })
                    .collect(),
            },
        })
        .collect()
}

/// Create a LayoutJob from spans.
pub fn spans_to_job(
    spans: &[Span],
    font_size: f32,
    color: Color32,
    theme: &Theme,
    max_width: f32,
) -> egui::text::LayoutJob {
    let mut job = egui::text::LayoutJob::default();
    job.wrap.max_width = max_width;
    let alpha = color.a() as f32 / 255.0;

    for span in spans {
        let format = match span {
            Span::Text(_) => egui::text::TextFormat {
                font_id: FontId::new(font_size, FontFamily::Proportional),
                color,
                ..Default::default()
            },
            Span::Bold(_) => egui::text::TextFormat {
                font_id: FontId::new(font_size + 1.0, FontFamily::Proportional),
                color: Theme::with_opacity(Color32::WHITE, alpha),
                ..Default::default()
            },
            Span::Italic(_) => egui::text::TextFormat {
                font_id: FontId::new(font_size, FontFamily::Proportional),
                color,
                italics: true,
                ..Default::default()
            },
            Span::Code(_) => egui::text::TextFormat {
                font_id: FontId::new(font_size * 0.85, FontFamily::Monospace),
                color: Theme::with_opacity(theme.accent, alpha),
                background: Theme::with_opacity(theme.surface, alpha * 0.6),
                ..Default::default()
            },
            Span::Link { .. } => egui::text::TextFormat {
                font_id: FontId::new(font_size, FontFamily::Proportional),
                color: Theme::with_opacity(theme.teal, alpha),
                underline: egui::Stroke::new(1.0, Theme::with_opacity(theme.teal, alpha * 0.6)),
                ..Default::default()
            },
        };
        job.append(span.visible(), 0.0, format);
    }
    job
}

/// Layout and paint spans, returning the height used.
pub fn draw_spans(
    ui: &egui::Ui,
    spans: &[Span],
    theme: &Theme,
    pos: Pos2,
    font_size: f32,
    color: Color32,
    max_width: f32,
) -> f32 {
    let job = spans_to_job(spans, font_size, color, theme, max_width);
    let galley = ui.painter().layout_job(job);
    let height = galley.rect.height();
    ui.painter().galley(pos, galley, color);
    height
}

/// Format and paint a markup string. Returns height used.
pub fn draw_markup(
    ui: &egui::Ui,
    text: &str,
    theme: &Theme,
    pos: Pos2,
    font_size: f32,
    color: Color32,
    max_width: f32,
) -> f32 {
    draw_spans(ui, &inline::format(text), theme, pos, font_size, color, max_width)
}

/// Draw plain text without wrapping. Returns the galley size.
pub fn draw_label(
    ui: &egui::Ui,
    text: impl Into<String>,
    font: FontId,
    color: Color32,
    pos: Pos2,
) -> egui::Vec2 {
    let galley = ui.painter().layout_no_wrap(text.into(), font, color);
    let size = galley.rect.size();
    ui.painter().galley(pos, galley, color);
    size
}

/// Draw plain text centered horizontally on `center_x`. Returns the galley size.
pub fn draw_label_centered(
    ui: &egui::Ui,
    text: impl Into<String>,
    font: FontId,
    color: Color32,
    center_x: f32,
    top: f32,
) -> egui::Vec2 {
    let galley = ui.painter().layout_no_wrap(text.into(), font, color);
    let size = galley.rect.size();
    let pos = Pos2::new(center_x - size.x / 2.0, top);
    ui.painter().galley(pos, galley, color);
    size
}

/// Section badge (accent square with the number) followed by the section title.
/// Returns height used.
pub fn draw_breadcrumb(
    ui: &egui::Ui,
    breadcrumb: &Breadcrumb,
    theme: &Theme,
    pos: Pos2,
    opacity: f32,
    scale: f32,
) -> f32 {
    let badge = 40.0 * scale;
    let badge_rect = egui::Rect::from_min_size(pos, egui::vec2(badge, badge));
    ui.painter()
        .rect_filled(badge_rect, 0.0, Theme::with_opacity(theme.accent, opacity));

    let number_color = Theme::with_opacity(theme.background, opacity);
    let galley = ui.painter().layout_no_wrap(
        breadcrumb.number.clone(),
        FontId::monospace(18.0 * scale),
        number_color,
    );
    let number_pos = badge_rect.center() - galley.rect.size() / 2.0;
    ui.painter().galley(number_pos, galley, number_color);

    let title_color = Theme::with_opacity(theme.muted, opacity);
    let galley = ui.painter().layout_no_wrap(
        breadcrumb.title.clone(),
        FontId::proportional(24.0 * scale),
        title_color,
    );
    let title_pos = Pos2::new(
        badge_rect.right() + 14.0 * scale,
        badge_rect.center().y - galley.rect.height() / 2.0,
    );
    ui.painter().galley(title_pos, galley, title_color);

    badge
}

/// Draw a slide title. Returns height used.
pub fn draw_title(
    ui: &egui::Ui,
    title: &str,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let color = Theme::with_opacity(theme.foreground, opacity);
    draw_markup(ui, title, theme, pos, theme.title_size * scale, color, max_width)
}

/// Draw a bullet list. Top-level bullets enter one after another starting at
/// `delay`; nested bullets enter with their parent. Returns height used.
#[allow(clippy::too_many_arguments)]
pub fn draw_bullets(
    ui: &egui::Ui,
    nodes: &[BulletNode],
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
    elapsed: f32,
    delay: f32,
) -> f32 {
    let mut y = pos.y;
    for (i, node) in nodes.iter().enumerate() {
        let t = reveal(elapsed, delay + i as f32 * 0.08, ENTRANCE);
        let rise = (1.0 - t) * RISE * scale;
        let h = draw_bullet_node(
            ui,
            node,
            theme,
            Pos2::new(pos.x, y + rise),
            max_width,
            opacity * t,
            0,
            scale,
        );
        y += h;
    }
    y - pos.y
}

#[allow(clippy::too_many_arguments)]
fn draw_bullet_node(
    ui: &egui::Ui,
    node: &BulletNode,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    depth: usize,
    scale: f32,
) -> f32 {
    let indent = 44.0 * scale * depth as f32;
    let marker_width = 36.0 * scale;
    let spacing = (if depth == 0 { 18.0 } else { 10.0 }) * scale;
    let font_size = if depth == 0 {
        theme.body_size * scale
    } else {
        theme.body_size * 0.85 * scale
    };

    let (marker, marker_color) = if depth == 0 {
        ("\u{25A0}", theme.accent)
    } else {
        ("\u{2013}", theme.muted)
    };
    let marker_color = Theme::with_opacity(marker_color, opacity);
    let marker_galley = ui.painter().layout_no_wrap(
        marker.to_string(),
        FontId::proportional(font_size * 0.5),
        marker_color,
    );
    let marker_pos = Pos2::new(
        pos.x + indent,
        pos.y + (font_size - marker_galley.rect.height()) / 2.0 + 2.0 * scale,
    );
    ui.painter().galley(marker_pos, marker_galley, marker_color);

    let color = if depth == 0 {
        theme.foreground
    } else {
        theme.muted
    };
    let text_pos = Pos2::new(pos.x + indent + marker_width, pos.y);
    let text_width = max_width - indent - marker_width;
    let mut height = draw_spans(
        ui,
        &node.spans,
        theme,
        text_pos,
        font_size,
        Theme::with_opacity(color, opacity),
        text_width,
    ) + spacing;

    for child in &node.children {
        height += draw_bullet_node(
            ui,
            child,
            theme,
            Pos2::new(pos.x, pos.y + height),
            max_width,
            opacity,
            depth + 1,
            scale,
        );
    }
    height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullet(s: &str) -> ContentItem {
        ContentItem::Bullet(s.to_string())
    }

    fn text_of(node: &BulletNode) -> String {
        inline::visible_text(&node.spans)
    }

    #[test]
    fn test_group_nests_its_bullets() {
        let items = vec![
            bullet("A"),
            ContentItem::Group {
                heading: "B".to_string(),
                bullets: vec!["C".to_string(), "D".to_string()],
            },
        ];
        let tree = bullet_tree(&items);
        assert_eq!(tree.len(), 2);
        assert_eq!(text_of(&tree[0]), "A");
        assert!(tree[0].children.is_empty());
        assert_eq!(text_of(&tree[1]), "B");
        let children: Vec<String> = tree[1].children.iter().map(text_of).collect();
        assert_eq!(children, vec!["C", "D"]);
        assert!(tree[1].children.iter().all(|c| c.children.is_empty()));
    }

    #[test]
    fn test_bullets_are_formatted() {
        let tree = bullet_tree(&[bullet("**Bold** claim")]);
        assert_eq!(
            tree[0].spans,
            vec![
                Span::Bold("Bold".to_string()),
                Span::Text(" claim".to_string()),
            ]
        );
    }

    #[test]
    fn test_heading_only_group() {
        let tree = bullet_tree(&[ContentItem::Group {
            heading: "Alone".to_string(),
            bullets: vec![],
        }]);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_reveal_timing() {
        assert_eq!(reveal(0.0, 0.1, 0.35), 0.0);
        assert_eq!(reveal(0.1, 0.1, 0.35), 0.0);
        assert_eq!(reveal(0.45, 0.1, 0.35), 1.0);
        assert_eq!(reveal(100.0, 0.1, 0.35), 1.0);
        let mid = reveal(0.275, 0.1, 0.35);
        assert!(mid > 0.5 && mid < 1.0, "ease-out is past halfway at the midpoint: {mid}");
    }

    #[test]
    fn test_reveal_zero_duration_is_a_step() {
        assert_eq!(reveal(0.0, 0.5, 0.0), 0.0);
        assert_eq!(reveal(0.5, 0.5, 0.0), 1.0);
    }
}
