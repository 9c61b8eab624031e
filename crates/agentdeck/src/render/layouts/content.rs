use eframe::egui::Pos2;

use crate::deck::{Breadcrumb, Content};
use crate::render::text;
use crate::render::{SlideCtx, SlideOutput};
use crate::theme::Theme;

pub fn render(
    cx: &SlideCtx,
    section: Option<&Breadcrumb>,
    title: &str,
    content: &Content,
) -> SlideOutput {
    let area = cx.content_rect();
    let y = cx.header(section, title);

    match content {
        Content::Text(body) => {
            let (opacity, rise) = cx.entrance(0.17);
            text::draw_markup(
                cx.ui,
                body,
                cx.theme,
                Pos2::new(area.left(), y + rise),
                cx.theme.body_size * cx.scale,
                Theme::with_opacity(cx.theme.muted, opacity),
                area.width(),
            );
        }
        Content::Items(items) => {
            let nodes = text::bullet_tree(items);
            text::draw_bullets(
                cx.ui,
                &nodes,
                cx.theme,
                Pos2::new(area.left(), y),
                area.width(),
                cx.opacity,
                cx.scale,
                cx.elapsed,
                0.17,
            );
        }
    }

    SlideOutput::default()
}
