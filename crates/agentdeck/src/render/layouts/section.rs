use eframe::egui::FontId;

use crate::render::text;
use crate::render::{SlideCtx, SlideOutput};
use crate::theme::Theme;

/// Divider slide: the section number in accent monospace above its title.
pub fn render(cx: &SlideCtx, number: &str, title: &str) -> SlideOutput {
    let ui = cx.ui;
    let theme = cx.theme;
    let scale = cx.scale;
    let center_x = cx.rect.center().x;

    let number_font = FontId::monospace(theme.section_size * 0.6 * scale);
    let title_font = FontId::proportional(theme.section_size * 0.6 * scale);
    let gap = 16.0 * scale;
    let total = number_font.size * 1.2 + gap + title_font.size * 1.2;
    let top = cx.rect.center().y - total / 2.0;

    let (opacity, rise) = cx.entrance(0.07);
    let number_size = text::draw_label_centered(
        ui,
        number,
        number_font,
        Theme::with_opacity(theme.accent, opacity),
        center_x,
        top + rise,
    );

    let (opacity, rise) = cx.entrance(0.17);
    text::draw_label_centered(
        ui,
        title,
        title_font,
        Theme::with_opacity(theme.foreground, opacity),
        center_x,
        top + number_size.y + gap + rise,
    );

    SlideOutput::default()
}
