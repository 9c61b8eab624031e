use eframe::egui::{self, FontId, Pos2, Rect};

use crate::deck::Breadcrumb;
use crate::render::tokenize;
use crate::render::{SlideCtx, SlideOutput};
use crate::theme::Theme;

pub const SAMPLE_TEXT: &str = "Hello, world! This is a tokenizer demo. \
    Try typing something to see how text is split into tokens.";

/// Text typed into the token counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerState {
    pub text: String,
}

impl Default for TokenizerState {
    fn default() -> Self {
        Self {
            text: SAMPLE_TEXT.to_string(),
        }
    }
}

/// Editable text, its token count, and the tokens as colored chips.
pub fn render(
    cx: &SlideCtx,
    key: egui::Id,
    section: Option<&Breadcrumb>,
    title: &str,
    state: Option<&mut TokenizerState>,
) -> SlideOutput {
    let ui = cx.ui;
    let theme = cx.theme;
    let scale = cx.scale;
    let area = cx.content_rect();
    let mut y = cx.header(section, title);

    let (opacity, rise) = cx.entrance(0.17);
    let editor_rect = Rect::from_min_size(
        Pos2::new(area.left(), y + rise),
        egui::vec2(area.width(), 160.0 * scale),
    );
    let mut sample = SAMPLE_TEXT;
    let (text, has_focus) = match state {
        Some(state) => {
            let focused = draw_editor(cx, key, editor_rect, opacity, &mut state.text);
            (state.text.as_str(), focused)
        }
        None => {
            draw_editor(cx, key, editor_rect, opacity, &mut sample);
            (sample, false)
        }
    };
    y = editor_rect.bottom() + 32.0 * scale;

    let tokens = tokenize::tokenize(text);

    let (opacity, rise) = cx.entrance(0.27);
    let count_font = FontId::proportional(theme.body_size * scale);
    let mut job = egui::text::LayoutJob::default();
    job.append(
        &tokens.len().to_string(),
        0.0,
        egui::text::TextFormat {
            font_id: FontId::proportional(count_font.size + 1.0),
            color: Theme::with_opacity(theme.accent, opacity),
            ..Default::default()
        },
    );
    let label = tokenize::count_label(tokens.len());
    let unit = label.split_once(' ').map_or("", |(_, unit)| unit);
    job.append(
        unit,
        count_font.size * 0.3,
        egui::text::TextFormat {
            font_id: count_font,
            color: Theme::with_opacity(theme.muted, opacity),
            ..Default::default()
        },
    );
    let galley = ui.painter().layout_job(job);
    let count_h = galley.rect.height();
    ui.painter()
        .galley(Pos2::new(area.left(), y + rise), galley, theme.muted);
    y += count_h + 32.0 * scale;

    let (opacity, rise) = cx.entrance(0.37);
    let chip_font = theme.small_size * scale;
    let gap = 4.0 * scale;
    let mut x = area.left();
    let mut row_h: f32 = 0.0;
    for (i, token) in tokens.iter().enumerate() {
        let size = super::chip_size(ui, token, chip_font);
        if x + size.x > area.right() && x > area.left() {
            x = area.left();
            y += row_h + gap;
            row_h = 0.0;
        }
        if y + size.y > cx.rect.bottom() {
            break;
        }
        super::draw_chip(
            ui,
            token,
            theme.token_color(i),
            Pos2::new(x, y + rise),
            chip_font,
            opacity,
        );
        x += size.x + gap;
        row_h = row_h.max(size.y);
    }

    SlideOutput {
        wants_keyboard: has_focus,
        ..Default::default()
    }
}

/// Returns whether the editor holds keyboard focus.
fn draw_editor(
    cx: &SlideCtx,
    key: egui::Id,
    rect: Rect,
    opacity: f32,
    text: &mut dyn egui::TextBuffer,
) -> bool {
    let theme = cx.theme;
    let mut child = egui::Ui::new(
        cx.ui.ctx().clone(),
        key.with("editor"),
        egui::UiBuilder::new()
            .layer_id(cx.ui.layer_id())
            .max_rect(rect),
    );
    child.set_clip_rect(rect.intersect(cx.ui.clip_rect()));
    child.multiply_opacity(opacity);
    let editor = egui::TextEdit::multiline(text)
        .id(key.with("text"))
        .font(FontId::monospace(theme.small_size * 1.1 * cx.scale))
        .text_color(theme.foreground)
        .background_color(Theme::with_opacity(theme.surface, 0.5))
        .margin(egui::Margin::same((16.0 * cx.scale) as i8))
        .hint_text("Type something to see tokens...");
    let response = child.add_enabled_ui(cx.interactive, |ui| {
        ui.add_sized(rect.size(), editor)
    });
    response.inner.has_focus()
}
