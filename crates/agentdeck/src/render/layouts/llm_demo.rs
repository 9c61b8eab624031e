use std::f32::consts::PI;

use eframe::egui::{self, Align2, FontId, Pos2, Rect};

use crate::deck::Breadcrumb;
use crate::render::text::reveal;
use crate::render::timeline::{DEMO_SEQUENCE, DemoStep, GenerationDemo, Stage};
use crate::render::{SlideCtx, SlideOutput};
use crate::theme::Theme;

/// Width of each pipeline box at 1080p; the probabilities box is wider.
const BOX_WIDTHS: [f32; 4] = [216.0, 216.0, 264.0, 216.0];
const BOX_HEIGHT: f32 = 312.0;

/// How long a box's contents take to slide in once its stage begins.
const STAGE_ENTRANCE: f32 = 0.3;

const DOTS: usize = 15;
const DOT_COLUMNS: usize = 5;
/// One pulse plus the pause before the next.
const PULSE_PERIOD: f32 = 1.1;
const PULSE_LENGTH: f32 = 0.6;

/// What the demo shows on a given frame.
struct Frame<'a> {
    step: &'static DemoStep,
    stage: Stage,
    generated: &'a str,
    finished: bool,
    running: bool,
    stage_elapsed: f32,
    indicator: String,
}

impl<'a> Frame<'a> {
    fn of(demo: &'a GenerationDemo, cx: &SlideCtx) -> Self {
        Self {
            step: demo.current_step(),
            stage: demo.stage(),
            generated: demo.generated_text(),
            finished: demo.is_finished(),
            running: !demo.is_finished(),
            stage_elapsed: demo.stage_elapsed(cx.now),
            indicator: demo.indicator(),
        }
    }

    /// The first stage, frozen. Used when the slide has no demo state.
    fn idle() -> Self {
        let step = &DEMO_SEQUENCE[0];
        Self {
            step,
            stage: Stage::Tokens,
            generated: step.input,
            finished: false,
            running: false,
            stage_elapsed: f32::MAX,
            indicator: format!(
                "Stage 1/{} \u{00b7} Iteration 1/{}",
                Stage::ALL.len(),
                DEMO_SEQUENCE.len()
            ),
        }
    }

    /// Entrance progress of the contents of pipeline box `index`.
    fn box_reveal(&self, index: usize) -> f32 {
        let current = self.stage.index();
        if index < current {
            1.0
        } else if index == current {
            reveal(self.stage_elapsed, 0.0, STAGE_ENTRANCE)
        } else {
            0.0
        }
    }

    /// The sampled token is shown in the result while the sample stage runs.
    fn pending_sample(&self) -> Option<&'static str> {
        (self.stage == Stage::Sample && !self.finished).then_some(self.step.sample)
    }
}

/// The four-stage generation pipeline, advancing on its own timer.
/// Clicking the slide after the last iteration starts it over.
pub fn render(
    cx: &SlideCtx,
    key: egui::Id,
    section: Option<&Breadcrumb>,
    title: &str,
    demo: Option<&mut GenerationDemo>,
) -> SlideOutput {
    let mut output = SlideOutput::default();
    let Some(demo) = demo else {
        draw(cx, key, section, title, &Frame::idle());
        return output;
    };

    output.repaint_now = demo.poll(cx.now);

    if demo.is_finished() && cx.interactive {
        let response = cx
            .ui
            .interact(cx.rect, key.with("restart"), egui::Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand);
        if response.clicked() && demo.reset(cx.now) {
            tracing::debug!("Generation demo restarted");
            output.repaint_now = true;
        }
    }

    let frame = Frame::of(demo, cx);
    draw(cx, key, section, title, &frame);

    let pulsing = frame.running && frame.stage.index() >= Stage::Embed.index();
    output.repaint_now |= pulsing || frame.stage_elapsed < 1.0;
    output.repaint_after = demo.next_wakeup(cx.now);
    output
}

fn draw(
    cx: &SlideCtx,
    key: egui::Id,
    section: Option<&Breadcrumb>,
    title: &str,
    frame: &Frame,
) {
    let ui = cx.ui;
    let theme = cx.theme;
    let scale = cx.scale;
    let area = cx.content_rect();
    let top = cx.header(section, title);
    let (opacity, rise) = cx.entrance(0.17);

    let value_font = FontId::monospace(26.0 * scale);
    let caption = 18.0 * scale;

    let input_h = labeled_line(
        cx,
        "Input:",
        &[(format!("\"{}\"", frame.step.input), theme.foreground)],
        Pos2::new(area.left(), top + rise),
        opacity,
    );

    let indicator_y = area.bottom() - caption * 1.4;
    let result_y = indicator_y - value_font.size * 1.4 - 32.0 * scale;
    let mut result = vec![(format!("\"{}", frame.generated), theme.foreground)];
    if let Some(sample) = frame.pending_sample() {
        let t = reveal(frame.stage_elapsed, 0.0, STAGE_ENTRANCE);
        result.push((sample.to_string(), Theme::with_opacity(theme.accent, t)));
    }
    result.push(("\"".to_string(), theme.foreground));
    labeled_line(
        cx,
        "Result:",
        &result,
        Pos2::new(area.left(), result_y + rise),
        opacity,
    );

    let pipeline_top = top + input_h + 32.0 * scale;
    let gap = 16.0 * scale;
    let arrow_w = 32.0 * scale;
    let total_w: f32 =
        BOX_WIDTHS.iter().sum::<f32>() * scale + 3.0 * (arrow_w + gap * 2.0);
    let box_h = (BOX_HEIGHT * scale).min(result_y - pipeline_top - 32.0 * scale);
    let box_y = pipeline_top + ((result_y - pipeline_top - box_h) / 2.0).max(0.0);
    let mut x = area.center().x - total_w / 2.0;
    for (i, stage) in Stage::ALL.into_iter().enumerate() {
        let rect = Rect::from_min_size(
            Pos2::new(x, box_y + rise),
            egui::vec2(BOX_WIDTHS[i] * scale, box_h),
        );
        draw_box(cx, key, frame, stage, rect, opacity);
        x = rect.right() + gap;
        if i + 1 < Stage::ALL.len() {
            ui.painter().text(
                Pos2::new(x + arrow_w / 2.0, rect.center().y),
                Align2::CENTER_CENTER,
                "\u{2192}",
                FontId::proportional(36.0 * scale),
                Theme::with_opacity(theme.muted, opacity * 0.4),
            );
            x += arrow_w + gap;
        }
    }

    let indicator_color = Theme::with_opacity(theme.muted, opacity);
    let indicator = ui.painter().layout_no_wrap(
        frame.indicator.clone(),
        FontId::proportional(caption),
        indicator_color,
    );
    let restart = frame.finished.then(|| {
        ui.painter().layout_no_wrap(
            "Click to restart".to_string(),
            FontId::proportional(caption),
            Theme::with_opacity(theme.accent, opacity),
        )
    });
    let spacing = 24.0 * scale;
    let line_w = indicator.rect.width()
        + restart
            .as_ref()
            .map_or(0.0, |g| spacing + g.rect.width());
    let mut x = area.center().x - line_w / 2.0;
    let indicator_w = indicator.rect.width();
    ui.painter()
        .galley(Pos2::new(x, indicator_y + rise), indicator, indicator_color);
    if let Some(restart) = restart {
        x += indicator_w + spacing;
        ui.painter()
            .galley(Pos2::new(x, indicator_y + rise), restart, theme.accent);
    }
}

/// Uppercase caption followed by monospace value runs. Returns the line height.
fn labeled_line(
    cx: &SlideCtx,
    label: &str,
    runs: &[(String, egui::Color32)],
    pos: Pos2,
    opacity: f32,
) -> f32 {
    let scale = cx.scale;
    let caption = super::draw_caption(cx.ui, label, cx.theme, pos, 18.0 * scale, opacity);

    let mut job = egui::text::LayoutJob::default();
    for (text, color) in runs {
        let alpha = color.a() as f32 / 255.0;
        job.append(
            text,
            0.0,
            egui::text::TextFormat {
                font_id: FontId::monospace(26.0 * scale),
                color: Theme::with_opacity(*color, opacity * alpha),
                ..Default::default()
            },
        );
    }
    let galley = cx.ui.painter().layout_job(job);
    let height = galley.rect.height().max(caption.y);
    let value_pos = Pos2::new(
        pos.x + caption.x + 12.0 * scale,
        pos.y + (caption.y - galley.rect.height()) / 2.0,
    );
    cx.ui
        .painter()
        .galley(value_pos, galley, cx.theme.foreground);
    height
}

fn draw_box(
    cx: &SlideCtx,
    key: egui::Id,
    frame: &Frame,
    stage: Stage,
    rect: Rect,
    opacity: f32,
) {
    let theme = cx.theme;
    let scale = cx.scale;
    let active = frame.stage.index() >= stage.index();
    let rounding = 8.0 * scale;

    let (border, fill) = if active {
        (
            Theme::with_opacity(theme.accent, opacity * 0.6),
            Theme::with_opacity(theme.surface, opacity * 0.3),
        )
    } else {
        (
            Theme::with_opacity(theme.surface, opacity),
            Theme::with_opacity(theme.surface, opacity * 0.1),
        )
    };
    cx.ui.painter().rect_filled(rect, rounding, fill);
    cx.ui.painter().rect_stroke(
        rect,
        rounding,
        egui::Stroke::new(2.0 * scale, border),
        egui::StrokeKind::Inside,
    );

    let t = frame.box_reveal(stage.index());
    if t <= 0.0 {
        return;
    }

    // Contents slide in from the right and stay inside the box.
    let mut child = egui::Ui::new(
        cx.ui.ctx().clone(),
        key.with(("box", stage.index())),
        egui::UiBuilder::new()
            .layer_id(cx.ui.layer_id())
            .max_rect(rect),
    );
    child.set_clip_rect(rect.intersect(cx.ui.clip_rect()));
    let shifted = rect.translate(egui::vec2((1.0 - t) * 50.0 * scale, 0.0));
    let opacity = opacity * t;

    let pad = 16.0 * scale;
    let caption = super::draw_caption(
        &child,
        stage.label(),
        theme,
        Pos2::new(
            shifted.center().x - caption_width(&child, stage.label(), 14.0 * scale) / 2.0,
            shifted.top() + pad,
        ),
        14.0 * scale,
        opacity,
    );
    let body = Rect::from_min_max(
        Pos2::new(shifted.left() + pad, shifted.top() + pad + caption.y),
        shifted.max - egui::vec2(pad, pad),
    );

    match stage {
        Stage::Tokens => draw_tokens(cx, &child, frame, body, opacity),
        Stage::Embed => draw_embeddings(cx, &child, frame, body, opacity),
        Stage::Probs => draw_probabilities(cx, &child, frame, body, opacity),
        Stage::Sample => draw_sample(cx, &child, frame, body, opacity),
    }
}

fn caption_width(ui: &egui::Ui, label: &str, size: f32) -> f32 {
    ui.painter()
        .layout_no_wrap(
            label.to_uppercase(),
            FontId::proportional(size),
            egui::Color32::WHITE,
        )
        .rect
        .width()
}

/// Token chips stacked in a centered column, appearing one after another.
fn draw_tokens(cx: &SlideCtx, ui: &egui::Ui, frame: &Frame, body: Rect, opacity: f32) {
    let font = 16.0 * cx.scale;
    let gap = 4.0 * cx.scale;
    let tokens = frame.step.tokens;
    let sizes: Vec<egui::Vec2> = tokens
        .iter()
        .map(|token| super::chip_size(ui, token, font))
        .collect();
    let total_h = sizes.iter().map(|s| s.y).sum::<f32>() + gap * (tokens.len() as f32 - 1.0);
    let mut y = body.center().y - total_h / 2.0;

    let elapsed = token_clock(frame);
    for (i, (token, size)) in tokens.iter().zip(&sizes).enumerate() {
        let t = reveal(elapsed, i as f32 * 0.05, 0.2);
        let rise = (1.0 - t) * 10.0 * cx.scale;
        super::draw_chip(
            ui,
            token,
            cx.theme.token_color(i),
            Pos2::new(body.center().x - size.x / 2.0, y + rise),
            font,
            opacity * t,
        );
        y += size.y + gap;
    }
}

/// Seconds since the tokens box was filled; later stages see it fully settled.
fn token_clock(frame: &Frame) -> f32 {
    if frame.stage == Stage::Tokens {
        frame.stage_elapsed
    } else {
        f32::MAX
    }
}

/// A pulsing grid of dots over a truncated vector.
fn draw_embeddings(cx: &SlideCtx, ui: &egui::Ui, frame: &Frame, body: Rect, opacity: f32) {
    let scale = cx.scale;
    let radius = 5.0 * scale;
    let step = 16.0 * scale;
    let rows = DOTS.div_ceil(DOT_COLUMNS);
    let grid = egui::vec2(
        (DOT_COLUMNS - 1) as f32 * step,
        (rows - 1) as f32 * step,
    );
    let label_h = 16.0 * scale;
    let origin = body.center() - (grid + egui::vec2(0.0, label_h + 12.0 * scale)) / 2.0;

    for i in 0..DOTS {
        let center = origin
            + egui::vec2(
                (i % DOT_COLUMNS) as f32 * step,
                (i / DOT_COLUMNS) as f32 * step,
            );
        let (grow, glow) = if frame.running {
            pulse(cx.elapsed - i as f32 * 0.03)
        } else {
            (1.0, 0.8)
        };
        ui.painter().circle_filled(
            center,
            radius * grow,
            Theme::with_opacity(cx.theme.accent, opacity * glow),
        );
    }

    ui.painter().text(
        Pos2::new(body.center().x, origin.y + grid.y + radius + 12.0 * scale),
        Align2::CENTER_TOP,
        "[0.12, -0.34, ...]",
        FontId::monospace(13.0 * scale),
        Theme::with_opacity(cx.theme.muted, opacity * 0.6),
    );
}

/// Size and brightness of a dot `t` seconds into its pulse cycle.
fn pulse(t: f32) -> (f32, f32) {
    if t <= 0.0 {
        return (1.0, 0.4);
    }
    let phase = (t % PULSE_PERIOD) / PULSE_LENGTH;
    if phase >= 1.0 {
        return (1.0, 0.6);
    }
    let swell = (phase * PI).sin();
    let brightness = if phase < 0.5 {
        0.4 + 0.6 * (phase * 2.0)
    } else {
        1.0 - 0.4 * ((phase - 0.5) * 2.0)
    };
    (1.0 + 0.3 * swell, brightness)
}

/// Candidate next tokens with their probabilities as bars.
fn draw_probabilities(cx: &SlideCtx, ui: &egui::Ui, frame: &Frame, body: Rect, opacity: f32) {
    let theme = cx.theme;
    let scale = cx.scale;
    let font = FontId::monospace(14.0 * scale);
    let row_h = 18.0 * scale;
    let gap = 10.0 * scale;
    let label_w = 56.0 * scale;
    let pct_w = 44.0 * scale;
    let rows = frame.step.probabilities;
    let total_h = rows.len() as f32 * row_h + (rows.len() as f32 - 1.0) * gap;
    let mut y = body.center().y - total_h / 2.0;
    let elapsed = if frame.stage == Stage::Probs {
        frame.stage_elapsed
    } else {
        f32::MAX
    };

    for (i, (token, prob)) in rows.iter().enumerate() {
        let mid = y + row_h / 2.0;
        ui.painter().text(
            Pos2::new(body.left() + label_w, mid),
            Align2::RIGHT_CENTER,
            *token,
            font.clone(),
            Theme::with_opacity(theme.muted, opacity),
        );
        let track = Rect::from_min_max(
            Pos2::new(body.left() + label_w + 8.0 * scale, y),
            Pos2::new(body.right() - pct_w, y + row_h),
        );
        let fill = if i == 0 {
            Theme::with_opacity(theme.accent, opacity)
        } else {
            Theme::with_opacity(theme.muted, opacity * 0.4)
        };
        super::draw_bar(
            ui,
            track,
            prob * reveal(elapsed, i as f32 * 0.08, 0.5),
            fill,
            Some(Theme::with_opacity(theme.surface, opacity)),
            4.0 * scale,
        );
        ui.painter().text(
            Pos2::new(track.right() + 8.0 * scale, mid),
            Align2::LEFT_CENTER,
            percent(*prob),
            font.clone(),
            Theme::with_opacity(theme.muted, opacity),
        );
        y += row_h + gap;
    }
}

/// "92%"
fn percent(prob: f32) -> String {
    format!("{}%", (prob * 100.0).round() as u32)
}

/// The chosen token, popping in with a glow.
fn draw_sample(cx: &SlideCtx, ui: &egui::Ui, frame: &Frame, body: Rect, opacity: f32) {
    let theme = cx.theme;
    let scale = cx.scale;
    let elapsed = if frame.stage == Stage::Sample {
        frame.stage_elapsed
    } else {
        f32::MAX
    };
    let pop = 0.8 + 0.2 * reveal(elapsed, 0.0, 0.25);
    let font = FontId::monospace(20.0 * scale * pop);
    let color = Theme::with_opacity(theme.accent, opacity);
    let galley = ui.painter().layout_no_wrap(
        format!("\u{2192} \"{}\"", frame.step.sample),
        font,
        color,
    );
    let pad = egui::vec2(16.0, 12.0) * scale * pop;
    let chip = Rect::from_center_size(body.center(), galley.rect.size() + pad * 2.0);
    let glow = if frame.running {
        0.5 + 0.5 * (cx.elapsed * PI * 2.0).sin().abs()
    } else {
        0.5
    };
    ui.painter().rect_filled(
        chip.expand(4.0 * scale * glow),
        12.0 * scale,
        Theme::with_opacity(theme.accent, opacity * 0.08 * glow),
    );
    ui.painter()
        .rect_filled(chip, 8.0 * scale, Theme::with_opacity(theme.accent, opacity * 0.2));
    ui.painter().galley(chip.min + pad, galley, color);
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn test_boxes_fill_up_to_the_current_stage() {
        let t0 = Instant::now();
        let mut demo = GenerationDemo::start(t0);
        let later = t0 + Stage::Tokens.dwell() + Duration::from_millis(50);
        demo.poll(later);
        assert_eq!(demo.stage(), Stage::Embed);

        let frame = Frame {
            stage_elapsed: 10.0,
            ..Frame::idle()
        };
        assert_eq!(frame.box_reveal(0), 1.0);
        assert_eq!(frame.box_reveal(1), 0.0);

        let frame = Frame {
            stage: demo.stage(),
            stage_elapsed: demo.stage_elapsed(later),
            ..Frame::idle()
        };
        assert_eq!(frame.box_reveal(0), 1.0);
        assert!(frame.box_reveal(1) < 1.0, "embeddings still sliding in");
        assert_eq!(frame.box_reveal(2), 0.0);
        assert_eq!(frame.box_reveal(3), 0.0);
    }

    #[test]
    fn test_sample_shows_in_result_only_while_sampling() {
        let frame = Frame {
            stage: Stage::Sample,
            ..Frame::idle()
        };
        assert_eq!(frame.pending_sample(), Some(" Paris"));

        let finished = Frame {
            stage: Stage::Sample,
            finished: true,
            ..Frame::idle()
        };
        assert_eq!(finished.pending_sample(), None);

        assert_eq!(Frame::idle().pending_sample(), None);
    }

    #[test]
    fn test_idle_indicator_matches_a_fresh_demo() {
        let demo = GenerationDemo::start(Instant::now());
        assert_eq!(Frame::idle().indicator, demo.indicator());
    }

    #[test]
    fn test_pulse_shape() {
        assert_eq!(pulse(-0.5), (1.0, 0.4));
        let (grow, glow) = pulse(PULSE_LENGTH / 2.0);
        assert!((grow - 1.3).abs() < 1e-4);
        assert!((glow - 1.0).abs() < 1e-4);
        assert_eq!(pulse(PULSE_LENGTH + 0.1), (1.0, 0.6), "resting between pulses");
        let a = pulse(0.2);
        let b = pulse(0.2 + PULSE_PERIOD);
        assert!((a.0 - b.0).abs() < 1e-4 && (a.1 - b.1).abs() < 1e-4);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.92), "92%");
        assert_eq!(percent(0.03), "3%");
        assert_eq!(percent(1.0), "100%");
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        for step in &DEMO_SEQUENCE {
            let total: f32 = step.probabilities.iter().map(|(_, p)| p).sum();
            assert!((total - 1.0).abs() < 1e-3, "{}: {total}", step.input);
        }
    }

    #[test]
    fn test_stage_boxes_render_mid_run() {
        let ctx = egui::Context::default();
        let theme = Theme::default();
        let screen = Rect::from_min_size(Pos2::ZERO, egui::vec2(1920.0, 1080.0));
        let t0 = Instant::now();
        let mut demo = GenerationDemo::start(t0);
        let now = t0 + Stage::Tokens.dwell() + Stage::Embed.dwell() + Duration::from_millis(400);

        let mut output = SlideOutput::default();
        let input = egui::RawInput {
            screen_rect: Some(screen),
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let cx = SlideCtx {
                    ui,
                    theme: &theme,
                    rect: screen,
                    opacity: 1.0,
                    scale: 1.0,
                    elapsed: 10.0,
                    now,
                    interactive: true,
                };
                output = render(&cx, egui::Id::new(4), None, "Demo", Some(&mut demo));
            });
        });

        assert_eq!(demo.stage(), Stage::Probs);
        assert!(output.repaint_now, "embeddings pulse while running");
        assert!(output.repaint_after.is_some());
    }
}
