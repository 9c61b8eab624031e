pub mod background;
pub mod chrome;
pub mod image_cache;
pub mod layouts;
pub mod shader;
pub mod text;
pub mod timeline;
pub mod tokenize;
pub mod transition;

use std::time::{Duration, Instant};

use eframe::egui;

use crate::deck::{Breadcrumb, Slide, SlideKind, SlideTag};
use crate::theme::Theme;

use background::{Backdrop, BackgroundSource};
use image_cache::ImageCache;
use layouts::tokenizer::TokenizerState;
use timeline::GenerationDemo;

/// Time after activation at which every entrance animation has finished.
pub const SETTLE: Duration = Duration::from_secs(60);

/// Entrances, staggered bullets and bar growth are all done by then.
const ANIMATION_WINDOW: f32 = 2.5;

/// Where and how one slide is drawn this frame.
#[derive(Clone, Copy)]
pub struct SlideCtx<'a> {
    pub ui: &'a egui::Ui,
    pub theme: &'a Theme,
    pub rect: egui::Rect,
    pub opacity: f32,
    pub scale: f32,
    /// Seconds since the slide became active.
    pub elapsed: f32,
    pub now: Instant,
    /// False for a slide that is leaving, or when rendering for export.
    pub interactive: bool,
}

impl SlideCtx<'_> {
    /// Opacity and downward offset of an element entering `delay` seconds in.
    pub fn entrance(&self, delay: f32) -> (f32, f32) {
        let t = text::reveal(self.elapsed, delay, text::ENTRANCE);
        (self.opacity * t, (1.0 - t) * text::RISE * self.scale)
    }

    pub fn padding(&self) -> egui::Vec2 {
        egui::vec2(96.0, 72.0) * self.scale
    }

    pub fn content_rect(&self) -> egui::Rect {
        self.rect.shrink2(self.padding())
    }

    /// Breadcrumb and title at the top of the content area. Returns the y at
    /// which the slide body starts.
    pub fn header(&self, section: Option<&Breadcrumb>, title: &str) -> f32 {
        let area = self.content_rect();
        let mut y = area.top();

        if let Some(breadcrumb) = section {
            let (opacity, rise) = self.entrance(0.0);
            let h = text::draw_breadcrumb(
                self.ui,
                breadcrumb,
                self.theme,
                egui::pos2(area.left(), y + rise),
                opacity,
                self.scale,
            );
            y += h + 16.0 * self.scale;
        }

        let (opacity, rise) = self.entrance(0.07);
        let h = text::draw_title(
            self.ui,
            title,
            self.theme,
            egui::pos2(area.left(), y + rise),
            area.width(),
            opacity,
            self.scale,
        );
        y + h + 40.0 * self.scale
    }
}

/// What a slide asks of the frame loop after drawing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlideOutput {
    /// A text field has focus; navigation keys must not be processed.
    pub wants_keyboard: bool,
    pub repaint_now: bool,
    pub repaint_after: Option<Duration>,
}

impl SlideOutput {
    pub fn merge(self, other: SlideOutput) -> SlideOutput {
        let repaint_after = match (self.repaint_after, other.repaint_after) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        SlideOutput {
            wants_keyboard: self.wants_keyboard || other.wants_keyboard,
            repaint_now: self.repaint_now || other.repaint_now,
            repaint_after,
        }
    }
}

/// Per-slide local state, alive only while its slide is on screen.
pub enum SlideState {
    Cover(Backdrop),
    Tokenizer(TokenizerState),
    LlmDemo(GenerationDemo),
    Static,
}

impl SlideState {
    pub fn activate(
        kind: &SlideKind,
        backgrounds: &BackgroundSource,
        theme: &Theme,
        now: Instant,
    ) -> Self {
        match kind {
            SlideKind::Cover { .. } => Self::Cover(backgrounds.backdrop(theme, now)),
            SlideKind::Tokenizer { .. } => Self::Tokenizer(TokenizerState::default()),
            SlideKind::LlmDemo { .. } => Self::LlmDemo(GenerationDemo::start(now)),
            SlideKind::Section { .. }
            | SlideKind::Content { .. }
            | SlideKind::ContextGraph { .. }
            | SlideKind::LostMiddle { .. }
            | SlideKind::Image { .. }
            | SlideKind::AgentList { .. }
            | SlideKind::SubscriptionValue { .. }
            | SlideKind::ClaudeHierarchy { .. }
            | SlideKind::SddWorkflow { .. } => Self::Static,
        }
    }

    /// Stop everything that advances on its own. The state may still be drawn
    /// while its slide transitions out.
    pub fn deactivate(&mut self, now: Instant) {
        match self {
            Self::Cover(backdrop) => backdrop.set_paused(true, now),
            Self::LlmDemo(demo) => demo.deactivate(),
            Self::Tokenizer(_) | Self::Static => {}
        }
    }
}

/// The slide under the cursor (or leaving it) together with its local state.
pub struct ActiveSlide {
    pub index: usize,
    pub state: SlideState,
    activated: Instant,
}

impl ActiveSlide {
    pub fn activate(
        index: usize,
        slide: &Slide,
        backgrounds: &BackgroundSource,
        theme: &Theme,
        now: Instant,
    ) -> Self {
        tracing::debug!("Activating slide {} ({})", slide.id, slide.kind.tag().name());
        Self {
            index,
            state: SlideState::activate(&slide.kind, backgrounds, theme, now),
            activated: now,
        }
    }

    pub fn activated(&self) -> Instant {
        self.activated
    }

    pub fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.activated).as_secs_f32()
    }

    pub fn deactivate(&mut self, now: Instant) {
        self.state.deactivate(now);
    }
}

/// egui id for widgets belonging to a slide. Distinct per slide, so two slides
/// drawn during a transition never share widget state.
pub fn slide_key(slide: &Slide) -> egui::Id {
    egui::Id::new(("agentdeck_slide", slide.id))
}

pub fn layout_name(tag: SlideTag) -> &'static str {
    match tag {
        SlideTag::Cover => "cover",
        SlideTag::Section => "section",
        SlideTag::Content => "content",
        SlideTag::Tokenizer => "tokenizer",
        SlideTag::LlmDemo => "llm_demo",
        SlideTag::ContextGraph => "context_graph",
        SlideTag::LostMiddle => "lost_middle",
        SlideTag::Image => "image",
        SlideTag::AgentList => "agent_list",
        SlideTag::SubscriptionValue => "subscription_value",
        SlideTag::ClaudeHierarchy => "claude_hierarchy",
        SlideTag::SddWorkflow => "sdd_workflow",
    }
}

/// Slides are laid out for 1920x1080 and scaled to fit the window.
pub fn compute_scale(rect: egui::Rect) -> f32 {
    let ref_w = 1920.0;
    let ref_h = 1080.0;
    (rect.width() / ref_w).min(rect.height() / ref_h)
}

/// Render a single slide with the layout for its kind.
///
/// `state` should be the one created for this slide; a mismatched state is
/// ignored and the layout draws its stateless rendition.
pub fn render_slide(
    cx: &SlideCtx,
    slide: &Slide,
    state: &mut SlideState,
    images: &ImageCache,
) -> SlideOutput {
    let key = slide_key(slide);
    let section = slide.section.as_ref();

    let output = match &slide.kind {
        SlideKind::Cover {
            title,
            subtitle,
            author,
        } => {
            let backdrop = match state {
                SlideState::Cover(backdrop) => Some(backdrop),
                _ => None,
            };
            layouts::cover::render(cx, title, subtitle.as_deref(), author.as_deref(), backdrop)
        }
        SlideKind::Section { number, title } => layouts::section::render(cx, number, title),
        SlideKind::Content { title, content } => {
            layouts::content::render(cx, section, title, content)
        }
        SlideKind::Tokenizer { title } => {
            let tokenizer = match state {
                SlideState::Tokenizer(tokenizer) => Some(tokenizer),
                _ => None,
            };
            layouts::tokenizer::render(cx, key, section, title, tokenizer)
        }
        SlideKind::LlmDemo { title } => {
            let demo = match state {
                SlideState::LlmDemo(demo) => Some(demo),
                _ => None,
            };
            layouts::llm_demo::render(cx, key, section, title, demo)
        }
        SlideKind::ContextGraph { title } => layouts::context_graph::render(cx, section, title),
        SlideKind::LostMiddle { title } => layouts::lost_middle::render(cx, key, section, title),
        SlideKind::Image {
            title,
            image_src,
            image_alt,
        } => layouts::image::render(
            cx,
            section,
            title,
            image_src,
            image_alt.as_deref(),
            images,
        ),
        SlideKind::AgentList { title } => layouts::agent_list::render(cx, key, section, title),
        SlideKind::SubscriptionValue { title } => {
            layouts::subscription_value::render(cx, key, section, title)
        }
        SlideKind::ClaudeHierarchy { title } => {
            layouts::claude_hierarchy::render(cx, section, title)
        }
        SlideKind::SddWorkflow { title } => layouts::sdd_workflow::render(cx, section, title),
    };

    output.merge(SlideOutput {
        repaint_now: cx.elapsed < ANIMATION_WINDOW,
        ..Default::default()
    })
}
