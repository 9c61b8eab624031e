use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{debug, info};

use crate::config::Config;
use crate::deck::Deck;
use crate::navigation::Navigator;
use crate::navigation::keys::KeyBinding;
use crate::render::background::{BackgroundKind, BackgroundSource};
use crate::render::image_cache::ImageCache;
use crate::render::transition::{ActiveTransition, TransitionDirection, TransitionKind};
use crate::render::{self, ActiveSlide, SlideCtx, SlideOutput, SlideState, chrome};
use crate::theme::Theme;

/// Second press of Esc within this window closes the presenter.
const ESC_WINDOW: Duration = Duration::from_secs(1);

/// What the command line asked for; config fills in the rest.
pub struct LaunchOptions {
    pub deck: Option<PathBuf>,
    pub windowed: bool,
    /// 1-indexed.
    pub slide: Option<usize>,
    pub reduced_motion: bool,
    pub static_background: bool,
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String, now: Instant) -> Self {
        Self {
            message,
            start: now,
        }
    }

    fn opacity(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start).as_secs_f32();
        let duration = 1.5;
        let fade_start = 1.0;
        if elapsed < fade_start {
            1.0
        } else if elapsed < duration {
            1.0 - (elapsed - fade_start) / (duration - fade_start)
        } else {
            0.0
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start).as_secs_f32() >= 1.5
    }
}

/// Presenter-level keys, handled before slide navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shortcut {
    Quit,
    Escape,
    Fullscreen,
    CycleTransition,
    ToggleHud,
}

fn shortcut_for_key(key: egui::Key) -> Option<Shortcut> {
    match key {
        egui::Key::Q => Some(Shortcut::Quit),
        egui::Key::Escape => Some(Shortcut::Escape),
        egui::Key::F => Some(Shortcut::Fullscreen),
        egui::Key::T => Some(Shortcut::CycleTransition),
        egui::Key::H => Some(Shortcut::ToggleHud),
        _ => None,
    }
}

/// Window requests produced by a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowRequest {
    Close,
    ToggleFullscreen,
}

struct PresentationApp {
    deck: Deck,
    theme: Theme,
    images: ImageCache,
    backgrounds: BackgroundSource,
    nav: Navigator,
    keys: KeyBinding,
    current: ActiveSlide,
    /// The slide being transitioned away from, kept until the transition ends.
    leaving: Option<ActiveSlide>,
    transition: Option<ActiveTransition>,
    transition_kind: TransitionKind,
    reduced_motion: bool,
    show_hud: bool,
    toast: Option<Toast>,
    last_esc: Option<Instant>,
    /// A slide widget held keyboard focus last frame.
    slide_has_focus: bool,
    minimized: bool,
}

impl PresentationApp {
    fn new(
        deck: Deck,
        backgrounds: BackgroundSource,
        start: usize,
        transition_kind: TransitionKind,
        now: Instant,
    ) -> anyhow::Result<Self> {
        let theme = Theme::default();
        let nav = Navigator::with_start(deck.count(), start);
        let images = ImageCache::new(deck.base_path().to_path_buf());
        let reduced_motion = backgrounds.reduced_motion;
        let slide = deck
            .get(nav.current())
            .ok_or_else(|| anyhow::anyhow!("Start slide {} is outside the deck", start + 1))?;
        let current = ActiveSlide::activate(nav.current(), slide, &backgrounds, &theme, now);
        Ok(Self {
            deck,
            theme,
            images,
            backgrounds,
            nav,
            keys: KeyBinding::new(),
            current,
            leaving: None,
            transition: None,
            transition_kind,
            reduced_motion,
            show_hud: false,
            toast: None,
            last_esc: None,
            slide_has_focus: false,
            minimized: false,
        })
    }

    fn effective_transition(&self) -> TransitionKind {
        if self.reduced_motion {
            TransitionKind::None
        } else {
            self.transition_kind
        }
    }

    /// Bring the active slide in line with the navigator. The outgoing slide
    /// stops its timers immediately and is drawn until its transition ends.
    fn sync(&mut self, now: Instant) {
        let index = self.nav.current();
        if index == self.current.index {
            return;
        }
        let Some(slide) = self.deck.get(index) else {
            return;
        };
        debug!("Slide {}", chrome::position_label(index, self.nav.total()));

        let next = ActiveSlide::activate(index, slide, &self.backgrounds, &self.theme, now);
        let mut previous = std::mem::replace(&mut self.current, next);
        previous.deactivate(now);

        let kind = self.effective_transition();
        if kind == TransitionKind::None {
            self.transition = None;
            self.leaving = None;
        } else {
            self.transition = Some(ActiveTransition::new(previous.index, index, kind, now));
            self.leaving = Some(previous);
        }
    }

    fn finish_transition(&mut self, now: Instant) {
        if self.transition.as_ref().is_some_and(|t| t.is_complete(now)) {
            self.transition = None;
            self.leaving = None;
        }
    }

    fn cycle_transition(&mut self, now: Instant) {
        self.transition_kind = self.transition_kind.cycled();
        self.toast = Some(Toast::new(
            format!("Transition: {}", self.transition_kind.label()),
            now,
        ));
    }

    /// Returns whether this press should close the window.
    fn press_escape(&mut self, now: Instant) -> bool {
        if self
            .last_esc
            .is_some_and(|last| now.saturating_duration_since(last) < ESC_WINDOW)
        {
            return true;
        }
        self.last_esc = Some(now);
        self.toast = Some(Toast::new("Press Esc again to exit".to_string(), now));
        false
    }

    fn apply_shortcut(&mut self, shortcut: Shortcut, now: Instant) -> Option<WindowRequest> {
        match shortcut {
            Shortcut::Quit => Some(WindowRequest::Close),
            Shortcut::Escape => self.press_escape(now).then_some(WindowRequest::Close),
            Shortcut::Fullscreen => Some(WindowRequest::ToggleFullscreen),
            Shortcut::CycleTransition => {
                self.cycle_transition(now);
                None
            }
            Shortcut::ToggleHud => {
                self.show_hud = !self.show_hud;
                None
            }
        }
    }

    /// Pause the cover background while the window is minimized.
    fn update_backdrop(&mut self, now: Instant) {
        if let SlideState::Cover(backdrop) = &mut self.current.state {
            backdrop.set_paused(self.minimized || self.reduced_motion, now);
        }
    }

    fn draw_presentation(&mut self, ui: &egui::Ui, rect: egui::Rect, now: Instant) -> SlideOutput {
        let scale = render::compute_scale(rect);
        let canvas = Canvas {
            ui,
            deck: &self.deck,
            theme: &self.theme,
            images: &self.images,
            scale,
            now,
            reduced_motion: self.reduced_motion,
        };

        match (&self.transition, self.leaving.as_mut()) {
            (Some(t), Some(leaving)) => {
                let progress = t.progress(now);
                match t.kind {
                    TransitionKind::Fade => {
                        let out = canvas.draw(leaving, rect, 1.0 - progress, false);
                        out.merge(canvas.draw(&mut self.current, rect, progress, true))
                    }
                    TransitionKind::SlideHorizontal => {
                        let w = rect.width();
                        let sign = match t.direction {
                            TransitionDirection::Forward => -1.0,
                            TransitionDirection::Backward => 1.0,
                        };
                        let from_offset = sign * progress * w;
                        let to_offset = from_offset - sign * w;

                        let from_rect = rect.translate(egui::vec2(from_offset, 0.0));
                        let to_rect = rect.translate(egui::vec2(to_offset, 0.0));

                        let out = canvas.draw(leaving, from_rect, 1.0, false);
                        out.merge(canvas.draw(&mut self.current, to_rect, 1.0, true))
                    }
                    TransitionKind::None => canvas.draw(&mut self.current, rect, 1.0, true),
                }
            }
            _ => canvas.draw(&mut self.current, rect, 1.0, true),
        }
    }
}

/// Everything shared by the slides drawn in one frame.
struct Canvas<'a> {
    ui: &'a egui::Ui,
    deck: &'a Deck,
    theme: &'a Theme,
    images: &'a ImageCache,
    scale: f32,
    now: Instant,
    reduced_motion: bool,
}

impl Canvas<'_> {
    fn draw(
        &self,
        active: &mut ActiveSlide,
        rect: egui::Rect,
        opacity: f32,
        interactive: bool,
    ) -> SlideOutput {
        let Some(slide) = self.deck.get(active.index) else {
            return SlideOutput::default();
        };
        let elapsed = if self.reduced_motion {
            render::SETTLE.as_secs_f32()
        } else {
            active.elapsed(self.now)
        };
        let cx = SlideCtx {
            ui: self.ui,
            theme: self.theme,
            rect,
            opacity,
            scale: self.scale,
            elapsed,
            now: self.now,
            interactive,
        };
        render::render_slide(&cx, slide, &mut active.state, self.images)
    }
}

impl eframe::App for PresentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let typing = ctx.wants_keyboard_input() || self.slide_has_focus;
        self.keys.set_enabled(!typing);

        // Collect viewport commands to send AFTER the input closure
        // (sending inside ctx.input() causes RwLock deadlock)
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();

        ctx.input(|i| {
            self.minimized = i.viewport().minimized.unwrap_or(false);
            if typing {
                return;
            }
            let pressed = KeyBinding::pressed_keys(i);
            for key in &pressed {
                let request = shortcut_for_key(*key).and_then(|s| self.apply_shortcut(s, now));
                match request {
                    Some(WindowRequest::Close) => {
                        viewport_cmds.push(egui::ViewportCommand::Close);
                        return;
                    }
                    Some(WindowRequest::ToggleFullscreen) => {
                        viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                            !i.viewport().fullscreen.unwrap_or(false),
                        ));
                    }
                    None => {}
                }
            }
            self.keys.handle_keys(pressed, &mut self.nav);
        });

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        self.sync(now);
        self.finish_transition(now);
        self.update_backdrop(now);

        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }

        let bg = self.theme.background;
        let mut jump = None;
        let mut output = SlideOutput::default();

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                let scale = render::compute_scale(rect);

                output = self.draw_presentation(ui, rect, now);
                jump = chrome::draw(ui, &self.theme, rect, &self.nav, scale);

                if let Some(ref toast) = self.toast {
                    draw_toast(ui, &self.theme, rect, scale, toast, now);
                }

                if self.show_hud {
                    draw_hud(ui, &self.theme, rect, scale);
                }
            });

        self.slide_has_focus = output.wants_keyboard;

        if let Some(index) = jump {
            if self.nav.go_to(index) {
                self.sync(now);
            }
            output.repaint_now = true;
        }

        let animating = self.transition.is_some() || self.toast.is_some();
        if output.repaint_now || animating {
            ctx.request_repaint();
        } else if let Some(after) = output.repaint_after {
            ctx.request_repaint_after(after);
        }
    }
}

fn draw_toast(
    ui: &egui::Ui,
    theme: &Theme,
    rect: egui::Rect,
    scale: f32,
    toast: &Toast,
    now: Instant,
) {
    let opacity = toast.opacity(now);
    if opacity <= 0.0 {
        return;
    }
    let toast_color = Theme::with_opacity(theme.foreground, opacity * 0.9);
    let toast_bg = Theme::with_opacity(theme.surface, opacity * 0.9);
    let galley = ui.painter().layout_no_wrap(
        toast.message.clone(),
        egui::FontId::proportional(20.0 * scale),
        toast_color,
    );
    let padding = 16.0 * scale;
    let toast_rect = egui::Rect::from_min_size(
        egui::pos2(
            rect.center().x - galley.rect.width() / 2.0 - padding,
            rect.bottom() - 80.0 * scale - galley.rect.height() - padding * 2.0,
        ),
        egui::vec2(
            galley.rect.width() + padding * 2.0,
            galley.rect.height() + padding * 2.0,
        ),
    );
    ui.painter().rect_filled(toast_rect, 8.0 * scale, toast_bg);
    let text_pos = egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding);
    ui.painter().galley(text_pos, galley, toast_color);
}

const SHORTCUTS: [(&str, &str); 11] = [
    ("Space / N / \u{2192}", "Next slide"),
    ("P / \u{2190}", "Previous slide"),
    ("\u{2193} / \u{2191}", "Next / previous"),
    ("Home", "First slide"),
    ("End", "Last slide"),
    ("Click dot", "Jump to slide"),
    ("T", "Cycle transition"),
    ("F", "Toggle fullscreen"),
    ("H", "Toggle this HUD"),
    ("Esc", "\u{00d7}2 exit"),
    ("Q", "Quit"),
];

fn draw_hud(ui: &egui::Ui, theme: &Theme, rect: egui::Rect, scale: f32) {
    let bg = Theme::with_opacity(theme.surface, 0.9);
    let text_color = Theme::with_opacity(theme.foreground, 0.9);
    let key_color = Theme::with_opacity(theme.accent, 0.9);

    let padding = 24.0 * scale;
    let line_height = 32.0 * scale;
    let hud_height = SHORTCUTS.len() as f32 * line_height + padding * 2.0 + 40.0 * scale;
    let hud_width = 360.0 * scale;

    let hud_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(hud_width, hud_height));
    ui.painter().rect_filled(hud_rect, 12.0 * scale, bg);

    let title_galley = ui.painter().layout_no_wrap(
        "Keyboard Shortcuts".to_string(),
        egui::FontId::proportional(20.0 * scale),
        text_color,
    );
    let title_pos = egui::pos2(hud_rect.left() + padding, hud_rect.top() + padding);
    ui.painter().galley(title_pos, title_galley, text_color);

    let mut y = hud_rect.top() + padding + 40.0 * scale;
    for (key, desc) in &SHORTCUTS {
        let key_galley = ui.painter().layout_no_wrap(
            key.to_string(),
            egui::FontId::monospace(15.0 * scale),
            key_color,
        );
        ui.painter()
            .galley(egui::pos2(hud_rect.left() + padding, y), key_galley, key_color);

        let desc_galley = ui.painter().layout_no_wrap(
            desc.to_string(),
            egui::FontId::proportional(15.0 * scale),
            text_color,
        );
        ui.painter().galley(
            egui::pos2(hud_rect.left() + padding + 170.0 * scale, y),
            desc_galley,
            text_color,
        );
        y += line_height;
    }
}

/// Window title: the cover title when the deck opens with one.
fn window_title(deck: &Deck) -> String {
    deck.get(0)
        .map(|slide| slide.kind.title())
        .filter(|title| !title.is_empty())
        .map_or_else(|| "agentdeck".to_string(), |title| format!("agentdeck \u{00b7} {title}"))
}

pub fn run(options: LaunchOptions) -> anyhow::Result<()> {
    let deck = Deck::open(options.deck.as_deref())?;
    let config = Config::load_or_default();

    // CLI flags override config
    let reduced_motion = options.reduced_motion || config.reduced_motion();
    let background = if options.static_background {
        BackgroundKind::Static
    } else {
        config.background()
    };
    let start = options
        .slide
        .or(config.start_slide())
        .unwrap_or(1)
        .saturating_sub(1);
    let transition = config.transition();

    let title = window_title(&deck);
    info!(
        "Presenting {} slides ({} transition, {} background{})",
        deck.len(),
        transition.name(),
        background.name(),
        if reduced_motion { ", reduced motion" } else { "" }
    );

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| {
            let backgrounds = BackgroundSource {
                kind: background,
                gl: cc.gl.clone(),
                reduced_motion,
            };
            let app = PresentationApp::new(deck, backgrounds, start, transition, Instant::now())?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn app_at(start: usize, reduced_motion: bool, now: Instant) -> PresentationApp {
        let backgrounds = BackgroundSource {
            kind: BackgroundKind::Static,
            gl: None,
            reduced_motion,
        };
        PresentationApp::new(
            Deck::builtin().unwrap(),
            backgrounds,
            start,
            TransitionKind::Fade,
            now,
        )
        .unwrap()
    }

    #[test]
    fn test_toast_fades_after_a_second() {
        let t0 = Instant::now();
        let toast = Toast::new("hi".to_string(), t0);
        assert_eq!(toast.opacity(t0), 1.0);
        assert_eq!(toast.opacity(t0 + ms(900)), 1.0);
        let mid = toast.opacity(t0 + ms(1250));
        assert!((mid - 0.5).abs() < 0.01, "halfway through the fade: {mid}");
        assert!(!toast.is_expired(t0 + ms(1400)));
        assert!(toast.is_expired(t0 + ms(1500)));
        assert_eq!(toast.opacity(t0 + ms(2000)), 0.0);
    }

    #[test]
    fn test_shortcut_keys() {
        assert_eq!(shortcut_for_key(egui::Key::Q), Some(Shortcut::Quit));
        assert_eq!(shortcut_for_key(egui::Key::Escape), Some(Shortcut::Escape));
        assert_eq!(shortcut_for_key(egui::Key::F), Some(Shortcut::Fullscreen));
        assert_eq!(shortcut_for_key(egui::Key::T), Some(Shortcut::CycleTransition));
        assert_eq!(shortcut_for_key(egui::Key::H), Some(Shortcut::ToggleHud));
        assert_eq!(shortcut_for_key(egui::Key::ArrowRight), None);
        assert_eq!(shortcut_for_key(egui::Key::N), None, "N navigates");
    }

    #[test]
    fn test_escape_twice_closes() {
        let t0 = Instant::now();
        let mut app = app_at(0, false, t0);
        assert_eq!(app.apply_shortcut(Shortcut::Escape, t0), None);
        assert_eq!(
            app.toast.as_ref().map(|t| t.message.as_str()),
            Some("Press Esc again to exit")
        );
        assert_eq!(
            app.apply_shortcut(Shortcut::Escape, t0 + ms(600)),
            Some(WindowRequest::Close)
        );
    }

    #[test]
    fn test_slow_escape_only_warns_again() {
        let t0 = Instant::now();
        let mut app = app_at(0, false, t0);
        assert!(!app.press_escape(t0));
        assert!(!app.press_escape(t0 + ms(1500)));
        assert!(app.press_escape(t0 + ms(1800)));
    }

    #[test]
    fn test_cycle_transition_toasts() {
        let t0 = Instant::now();
        let mut app = app_at(0, false, t0);
        app.apply_shortcut(Shortcut::CycleTransition, t0);
        assert_eq!(app.transition_kind, TransitionKind::SlideHorizontal);
        assert_eq!(
            app.toast.as_ref().map(|t| t.message.as_str()),
            Some("Transition: Slide")
        );
        app.apply_shortcut(Shortcut::ToggleHud, t0);
        assert!(app.show_hud);
    }

    #[test]
    fn test_start_slide_is_clamped() {
        let app = app_at(10_000, false, Instant::now());
        assert_eq!(app.nav.current(), app.deck.len() - 1);
        assert_eq!(app.current.index, app.nav.current());
    }

    #[test]
    fn test_navigation_starts_a_transition() {
        let t0 = Instant::now();
        let mut app = app_at(0, false, t0);
        assert!(app.nav.next());
        app.sync(t0);

        assert_eq!(app.current.index, 1);
        assert_eq!(app.leaving.as_ref().map(|s| s.index), Some(0));
        let transition = app.transition.as_ref().unwrap();
        assert_eq!((transition.from, transition.to), (0, 1));

        app.finish_transition(t0 + ms(100));
        assert!(app.leaving.is_some(), "still fading");
        app.finish_transition(t0 + ms(1000));
        assert!(app.leaving.is_none());
        assert!(app.transition.is_none());
    }

    #[test]
    fn test_new_navigation_replaces_transition() {
        let t0 = Instant::now();
        let mut app = app_at(0, false, t0);
        app.nav.next();
        app.sync(t0);
        app.nav.next();
        app.sync(t0 + ms(50));

        assert_eq!(app.current.index, 2);
        assert_eq!(app.leaving.as_ref().map(|s| s.index), Some(1));
        let transition = app.transition.as_ref().unwrap();
        assert_eq!((transition.from, transition.to), (1, 2));
    }

    #[test]
    fn test_reduced_motion_skips_transitions() {
        let t0 = Instant::now();
        let mut app = app_at(0, true, t0);
        app.nav.go_to(3);
        app.sync(t0);
        assert_eq!(app.current.index, 3);
        assert!(app.transition.is_none());
        assert!(app.leaving.is_none());
    }

    #[test]
    fn test_sync_without_movement_keeps_state() {
        let t0 = Instant::now();
        let mut app = app_at(2, false, t0);
        let activated = app.current.activated();
        app.sync(t0 + ms(500));
        assert_eq!(app.current.activated(), activated);
        assert!(app.transition.is_none());
    }

    #[test]
    fn test_window_title_uses_cover() {
        let deck = Deck::builtin().unwrap();
        assert!(window_title(&deck).starts_with("agentdeck \u{00b7} "));
    }
}
