//! The animated backdrop behind the cover slide and its static fallback.

use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use eframe::glow;
use tracing::{debug, warn};

use super::shader::ShaderSurface;
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("no OpenGL context available")]
    NoContext,
    #[error("unsupported GL: {0}")]
    Unsupported(String),
    #[error("failed to create GL object: {0}")]
    Resource(String),
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: &'static str, log: String },
    #[error("shader program failed to link: {0}")]
    Link(String),
    #[error("uniform `{0}` not found")]
    MissingUniform(&'static str),
}

/// Something that can draw a full-rect background each frame.
///
/// `mount` acquires whatever the surface needs and may fail; a failed mount
/// leaves nothing acquired. `unmount` releases everything and may be called
/// more than once.
pub trait RenderSurface {
    fn name(&self) -> &'static str;
    fn mount(&mut self) -> Result<(), SurfaceError>;
    fn paint(&mut self, painter: &egui::Painter, rect: egui::Rect, seconds: f32);
    fn unmount(&mut self);

    /// Whether the picture changes with time.
    fn animated(&self) -> bool {
        true
    }
}

/// Radial gradient: an accent tint in the middle fading to the background.
pub struct StaticSurface {
    center: egui::Color32,
    edge: egui::Color32,
}

impl StaticSurface {
    pub fn new(theme: &Theme) -> Self {
        let tint = egui::Color32::from_rgb(0xB8, 0x5A, 0x40);
        Self {
            center: Theme::mix(theme.background, tint, 0.3),
            edge: theme.background,
        }
    }
}

impl RenderSurface for StaticSurface {
    fn name(&self) -> &'static str {
        "static"
    }

    fn mount(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn paint(&mut self, painter: &egui::Painter, rect: egui::Rect, _seconds: f32) {
        const SEGMENTS: u32 = 64;
        painter.rect_filled(rect, 0.0, self.edge);

        // The gradient reaches the edge color at 70% of the corner distance.
        let radii = rect.size() * 0.5 * std::f32::consts::SQRT_2 * 0.7;
        let center = rect.center();

        let mut mesh = egui::Mesh::default();
        mesh.colored_vertex(center, self.center);
        for i in 0..SEGMENTS {
            let angle = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
            let pos = center + egui::vec2(angle.cos() * radii.x, angle.sin() * radii.y);
            mesh.colored_vertex(pos, self.edge);
        }
        for i in 0..SEGMENTS {
            mesh.add_triangle(0, 1 + i, 1 + (i + 1) % SEGMENTS);
        }
        painter.with_clip_rect(rect).add(egui::Shape::mesh(mesh));
    }

    fn unmount(&mut self) {}

    fn animated(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundKind {
    #[default]
    Shader,
    Static,
}

impl BackgroundKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "shader" => Some(Self::Shader),
            "static" => Some(Self::Static),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Shader => "shader",
            Self::Static => "static",
        }
    }
}

/// Everything needed to mount a cover backdrop: eframe's GL handle (absent on
/// non-glow renderers) and the user's background preferences.
#[derive(Clone, Default)]
pub struct BackgroundSource {
    pub kind: BackgroundKind,
    pub gl: Option<Arc<glow::Context>>,
    pub reduced_motion: bool,
}

impl BackgroundSource {
    fn surface(&self, theme: &Theme) -> Box<dyn RenderSurface> {
        match self.kind {
            BackgroundKind::Shader => Box::new(ShaderSurface::new(self.gl.clone())),
            BackgroundKind::Static => Box::new(StaticSurface::new(theme)),
        }
    }

    pub fn backdrop(&self, theme: &Theme, now: Instant) -> Backdrop {
        let mut backdrop = Backdrop::mount(self.surface(theme), theme, now);
        backdrop.set_paused(self.reduced_motion, now);
        backdrop
    }
}

/// Seconds that only advance while not paused.
#[derive(Debug, Clone)]
pub struct PausableClock {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl PausableClock {
    pub fn new(now: Instant, paused: bool) -> Self {
        Self {
            accumulated: Duration::ZERO,
            running_since: (!paused).then_some(now),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.running_since.is_none()
    }

    pub fn set_paused(&mut self, paused: bool, now: Instant) {
        match (paused, self.running_since) {
            (true, Some(since)) => {
                self.accumulated += now.saturating_duration_since(since);
                self.running_since = None;
            }
            (false, None) => self.running_since = Some(now),
            _ => {}
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .running_since
                .map_or(Duration::ZERO, |since| now.saturating_duration_since(since))
    }
}

/// A mounted surface plus its clock. Falls back to [`StaticSurface`] when the
/// requested surface cannot mount, and unmounts when dropped.
pub struct Backdrop {
    surface: Box<dyn RenderSurface>,
    clock: PausableClock,
    fallback: bool,
}

impl Backdrop {
    pub fn mount(mut surface: Box<dyn RenderSurface>, theme: &Theme, now: Instant) -> Self {
        let fallback = match surface.mount() {
            Ok(()) => {
                debug!("Mounted {} background", surface.name());
                false
            }
            Err(err) => {
                warn!(
                    "{} background unavailable ({err}), using static fallback",
                    surface.name()
                );
                surface = Box::new(StaticSurface::new(theme));
                true
            }
        };
        Self {
            surface,
            clock: PausableClock::new(now, false),
            fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn surface_name(&self) -> &'static str {
        self.surface.name()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Pause while the window is hidden or reduced motion is requested.
    pub fn set_paused(&mut self, paused: bool, now: Instant) {
        self.clock.set_paused(paused, now);
    }

    /// Paint one frame. Returns whether another frame should follow right away.
    pub fn paint(&mut self, painter: &egui::Painter, rect: egui::Rect, now: Instant) -> bool {
        let seconds = self.clock.elapsed(now).as_secs_f32();
        self.surface.paint(painter, rect, seconds);
        self.surface.animated() && !self.clock.is_paused()
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.surface.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        mounts: u32,
        unmounts: u32,
    }

    struct FakeSurface {
        log: Rc<RefCell<Log>>,
        fail: bool,
    }

    impl RenderSurface for FakeSurface {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn mount(&mut self) -> Result<(), SurfaceError> {
            self.log.borrow_mut().mounts += 1;
            if self.fail {
                Err(SurfaceError::NoContext)
            } else {
                Ok(())
            }
        }

        fn paint(&mut self, _painter: &egui::Painter, _rect: egui::Rect, _seconds: f32) {}

        fn unmount(&mut self) {
            self.log.borrow_mut().unmounts += 1;
        }
    }

    fn fake(fail: bool) -> (Box<FakeSurface>, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let surface = Box::new(FakeSurface {
            log: Rc::clone(&log),
            fail,
        });
        (surface, log)
    }

    #[test]
    fn test_backdrop_unmounts_on_drop() {
        let (surface, log) = fake(false);
        let backdrop = Backdrop::mount(surface, &Theme::default(), Instant::now());
        assert!(!backdrop.is_fallback());
        assert_eq!(backdrop.surface_name(), "fake");
        drop(backdrop);
        assert_eq!(log.borrow().mounts, 1);
        assert_eq!(log.borrow().unmounts, 1);
    }

    #[test]
    fn test_failed_mount_falls_back_to_static() {
        let (surface, log) = fake(true);
        let backdrop = Backdrop::mount(surface, &Theme::default(), Instant::now());
        assert!(backdrop.is_fallback());
        assert_eq!(backdrop.surface_name(), "static");
        drop(backdrop);
        // The failed surface acquired nothing, so nothing is released.
        assert_eq!(log.borrow().unmounts, 0);
    }

    #[test]
    fn test_clock_only_runs_while_unpaused() {
        let t0 = Instant::now();
        let s = Duration::from_secs;
        let mut clock = PausableClock::new(t0, false);
        assert_eq!(clock.elapsed(t0 + s(2)), s(2));

        clock.set_paused(true, t0 + s(2));
        assert!(clock.is_paused());
        assert_eq!(clock.elapsed(t0 + s(10)), s(2));

        clock.set_paused(false, t0 + s(10));
        assert_eq!(clock.elapsed(t0 + s(11)), s(3));

        // Repeated calls with the same state change nothing.
        clock.set_paused(false, t0 + s(11));
        assert_eq!(clock.elapsed(t0 + s(12)), s(4));
    }

    #[test]
    fn test_clock_starting_paused() {
        let t0 = Instant::now();
        let clock = PausableClock::new(t0, true);
        assert!(clock.is_paused());
        assert_eq!(clock.elapsed(t0 + Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn test_static_background_is_not_a_fallback() {
        let source = BackgroundSource {
            kind: BackgroundKind::Static,
            ..Default::default()
        };
        let backdrop = source.backdrop(&Theme::default(), Instant::now());
        assert!(!backdrop.is_fallback(), "static was asked for, not fallen back to");
        assert_eq!(backdrop.surface_name(), "static");
    }

    #[test]
    fn test_shader_without_gl_falls_back() {
        let source = BackgroundSource::default();
        let backdrop = source.backdrop(&Theme::default(), Instant::now());
        assert!(backdrop.is_fallback());
        assert_eq!(backdrop.surface_name(), "static");
    }

    #[test]
    fn test_reduced_motion_mounts_paused() {
        let source = BackgroundSource {
            kind: BackgroundKind::Static,
            reduced_motion: true,
            ..Default::default()
        };
        let backdrop = source.backdrop(&Theme::default(), Instant::now());
        assert!(backdrop.is_paused());
    }

    #[test]
    fn test_background_names() {
        for kind in [BackgroundKind::Shader, BackgroundKind::Static] {
            assert_eq!(BackgroundKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(BackgroundKind::from_name("video"), None);
    }

    #[test]
    fn test_backdrop_pause_follows_request() {
        let (surface, _log) = fake(false);
        let t0 = Instant::now();
        let mut backdrop = Backdrop::mount(surface, &Theme::default(), t0);
        assert!(!backdrop.is_paused());
        backdrop.set_paused(true, t0);
        assert!(backdrop.is_paused());
    }
}
