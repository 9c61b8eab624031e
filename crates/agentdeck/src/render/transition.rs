use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionKind {
    #[default]
    Fade,
    SlideHorizontal,
    None,
}

impl TransitionKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fade" => Some(Self::Fade),
            "slide" => Some(Self::SlideHorizontal),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::SlideHorizontal => "slide",
            Self::None => "none",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fade => "Fade",
            Self::SlideHorizontal => "Slide",
            Self::None => "None",
        }
    }

    pub fn cycled(self) -> Self {
        match self {
            Self::Fade => Self::SlideHorizontal,
            Self::SlideHorizontal => Self::None,
            Self::None => Self::Fade,
        }
    }

    fn duration(self) -> f32 {
        match self {
            Self::Fade => 0.35,
            Self::SlideHorizontal => 0.45,
            Self::None => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    Forward,
    Backward,
}

impl TransitionDirection {
    pub fn between(from: usize, to: usize) -> Self {
        if to >= from {
            Self::Forward
        } else {
            Self::Backward
        }
    }
}

/// A visual cross-over between two slides. The cursor has already moved to
/// `to`; this only decides how the outgoing slide is drawn while it leaves.
#[derive(Debug, Clone)]
pub struct ActiveTransition {
    pub from: usize,
    pub to: usize,
    pub kind: TransitionKind,
    pub direction: TransitionDirection,
    start: Instant,
}

impl ActiveTransition {
    pub fn new(from: usize, to: usize, kind: TransitionKind, now: Instant) -> Self {
        Self {
            from,
            to,
            kind,
            direction: TransitionDirection::between(from, to),
            start: now,
        }
    }

    /// Eased progress in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f32 {
        let duration = self.kind.duration();
        if duration <= 0.0 {
            return 1.0;
        }
        let t = now.saturating_duration_since(self.start).as_secs_f32() / duration;
        ease_in_out(t.clamp(0.0, 1.0))
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Cubic ease-in-out.
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_names_round_trip() {
        for kind in [
            TransitionKind::Fade,
            TransitionKind::SlideHorizontal,
            TransitionKind::None,
        ] {
            assert_eq!(TransitionKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TransitionKind::from_name("spin"), None);
    }

    #[test]
    fn test_cycle_visits_all() {
        let start = TransitionKind::Fade;
        assert_eq!(start.cycled().cycled().cycled(), start);
        assert_ne!(start.cycled(), start);
    }

    #[test]
    fn test_progress_over_time() {
        let t0 = Instant::now();
        let t = ActiveTransition::new(0, 1, TransitionKind::Fade, t0);
        assert_eq!(t.progress(t0), 0.0);
        assert!(!t.is_complete(t0 + Duration::from_millis(100)));
        assert!(t.is_complete(t0 + Duration::from_millis(350)));
        assert_eq!(t.direction, TransitionDirection::Forward);
    }

    #[test]
    fn test_none_completes_immediately() {
        let t0 = Instant::now();
        let t = ActiveTransition::new(3, 1, TransitionKind::None, t0);
        assert!(t.is_complete(t0));
        assert_eq!(t.direction, TransitionDirection::Backward);
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert_eq!(ease_in_out(0.5), 0.5);
    }
}
