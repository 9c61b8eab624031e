//! The self-running "how an LLM generates text" demo.
//!
//! Four stages per iteration, each shown for a fixed dwell time, two
//! iterations in total. The demo only moves when its timer comes due or when
//! it is reset after finishing; navigation never touches it.

use std::time::{Duration, Instant};

/// A cancellable one-shot deadline, polled once per frame.
///
/// Dropping the timer cancels it.
#[derive(Debug, Default)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    pub fn schedule(&mut self, at: Instant) {
        self.deadline = Some(at);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm and return the deadline if it has passed.
    pub fn fire(&mut self, now: Instant) -> Option<Instant> {
        match self.deadline {
            Some(at) if at <= now => self.deadline.take(),
            _ => None,
        }
    }

    /// Time left until the deadline, `None` when not armed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|at| at.saturating_duration_since(now))
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Tokens,
    Embed,
    Probs,
    Sample,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Tokens, Stage::Embed, Stage::Probs, Stage::Sample];

    pub fn dwell(self) -> Duration {
        match self {
            Stage::Tokens => Duration::from_millis(2000),
            Stage::Embed => Duration::from_millis(1700),
            Stage::Probs => Duration::from_millis(2500),
            Stage::Sample => Duration::from_millis(2500),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Stage::Tokens => 0,
            Stage::Embed => 1,
            Stage::Probs => 2,
            Stage::Sample => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Tokens => "Tokens",
            Stage::Embed => "Embeddings",
            Stage::Probs => "Probabilities",
            Stage::Sample => "Sample",
        }
    }

    fn next(self) -> Option<Stage> {
        Stage::ALL.get(self.index() + 1).copied()
    }
}

/// One pass through the pipeline: what goes in, how it splits, what comes out.
#[derive(Debug)]
pub struct DemoStep {
    pub input: &'static str,
    pub tokens: &'static [&'static str],
    pub probabilities: &'static [(&'static str, f32)],
    pub sample: &'static str,
}

pub const DEMO_SEQUENCE: [DemoStep; 2] = [
    DemoStep {
        input: "The capital of France is",
        tokens: &["The", " capital", " of", " France", " is"],
        probabilities: &[
            ("Paris", 0.92),
            ("Lyon", 0.03),
            ("a", 0.02),
            ("the", 0.01),
            ("...", 0.02),
        ],
        sample: " Paris",
    },
    DemoStep {
        input: "The capital of France is Paris",
        tokens: &["The", " capital", " of", " France", " is", " Paris"],
        probabilities: &[
            (".", 0.85),
            (",", 0.08),
            ("!", 0.03),
            (" and", 0.02),
            ("...", 0.02),
        ],
        sample: ".",
    },
];

#[derive(Debug)]
pub struct GenerationDemo {
    stage: Stage,
    iteration: usize,
    generated: String,
    finished: bool,
    stage_started: Instant,
    timer: Timer,
}

impl GenerationDemo {
    /// Begin at the first stage of the first iteration, timer armed.
    pub fn start(now: Instant) -> Self {
        let mut demo = Self {
            stage: Stage::Tokens,
            iteration: 0,
            generated: DEMO_SEQUENCE[0].input.to_string(),
            finished: false,
            stage_started: now,
            timer: Timer::default(),
        };
        demo.timer.schedule(now + Stage::Tokens.dwell());
        demo
    }

    /// Advance through every deadline that has passed. Returns whether anything changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(due) = self.timer.fire(now) {
            self.advance(due);
            changed = true;
        }
        changed
    }

    fn advance(&mut self, at: Instant) {
        if let Some(next) = self.stage.next() {
            self.enter(next, at);
            return;
        }
        self.generated.push_str(self.current_step().sample);
        if self.iteration + 1 < DEMO_SEQUENCE.len() {
            self.iteration += 1;
            self.enter(Stage::Tokens, at);
        } else {
            self.finished = true;
        }
    }

    fn enter(&mut self, stage: Stage, at: Instant) {
        self.stage = stage;
        self.stage_started = at;
        self.timer.schedule(at + stage.dwell());
    }

    /// Restart from the beginning. Ignored unless the demo has finished.
    pub fn reset(&mut self, now: Instant) -> bool {
        if !self.finished {
            return false;
        }
        self.iteration = 0;
        self.generated = DEMO_SEQUENCE[0].input.to_string();
        self.finished = false;
        self.enter(Stage::Tokens, now);
        true
    }

    /// Stop the timer; a deactivated demo never advances again.
    pub fn deactivate(&mut self) {
        self.timer.cancel();
    }

    /// How long the caller may sleep before the next stage change.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn generated_text(&self) -> &str {
        &self.generated
    }

    pub fn current_step(&self) -> &'static DemoStep {
        &DEMO_SEQUENCE[self.iteration]
    }

    /// Seconds since the current stage began, for entrance animations.
    pub fn stage_elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.stage_started)
            .as_secs_f32()
    }

    /// "Stage 2/4 · Iteration 1/2"
    pub fn indicator(&self) -> String {
        format!(
            "Stage {}/{} \u{00b7} Iteration {}/{}",
            self.stage.index() + 1,
            Stage::ALL.len(),
            self.iteration + 1,
            DEMO_SEQUENCE.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn iteration_length() -> Duration {
        Stage::ALL.iter().map(|s| s.dwell()).sum()
    }

    #[test]
    fn test_timer_fires_once() {
        let t0 = Instant::now();
        let mut timer = Timer::default();
        timer.schedule(t0 + ms(10));
        assert_eq!(timer.fire(t0), None);
        assert_eq!(timer.fire(t0 + ms(10)), Some(t0 + ms(10)));
        assert_eq!(timer.fire(t0 + ms(20)), None);
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let t0 = Instant::now();
        let mut timer = Timer::default();
        timer.schedule(t0 + ms(10));
        timer.cancel();
        assert_eq!(timer.fire(t0 + ms(1000)), None);
        assert_eq!(timer.remaining(t0), None);
    }

    #[test]
    fn test_initial_state() {
        let t0 = Instant::now();
        let demo = GenerationDemo::start(t0);
        assert_eq!(demo.stage(), Stage::Tokens);
        assert_eq!(demo.iteration(), 0);
        assert!(!demo.is_finished());
        assert_eq!(demo.generated_text(), "The capital of France is");
        assert_eq!(demo.next_wakeup(t0), Some(ms(2000)));
        assert_eq!(demo.indicator(), "Stage 1/4 \u{00b7} Iteration 1/2");
    }

    #[test]
    fn test_stages_follow_dwell_times() {
        let t0 = Instant::now();
        let mut demo = GenerationDemo::start(t0);

        assert!(!demo.poll(t0 + ms(1999)));
        assert_eq!(demo.stage(), Stage::Tokens);

        assert!(demo.poll(t0 + ms(2000)));
        assert_eq!(demo.stage(), Stage::Embed);

        demo.poll(t0 + ms(3700));
        assert_eq!(demo.stage(), Stage::Probs);

        demo.poll(t0 + ms(6200));
        assert_eq!(demo.stage(), Stage::Sample);
        assert_eq!(demo.generated_text(), "The capital of France is");

        demo.poll(t0 + ms(8700));
        assert_eq!(demo.stage(), Stage::Tokens);
        assert_eq!(demo.iteration(), 1);
        assert_eq!(demo.generated_text(), "The capital of France is Paris");
    }

    #[test]
    fn test_runs_to_finished_and_stops() {
        let t0 = Instant::now();
        let mut demo = GenerationDemo::start(t0);
        let end = t0 + iteration_length() * 2;

        demo.poll(end - ms(1));
        assert!(!demo.is_finished());
        assert_eq!(demo.stage(), Stage::Sample);
        assert_eq!(demo.iteration(), 1);

        assert!(demo.poll(end));
        assert!(demo.is_finished());
        assert_eq!(demo.generated_text(), "The capital of France is Paris.");
        assert_eq!(demo.next_wakeup(end), None);

        assert!(!demo.poll(end + Duration::from_secs(60)));
        assert_eq!(demo.stage(), Stage::Sample);
        assert_eq!(demo.iteration(), 1);
    }

    #[test]
    fn test_late_poll_catches_up() {
        let t0 = Instant::now();
        let mut demo = GenerationDemo::start(t0);
        assert!(demo.poll(t0 + Duration::from_secs(120)));
        assert!(demo.is_finished());
    }

    #[test]
    fn test_reset_only_when_finished() {
        let t0 = Instant::now();
        let mut demo = GenerationDemo::start(t0);
        demo.poll(t0 + ms(2500));
        assert!(!demo.reset(t0 + ms(2500)));
        assert_eq!(demo.stage(), Stage::Embed);

        let end = t0 + iteration_length() * 2;
        demo.poll(end);
        assert!(demo.is_finished());

        assert!(demo.reset(end));
        assert_eq!(demo.stage(), Stage::Tokens);
        assert_eq!(demo.iteration(), 0);
        assert!(!demo.is_finished());
        assert_eq!(demo.generated_text(), "The capital of France is");
        assert_eq!(demo.next_wakeup(end), Some(ms(2000)));
    }

    #[test]
    fn test_deactivated_demo_is_frozen() {
        let t0 = Instant::now();
        let mut demo = GenerationDemo::start(t0);
        demo.deactivate();
        assert!(!demo.poll(t0 + Duration::from_secs(60)));
        assert_eq!(demo.stage(), Stage::Tokens);
        assert_eq!(demo.next_wakeup(t0), None);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        for step in &DEMO_SEQUENCE {
            let total: f32 = step.probabilities.iter().map(|(_, p)| p).sum();
            assert!((total - 1.0).abs() < 1e-4, "{} sums to {total}", step.input);
        }
    }
}
