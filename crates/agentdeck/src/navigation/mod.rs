pub mod keys;

use std::num::NonZeroUsize;

/// The slide cursor. The presentation controller owns the only instance;
/// overlays read it through `current()` and `total()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    cursor: usize,
    total: NonZeroUsize,
}

impl Navigator {
    pub fn new(total: NonZeroUsize) -> Self {
        Self { cursor: 0, total }
    }

    /// Start at `start`, clamped to the last slide.
    pub fn with_start(total: NonZeroUsize, start: usize) -> Self {
        Self {
            cursor: start.min(total.get() - 1),
            total,
        }
    }

    pub fn current(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.total.get()
    }

    pub fn last_index(&self) -> usize {
        self.total.get() - 1
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last(&self) -> bool {
        self.cursor == self.last_index()
    }

    /// Advance one slide; a no-op on the last slide. Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        self.set((self.cursor + 1).min(self.last_index()))
    }

    /// Go back one slide; a no-op on the first slide. Returns whether the cursor moved.
    pub fn prev(&mut self) -> bool {
        self.set(self.cursor.saturating_sub(1))
    }

    /// Jump to `index`. Callers only pass indices below `total()`; anything
    /// larger lands on the last slide.
    pub fn go_to(&mut self, index: usize) -> bool {
        debug_assert!(
            index < self.total(),
            "go_to({index}) out of range for {} slides",
            self.total()
        );
        self.set(index.min(self.last_index()))
    }

    fn set(&mut self, index: usize) -> bool {
        let changed = index != self.cursor;
        self.cursor = index;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(total: usize, start: usize) -> Navigator {
        Navigator::with_start(NonZeroUsize::new(total).unwrap(), start)
    }

    #[test]
    fn test_starts_at_zero() {
        let n = Navigator::new(NonZeroUsize::new(3).unwrap());
        assert_eq!(n.current(), 0);
        assert_eq!(n.total(), 3);
        assert!(n.is_first());
        assert!(!n.is_last());
    }

    #[test]
    fn test_start_is_clamped() {
        assert_eq!(nav(4, 2).current(), 2);
        assert_eq!(nav(4, 99).current(), 3);
    }

    #[test]
    fn test_next_and_prev_for_every_cursor() {
        for total in 1..=6 {
            for c in 0..total {
                let mut n = nav(total, c);
                let moved = n.next();
                assert_eq!(n.current(), (c + 1).min(total - 1), "next from {c} of {total}");
                assert_eq!(moved, c + 1 < total);

                let mut n = nav(total, c);
                let moved = n.prev();
                assert_eq!(n.current(), c.saturating_sub(1), "prev from {c} of {total}");
                assert_eq!(moved, c > 0);
            }
        }
    }

    #[test]
    fn test_boundaries_are_idempotent() {
        let mut n = nav(5, 4);
        for _ in 0..10 {
            assert!(!n.next());
            assert_eq!(n.current(), 4);
        }
        let mut n = nav(5, 0);
        for _ in 0..10 {
            assert!(!n.prev());
            assert_eq!(n.current(), 0);
        }
    }

    #[test]
    fn test_go_to_is_exact() {
        for from in 0..5 {
            for to in 0..5 {
                let mut n = nav(5, from);
                assert_eq!(n.go_to(to), from != to);
                assert_eq!(n.current(), to);
            }
        }
    }

    #[test]
    fn test_single_slide() {
        let mut n = nav(1, 0);
        assert!(n.is_first() && n.is_last());
        assert!(!n.next());
        assert!(!n.prev());
        assert_eq!(n.current(), 0);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_go_to_out_of_range_clamps() {
        let mut n = nav(3, 0);
        n.go_to(10);
        assert_eq!(n.current(), 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_go_to_out_of_range_asserts() {
        let mut n = nav(3, 0);
        n.go_to(10);
    }
}
