//! Round-robin color assignment for stacked series.

use std::collections::VecDeque;

use crate::color::{Color, BLACK, STACK_COLORS};

/// A circular sequence of colors.
///
/// [`ColorCycle::next`] issues the front color and moves it to the back, so a
/// color is reused only after every other color has been issued once. An
/// optional advance delta is overlaid on each issued color before it is
/// re-appended, which shifts the hue on every lap around the cycle.
///
/// A cycle is owned by one host task and reset at the start of each chart.
#[derive(Debug, Clone)]
pub struct ColorCycle {
    initial: Vec<Color>,
    queue: VecDeque<Color>,
    advance: Color,
}

impl ColorCycle {
    /// Creates a cycle over `colors` with no advance shift.
    ///
    /// An empty list falls back to [`STACK_COLORS`].
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Self {
        let mut initial: Vec<Color> = colors.into_iter().collect();
        if initial.is_empty() {
            initial = STACK_COLORS.to_vec();
        }
        Self {
            queue: initial.iter().copied().collect(),
            initial,
            advance: BLACK,
        }
    }

    /// Sets the delta overlaid on each color when it is re-appended.
    pub fn with_advance(mut self, delta: Color) -> Self {
        self.advance = delta;
        self
    }

    /// Returns the next color and rotates the cycle.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Color {
        // The queue is never empty: new() guarantees at least one color and
        // every pop is paired with a push.
        let color = self.queue.pop_front().unwrap_or(BLACK);
        self.queue.push_back(color + self.advance);
        color
    }

    /// Restores the initial ordering and drops accumulated shifts.
    pub fn reset(&mut self) {
        self.queue = self.initial.iter().copied().collect();
    }

    /// Number of distinct slots in the cycle.
    pub fn len(&self) -> usize {
        self.initial.len()
    }

    /// Always false; a cycle has at least one color.
    pub fn is_empty(&self) -> bool {
        self.initial.is_empty()
    }
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self::new(STACK_COLORS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{CRIMSON, DODGERBLUE};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_cycle_starts_with_palette() {
        let mut cycle = ColorCycle::default();
        assert_eq!(cycle.len(), 14);
        assert_eq!(cycle.next(), STACK_COLORS[0]);
        assert_eq!(cycle.next(), STACK_COLORS[1]);
    }

    #[test]
    fn test_wraps_after_full_lap() {
        let mut cycle = ColorCycle::new([CRIMSON, DODGERBLUE]);
        assert_eq!(cycle.next(), CRIMSON);
        assert_eq!(cycle.next(), DODGERBLUE);
        assert_eq!(cycle.next(), CRIMSON);
    }

    #[test]
    fn test_advance_shifts_each_lap() {
        let offset = Color::new(50, 50, 50);
        let mut cycle = ColorCycle::new([CRIMSON, DODGERBLUE]).with_advance(offset);
        assert_eq!(cycle.next(), CRIMSON);
        assert_eq!(cycle.next(), DODGERBLUE);
        assert_eq!(cycle.next(), CRIMSON + offset);
        assert_eq!(cycle.next(), DODGERBLUE + offset);
        assert_eq!(cycle.next(), CRIMSON + offset + offset);
    }

    #[test]
    fn test_reset_restores_order_and_drops_shift() {
        let mut cycle = ColorCycle::new([CRIMSON, DODGERBLUE]).with_advance(Color::new(1, 1, 1));
        cycle.next();
        cycle.next();
        cycle.next();
        cycle.reset();
        assert_eq!(cycle.next(), CRIMSON);
        assert_eq!(cycle.next(), DODGERBLUE);
    }

    #[test]
    fn test_empty_falls_back_to_stack_colors() {
        let mut cycle = ColorCycle::new(Vec::new());
        assert!(!cycle.is_empty());
        assert_eq!(cycle.next(), STACK_COLORS[0]);
    }
}
