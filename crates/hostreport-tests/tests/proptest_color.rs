//! Property-based tests for colors and color cycling using proptest.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hostreport-tests --test proptest_color
//! ```

use proptest::prelude::*;

use hostreport_spec::{Color, ColorCycle, ParseColorError, STACK_COLORS};

fn any_color() -> impl Strategy<Value = Color> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Color::new(r, g, b))
}

proptest! {
    /// Formatting then parsing gives back the same color.
    #[test]
    fn hex_round_trip(c in any_color()) {
        let text = c.to_string();
        prop_assert_eq!(text.len(), 7);
        prop_assert_eq!(text.to_lowercase(), text.clone());
        prop_assert_eq!(Color::parse(&text).unwrap(), c);
    }

    /// The alpha pair of the 9-character form is ignored.
    #[test]
    fn alpha_is_ignored(c in any_color(), alpha in any::<u8>()) {
        let text = format!("{}{:02X}", c.to_hex().to_uppercase(), alpha);
        prop_assert_eq!(text.parse::<Color>().unwrap(), c);
    }

    /// Overlay and subtract clamp every channel to 0..=255.
    #[test]
    fn overlay_and_subtract_clamp(a in any_color(), b in any_color()) {
        let sum = a + b;
        let diff = a - b;
        for (s, d, x, y) in [
            (sum.red, diff.red, a.red, b.red),
            (sum.green, diff.green, a.green, b.green),
            (sum.blue, diff.blue, a.blue, b.blue),
        ] {
            prop_assert_eq!(s as u16, (x as u16 + y as u16).min(255));
            prop_assert_eq!(d as i16, (x as i16 - y as i16).max(0));
        }
    }

    /// Text without a leading '#' never parses.
    #[test]
    fn missing_hash_rejected(s in "[0-9a-f]{6}") {
        let missing_hash = matches!(Color::parse(&s), Err(ParseColorError::MissingHash { .. }));
        prop_assert!(missing_hash);
    }

    /// Lengths other than 7 or 9 never parse.
    #[test]
    fn bad_length_rejected(s in "#[0-9a-f]{0,12}") {
        prop_assume!(s.len() != 7 && s.len() != 9);
        let bad_length = matches!(Color::parse(&s), Err(ParseColorError::InvalidLength { .. }));
        prop_assert!(bad_length);
    }

    /// A cycle of N colors issues all N before repeating, in order.
    #[test]
    fn cycle_rotates_exhaustively(colors in prop::collection::vec(any_color(), 1..20), laps in 1usize..4) {
        let mut cycle = ColorCycle::new(colors.clone());
        for _ in 0..laps {
            for expected in &colors {
                prop_assert_eq!(cycle.next(), *expected);
            }
        }
    }

    /// Reset returns to the first color no matter how far the cycle advanced.
    #[test]
    fn reset_restores_start(steps in 0usize..40, delta in any_color()) {
        let mut cycle = ColorCycle::default().with_advance(delta);
        for _ in 0..steps {
            cycle.next();
        }
        cycle.reset();
        prop_assert_eq!(cycle.next(), STACK_COLORS[0]);
    }
}

#[test]
fn default_cycle_is_the_stack_palette() {
    let mut cycle = ColorCycle::default();
    let issued: Vec<String> = (0..STACK_COLORS.len() + 1)
        .map(|_| cycle.next().to_hex())
        .collect();
    assert_eq!(issued[0], "#e00000");
    assert_eq!(issued[1], "#e06000");
    assert_eq!(issued[13], "#e00060");
    assert_eq!(issued[14], "#e00000");
}
