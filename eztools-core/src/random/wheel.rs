//! Spin wheel: equal segments, a fixed pointer, and a cosmetic spin.
//!
//! Segment `i` covers angles `[i·s, (i+1)·s)` measured in the wheel's own
//! frame, where `s = 2π / N`. The pointer sits at the top of the canvas,
//! which is angle 3π/2 in screen coordinates. After the wheel has turned by
//! `rotation`, the pointer lies over segment
//! `floor(normalize(3π/2 − rotation) / s)`.

use std::f64::consts::{PI, TAU};
use std::time::Duration;

use rand::Rng;

use super::list::non_blank_lines;

/// Screen angle of the fixed pointer.
pub const POINTER_ANGLE: f64 = 3.0 * PI / 2.0;

/// Length of the spin animation.
pub const SPIN_DURATION: Duration = Duration::from_secs(4);

const MIN_FULL_TURNS: f64 = 5.0;
const EXTRA_FULL_TURNS: f64 = 5.0;

const LABEL_MAX_CHARS: usize = 10;
const LABEL_KEEP_CHARS: usize = 8;

/// Reduces `angle` into `[0, turn)`.
pub fn normalize_angle(
    angle: f64,
    turn: f64,
) -> f64 {
    let normalized = angle.rem_euclid(turn);
    // rem_euclid can round up to exactly `turn` for tiny negative inputs.
    if normalized >= turn { 0.0 } else { normalized }
}

/// Ease-out cubic: fast start, gentle stop.
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Shortens long items so they fit inside a segment.
pub fn segment_label(item: &str) -> String {
    if item.chars().count() > LABEL_MAX_CHARS {
        let head: String = item.chars().take(LABEL_KEEP_CHARS).collect();
        format!("{head}..")
    } else {
        item.to_string()
    }
}

/// A single spin: the total rotation the wheel travels before stopping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub total_rotation: f64,
}

impl Spin {
    /// Between 5 and 10 full turns plus a random partial turn.
    ///
    /// This is cosmetic, so any generator will do.
    pub fn random<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let turns = MIN_FULL_TURNS + rng.r#gen::<f64>() * EXTRA_FULL_TURNS;
        let extra = rng.r#gen::<f64>() * TAU;
        Self {
            total_rotation: turns * TAU + extra,
        }
    }

    /// Rotation of the wheel at animation progress `progress` in `[0, 1]`.
    pub fn rotation_at(
        &self,
        progress: f64,
    ) -> f64 {
        self.total_rotation * ease_out_cubic(progress)
    }

    /// Animation progress after `elapsed` time.
    pub fn progress(elapsed: Duration) -> f64 {
        (elapsed.as_secs_f64() / SPIN_DURATION.as_secs_f64()).min(1.0)
    }
}

/// Ordered wheel items, one equal segment each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wheel {
    items: Vec<String>,
}

impl Default for Wheel {
    fn default() -> Self {
        Self::new(["Item 1", "Item 2", "Item 3"])
    }
}

impl Wheel {
    /// Builds a wheel from items, skipping blank ones.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items
                .into_iter()
                .map(Into::into)
                .filter(|item: &String| !item.trim().is_empty())
                .collect(),
        }
    }

    /// One item per non-blank line.
    pub fn from_lines(text: &str) -> Self {
        Self {
            items: non_blank_lines(text),
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Angular width of one segment, or `None` for an empty wheel.
    pub fn segment_angle(&self) -> Option<f64> {
        if self.items.is_empty() {
            return None;
        }
        Some(TAU / self.items.len() as f64)
    }

    /// Index of the segment under the pointer after turning by `rotation`.
    pub fn winner_index(
        &self,
        rotation: f64,
    ) -> Option<usize> {
        let segment = self.segment_angle()?;
        let pointer = normalize_angle(POINTER_ANGLE - normalize_angle(rotation, TAU), TAU);
        let index = (pointer / segment).floor() as usize;
        Some(index.min(self.items.len() - 1))
    }

    pub fn winner(
        &self,
        rotation: f64,
    ) -> Option<&str> {
        self.winner_index(rotation)
            .map(|index| self.items[index].as_str())
    }

    /// Spins the wheel with `rng`. Returns `None` for an empty wheel.
    pub fn spin<G: Rng + ?Sized>(
        &self,
        rng: &mut G,
    ) -> Option<Spin> {
        if self.items.is_empty() {
            return None;
        }
        Some(Spin::random(rng))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn four_items() -> Wheel {
        Wheel::new(["A", "B", "C", "D"])
    }

    #[test]
    fn winner_follows_pointer_formula() {
        let wheel = four_items();

        // Quarter-segment offsets keep every case away from segment edges.
        assert_eq!(wheel.winner_index(PI / 4.0), Some(2));
        assert_eq!(wheel.winner_index(3.0 * PI / 4.0), Some(1));
        assert_eq!(wheel.winner_index(5.0 * PI / 4.0), Some(0));
        assert_eq!(wheel.winner_index(7.0 * PI / 4.0), Some(3));
    }

    #[test]
    fn winner_ignores_whole_turns() {
        let wheel = four_items();

        assert_eq!(wheel.winner_index(7.0 * TAU + PI / 4.0), Some(2));
        assert_eq!(wheel.winner(7.0 * TAU + 5.0 * PI / 4.0), Some("A"));
    }

    #[test]
    fn winner_is_always_a_valid_index() {
        let wheel = Wheel::new(["1", "2", "3", "4", "5", "6", "7"]);

        for step in 0..500 {
            let rotation = step as f64 * 0.173;
            let index = wheel.winner_index(rotation).unwrap();

            assert!(index < wheel.len());
        }
    }

    #[test]
    fn single_item_always_wins() {
        let wheel = Wheel::new(["Only"]);

        assert_eq!(wheel.winner(1.234), Some("Only"));
    }

    #[test]
    fn empty_wheel_has_no_winner_or_spin() {
        let wheel = Wheel::from_lines("\n \n");

        assert!(wheel.is_empty());
        assert_eq!(wheel.segment_angle(), None);
        assert_eq!(wheel.winner_index(1.0), None);
        assert_eq!(wheel.spin(&mut rand::thread_rng()), None);
    }

    #[test]
    fn from_lines_trims_and_skips_blank_lines() {
        let wheel = Wheel::from_lines("  Phở \n\nBún chả\n  \nCơm tấm\n");

        assert_eq!(wheel.items(), ["Phở", "Bún chả", "Cơm tấm"]);
    }

    #[test]
    fn default_wheel_has_three_items() {
        assert_eq!(Wheel::default().items(), ["Item 1", "Item 2", "Item 3"]);
    }

    #[test]
    fn new_skips_blank_items() {
        let wheel = Wheel::new(vec!["A".to_string(), "  ".to_string(), "B".to_string()]);

        assert_eq!(wheel.len(), 2);
    }

    #[test]
    fn spin_travels_between_five_and_eleven_turns() {
        let mut rng = rand::thread_rng();

        for _ in 0..100 {
            let spin = four_items().spin(&mut rng).unwrap();
            assert!(spin.total_rotation >= 5.0 * TAU);
            assert!(spin.total_rotation < 11.0 * TAU);
        }
    }

    #[test]
    fn rotation_eases_out_to_total() {
        let spin = Spin {
            total_rotation: 10.0,
        };

        assert_eq!(spin.rotation_at(0.0), 0.0);
        assert_eq!(spin.rotation_at(0.5), 8.75);
        assert_eq!(spin.rotation_at(1.0), 10.0);
        assert_eq!(spin.rotation_at(2.0), 10.0);
    }

    #[test]
    fn progress_saturates_after_duration() {
        assert_eq!(Spin::progress(Duration::from_secs(1)), 0.25);
        assert_eq!(Spin::progress(Duration::from_secs(9)), 1.0);
    }

    #[test]
    fn normalize_angle_wraps_negative_angles() {
        let normalized = normalize_angle(-PI / 2.0, TAU);

        assert!((normalized - 3.0 * PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn segment_label_truncates_long_items() {
        assert_eq!(segment_label("Bún đậu mắm tôm"), "Bún đậu ..");
        assert_eq!(segment_label("Phở bò"), "Phở bò");
    }
}
