//! Dice rolling with summary statistics.

use rand::Rng;

/// Everything worth knowing about a batch of rolls.
#[derive(Debug, Clone, PartialEq)]
pub struct RollOutcome {
    /// Individual rolls, sorted ascending.
    pub rolls: Vec<u32>,
    pub sum: u32,
    pub average: f64,
    pub median: u32,
    /// Most repeated roll.
    pub mode: u32,
    pub max: u32,
    pub min: u32,
}

/// Roll a die with `sides` sides `times` times.
pub fn roll(sides: u32, times: u32) -> RollOutcome {
    roll_with_rng(sides, times, &mut rand::thread_rng())
}

/// Roll with a specific RNG (useful for testing).
pub fn roll_with_rng<R: Rng>(sides: u32, times: u32, rng: &mut R) -> RollOutcome {
    let times = times.max(1);
    let mut rolls: Vec<u32> = (0..times).map(|_| rng.gen_range(1..=sides.max(1))).collect();
    rolls.sort_unstable();

    let sum: u32 = rolls.iter().sum();
    let average = f64::from(sum) / f64::from(times);
    let median = rolls[rolls.len() / 2];
    let max = *rolls.last().unwrap();
    let min = rolls[0];

    let mut counts = std::collections::HashMap::new();
    let mut mode = rolls[0];
    let mut mode_count = 0usize;
    for &r in &rolls {
        let count = counts.entry(r).or_insert(0usize);
        *count += 1;
        if *count > mode_count {
            mode = r;
            mode_count = *count;
        }
    }

    RollOutcome {
        rolls,
        sum,
        average,
        median,
        mode,
        max,
        min,
    }
}

/// One d20.
pub fn d20() -> u32 {
    roll(20, 1).sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn single_roll_in_range() {
        for _ in 0..100 {
            let result = roll(20, 1);
            assert!((1..=20).contains(&result.sum));
        }
    }

    #[test]
    fn statistics_are_consistent() {
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = roll_with_rng(6, 10, &mut rng);

        assert_eq!(outcome.rolls.len(), 10);
        assert!(outcome.rolls.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(outcome.sum, outcome.rolls.iter().sum::<u32>());
        assert_eq!(outcome.min, outcome.rolls[0]);
        assert_eq!(outcome.max, *outcome.rolls.last().unwrap());
        assert!((outcome.average - f64::from(outcome.sum) / 10.0).abs() < f64::EPSILON);
        assert!(outcome.rolls.contains(&outcome.median));
        assert!(outcome.rolls.contains(&outcome.mode));
    }

    #[test]
    fn zero_times_rolls_once() {
        let result = roll(20, 0);
        assert_eq!(result.rolls.len(), 1);
    }

    #[test]
    fn d20_in_range() {
        for _ in 0..100 {
            assert!((1..=20).contains(&d20()));
        }
    }
}
