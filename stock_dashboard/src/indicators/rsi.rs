//! Relative Strength Index with Wilder smoothing.

use super::ema::ewm;

/// RSI over `window` periods, bounded to `[0, 100]`.
///
/// Gains and losses are the positive and negative parts of consecutive
/// differences, each smoothed with `alpha = 1 / window`. The first price has
/// no difference and counts as a zero move, so the first value is defined at
/// index `window - 1`. A window with no losses reads 100.
pub fn rsi(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    if window == 0 || n == 0 {
        return vec![None; n];
    }

    let mut gains = Vec::with_capacity(n);
    let mut losses = Vec::with_capacity(n);
    gains.push(Some(0.0));
    losses.push(Some(0.0));
    for w in values.windows(2) {
        let diff = w[1] - w[0];
        gains.push(Some(diff.max(0.0)));
        losses.push(Some((-diff).max(0.0)));
    }

    let alpha = 1.0 / window as f64;
    let avg_gain = ewm(&gains, alpha, window);
    let avg_loss = ewm(&losses, alpha, window);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(g, l)| {
            let (g, l) = (g?, l?);
            let value = if l == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + g / l)
            };
            Some(value.clamp(0.0, 100.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn warm_up_is_one_short_of_the_window() {
        let closes: Vec<f64> = (0..30).map(|i| (i as f64).sin() + 10.0).collect();
        let out = rsi(&closes, 14);
        assert_eq!(out.len(), 30);
        assert!(out[..13].iter().all(Option::is_none));
        assert!(out[13..].iter().all(Option::is_some));
    }

    #[test]
    fn matches_reference_values() {
        // Wilder smoothing seeded with a zero move at the first price.
        let closes = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28, 46.00,
        ];
        let expected = [
            57.524272, 71.184522, 76.324106, 81.272625, 86.054616, 88.205778, 76.524380,
            79.076581, 56.174750, 72.218679, 72.218679, 58.285503,
        ];
        let out = rsi(&closes, 5);
        assert!(out[..4].iter().all(Option::is_none));
        for (got, want) in out[4..].iter().zip(expected) {
            assert_relative_eq!(got.unwrap(), want, epsilon = 1e-5);
        }
    }

    #[test]
    fn monotonic_series_hit_the_bounds() {
        let up: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let down: Vec<f64> = up.iter().rev().copied().collect();
        assert_eq!(rsi(&up, 14)[19], Some(100.0));
        assert_relative_eq!(rsi(&down, 14)[19].unwrap(), 0.0);
    }

    #[test]
    fn balanced_moves_sit_near_fifty() {
        let closes: Vec<f64> = (0..200).map(|i| if i % 2 == 0 { 10.0 } else { 11.0 }).collect();
        let last = rsi(&closes, 14)[199].unwrap();
        assert!((40.0..60.0).contains(&last), "rsi was {last}");
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(rsi(&[1.0], 14), vec![None]);
        assert_eq!(rsi(&[1.0, 2.0, 3.0], 0), vec![None, None, None]);
    }
}
