//! Exponentially weighted means (recursive form, no bias adjustment).

/// Exponentially weighted mean of a possibly gapped series.
///
/// The recursion `y = y_prev + alpha * (x - y_prev)` is seeded with the first
/// present value. An entry is emitted once at least `min_periods` values have
/// been seen; missing inputs produce missing outputs.
pub fn ewm(values: &[Option<f64>], alpha: f64, min_periods: usize) -> Vec<Option<f64>> {
    let mut prev: Option<f64> = None;
    let mut seen = 0usize;
    values
        .iter()
        .map(|v| {
            let x = (*v)?;
            let y = match prev {
                None => x,
                Some(p) => p + alpha * (x - p),
            };
            prev = Some(y);
            seen += 1;
            (seen >= min_periods.max(1)).then_some(y)
        })
        .collect()
}

/// Exponential moving average with `alpha = 2 / (span + 1)`, undefined for the
/// first `span - 1` entries.
pub fn ema(values: &[f64], span: usize) -> Vec<Option<f64>> {
    let present: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    ema_gapped(&present, span)
}

/// [`ema`] over a series with leading gaps, e.g. another indicator's output.
pub fn ema_gapped(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    if span == 0 {
        return vec![None; values.len()];
    }
    ewm(values, 2.0 / (span as f64 + 1.0), span)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn ema_seeds_with_first_value() {
        // alpha = 0.5
        let out = ema(&[2.0, 4.0, 8.0], 3);
        assert_eq!(&out[..2], &[None, None]);
        // 2 -> 3 -> 5.5
        assert_relative_eq!(out[2].unwrap(), 5.5);
    }

    #[test]
    fn gaps_are_skipped() {
        let out = ema_gapped(&[None, None, Some(1.0), Some(3.0)], 3);
        assert_eq!(&out[..3], &[None, None, None]);
        assert_eq!(out[3], None);

        let out = ewm(&[None, Some(1.0), Some(3.0)], 0.5, 1);
        assert_eq!(out, vec![None, Some(1.0), Some(2.0)]);
    }
}
