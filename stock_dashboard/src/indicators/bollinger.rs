use serde::Serialize;

use super::rolling::{rolling_std, sma};

/// Middle, upper and lower Bollinger bands, aligned with the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerBands {
    pub mavg: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Bands at `mavg ± dev * σ` where σ is the population standard deviation of
/// the same `window`.
pub fn bollinger(values: &[f64], window: usize, dev: f64) -> BollingerBands {
    let mavg = sma(values, window);
    let std = rolling_std(values, window);

    let band = |sign: f64| -> Vec<Option<f64>> {
        mavg.iter()
            .zip(&std)
            .map(|(m, s)| Some((*m)? + sign * dev * (*s)?))
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);

    BollingerBands { mavg, upper, lower }
}
