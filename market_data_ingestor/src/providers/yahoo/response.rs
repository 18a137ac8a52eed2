use chrono::DateTime;
use serde::Deserialize;

use crate::models::bar::Bar;

#[derive(Deserialize, Debug)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Deserialize, Debug)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Deserialize, Debug)]
pub struct ChartMeta {
    pub symbol: String,
    pub currency: Option<String>,
    #[serde(default)]
    pub gmtoffset: i32,
    #[serde(rename = "exchangeTimezoneName")]
    pub exchange_timezone_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Vec<AdjClose>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

impl ChartResult {
    /// Zips the columnar payload into bars.
    ///
    /// Rows missing any of open/high/low/close are dropped; a missing volume is 0.
    pub fn into_bars(self) -> Vec<Bar> {
        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();
        let adj = self
            .indicators
            .adjclose
            .into_iter()
            .next()
            .unwrap_or_default()
            .adjclose;
        let at = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();

        self.timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let timestamp = DateTime::from_timestamp(ts, 0)?;
                Some(Bar {
                    timestamp,
                    open: at(&quote.open, i)?,
                    high: at(&quote.high, i)?,
                    low: at(&quote.low, i)?,
                    close: at(&quote.close, i)?,
                    adj_close: at(&adj, i),
                    volume: at(&quote.volume, i).unwrap_or(0.0),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "BBRI.JK", "currency": "IDR", "gmtoffset": 25200,
                         "exchangeTimezoneName": "Asia/Jakarta"},
                "timestamp": [1577930400, 1578016800, 1578276000],
                "indicators": {
                    "quote": [{
                        "open":   [4400.0, 4410.0, null],
                        "high":   [4430.0, 4440.0, null],
                        "low":    [4390.0, 4400.0, null],
                        "close":  [4410.0, 4420.0, null],
                        "volume": [61432000, null, null]
                    }],
                    "adjclose": [{"adjclose": [3900.5, 3909.3, null]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn null_rows_are_dropped() {
        let envelope: ChartEnvelope = serde_json::from_str(PAYLOAD).unwrap();
        let result = envelope.chart.result.unwrap().into_iter().next().unwrap();
        assert_eq!(result.meta.gmtoffset, 25200);

        let bars = result.into_bars();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 4410.0);
        assert_eq!(bars[0].adj_close, Some(3900.5));
        assert_eq!(bars[0].volume, 61432000.0);
        assert_eq!(bars[1].volume, 0.0);
    }

    #[test]
    fn empty_range_has_no_timestamps() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"BBRI.JK","gmtoffset":25200},
            "indicators":{"quote":[{}],"adjclose":[{}]}}],"error":null}}"#;
        let envelope: ChartEnvelope = serde_json::from_str(body).unwrap();
        let result = envelope.chart.result.unwrap().into_iter().next().unwrap();
        assert!(result.into_bars().is_empty());
    }

    #[test]
    fn error_payload_parses() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found",
            "description":"No data found, symbol may be delisted"}}}"#;
        let envelope: ChartEnvelope = serde_json::from_str(body).unwrap();
        assert!(envelope.chart.result.is_none());
        assert_eq!(envelope.chart.error.unwrap().code, "Not Found");
    }
}
