//! Moving averages and RSI over daily closes
//!
//! Both indicators return one value per input bar, `None` while the trailing
//! window is not yet full.

use serde::{Deserialize, Serialize};
use ta::{Next, indicators::SimpleMovingAverage};

pub const MA_PERIODS: [usize; 4] = [5, 20, 60, 120];
pub const RSI_PERIOD: usize = 14;

// Rolling sums leave float residue when a window drains to zero
const ZERO_TOLERANCE: f64 = 1e-12;

/// Trailing simple moving average of `closes` over `period` bars
pub fn moving_average(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let Ok(mut sma) = SimpleMovingAverage::new(period) else {
        return vec![None; closes.len()];
    };

    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let value = sma.next(close);
            (i + 1 >= period).then_some(value)
        })
        .collect()
}

/// RSI using simple rolling means of gains and losses
///
/// The first `period` bars have no value since `period` price changes are
/// needed. A window with losses but no gains reads 0, gains but no losses
/// reads 100 and a flat window reads 50.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let (Ok(mut gains), Ok(mut losses)) = (
        SimpleMovingAverage::new(period),
        SimpleMovingAverage::new(period),
    ) else {
        return vec![None; closes.len()];
    };

    let mut out = Vec::with_capacity(closes.len());
    out.extend(closes.first().map(|_| None));

    for (i, pair) in closes.windows(2).enumerate() {
        let delta = pair[1] - pair[0];
        let avg_gain = gains.next(delta.max(0.0));
        let avg_loss = losses.next((-delta).max(0.0));

        // i + 1 changes seen so far
        if i + 1 < period {
            out.push(None);
        } else {
            out.push(Some(rsi_from_averages(avg_gain, avg_loss)));
        }
    }

    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let gain_zero = avg_gain.abs() < ZERO_TOLERANCE;
    let loss_zero = avg_loss.abs() < ZERO_TOLERANCE;

    match (gain_zero, loss_zero) {
        (true, true) => 50.0,
        (false, true) => 100.0,
        _ => 100.0 - 100.0 / (1.0 + avg_gain / avg_loss),
    }
}

/// Textual reading of an RSI value
pub fn interpret_rsi(rsi: f64) -> RsiSignal {
    if rsi > 70.0 {
        RsiSignal::Overbought
    } else if rsi < 30.0 {
        RsiSignal::Oversold
    } else {
        RsiSignal::Neutral
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiSignal {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiSignal {
    pub fn korean(self) -> &'static str {
        match self {
            Self::Overbought => "과매수",
            Self::Oversold => "과매도",
            Self::Neutral => "중립",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            Self::Overbought => "overbought",
            Self::Oversold => "oversold",
            Self::Neutral => "neutral",
        }
    }
}

/// Latest indicator values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSummary {
    pub ma5: Option<f64>,
    pub ma20: Option<f64>,
    pub ma60: Option<f64>,
    pub ma120: Option<f64>,
    pub rsi14: Option<f64>,
}

fn last_value(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

impl IndicatorSummary {
    pub fn from_closes(closes: &[f64]) -> Self {
        let [ma5, ma20, ma60, ma120] =
            MA_PERIODS.map(|period| last_value(&moving_average(closes, period)));

        Self {
            ma5,
            ma20,
            ma60,
            ma120,
            rsi14: last_value(&rsi(closes, RSI_PERIOD)),
        }
    }

    /// Apply `f` to every price-denominated value (the MAs, not RSI)
    pub fn map_prices(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            ma5: self.ma5.map(&f),
            ma20: self.ma20.map(&f),
            ma60: self.ma60.map(&f),
            ma120: self.ma120.map(&f),
            rsi14: self.rsi14,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_moving_average_warmup() {
        let ma = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(ma[0], None);
        assert_eq!(ma[1], None);
        assert!(approx(ma[2], 2.0));
        assert!(approx(ma[3], 3.0));
        assert!(approx(ma[4], 4.0));
    }

    #[test]
    fn test_moving_average_degenerate() {
        assert_eq!(moving_average(&[1.0, 2.0], 0), vec![None, None]);
        assert_eq!(moving_average(&[1.0, 2.0], 5), vec![None, None]);
        assert!(moving_average(&[], 5).is_empty());
    }

    #[test]
    fn test_rsi_warmup_length() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + f64::from(i % 3)).collect();
        let values = rsi(&closes, 14);
        assert_eq!(values.len(), closes.len());
        assert!(values[..14].iter().all(Option::is_none));
        assert!(values[14..].iter().all(Option::is_some));
    }

    #[test]
    fn test_rsi_simple_means() {
        // changes: +2, -1, +2, -1 -> avg gain 1.0, avg loss 0.5 -> RS 2
        let values = rsi(&[10.0, 12.0, 11.0, 13.0, 12.0], 4);
        assert!(approx(values[4], 100.0 - 100.0 / 3.0));
    }

    #[test]
    fn test_rsi_guards() {
        let rising: Vec<f64> = (0..16).map(f64::from).collect();
        assert!(approx(*rsi(&rising, 14).last().unwrap(), 100.0));

        let falling: Vec<f64> = (0..16).rev().map(f64::from).collect();
        assert!(approx(*rsi(&falling, 14).last().unwrap(), 0.0));

        let flat = vec![50.0; 16];
        assert!(approx(*rsi(&flat, 14).last().unwrap(), 50.0));
    }

    #[test]
    fn test_rsi_bounded() {
        let closes: Vec<f64> = (0..200)
            .map(|i| 100.0 + (f64::from(i) * 0.7).sin() * 10.0)
            .collect();
        for value in rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_summary_short_history() {
        let closes: Vec<f64> = (1..=30).map(f64::from).collect();
        let summary = IndicatorSummary::from_closes(&closes);
        assert!(approx(summary.ma5, 28.0));
        assert!(approx(summary.ma20, 20.5));
        assert_eq!(summary.ma60, None);
        assert_eq!(summary.ma120, None);
        assert!(approx(summary.rsi14, 100.0));
        assert_eq!(summary.rsi14.map(interpret_rsi), Some(RsiSignal::Overbought));
    }

    #[test]
    fn test_map_prices_keeps_rsi() {
        let summary = IndicatorSummary {
            ma5: Some(10.0),
            rsi14: Some(40.0),
            ..Default::default()
        };
        let converted = summary.map_prices(|v| v * 1000.0);
        assert!(approx(converted.ma5, 10_000.0));
        assert_eq!(converted.ma20, None);
        assert!(approx(converted.rsi14, 40.0));
    }

    #[test]
    fn test_interpret_rsi() {
        assert_eq!(interpret_rsi(75.0), RsiSignal::Overbought);
        assert_eq!(interpret_rsi(25.0), RsiSignal::Oversold);
        assert_eq!(interpret_rsi(50.0).korean(), "중립");
    }
}
