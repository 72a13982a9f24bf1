//! Time-series statistics
//!
//! Pure computations over a price series sorted ascending in time. Each
//! statistic independently degrades to `StatValue::Unavailable` when the
//! series is too short or too narrow for it.

use crate::models::{PricePoint, PriceSeries, StatValue, StatsResult};
use crate::utils::round2;
use chrono::Months;
use std::borrow::Cow;

/// Cumulative return in percent: change between the last two samples.
pub fn cumulative_return(points: &[PricePoint]) -> StatValue {
    if points.len() < 2 {
        return StatValue::Unavailable;
    }

    let last = points[points.len() - 1].close;
    let previous = points[points.len() - 2].close;
    StatValue::Value(round2((last - previous) / previous * 100.0))
}

/// Annualized return in percent over `n_years` calendar years:
/// `((1 + rc)^(1/n) - 1) * 100` where `rc` is the return against the
/// latest sample at or before `last - n_years`.
pub fn annualized_return(points: &[PricePoint], n_years: u32) -> StatValue {
    let last = match points.last() {
        Some(point) => point,
        None => return StatValue::Unavailable,
    };

    let cutoff = last.at - Months::new(12 * n_years);
    let past = match points.iter().rev().find(|p| p.at <= cutoff) {
        Some(point) => point,
        // Series does not reach back n_years.
        None => return StatValue::Unavailable,
    };

    let rc = (last.close - past.close) / past.close;
    let annualized = ((1.0 + rc).powf(1.0 / n_years as f64) - 1.0) * 100.0;
    StatValue::Value(round2(annualized))
}

/// Annualized volatility in percent points: sample standard deviation
/// (ddof = 1) of all closes inside the trailing 1-year window.
pub fn annualized_volatility(points: &[PricePoint]) -> StatValue {
    let last = match points.last() {
        Some(point) => point,
        None => return StatValue::Unavailable,
    };

    let cutoff = last.at - Months::new(12);
    let window: Vec<f64> = points
        .iter()
        .filter(|p| p.at >= cutoff)
        .map(|p| p.close)
        .collect();

    if window.len() < 2 {
        return StatValue::Unavailable;
    }

    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    StatValue::Value(round2(variance.sqrt()))
}

/// All statistics for one symbol, with the annualized return taken over
/// one year.
pub fn evaluate_stats(series: &PriceSeries, symbol: &str) -> StatsResult {
    let points = sorted_points(series);

    StatsResult {
        symbol: symbol.to_string(),
        cumulative_return: cumulative_return(&points),
        annualized_cumulative_return: annualized_return(&points, 1),
        annualized_volatility: annualized_volatility(&points),
    }
}

/// Stored series are already ascending; re-sort defensively if this one
/// is not.
fn sorted_points(series: &PriceSeries) -> Cow<'_, [PricePoint]> {
    let ascending = series.points.windows(2).all(|w| w[0].at <= w[1].at);
    if ascending {
        Cow::Borrowed(&series.points)
    } else {
        let mut points = series.points.clone();
        points.sort_by_key(|p| p.at);
        Cow::Owned(points)
    }
}
