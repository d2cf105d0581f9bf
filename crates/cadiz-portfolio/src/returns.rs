//! Price to return conversion.

use cadiz_traits::{CadizError, PriceTable, Result, ReturnTable};
use ndarray::{Array2, Axis, s};

/// Convert prices to simple periodic returns, `r_t = p_t / p_{t-1} - 1`.
///
/// The first date has no return, so the output has one row fewer than the
/// input. Nothing is interpolated: every price must be present and positive.
///
/// # Errors
///
/// Returns [`CadizError::DataQuality`] if the table has no assets, fewer than
/// two dates, dates that are not strictly increasing, or any missing or
/// non-positive price.
pub fn to_returns(prices: &PriceTable) -> Result<ReturnTable> {
    if prices.n_assets() == 0 {
        return Err(CadizError::data_quality("price table has no assets"));
    }
    if prices.n_periods() < 2 {
        return Err(CadizError::data_quality(format!(
            "need at least 2 price observations, got {}",
            prices.n_periods()
        )));
    }
    if let Some(pair) = prices.dates().windows(2).find(|pair| pair[1] <= pair[0]) {
        return Err(CadizError::data_quality(format!(
            "dates must be strictly increasing ({} followed by {})",
            pair[0], pair[1]
        )));
    }

    let matrix = prices.prices();
    for (j, column) in matrix.axis_iter(Axis(1)).enumerate() {
        if let Some((i, p)) = column.iter().enumerate().find(|(_, p)| !p.is_finite() || **p <= 0.0) {
            let symbol = &prices.symbols()[j];
            let what = if p.is_finite() { "non-positive" } else { "missing" };
            return Err(CadizError::data_quality(format!(
                "{what} price for {symbol} on {}",
                prices.dates()[i]
            )));
        }
    }

    let previous = matrix.slice(s![..-1, ..]);
    let current = matrix.slice(s![1.., ..]);
    let returns: Array2<f64> = &current / &previous - 1.0;

    ReturnTable::new(prices.dates()[1..].to_vec(), prices.symbols().to_vec(), returns)
}
