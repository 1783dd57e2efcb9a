//! Tests for slippage estimates

#[cfg(test)]
mod tests {
    use crate::estimators::{Estimate, SlippageEstimate, SlippageEstimator};
    use crate::orderbook::{BookSnapshot, PriceLevel};

    fn snapshot(asks: &[(f64, f64)], bids: &[(f64, f64)]) -> BookSnapshot {
        BookSnapshot::from_levels(
            asks.iter().copied().map(PriceLevel::from).collect(),
            bids.iter().copied().map(PriceLevel::from).collect(),
        )
    }

    #[test]
    fn test_predict_on_two_sided_book() {
        // depth = (100*10 + 98*10) / 2 = 990, mid 99, spread 2
        let book = snapshot(&[(100.0, 10.0)], &[(98.0, 10.0)]);

        let estimate = SlippageEstimator::default().predict(&book).value().unwrap();

        let linear = 0.0001 * (100.0 / 990.0) * 10_000.0;
        let spread = (0.0001 + 2.0 / 99.0) * 10_000.0;
        assert!((estimate.linear_bps - linear).abs() < 1e-9);
        assert!((estimate.spread_bps - spread).abs() < 1e-9);
        assert!((estimate.conservative_bps() - spread).abs() < 1e-9);
    }

    #[test]
    fn test_linear_estimate_dominates_on_thin_book() {
        let book = snapshot(&[(1.0001, 0.01)], &[(1.0, 0.01)]);

        let estimate = SlippageEstimator::default().predict(&book).value().unwrap();

        assert!(estimate.linear_bps > estimate.spread_bps);
        assert_eq!(estimate.conservative_bps(), estimate.linear_bps);
    }

    #[test]
    fn test_one_sided_book_has_no_data() {
        let estimator = SlippageEstimator::default();

        assert_eq!(estimator.predict(&snapshot(&[(100.0, 1.0)], &[])), Estimate::NoData);
        assert_eq!(estimator.predict(&snapshot(&[], &[(99.0, 1.0)])), Estimate::NoData);
        assert_eq!(
            estimator
                .predict(&BookSnapshot::default())
                .unwrap_or(SlippageEstimate::ZERO)
                .conservative_bps(),
            0.0
        );
    }

    #[test]
    fn test_quantity_slippage() {
        let estimator = SlippageEstimator::default();

        let slippage = estimator.estimate(1000.0, 10_000.0).value().unwrap();
        assert!((slippage - 0.00001).abs() < 1e-15);
        assert_eq!(estimator.estimate(1000.0, 0.0), Estimate::NoData);
    }
}
