use orderbook_impact::{
    AlmgrenChriss, ExecutionError, ExecutionModelParameters, MarketImpactAnalyzer, OrderBook,
    RawBookUpdate, Side, TradeSimulator,
};
use proptest::prelude::*;
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> impl Strategy<Value = ExecutionModelParameters> {
        (0.01f64..1.0, 0.01f64..1.0, 0.0f64..5.0, 0.001f64..0.2, 1.0f64..1000.0).prop_map(
            |(eta, gamma, lambda, sigma, price)| ExecutionModelParameters {
                permanent_impact: eta,
                temporary_impact: gamma,
                risk_aversion: lambda,
                volatility: sigma,
                initial_price: price,
                ..ExecutionModelParameters::default()
            },
        )
    }

    proptest! {
        #[test]
        fn schedule_liquidates_the_whole_order(
            p in params(),
            quantity in 1.0f64..100_000.0,
            horizon in 0.01f64..10.0,
            periods in 1usize..50,
        ) {
            let schedule = AlmgrenChriss::new(p)
                .optimal_schedule(quantity, horizon, periods)
                .unwrap();

            prop_assert_eq!(schedule.holdings.len(), periods + 1);
            prop_assert_eq!(schedule.trading_rates.len(), periods);
            prop_assert_eq!(schedule.holdings[0], quantity);
            prop_assert_eq!(schedule.holdings[periods], 0.0);
            prop_assert!(schedule.holdings.windows(2).all(|w| w[1] <= w[0]));

            let traded: f64 = schedule.trade_sizes().iter().sum();
            prop_assert!((traded + quantity).abs() <= quantity * 1e-9);
            prop_assert!(schedule.expected_shortfall_bps.is_finite());
        }

        #[test]
        fn higher_risk_aversion_front_loads_trading(
            quantity in 100.0f64..10_000.0,
            periods in 2usize..20,
        ) {
            let patient = ExecutionModelParameters {
                risk_aversion: 0.1,
                ..ExecutionModelParameters::default()
            };
            let urgent = ExecutionModelParameters {
                risk_aversion: 50.0,
                ..ExecutionModelParameters::default()
            };

            let slow = AlmgrenChriss::new(patient)
                .optimal_schedule(quantity, 1.0, periods)
                .unwrap();
            let fast = AlmgrenChriss::new(urgent)
                .optimal_schedule(quantity, 1.0, periods)
                .unwrap();

            prop_assert!(fast.holdings[1] <= slow.holdings[1]);
        }
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let model = AlmgrenChriss::new(ExecutionModelParameters::default());

        for (horizon, periods) in [(1.0, 0), (0.0, 4), (-1.0, 4), (f64::NAN, 4)] {
            let err = model.optimal_schedule(1000.0, horizon, periods).unwrap_err();
            assert!(matches!(err, ExecutionError::InvalidParameters { .. }));
        }
    }

    #[test]
    fn test_analyzer_and_simulator_share_the_book() {
        let book = Arc::new(OrderBook::new("SIM"));
        let update = RawBookUpdate::from_pairs(&[(101.0, 50.0)], &[(99.0, 50.0)]);
        let update = orderbook_impact::BookUpdate::try_from(&update).unwrap();
        book.apply_update(&update);

        let analyzer = MarketImpactAnalyzer::new(Arc::clone(&book));
        let mut simulator = TradeSimulator::with_analyzer(analyzer);

        let buy = simulator.simulate_trade(10.0, Side::Buy).unwrap();
        let sell = simulator.simulate_trade(10.0, Side::Sell).unwrap();

        assert!(buy.execution_price > 100.0);
        assert!(sell.execution_price < 100.0);
        assert_eq!(simulator.trade_count(), 2);
        // a round trip through the impact-adjusted mid loses money
        assert!(simulator.pnl() < 0.0);
    }
}
