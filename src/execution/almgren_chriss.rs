//! Almgren-Chriss optimal liquidation schedule.
//!
//! For a position `Q` to be worked over horizon `T` in `N` equal periods, the
//! risk-adjusted optimal holdings are
//!
//! ```text
//! x_i = Q * sinh(kappa * (T - t_i)) / sinh(kappa * T),   kappa = sqrt(lambda * sigma^2 / gamma)
//! ```
//!
//! The hyperbolic ratio is evaluated as
//! `exp(-kappa t) * expm1(-2 kappa (T - t)) / expm1(-2 kappa T)`, which is the
//! same quantity but stays finite when `kappa * T` is large enough to overflow
//! `sinh`.

use super::error::ExecutionError;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Parameters of the execution cost model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionModelParameters {
    /// Permanent impact coefficient (eta)
    pub permanent_impact: f64,
    /// Temporary impact coefficient (gamma), must be positive
    pub temporary_impact: f64,
    /// Temporary impact decay (rho). Carried with the parameter set but not
    /// used by the cost formula.
    pub temporary_decay: f64,
    /// Risk aversion (lambda)
    pub risk_aversion: f64,
    /// Price volatility (sigma)
    pub volatility: f64,
    /// Arrival price used to express the cost in basis points
    pub initial_price: f64,
}

impl Default for ExecutionModelParameters {
    fn default() -> Self {
        Self {
            permanent_impact: 0.15,
            temporary_impact: 0.2,
            temporary_decay: 0.6,
            risk_aversion: 1.5,
            volatility: 0.03,
            initial_price: 0.0,
        }
    }
}

/// Expected cost of a schedule, split by source
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// `gamma * sum(v_i^2) * tau`
    pub temporary_impact: f64,
    /// `(eta - gamma / 2) * Q^2`, negative when `eta < gamma / 2`
    pub permanent_impact: f64,
    /// `lambda * sigma^2 * sum(x_i^2, i = 1..N) * tau`
    pub volatility_risk: f64,
    /// Sum of the three components
    pub total: f64,
}

/// A discretised execution trajectory with its expected cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSchedule {
    /// Period boundaries `t_0 = 0 .. t_N = T`
    pub times: Vec<f64>,
    /// Remaining position at each boundary, `N + 1` entries from `Q` to `0`
    pub holdings: Vec<f64>,
    /// Trading rate over each period, `N` entries
    pub trading_rates: Vec<f64>,
    /// Period length `T / N`
    pub tau: f64,
    /// Urgency parameter
    pub kappa: f64,
    /// Expected cost decomposition
    pub cost: CostBreakdown,
    /// Total cost relative to `Q * S0`, in basis points; zero when `Q * S0 = 0`
    pub expected_shortfall_bps: f64,
}

impl ExecutionSchedule {
    /// Number of trading periods
    #[must_use]
    pub fn periods(&self) -> usize {
        self.trading_rates.len()
    }

    /// Quantity traded in each period (`v_i * tau`)
    pub fn trade_sizes(&self) -> Vec<f64> {
        self.trading_rates.iter().map(|v| v * self.tau).collect()
    }
}

/// Almgren-Chriss execution model
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AlmgrenChriss {
    params: ExecutionModelParameters,
}

impl AlmgrenChriss {
    /// Creates a model over the given parameters
    #[must_use]
    pub fn new(params: ExecutionModelParameters) -> Self {
        Self { params }
    }

    /// Current parameters
    pub fn parameters(&self) -> &ExecutionModelParameters {
        &self.params
    }

    /// Replaces the parameter set
    pub fn set_parameters(&mut self, params: ExecutionModelParameters) {
        self.params = params;
    }

    /// Updates the arrival price used for the basis-point shortfall
    pub fn set_initial_price(&mut self, price: f64) {
        self.params.initial_price = price;
    }

    fn validate(&self, horizon: f64, periods: usize) -> Result<f64, ExecutionError> {
        if periods < 1 {
            return Err(ExecutionError::invalid("number of periods must be at least 1"));
        }
        if !horizon.is_finite() || horizon <= 0.0 {
            return Err(ExecutionError::invalid(format!(
                "time horizon must be positive and finite, got {horizon}"
            )));
        }
        let gamma = self.params.temporary_impact;
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(ExecutionError::invalid(format!(
                "temporary impact must be positive and finite, got {gamma}"
            )));
        }
        let kappa = (self.params.risk_aversion * self.params.volatility.powi(2) / gamma).sqrt();
        if !kappa.is_finite() {
            return Err(ExecutionError::invalid(format!(
                "risk aversion {} and volatility {} give no valid urgency",
                self.params.risk_aversion, self.params.volatility
            )));
        }
        Ok(kappa)
    }

    /// Holdings and boundary times for `N + 1` boundaries
    fn trajectory(
        quantity: f64,
        horizon: f64,
        periods: usize,
        kappa: f64,
    ) -> (Vec<f64>, Vec<f64>) {
        let n = periods as f64;
        let kappa_t = kappa * horizon;
        let denominator = (-2.0 * kappa_t).exp_m1();

        let mut times = Vec::with_capacity(periods + 1);
        let mut holdings = Vec::with_capacity(periods + 1);
        for i in 0..=periods {
            // remaining time is exact at both ends, so x_0 = Q and x_N = 0
            let remaining = horizon * ((periods - i) as f64 / n);
            let t = horizon - remaining;
            let ratio = if kappa_t < f64::EPSILON {
                remaining / horizon
            } else {
                (-kappa * t).exp() * (-2.0 * kappa * remaining).exp_m1() / denominator
            };
            times.push(t);
            holdings.push(quantity * ratio);
        }
        (times, holdings)
    }

    fn rates(holdings: &[f64], tau: f64) -> Vec<f64> {
        holdings.windows(2).map(|w| (w[1] - w[0]) / tau).collect()
    }

    /// Holdings and trading rates only, as `(x, v)`.
    ///
    /// # Errors
    /// [`ExecutionError::InvalidParameters`] for `periods < 1`, a non-positive
    /// horizon or a non-positive temporary impact.
    pub fn calculate_optimal_schedule(
        &self,
        quantity: f64,
        horizon: f64,
        periods: usize,
    ) -> Result<(Vec<f64>, Vec<f64>), ExecutionError> {
        let kappa = self.validate(horizon, periods)?;
        let tau = horizon / periods as f64;
        let (_, holdings) = Self::trajectory(quantity, horizon, periods, kappa);
        let rates = Self::rates(&holdings, tau);
        Ok((holdings, rates))
    }

    /// Full optimal schedule with its expected cost.
    ///
    /// # Errors
    /// [`ExecutionError::InvalidParameters`] for `periods < 1`, a non-positive
    /// horizon or a non-positive temporary impact.
    pub fn optimal_schedule(
        &self,
        quantity: f64,
        horizon: f64,
        periods: usize,
    ) -> Result<ExecutionSchedule, ExecutionError> {
        let kappa = self.validate(horizon, periods)?;
        let p = &self.params;
        let tau = horizon / periods as f64;

        let (times, holdings) = Self::trajectory(quantity, horizon, periods, kappa);
        let trading_rates = Self::rates(&holdings, tau);

        let temporary_impact =
            p.temporary_impact * trading_rates.iter().map(|v| v * v).sum::<f64>() * tau;
        let permanent_impact =
            (p.permanent_impact - p.temporary_impact / 2.0) * quantity * quantity;
        let volatility_risk = p.risk_aversion
            * p.volatility.powi(2)
            * holdings.iter().skip(1).map(|x| x * x).sum::<f64>()
            * tau;
        let total = temporary_impact + permanent_impact + volatility_risk;

        let notional = quantity * p.initial_price;
        let expected_shortfall_bps = if notional == 0.0 || !notional.is_finite() {
            0.0
        } else {
            total / notional * 10_000.0
        };

        trace!(
            "almgren-chriss: q {quantity}, T {horizon}, N {periods}, kappa {kappa}, total {total}"
        );

        Ok(ExecutionSchedule {
            times,
            holdings,
            trading_rates,
            tau,
            kappa,
            cost: CostBreakdown {
                temporary_impact,
                permanent_impact,
                volatility_risk,
                total,
            },
            expected_shortfall_bps,
        })
    }
}
