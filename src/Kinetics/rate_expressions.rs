//! # Rate expressions
//!
//! Forward rate constants of single reactions as functions of the state snapshot [`RateState`]
//! and, for pressure dependent reactions, of the reaction's third-body concentration `M`.
//!
//! - [`ArrheniusRate`]: k = A·T^b·exp(-Ea/RT)
//! - [`FalloffRate`]: blends a low pressure and a high pressure Arrhenius expression
//! - [`PlogRate`]: ln k interpolated linearly in ln P between tabulated Arrhenius expressions
//! - [`ChebyshevRate`]: log10 k as a double Chebyshev series in reduced 1/T and log10 P
//!
//! Besides the value each expression provides scaled derivatives ∂ln k/∂T and ∂ln k/∂ln M
//! used by the Jacobian subsystem. The default implementation is a forward finite difference.
#![allow(non_snake_case)]
use crate::Kinetics::falloff_functions::{FalloffCalculator, FalloffFunction, FalloffKind};
use crate::Kinetics::kinetics_error::KineticsError;
use crate::Thermodynamics::species_thermo::EnergyUnit;
use crate::Thermodynamics::thermo_state::{R, SMALL_NUMBER};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// snapshot of the state variables a rate expression may depend on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateState {
    pub T: f64,
    pub log_T: f64,
    pub recip_T: f64,
    pub P: f64,
    pub log_P: f64,
    pub log10_P: f64,
}

impl RateState {
    pub fn new(T: f64, P: f64) -> Self {
        let mut state = Self {
            T,
            log_T: 0.0,
            recip_T: 0.0,
            P,
            log_P: 0.0,
            log10_P: 0.0,
        };
        state.set_T(T);
        state.set_P(P);
        state
    }
    pub fn set_T(&mut self, T: f64) {
        self.T = T;
        self.log_T = T.ln();
        self.recip_T = 1.0 / T;
    }
    pub fn set_P(&mut self, P: f64) {
        self.P = P;
        self.log_P = P.ln();
        self.log10_P = P.log10();
    }
    /// the same state at temperature T·(1 + rtol)
    pub fn perturbed_T(&self, rtol: f64) -> Self {
        let mut state = *self;
        state.set_T(self.T * (1.0 + rtol));
        state
    }
}

pub trait ReactionRate {
    /// forward rate constant at the given state and third-body concentration
    fn eval(&self, state: &RateState, concm: f64) -> f64;
    fn uses_pressure(&self) -> bool {
        false
    }
    fn uses_third_body(&self) -> bool {
        false
    }
    /// ∂ln k/∂T at constant pressure and third-body concentration
    fn ddT_scaled(&self, state: &RateState, concm: f64, rtol: f64) -> f64 {
        let k0 = self.eval(state, concm);
        if k0 == 0.0 {
            // a vanishing rate constant has a vanishing contribution
            return 0.0;
        }
        let k1 = self.eval(&state.perturbed_T(rtol), concm);
        (k1 / k0 - 1.0) / (rtol * state.T)
    }
    /// ∂ln k/∂ln M; zero for expressions independent of the third-body concentration
    fn ddM_scaled(&self, state: &RateState, concm: f64, rtol: f64) -> f64 {
        if !self.uses_third_body() {
            return 0.0;
        }
        let k0 = self.eval(state, concm);
        if k0 == 0.0 {
            return 0.0;
        }
        let k1 = self.eval(state, concm * (1.0 + rtol));
        (k1 / k0 - 1.0) / rtol
    }
    fn validate(&self) -> Result<(), KineticsError> {
        Ok(())
    }
}

/////////////////////////ARRHENIUS KINETICS////////////////////////////////////////////////////////
/// k = A·T^b·exp(-Ea/RT), activation energy in J/mol
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrheniusRate {
    pub A: f64,
    pub b: f64,
    pub Ea: f64,
}

impl ArrheniusRate {
    pub fn new(A: f64, b: f64, Ea: f64) -> Self {
        Self { A, b, Ea }
    }
    /// activation energy given per mole in `unit`
    pub fn with_units(A: f64, b: f64, Ea: f64, unit: EnergyUnit) -> Self {
        Self {
            A,
            b,
            Ea: Ea * unit.to_joules(),
        }
    }
    /// rate constant from temperature only
    pub fn K_const(&self, T: f64) -> f64 {
        self.A * T.powf(self.b) * f64::exp(-self.Ea / (R * T))
    }
    fn eval_log(&self, log_T: f64, recip_T: f64) -> f64 {
        if self.A <= 0.0 {
            // ln of a non-positive pre-exponential factor is undefined
            return self.A * f64::exp(self.b * log_T - self.Ea / R * recip_T);
        }
        f64::exp(self.A.ln() + self.b * log_T - self.Ea / R * recip_T)
    }
}

impl ReactionRate for ArrheniusRate {
    fn eval(&self, state: &RateState, _concm: f64) -> f64 {
        self.eval_log(state.log_T, state.recip_T)
    }
    fn ddT_scaled(&self, state: &RateState, _concm: f64, _rtol: f64) -> f64 {
        (self.b + self.Ea / (R * state.T)) * state.recip_T
    }
    fn validate(&self) -> Result<(), KineticsError> {
        if !(self.A.is_finite() && self.b.is_finite() && self.Ea.is_finite()) {
            return Err(KineticsError::InvalidRate {
                reason: format!("Arrhenius parameters must be finite: {:?}", self),
            });
        }
        Ok(())
    }
}

/////////////////////////FALLOFF KINETICS//////////////////////////////////////////////////////////
/// pressure dependent rate constant blended between the low and the high pressure limit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FalloffRate {
    pub low: ArrheniusRate,
    pub high: ArrheniusRate,
    #[serde(default)]
    pub function: FalloffFunction,
    pub kind: FalloffKind,
}

impl FalloffRate {
    pub fn new(
        low: ArrheniusRate,
        high: ArrheniusRate,
        function: FalloffFunction,
        kind: FalloffKind,
    ) -> Self {
        Self {
            low,
            high,
            function,
            kind,
        }
    }
}

impl ReactionRate for FalloffRate {
    fn eval(&self, state: &RateState, concm: f64) -> f64 {
        let k0 = self.low.eval(state, concm);
        let k_inf = self.high.eval(state, concm);
        let pr = concm * k0 / (k_inf + SMALL_NUMBER);
        let F = self.function.F_at(state.T, pr);
        match self.kind {
            FalloffKind::Falloff => k_inf * pr / (1.0 + pr) * F,
            FalloffKind::ChemicallyActivated => k0 * F / (1.0 + pr),
        }
    }
    fn uses_third_body(&self) -> bool {
        true
    }
    fn validate(&self) -> Result<(), KineticsError> {
        self.low.validate()?;
        self.high.validate()?;
        self.function.validate()
    }
}

/////////////////////////PRESSURE DEPENDENT KINETICS///////////////////////////////////////////////
/// tabulated Arrhenius expressions at a set of pressures (P-log)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlogRate {
    /// ln of distinct pressures in increasing order
    log_pressures: Vec<f64>,
    /// expressions at each pressure, their rate constants are summed
    rates: Vec<Vec<ArrheniusRate>>,
}

impl PlogRate {
    /// build from (pressure in Pa, expression) pairs in any order
    pub fn new(mut data: Vec<(f64, ArrheniusRate)>) -> Result<Self, KineticsError> {
        if data.is_empty() {
            return Err(KineticsError::InvalidRate {
                reason: "P-log table is empty".to_string(),
            });
        }
        if let Some((p, _)) = data.iter().find(|(p, _)| !(*p > 0.0 && p.is_finite())) {
            return Err(KineticsError::InvalidRate {
                reason: format!("P-log pressure must be positive, got {}", p),
            });
        }
        data.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut log_pressures: Vec<f64> = Vec::new();
        let mut rates: Vec<Vec<ArrheniusRate>> = Vec::new();
        let mut last_p = f64::NAN;
        for (p, rate) in data {
            rate.validate()?;
            if p == last_p {
                if let Some(group) = rates.last_mut() {
                    group.push(rate);
                }
            } else {
                log_pressures.push(p.ln());
                rates.push(vec![rate]);
                last_p = p;
            }
        }
        let plog = Self {
            log_pressures,
            rates,
        };
        plog.validate()?;
        Ok(plog)
    }

    pub fn pressures(&self) -> Vec<f64> {
        self.log_pressures.iter().map(|lp| lp.exp()).collect()
    }

    fn eval_group(&self, i: usize, state: &RateState) -> f64 {
        self.rates[i]
            .iter()
            .map(|r| r.eval_log(state.log_T, state.recip_T))
            .sum()
    }
}

impl ReactionRate for PlogRate {
    fn eval(&self, state: &RateState, _concm: f64) -> f64 {
        let n = self.log_pressures.len();
        let location = self
            .log_pressures
            .binary_search_by(|v| v.total_cmp(&state.log_P));
        match location {
            // exact pressure found
            Ok(i) => self.eval_group(i, state),
            // interpolate between two pressures
            Err(i) if i > 0 && i < n => {
                let (lp1, lp2) = (self.log_pressures[i - 1], self.log_pressures[i]);
                let lk1 = self.eval_group(i - 1, state).ln();
                let lk2 = self.eval_group(i, state).ln();
                f64::exp(lk1 + (lk2 - lk1) * (state.log_P - lp1) / (lp2 - lp1))
            }
            // out of range, use the closest available pressure
            Err(0) => self.eval_group(0, state),
            Err(_) => self.eval_group(n - 1, state),
        }
    }
    fn uses_pressure(&self) -> bool {
        true
    }
    fn validate(&self) -> Result<(), KineticsError> {
        // interpolation in ln k requires positive sums at every pressure
        for T in [200.0, 500.0, 1000.0, 2000.0, 5000.0] {
            let state = RateState::new(T, 1.0);
            for (i, lp) in self.log_pressures.iter().enumerate() {
                let k = self.eval_group(i, &state);
                if !(k > 0.0 && k.is_finite()) {
                    return Err(KineticsError::InvalidRate {
                        reason: format!(
                            "P-log rate constant at P = {} Pa, T = {} K is not positive: {}",
                            lp.exp(),
                            T,
                            k
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/////////////////////////CHEBYSHEV KINETICS////////////////////////////////////////////////////////
/// log10 k = Σ_ij a_ij·T_i(T̃)·T_j(P̃), rows of `coeffs` are temperature orders
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChebyshevRate {
    /// (Tmin, Tmax) in K
    pub temperature_range: (f64, f64),
    /// (Pmin, Pmax) in Pa
    pub pressure_range: (f64, f64),
    pub coeffs: DMatrix<f64>,
}

impl ChebyshevRate {
    pub fn new(
        temperature_range: (f64, f64),
        pressure_range: (f64, f64),
        coeffs: DMatrix<f64>,
    ) -> Result<Self, KineticsError> {
        let rate = Self {
            temperature_range,
            pressure_range,
            coeffs,
        };
        rate.validate()?;
        Ok(rate)
    }

    fn reduced_T(&self, recip_T: f64) -> f64 {
        let (Tmin, Tmax) = self.temperature_range;
        (2.0 * recip_T - 1.0 / Tmin - 1.0 / Tmax) / (1.0 / Tmax - 1.0 / Tmin)
    }

    fn reduced_P(&self, log10_P: f64) -> f64 {
        let (lo, hi) = (self.pressure_range.0.log10(), self.pressure_range.1.log10());
        (2.0 * log10_P - lo - hi) / (hi - lo)
    }
}

/// Chebyshev polynomials T_0(x)..T_{n-1}(x) by recurrence
fn chebyshev_series(x: f64, n: usize) -> Vec<f64> {
    let mut phi = vec![0.0; n];
    if n > 0 {
        phi[0] = 1.0;
    }
    if n > 1 {
        phi[1] = x;
    }
    for i in 2..n {
        phi[i] = 2.0 * x * phi[i - 1] - phi[i - 2];
    }
    phi
}

impl ReactionRate for ChebyshevRate {
    fn eval(&self, state: &RateState, _concm: f64) -> f64 {
        let phi_T = chebyshev_series(self.reduced_T(state.recip_T), self.coeffs.nrows());
        let phi_P = chebyshev_series(self.reduced_P(state.log10_P), self.coeffs.ncols());
        let mut log10_k = 0.0;
        for (i, t) in phi_T.iter().enumerate() {
            for (j, p) in phi_P.iter().enumerate() {
                log10_k += self.coeffs[(i, j)] * t * p;
            }
        }
        10.0_f64.powf(log10_k)
    }
    fn uses_pressure(&self) -> bool {
        true
    }
    fn validate(&self) -> Result<(), KineticsError> {
        let (Tmin, Tmax) = self.temperature_range;
        let (Pmin, Pmax) = self.pressure_range;
        if !(Tmin > 0.0 && Tmax > Tmin) {
            return Err(KineticsError::InvalidRate {
                reason: format!("Chebyshev temperature range ({}, {}) is invalid", Tmin, Tmax),
            });
        }
        if !(Pmin > 0.0 && Pmax > Pmin) {
            return Err(KineticsError::InvalidRate {
                reason: format!("Chebyshev pressure range ({}, {}) is invalid", Pmin, Pmax),
            });
        }
        if self.coeffs.is_empty() {
            return Err(KineticsError::InvalidRate {
                reason: "Chebyshev coefficient matrix is empty".to_string(),
            });
        }
        Ok(())
    }
}
