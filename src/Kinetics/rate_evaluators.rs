//! # Rate-constant evaluators
//!
//! Two kinds of evaluators fill the vector of forward rate constants:
//! - [`MultiRate`]: the modern batched evaluator, one per rate-expression family. It is queried
//!   on every update cycle and decides itself whether its inputs changed since the last call.
//!   The four families are collected in the [`BulkRateEvaluator`] enum.
//! - [`LegacyRates`]: single-expression managers of the legacy path, updated by the engine only
//!   when temperature (or pressure for P-log and Chebyshev reactions) changed.
#![allow(non_snake_case)]
use crate::Kinetics::rate_expressions::{
    ArrheniusRate, ChebyshevRate, FalloffRate, PlogRate, RateState, ReactionRate,
};
use enum_dispatch::enum_dispatch;
use log::debug;

/////////////////////////MODERN EVALUATORS/////////////////////////////////////////////////////////
#[derive(Clone, Debug)]
pub struct MultiRate<R: ReactionRate> {
    /// (global reaction index, expression)
    rates: Vec<(usize, R)>,
    /// rate constants of the installed reactions, by slot
    kf: Vec<f64>,
    last_state: Option<RateState>,
    /// third-body concentrations seen at the last update, by slot
    last_concm: Vec<f64>,
}

impl<R: ReactionRate> Default for MultiRate<R> {
    fn default() -> Self {
        Self {
            rates: Vec::new(),
            kf: Vec::new(),
            last_state: None,
            last_concm: Vec::new(),
        }
    }
}

impl<R: ReactionRate> MultiRate<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// append a reaction, returns its slot
    pub fn install(&mut self, reaction: usize, rate: R) -> usize {
        self.rates.push((reaction, rate));
        self.kf.push(0.0);
        self.last_concm.push(f64::NAN);
        self.last_state = None;
        self.rates.len() - 1
    }

    pub fn replace(&mut self, slot: usize, rate: R) {
        self.rates[slot].1 = rate;
        self.last_state = None;
    }

    pub fn rate(&self, slot: usize) -> &R {
        &self.rates[slot].1
    }

    fn inputs_changed(&self, state: &RateState, concm: &[f64]) -> bool {
        let Some(last) = self.last_state else {
            return true;
        };
        if last.T != state.T {
            return true;
        }
        for ((reaction, rate), old) in self.rates.iter().zip(self.last_concm.iter()) {
            if rate.uses_pressure() && last.P != state.P {
                return true;
            }
            if rate.uses_third_body() && concm[*reaction] != *old {
                return true;
            }
        }
        false
    }
}

#[enum_dispatch]
pub trait BulkRate {
    fn n_reactions(&self) -> usize;
    /// reevaluate the rate constants if an input they depend on changed; returns true if so
    fn update(&mut self, state: &RateState, concm: &[f64]) -> bool;
    /// scatter rate constants into the per-reaction vector `kf`
    fn get_rate_constants(&self, kf: &mut [f64]);
    /// rop[i] *= ∂ln k_i/∂T
    fn process_rate_constants_ddT(&self, rop: &mut [f64], state: &RateState, concm: &[f64], rtol: f64);
    /// rop[i] *= ∂ln k_i/∂ln M, entries of reactions without third-body dependence are set to 0
    fn process_rate_constants_ddM(&self, rop: &mut [f64], state: &RateState, concm: &[f64], rtol: f64);
    /// force reevaluation on the next update
    fn invalidate(&mut self);
}

impl<R: ReactionRate> BulkRate for MultiRate<R> {
    fn n_reactions(&self) -> usize {
        self.rates.len()
    }

    fn update(&mut self, state: &RateState, concm: &[f64]) -> bool {
        if !self.inputs_changed(state, concm) {
            return false;
        }
        for (slot, (reaction, rate)) in self.rates.iter().enumerate() {
            let m = concm[*reaction];
            self.kf[slot] = rate.eval(state, m);
            self.last_concm[slot] = m;
        }
        self.last_state = Some(*state);
        true
    }

    fn get_rate_constants(&self, kf: &mut [f64]) {
        for ((reaction, _), k) in self.rates.iter().zip(self.kf.iter()) {
            kf[*reaction] = *k;
        }
    }

    fn process_rate_constants_ddT(&self, rop: &mut [f64], state: &RateState, concm: &[f64], rtol: f64) {
        for (reaction, rate) in &self.rates {
            rop[*reaction] *= rate.ddT_scaled(state, concm[*reaction], rtol);
        }
    }

    fn process_rate_constants_ddM(&self, rop: &mut [f64], state: &RateState, concm: &[f64], rtol: f64) {
        for (reaction, rate) in &self.rates {
            if rate.uses_third_body() {
                rop[*reaction] *= rate.ddM_scaled(state, concm[*reaction], rtol);
            } else {
                rop[*reaction] = 0.0;
            }
        }
    }

    fn invalidate(&mut self) {
        self.last_state = None;
    }
}

pub type ArrheniusEvaluator = MultiRate<ArrheniusRate>;
pub type FalloffEvaluator = MultiRate<FalloffRate>;
pub type PlogEvaluator = MultiRate<PlogRate>;
pub type ChebyshevEvaluator = MultiRate<ChebyshevRate>;

#[derive(Clone, Debug)]
#[enum_dispatch(BulkRate)]
pub enum BulkRateEvaluator {
    Arrhenius(ArrheniusEvaluator),
    Falloff(FalloffEvaluator),
    Plog(PlogEvaluator),
    Chebyshev(ChebyshevEvaluator),
}

/// a rate expression of the modern path
#[derive(Clone, Debug, PartialEq)]
pub enum ModernRate {
    Arrhenius(ArrheniusRate),
    Falloff(FalloffRate),
    Plog(PlogRate),
    Chebyshev(ChebyshevRate),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulkKind {
    Arrhenius,
    Falloff,
    Plog,
    Chebyshev,
}

impl ModernRate {
    pub fn kind(&self) -> BulkKind {
        match self {
            ModernRate::Arrhenius(_) => BulkKind::Arrhenius,
            ModernRate::Falloff(_) => BulkKind::Falloff,
            ModernRate::Plog(_) => BulkKind::Plog,
            ModernRate::Chebyshev(_) => BulkKind::Chebyshev,
        }
    }
    pub fn uses_third_body(&self) -> bool {
        matches!(self, ModernRate::Falloff(_))
    }
}

impl BulkRateEvaluator {
    /// empty evaluator for rates of the given family
    pub fn for_kind(kind: BulkKind) -> Self {
        match kind {
            BulkKind::Arrhenius => ArrheniusEvaluator::new().into(),
            BulkKind::Falloff => FalloffEvaluator::new().into(),
            BulkKind::Plog => PlogEvaluator::new().into(),
            BulkKind::Chebyshev => ChebyshevEvaluator::new().into(),
        }
    }

    pub fn kind(&self) -> BulkKind {
        match self {
            BulkRateEvaluator::Arrhenius(_) => BulkKind::Arrhenius,
            BulkRateEvaluator::Falloff(_) => BulkKind::Falloff,
            BulkRateEvaluator::Plog(_) => BulkKind::Plog,
            BulkRateEvaluator::Chebyshev(_) => BulkKind::Chebyshev,
        }
    }

    /// install `rate` for `reaction`; None if the rate belongs to another family
    pub fn install(&mut self, reaction: usize, rate: ModernRate) -> Option<usize> {
        match (self, rate) {
            (BulkRateEvaluator::Arrhenius(m), ModernRate::Arrhenius(r)) => Some(m.install(reaction, r)),
            (BulkRateEvaluator::Falloff(m), ModernRate::Falloff(r)) => Some(m.install(reaction, r)),
            (BulkRateEvaluator::Plog(m), ModernRate::Plog(r)) => Some(m.install(reaction, r)),
            (BulkRateEvaluator::Chebyshev(m), ModernRate::Chebyshev(r)) => Some(m.install(reaction, r)),
            _ => None,
        }
    }

    /// replace the rate in `slot`; false if the rate belongs to another family
    pub fn replace(&mut self, slot: usize, rate: ModernRate) -> bool {
        match (self, rate) {
            (BulkRateEvaluator::Arrhenius(m), ModernRate::Arrhenius(r)) => m.replace(slot, r),
            (BulkRateEvaluator::Falloff(m), ModernRate::Falloff(r)) => m.replace(slot, r),
            (BulkRateEvaluator::Plog(m), ModernRate::Plog(r)) => m.replace(slot, r),
            (BulkRateEvaluator::Chebyshev(m), ModernRate::Chebyshev(r)) => m.replace(slot, r),
            _ => return false,
        }
        true
    }
}

/////////////////////////LEGACY EVALUATORS/////////////////////////////////////////////////////////
/// Legacy single-expression manager. `target` is the position written by `update`: the global
/// reaction index, or the falloff slot for the low and high limits of legacy falloff reactions.
#[derive(Clone, Debug)]
pub struct LegacyRates<R: ReactionRate> {
    rates: Vec<(usize, R)>,
    state: RateState,
}

impl<R: ReactionRate> Default for LegacyRates<R> {
    fn default() -> Self {
        Self {
            rates: Vec::new(),
            state: RateState::new(1.0, 1.0),
        }
    }
}

impl<R: ReactionRate> LegacyRates<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_reactions(&self) -> usize {
        self.rates.len()
    }

    pub fn install(&mut self, target: usize, rate: R) {
        self.rates.push((target, rate));
    }

    /// replace the expression writing to `target`; false if there is none
    pub fn replace(&mut self, target: usize, rate: R) -> bool {
        match self.rates.iter_mut().find(|(t, _)| *t == target) {
            Some(entry) => {
                entry.1 = rate;
                true
            }
            None => false,
        }
    }

    /// out[target] = k(T) for every installed expression
    pub fn update(&mut self, T: f64, log_T: f64, out: &mut [f64]) {
        self.state.T = T;
        self.state.log_T = log_T;
        self.state.recip_T = 1.0 / T;
        for (target, rate) in &self.rates {
            out[*target] = rate.eval(&self.state, 0.0);
        }
    }

    /// store the pressure used by pressure dependent expressions
    pub fn update_c(&mut self, log_P: f64) {
        if log_P != self.state.log_P {
            debug!("legacy evaluator: pressure changed to {} Pa", log_P.exp());
        }
        self.state.set_P(log_P.exp());
    }
}
