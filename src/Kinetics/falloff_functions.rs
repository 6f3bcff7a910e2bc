//! # Falloff blending functions
//!
//! A blending function F(T, Pr) corrects the Lindemann expression for reactions whose rate
//! constant moves between the low and the high pressure limit. The temperature dependent part
//! is evaluated once per temperature into a small work array (`update_temp`), the pressure
//! dependent part on every call (`F`).
//!
//! | function  | parameters            | work size |
//! |-----------|-----------------------|-----------|
//! | Lindemann | -                     | 0         |
//! | Troe      | A, T3, T1, [T2]       | 1         |
//! | SRI       | a, b, c, [d, e]       | 2         |
#![allow(non_snake_case)]
use crate::Kinetics::kinetics_error::KineticsError;
use crate::Thermodynamics::thermo_state::SMALL_NUMBER;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

/// largest work size of any blending function
pub const MAX_WORK_SIZE: usize = 2;

#[enum_dispatch]
pub trait FalloffCalculator {
    /// evaluate temperature dependent terms into `work`
    fn update_temp(&self, T: f64, work: &mut [f64]);
    /// blending factor at reduced pressure `pr`
    fn F(&self, pr: f64, work: &[f64]) -> f64;
    fn work_size(&self) -> usize;
    fn validate(&self) -> Result<(), KineticsError> {
        Ok(())
    }
    fn type_name(&self) -> &'static str;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[enum_dispatch(FalloffCalculator)]
pub enum FalloffFunction {
    Lindemann(Lindemann),
    Troe(Troe),
    SRI(SRI),
}

impl Default for FalloffFunction {
    fn default() -> Self {
        FalloffFunction::Lindemann(Lindemann {})
    }
}

impl FalloffFunction {
    /// blending factor computed from scratch, without a shared work buffer
    pub fn F_at(&self, T: f64, pr: f64) -> f64 {
        let mut work = [0.0; MAX_WORK_SIZE];
        self.update_temp(T, &mut work);
        self.F(pr, &work)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Lindemann {}

impl FalloffCalculator for Lindemann {
    fn update_temp(&self, _T: f64, _work: &mut [f64]) {}
    fn F(&self, _pr: f64, _work: &[f64]) -> f64 {
        1.0
    }
    fn work_size(&self) -> usize {
        0
    }
    fn type_name(&self) -> &'static str {
        "Lindemann"
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Troe {
    pub A: f64,
    pub T3: f64,
    pub T1: f64,
    #[serde(default)]
    pub T2: Option<f64>,
}

impl Troe {
    pub fn new(A: f64, T3: f64, T1: f64, T2: Option<f64>) -> Self {
        Self { A, T3, T1, T2 }
    }
    fn F_cent(&self, T: f64) -> f64 {
        let mut F_c = 0.0;
        if self.T3.abs() > SMALL_NUMBER {
            F_c += (1.0 - self.A) * f64::exp(-T / self.T3);
        }
        if self.T1.abs() > SMALL_NUMBER {
            F_c += self.A * f64::exp(-T / self.T1);
        }
        if let Some(T2) = self.T2 {
            F_c += f64::exp(-T2 / T);
        }
        F_c
    }
}

impl FalloffCalculator for Troe {
    fn update_temp(&self, T: f64, work: &mut [f64]) {
        work[0] = f64::log10(self.F_cent(T).max(SMALL_NUMBER));
    }
    fn F(&self, pr: f64, work: &[f64]) -> f64 {
        let log_F_c = work[0];
        let log_pr = f64::log10(pr.max(SMALL_NUMBER));
        let C = -0.4 - 0.67 * log_F_c;
        let N = 0.75 - 1.27 * log_F_c;
        let f_1 = (log_pr + C) / (N - 0.14 * (log_pr + C));
        10.0_f64.powf(log_F_c / (1.0 + f_1 * f_1))
    }
    fn work_size(&self) -> usize {
        1
    }
    fn validate(&self) -> Result<(), KineticsError> {
        if !(self.A.is_finite() && self.T3.is_finite() && self.T1.is_finite()) {
            return Err(KineticsError::InvalidRate {
                reason: format!("Troe parameters must be finite: {:?}", self),
            });
        }
        Ok(())
    }
    fn type_name(&self) -> &'static str {
        "Troe"
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SRI {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    #[serde(default = "default_d")]
    pub d: f64,
    #[serde(default)]
    pub e: f64,
}

fn default_d() -> f64 {
    1.0
}

impl SRI {
    pub fn new(a: f64, b: f64, c: f64, d: Option<f64>, e: Option<f64>) -> Self {
        Self {
            a,
            b,
            c,
            d: d.unwrap_or(1.0),
            e: e.unwrap_or(0.0),
        }
    }
}

impl FalloffCalculator for SRI {
    fn update_temp(&self, T: f64, work: &mut [f64]) {
        let mut w = self.a * f64::exp(-self.b / T);
        if self.c != 0.0 {
            w += f64::exp(-T / self.c);
        }
        work[0] = w;
        work[1] = self.d * T.powf(self.e);
    }
    fn F(&self, pr: f64, work: &[f64]) -> f64 {
        let log_pr = f64::log10(pr.max(SMALL_NUMBER));
        let X = 1.0 / (1.0 + log_pr * log_pr);
        work[0].powf(X) * work[1]
    }
    fn work_size(&self) -> usize {
        2
    }
    fn validate(&self) -> Result<(), KineticsError> {
        if self.c < 0.0 {
            return Err(KineticsError::InvalidRate {
                reason: format!("SRI parameter c must not be negative, got {}", self.c),
            });
        }
        if self.d < 0.0 {
            return Err(KineticsError::InvalidRate {
                reason: format!("SRI parameter d must not be negative, got {}", self.d),
            });
        }
        Ok(())
    }
    fn type_name(&self) -> &'static str {
        "SRI"
    }
}

/// which limit serves as the base of the blended rate constant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FalloffKind {
    /// k = k_inf · F · Pr/(1+Pr)
    Falloff,
    /// k = k_0 · F/(1+Pr)
    ChemicallyActivated,
}

#[derive(Clone, Debug)]
struct FalloffEntry {
    kind: FalloffKind,
    function: FalloffFunction,
    offset: usize,
}

/// Blending functions of the legacy falloff reactions, one per falloff slot.
/// The work buffer is sized by the sum of `work_size()` of the installed functions.
#[derive(Clone, Debug, Default)]
pub struct FalloffMgr {
    entries: Vec<FalloffEntry>,
    work: Vec<f64>,
}

impl FalloffMgr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn work_size(&self) -> usize {
        self.work.len()
    }

    /// slots are appended, `slot` must be equal to the number of installed functions
    pub fn install(&mut self, slot: usize, kind: FalloffKind, function: FalloffFunction) {
        debug_assert_eq!(slot, self.entries.len());
        let offset = self.work.len();
        self.work.resize(offset + function.work_size(), 0.0);
        self.entries.push(FalloffEntry {
            kind,
            function,
            offset,
        });
    }

    pub fn replace(&mut self, slot: usize, function: FalloffFunction) {
        self.entries[slot].function = function;
        // work sizes may differ between function families
        let mut offset = 0;
        for entry in self.entries.iter_mut() {
            entry.offset = offset;
            offset += entry.function.work_size();
        }
        self.work.resize(offset, 0.0);
    }

    pub fn kind(&self, slot: usize) -> FalloffKind {
        self.entries[slot].kind
    }

    pub fn update_temp(&mut self, T: f64) {
        for entry in &self.entries {
            let n = entry.function.work_size();
            entry
                .function
                .update_temp(T, &mut self.work[entry.offset..entry.offset + n]);
        }
    }

    /// replace reduced pressures by Pr/(1+Pr)·F (falloff) or F/(1+Pr) (chemically activated)
    pub fn pr_to_falloff(&self, pr: &mut [f64]) {
        for (p, entry) in pr.iter_mut().zip(self.entries.iter()) {
            let n = entry.function.work_size();
            let F = entry
                .function
                .F(*p, &self.work[entry.offset..entry.offset + n]);
            *p = match entry.kind {
                FalloffKind::Falloff => *p / (1.0 + *p) * F,
                FalloffKind::ChemicallyActivated => F / (1.0 + *p),
            };
        }
    }
}
