//! Standard-state properties of a single substance.
//!
//! Two models are provided: NASA 7-coefficient polynomials in two temperature ranges and a
//! model with fixed enthalpy and entropy (handy for hand-made mechanisms and for tests where
//! ΔG° must be known exactly). All properties are dimensionless (divided by R or RT).
#![allow(non_snake_case)]
use crate::Thermodynamics::thermo_state::R;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum EnergyUnit {
    J,
    Cal,
}

impl EnergyUnit {
    /// multiplier converting a value in this unit to J
    pub fn to_joules(&self) -> f64 {
        match self {
            EnergyUnit::J => 1.0,
            EnergyUnit::Cal => 4.184,
        }
    }
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EnergyUnit::J => write!(f, "J"),
            EnergyUnit::Cal => write!(f, "cal"),
        }
    }
}

#[enum_dispatch]
pub trait SpeciesThermo {
    /// Cp/R
    fn cp_R(&self, t: f64) -> f64;
    /// H/(RT)
    fn h_RT(&self, t: f64) -> f64;
    /// S/R
    fn s_R(&self, t: f64) -> f64;
    /// G/(RT)
    fn g_RT(&self, t: f64) -> f64 {
        self.h_RT(t) - self.s_R(t)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[enum_dispatch(SpeciesThermo)]
pub enum SpeciesThermoEnum {
    NASA7(NASA7),
    FixedGibbs(FixedGibbs),
}

/// NASA polynomials: two sets of seven coefficients, the low one is used below t_mid
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NASA7 {
    pub t_mid: f64,
    pub low: [f64; 7],
    pub high: [f64; 7],
}

impl NASA7 {
    pub fn new(t_mid: f64, low: [f64; 7], high: [f64; 7]) -> Self {
        Self { t_mid, low, high }
    }
    fn coeffs(&self, t: f64) -> &[f64; 7] {
        if t < self.t_mid { &self.low } else { &self.high }
    }
}

impl SpeciesThermo for NASA7 {
    fn cp_R(&self, t: f64) -> f64 {
        let [a, b, c, d, e, _, _] = *self.coeffs(t);
        a + b * t + c * t.powi(2) + d * t.powi(3) + e * t.powi(4)
    }
    fn h_RT(&self, t: f64) -> f64 {
        let [a, b, c, d, e, f, _] = *self.coeffs(t);
        a + b * t / 2.0 + c * t.powi(2) / 3.0 + d * t.powi(3) / 4.0 + e * t.powi(4) / 5.0 + f / t
    }
    fn s_R(&self, t: f64) -> f64 {
        let [a, b, c, d, e, _, g] = *self.coeffs(t);
        a * t.ln() + b * t + c * t.powi(2) / 2.0 + d * t.powi(3) / 3.0 + e * t.powi(4) / 4.0 + g
    }
}

/// temperature independent molar enthalpy (J/mol) and entropy (J/(mol·K)), Cp = 0
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedGibbs {
    pub h: f64,
    pub s: f64,
}

impl FixedGibbs {
    pub fn new(h: f64, s: f64) -> Self {
        Self { h, s }
    }
    pub fn with_units(h: f64, s: f64, unit: EnergyUnit) -> Self {
        Self {
            h: h * unit.to_joules(),
            s: s * unit.to_joules(),
        }
    }
}

impl SpeciesThermo for FixedGibbs {
    fn cp_R(&self, _t: f64) -> f64 {
        0.0
    }
    fn h_RT(&self, t: f64) -> f64 {
        self.h / (R * t)
    }
    fn s_R(&self, _t: f64) -> f64 {
        self.s / R
    }
}
