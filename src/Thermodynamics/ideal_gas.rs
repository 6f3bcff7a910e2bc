//! Ideal gas mixture: the reference implementation of [`ThermoState`].
//!
//! concentrations C_k = X_k·P/(RT), activity concentrations are equal to C_k, the standard
//! concentration is P/(RT) and the standard chemical potentials include the RT·ln(P/P_ref)
//! pressure term, so concentration based equilibrium constants do not depend on pressure.
#![allow(non_snake_case)]
use crate::Thermodynamics::species_thermo::{SpeciesThermo, SpeciesThermoEnum};
use crate::Thermodynamics::thermo_state::{ONE_ATM, R, ThermoState};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ThermoError {
    #[error("substance '{0}' is not present in the mixture")]
    UnknownSpecies(String),
    #[error("expected {expected} mole fractions, got {got}")]
    WrongLength { expected: usize, got: usize },
    #[error("mole fractions must be non-negative and sum to a positive number")]
    InvalidComposition,
    #[error("invalid state: T = {T} K, P = {P} Pa")]
    InvalidState { T: f64, P: f64 },
    #[error("substance '{0}' is defined twice")]
    DuplicateSpecies(String),
}

/// substance name and its standard-state model
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    pub thermo: SpeciesThermoEnum,
}

impl Species {
    pub fn new(name: &str, thermo: impl Into<SpeciesThermoEnum>) -> Self {
        Self {
            name: name.to_string(),
            thermo: thermo.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct IdealGasMixture {
    species: Vec<Species>,
    index: HashMap<String, usize>,
    T: f64,
    P: f64,
    X: Vec<f64>,
    /// reference pressure of the standard state
    pub P_ref: f64,
}

impl IdealGasMixture {
    /// mixture at 300 K and 1 atm consisting of the first substance only
    pub fn new(species: Vec<Species>) -> Result<Self, ThermoError> {
        let mut index = HashMap::new();
        for (k, s) in species.iter().enumerate() {
            if index.insert(s.name.clone(), k).is_some() {
                return Err(ThermoError::DuplicateSpecies(s.name.clone()));
            }
        }
        let mut X = vec![0.0; species.len()];
        if let Some(x0) = X.first_mut() {
            *x0 = 1.0;
        }
        Ok(Self {
            species,
            index,
            T: 300.0,
            P: ONE_ATM,
            X,
            P_ref: ONE_ATM,
        })
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn mole_fractions(&self) -> &[f64] {
        &self.X
    }

    /// set mole fractions, they are normalized to unit sum
    pub fn set_mole_fractions(&mut self, X: &[f64]) -> Result<(), ThermoError> {
        if X.len() != self.species.len() {
            return Err(ThermoError::WrongLength {
                expected: self.species.len(),
                got: X.len(),
            });
        }
        let sum: f64 = X.iter().sum();
        if X.iter().any(|x| *x < 0.0 || !x.is_finite()) || sum <= 0.0 {
            return Err(ThermoError::InvalidComposition);
        }
        self.X = X.iter().map(|x| x / sum).collect();
        Ok(())
    }

    /// set mole fractions from pairs (substance, amount); substances not mentioned get zero
    pub fn set_mole_fractions_by_name(&mut self, X: &[(&str, f64)]) -> Result<(), ThermoError> {
        let mut full = vec![0.0; self.species.len()];
        for (name, x) in X {
            let k = self
                .index
                .get(*name)
                .ok_or_else(|| ThermoError::UnknownSpecies(name.to_string()))?;
            full[*k] += x;
        }
        self.set_mole_fractions(&full)
    }

    pub fn set_state_TPX(&mut self, T: f64, P: f64, X: &[f64]) -> Result<(), ThermoError> {
        Self::check_TP(T, P)?;
        self.set_mole_fractions(X)?;
        self.T = T;
        self.P = P;
        debug!("ideal gas state set to T = {} K, P = {} Pa", T, P);
        Ok(())
    }

    /// set the state so that the molar concentrations are equal to `C` at temperature `T`
    pub fn set_state_TC(&mut self, T: f64, C: &[f64]) -> Result<(), ThermoError> {
        let ctot: f64 = C.iter().sum();
        let P = ctot * R * T;
        Self::check_TP(T, P)?;
        self.set_mole_fractions(C)?;
        self.T = T;
        self.P = P;
        Ok(())
    }

    fn check_TP(T: f64, P: f64) -> Result<(), ThermoError> {
        if !(T > 0.0 && T.is_finite() && P > 0.0 && P.is_finite()) {
            return Err(ThermoError::InvalidState { T, P });
        }
        Ok(())
    }
}

impl ThermoState for IdealGasMixture {
    fn n_species(&self) -> usize {
        self.species.len()
    }
    fn species_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
    fn species_name(&self, k: usize) -> Option<&str> {
        self.species.get(k).map(|s| s.name.as_str())
    }
    fn temperature(&self) -> f64 {
        self.T
    }
    fn pressure(&self) -> f64 {
        self.P
    }
    fn molar_density(&self) -> f64 {
        self.P / self.RT()
    }
    fn activity_concentrations(&self, out: &mut [f64]) {
        self.concentrations(out);
    }
    fn concentrations(&self, out: &mut [f64]) {
        let ctot = self.molar_density();
        for (c, x) in out.iter_mut().zip(self.X.iter()) {
            *c = x * ctot;
        }
    }
    fn standard_chem_potentials(&self, out: &mut [f64]) {
        let RT = self.RT();
        let pressure_term = RT * (self.P / self.P_ref).ln();
        for (mu, s) in out.iter_mut().zip(self.species.iter()) {
            *mu = RT * s.thermo.g_RT(self.T) + pressure_term;
        }
    }
    fn standard_concentration(&self) -> f64 {
        self.P / self.RT()
    }
    fn set_state_TP(&mut self, T: f64, P: f64) {
        self.T = T;
        self.P = P;
    }
    fn is_ideal_gas(&self) -> bool {
        true
    }
}
