//! # Thermodynamic state consumed by the kinetics engine
//!
//! The kinetics engine never owns a property model of its own: everything it needs about the
//! mixture (temperature, pressure, concentrations, standard chemical potentials) is asked from
//! an object implementing [`ThermoState`]. The engine also uses `set_state_TP` to perturb
//! temperature for finite-difference derivatives and always restores the original state.
#![allow(non_snake_case)]

/// universal gas constant, J/(mol·K)
pub const R: f64 = 8.314462618;
/// one standard atmosphere, Pa
pub const ONE_ATM: f64 = 101325.0;
/// tiny positive number protecting divisions and logarithms
pub const SMALL_NUMBER: f64 = 1.0e-300;
/// saturation value for quantities that may overflow
pub const BIG_NUMBER: f64 = 1.0e300;

pub trait ThermoState {
    fn n_species(&self) -> usize;
    /// position of the substance in the mixture or None if the mixture does not contain it
    fn species_index(&self, name: &str) -> Option<usize>;
    fn species_name(&self, k: usize) -> Option<&str>;
    /// temperature, K
    fn temperature(&self) -> f64;
    /// pressure, Pa
    fn pressure(&self) -> f64;
    fn RT(&self) -> f64 {
        R * self.temperature()
    }
    /// total molar density, mol/m³
    fn molar_density(&self) -> f64;
    /// generalized concentrations used in the law of mass action
    fn activity_concentrations(&self, out: &mut [f64]);
    /// molar concentrations, mol/m³
    fn concentrations(&self, out: &mut [f64]);
    /// standard-state chemical potentials at the current T and P, J/mol
    fn standard_chem_potentials(&self, out: &mut [f64]);
    /// concentration of the standard state, mol/m³
    fn standard_concentration(&self) -> f64;
    /// change temperature and pressure keeping composition
    fn set_state_TP(&mut self, T: f64, P: f64);
    /// molar density of an ideal gas is P/RT, so d ln(ctot)/dT = -1/T needs no perturbation
    fn is_ideal_gas(&self) -> bool {
        false
    }
}
