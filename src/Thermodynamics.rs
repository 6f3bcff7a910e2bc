/// The `ThermoState` trait: everything the kinetics engine needs to know about the mixture
/// (temperature, pressure, concentrations, standard chemical potentials), plus physical constants.
pub mod thermo_state;
/// Standard-state models of single substances: NASA 7-coefficient polynomials and
/// temperature independent enthalpy and entropy.
/// # Examples
/// ```
/// use GasKin::Thermodynamics::species_thermo::{EnergyUnit, FixedGibbs, SpeciesThermo};
/// use GasKin::Thermodynamics::thermo_state::R;
/// let sp = FixedGibbs::with_units(-1000.0, 10.0, EnergyUnit::Cal);
/// let T = 500.0;
/// assert!((sp.g_RT(T) - (-4184.0 - T * 41.84) / (R * T)).abs() < 1e-12);
/// ```
pub mod species_thermo;
/// ideal gas mixture implementing `ThermoState`
pub mod ideal_gas;
mod thermo_tests;
