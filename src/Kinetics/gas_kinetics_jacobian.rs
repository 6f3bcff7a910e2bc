//! # Jacobians of rates of progress
//!
//! Temperature derivatives are dense vectors, concentration derivatives are sparse
//! n_reactions × n_species matrices.
//!
//! - ∂/∂T: analytic or finite-difference scaled derivatives of the rate expressions, a relative
//!   finite difference (step `rtol-delta-T`) for equilibrium constants and, at constant pressure,
//!   the change of concentrations with the molar density: `rop·(Σ orders + order of M +
//!   ∂ln k/∂ln M)·d ln C_tot/dT`.
//! - ∂/∂C: the stoichiometric concentration products plus, unless `skip-third-bodies` is set,
//!   the third-body concentrations of mass-action three-body reactions. The dependence of
//!   falloff rate constants on M is not included (`skip-falloff` must stay true).
//!
//! Net quantities are always assembled as forward minus reverse. All entry points refuse to work
//! when any reaction uses the legacy path. Scratch vectors are allocated per call; an engine
//! instance must not be used from two threads at once.
#![allow(non_snake_case)]
use crate::Kinetics::gas_kinetics::GasKinetics;
use crate::Kinetics::kinetics_error::{KineticsError, assert_finite};
use crate::Kinetics::rate_evaluators::BulkRate;
use crate::Thermodynamics::thermo_state::ThermoState;
use log::debug;
use nalgebra::DVector;
use sprs::{CsMat, TriMat};

impl<S: ThermoState> GasKinetics<S> {
    pub(crate) fn check_legacy_rates(&self, operation: &'static str) -> Result<(), KineticsError> {
        if self.uses_legacy() {
            return Err(KineticsError::UnsupportedLegacy { operation });
        }
        Ok(())
    }

    /// d ln C_tot/dT at constant pressure and composition
    fn dlnctot_dT(&mut self) -> f64 {
        let T = self.thermo.temperature();
        if self.thermo.is_ideal_gas() {
            return -1.0 / T;
        }
        let P = self.thermo.pressure();
        let rtol = self.jac.rtol_delta_T;
        self.thermo.set_state_TP(T * (1.0 + rtol), P);
        let ctot1 = self.thermo.molar_density();
        self.thermo.set_state_TP(T, P);
        let ctot0 = self.thermo.molar_density();
        (ctot1 - ctot0) / (T * rtol) / ctot0
    }

    /// rop[i] *= ∂ln k_i/∂T for every modern reaction
    fn process_rate_constants_ddT(&self, rop: &mut [f64]) {
        let state = self.rate_state();
        for rates in &self.bulk_rates {
            rates.process_rate_constants_ddT(rop, &state, &self.concm, self.jac.rtol_delta_T);
        }
    }

    /// rop[i] *= ∂ln k_i/∂ln M for every modern reaction
    fn process_rate_constants_ddM(&self, rop: &mut [f64]) {
        let state = self.rate_state();
        for rates in &self.bulk_rates {
            rates.process_rate_constants_ddM(rop, &state, &self.concm, self.jac.rtol_delta_T);
        }
    }

    /// drkcn[i] *= ∂ln(1/Kc_i)/∂T by a forward finite difference; temperature is restored
    fn process_equilibrium_constants_ddT(&mut self, drkcn: &mut [f64]) {
        let T = self.thermo.temperature();
        let P = self.thermo.pressure();
        let rtol = self.jac.rtol_delta_T;
        let dTinv = 1.0 / (rtol * T);
        self.thermo.set_state_TP(T * (1.0 + rtol), P);
        let kc1 = self.equilibrium_constants();
        self.thermo.set_state_TP(T, P);
        let kc0 = self.equilibrium_constants();
        for i in 0..drkcn.len() {
            if self.reversible[i] {
                drkcn[i] *= (kc0[i] - kc1[i]) * dTinv / kc0[i];
            } else {
                drkcn[i] = 0.0;
            }
        }
    }

    /// constant-pressure contribution: out[i] = rop[i]·(Σ orders + order of M + ∂ln k/∂ln M)·d ln C_tot/dT
    fn concentration_term_ddT(
        &mut self,
        rop: &[f64],
        products: bool,
    ) -> Vec<f64> {
        let n = self.n_reactions();
        let mut dropC = vec![0.0; n];
        if products {
            self.rev_product_stoich.scale(rop, &mut dropC);
        } else {
            self.reactant_stoich.scale(rop, &mut dropC);
        }
        // reaction rates that depend on third-body colliders
        let mut dropM = rop.to_vec();
        self.process_rate_constants_ddM(&mut dropM);
        // reactions involving third body in law of mass action
        self.multi_concm.scale_order(rop, &mut dropM);
        let dlnc = self.dlnctot_dT();
        for (c, m) in dropC.iter_mut().zip(dropM.iter()) {
            *c = (*c + m) * dlnc;
        }
        dropC
    }

    /// ∂k_f/∂T of the forward rate constants returned by `fwd_rate_constants`
    pub fn fwd_rate_constants_ddT(&mut self) -> Result<DVector<f64>, KineticsError> {
        self.check_legacy_rates("fwd_rate_constants_ddT")?;
        self.update_rates_of_progress()?;
        let kf: Vec<f64> = self
            .rfn
            .iter()
            .zip(self.perturb.iter())
            .map(|(k, f)| k * f)
            .collect();
        let mut dkf = kf.clone();
        self.process_rate_constants_ddT(&mut dkf);
        if self.jac.constant_pressure {
            let mut dkfM = kf;
            self.process_rate_constants_ddM(&mut dkfM);
            let dlnc = self.dlnctot_dT();
            for (d, m) in dkf.iter_mut().zip(dkfM.iter()) {
                *d += m * dlnc;
            }
        }
        assert_finite(&dkf, "fwd_rate_constants_ddT", "rate constant derivative")?;
        Ok(DVector::from_vec(dkf))
    }

    pub fn fwd_rates_of_progress_ddT(&mut self) -> Result<DVector<f64>, KineticsError> {
        self.check_legacy_rates("fwd_rates_of_progress_ddT")?;
        self.update_rates_of_progress()?;
        let ropf = self.ropf.clone();
        let mut drop = ropf.clone();
        self.process_rate_constants_ddT(&mut drop);
        if self.jac.constant_pressure {
            let dropC = self.concentration_term_ddT(&ropf, false);
            for (d, c) in drop.iter_mut().zip(dropC.iter()) {
                *d += c;
            }
        }
        assert_finite(&drop, "fwd_rates_of_progress_ddT", "rate of progress derivative")?;
        Ok(DVector::from_vec(drop))
    }

    pub fn rev_rates_of_progress_ddT(&mut self) -> Result<DVector<f64>, KineticsError> {
        self.check_legacy_rates("rev_rates_of_progress_ddT")?;
        self.update_rates_of_progress()?;
        let ropr = self.ropr.clone();
        // reverse rop times scaled rate constant derivative
        let mut drop = ropr.clone();
        self.process_rate_constants_ddT(&mut drop);
        // reverse rop times scaled inverse equilibrium constant derivative
        let mut drop2 = ropr.clone();
        self.process_equilibrium_constants_ddT(&mut drop2);
        for (d, d2) in drop.iter_mut().zip(drop2.iter()) {
            *d += d2;
        }
        if self.jac.constant_pressure {
            let dropC = self.concentration_term_ddT(&ropr, true);
            for (d, c) in drop.iter_mut().zip(dropC.iter()) {
                *d += c;
            }
        }
        assert_finite(&drop, "rev_rates_of_progress_ddT", "rate of progress derivative")?;
        Ok(DVector::from_vec(drop))
    }

    pub fn net_rates_of_progress_ddT(&mut self) -> Result<DVector<f64>, KineticsError> {
        self.check_legacy_rates("net_rates_of_progress_ddT")?;
        let fwd = self.fwd_rates_of_progress_ddT()?;
        let rev = self.rev_rates_of_progress_ddT()?;
        Ok(fwd - rev)
    }

    /// forward rate coefficients, scaled by the molar density if derivatives by mole fractions
    /// are requested
    fn jacobian_rate_coefficients(&mut self) -> Result<Vec<f64>, KineticsError> {
        let mut rates = vec![0.0; self.n_reactions()];
        self.process_fwd_rate_coefficients(&mut rates)?;
        if self.jac.mole_fractions {
            let ctot = self.thermo.molar_density();
            rates.iter_mut().for_each(|r| *r *= ctot);
        }
        Ok(rates)
    }

    /// add sign·∂rop/∂C of one direction to `tri`; `rates` are the rate coefficients of
    /// that direction
    fn add_rop_ddC(&self, rates: &[f64], reverse: bool, sign: f64, tri: &mut TriMat<f64>) {
        let stoich = if reverse {
            &self.rev_product_stoich
        } else {
            &self.reactant_stoich
        };
        // derivatives of the concentration products
        let mut rop_stoich = rates.to_vec();
        self.process_third_bodies(&mut rop_stoich);
        stoich.jacobian_into(&self.act_conc, &rop_stoich, sign, tri);
        // derivatives of the third-body concentrations
        if !self.jac.skip_third_bodies && !self.multi_concm.is_empty() {
            let mut rop_3b = rates.to_vec();
            stoich.multiply(&self.act_conc, &mut rop_3b);
            self.multi_concm
                .jacobian_into(&rop_3b, self.n_species(), sign, tri);
        }
    }

    fn new_triplets(&self) -> TriMat<f64> {
        TriMat::new((self.n_reactions(), self.n_species()))
    }

    /// ∂k_f/∂C of the forward rate constants returned by `fwd_rate_constants`. Falloff rate
    /// constants depend on C only through M, which is skipped, so the matrix is empty unless
    /// the legacy rate-constant convention folds third-body concentrations into k_f.
    pub fn fwd_rate_constants_ddC(&mut self) -> Result<CsMat<f64>, KineticsError> {
        self.check_legacy_rates("fwd_rate_constants_ddC")?;
        let mut tri = self.new_triplets();
        if self.legacy_rate_constants && !self.jac.skip_third_bodies {
            let rates = self.jacobian_rate_coefficients()?;
            self.multi_concm
                .jacobian_into(&rates, self.n_species(), 1.0, &mut tri);
        }
        Ok(tri.to_csr())
    }

    pub fn fwd_rates_of_progress_ddC(&mut self) -> Result<CsMat<f64>, KineticsError> {
        self.check_legacy_rates("fwd_rates_of_progress_ddC")?;
        let rates = self.jacobian_rate_coefficients()?;
        let mut tri = self.new_triplets();
        self.add_rop_ddC(&rates, false, 1.0, &mut tri);
        Ok(tri.to_csr())
    }

    pub fn rev_rates_of_progress_ddC(&mut self) -> Result<CsMat<f64>, KineticsError> {
        self.check_legacy_rates("rev_rates_of_progress_ddC")?;
        let mut rates = self.jacobian_rate_coefficients()?;
        self.process_equilibrium_constants(&mut rates);
        let mut tri = self.new_triplets();
        self.add_rop_ddC(&rates, true, 1.0, &mut tri);
        Ok(tri.to_csr())
    }

    pub fn net_rates_of_progress_ddC(&mut self) -> Result<CsMat<f64>, KineticsError> {
        self.check_legacy_rates("net_rates_of_progress_ddC")?;
        let mut rates = self.jacobian_rate_coefficients()?;
        let mut tri = self.new_triplets();
        self.add_rop_ddC(&rates, false, 1.0, &mut tri);
        self.process_equilibrium_constants(&mut rates);
        self.add_rop_ddC(&rates, true, -1.0, &mut tri);
        debug!("net_rates_of_progress_ddC: {} triplets", tri.nnz());
        Ok(tri.to_csr())
    }
}
