#![allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use crate::Kinetics::falloff_functions::{FalloffFunction, Troe};
    use crate::Kinetics::gas_kinetics::GasKinetics;
    use crate::Kinetics::kinetics_error::KineticsError;
    use crate::Kinetics::rate_expressions::ArrheniusRate;
    use crate::Kinetics::reactions::{ReactionData, ReactionKinetics, ThirdBody};
    use crate::Kinetics::test_mechanisms::{
        engine, h2o2_gas, h2o2_reactions, mass_action_reactions, troe_falloff,
    };
    use crate::Thermodynamics::ideal_gas::{IdealGasMixture, Species};
    use crate::Thermodynamics::species_thermo::FixedGibbs;
    use crate::Thermodynamics::thermo_state::{ONE_ATM, R, ThermoState};
    use approx::assert_relative_eq;
    use nalgebra::DVector;
    use serde_json::json;
    use sprs::CsMat;

    #[derive(Clone, Copy)]
    enum Rop {
        Fwd,
        Rev,
        Net,
    }

    fn rop<S: ThermoState>(kin: &mut GasKinetics<S>, which: Rop) -> DVector<f64> {
        let values = match which {
            Rop::Fwd => kin.fwd_rates_of_progress(),
            Rop::Rev => kin.rev_rates_of_progress(),
            Rop::Net => kin.net_rates_of_progress(),
        };
        DVector::from_column_slice(values.unwrap())
    }

    fn assert_vectors_close(a: &DVector<f64>, b: &DVector<f64>, max_relative: f64) {
        assert_eq!(a.len(), b.len());
        let scale = a.amax().max(b.amax());
        for i in 0..a.len() {
            assert_relative_eq!(
                a[i],
                b[i],
                epsilon = 1e-7 * scale,
                max_relative = max_relative
            );
        }
    }

    fn entry(m: &CsMat<f64>, i: usize, k: usize) -> f64 {
        m.get(i, k).copied().unwrap_or(0.0)
    }

    /// central difference of rates of progress along T at constant pressure and composition
    fn fd_ddT_constant_pressure(kin: &mut GasKinetics<IdealGasMixture>, which: Rop) -> DVector<f64> {
        let T = kin.thermo().temperature();
        let P = kin.thermo().pressure();
        let X = kin.thermo().mole_fractions().to_vec();
        let h = 1e-5 * T;
        kin.thermo_mut().set_state_TPX(T + h, P, &X).unwrap();
        let up = rop(kin, which);
        kin.thermo_mut().set_state_TPX(T - h, P, &X).unwrap();
        let down = rop(kin, which);
        kin.thermo_mut().set_state_TPX(T, P, &X).unwrap();
        (up - down) / (2.0 * h)
    }

    /// central difference of rates of progress along T at constant concentrations
    fn fd_ddT_constant_volume(kin: &mut GasKinetics<IdealGasMixture>, which: Rop) -> DVector<f64> {
        let T = kin.thermo().temperature();
        let mut C = vec![0.0; kin.n_species()];
        kin.thermo().concentrations(&mut C);
        let h = 1e-5 * T;
        kin.thermo_mut().set_state_TC(T + h, &C).unwrap();
        let up = rop(kin, which);
        kin.thermo_mut().set_state_TC(T - h, &C).unwrap();
        let down = rop(kin, which);
        kin.thermo_mut().set_state_TC(T, &C).unwrap();
        (up - down) / (2.0 * h)
    }

    #[test]
    fn test_ddT_constant_pressure() {
        let mut kin = engine(h2o2_reactions(false));
        let fwd = kin.fwd_rates_of_progress_ddT().unwrap();
        let rev = kin.rev_rates_of_progress_ddT().unwrap();
        let net = kin.net_rates_of_progress_ddT().unwrap();
        assert_vectors_close(&net, &(&fwd - &rev), 1e-12);

        assert_vectors_close(&fwd, &fd_ddT_constant_pressure(&mut kin, Rop::Fwd), 1e-4);
        assert_vectors_close(&rev, &fd_ddT_constant_pressure(&mut kin, Rop::Rev), 1e-4);
        assert_vectors_close(&net, &fd_ddT_constant_pressure(&mut kin, Rop::Net), 1e-4);
        // the irreversible reaction has no reverse derivative
        assert_eq!(rev[3], 0.0);
    }

    #[test]
    fn test_ddT_constant_volume() {
        let mut reactions = mass_action_reactions(false);
        reactions.push(troe_falloff(false));
        let mut kin = engine(reactions);
        kin.set_jacobian_settings(&json!({"constant-pressure": false}))
            .unwrap();
        let fwd = kin.fwd_rates_of_progress_ddT().unwrap();
        let rev = kin.rev_rates_of_progress_ddT().unwrap();
        assert_vectors_close(&fwd, &fd_ddT_constant_volume(&mut kin, Rop::Fwd), 1e-4);
        assert_vectors_close(&rev, &fd_ddT_constant_volume(&mut kin, Rop::Rev), 1e-4);
    }

    #[test]
    fn test_temperature_is_restored() {
        let mut kin = engine(h2o2_reactions(false));
        let before = rop(&mut kin, Rop::Net);
        let T = kin.thermo().temperature();
        kin.net_rates_of_progress_ddT().unwrap();
        assert_eq!(kin.thermo().temperature(), T);
        let after = rop(&mut kin, Rop::Net);
        assert_vectors_close(&before, &after, 1e-14);
    }

    #[test]
    fn test_fwd_rate_constants_ddT() {
        let mut kin = engine(h2o2_reactions(false));
        kin.set_jacobian_settings(&json!({"constant-pressure": false}))
            .unwrap();
        kin.set_multiplier(0, 3.0).unwrap();
        let kf = kin.fwd_rate_constants().unwrap();
        let dkf = kin.fwd_rate_constants_ddT().unwrap();
        let T = kin.thermo().temperature();
        // H + O2 <=> O + OH: b = -0.7, Ea = 71.4 kJ/mol
        assert_relative_eq!(
            dkf[0],
            kf[0] * (-0.7 + 71.4e3 / (R * T)) / T,
            max_relative = 1e-12
        );
        // O + O + M => O2 + M: b = -0.5, Ea = 0
        assert_relative_eq!(dkf[3], kf[3] * -0.5 / T, max_relative = 1e-12);

        // at constant pressure the falloff rate constant also follows M = P/RT
        kin.set_jacobian_settings(&json!({"constant-pressure": true}))
            .unwrap();
        let dkf_p = kin.fwd_rate_constants_ddT().unwrap();
        assert_relative_eq!(dkf_p[0], dkf[0], max_relative = 1e-12);
        assert_relative_eq!(dkf_p[3], dkf[3], max_relative = 1e-12);
        let P = kin.thermo().pressure();
        let X = kin.thermo().mole_fractions().to_vec();
        let h = 1e-5 * T;
        kin.thermo_mut().set_state_TPX(T + h, P, &X).unwrap();
        let up = kin.fwd_rate_constants().unwrap()[4];
        kin.thermo_mut().set_state_TPX(T - h, P, &X).unwrap();
        let down = kin.fwd_rate_constants().unwrap()[4];
        assert_relative_eq!(dkf_p[4], (up - down) / (2.0 * h), max_relative = 1e-4);
    }

    /// ∂rop/∂C_k by central differences, all other concentrations and T fixed
    fn fd_ddC(kin: &mut GasKinetics<IdealGasMixture>, which: Rop, k: usize) -> DVector<f64> {
        let T = kin.thermo().temperature();
        let mut C = vec![0.0; kin.n_species()];
        kin.thermo().concentrations(&mut C);
        let ctot: f64 = C.iter().sum();
        let h = 1e-6 * C[k].max(1e-3 * ctot);
        let mut Cp = C.clone();
        Cp[k] += h;
        kin.thermo_mut().set_state_TC(T, &Cp).unwrap();
        let up = rop(kin, which);
        let mut Cm = C.clone();
        Cm[k] -= h;
        kin.thermo_mut().set_state_TC(T, &Cm).unwrap();
        let down = rop(kin, which);
        kin.thermo_mut().set_state_TC(T, &C).unwrap();
        (up - down) / (2.0 * h)
    }

    fn assert_matrix_matches_fd(
        kin: &mut GasKinetics<IdealGasMixture>,
        jac: &CsMat<f64>,
        which: Rop,
    ) {
        let scale = jac.data().iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        for k in 0..kin.n_species() {
            let column = fd_ddC(kin, which, k);
            for i in 0..kin.n_reactions() {
                assert_relative_eq!(
                    entry(jac, i, k),
                    column[i],
                    epsilon = 1e-7 * scale,
                    max_relative = 1e-5
                );
            }
        }
    }

    #[test]
    fn test_ddC_matches_finite_differences() {
        let mut kin = engine(mass_action_reactions(false));
        kin.set_jacobian_settings(&json!({"mole-fractions": false}))
            .unwrap();
        let fwd = kin.fwd_rates_of_progress_ddC().unwrap();
        let rev = kin.rev_rates_of_progress_ddC().unwrap();
        let net = kin.net_rates_of_progress_ddC().unwrap();
        assert_eq!((net.rows(), net.cols()), (4, 8));
        for i in 0..kin.n_reactions() {
            for k in 0..kin.n_species() {
                assert_relative_eq!(
                    entry(&net, i, k),
                    entry(&fwd, i, k) - entry(&rev, i, k),
                    max_relative = 1e-12
                );
            }
        }
        assert_matrix_matches_fd(&mut kin, &fwd, Rop::Fwd);
        assert_matrix_matches_fd(&mut kin, &rev, Rop::Rev);
        assert_matrix_matches_fd(&mut kin, &net, Rop::Net);
    }

    #[test]
    fn test_ddC_hand_computed() {
        let mut kin = engine(mass_action_reactions(false));
        kin.set_jacobian_settings(&json!({"mole-fractions": false}))
            .unwrap();
        let fwd = kin.fwd_rates_of_progress_ddC().unwrap();
        let kf = kin.fwd_rate_constants().unwrap();
        let concm = kin.third_body_concentrations().unwrap().to_vec();
        let mut C = vec![0.0; 8];
        kin.thermo().concentrations(&mut C);
        let (h, oh, o) = (C[2], C[4], C[3]);
        // H + OH + M: ∂/∂C_H = kf·M·C_OH + kf·C_H·C_OH, ∂/∂C_H2O = 12·kf·C_H·C_OH
        assert_relative_eq!(
            entry(&fwd, 2, 2),
            kf[2] * concm[2] * oh + kf[2] * h * oh,
            max_relative = 1e-12
        );
        assert_relative_eq!(entry(&fwd, 2, 5), 12.0 * kf[2] * h * oh, max_relative = 1e-12);
        // O + O + M: ∂/∂C_O = 2·kf·M·C_O + kf·C_O²
        assert_relative_eq!(
            entry(&fwd, 3, 3),
            2.0 * kf[3] * concm[3] * o + kf[3] * o * o,
            max_relative = 1e-12
        );
        // species that take part neither as reactants nor as colliders
        assert_eq!(entry(&fwd, 0, 5), 0.0);
    }

    #[test]
    fn test_ddC_options() {
        let mut kin = engine(h2o2_reactions(false));
        let by_x = kin.net_rates_of_progress_ddC().unwrap();
        kin.set_jacobian_settings(&json!({"mole-fractions": false}))
            .unwrap();
        let by_c = kin.net_rates_of_progress_ddC().unwrap();
        let ctot = kin.thermo().molar_density();
        for i in 0..kin.n_reactions() {
            for k in 0..kin.n_species() {
                assert_relative_eq!(
                    entry(&by_x, i, k),
                    entry(&by_c, i, k) * ctot,
                    max_relative = 1e-12
                );
            }
        }
        // AR enters H + OH + M only as a collider
        assert!(entry(&by_c, 2, 7) > 0.0);
        // falloff reactions have no third-body term
        assert_eq!(entry(&by_c, 4, 7), 0.0);
        kin.set_jacobian_settings(&json!({"skip-third-bodies": true}))
            .unwrap();
        let skipped = kin.net_rates_of_progress_ddC().unwrap();
        assert_eq!(entry(&skipped, 2, 7), 0.0);
        assert!(skipped.nnz() < by_c.nnz());
        // reactant columns keep their concentration-product term
        assert_relative_eq!(entry(&skipped, 0, 2), entry(&by_c, 0, 2), max_relative = 1e-12);
    }

    #[test]
    fn test_fwd_rate_constants_ddC() {
        let mut kin = engine(h2o2_reactions(false));
        let dkf = kin.fwd_rate_constants_ddC().unwrap();
        assert_eq!(dkf.shape(), (kin.n_reactions(), kin.n_species()));
        assert_eq!(dkf.nnz(), 0);
        // third-body concentrations folded into the rate constants
        kin.set_jacobian_settings(&json!({"mole-fractions": false}))
            .unwrap();
        let kf = kin.fwd_rate_constants().unwrap();
        kin.use_legacy_rate_constants(true);
        let dkf = kin.fwd_rate_constants_ddC().unwrap();
        assert_eq!(dkf.shape(), (7, 8));
        assert_relative_eq!(entry(&dkf, 2, 5), 12.0 * kf[2], max_relative = 1e-12);
        assert_relative_eq!(entry(&dkf, 2, 7), 0.38 * kf[2], max_relative = 1e-12);
        assert_relative_eq!(entry(&dkf, 2, 2), kf[2], max_relative = 1e-12);
        assert_relative_eq!(entry(&dkf, 3, 7), 0.83 * kf[3], max_relative = 1e-12);
        assert_eq!(entry(&dkf, 0, 5), 0.0);
        assert_eq!(entry(&dkf, 4, 5), 0.0);
        // scaled by the molar density for derivatives by mole fractions
        kin.set_jacobian_settings(&json!({"mole-fractions": true}))
            .unwrap();
        let by_x = kin.fwd_rate_constants_ddC().unwrap();
        let ctot = kin.thermo().molar_density();
        assert_relative_eq!(entry(&by_x, 2, 5), entry(&dkf, 2, 5) * ctot, max_relative = 1e-12);
        kin.set_jacobian_settings(&json!({"skip-third-bodies": true}))
            .unwrap();
        assert_eq!(kin.fwd_rate_constants_ddC().unwrap().nnz(), 0);
        kin.use_legacy_rate_constants(false);
    }

    #[test]
    fn test_ddT_without_colliders() {
        let gas = IdealGasMixture::new(vec![
            Species::new("A", FixedGibbs::new(0.0, 0.0)),
            Species::new("B", FixedGibbs::new(0.0, 0.0)),
            Species::new("N2", FixedGibbs::new(0.0, 0.0)),
        ])
        .unwrap();
        let mut kin = GasKinetics::new(gas);
        kin.add_reaction(ReactionData::new(
            "falloff",
            "A (+N2) <=> B (+N2)",
            &[("A", 1.0)],
            &[("B", 1.0)],
            ReactionKinetics::Falloff {
                low_rate: ArrheniusRate::new(1.0e6, 0.0, 1.0e4),
                high_rate: ArrheniusRate::new(1.0e3, 0.0, 2.0e4),
                falloff: FalloffFunction::Troe(Troe::new(0.5, 100.0, 1000.0, None)),
                third_body: ThirdBody::new(&[("N2", 1.0)], 0.0),
            },
        ))
        .unwrap();
        // the only collider is absent, so the falloff rate constant vanishes
        kin.thermo_mut().set_state_TC(1000.0, &[1.0, 1.0, 0.0]).unwrap();
        assert_eq!(kin.fwd_rates_of_progress().unwrap(), &[0.0]);
        let zero = DVector::from_element(1, 0.0);
        for constant_pressure in [true, false] {
            kin.set_jacobian_settings(&json!({"constant-pressure": constant_pressure}))
                .unwrap();
            assert_eq!(kin.fwd_rate_constants_ddT().unwrap(), zero);
            assert_eq!(kin.fwd_rates_of_progress_ddT().unwrap(), zero);
            assert_eq!(kin.rev_rates_of_progress_ddT().unwrap(), zero);
            assert_eq!(kin.net_rates_of_progress_ddT().unwrap(), zero);
        }
    }

    #[test]
    fn test_fractional_order_at_zero_concentration() {
        let gas = IdealGasMixture::new(vec![
            Species::new("A", FixedGibbs::new(0.0, 0.0)),
            Species::new("B", FixedGibbs::new(0.0, 0.0)),
            Species::new("C", FixedGibbs::new(0.0, 0.0)),
        ])
        .unwrap();
        let mut kin = GasKinetics::new(gas);
        kin.add_reaction(
            ReactionData::new(
                "elementary",
                "A + B => C",
                &[("A", 1.0), ("B", 1.0)],
                &[("C", 1.0)],
                ReactionKinetics::Elementary {
                    rate: ArrheniusRate::new(1.0, 0.0, 0.0),
                },
            )
            .with_orders(&[("A", 0.5)])
            .irreversible(),
        )
        .unwrap();
        kin.thermo_mut().set_state_TC(500.0, &[0.0, 1.0, 1.0]).unwrap();
        let jac = kin.net_rates_of_progress_ddC().unwrap();
        assert!(jac.data().iter().all(|v| v.is_finite()));
        assert!(entry(&jac, 0, 0) > 0.0);
        assert_eq!(entry(&jac, 0, 1), 0.0);
    }

    #[test]
    fn test_legacy_reactions_are_rejected() {
        let mut reactions = mass_action_reactions(false);
        reactions.push(troe_falloff(true));
        let mut kin = engine(reactions);
        let before = rop(&mut kin, Rop::Net);
        let legacy = |operation: &'static str| KineticsError::UnsupportedLegacy { operation };
        assert_eq!(
            kin.fwd_rate_constants_ddT().unwrap_err(),
            legacy("fwd_rate_constants_ddT")
        );
        assert_eq!(
            kin.fwd_rates_of_progress_ddT().unwrap_err(),
            legacy("fwd_rates_of_progress_ddT")
        );
        assert_eq!(
            kin.rev_rates_of_progress_ddT().unwrap_err(),
            legacy("rev_rates_of_progress_ddT")
        );
        assert_eq!(
            kin.net_rates_of_progress_ddT().unwrap_err(),
            legacy("net_rates_of_progress_ddT")
        );
        assert_eq!(
            kin.fwd_rate_constants_ddC().unwrap_err(),
            legacy("fwd_rate_constants_ddC")
        );
        assert_eq!(
            kin.fwd_rates_of_progress_ddC().unwrap_err(),
            legacy("fwd_rates_of_progress_ddC")
        );
        assert_eq!(
            kin.rev_rates_of_progress_ddC().unwrap_err(),
            legacy("rev_rates_of_progress_ddC")
        );
        assert_eq!(
            kin.net_rates_of_progress_ddC().unwrap_err(),
            legacy("net_rates_of_progress_ddC")
        );
        // rates of progress are still available
        assert_vectors_close(&before, &rop(&mut kin, Rop::Net), 1e-14);
    }

    /// ideal gas that does not say so, forcing the finite-difference molar density derivative
    struct OpaqueGas(IdealGasMixture);

    impl ThermoState for OpaqueGas {
        fn n_species(&self) -> usize {
            self.0.n_species()
        }
        fn species_index(&self, name: &str) -> Option<usize> {
            self.0.species_index(name)
        }
        fn species_name(&self, k: usize) -> Option<&str> {
            self.0.species_name(k)
        }
        fn temperature(&self) -> f64 {
            self.0.temperature()
        }
        fn pressure(&self) -> f64 {
            self.0.pressure()
        }
        fn molar_density(&self) -> f64 {
            self.0.molar_density()
        }
        fn activity_concentrations(&self, out: &mut [f64]) {
            self.0.activity_concentrations(out)
        }
        fn concentrations(&self, out: &mut [f64]) {
            self.0.concentrations(out)
        }
        fn standard_chem_potentials(&self, out: &mut [f64]) {
            self.0.standard_chem_potentials(out)
        }
        fn standard_concentration(&self) -> f64 {
            self.0.standard_concentration()
        }
        fn set_state_TP(&mut self, T: f64, P: f64) {
            self.0.set_state_TP(T, P)
        }
    }

    #[test]
    fn test_molar_density_derivative_by_finite_difference() {
        let mut ideal = engine(h2o2_reactions(false));
        let mut opaque = GasKinetics::new(OpaqueGas(h2o2_gas()));
        for r in h2o2_reactions(false) {
            opaque.add_reaction(r).unwrap();
        }
        assert!(!opaque.thermo().is_ideal_gas());
        let a = ideal.net_rates_of_progress_ddT().unwrap();
        let b = opaque.net_rates_of_progress_ddT().unwrap();
        assert_vectors_close(&a, &b, 1e-5);
        assert_eq!(opaque.thermo().pressure(), ONE_ATM);
    }
}
