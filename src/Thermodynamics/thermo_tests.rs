#[cfg(test)]
mod tests {
    use crate::Thermodynamics::ideal_gas::{IdealGasMixture, Species, ThermoError};
    use crate::Thermodynamics::species_thermo::{
        EnergyUnit, FixedGibbs, NASA7, SpeciesThermo, SpeciesThermoEnum,
    };
    use crate::Thermodynamics::thermo_state::{ONE_ATM, R, ThermoState};
    use approx::assert_relative_eq;

    fn h2() -> NASA7 {
        NASA7::new(
            1000.0,
            [
                2.34433112,
                7.98052075e-03,
                -1.9478151e-05,
                2.01572094e-08,
                -7.37611761e-12,
                -917.935173,
                0.683010238,
            ],
            [
                3.3372792,
                -4.94024731e-05,
                4.99456778e-07,
                -1.79566394e-10,
                2.00255376e-14,
                -950.158922,
                -3.20502331,
            ],
        )
    }

    #[test]
    fn test_nasa7_polynomials() {
        let nasa = h2();
        let t: f64 = 500.0;
        let c = nasa.low;
        let cp = c[0] + c[1] * t + c[2] * t * t + c[3] * t.powi(3) + c[4] * t.powi(4);
        assert_relative_eq!(nasa.cp_R(t), cp, epsilon = 1e-12);
        let g = nasa.h_RT(t) - nasa.s_R(t);
        assert_relative_eq!(nasa.g_RT(t), g, epsilon = 1e-12);
        // both ranges describe the same substance at the midpoint
        let below = nasa.cp_R(999.999);
        let above = nasa.cp_R(1000.0);
        assert_relative_eq!(below, above, max_relative = 1e-3);
        // Cp of H2 at 500 K is about 29.3 J/(mol K)
        assert_relative_eq!(nasa.cp_R(500.0) * R, 29.3, max_relative = 5e-3);
    }

    #[test]
    fn test_fixed_gibbs() {
        let sp = FixedGibbs::with_units(-1000.0, 10.0, EnergyUnit::Cal);
        assert_eq!(sp.h, -4184.0);
        assert_eq!(sp.cp_R(300.0), 0.0);
        let t = 800.0;
        assert_relative_eq!(
            sp.g_RT(t),
            (-4184.0 - t * 41.84) / (R * t),
            epsilon = 1e-12
        );
    }

    fn mixture() -> IdealGasMixture {
        IdealGasMixture::new(vec![
            Species::new("H2", h2()),
            Species::new("AR", FixedGibbs::new(0.0, 154.8)),
            Species::new("N2", FixedGibbs::new(0.0, 191.6)),
        ])
        .unwrap()
    }

    #[test]
    fn test_ideal_gas_concentrations() {
        let mut gas = mixture();
        gas.set_state_TPX(1000.0, 2.0 * ONE_ATM, &[1.0, 2.0, 1.0])
            .unwrap();
        assert_eq!(gas.mole_fractions(), &[0.25, 0.5, 0.25]);
        let ctot = 2.0 * ONE_ATM / (R * 1000.0);
        assert_relative_eq!(gas.molar_density(), ctot, epsilon = 1e-12);
        let mut c = vec![0.0; 3];
        gas.concentrations(&mut c);
        assert_relative_eq!(c[1], 0.5 * ctot, epsilon = 1e-12);
        let mut a = vec![0.0; 3];
        gas.activity_concentrations(&mut a);
        assert_eq!(a, c);
        assert_relative_eq!(gas.standard_concentration(), ctot, epsilon = 1e-12);
        assert!(gas.is_ideal_gas());
    }

    #[test]
    fn test_standard_chem_potentials_include_pressure() {
        let mut gas = mixture();
        gas.set_state_TPX(500.0, ONE_ATM, &[1.0, 0.0, 0.0]).unwrap();
        let mut mu1 = vec![0.0; 3];
        gas.standard_chem_potentials(&mut mu1);
        gas.set_state_TP(500.0, 10.0 * ONE_ATM);
        let mut mu10 = vec![0.0; 3];
        gas.standard_chem_potentials(&mut mu10);
        for k in 0..3 {
            assert_relative_eq!(
                mu10[k] - mu1[k],
                R * 500.0 * 10.0_f64.ln(),
                max_relative = 1e-10
            );
        }
        assert_relative_eq!(mu1[1], -500.0 * 154.8, max_relative = 1e-12);
    }

    #[test]
    fn test_set_state_by_concentrations() {
        let mut gas = mixture();
        gas.set_state_TC(1000.0, &[2.0, 1.0, 1.0]).unwrap();
        let mut c = vec![0.0; 3];
        gas.concentrations(&mut c);
        assert_relative_eq!(c[0], 2.0, max_relative = 1e-12);
        assert_relative_eq!(gas.molar_density(), 4.0, max_relative = 1e-12);
    }

    #[test]
    fn test_mixture_errors() {
        let mut gas = mixture();
        assert_eq!(
            gas.set_mole_fractions(&[1.0, 0.0]),
            Err(ThermoError::WrongLength {
                expected: 3,
                got: 2
            })
        );
        assert_eq!(
            gas.set_mole_fractions(&[0.0, 0.0, 0.0]),
            Err(ThermoError::InvalidComposition)
        );
        assert_eq!(
            gas.set_mole_fractions_by_name(&[("O2", 1.0)]),
            Err(ThermoError::UnknownSpecies("O2".to_string()))
        );
        assert!(matches!(
            gas.set_state_TPX(-1.0, ONE_ATM, &[1.0, 0.0, 0.0]),
            Err(ThermoError::InvalidState { .. })
        ));
        let dup = IdealGasMixture::new(vec![
            Species::new("AR", FixedGibbs::new(0.0, 0.0)),
            Species::new("AR", FixedGibbs::new(0.0, 0.0)),
        ]);
        assert!(matches!(dup, Err(ThermoError::DuplicateSpecies(_))));
        gas.set_mole_fractions_by_name(&[("AR", 1.0), ("N2", 3.0)])
            .unwrap();
        assert_eq!(gas.mole_fractions(), &[0.0, 0.25, 0.75]);
        assert_eq!(gas.species_index("N2"), Some(2));
        assert_eq!(gas.species_name(0), Some("H2"));
        let thermo: &SpeciesThermoEnum = &gas.species()[1].thermo;
        assert!(matches!(thermo, SpeciesThermoEnum::FixedGibbs(_)));
    }
}
