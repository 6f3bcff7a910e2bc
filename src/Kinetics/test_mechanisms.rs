//! small mechanisms and mixtures shared by the engine tests
use crate::Kinetics::falloff_functions::{FalloffFunction, Troe};
use crate::Kinetics::gas_kinetics::GasKinetics;
use crate::Kinetics::rate_expressions::{ArrheniusRate, ChebyshevRate};
use crate::Kinetics::reactions::{ReactionData, ReactionKinetics, ThirdBody};
use crate::Thermodynamics::ideal_gas::{IdealGasMixture, Species};
use crate::Thermodynamics::species_thermo::FixedGibbs;
use crate::Thermodynamics::thermo_state::ONE_ATM;
use nalgebra::DMatrix;

pub const SPECIES: [&str; 8] = ["H2", "O2", "H", "O", "OH", "H2O", "HO2", "AR"];

/// hydrogen/oxygen mixture with temperature independent enthalpies and entropies
pub fn h2o2_gas() -> IdealGasMixture {
    // standard enthalpy (J/mol) and entropy (J/mol/K), in the order of SPECIES
    let data = [
        (0.0, 130.7),
        (0.0, 205.2),
        (218.0e3, 114.7),
        (249.2e3, 161.1),
        (39.0e3, 183.7),
        (-241.8e3, 188.8),
        (12.0e3, 229.0),
        (0.0, 154.8),
    ];
    let species = SPECIES
        .iter()
        .zip(data.iter())
        .map(|(name, (h, s))| Species::new(name, FixedGibbs::new(*h, *s)))
        .collect();
    let mut gas = IdealGasMixture::new(species).unwrap();
    gas.set_state_TPX(1200.0, ONE_ATM, &[0.25, 0.15, 0.05, 0.04, 0.06, 0.2, 0.05, 0.2])
        .unwrap();
    gas
}

fn tag(t: &str, legacy: bool) -> String {
    if legacy {
        format!("{}-legacy", t)
    } else {
        t.to_string()
    }
}

pub fn troe_falloff(legacy: bool) -> ReactionData {
    ReactionData::new(
        &tag("falloff", legacy),
        "H + O2 (+M) <=> HO2 (+M)",
        &[("H", 1.0), ("O2", 1.0)],
        &[("HO2", 1.0)],
        ReactionKinetics::Falloff {
            low_rate: ArrheniusRate::new(6.366e8, -1.72, 2196.0),
            high_rate: ArrheniusRate::new(4.7e6, 0.44, 0.0),
            falloff: FalloffFunction::Troe(Troe::new(0.5, 1.0e-30, 1.0e30, None)),
            third_body: ThirdBody::new(&[("H2O", 14.0), ("O2", 0.78), ("AR", 0.67)], 1.0),
        },
    )
}

pub fn plog(legacy: bool) -> ReactionData {
    ReactionData::new(
        &tag("pressure-dependent-Arrhenius", legacy),
        "HO2 + H <=> OH + OH",
        &[("HO2", 1.0), ("H", 1.0)],
        &[("OH", 2.0)],
        ReactionKinetics::Plog {
            rates: vec![
                (0.1 * ONE_ATM, ArrheniusRate::new(7.0e7, 0.0, 1.2e3)),
                (ONE_ATM, ArrheniusRate::new(8.4e7, 0.0, 1.4e3)),
                (10.0 * ONE_ATM, ArrheniusRate::new(1.0e8, 0.0, 1.7e3)),
            ],
        },
    )
}

pub fn chebyshev(legacy: bool) -> ReactionData {
    let coeffs = DMatrix::from_row_slice(3, 2, &[8.2, 0.05, -0.3, 0.02, 0.1, -0.01]);
    ReactionData::new(
        &tag("Chebyshev", legacy),
        "OH + OH <=> O + H2O",
        &[("OH", 2.0)],
        &[("O", 1.0), ("H2O", 1.0)],
        ReactionKinetics::Chebyshev {
            chebyshev: ChebyshevRate::new((290.0, 3000.0), (1.0e3, 1.0e7), coeffs).unwrap(),
        },
    )
}

/// elementary and three-body reactions only, rates independent of pressure
pub fn mass_action_reactions(legacy: bool) -> Vec<ReactionData> {
    vec![
        ReactionData::new(
            &tag("elementary", legacy),
            "H + O2 <=> O + OH",
            &[("H", 1.0), ("O2", 1.0)],
            &[("O", 1.0), ("OH", 1.0)],
            ReactionKinetics::Elementary {
                rate: ArrheniusRate::new(3.52e10, -0.7, 71.4e3),
            },
        ),
        ReactionData::new(
            &tag("elementary", legacy),
            "O + H2 <=> H + OH",
            &[("O", 1.0), ("H2", 1.0)],
            &[("H", 1.0), ("OH", 1.0)],
            ReactionKinetics::Elementary {
                rate: ArrheniusRate::new(50.6, 2.67, 26.3e3),
            },
        ),
        ReactionData::new(
            &tag("three-body", legacy),
            "H + OH + M <=> H2O + M",
            &[("H", 1.0), ("OH", 1.0)],
            &[("H2O", 1.0)],
            ReactionKinetics::ThreeBody {
                rate: ArrheniusRate::new(2.2e10, -2.0, 0.0),
                third_body: ThirdBody::new(&[("H2O", 12.0), ("H2", 2.5), ("AR", 0.38)], 1.0),
            },
        ),
        ReactionData::new(
            &tag("three-body", legacy),
            "O + O + M => O2 + M",
            &[("O", 2.0)],
            &[("O2", 1.0)],
            ReactionKinetics::ThreeBody {
                rate: ArrheniusRate::new(6.165e3, -0.5, 0.0),
                third_body: ThirdBody::new(&[("AR", 0.83)], 1.0),
            },
        )
        .irreversible(),
    ]
}

/// every rate-expression family
pub fn h2o2_reactions(legacy: bool) -> Vec<ReactionData> {
    let mut reactions = mass_action_reactions(legacy);
    reactions.push(troe_falloff(legacy));
    reactions.push(plog(legacy));
    reactions.push(chebyshev(legacy));
    reactions
}

pub fn engine(reactions: Vec<ReactionData>) -> GasKinetics<IdealGasMixture> {
    let mut kin = GasKinetics::new(h2o2_gas());
    for r in reactions {
        kin.add_reaction(r).unwrap();
    }
    kin
}
