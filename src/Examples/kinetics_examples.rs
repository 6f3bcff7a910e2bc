#![allow(non_snake_case)]
use crate::Kinetics::falloff_functions::{FalloffFunction, Troe};
use crate::Kinetics::gas_kinetics::GasKinetics;
use crate::Kinetics::rate_expressions::{ArrheniusRate, ChebyshevRate};
use crate::Kinetics::reactions::{ReactionData, ReactionKinetics, ThirdBody};
use crate::Thermodynamics::ideal_gas::{IdealGasMixture, Species};
use crate::Thermodynamics::species_thermo::{EnergyUnit, NASA7};
use crate::Thermodynamics::thermo_state::{ONE_ATM, ThermoState};
use log::info;
use nalgebra::DMatrix;
use serde_json::json;
use std::error::Error;

/// NASA 7-coefficient data, (name, low range, high range), common midpoint 1000 K
const NASA_DATA: [(&str, [f64; 7], [f64; 7]); 8] = [
    (
        "H2",
        [2.34433112, 7.98052075e-03, -1.9478151e-05, 2.01572094e-08, -7.37611761e-12, -917.935173, 0.683010238],
        [3.3372792, -4.94024731e-05, 4.99456778e-07, -1.79566394e-10, 2.00255376e-14, -950.158922, -3.20502331],
    ),
    (
        "O2",
        [3.78245636, -2.99673416e-03, 9.84730201e-06, -9.68129509e-09, 3.24372837e-12, -1063.94356, 3.65767573],
        [3.28253784, 1.48308754e-03, -7.57966669e-07, 2.09470555e-10, -2.16717794e-14, -1088.45772, 5.45323129],
    ),
    (
        "H",
        [2.5, 7.05332819e-13, -1.99591964e-15, 2.30081632e-18, -9.27732332e-22, 25473.6599, -0.446682853],
        [2.50000001, -2.30842973e-11, 1.61561948e-14, -4.73515235e-18, 4.98197357e-22, 25473.6599, -0.446682914],
    ),
    (
        "O",
        [3.1682671, -3.27931884e-03, 6.64306396e-06, -6.12806624e-09, 2.11265971e-12, 29122.2592, 2.05193346],
        [2.56942078, -8.59741137e-05, 4.19484589e-08, -1.00177799e-11, 1.22833691e-15, 29217.5791, 4.78433864],
    ),
    (
        "OH",
        [3.99201543, -2.40131752e-03, 4.61793841e-06, -3.88113333e-09, 1.3641147e-12, 3615.08056, -0.103925458],
        [3.09288767, 5.48429716e-04, 1.26505228e-07, -8.79461556e-11, 1.17412376e-14, 3858.657, 4.4766961],
    ),
    (
        "H2O",
        [4.19864056, -2.0364341e-03, 6.52040211e-06, -5.48797062e-09, 1.77197817e-12, -30293.7267, -0.849032208],
        [3.03399249, 2.17691804e-03, -1.64072518e-07, -9.7041987e-11, 1.68200992e-14, -30004.2971, 4.9667701],
    ),
    (
        "HO2",
        [4.30179801, -4.74912051e-03, 2.11582891e-05, -2.42763894e-08, 9.29225124e-12, 294.80804, 3.71666245],
        [4.0172109, 2.23982013e-03, -6.3365815e-07, 1.1424637e-10, -1.07908535e-14, 111.856713, 3.78510215],
    ),
    (
        "AR",
        [2.5, 0.0, 0.0, 0.0, 0.0, -745.375, 4.366],
        [2.5, 0.0, 0.0, 0.0, 0.0, -745.375, 4.366],
    ),
];

fn h2o2_mixture() -> Result<IdealGasMixture, Box<dyn Error>> {
    let species = NASA_DATA
        .iter()
        .map(|(name, low, high)| Species::new(name, NASA7::new(1000.0, *low, *high)))
        .collect();
    let mut gas = IdealGasMixture::new(species)?;
    gas.set_mole_fractions_by_name(&[("H2", 0.3), ("O2", 0.15), ("H", 0.01), ("O", 0.01), ("OH", 0.02), ("H2O", 0.1), ("AR", 0.41)])?;
    Ok(gas)
}

/// rate constants in m, mol, s; activation energies in cal/mol
fn h2o2_mechanism() -> Result<Vec<ReactionData>, Box<dyn Error>> {
    let cal = |A: f64, b: f64, Ea: f64| ArrheniusRate::with_units(A, b, Ea, EnergyUnit::Cal);
    let cheb_coeffs = DMatrix::from_row_slice(3, 2, &[8.2, 0.05, -0.3, 0.02, 0.1, -0.01]);
    Ok(vec![
        ReactionData::new(
            "elementary",
            "H + O2 <=> O + OH",
            &[("H", 1.0), ("O2", 1.0)],
            &[("O", 1.0), ("OH", 1.0)],
            ReactionKinetics::Elementary {
                rate: cal(2.65e10, -0.6707, 17041.0),
            },
        ),
        ReactionData::new(
            "elementary",
            "O + H2 <=> H + OH",
            &[("O", 1.0), ("H2", 1.0)],
            &[("H", 1.0), ("OH", 1.0)],
            ReactionKinetics::Elementary {
                rate: cal(38.7, 2.7, 6260.0),
            },
        ),
        ReactionData::new(
            "three-body",
            "H + OH + M <=> H2O + M",
            &[("H", 1.0), ("OH", 1.0)],
            &[("H2O", 1.0)],
            ReactionKinetics::ThreeBody {
                rate: cal(2.2e10, -2.0, 0.0),
                third_body: ThirdBody::new(&[("H2", 0.73), ("H2O", 3.65), ("AR", 0.38)], 1.0),
            },
        ),
        ReactionData::new(
            "falloff",
            "H + O2 (+M) <=> HO2 (+M)",
            &[("H", 1.0), ("O2", 1.0)],
            &[("HO2", 1.0)],
            ReactionKinetics::Falloff {
                low_rate: cal(6.366e8, -1.72, 524.8),
                high_rate: cal(4.65e6, 0.44, 0.0),
                falloff: FalloffFunction::Troe(Troe::new(0.5, 1.0e-30, 1.0e30, None)),
                third_body: ThirdBody::new(&[("H2", 2.0), ("H2O", 14.0), ("O2", 0.78), ("AR", 0.67)], 1.0),
            },
        ),
        ReactionData::new(
            "pressure-dependent-Arrhenius",
            "H + HO2 <=> OH + OH",
            &[("H", 1.0), ("HO2", 1.0)],
            &[("OH", 2.0)],
            ReactionKinetics::Plog {
                rates: vec![
                    (0.1 * ONE_ATM, cal(7.0e7, 0.0, 300.0)),
                    (ONE_ATM, cal(8.4e7, 0.0, 400.0)),
                    (10.0 * ONE_ATM, cal(1.0e8, 0.0, 500.0)),
                ],
            },
        ),
        ReactionData::new(
            "Chebyshev",
            "OH + OH <=> O + H2O",
            &[("OH", 2.0)],
            &[("O", 1.0), ("H2O", 1.0)],
            ReactionKinetics::Chebyshev {
                chebyshev: ChebyshevRate::new((290.0, 3000.0), (1.0e3, 1.0e7), cheb_coeffs)?,
            },
        ),
    ])
}

fn h2o2_engine() -> Result<GasKinetics<IdealGasMixture>, Box<dyn Error>> {
    let mut kin = GasKinetics::new(h2o2_mixture()?);
    for r in h2o2_mechanism()? {
        kin.add_reaction(r)?;
    }
    Ok(kin)
}

pub fn kin_examples(kintask: usize) -> Result<(), Box<dyn Error>> {
    match kintask {
        0 => {
            // RATES OF PROGRESS
            let mut kin = h2o2_engine()?;
            let X = kin.thermo().mole_fractions().to_vec();
            for (T, P) in [(1000.0, ONE_ATM), (1500.0, ONE_ATM), (1500.0, 10.0 * ONE_ATM)] {
                kin.thermo_mut().set_state_TPX(T, P, &X)?;
                let ropf = kin.fwd_rates_of_progress()?.to_vec();
                let ropr = kin.rev_rates_of_progress()?.to_vec();
                let net = kin.net_rates_of_progress()?.to_vec();
                let kc = kin.equilibrium_constants();
                info!("T = {} K, P = {} Pa", T, P);
                for i in 0..kin.n_reactions() {
                    let eq = kin.reaction(i).map(|r| r.eq.as_str()).unwrap_or("");
                    println!(
                        "{:<28} fwd {:>12.4e} rev {:>12.4e} net {:>12.4e} Kc {:>12.4e}",
                        eq, ropf[i], ropr[i], net[i], kc[i]
                    );
                }
            }
        }
        1 => {
            // JACOBIANS
            let mut kin = h2o2_engine()?;
            let X = kin.thermo().mole_fractions().to_vec();
            kin.thermo_mut().set_state_TPX(1200.0, ONE_ATM, &X)?;
            let ddT = kin.net_rates_of_progress_ddT()?;
            println!("d(net rates of progress)/dT at constant pressure: {}", ddT);
            let ddX = kin.net_rates_of_progress_ddC()?;
            println!("d(net rates of progress)/dX: {} non-zero entries", ddX.nnz());
            for (value, (i, k)) in ddX.iter() {
                let name = kin.thermo().species_name(k).unwrap_or("?");
                println!("  reaction {} species {:<4} {:>12.4e}", i, name, value);
            }
            kin.set_jacobian_settings(&json!({"constant-pressure": false, "mole-fractions": false}))?;
            println!("settings: {}", kin.jacobian_settings());
            let ddT = kin.net_rates_of_progress_ddT()?;
            println!("d(net rates of progress)/dT at constant volume: {}", ddT);
            let ddC = kin.net_rates_of_progress_ddC()?;
            println!("d(net rates of progress)/dC: {} non-zero entries", ddC.nnz());
        }
        2 => {
            // MECHANISM FROM JSON, MODIFICATION OF REACTIONS
            let mut kin = GasKinetics::new(h2o2_mixture()?);
            let mechanism = json!([
                {
                    "type": "elementary",
                    "eq": "H + O2 <=> O + OH",
                    "reactants": {"H": 1.0, "O2": 1.0},
                    "products": {"O": 1.0, "OH": 1.0},
                    "rate": {"A": 1.04e8, "b": 0.0, "Ea": 64060.0}
                },
                {
                    "type": "falloff-legacy",
                    "eq": "H + O2 (+M) <=> HO2 (+M)",
                    "reactants": {"H": 1.0, "O2": 1.0},
                    "products": {"HO2": 1.0},
                    "low_rate": {"A": 6.366e8, "b": -1.72, "Ea": 2196.0},
                    "high_rate": {"A": 4.65e6, "b": 0.44, "Ea": 0.0},
                    "falloff": {"type": "Troe", "A": 0.5, "T3": 1e-30, "T1": 1e30},
                    "third_body": {"efficiencies": {"H2O": 14.0, "AR": 0.67}}
                }
            ]);
            let reactions: Vec<ReactionData> = serde_json::from_value(mechanism)?;
            for r in reactions {
                kin.add_reaction(r)?;
            }
            println!("net rates of progress: {:?}", kin.net_rates_of_progress()?);
            match kin.net_rates_of_progress_ddT() {
                Ok(_) => println!("Jacobian computed"),
                Err(e) => println!("Jacobian not available: {}", e),
            }
            if let Some(r) = kin.reaction(0).cloned() {
                let mut faster = r;
                faster.data = ReactionKinetics::Elementary {
                    rate: ArrheniusRate::new(2.08e8, 0.0, 64060.0),
                };
                kin.modify_reaction(0, faster)?;
            }
            kin.set_multiplier(1, 0.5)?;
            println!("after modification: {:?}", kin.net_rates_of_progress()?);
        }
        _ => {
            println!("unknown example {}", kintask);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_run() {
        for task in 0..3 {
            kin_examples(task).unwrap();
        }
    }
}
