/// error type shared by the kinetics modules and the finite-value check of computed vectors
pub mod kinetics_error;
/// Blending functions of falloff reactions: Lindemann, Troe and SRI, dispatched through the
/// `FalloffCalculator` trait, and the `FalloffMgr` holding the functions of the legacy falloff
/// reactions together with their shared work buffer.
pub mod falloff_functions;
/// Rate expressions: Arrhenius, falloff (low/high pressure limits blended by a falloff function),
/// P-log (logarithmic interpolation between pressures) and Chebyshev polynomials in reduced
/// inverse temperature and reduced log pressure. Every expression implements `ReactionRate`,
/// which also provides scaled derivatives ∂ln k/∂T and ∂ln k/∂ln M.
pub mod rate_expressions;
/// effective third-body concentrations M = Σ ε_k·C_k with default efficiencies
pub mod third_body;
/// Sparse stoichiometric bookkeeping: concentration products of the law of mass action,
/// sums of reaction orders, reaction sums of species properties and the concentration
/// Jacobian of the concentration products.
pub mod stoichiometry;
/// batched evaluators of the modern path and single-rate managers of the legacy path
pub mod rate_evaluators;
/// Reaction descriptors: declared type tag, stoichiometry, optional reaction orders,
/// reversibility and rate parameters. Descriptors can be read from JSON.
/// # Examples
/// ```
/// use GasKin::Kinetics::reactions::{ReactionData, ReactionKinetics};
/// let json = r#"{
///     "type": "three-body",
///     "eq": "H + OH + M <=> H2O + M",
///     "reactants": {"H": 1.0, "OH": 1.0},
///     "products": {"H2O": 1.0},
///     "rate": {"A": 2.2e10, "b": -2.0, "Ea": 0.0},
///     "third_body": {"efficiencies": {"H2O": 12.0}}
/// }"#;
/// let r: ReactionData = serde_json::from_str(json).unwrap();
/// assert!(matches!(r.data, ReactionKinetics::ThreeBody { .. }));
/// assert!(r.reversible);
/// assert_eq!(r.delta_n(), -1.0);
/// ```
pub mod reactions;
/// The gas-phase kinetics engine: reaction registry, rate update pipeline, forward, reverse
/// and net rates of progress, equilibrium constants.
/// # Examples
/// ```
/// use GasKin::Kinetics::gas_kinetics::GasKinetics;
/// use GasKin::Kinetics::rate_expressions::ArrheniusRate;
/// use GasKin::Kinetics::reactions::{ReactionData, ReactionKinetics};
/// use GasKin::Thermodynamics::ideal_gas::{IdealGasMixture, Species};
/// use GasKin::Thermodynamics::species_thermo::FixedGibbs;
/// let gas = IdealGasMixture::new(vec![
///     Species::new("A", FixedGibbs::new(0.0, 0.0)),
///     Species::new("B", FixedGibbs::new(-1.0e4, 0.0)),
/// ])
/// .unwrap();
/// let mut kin = GasKinetics::new(gas);
/// kin.add_reaction(ReactionData::new(
///     "elementary",
///     "A <=> B",
///     &[("A", 1.0)],
///     &[("B", 1.0)],
///     ReactionKinetics::Elementary { rate: ArrheniusRate::new(1.0e3, 0.0, 5.0e4) },
/// ))
/// .unwrap();
/// kin.thermo_mut().set_state_TC(1000.0, &[1.0, 1.0]).unwrap();
/// let net = kin.net_rates_of_progress().unwrap().to_vec();
/// assert!(net[0] > 0.0);
/// // ∂(net rate of progress)/∂(mole fraction) as a sparse matrix
/// let jac = kin.net_rates_of_progress_ddC().unwrap();
/// assert_eq!((jac.rows(), jac.cols()), (1, 2));
/// ```
pub mod gas_kinetics;
/// temperature and concentration Jacobians of the rates of progress
pub mod gas_kinetics_jacobian;
mod gas_kinetics_jacobian_tests;
#[cfg(test)]
mod test_mechanisms;
