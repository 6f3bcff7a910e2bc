//! # Gas-phase kinetics engine
//!
//! [`GasKinetics`] owns a thermodynamic state and a set of reactions and computes forward,
//! reverse and net rates of progress. Every reaction is evaluated by exactly one of two paths
//! chosen when it is installed:
//! - the modern path: batched [`BulkRateEvaluator`]s, queried on every update cycle, with a
//!   single third-body calculator shared by three-body and falloff reactions;
//! - the legacy path: single-rate managers updated only when temperature (and for P-log and
//!   Chebyshev reactions, pressure) changed, with separate third-body calculators for three-body
//!   and falloff reactions and a separate falloff blending stage. Jacobians are not available
//!   for mechanisms containing legacy reactions.
//!
//! ## Update cycle
//! 1. composition: concentrations, molar density, third-body concentrations (always)
//! 2. temperature: legacy rate constants and equilibrium constants (on T change), modern
//!    evaluators (always queried, they decide themselves), legacy P-log and Chebyshev rates
//!    (on T or P change)
//! 3. falloff blending of legacy falloff reactions
//! 4. perturbation multipliers
//! 5. third-body concentrations of mass-action three-body reactions
//! 6. concentration products of reactants (forward) and of products times 1/Kc (reverse)
//! 7. net = forward − reverse; all values are checked to be finite
//!
//! The thermodynamic state can only be changed through [`GasKinetics::thermo_mut`], which marks
//! the cached rates of progress stale.
#![allow(non_snake_case)]
use crate::Kinetics::falloff_functions::{
    FalloffCalculator, FalloffFunction, FalloffKind, FalloffMgr,
};
use crate::Kinetics::kinetics_error::{KineticsError, assert_finite};
use crate::Kinetics::rate_evaluators::{
    BulkKind, BulkRate, BulkRateEvaluator, LegacyRates, ModernRate,
};
use crate::Kinetics::rate_expressions::{
    ArrheniusRate, ChebyshevRate, FalloffRate, PlogRate, RateState, ReactionRate,
};
use crate::Kinetics::reactions::{ReactionData, ReactionKinetics, ReactionType, ThirdBody};
use crate::Kinetics::stoichiometry::{StoichManager, StoichTerm};
use crate::Kinetics::third_body::ThirdBodyCalc;
use crate::Thermodynamics::thermo_state::{BIG_NUMBER, SMALL_NUMBER, ThermoState};
use crate::settings::JacobianSettings;
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Once;

pub(crate) static LEGACY_RATE_CONSTANTS_NOTICE: Once = Once::new();

/// evaluator family owning a reaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateFamily {
    Bulk(BulkKind),
    /// elementary-legacy and three-body-legacy reactions
    LegacyArrhenius,
    LegacyFalloff,
    LegacyPlog,
    LegacyChebyshev,
}

/// where the parameters of one reaction live
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReactionSlot {
    pub family: RateFamily,
    /// position inside the owning evaluator; the falloff slot for legacy falloff reactions
    pub slot: usize,
    /// position inside the owning third-body calculator
    pub third_body: Option<usize>,
}

/// efficiencies by species index plus the default efficiency
type Efficiencies = (BTreeMap<usize, f64>, f64);

/// validated rate parameters of one reaction, ready to be installed
enum InstallPlan {
    Modern {
        rate: ModernRate,
        third_body: Option<Efficiencies>,
    },
    LegacyArrhenius {
        rate: ArrheniusRate,
        third_body: Option<Efficiencies>,
    },
    LegacyFalloff {
        low: ArrheniusRate,
        high: ArrheniusRate,
        function: FalloffFunction,
        kind: FalloffKind,
        third_body: Efficiencies,
    },
    LegacyPlog(PlogRate),
    LegacyChebyshev(ChebyshevRate),
}

pub struct GasKinetics<S: ThermoState> {
    pub(crate) thermo: S,
    pub(crate) reactions: Vec<ReactionData>,
    pub(crate) types: Vec<ReactionType>,
    pub(crate) slots: Vec<ReactionSlot>,
    pub(crate) n_legacy: usize,

    pub(crate) reactant_stoich: StoichManager,
    /// products of reversible reactions
    pub(crate) rev_product_stoich: StoichManager,
    /// products of all reactions
    pub(crate) product_stoich: StoichManager,
    pub(crate) delta_n: Vec<f64>,
    pub(crate) reversible: Vec<bool>,

    // modern path
    pub(crate) bulk_rates: Vec<BulkRateEvaluator>,
    pub(crate) multi_concm: ThirdBodyCalc,
    multi_concm_values: Vec<f64>,

    // legacy path
    legacy_rates: LegacyRates<ArrheniusRate>,
    three_body_concm: ThirdBodyCalc,
    three_body_concm_values: Vec<f64>,
    falloff_low_rates: LegacyRates<ArrheniusRate>,
    falloff_high_rates: LegacyRates<ArrheniusRate>,
    rfn_low: Vec<f64>,
    rfn_high: Vec<f64>,
    falloff_concm: ThirdBodyCalc,
    falloff_concm_values: Vec<f64>,
    /// global reaction index of each legacy falloff slot
    fallindx: Vec<usize>,
    falloffn: FalloffMgr,
    plog_rates: LegacyRates<PlogRate>,
    cheb_rates: LegacyRates<ChebyshevRate>,

    /// raw forward rate constants
    pub(crate) rfn: Vec<f64>,
    /// reverse scaling factors 1/Kc, 0 for irreversible reactions
    pub(crate) rkcn: Vec<f64>,
    pub(crate) ropf: Vec<f64>,
    pub(crate) ropr: Vec<f64>,
    pub(crate) ropnet: Vec<f64>,
    pub(crate) perturb: Vec<f64>,
    /// effective third-body concentration by reaction
    pub(crate) concm: Vec<f64>,
    pub(crate) act_conc: Vec<f64>,
    pub(crate) phys_conc: Vec<f64>,
    grt: Vec<f64>,

    /// temperature and pressure of the last rate update, NaN when stale
    pub(crate) temp: f64,
    pub(crate) pres: f64,
    log_stand_conc: f64,
    pub(crate) rop_ok: bool,
    pub(crate) jac: JacobianSettings,
    pub(crate) legacy_rate_constants: bool,
}

impl<S: ThermoState> GasKinetics<S> {
    pub fn new(thermo: S) -> Self {
        let n_species = thermo.n_species();
        Self {
            thermo,
            reactions: Vec::new(),
            types: Vec::new(),
            slots: Vec::new(),
            n_legacy: 0,
            reactant_stoich: StoichManager::new(),
            rev_product_stoich: StoichManager::new(),
            product_stoich: StoichManager::new(),
            delta_n: Vec::new(),
            reversible: Vec::new(),
            bulk_rates: Vec::new(),
            multi_concm: ThirdBodyCalc::new(),
            multi_concm_values: Vec::new(),
            legacy_rates: LegacyRates::new(),
            three_body_concm: ThirdBodyCalc::new(),
            three_body_concm_values: Vec::new(),
            falloff_low_rates: LegacyRates::new(),
            falloff_high_rates: LegacyRates::new(),
            rfn_low: Vec::new(),
            rfn_high: Vec::new(),
            falloff_concm: ThirdBodyCalc::new(),
            falloff_concm_values: Vec::new(),
            fallindx: Vec::new(),
            falloffn: FalloffMgr::new(),
            plog_rates: LegacyRates::new(),
            cheb_rates: LegacyRates::new(),
            rfn: Vec::new(),
            rkcn: Vec::new(),
            ropf: Vec::new(),
            ropr: Vec::new(),
            ropnet: Vec::new(),
            perturb: Vec::new(),
            concm: Vec::new(),
            act_conc: vec![0.0; n_species],
            phys_conc: vec![0.0; n_species],
            grt: vec![0.0; n_species],
            temp: f64::NAN,
            pres: f64::NAN,
            log_stand_conc: 0.0,
            rop_ok: false,
            jac: JacobianSettings::default(),
            legacy_rate_constants: false,
        }
    }

    /////////////////////////ACCESSORS////////////////////////////////////////////////////////////
    pub fn n_reactions(&self) -> usize {
        self.reactions.len()
    }

    pub fn n_species(&self) -> usize {
        self.thermo.n_species()
    }

    pub fn thermo(&self) -> &S {
        &self.thermo
    }

    /// mutable access to the thermodynamic state; cached rates of progress become stale
    pub fn thermo_mut(&mut self) -> &mut S {
        self.rop_ok = false;
        &mut self.thermo
    }

    pub fn reaction(&self, i: usize) -> Option<&ReactionData> {
        self.reactions.get(i)
    }

    pub fn reaction_type_str(&self, i: usize) -> Option<&'static str> {
        self.types.get(i).map(|t| t.as_str())
    }

    pub fn reaction_slot(&self, i: usize) -> Option<ReactionSlot> {
        self.slots.get(i).copied()
    }

    pub fn is_reversible(&self, i: usize) -> Option<bool> {
        self.reversible.get(i).copied()
    }

    /// true if any reaction is evaluated by the legacy path
    pub fn uses_legacy(&self) -> bool {
        self.n_legacy > 0
    }

    /// true while the cached rates of progress reflect the current state and parameters
    pub fn rop_valid(&self) -> bool {
        self.rop_ok
    }

    fn check_index(&self, operation: &'static str, i: usize) -> Result<(), KineticsError> {
        if i >= self.n_reactions() {
            return Err(KineticsError::IndexOutOfRange {
                operation,
                index: i,
                len: self.n_reactions(),
            });
        }
        Ok(())
    }

    /// multiplier applied to the forward rate constant of reaction `i` (default 1)
    pub fn multiplier(&self, i: usize) -> Result<f64, KineticsError> {
        self.check_index("multiplier", i)?;
        Ok(self.perturb[i])
    }

    pub fn set_multiplier(&mut self, i: usize, f: f64) -> Result<(), KineticsError> {
        self.check_index("set_multiplier", i)?;
        self.perturb[i] = f;
        self.rop_ok = false;
        Ok(())
    }

    /// switch `fwd_rate_constants` to the old convention including third-body concentrations
    pub fn use_legacy_rate_constants(&mut self, legacy: bool) {
        self.legacy_rate_constants = legacy;
    }

    pub fn jacobian_settings(&self) -> Value {
        self.jac.to_value()
    }

    pub fn set_jacobian_settings(&mut self, settings: &Value) -> Result<(), KineticsError> {
        self.jac.update_from_value(settings)?;
        info!("Jacobian settings: {}", self.jac.to_value());
        Ok(())
    }

    /// forget all cached rate data, the next update recomputes everything
    pub fn invalidate_cache(&mut self) {
        self.temp = f64::NAN;
        self.pres = f64::NAN;
        for rates in self.bulk_rates.iter_mut() {
            rates.invalidate();
        }
        self.rop_ok = false;
    }

    /////////////////////////REACTION REGISTRY/////////////////////////////////////////////////////
    fn species_index(&self, equation: &str, name: &str) -> Result<usize, KineticsError> {
        self.thermo
            .species_index(name)
            .ok_or_else(|| KineticsError::UnknownSpecies {
                equation: equation.to_string(),
                species: name.to_string(),
            })
    }

    /// reactant and product terms by species index
    fn resolve_stoich(
        &self,
        r: &ReactionData,
    ) -> Result<(Vec<StoichTerm>, Vec<StoichTerm>), KineticsError> {
        let mut reactants = Vec::new();
        for (name, nu) in &r.reactants {
            let order = r
                .orders
                .as_ref()
                .and_then(|orders| orders.get(name).copied())
                .unwrap_or(*nu);
            reactants.push(StoichTerm {
                species: self.species_index(&r.eq, name)?,
                stoich: *nu,
                order,
            });
        }
        // orders of species that are not reactants enter the rate law only
        if let Some(orders) = &r.orders {
            for (name, order) in orders.iter().filter(|(n, _)| !r.reactants.contains_key(*n)) {
                reactants.push(StoichTerm {
                    species: self.species_index(&r.eq, name)?,
                    stoich: 0.0,
                    order: *order,
                });
            }
        }
        let mut products = Vec::new();
        for (name, nu) in &r.products {
            products.push(StoichTerm {
                species: self.species_index(&r.eq, name)?,
                stoich: *nu,
                order: *nu,
            });
        }
        Ok((reactants, products))
    }

    /// efficiencies by species index; species unknown to the mixture are dropped
    // TODO: report dropped efficiency entries with warn! once mechanisms stop listing
    // species of larger base mechanisms
    fn resolve_efficiencies(&self, third_body: &ThirdBody) -> Efficiencies {
        let efficiencies = third_body
            .efficiencies
            .iter()
            .filter_map(|(name, e)| self.thermo.species_index(name).map(|k| (k, *e)))
            .collect();
        (efficiencies, third_body.default_efficiency)
    }

    fn plan(&self, rtype: ReactionType, r: &ReactionData) -> Result<InstallPlan, KineticsError> {
        use ReactionType as T;
        let plan = match (rtype, &r.data) {
            (T::Elementary, ReactionKinetics::Elementary { rate }) => {
                rate.validate()?;
                InstallPlan::Modern {
                    rate: ModernRate::Arrhenius(*rate),
                    third_body: None,
                }
            }
            (T::ThreeBody, ReactionKinetics::ThreeBody { rate, third_body }) => {
                rate.validate()?;
                InstallPlan::Modern {
                    rate: ModernRate::Arrhenius(*rate),
                    third_body: Some(self.resolve_efficiencies(third_body)),
                }
            }
            (
                T::Falloff | T::ChemicallyActivated,
                ReactionKinetics::Falloff {
                    low_rate,
                    high_rate,
                    falloff,
                    third_body,
                },
            ) => {
                let kind = falloff_kind(rtype, r)?;
                let rate = FalloffRate::new(*low_rate, *high_rate, falloff.clone(), kind);
                rate.validate()?;
                InstallPlan::Modern {
                    rate: ModernRate::Falloff(rate),
                    third_body: Some(self.resolve_efficiencies(third_body)),
                }
            }
            (T::PressureDependentArrhenius, ReactionKinetics::Plog { rates }) => {
                InstallPlan::Modern {
                    rate: ModernRate::Plog(PlogRate::new(rates.clone())?),
                    third_body: None,
                }
            }
            (T::Chebyshev, ReactionKinetics::Chebyshev { chebyshev }) => {
                chebyshev.validate()?;
                InstallPlan::Modern {
                    rate: ModernRate::Chebyshev(chebyshev.clone()),
                    third_body: None,
                }
            }
            (T::ElementaryLegacy, ReactionKinetics::Elementary { rate }) => {
                rate.validate()?;
                InstallPlan::LegacyArrhenius {
                    rate: *rate,
                    third_body: None,
                }
            }
            (T::ThreeBodyLegacy, ReactionKinetics::ThreeBody { rate, third_body }) => {
                rate.validate()?;
                InstallPlan::LegacyArrhenius {
                    rate: *rate,
                    third_body: Some(self.resolve_efficiencies(third_body)),
                }
            }
            (
                T::FalloffLegacy | T::ChemicallyActivatedLegacy,
                ReactionKinetics::Falloff {
                    low_rate,
                    high_rate,
                    falloff,
                    third_body,
                },
            ) => {
                low_rate.validate()?;
                high_rate.validate()?;
                falloff.validate()?;
                InstallPlan::LegacyFalloff {
                    low: *low_rate,
                    high: *high_rate,
                    function: falloff.clone(),
                    kind: falloff_kind(rtype, r)?,
                    third_body: self.resolve_efficiencies(third_body),
                }
            }
            (T::PressureDependentArrheniusLegacy, ReactionKinetics::Plog { rates }) => {
                InstallPlan::LegacyPlog(PlogRate::new(rates.clone())?)
            }
            (T::ChebyshevLegacy, ReactionKinetics::Chebyshev { chebyshev }) => {
                chebyshev.validate()?;
                InstallPlan::LegacyChebyshev(chebyshev.clone())
            }
            _ => {
                return Err(KineticsError::ReactionTypeMismatch {
                    tag: r.reaction_type.clone(),
                    data: r.data.shape(),
                });
            }
        };
        Ok(plan)
    }

    /// position of the modern evaluator for `kind`, created on first use
    fn bulk_position(&mut self, kind: BulkKind) -> usize {
        match self.bulk_rates.iter().position(|e| e.kind() == kind) {
            Some(e) => e,
            None => {
                self.bulk_rates.push(BulkRateEvaluator::for_kind(kind));
                self.bulk_rates.len() - 1
            }
        }
    }

    /// Append a reaction and return its index. The descriptor is checked completely before
    /// anything is installed, a failed call leaves the engine unchanged.
    pub fn add_reaction(&mut self, reaction: ReactionData) -> Result<usize, KineticsError> {
        let rtype = reaction.validate_reaction_type("add_reaction")?;
        let (reactants, products) = self.resolve_stoich(&reaction)?;
        let plan = self.plan(rtype, &reaction)?;
        let i = self.n_reactions();

        let slot = match plan {
            InstallPlan::Modern { rate, third_body } => {
                let kind = rate.kind();
                let e = self.bulk_position(kind);
                let slot = self.bulk_rates[e].install(i, rate).ok_or_else(|| {
                    KineticsError::ReactionTypeMismatch {
                        tag: reaction.reaction_type.clone(),
                        data: reaction.data.shape(),
                    }
                })?;
                let third_body = third_body.map(|(efficiencies, default)| {
                    let tb = self.multi_concm.len();
                    let mass_action = kind != BulkKind::Falloff;
                    self.multi_concm
                        .install(tb, &efficiencies, default, i, mass_action);
                    self.multi_concm_values
                        .resize(self.multi_concm.work_size(), 0.0);
                    tb
                });
                ReactionSlot {
                    family: RateFamily::Bulk(kind),
                    slot,
                    third_body,
                }
            }
            InstallPlan::LegacyArrhenius { rate, third_body } => {
                let slot = self.legacy_rates.n_reactions();
                self.legacy_rates.install(i, rate);
                let third_body = third_body.map(|(efficiencies, default)| {
                    let tb = self.three_body_concm.len();
                    self.three_body_concm
                        .install(tb, &efficiencies, default, i, true);
                    self.three_body_concm_values
                        .resize(self.three_body_concm.work_size(), 0.0);
                    tb
                });
                ReactionSlot {
                    family: RateFamily::LegacyArrhenius,
                    slot,
                    third_body,
                }
            }
            InstallPlan::LegacyFalloff {
                low,
                high,
                function,
                kind,
                third_body: (efficiencies, default),
            } => {
                let nfall = self.falloff_high_rates.n_reactions();
                self.falloff_high_rates.install(nfall, high);
                self.rfn_high.push(0.0);
                self.falloff_low_rates.install(nfall, low);
                self.rfn_low.push(0.0);
                self.fallindx.push(i);
                self.falloff_concm
                    .install(nfall, &efficiencies, default, i, false);
                self.falloff_concm_values
                    .resize(self.falloff_concm.work_size(), 0.0);
                self.falloffn.install(nfall, kind, function);
                ReactionSlot {
                    family: RateFamily::LegacyFalloff,
                    slot: nfall,
                    third_body: Some(nfall),
                }
            }
            InstallPlan::LegacyPlog(rate) => {
                let slot = self.plog_rates.n_reactions();
                self.plog_rates.install(i, rate);
                ReactionSlot {
                    family: RateFamily::LegacyPlog,
                    slot,
                    third_body: None,
                }
            }
            InstallPlan::LegacyChebyshev(rate) => {
                let slot = self.cheb_rates.n_reactions();
                self.cheb_rates.install(i, rate);
                ReactionSlot {
                    family: RateFamily::LegacyChebyshev,
                    slot,
                    third_body: None,
                }
            }
        };

        self.reactant_stoich.add(i, reactants);
        if reaction.reversible {
            self.rev_product_stoich.add(i, products.clone());
        }
        self.product_stoich.add(i, products);
        self.delta_n.push(reaction.delta_n());
        self.reversible.push(reaction.reversible);
        if rtype.uses_legacy() {
            self.n_legacy += 1;
        }
        self.types.push(rtype);
        self.slots.push(slot);
        for v in [
            &mut self.rfn,
            &mut self.rkcn,
            &mut self.ropf,
            &mut self.ropr,
            &mut self.ropnet,
            &mut self.concm,
        ] {
            v.push(0.0);
        }
        self.perturb.push(1.0);
        info!(
            "reaction {} '{}' of type {} added",
            i,
            reaction.eq,
            rtype.as_str()
        );
        self.reactions.push(reaction);
        self.invalidate_cache();
        Ok(i)
    }

    /// Replace the rate parameters (and third-body efficiencies) of reaction `i`. Type,
    /// reversibility and stoichiometry must not change. Cached rate data is always invalidated.
    pub fn modify_reaction(&mut self, i: usize, reaction: ReactionData) -> Result<(), KineticsError> {
        self.check_index("modify_reaction", i)?;
        let rtype = reaction.validate_reaction_type("modify_reaction")?;
        let old = &self.reactions[i];
        let mismatch = |reason: String| KineticsError::ModifiedReactionMismatch { index: i, reason };
        if rtype != self.types[i] {
            return Err(mismatch(format!(
                "type changed from '{}' to '{}'",
                self.types[i], rtype
            )));
        }
        if reaction.reversible != old.reversible {
            return Err(mismatch("reversibility changed".to_string()));
        }
        if reaction.reactants != old.reactants
            || reaction.products != old.products
            || reaction.orders != old.orders
        {
            return Err(mismatch(format!(
                "stoichiometry changed from '{}' to '{}'",
                old.eq, reaction.eq
            )));
        }
        let plan = self.plan(rtype, &reaction)?;
        let slot = self.slots[i];

        match plan {
            InstallPlan::Modern { rate, third_body } => {
                let e = self.bulk_position(rate.kind());
                if !self.bulk_rates[e].replace(slot.slot, rate) {
                    return Err(mismatch("rate family changed".to_string()));
                }
                if let (Some(tb), Some((efficiencies, default))) = (slot.third_body, third_body) {
                    self.multi_concm.replace(tb, &efficiencies, default);
                }
            }
            InstallPlan::LegacyArrhenius { rate, third_body } => {
                self.legacy_rates.replace(i, rate);
                if let (Some(tb), Some((efficiencies, default))) = (slot.third_body, third_body) {
                    self.three_body_concm.replace(tb, &efficiencies, default);
                }
            }
            InstallPlan::LegacyFalloff {
                low,
                high,
                function,
                third_body: (efficiencies, default),
                ..
            } => {
                self.falloff_high_rates.replace(slot.slot, high);
                self.falloff_low_rates.replace(slot.slot, low);
                self.falloffn.replace(slot.slot, function);
                self.falloff_concm
                    .replace(slot.slot, &efficiencies, default);
            }
            InstallPlan::LegacyPlog(rate) => {
                self.plog_rates.replace(i, rate);
            }
            InstallPlan::LegacyChebyshev(rate) => {
                self.cheb_rates.replace(i, rate);
            }
        }
        info!("reaction {} '{}' modified", i, reaction.eq);
        self.reactions[i] = reaction;
        self.invalidate_cache();
        Ok(())
    }

    /////////////////////////RATE UPDATE PIPELINE//////////////////////////////////////////////////
    pub(crate) fn rate_state(&self) -> RateState {
        RateState::new(self.thermo.temperature(), self.thermo.pressure())
    }

    /// composition dependent quantities, recomputed on every call
    pub(crate) fn update_rates_C(&mut self) {
        self.thermo.activity_concentrations(&mut self.act_conc);
        self.thermo.concentrations(&mut self.phys_conc);
        let ctot = self.thermo.molar_density();

        self.multi_concm
            .update(&self.phys_conc, ctot, &mut self.multi_concm_values);
        self.multi_concm
            .copy(&self.multi_concm_values, &mut self.concm);

        if !self.three_body_concm.is_empty() {
            self.three_body_concm
                .update(&self.phys_conc, ctot, &mut self.three_body_concm_values);
            self.three_body_concm
                .copy(&self.three_body_concm_values, &mut self.concm);
        }
        if !self.falloff_concm.is_empty() {
            self.falloff_concm
                .update(&self.phys_conc, ctot, &mut self.falloff_concm_values);
            self.falloff_concm
                .copy(&self.falloff_concm_values, &mut self.concm);
        }
        if self.plog_rates.n_reactions() > 0 || self.cheb_rates.n_reactions() > 0 {
            let log_P = self.thermo.pressure().ln();
            self.plog_rates.update_c(log_P);
            self.cheb_rates.update_c(log_P);
        }
        self.rop_ok = false;
    }

    /// temperature and pressure dependent quantities
    pub(crate) fn update_rates_T(&mut self) {
        let T = self.thermo.temperature();
        let P = self.thermo.pressure();
        self.log_stand_conc = self.thermo.standard_concentration().ln();
        let log_T = T.ln();

        if T != self.temp {
            debug!("temperature changed to {} K, reevaluating rate constants", T);
            if self.legacy_rates.n_reactions() > 0 {
                self.legacy_rates.update(T, log_T, &mut self.rfn);
            }
            if self.falloff_low_rates.n_reactions() > 0 {
                self.falloff_low_rates.update(T, log_T, &mut self.rfn_low);
                self.falloff_high_rates.update(T, log_T, &mut self.rfn_high);
            }
            if !self.falloffn.is_empty() {
                self.falloffn.update_temp(T);
            }
            self.update_kc();
            self.rop_ok = false;
        }

        let state = RateState::new(T, P);
        for rates in self.bulk_rates.iter_mut() {
            if rates.update(&state, &self.concm) {
                rates.get_rate_constants(&mut self.rfn);
                self.rop_ok = false;
            }
        }

        if T != self.temp || P != self.pres {
            if self.plog_rates.n_reactions() > 0 {
                self.plog_rates.update(T, log_T, &mut self.rfn);
                self.rop_ok = false;
            }
            if self.cheb_rates.n_reactions() > 0 {
                self.cheb_rates.update(T, log_T, &mut self.rfn);
                self.rop_ok = false;
            }
        }
        self.pres = P;
        self.temp = T;
    }

    /// reverse scaling factors min(exp(ΔG°/RT − Δn·ln C°), BIG), zero if irreversible
    fn update_kc(&mut self) {
        self.thermo.standard_chem_potentials(&mut self.grt);
        self.rkcn.iter_mut().for_each(|k| *k = 0.0);
        self.rev_product_stoich
            .increment_reactions(&self.grt, &mut self.rkcn);
        self.reactant_stoich
            .decrement_reactions(&self.grt, &mut self.rkcn);
        let rrt = 1.0 / self.thermo.RT();
        for i in 0..self.rkcn.len() {
            self.rkcn[i] = if self.reversible[i] {
                f64::min(
                    f64::exp(self.rkcn[i] * rrt - self.delta_n[i] * self.log_stand_conc),
                    BIG_NUMBER,
                )
            } else {
                0.0
            };
        }
    }

    /// Concentration based equilibrium constants of all reactions, reversible or not.
    /// The next rate update treats temperature as changed.
    pub fn equilibrium_constants(&mut self) -> Vec<f64> {
        self.update_rates_T();
        self.thermo.standard_chem_potentials(&mut self.grt);
        let mut delta_g = vec![0.0; self.n_reactions()];
        self.product_stoich.increment_reactions(&self.grt, &mut delta_g);
        self.reactant_stoich.decrement_reactions(&self.grt, &mut delta_g);
        let rrt = 1.0 / self.thermo.RT();
        let kc: Vec<f64> = delta_g
            .iter()
            .zip(self.delta_n.iter())
            .map(|(dg, dn)| f64::exp(-dg * rrt + dn * self.log_stand_conc))
            .collect();
        self.temp = f64::NAN;
        kc
    }

    /// forward rate constants including falloff blending and multipliers
    pub(crate) fn process_fwd_rate_coefficients(&mut self, ropf: &mut [f64]) -> Result<(), KineticsError> {
        self.update_rates_C();
        self.update_rates_T();
        ropf.copy_from_slice(&self.rfn);
        if self.falloff_high_rates.n_reactions() > 0 {
            self.process_falloff_reactions(ropf)?;
        }
        for (k, f) in ropf.iter_mut().zip(self.perturb.iter()) {
            *k *= f;
        }
        Ok(())
    }

    fn process_falloff_reactions(&self, ropf: &mut [f64]) -> Result<(), KineticsError> {
        let mut pr: Vec<f64> = self
            .falloff_concm_values
            .iter()
            .zip(self.rfn_low.iter().zip(self.rfn_high.iter()))
            .map(|(m, (low, high))| m * low / (high + SMALL_NUMBER))
            .collect();
        assert_finite(&pr, "process_falloff_reactions", "pr")?;
        self.falloffn.pr_to_falloff(&mut pr);
        for (slot, p) in pr.iter().enumerate() {
            let base = match self.falloffn.kind(slot) {
                FalloffKind::Falloff => self.rfn_high[slot],
                FalloffKind::ChemicallyActivated => self.rfn_low[slot],
            };
            ropf[self.fallindx[slot]] = p * base;
        }
        Ok(())
    }

    /// multiply by effective third-body concentrations of mass-action reactions
    pub(crate) fn process_third_bodies(&self, rop: &mut [f64]) {
        if !self.three_body_concm.is_empty() {
            self.three_body_concm.multiply(rop, &self.concm);
        }
        if !self.multi_concm.is_empty() {
            self.multi_concm.multiply(rop, &self.concm);
        }
    }

    pub(crate) fn process_equilibrium_constants(&self, rop: &mut [f64]) {
        for (r, k) in rop.iter_mut().zip(self.rkcn.iter()) {
            *r *= k;
        }
    }

    /// run the whole pipeline regardless of the validity flag
    pub fn update_rates_of_progress(&mut self) -> Result<(), KineticsError> {
        let mut ropf = std::mem::take(&mut self.ropf);
        let result = self.process_fwd_rate_coefficients(&mut ropf);
        self.ropf = ropf;
        result?;
        let mut ropf = std::mem::take(&mut self.ropf);
        self.process_third_bodies(&mut ropf);
        self.ropr.copy_from_slice(&ropf);
        self.reactant_stoich.multiply(&self.act_conc, &mut ropf);
        self.ropf = ropf;

        let mut ropr = std::mem::take(&mut self.ropr);
        self.process_equilibrium_constants(&mut ropr);
        self.rev_product_stoich.multiply(&self.act_conc, &mut ropr);
        self.ropr = ropr;

        for ((net, f), r) in self
            .ropnet
            .iter_mut()
            .zip(self.ropf.iter())
            .zip(self.ropr.iter())
        {
            *net = f - r;
        }
        assert_finite(&self.rfn, "update_rates_of_progress", "rate constant")?;
        assert_finite(&self.ropf, "update_rates_of_progress", "forward rate of progress")?;
        assert_finite(&self.ropr, "update_rates_of_progress", "reverse rate of progress")?;
        self.rop_ok = true;
        Ok(())
    }

    fn ensure_rop(&mut self) -> Result<(), KineticsError> {
        if !self.rop_ok {
            self.update_rates_of_progress()?;
        }
        Ok(())
    }

    /////////////////////////PUBLIC RESULTS////////////////////////////////////////////////////////
    pub fn fwd_rates_of_progress(&mut self) -> Result<&[f64], KineticsError> {
        self.ensure_rop()?;
        Ok(&self.ropf)
    }

    pub fn rev_rates_of_progress(&mut self) -> Result<&[f64], KineticsError> {
        self.ensure_rop()?;
        Ok(&self.ropr)
    }

    pub fn net_rates_of_progress(&mut self) -> Result<&[f64], KineticsError> {
        self.ensure_rop()?;
        Ok(&self.ropnet)
    }

    /// effective third-body concentrations by reaction, zero for reactions without one
    pub fn third_body_concentrations(&mut self) -> Result<&[f64], KineticsError> {
        self.ensure_rop()?;
        Ok(&self.concm)
    }

    /// Forward rate constants. With the legacy convention switched on, rate constants of
    /// three-body reactions include the third-body concentration.
    pub fn fwd_rate_constants(&mut self) -> Result<Vec<f64>, KineticsError> {
        let mut kf = vec![0.0; self.n_reactions()];
        self.process_fwd_rate_coefficients(&mut kf)?;
        if self.legacy_rate_constants {
            LEGACY_RATE_CONSTANTS_NOTICE.call_once(|| {
                warn!(
                    "fwd_rate_constants: legacy convention in use, results include third-body \
                     concentrations of three-body reactions; this behavior is deprecated, call \
                     use_legacy_rate_constants(false) to switch to the new one"
                );
            });
            self.process_third_bodies(&mut kf);
        }
        Ok(kf)
    }

    /// reverse rate constants: forward rate constants divided by Kc, zero if irreversible
    pub fn rev_rate_constants(&mut self) -> Result<Vec<f64>, KineticsError> {
        let mut kr = self.fwd_rate_constants()?;
        self.process_equilibrium_constants(&mut kr);
        Ok(kr)
    }
}

fn falloff_kind(rtype: ReactionType, r: &ReactionData) -> Result<FalloffKind, KineticsError> {
    rtype
        .falloff_kind()
        .ok_or_else(|| KineticsError::ReactionTypeMismatch {
            tag: r.reaction_type.clone(),
            data: r.data.shape(),
        })
}
