//! # Reaction descriptors
//!
//! A [`ReactionData`] record carries everything the engine needs to install one reaction: the
//! declared type tag, stoichiometry (by species name), optional explicit reaction orders,
//! reversibility and rate parameters. The shape of the rate parameters must agree with the
//! type tag; [`ReactionData::validate_reaction_type`] checks that.
//!
//! | type tag                                | rate parameters   | path   |
//! |-----------------------------------------|-------------------|--------|
//! | `elementary`                            | Elementary        | modern |
//! | `three-body`                            | ThreeBody         | modern |
//! | `falloff`, `chemically-activated`       | Falloff           | modern |
//! | `pressure-dependent-Arrhenius`          | Plog              | modern |
//! | `Chebyshev`                             | Chebyshev         | modern |
//! | the same tags with the `-legacy` suffix | the same          | legacy |
use crate::Kinetics::falloff_functions::{FalloffFunction, FalloffKind};
use crate::Kinetics::kinetics_error::KineticsError;
use crate::Kinetics::rate_expressions::{ArrheniusRate, ChebyshevRate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// declared type of a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionType {
    Elementary,
    ThreeBody,
    Falloff,
    ChemicallyActivated,
    PressureDependentArrhenius,
    Chebyshev,
    ElementaryLegacy,
    ThreeBodyLegacy,
    FalloffLegacy,
    ChemicallyActivatedLegacy,
    PressureDependentArrheniusLegacy,
    ChebyshevLegacy,
}

impl ReactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionType::Elementary => "elementary",
            ReactionType::ThreeBody => "three-body",
            ReactionType::Falloff => "falloff",
            ReactionType::ChemicallyActivated => "chemically-activated",
            ReactionType::PressureDependentArrhenius => "pressure-dependent-Arrhenius",
            ReactionType::Chebyshev => "Chebyshev",
            ReactionType::ElementaryLegacy => "elementary-legacy",
            ReactionType::ThreeBodyLegacy => "three-body-legacy",
            ReactionType::FalloffLegacy => "falloff-legacy",
            ReactionType::ChemicallyActivatedLegacy => "chemically-activated-legacy",
            ReactionType::PressureDependentArrheniusLegacy => {
                "pressure-dependent-Arrhenius-legacy"
            }
            ReactionType::ChebyshevLegacy => "Chebyshev-legacy",
        }
    }

    /// true for reactions evaluated by the legacy single-rate path
    pub fn uses_legacy(&self) -> bool {
        matches!(
            self,
            ReactionType::ElementaryLegacy
                | ReactionType::ThreeBodyLegacy
                | ReactionType::FalloffLegacy
                | ReactionType::ChemicallyActivatedLegacy
                | ReactionType::PressureDependentArrheniusLegacy
                | ReactionType::ChebyshevLegacy
        )
    }

    /// blending base for falloff type tags
    pub fn falloff_kind(&self) -> Option<FalloffKind> {
        match self {
            ReactionType::Falloff | ReactionType::FalloffLegacy => Some(FalloffKind::Falloff),
            ReactionType::ChemicallyActivated | ReactionType::ChemicallyActivatedLegacy => {
                Some(FalloffKind::ChemicallyActivated)
            }
            _ => None,
        }
    }
}

impl FromStr for ReactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rtype = match s {
            "elementary" => ReactionType::Elementary,
            "three-body" => ReactionType::ThreeBody,
            "falloff" => ReactionType::Falloff,
            "chemically-activated" => ReactionType::ChemicallyActivated,
            "pressure-dependent-Arrhenius" => ReactionType::PressureDependentArrhenius,
            "Chebyshev" => ReactionType::Chebyshev,
            "elementary-legacy" => ReactionType::ElementaryLegacy,
            "three-body-legacy" => ReactionType::ThreeBodyLegacy,
            "falloff-legacy" => ReactionType::FalloffLegacy,
            "chemically-activated-legacy" => ReactionType::ChemicallyActivatedLegacy,
            "pressure-dependent-Arrhenius-legacy" => {
                ReactionType::PressureDependentArrheniusLegacy
            }
            "Chebyshev-legacy" => ReactionType::ChebyshevLegacy,
            _ => return Err(s.to_string()),
        };
        Ok(rtype)
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// collision efficiencies by species name, species not listed get `default_efficiency`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThirdBody {
    #[serde(default)]
    pub efficiencies: BTreeMap<String, f64>,
    #[serde(default = "default_efficiency")]
    pub default_efficiency: f64,
}

fn default_efficiency() -> f64 {
    1.0
}

impl Default for ThirdBody {
    fn default() -> Self {
        Self {
            efficiencies: BTreeMap::new(),
            default_efficiency: 1.0,
        }
    }
}

impl ThirdBody {
    pub fn new(efficiencies: &[(&str, f64)], default_efficiency: f64) -> Self {
        Self {
            efficiencies: efficiencies
                .iter()
                .map(|(name, e)| (name.to_string(), *e))
                .collect(),
            default_efficiency,
        }
    }
}

/// rate parameters, one variant per parameter shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReactionKinetics {
    Falloff {
        low_rate: ArrheniusRate,
        high_rate: ArrheniusRate,
        #[serde(default)]
        falloff: FalloffFunction,
        #[serde(default)]
        third_body: ThirdBody,
    },
    ThreeBody {
        rate: ArrheniusRate,
        third_body: ThirdBody,
    },
    /// (pressure in Pa, Arrhenius expression) pairs
    Plog { rates: Vec<(f64, ArrheniusRate)> },
    Chebyshev { chebyshev: ChebyshevRate },
    Elementary { rate: ArrheniusRate },
}

impl ReactionKinetics {
    pub fn shape(&self) -> &'static str {
        match self {
            ReactionKinetics::Falloff { .. } => "Falloff",
            ReactionKinetics::ThreeBody { .. } => "ThreeBody",
            ReactionKinetics::Plog { .. } => "Plog",
            ReactionKinetics::Chebyshev { .. } => "Chebyshev",
            ReactionKinetics::Elementary { .. } => "Elementary",
        }
    }

    pub fn third_body(&self) -> Option<&ThirdBody> {
        match self {
            ReactionKinetics::Falloff { third_body, .. }
            | ReactionKinetics::ThreeBody { third_body, .. } => Some(third_body),
            _ => None,
        }
    }
}

fn default_reversible() -> bool {
    true
}

/// struct for reaction data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionData {
    /// declared type tag, checked when the reaction is installed
    #[serde(rename = "type")]
    pub reaction_type: String,
    pub eq: String,
    pub reactants: BTreeMap<String, f64>,
    pub products: BTreeMap<String, f64>,
    /// explicit reaction orders; reactants not listed have order equal to their coefficient
    #[serde(default)]
    pub orders: Option<BTreeMap<String, f64>>,
    #[serde(default = "default_reversible")]
    pub reversible: bool,
    #[serde(flatten)]
    pub data: ReactionKinetics,
}

impl ReactionData {
    pub fn new(
        reaction_type: &str,
        eq: &str,
        reactants: &[(&str, f64)],
        products: &[(&str, f64)],
        data: ReactionKinetics,
    ) -> Self {
        let to_map = |side: &[(&str, f64)]| -> BTreeMap<String, f64> {
            let mut map = BTreeMap::new();
            for (name, nu) in side {
                *map.entry(name.to_string()).or_insert(0.0) += nu;
            }
            map
        };
        Self {
            reaction_type: reaction_type.to_string(),
            eq: eq.to_string(),
            reactants: to_map(reactants),
            products: to_map(products),
            orders: None,
            reversible: true,
            data,
        }
    }

    pub fn irreversible(mut self) -> Self {
        self.reversible = false;
        self
    }

    pub fn with_orders(mut self, orders: &[(&str, f64)]) -> Self {
        self.orders = Some(orders.iter().map(|(n, o)| (n.to_string(), *o)).collect());
        self
    }

    /// parse the type tag and check that it matches the shape of the rate parameters
    pub fn validate_reaction_type(
        &self,
        operation: &'static str,
    ) -> Result<ReactionType, KineticsError> {
        let rtype = ReactionType::from_str(&self.reaction_type).map_err(|tag| {
            KineticsError::UnknownReactionType { operation, tag }
        })?;
        use ReactionType as T;
        let matches = match (&rtype, &self.data) {
            (T::Elementary | T::ElementaryLegacy, ReactionKinetics::Elementary { .. }) => true,
            (T::ThreeBody | T::ThreeBodyLegacy, ReactionKinetics::ThreeBody { .. }) => true,
            (
                T::Falloff | T::FalloffLegacy | T::ChemicallyActivated | T::ChemicallyActivatedLegacy,
                ReactionKinetics::Falloff { .. },
            ) => true,
            (
                T::PressureDependentArrhenius | T::PressureDependentArrheniusLegacy,
                ReactionKinetics::Plog { .. },
            ) => true,
            (T::Chebyshev | T::ChebyshevLegacy, ReactionKinetics::Chebyshev { .. }) => true,
            _ => false,
        };
        if !matches {
            return Err(KineticsError::ReactionTypeMismatch {
                tag: self.reaction_type.clone(),
                data: self.data.shape(),
            });
        }
        Ok(rtype)
    }

    /// net change of the number of moles, Σν(products) − Σν(reactants)
    pub fn delta_n(&self) -> f64 {
        self.products.values().sum::<f64>() - self.reactants.values().sum::<f64>()
    }
}
