//! # Settings Module
//!
//! ## Purpose
//! Configuration surface of the Jacobian subsystem of [`GasKinetics`](crate::Kinetics::gas_kinetics::GasKinetics).
//! Settings are exchanged as JSON maps so that they can be read from configuration files or
//! passed through language bindings without knowing this struct.
//!
//! ## Update rules
//! - an empty map resets every option to its default
//! - otherwise only the keys present are applied, unknown keys are ignored
//! - a value of the wrong JSON type is an error
//! - `skip-falloff = false` is an error: the derivative of falloff rates with respect to the
//!   third-body concentration is not implemented
//! - an update either applies completely or not at all
//!
//! ## Options
//! | Key | Type | Default | Meaning |
//! |-----|------|---------|---------|
//! | "constant-pressure" | bool | true | include the change of molar density with T in ∂/∂T |
//! | "mole-fractions" | bool | true | ∂/∂C scaled by the molar density (derivatives by mole fractions) |
//! | "skip-third-bodies" | bool | false | drop third-body terms from ∂/∂C |
//! | "skip-falloff" | bool | true | drop the falloff dependence on M from ∂/∂C (must stay true) |
//! | "rtol-delta-T" | f64 | 1e-6 | relative temperature step of finite differences |
#![allow(non_snake_case)]
use crate::Kinetics::kinetics_error::KineticsError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JacobianSettings {
    pub constant_pressure: bool,
    pub mole_fractions: bool,
    pub skip_third_bodies: bool,
    pub skip_falloff: bool,
    #[serde(rename = "rtol-delta-T")]
    pub rtol_delta_T: f64,
}

impl Default for JacobianSettings {
    fn default() -> Self {
        Self {
            constant_pressure: true,
            mole_fractions: true,
            skip_third_bodies: false,
            skip_falloff: true,
            rtol_delta_T: 1e-6,
        }
    }
}

fn get_bool(settings: &Map<String, Value>, key: &str) -> Result<Option<bool>, KineticsError> {
    match settings.get(key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(KineticsError::Configuration {
            option: key.to_string(),
            reason: format!("expected a boolean, got {}", other),
        }),
    }
}

impl JacobianSettings {
    /// current settings as a JSON map
    pub fn to_value(&self) -> Value {
        // a struct of booleans and a float always serializes
        serde_json::to_value(self).unwrap_or_default()
    }

    /// apply an update map, see the module documentation for the rules
    pub fn update_from(&mut self, settings: &Map<String, Value>) -> Result<(), KineticsError> {
        if settings.is_empty() {
            *self = Self::default();
            return Ok(());
        }
        let mut new = self.clone();
        if let Some(b) = get_bool(settings, "constant-pressure")? {
            new.constant_pressure = b;
        }
        if let Some(b) = get_bool(settings, "mole-fractions")? {
            new.mole_fractions = b;
        }
        if let Some(b) = get_bool(settings, "skip-third-bodies")? {
            new.skip_third_bodies = b;
        }
        if let Some(b) = get_bool(settings, "skip-falloff")? {
            new.skip_falloff = b;
        }
        if !new.skip_falloff {
            return Err(KineticsError::Configuration {
                option: "skip-falloff".to_string(),
                reason: "derivative term related to reaction rate dependence on third bodies is not implemented"
                    .to_string(),
            });
        }
        if let Some(v) = settings.get("rtol-delta-T") {
            let rtol = v.as_f64().ok_or_else(|| KineticsError::Configuration {
                option: "rtol-delta-T".to_string(),
                reason: format!("expected a number, got {}", v),
            })?;
            if !(rtol.is_finite() && rtol > 0.0) {
                return Err(KineticsError::Configuration {
                    option: "rtol-delta-T".to_string(),
                    reason: format!("must be finite and positive, got {}", rtol),
                });
            }
            new.rtol_delta_T = rtol;
        }
        *self = new;
        Ok(())
    }

    /// apply an update given as any JSON value; only objects are accepted
    pub fn update_from_value(&mut self, settings: &Value) -> Result<(), KineticsError> {
        match settings {
            Value::Object(map) => self.update_from(map),
            other => Err(KineticsError::Configuration {
                option: "settings".to_string(),
                reason: format!("expected a JSON object, got {}", other),
            }),
        }
    }
}
