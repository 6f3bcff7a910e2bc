use thiserror::Error;

/// error types of the kinetics engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KineticsError {
    #[error("invalid Jacobian setting '{option}': {reason}")]
    Configuration { option: String, reason: String },
    #[error("{operation}: not supported for reactions using legacy rate expressions")]
    UnsupportedLegacy { operation: &'static str },
    #[error("{operation}: unknown reaction type specified: '{tag}'")]
    UnknownReactionType { operation: &'static str, tag: String },
    #[error("reaction type '{tag}' does not match rate parameters of kind '{data}'")]
    ReactionTypeMismatch { tag: String, data: &'static str },
    #[error("cannot modify reaction {index}: {reason}")]
    ModifiedReactionMismatch { index: usize, reason: String },
    #[error("reaction '{equation}' contains undeclared species '{species}'")]
    UnknownSpecies { equation: String, species: String },
    #[error("{operation}: index {index} is out of range (number of reactions {len})")]
    IndexOutOfRange {
        operation: &'static str,
        index: usize,
        len: usize,
    },
    #[error("invalid rate parameters: {reason}")]
    InvalidRate { reason: String },
    #[error("{operation}: {quantity}[{index}] is not finite")]
    NonFinite {
        operation: &'static str,
        quantity: &'static str,
        index: usize,
    },
}

/// returns NonFinite for the first entry that is NaN or infinite
pub fn assert_finite(
    values: &[f64],
    operation: &'static str,
    quantity: &'static str,
) -> Result<(), KineticsError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(KineticsError::NonFinite {
            operation,
            quantity,
            index,
        }),
        None => Ok(()),
    }
}
