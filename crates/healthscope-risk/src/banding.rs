//! Fixed probability bands used to turn a model score into a risk level.
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

/// Upper bound (exclusive) of the low risk band.
pub const LOW_UPPER: f64 = 0.33;
/// Upper bound (exclusive) of the moderate risk band.
pub const MODERATE_UPPER: f64 = 0.67;

/// One of three ordered, non-overlapping risk bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low Risk",
            RiskBand::Moderate => "Moderate Risk",
            RiskBand::High => "High Risk",
        }
    }

    /// Display color as a hex string.
    pub fn color(&self) -> &'static str {
        match self {
            RiskBand::Low => "#10B981",
            RiskBand::Moderate => "#F59E0B",
            RiskBand::High => "#EF4444",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskBand::Low => "Maintain healthy lifestyle and regular check-ups.",
            RiskBand::Moderate => {
                "Consult healthcare provider and consider lifestyle modifications."
            }
            RiskBand::High => "Immediate medical consultation recommended.",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Serialized as the three display fields consumed by the presentation layer.
impl Serialize for RiskBand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RiskBand", 3)?;
        state.serialize_field("risk_level", self.label())?;
        state.serialize_field("color", self.color())?;
        state.serialize_field("recommendation", self.recommendation())?;
        state.end()
    }
}

/// Map a probability onto its risk band.
///
/// No range check is applied: negative values land in `Low`, values above one
/// (and NaN, which fails both comparisons) land in `High`.
pub fn classify(probability: f64) -> RiskBand {
    if probability < LOW_UPPER {
        RiskBand::Low
    } else if probability < MODERATE_UPPER {
        RiskBand::Moderate
    } else {
        RiskBand::High
    }
}

/// `(label, color, recommendation)` for a probability.
pub fn get_risk_classification(probability: f64) -> (&'static str, &'static str, &'static str) {
    let band = classify(probability);
    (band.label(), band.color(), band.recommendation())
}
