use serde::{Deserialize, Serialize};

use crate::error::{EcosortError, Result};

/// Payload the classification service returns for one uploaded image.
///
/// Field aliases accept the older wire spellings (`name`, `confidence`,
/// `info`, `impact`) the backend emitted before the contract was tidied up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    #[serde(alias = "name")]
    pub label: String,
    pub category: String,
    #[serde(alias = "confidence")]
    pub confidence_percent: f64,
    #[serde(alias = "info")]
    pub info_text: String,
    #[serde(alias = "impact")]
    pub impact_text: String,
    /// Step-by-step disposal instructions, in display order.
    pub tips: Vec<String>,
}

impl ClassificationResult {
    /// Enforces the 0-100 confidence contract. Values outside the range are
    /// a service-side violation and are rejected, not clamped.
    pub fn validate_confidence(&self) -> Result<()> {
        if self.confidence_percent.is_finite()
            && (0.0..=100.0).contains(&self.confidence_percent)
        {
            Ok(())
        } else {
            Err(EcosortError::ConfidenceOutOfRange {
                value: self.confidence_percent,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_confidence(confidence_percent: f64) -> ClassificationResult {
        ClassificationResult {
            label: "Plastic Bottle".into(),
            category: "Recyclable".into(),
            confidence_percent,
            info_text: "PET plastic, widely recyclable.".into(),
            impact_text: "Recycling one bottle saves energy.".into(),
            tips: vec!["Rinse the bottle".into(), "Remove the cap".into()],
        }
    }

    #[test]
    fn accepts_inclusive_bounds() {
        assert!(result_with_confidence(0.0).validate_confidence().is_ok());
        assert!(result_with_confidence(87.0).validate_confidence().is_ok());
        assert!(result_with_confidence(100.0).validate_confidence().is_ok());
    }

    #[test]
    fn rejects_out_of_range_and_non_finite() {
        assert_eq!(
            result_with_confidence(100.5).validate_confidence(),
            Err(EcosortError::ConfidenceOutOfRange { value: 100.5 })
        );
        assert!(result_with_confidence(-1.0).validate_confidence().is_err());
        assert!(result_with_confidence(f64::NAN).validate_confidence().is_err());
    }

    #[test]
    fn deserializes_legacy_field_spellings() {
        let result: ClassificationResult = serde_json::from_str(
            r#"{
                "name": "Banana Peel",
                "category": "Organic",
                "confidence": 92,
                "info": "Compostable food waste.",
                "impact": "Composting avoids methane emissions.",
                "tips": ["Add to the compost bin"]
            }"#,
        )
        .unwrap();
        assert_eq!(result.label, "Banana Peel");
        assert_eq!(result.confidence_percent, 92.0);
        assert_eq!(result.tips.len(), 1);
    }
}
