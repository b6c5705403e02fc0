//! Question definitions: types, conditional logic, and structural validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// The seven supported question types.
///
/// Wire and database representation is the SCREAMING_SNAKE form
/// (e.g. `"RATING_1_5"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "NPS")]
    Nps,
    #[serde(rename = "RATING_1_5")]
    Rating1To5,
    #[serde(rename = "COMPARISON")]
    Comparison,
    #[serde(rename = "TEXT_SHORT")]
    TextShort,
    #[serde(rename = "TEXT_LONG")]
    TextLong,
    #[serde(rename = "MULTIPLE_CHOICE")]
    MultipleChoice,
    #[serde(rename = "SINGLE_CHOICE")]
    SingleChoice,
}

impl QuestionType {
    /// Parse the database/wire representation. Returns `None` for unknown strings.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NPS" => Some(Self::Nps),
            "RATING_1_5" => Some(Self::Rating1To5),
            "COMPARISON" => Some(Self::Comparison),
            "TEXT_SHORT" => Some(Self::TextShort),
            "TEXT_LONG" => Some(Self::TextLong),
            "MULTIPLE_CHOICE" => Some(Self::MultipleChoice),
            "SINGLE_CHOICE" => Some(Self::SingleChoice),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nps => "NPS",
            Self::Rating1To5 => "RATING_1_5",
            Self::Comparison => "COMPARISON",
            Self::TextShort => "TEXT_SHORT",
            Self::TextLong => "TEXT_LONG",
            Self::MultipleChoice => "MULTIPLE_CHOICE",
            Self::SingleChoice => "SINGLE_CHOICE",
        }
    }

    /// Choice-like types carry a declared `options` list.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            Self::Comparison | Self::MultipleChoice | Self::SingleChoice
        )
    }
}

/// Comparison operator in a conditional rule.
///
/// Unknown operators deserialize to [`ConditionOp::Unknown`], which always
/// evaluates to "not required" (fail closed) rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionOp {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = ">")]
    Gt,
    #[serde(other, rename = "?")]
    Unknown,
}

/// A conditional-requiredness rule attached to a question.
///
/// `depends_on` must reference a question with a strictly smaller display
/// order (i.e. one the respondent sees first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalLogic {
    pub depends_on: DbId,
    pub condition: ConditionOp,
    pub value: serde_json::Value,
}

/// Fully-parsed question definition used by the evaluators.
///
/// The `db` crate converts raw rows (JSON columns for options and
/// conditional logic) into this shape before any domain logic runs.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: DbId,
    pub question_type: QuestionType,
    pub text: String,
    pub required: bool,
    pub display_order: i32,
    pub options: Vec<String>,
    pub conditional_logic: Option<ConditionalLogic>,
}

/// Validate a conditional rule against the question it depends on.
///
/// The dependency must be evaluated before this question in display
/// sequence, so its order must be strictly smaller.
pub fn validate_conditional(
    own_order: i32,
    dependency_order: i32,
) -> Result<(), CoreError> {
    if dependency_order >= own_order {
        return Err(CoreError::Validation(format!(
            "conditional dependency must have a smaller display order \
             (dependency order {dependency_order}, question order {own_order})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_types() {
        assert_eq!(QuestionType::parse("NPS"), Some(QuestionType::Nps));
        assert_eq!(
            QuestionType::parse("RATING_1_5"),
            Some(QuestionType::Rating1To5)
        );
        assert_eq!(
            QuestionType::parse("MULTIPLE_CHOICE"),
            Some(QuestionType::MultipleChoice)
        );
    }

    #[test]
    fn parse_unknown_type() {
        assert_eq!(QuestionType::parse("LIKERT_7"), None);
    }

    #[test]
    fn round_trip_as_str() {
        for s in [
            "NPS",
            "RATING_1_5",
            "COMPARISON",
            "TEXT_SHORT",
            "TEXT_LONG",
            "MULTIPLE_CHOICE",
            "SINGLE_CHOICE",
        ] {
            assert_eq!(QuestionType::parse(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn unknown_operator_deserializes_to_unknown() {
        let logic: ConditionalLogic = serde_json::from_value(serde_json::json!({
            "depends_on": 1,
            "condition": "!=",
            "value": 5,
        }))
        .unwrap();
        assert_eq!(logic.condition, ConditionOp::Unknown);
    }

    #[test]
    fn known_operators_deserialize() {
        for (raw, op) in [
            ("<", ConditionOp::Lt),
            ("<=", ConditionOp::Le),
            ("==", ConditionOp::Eq),
            (">=", ConditionOp::Ge),
            (">", ConditionOp::Gt),
        ] {
            let logic: ConditionalLogic = serde_json::from_value(serde_json::json!({
                "depends_on": 7,
                "condition": raw,
                "value": "8",
            }))
            .unwrap();
            assert_eq!(logic.condition, op);
        }
    }

    #[test]
    fn conditional_must_depend_on_earlier_question() {
        assert!(validate_conditional(2, 1).is_ok());
        assert!(validate_conditional(1, 1).is_err());
        assert!(validate_conditional(1, 2).is_err());
    }
}
