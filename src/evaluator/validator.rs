//! @ai:module:intent Schema validation of judge-graded records
//! @ai:module:layer domain
//! @ai:module:public_api validate_record, record_id, REQUIRED_FIELDS
//! @ai:module:stateless true

use crate::error::ValidationError;
use crate::evaluator::schema::{
    AccuracyDirection, Category, Domain, GradedRecord, Severity, StigmaTarget,
    WillingnessDirection,
};
use serde_json::{Map, Value};

/// Required keys in declaration order. Presence is checked for all of them
/// before any type, range or enum check.
pub const REQUIRED_FIELDS: [&str; 12] = [
    "id",
    "domain",
    "accuracy",
    "stigma",
    "willingness",
    "dir_acc",
    "acc_severity",
    "target_stigma",
    "stigma_severity",
    "dir_willing",
    "confidence",
    "evidence",
];

/// @ai:intent Validate a candidate record and build the typed record from it
/// @ai:pre none, any JSON value is accepted as input
/// @ai:post Ok only if every field is present, typed and in range; Err carries the first violation
/// @ai:effects pure
pub fn validate_record(value: &Value) -> Result<GradedRecord, ValidationError> {
    let obj = value.as_object().ok_or(ValidationError::WrongType {
        field: "record",
        expected: "JSON object",
    })?;

    if let Some(field) = REQUIRED_FIELDS.iter().find(|f| !obj.contains_key(**f)) {
        return Err(ValidationError::MissingField { field: *field });
    }

    let id = record_id(value).ok_or(ValidationError::WrongType {
        field: "id",
        expected: "string or number",
    })?;

    let domain = match &obj["domain"] {
        Value::String(s) => {
            Domain::parse(s).ok_or_else(|| ValidationError::UnknownDomain { value: s.clone() })?
        }
        _ => {
            return Err(ValidationError::WrongType {
                field: "domain",
                expected: "string",
            })
        }
    };

    let accuracy = bounded(obj, "accuracy", 0.0, 2.0)?;
    let stigma = bounded(obj, "stigma", 0.0, 2.0)?;
    let willingness = bounded(obj, "willingness", 0.0, 2.0)?;
    let dir_acc: AccuracyDirection = category(obj, "dir_acc")?;
    let acc_severity: Severity = category(obj, "acc_severity")?;
    let target_stigma: StigmaTarget = category(obj, "target_stigma")?;
    let stigma_severity: Severity = category(obj, "stigma_severity")?;
    let dir_willing: WillingnessDirection = category(obj, "dir_willing")?;
    let confidence = bounded(obj, "confidence", 0.0, 1.0)?;

    let evidence = obj["evidence"]
        .as_str()
        .ok_or(ValidationError::WrongType {
            field: "evidence",
            expected: "string",
        })?
        .to_string();

    Ok(GradedRecord {
        id,
        domain,
        accuracy,
        stigma,
        willingness,
        dir_acc,
        acc_severity,
        target_stigma,
        stigma_severity,
        dir_willing,
        confidence,
        evidence,
    })
}

/// @ai:intent Opaque identifier of a JSON record, numbers stringified
/// @ai:effects pure
pub fn record_id(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn bounded(
    obj: &Map<String, Value>,
    field: &'static str,
    min: f64,
    max: f64,
) -> Result<f64, ValidationError> {
    let value = obj[field]
        .as_f64()
        .ok_or(ValidationError::NotNumeric { field })?;

    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange { field, min, max });
    }

    Ok(value)
}

fn category<C: Category>(obj: &Map<String, Value>, field: &'static str) -> Result<C, ValidationError> {
    let raw = &obj[field];

    raw.as_str()
        .and_then(C::parse)
        .ok_or_else(|| ValidationError::InvalidCategory {
            field,
            value: match raw {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_valid() -> Value {
        json!({
            "id": "m-001",
            "domain": "marginalised",
            "accuracy": 1.5,
            "stigma": 0.5,
            "willingness": 2.0,
            "dir_acc": "neutral",
            "acc_severity": "minor",
            "target_stigma": "none",
            "stigma_severity": "moderate",
            "dir_willing": "neutral",
            "confidence": 0.7,
            "evidence": "short note"
        })
    }

    fn reason(value: &Value) -> String {
        validate_record(value).unwrap_err().to_string()
    }

    #[test]
    fn test_accepts_valid_record() {
        let record = validate_record(&make_valid()).unwrap();
        assert_eq!(record.id, "m-001");
        assert_eq!(record.domain, Domain::Marginalised);
        assert_eq!(record.acc_severity, Severity::Minor);
        assert_eq!(record.stigma_severity, Severity::Moderate);
        assert!((record.confidence - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let mut value = make_valid();
        value["id"] = json!(42);
        assert_eq!(validate_record(&value).unwrap().id, "42");
    }

    #[test]
    fn test_flags_missing_key() {
        let mut value = make_valid();
        value.as_object_mut().unwrap().remove("confidence");
        assert_eq!(reason(&value), "missing key: confidence");
    }

    #[test]
    fn test_presence_checked_before_range() {
        let mut value = make_valid();
        value["accuracy"] = json!(5.0);
        value.as_object_mut().unwrap().remove("evidence");
        assert_eq!(reason(&value), "missing key: evidence");
    }

    #[test]
    fn test_range_checks_follow_declaration_order() {
        let mut value = make_valid();
        value["willingness"] = json!(-1);
        value["accuracy"] = json!(3.0);
        assert_eq!(reason(&value), "accuracy out of range 0..2");
    }

    #[test]
    fn test_rejection_reason_is_deterministic() {
        let mut value = make_valid();
        value["accuracy"] = json!(5.0);
        let first = reason(&value);
        for _ in 0..10 {
            assert_eq!(reason(&value), first);
        }
        assert_eq!(first, "accuracy out of range 0..2");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let mut value = make_valid();
        value["accuracy"] = json!(0);
        value["stigma"] = json!(2);
        value["confidence"] = json!(1.0);
        assert!(validate_record(&value).is_ok());
    }

    #[test]
    fn test_confidence_range() {
        let mut value = make_valid();
        value["confidence"] = json!(1.5);
        assert_eq!(reason(&value), "confidence out of range 0..1");
    }

    #[test]
    fn test_string_number_is_not_coerced() {
        let mut value = make_valid();
        value["stigma"] = json!("1.0");
        assert_eq!(reason(&value), "stigma not numeric");
    }

    #[test]
    fn test_unknown_domain_rejected() {
        let mut value = make_valid();
        value["domain"] = json!("marginalized");
        assert_eq!(reason(&value), "unknown domain 'marginalized'");
    }

    #[test]
    fn test_invalid_category_value() {
        let mut value = make_valid();
        value["target_stigma"] = json!("elites");
        assert_eq!(reason(&value), "target_stigma has invalid value 'elites'");

        value["target_stigma"] = json!(3);
        assert_eq!(reason(&value), "target_stigma has invalid value '3'");
    }

    #[test]
    fn test_non_object_rejected() {
        assert_eq!(reason(&json!([1, 2])), "record must be a JSON object");
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let mut value = make_valid();
        value["prompt"] = json!("Describe...");
        value["response"] = json!("...");
        assert!(validate_record(&value).is_ok());
    }
}
