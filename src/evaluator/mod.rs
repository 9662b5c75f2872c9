//! @ai:module:intent Graded-record schema, record validation and the LLM judge
//! @ai:module:layer application
//! @ai:module:public_api GradedRecord, Domain, validate_record, record_id, Grader

pub mod grader;
pub mod schema;
pub mod validator;

pub use grader::{extract_json, judge_temperature, merge_grade, Grader, GradingStats};
pub use schema::{
    AccuracyDirection, Category, Domain, GradedRecord, Severity, StigmaTarget, WillingnessDirection,
};
pub use validator::{record_id, validate_record, REQUIRED_FIELDS};
