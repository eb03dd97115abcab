//! Weighted multi-dimension evidence evaluation.
//!
//! Scoring policy (all thresholds are explicit constants, not hidden
//! heuristics):
//! - Dimension status: >= 80 pass, >= 50 warning, else fail.
//! - Overall: weighted dimension fractions scaled to 0-100; any critical
//!   issue fails; a failing dimension fails the whole evaluation only when
//!   the overall score is also below the fail floor; anything short of a
//!   clean pass is a warning.

mod dimensions;
mod evaluator;
mod persist;

pub use evaluator::EvidenceEvaluator;

/// Dimension weights. They sum to exactly 1.0.
pub const WEIGHT_COMPLETENESS: f64 = 0.30;
pub const WEIGHT_REQUIREMENTS: f64 = 0.30;
pub const WEIGHT_QUALITY: f64 = 0.20;
pub const WEIGHT_CONTROL_ALIGNMENT: f64 = 0.20;

/// Dimension score thresholds (points out of 100).
pub const DIMENSION_PASS_THRESHOLD: f64 = 80.0;
pub const DIMENSION_WARN_THRESHOLD: f64 = 50.0;

/// Overall score thresholds (0-100).
pub const OVERALL_PASS_THRESHOLD: f64 = 70.0;
pub const OVERALL_FAIL_FLOOR: f64 = 50.0;

/// Dimensions scoring below this trigger a recommendation.
pub const RECOMMENDATION_THRESHOLD: f64 = 70.0;
