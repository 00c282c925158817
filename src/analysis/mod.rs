//! Aggregate queries over a loaded [`Store`](crate::storage::Store).
//!
//! Each query is a single SQL statement kept as a public constant so that the
//! exact computation can be displayed next to its result.

pub mod cost;
pub mod department;
pub mod diagnostics;
pub mod pattern;
pub mod ranking;
pub mod types;

pub use cost::{shift_costs, SHIFT_COST_SQL};
pub use department::{department_analysis, DEPARTMENT_ANALYSIS_SQL};
pub use diagnostics::join_misses;
pub use pattern::{work_patterns, WORK_PATTERN_SQL};
pub use ranking::{employee_ranking, EMPLOYEE_RANKING_SQL};
pub use types::*;
