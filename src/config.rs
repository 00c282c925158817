use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::{Error, Result};

pub const DEFAULT_OVERLOAD_THRESHOLD: f64 = 9.0;
pub const DEFAULT_RANKING_LIMIT: u32 = 10;

/// What to do with an attendance row whose emp_id is not on the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinMissPolicy {
    /// Drop the row from every aggregate and count it in diagnostics.
    #[default]
    Skip,
    /// Fail the run.
    Strict,
}

/// How to treat a check-out earlier than the check-in on the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OvernightPolicy {
    /// Flag the row as malformed and exclude it.
    #[default]
    Reject,
    /// Treat the check-out as belonging to the following day.
    Wrap,
}

impl fmt::Display for OvernightPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OvernightPolicy::Reject => write!(f, "reject"),
            OvernightPolicy::Wrap => write!(f, "wrap"),
        }
    }
}

/// Options for a single analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOptions {
    /// Average daily hours above which a (department, weekday) pair is flagged.
    pub overload_threshold: f64,
    /// Number of rows in the employee ranking.
    pub ranking_limit: u32,
    pub join_miss: JoinMissPolicy,
    pub overnight: OvernightPolicy,
    /// Only performance targets with this `evaluation_period` are active.
    pub evaluation_period: Option<String>,
    /// Carry the per-record shift cost table in the report.
    pub include_shift_costs: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            overload_threshold: DEFAULT_OVERLOAD_THRESHOLD,
            ranking_limit: DEFAULT_RANKING_LIMIT,
            join_miss: JoinMissPolicy::default(),
            overnight: OvernightPolicy::default(),
            evaluation_period: None,
            include_shift_costs: false,
        }
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overload_threshold(mut self, hours: f64) -> Self {
        self.overload_threshold = hours;
        self
    }

    pub fn ranking_limit(mut self, n: u32) -> Self {
        self.ranking_limit = n;
        self
    }

    pub fn strict(mut self) -> Self {
        self.join_miss = JoinMissPolicy::Strict;
        self
    }

    pub fn overnight(mut self, policy: OvernightPolicy) -> Self {
        self.overnight = policy;
        self
    }

    pub fn evaluation_period(mut self, label: &str) -> Self {
        self.evaluation_period = Some(label.to_string());
        self
    }

    pub fn with_shift_costs(mut self) -> Self {
        self.include_shift_costs = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.overload_threshold.is_finite() || self.overload_threshold < 0.0 {
            return Err(Error::Config(format!(
                "overload threshold must be a non-negative number of hours, got {}",
                self.overload_threshold
            )));
        }
        if self.ranking_limit == 0 {
            return Err(Error::Config("ranking limit must be at least 1".into()));
        }
        Ok(())
    }
}
