use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::analysis::{
    DepartmentAnalysisRow, EmployeeRankingRow, JoinMisses, ShiftCostRow, WorkPatternRow,
};
use crate::error::{Error, Result};
use crate::ingest::RejectedRows;
use crate::storage::LoadReport;

/// Everything that was skipped, deduplicated or flagged during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub rejected: RejectedRows,
    pub load: LoadReport,
    pub join_misses: JoinMisses,
}

impl Diagnostics {
    /// Log a one-line warning for each non-empty category.
    pub fn log(&self) {
        if self.rejected.total() > 0 {
            log::warn!(
                "skipped unparseable rows: {} employees, {} attendance, {} performance",
                self.rejected.employees,
                self.rejected.attendance,
                self.rejected.performance
            );
        }
        if self.load.malformed_intervals > 0 {
            log::warn!(
                "{} shifts end before they start and were excluded",
                self.load.malformed_intervals
            );
        }
        if self.load.wrapped_intervals > 0 {
            log::info!("{} shifts treated as overnight", self.load.wrapped_intervals);
        }
        if self.join_misses.orphan_attendance > 0 {
            log::warn!(
                "{} attendance rows reference unknown employees {:?}",
                self.join_misses.orphan_attendance,
                self.join_misses.orphan_emp_ids
            );
        }
        if !self.join_misses.departments_without_target.is_empty() {
            log::warn!(
                "departments without a performance target: {}",
                self.join_misses.departments_without_target.join(", ")
            );
        }
        if !self.join_misses.targets_without_department.is_empty() {
            log::warn!(
                "performance targets without employees: {}",
                self.join_misses.targets_without_department.join(", ")
            );
        }
    }
}

/// Headline figures for the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_labor_cost: i64,
    pub total_hours: i64,
    pub avg_target_achievement_rate: Option<f64>,
    /// Highest computable efficiency index.
    pub best_department: Option<String>,
    pub best_efficiency_index: Option<f64>,
    /// Attendance rows read, including rejected ones.
    pub rows_processed: u64,
    pub elapsed_ms: u64,
}

impl ReportSummary {
    pub fn from_departments(
        departments: &[DepartmentAnalysisRow],
        rows_processed: u64,
        elapsed_ms: u64,
    ) -> Self {
        let avg_target_achievement_rate = if departments.is_empty() {
            None
        } else {
            let sum: f64 = departments.iter().map(|d| d.target_achievement_rate).sum();
            Some(sum / departments.len() as f64)
        };
        let best = departments.iter().find(|d| d.efficiency_index.is_some());

        Self {
            total_labor_cost: departments.iter().map(|d| d.total_labor_cost).sum(),
            total_hours: departments.iter().map(|d| d.total_hours).sum(),
            avg_target_achievement_rate,
            best_department: best.map(|d| d.department.clone()),
            best_efficiency_index: best.and_then(|d| d.efficiency_index),
            rows_processed,
            elapsed_ms,
        }
    }
}

/// The tables a presentation layer needs, produced by one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub summary: ReportSummary,
    pub departments: Vec<DepartmentAnalysisRow>,
    pub employee_ranking: Vec<EmployeeRankingRow>,
    pub work_patterns: Vec<WorkPatternRow>,
    /// Present only when the run was asked for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_costs: Option<Vec<ShiftCostRow>>,
    pub diagnostics: Diagnostics,
    /// The SQL that produced `departments`.
    pub department_analysis_sql: String,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Other(e.to_string()))
    }

    /// Write each table as a CSV file into `dir`, returning the paths written.
    /// `shift_costs.csv` is written only when the report carries shift costs.
    pub fn write_csv_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut files = vec![
            ("department_analysis.csv", to_csv(&self.departments)?),
            ("employee_ranking.csv", to_csv(&self.employee_ranking)?),
            ("work_patterns.csv", to_csv(&self.work_patterns)?),
        ];
        if let Some(costs) = &self.shift_costs {
            files.push(("shift_costs.csv", to_csv(costs)?));
        }
        let mut written = Vec::with_capacity(files.len());
        for (name, body) in files {
            let path = dir.join(name);
            std::fs::write(&path, body)?;
            log::info!("wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

/// Serialize rows as CSV with a header line. An empty slice yields an empty string.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(buf)
}

pub fn write_csv<T: Serialize, W: io::Write>(rows: &[T], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
