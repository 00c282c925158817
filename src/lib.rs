pub mod analysis;
pub mod config;
pub mod date_util;
pub mod error;
pub mod ingest;
pub mod interval;
pub mod report;
pub mod storage;

use std::path::Path;
use std::time::Instant;

pub use analysis::{
    DepartmentAnalysisRow, EmployeeRankingRow, JoinMisses, ShiftCostRow, WorkPatternRow,
};
pub use config::{AnalysisOptions, JoinMissPolicy, OvernightPolicy};
pub use error::{Error, Result};
pub use ingest::{AttendanceRecord, Datasets, Employee, PerformanceTarget, RawInputs};
pub use report::{AnalysisReport, Diagnostics, ReportSummary};
pub use storage::Store;

use ingest::RejectedRows;
use storage::LoadReport;

/// One analysis run: a private store holding the loaded datasets, plus the
/// options that govern every query against it.
///
/// Build a fresh context per run. Contexts share nothing.
pub struct AnalysisContext {
    store: Store,
    options: AnalysisOptions,
    load: LoadReport,
    rejected: RejectedRows,
}

impl AnalysisContext {
    /// Load typed datasets into a new in-memory store.
    ///
    /// Under [`JoinMissPolicy::Strict`] this fails if any attendance row
    /// references an emp_id that is not on the roster.
    pub fn new(datasets: Datasets, options: AnalysisOptions) -> Result<Self> {
        options.validate()?;
        let mut store = Store::open_memory()?;
        let load = store.load(&datasets, &options)?;

        if options.join_miss == JoinMissPolicy::Strict {
            let misses = analysis::join_misses(store.conn())?;
            if misses.orphan_attendance > 0 {
                return Err(Error::JoinMiss {
                    unmatched: misses.orphan_attendance,
                    sample: misses.orphan_emp_ids,
                });
            }
        }

        Ok(Self {
            store,
            options,
            load,
            rejected: datasets.rejected,
        })
    }

    /// Validate the raw tables (all three, before anything is loaded), then load.
    pub fn from_raw(raw: RawInputs, options: AnalysisOptions) -> Result<Self> {
        Self::new(raw.into_datasets()?, options)
    }

    /// Load `employees.csv`, `attendance.csv` and `performance.csv` from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>, options: AnalysisOptions) -> Result<Self> {
        Self::from_raw(RawInputs::from_dir(dir)?, options)
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Per-record hours and labor cost for every valid shift.
    pub fn shift_costs(&self) -> Result<Vec<ShiftCostRow>> {
        Ok(analysis::shift_costs(self.store.conn())?)
    }

    /// Department table ordered by efficiency index, best first.
    pub fn department_analysis(&self) -> Result<Vec<DepartmentAnalysisRow>> {
        Ok(analysis::department_analysis(self.store.conn())?)
    }

    /// The literal SQL behind [`department_analysis`](Self::department_analysis).
    pub fn department_analysis_sql(&self) -> &'static str {
        analysis::DEPARTMENT_ANALYSIS_SQL
    }

    /// Top employees by valid hours worked.
    pub fn employee_ranking(&self) -> Result<Vec<EmployeeRankingRow>> {
        Ok(analysis::employee_ranking(
            self.store.conn(),
            self.options.ranking_limit,
        )?)
    }

    /// Average hours per (department, weekday) with the overload flag applied.
    pub fn work_patterns(&self) -> Result<Vec<WorkPatternRow>> {
        Ok(analysis::work_patterns(
            self.store.conn(),
            self.options.overload_threshold,
        )?)
    }

    pub fn diagnostics(&self) -> Result<Diagnostics> {
        Ok(Diagnostics {
            rejected: self.rejected,
            load: self.load.clone(),
            join_misses: analysis::join_misses(self.store.conn())?,
        })
    }

    /// Run every query and assemble the report.
    pub fn run(&self) -> Result<AnalysisReport> {
        let started = Instant::now();
        let departments = self.department_analysis()?;
        let employee_ranking = self.employee_ranking()?;
        let work_patterns = self.work_patterns()?;
        let shift_costs = if self.options.include_shift_costs {
            Some(self.shift_costs()?)
        } else {
            None
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let diagnostics = self.diagnostics()?;
        diagnostics.log();

        let overloaded = work_patterns.iter().filter(|p| p.overload_risk).count();
        log::info!(
            "analysis finished in {elapsed_ms} ms: {} departments, {} ranked employees, {overloaded} overload patterns",
            departments.len(),
            employee_ranking.len()
        );

        let rows_processed = self.load.attendance + self.rejected.attendance;
        Ok(AnalysisReport {
            summary: ReportSummary::from_departments(&departments, rows_processed, elapsed_ms),
            departments,
            employee_ranking,
            work_patterns,
            shift_costs,
            diagnostics,
            department_analysis_sql: self.department_analysis_sql().to_string(),
        })
    }
}
