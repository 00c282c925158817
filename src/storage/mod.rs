pub mod repository;
pub mod schema;

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};
use serde::Serialize;

use crate::config::AnalysisOptions;
use crate::error::Result;
use crate::ingest::Datasets;
use crate::interval::{Interval, IntervalStatus};

/// What the loader kept, dropped and flagged while filling the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub employees: u64,
    pub attendance: u64,
    pub targets: u64,
    pub duplicate_employees: u64,
    /// Targets ignored because another row for the department came first.
    pub duplicate_targets: u64,
    /// Targets outside the configured evaluation period.
    pub inactive_targets: u64,
    pub missing_punch: u64,
    pub malformed_intervals: u64,
    pub wrapped_intervals: u64,
}

/// Private in-memory SQLite store for a single analysis run.
///
/// Each store owns its own connection; nothing is shared between runs and the
/// data disappears when the store is dropped.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open an empty in-memory store with the schema applied.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        let migrations = Migrations::new(vec![M::up(include_str!("migrations/001_initial.sql"))]);
        migrations.to_latest(&mut conn)?;
        schema::ensure_dim_weekday(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Load the three datasets in one transaction.
    pub fn load(&mut self, datasets: &Datasets, options: &AnalysisOptions) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        let tx = self.conn.transaction()?;

        for employee in &datasets.employees {
            if repository::insert_employee(&tx, employee)? {
                report.employees += 1;
            } else {
                log::warn!("duplicate emp_id {} ignored", employee.emp_id);
                report.duplicate_employees += 1;
            }
        }

        for record in &datasets.attendance {
            let interval = Interval::resolve(
                record.date,
                record.check_in,
                record.check_out,
                options.overnight,
            );
            match interval.status {
                IntervalStatus::Valid => {}
                IntervalStatus::Wrapped => report.wrapped_intervals += 1,
                IntervalStatus::MissingPunch => report.missing_punch += 1,
                IntervalStatus::Malformed => {
                    log::warn!(
                        "emp_id {} on {}: check-out before check-in, excluded",
                        record.emp_id,
                        record.date
                    );
                    report.malformed_intervals += 1;
                }
            }
            repository::insert_attendance(&tx, record, &interval)?;
            report.attendance += 1;
        }

        for target in &datasets.performance {
            if let Some(ref period) = options.evaluation_period {
                if target.evaluation_period.as_deref() != Some(period.as_str()) {
                    report.inactive_targets += 1;
                    continue;
                }
            }
            if repository::insert_target(&tx, target)? {
                report.targets += 1;
            } else {
                log::warn!(
                    "duplicate performance target for '{}' ignored",
                    target.department
                );
                report.duplicate_targets += 1;
            }
        }

        tx.commit()?;
        log::info!(
            "loaded {} employees, {} attendance rows, {} targets",
            report.employees,
            report.attendance,
            report.targets
        );
        if report.missing_punch > 0 {
            log::info!("{} attendance rows lack a punch and are excluded", report.missing_punch);
        }
        Ok(report)
    }
}
