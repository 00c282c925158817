use rusqlite::{params, Connection};

use crate::date_util::weekday_number;
use crate::ingest::{AttendanceRecord, Employee, PerformanceTarget};
use crate::interval::Interval;
use chrono::Datelike;

// ── Employees ──────────────────────────────────────────────────────

/// Insert a roster row. Returns false when the emp_id is already present.
pub fn insert_employee(conn: &Connection, employee: &Employee) -> Result<bool, rusqlite::Error> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO employees (emp_id, name, department, level, hourly_rate)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            employee.emp_id,
            employee.name,
            employee.department,
            employee.level,
            employee.hourly_rate,
        ],
    )?;
    Ok(changed > 0)
}

// ── Attendance ─────────────────────────────────────────────────────

pub fn insert_attendance(
    conn: &Connection,
    record: &AttendanceRecord,
    interval: &Interval,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO attendance (
            emp_id, work_date, weekday, check_in, check_out, interval_status, worked_seconds
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.emp_id,
            record.date.format("%Y-%m-%d").to_string(),
            weekday_number(record.date.weekday()),
            record.check_in.map(|t| t.format("%H:%M:%S").to_string()),
            record.check_out.map(|t| t.format("%H:%M:%S").to_string()),
            interval.status.as_str(),
            interval.seconds,
        ],
    )?;
    Ok(())
}

// ── Performance ────────────────────────────────────────────────────

/// Insert a target. Returns false when the department already has one.
pub fn insert_target(conn: &Connection, target: &PerformanceTarget) -> Result<bool, rusqlite::Error> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO performance (department, target_achievement_rate, evaluation_period)
         VALUES (?1, ?2, ?3)",
        params![
            target.department,
            target.target_achievement_rate,
            target.evaluation_period,
        ],
    )?;
    Ok(changed > 0)
}
