use rusqlite::{params, Connection};

use super::types::EmployeeRankingRow;

/// Employees by total valid hours, highest first; equal totals by emp_id.
pub const EMPLOYEE_RANKING_SQL: &str = "\
SELECT
    e.name,
    e.department,
    e.level,
    SUM(a.worked_seconds) / 3600.0 AS total_hours
FROM attendance a
JOIN employees e ON e.emp_id = a.emp_id
WHERE a.interval_status IN ('valid', 'wrapped')
GROUP BY e.emp_id
ORDER BY SUM(a.worked_seconds) DESC, e.emp_id ASC
LIMIT ?1";

pub fn employee_ranking(
    conn: &Connection,
    limit: u32,
) -> Result<Vec<EmployeeRankingRow>, rusqlite::Error> {
    let mut stmt = conn.prepare(EMPLOYEE_RANKING_SQL)?;
    let rows = stmt.query_map(params![limit as i64], |row| {
        Ok(EmployeeRankingRow {
            name: row.get(0)?,
            department: row.get(1)?,
            level: row.get(2)?,
            total_hours: row.get(3)?,
        })
    })?;
    rows.collect()
}
