use rusqlite::Connection;

use super::types::ShiftCostRow;

/// Per-record labor cost: valid shifts joined to the roster's hourly rate.
pub const SHIFT_COST_SQL: &str = "\
SELECT
    a.emp_id,
    e.name,
    e.department,
    e.level,
    a.work_date,
    a.check_in,
    a.check_out,
    e.hourly_rate,
    a.worked_seconds / 3600.0 AS hours_worked,
    a.worked_seconds * e.hourly_rate / 3600.0 AS daily_cost
FROM attendance a
JOIN employees e ON e.emp_id = a.emp_id
WHERE a.interval_status IN ('valid', 'wrapped')
ORDER BY a.record_id";

pub fn shift_costs(conn: &Connection) -> Result<Vec<ShiftCostRow>, rusqlite::Error> {
    let mut stmt = conn.prepare(SHIFT_COST_SQL)?;
    let rows = stmt.query_map([], |row| {
        Ok(ShiftCostRow {
            emp_id: row.get(0)?,
            name: row.get(1)?,
            department: row.get(2)?,
            level: row.get(3)?,
            date: row.get(4)?,
            check_in: row.get(5)?,
            check_out: row.get(6)?,
            hourly_rate: row.get(7)?,
            hours_worked: row.get(8)?,
            daily_cost: row.get(9)?,
        })
    })?;
    rows.collect()
}
