use rusqlite::Connection;

use super::types::JoinMisses;

const ORPHAN_SAMPLE: i64 = 5;

/// Count the rows and departments that the inner joins silently drop.
pub fn join_misses(conn: &Connection) -> Result<JoinMisses, rusqlite::Error> {
    let orphan_attendance: i64 = conn.query_row(
        "SELECT COUNT(*) FROM attendance a
         WHERE NOT EXISTS (SELECT 1 FROM employees e WHERE e.emp_id = a.emp_id)",
        [],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT DISTINCT a.emp_id FROM attendance a
         WHERE NOT EXISTS (SELECT 1 FROM employees e WHERE e.emp_id = a.emp_id)
         ORDER BY a.emp_id
         LIMIT ?1",
    )?;
    let orphan_emp_ids = stmt
        .query_map([ORPHAN_SAMPLE], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;

    let departments_without_target = strings(
        conn,
        "SELECT DISTINCT e.department FROM employees e
         WHERE NOT EXISTS (SELECT 1 FROM performance p WHERE p.department = e.department)
         ORDER BY e.department",
    )?;

    let targets_without_department = strings(
        conn,
        "SELECT p.department FROM performance p
         WHERE NOT EXISTS (SELECT 1 FROM employees e WHERE e.department = p.department)
         ORDER BY p.department",
    )?;

    Ok(JoinMisses {
        orphan_attendance: orphan_attendance as u64,
        orphan_emp_ids,
        departments_without_target,
        targets_without_department,
    })
}

fn strings(conn: &Connection, sql: &str) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    rows.collect()
}
