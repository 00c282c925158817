use rusqlite::Connection;

use super::types::DepartmentAnalysisRow;

/// Department cost and performance analysis.
///
/// Every roster department is aggregated over its valid shifts (a department
/// without any contributes zero hours and zero cost), then inner-joined with
/// the active performance targets. The efficiency index is NULL when the
/// department's labor cost is zero, and NULL rows sort last.
pub const DEPARTMENT_ANALYSIS_SQL: &str = "\
WITH dept_stats AS (
    SELECT
        e.department,
        COUNT(DISTINCT a.emp_id) AS active_headcount,
        COALESCE(SUM(a.worked_seconds), 0) / 3600.0 AS total_hours,
        COALESCE(SUM(a.worked_seconds * e.hourly_rate), 0) / 3600.0 AS total_labor_cost
    FROM employees e
    LEFT JOIN attendance a
        ON a.emp_id = e.emp_id
       AND a.interval_status IN ('valid', 'wrapped')
    GROUP BY e.department
)
SELECT
    d.department,
    d.active_headcount,
    CAST(d.total_hours AS INTEGER) AS total_hours,
    CAST(d.total_labor_cost AS INTEGER) AS total_labor_cost,
    p.target_achievement_rate,

    -- Efficiency index: achievement (%) per million of labor cost
    ROUND(
        (p.target_achievement_rate * 100) / (NULLIF(d.total_labor_cost, 0) / 1000000.0),
        2
    ) AS efficiency_index
FROM dept_stats d
JOIN performance p ON p.department = d.department
ORDER BY efficiency_index IS NULL, efficiency_index DESC, d.department ASC";

pub fn department_analysis(conn: &Connection) -> Result<Vec<DepartmentAnalysisRow>, rusqlite::Error> {
    let mut stmt = conn.prepare(DEPARTMENT_ANALYSIS_SQL)?;
    let rows = stmt.query_map([], |row| {
        Ok(DepartmentAnalysisRow {
            department: row.get(0)?,
            active_headcount: row.get::<_, i64>(1)? as u64,
            total_hours: row.get(2)?,
            total_labor_cost: row.get(3)?,
            target_achievement_rate: row.get(4)?,
            efficiency_index: row.get(5)?,
        })
    })?;
    rows.collect()
}
