use rusqlite::{params, Connection};

use super::types::WorkPatternRow;

/// Average valid hours per (department, weekday), Monday first.
pub const WORK_PATTERN_SQL: &str = "\
SELECT
    e.department,
    w.name AS day_of_week,
    AVG(a.worked_seconds) / 3600.0 AS avg_hours,
    COUNT(*) AS record_count,
    AVG(a.worked_seconds) / 3600.0 > ?1 AS overload_risk
FROM attendance a
JOIN employees e ON e.emp_id = a.emp_id
JOIN dim_weekday w ON w.weekday = a.weekday
WHERE a.interval_status IN ('valid', 'wrapped')
GROUP BY e.department, w.weekday
ORDER BY e.department ASC, w.weekday ASC";

pub fn work_patterns(
    conn: &Connection,
    overload_threshold: f64,
) -> Result<Vec<WorkPatternRow>, rusqlite::Error> {
    let mut stmt = conn.prepare(WORK_PATTERN_SQL)?;
    let rows = stmt.query_map(params![overload_threshold], |row| {
        Ok(WorkPatternRow {
            department: row.get(0)?,
            day_of_week: row.get(1)?,
            avg_hours: row.get(2)?,
            record_count: row.get::<_, i64>(3)? as u64,
            overload_risk: row.get::<_, i32>(4)? != 0,
        })
    })?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisOptions;
    use crate::ingest::{AttendanceRecord, Datasets, Employee};
    use crate::storage::Store;
    use chrono::{NaiveDate, NaiveTime};

    // 2024-01-01 is a Monday.
    fn shift(emp_id: i64, day: u32, start: u32, end: u32) -> AttendanceRecord {
        AttendanceRecord::new(
            emp_id,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            NaiveTime::from_hms_opt(start, 0, 0),
            NaiveTime::from_hms_opt(end, 0, 0),
        )
    }

    fn store() -> Store {
        let employees = vec![
            Employee::new(1, "Kim", "Sales", "Junior", 15000.0),
            Employee::new(2, "Park", "Sales", "Senior", 25000.0),
            Employee::new(3, "Choi", "Engineering", "Manager", 40000.0),
        ];
        let attendance = vec![
            // Sales: Friday averages 10h, Monday 8h
            shift(1, 5, 8, 18),
            shift(2, 5, 8, 18),
            shift(1, 1, 9, 17),
            // Sunday before Monday in the calendar, after it in the week
            shift(3, 7, 9, 19),
            shift(3, 1, 9, 18),
            // open shift ignored
            AttendanceRecord::new(
                3,
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0),
                None,
            ),
        ];
        let mut store = Store::open_memory().unwrap();
        store
            .load(&Datasets::new(employees, attendance, vec![]), &AnalysisOptions::default())
            .unwrap();
        store
    }

    #[test]
    fn test_grouping_and_canonical_weekday_order() {
        let rows = work_patterns(store().conn(), 9.0).unwrap();
        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.department.as_str(), r.day_of_week.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Engineering", "Monday"),
                ("Engineering", "Sunday"),
                ("Sales", "Monday"),
                ("Sales", "Friday"),
            ]
        );
    }

    #[test]
    fn test_overload_flag_uses_threshold() {
        let rows = work_patterns(store().conn(), 9.0).unwrap();
        let sales_friday = rows
            .iter()
            .find(|r| r.department == "Sales" && r.day_of_week == "Friday")
            .unwrap();
        assert_eq!(sales_friday.avg_hours, 10.0);
        assert_eq!(sales_friday.record_count, 2);
        assert!(sales_friday.overload_risk);

        // exactly at the threshold is not overload
        let eng_monday = rows
            .iter()
            .find(|r| r.department == "Engineering" && r.day_of_week == "Monday")
            .unwrap();
        assert_eq!(eng_monday.avg_hours, 9.0);
        assert!(!eng_monday.overload_risk);

        let relaxed = work_patterns(store().conn(), 12.0).unwrap();
        assert!(relaxed.iter().all(|r| !r.overload_risk));
    }
}
