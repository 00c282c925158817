//! Full runs from CSV files on disk, checked against hand-computed totals.

use std::path::Path;

use logichr::{AnalysisContext, AnalysisOptions, Error};

// Two departments, three employees each, Monday 2024-01-01 through Friday 2024-01-05.
//
// Sales
//   101  15,000/h  09:00-18:00 x5            = 45.00h   675,000
//   102  25,000/h  08:30-17:30 x4, Fri open  = 36.00h   900,000
//   103  40,000/h  09:00-17:15 x5            = 41.25h 1,650,000
//                                     total 122.25h 3,225,000
// Engineering
//   201  15,000/h  09:00-19:30 x5            = 52.50h   787,500
//   202  25,000/h  08:45-18:00 x5            = 46.25h 1,156,250
//   203  60,000/h  10:00-18:00 x5            = 40.00h 2,400,000
//                                     total 138.75h 4,343,750
const EMPLOYEES: &str = "\u{feff}emp_id,name,department,level,hourly_rate\n\
101,Kim Minjun,Sales,Junior,15000\n\
102,Lee Seoyeon,Sales,Senior,25000\n\
103,Park Jiho,Sales,Manager,40000\n\
201,Choi Yuna,Engineering,Junior,15000\n\
202,Jung Hyun,Engineering,Senior,25000\n\
203,Kang Doyun,Engineering,Director,60000\n";

const PERFORMANCE: &str = "department,target_achievement_rate,evaluation_period\n\
Sales,0.9,2024-01\n\
Engineering,1.1,2024-01\n";

fn attendance_csv() -> String {
    let shifts: [(i64, &str, &str); 6] = [
        (101, "09:00:00", "18:00:00"),
        (102, "08:30:00", "17:30:00"),
        (103, "09:00:00", "17:15:00"),
        (201, "09:00:00", "19:30:00"),
        (202, "08:45:00", "18:00:00"),
        (203, "10:00:00", "18:00:00"),
    ];
    let mut out = String::from("emp_id,date,check_in,check_out\n");
    for day in 1..=5 {
        for (emp_id, check_in, check_out) in shifts {
            // 102 forgot to punch out on Friday
            let check_out = if emp_id == 102 && day == 5 { "" } else { check_out };
            out.push_str(&format!("{emp_id},2024-01-0{day},{check_in},{check_out}\n"));
        }
    }
    out
}

fn write_inputs(dir: &Path, employees: &str) {
    std::fs::write(dir.join("employees.csv"), employees).unwrap();
    std::fs::write(dir.join("attendance.csv"), attendance_csv()).unwrap();
    std::fs::write(dir.join("performance.csv"), PERFORMANCE).unwrap();
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("efficiency index should be computable");
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

fn context() -> AnalysisContext {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), EMPLOYEES);
    AnalysisContext::from_dir(dir.path(), AnalysisOptions::default()).unwrap()
}

#[test]
fn department_totals_match_hand_computed_values() {
    let rows = context().department_analysis().unwrap();
    assert_eq!(rows.len(), 2);

    let sales = &rows[0];
    assert_eq!(sales.department, "Sales");
    assert_eq!(sales.active_headcount, 3);
    assert_eq!(sales.total_labor_cost, 3_225_000);
    // 122.25h truncated; 131 if the open Friday shift were counted as 9h
    assert_eq!(sales.total_hours, 122);
    assert_close(sales.efficiency_index, 27.91);

    let eng = &rows[1];
    assert_eq!(eng.department, "Engineering");
    assert_eq!(eng.active_headcount, 3);
    assert_eq!(eng.total_labor_cost, 4_343_750);
    assert_eq!(eng.total_hours, 138);
    assert_close(eng.efficiency_index, 25.32);
}

#[test]
fn department_rows_are_sorted_by_efficiency() {
    let rows = context().department_analysis().unwrap();
    assert!(rows
        .windows(2)
        .all(|w| w[0].efficiency_index >= w[1].efficiency_index));
}

#[test]
fn ranking_orders_by_valid_hours() {
    let ranking = context().employee_ranking().unwrap();
    let names: Vec<&str> = ranking.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Choi Yuna",
            "Jung Hyun",
            "Kim Minjun",
            "Park Jiho",
            "Kang Doyun",
            "Lee Seoyeon"
        ]
    );
    assert_eq!(ranking[0].total_hours, 52.5);
    assert_eq!(ranking[5].total_hours, 36.0);
    assert_eq!(ranking[5].level, "Senior");
}

#[test]
fn work_patterns_flag_engineering_overload() {
    let patterns = context().work_patterns().unwrap();
    assert_eq!(patterns.len(), 10);

    let eng: Vec<_> = patterns.iter().filter(|p| p.department == "Engineering").collect();
    assert_eq!(eng[0].day_of_week, "Monday");
    assert_eq!(eng[4].day_of_week, "Friday");
    assert!(eng.iter().all(|p| p.overload_risk && p.avg_hours == 9.25));

    let sales_friday = patterns
        .iter()
        .find(|p| p.department == "Sales" && p.day_of_week == "Friday")
        .unwrap();
    assert_eq!(sales_friday.record_count, 2);
    assert_eq!(sales_friday.avg_hours, 8.625);
    assert!(!sales_friday.overload_risk);
}

#[test]
fn shift_costs_cover_only_valid_records() {
    let costs = context().shift_costs().unwrap();
    assert_eq!(costs.len(), 29);
    let total: f64 = costs.iter().map(|c| c.daily_cost).sum();
    assert_eq!(total, 3_225_000.0 + 4_343_750.0);
}

#[test]
fn report_summary_and_diagnostics() {
    let report = context().run().unwrap();
    assert_eq!(report.summary.total_labor_cost, 7_568_750);
    assert_eq!(report.summary.best_department.as_deref(), Some("Sales"));
    assert_eq!(report.summary.rows_processed, 30);
    assert_eq!(report.diagnostics.load.missing_punch, 1);
    assert_eq!(report.diagnostics.join_misses.orphan_attendance, 0);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["departments"][0]["department"], "Sales");
    assert!(json["department_analysis_sql"]
        .as_str()
        .unwrap()
        .contains("WITH dept_stats AS"));
}

#[test]
fn report_exports_csv_tables() {
    let report = context().run().unwrap();
    let out = tempfile::tempdir().unwrap();
    let written = report.write_csv_dir(out.path()).unwrap();
    assert_eq!(written.len(), 3);

    let departments = std::fs::read_to_string(out.path().join("department_analysis.csv")).unwrap();
    let mut lines = departments.lines();
    assert_eq!(
        lines.next(),
        Some("department,active_headcount,total_hours,total_labor_cost,target_achievement_rate,efficiency_index")
    );
    let sales: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(sales[..5], ["Sales", "3", "122", "3225000", "0.9"]);
    assert_close(sales[5].parse().ok(), 27.91);
}

#[test]
fn report_exports_shift_costs_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), EMPLOYEES);
    let ctx = AnalysisContext::from_dir(dir.path(), AnalysisOptions::new().with_shift_costs()).unwrap();
    let report = ctx.run().unwrap();

    let out = tempfile::tempdir().unwrap();
    let written = report.write_csv_dir(out.path()).unwrap();
    assert_eq!(written.len(), 4);
    let costs = std::fs::read_to_string(out.path().join("shift_costs.csv")).unwrap();
    // header plus 29 valid shifts
    assert_eq!(costs.lines().count(), 30);
    assert!(costs.starts_with("emp_id,name,department,level,date,"));

    // absent from JSON unless asked for
    let plain = context().run().unwrap();
    let json: serde_json::Value = serde_json::from_str(&plain.to_json().unwrap()).unwrap();
    assert!(json.get("shift_costs").is_none());
}

#[test]
fn missing_hourly_rate_aborts_before_any_query() {
    let dir = tempfile::tempdir().unwrap();
    let without_rate: String = EMPLOYEES
        .lines()
        .map(|line| {
            let mut cols: Vec<&str> = line.split(',').collect();
            cols.pop();
            cols.join(",") + "\n"
        })
        .collect();
    write_inputs(dir.path(), &without_rate);

    match AnalysisContext::from_dir(dir.path(), AnalysisOptions::default()) {
        Err(Error::Schema { dataset, missing }) => {
            assert_eq!(dataset, "employees");
            assert_eq!(missing, vec!["hourly_rate".to_string()]);
        }
        Err(other) => panic!("expected schema error, got {other}"),
        Ok(_) => panic!("expected schema error"),
    }
}

#[test]
fn evaluation_period_filter_drops_other_periods() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), EMPLOYEES);
    let ctx = AnalysisContext::from_dir(
        dir.path(),
        AnalysisOptions::new().evaluation_period("2023-12"),
    )
    .unwrap();
    assert!(ctx.department_analysis().unwrap().is_empty());
    let diagnostics = ctx.diagnostics().unwrap();
    assert_eq!(diagnostics.load.inactive_targets, 2);
    assert_eq!(
        diagnostics.join_misses.departments_without_target,
        vec!["Engineering", "Sales"]
    );
}
