use serde::Serialize;

/// Labor cost of one valid attendance record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftCostRow {
    pub emp_id: i64,
    pub name: String,
    pub department: String,
    pub level: String,
    pub date: String,
    pub check_in: String,
    pub check_out: String,
    pub hourly_rate: f64,
    pub hours_worked: f64,
    pub daily_cost: f64,
}

/// Cost and performance roll-up for one department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentAnalysisRow {
    pub department: String,
    /// Distinct employees with at least one valid attendance record.
    pub active_headcount: u64,
    /// Truncated to whole hours.
    pub total_hours: i64,
    /// Truncated to whole currency units.
    pub total_labor_cost: i64,
    pub target_achievement_rate: f64,
    /// `None` when the department has no labor cost and the ratio is not computable.
    pub efficiency_index: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRankingRow {
    pub name: String,
    pub department: String,
    pub level: String,
    pub total_hours: f64,
}

/// Average hours for a (department, weekday) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkPatternRow {
    pub department: String,
    pub day_of_week: String,
    pub avg_hours: f64,
    pub record_count: u64,
    pub overload_risk: bool,
}

/// Rows and departments that were left out of the aggregates, and why.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JoinMisses {
    /// Attendance rows whose emp_id is not on the roster.
    pub orphan_attendance: u64,
    /// Up to five of the unknown emp_ids, ascending.
    pub orphan_emp_ids: Vec<i64>,
    /// Roster departments with no active performance target.
    pub departments_without_target: Vec<String>,
    /// Targets for departments that have no employees.
    pub targets_without_department: Vec<String>,
}
