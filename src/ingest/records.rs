use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::date_util::{is_blank, parse_date, parse_time};

/// One roster row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    pub emp_id: i64,
    pub name: String,
    pub department: String,
    pub level: String,
    pub hourly_rate: f64,
}

/// One day's punches for one employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub emp_id: i64,
    pub date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
}

/// A department's achievement against target for an evaluation period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceTarget {
    pub department: String,
    pub target_achievement_rate: f64,
    pub evaluation_period: Option<String>,
}

impl Employee {
    pub fn new(emp_id: i64, name: &str, department: &str, level: &str, hourly_rate: f64) -> Self {
        Self {
            emp_id,
            name: name.to_string(),
            department: department.to_string(),
            level: level.to_string(),
            hourly_rate,
        }
    }
}

impl AttendanceRecord {
    pub fn new(
        emp_id: i64,
        date: NaiveDate,
        check_in: Option<NaiveTime>,
        check_out: Option<NaiveTime>,
    ) -> Self {
        Self {
            emp_id,
            date,
            check_in,
            check_out,
        }
    }
}

impl PerformanceTarget {
    pub fn new(department: &str, target_achievement_rate: f64) -> Self {
        Self {
            department: department.to_string(),
            target_achievement_rate,
            evaluation_period: None,
        }
    }

    pub fn with_period(mut self, label: &str) -> Self {
        self.evaluation_period = Some(label.to_string());
        self
    }
}

// ── Raw CSV rows ───────────────────────────────────────────────────
//
// Every cell is read as text and converted afterwards so that a bad cell
// rejects one row instead of the whole file.

#[derive(Debug, Deserialize)]
pub(crate) struct EmployeeRow {
    emp_id: String,
    name: String,
    department: String,
    level: String,
    hourly_rate: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttendanceRow {
    emp_id: String,
    date: String,
    check_in: Option<String>,
    check_out: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PerformanceRow {
    department: String,
    target_achievement_rate: String,
    #[serde(default)]
    evaluation_period: Option<String>,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = String;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let emp_id = parse_id(&row.emp_id)?;
        let hourly_rate = parse_number(&row.hourly_rate, "hourly_rate")?;
        if hourly_rate <= 0.0 {
            return Err(format!("hourly_rate must be positive, got {hourly_rate}"));
        }
        Ok(Employee {
            emp_id,
            name: row.name,
            department: row.department,
            level: row.level,
            hourly_rate,
        })
    }
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = String;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let emp_id = parse_id(&row.emp_id)?;
        let date = parse_date(&row.date).ok_or_else(|| format!("invalid date '{}'", row.date))?;
        Ok(AttendanceRecord {
            emp_id,
            date,
            check_in: parse_punch(row.check_in.as_deref(), "check_in")?,
            check_out: parse_punch(row.check_out.as_deref(), "check_out")?,
        })
    }
}

impl TryFrom<PerformanceRow> for PerformanceTarget {
    type Error = String;

    fn try_from(row: PerformanceRow) -> Result<Self, Self::Error> {
        if row.department.is_empty() {
            return Err("empty department".into());
        }
        let rate = parse_number(&row.target_achievement_rate, "target_achievement_rate")?;
        Ok(PerformanceTarget {
            department: row.department,
            target_achievement_rate: rate,
            evaluation_period: row.evaluation_period.filter(|p| !is_blank(p)),
        })
    }
}

/// Integer ids, tolerating the `1001.0` form float-typed exports produce.
fn parse_id(s: &str) -> Result<i64, String> {
    let s = s.trim();
    if let Ok(id) = s.parse::<i64>() {
        return Ok(id);
    }
    match s.parse::<f64>() {
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
        Ok(f) if f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&f) => {
            Ok(f as i64)
        }
        _ => Err(format!("invalid emp_id '{s}'")),
    }
}

fn parse_number(s: &str, column: &str) -> Result<f64, String> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("invalid {column} '{s}'")),
    }
}

fn parse_punch(cell: Option<&str>, column: &str) -> Result<Option<NaiveTime>, String> {
    match cell {
        None => Ok(None),
        Some(s) if is_blank(s) => Ok(None),
        Some(s) => parse_time(s)
            .map(Some)
            .ok_or_else(|| format!("invalid {column} '{s}'")),
    }
}
