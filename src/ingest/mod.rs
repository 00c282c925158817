pub mod excel;
pub mod records;
pub mod validate;

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use records::{AttendanceRecord, Employee, PerformanceTarget};

use crate::error::Result;
use records::{AttendanceRow, EmployeeRow, PerformanceRow};

/// The three input datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Employees,
    Attendance,
    Performance,
}

impl DatasetKind {
    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Employees => "employees",
            DatasetKind::Attendance => "attendance",
            DatasetKind::Performance => "performance",
        }
    }

    /// File name used in a data directory (`employees.csv`, ...).
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name())
    }

    /// Path of this dataset inside `dir`: the CSV file if present, otherwise
    /// the first spreadsheet found, otherwise the CSV path so the open error
    /// names the expected file.
    pub fn locate(&self, dir: &Path) -> PathBuf {
        let csv = dir.join(self.file_name());
        if csv.is_file() {
            return csv;
        }
        excel::EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{ext}", self.name())))
            .find(|p| p.is_file())
            .unwrap_or(csv)
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dataset as read from CSV: normalized headers plus untyped records.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub kind: DatasetKind,
    pub headers: StringRecord,
    pub records: Vec<StringRecord>,
}

impl RawTable {
    pub fn from_reader<R: Read>(kind: DatasetKind, reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers: StringRecord = rdr.headers()?.iter().map(normalize_header).collect();
        let records = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;
        log::debug!("read {} {} rows", records.len(), kind);
        Ok(Self {
            kind,
            headers,
            records,
        })
    }

    /// Read a CSV file, or the first worksheet of a spreadsheet when the
    /// extension is one of [`excel::EXTENSIONS`].
    pub fn from_path(kind: DatasetKind, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if excel::is_spreadsheet(path) {
            return Self::from_xlsx(kind, path);
        }
        log::info!("loading {kind} from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(kind, file)
    }

    pub fn from_xlsx(kind: DatasetKind, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("loading {kind} from spreadsheet {}", path.display());
        let (headers, records) = excel::read_first_sheet(path)?;
        log::debug!("read {} {} rows", records.len(), kind);
        Ok(Self {
            kind,
            headers,
            records,
        })
    }

    /// Convert every record into `T`, skipping (and counting) rows that fail.
    fn convert<Row, T>(&self) -> (Vec<T>, u64)
    where
        Row: DeserializeOwned,
        T: TryFrom<Row, Error = String>,
    {
        let mut out = Vec::with_capacity(self.records.len());
        let mut rejected = 0;
        for (i, record) in self.records.iter().enumerate() {
            // +2: header line and 1-based numbering
            let line = i + 2;
            let parsed = record
                .deserialize::<Row>(Some(&self.headers))
                .map_err(|e| e.to_string())
                .and_then(T::try_from);
            match parsed {
                Ok(v) => out.push(v),
                Err(reason) => {
                    log::warn!("{} line {line}: skipping row: {reason}", self.kind);
                    rejected += 1;
                }
            }
        }
        (out, rejected)
    }
}

fn normalize_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_string()
}

/// Count of rows dropped during conversion, per dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RejectedRows {
    pub employees: u64,
    pub attendance: u64,
    pub performance: u64,
}

impl RejectedRows {
    pub fn total(&self) -> u64 {
        self.employees + self.attendance + self.performance
    }
}

/// The three raw tables for one run.
#[derive(Debug, Clone)]
pub struct RawInputs {
    pub employees: RawTable,
    pub attendance: RawTable,
    pub performance: RawTable,
}

impl RawInputs {
    pub fn from_paths(
        employees: impl AsRef<Path>,
        attendance: impl AsRef<Path>,
        performance: impl AsRef<Path>,
    ) -> Result<Self> {
        Ok(Self {
            employees: RawTable::from_path(DatasetKind::Employees, employees)?,
            attendance: RawTable::from_path(DatasetKind::Attendance, attendance)?,
            performance: RawTable::from_path(DatasetKind::Performance, performance)?,
        })
    }

    /// Read `employees`, `attendance` and `performance` from `dir`, each as
    /// `.csv` or as a spreadsheet (`.xlsx`, `.xls`, ...).
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        Self::from_paths(
            DatasetKind::Employees.locate(dir),
            DatasetKind::Attendance.locate(dir),
            DatasetKind::Performance.locate(dir),
        )
    }

    /// Check all three tables before anything is converted or loaded.
    pub fn validate(&self) -> Result<()> {
        validate::validate_table(&self.employees)?;
        validate::validate_table(&self.attendance)?;
        validate::validate_table(&self.performance)?;
        Ok(())
    }

    /// Validate, then convert into typed records.
    pub fn into_datasets(self) -> Result<Datasets> {
        self.validate()?;
        let (employees, rejected_employees) = self.employees.convert::<EmployeeRow, Employee>();
        let (attendance, rejected_attendance) =
            self.attendance.convert::<AttendanceRow, AttendanceRecord>();
        let (performance, rejected_performance) =
            self.performance.convert::<PerformanceRow, PerformanceTarget>();
        Ok(Datasets {
            employees,
            attendance,
            performance,
            rejected: RejectedRows {
                employees: rejected_employees,
                attendance: rejected_attendance,
                performance: rejected_performance,
            },
        })
    }
}

/// Typed input for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub employees: Vec<Employee>,
    pub attendance: Vec<AttendanceRecord>,
    pub performance: Vec<PerformanceTarget>,
    pub rejected: RejectedRows,
}

impl Datasets {
    pub fn new(
        employees: Vec<Employee>,
        attendance: Vec<AttendanceRecord>,
        performance: Vec<PerformanceTarget>,
    ) -> Self {
        Self {
            employees,
            attendance,
            performance,
            rejected: RejectedRows::default(),
        }
    }
}
