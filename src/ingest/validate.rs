use crate::error::{Error, Result};

use super::{DatasetKind, RawTable};

/// Columns each dataset must carry. Extra columns are ignored.
pub fn required_columns(kind: DatasetKind) -> &'static [&'static str] {
    match kind {
        DatasetKind::Employees => &["emp_id", "name", "department", "hourly_rate", "level"],
        DatasetKind::Attendance => &["emp_id", "date", "check_in", "check_out"],
        DatasetKind::Performance => &["department", "target_achievement_rate"],
    }
}

/// Required columns absent from `headers`, in declaration order.
pub fn missing_columns<'a>(kind: DatasetKind, headers: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let present: Vec<&str> = headers.into_iter().collect();
    required_columns(kind)
        .iter()
        .filter(|col| !present.contains(col))
        .map(|col| col.to_string())
        .collect()
}

/// Fail with a schema error naming the dataset and every missing column.
pub fn validate_table(table: &RawTable) -> Result<()> {
    let missing = missing_columns(table.kind, table.headers.iter());
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Schema {
            dataset: table.kind.name().to_string(),
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_none() {
        let missing = missing_columns(
            DatasetKind::Attendance,
            ["date", "emp_id", "check_out", "check_in", "note"],
        );
        assert!(missing.is_empty());
    }

    #[test]
    fn test_missing_columns_reports_all_in_order() {
        let missing = missing_columns(DatasetKind::Employees, ["emp_id", "name"]);
        assert_eq!(missing, vec!["department", "hourly_rate", "level"]);
    }

    #[test]
    fn test_validate_table_schema_error() {
        let table = RawTable::from_reader(
            DatasetKind::Employees,
            "emp_id,name,department,level\n1,Kim,Sales,Junior\n".as_bytes(),
        )
        .unwrap();
        match validate_table(&table) {
            Err(Error::Schema { dataset, missing }) => {
                assert_eq!(dataset, "employees");
                assert_eq!(missing, vec!["hourly_rate"]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }
}
