use rusqlite::params;

use crate::date_util::{weekday_name, weekday_number, WEEK};

/// Populate dim_weekday (1 = Monday … 7 = Sunday). Idempotent.
pub fn ensure_dim_weekday(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO dim_weekday (weekday, name) VALUES (?1, ?2)",
    )?;
    for day in WEEK {
        stmt.execute(params![weekday_number(day), weekday_name(day)])?;
    }
    Ok(())
}
