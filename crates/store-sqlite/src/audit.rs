// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use chrono::{DateTime, SecondsFormat, Utc};
use r2d2_sqlite::rusqlite::{self, Connection, Row, params};
use tabledesk_core::{
	Error, Result, Value,
	interface::{AUDIT_TABLE, AuditLog, PreImage, UpdateLogEntry},
};
use tracing::{debug, instrument};

use crate::SqliteBackend;

/// Creates the update log and the triggers that keep it append-only.
pub(crate) fn ensure_table(conn: &Connection) -> Result<()> {
	let ddl = format!(
		"CREATE TABLE IF NOT EXISTS {AUDIT_TABLE} (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			time TEXT NOT NULL,
			operator TEXT NOT NULL,
			\"condition\" TEXT NOT NULL,
			table_name TEXT NOT NULL,
			field TEXT NOT NULL,
			old_values TEXT NOT NULL,
			new_value TEXT NOT NULL,
			count INTEGER NOT NULL,
			result TEXT NOT NULL
		);
		CREATE TRIGGER IF NOT EXISTS {AUDIT_TABLE}_no_update BEFORE UPDATE ON {AUDIT_TABLE}
		BEGIN SELECT RAISE(ABORT, '{AUDIT_TABLE} is append-only'); END;
		CREATE TRIGGER IF NOT EXISTS {AUDIT_TABLE}_no_delete BEFORE DELETE ON {AUDIT_TABLE}
		BEGIN SELECT RAISE(ABORT, '{AUDIT_TABLE} is append-only'); END;"
	);
	conn.execute_batch(&ddl).map_err(|e| Error::store("create update log", e))
}

fn encode<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
	serde_json::to_string(value).map_err(|e| Error::store("encode update log entry", e))
}

fn decode_json<T: serde::de::DeserializeOwned>(index: usize, text: &str) -> rusqlite::Result<T> {
	serde_json::from_str(text)
		.map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e)))
}

fn read_entry(row: &Row<'_>) -> rusqlite::Result<UpdateLogEntry> {
	let time: String = row.get(1)?;
	let time = DateTime::parse_from_rfc3339(&time)
		.map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e)))?
		.with_timezone(&Utc);
	let old_values: String = row.get(6)?;
	let new_value: String = row.get(7)?;
	let count: i64 = row.get(8)?;

	Ok(UpdateLogEntry {
		id: Some(row.get(0)?),
		time,
		operator: row.get(2)?,
		condition: row.get(3)?,
		table_name: row.get(4)?,
		field: row.get(5)?,
		old_values: decode_json::<Vec<PreImage>>(6, &old_values)?,
		new_value: decode_json::<Value>(7, &new_value)?,
		count: usize::try_from(count).unwrap_or_default(),
		result: row.get(9)?,
	})
}

impl AuditLog for SqliteBackend {
	#[instrument(name = "store::sqlite::audit::append", level = "debug", skip(self, entry), fields(
		table = %entry.table_name,
		field = %entry.field,
		count = entry.count
	))]
	fn append(&self, entry: &UpdateLogEntry) -> Result<i64> {
		let old_values = encode(&entry.old_values)?;
		let new_value = encode(&entry.new_value)?;
		let time = entry.time.to_rfc3339_opts(SecondsFormat::Micros, true);

		let conn = self.conn()?;
		conn.execute(
			&format!(
				"INSERT INTO {AUDIT_TABLE} \
				(time, operator, \"condition\", table_name, field, old_values, new_value, count, result) \
				VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
			),
			params![
				time,
				entry.operator,
				entry.condition,
				entry.table_name,
				entry.field,
				old_values,
				new_value,
				entry.count as i64,
				entry.result
			],
		)
		.map_err(|e| Error::store("append update log", e))?;

		let id = conn.last_insert_rowid();
		debug!(id, "update log entry appended");
		Ok(id)
	}

	#[instrument(name = "store::sqlite::audit::list", level = "debug", skip(self))]
	fn list(&self) -> Result<Vec<UpdateLogEntry>> {
		let conn = self.conn()?;
		let mut stmt = conn
			.prepare_cached(&format!(
				"SELECT id, time, operator, \"condition\", table_name, field, old_values, new_value, count, result \
				FROM {AUDIT_TABLE} ORDER BY time DESC, id DESC"
			))
			.map_err(|e| Error::store("read update log", e))?;
		stmt.query_map([], read_entry)
			.and_then(|rows| rows.collect::<std::result::Result<Vec<_>, _>>())
			.map_err(|e| Error::store("read update log", e))
	}
}

#[cfg(test)]
mod tests {
	use chrono::{Duration, TimeZone};

	use super::*;

	fn entry(time: DateTime<Utc>, field: &str) -> UpdateLogEntry {
		UpdateLogEntry {
			id: None,
			time,
			operator: "administrator".to_string(),
			condition: "orders.status='open'".to_string(),
			table_name: "orders".to_string(),
			field: field.to_string(),
			old_values: vec![PreImage {
				id: Value::Int(1),
				value: Value::from("open"),
			}],
			new_value: Value::from("closed"),
			count: 1,
			result: "success".to_string(),
		}
	}

	#[test]
	fn test_append_then_list_round_trips() {
		let backend = SqliteBackend::in_memory().unwrap();
		let time = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
		let id = backend.append(&entry(time, "status")).unwrap();

		let entries = backend.list().unwrap();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].id, Some(id));
		assert_eq!(entries[0].time, time);
		assert_eq!(entries[0].old_values, entry(time, "status").old_values);
		assert_eq!(entries[0].new_value, Value::from("closed"));
	}

	#[test]
	fn test_list_newest_first() {
		let backend = SqliteBackend::in_memory().unwrap();
		let earlier = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
		let later = earlier + Duration::seconds(5);
		backend.append(&entry(later, "late")).unwrap();
		backend.append(&entry(earlier, "early")).unwrap();
		backend.append(&entry(later, "late_second")).unwrap();

		let fields: Vec<String> = backend.list().unwrap().into_iter().map(|e| e.field).collect();
		assert_eq!(fields, vec!["late_second", "late", "early"]);
	}

	#[test]
	fn test_entries_cannot_be_modified() {
		let backend = SqliteBackend::in_memory().unwrap();
		backend.append(&entry(Utc::now(), "status")).unwrap();

		let conn = backend.conn().unwrap();
		assert!(conn.execute(&format!("UPDATE {AUDIT_TABLE} SET result = 'tampered'"), []).is_err());
		assert!(conn.execute(&format!("DELETE FROM {AUDIT_TABLE}"), []).is_err());
		drop(conn);

		assert_eq!(backend.list().unwrap()[0].result, "success");
	}
}
