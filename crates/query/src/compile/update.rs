// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use tabledesk_core::{Ident, Value, interface::Statement};

use super::{bind, quote_name, render_predicates};
use crate::Predicate;

/// Reads `key AS id, field AS value` for every row the batch update is about to touch.
pub fn pre_image(table: &Ident, key: &str, field: &Ident, predicates: &[Predicate]) -> Statement {
	let mut params = Vec::new();
	let filters = render_predicates(predicates, None, &mut params);
	let sql = format!(
		"SELECT {key} AS \"id\", {field} AS \"value\" FROM {table} WHERE {filters}",
		key = quote_name(key),
		field = field.quoted(),
		table = table.quoted(),
		filters = filters.join(" AND "),
	);
	Statement::query("pre-image capture", sql, params)
}

/// `UPDATE table SET field = ?1 WHERE ...`
pub fn batch_update(table: &Ident, field: &Ident, value: Value, predicates: &[Predicate]) -> Statement {
	let mut params = Vec::new();
	let assignment = format!("{} = {}", field.quoted(), bind(&mut params, value));
	let filters = render_predicates(predicates, None, &mut params);
	let sql = format!("UPDATE {} SET {assignment} WHERE {}", table.quoted(), filters.join(" AND "));
	Statement::execute("batch update", sql, params)
}
