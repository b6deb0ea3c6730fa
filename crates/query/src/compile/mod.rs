// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! Statement compilation.
//!
//! Identifiers are either [`Ident`]s, which the grammar guarantees to be quote-free, or names
//! read back from the catalog, which are quoted with [`quote_name`]. Values never appear in SQL
//! text; each one is pushed onto the parameter list and referenced by position.

mod ddl;
mod row;
mod select;
mod update;

pub use ddl::{ColumnSpec, Reference, add_column, create_table, drop_column, drop_table, rename_column};
pub use row::{delete_row, insert_row, select_rows, update_row};
pub use select::{PREVIEW_LIMIT, preview};
pub use update::{batch_update, pre_image};

use tabledesk_core::{Ident, Value};

use crate::Predicate;

/// Quotes a catalog-supplied name, doubling embedded quotes.
pub fn quote_name(name: &str) -> String {
	format!("\"{}\"", name.replace('"', "\"\""))
}

/// Pushes `value` and returns its placeholder.
fn bind(params: &mut Vec<Value>, value: Value) -> String {
	params.push(value);
	format!("?{}", params.len())
}

/// `field op ?n` for each predicate, optionally qualified with `table.`.
fn render_predicates<'a>(
	predicates: impl IntoIterator<Item = &'a Predicate>,
	qualifier: Option<&Ident>,
	params: &mut Vec<Value>,
) -> Vec<String> {
	predicates
		.into_iter()
		.map(|p| {
			let column = match qualifier {
				Some(table) => format!("{}.{}", table.quoted(), p.field.quoted()),
				None => p.field.quoted(),
			};
			let placeholder = bind(params, p.value.clone());
			format!("{column} {} {placeholder}", p.op.as_sql())
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_quote_name_escapes() {
		assert_eq!(quote_name("id"), "\"id\"");
		assert_eq!(quote_name("we\"ird"), "\"we\"\"ird\"");
	}
}
