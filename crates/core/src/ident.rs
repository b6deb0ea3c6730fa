// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::{Error, Result};

/// Characters allowed in table and column names: ASCII word characters and CJK ideographs.
pub fn is_identifier_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_' || ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

pub fn is_identifier(s: &str) -> bool {
	!s.is_empty() && s.chars().all(is_identifier_char)
}

/// A table or column name that passed the identifier grammar.
///
/// The grammar excludes quotes and punctuation, so an `Ident` can always be embedded in a
/// statement as `"name"` without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Ident(String);

impl Ident {
	pub fn new(name: impl Into<String>) -> Result<Self> {
		let name = name.into();
		if is_identifier(&name) {
			Ok(Self(name))
		} else {
			Err(Error::validation(format!("illegal identifier: {name:?}")))
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn quoted(&self) -> String {
		format!("\"{}\"", self.0)
	}

	/// Compares ignoring case and whitespace.
	pub fn matches_loosely(&self, other: &str) -> bool {
		fold(&self.0) == fold(other)
	}
}

fn fold(s: &str) -> String {
	s.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_lowercase).collect()
}

impl Display for Ident {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for Ident {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for Ident {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for Ident {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}
