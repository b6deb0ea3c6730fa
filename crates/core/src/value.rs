// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// A scalar cell value, either bound as a statement parameter or read back from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Null,
	Boolean(bool),
	Int(i64),
	Float(f64),
	Text(String),
	Blob(Vec<u8>),
}

impl TryFrom<serde_json::Value> for Value {
	type Error = Error;

	fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
		match value {
			serde_json::Value::Null => Ok(Value::Null),
			serde_json::Value::Bool(b) => Ok(Value::Boolean(b)),
			serde_json::Value::Number(n) => {
				if let Some(i) = n.as_i64() {
					Ok(Value::Int(i))
				} else if let Some(f) = n.as_f64() {
					Ok(Value::Float(f))
				} else {
					Err(Error::validation(format!("number {n} is out of range")))
				}
			}
			serde_json::Value::String(s) => Ok(Value::Text(s)),
			serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
				Err(Error::validation("only scalar values can be written to a column"))
			}
		}
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Value::Null => serializer.serialize_none(),
			Value::Boolean(b) => serializer.serialize_bool(*b),
			Value::Int(i) => serializer.serialize_i64(*i),
			Value::Float(f) => serializer.serialize_f64(*f),
			Value::Text(s) => serializer.serialize_str(s),
			Value::Blob(b) => b.serialize(serializer),
		}
	}
}

impl<'de> Deserialize<'de> for Value {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let json = serde_json::Value::deserialize(deserializer)?;
		match json {
			serde_json::Value::Array(items) => items
				.into_iter()
				.map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
				.collect::<Option<Vec<u8>>>()
				.map(Value::Blob)
				.ok_or_else(|| serde::de::Error::custom("arrays must hold bytes")),
			other => Value::try_from(other).map_err(serde::de::Error::custom),
		}
	}
}

/// Renders the value the way it appears inside a condition text (`'...'` is added by callers).
impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => f.write_str("NULL"),
			Value::Boolean(b) => write!(f, "{b}"),
			Value::Int(i) => write!(f, "{i}"),
			Value::Float(v) => write!(f, "{v}"),
			Value::Text(s) => f.write_str(s),
			Value::Blob(b) => write!(f, "<blob:{}>", b.len()),
		}
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::Text(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Text(s)
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Value::Int(i)
	}
}

impl From<f64> for Value {
	fn from(f: f64) -> Self {
		Value::Float(f)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Boolean(b)
	}
}
