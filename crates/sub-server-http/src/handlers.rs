// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! HTTP endpoint handlers.
//!
//! Request and response bodies keep the field names existing clients send (`tableName`,
//! `affectedRows`, `old_values`, ...).

use axum::{
	Json,
	extract::{Path, State, rejection::JsonRejection},
	http::StatusCode,
	response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Map;
use tabledesk_core::{
	Error, Row, Value,
	interface::{ColumnDef, ForeignKey, PreImage, UpdateLogEntry},
};
use tabledesk_engine::{BatchUpdate, Engine, Preview, RowUpdate};
use tabledesk_query::{ClauseInput, Condition, compile::ColumnSpec};
use tokio::task::spawn_blocking;

use crate::{error::AppError, state::AppState};

type Payload<T> = Result<Json<T>, JsonRejection>;

/// Runs a synchronous engine call on the blocking pool and waits for it to finish. Lock waits are
/// bounded by the store's busy timeout, so the response always reports what the engine did.
async fn run<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
	F: FnOnce(Engine) -> tabledesk_core::Result<T> + Send + 'static,
	T: Send + 'static,
{
	let engine = state.engine_clone();
	match spawn_blocking(move || f(engine)).await {
		Err(join_error) => Err(AppError::TaskPanic(join_error.to_string())),
		Ok(result) => result.map_err(AppError::from),
	}
}

fn scalar(value: serde_json::Value) -> Result<Value, AppError> {
	Value::try_from(value).map_err(AppError::from)
}

fn row_from_json(data: Map<String, serde_json::Value>) -> Result<Row, AppError> {
	data.into_iter().map(|(column, value)| Ok((column, scalar(value)?))).collect()
}

/// Plain acknowledgement for administrative calls.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
	pub message: String,
}

impl MessageResponse {
	fn new(message: impl Into<String>) -> Json<Self> {
		Json(Self {
			message: message.into(),
		})
	}
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
}

/// Health check endpoint.
///
/// Returns 200 OK if the server is running.
pub async fn health() -> impl IntoResponse {
	(
		StatusCode::OK,
		Json(HealthResponse {
			status: "ok",
		}),
	)
}

/// Either free text or structured clauses. Clauses win when both are present.
#[derive(Debug, Default, Deserialize)]
pub struct ConditionRequest {
	#[serde(default)]
	pub condition: Option<String>,
	#[serde(default)]
	pub clauses: Option<Vec<ClauseInput>>,
}

impl ConditionRequest {
	fn into_condition(self) -> Result<Condition, AppError> {
		match self.clauses {
			Some(clauses) => Ok(Condition::from_clauses(clauses)?),
			None => Ok(Condition::parse(self.condition.as_deref().unwrap_or_default())),
		}
	}
}

pub async fn cross_table_preview(
	State(state): State<AppState>,
	payload: Payload<ConditionRequest>,
) -> Result<Json<Preview>, AppError> {
	let Json(request) = payload?;
	let condition = request.into_condition()?;
	let preview = run(&state, move |engine| engine.preview(&condition)).await?;
	Ok(Json(preview))
}

#[derive(Debug, Deserialize)]
pub struct BatchUpdateRequest {
	#[serde(flatten)]
	pub condition: ConditionRequest,
	pub table: String,
	pub field: String,
	#[serde(default)]
	pub value: serde_json::Value,
	#[serde(default)]
	pub operator: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchUpdateResponse {
	pub message: String,
	#[serde(rename = "affectedRows")]
	pub affected_rows: usize,
	pub old_values: Vec<PreImage>,
	pub time: DateTime<Utc>,
	pub operator: String,
}

pub async fn cross_table_batch_update(
	State(state): State<AppState>,
	payload: Payload<BatchUpdateRequest>,
) -> Result<Json<BatchUpdateResponse>, AppError> {
	let Json(request) = payload?;
	let update = BatchUpdate {
		condition: request.condition.into_condition()?,
		table: request.table,
		field: request.field,
		value: scalar(request.value)?,
		operator: request.operator,
	};

	let outcome = run(&state, move |engine| engine.batch_update(update)).await?;
	Ok(Json(BatchUpdateResponse {
		message: "batch update succeeded".to_string(),
		affected_rows: outcome.affected,
		old_values: outcome.old_values,
		time: outcome.time,
		operator: outcome.operator,
	}))
}

pub async fn update_logs(State(state): State<AppState>) -> Result<Json<Vec<UpdateLogEntry>>, AppError> {
	Ok(Json(run(&state, |engine| engine.update_logs()).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableRequest {
	pub table_name: String,
	pub fields: Vec<ColumnSpec>,
}

pub async fn create_table(
	State(state): State<AppState>,
	payload: Payload<CreateTableRequest>,
) -> Result<Json<MessageResponse>, AppError> {
	let Json(request) = payload?;
	let table = request.table_name;
	let created = table.clone();
	run(&state, move |engine| engine.create_table(&table, &request.fields)).await?;
	Ok(MessageResponse::new(format!("table {created} created")))
}

pub async fn drop_table(
	State(state): State<AppState>,
	Path(table): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
	let dropped = table.clone();
	run(&state, move |engine| engine.drop_table(&table)).await?;
	Ok(MessageResponse::new(format!("table {dropped} dropped")))
}

pub async fn list_tables(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
	Ok(Json(run(&state, |engine| engine.list_tables()).await?))
}

pub async fn table_structure(
	State(state): State<AppState>,
	Path(table): Path<String>,
) -> Result<Json<Vec<ColumnDef>>, AppError> {
	Ok(Json(run(&state, move |engine| engine.describe(&table)).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFieldRequest {
	pub table_name: String,
	pub field_name: String,
	pub field_type: String,
	#[serde(default)]
	pub not_null: bool,
	#[serde(default)]
	pub references: Option<tabledesk_query::compile::Reference>,
}

pub async fn add_field(
	State(state): State<AppState>,
	payload: Payload<AddFieldRequest>,
) -> Result<Json<MessageResponse>, AppError> {
	let Json(request) = payload?;
	let column = ColumnSpec {
		name: request.field_name,
		data_type: request.field_type,
		primary_key: false,
		not_null: request.not_null,
		references: request.references,
	};
	let added = column.name.clone();
	let table = request.table_name;
	run(&state, move |engine| engine.add_column(&table, &column)).await?;
	Ok(MessageResponse::new(format!("field {added} added")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFieldRequest {
	pub table_name: String,
	pub field_name: String,
}

pub async fn delete_field(
	State(state): State<AppState>,
	payload: Payload<DeleteFieldRequest>,
) -> Result<Json<MessageResponse>, AppError> {
	let Json(request) = payload?;
	let deleted = request.field_name.clone();
	run(&state, move |engine| engine.drop_column(&request.table_name, &request.field_name)).await?;
	Ok(MessageResponse::new(format!("field {deleted} deleted")))
}

/// Renames a column. Type changes are not supported by the store and are rejected.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyFieldRequest {
	pub table_name: String,
	pub old_name: String,
	pub new_name: String,
	#[serde(default)]
	pub new_type: Option<String>,
}

pub async fn modify_field(
	State(state): State<AppState>,
	payload: Payload<ModifyFieldRequest>,
) -> Result<Json<MessageResponse>, AppError> {
	let Json(request) = payload?;
	if request.new_type.as_deref().is_some_and(|t| !t.trim().is_empty()) {
		return Err(Error::validation("changing a column type is not supported; only renaming is").into());
	}
	let message = format!("field {} renamed to {}", request.old_name, request.new_name);
	run(&state, move |engine| engine.rename_column(&request.table_name, &request.old_name, &request.new_name)).await?;
	Ok(MessageResponse::new(message))
}

pub async fn relations(
	State(state): State<AppState>,
	Path(table): Path<String>,
) -> Result<Json<Vec<ForeignKey>>, AppError> {
	Ok(Json(run(&state, move |engine| engine.relations(&table)).await?))
}

pub async fn table_rows(State(state): State<AppState>, Path(table): Path<String>) -> Result<Json<Vec<Row>>, AppError> {
	Ok(Json(run(&state, move |engine| engine.rows(&table)).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertRowRequest {
	pub table_name: String,
	pub data: Map<String, serde_json::Value>,
}

pub async fn insert_row(
	State(state): State<AppState>,
	payload: Payload<InsertRowRequest>,
) -> Result<Json<MessageResponse>, AppError> {
	let Json(request) = payload?;
	let data = row_from_json(request.data)?;
	let table = request.table_name;
	run(&state, move |engine| engine.insert_row(&table, data)).await?;
	Ok(MessageResponse::new("row inserted"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRowRequest {
	pub table_name: String,
	pub data: Map<String, serde_json::Value>,
	#[serde(default)]
	pub id: Option<serde_json::Value>,
	#[serde(default)]
	pub pk_name: Option<String>,
	#[serde(default)]
	pub pk_value: Option<serde_json::Value>,
}

pub async fn update_row(
	State(state): State<AppState>,
	payload: Payload<UpdateRowRequest>,
) -> Result<Json<MessageResponse>, AppError> {
	let Json(request) = payload?;
	let update = RowUpdate {
		data: row_from_json(request.data)?,
		key: request.pk_name,
		key_value: request.pk_value.map(scalar).transpose()?,
		id: request.id.map(scalar).transpose()?,
	};
	let table = request.table_name;
	run(&state, move |engine| engine.update_row(&table, update)).await?;
	Ok(MessageResponse::new("row updated"))
}

pub async fn delete_row(
	State(state): State<AppState>,
	Path((table, id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
	run(&state, move |engine| engine.delete_row(&table, Value::Text(id))).await?;
	Ok(MessageResponse::new("row deleted"))
}
