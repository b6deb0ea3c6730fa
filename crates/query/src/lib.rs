// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! From a condition to executable statements.
//!
//! ```text
//! condition text ──parse──▶ Condition ──tables──▶ foreign keys ──plan──▶ JoinPlan ──compile──▶ Statement
//! ```
//!
//! Nothing in this crate touches a store; the engine supplies foreign keys from the catalog and
//! executes the statements produced here.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use condition::{ClauseInput, Condition, ConditionClause, Operator, Predicate, TableSet};
pub use plan::{JoinPlan, JoinStep, PlanOutcome, plan};

pub mod compile;
mod condition;
mod plan;
