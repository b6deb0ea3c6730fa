// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! SQLite implementation of the tabledesk collaborator interfaces.
//!
//! A single [`SqliteBackend`] serves as schema catalog, relational store and audit log. It owns
//! an `r2d2` pool; every operation checks a connection out for its own duration and returns it
//! when the guard drops.

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod audit;
mod backend;
mod catalog;
mod config;
mod connection;
mod store;

pub use backend::SqliteBackend;
pub use config::{DbPath, JournalMode, OpenFlags, SqliteConfig, SynchronousMode};
