// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! The operations tabledesk exposes, written against the collaborator interfaces in
//! `tabledesk_core::interface`.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use admin::RowUpdate;
pub use batch::{BatchUpdate, BatchUpdateOutcome, DEFAULT_OPERATOR};
pub use engine::Engine;
pub use preview::Preview;
pub use tabledesk_core::{Error, Result};

mod admin;
mod batch;
mod engine;
mod preview;
