// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! Any write that touches more than one row runs in a single
//! `immediate_transaction`, so the writer lock is held from the first
//! statement and partial writes are never visible.
//!
//! ## Module Organization
//!
//! - `activity`: Activity log writes, always inside the caller's transaction
//! - `admins`: Admin accounts, sessions, password resets
//! - `project_requests`: Requests and quotations
//! - `support`: Tickets, ticket messages, client plans
//! - `talent`: Applications, assessments, interviews

pub mod activity;
pub mod admins;
pub mod project_requests;
pub mod support;
pub mod talent;
