// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `activity`: Activity log reads
//! - `admins`: Admin accounts, sessions, password resets
//! - `project_requests`: Requests and their quotations
//! - `support`: Tickets, messages, clients, dashboard counts
//! - `talent`: Applications, assessments, interviews
//!
//! Every function takes a connection borrowed from the pool; the
//! `Persistence` adapter in `lib.rs` does the borrowing.

pub mod activity;
pub mod admins;
pub mod project_requests;
pub mod support;
pub mod talent;
