// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod helpers;
mod support_ticket_tests;
mod talent_tests;
