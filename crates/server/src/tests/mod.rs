// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router tests driven through the real HTTP surface.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod args_tests;
mod helpers;
mod workflow_tests;
