// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clap::Parser;

use crate::Args;

fn parse_session_hours(value: &str) -> Result<Args, clap::Error> {
    Args::try_parse_from(["planmorph-server", "--session-hours", value])
}

#[test]
fn test_session_hours_accepts_range_bounds() {
    assert_eq!(parse_session_hours("1").unwrap().session_hours, 1);
    assert_eq!(parse_session_hours("8760").unwrap().session_hours, 8760);
}

#[test]
fn test_session_hours_rejects_zero_and_negative() {
    assert!(parse_session_hours("0").is_err());
    assert!(parse_session_hours("-5").is_err());
}

#[test]
fn test_session_hours_rejects_more_than_a_year() {
    let err: clap::Error = parse_session_hours("8761").unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}
