//! Submission status of a form instance

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a form instance is in its submit cycle.
///
/// ```text
/// idle ──submit──► validating ──► success | error
///   ▲                                   │
///   └───────────────reset───────────────┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
	#[default]
	Idle,
	Validating,
	Error,
	Success,
}

impl FormStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			FormStatus::Idle => "idle",
			FormStatus::Validating => "validating",
			FormStatus::Error => "error",
			FormStatus::Success => "success",
		}
	}
}

impl fmt::Display for FormStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// What a submit attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// The value passed validation and the submit callback ran
	Success,
	/// Validation failed; errors are stored on the instance
	Error,
	/// A validation pass was already running
	Ignored,
	/// The payload carried an intent, which was applied instead of submitting
	Intent,
}

impl SubmitOutcome {
	pub fn is_success(&self) -> bool {
		matches!(self, SubmitOutcome::Success)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(FormStatus::Idle, "\"idle\"")]
	#[case(FormStatus::Validating, "\"validating\"")]
	#[case(FormStatus::Success, "\"success\"")]
	fn test_status_serializes_lowercase(#[case] status: FormStatus, #[case] expected: &str) {
		assert_eq!(serde_json::to_string(&status).unwrap(), expected);
		assert_eq!(format!("\"{}\"", status), expected);
	}
}
