//! Job status records.
//!
//! One record per diagram and pipeline step, updated as the job advances.
//! A record that has not been touched within the configured timeout is
//! considered abandoned and may be replaced by a new submission.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Submitted,
    InProgress,
    Done,
    Failure,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Submitted => "submitted",
            JobStatus::InProgress => "in_progress",
            JobStatus::Done => "done",
            JobStatus::Failure => "failure",
        }
    }
}

/// The pipeline step a job status refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStep {
    LineDetection,
    GraphConstruction,
    GraphPersistence,
}

impl JobStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStep::LineDetection => "line_detection",
            JobStep::GraphConstruction => "graph_construction",
            JobStep::GraphPersistence => "graph_persistence",
        }
    }
}

/// The persisted status of one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusDetails {
    pub status: JobStatus,
    pub step: JobStep,
    #[serde(default)]
    pub message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl JobStatusDetails {
    pub fn submitted(step: JobStep) -> Self {
        Self::new(JobStatus::Submitted, step, None)
    }

    pub fn in_progress(step: JobStep) -> Self {
        Self::new(JobStatus::InProgress, step, None)
    }

    pub fn done(step: JobStep) -> Self {
        Self::new(JobStatus::Done, step, None)
    }

    pub fn failure(step: JobStep, message: impl Into<String>) -> Self {
        Self::new(JobStatus::Failure, step, Some(message.into()))
    }

    fn new(status: JobStatus, step: JobStep, message: Option<String>) -> Self {
        Self {
            status,
            step,
            message,
            updated_at: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobStatus::Done | JobStatus::Failure)
    }

    /// Whether the record has gone without updates longer than the timeout.
    pub fn is_stale(&self, timeout_seconds: u64, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.updated_at) > Duration::seconds(timeout_seconds as i64)
    }

    /// A new submission may take over a finished or abandoned job, never a
    /// live one.
    pub fn can_be_replaced(&self, timeout_seconds: u64, now: DateTime<Utc>) -> bool {
        self.is_terminal() || self.is_stale(timeout_seconds, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&JobStatus::InProgress).unwrap(), "\"in_progress\"");
        assert_eq!(
            serde_json::to_string(&JobStep::GraphConstruction).unwrap(),
            "\"graph_construction\""
        );
    }

    #[test]
    fn test_failure_carries_message() {
        let details = JobStatusDetails::failure(JobStep::GraphConstruction, "boom");
        assert_eq!(details.status, JobStatus::Failure);
        assert_eq!(details.message.as_deref(), Some("boom"));
        assert!(details.is_terminal());
    }

    #[test]
    fn test_staleness() {
        let details = JobStatusDetails::in_progress(JobStep::LineDetection);
        let now = details.updated_at;

        assert!(!details.is_stale(300, now + Duration::seconds(299)));
        assert!(details.is_stale(300, now + Duration::seconds(301)));
    }

    #[test]
    fn test_replacement_rules() {
        let running = JobStatusDetails::in_progress(JobStep::GraphConstruction);
        let now = running.updated_at;
        assert!(!running.can_be_replaced(300, now + Duration::seconds(10)));
        assert!(running.can_be_replaced(300, now + Duration::seconds(500)));

        let done = JobStatusDetails::done(JobStep::GraphConstruction);
        assert!(done.can_be_replaced(300, done.updated_at + Duration::seconds(1)));
    }

    #[test]
    fn test_roundtrip() {
        let details = JobStatusDetails::submitted(JobStep::GraphPersistence);
        let json = serde_json::to_string(&details).unwrap();
        let back: JobStatusDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(back, details);
    }
}
