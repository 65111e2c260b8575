//! Per-diagram artifact layout and the filesystem store behind it.
//!
//! Every pipeline stage reads and writes under `{pid}/{stage}/`:
//! `request.json`, `response.json`, `response_{substep}.json`, images, and
//! the stage's `job_status.json`.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::{OrchestrationError, Result};
use crate::job::{JobStatusDetails, JobStep};

/// The pipeline stage an artifact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceResult {
    SymbolDetection,
    TextDetection,
    GraphConstruction,
    LineDetection,
    GraphPersistence,
}

impl InferenceResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceResult::SymbolDetection => "symbol-detection",
            InferenceResult::TextDetection => "text-detection",
            InferenceResult::GraphConstruction => "graph-construction",
            InferenceResult::LineDetection => "line-detection",
            InferenceResult::GraphPersistence => "graph-persistence",
        }
    }
}

impl fmt::Display for InferenceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn build_image_path(pid_id: &str, inference_result: InferenceResult) -> String {
    format!("{}/{}/{}.png", pid_id, inference_result, pid_id)
}

pub fn build_debug_image_path(pid_id: &str, inference_result: InferenceResult, postfix: Option<&str>) -> String {
    match postfix {
        None => format!("{}/{}/debug_{}.png", pid_id, inference_result, pid_id),
        Some(postfix) => format!("{}/{}/debug_{}_{}.png", pid_id, inference_result, pid_id, postfix),
    }
}

pub fn build_output_image_path(pid_id: &str, inference_result: InferenceResult, postfix: &str) -> String {
    format!("{}/{}/output_{}_{}.png", pid_id, inference_result, pid_id, postfix)
}

pub fn build_inference_request_path(pid_id: &str, inference_result: InferenceResult) -> String {
    format!("{}/{}/request.json", pid_id, inference_result)
}

pub fn build_inference_response_path(
    pid_id: &str,
    inference_result: InferenceResult,
    postfix: Option<&str>,
) -> String {
    match postfix {
        None => format!("{}/{}/response.json", pid_id, inference_result),
        Some(postfix) => format!("{}/{}/response_{}.json", pid_id, inference_result, postfix),
    }
}

pub fn build_inference_job_status_path(pid_id: &str, inference_result: InferenceResult) -> String {
    format!("{}/{}/job_status.json", pid_id, inference_result)
}

/// Filesystem-backed artifact store rooted at one directory.
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn write_json(&self, relative_path: &str, value: &impl Serialize) -> Result<()> {
        let path = self.root.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        debug!("Writing artifact {}", path.display());
        std::fs::write(path, serde_json::to_string_pretty(value)?)?;
        Ok(())
    }

    pub fn read_json<T: DeserializeOwned>(&self, relative_path: &str) -> Result<Option<T>> {
        let path = self.root.join(relative_path);
        if !path.exists() {
            return Ok(None);
        }
        let value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        Ok(Some(value))
    }

    pub fn write_job_status(
        &self,
        pid_id: &str,
        inference_result: InferenceResult,
        details: &JobStatusDetails,
    ) -> Result<()> {
        self.write_json(&build_inference_job_status_path(pid_id, inference_result), details)
    }

    pub fn read_job_status(
        &self,
        pid_id: &str,
        inference_result: InferenceResult,
    ) -> Result<Option<JobStatusDetails>> {
        self.read_json(&build_inference_job_status_path(pid_id, inference_result))
    }

    /// Claims the job slot for a diagram: writes a fresh `submitted` record,
    /// unless a live (non-terminal, non-abandoned) job already holds it.
    pub fn try_claim_job(
        &self,
        pid_id: &str,
        inference_result: InferenceResult,
        step: JobStep,
        timeout_seconds: u64,
    ) -> Result<JobStatusDetails> {
        if let Some(existing) = self.read_job_status(pid_id, inference_result)? {
            if !existing.can_be_replaced(timeout_seconds, Utc::now()) {
                return Err(OrchestrationError::Conflict(format!(
                    "a {} job for {} is already {}",
                    existing.step.as_str(),
                    pid_id,
                    existing.status.as_str()
                )));
            }
        }

        let details = JobStatusDetails::submitted(step);
        self.write_job_status(pid_id, inference_result, &details)?;
        Ok(details)
    }
}
