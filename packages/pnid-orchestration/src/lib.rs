//! Thin job layer around the graph construction pipeline.
//!
//! - Job status records per diagram and pipeline step, with an
//!   abandoned-job timeout
//! - A bounded single-consumer FIFO queue so at most one long-running job
//!   executes at a time per process
//! - The per-diagram artifact path layout and a filesystem store for JSON
//!   artifacts
//! - A job runner that drives graph construction under the status protocol
//!   and persists its request/response artifacts

pub mod artifacts;
pub mod error;
pub mod job;
pub mod pipeline;
pub mod queue;

pub use artifacts::{
    build_debug_image_path, build_image_path, build_inference_job_status_path,
    build_inference_request_path, build_inference_response_path, build_output_image_path,
    ArtifactStore, InferenceResult,
};
pub use error::{OrchestrationError, Result};
pub use job::{JobStatus, JobStatusDetails, JobStep};
pub use pipeline::run_graph_construction_job;
pub use queue::JobQueue;
