//! Graph construction as a queued job: record progress, run the pipeline,
//! persist the request/response artifacts, and record the outcome.

use tracing::{error, info};

use pnid_graph::{
    construct_graph, Config, GraphConstructionRequest, GraphConstructionResponse,
    LineDetectionResponse,
};

use crate::artifacts::{
    build_inference_request_path, build_inference_response_path, ArtifactStore, InferenceResult,
};
use crate::error::{OrchestrationError, Result};
use crate::job::{JobStatusDetails, JobStep};

/// Runs graph construction for one diagram under the job-status protocol.
///
/// On success the connectivity and arrow responses land under
/// `{pid}/graph-construction/` and the status record reads `done`. On
/// failure the status record carries the error text and no partial response
/// is written.
pub fn run_graph_construction_job(
    store: &ArtifactStore,
    pid_id: &str,
    text_detection_results: &GraphConstructionRequest,
    line_detection_results: &LineDetectionResponse,
    config: &Config,
) -> Result<()> {
    let stage = InferenceResult::GraphConstruction;
    let step = JobStep::GraphConstruction;

    store.write_job_status(pid_id, stage, &JobStatusDetails::in_progress(step))?;
    store.write_json(&build_inference_request_path(pid_id, stage), text_detection_results)?;

    match construct_graph(pid_id, text_detection_results, line_detection_results, config) {
        Ok(outcome) => {
            let response = GraphConstructionResponse {
                connected_symbols: outcome.connected_symbols,
            };
            store.write_json(&build_inference_response_path(pid_id, stage, None), &response)?;
            store.write_json(
                &build_inference_response_path(pid_id, stage, Some("arrows")),
                &outcome.arrow_nodes,
            )?;
            store.write_job_status(pid_id, stage, &JobStatusDetails::done(step))?;
            info!("Graph construction job for {} done", pid_id);
            Ok(())
        }
        Err(err) => {
            error!("Graph construction job for {} failed: {}", pid_id, err);
            store.write_job_status(pid_id, stage, &JobStatusDetails::failure(step, err.to_string()))?;
            Err(OrchestrationError::Pipeline(err.to_string()))
        }
    }
}
