//! In-flight generation jobs
//!
//! Jobs live only in memory: after a restart finished models are still in
//! the catalogue, but their job records are gone.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

/// Where a job is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Waiting on the generation API
    Processing,
    /// Model stored and downloadable
    Completed,
    /// Generation or storage failed
    Failed,
}

/// A generation job as reported by `/status/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    /// `job_` followed by a random hex id
    pub id: String,

    /// Current state
    pub status: JobStatus,

    /// Download path once completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,

    /// Failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// Still waiting
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.status == JobStatus::Processing
    }

    /// Model stored
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }

    /// Failure reason, empty unless failed
    #[must_use]
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or_default()
    }
}

/// A fresh, unguessable job id
#[must_use]
pub fn new_job_id() -> String {
    format!("job_{}", Uuid::new_v4().simple())
}

/// Shared table of jobs by id
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

impl JobRegistry {
    /// Register a processing job
    pub fn start(&self, id: String) -> Job {
        let job = Job {
            id: id.clone(),
            status: JobStatus::Processing,
            model_url: None,
            error: None,
        };
        self.jobs.write().insert(id, job.clone());
        job
    }

    /// Snapshot of one job
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Job> {
        self.jobs.read().get(id).cloned()
    }

    /// Mark a job done
    pub fn complete(&self, id: &str, model_url: String) {
        if let Some(job) = self.jobs.write().get_mut(id) {
            job.status = JobStatus::Completed;
            job.model_url = Some(model_url);
        }
    }

    /// Mark a job failed
    pub fn fail(&self, id: &str, error: String) {
        if let Some(job) = self.jobs.write().get_mut(id) {
            job.status = JobStatus::Failed;
            job.error = Some(error);
        }
    }
}
