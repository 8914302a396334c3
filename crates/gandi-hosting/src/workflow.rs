//! Progress records for multi-resource workflows
//!
//! Creating a VM may create a disk and an interface on the way. Nothing is
//! rolled back when a later step fails, so a failed workflow reports how
//! far it went and which remote resources may have been left behind.

use crate::error::HostingError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Steps of a workflow, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    /// Local checks passed, nothing was sent yet
    Validated,
    /// SSH key names were translated to key ids
    KeysResolved,
    /// The interface owning an existing address was looked up
    InterfaceResolved,
    /// The creation call was accepted and returned its operations
    Submitted,
    /// The awaited operation reached DONE
    Completed,
    /// The resulting resource was fetched back
    Fetched,
}

impl std::fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowStep::Validated => write!(f, "validated"),
            WorkflowStep::KeysResolved => write!(f, "keys resolved"),
            WorkflowStep::InterfaceResolved => write!(f, "interface resolved"),
            WorkflowStep::Submitted => write!(f, "submitted"),
            WorkflowStep::Completed => write!(f, "completed"),
            WorkflowStep::Fetched => write!(f, "fetched"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Vm,
    Disk,
    IpAddress,
    /// Network interface, only visible through workflow records
    Interface,
}

/// A remote resource touched by a workflow
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// How far a workflow progressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowProgress {
    pub workflow: String,
    /// Steps completed so far
    pub steps: Vec<WorkflowStep>,
    /// Resources this workflow created and saw completed
    pub confirmed: Vec<ResourceRef>,
    /// Resources submitted for creation but never seen completed
    pub pending: Vec<ResourceRef>,
}

impl WorkflowProgress {
    pub fn new(workflow: impl Into<String>) -> Self {
        Self {
            workflow: workflow.into(),
            steps: Vec::new(),
            confirmed: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn record(&mut self, step: WorkflowStep) {
        self.steps.push(step);
    }

    pub fn add_pending(&mut self, resource: ResourceRef) {
        if !self.pending.contains(&resource) && !self.confirmed.contains(&resource) {
            self.pending.push(resource);
        }
    }

    /// Moves every pending resource to `confirmed`
    pub fn confirm_pending(&mut self) {
        self.confirmed.append(&mut self.pending);
    }

    pub fn has_reached(&self, step: WorkflowStep) -> bool {
        self.steps.contains(&step)
    }

    pub fn last_step(&self) -> Option<WorkflowStep> {
        self.steps.last().copied()
    }

    /// True once something may exist remotely that nobody returned to the caller
    pub fn may_have_orphans(&self) -> bool {
        !self.confirmed.is_empty() || !self.pending.is_empty()
    }

    /// Attaches this record to the error that stopped the workflow
    pub fn fail(self, error: HostingError) -> WorkflowError {
        WorkflowError {
            error,
            progress: self,
        }
    }
}

/// A workflow failure together with the progress made before it
#[derive(Error, Debug)]
#[error("{} aborted: {}", .progress.workflow, .error)]
pub struct WorkflowError {
    #[source]
    pub error: HostingError,
    pub progress: WorkflowProgress,
}

impl WorkflowError {
    pub fn into_inner(self) -> HostingError {
        self.error
    }
}

impl From<WorkflowError> for HostingError {
    fn from(err: WorkflowError) -> Self {
        err.error
    }
}

pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;
