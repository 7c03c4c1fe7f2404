//! Aggregated results for a document and the documents it links to.

use crate::assertion::Status;
use crate::errors::Unsatisfied;
use serde::Serialize;
use specdoc::Resource;

/// Success, failure and exception tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub successes: usize,
    pub failures: usize,
    pub exceptions: usize,
}

impl Counts {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Success => self.successes += 1,
            Status::Failure => self.failures += 1,
            Status::Exception => self.exceptions += 1,
        }
    }

    pub fn add(&mut self, other: Counts) {
        self.successes += other.successes;
        self.failures += other.failures;
        self.exceptions += other.exceptions;
    }

    pub fn total(&self) -> usize {
        self.successes + self.failures + self.exceptions
    }
}

/// Results of one document: its own command outcomes plus one entry per
/// followed link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    resource: Resource,
    own: Counts,
    children: Vec<ChildSummary>,
}

/// Result of following one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildSummary {
    pub resource: Resource,
    pub result: ChildResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChildResult {
    /// The linked document was processed.
    Processed(ResultSummary),
    /// The target was already being processed higher up the traversal.
    Revisited,
    /// No fixture was available for the target.
    Unresolved,
    /// Processing the target stopped with an error; counts as one exception.
    Failed { message: String },
}

impl ChildResult {
    pub fn totals(&self) -> Counts {
        match self {
            ChildResult::Processed(summary) => summary.totals(),
            ChildResult::Failed { .. } => Counts {
                exceptions: 1,
                ..Counts::default()
            },
            ChildResult::Revisited | ChildResult::Unresolved => Counts::default(),
        }
    }
}

impl ResultSummary {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            own: Counts::default(),
            children: Vec::new(),
        }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn record(&mut self, status: Status) {
        self.own.record(status);
    }

    pub fn record_child(&mut self, child: ChildSummary) {
        self.children.push(child);
    }

    /// Counts from this document's own commands only.
    pub fn own(&self) -> Counts {
        self.own
    }

    pub fn children(&self) -> &[ChildSummary] {
        &self.children
    }

    /// Own counts plus every child's totals.
    pub fn totals(&self) -> Counts {
        self.children.iter().fold(self.own, |mut totals, child| {
            totals.add(child.result.totals());
            totals
        })
    }

    pub fn success_count(&self) -> usize {
        self.totals().successes
    }

    pub fn failure_count(&self) -> usize {
        self.totals().failures
    }

    pub fn exception_count(&self) -> usize {
        self.totals().exceptions
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    pub fn has_exceptions(&self) -> bool {
        self.exception_count() > 0
    }

    pub fn is_satisfied(&self) -> bool {
        !self.has_failures() && !self.has_exceptions()
    }

    pub fn assert_is_satisfied(&self) -> Result<(), Unsatisfied> {
        let totals = self.totals();
        if totals.failures == 0 && totals.exceptions == 0 {
            return Ok(());
        }
        Err(Unsatisfied {
            resource: self.resource.clone(),
            failures: totals.failures,
            exceptions: totals.exceptions,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
