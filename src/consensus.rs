//! # Consensus Resolver
//!
//! Runs the two search probes concurrently under one deadline and combines
//! their answers into a single domain.
//!
//! | primary | secondary | result |
//! |---|---|---|
//! | `d` | `d` | `d` |
//! | `a` | `b` | whichever contains the squashed query; `a` on a tie |
//! | `a` | - | `a` |
//! | - | `b` | `b` |
//! | - | - | failure |

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, bounded};
use thiserror::Error;
use tracing::{debug, warn};

use crate::search::{ProbeOutcome, SearchOutcome, SearchProbe};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("empty query")]
    EmptyQuery,
    #[error("no search engine returned a usable domain")]
    NoSignal,
}

pub struct ConsensusResolver {
    primary: Arc<dyn SearchProbe>,
    secondary: Arc<dyn SearchProbe>,
    deadline: Duration,
}

impl ConsensusResolver {
    /// `primary` is engine A: it wins disagreements the query cannot settle.
    pub fn new(
        primary: Arc<dyn SearchProbe>,
        secondary: Arc<dyn SearchProbe>,
        deadline: Duration,
    ) -> Self {
        Self {
            primary,
            secondary,
            deadline,
        }
    }

    pub fn resolve(&self, query: &str) -> Result<String, ResolveError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolveError::EmptyQuery);
        }
        let (primary, secondary) = self.run_probes(query);
        decide(
            query,
            primary.as_ref().and_then(|o| o.outcome.domain()),
            secondary.as_ref().and_then(|o| o.outcome.domain()),
        )
        .ok_or(ResolveError::NoSignal)
    }

    /// Start both probes and collect whatever finishes before the deadline.
    /// Probes still running afterwards are abandoned; their results are
    /// dropped when they try to send.
    fn run_probes(&self, query: &str) -> (Option<SearchOutcome>, Option<SearchOutcome>) {
        let (tx, rx) = bounded::<(usize, SearchOutcome)>(2);
        let mut started = 0usize;

        for (slot, probe) in [&self.primary, &self.secondary].into_iter().enumerate() {
            let probe = Arc::clone(probe);
            let engine = probe.engine();
            let tx = tx.clone();
            let query = query.to_string();
            let spawned = thread::Builder::new()
                .name(format!("probe-{engine}"))
                .spawn(move || {
                    let outcome = SearchOutcome {
                        engine,
                        outcome: probe.probe(&query),
                    };
                    let _ = tx.send((slot, outcome));
                });
            match spawned {
                Ok(_) => started += 1,
                Err(err) => warn!("failed to start {engine} probe: {err}"),
            }
        }
        drop(tx);

        let deadline = Instant::now() + self.deadline;
        let mut results: [Option<SearchOutcome>; 2] = [None, None];
        for _ in 0..started {
            match rx.recv_deadline(deadline) {
                Ok((slot, outcome)) => {
                    log_outcome(&outcome);
                    results[slot] = Some(outcome);
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!("search deadline of {:?} reached", self.deadline);
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let [primary, secondary] = results;
        (primary, secondary)
    }
}

fn log_outcome(outcome: &SearchOutcome) {
    match &outcome.outcome {
        ProbeOutcome::Domain(domain) => debug!("{} -> {domain}", outcome.engine),
        ProbeOutcome::NoResult => debug!("{} -> no result", outcome.engine),
        ProbeOutcome::Failed(err) => debug!("{} -> failed: {err}", outcome.engine),
    }
}

/// Combine two optional domains. `primary` wins unless only `secondary`
/// contains the lowercased, space-stripped query.
pub fn decide(query: &str, primary: Option<&str>, secondary: Option<&str>) -> Option<String> {
    match (primary, secondary) {
        (Some(a), Some(b)) if a == b => Some(a.to_string()),
        (Some(a), Some(b)) => {
            let squashed = squash_query(query);
            let a_matches = !squashed.is_empty() && a.contains(&squashed);
            let b_matches = !squashed.is_empty() && b.contains(&squashed);
            if b_matches && !a_matches {
                Some(b.to_string())
            } else {
                Some(a.to_string())
            }
        }
        (Some(a), None) => Some(a.to_string()),
        (None, Some(b)) => Some(b.to_string()),
        (None, None) => None,
    }
}

fn squash_query(query: &str) -> String {
    query.to_lowercase().replace(' ', "")
}
