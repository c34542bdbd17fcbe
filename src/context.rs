//! Per-run analysis context
//!
//! One `RunContext` is created for each analysis and handed to every
//! provider call. It carries the subject, a run id, the tracing span all
//! run logging nests under, and a cancellation flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::Span;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: Uuid,
    pub subject_url: String,
    pub subject_domain: String,
    span: Span,
    cancelled: Arc<AtomicBool>,
}

impl RunContext {
    pub fn new(subject_url: impl Into<String>, subject_domain: impl Into<String>) -> Self {
        let run_id = Uuid::new_v4();
        let subject_url = subject_url.into();
        let span = tracing::info_span!("analysis", %run_id, url = %subject_url);
        Self {
            run_id,
            subject_url,
            subject_domain: subject_domain.into(),
            span,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Context for a subject URL, deriving the domain from its host
    pub fn for_url(subject_url: impl Into<String>) -> Self {
        let subject_url = subject_url.into();
        let domain = domain_of(&subject_url);
        Self::new(subject_url, domain)
    }

    /// Span that all logging for this run nests under
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Request cancellation. Partially collected results are discarded.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Shared handle that lets another thread cancel this run
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

/// Host part of a URL, without scheme, credentials, port or a leading `www.`
pub fn domain_of(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = authority.rsplit('@').next().unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();
    host.trim_start_matches("www.").to_lowercase()
}
