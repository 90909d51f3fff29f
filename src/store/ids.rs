//! Order and tracking id counters.
//!
//! ## Lifecycle
//!
//! ```text
//! load(file) -> issue_order_id() -> save -> issue_tracking_id() -> save
//! ```
//!
//! Both counters start at 1 and only move forward. Every issue is
//! followed by a save, so a restart resumes after the last id handed out.
//! Orders loaded from disk also push the counters past their own sequence
//! numbers, so a stale or missing counters file cannot cause a re-issue.

use tracing::warn;

use crate::persist::codec::{decode_counters, encode_counters};
use crate::types::{format_order_id, format_tracking_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdCounters {
    next_order: u64,
    next_tracking: u64,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            next_order: 1,
            next_tracking: 1,
        }
    }
}

impl IdCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from the first line of `id_counters.txt`.
    ///
    /// A malformed line keeps the defaults. Values below 1 are raised to 1.
    pub fn from_line(line: &str) -> Self {
        match decode_counters(line) {
            Ok((order, tracking)) => Self {
                next_order: order.max(1),
                next_tracking: tracking.max(1),
            },
            Err(err) => {
                warn!(error = %err, "Malformed id counters, starting from 1");
                Self::default()
            }
        }
    }

    #[inline]
    pub fn next_order(&self) -> u64 {
        self.next_order
    }

    #[inline]
    pub fn next_tracking(&self) -> u64 {
        self.next_tracking
    }

    /// Hand out the next `ORDnnnnnn` id. The caller persists afterwards.
    pub fn issue_order_id(&mut self) -> String {
        let id = format_order_id(self.next_order);
        self.next_order += 1;
        id
    }

    /// Hand out the next `TRKnnnnnn` id. The caller persists afterwards.
    pub fn issue_tracking_id(&mut self) -> String {
        let id = format_tracking_id(self.next_tracking);
        self.next_tracking += 1;
        id
    }

    /// Move past the sequence numbers of an existing order
    pub fn observe(&mut self, order_id: &str, tracking_id: &str) {
        if let Some(seq) = sequence_of(order_id, "ORD") {
            self.next_order = self.next_order.max(seq.saturating_add(1));
        }
        if let Some(seq) = sequence_of(tracking_id, "TRK") {
            self.next_tracking = self.next_tracking.max(seq.saturating_add(1));
        }
    }

    pub fn encode(&self) -> String {
        encode_counters(self.next_order, self.next_tracking)
    }
}

fn sequence_of(id: &str, prefix: &str) -> Option<u64> {
    id.strip_prefix(prefix)?.parse().ok()
}

// ============================================================================
// Unit Tests
// ============================================================================
