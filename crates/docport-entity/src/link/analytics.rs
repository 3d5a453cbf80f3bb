//! Per-link engagement analytics snapshot.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregated engagement counters embedded in a [`super::ShareLink`].
///
/// All mutation happens through the store's atomic merge operations;
/// `unique_visitors` has set semantics (membership test before insert).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkAnalytics {
    /// Deduplicated visitor fingerprints.
    pub unique_visitors: Vec<String>,
    /// View counts keyed by country code.
    pub views_by_country: HashMap<String, i64>,
    /// View counts keyed by device class (`mobile`/`tablet`/`desktop`).
    pub views_by_device: HashMap<String, i64>,
    /// Running average of reported dwell time, in seconds.
    pub average_view_time_seconds: f64,
    /// Total downloads through this link.
    pub total_downloads: i64,
    /// Last time any grant was recorded.
    pub last_accessed: Option<DateTime<Utc>>,
}

impl LinkAnalytics {
    /// Number of distinct visitors seen so far.
    pub fn unique_visitor_count(&self) -> usize {
        self.unique_visitors.len()
    }
}
