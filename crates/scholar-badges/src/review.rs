use crate::badge::BadgeTable;
use crate::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Cumulative review activity for one wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerStats {
    /// Writers may omit this; the map key in [`ReviewsData`] is authoritative.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub wallet: String,
    #[serde(default)]
    pub total_reviews: u64,
    /// Last level for which a badge was actually issued. May lag behind the
    /// level implied by `total_reviews` until the reviewer claims.
    #[serde(default)]
    pub badge_level: u32,
    #[serde(default)]
    pub specialties: BTreeSet<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub joined_at: DateTime<Utc>,
    /// Fields written by other producers, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReviewerStats {
    /// Zero-valued record for a wallet with no history.
    ///
    /// Only ever used as a view of "nothing yet"; it is not written back to
    /// the store.
    pub fn new_unpersisted(wallet: impl Into<String>, joined_at: DateTime<Utc>) -> Self {
        Self {
            wallet: wallet.into(),
            total_reviews: 0,
            badge_level: 0,
            specialties: BTreeSet::new(),
            joined_at,
            extra: Map::new(),
        }
    }

    /// Recorded badge does not run ahead of the review count.
    pub fn is_consistent(&self, table: &BadgeTable) -> bool {
        self.badge_level <= table.calculate_badge_level(self.total_reviews)
    }
}

/// One entry of the append-only review log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub reviewer_wallet: String,
    pub paper_id: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_ref: Option<String>,
    /// Review body, rating and anything else the writer attached.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Root persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsData {
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub reviewer_stats: BTreeMap<String, ReviewerStats>,
}

impl ReviewsData {
    pub fn stats_for(&self, wallet: &str) -> Option<&ReviewerStats> {
        self.reviewer_stats.get(wallet)
    }

    /// Owned copy of a wallet's stats with `wallet` filled from the map key
    /// when the record left it out.
    pub fn reviewer(&self, wallet: &str) -> Option<ReviewerStats> {
        self.stats_for(wallet).map(|stats| {
            let mut stats = stats.clone();
            if stats.wallet.is_empty() {
                stats.wallet = wallet.to_string();
            }
            stats
        })
    }

    /// Reviews authored by `wallet`, in log order.
    pub fn reviews_by<'a>(&'a self, wallet: &'a str) -> impl Iterator<Item = &'a Review> + 'a {
        self.reviews
            .iter()
            .filter(move |r| r.reviewer_wallet == wallet)
    }
}
