//! Reviewer stats query.
//!
//! Produces a read-only snapshot for one wallet: the stored stats (or a
//! zero-valued stand-in), the wallet's reviews in log order, and the badge
//! progress derived from the threshold table. The store is read once per query
//! and never written.

use crate::metrics::Metrics;
use chrono::Utc;
use scholar_badges::{BadgeTable, BadgeTier, Review, ReviewerStats};
use scholar_storage::{ReviewStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Wallet address is required")]
    InvalidWallet,

    #[error("Failed to load reviewer stats: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerSnapshot {
    pub stats: ReviewerStats,
    pub reviews: Vec<Review>,
    pub current_level: u32,
    pub next_requirement: u64,
    pub can_claim_badge: bool,
    pub reviews_until_next_level: u64,
}

impl ReviewerSnapshot {
    /// Compose the snapshot from a stats record and the wallet's reviews.
    pub fn compose(stats: ReviewerStats, reviews: Vec<Review>, badges: &BadgeTable) -> Self {
        let current_level = badges.calculate_badge_level(stats.total_reviews);
        let next_requirement = badges.next_badge_requirement(current_level);

        Self {
            can_claim_badge: current_level > stats.badge_level,
            reviews_until_next_level: next_requirement.saturating_sub(stats.total_reviews),
            current_level,
            next_requirement,
            stats,
            reviews,
        }
    }

    pub fn current_badge<'a>(&self, badges: &'a BadgeTable) -> Option<&'a BadgeTier> {
        badges.tier(self.current_level)
    }

    /// Next tier to work towards, `None` once the top tier is reached.
    pub fn next_badge<'a>(&self, badges: &'a BadgeTable) -> Option<&'a BadgeTier> {
        badges.tiers().iter().find(|t| t.level > self.current_level)
    }
}

#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn ReviewStore>,
    badges: Arc<BadgeTable>,
    metrics: Metrics,
}

impl StatsService {
    pub fn new(store: Arc<dyn ReviewStore>, badges: Arc<BadgeTable>) -> Self {
        Self {
            store,
            badges,
            metrics: Metrics::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn badges(&self) -> &BadgeTable {
        &self.badges
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub async fn query(&self, wallet: &str) -> Result<ReviewerSnapshot, QueryError> {
        if wallet.trim().is_empty() {
            self.metrics.stats_rejected.inc();
            return Err(QueryError::InvalidWallet);
        }

        let start = Instant::now();
        let loaded = self.store.load().await;
        self.metrics
            .store_load_duration
            .observe(start.elapsed().as_secs_f64());

        let data = match loaded {
            Ok(data) => data.unwrap_or_default(),
            Err(e) => {
                self.metrics.store_failures.inc();
                return Err(e.into());
            }
        };

        let stored = data.reviewer(wallet);
        let known = stored.is_some();
        let stats =
            stored.unwrap_or_else(|| ReviewerStats::new_unpersisted(wallet, Utc::now()));

        if !stats.is_consistent(&self.badges) {
            warn!(
                operation = "stats_query",
                wallet = %wallet,
                total_reviews = stats.total_reviews,
                badge_level = stats.badge_level,
                "⚠️ Recorded badge level is ahead of review count"
            );
        }

        let reviews: Vec<Review> = data.reviews_by(wallet).cloned().collect();
        let snapshot = ReviewerSnapshot::compose(stats, reviews, &self.badges);
        self.metrics.stats_queries.inc();

        debug!(
            operation = "stats_query",
            wallet = %wallet,
            known_reviewer = known,
            current_level = snapshot.current_level,
            can_claim_badge = snapshot.can_claim_badge,
            reviews = snapshot.reviews.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Reviewer stats computed"
        );

        Ok(snapshot)
    }
}
