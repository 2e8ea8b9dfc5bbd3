use crate::config::{ServiceConfig, DEFAULT_CONFIG_FILE};
use crate::stats::{ReviewerSnapshot, StatsService};
use anyhow::{Context, Result};
use scholar_badges::BadgeTable;
use scholar_storage::JsonFileStore;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Stats service over the configured JSON store and badge table.
pub fn build_stats_service(config: &ServiceConfig) -> Result<StatsService> {
    let badges = Arc::new(config.badge_table()?);
    let store = Arc::new(JsonFileStore::new(&config.store.path));
    Ok(StatsService::new(store, badges))
}

/// Run one stats query against the store and print it
pub async fn run_stats_query(config: &ServiceConfig, wallet: &str, as_json: bool) -> Result<()> {
    let service = build_stats_service(config)?;
    let snapshot = service
        .query(wallet)
        .await
        .with_context(|| format!("Stats query for {:?} failed", wallet))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_snapshot(&snapshot, service.badges()));
    }
    Ok(())
}

pub fn render_snapshot(snapshot: &ReviewerSnapshot, badges: &BadgeTable) -> String {
    let mut out = String::new();
    let stats = &snapshot.stats;

    let _ = writeln!(out, "Wallet:          {}", stats.wallet);
    let _ = writeln!(out, "Joined:          {}", stats.joined_at.to_rfc3339());
    let _ = writeln!(out, "Total reviews:   {}", stats.total_reviews);
    if !stats.specialties.is_empty() {
        let specialties: Vec<&str> = stats.specialties.iter().map(String::as_str).collect();
        let _ = writeln!(out, "Specialties:     {}", specialties.join(", "));
    }

    match snapshot.current_badge(badges) {
        Some(tier) => {
            let _ = writeln!(
                out,
                "Current badge:   {} {} (level {})",
                tier.icon, tier.name, tier.level
            );
        }
        None => {
            let _ = writeln!(out, "Current badge:   none (level {})", snapshot.current_level);
        }
    }
    let _ = writeln!(out, "Issued level:    {}", stats.badge_level);

    match snapshot.next_badge(badges) {
        Some(next) => {
            let _ = writeln!(
                out,
                "Next badge:      {} {} at {} reviews ({} to go)",
                next.icon, next.name, snapshot.next_requirement, snapshot.reviews_until_next_level
            );
        }
        None => {
            let _ = writeln!(out, "Next badge:      top tier reached");
        }
    }

    if snapshot.can_claim_badge {
        let _ = writeln!(out, "🎉 A new badge can be claimed");
    }
    let _ = writeln!(out, "Reviews listed:  {}", snapshot.reviews.len());

    out
}

pub fn render_badge_table(badges: &BadgeTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<6} {:>8}  {:<4} {:<20} {}", "LEVEL", "REVIEWS", "", "NAME", "COLOR");
    for tier in badges.tiers() {
        let _ = writeln!(
            out,
            "{:<6} {:>8}  {:<4} {:<20} {}",
            tier.level, tier.min_reviews, tier.icon, tier.name, tier.color
        );
    }
    out
}

/// Create the store file with an empty document unless it already exists
pub async fn seed_store(path: &Path) -> Result<()> {
    let store = JsonFileStore::new(path);
    if store.ensure_exists().await? {
        info!(path = ?path, "✨ Review store initialized");
    } else {
        info!(path = ?path, "Review store already exists, left untouched");
    }
    Ok(())
}

/// Write a default config file into `output_dir`
pub fn write_default_config(output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {:?}", output_dir))?;

    let path = output_dir.join(DEFAULT_CONFIG_FILE);
    ServiceConfig::default().save_to_file(&path)?;

    info!(path = ?path, "⚙️ Wrote default configuration");
    Ok(path)
}
