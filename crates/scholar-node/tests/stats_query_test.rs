use chrono::{TimeZone, Utc};
use scholar_badges::{BadgeTable, BadgeTier, Review, ReviewerStats, ReviewsData};
use scholar_node::{QueryError, StatsService};
use scholar_storage::{JsonFileStore, MemoryStore, ReviewStore};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

fn thresholds() -> Arc<BadgeTable> {
    Arc::new(
        BadgeTable::new(vec![
            BadgeTier::new(0, 0, "None", "", ""),
            BadgeTier::new(1, 5, "Bronze", "", ""),
            BadgeTier::new(2, 15, "Silver", "", ""),
            BadgeTier::new(3, 30, "Gold", "", ""),
        ])
        .unwrap(),
    )
}

fn reviewer(wallet: &str, total_reviews: u64, badge_level: u32) -> ReviewerStats {
    ReviewerStats {
        wallet: wallet.to_string(),
        total_reviews,
        badge_level,
        specialties: BTreeSet::from(["neuroscience".to_string()]),
        joined_at: Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
        extra: Default::default(),
    }
}

fn review(wallet: &str, paper: &str, day: u32) -> Review {
    Review {
        id: Some(format!("{}:{}", wallet, paper)),
        reviewer_wallet: wallet.to_string(),
        paper_id: paper.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 4, day, 0, 0, 0).unwrap(),
        content_ref: Some(format!("ar://{}", paper)),
        extra: Default::default(),
    }
}

fn document() -> ReviewsData {
    let mut reviewer_stats = BTreeMap::new();
    reviewer_stats.insert("fresh-bronze".to_string(), reviewer("fresh-bronze", 5, 0));
    reviewer_stats.insert("veteran".to_string(), reviewer("veteran", 40, 3));

    ReviewsData {
        reviews: vec![
            review("fresh-bronze", "paper-9", 1),
            review("veteran", "paper-1", 2),
            review("fresh-bronze", "paper-4", 3),
            review("someone-else", "paper-4", 4),
            review("fresh-bronze", "paper-2", 5),
        ],
        reviewer_stats,
    }
}

#[tokio::test]
async fn test_newly_claimable_badge() {
    let store = MemoryStore::with_data(document());
    let service = StatsService::new(Arc::new(store.clone()), thresholds());

    let snapshot = service.query("fresh-bronze").await.unwrap();

    assert_eq!(snapshot.current_level, 1);
    assert!(snapshot.can_claim_badge);
    assert_eq!(snapshot.next_requirement, 15);
    assert_eq!(snapshot.reviews_until_next_level, 10);

    let papers: Vec<_> = snapshot.reviews.iter().map(|r| r.paper_id.as_str()).collect();
    assert_eq!(papers, vec!["paper-9", "paper-4", "paper-2"]);
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_top_tier_already_issued() {
    let service = StatsService::new(Arc::new(MemoryStore::with_data(document())), thresholds());

    let snapshot = service.query("veteran").await.unwrap();

    assert_eq!(snapshot.current_level, 3);
    assert!(!snapshot.can_claim_badge);
    assert_eq!(snapshot.next_requirement, 30);
    assert_eq!(snapshot.reviews_until_next_level, 0);
    assert_eq!(snapshot.reviews.len(), 1);
}

#[tokio::test]
async fn test_unknown_wallet_gets_zero_snapshot_without_write() {
    let store = MemoryStore::with_data(document());
    let service = StatsService::new(Arc::new(store.clone()), thresholds());

    let before = Utc::now();
    let snapshot = service.query("never-reviewed").await.unwrap();

    assert_eq!(snapshot.stats.wallet, "never-reviewed");
    assert_eq!(snapshot.stats.total_reviews, 0);
    assert_eq!(snapshot.stats.badge_level, 0);
    assert!(snapshot.stats.specialties.is_empty());
    assert!(snapshot.stats.joined_at >= before);
    assert_eq!(snapshot.current_level, 0);
    assert!(!snapshot.can_claim_badge);
    assert_eq!(snapshot.next_requirement, 5);
    assert_eq!(snapshot.reviews_until_next_level, 5);

    assert_eq!(store.save_count(), 0);
    assert_eq!(store.snapshot().await, Some(document()));
}

#[tokio::test]
async fn test_reviews_until_next_level_matches_formula() {
    let badges = thresholds();
    for total in 0..=45u64 {
        let mut data = ReviewsData::default();
        data.reviewer_stats
            .insert("w".to_string(), reviewer("w", total, 0));
        let service = StatsService::new(Arc::new(MemoryStore::with_data(data)), badges.clone());

        let snapshot = service.query("w").await.unwrap();
        let expected = snapshot.next_requirement.saturating_sub(total);
        assert_eq!(snapshot.reviews_until_next_level, expected, "total = {}", total);
        assert_eq!(snapshot.can_claim_badge, snapshot.current_level > 0);
    }
}

#[tokio::test]
async fn test_missing_store_file_is_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.json");
    let service = StatsService::new(Arc::new(JsonFileStore::new(&path)), thresholds());

    let snapshot = service.query("wallet-a").await.unwrap();

    assert_eq!(snapshot.stats.total_reviews, 0);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_query_sees_external_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.json");
    let writer = JsonFileStore::new(&path);
    let service = StatsService::new(Arc::new(JsonFileStore::new(&path)), thresholds());

    assert_eq!(service.query("veteran").await.unwrap().current_level, 0);

    writer.save(&document()).await.unwrap();
    assert_eq!(service.query("veteran").await.unwrap().current_level, 3);
}

#[tokio::test]
async fn test_corrupt_store_fails_query() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.json");
    std::fs::write(&path, "not json at all").unwrap();

    let service = StatsService::new(Arc::new(JsonFileStore::new(&path)), thresholds());
    let err = service.query("wallet-a").await.unwrap_err();
    assert!(matches!(err, QueryError::Store(_)));
}

#[tokio::test]
async fn test_epoch_millis_record_does_not_break_other_wallets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.json");
    std::fs::write(
        &path,
        r#"{
  "reviews": [],
  "reviewerStats": {
    "good": { "wallet": "good", "totalReviews": 6, "badgeLevel": 0, "joinedAt": "2024-01-01T00:00:00.000Z" },
    "legacy": { "wallet": "legacy", "totalReviews": 1, "badgeLevel": 0, "joinedAt": 1704067200000 }
  }
}"#,
    )
    .unwrap();

    let service = StatsService::new(Arc::new(JsonFileStore::new(&path)), thresholds());

    let good = service.query("good").await.unwrap();
    assert_eq!(good.current_level, 1);

    let legacy = service.query("legacy").await.unwrap();
    assert_eq!(
        legacy.stats.joined_at,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_record_without_wallet_field_reports_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.json");
    std::fs::write(
        &path,
        r#"{"reviewerStats": {"7xKX": {"totalReviews": 15, "joinedAt": "2024-01-01T00:00:00Z"}}}"#,
    )
    .unwrap();

    let service = StatsService::new(Arc::new(JsonFileStore::new(&path)), thresholds());
    let snapshot = service.query("7xKX").await.unwrap();

    assert_eq!(snapshot.stats.wallet, "7xKX");
    assert_eq!(snapshot.stats.total_reviews, 15);
    assert_eq!(snapshot.current_level, 2);
}
