//! Reviewer badge tiers.
//!
//! A [`BadgeTable`] is an ordered list of tiers, each unlocked once a reviewer
//! has authored at least `min_reviews` reviews. The calculator functions on the
//! table are pure and total: every review count maps to a level and every level
//! maps to a next requirement.

use crate::error::{BadgeError, Result};
use serde::{Deserialize, Serialize};

/// A single badge rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeTier {
    pub level: u32,
    pub min_reviews: u64,
    pub name: String,
    pub icon: String,
    pub color: String,
}

impl BadgeTier {
    pub fn new(
        level: u32,
        min_reviews: u64,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            level,
            min_reviews,
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
        }
    }
}

/// Validated threshold table. Levels and minimums are both strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeTable {
    tiers: Vec<BadgeTier>,
}

impl Default for BadgeTable {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
        }
    }
}

/// The tiers shipped with the service.
pub fn default_tiers() -> Vec<BadgeTier> {
    vec![
        BadgeTier::new(0, 0, "Newcomer", "📝", "#9CA3AF"),
        BadgeTier::new(1, 5, "Bronze Reviewer", "🥉", "#CD7F32"),
        BadgeTier::new(2, 15, "Silver Reviewer", "🥈", "#C0C0C0"),
        BadgeTier::new(3, 30, "Gold Reviewer", "🥇", "#FFD700"),
    ]
}

impl BadgeTable {
    pub fn new(tiers: Vec<BadgeTier>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(BadgeError::EmptyTable);
        }

        for pair in tiers.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            if current.level <= previous.level {
                return Err(BadgeError::LevelOrder {
                    previous: previous.level,
                    current: current.level,
                });
            }
            if current.min_reviews <= previous.min_reviews {
                return Err(BadgeError::ThresholdOrder {
                    level: current.level,
                    min_reviews: current.min_reviews,
                    previous_min: previous.min_reviews,
                });
            }
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[BadgeTier] {
        &self.tiers
    }

    pub fn tier(&self, level: u32) -> Option<&BadgeTier> {
        self.tiers.iter().find(|t| t.level == level)
    }

    pub fn max_tier(&self) -> &BadgeTier {
        // Non-empty by construction
        &self.tiers[self.tiers.len() - 1]
    }

    /// Highest level whose minimum is at most `total_reviews`, or 0 when the
    /// count is below every tier.
    pub fn calculate_badge_level(&self, total_reviews: u64) -> u32 {
        let reached = self
            .tiers
            .partition_point(|t| t.min_reviews <= total_reviews);

        match reached {
            0 => 0,
            n => self.tiers[n - 1].level,
        }
    }

    /// Review count required for the tier directly above `current_level`.
    ///
    /// Saturates at the top: for the maximum level (or anything above it) the
    /// maximum tier's own minimum is returned.
    pub fn next_badge_requirement(&self, current_level: u32) -> u64 {
        let above = self.tiers.partition_point(|t| t.level <= current_level);

        self.tiers
            .get(above)
            .unwrap_or_else(|| self.max_tier())
            .min_reviews
    }

    /// Tier reached for `total_reviews`, if that level is in the table.
    pub fn badge_for(&self, total_reviews: u64) -> Option<&BadgeTier> {
        self.tier(self.calculate_badge_level(total_reviews))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BadgeTable {
        BadgeTable::default()
    }

    #[test]
    fn test_level_boundaries() {
        let table = table();
        assert_eq!(table.calculate_badge_level(0), 0);
        assert_eq!(table.calculate_badge_level(4), 0);
        assert_eq!(table.calculate_badge_level(5), 1);
        assert_eq!(table.calculate_badge_level(14), 1);
        assert_eq!(table.calculate_badge_level(15), 2);
        assert_eq!(table.calculate_badge_level(29), 2);
        assert_eq!(table.calculate_badge_level(30), 3);
        assert_eq!(table.calculate_badge_level(u64::MAX), 3);
    }

    #[test]
    fn test_next_requirement() {
        let table = table();
        assert_eq!(table.next_badge_requirement(0), 5);
        assert_eq!(table.next_badge_requirement(1), 15);
        assert_eq!(table.next_badge_requirement(2), 30);
        // Saturates at the top tier
        assert_eq!(table.next_badge_requirement(3), 30);
        assert_eq!(table.next_badge_requirement(99), 30);
    }

    #[test]
    fn test_table_without_zero_tier() {
        let table = BadgeTable::new(vec![
            BadgeTier::new(1, 10, "Reviewer", "⭐", "#000000"),
            BadgeTier::new(2, 20, "Senior Reviewer", "🌟", "#111111"),
        ])
        .unwrap();

        assert_eq!(table.calculate_badge_level(9), 0);
        assert_eq!(table.calculate_badge_level(10), 1);
        assert_eq!(table.next_badge_requirement(0), 10);
        assert!(table.badge_for(3).is_none());
        assert_eq!(table.badge_for(25).map(|t| t.name.as_str()), Some("Senior Reviewer"));
    }

    #[test]
    fn test_rejects_invalid_tables() {
        assert_eq!(BadgeTable::new(vec![]), Err(BadgeError::EmptyTable));

        let unordered_levels = BadgeTable::new(vec![
            BadgeTier::new(2, 0, "a", "", ""),
            BadgeTier::new(1, 5, "b", "", ""),
        ]);
        assert_eq!(
            unordered_levels,
            Err(BadgeError::LevelOrder {
                previous: 2,
                current: 1
            })
        );

        let flat_thresholds = BadgeTable::new(vec![
            BadgeTier::new(0, 5, "a", "", ""),
            BadgeTier::new(1, 5, "b", "", ""),
        ]);
        assert!(matches!(
            flat_thresholds,
            Err(BadgeError::ThresholdOrder { level: 1, .. })
        ));
    }

    #[test]
    fn test_tier_serializes_camel_case() {
        let json = serde_json::to_value(table().max_tier()).unwrap();
        assert_eq!(json["minReviews"], 30);
        assert_eq!(json["name"], "Gold Reviewer");
    }
}
