use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BadgeError {
    #[error("Badge table must contain at least one tier")]
    EmptyTable,

    #[error("Badge levels must be strictly increasing: level {current} follows level {previous}")]
    LevelOrder { previous: u32, current: u32 },

    #[error("Review minimums must be strictly increasing: level {level} requires {min_reviews}, previous tier requires {previous_min}")]
    ThresholdOrder {
        level: u32,
        min_reviews: u64,
        previous_min: u64,
    },
}

pub type Result<T> = std::result::Result<T, BadgeError>;
