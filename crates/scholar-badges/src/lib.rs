pub mod badge;
pub mod error;
pub mod review;
pub mod timestamp;

pub use badge::{BadgeTable, BadgeTier};
pub use error::{BadgeError, Result};
pub use review::{Review, ReviewerStats, ReviewsData};
