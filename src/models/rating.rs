//! Rating model.
//!
//! One Rating record materializes per rating submission (auto-approved,
//! for reporting) in addition to the `rating` field set on the ticket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rating {
    pub rating_id: Uuid,
    pub ticket_id: Uuid,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

/// Input for submitting a rating on a ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRating {
    pub rating: i16,
}

impl SubmitRating {
    pub fn is_valid(&self) -> bool {
        (1..=5).contains(&self.rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(SubmitRating { rating: 1 }.is_valid());
        assert!(SubmitRating { rating: 5 }.is_valid());
        assert!(!SubmitRating { rating: 0 }.is_valid());
        assert!(!SubmitRating { rating: 6 }.is_valid());
    }
}
