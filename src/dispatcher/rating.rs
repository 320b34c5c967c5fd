//! Rating submission (spec §4.6.9): idempotent, unauthenticated write
//! from the customer-facing ticket lookup page. Sets `rating` on the
//! ticket and materializes a `Rating` record for reporting.

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{SubmitRating, Ticket};
use crate::repositories::{RatingRepository, TicketRepository};
use crate::state::AppState;

pub async fn submit_rating(state: &AppState, ticket_id: Uuid, submission: SubmitRating) -> Result<Ticket, AppError> {
    if !submission.is_valid() {
        return Err(AppError::validation("rating must be between 1 and 5"));
    }

    let ticket = TicketRepository::set_rating(&state.pool, ticket_id, submission.rating).await?;
    RatingRepository::create(&state.pool, ticket_id, submission.rating).await?;

    Ok(ticket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_rating_rejects_out_of_range() {
        assert!(!SubmitRating { rating: 0 }.is_valid());
        assert!(!SubmitRating { rating: 6 }.is_valid());
    }
}
