//! Pause / Resume (spec §4.6.7): toggle a window's advisory `is_serving`
//! flag. Purely advisory to `next` — it does not affect routing.

use uuid::Uuid;

use crate::error::AppError;
use crate::events::{rooms, Event, EventType};
use crate::models::{Office, Window};
use crate::repositories::WindowRepository;
use crate::state::AppState;

use super::require_same_office;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopAction {
    Pause,
    Resume,
}

pub async fn pause_resume(
    state: &AppState,
    office: Office,
    window_id: Uuid,
    action: StopAction,
) -> Result<Window, AppError> {
    let _guard = state.locks.lock_window(window_id).await;

    let window = WindowRepository::find_by_id(&state.pool, window_id)
        .await?
        .ok_or_else(|| AppError::not_found("Window not found"))?;
    require_same_office(&window, office)?;

    let is_serving = action == StopAction::Resume;
    let updated = WindowRepository::set_is_serving(&state.pool, window_id, is_serving).await?;

    let data = serde_json::json!({
        "windowId": window_id,
        "isServing": updated.is_serving,
    });
    state.events.publish(
        &rooms::admin(office),
        Event::new(EventType::WindowStatusUpdated, Some(office), Some(window_id), data),
    );

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_action_resume_maps_to_serving_true() {
        assert_eq!(StopAction::Resume, StopAction::Resume);
        assert_ne!(StopAction::Resume, StopAction::Pause);
    }
}
