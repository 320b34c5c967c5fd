//! Routing Rules (C4): `(office, service, priority) -> window` (spec §4.4).

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Office, Window};
use crate::repositories::WindowRepository;

/// Select the target window for an admit.
///
/// 1. `priority=true`: the unique open `"Priority"` window, or `Unavailable`.
/// 2. Else: an open non-`"Priority"` window serving `service_id`, lowest
///    `name` first, or `Unavailable` if none is open.
pub async fn select_window(
    pool: &PgPool,
    office: Office,
    service_id: Uuid,
    priority: bool,
) -> Result<Window, AppError> {
    let open_windows = WindowRepository::list_open_by_office(pool, office).await?;
    choose_window(&open_windows, service_id, priority)
        .cloned()
        .ok_or_else(|| {
            if priority {
                AppError::unavailable("No open Priority window")
            } else {
                AppError::unavailable("No open window serves this service")
            }
        })
}

/// The pure decision rule of spec §4.4 steps 1-2, applied over one
/// office's open windows. Pulled out of `select_window` so it can be
/// exercised directly without a live pool.
fn choose_window(open_windows: &[Window], service_id: Uuid, priority: bool) -> Option<&Window> {
    if priority {
        open_windows.iter().find(|w| w.is_priority_window())
    } else {
        open_windows
            .iter()
            .filter(|w| !w.is_priority_window() && w.service_ids.contains(&service_id))
            .min_by(|a, b| a.name.cmp(&b.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(name: &str, service_ids: Vec<Uuid>) -> Window {
        Window {
            window_id: Uuid::new_v4(),
            office: Office::Registrar,
            name: name.to_string(),
            service_ids,
            is_open: true,
            is_serving: true,
        }
    }

    #[test]
    fn test_choose_window_picks_priority_window_for_priority_tickets() {
        let service_id = Uuid::new_v4();
        let windows = vec![window("Window 1", vec![service_id]), window("Priority", vec![])];
        let chosen = choose_window(&windows, service_id, true).unwrap();
        assert_eq!(chosen.name, "Priority");
    }

    #[test]
    fn test_choose_window_none_when_no_priority_window_open() {
        let service_id = Uuid::new_v4();
        let windows = vec![window("Window 1", vec![service_id])];
        assert!(choose_window(&windows, service_id, true).is_none());
    }

    #[test]
    fn test_choose_window_picks_lowest_name_among_matches() {
        let service_id = Uuid::new_v4();
        let windows = vec![
            window("Window 2", vec![service_id]),
            window("Window 1", vec![service_id]),
        ];
        let chosen = choose_window(&windows, service_id, false).unwrap();
        assert_eq!(chosen.name, "Window 1");
    }

    #[test]
    fn test_choose_window_never_routes_non_priority_to_priority_window() {
        let service_id = Uuid::new_v4();
        let windows = vec![window("Priority", vec![service_id])];
        assert!(choose_window(&windows, service_id, false).is_none());
    }

    #[test]
    fn test_choose_window_filters_by_unmatched_service_id() {
        let service_id = Uuid::new_v4();
        let other_service = Uuid::new_v4();
        let windows = vec![window("Window 1", vec![other_service])];
        assert!(choose_window(&windows, service_id, false).is_none());
    }
}
