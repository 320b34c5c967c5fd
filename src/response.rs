//! API response types and helper functions.
//!
//! This module provides the standard API response wrapper that all endpoints use.
//! The format follows the API specification:
//!
//! Success: `{ "data": { ... }, "error": null }`
//! Error: `{ "data": null, "error": { "code": "...", "message": "..." } }`

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorDetail};

/// Standard API response wrapper.
///
/// All API endpoints return this format for consistency.
/// The `T` type parameter is the data payload type.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ErrorDetail>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response with data.
    pub fn success(data: T) -> Self {
        ApiResponse {
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response.
    ///
    /// This is defined separately on `ApiResponse<()>` since error responses
    /// never have data, which makes type inference easier.
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        ApiResponse {
            data: None,
            error: Some(ErrorDetail {
                code,
                message: message.into(),
                details: None,
            }),
        }
    }
}

/// Type alias for handler results that return data on success.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Pagination metadata for list endpoints.
///
/// Every list endpoint in the external contract returns this shape
/// alongside its `data` array: `{data, pagination:{currentPage,
/// totalPages, totalCount, limit}}`.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub limit: u32,
}

impl Pagination {
    /// Build pagination metadata, clamping `page` to at least 1 and
    /// `limit` to the 1..=100 range the contract requires.
    pub fn new(page: u32, limit: u32, total_count: u64) -> Self {
        let limit = limit.clamp(1, 100);
        let page = page.max(1);
        let total_pages = if total_count == 0 {
            1
        } else {
            ((total_count as u64 + limit as u64 - 1) / limit as u64) as u32
        };

        Self {
            current_page: page,
            total_pages,
            total_count,
            limit,
        }
    }
}

/// Query-string parameters every list endpoint accepts (spec §6.1):
/// `page` (>=1, default 1) and `limit` (1..=100, default 20).
#[derive(Debug, Clone, Deserialize)]
pub struct PageParams {
    #[serde(default = "PageParams::default_page")]
    pub page: u32,
    #[serde(default = "PageParams::default_limit")]
    pub limit: u32,
}

impl PageParams {
    fn default_page() -> u32 {
        1
    }

    fn default_limit() -> u32 {
        20
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: Self::default_page(),
            limit: Self::default_limit(),
        }
    }
}

/// A page of list results plus its pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> Paginated<T> {
    /// Slice `items` to the page `params` asks for, computing pagination
    /// metadata from the full (unsliced) count. List endpoints fetch the
    /// full (small) result set and page it in memory rather than pushing
    /// `LIMIT`/`OFFSET` down to the query (spec §6.1's catalog listings
    /// are a handful of rows per office).
    pub fn paginate(items: Vec<T>, params: PageParams) -> Self {
        let pagination = Pagination::new(params.page, params.limit, items.len() as u64);
        let start = ((pagination.current_page - 1) as usize) * (pagination.limit as usize);
        let data = if start >= items.len() {
            Vec::new()
        } else {
            let end = (start + pagination.limit as usize).min(items.len());
            items.into_iter().skip(start).take(end - start).collect()
        };

        Self { data, pagination }
    }
}

/// Helper function to return a successful response with data.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Helper function to return a successful response with HTTP 201 Created.
pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Helper function to return an empty success response.
pub fn empty() -> ApiResult<()> {
    Ok(Json(ApiResponse::success(())))
}

/// Helper function to return an empty success response with HTTP 204 No Content.
pub fn no_content() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        id: String,
        name: String,
    }

    #[test]
    fn test_success_response() {
        let data = TestData {
            id: "123".to_string(),
            name: "Test".to_string(),
        };

        let response = ApiResponse::success(data);

        assert!(response.data.is_some());
        assert!(response.error.is_none());

        let data = response.data.unwrap();
        assert_eq!(data.id, "123");
        assert_eq!(data.name, "Test");
    }

    #[test]
    fn test_error_response() {
        let response = ApiResponse::error(crate::error::codes::NOT_FOUND, "Ticket not found");

        assert!(response.data.is_none());
        assert!(response.error.is_some());

        let error = response.error.unwrap();
        assert_eq!(error.code, "NOT_FOUND");
        assert_eq!(error.message, "Ticket not found");
    }

    #[test]
    fn test_response_serialization() {
        let data = TestData {
            id: "456".to_string(),
            name: "Test Item".to_string(),
        };

        let response = ApiResponse::success(data);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains(r#""data":"#));
        assert!(json.contains(r#""error":null"#));
        assert!(json.contains(r#""id":"456""#));
        assert!(json.contains(r#""name":"Test Item""#));
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ApiResponse::error(crate::error::codes::VALIDATION_ERROR, "Invalid input");
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains(r#""data":null"#));
        assert!(json.contains(r#""error":"#));
        assert!(json.contains(r#""code":"VALIDATION_ERROR""#));
        assert!(json.contains(r#""message":"Invalid input""#));
    }

    #[test]
    fn test_empty_success() {
        let result = empty();
        assert!(result.is_ok());

        let response = result.unwrap().0;
        assert!(response.data.is_some());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_ok_helper() {
        let data = TestData {
            id: "789".to_string(),
            name: "Helper Test".to_string(),
        };

        let result = ok(data);
        assert!(result.is_ok());

        let response = result.unwrap().0;
        assert!(response.data.is_some());
        assert!(response.error.is_none());

        let data = response.data.unwrap();
        assert_eq!(data.id, "789");
    }

    #[test]
    fn test_page_params_defaults() {
        let params = PageParams::default();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 20);
    }

    #[test]
    fn test_page_params_deserialize_from_query_string() {
        let params: PageParams = serde_urlencoded::from_str("page=2&limit=10").unwrap();
        assert_eq!(params.page, 2);
        assert_eq!(params.limit, 10);

        let defaulted: PageParams = serde_urlencoded::from_str("").unwrap();
        assert_eq!(defaulted.page, 1);
        assert_eq!(defaulted.limit, 20);
    }

    #[test]
    fn test_pagination_clamps_limit_and_computes_total_pages() {
        let pagination = Pagination::new(1, 500, 45);
        assert_eq!(pagination.limit, 100);
        assert_eq!(pagination.total_pages, 1);

        let pagination = Pagination::new(0, 10, 25);
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.total_pages, 3);
    }

    #[test]
    fn test_pagination_empty_set_has_one_page() {
        let pagination = Pagination::new(1, 20, 0);
        assert_eq!(pagination.total_pages, 1);
    }

    #[test]
    fn test_paginate_slices_to_requested_page() {
        let items: Vec<i32> = (1..=25).collect();
        let page1 = Paginated::paginate(items.clone(), PageParams { page: 1, limit: 10 });
        assert_eq!(page1.data, (1..=10).collect::<Vec<_>>());
        assert_eq!(page1.pagination.total_count, 25);
        assert_eq!(page1.pagination.total_pages, 3);

        let page3 = Paginated::paginate(items, PageParams { page: 3, limit: 10 });
        assert_eq!(page3.data, vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_paginate_past_last_page_is_empty() {
        let items = vec!["a", "b", "c"];
        let page = Paginated::paginate(items, PageParams { page: 5, limit: 10 });
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total_count, 3);
    }
}
