use std::collections::BTreeMap;

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::serializers::produce::{ProducePayload, ProduceResponse};
use crate::serializers::user::{ProfileData, UserPayload, UserResponse};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Origins allowed by CORS; empty keeps the permissive default
    pub allowed_origins: Vec<String>,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Validation error response: one entry per offending field
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    /// Error messages keyed by field name
    pub errors: BTreeMap<String, Vec<String>>,
    /// Error code (always VALIDATION_ERROR)
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::categories::create_category,
        crate::handlers::categories::get_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        crate::handlers::produce::create_produce,
        crate::handlers::produce::get_produce_listings,
        crate::handlers::produce::get_produce,
        crate::handlers::produce::update_produce,
        crate::handlers::produce::delete_produce,
    ),
    components(
        schemas(
            ApiResponse<UserResponse>,
            ApiResponse<Vec<UserResponse>>,
            ApiResponse<ProduceResponse>,
            ApiResponse<Vec<ProduceResponse>>,
            ApiResponse<crate::handlers::categories::CategoryResponse>,
            ApiResponse<Vec<crate::handlers::categories::CategoryResponse>>,
            ApiResponse<String>,
            ErrorResponse,
            ValidationErrorResponse,
            HealthResponse,
            UserPayload,
            UserResponse,
            ProfileData,
            ProducePayload,
            ProduceResponse,
            crate::handlers::categories::CreateCategoryRequest,
            crate::handlers::categories::UpdateCategoryRequest,
            crate::handlers::categories::CategoryResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User account and profile endpoints"),
        (name = "categories", description = "Produce category endpoints"),
        (name = "produce", description = "Produce listing endpoints"),
    ),
    info(
        title = "Agrirust API",
        description = "Produce Marketplace API - user accounts, categories and produce listings",
        version = "0.1.0",
        contact(
            name = "Agrirust Team",
            email = "contact@agrirust.dev"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
