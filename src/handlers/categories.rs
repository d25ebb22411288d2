use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::category;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Request body for creating a new category
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCategoryRequest {
    /// The category name (must be unique)
    pub category_name: String,
}

/// Request body for updating a category
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateCategoryRequest {
    /// The category name (must be unique)
    pub category_name: Option<String>,
}

/// Category response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub category_name: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            category_name: model.category_name,
        }
    }
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created successfully", body = ApiResponse<CategoryResponse>),
        (status = 409, description = "Category name already exists", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), ApiError> {
    trace!("Entering create_category function");
    debug!("Creating category with name: {}", request.category_name);

    let new_category = category::ActiveModel {
        category_name: Set(request.category_name.clone()),
        ..Default::default()
    };

    let category_model = match new_category.insert(&state.db).await {
        Ok(category_model) => category_model,
        Err(db_error) => {
            warn!(
                "Failed to create category '{}': {}",
                request.category_name, db_error
            );
            return Err(ApiError::classify_write(
                db_error,
                format!(
                    "Category with name '{}' already exists",
                    request.category_name
                ),
                "DUPLICATE_CATEGORY",
            ));
        }
    };

    info!(
        "Category created successfully with ID: {}",
        category_model.id
    );
    let response = ApiResponse {
        data: CategoryResponse::from(category_model),
        message: "Category created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all categories
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Categories retrieved successfully", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, ApiError> {
    trace!("Entering get_categories function");
    debug!("Fetching all categories");

    let categories = category::Entity::find().all(&state.db).await?;
    info!("Retrieved {} categories", categories.len());

    Ok(Json(ApiResponse {
        data: categories.into_iter().map(CategoryResponse::from).collect(),
        message: "Categories retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get a single category by ID
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CategoryResponse>>, ApiError> {
    trace!("Entering get_category function");
    debug!("Fetching category with ID: {}", id);

    let category_model = category::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Category {} not found", id);
            ApiError::NotFound(format!("Category with ID {id} not found"))
        })?;

    info!("Category {} found", id);
    Ok(Json(ApiResponse {
        data: CategoryResponse::from(category_model),
        message: "Category retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated successfully", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = crate::schemas::ErrorResponse),
        (status = 409, description = "Category name already exists", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<CategoryResponse>>, ApiError> {
    trace!("Entering update_category function");
    debug!("Updating category with ID: {}", id);

    let existing_category = category::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Category {} not found", id);
            ApiError::NotFound(format!("Category with ID {id} not found"))
        })?;

    let Some(category_name) = request.category_name else {
        debug!("No fields to update for category ID: {}", id);
        return Ok(Json(ApiResponse {
            data: CategoryResponse::from(existing_category),
            message: "Category updated successfully".to_string(),
            success: true,
        }));
    };

    let mut category_active: category::ActiveModel = existing_category.into();
    category_active.category_name = Set(category_name.clone());

    let updated_category = match category_active.update(&state.db).await {
        Ok(updated) => updated,
        Err(db_error) => {
            warn!("Failed to update category {}: {}", id, db_error);
            return Err(ApiError::classify_write(
                db_error,
                format!("Category with name '{category_name}' already exists"),
                "DUPLICATE_CATEGORY",
            ));
        }
    };

    info!("Category {} updated successfully", id);
    Ok(Json(ApiResponse {
        data: CategoryResponse::from(updated_category),
        message: "Category updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a category. Categories still referenced by produce listings
/// are protected by the foreign key and surface as a conflict.
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted successfully"),
        (status = 404, description = "Category not found", body = crate::schemas::ErrorResponse),
        (status = 409, description = "Category still referenced by produce", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_category function");
    debug!("Deleting category with ID: {}", id);

    let category_model = category::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Category {} not found", id);
            ApiError::NotFound(format!("Category with ID {id} not found"))
        })?;

    match category_model.delete(&state.db).await {
        Ok(_) => {
            info!("Category {} deleted successfully", id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(db_error) => {
            warn!("Failed to delete category {}: {}", id, db_error);
            Err(ApiError::classify_write(
                db_error,
                format!("Category with ID {id} is still referenced by produce listings"),
                "CATEGORY_IN_USE",
            ))
        }
    }
}
