use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::{category, produce, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::schemas::{ApiResponse, AppState};
use crate::serializers::ValidationErrors;
use crate::serializers::produce::{ProducePayload, ProduceResponse};

/// Query parameters for listing produce
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ProduceListQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    /// Filter by category ID
    pub category_id: Option<i32>,
}

/// A payload may reference a category that does not exist; report that
/// the same way any other bad field is reported.
async fn ensure_category_exists(db: &DatabaseConnection, id: i32) -> Result<(), ApiError> {
    if category::Entity::find_by_id(id).one(db).await?.is_none() {
        warn!("Referenced category {} not found", id);
        let mut errors = ValidationErrors::new();
        errors.add("produce_category", format!("Category with ID {id} not found"));
        return Err(errors.into());
    }
    Ok(())
}

/// Create a new produce listing owned by the authenticated user
#[utoipa::path(
    post,
    path = "/api/v1/produce",
    tag = "produce",
    request_body = ProducePayload,
    responses(
        (status = 201, description = "Produce created successfully", body = ApiResponse<ProduceResponse>),
        (status = 400, description = "Validation failed", body = crate::schemas::ValidationErrorResponse),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, current_user, payload))]
pub async fn create_produce(
    State(state): State<AppState>,
    CurrentUser(current_user): CurrentUser,
    Json(payload): Json<ProducePayload>,
) -> Result<(StatusCode, Json<ApiResponse<ProduceResponse>>), ApiError> {
    trace!("Entering create_produce function");
    let new_produce = payload.validate_create()?;
    debug!(
        "Creating produce '{}' for owner {}",
        new_produce.produce_name, current_user.email
    );

    ensure_category_exists(&state.db, new_produce.produce_category).await?;

    let produce_active = produce::ActiveModel {
        produce_name: Set(new_produce.produce_name),
        produce_category_id: Set(new_produce.produce_category),
        stock: Set(new_produce.stock),
        measurement_unit: Set(new_produce.measurement_unit),
        owner_id: Set(current_user.id),
        price_tag: Set(new_produce.price_tag),
        ..Default::default()
    };

    let produce_model = match produce_active.insert(&state.db).await {
        Ok(produce_model) => produce_model,
        Err(db_error) => {
            warn!("Failed to insert produce: {}", db_error);
            return Err(ApiError::classify_write(
                db_error,
                "Referenced category or owner no longer exists".to_string(),
                "INVALID_REFERENCE",
            ));
        }
    };

    info!(
        "Produce created successfully with ID: {}, owner: {}",
        produce_model.id, current_user.email
    );
    let response = ApiResponse {
        data: ProduceResponse::from_model(produce_model, current_user.email),
        message: "Produce created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get produce listings, paginated and optionally filtered by category
#[utoipa::path(
    get,
    path = "/api/v1/produce",
    tag = "produce",
    params(ProduceListQuery),
    responses(
        (status = 200, description = "Produce listings retrieved successfully", body = ApiResponse<Vec<ProduceResponse>>),
        (status = 400, description = "Invalid query parameters", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_produce_listings(
    Valid(Query(query)): Valid<Query<ProduceListQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProduceResponse>>>, ApiError> {
    trace!("Entering get_produce_listings function");

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);
    debug!("Fetching produce listings - page: {}, limit: {}", page, limit);

    let mut query_builder = produce::Entity::find();
    if let Some(category_id) = query.category_id {
        query_builder = query_builder.filter(produce::Column::ProduceCategoryId.eq(category_id));
    }

    let paginator = query_builder
        .find_also_related(user::Entity)
        .order_by_asc(produce::Column::Id)
        .paginate(&state.db, limit);
    let listings = paginator.fetch_page(page - 1).await?;

    let listing_count = listings.len();
    let responses: Vec<ProduceResponse> = listings
        .into_iter()
        .map(|(produce_model, owner)| {
            let owner_email = owner.map(|owner| owner.email).unwrap_or_default();
            ProduceResponse::from_model(produce_model, owner_email)
        })
        .collect();

    info!("Successfully retrieved {} produce listings", listing_count);
    Ok(Json(ApiResponse {
        data: responses,
        message: "Produce listings retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get a specific produce listing by ID
#[utoipa::path(
    get,
    path = "/api/v1/produce/{produce_id}",
    tag = "produce",
    params(
        ("produce_id" = i32, Path, description = "Produce ID"),
    ),
    responses(
        (status = 200, description = "Produce retrieved successfully", body = ApiResponse<ProduceResponse>),
        (status = 404, description = "Produce not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_produce(
    Path(produce_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProduceResponse>>, ApiError> {
    trace!("Entering get_produce function for produce_id: {}", produce_id);

    let (produce_model, owner) = produce::Entity::find_by_id(produce_id)
        .find_also_related(user::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Produce with ID {} not found", produce_id);
            ApiError::NotFound(format!("Produce with ID {produce_id} not found"))
        })?;

    info!("Successfully retrieved produce with ID: {}", produce_model.id);
    let owner_email = owner.map(|owner| owner.email).unwrap_or_default();
    Ok(Json(ApiResponse {
        data: ProduceResponse::from_model(produce_model, owner_email),
        message: "Produce retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a produce listing. Only the owner may do this.
#[utoipa::path(
    put,
    path = "/api/v1/produce/{produce_id}",
    tag = "produce",
    params(
        ("produce_id" = i32, Path, description = "Produce ID"),
    ),
    request_body = ProducePayload,
    responses(
        (status = 200, description = "Produce updated successfully", body = ApiResponse<ProduceResponse>),
        (status = 400, description = "Validation failed", body = crate::schemas::ValidationErrorResponse),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 403, description = "Not the owner of this listing", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Produce not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, current_user, payload))]
pub async fn update_produce(
    Path(produce_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(current_user): CurrentUser,
    Json(payload): Json<ProducePayload>,
) -> Result<Json<ApiResponse<ProduceResponse>>, ApiError> {
    trace!("Entering update_produce function for produce_id: {}", produce_id);

    let existing_produce = produce::Entity::find_by_id(produce_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Produce with ID {} not found for update", produce_id);
            ApiError::NotFound(format!("Produce with ID {produce_id} not found"))
        })?;

    if existing_produce.owner_id != current_user.id {
        warn!(
            "User {} attempted to update produce {} owned by user {}",
            current_user.id, produce_id, existing_produce.owner_id
        );
        return Err(ApiError::Forbidden(
            "Only the owner may modify this produce listing".to_string(),
        ));
    }

    let changes = payload.validate_update()?;
    if let Some(category_id) = changes.produce_category {
        ensure_category_exists(&state.db, category_id).await?;
    }

    let produce_model = if changes.is_empty() {
        debug!("No fields to update for produce ID: {}", produce_id);
        existing_produce
    } else {
        let mut produce_active: produce::ActiveModel = existing_produce.into();
        if let Some(produce_name) = changes.produce_name {
            produce_active.produce_name = Set(produce_name);
        }
        if let Some(category_id) = changes.produce_category {
            produce_active.produce_category_id = Set(category_id);
        }
        if let Some(stock) = changes.stock {
            produce_active.stock = Set(stock);
        }
        if let Some(unit) = changes.measurement_unit {
            produce_active.measurement_unit = Set(unit);
        }
        if let Some(price_tag) = changes.price_tag {
            produce_active.price_tag = Set(price_tag);
        }
        produce_active.update(&state.db).await?
    };

    info!("Produce with ID {} updated successfully", produce_id);
    Ok(Json(ApiResponse {
        data: ProduceResponse::from_model(produce_model, current_user.email),
        message: "Produce updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a produce listing. Only the owner may do this.
#[utoipa::path(
    delete,
    path = "/api/v1/produce/{produce_id}",
    tag = "produce",
    params(
        ("produce_id" = i32, Path, description = "Produce ID"),
    ),
    responses(
        (status = 200, description = "Produce deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 403, description = "Not the owner of this listing", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Produce not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, current_user))]
pub async fn delete_produce(
    Path(produce_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(current_user): CurrentUser,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_produce function for produce_id: {}", produce_id);

    let existing_produce = produce::Entity::find_by_id(produce_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Produce with ID {} not found for deletion", produce_id);
            ApiError::NotFound(format!("Produce with ID {produce_id} not found"))
        })?;

    if existing_produce.owner_id != current_user.id {
        warn!(
            "User {} attempted to delete produce {} owned by user {}",
            current_user.id, produce_id, existing_produce.owner_id
        );
        return Err(ApiError::Forbidden(
            "Only the owner may delete this produce listing".to_string(),
        ));
    }

    existing_produce.delete(&state.db).await?;

    info!("Produce with ID {} deleted successfully", produce_id);
    Ok(Json(ApiResponse {
        data: format!("Produce {produce_id} deleted"),
        message: "Produce deleted successfully".to_string(),
        success: true,
    }))
}
