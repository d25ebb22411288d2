use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use model::entities::{profile, user};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use tracing::{debug, info, instrument, trace, warn};

use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};
use crate::serializers::user::{UserPayload, UserResponse, hash_password};

fn hash_error(err: argon2::password_hash::Error) -> ApiError {
    ApiError::Internal(format!("Failed to hash password: {err}"))
}

/// Create a new user, together with its nested profile when one is
/// supplied. The two writes share a transaction.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation failed", body = crate::schemas::ValidationErrorResponse),
        (status = 409, description = "Email already taken", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    trace!("Entering create_user function");
    let new_user = payload.validate_create()?;
    debug!("Creating user with email: {}", new_user.email);

    let password_hash = hash_password(&new_user.password).map_err(hash_error)?;

    let txn = state.db.begin().await?;

    let user_active = user::ActiveModel {
        email: Set(new_user.email.clone()),
        password_hash: Set(password_hash),
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        date_joined: Set(Utc::now()),
        ..Default::default()
    };

    let user_model = match user_active.insert(&txn).await {
        Ok(user_model) => user_model,
        Err(db_error) => {
            warn!("Failed to insert user '{}': {}", new_user.email, db_error);
            return Err(ApiError::classify_write(
                db_error,
                format!("User with email '{}' already exists", new_user.email),
                "EMAIL_ALREADY_EXISTS",
            ));
        }
    };

    let profile_model = match &new_user.profile {
        Some(data) => Some(
            profile::ActiveModel {
                user_id: Set(user_model.id),
                gender: Set(data.gender_value()),
                phone_number: Set(data.phone_number.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?,
        ),
        None => None,
    };

    txn.commit().await?;

    info!(
        "User created successfully with ID: {}, email: {}",
        user_model.id, user_model.email
    );
    let response = ApiResponse {
        data: UserResponse::from_model(user_model, profile_model),
        message: "User created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    trace!("Entering get_users function");
    debug!("Fetching all users from database");

    let users = user::Entity::find()
        .find_also_related(profile::Entity)
        .all(&state.db)
        .await?;

    let user_count = users.len();
    let user_responses: Vec<UserResponse> = users
        .into_iter()
        .map(|(user_model, profile_model)| UserResponse::from_model(user_model, profile_model))
        .collect();

    info!("Successfully retrieved {} users", user_count);
    Ok(Json(ApiResponse {
        data: user_responses,
        message: "Users retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering get_user function for user_id: {}", user_id);

    let (user_model, profile_model) = user::Entity::find_by_id(user_id)
        .find_also_related(profile::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("User with ID {} not found", user_id);
            ApiError::NotFound(format!("User with ID {user_id} not found"))
        })?;

    info!(
        "Successfully retrieved user with ID: {}, email: {}",
        user_model.id, user_model.email
    );
    Ok(Json(ApiResponse {
        data: UserResponse::from_model(user_model, profile_model),
        message: "User retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a user. Present fields are applied; the nested profile is
/// created or updated alongside in the same transaction. `date_joined`
/// is immutable.
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation failed", body = crate::schemas::ValidationErrorResponse),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse),
        (status = 409, description = "Email already taken", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering update_user function for user_id: {}", user_id);
    payload.validate_update()?;

    let (existing_user, existing_profile) = user::Entity::find_by_id(user_id)
        .find_also_related(profile::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("User with ID {} not found for update", user_id);
            ApiError::NotFound(format!("User with ID {user_id} not found"))
        })?;

    let target_email = payload
        .email
        .clone()
        .unwrap_or_else(|| existing_user.email.clone());

    let txn = state.db.begin().await?;

    let mut user_active: user::ActiveModel = existing_user.clone().into();
    let mut updated_fields = Vec::new();

    if let Some(email) = payload.email.clone() {
        user_active.email = Set(email);
        updated_fields.push("email");
    }
    if let Some(password) = payload.password.as_deref() {
        user_active.password_hash = Set(hash_password(password).map_err(hash_error)?);
        updated_fields.push("password");
    }
    if let Some(first_name) = payload.first_name.clone() {
        user_active.first_name = Set(first_name);
        updated_fields.push("first_name");
    }
    if let Some(last_name) = payload.last_name.clone() {
        user_active.last_name = Set(last_name);
        updated_fields.push("last_name");
    }
    // date_joined is intentionally never written here

    let user_model = if updated_fields.is_empty() {
        debug!("No user fields to update for user ID: {}", user_id);
        existing_user
    } else {
        debug!("Updating fields: {}", updated_fields.join(", "));
        match user_active.update(&txn).await {
            Ok(updated) => updated,
            Err(db_error) => {
                warn!("Failed to update user {}: {}", user_id, db_error);
                return Err(ApiError::classify_write(
                    db_error,
                    format!("User with email '{target_email}' already exists"),
                    "EMAIL_ALREADY_EXISTS",
                ));
            }
        }
    };

    let profile_model = match (payload.profile.as_ref(), existing_profile) {
        (Some(data), Some(current)) => {
            let mut profile_active: profile::ActiveModel = current.clone().into();
            let mut profile_changed = false;
            if data.gender.is_some() {
                profile_active.gender = Set(data.gender_value());
                profile_changed = true;
            }
            if data.phone_number.is_some() {
                profile_active.phone_number = Set(data.phone_number.clone());
                profile_changed = true;
            }
            if profile_changed {
                Some(profile_active.update(&txn).await?)
            } else {
                Some(current)
            }
        }
        (Some(data), None) => Some(
            profile::ActiveModel {
                user_id: Set(user_id),
                gender: Set(data.gender_value()),
                phone_number: Set(data.phone_number.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?,
        ),
        (None, existing) => existing,
    };

    txn.commit().await?;

    info!("User with ID {} updated successfully", user_id);
    Ok(Json(ApiResponse {
        data: UserResponse::from_model(user_model, profile_model),
        message: "User updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_user function for user_id: {}", user_id);

    let delete_result = user::Entity::delete_by_id(user_id).exec(&state.db).await?;
    debug!(
        "Delete operation completed. Rows affected: {}",
        delete_result.rows_affected
    );

    if delete_result.rows_affected == 0 {
        warn!("User with ID {} not found for deletion", user_id);
        return Err(ApiError::NotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    info!("User with ID {} deleted successfully", user_id);
    Ok(Json(ApiResponse {
        data: format!("User {user_id} deleted"),
        message: "User deleted successfully".to_string(),
        success: true,
    }))
}
