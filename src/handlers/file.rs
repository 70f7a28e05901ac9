use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::instrument;

use super::{ApiError, ApiResult, AppState};
use crate::models::{AuthUser, FileFilters, ServiceError, StoredFile};

struct UploadPart {
    filename: String,
    content_type: String,
    content: Vec<u8>,
}

fn validation(message: String) -> ApiError {
    ApiError(ServiceError::ValidationError { message })
}

/// Pull the uploaded file plus any accompanying text fields out of a
/// multipart body
async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(UploadPart, HashMap<String, String>), ApiError> {
    let mut file = None;
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(filename) = field.file_name() {
            let filename = filename.to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let content = field
                .bytes()
                .await
                .map_err(|e| validation(format!("Failed to read upload: {}", e)))?
                .to_vec();
            file = Some(UploadPart {
                filename,
                content_type,
                content,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| validation(format!("Failed to read field {}: {}", name, e)))?;
            fields.insert(name, value);
        }
    }

    let file = file.ok_or_else(|| validation("Multipart field 'file' is required".to_string()))?;
    Ok((file, fields))
}

/// Upload an image for a food item
#[instrument(name = "upload_food_image", skip(state, caller, multipart), fields(food_item_id = %id))]
pub async fn upload_food_image(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<StoredFile>)> {
    let (part, _) = read_multipart(multipart).await?;
    let result = state
        .file_service
        .upload_food_image(&id, part.content, &part.filename, &part.content_type, &caller)
        .await;
    state.metrics.record_file_upload("food_images", result.is_ok());
    Ok((StatusCode::CREATED, Json(result?)))
}

/// Upload an image for a restaurant
#[instrument(name = "upload_restaurant_image", skip(state, caller, multipart), fields(restaurant_id = %id))]
pub async fn upload_restaurant_image(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<StoredFile>)> {
    let (part, _) = read_multipart(multipart).await?;
    let result = state
        .file_service
        .upload_restaurant_image(&id, part.content, &part.filename, &part.content_type, &caller)
        .await;
    state
        .metrics
        .record_file_upload("restaurant_images", result.is_ok());
    Ok((StatusCode::CREATED, Json(result?)))
}

/// Upload the caller's profile picture
#[instrument(name = "upload_user_image", skip(state, caller, multipart), fields(caller = %caller.username))]
pub async fn upload_user_image(
    State(state): State<AppState>,
    caller: AuthUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<StoredFile>)> {
    let (part, _) = read_multipart(multipart).await?;
    let result = state
        .file_service
        .upload_user_image(part.content, &part.filename, &part.content_type, &caller)
        .await;
    state.metrics.record_file_upload("user_images", result.is_ok());
    Ok((StatusCode::CREATED, Json(result?)))
}

/// Upload a menu image for a restaurant
#[instrument(name = "upload_menu_image", skip(state, caller, multipart), fields(restaurant_id = %id))]
pub async fn upload_menu_image(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<StoredFile>)> {
    let (part, _) = read_multipart(multipart).await?;
    let result = state
        .file_service
        .upload_menu_image(&id, part.content, &part.filename, &part.content_type, &caller)
        .await;
    state.metrics.record_file_upload("menu_images", result.is_ok());
    Ok((StatusCode::CREATED, Json(result?)))
}

/// Generic upload: the category comes as a multipart text field, with
/// optional related_id and description
#[instrument(name = "upload_file", skip(state, caller, multipart), fields(caller = %caller.username))]
pub async fn upload_file(
    State(state): State<AppState>,
    caller: AuthUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<StoredFile>)> {
    let (part, fields) = read_multipart(multipart).await?;

    let category = fields
        .get("category")
        .ok_or_else(|| validation("Multipart field 'category' is required".to_string()))?
        .parse()
        .map_err(validation)?;
    let related_id = fields.get("related_id").cloned();
    let description = fields.get("description").cloned();

    let result = state
        .file_service
        .save_upload(
            part.content,
            &part.filename,
            &part.content_type,
            category,
            &caller,
            related_id,
            description,
        )
        .await;
    state
        .metrics
        .record_file_upload(&category.to_string(), result.is_ok());
    Ok((StatusCode::CREATED, Json(result?)))
}

#[derive(Debug, Default, Deserialize)]
pub struct FileQuery {
    pub category: Option<String>,
    pub related_id: Option<String>,
}

/// List file metadata. Admins see everything, others their own uploads.
#[instrument(name = "list_files", skip(state, caller, query), fields(caller = %caller.username))]
pub async fn list_files(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<Vec<StoredFile>>> {
    let filters = FileFilters {
        category: query
            .category
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(validation)?,
        related_id: query.related_id,
    };
    let files = state.file_service.list_files(filters, &caller).await?;
    Ok(Json(files))
}

/// Metadata for one file
#[instrument(name = "get_file", skip(state), fields(file_id = %id))]
pub async fn get_file(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<StoredFile>> {
    let file = state.file_service.get_file(&id).await?;
    Ok(Json(file))
}

/// Delete a file. Uploader or admin.
#[instrument(name = "delete_file", skip(state, caller), fields(file_id = %id))]
pub async fn delete_file(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.file_service.delete_file(&id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
