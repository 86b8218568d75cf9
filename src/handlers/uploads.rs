// src/handlers/uploads.rs

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, Staff},
    },
    models::upload::{UploadForm, UploadResponse},
};

const FILE_FIELD: &str = "file";

// Corpo acima do DefaultBodyLimit vira 413; o resto é formulário malformado.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge
    } else {
        AppError::BadRequest(err.body_text())
    }
}

// Procura o campo `file` no formulário e devolve (nome original, conteúdo).
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or(AppError::MissingUpload)?;
        let bytes = field
            .bytes()
            .await
            .map_err(multipart_error)?;

        if bytes.is_empty() {
            return Err(AppError::MissingUpload);
        }
        return Ok((file_name, bytes));
    }

    Err(AppError::MissingUpload)
}

#[utoipa::path(
    post,
    path = "/api/admin/uploads",
    tag = "Uploads",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Imagem gravada", body = UploadResponse),
        (status = 400, description = "Sem arquivo ou extensão não permitida"),
        (status = 413, description = "Arquivo maior que o limite")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_image(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (original_name, bytes) = read_file_field(&mut multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let file_name = app_state
        .image_store
        .save(&original_name, &bytes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let url = app_state.image_store.public_url(&file_name);
    Ok((StatusCode::CREATED, Json(UploadResponse { file_name, url })))
}

#[utoipa::path(
    delete,
    path = "/api/admin/uploads/{file_name}",
    tag = "Uploads",
    responses(
        (status = 204, description = "Imagem removida"),
        (status = 400, description = "Nome de arquivo inválido"),
        (status = 404, description = "Arquivo não encontrado")
    ),
    params(
        ("file_name" = String, Path, description = "Nome gravado do arquivo")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_image(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .image_store
        .delete(&file_name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
