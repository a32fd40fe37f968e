//! Upload and download endpoints

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::UploadResponse;

/// POST /upload - store a file and create its document record
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload.bin").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| Error::validation(format!("failed to read file field: {}", e)))?;
            file = Some((filename, bytes));
        }
    }

    let (filename, bytes) = file.ok_or_else(|| Error::validation("no file provided"))?;

    // Keep only the basename of whatever the client sent
    let original_filename = std::path::Path::new(&filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_string());

    let stored_name = format!("{}_{}", Utc::now().timestamp_millis(), original_filename);
    let stored_path = state.config().storage.upload_dir.join(stored_name);

    tokio::fs::write(&stored_path, &bytes).await?;

    let file_id = state
        .store()
        .insert(&stored_path.to_string_lossy(), &original_filename)?;

    tracing::info!(
        "Stored upload '{}' as document {} ({} bytes)",
        original_filename,
        file_id,
        bytes.len()
    );

    Ok(Json(UploadResponse { file_id }))
}

/// GET /download/{file_id} - return the raw stored file
pub async fn download_file(
    State(state): State<AppState>,
    Path(file_id): Path<i64>,
) -> Result<Response> {
    let document = state
        .store()
        .get(file_id)?
        .ok_or_else(|| Error::not_found("file id not found"))?;

    let bytes = tokio::fs::read(&document.file_path).await?;
    let content_type = mime_guess::from_path(&document.original_filename).first_or_octet_stream();

    let headers = [
        (header::CONTENT_TYPE, content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.original_filename),
        ),
    ];

    Ok((headers, bytes).into_response())
}
