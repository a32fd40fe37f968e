//! One-shot text extraction endpoint

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{Error, Result};
use crate::ingestion::loader::extract_pdf_pages;
use crate::server::state::AppState;
use crate::types::ConvertResponse;

/// POST /convert - extract text from an uploaded file without registering it
///
/// The `input_file_type` form field selects the extraction path: "img" goes
/// through the vision model, anything else is treated as a PDF.
pub async fn convert_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut file: Option<(String, Bytes)> = None;
    let mut input_file_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::validation(format!("failed to read file field: {}", e)))?;
                file = Some((filename, bytes));
            }
            Some("input_file_type") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| Error::validation(format!("failed to read field: {}", e)))?;
                input_file_type = Some(value);
            }
            _ => {}
        }
    }

    let (filename, bytes) = file.ok_or_else(|| Error::validation("no file provided"))?;
    let input_file_type =
        input_file_type.ok_or_else(|| Error::validation("filetype not mentioned"))?;

    if input_file_type == "img" {
        let extraction = state.vision().extract(&bytes).await?;
        return Ok(Json(serde_json::json!({
            "file_content": extraction.image_content,
        }))
        .into_response());
    }

    // PDF path: lopdf wants a file on disk, so spill to a temp dir
    let pages = tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("convert.pdf");
        std::fs::write(&path, &bytes)?;
        extract_pdf_pages(&path).map_err(|e| match e {
            Error::FileParse { message, .. } => Error::file_parse(&filename, message),
            other => other,
        })
    })
    .await
    .map_err(|e| Error::internal(format!("extraction task failed: {}", e)))??;

    Ok(Json(ConvertResponse {
        file_content: pages,
    })
    .into_response())
}
