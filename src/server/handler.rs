use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::compress::{compress_pdf, Stage};
use crate::config::defaults::{DOWNLOAD_DISPOSITION, FAILURE_MESSAGE, UPLOAD_FIELD};
use crate::error::CompressError;

use super::AppState;

pub const X_IMAGES_FOUND: HeaderName = HeaderName::from_static("x-images-found");
pub const X_IMAGES_COMPRESSED: HeaderName = HeaderName::from_static("x-images-compressed");
pub const X_IMAGES_KEPT: HeaderName = HeaderName::from_static("x-images-kept");

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
pub struct HealthBody {
    status: &'static str,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Compress(#[from] CompressError),

    #[error("Compression task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Multipart(err) => (err.status(), self.to_string()),
            ApiError::Compress(err) => {
                log::error!("Request {} while {}: {}", Stage::Failed, err.stage(), err);
                (StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE.to_string())
            }
            ApiError::Task(err) => {
                log::error!("Request {}: {}", Stage::Failed, err);
                (StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE.to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

struct Upload {
    filename: Option<String>,
    bytes: Bytes,
}

/// Take the `file` field, or failing that the first field that carries a filename
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    let mut fallback = None;

    while let Some(field) = multipart.next_field().await? {
        let is_upload_field = field.name() == Some(UPLOAD_FIELD);
        let filename = field.file_name().map(str::to_string);

        if is_upload_field || (fallback.is_none() && filename.is_some()) {
            let bytes = field.bytes().await?;
            let upload = Upload { filename, bytes };
            if is_upload_field {
                return Ok(upload);
            }
            fallback = Some(upload);
        }
    }

    fallback.ok_or(ApiError::MissingFile)
}

/// `POST /api/compress`
pub async fn compress(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_upload(&mut multipart).await?;
    log::info!(
        "{}: {} ({} bytes)",
        Stage::Receiving,
        upload.filename.as_deref().unwrap_or("<unnamed>"),
        upload.bytes.len()
    );

    let settings = Arc::clone(&state.settings);
    let compressed =
        tokio::task::spawn_blocking(move || compress_pdf(&upload.bytes, &settings)).await??;

    let report = &compressed.report;
    log::info!("{}: {}", Stage::Responding, report);

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
        (
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static(DOWNLOAD_DISPOSITION),
        ),
        (X_IMAGES_FOUND, HeaderValue::from(report.found())),
        (X_IMAGES_COMPRESSED, HeaderValue::from(report.transcoded())),
        (X_IMAGES_KEPT, HeaderValue::from(report.kept())),
    ];

    Ok((StatusCode::OK, headers, compressed.data).into_response())
}

/// `GET /health`
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}
