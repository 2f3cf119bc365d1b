//! Multipart form helpers shared by the upload endpoints.

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::Response;
use std::collections::HashMap;

use crate::api::error_response;
use crate::storage::{public_url, Bucket, ObjectStore, MAX_IMAGE_SIZE};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Every part of a multipart body, split into text fields and files.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

fn too_large_message() -> String {
    format!(
        "File too large. Maximum size is {}MB",
        MAX_IMAGE_SIZE / (1024 * 1024)
    )
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> Response {
    tracing::warn!("Multipart read error: {}", e);
    let error_msg = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large_message()
    } else {
        format!("Failed to read multipart data: {}", e.body_text())
    };
    error_response(e.status(), error_msg)
}

impl FormData {
    /// Drain the whole body. Parts with a file name are files; an empty file
    /// part (a form submitted without choosing a file) is ignored.
    pub async fn read(multipart: &mut Multipart) -> Result<Self, Response> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let data = field.bytes().await.map_err(multipart_error)?;
                    if data.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            data,
                        },
                    );
                }
                None => {
                    let value = field.text().await.map_err(multipart_error)?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed text value; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    #[cfg(test)]
    pub fn from_fields(fields: &[(&str, &str)]) -> Self {
        FormData {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }
}

/// Parse a form field holding a JSON array of strings. Blank entries are
/// dropped.
pub fn parse_string_list(field: &str, raw: &str) -> Result<Vec<String>, String> {
    let items: Vec<String> = serde_json::from_str(raw)
        .map_err(|_| format!("{field} must be a JSON array of strings"))?;

    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Validate an uploaded image, store it and return its public URL.
pub async fn store_image(
    objects: &dyn ObjectStore,
    base_url: &str,
    bucket: Bucket,
    file: &UploadedFile,
) -> Result<String, Response> {
    if !file.content_type.starts_with("image/") {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Only image uploads are allowed",
        ));
    }
    if file.data.len() > MAX_IMAGE_SIZE {
        return Err(error_response(StatusCode::BAD_REQUEST, too_large_message()));
    }

    match objects
        .put(bucket, &file.file_name, &file.content_type, &file.data)
        .await
    {
        Ok(id) => Ok(public_url(base_url, id)),
        Err(e) => {
            tracing::error!(error = %e, bucket = bucket.as_str(), "Failed to store image");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store image",
            ))
        }
    }
}
