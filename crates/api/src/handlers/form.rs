//! `multipart/form-data` intake for the news and project editors.
//!
//! Text parts are collected by name; a part named `image` carrying a file
//! becomes the optional [`ImageUpload`]. A file part with no name and no
//! bytes (an untouched file input) counts as "no image".

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use nps_core::error::{CoreError, FieldError};
use nps_core::media::ImageUpload;
use nps_core::types::{DbId, Timestamp};

use crate::error::{AppError, AppResult};

/// Name of the file part holding the image.
pub const IMAGE_FIELD: &str = "image";

/// Flag that clears the current image when no replacement is uploaded.
pub const REMOVE_IMAGE_FIELD: &str = "remove_image";

#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    pub image: Option<ImageUpload>,
}

impl FormData {
    /// Drain a multipart body into memory.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let name = field.name().unwrap_or("").to_string();
            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(multipart_error)?;
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                form.image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: data.to_vec(),
                });
            } else if !name.is_empty() {
                let value = field
                    .text()
                    .await
                    .map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    #[cfg(test)]
    fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }

    /// Raw text of a field, untrimmed.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Text with surrounding whitespace removed; missing means empty.
    pub fn trimmed(&self, name: &str) -> String {
        self.text(name).map(str::trim).unwrap_or_default().to_string()
    }

    /// Optional text; blank collapses to `None`.
    pub fn optional(&self, name: &str) -> Option<String> {
        nps_core::validation::optional_text(self.text(name))
    }

    pub fn flag(&self, name: &str) -> Result<Option<bool>, FieldError> {
        match self.present(name) {
            None => Ok(None),
            Some(raw) => parse_bool(raw)
                .map(Some)
                .ok_or_else(|| invalid(name, "must be true or false")),
        }
    }

    pub fn timestamp(&self, name: &str) -> Result<Option<Timestamp>, FieldError> {
        match self.present(name) {
            None => Ok(None),
            Some(raw) => parse_timestamp(raw)
                .map(Some)
                .ok_or_else(|| invalid(name, "must be a date (YYYY-MM-DD) or RFC 3339 timestamp")),
        }
    }

    pub fn integer(&self, name: &str) -> Result<Option<i64>, FieldError> {
        match self.present(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| invalid(name, "must be an integer")),
        }
    }

    pub fn id(&self) -> Result<Option<DbId>, FieldError> {
        self.integer("id")
    }

    /// Whether the caller asked for the current image to be dropped.
    pub fn remove_image(&self) -> Result<bool, FieldError> {
        Ok(self.flag(REMOVE_IMAGE_FIELD)?.unwrap_or(false))
    }

    fn present(&self, name: &str) -> Option<&str> {
        self.text(name).map(str::trim).filter(|v| !v.is_empty())
    }
}

/// Oversized bodies keep their 413; every other framing problem is a 400.
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Core(CoreError::PayloadTooLarge(e.body_text()))
    } else {
        AppError::BadRequest(e.body_text())
    }
}

fn invalid(field: &str, what: &str) -> FieldError {
    FieldError {
        field: field.to_string(),
        message: format!("{field} {what}"),
    }
}

/// Collects per-field parse failures so they are reported together.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn take<T: Default>(&mut self, result: Result<T, FieldError>) -> T {
        result.unwrap_or_else(|e| {
            self.0.push(e);
            T::default()
        })
    }

    pub fn finish(self) -> Result<(), CoreError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(self.0))
        }
    }
}

/// Checkbox-style boolean: `true/false`, `on/off`, `1/0`, `yes/no`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC) and `YYYY-MM-DD`
/// (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.to_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}
