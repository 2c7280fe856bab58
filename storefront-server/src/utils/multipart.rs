//! Multipart 表单解析
//!
//! 把 [`Multipart`] 一次性收集为 [`FormData`]：文本字段按出现顺序保存，
//! 带文件名的字段作为 [`UploadFile`]。

use serde::de::DeserializeOwned;

use crate::services::media::UploadFile;
use crate::utils::error::multipart_error;
use crate::utils::extract::Multipart;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Default, Clone)]
pub struct FormData {
    texts: Vec<(String, String)>,
    files: Vec<UploadFile>,
}

impl FormData {
    /// Drain the whole multipart stream
    pub async fn from_multipart(Multipart(mut multipart): Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    if bytes.is_empty() {
                        continue;
                    }
                    form.push_file(UploadFile {
                        field: name,
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                None => {
                    let value = field.text().await.map_err(multipart_error)?;
                    form.push_text(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.texts.push((name.into(), value.into()));
    }

    pub fn push_file(&mut self, file: UploadFile) {
        self.files.push(file);
    }

    /// First non-empty value of a text field, trimmed
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.text(name).map(str::to_string)
    }

    /// Numeric field; present but unparsable is a validation error
    pub fn f64(&self, name: &str) -> AppResult<Option<f64>> {
        self.parsed(name)
    }

    pub fn i64(&self, name: &str) -> AppResult<Option<i64>> {
        match self.text(name) {
            None => Ok(None),
            // Forms often send "5.0" for integer fields
            Some(raw) => raw
                .parse::<i64>()
                .or_else(|_| raw.parse::<f64>().map(|f| f as i64))
                .map(Some)
                .map_err(|_| AppError::validation(format!("Invalid number for {}: {}", name, raw))),
        }
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.text(name)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "on" | "yes"))
    }

    fn parsed<T: std::str::FromStr>(&self, name: &str) -> AppResult<Option<T>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| AppError::validation(format!("Invalid number for {}: {}", name, raw))),
        }
    }

    /// All files posted under `field` (or `field[]`)
    pub fn files(&self, field: &str) -> Vec<UploadFile> {
        let bracketed = format!("{}[]", field);
        self.files
            .iter()
            .filter(|f| f.field == field || f.field == bracketed)
            .cloned()
            .collect()
    }

    /// Variant list assembled from every occurrence of `name` and `name[]`
    pub fn list(&self, name: &str) -> Vec<String> {
        let bracketed = format!("{}[]", name);
        parse_list(
            self.texts
                .iter()
                .filter(|(k, _)| *k == name || *k == bracketed)
                .map(|(_, v)| v.as_str()),
        )
    }

    /// Whether `name` (or `name[]`) was sent at all, even empty
    pub fn has(&self, name: &str) -> bool {
        let bracketed = format!("{}[]", name);
        self.texts.iter().any(|(k, _)| *k == name || *k == bracketed)
    }

    /// JSON-encoded field, or `fallback` when absent or malformed
    pub fn json_or<T: DeserializeOwned>(&self, name: &str, fallback: T) -> T {
        match self.text(name) {
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                tracing::debug!(field = name, error = %e, "Ignoring malformed JSON form field");
                fallback
            }),
            None => fallback,
        }
    }
}

/// Flatten raw occurrences into a trimmed, de-duplicated list
///
/// Each occurrence may be a JSON array, a comma separated string or a single
/// value. First-seen order is kept.
pub fn parse_list<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |item: String| {
        let item = item.trim().to_string();
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    };

    for raw in values {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        if raw.starts_with('[')
            && let Ok(items) = serde_json::from_str::<Vec<serde_json::Value>>(raw)
        {
            for item in items {
                match item {
                    serde_json::Value::String(s) => push(s),
                    serde_json::Value::Number(n) => push(n.to_string()),
                    _ => {}
                }
            }
            continue;
        }
        if raw.contains(',') {
            for part in raw.split(',') {
                push(part.to_string());
            }
        } else {
            push(raw.to_string());
        }
    }

    out
}
