//! 图片上传校验与 CDN 代理

use std::path::Path;

use crate::services::media::{MediaStore, UploadFile, public_id_from_url};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Maximum file size (10MB)
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Maximum files accepted per form field
pub const MAX_FILES_PER_FIELD: usize = 20;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "avif"];

/// Validate image file
pub fn validate_image(file: &UploadFile) -> AppResult<()> {
    if file.bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::with_message(
            ErrorCode::ImageTooLarge,
            format!(
                "File too large. Maximum size is {}MB",
                MAX_IMAGE_BYTES / 1024 / 1024
            ),
        ));
    }

    let ext = Path::new(&file.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedImageFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    // Sniff magic bytes only, the CDN does the decoding
    if let Err(e) = image::guess_format(&file.bytes) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedImageFormat,
            format!("Invalid image file ({}): {}", file.file_name, e),
        ));
    }

    Ok(())
}

pub fn validate_batch(files: &[UploadFile]) -> AppResult<()> {
    if files.len() > MAX_FILES_PER_FIELD {
        return Err(AppError::with_message(
            ErrorCode::TooManyFiles,
            format!("At most {} files per field", MAX_FILES_PER_FIELD),
        ));
    }
    files.iter().try_for_each(validate_image)
}

/// Validate then upload every file, in order
pub async fn upload_all(media: &dyn MediaStore, files: &[UploadFile]) -> AppResult<Vec<String>> {
    validate_batch(files)?;

    let mut urls = Vec::with_capacity(files.len());
    for file in files {
        let url = media.upload(file).await?;
        tracing::debug!(file = %file.file_name, url = %url, "Image uploaded");
        urls.push(url);
    }
    Ok(urls)
}

/// Like [`upload_all`] but an empty batch is `ImageRequired`
pub async fn upload_required(
    media: &dyn MediaStore,
    files: &[UploadFile],
) -> AppResult<Vec<String>> {
    if files.is_empty() {
        return Err(AppError::new(ErrorCode::ImageRequired));
    }
    upload_all(media, files).await
}

/// Best-effort CDN delete, failures are only logged
pub async fn destroy_by_url(media: &dyn MediaStore, url: &str) {
    let Some(public_id) = public_id_from_url(url) else {
        return;
    };
    if let Err(e) = media.destroy(&public_id).await {
        tracing::warn!(url, public_id = %public_id, error = %e, "Failed to delete image from CDN");
    }
}

pub async fn destroy_all<'a>(media: &dyn MediaStore, urls: impl IntoIterator<Item = &'a String>) {
    for url in urls {
        destroy_by_url(media, url).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeMedia;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn file(name: &str, bytes: &[u8]) -> UploadFile {
        UploadFile {
            field: "images".into(),
            file_name: name.into(),
            content_type: None,
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_accepts_png() {
        assert!(validate_image(&file("a.PNG", PNG_MAGIC)).is_ok());
    }

    #[test]
    fn test_rejects_extension_and_content() {
        let err = validate_image(&file("a.txt", PNG_MAGIC)).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedImageFormat);

        let err = validate_image(&file("a.png", b"hello world")).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedImageFormat);
    }

    #[test]
    fn test_rejects_large_file() {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.resize(MAX_IMAGE_BYTES + 1, 0);
        let err = validate_image(&file("a.png", &bytes)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ImageTooLarge);
    }

    #[test]
    fn test_rejects_too_many_files() {
        let files: Vec<_> = (0..=MAX_FILES_PER_FIELD)
            .map(|i| file(&format!("{i}.png"), PNG_MAGIC))
            .collect();
        assert_eq!(
            validate_batch(&files).unwrap_err().code,
            ErrorCode::TooManyFiles
        );
    }

    #[tokio::test]
    async fn test_upload_and_destroy() {
        let media = FakeMedia::default();
        let urls = upload_all(&media, &[file("a.png", PNG_MAGIC), file("b.png", PNG_MAGIC)])
            .await
            .unwrap();
        assert_eq!(urls.len(), 2);

        destroy_all(&media, &urls).await;
        assert_eq!(media.destroyed(), vec!["a", "b"]);

        let err = upload_required(&media, &[]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ImageRequired);
    }
}
