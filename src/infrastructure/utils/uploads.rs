use std::path::{Path, PathBuf};

use derive_more::Display;
use uuid::Uuid;

#[derive(Debug, Display)]
pub enum UploadError {
    #[display("Please upload a file")]
    Missing,

    #[display("Please upload an image file")]
    NotAnImage,

    #[display("Please upload an image less than {_0} bytes")]
    TooLarge(usize),

    #[display("Problem with file upload: {_0}")]
    Io(String),
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Io(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

/// Sniffs the magic bytes and returns the image's file extension.
pub fn detect_image(bytes: &[u8]) -> Result<&'static str, UploadError> {
    match infer::get(bytes) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Ok(kind.extension()),
        _ => Err(UploadError::NotAnImage),
    }
}

pub fn check_size(size: usize, max_bytes: usize) -> Result<(), UploadError> {
    if size == 0 {
        return Err(UploadError::Missing);
    }
    if size > max_bytes {
        return Err(UploadError::TooLarge(max_bytes));
    }
    Ok(())
}

pub fn photo_file_name(project_id: &Uuid, extension: &str) -> String {
    format!("photo_{}.{}", project_id, extension)
}

/// Validates and stores a project photo, returning the stored file name.
pub async fn save_project_photo(
    settings: &UploadSettings,
    project_id: &Uuid,
    bytes: &[u8],
) -> Result<String, UploadError> {
    check_size(bytes.len(), settings.max_bytes)?;
    let extension = detect_image(bytes)?;
    let file_name = photo_file_name(project_id, extension);

    write_file(&settings.dir, &file_name, bytes).await?;
    Ok(file_name)
}

async fn write_file(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<(), UploadError> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(file_name), bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    #[test]
    fn detects_png_by_magic_bytes() {
        assert_eq!(detect_image(PNG_HEADER).unwrap(), "png");
        assert!(matches!(detect_image(b"plain text"), Err(UploadError::NotAnImage)));
    }

    #[test]
    fn size_limits() {
        assert!(matches!(check_size(0, 10), Err(UploadError::Missing)));
        assert!(matches!(check_size(11, 10), Err(UploadError::TooLarge(10))));
        assert!(check_size(10, 10).is_ok());
    }

    #[actix_rt::test]
    async fn stores_photo_under_project_name() {
        let dir = tempfile::tempdir().unwrap();
        let settings = UploadSettings { dir: dir.path().join("uploads"), max_bytes: 1024 };
        let id = Uuid::new_v4();

        let name = save_project_photo(&settings, &id, PNG_HEADER).await.unwrap();

        assert_eq!(name, format!("photo_{}.png", id));
        assert!(settings.dir.join(&name).exists());
    }
}
