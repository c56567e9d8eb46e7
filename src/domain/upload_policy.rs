const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Audio,
    Image,
}

impl FileClass {
    pub fn allowed_mime_types(&self) -> &'static [&'static str] {
        match self {
            FileClass::Audio => &[
                "audio/mpeg",
                "audio/mp3",
                "audio/wav",
                "audio/wave",
                "audio/x-wav",
                "audio/mp4",
                "audio/x-m4a",
                "audio/webm",
                "audio/ogg",
            ],
            FileClass::Image => &[
                "image/jpeg",
                "image/jpg",
                "image/png",
                "image/gif",
                "image/webp",
            ],
        }
    }

    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            FileClass::Audio => &[".mp3", ".wav", ".m4a", ".mp4", ".webm", ".ogg"],
            FileClass::Image => &[".jpg", ".jpeg", ".png", ".gif", ".webp"],
        }
    }

    pub fn max_size_bytes(&self) -> u64 {
        match self {
            FileClass::Audio => 50 * MIB,
            FileClass::Image => 10 * MIB,
        }
    }

    pub fn folder(&self) -> &'static str {
        match self {
            FileClass::Audio => "audio",
            FileClass::Image => "images",
        }
    }
}

pub fn validate_upload(
    class: FileClass,
    file_name: &str,
    mime_type: &str,
    size_bytes: Option<u64>,
) -> Result<(), UploadPolicyError> {
    if !class.allowed_mime_types().contains(&mime_type) {
        return Err(UploadPolicyError::DisallowedMimeType {
            mime_type: mime_type.to_string(),
            allowed: class.allowed_mime_types().join(", "),
        });
    }

    let extension = file_name
        .rfind('.')
        .map(|i| file_name[i..].to_lowercase())
        .unwrap_or_default();
    if !class.allowed_extensions().contains(&extension.as_str()) {
        return Err(UploadPolicyError::DisallowedExtension {
            extension,
            allowed: class.allowed_extensions().join(", "),
        });
    }

    if let Some(size) = size_bytes {
        if size > class.max_size_bytes() {
            return Err(UploadPolicyError::FileTooLarge {
                size_bytes: size,
                max_bytes: class.max_size_bytes(),
            });
        }
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum UploadPolicyError {
    #[error("mime type not allowed: {mime_type} (allowed: {allowed})")]
    DisallowedMimeType { mime_type: String, allowed: String },
    #[error("file extension not allowed: {extension} (allowed: {allowed})")]
    DisallowedExtension { extension: String, allowed: String },
    #[error("file too large: {size_bytes} bytes (max {max_bytes})")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },
}
