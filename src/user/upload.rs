//! Avatar upload metadata
//!
//! The multipart handling itself lives in the HTTP layer; it hands over an
//! [`UploadedFile`] description of what it stored on disk.

use crate::config::AvatarConfig;
use crate::user::error::UserError;
use serde::{Deserialize, Serialize};

/// File stored by the upload middleware
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub fieldname: String,
    pub originalname: String,
    pub encoding: String,
    pub mimetype: String,
    pub size: u64,
    pub destination: String,
    pub filename: String,
    pub path: String,
}

/// Public view of a stored avatar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarUploadResult {
    pub url: String,
    pub filename: String,
    pub size: u64,
    pub mimetype: String,
}

impl UploadedFile {
    /// Check type and size against the avatar limits
    pub fn validate_avatar(&self, config: &AvatarConfig) -> Result<(), UserError> {
        let allowed = config
            .allowed_mime_types
            .iter()
            .any(|mime| mime.eq_ignore_ascii_case(&self.mimetype));
        if !allowed {
            return Err(UserError::UnsupportedMediaType(self.mimetype.clone()));
        }

        if self.size > config.max_size_bytes {
            return Err(UserError::FileTooLarge {
                size: self.size,
                max: config.max_size_bytes,
            });
        }

        Ok(())
    }

    /// Validate the file and describe where it is served from
    pub fn into_avatar(self, config: &AvatarConfig) -> Result<AvatarUploadResult, UserError> {
        self.validate_avatar(config)?;

        let url = format!("{}/{}", config.public_base_url.trim_end_matches('/'), self.filename);
        log::debug!("Avatar {} stored as {}", self.originalname, url);

        Ok(AvatarUploadResult {
            url,
            filename: self.filename,
            size: self.size,
            mimetype: self.mimetype,
        })
    }
}
