use crate::domain::model::Post;
use crate::utils::error::{GistError, Result};

pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

pub const UPLOAD_PREFIX: &str = "blogImages/";

/// The admin editor form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub category: String,
    pub description: String,
    pub content: String,
    /// Download URL of the uploaded cover, if any.
    pub img: Option<String>,
}

impl PostDraft {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            category: post.category.clone().unwrap_or_default(),
            description: post.description.clone(),
            content: post.content.clone().unwrap_or_default(),
            img: post.cover_image().map(str::to_string),
        }
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("category", &self.category),
            ("description", &self.description),
            ("content", &self.content),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(());
        }
        Err(GistError::ValidationError {
            message: format!("Please fill in all required fields: {}", missing.join(", ")),
        })
    }

    /// Builds the record to store. Editing keeps the original publish
    /// timestamp; both paths stamp `lastModified`.
    pub fn into_post(self, now_ms: i64, existing: Option<&Post>) -> Result<Post> {
        self.validate()?;
        let timestamp = match existing {
            Some(post) => post.timestamp,
            None => Some(now_ms),
        };
        Ok(Post {
            title: self.title,
            category: Some(self.category),
            description: self.description,
            content: Some(self.content),
            img: self.img.filter(|img| !img.trim().is_empty()),
            timestamp,
            last_modified: Some(now_ms),
        })
    }
}

pub fn validate_upload(content_type: &str, size: u64) -> Result<()> {
    if !content_type.starts_with("image/") {
        return Err(GistError::ValidationError {
            message: "Please select an image file".to_string(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(GistError::ValidationError {
            message: "Image size should be less than 5MB".to_string(),
        });
    }
    Ok(())
}

/// Storage object name for an uploaded cover image.
pub fn upload_object_name(file_name: &str, now_ms: i64) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect();
    format!("{}{}_{}", UPLOAD_PREFIX, now_ms, safe)
}
