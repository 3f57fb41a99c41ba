//! Profile-specific UI layout descriptions stored on local disk

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::profile::InterfaceProfile;

/// Placeholder replaced by the profile name in a layout path pattern
pub const PROFILE_PLACEHOLDER: &str = "{profile}";

/// Default layout path pattern
pub const DEFAULT_LAYOUT_PATTERN: &str = "./InnoactiveLayout.{profile}.json";

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Layout file does not exist: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read layout file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse layout file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of layout descriptions
pub trait LayoutSource {
    /// Location the layout for `profile` is read from, for diagnostics
    fn location(&self, profile: InterfaceProfile) -> String;

    fn read_layout(&self, profile: InterfaceProfile) -> Result<Value, LayoutError>;
}

/// Reads `<pattern with {profile} substituted>` from the filesystem
#[derive(Debug, Clone)]
pub struct FileLayoutSource {
    pattern: String,
}

impl FileLayoutSource {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn path_for(&self, profile: InterfaceProfile) -> PathBuf {
        PathBuf::from(self.pattern.replace(PROFILE_PLACEHOLDER, profile.as_str()))
    }
}

impl Default for FileLayoutSource {
    fn default() -> Self {
        Self::new(DEFAULT_LAYOUT_PATTERN)
    }
}

impl LayoutSource for FileLayoutSource {
    fn location(&self, profile: InterfaceProfile) -> String {
        self.path_for(profile).display().to_string()
    }

    fn read_layout(&self, profile: InterfaceProfile) -> Result<Value, LayoutError> {
        let path = self.path_for(profile);
        read_layout_file(&path)
    }
}

/// Read and parse a single layout file
pub fn read_layout_file(path: &Path) -> Result<Value, LayoutError> {
    if !path.exists() {
        return Err(LayoutError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let layout = serde_json::from_str(&content)?;
    Ok(layout)
}
