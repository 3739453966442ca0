use std::path::{Component, Path};

/// Error type for relative path validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathValidationError {
    Empty,
    ContainsNullByte,
    ContainsBackslash,
    Absolute,
    EmptySegment,
    IsSpecialDirectory,
}

impl PathValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            PathValidationError::Empty => "Path cannot be empty",
            PathValidationError::ContainsNullByte => "Path cannot contain null bytes",
            PathValidationError::ContainsBackslash => {
                "Path must use '/' as separator and cannot contain '\\'"
            }
            PathValidationError::Absolute => "Path must be relative to the storage root",
            PathValidationError::EmptySegment => "Path cannot contain empty segments",
            PathValidationError::IsSpecialDirectory => "Path segments cannot be '.' or '..'",
        }
    }
}

impl std::fmt::Display for PathValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PathValidationError {}

/// Validate a slash-separated relative path so it cannot escape the storage root.
///
/// Checks that:
/// - the path is not empty and contains no null bytes
/// - on Windows, the path uses `/` only (`\` is a separator there)
/// - the path does not start with `/`
/// - no segment is empty, `.` or `..`
pub fn validate_relative_path(path: &str) -> Result<(), PathValidationError> {
    if path.is_empty() {
        return Err(PathValidationError::Empty);
    }

    if path.contains('\0') {
        return Err(PathValidationError::ContainsNullByte);
    }

    if cfg!(windows) && path.contains('\\') {
        return Err(PathValidationError::ContainsBackslash);
    }

    if path.starts_with('/') {
        return Err(PathValidationError::Absolute);
    }

    for segment in path.split('/') {
        match segment {
            "" => return Err(PathValidationError::EmptySegment),
            "." | ".." => return Err(PathValidationError::IsSpecialDirectory),
            // "C:" would turn into a drive prefix when joined on Windows
            s if s.contains(':') && cfg!(windows) => return Err(PathValidationError::Absolute),
            _ => {}
        }
    }

    Ok(())
}

/// Render a relative filesystem path with `/` separators.
///
/// `.` components are dropped. Returns `None` for any other non-normal
/// component or a component that is not valid UTF-8.
pub fn to_slash_path(path: &Path) -> Option<String> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}
