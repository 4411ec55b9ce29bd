use buscador_core::IoError;
use std::io::ErrorKind;
use std::path::Path;

/// Map catalog, preference and config file errors to user-friendly messages
/// Returns (title, message, details)
pub fn map_io_error(error: &IoError) -> (String, String, String) {
    match error {
        IoError::Read { path, source } => map_os_error(source.kind(), path, false, error),
        IoError::Write { path, source } => map_os_error(source.kind(), path, true, error),
        IoError::Json { path, source } => (
            "Invalid JSON".to_string(),
            "The file is not valid JSON.".to_string(),
            format!(
                "Path: {}\nLine {}, column {}: {}",
                path.display(),
                source.line(),
                source.column(),
                source
            ),
        ),
        IoError::NotACatalog { path } => (
            "Not a Catalog".to_string(),
            "The catalog file must contain a JSON array of listings.".to_string(),
            format!("Path: {}", path.display()),
        ),
        IoError::InvalidPreferences { path, problems } => (
            "Invalid Preferences".to_string(),
            "The preferences file has validation errors.".to_string(),
            format!(
                "Path: {}\n\n{}\n\nFix or delete the file to start from the default filters.",
                path.display(),
                bullet_list(problems)
            ),
        ),
        IoError::InvalidConfig { path, problems } => (
            "Invalid Settings".to_string(),
            "The settings file has out-of-range values.".to_string(),
            format!("Path: {}\n\n{}", path.display(), bullet_list(problems)),
        ),
    }
}

fn bullet_list(problems: &[String]) -> String {
    problems
        .iter()
        .map(|p| format!("  - {}", p))
        .collect::<Vec<_>>()
        .join("\n")
}

fn map_os_error(
    kind: ErrorKind,
    path: &Path,
    writing: bool,
    error: &IoError,
) -> (String, String, String) {
    match kind {
        ErrorKind::NotFound => (
            "File Not Found".to_string(),
            "The file could not be found.".to_string(),
            format!(
                "Path: {}\n\nPlease verify the file exists and you have permission to read it.",
                path.display()
            ),
        ),
        ErrorKind::PermissionDenied => {
            let action = if writing { "write to" } else { "read" };
            (
                "Permission Denied".to_string(),
                "Permission denied.".to_string(),
                format!("You don't have permission to {} this file:\n{}", action, path.display()),
            )
        }
        ErrorKind::StorageFull => (
            "Disk Full".to_string(),
            "Disk full.".to_string(),
            "There is no space left on the device to save the file.".to_string(),
        ),
        _ if writing => (
            "Error Saving File".to_string(),
            "Failed to save preferences.".to_string(),
            error.to_string(),
        ),
        _ => (
            "Error Loading File".to_string(),
            "Failed to load file.".to_string(),
            error.to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let error = IoError::Read {
            path: PathBuf::from("catalog.json"),
            source: std::io::Error::from(ErrorKind::NotFound),
        };
        let (title, _, details) = map_io_error(&error);
        assert_eq!(title, "File Not Found");
        assert!(details.contains("catalog.json"));
    }

    #[test]
    fn test_write_permission_mentions_writing() {
        let error = IoError::Write {
            path: PathBuf::from("/etc/prefs.json"),
            source: std::io::Error::from(ErrorKind::PermissionDenied),
        };
        let (title, _, details) = map_io_error(&error);
        assert_eq!(title, "Permission Denied");
        assert!(details.contains("write to"));
    }

    #[test]
    fn test_invalid_preferences_lists_problems() {
        let error = IoError::InvalidPreferences {
            path: PathBuf::from("prefs.json"),
            problems: vec!["vehicle: 'year' must be a [min, max] pair of numbers".to_string()],
        };
        let (title, _, details) = map_io_error(&error);
        assert_eq!(title, "Invalid Preferences");
        assert!(details.contains("  - vehicle: 'year'"));
    }

    #[test]
    fn test_invalid_config_lists_problems() {
        let error = IoError::InvalidConfig {
            path: PathBuf::from("buscador.json"),
            problems: vec!["'pageSize' must be at least 1".to_string()],
        };
        let (title, _, details) = map_io_error(&error);
        assert_eq!(title, "Invalid Settings");
        assert!(details.contains("  - 'pageSize'"));
    }
}
