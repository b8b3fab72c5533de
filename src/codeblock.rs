//! Code block actions: download file naming and the copy indicator

use std::time::{Duration, Instant};

/// Extension used when the language is not recognised
pub const FALLBACK_EXTENSION: &str = ".file";

/// How long the "copied" check mark stays after a copy
pub const COPIED_FEEDBACK: Duration = Duration::from_millis(2000);

/// File extension for a code block tagged `language`
///
/// The tag must match exactly (`rust`, `c++`, `objective-c`, ...);
/// anything else gets [`FALLBACK_EXTENSION`].
///
/// # Examples
///
/// ```
/// use tomo_sidebar::codeblock::file_extension;
///
/// assert_eq!(file_extension("rust"), ".rs");
/// assert_eq!(file_extension("c#"), ".cs");
/// assert_eq!(file_extension("Rust"), ".file");
/// ```
pub fn file_extension(language: &str) -> &'static str {
    match language {
        "javascript" => ".js",
        "python" => ".py",
        "java" => ".java",
        "c" => ".c",
        "cpp" | "c++" => ".cpp",
        "c#" => ".cs",
        "ruby" => ".rb",
        "php" => ".php",
        "swift" => ".swift",
        "objective-c" => ".m",
        "kotlin" => ".kt",
        "typescript" => ".ts",
        "go" => ".go",
        "perl" => ".pl",
        "rust" => ".rs",
        "scala" => ".scala",
        "haskell" => ".hs",
        "lua" => ".lua",
        "shell" => ".sh",
        "sql" => ".sql",
        "html" => ".html",
        "css" => ".css",
        _ => FALLBACK_EXTENSION,
    }
}

/// Name offered in the download prompt: `file-<id><ext>`
///
/// # Arguments
///
/// * `language` - Code block language tag
/// * `id` - Random id chosen by the caller
pub fn suggested_file_name(language: &str, id: &str) -> String {
    format!("file-{}{}", id, file_extension(language))
}

/// Copy button state
#[derive(Debug, Clone, Default)]
pub struct CopyIndicator {
    copied_at: Option<Instant>,
}

impl CopyIndicator {
    /// Record a copy; an empty block is not copied
    pub fn copy(&mut self, value: &str, now: Instant) -> bool {
        if value.is_empty() {
            return false;
        }
        self.copied_at = Some(now);
        true
    }

    /// Whether the check mark is shown at `now`
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPIED_FEEDBACK)
    }
}
