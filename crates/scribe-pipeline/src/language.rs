//! Source language detection for code review

use std::path::Path;

const LANGUAGES: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("cc", "cpp"),
    ("c", "c"),
    ("h", "c"),
    ("cs", "csharp"),
    ("php", "php"),
    ("rb", "ruby"),
    ("go", "go"),
    ("rs", "rust"),
];

/// Language name for a reviewable file, by extension (case-insensitive)
pub fn language_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    LANGUAGES
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, language)| *language)
}

/// Extensions accepted for code review, for help text and error messages
pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|(ext, _)| *ext)
}
