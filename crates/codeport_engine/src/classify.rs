/// Preview category of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Text,
    Pdf,
    Image,
    Other,
}

const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "cbl", "cob", "java", "py", "cs", "js", "html", "css", "md", "json", "xml", "yaml",
    "yml", "log",
];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "webp"];

/// Classifies an entry path by its extension, case-insensitively.
pub fn classify(path: &str) -> ContentKind {
    let Some(ext) = extension(path) else {
        return ContentKind::Other;
    };
    if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        ContentKind::Text
    } else if ext == "pdf" {
        ContentKind::Pdf
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        ContentKind::Image
    } else {
        ContentKind::Other
    }
}

/// MIME type used when handing image bytes to a transient resource.
pub fn image_mime_type(path: &str) -> &'static str {
    match extension(path).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn extension(path: &str) -> Option<String> {
    let file_name = path.rsplit(&['/', '\\'][..]).next().unwrap_or(path);
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}
