use codeport_core::SourceKind;

pub const DEFAULT_ARCHIVE_RESULT_NAME: &str = "analysis_results.zip";
pub const DEFAULT_REPO_RESULT_NAME: &str = "repo_analysis_results.zip";

const MAX_FILENAME_CHARS: usize = 120;

pub fn default_filename(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::LocalArchive => DEFAULT_ARCHIVE_RESULT_NAME,
        SourceKind::RemoteRepo => DEFAULT_REPO_RESULT_NAME,
    }
}

/// Download filename for a result: the `filename` token of the
/// Content-Disposition header when usable, otherwise the default for `kind`.
pub fn filename_for(content_disposition: Option<&str>, kind: SourceKind) -> String {
    content_disposition
        .and_then(filename_from_disposition)
        .map(|name| sanitize_filename(&name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| default_filename(kind).to_string())
}

/// Extracts the `filename` parameter, quoted or bare, from a Content-Disposition value.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    const KEY: &str = "filename=";
    let lower = header.to_ascii_lowercase();
    let start = lower.find(KEY)? + KEY.len();
    let value = &header[start..];

    let name = if let Some(quoted) = value.strip_prefix('"') {
        let end = quoted.find('"')?;
        &quoted[..end]
    } else {
        value.split(';').next().unwrap_or(value).trim()
    };

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Makes a server-provided name safe to create in a local directory.
pub fn sanitize_filename(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);

    // Collapse multiple underscores
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }

    let mut final_name: String = compacted.chars().take(MAX_FILENAME_CHARS).collect();
    let stem_len = final_name.find('.').unwrap_or(final_name.len());
    if is_reserved_windows_name(&final_name[..stem_len]) {
        final_name.insert(stem_len, '_');
    }
    final_name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
