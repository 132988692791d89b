//! Plain-text rendering of the session for the terminal.

use std::fmt::Write;

use codeport_core::{SessionMode, SessionView, SourceKind, StatusTone};
use codeport_engine::{ArchiveEntry, ContentKind, PreviewSelection};

pub const HELP: &str = "\
Commands:
  zip <path>          select a local ZIP archive
  repo <url>          select a remote repository
  lang <name|none>    set the target language (none = summarize only)
  submit              analyze the selected input
  reprocess           analyze the last submitted input again
  list                list entries of the result archive
  show <n>            preview entry n
  open | close        open or close the preview
  save <n> [dir]      save entry n
  download [dir]      save the result archive
  status              show the session state
  help                show this text
  quit                leave";

/// The status line, prefixed by its tone, or `None` when there is none.
pub fn status_line(view: &SessionView) -> Option<String> {
    let message = view.status_message.as_deref()?;
    let tag = match view.status_tone {
        Some(StatusTone::Success) => "ok",
        Some(StatusTone::Error(_)) => "error",
        Some(StatusTone::Info) | None => "..",
    };
    Some(format!("[{tag}] {message}"))
}

pub fn summary(view: &SessionView) -> String {
    let mut out = String::new();
    let mode = match view.mode {
        SessionMode::Idle => "idle",
        SessionMode::Submitting => "submitting",
        SessionMode::Success => "success",
        SessionMode::Error => "error",
    };
    let _ = writeln!(out, "mode:      {mode}");
    let input = match (view.input_kind, view.input_label.as_deref()) {
        (Some(kind), Some(label)) => format!("{} {label}", kind_label(kind)),
        _ => "none".to_string(),
    };
    let _ = writeln!(out, "input:     {input}");
    let language = view
        .target_language
        .map_or_else(|| "none (summarize only)".to_string(), |l| l.to_string());
    let _ = writeln!(out, "language:  {language}");
    if let Some(result) = &view.result {
        let _ = writeln!(
            out,
            "result:    {} ({} bytes{})",
            result.filename,
            result.byte_len,
            if result.is_reprocess { ", reprocessed" } else { "" }
        );
    }
    let _ = write!(
        out,
        "actions:   submit {}, reprocess {}",
        yes_no(view.can_submit),
        yes_no(view.can_reprocess)
    );
    if let Some(line) = status_line(view) {
        let _ = write!(out, "\n{line}");
    }
    out
}

pub fn entry_list(entries: &[ArchiveEntry]) -> String {
    if entries.is_empty() {
        return "No entries to preview.".to_string();
    }
    let width = entries.len().to_string().len();
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{:>width$}. {} [{}]",
                i + 1,
                entry.path,
                content_label(entry.kind)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn selection(selection: &PreviewSelection) -> String {
    let Some(entry) = &selection.entry else {
        return if selection.open {
            "Preview open. Use `list` and `show <n>` to pick an entry.".to_string()
        } else {
            "Preview closed.".to_string()
        };
    };
    let body = entry.decoded_content.as_deref().unwrap_or_default();
    if entry.is_transient_resource {
        format!("== {} ==\nImage available at {body}", entry.path)
    } else {
        format!("== {} ==\n{body}", entry.path)
    }
}

fn kind_label(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::LocalArchive => "zip",
        SourceKind::RemoteRepo => "repo",
    }
}

fn content_label(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Text => "text",
        ContentKind::Pdf => "pdf",
        ContentKind::Image => "image",
        ContentKind::Other => "other",
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
