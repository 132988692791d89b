mod common;

use std::fs;

use bytes::Bytes;
use codeport_engine::{
    ArchiveExtractor, ContentKind, ExtractionError, PreviewManager, TransientStore,
    PDF_PLACEHOLDER, UNSUPPORTED_PLACEHOLDER,
};
use common::zip_fixture;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";
const LOCAL_HEADER: &[u8] = b"PK\x03\x04";

/// Overwrites the `nth` occurrence of `needle` in `archive`.
fn patch_nth(archive: &Bytes, needle: &[u8], nth: usize, replacement: &[u8]) -> Bytes {
    assert_eq!(needle.len(), replacement.len());
    let mut bytes = archive.to_vec();
    let offset = bytes
        .windows(needle.len())
        .enumerate()
        .filter(|(_, window)| *window == needle)
        .map(|(offset, _)| offset)
        .nth(nth)
        .unwrap();
    bytes[offset..offset + needle.len()].copy_from_slice(replacement);
    Bytes::from(bytes)
}

fn three_texts() -> Bytes {
    zip_fixture(&[
        ("a.txt", b"alpha"),
        ("b.txt", b"bravo"),
        ("c.txt", b"charlie"),
    ])
}

fn contents(entries: &[codeport_engine::ArchiveEntry]) -> Vec<(&str, &str)> {
    entries
        .iter()
        .map(|entry| {
            (
                entry.path.as_str(),
                entry.decoded_content.as_deref().unwrap_or_default(),
            )
        })
        .collect()
}

#[tokio::test]
async fn text_is_decoded_eagerly_and_images_lazily() {
    let archive = zip_fixture(&[
        ("main.cbl", b"IDENTIFICATION DIVISION."),
        ("diagram.png", PNG_BYTES),
    ]);

    let entries = ArchiveExtractor::new().extract(archive).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].path, "main.cbl");
    assert_eq!(entries[0].kind, ContentKind::Text);
    assert_eq!(
        entries[0].decoded_content.as_deref(),
        Some("IDENTIFICATION DIVISION.")
    );
    assert_eq!(entries[1].path, "diagram.png");
    assert_eq!(entries[1].kind, ContentKind::Image);
    assert_eq!(entries[1].decoded_content, None);
    assert!(entries.iter().all(|entry| !entry.is_transient_resource));
}

#[tokio::test]
async fn directories_are_skipped_and_nested_paths_kept() {
    let archive = zip_fixture(&[
        ("src/", b""),
        ("src/App.java", b"class App {}"),
        ("docs/report.pdf", b"%PDF-1.4"),
    ]);

    let entries = ArchiveExtractor::new().extract(archive).await.unwrap();
    let paths: Vec<_> = entries.iter().map(|entry| entry.path.as_str()).collect();

    assert_eq!(paths, vec!["src/App.java", "docs/report.pdf"]);
    assert_eq!(entries[0].file_name(), "App.java");
    assert_eq!(entries[1].kind, ContentKind::Pdf);
    assert_eq!(entries[1].decoded_content, None);
}

#[tokio::test]
async fn garbage_bytes_fail_extraction() {
    let result = ArchiveExtractor::new()
        .extract(Bytes::from_static(b"this is not a zip"))
        .await;

    assert!(matches!(result, Err(ExtractionError::Open(_))));
}

#[tokio::test]
async fn many_text_entries_decode_from_one_parsed_archive() {
    let files: Vec<(String, String)> = (0..300)
        .map(|i| (format!("src/File{i}.java"), format!("class File{i} {{}}")))
        .collect();
    let fixture: Vec<(&str, &[u8])> = files
        .iter()
        .map(|(name, body)| (name.as_str(), body.as_bytes()))
        .collect();

    let entries = ArchiveExtractor::new()
        .extract(zip_fixture(&fixture))
        .await
        .unwrap();

    assert_eq!(entries.len(), 300);
    for (entry, (name, body)) in entries.iter().zip(&files) {
        assert_eq!(&entry.path, name);
        assert_eq!(entry.decoded_content.as_deref(), Some(body.as_str()));
    }
    assert_eq!(entries[299].handle.read_bytes().unwrap(), b"class File299 {}");
}

#[tokio::test]
async fn damaged_local_header_only_affects_its_entry() {
    let archive = patch_nth(&three_texts(), LOCAL_HEADER, 1, b"PK\x00\x00");

    let entries = ArchiveExtractor::new().extract(archive).await.unwrap();

    let listed = contents(&entries);
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0], ("a.txt", "alpha"));
    assert_eq!(listed[1].0, "b.txt");
    assert!(listed[1].1.starts_with("Error loading content: "));
    assert_eq!(listed[2], ("c.txt", "charlie"));
}

#[tokio::test]
async fn checksum_mismatch_only_affects_its_entry() {
    let archive = patch_nth(&three_texts(), b"bravo", 0, b"brXvo");

    let entries = ArchiveExtractor::new().extract(archive).await.unwrap();

    let listed = contents(&entries);
    assert_eq!(listed[0], ("a.txt", "alpha"));
    assert!(listed[1].1.starts_with("Error loading content: "));
    assert_eq!(listed[2], ("c.txt", "charlie"));
}

#[tokio::test]
async fn unreadable_image_gets_placeholder_and_no_uri() {
    let archive = zip_fixture(&[("notes.txt", b"hello"), ("diagram.png", PNG_BYTES)]);
    let archive = patch_nth(&archive, LOCAL_HEADER, 1, b"PK\x00\x00");
    let entries = ArchiveExtractor::new().extract(archive).await.unwrap();
    let store = TransientStore::new();
    let mut preview = PreviewManager::new(store.clone());

    let shown = preview.select(&entries[1]).await.entry.clone().unwrap();

    assert_eq!(shown.path, "diagram.png");
    assert!(!shown.is_transient_resource);
    assert!(shown
        .decoded_content
        .unwrap()
        .starts_with("Error loading image: "));
    assert_eq!(store.live_count(), 0);
}

#[tokio::test]
async fn selecting_an_image_twice_keeps_one_live_resource() {
    let archive = zip_fixture(&[("diagram.png", PNG_BYTES), ("notes.txt", b"hello")]);
    let entries = ArchiveExtractor::new().extract(archive).await.unwrap();
    let store = TransientStore::new();
    let mut preview = PreviewManager::new(store.clone());

    let first_uri = {
        let selection = preview.select(&entries[0]).await;
        let shown = selection.entry.as_ref().unwrap();
        assert!(selection.open);
        assert!(shown.is_transient_resource);
        shown.decoded_content.clone().unwrap()
    };
    assert_eq!(store.live_count(), 1);
    let content = store.resolve(&first_uri).unwrap();
    assert_eq!(content.bytes.as_ref(), PNG_BYTES);
    assert_eq!(content.mime_type, "image/png");

    let second = preview.select(&entries[0]).await.entry.clone().unwrap();
    let second_uri = second.decoded_content.unwrap();
    assert_eq!(store.live_count(), 1);
    assert_ne!(first_uri, second_uri);
    assert!(store.resolve(&first_uri).is_none());

    preview.select(&entries[1]).await;
    assert_eq!(store.live_count(), 0);
    assert!(store.resolve(&second_uri).is_none());
}

#[tokio::test]
async fn close_revokes_and_clears_selection() {
    let archive = zip_fixture(&[("diagram.png", PNG_BYTES)]);
    let entries = ArchiveExtractor::new().extract(archive).await.unwrap();
    let store = TransientStore::new();
    let mut preview = PreviewManager::new(store.clone());

    preview.select(&entries[0]).await;
    preview.close();

    assert_eq!(store.live_count(), 0);
    assert!(preview.selection().entry.is_none());
    assert!(!preview.selection().open);

    preview.close();
    assert_eq!(store.live_count(), 0);
}

#[tokio::test]
async fn pdf_and_unknown_entries_show_placeholders() {
    let archive = zip_fixture(&[("report.pdf", b"%PDF-1.4"), ("tool.exe", b"MZ")]);
    let entries = ArchiveExtractor::new().extract(archive).await.unwrap();
    let store = TransientStore::new();
    let mut preview = PreviewManager::new(store.clone());

    let shown = preview.select(&entries[0]).await.entry.clone().unwrap();
    assert_eq!(shown.decoded_content.as_deref(), Some(PDF_PLACEHOLDER));
    assert!(!shown.is_transient_resource);

    let shown = preview.select(&entries[1]).await.entry.clone().unwrap();
    assert_eq!(shown.decoded_content.as_deref(), Some(UNSUPPORTED_PLACEHOLDER));
    assert_eq!(store.live_count(), 0);
}

#[tokio::test]
async fn open_without_selection_shows_the_list() {
    let mut preview = PreviewManager::new(TransientStore::new());

    preview.open();

    assert!(preview.selection().open);
    assert!(preview.selection().entry.is_none());
}

#[tokio::test]
async fn entry_download_writes_raw_bytes_and_releases_handle() {
    let archive = zip_fixture(&[("docs/report.pdf", b"%PDF-1.4 body")]);
    let entries = ArchiveExtractor::new().extract(archive).await.unwrap();
    let store = TransientStore::new();
    let preview = PreviewManager::new(store.clone());
    let temp = TempDir::new().unwrap();

    let path = preview
        .download_entry(&entries[0], temp.path())
        .await
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "report.pdf");
    assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.4 body");
    assert_eq!(store.live_count(), 0);
}
