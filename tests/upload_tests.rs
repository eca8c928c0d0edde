mod common;

use common::{MemoryChannel, run_upload, test_app};
use filedrop::domain::upload::UploadStatus;

#[tokio::test]
async fn upload_stores_bytes_and_records_pending_row() {
    let app = test_app(false).await;
    let channel = MemoryChannel::new()
        .text("filename:report.pdf")
        .binary(b"ab")
        .binary(b"c")
        .text("EOF");

    let (record, channel) = run_upload(&app.state, channel).await;

    let record = record.expect("upload should succeed");
    assert_eq!(record.original_filename, "report.pdf");
    assert_eq!(record.saved_filename, "report.pdf");
    assert_eq!(record.status, UploadStatus::Pending);
    assert_eq!(
        channel.sent,
        vec!["File report.pdf uploaded successfully as report.pdf"]
    );
    assert!(channel.closed);

    let bytes = app.staged_bytes("report.pdf").await;
    assert_eq!(bytes, b"abc");
    let records = app.state.upload_storage.list_uploads().await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn repeated_name_is_saved_with_suffix_most_recent_first() {
    let app = test_app(false).await;
    for data in [b"abc", b"xyz"] {
        let channel = MemoryChannel::new()
            .text("filename:report.pdf")
            .binary(data)
            .close_frame();
        run_upload(&app.state, channel).await;
    }

    assert_eq!(app.staged_bytes("report.pdf").await, b"abc");
    assert_eq!(app.staged_bytes("report_1.pdf").await, b"xyz");

    let saved: Vec<String> = app
        .state
        .upload_storage
        .list_uploads()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.saved_filename)
        .collect();
    assert_eq!(saved, vec!["report_1.pdf", "report.pdf"]);
}

#[tokio::test]
async fn large_multi_chunk_upload_is_byte_identical() {
    let app = test_app(false).await;
    let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    let mut channel = MemoryChannel::new().text("filename:blob.bin");
    for chunk in payload.chunks(8192) {
        channel = channel.binary(chunk);
    }

    let (record, _) = run_upload(&app.state, channel).await;

    assert!(record.is_some());
    let stored = app.staged_bytes("blob.bin").await;
    assert_eq!(stored.len(), payload.len());
    assert_eq!(stored, payload);
}

#[tokio::test]
async fn announcement_without_separator_is_rejected() {
    let app = test_app(false).await;
    let channel = MemoryChannel::new().text("report.pdf").binary(b"abc");

    let (record, channel) = run_upload(&app.state, channel).await;

    assert!(record.is_none());
    assert_eq!(channel.sent.len(), 1);
    assert!(channel.sent[0].starts_with("Error: "));
    assert!(channel.closed);
    assert!(app.state.storage.list_staged().await.unwrap().is_empty());
    assert!(app.state.upload_storage.list_uploads().await.unwrap().is_empty());
}

#[tokio::test]
async fn path_escaping_name_is_rejected() {
    let app = test_app(false).await;
    let channel = MemoryChannel::new().text("filename:../escape.txt").binary(b"abc");

    let (record, channel) = run_upload(&app.state, channel).await;

    assert!(record.is_none());
    assert_eq!(channel.sent, vec!["Error: invalid filename: ../escape.txt"]);
    assert!(!app.dir.path().join("escape.txt").exists());
    assert!(app.state.upload_storage.list_uploads().await.unwrap().is_empty());
}

#[tokio::test]
async fn binary_announcement_is_rejected() {
    let app = test_app(false).await;
    let channel = MemoryChannel::new().binary(b"abc");

    let (record, channel) = run_upload(&app.state, channel).await;

    assert!(record.is_none());
    assert!(channel.sent[0].starts_with("Error: malformed filename announcement"));
}

#[tokio::test]
async fn channel_closed_before_announcement() {
    let app = test_app(false).await;

    let (record, channel) = run_upload(&app.state, MemoryChannel::new()).await;

    assert!(record.is_none());
    assert!(channel.sent[0].starts_with("Error: channel error"));
    assert!(channel.closed);
}

#[tokio::test]
async fn zero_length_chunk_ends_transfer() {
    for legacy_parity in [false, true] {
        let app = test_app(legacy_parity).await;
        let channel = MemoryChannel::new()
            .text("filename:gap.txt")
            .binary(b"before")
            .binary(b"")
            .binary(b"after");

        let (record, channel) = run_upload(&app.state, channel).await;

        assert!(record.is_some());
        assert_eq!(app.staged_bytes("gap.txt").await, b"before");
        assert_eq!(
            channel.sent,
            vec!["File gap.txt uploaded successfully as gap.txt"]
        );
        assert!(channel.closed);
    }
}

#[tokio::test]
async fn text_frame_ends_transfer_by_default() {
    let app = test_app(false).await;
    let channel = MemoryChannel::new()
        .text("filename:notes.txt")
        .binary(b"hello")
        .text("EOF")
        .binary(b"ignored");

    let (record, _) = run_upload(&app.state, channel).await;

    assert_eq!(record.unwrap().saved_filename, "notes.txt");
    assert_eq!(app.staged_bytes("notes.txt").await, b"hello");
}

#[tokio::test]
async fn text_frame_mid_transfer_is_an_error_in_legacy_mode() {
    let app = test_app(true).await;
    let channel = MemoryChannel::new()
        .text("filename:notes.txt")
        .binary(b"hello")
        .text("EOF");

    let (record, channel) = run_upload(&app.state, channel).await;

    assert!(record.is_none());
    assert_eq!(
        channel.sent,
        vec!["Error: channel error: expected binary data, got a text frame"]
    );
    assert!(channel.closed);
    assert!(app.state.storage.list_staged().await.unwrap().is_empty());
    assert!(app.state.upload_storage.list_uploads().await.unwrap().is_empty());
    let mut partials = tokio::fs::read_dir(app.dir.path().join("partial")).await.unwrap();
    assert!(partials.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn transport_failure_leaves_nothing_behind() {
    let app = test_app(false).await;
    let channel = MemoryChannel::new()
        .text("filename:broken.bin")
        .binary(b"partial data")
        .failure("connection reset");

    let (record, channel) = run_upload(&app.state, channel).await;

    assert!(record.is_none());
    assert_eq!(channel.sent, vec!["Error: channel error: connection reset"]);
    assert!(app.state.storage.list_staged().await.unwrap().is_empty());
    assert!(app.state.upload_storage.list_uploads().await.unwrap().is_empty());

    let mut partials = tokio::fs::read_dir(app.dir.path().join("partial")).await.unwrap();
    assert!(partials.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn empty_upload_creates_empty_file() {
    let app = test_app(false).await;
    let channel = MemoryChannel::new().text("filename:empty.txt").close_frame();

    let (record, _) = run_upload(&app.state, channel).await;

    assert!(record.is_some());
    assert!(app.staged_bytes("empty.txt").await.is_empty());
}
