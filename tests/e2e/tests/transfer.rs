//! In-process transfer tests: a real receiver on 127.0.0.1 and the blocking transmitter

use client::{ClientConfig, TransferError, Transmitter};
use e2e_tests::filesystem_validator::{list_files, validate_file, validate_mod_time, validate_tree};
use e2e_tests::test_utils::{create_test_tree, set_mod_time};
use reqwest::StatusCode;
use server::{Receiver, ServerConfig};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tempfile::TempDir;

const MOD_TIME: &str = "2024-01-01T00:00:00Z";

async fn start_receiver(root: &Path, listeners: usize) -> Receiver {
    let config = ServerConfig {
        storage_root: root.to_path_buf(),
        listen: vec!["127.0.0.1:0".to_string(); listeners],
        workers: Some(2),
    };
    let mut receiver = Receiver::new(config);
    receiver.start().await.unwrap();
    receiver
}

fn url_of(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

/// Run a whole transmit on a blocking thread and collect its status lines
async fn transmit(server: String, selected: PathBuf) -> (Result<usize, TransferError>, Vec<String>) {
    tokio::task::spawn_blocking(move || {
        let transmitter = Transmitter::new(&ClientConfig::new(server)).unwrap();
        let (tx, rx) = mpsc::channel::<String>();
        let result = transmitter.transmit(&selected, &tx);
        drop(tx);
        (result, rx.iter().collect())
    })
    .await
    .unwrap()
}

#[actix_web::test]
async fn test_directory_transfer_end_to_end() {
    let source = TempDir::new().unwrap();
    let storage = TempDir::new().unwrap();
    let selected = source.path().join("batch");
    create_test_tree(&selected, &[("a.txt", "hello"), ("sub/b.txt", "world")]).unwrap();
    set_mod_time(&selected.join("a.txt"), MOD_TIME).unwrap();

    let mut receiver = start_receiver(storage.path(), 1).await;
    let server = url_of(receiver.local_addrs()[0]);

    let (result, messages) = transmit(server, selected.clone()).await;

    assert_eq!(result.unwrap(), 2);
    assert_eq!(messages.len(), 3);
    assert_eq!(
        messages[0],
        format!("Sending: {}", selected.join("a.txt").display())
    );
    assert_eq!(
        messages[1],
        format!("Sending: {}", selected.join("sub").join("b.txt").display())
    );
    assert!(messages[2].contains("2 file(s) transferred"));

    validate_tree(storage.path(), &["batch/a.txt", "batch/sub/b.txt"]).unwrap();
    validate_file(storage.path(), "batch/a.txt", b"hello").unwrap();
    validate_file(storage.path(), "batch/sub/b.txt", b"world").unwrap();
    validate_mod_time(storage.path(), "batch/a.txt", MOD_TIME).unwrap();

    receiver.stop().await.unwrap();
}

#[actix_web::test]
async fn test_single_file_lands_at_root_byte_identical() {
    let source = TempDir::new().unwrap();
    let storage = TempDir::new().unwrap();
    let content: Vec<u8> = (0..=255u8).cycle().take(300_000).collect();
    let file = source.path().join("blob.bin");
    std::fs::write(&file, &content).unwrap();

    let mut receiver = start_receiver(storage.path(), 1).await;
    let server = url_of(receiver.local_addrs()[0]);

    let (result, messages) = transmit(server, file).await;

    assert_eq!(result.unwrap(), 1);
    assert_eq!(messages.last().unwrap(), "Done. 1 file(s) transferred.");
    validate_tree(storage.path(), &["blob.bin"]).unwrap();
    validate_file(storage.path(), "blob.bin", &content).unwrap();

    receiver.stop().await.unwrap();
}

#[actix_web::test]
async fn test_nested_tree_round_trip() {
    let source = TempDir::new().unwrap();
    let storage = TempDir::new().unwrap();
    let selected = source.path().join("docs");
    create_test_tree(
        &selected,
        &[
            ("readme.md", "# docs"),
            ("my notes/50% done.txt", "half"),
            ("a/b/c/d.txt", "deep"),
            ("empty.txt", ""),
        ],
    )
    .unwrap();
    std::fs::create_dir_all(selected.join("nothing here")).unwrap();

    let mut receiver = start_receiver(storage.path(), 1).await;
    let server = url_of(receiver.local_addrs()[0]);

    let (result, _) = transmit(server, selected).await;

    assert_eq!(result.unwrap(), 4);
    validate_tree(
        storage.path(),
        &[
            "docs/a/b/c/d.txt",
            "docs/empty.txt",
            "docs/my notes/50% done.txt",
            "docs/readme.md",
        ],
    )
    .unwrap();
    validate_file(storage.path(), "docs/my notes/50% done.txt", b"half").unwrap();
    validate_file(storage.path(), "docs/empty.txt", b"").unwrap();
    assert!(!storage.path().join("docs").join("nothing here").exists());

    receiver.stop().await.unwrap();
}

#[cfg(unix)]
#[actix_web::test]
async fn test_backslash_file_name_round_trip() {
    let source = TempDir::new().unwrap();
    let storage = TempDir::new().unwrap();
    let selected = source.path().join("odd");
    std::fs::create_dir(&selected).unwrap();
    std::fs::write(selected.join("a\\b.txt"), "slashed").unwrap();

    let mut receiver = start_receiver(storage.path(), 1).await;
    let server = url_of(receiver.local_addrs()[0]);

    let (result, messages) = transmit(server, selected).await;

    assert_eq!(result.unwrap(), 1, "messages: {:?}", messages);
    validate_tree(storage.path(), &["odd/a\\b.txt"]).unwrap();
    validate_file(storage.path(), "odd/a\\b.txt", b"slashed").unwrap();

    receiver.stop().await.unwrap();
}

#[actix_web::test]
async fn test_resending_overwrites() {
    let source = TempDir::new().unwrap();
    let storage = TempDir::new().unwrap();
    let file = source.path().join("note.txt");
    std::fs::write(&file, "a much longer first version").unwrap();

    let mut receiver = start_receiver(storage.path(), 1).await;
    let server = url_of(receiver.local_addrs()[0]);

    let (result, _) = transmit(server.clone(), file.clone()).await;
    result.unwrap();
    std::fs::write(&file, "second").unwrap();
    let (result, _) = transmit(server, file).await;
    result.unwrap();

    validate_tree(storage.path(), &["note.txt"]).unwrap();
    validate_file(storage.path(), "note.txt", b"second").unwrap();

    receiver.stop().await.unwrap();
}

#[actix_web::test]
async fn test_first_failure_stops_batch() {
    let source = TempDir::new().unwrap();
    let storage = TempDir::new().unwrap();
    let selected = source.path().join("batch");
    create_test_tree(&selected, &[("a.txt", "a"), ("b.txt", "b"), ("c.txt", "c")]).unwrap();
    // A directory where b.txt should go makes the receiver fail on create
    std::fs::create_dir_all(storage.path().join("batch").join("b.txt")).unwrap();

    let mut receiver = start_receiver(storage.path(), 1).await;
    let server = url_of(receiver.local_addrs()[0]);

    let (result, messages) = transmit(server, selected.clone()).await;

    match result.unwrap_err() {
        TransferError::Rejected { status, body } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body.starts_with("Create failed"), "body: {}", body);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(messages.len(), 3);
    assert!(messages[0].ends_with("a.txt"));
    assert!(messages[1].ends_with("b.txt"));
    assert!(messages[2].starts_with("Error: Upload failed: 500"));
    assert!(messages.iter().all(|m| !m.starts_with("Done.")));

    validate_file(storage.path(), "batch/a.txt", b"a").unwrap();
    assert!(!storage.path().join("batch").join("c.txt").exists());

    receiver.stop().await.unwrap();
}

#[actix_web::test]
async fn test_mod_time_header_is_optional() {
    let storage = TempDir::new().unwrap();
    let mut receiver = start_receiver(storage.path(), 1).await;
    let server = url_of(receiver.local_addrs()[0]);
    let http = reqwest::Client::new();

    let response = http
        .put(format!("{}/upload/plain.txt", server))
        .body("no header")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = http
        .put(format!("{}/upload/garbled.txt", server))
        .header(common::MODTIME_HEADER, "yesterday-ish")
        .body("bad header")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = http
        .put(format!("{}/upload/dated.txt", server))
        .header(common::MODTIME_HEADER, MOD_TIME)
        .body("good header")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    validate_file(storage.path(), "plain.txt", b"no header").unwrap();
    validate_file(storage.path(), "garbled.txt", b"bad header").unwrap();
    validate_mod_time(storage.path(), "dated.txt", MOD_TIME).unwrap();

    receiver.stop().await.unwrap();
}

#[actix_web::test]
async fn test_traversal_is_rejected_on_the_wire() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("root");
    let mut receiver = start_receiver(&root, 1).await;
    let addr = receiver.local_addrs()[0];

    // Raw request so no client library normalizes the dot segments away
    let response = tokio::task::spawn_blocking(move || {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .write_all(
                b"PUT /upload/../escape.txt HTTP/1.1\r\n\
                  Host: localhost\r\n\
                  Content-Length: 1\r\n\
                  Connection: close\r\n\r\nx",
            )
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    })
    .await
    .unwrap();

    assert!(response.starts_with("HTTP/1.1 400"), "response: {}", response);
    assert!(!temp.path().join("escape.txt").exists());
    assert!(list_files(&root).unwrap().is_empty());

    receiver.stop().await.unwrap();
}

#[actix_web::test]
async fn test_every_listener_writes_to_the_same_root() {
    let source = TempDir::new().unwrap();
    let storage = TempDir::new().unwrap();
    create_test_tree(source.path(), &[("one.txt", "1"), ("two.txt", "2")]).unwrap();

    let mut receiver = start_receiver(storage.path(), 2).await;
    let addrs = receiver.local_addrs().to_vec();
    assert_eq!(addrs.len(), 2);

    let (first, _) = transmit(url_of(addrs[0]), source.path().join("one.txt")).await;
    let (second, _) = transmit(url_of(addrs[1]), source.path().join("two.txt")).await;
    first.unwrap();
    second.unwrap();

    validate_tree(storage.path(), &["one.txt", "two.txt"]).unwrap();

    receiver.stop().await.unwrap();
}

#[actix_web::test]
async fn test_concurrent_batches() {
    let source = TempDir::new().unwrap();
    let storage = TempDir::new().unwrap();
    create_test_tree(
        source.path(),
        &[("left/l1.txt", "l1"), ("left/l2.txt", "l2"), ("right/r1.txt", "r1")],
    )
    .unwrap();

    let mut receiver = start_receiver(storage.path(), 1).await;
    let server = url_of(receiver.local_addrs()[0]);

    let left = transmit(server.clone(), source.path().join("left"));
    let right = transmit(server, source.path().join("right"));
    let ((left, _), (right, _)) = tokio::join!(left, right);

    assert_eq!(left.unwrap(), 2);
    assert_eq!(right.unwrap(), 1);
    validate_tree(
        storage.path(),
        &["left/l1.txt", "left/l2.txt", "right/r1.txt"],
    )
    .unwrap();

    receiver.stop().await.unwrap();
}

#[actix_web::test]
async fn test_stopped_receiver_refuses_uploads() {
    let source = TempDir::new().unwrap();
    let storage = TempDir::new().unwrap();
    let file = source.path().join("late.txt");
    std::fs::write(&file, "late").unwrap();

    let mut receiver = start_receiver(storage.path(), 1).await;
    let server = url_of(receiver.local_addrs()[0]);
    receiver.stop().await.unwrap();
    assert!(!receiver.is_listening());

    let (result, messages) = transmit(server, file).await;

    assert!(matches!(result, Err(TransferError::Transport(_))));
    assert!(messages.last().unwrap().starts_with("Error: "));
    assert!(!storage.path().join("late.txt").exists());
}

#[actix_web::test]
async fn test_health_reports_ok() {
    let storage = TempDir::new().unwrap();
    let mut receiver = start_receiver(storage.path(), 1).await;
    let server = url_of(receiver.local_addrs()[0]);

    let health: common::HealthResponse = reqwest::get(format!("{}/health", server))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(health.status, "ok");
    receiver.stop().await.unwrap();
}
