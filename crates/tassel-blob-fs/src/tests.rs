//! Integration tests for `FsBlobStore` against a temporary directory.

use tassel_core::{
  blob::{BlobMeta, BlobStore},
  document::{DocKind, FileRef},
  student::MatricNo,
};
use tempfile::TempDir;

use crate::{Error, FsBlobStore};

async fn store() -> (TempDir, FsBlobStore) {
  let dir = tempfile::tempdir().expect("temp dir");
  let store = FsBlobStore::open(dir.path()).await.expect("blob store");
  (dir, store)
}

fn meta(kind: DocKind) -> BlobMeta {
  BlobMeta {
    matric:    MatricNo::new("eng/2020/001"),
    kind,
    extension: "pdf".into(),
  }
}

#[tokio::test]
async fn save_then_read_roundtrip() {
  let (_dir, s) = store().await;

  let file_ref =
    s.save(b"%PDF-1.4 receipt", &meta(DocKind::FeesReceipt)).await.unwrap();
  let bytes = s.read(&file_ref).await.unwrap().unwrap();
  assert_eq!(bytes, b"%PDF-1.4 receipt");
}

#[tokio::test]
async fn reference_shape_flattens_the_matric() {
  let (_dir, s) = store().await;

  let file_ref =
    s.save(b"bytes", &meta(DocKind::ClearanceForm)).await.unwrap();
  let text = file_ref.as_str();

  assert!(text.starts_with("eng-2020-001/clearance-form-"), "{text}");
  assert!(text.ends_with(".pdf"), "{text}");
}

#[tokio::test]
async fn identical_bytes_yield_the_same_reference() {
  let (_dir, s) = store().await;

  let a = s.save(b"same", &meta(DocKind::FeesReceipt)).await.unwrap();
  let b = s.save(b"same", &meta(DocKind::FeesReceipt)).await.unwrap();
  assert_eq!(a, b);

  let c = s.save(b"different", &meta(DocKind::FeesReceipt)).await.unwrap();
  assert_ne!(a, c);
}

#[tokio::test]
async fn read_unknown_returns_none() {
  let (_dir, s) = store().await;
  let missing = FileRef::new("eng-2020-001/fees-receipt-0000.pdf");
  assert!(s.read(&missing).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_is_idempotent() {
  let (_dir, s) = store().await;

  let file_ref =
    s.save(b"bytes", &meta(DocKind::ResultStatement)).await.unwrap();
  s.delete(&file_ref).await.unwrap();
  assert!(s.read(&file_ref).await.unwrap().is_none());

  // Deleting again is a no-op, not an error.
  s.delete(&file_ref).await.unwrap();
}

#[tokio::test]
async fn list_returns_every_stored_reference() {
  let (_dir, s) = store().await;

  let a = s.save(b"one", &meta(DocKind::FeesReceipt)).await.unwrap();
  let b = s.save(b"two", &meta(DocKind::ClearanceForm)).await.unwrap();
  let other = BlobMeta {
    matric:    MatricNo::new("eng/2020/002"),
    kind:      DocKind::FeesReceipt,
    extension: "png".into(),
  };
  let c = s.save(b"three", &other).await.unwrap();

  let mut expected = vec![a, b, c];
  expected.sort();
  assert_eq!(s.list().await.unwrap(), expected);
}

#[tokio::test]
async fn list_on_an_empty_store_is_empty() {
  let (_dir, s) = store().await;
  assert!(s.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn traversal_references_are_refused() {
  let (_dir, s) = store().await;

  for bad in ["../outside.pdf", "/etc/passwd", "a/b/c.pdf", "plain.pdf"] {
    let err = s.read(&FileRef::new(bad)).await.unwrap_err();
    assert!(matches!(err, Error::InvalidRef(_)), "{bad} must be refused");
  }
}
