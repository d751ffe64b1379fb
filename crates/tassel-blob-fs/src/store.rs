//! [`FsBlobStore`] — the filesystem implementation of [`BlobStore`].

use std::{
  io,
  path::{Component, Path, PathBuf},
};

use sha2::{Digest, Sha256};
use tassel_core::{
  blob::{BlobMeta, BlobStore},
  document::FileRef,
};
use tokio::fs;

use crate::{Error, Result};

/// A blob store rooted at one directory.
///
/// References have the shape `student-dir/kind-hash16.ext`, where the
/// student directory is the matric number with `/` flattened to `-`. The
/// hash is the first 16 hex characters of the SHA-256 of the content, so
/// saving identical bytes under the same metadata is idempotent.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
  root: PathBuf,
}

impl FsBlobStore {
  /// Open a store rooted at `root`, creating the directory if needed.
  pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
    let root = root.into();
    fs::create_dir_all(&root).await?;
    Ok(Self { root })
  }

  /// Map a reference back to its path, refusing anything that does not
  /// have the two-component shape [`FsBlobStore::save`] produces.
  fn resolve(&self, file_ref: &FileRef) -> Result<PathBuf> {
    let rel = Path::new(file_ref.as_str());
    let parts: Vec<_> = rel.components().collect();
    if parts.len() != 2
      || !parts.iter().all(|c| matches!(c, Component::Normal(_)))
    {
      return Err(Error::InvalidRef(file_ref.as_str().to_owned()));
    }
    Ok(self.root.join(rel))
  }
}

impl BlobStore for FsBlobStore {
  type Error = Error;

  async fn save(&self, bytes: &[u8], meta: &BlobMeta) -> Result<FileRef> {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hex::encode(hasher.finalize());

    let dir_name = meta.matric.as_str().replace('/', "-");
    let file_name =
      format!("{}-{}.{}", meta.kind, &digest[..16], meta.extension);

    let dir = self.root.join(&dir_name);
    fs::create_dir_all(&dir).await?;

    // Write to a dot-prefixed sibling and rename into place, so a crash
    // mid-write never leaves a half-written blob under a listable name.
    let tmp = dir.join(format!(".{file_name}.tmp"));
    fs::write(&tmp, bytes).await?;
    fs::rename(&tmp, dir.join(&file_name)).await?;

    Ok(FileRef::new(format!("{dir_name}/{file_name}")))
  }

  async fn read(&self, file_ref: &FileRef) -> Result<Option<Vec<u8>>> {
    let path = self.resolve(file_ref)?;
    match fs::read(&path).await {
      Ok(bytes) => Ok(Some(bytes)),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  async fn delete(&self, file_ref: &FileRef) -> Result<()> {
    let path = self.resolve(file_ref)?;
    match fs::remove_file(&path).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }

  async fn list(&self) -> Result<Vec<FileRef>> {
    let mut refs = Vec::new();

    let mut dirs = match fs::read_dir(&self.root).await {
      Ok(rd) => rd,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(refs),
      Err(e) => return Err(e.into()),
    };

    while let Some(entry) = dirs.next_entry().await? {
      if !entry.file_type().await?.is_dir() {
        continue;
      }
      let dir_name = entry.file_name();
      let Some(dir_name) = dir_name.to_str() else { continue };
      let dir_name = dir_name.to_owned();

      let mut files = fs::read_dir(entry.path()).await?;
      while let Some(file) = files.next_entry().await? {
        let name = file.file_name();
        let Some(name) = name.to_str() else { continue };
        // Dot-prefixed names are in-flight temporaries, not blobs.
        if name.starts_with('.') {
          continue;
        }
        refs.push(FileRef::new(format!("{dir_name}/{name}")));
      }
    }

    refs.sort();
    Ok(refs)
  }
}
