//! The `CredentialVerifier` trait.
//!
//! Password hashing mechanics are an external collaborator: the argon2
//! implementation lives in `tassel-api`, and tests substitute a plain
//! comparison. Verification is synchronous and CPU-bound; callers invoke it
//! inline.

/// Check a submitted password against a stored credential hash.
pub trait CredentialVerifier: Send + Sync {
  /// `true` iff `password` matches `phc_hash`. Malformed hashes verify as
  /// `false`; they must never authenticate anyone.
  fn verify(&self, password: &str, phc_hash: &str) -> bool;
}
