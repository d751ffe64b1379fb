//! In-memory bearer-token registry.
//!
//! The core mints a [`Session`] on login; the server keeps it here, keyed by
//! its token, and hands a copy back to every request that presents the token
//! before it expires. Restarting the server empties the registry, which is
//! fine for a portal whose sessions are measured in hours.

use std::{collections::HashMap, sync::RwLock};

use chrono::{Duration, Utc};
use tassel_core::session::Session;
use uuid::Uuid;

/// Live sessions, evicted lazily on lookup once their TTL has passed.
#[derive(Debug)]
pub struct SessionRegistry {
  ttl:      Duration,
  sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionRegistry {
  pub fn new(ttl: Duration) -> Self {
    Self {
      ttl,
      sessions: RwLock::new(HashMap::new()),
    }
  }

  pub fn ttl(&self) -> Duration { self.ttl }

  /// Store a freshly minted session and return its bearer token.
  pub fn insert(&self, session: Session) -> Uuid {
    let token = session.token;
    let mut sessions = self.sessions.write().expect("RwLock poisoned");
    sessions.insert(token, session);
    token
  }

  /// Look up a token, evicting it when it has outlived the TTL.
  pub fn get(&self, token: &Uuid) -> Option<Session> {
    {
      let sessions = self.sessions.read().expect("RwLock poisoned");
      match sessions.get(token) {
        Some(s) if Utc::now() - s.issued_at <= self.ttl => {
          return Some(s.clone());
        }
        Some(_) => {}
        None => return None,
      }
    }
    let mut sessions = self.sessions.write().expect("RwLock poisoned");
    sessions.remove(token);
    None
  }

  /// Drop a session outright. Returns whether a session was present.
  pub fn revoke(&self, token: &Uuid) -> bool {
    let mut sessions = self.sessions.write().expect("RwLock poisoned");
    sessions.remove(token).is_some()
  }
}
