//! Per-(channel, author) authorization and mode flags.
//!
//! Nothing here is persisted; a restart forgets every grant.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::config::SessionPolicy;

// ---------------------------------------------------------------------------
// ScopeKey
// ---------------------------------------------------------------------------

/// The unit session flags apply to: one author in one channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeKey {
    pub channel_id: String,
    pub author_id: String,
}

impl ScopeKey {
    pub fn new(channel_id: impl Into<String>, author_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            author_id: author_id.into(),
        }
    }
}

impl std::fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.channel_id, self.author_id)
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    admin_granted_at: Option<DateTime<Utc>>,
    roast_mode: bool,
}

impl SessionState {
    pub fn grant_admin(&mut self, now: DateTime<Utc>) {
        self.admin_granted_at = Some(now);
    }

    pub fn revoke_admin(&mut self) {
        self.admin_granted_at = None;
    }

    /// Whether admin rights hold at `now`. An expired grant is cleared.
    pub fn admin_active(&mut self, now: DateTime<Utc>, ttl: Option<Duration>) -> bool {
        let Some(granted) = self.admin_granted_at else {
            return false;
        };
        if grant_expired(granted, now, ttl) {
            self.admin_granted_at = None;
            return false;
        }
        true
    }

    pub fn roast_mode(&self) -> bool {
        self.roast_mode
    }

    pub fn set_roast_mode(&mut self, on: bool) {
        self.roast_mode = on;
    }
}

fn grant_expired(granted: DateTime<Utc>, now: DateTime<Utc>, ttl: Option<Duration>) -> bool {
    let Some(ttl) = ttl else {
        return false;
    };
    match chrono::Duration::from_std(ttl) {
        Ok(ttl) => now.signed_duration_since(granted) >= ttl,
        // Longer than chrono can represent: effectively never.
        Err(_) => false,
    }
}

// ---------------------------------------------------------------------------
// SessionRegistry
// ---------------------------------------------------------------------------

/// Owns every scope's state behind its own async lock.
///
/// Holding a scope's lock for the whole handling of a message serializes
/// messages from that scope while other scopes proceed independently.
pub struct SessionRegistry {
    policy: SessionPolicy,
    scopes: StdMutex<HashMap<ScopeKey, Arc<Mutex<SessionState>>>>,
}

impl SessionRegistry {
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            policy,
            scopes: StdMutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// The state cell for `key`, created on first use.
    pub fn scope(&self, key: &ScopeKey) -> Arc<Mutex<SessionState>> {
        let mut scopes = self.scopes.lock().unwrap_or_else(|e| e.into_inner());
        scopes.entry(key.clone()).or_default().clone()
    }

    /// Hand back a cell taken with [`scope`](Self::scope). The entry is
    /// dropped when it holds nothing but defaults (an expired grant counts
    /// as none) and no other caller still has the cell.
    pub fn release(&self, key: &ScopeKey, cell: Arc<Mutex<SessionState>>, now: DateTime<Utc>) {
        let mut scopes = self.scopes.lock().unwrap_or_else(|e| e.into_inner());
        if !scopes.get(key).is_some_and(|c| Arc::ptr_eq(c, &cell)) {
            return;
        }
        // One reference in the map, one in `cell`.
        if Arc::strong_count(&cell) > 2 {
            return;
        }
        let Ok(mut state) = cell.try_lock() else {
            return;
        };
        state.admin_active(now, self.policy.admin_ttl);
        let idle = *state == SessionState::default();
        drop(state);
        if idle {
            scopes.remove(key);
        }
    }

    pub fn len(&self) -> usize {
        self.scopes.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scopes currently holding unexpired admin rights.
    pub async fn authorized_identities(&self, now: DateTime<Utc>) -> BTreeSet<ScopeKey> {
        let cells: Vec<(ScopeKey, Arc<Mutex<SessionState>>)> = {
            let scopes = self.scopes.lock().unwrap_or_else(|e| e.into_inner());
            scopes.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        };

        let mut out = BTreeSet::new();
        for (key, cell) in cells {
            if cell.lock().await.admin_active(now, self.policy.admin_ttl) {
                out.insert(key);
            }
        }
        out
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SessionPolicy::default())
    }
}
