use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::membership::MembershipRecord;
use crate::storage::KeyValueStorage;

/// The single storage key holding the current member.
pub const SESSION_KEY: &str = "blueHeartsUser";

const EVENT_CAPACITY: usize = 16;

/// Change notifications so every open window converges on the latest write.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "event", content = "data")]
pub enum SessionEvent {
    Written(MembershipRecord),
    Cleared,
}

/// Single-slot session repository over a [`KeyValueStorage`].
///
/// Writes replace the whole record; there is no merge. Cloning shares the
/// storage and the notification channel.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { storage, events }
    }

    pub fn write(&self, record: &MembershipRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        self.storage.set_item(SESSION_KEY, &json)?;
        tracing::debug!(region = record.region.slug(), tier = ?record.membership_type, "session written");
        // No subscribers is fine
        let _ = self.events.send(SessionEvent::Written(record.clone()));
        Ok(())
    }

    /// Strict read: malformed data and storage failures are errors.
    pub fn read(&self) -> Result<Option<MembershipRecord>> {
        match self.storage.get_item(SESSION_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Header-style read: any failure is logged and treated as "no session".
    pub fn read_lenient(&self) -> Option<MembershipRecord> {
        match self.read() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable session");
                None
            }
        }
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove_item(SESSION_KEY)?;
        tracing::debug!("session cleared");
        let _ = self.events.send(SessionEvent::Cleared);
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
