//! Volatile backend: one ordered `Vec` per record kind, lost on restart.

use super::RecordStore;
use crate::error::StoreError;
use crate::types::{MembershipEvent, MessageRecord};
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    messages: RwLock<Vec<MessageRecord>>,
    membership_events: RwLock<Vec<MembershipEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn append_message(&self, record: &MessageRecord) -> Result<(), StoreError> {
        self.messages
            .write()
            .map_err(|_| StoreError::Poisoned("messages"))?
            .push(record.clone());
        Ok(())
    }

    fn append_membership_event(&self, event: &MembershipEvent) -> Result<(), StoreError> {
        self.membership_events
            .write()
            .map_err(|_| StoreError::Poisoned("membership_events"))?
            .push(event.clone());
        Ok(())
    }

    fn list_messages(&self) -> Result<Vec<MessageRecord>, StoreError> {
        Ok(self
            .messages
            .read()
            .map_err(|_| StoreError::Poisoned("messages"))?
            .clone())
    }

    fn list_membership_events(&self) -> Result<Vec<MembershipEvent>, StoreError> {
        Ok(self
            .membership_events
            .read()
            .map_err(|_| StoreError::Poisoned("membership_events"))?
            .clone())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
