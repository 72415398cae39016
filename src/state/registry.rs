//! Room registry.
//!
//! Maps room ids to the handle of the actor owning that room. The map is a
//! `DashMap`, so lookups and inserts for different rooms never contend on a
//! global lock; everything that mutates a room goes through its actor.

use super::actor::RoomEvent;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

/// Cloneable address of a room actor.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    /// Distinguishes successive actors for the same room id.
    pub instance: Uuid,
    tx: mpsc::Sender<RoomEvent>,
}

impl RoomHandle {
    pub fn new(instance: Uuid, tx: mpsc::Sender<RoomEvent>) -> Self {
        Self { instance, tx }
    }

    /// True once the actor has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Send a request and wait for the actor's reply.
    ///
    /// Returns `None` if the actor is gone before it replies.
    pub async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> RoomEvent) -> Option<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send(build(reply_tx)).await.ok()?;
        reply_rx.await.ok()
    }
}

/// Registry of live rooms.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, RoomHandle>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live room for `room_id`, creating it with `spawn` if the
    /// room does not exist or its actor has died.
    pub fn get_or_create(&self, room_id: &str, spawn: impl FnOnce() -> RoomHandle) -> RoomHandle {
        match self.rooms.entry(room_id.to_string()) {
            Entry::Occupied(entry) if !entry.get().is_closed() => entry.get().clone(),
            Entry::Occupied(mut entry) => {
                tracing::warn!(room = %room_id, "Replacing dead room actor");
                let handle = spawn();
                entry.insert(handle.clone());
                handle
            }
            Entry::Vacant(entry) => {
                let handle = spawn();
                entry.insert(handle.clone());
                crate::metrics::room_opened();
                tracing::debug!(room = %room_id, "Room created");
                handle
            }
        }
    }

    pub fn get(&self, room_id: &str) -> Option<RoomHandle> {
        self.rooms.get(room_id).map(|h| h.clone())
    }

    /// Remove `room_id`, but only if it still belongs to actor `instance`.
    pub fn remove_if_instance(&self, room_id: &str, instance: Uuid) -> bool {
        let removed = self
            .rooms
            .remove_if(room_id, |_, handle| handle.instance == instance)
            .is_some();
        if removed {
            crate::metrics::room_closed();
            tracing::debug!(room = %room_id, "Room removed");
        }
        removed
    }

    #[cfg(test)]
    pub fn contains(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> (RoomHandle, mpsc::Receiver<RoomEvent>) {
        let (tx, rx) = mpsc::channel(4);
        (RoomHandle::new(Uuid::new_v4(), tx), rx)
    }

    #[test]
    fn get_or_create_reuses_live_room() {
        let registry = RoomRegistry::new();
        let (first, _rx) = handle();
        let instance = first.instance;

        let created = registry.get_or_create("r1", || first);
        let again = registry.get_or_create("r1", || panic!("must not spawn twice"));

        assert_eq!(created.instance, instance);
        assert_eq!(again.instance, instance);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn dead_actor_is_replaced() {
        let registry = RoomRegistry::new();
        let (dead, rx) = handle();
        let dead_instance = dead.instance;
        registry.get_or_create("r1", || dead);
        drop(rx);

        let (fresh, _rx) = handle();
        let fresh_instance = fresh.instance;
        let got = registry.get_or_create("r1", || fresh);

        assert_ne!(got.instance, dead_instance);
        assert_eq!(got.instance, fresh_instance);
    }

    #[test]
    fn remove_only_matches_own_instance() {
        let registry = RoomRegistry::new();
        let (room, _rx) = handle();
        let instance = room.instance;
        registry.get_or_create("r1", || room);

        assert!(!registry.remove_if_instance("r1", Uuid::new_v4()));
        assert!(registry.contains("r1"));
        assert!(registry.remove_if_instance("r1", instance));
        assert!(registry.get("r1").is_none());
        assert!(registry.is_empty());
    }
}
