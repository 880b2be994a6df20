//! In-memory session store
//!
//! Maps each user to the keypair they imported most recently. Entries live
//! for the process lifetime and are never written to disk. Users are spread
//! over a fixed set of shards so a write only locks the shard its user
//! hashes to.

use crate::types::UserId;
use crate::wallet::Keypair;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

const SHARD_COUNT: usize = 16;

type Shard = RwLock<HashMap<UserId, Arc<Keypair>>>;

/// Thread-safe store of imported keypairs
#[derive(Clone)]
pub struct SessionStore {
    shards: Arc<[Shard]>,
    hasher: RandomState,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_shards(SHARD_COUNT)
    }

    pub fn with_shards(count: usize) -> Self {
        let shards: Vec<Shard> = (0..count.max(1))
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        Self {
            shards: shards.into(),
            hasher: RandomState::new(),
        }
    }

    fn shard_index(&self, user: &UserId) -> usize {
        (self.hasher.hash_one(user) as usize) % self.shards.len()
    }

    fn shard(&self, user: &UserId) -> &Shard {
        &self.shards[self.shard_index(user)]
    }

    /// Store a keypair for a user, replacing any previous one.
    /// Returns the replaced keypair.
    pub async fn insert(&self, user: &UserId, keypair: Keypair) -> Option<Arc<Keypair>> {
        let address = keypair.address();
        let previous = self
            .shard(user)
            .write()
            .await
            .insert(user.clone(), Arc::new(keypair));
        info!(
            "[SessionStore] Stored wallet {} for user {}{}",
            address,
            user,
            if previous.is_some() { " (replaced)" } else { "" }
        );
        previous
    }

    pub async fn get(&self, user: &UserId) -> Option<Arc<Keypair>> {
        self.shard(user).read().await.get(user).cloned()
    }

    pub async fn remove(&self, user: &UserId) -> Option<Arc<Keypair>> {
        let removed = self.shard(user).write().await.remove(user);
        if removed.is_some() {
            info!("[SessionStore] Removed wallet for user {}", user);
        }
        removed
    }

    pub async fn contains(&self, user: &UserId) -> bool {
        self.shard(user).read().await.contains_key(user)
    }

    pub async fn len(&self) -> usize {
        let mut total = 0;
        for shard in self.shards.iter() {
            total += shard.read().await.len();
        }
        total
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every session (for shutdown)
    pub async fn clear(&self) {
        let mut count = 0;
        for shard in self.shards.iter() {
            let mut sessions = shard.write().await;
            count += sessions.len();
            sessions.clear();
        }
        if count > 0 {
            info!("[SessionStore] Cleared {} sessions", count);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{KeyDeriver, SecretParser};
    use std::time::Duration;

    fn keypair(seed: u8) -> Keypair {
        Keypair::from_signing_key(ed25519_dalek::SigningKey::from_bytes(&[seed; 32]))
    }

    #[tokio::test]
    async fn test_insert_overwrites() {
        let store = SessionStore::new();
        let user = UserId::from("alice");

        assert!(store.insert(&user, keypair(1)).await.is_none());
        let previous = store.insert(&user, keypair(2)).await.unwrap();

        assert_eq!(*previous, keypair(1));
        assert_eq!(*store.get(&user).await.unwrap(), keypair(2));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_users_are_independent() {
        let store = SessionStore::new();
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");

        store.insert(&alice, keypair(1)).await;
        assert!(store.get(&bob).await.is_none());
        assert!(!store.contains(&bob).await);

        store.insert(&bob, keypair(2)).await;
        assert_eq!(*store.get(&alice).await.unwrap(), keypair(1));
        assert_eq!(store.len().await, 2);

        assert!(store.remove(&alice).await.is_some());
        assert!(store.remove(&alice).await.is_none());
        assert_eq!(store.len().await, 1);

        store.clear().await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_held_shard_does_not_block_others() {
        let store = SessionStore::new();
        let locked = UserId::from("locked");

        // Find a user on a different shard
        let other = (0..1000)
            .map(|i| UserId::from(format!("user-{}", i).as_str()))
            .find(|u| store.shard_index(u) != store.shard_index(&locked))
            .unwrap();
        store.insert(&other, keypair(3)).await;

        let _guard = store.shard(&locked).write().await;

        let found = tokio::time::timeout(Duration::from_millis(100), store.get(&other))
            .await
            .expect("other shard must stay readable");
        assert!(found.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_imports() {
        let store = SessionStore::new();
        let mut handles = Vec::new();

        for i in 0..64u8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let user = UserId::from(i as i64);
                store.insert(&user, keypair(i)).await;
                store.get(&user).await
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            let stored = handle.await.unwrap().unwrap();
            assert_eq!(*stored, keypair(i as u8));
        }
        assert_eq!(store.len().await, 64);
    }

    #[tokio::test]
    async fn test_stores_parsed_wallet() {
        let store = SessionStore::new();
        let user = UserId::from(42_i64);
        let secret = SecretParser::parse(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
        )
        .unwrap();

        store.insert(&user, KeyDeriver::derive(&secret).unwrap()).await;

        assert_eq!(
            store.get(&user).await.unwrap().address(),
            "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk"
        );
    }
}
