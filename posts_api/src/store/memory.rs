use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::models::{Post, PostId};
use crate::token::TokenHash;

use super::{PostStore, StoreError};

/// In-process `PostStore` used by the handler tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: Mutex<HashMap<PostId, String>>,
    fetches: AtomicUsize,
    deletes: Mutex<Vec<PostId>>,
    fail_fetch: AtomicBool,
    fail_delete: Mutex<Option<String>>,
    remove_after_fetch: AtomicBool,
}

impl MemoryStore {
    pub fn with_post(id: PostId, delete_token_hash: &str) -> Self {
        let store = Self::default();
        store.insert(id, delete_token_hash);
        store
    }

    pub fn insert(&self, id: PostId, delete_token_hash: &str) {
        self.posts
            .lock()
            .unwrap()
            .insert(id, delete_token_hash.to_string());
    }

    pub fn contains(&self, id: PostId) -> bool {
        self.posts.lock().unwrap().contains_key(&id)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> Vec<PostId> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn fail_fetches(&self) {
        self.fail_fetch.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, message: &str) {
        *self.fail_delete.lock().unwrap() = Some(message.to_string());
    }

    /// Simulates a concurrent request deleting the post right after it
    /// has been read.
    pub fn remove_after_fetch(&self) {
        self.remove_after_fetch.store(true, Ordering::SeqCst);
    }
}

impl PostStore for MemoryStore {
    async fn fetch_by_id(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(StoreError::Response {
                status: 503,
                message: "connection refused".to_string(),
            });
        }

        let mut posts = self.posts.lock().unwrap();
        let post = posts.get(&id).map(|hash| Post {
            id,
            delete_token_hash: hash.clone(),
        });

        if self.remove_after_fetch.load(Ordering::SeqCst) {
            posts.remove(&id);
        }

        Ok(post)
    }

    async fn delete_by_id(
        &self,
        id: PostId,
        expected_hash: &TokenHash,
    ) -> Result<bool, StoreError> {
        self.deletes.lock().unwrap().push(id);

        if let Some(message) = self.fail_delete.lock().unwrap().clone() {
            return Err(StoreError::Response {
                status: 500,
                message,
            });
        }

        let mut posts = self.posts.lock().unwrap();
        match posts.get(&id) {
            Some(hash) if expected_hash.matches(hash) => {
                posts.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
