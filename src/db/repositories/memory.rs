use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use tokio::sync::RwLock;

use super::LayoutStore;
use crate::db::models::layouts::Layout;

#[derive(Default)]
struct Inner {
    // Front is newest.
    layouts: VecDeque<Layout>,
    next_id: i64,
}

impl Inner {
    fn push(&mut self, inner_html: String, history_depth: usize) -> Layout {
        self.next_id += 1;
        let layout = Layout {
            id: self.next_id,
            inner_html,
            created_at: Utc::now(),
        };
        self.layouts.push_front(layout.clone());
        self.layouts.truncate(history_depth);
        layout
    }
}

/// Process-local layout store, used for development and tests.
pub struct MemoryLayoutStore {
    inner: RwLock<Inner>,
    history_depth: usize,
}

impl MemoryLayoutStore {
    pub fn new(history_depth: usize) -> Self {
        MemoryLayoutStore {
            inner: RwLock::new(Inner::default()),
            history_depth,
        }
    }
}

#[async_trait]
impl LayoutStore for MemoryLayoutStore {
    async fn save(&self, inner_html: String) -> Result<Layout> {
        let mut inner = self.inner.write().await;
        Ok(inner.push(inner_html, self.history_depth))
    }

    async fn create_first(&self, inner_html: String) -> Result<Option<Layout>> {
        let mut inner = self.inner.write().await;
        if !inner.layouts.is_empty() {
            return Ok(None);
        }
        Ok(Some(inner.push(inner_html, self.history_depth)))
    }

    async fn nth_newest(&self, index: usize) -> Result<Option<Layout>> {
        Ok(self.inner.read().await.layouts.get(index).cloned())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().await.layouts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn newest_is_index_zero() {
        let store = MemoryLayoutStore::new(4);
        store.save("<p>a</p>".into()).await.unwrap();
        store.save("<p>b</p>".into()).await.unwrap();

        assert_eq!(store.nth_newest(0).await.unwrap().unwrap().inner_html, "<p>b</p>");
        assert_eq!(store.nth_newest(1).await.unwrap().unwrap().inner_html, "<p>a</p>");
        assert!(store.nth_newest(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn history_is_capped() {
        let store = MemoryLayoutStore::new(4);
        for i in 0..6 {
            store.save(format!("v{}", i)).await.unwrap();
        }
        assert_eq!(store.count().await.unwrap(), 4);
        assert_eq!(store.nth_newest(0).await.unwrap().unwrap().inner_html, "v5");
        assert_eq!(store.nth_newest(3).await.unwrap().unwrap().inner_html, "v2");
    }

    #[tokio::test]
    async fn ids_keep_increasing_after_pruning() {
        let store = MemoryLayoutStore::new(1);
        let first = store.save("a".into()).await.unwrap();
        let second = store.save("b".into()).await.unwrap();
        assert!(second.id > first.id);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn create_first_only_when_empty() {
        let store = MemoryLayoutStore::new(4);
        let created = store.create_first("a".into()).await.unwrap();
        assert!(created.is_some());
        assert!(store.create_first("b".into()).await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.nth_newest(0).await.unwrap().unwrap().inner_html, "a");
    }
}
