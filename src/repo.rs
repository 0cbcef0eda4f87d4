//! repo.rs — Row-store contract plus the in-memory implementation used by
//! the service and its tests.
//!
//! All access goes through one mutex, so a batch write is atomic and API
//! reads stay safe while a scheduled run is writing.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::RepositoryError;
use crate::model::{Candidate, PostRecord, PostStatus, ScheduleConfig, StatsSnapshot};

pub trait Repository: Send + Sync {
    /// Persists one ranked batch, all-or-nothing, and records the scrape
    /// timestamp. An empty batch is rejected by the pipeline before it gets
    /// here, so implementations may treat it as a storage error.
    fn save_candidates(&self, batch: &[Candidate]) -> Result<(), RepositoryError>;

    /// Most recent candidates first, at most `limit`.
    fn load_candidates(&self, limit: usize) -> Result<Vec<Candidate>, RepositoryError>;

    /// Stores a draft post and returns its assigned id.
    fn save_post(&self, draft: PostRecord) -> Result<u64, RepositoryError>;

    fn load_posts(&self, status: Option<PostStatus>) -> Result<Vec<PostRecord>, RepositoryError>;

    /// Moves a post forward in its lifecycle. Only Pending→Posted and
    /// Pending→Failed are legal; `posted_at` is stamped on →Posted.
    fn update_post_status(
        &self,
        id: u64,
        status: PostStatus,
    ) -> Result<PostRecord, RepositoryError>;

    fn get_schedule(&self) -> Result<ScheduleConfig, RepositoryError>;

    fn set_schedule(&self, cfg: ScheduleConfig) -> Result<(), RepositoryError>;

    fn stats(&self) -> Result<StatsSnapshot, RepositoryError>;
}

#[derive(Debug)]
struct Store {
    /// Newest scrape batches at the back; flattened newest-first on read.
    batches: Vec<(DateTime<Utc>, Vec<Candidate>)>,
    posts: Vec<PostRecord>,
    schedule: ScheduleConfig,
    last_scrape_at: Option<DateTime<Utc>>,
    next_post_id: u64,
}

/// In-memory row store behind a single mutex.
#[derive(Debug)]
pub struct MemoryRepository {
    inner: Mutex<Store>,
    /// Oldest batches are dropped past this many retained scrapes.
    batch_cap: usize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Store {
                batches: Vec::new(),
                posts: Vec::new(),
                schedule: ScheduleConfig::default(),
                last_scrape_at: None,
                next_post_id: 1,
            }),
            batch_cap: 100,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Storage("repository mutex poisoned".into()))
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MemoryRepository {
    fn save_candidates(&self, batch: &[Candidate]) -> Result<(), RepositoryError> {
        if batch.is_empty() {
            return Err(RepositoryError::Storage("refusing empty batch".into()));
        }
        // Validate the whole batch before touching the store, so a bad row
        // can never leave a partial write behind.
        for c in batch {
            if c.title.trim().is_empty() {
                return Err(RepositoryError::Storage("candidate with empty title".into()));
            }
            if !c.url.starts_with("http") {
                return Err(RepositoryError::Storage(format!(
                    "candidate url not absolute: {}",
                    c.url
                )));
            }
        }

        let now = Utc::now();
        let mut store = self.lock()?;
        store.batches.push((now, batch.to_vec()));
        if store.batches.len() > self.batch_cap {
            let excess = store.batches.len() - self.batch_cap;
            store.batches.drain(0..excess);
        }
        store.last_scrape_at = Some(now);
        Ok(())
    }

    fn load_candidates(&self, limit: usize) -> Result<Vec<Candidate>, RepositoryError> {
        let store = self.lock()?;
        let mut out = Vec::with_capacity(limit);
        for (_, batch) in store.batches.iter().rev() {
            for c in batch {
                if out.len() == limit {
                    return Ok(out);
                }
                out.push(c.clone());
            }
        }
        Ok(out)
    }

    fn save_post(&self, mut draft: PostRecord) -> Result<u64, RepositoryError> {
        let mut store = self.lock()?;
        let id = store.next_post_id;
        store.next_post_id += 1;
        draft.id = id;
        store.posts.push(draft);
        Ok(id)
    }

    fn load_posts(&self, status: Option<PostStatus>) -> Result<Vec<PostRecord>, RepositoryError> {
        let store = self.lock()?;
        Ok(store
            .posts
            .iter()
            .filter(|p| status.is_none_or(|s| p.status == s))
            .cloned()
            .collect())
    }

    fn update_post_status(
        &self,
        id: u64,
        status: PostStatus,
    ) -> Result<PostRecord, RepositoryError> {
        let mut store = self.lock()?;
        let post = store
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::PostNotFound(id))?;

        if post.status != PostStatus::Pending || status == PostStatus::Pending {
            return Err(RepositoryError::InvalidTransition {
                from: post.status.as_str(),
                to: status.as_str(),
            });
        }

        post.status = status;
        if status == PostStatus::Posted {
            post.posted_at = Some(Utc::now());
        }
        Ok(post.clone())
    }

    fn get_schedule(&self) -> Result<ScheduleConfig, RepositoryError> {
        Ok(self.lock()?.schedule.clone())
    }

    fn set_schedule(&self, cfg: ScheduleConfig) -> Result<(), RepositoryError> {
        self.lock()?.schedule = cfg;
        Ok(())
    }

    fn stats(&self) -> Result<StatsSnapshot, RepositoryError> {
        let store = self.lock()?;
        let count = |s: PostStatus| store.posts.iter().filter(|p| p.status == s).count();
        Ok(StatsSnapshot {
            candidates: store.batches.iter().map(|(_, b)| b.len()).sum(),
            posts_pending: count(PostStatus::Pending),
            posts_posted: count(PostStatus::Posted),
            posts_failed: count(PostStatus::Failed),
            last_scrape_at: store.last_scrape_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_come_back_newest_first() {
        let repo = MemoryRepository::new();
        repo.save_candidates(&[Candidate::new("old", "https://e.com/1", "T", 0)])
            .unwrap();
        repo.save_candidates(&[Candidate::new("new", "https://e.com/2", "T", 0)])
            .unwrap();

        let got = repo.load_candidates(10).unwrap();
        assert_eq!(got[0].title, "new");
        assert_eq!(got[1].title, "old");
    }

    #[test]
    fn bad_row_rejects_whole_batch() {
        let repo = MemoryRepository::new();
        let batch = vec![
            Candidate::new("ok", "https://e.com/1", "T", 0),
            Candidate::new("bad", "item?id=42", "T", 0),
        ];
        assert!(repo.save_candidates(&batch).is_err());
        assert!(repo.load_candidates(10).unwrap().is_empty());
        assert!(repo.stats().unwrap().last_scrape_at.is_none());
    }

    #[test]
    fn posted_stamps_posted_at_failed_does_not() {
        let repo = MemoryRepository::new();
        let a = repo.save_post(PostRecord::pending("linkedin", "x")).unwrap();
        let b = repo.save_post(PostRecord::pending("instagram", "y")).unwrap();

        let posted = repo.update_post_status(a, PostStatus::Posted).unwrap();
        assert!(posted.posted_at.is_some());

        let failed = repo.update_post_status(b, PostStatus::Failed).unwrap();
        assert!(failed.posted_at.is_none());
    }

    #[test]
    fn transitions_never_move_backward() {
        let repo = MemoryRepository::new();
        let id = repo.save_post(PostRecord::pending("linkedin", "x")).unwrap();
        repo.update_post_status(id, PostStatus::Posted).unwrap();

        let err = repo.update_post_status(id, PostStatus::Pending).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidTransition { .. }));
        let err = repo.update_post_status(id, PostStatus::Failed).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidTransition { .. }));
    }

    #[test]
    fn unknown_post_id_is_not_found() {
        let repo = MemoryRepository::new();
        assert!(matches!(
            repo.update_post_status(99, PostStatus::Posted),
            Err(RepositoryError::PostNotFound(99))
        ));
    }
}
