use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("session store read failed: {0}")]
    Read(String),
    #[error("session store write failed: {0}")]
    Write(String),
    #[error("session document corrupt: {0}")]
    Corrupt(String),
}

/// Durable player progress: best score plus every variant answered correctly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    #[serde(rename = "highScore", default)]
    pub high_score: i64,
    #[serde(rename = "correctCards", default)]
    pub unlocked_variant_ids: BTreeSet<String>,
}

impl SessionRecord {
    pub fn is_unlocked(&self, variant_id: &str) -> bool {
        self.unlocked_variant_ids.contains(variant_id)
    }
}

/// Backend that holds the single session document.
pub trait SessionStore {
    /// `Ok(None)` means no document exists yet.
    fn load(&mut self) -> Result<Option<SessionRecord>, PersistenceError>;
    fn save(&mut self, record: &SessionRecord) -> Result<(), PersistenceError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub document: Option<SessionRecord>,
    pub writes: usize,
    pub fail_reads: bool,
}

impl MemoryStore {
    pub fn with_record(record: SessionRecord) -> Self {
        Self {
            document: Some(record),
            ..Self::default()
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&mut self) -> Result<Option<SessionRecord>, PersistenceError> {
        if self.fail_reads {
            return Err(PersistenceError::Corrupt("unreadable test document".into()));
        }
        Ok(self.document.clone())
    }

    fn save(&mut self, record: &SessionRecord) -> Result<(), PersistenceError> {
        self.document = Some(record.clone());
        self.writes += 1;
        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn load(&mut self) -> Result<Option<SessionRecord>, PersistenceError> {
        (**self).load()
    }

    fn save(&mut self, record: &SessionRecord) -> Result<(), PersistenceError> {
        (**self).save(record)
    }
}

/// In-memory session record backed by a store. The record is read once and
/// rewritten in full after every mutation.
#[derive(Debug)]
pub struct Session<S> {
    store: S,
    record: SessionRecord,
}

impl<S: SessionStore> Session<S> {
    pub fn open(mut store: S) -> Self {
        let record = match store.load() {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::info!("no session document, writing defaults");
                let record = SessionRecord::default();
                write_record(&mut store, &record);
                record
            }
            Err(err) => {
                tracing::warn!(error = %err, "session document unusable, resetting to defaults");
                let record = SessionRecord::default();
                write_record(&mut store, &record);
                record
            }
        };
        Self { store, record }
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn high_score(&self) -> i64 {
        self.record.high_score
    }

    pub fn is_unlocked(&self, variant_id: &str) -> bool {
        self.record.is_unlocked(variant_id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds a correctly answered variant. Returns true when it was new.
    pub fn mark_correct(&mut self, variant_id: &str) -> bool {
        let added = self
            .record
            .unlocked_variant_ids
            .insert(variant_id.to_string());
        if added {
            write_record(&mut self.store, &self.record);
        }
        added
    }

    /// Records a finished session's score. Returns true when it beat the
    /// stored high score.
    pub fn submit_final_score(&mut self, score: i64) -> bool {
        if score <= self.record.high_score {
            return false;
        }
        tracing::info!(previous = self.record.high_score, score, "new high score");
        self.record.high_score = score;
        write_record(&mut self.store, &self.record);
        true
    }
}

fn write_record<S: SessionStore>(store: &mut S, record: &SessionRecord) {
    if let Err(err) = store.save(record) {
        tracing::error!(error = %err, "failed to persist session record");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_document_writes_defaults() {
        let session = Session::open(MemoryStore::default());
        assert_eq!(session.record(), &SessionRecord::default());
        assert_eq!(session.store().writes, 1);
        assert_eq!(session.store().document, Some(SessionRecord::default()));
    }

    #[test]
    fn corrupt_document_is_replaced() {
        let store = MemoryStore {
            fail_reads: true,
            ..MemoryStore::default()
        };
        let session = Session::open(store);
        assert_eq!(session.high_score(), 0);
        assert_eq!(session.store().writes, 1);
    }

    #[test]
    fn marking_twice_is_idempotent() {
        let mut session = Session::open(MemoryStore::default());
        assert!(session.mark_correct("a1"));
        assert!(!session.mark_correct("a1"));
        assert_eq!(session.record().unlocked_variant_ids.len(), 1);
        assert_eq!(session.store().writes, 2);
        assert!(session.is_unlocked("a1"));
    }

    #[test]
    fn high_score_is_monotonic() {
        let record = SessionRecord {
            high_score: 5000,
            ..SessionRecord::default()
        };
        let mut session = Session::open(MemoryStore::with_record(record));
        assert!(!session.submit_final_score(4000));
        assert!(!session.submit_final_score(5000));
        assert_eq!(session.high_score(), 5000);
        assert!(session.submit_final_score(6500));
        assert_eq!(session.high_score(), 6500);
        assert_eq!(
            session.store().document.as_ref().map(|r| r.high_score),
            Some(6500)
        );
    }

    #[test]
    fn document_uses_wire_names() {
        let mut record = SessionRecord::default();
        record.high_score = 1500;
        record.unlocked_variant_ids.insert("b".into());
        record.unlocked_variant_ids.insert("a".into());
        let body = serde_json::to_string(&record).expect("json");
        assert_eq!(body, r#"{"highScore":1500,"correctCards":["a","b"]}"#);
        let back: SessionRecord =
            serde_json::from_str(r#"{"highScore":3,"correctCards":["x","x"]}"#).expect("parse");
        assert_eq!(back.unlocked_variant_ids.len(), 1);
    }
}
