use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{HotTermsError, Result};
use crate::models::{BackendKind, TermRecord, TermStats};
use crate::ranking::sort_ranked;

use super::TermBackend;

/// Volatile backend. The map lock is held across each read-modify-write, so
/// increments cannot be lost.
#[derive(Debug, Default)]
pub struct MemoryTermBackend {
    entries: Mutex<HashMap<String, TermRecord>>,
}

impl MemoryTermBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, TermRecord>>> {
        self.entries
            .lock()
            .map_err(|_| HotTermsError::mutex_poisoned("memory backend"))
    }

    fn ranked(entries: &HashMap<String, TermRecord>) -> Vec<TermRecord> {
        let mut records = entries.values().cloned().collect::<Vec<_>>();
        sort_ranked(&mut records);
        records
    }
}

impl TermBackend for MemoryTermBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn upsert_increment(&self, term: &str, now_ms: i64) -> Result<TermRecord> {
        let mut entries = self.entries()?;
        let record = entries
            .entry(term.to_string())
            .and_modify(|existing| {
                existing.score = existing.score.saturating_add(1);
                existing.last_searched = now_ms;
            })
            .or_insert_with(|| TermRecord::first_seen(term, now_ms));
        Ok(record.clone())
    }

    fn get(&self, term: &str) -> Result<Option<TermRecord>> {
        Ok(self.entries()?.get(term).cloned())
    }

    fn list_ranked(&self, limit: usize) -> Result<Vec<TermRecord>> {
        let entries = self.entries()?;
        let mut records = Self::ranked(&entries);
        records.truncate(limit);
        Ok(records)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.entries()?.len())
    }

    fn snapshot(&self, limit: usize) -> Result<TermStats> {
        let entries = self.entries()?;
        let mut top_terms = Self::ranked(&entries);
        top_terms.truncate(limit);
        Ok(TermStats {
            total: entries.len(),
            top_terms,
        })
    }

    fn delete(&self, term: &str) -> Result<bool> {
        Ok(self.entries()?.remove(term).is_some())
    }

    fn clear(&self) -> Result<usize> {
        let mut entries = self.entries()?;
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }

    fn retain_top(&self, keep: usize) -> Result<usize> {
        let mut entries = self.entries()?;
        if entries.len() <= keep {
            return Ok(0);
        }
        let ranked = Self::ranked(&entries);
        let mut evicted = 0;
        for record in &ranked[keep..] {
            if entries.remove(&record.term).is_some() {
                evicted += 1;
            }
        }
        Ok(evicted)
    }
}
