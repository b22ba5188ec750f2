use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::Mutex as AsyncMutex;

use remo_core::models::{GeneSet, Organism};

use crate::errors::PipelineError;
use crate::source::GeneSetSource;

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct Entry {
    gene_set: Arc<GeneSet>,
    last_access: Instant,
}

///
/// A TTL cache of parsed gene sets, keyed by source path.
///
/// Lookups that hit a fresh entry return immediately. A miss (absent or
/// expired) takes a per-path async lock and re-checks freshness after
/// acquiring it, so concurrent misses on the same path collapse into a
/// single underlying load. Expiry is lazy, checked on access; the TTL
/// slides on every hit.
///
/// Entries hold the raw parsed set: no organism attached, no transcript
/// dedup. Callers apply per-organism policy on top.
///
pub struct GeneSetCache {
    source: Arc<dyn GeneSetSource>,
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl GeneSetCache {
    pub fn new(source: Arc<dyn GeneSetSource>) -> Self {
        Self::with_ttl(source, DEFAULT_TTL)
    }

    pub fn with_ttl(source: Arc<dyn GeneSetSource>, ttl: Duration) -> Self {
        GeneSetCache {
            source,
            ttl,
            entries: Mutex::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, path: &str) -> Result<Arc<GeneSet>, PipelineError> {
        if let Some(gene_set) = self.fresh(path) {
            return Ok(gene_set);
        }

        let lock = self.lock_for(path);
        let _guard = lock.lock().await;

        // another task may have finished the load while we waited
        if let Some(gene_set) = self.fresh(path) {
            return Ok(gene_set);
        }

        let source = Arc::clone(&self.source);
        let owned_path = path.to_string();
        let text = tokio::task::spawn_blocking(move || source.load(&owned_path))
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))?
            .map_err(|e| PipelineError::CacheLoad {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let (genes, errors) = GeneSet::parse(&text);
        let gene_set = Arc::new(GeneSet::from_parts(genes, errors, None));
        log::info!("cached gene set for {path} ({} genes)", gene_set.len());

        self.entries.lock().unwrap().insert(
            path.to_string(),
            Entry {
                gene_set: Arc::clone(&gene_set),
                last_access: Instant::now(),
            },
        );
        self.gc_locks();

        Ok(gene_set)
    }

    /// A fresh entry, sliding its TTL forward on the hit.
    fn fresh(&self, path: &str) -> Option<Arc<GeneSet>> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.get_mut(path)?;
        if entry.last_access.elapsed() >= self.ttl {
            return None;
        }
        entry.last_access = Instant::now();
        Some(Arc::clone(&entry.gene_set))
    }

    fn lock_for(&self, path: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        Arc::clone(locks.entry(path.to_string()).or_default())
    }

    /// Drop locks for paths that are neither cached nor mid-load, so
    /// the lock table stays bounded by the entry table.
    fn gc_locks(&self) {
        let entries = self.entries.lock().unwrap();
        self.locks
            .lock()
            .unwrap()
            .retain(|path, lock| entries.contains_key(path) || Arc::strong_count(lock) > 1);
    }

    pub fn invalidate(&self, path: &str) {
        self.entries.lock().unwrap().remove(path);
        self.gc_locks();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

///
/// Fetch a gene set through the cache and apply per-organism policy on
/// top: transcript dedup when the organism asks for it, and the
/// organism's presentation metadata.
///
/// The cached entry itself stays raw, so organisms with different
/// transcript policies can share one cached parse.
///
pub async fn load_for_organism(
    cache: &GeneSetCache,
    path: &str,
    organism: Option<Organism>,
) -> Result<Arc<GeneSet>, PipelineError> {
    let raw = cache.get(path).await?;
    let dedup = organism
        .as_ref()
        .is_none_or(|o| o.take_first_transcript_only);

    let mut gene_set = if dedup {
        raw.dedup_first_transcript()
    } else {
        (*raw).clone()
    };
    gene_set.organism = organism;
    Ok(Arc::new(gene_set))
}
