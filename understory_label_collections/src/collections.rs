// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named label collections with atomic reload.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use understory_label_index::{BuildOptions, IndexBuilder, Label, LabelIndex, QueryWindow};

use crate::config::EndpointConfig;
use crate::error::CollectionsError;
use crate::source::LabelSource;

struct Slot {
    config: EndpointConfig,
    index: RwLock<Option<Arc<LabelIndex>>>,
    /// Held for a whole load-build-swap so reloads of one collection apply in order.
    reloading: Mutex<()>,
}

impl Slot {
    fn snapshot(&self) -> Option<Arc<LabelIndex>> {
        self.index
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn replace(&self, index: LabelIndex) {
        let mut slot = self.index.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(Arc::new(index));
    }
}

/// A set of label indexes served side by side under names.
///
/// Each configured collection is loaded through a [`LabelSource`] and built once. A
/// [`reload`](Self::reload) builds the replacement off to the side and swaps it in only
/// when the build succeeds, so a broken file never takes a working collection down.
/// Queries run against an `Arc` snapshot and never wait on a build.
pub struct Collections<S> {
    source: S,
    builder: IndexBuilder,
    slots: BTreeMap<String, Slot>,
}

impl<S: LabelSource> Collections<S> {
    /// Load every configured collection with default build options.
    pub fn new(configs: impl IntoIterator<Item = EndpointConfig>, source: S) -> Self {
        Self::with_options(configs, source, BuildOptions::default())
    }

    /// Load every configured collection.
    ///
    /// Collections that fail to load are kept in the configuration but are not
    /// [available](Self::names) until a later reload succeeds.
    pub fn with_options(
        configs: impl IntoIterator<Item = EndpointConfig>,
        source: S,
        options: BuildOptions,
    ) -> Self {
        let mut this = Self {
            source,
            builder: IndexBuilder::new().with_options(options),
            slots: BTreeMap::new(),
        };
        for config in configs {
            let name = config.name.clone();
            let index = match this.load(&config) {
                Ok(index) => Some(Arc::new(index)),
                Err(err) => {
                    tracing::warn!(collection = %name, error = ?err, "collection not available");
                    None
                }
            };
            let slot = Slot {
                config,
                index: RwLock::new(index),
                reloading: Mutex::new(()),
            };
            if this.slots.insert(name.clone(), slot).is_some() {
                tracing::warn!(collection = %name, "duplicate collection name, keeping the last");
            }
        }
        this
    }

    /// The label source collections are loaded from.
    pub fn source(&self) -> &S {
        &self.source
    }

    fn load(&self, config: &EndpointConfig) -> Result<LabelIndex, CollectionsError> {
        let records = self
            .source
            .load(&config.path)
            .map_err(|source| CollectionsError::Load {
                name: config.name.clone(),
                source,
            })?;
        let index = self
            .builder
            .build(records)
            .map_err(|source| CollectionsError::Build {
                name: config.name.clone(),
                source,
            })?;
        tracing::info!(
            collection = %config.name,
            path = %config.path.display(),
            labels = index.len(),
            "collection ready"
        );
        Ok(index)
    }

    fn slot(&self, name: &str) -> Result<&Slot, CollectionsError> {
        self.slots
            .get(name)
            .ok_or_else(|| CollectionsError::UnknownCollection(name.to_owned()))
    }

    /// Names of collections that currently have a valid index, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.snapshot().is_some())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Every configured collection, available or not, sorted by name.
    pub fn configs(&self) -> impl Iterator<Item = &EndpointConfig> + '_ {
        self.slots.values().map(|slot| &slot.config)
    }

    /// Whether `name` is configured and has a valid index.
    pub fn is_good(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Snapshot of the current index for `name`.
    ///
    /// The snapshot stays valid and unchanged even if the collection is reloaded meanwhile.
    pub fn get(&self, name: &str) -> Result<Arc<LabelIndex>, CollectionsError> {
        self.slot(name)?
            .snapshot()
            .ok_or_else(|| CollectionsError::Unavailable(name.to_owned()))
    }

    /// Query collection `name` and return owned copies of the matches.
    pub fn query(&self, name: &str, window: &QueryWindow) -> Result<Vec<Label>, CollectionsError> {
        let index = self.get(name)?;
        let labels = index.query(window).to_owned_labels();
        tracing::debug!(collection = %name, matches = labels.len(), "query");
        Ok(labels)
    }

    /// Rebuild collection `name` from its source.
    ///
    /// On failure the previous index, if any, stays in service and the error is returned.
    /// Concurrent reloads of the same collection run one after another; queries never wait.
    pub fn reload(&self, name: &str) -> Result<(), CollectionsError> {
        let slot = self.slot(name)?;
        let _reloading = slot.reloading.lock().unwrap_or_else(|e| e.into_inner());
        match self.load(&slot.config) {
            Ok(index) => {
                slot.replace(index);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    collection = %name,
                    error = ?err,
                    "reload failed, keeping the previous index"
                );
                Err(err)
            }
        }
    }

    /// Reload every collection configured with `path`, as after that file changed.
    ///
    /// Returns the outcome per affected collection; unaffected collections are untouched.
    pub fn reload_path(&self, path: &Path) -> Vec<(String, Result<(), CollectionsError>)> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.config.serves_path(path))
            .map(|(name, _)| (name.clone(), self.reload(name)))
            .collect()
    }
}

impl<S> fmt::Debug for Collections<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let available = self
            .slots
            .values()
            .filter(|slot| slot.snapshot().is_some())
            .count();
        f.debug_struct("Collections")
            .field("configured", &self.slots.len())
            .field("available", &available)
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::source::MemorySource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use understory_label_index::LabelInput;

    fn abc() -> Vec<LabelInput> {
        vec![
            LabelInput::new(0.0, 0.0, 5.0, 1, "A"),
            LabelInput::new(10.0, 10.0, 1.0, 2, "B"),
            LabelInput::new(5.0, 5.0, 3.0, 3, "C"),
        ]
    }

    fn grid(n: usize, t: f64) -> Vec<LabelInput> {
        (0..n * n)
            .map(|i| {
                LabelInput::new((i % n) as f64, (i / n) as f64, t, i as i64, format!("g{i}"))
            })
            .collect()
    }

    fn sorted_texts(labels: &[Label]) -> Vec<&str> {
        let mut v: Vec<&str> = labels.iter().map(Label::text).collect();
        v.sort_unstable();
        v
    }

    fn setup() -> Collections<MemorySource> {
        let source = MemorySource::new();
        source.insert("abc.labels", abc());
        source.insert("grid.labels", grid(20, 1.0));
        Collections::new(
            [
                EndpointConfig::new("abc", "abc.labels"),
                EndpointConfig::new("grid", "grid.labels"),
                EndpointConfig::new("missing", "missing.labels"),
            ],
            source,
        )
    }

    #[test]
    fn only_good_collections_are_listed() {
        let c = setup();
        assert_eq!(c.names(), ["abc", "grid"]);
        assert_eq!(c.configs().count(), 3);
        assert!(c.is_good("abc"));
        assert!(!c.is_good("missing"));
        assert!(!c.is_good("nope"));
    }

    #[test]
    fn query_by_name_returns_owned_labels() {
        let c = setup();
        let labels = c
            .query("abc", &QueryWindow::new(2.0, 0.0, 10.0, 0.0, 10.0))
            .unwrap();
        assert_eq!(sorted_texts(&labels), ["A", "C"]);
        assert!(matches!(
            c.query("missing", &QueryWindow::new(0.0, 0.0, 1.0, 0.0, 1.0)),
            Err(CollectionsError::Unavailable(_))
        ));
        assert!(matches!(
            c.query("nope", &QueryWindow::new(0.0, 0.0, 1.0, 0.0, 1.0)),
            Err(CollectionsError::UnknownCollection(_))
        ));
    }

    #[test]
    fn failed_reload_keeps_previous_index() {
        let c = setup();
        c.source.insert("abc.labels", Vec::new());
        let err = c.reload("abc").unwrap_err();
        assert!(matches!(err, CollectionsError::Build { .. }));
        let labels = c
            .query("abc", &QueryWindow::new(0.0, 0.0, 10.0, 0.0, 10.0))
            .unwrap();
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn reload_path_swaps_matching_collections() {
        let c = setup();
        let before = c.get("grid").unwrap();
        c.source.insert("grid.labels", grid(5, 9.0));
        let outcomes = c.reload_path(Path::new("./grid.labels"));
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].0, "grid");
        assert!(outcomes[0].1.is_ok());

        // The old snapshot is untouched; new queries see the new data.
        assert_eq!(before.len(), 400);
        assert_eq!(c.get("grid").unwrap().len(), 25);
        let window = QueryWindow::new(5.0, 0.0, 100.0, 0.0, 100.0);
        assert_eq!(c.query("grid", &window).unwrap().len(), 25);
    }

    #[test]
    fn reload_makes_missing_collection_available() {
        let c = setup();
        c.source.insert("missing.labels", abc());
        c.reload("missing").unwrap();
        assert_eq!(c.names(), ["abc", "grid", "missing"]);
    }

    #[test]
    fn concurrent_queries_during_reload() {
        let c = setup();
        let window = QueryWindow::new(0.0, 2.5, 12.5, 2.5, 12.5);
        let expected = c.query("grid", &window).unwrap().len();
        assert_eq!(expected, 100);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..50 {
                        let got = c.query("grid", &window).unwrap();
                        assert_eq!(got.len(), expected);
                    }
                });
            }
            s.spawn(|| {
                for _ in 0..10 {
                    c.reload("grid").unwrap();
                }
            });
        });
    }

    /// Serves one record on construction, then two records for the first reload (held
    /// until released), then three records for every later reload.
    struct GatedSource {
        calls: AtomicUsize,
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl LabelSource for GatedSource {
        fn load(&self, _path: &Path) -> Result<Vec<LabelInput>, SourceError> {
            let n = match self.calls.fetch_add(1, Ordering::SeqCst) {
                0 => 1,
                1 => {
                    self.entered.lock().unwrap().send(()).unwrap();
                    self.release.lock().unwrap().recv().unwrap();
                    2
                }
                _ => 3,
            };
            Ok(grid(1, 1.0).into_iter().cycle().take(n).collect())
        }
    }

    #[test]
    fn overlapping_reloads_apply_in_order() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let source = GatedSource {
            calls: AtomicUsize::new(0),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        };
        let c = Collections::new([EndpointConfig::new("x", "x.labels")], source);
        assert_eq!(c.get("x").unwrap().len(), 1);

        std::thread::scope(|s| {
            let older = s.spawn(|| c.reload("x"));
            entered_rx.recv().unwrap();
            let newer = s.spawn(|| c.reload("x"));
            // Queries are served from the current snapshot while both reloads are pending.
            assert_eq!(c.get("x").unwrap().len(), 1);
            release_tx.send(()).unwrap();
            older.join().unwrap().unwrap();
            newer.join().unwrap().unwrap();
        });

        assert_eq!(c.source().calls.load(Ordering::SeqCst), 3);
        assert_eq!(c.get("x").unwrap().len(), 3, "the later reload must win");
    }
}
