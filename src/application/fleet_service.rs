// Fleet service - Load cycle and index publication
use crate::application::dataset_repository::{DatasetRepository, RawDataset};
use crate::application::errors::{DatasetError, SnapshotError};
use crate::application::telemetry_index::{IndexSummary, TelemetryIndex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

#[derive(Debug, Default)]
struct LoadState {
    index: Option<Arc<TelemetryIndex>>,
    last_failure: Option<String>,
    /// Generation of the newest reload whose outcome has been applied.
    settled: u64,
}

impl LoadState {
    /// Claim the slot for `generation`. False when a newer reload already settled.
    fn settle(&mut self, generation: u64) -> bool {
        if generation <= self.settled {
            return false;
        }
        self.settled = generation;
        true
    }
}

/// Owns the published index. A load cycle either replaces it whole or leaves it alone.
#[derive(Clone)]
pub struct FleetService {
    repository: Arc<dyn DatasetRepository>,
    state: Arc<RwLock<LoadState>>,
    generation: Arc<AtomicU64>,
}

impl FleetService {
    pub fn new(repository: Arc<dyn DatasetRepository>) -> Self {
        Self {
            repository,
            state: Arc::new(RwLock::new(LoadState::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fetch all four collections concurrently, then build and publish a fresh index.
    ///
    /// Overlapping reloads settle in start order: an outcome that finishes
    /// after a newer reload has settled is discarded.
    pub async fn reload(&self) -> Result<IndexSummary, DatasetError> {
        let start_time = Instant::now();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let fetched = futures::try_join!(
            self.repository.fetch_equipment(),
            self.repository.fetch_position_history(),
            self.repository.fetch_state_catalog(),
            self.repository.fetch_state_history(),
        );

        let (equipment, positions, catalog, states) = match fetched {
            Ok(collections) => collections,
            Err(e) => {
                tracing::error!(resource = %e.resource(), "Dataset load failed, keeping previous index: {}", e);
                let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
                if state.settle(generation) {
                    state.last_failure = Some(e.to_string());
                } else {
                    tracing::debug!(generation, "Failed reload superseded by a newer one");
                }
                return Err(e);
            }
        };

        let index = TelemetryIndex::from_dataset(RawDataset {
            equipment,
            positions,
            catalog,
            states,
        });
        let summary = index.summary();

        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if !state.settle(generation) {
                tracing::debug!(generation, "Reload superseded by a newer one, not publishing");
                return Ok(summary);
            }
            state.index = Some(Arc::new(index));
            state.last_failure = None;
        }

        tracing::info!(
            "Loaded {} equipment, {} positions, {} state entries ({} tracked) in {}ms",
            summary.equipment,
            summary.position_samples,
            summary.state_samples,
            summary.tracked_equipment,
            start_time.elapsed().as_millis()
        );

        Ok(summary)
    }

    /// The published index.
    ///
    /// A previous index is still served after a failed reload; the failure is
    /// only reported while nothing has ever loaded.
    pub fn snapshot(&self) -> Result<Arc<TelemetryIndex>, SnapshotError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        match (&state.index, &state.last_failure) {
            (Some(index), _) => Ok(index.clone()),
            (None, Some(failure)) => Err(SnapshotError::LoadFailed(failure.clone())),
            (None, None) => Err(SnapshotError::NotLoaded),
        }
    }

    pub fn last_failure(&self) -> Option<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.last_failure.clone()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::dataset_repository::Resource;
    use crate::domain::equipment::{Equipment, StateDefinition};
    use crate::domain::records::{RawPosition, RawPositionHistory, RawStateEntry, RawStateHistory};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::time::Duration;

    /// In-memory repository; `fail_catalog` makes the state catalog fetch fail.
    pub(crate) struct StaticRepository {
        pub(crate) dataset: RawDataset,
        pub(crate) fail_catalog: AtomicBool,
    }

    impl StaticRepository {
        pub(crate) fn new(dataset: RawDataset) -> Self {
            Self {
                dataset,
                fail_catalog: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl DatasetRepository for StaticRepository {
        async fn fetch_equipment(&self) -> Result<Vec<Equipment>, DatasetError> {
            Ok(self.dataset.equipment.clone())
        }

        async fn fetch_position_history(&self) -> Result<Vec<RawPositionHistory>, DatasetError> {
            Ok(self.dataset.positions.clone())
        }

        async fn fetch_state_catalog(&self) -> Result<Vec<StateDefinition>, DatasetError> {
            if self.fail_catalog.load(Ordering::SeqCst) {
                return Err(DatasetError::Status {
                    resource: Resource::StateCatalog,
                    status: 503,
                });
            }
            Ok(self.dataset.catalog.clone())
        }

        async fn fetch_state_history(&self) -> Result<Vec<RawStateHistory>, DatasetError> {
            Ok(self.dataset.states.clone())
        }
    }

    pub(crate) fn sample_dataset() -> RawDataset {
        RawDataset {
            equipment: vec![
                Equipment::new("E1", "CA-0001", "m1"),
                Equipment::new("E2", "CA-0002", "m1"),
            ],
            positions: vec![
                RawPositionHistory {
                    equipment_id: "E1".to_string(),
                    positions: vec![
                        RawPosition::new("2024-01-01T00:00:00Z", Some(10.0), Some(20.0)),
                        RawPosition::new("2024-01-02T00:00:00Z", Some(11.0), Some(21.0)),
                    ],
                },
                RawPositionHistory {
                    equipment_id: "E2".to_string(),
                    positions: vec![RawPosition::new("2024-01-01T00:00:00Z", Some(-19.1), Some(-45.9))],
                },
            ],
            catalog: vec![
                StateDefinition::new("S1", "Operando", "#2ecc71"),
                StateDefinition::new("S2", "Parado", "#f1c40f"),
            ],
            states: vec![RawStateHistory {
                equipment_id: "E1".to_string(),
                states: vec![
                    RawStateEntry::new("2024-01-02T00:00:00Z", "S2"),
                    RawStateEntry::new("2024-01-01T00:00:00Z", "S1"),
                    RawStateEntry::new("2024-01-01T12:00:00Z", "S9"),
                ],
            }],
        }
    }

    #[tokio::test]
    async fn test_snapshot_before_load() {
        let service = FleetService::new(Arc::new(StaticRepository::new(sample_dataset())));

        assert_eq!(service.snapshot().unwrap_err(), SnapshotError::NotLoaded);
    }

    #[tokio::test]
    async fn test_reload_publishes_index() {
        let service = FleetService::new(Arc::new(StaticRepository::new(sample_dataset())));

        let summary = service.reload().await.unwrap();
        assert_eq!(summary.tracked_equipment, 2);
        assert_eq!(summary.unknown_state_samples, 1);

        let index = service.snapshot().unwrap();
        assert_eq!(index.latest_state("E1"), "Parado");
        assert_eq!(index.latest_position("E1").unwrap().latitude, 11.0);
        assert!(service.last_failure().is_none());
    }

    #[tokio::test]
    async fn test_failed_first_load_is_reported() {
        let repository = StaticRepository::new(sample_dataset());
        repository.fail_catalog.store(true, Ordering::SeqCst);
        let service = FleetService::new(Arc::new(repository));

        let err = service.reload().await.unwrap_err();
        assert_eq!(err.resource(), Resource::StateCatalog);

        match service.snapshot() {
            Err(SnapshotError::LoadFailed(reason)) => assert!(reason.contains("state catalog")),
            other => panic!("expected load failure, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_index() {
        let repository = Arc::new(StaticRepository::new(sample_dataset()));
        let service = FleetService::new(repository.clone());

        service.reload().await.unwrap();
        let before = service.snapshot().unwrap();

        repository.fail_catalog.store(true, Ordering::SeqCst);
        assert!(service.reload().await.is_err());

        let after = service.snapshot().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert!(service.last_failure().is_some());

        repository.fail_catalog.store(false, Ordering::SeqCst);
        service.reload().await.unwrap();
        assert!(!Arc::ptr_eq(&before, &service.snapshot().unwrap()));
        assert!(service.last_failure().is_none());
    }

    /// Serves `first` slowly on the first call and `second` immediately after.
    struct SlowFirstRepository {
        first: RawDataset,
        second: RawDataset,
        calls: AtomicUsize,
    }

    impl SlowFirstRepository {
        fn pick(&self, call: usize) -> &RawDataset {
            if call == 0 { &self.first } else { &self.second }
        }
    }

    #[async_trait]
    impl DatasetRepository for SlowFirstRepository {
        async fn fetch_equipment(&self) -> Result<Vec<Equipment>, DatasetError> {
            Ok(Vec::new())
        }

        async fn fetch_position_history(&self) -> Result<Vec<RawPositionHistory>, DatasetError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            Ok(self.pick(call).positions.clone())
        }

        async fn fetch_state_catalog(&self) -> Result<Vec<StateDefinition>, DatasetError> {
            Ok(Vec::new())
        }

        async fn fetch_state_history(&self) -> Result<Vec<RawStateHistory>, DatasetError> {
            Ok(Vec::new())
        }
    }

    fn single_unit(id: &str) -> RawDataset {
        RawDataset {
            equipment: Vec::new(),
            positions: vec![RawPositionHistory {
                equipment_id: id.to_string(),
                positions: vec![RawPosition::new("2024-01-01T00:00:00Z", Some(1.0), Some(2.0))],
            }],
            catalog: Vec::new(),
            states: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_slow_older_reload_does_not_overwrite_newer() {
        let service = FleetService::new(Arc::new(SlowFirstRepository {
            first: single_unit("E-old"),
            second: single_unit("E-new"),
            calls: AtomicUsize::new(0),
        }));

        let (older, newer) = tokio::join!(service.reload(), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            service.reload().await
        });
        assert!(older.is_ok());
        assert!(newer.is_ok());

        let index = service.snapshot().unwrap();
        let known: Vec<_> = index.known_equipment_ids().collect();
        assert_eq!(known, vec!["E-new"]);
    }

    #[test]
    fn test_settle_rejects_older_generations() {
        let mut state = LoadState::default();

        assert!(state.settle(2));
        assert!(!state.settle(1));
        assert!(!state.settle(2));
        assert!(state.settle(3));
    }
}
