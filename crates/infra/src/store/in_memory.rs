use std::collections::HashMap;

use ecovision_core::{ClimateFilter, ClimateRecord, Entity, Location, Metric, Pagination};

use super::{ClimatePage, ClimateStore, StoreError};
use crate::seed::SeedDataset;

/// In-memory climate store for tests/dev.
///
/// Readings are joined with their location and metric once at construction
/// and kept sorted by `(date, id)`, the same order the MySQL store returns.
#[derive(Debug, Clone)]
pub struct InMemoryClimateStore {
    locations: Vec<Location>,
    metrics: Vec<Metric>,
    records: Vec<ClimateRecord>,
}

fn index_by_id<T: Entity>(rows: &[T]) -> HashMap<T::Id, &T> {
    rows.iter().map(|r| (r.id(), r)).collect()
}

impl InMemoryClimateStore {
    /// Build from a dataset, rejecting readings that reference unknown rows.
    pub fn from_dataset(dataset: SeedDataset) -> Result<Self, StoreError> {
        let mut records = {
            let locations = index_by_id(&dataset.locations);
            let metrics = index_by_id(&dataset.metrics);

            dataset
                .climate_data
                .iter()
                .map(|reading| -> Result<ClimateRecord, StoreError> {
                    let location = locations.get(&reading.location_id).ok_or_else(|| {
                        StoreError::Seed(format!(
                            "reading {} references unknown location {}",
                            reading.id, reading.location_id
                        ))
                    })?;
                    let metric = metrics.get(&reading.metric_id).ok_or_else(|| {
                        StoreError::Seed(format!(
                            "reading {} references unknown metric {}",
                            reading.id, reading.metric_id
                        ))
                    })?;
                    Ok(ClimateRecord::join(reading, location, metric))
                })
                .collect::<Result<Vec<_>, StoreError>>()?
        };
        records.sort_by_key(|r| (r.date, r.id));

        let mut locations = dataset.locations;
        locations.sort_by_key(|l| l.id);
        let mut metrics = dataset.metrics;
        metrics.sort_by_key(|m| m.id);

        Ok(Self {
            locations,
            metrics,
            records,
        })
    }

    /// Store preloaded with the bundled sample dataset.
    pub fn with_sample_data() -> Result<Self, StoreError> {
        Self::from_dataset(SeedDataset::sample()?)
    }

    fn matching<'a>(&'a self, filter: &'a ClimateFilter) -> impl Iterator<Item = &'a ClimateRecord> + 'a {
        self.records.iter().filter(move |r| filter.matches(r))
    }
}

#[async_trait::async_trait]
impl ClimateStore for InMemoryClimateStore {
    async fn list_locations(&self) -> Result<Vec<Location>, StoreError> {
        Ok(self.locations.clone())
    }

    async fn list_metrics(&self) -> Result<Vec<Metric>, StoreError> {
        Ok(self.metrics.clone())
    }

    async fn query_climate(
        &self,
        filter: &ClimateFilter,
        pagination: Pagination,
    ) -> Result<ClimatePage, StoreError> {
        let total = self.matching(filter).count() as u64;
        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let records: Vec<_> = self
            .matching(filter)
            .skip(offset)
            .take(pagination.per_page as usize)
            .cloned()
            .collect();

        tracing::debug!(
            location_id = ?filter.location_id,
            metric = ?filter.metric,
            total,
            returned = records.len(),
            "climate page fetched"
        );
        Ok(ClimatePage {
            records,
            total,
            pagination,
        })
    }

    async fn query_series(&self, filter: &ClimateFilter) -> Result<Vec<ClimateRecord>, StoreError> {
        let records: Vec<ClimateRecord> = self.matching(filter).cloned().collect();
        tracing::debug!(
            location_id = ?filter.location_id,
            metric = ?filter.metric,
            returned = records.len(),
            "climate series fetched"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ecovision_core::{ClimateReading, Quality};

    fn store() -> InMemoryClimateStore {
        InMemoryClimateStore::with_sample_data().unwrap()
    }

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn sample_data_loads_all_tables() {
        let s = store();
        assert_eq!(s.list_locations().await.unwrap().len(), 3);
        assert_eq!(s.list_metrics().await.unwrap().len(), 3);

        let page = s.query_climate(&ClimateFilter::default(), Pagination::default()).await.unwrap();
        assert_eq!(page.total, 40);
        assert_eq!(page.records.len(), 40);
    }

    #[tokio::test]
    async fn records_are_ordered_by_date() {
        let records = store().query_series(&ClimateFilter::default()).await.unwrap();
        assert!(records.windows(2).all(|w| (w[0].date, w[0].id) <= (w[1].date, w[1].id)));
    }

    #[tokio::test]
    async fn paging_splits_matches() {
        let s = store();
        let filter = ClimateFilter::default();

        let first = s.query_climate(&filter, Pagination::new(Some(1), Some(15))).await.unwrap();
        let third = s.query_climate(&filter, Pagination::new(Some(3), Some(15))).await.unwrap();
        let beyond = s.query_climate(&filter, Pagination::new(Some(9), Some(15))).await.unwrap();

        assert_eq!(first.records.len(), 15);
        assert_eq!(third.records.len(), 10);
        assert!(beyond.records.is_empty());
        assert_eq!(beyond.total, 40);
    }

    #[tokio::test]
    async fn filters_combine() {
        let filter = ClimateFilter {
            location_id: Some(1),
            metric: Some("temperature".to_string()),
            quality_threshold: Some(Quality::Good),
            ..Default::default()
        };
        let records = store().query_series(&filter).await.unwrap();
        assert_eq!(records.len(), 7);
        assert!(records.iter().all(|r| r.location_name == "Irvine" && r.quality >= Quality::Good));
    }

    #[tokio::test]
    async fn queries_are_logged_at_debug() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let filter = ClimateFilter {
            location_id: Some(2),
            ..Default::default()
        };
        let s = store();
        let series = s.query_series(&filter).await.unwrap();
        s.query_climate(&filter, Pagination::default()).await.unwrap();

        let out = logs.contents();
        let series_line = out
            .lines()
            .find(|l| l.contains("climate series fetched"))
            .expect("series query was not logged");
        assert!(series_line.contains("DEBUG"));
        assert!(series_line.contains(&format!("returned={}", series.len())));

        let page_line = out
            .lines()
            .find(|l| l.contains("climate page fetched"))
            .expect("page query was not logged");
        assert!(page_line.contains("DEBUG"));
        assert!(page_line.contains("location_id=Some(2)"));
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let mut dataset = SeedDataset::sample().unwrap();
        dataset.climate_data.push(ClimateReading {
            id: 999,
            location_id: 42,
            metric_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            value: 1.0,
            quality: Quality::Good,
        });

        let err = InMemoryClimateStore::from_dataset(dataset).unwrap_err();
        assert!(matches!(err, StoreError::Seed(msg) if msg.contains("unknown location 42")));
    }
}
