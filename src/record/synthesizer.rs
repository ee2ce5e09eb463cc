use super::catalog::Catalog;
use super::types::{ApplicationInfo, LogRecord};
use crate::{Error, Result};
use chrono::Utc;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use uuid::Builder;

const BATCH_SIZES: [usize; 3] = [1, 2, 3];
const BATCH_WEIGHTS: [u32; 3] = [70, 20, 10];
const USER_ID_PRESENT_PROBABILITY: f64 = 0.7;

/// Fabricates [`LogRecord`]s from a [`Catalog`] using an injected RNG.
///
/// Seed the RNG (`StdRng::seed_from_u64`) to get a reproducible stream;
/// the timestamp is the only field not derived from it.
pub struct Synthesizer<'a, R> {
    catalog: &'a Catalog,
    rng: R,
    severity_index: WeightedIndex<u32>,
    batch_index: WeightedIndex<u32>,
}

impl<'a, R: Rng> Synthesizer<'a, R> {
    /// Validates the catalog once so that [`generate`](Self::generate)
    /// cannot fail.
    pub fn new(catalog: &'a Catalog, rng: R) -> Result<Self> {
        if catalog.applications.is_empty() {
            return Err(Error::InvalidCatalog("no applications".to_string()));
        }

        if let Some(profile) = catalog.severities.iter().find(|p| p.messages.is_empty()) {
            return Err(Error::InvalidCatalog(format!(
                "severity {} has no messages",
                profile.severity
            )));
        }

        let severity_index = WeightedIndex::new(catalog.severities.iter().map(|p| p.weight))
            .map_err(|e| Error::InvalidCatalog(format!("severity weights: {}", e)))?;
        let batch_index = WeightedIndex::new(BATCH_WEIGHTS)
            .map_err(|e| Error::InvalidCatalog(format!("batch weights: {}", e)))?;

        Ok(Self {
            catalog,
            rng,
            severity_index,
            batch_index,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    pub fn generate(&mut self) -> LogRecord {
        let catalog = self.catalog;
        let rng = &mut self.rng;

        let app = &catalog.applications[rng.gen_range(0..catalog.applications.len())];
        let profile = &catalog.severities[self.severity_index.sample(&mut *rng)];
        let message = profile.messages[rng.gen_range(0..profile.messages.len())].clone();

        let version = format!(
            "{}.{}.{}",
            rng.gen_range(1..=3),
            rng.gen_range(0..=9),
            rng.gen_range(0..=9)
        );
        let instance_id = format!("instance-{:02}", rng.gen_range(1..=5));

        let trace_id = Builder::from_random_bytes(rng.gen())
            .into_uuid()
            .simple()
            .to_string();

        let user_id = if rng.gen_bool(USER_ID_PRESENT_PROBABILITY) {
            Some(rng.gen_range(1000..=9999))
        } else {
            None
        };

        let cpu: f64 = rng.gen_range(5.0..=85.0);

        LogRecord {
            timestamp: Utc::now(),
            level: profile.severity,
            application: ApplicationInfo {
                name: app.name.clone(),
                environment: app.environment,
                version,
                instance_id,
            },
            message,
            trace_id,
            user_id,
            response_time_ms: rng.gen_range(10..=2000),
            memory_usage_mb: rng.gen_range(50..=500),
            cpu_percent: (cpu * 100.0).round() / 100.0,
        }
    }

    /// Number of records to emit in the next tick: 1, 2 or 3 with
    /// weights 70/20/10.
    pub fn batch_size(&mut self) -> usize {
        BATCH_SIZES[self.batch_index.sample(&mut self.rng)]
    }
}
