//! Versioned cache of the derived tables.
//!
//! A [`CacheBlob`] holds exactly the tables that are expensive to derive,
//! tagged with a format version and the digest of the instance they were
//! derived from. Restoring checks both before trusting the tables.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::instance::ExtendedInstance;
use super::table::DenseTable;
use crate::error::{Error, Result};
use crate::model::Instance;

/// Current cache format version.
pub const CACHE_VERSION: u32 = 1;

/// Serializable snapshot of the derived tables of an [`ExtendedInstance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheBlob {
    pub version: u32,
    pub instance_digest: String,
    pub prefix_energy_cost: Vec<i64>,
    pub optimal_switching_costs: Option<DenseTable<Option<i64>>>,
    pub full_optimal_switching_costs: Option<DenseTable<Option<i64>>>,
    pub gaps_lower_bounds: Option<DenseTable<Option<i64>>>,
}

impl ExtendedInstance {
    /// Snapshots the derived tables computed so far.
    pub fn to_cache(&self) -> Result<CacheBlob> {
        Ok(CacheBlob {
            version: CACHE_VERSION,
            instance_digest: self.instance.digest()?,
            prefix_energy_cost: self.prefix_energy_cost.clone(),
            optimal_switching_costs: self.optimal_switching_costs.clone(),
            full_optimal_switching_costs: self.full_optimal_switching_costs.clone(),
            gaps_lower_bounds: self.gaps_lower_bounds.clone(),
        })
    }

    /// Snapshots the derived tables as a JSON string.
    pub fn to_cache_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_cache()?)?)
    }

    /// Rebuilds an extended instance with tables restored from `blob`.
    ///
    /// # Errors
    ///
    /// [`Error::CacheVersion`] for a foreign format version and
    /// [`Error::CacheMismatch`] if the blob was derived from a different
    /// instance or its tables have the wrong shape.
    pub fn from_cache(instance: Instance, blob: CacheBlob) -> Result<Self> {
        if blob.version != CACHE_VERSION {
            return Err(Error::CacheVersion {
                expected: CACHE_VERSION,
                found: blob.version,
            });
        }
        let digest = instance.digest()?;
        if blob.instance_digest != digest {
            return Err(Error::CacheMismatch {
                expected: digest,
                found: blob.instance_digest,
            });
        }

        let mut extended = Self::new(instance)?;
        let side = extended.intervals_count() + 1;
        let tables = [
            &blob.optimal_switching_costs,
            &blob.full_optimal_switching_costs,
            &blob.gaps_lower_bounds,
        ];
        let shapes_ok = tables.iter().all(|table| {
            table.as_ref().map_or(true, |t| {
                t.is_consistent() && t.rows() == side && t.cols() == side
            })
        });
        if !shapes_ok || blob.prefix_energy_cost.len() != side {
            return Err(Error::CacheMismatch {
                expected: format!("tables of {side}x{side}"),
                found: "tables of another shape".to_string(),
            });
        }

        extended.prefix_energy_cost = blob.prefix_energy_cost;
        extended.optimal_switching_costs = blob.optimal_switching_costs;
        extended.full_optimal_switching_costs = blob.full_optimal_switching_costs;
        extended.gaps_lower_bounds = blob.gaps_lower_bounds;
        debug!(digest = %digest, "restored extended instance from cache");
        Ok(extended)
    }

    /// Parses a JSON blob and restores it with [`from_cache`](Self::from_cache).
    pub fn from_cache_str(instance: Instance, blob: &str) -> Result<Self> {
        let blob: CacheBlob = serde_json::from_str(blob)?;
        Self::from_cache(instance, blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StateDiagram;

    fn instance() -> Instance {
        Instance::single_machine(&[1, 2], &[3, 1, 4, 1, 5, 9, 2, 6, 5], StateDiagram::aghelinejad2017a())
    }

    #[test]
    fn test_restores_tables_verbatim() {
        let mut ext = ExtendedInstance::new(instance()).unwrap();
        ext.generate_full();
        let blob = ext.to_cache_string().unwrap();

        let restored = ExtendedInstance::from_cache_str(instance(), &blob).unwrap();
        assert_eq!(restored.optimal_switching_costs(), ext.optimal_switching_costs());
        assert_eq!(restored.full_optimal_switching_costs(), ext.full_optimal_switching_costs());
        assert_eq!(restored.gaps_lower_bounds(), ext.gaps_lower_bounds());
    }

    #[test]
    fn test_rejects_other_instance() {
        let mut ext = ExtendedInstance::new(instance()).unwrap();
        ext.compute_optimal_switching_costs();
        let blob = ext.to_cache().unwrap();

        let mut other = instance();
        other.intervals[0].energy_cost = 0;
        assert!(matches!(
            ExtendedInstance::from_cache(other, blob),
            Err(Error::CacheMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_other_version() {
        let ext = ExtendedInstance::new(instance()).unwrap();
        let mut blob = ext.to_cache().unwrap();
        blob.version = CACHE_VERSION + 1;
        assert!(matches!(
            ExtendedInstance::from_cache(instance(), blob),
            Err(Error::CacheVersion { .. })
        ));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let ext = ExtendedInstance::new(instance()).unwrap();
        let mut blob = ext.to_cache().unwrap();
        blob.gaps_lower_bounds = Some(DenseTable::new(2, 2, None));
        assert!(matches!(
            ExtendedInstance::from_cache(instance(), blob),
            Err(Error::CacheMismatch { .. })
        ));
    }

    #[test]
    fn test_load_uses_valid_cache_and_ignores_stale_one() {
        let mut ext = ExtendedInstance::new(instance()).unwrap();
        ext.compute_optimal_switching_costs();

        let mut cached = instance();
        cached.serialized_extended_instance = Some(ext.to_cache_string().unwrap());
        let loaded = ExtendedInstance::load(cached).unwrap();
        assert!(loaded.optimal_switching_costs().is_some(), "tables come from the cache");

        let mut stale = instance();
        stale.intervals[2].energy_cost = 0;
        stale.serialized_extended_instance = Some(ext.to_cache_string().unwrap());
        let loaded = ExtendedInstance::load(stale).unwrap();
        assert!(loaded.optimal_switching_costs().is_none(), "stale cache is ignored");
    }
}
