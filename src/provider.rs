//! Data Provider: read-only access to populated systems, system coordinates,
//! and per-station markets. The planner depends only on the [`DataProvider`]
//! trait; [`ShardStore`] backs it with the local sharded JSON layout from
//! §6, and [`FixtureProvider`] backs it with literal in-memory data for
//! tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Deserialize;

use crate::error::{PlannerError, Result};
use crate::model::{Coords, SystemHit};

pub use crate::model::{CommodityEntry, StationType};

/// Origin of a radius query: either a known system's name (resolved to
/// coordinates by the provider) or literal coordinates, mirroring the
/// source's two call shapes (`systemName` vs `coords=`).
pub enum RadiusOrigin<'a> {
    Named(&'a str),
    Point(Coords),
}

/// Read-only access to the three bulk collections described in §6.
pub trait DataProvider {
    fn coord(&self, system_name: &str) -> Option<Coords>;
    fn is_anarchy(&self, system_name: &str) -> bool;
    fn systems_in_radius(
        &self,
        origin: RadiusOrigin<'_>,
        radius: f64,
        min_radius: Option<f64>,
        include_anarchy: bool,
    ) -> Result<Vec<SystemHit>>;
    /// Station names for a system, excluding planetary/settlement/marketless
    /// stations when `no_planet` is true.
    fn stations(&self, system_name: &str, no_planet: bool) -> Option<Vec<String>>;
    fn station_market(&self, system_name: &str, station_name: &str) -> Option<Vec<CommodityEntry>>;
}

// ---------------------------------------------------------------------
// Sharded, on-disk implementation
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct StationEntry {
    id: u64,
    #[serde(default)]
    #[serde(rename = "marketId")]
    #[allow(dead_code)]
    market_id: Option<u64>,
    #[serde(rename = "type")]
    station_type: Option<StationType>,
    name: String,
    #[serde(default)]
    #[serde(rename = "haveMarket")]
    have_market: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct PopulatedSystemEntry {
    #[allow(dead_code)]
    id: u64,
    name: String,
    #[serde(default)]
    stations: Vec<StationEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct CoordEntry {
    #[allow(dead_code)]
    id: u64,
    name: String,
    coords: Coords,
}

#[derive(Debug, Clone, Deserialize)]
struct StationMarketEntry {
    id: u64,
    #[serde(default)]
    commodities: Vec<CommodityEntry>,
}

/// Loads the bulk-dump shard layout from a local directory:
/// `populated_system.json`, `system_coords/*.json`, `station_market/*.json`.
pub struct ShardStore {
    populated_systems: HashMap<String, PopulatedSystemEntry>,
    /// Market snapshots keyed by station id, eagerly indexed at open time
    /// (see SPEC_FULL §4.1 — bounded by a few hundred commodities per
    /// station, so this index is cheap relative to the coordinate scan).
    markets_by_station_id: HashMap<u64, Vec<CommodityEntry>>,
    system_coords_dir: PathBuf,
}

impl ShardStore {
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let populated_path = base_dir.join("populated_system.json");
        let populated_raw = fs::read_to_string(&populated_path).map_err(|e| {
            PlannerError::DataMissing(format!("could not read {}: {e}", populated_path.display()))
        })?;
        let entries: Vec<PopulatedSystemEntry> =
            serde_json::from_str(&populated_raw).map_err(|e| {
                PlannerError::DataMissing(format!("malformed populated_system.json: {e}"))
            })?;
        let populated_systems = entries
            .into_iter()
            .map(|e| (e.name.clone(), e))
            .collect::<HashMap<_, _>>();

        let market_dir = base_dir.join("station_market");
        let mut markets_by_station_id = HashMap::new();
        if market_dir.is_dir() {
            for shard_path in list_json_shards(&market_dir)? {
                let raw = fs::read_to_string(&shard_path).map_err(|e| {
                    PlannerError::DataMissing(format!(
                        "could not read {}: {e}",
                        shard_path.display()
                    ))
                })?;
                let shard: Vec<StationMarketEntry> = serde_json::from_str(&raw).map_err(|e| {
                    PlannerError::DataMissing(format!(
                        "malformed shard {}: {e}",
                        shard_path.display()
                    ))
                })?;
                for entry in shard {
                    markets_by_station_id.insert(entry.id, entry.commodities);
                }
            }
        }

        let system_coords_dir = base_dir.join("system_coords");

        Ok(ShardStore {
            populated_systems,
            markets_by_station_id,
            system_coords_dir,
        })
    }

    fn station_id(&self, system_name: &str, station_name: &str) -> Option<u64> {
        self.populated_systems
            .get(system_name)?
            .stations
            .iter()
            .find(|s| s.name == station_name)
            .map(|s| s.id)
    }

    /// Streams every coordinate shard, applying the spec's mandatory
    /// axis-aligned pre-filter before any euclidean distance is computed.
    /// Shards are processed in parallel since the coordinate collection is,
    /// per spec, the one too large to hold fully indexed in memory.
    fn scan_coords<F>(&self, mut on_hit: F) -> Result<()>
    where
        F: FnMut(&str, Coords),
    {
        let shards = list_json_shards(&self.system_coords_dir)?;
        let bar = ProgressBar::new(shards.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} shards")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message("scanning system_coords");
        let mut pending: Vec<Vec<(String, Coords)>> = shards
            .par_iter()
            .progress_with(bar)
            .map(|path| -> Result<Vec<(String, Coords)>> {
                let raw = fs::read_to_string(path).map_err(|e| {
                    PlannerError::DataMissing(format!("could not read {}: {e}", path.display()))
                })?;
                let entries: Vec<CoordEntry> = serde_json::from_str(&raw).map_err(|e| {
                    PlannerError::DataMissing(format!("malformed shard {}: {e}", path.display()))
                })?;
                Ok(entries.into_iter().map(|e| (e.name, e.coords)).collect())
            })
            .collect::<Result<Vec<_>>>()?;
        for shard in pending.drain(..) {
            for (name, coords) in shard {
                on_hit(&name, coords);
            }
        }
        Ok(())
    }
}

fn list_json_shards(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| PlannerError::DataMissing(format!("could not read {}: {e}", dir.display())))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    paths.sort();
    Ok(paths)
}

impl DataProvider for ShardStore {
    fn coord(&self, system_name: &str) -> Option<Coords> {
        let mut found = None;
        let _ = self.scan_coords(|name, coords| {
            if found.is_none() && name == system_name {
                found = Some(coords);
            }
        });
        found
    }

    fn is_anarchy(&self, system_name: &str) -> bool {
        !self.populated_systems.contains_key(system_name)
    }

    fn systems_in_radius(
        &self,
        origin: RadiusOrigin<'_>,
        radius: f64,
        min_radius: Option<f64>,
        include_anarchy: bool,
    ) -> Result<Vec<SystemHit>> {
        let origin_coords = match origin {
            RadiusOrigin::Point(c) => c,
            RadiusOrigin::Named(name) => self
                .coord(name)
                .ok_or_else(|| PlannerError::DataMissing(format!("no coordinates for {name}")))?,
        };

        let mut hits = Vec::new();
        self.scan_coords(|name, coords| {
            let dx = (coords.x - origin_coords.x).abs();
            let dy = (coords.y - origin_coords.y).abs();
            let dz = (coords.z - origin_coords.z).abs();
            if dx > radius || dy > radius || dz > radius {
                return;
            }
            let dist = origin_coords.euclid(&coords);
            if dist > radius {
                return;
            }
            if let Some(min_r) = min_radius {
                if dist < min_r {
                    return;
                }
            }
            if !include_anarchy && self.is_anarchy(name) {
                return;
            }
            hits.push(SystemHit {
                name: name.to_string(),
                coords,
                distance: dist,
            });
        })?;
        Ok(hits)
    }

    fn stations(&self, system_name: &str, no_planet: bool) -> Option<Vec<String>> {
        let entry = self.populated_systems.get(system_name)?;
        Some(
            entry
                .stations
                .iter()
                .filter(|s| {
                    if !no_planet {
                        return true;
                    }
                    let Some(typ) = &s.station_type else {
                        return false;
                    };
                    !typ.is_planet_like() && s.have_market
                })
                .map(|s| s.name.clone())
                .collect(),
        )
    }

    fn station_market(&self, system_name: &str, station_name: &str) -> Option<Vec<CommodityEntry>> {
        let id = self.station_id(system_name, station_name)?;
        self.markets_by_station_id.get(&id).cloned()
    }
}

// ---------------------------------------------------------------------
// In-memory fixture implementation, for tests
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FixtureStation {
    pub name: String,
    pub station_type: StationType,
    pub have_market: bool,
    pub commodities: Vec<CommodityEntry>,
}

#[derive(Debug, Clone)]
pub struct FixtureSystem {
    pub name: String,
    pub coords: Coords,
    pub populated: bool,
    pub stations: Vec<FixtureStation>,
}

/// An in-memory provider built from literal Rust values, used by unit and
/// integration tests so they never touch the filesystem.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    systems: Vec<FixtureSystem>,
}

impl FixtureProvider {
    pub fn new(systems: Vec<FixtureSystem>) -> Self {
        FixtureProvider { systems }
    }

    fn find(&self, name: &str) -> Option<&FixtureSystem> {
        self.systems.iter().find(|s| s.name == name)
    }
}

impl DataProvider for FixtureProvider {
    fn coord(&self, system_name: &str) -> Option<Coords> {
        self.find(system_name).map(|s| s.coords)
    }

    fn is_anarchy(&self, system_name: &str) -> bool {
        match self.find(system_name) {
            Some(s) => !s.populated,
            None => true,
        }
    }

    fn systems_in_radius(
        &self,
        origin: RadiusOrigin<'_>,
        radius: f64,
        min_radius: Option<f64>,
        include_anarchy: bool,
    ) -> Result<Vec<SystemHit>> {
        let origin_coords = match origin {
            RadiusOrigin::Point(c) => c,
            RadiusOrigin::Named(name) => self
                .coord(name)
                .ok_or_else(|| PlannerError::DataMissing(format!("no coordinates for {name}")))?,
        };
        let mut hits = Vec::new();
        for system in &self.systems {
            let dx = (system.coords.x - origin_coords.x).abs();
            let dy = (system.coords.y - origin_coords.y).abs();
            let dz = (system.coords.z - origin_coords.z).abs();
            if dx > radius || dy > radius || dz > radius {
                continue;
            }
            let dist = origin_coords.euclid(&system.coords);
            if dist > radius {
                continue;
            }
            if let Some(min_r) = min_radius {
                if dist < min_r {
                    continue;
                }
            }
            if !include_anarchy && !system.populated {
                continue;
            }
            hits.push(SystemHit {
                name: system.name.clone(),
                coords: system.coords,
                distance: dist,
            });
        }
        Ok(hits)
    }

    fn stations(&self, system_name: &str, no_planet: bool) -> Option<Vec<String>> {
        let system = self.find(system_name)?;
        Some(
            system
                .stations
                .iter()
                .filter(|s| !no_planet || (!s.station_type.is_planet_like() && s.have_market))
                .map(|s| s.name.clone())
                .collect(),
        )
    }

    fn station_market(&self, system_name: &str, station_name: &str) -> Option<Vec<CommodityEntry>> {
        let system = self.find(system_name)?;
        system
            .stations
            .iter()
            .find(|s| s.name == station_name)
            .map(|s| s.commodities.clone())
    }
}
