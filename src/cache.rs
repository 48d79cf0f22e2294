//! Spatial index / runtime cache: the working set of systems and stations
//! materialized from the [`DataProvider`] during one planning run.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::{MarketInfo, Station, System, SystemIdx};
use crate::provider::{DataProvider, RadiusOrigin};

/// Owns every `System`/`Station` used by one planning run. Systems live in
/// a single arena addressed by [`SystemIdx`], so neighbor edges are plain
/// indices rather than references — see DESIGN.md for why.
pub struct RuntimeDatabase {
    systems: Vec<System>,
    by_name: HashMap<String, SystemIdx>,
    /// Set once the origin-destination envelope has been bulk pre-loaded;
    /// while warm, radius queries are served from the arena instead of the
    /// Data Provider.
    pub warm: bool,
}

impl RuntimeDatabase {
    pub fn new() -> Self {
        RuntimeDatabase {
            systems: Vec::new(),
            by_name: HashMap::new(),
            warm: false,
        }
    }

    pub fn get(&self, idx: SystemIdx) -> &System {
        &self.systems[idx.0]
    }

    pub fn get_mut(&mut self, idx: SystemIdx) -> &mut System {
        &mut self.systems[idx.0]
    }

    pub fn idx_of(&self, name: &str) -> Option<SystemIdx> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Deduplicates by name: a system already present returns its existing
    /// index, never a new one.
    pub fn add_system(&mut self, system: System) -> SystemIdx {
        if let Some(&idx) = self.by_name.get(&system.name) {
            return idx;
        }
        let idx = SystemIdx(self.systems.len());
        self.by_name.insert(system.name.clone(), idx);
        self.systems.push(system);
        idx
    }

    /// Appends a system without registering it in the name index — used
    /// for the isolated single-station copies the trade optimizer creates
    /// at section boundaries and deviation hops. These are throwaway views
    /// of a real system narrowed to one docking point; they must get their
    /// own `SystemIdx` rather than aliasing the shared, fully-stationed
    /// entry (mutating that one in place would corrupt sections that still
    /// reference it).
    pub fn push_detached(&mut self, system: System) -> SystemIdx {
        let idx = SystemIdx(self.systems.len());
        self.systems.push(system);
        idx
    }

    /// Materializes a system's tradeable stations (and their markets) from
    /// the Data Provider, unless already populated.
    pub fn ensure_stations(&mut self, provider: &dyn DataProvider, idx: SystemIdx) -> Result<()> {
        if !self.get(idx).stations.is_empty() {
            return Ok(());
        }
        if self.get(idx).station_names.is_empty() {
            let name = self.get(idx).name.clone();
            let station_names = provider.stations(&name, true).unwrap_or_default();
            self.get_mut(idx).station_names = station_names;
        }
        self.gather_station_infos(provider, idx)
    }

    /// Fetches market snapshots for every station name already recorded on
    /// `idx` and materializes the resolved `Station` objects.
    pub fn gather_station_infos(
        &mut self,
        provider: &dyn DataProvider,
        idx: SystemIdx,
    ) -> Result<()> {
        let system_name = self.get(idx).name.clone();
        let station_names = self.get(idx).station_names.clone();
        let mut stations = Vec::with_capacity(station_names.len());
        for station_name in station_names {
            let commodities = provider.station_market(&system_name, &station_name);
            let has_market = commodities.is_some();
            let market = MarketInfo::new(commodities.unwrap_or_default());
            stations.push(Station {
                name: station_name,
                system_name: system_name.clone(),
                // already filtered to orbital, market-bearing stations by
                // `provider.stations(.., no_planet = true)`
                station_type: crate::model::StationType::Orbital,
                has_market,
                market,
            });
        }
        self.get_mut(idx).stations = stations;
        Ok(())
    }

    /// Builds a bidirectional neighbor edge for every pair of interned
    /// systems within `(min_dist, max_dist]`. Quadratic over the interned
    /// set — correct only when that set is pre-narrowed to the
    /// origin-destination envelope, per §4.2.
    pub fn build_neighbors(&mut self, max_dist: f64, min_dist: f64) {
        let n = self.systems.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let dist = self.systems[i].coords.euclid(&self.systems[j].coords);
                if dist > min_dist && dist <= max_dist {
                    self.systems[i].neighbors.push(SystemIdx(j));
                    self.systems[j].neighbors.push(SystemIdx(i));
                }
            }
        }
    }

    /// Serves a radius query by scanning the interned set instead of the
    /// Data Provider. Only valid once `warm` (i.e. after the relevant
    /// envelope has been bulk pre-loaded).
    pub fn warm_radius_query(
        &self,
        origin: RadiusOrigin<'_>,
        radius: f64,
        min_radius: Option<f64>,
        include_anarchy: bool,
        provider: &dyn DataProvider,
    ) -> Vec<SystemIdx> {
        let origin_coords = match origin {
            RadiusOrigin::Point(c) => c,
            RadiusOrigin::Named(name) => match self.idx_of(name) {
                Some(idx) => self.get(idx).coords,
                None => return Vec::new(),
            },
        };
        let mut result = Vec::new();
        for (i, system) in self.systems.iter().enumerate() {
            let dist = origin_coords.euclid(&system.coords);
            if dist > radius {
                continue;
            }
            if let Some(min_r) = min_radius {
                if dist < min_r {
                    continue;
                }
            }
            if !include_anarchy && provider.is_anarchy(&system.name) {
                continue;
            }
            result.push(SystemIdx(i));
        }
        result
    }
}

impl Default for RuntimeDatabase {
    fn default() -> Self {
        Self::new()
    }
}
