//! Core data types shared by the provider, cache, route, and trade modules.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

/// A point in 3D space, in light-years.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coords {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coords {
    pub fn euclid(&self, other: &Coords) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A system returned from a radius query, paired with its distance from the
/// query origin.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemHit {
    pub name: String,
    pub coords: Coords,
    pub distance: f64,
}

/// Station type, categorical per the bulk dump's `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub enum StationType {
    Planetary,
    #[serde(rename = "Odyssey Settlement")]
    OdysseySettlement,
    #[serde(other)]
    Orbital,
}

impl StationType {
    /// Planetary ports and Odyssey Settlements are excluded from trade
    /// consideration under `no_planet = true`.
    pub fn is_planet_like(&self) -> bool {
        matches!(
            self,
            StationType::Planetary | StationType::OdysseySettlement
        )
    }
}

/// One commodity listing in a station's market snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommodityEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "buyPrice")]
    pub buy_price: i64,
    #[serde(rename = "sellPrice")]
    pub sell_price: i64,
    pub stock: i64,
    pub demand: i64,
}

/// Demand tolerance threshold: a commodity is considered "demanded here"
/// when `demand > stock - DEMAND_SLACK`.
const DEMAND_SLACK: i64 = 5;

/// Derived, queryable view over a station's raw commodity snapshot.
#[derive(Debug, Clone, Default)]
pub struct MarketInfo {
    raw: Vec<CommodityEntry>,
    pub available_stock: HashMap<String, CommodityEntry>,
    pub demand_list: HashMap<String, CommodityEntry>,
}

impl MarketInfo {
    pub fn new(raw: Vec<CommodityEntry>) -> Self {
        let mut info = MarketInfo {
            raw,
            available_stock: HashMap::new(),
            demand_list: HashMap::new(),
        };
        info.regenerate();
        info
    }

    pub fn empty() -> Self {
        MarketInfo::new(Vec::new())
    }

    /// Rebuilds the two derived maps from the retained raw snapshot.
    pub fn regenerate(&mut self) {
        self.available_stock.clear();
        self.demand_list.clear();
        for entry in &self.raw {
            if entry.demand > entry.stock - DEMAND_SLACK {
                self.demand_list.insert(entry.id.clone(), entry.clone());
            }
            if entry.stock > 0 {
                self.available_stock.insert(entry.id.clone(), entry.clone());
            }
        }
    }
}

/// A dockable facility inside a system.
#[derive(Debug, Clone)]
pub struct Station {
    pub name: String,
    pub system_name: String,
    pub station_type: StationType,
    pub has_market: bool,
    pub market: MarketInfo,
}

/// A single commodity purchase within a manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestPick {
    pub commodity_id: String,
    pub display_name: String,
    pub count: i64,
    pub profit: i64,
}

/// Stable index into a [`crate::cache::RuntimeDatabase`]'s system arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemIdx(pub usize);

/// A named point in 3D space, possibly populated with stations.
#[derive(Debug, Clone)]
pub struct System {
    pub name: String,
    pub coords: Coords,
    pub distance: Option<f64>,
    pub station_names: Vec<String>,
    pub stations: Vec<Station>,
    pub neighbors: Vec<SystemIdx>,
}

impl System {
    pub fn new(name: String, coords: Coords, distance: Option<f64>) -> Self {
        System {
            name,
            coords,
            distance,
            station_names: Vec::new(),
            stations: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    pub fn find_station(&self, name: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.name == name)
    }

    /// Narrows this system's station visibility to a single named station,
    /// mirroring the source's `isolate_station` without mutating shared
    /// state — callers clone the relevant fields into a fresh `System`.
    pub fn isolated_to(&self, station_name: &str) -> Option<System> {
        let station = self.find_station(station_name)?.clone();
        Some(System {
            name: self.name.clone(),
            coords: self.coords,
            distance: self.distance,
            station_names: vec![station.name.clone()],
            stations: vec![station],
            neighbors: self.neighbors.clone(),
        })
    }
}

/// A planned leg between two stations: the manifest and the profit it
/// yields.
#[derive(Debug, Clone)]
pub struct RouteLeg {
    pub from_system: String,
    pub from_station: String,
    pub to_system: String,
    pub to_station: String,
    pub picks: Vec<ManifestPick>,
    pub profit: i64,
}

/// The winning route for one section: a chain of one or more legs (more
/// than one only when a deviation was taken), labeled by its hyphen-arrow
/// stop sequence.
#[derive(Debug, Clone)]
pub struct SectionRoute {
    pub label: String,
    pub legs: Vec<RouteLeg>,
    pub total_profit: i64,
}

impl SectionRoute {
    pub fn stops(&self) -> Vec<String> {
        self.label.split(" -> ").map(|s| s.to_string()).collect()
    }
}

/// Tracks commodity ids already picked in a manifest, so later picks in the
/// same run don't repeat a commodity.
pub type ExclusionSet = HashSet<String>;
