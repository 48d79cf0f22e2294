use caravan::model::Coords;
use caravan::provider::{
    CommodityEntry, FixtureProvider, FixtureStation, FixtureSystem, StationType,
};

pub fn coords(x: f64, y: f64, z: f64) -> Coords {
    Coords { x, y, z }
}

pub fn commodity(
    id: &str,
    name: &str,
    buy_price: i64,
    sell_price: i64,
    stock: i64,
    demand: i64,
) -> CommodityEntry {
    CommodityEntry {
        id: id.to_string(),
        name: name.to_string(),
        buy_price,
        sell_price,
        stock,
        demand,
    }
}

pub fn station(name: &str, commodities: Vec<CommodityEntry>) -> FixtureStation {
    FixtureStation {
        name: name.to_string(),
        station_type: StationType::Orbital,
        have_market: true,
        commodities,
    }
}

/// Two systems 7ly apart, each with a single station and no commodities —
/// enough to exercise route planning without the trade optimizer finding
/// anything to buy.
pub fn two_system_provider() -> FixtureProvider {
    FixtureProvider::new(vec![
        FixtureSystem {
            name: "Alpha".to_string(),
            coords: coords(0.0, 0.0, 0.0),
            populated: true,
            stations: vec![station("Alpha Hub", Vec::new())],
        },
        FixtureSystem {
            name: "Beta".to_string(),
            coords: coords(7.0, 0.0, 0.0),
            populated: true,
            stations: vec![station("Beta Hub", Vec::new())],
        },
    ])
}

/// Two systems with a single directly-profitable commodity, matching the
/// literal manifest-picking scenarios: X buy=100/stock=30 at the source,
/// Y buy=50/stock=10, demanded at sell=150/100 and sell=80/100 respectively.
pub fn manifest_scenario_provider() -> FixtureProvider {
    FixtureProvider::new(vec![
        FixtureSystem {
            name: "Source".to_string(),
            coords: coords(0.0, 0.0, 0.0),
            populated: true,
            stations: vec![station(
                "Source Hub",
                vec![
                    commodity("X", "Widgets", 100, 0, 30, 0),
                    commodity("Y", "Gizmos", 50, 0, 10, 0),
                ],
            )],
        },
        FixtureSystem {
            name: "Sink".to_string(),
            coords: coords(5.0, 0.0, 0.0),
            populated: true,
            stations: vec![station(
                "Sink Hub",
                vec![
                    commodity("X", "Widgets", 0, 150, 0, 100),
                    commodity("Y", "Gizmos", 0, 80, 0, 100),
                ],
            )],
        },
    ])
}

/// `Source` has two stations — `Profitable Hub` (sells Widgets, same prices
/// as `manifest_scenario_provider`) and `Empty Hub` (no commodities at all)
/// — so pinning the origin to one or the other changes whether a trade is
/// found, while leaving the origin bare still finds the profitable one by
/// scanning both.
pub fn multi_station_source_provider() -> FixtureProvider {
    FixtureProvider::new(vec![
        FixtureSystem {
            name: "Source".to_string(),
            coords: coords(0.0, 0.0, 0.0),
            populated: true,
            stations: vec![
                station("Empty Hub", Vec::new()),
                station(
                    "Profitable Hub",
                    vec![commodity("X", "Widgets", 100, 0, 30, 0)],
                ),
            ],
        },
        FixtureSystem {
            name: "Sink".to_string(),
            coords: coords(5.0, 0.0, 0.0),
            populated: true,
            stations: vec![station(
                "Sink Hub",
                vec![commodity("X", "Widgets", 0, 150, 0, 100)],
            )],
        },
    ])
}

/// A 3-system section (A - M - B) set up so the direct A->B leg always
/// profits `1000` (100 units at 10/unit) and the deviated A->M->B chain
/// profits `(p1 + p2) * 100`, letting callers exercise the 3x deviation
/// gate on both sides by choosing `p1`/`p2`.
pub fn deviation_gate_provider(p1: i64, p2: i64) -> FixtureProvider {
    FixtureProvider::new(vec![
        FixtureSystem {
            name: "A".to_string(),
            coords: coords(0.0, 0.0, 0.0),
            populated: true,
            stations: vec![station(
                "A Port",
                vec![
                    commodity("D", "Direct Good", 0, 0, 100, 0),
                    commodity("E", "Deviate Good", 0, 0, 100, 0),
                ],
            )],
        },
        FixtureSystem {
            name: "M".to_string(),
            coords: coords(3.0, 0.0, 0.0),
            populated: true,
            stations: vec![station(
                "M Port",
                vec![
                    commodity("E", "Deviate Good", 0, p1, 0, 100),
                    commodity("F", "Relay Good", 0, 0, 100, 0),
                ],
            )],
        },
        FixtureSystem {
            name: "B".to_string(),
            coords: coords(6.0, 0.0, 0.0),
            populated: true,
            stations: vec![station(
                "B Port",
                vec![
                    commodity("D", "Direct Good", 0, 10, 0, 100),
                    commodity("F", "Relay Good", 0, p2, 0, 100),
                ],
            )],
        },
    ])
}

/// A system whose only station is planetary, plus one that's a settlement
/// and one orbital station without a market — none should survive
/// `stations(.., no_planet = true)`.
pub fn planet_filtering_provider() -> FixtureProvider {
    FixtureProvider::new(vec![FixtureSystem {
        name: "Cradle".to_string(),
        coords: coords(0.0, 0.0, 0.0),
        populated: true,
        stations: vec![
            FixtureStation {
                name: "Cradle Planetary Port".to_string(),
                station_type: StationType::Planetary,
                have_market: true,
                commodities: Vec::new(),
            },
            FixtureStation {
                name: "Cradle Settlement".to_string(),
                station_type: StationType::OdysseySettlement,
                have_market: true,
                commodities: Vec::new(),
            },
            FixtureStation {
                name: "Cradle Marketless Outpost".to_string(),
                station_type: StationType::Orbital,
                have_market: false,
                commodities: Vec::new(),
            },
            FixtureStation {
                name: "Cradle Orbital Exchange".to_string(),
                station_type: StationType::Orbital,
                have_market: true,
                commodities: vec![commodity("X", "Widgets", 10, 20, 5, 5)],
            },
        ],
    }])
}

pub fn colinear_three_system_provider() -> FixtureProvider {
    FixtureProvider::new(vec![
        FixtureSystem {
            name: "Alpha".to_string(),
            coords: coords(0.0, 0.0, 0.0),
            populated: true,
            stations: vec![station(
                "Alpha Hub",
                vec![commodity("X", "Widgets", 100, 150, 30, 0)],
            )],
        },
        FixtureSystem {
            name: "Gamma".to_string(),
            coords: coords(6.0, 0.0, 0.0),
            populated: true,
            stations: vec![station(
                "Gamma Hub",
                vec![commodity("X", "Widgets", 100, 150, 30, 0)],
            )],
        },
        FixtureSystem {
            name: "Beta".to_string(),
            coords: coords(12.0, 0.0, 0.0),
            populated: true,
            stations: vec![station(
                "Beta Hub",
                vec![commodity("X", "Widgets", 90, 150, 100, 100)],
            )],
        },
    ])
}
