//! Trade optimizer: partitions a system route into sections, gathers
//! lateral deviations, and picks the highest-profit station pair and cargo
//! manifest for each section.

use std::collections::HashSet;

use itertools::iproduct;
use log::{debug, info};

use crate::cache::RuntimeDatabase;
use crate::error::Result;
use crate::market::highest_profit_commodity;
use crate::model::{ExclusionSet, ManifestPick, RouteLeg, SectionRoute, Station, SystemIdx};
use crate::provider::{DataProvider, RadiusOrigin};

/// What a section contributed to the plan: either a winning route, or a
/// recoverable "no trade found" placeholder (spec §7: `NoTrade` degrades
/// the section, it does not abort the plan).
#[derive(Debug, Clone)]
pub enum SectionOutcome {
    Route(SectionRoute),
    NoTrade { from: String, to: String },
}

/// Drops anarchy systems from the path, sections it, gathers deviations per
/// section, and scores each section's best leg(s).
pub fn plan_trade(
    database: &mut RuntimeDatabase,
    provider: &dyn DataProvider,
    system_route: &[SystemIdx],
    min_hop: usize,
    deviation_mult: f64,
    jump_capacity: f64,
    cargo_space: i64,
) -> Result<Vec<SectionOutcome>> {
    let filtered = filter_non_anarchy(database, provider, system_route);
    let mut sections = section_route(&filtered, min_hop);

    let mut outcomes = Vec::with_capacity(sections.len());
    let section_count = sections.len();
    for i in 0..section_count {
        if sections[i].is_empty() {
            continue;
        }
        let section = sections[i].clone();
        debug!("planning trade for section of {} systems", section.len());

        let first = *section.first().unwrap();
        let last = *section.last().unwrap();
        database.ensure_stations(provider, first)?;
        database.ensure_stations(provider, last)?;

        let mut deviations = Vec::new();
        if section.len() >= 3 {
            gather_deviations(
                database,
                provider,
                &section,
                deviation_mult,
                jump_capacity,
                &mut deviations,
            )?;
        }

        let outcome = match select_leg(database, first, last, &deviations, cargo_space) {
            Some(route) => SectionOutcome::Route(route),
            None => SectionOutcome::NoTrade {
                from: database.get(first).name.clone(),
                to: database.get(last).name.clone(),
            },
        };

        // Continuity: the next section picks up where this one's winning
        // route left off, so it starts from an isolated view pinned to the
        // to_station of this section's last leg.
        if let SectionOutcome::Route(route) = &outcome {
            if i + 1 < section_count && !sections[i + 1].is_empty() {
                if let Some(last_leg) = route.legs.last() {
                    if let Some(isolated) = database.get(last).isolated_to(&last_leg.to_station) {
                        let pinned_idx = database.push_detached(isolated);
                        sections[i + 1][0] = pinned_idx;
                    }
                }
            }
        }

        info!("section planned: {:?}", outcome_summary(&outcome));
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

fn outcome_summary(outcome: &SectionOutcome) -> String {
    match outcome {
        SectionOutcome::Route(route) => format!("{} ({})", route.label, route.total_profit),
        SectionOutcome::NoTrade { from, to } => format!("no trade {from} -> {to}"),
    }
}

fn filter_non_anarchy(
    database: &RuntimeDatabase,
    provider: &dyn DataProvider,
    system_route: &[SystemIdx],
) -> Vec<SystemIdx> {
    system_route
        .iter()
        .copied()
        .filter(|&idx| !provider.is_anarchy(&database.get(idx).name))
        .collect()
}

/// Partitions `path` into `min_hop` contiguous, boundary-overlapping
/// sections. `min_hop <= 1` yields a single section equal to the whole
/// path. If the computed section length would be zero, it's clamped to 1
/// and `min_hop` shrinks to `path.len()` — both quirks are spec-defined
/// (§4.5), as is the possibility of an empty trailing section, silently
/// skipped by the caller.
fn section_route(path: &[SystemIdx], min_hop: usize) -> Vec<Vec<SystemIdx>> {
    if min_hop <= 1 {
        return vec![path.to_vec()];
    }
    let mut section_length = path.len() / min_hop;
    let mut min_hop = min_hop;
    if section_length == 0 {
        section_length = 1;
        min_hop = path.len();
    }
    let mut sections = Vec::with_capacity(min_hop);
    for i in 0..min_hop {
        let start = i * section_length;
        if start >= path.len() {
            sections.push(Vec::new());
            continue;
        }
        let end = ((i + 1) * section_length + 1).min(path.len());
        sections.push(path[start..end].to_vec());
    }
    sections
}

/// For each interior system of a section, materializes its stations and
/// adds it as a deviation candidate; when `deviation_mult > 0`, also pulls
/// in systems within `jump_capacity * deviation_mult` of each interior
/// system that aren't already endpoints or accumulated deviations.
fn gather_deviations(
    database: &mut RuntimeDatabase,
    provider: &dyn DataProvider,
    section: &[SystemIdx],
    deviation_mult: f64,
    jump_capacity: f64,
    deviations: &mut Vec<SystemIdx>,
) -> Result<()> {
    let interior = &section[1..section.len() - 1];

    for &idx in interior {
        database.ensure_stations(provider, idx)?;
        deviations.push(idx);
    }

    if deviation_mult <= 0.0 {
        return Ok(());
    }

    let endpoint_names: HashSet<String> = [section.first(), section.last()]
        .into_iter()
        .flatten()
        .map(|&idx| database.get(idx).name.clone())
        .collect();

    for &idx in interior {
        let system_name = database.get(idx).name.clone();
        let radius = jump_capacity * deviation_mult;
        let hits = database.warm_radius_query(
            RadiusOrigin::Named(&system_name),
            radius,
            None,
            false,
            provider,
        );
        for hit_idx in hits {
            let hit_name = database.get(hit_idx).name.clone();
            let already_known = endpoint_names.contains(&hit_name)
                || deviations.iter().any(|&d| database.get(d).name == hit_name);
            if already_known {
                continue;
            }
            database.ensure_stations(provider, hit_idx)?;
            deviations.push(hit_idx);
        }
    }

    Ok(())
}

/// Builds every direct A-station → B-station candidate leg with a
/// strictly positive manifest profit.
fn direct_legs(
    database: &RuntimeDatabase,
    from: SystemIdx,
    to: SystemIdx,
    cargo_space: i64,
) -> Vec<RouteLeg> {
    let from_system = database.get(from);
    let to_system = database.get(to);
    let mut legs = Vec::new();
    for (from_station, to_station) in iproduct!(&from_system.stations, &to_system.stations) {
        let (picks, profit) = pick_manifest(from_station, to_station, cargo_space);
        if profit > 0 {
            legs.push(RouteLeg {
                from_system: from_system.name.clone(),
                from_station: from_station.name.clone(),
                to_system: to_system.name.clone(),
                to_station: to_station.name.clone(),
                picks,
                profit,
            });
        }
    }
    legs
}

/// First-occurrence-of-maximum selection, matching the source's strict
/// `>` comparison against a running best (a tie keeps the first winner).
fn pick_best_leg(legs: &[RouteLeg]) -> Option<RouteLeg> {
    let mut best: Option<&RouteLeg> = None;
    for leg in legs {
        let better = match best {
            None => true,
            Some(b) => leg.profit > b.profit,
        };
        if better {
            best = Some(leg);
        }
    }
    best.cloned()
}

fn pick_best_section(sections: &[SectionRoute]) -> Option<SectionRoute> {
    let mut best: Option<&SectionRoute> = None;
    for section in sections {
        let better = match best {
            None => true,
            Some(b) => section.total_profit > b.total_profit,
        };
        if better {
            best = Some(section);
        }
    }
    best.cloned()
}

/// Picks the best station-to-station route for a section, trying direct
/// A→B legs and A→deviation→B chains, and returning whichever wins per the
/// 3x deviation gate (spec §4.5).
fn select_leg(
    database: &mut RuntimeDatabase,
    from: SystemIdx,
    to: SystemIdx,
    deviations: &[SystemIdx],
    cargo_space: i64,
) -> Option<SectionRoute> {
    let direct = pick_best_leg(&direct_legs(database, from, to, cargo_space));
    let direct_route = direct.map(|leg| SectionRoute {
        label: format!(
            "{}/{} -> {}/{}",
            leg.from_system, leg.from_station, leg.to_system, leg.to_station
        ),
        total_profit: leg.profit,
        legs: vec![leg],
    });

    if deviations.is_empty() {
        return direct_route;
    }

    let mut combined = Vec::new();
    for &deviate in deviations {
        for first_leg in direct_legs(database, from, deviate, cargo_space) {
            let Some(deviate_system) = database.get(deviate).isolated_to(&first_leg.to_station)
            else {
                continue;
            };
            let isolated_idx = database.push_detached(deviate_system);
            for second_leg in direct_legs(database, isolated_idx, to, cargo_space) {
                let label = format!(
                    "{}/{} -> {}/{} -> {}/{}",
                    first_leg.from_system,
                    first_leg.from_station,
                    first_leg.to_system,
                    first_leg.to_station,
                    second_leg.to_system,
                    second_leg.to_station,
                );
                let total_profit = first_leg.profit + second_leg.profit;
                combined.push(SectionRoute {
                    label,
                    legs: vec![first_leg.clone(), second_leg],
                    total_profit,
                });
            }
        }
    }
    let deviated_route = pick_best_section(&combined);

    match (direct_route, deviated_route) {
        (Some(direct), Some(deviated)) => {
            if deviated.total_profit > direct.total_profit * 3 {
                Some(deviated)
            } else {
                Some(direct)
            }
        }
        (None, Some(deviated)) => Some(deviated),
        (direct, None) => direct,
    }
}

/// Greedy, cargo-filling manifest picker. Repeatedly takes the commodity
/// maximizing per-unit profit between the two stations, loads
/// `min(available stock, remaining cargo)` of it, and decrements remaining
/// cargo by the *station's full stock* rather than the amount actually
/// loaded — preserved verbatim per §9's open question, even though it
/// means an under-filled hold can still end the search early.
fn pick_manifest(
    from_station: &Station,
    to_station: &Station,
    cargo_space: i64,
) -> (Vec<ManifestPick>, i64) {
    let mut excluded: ExclusionSet = ExclusionSet::new();
    let mut picks = Vec::new();
    let mut profit = 0i64;
    let mut remaining = cargo_space;

    while let Some((stock_entry, per_unit_profit)) =
        highest_profit_commodity(&from_station.market, &to_station.market, &excluded)
    {
        let count = remaining.min(stock_entry.stock);
        let pick_profit = per_unit_profit * count;
        picks.push(ManifestPick {
            commodity_id: stock_entry.id.clone(),
            display_name: stock_entry.name.clone(),
            count,
            profit: pick_profit,
        });
        profit += pick_profit;
        remaining -= stock_entry.stock;

        if remaining > 0 {
            excluded.insert(stock_entry.id.clone());
        } else {
            break;
        }
    }

    (picks, profit)
}
