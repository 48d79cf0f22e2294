//! Planner facade: parses location strings, drives the route planner and
//! trade optimizer in sequence, and assembles the final textual report.

use std::fmt;

use log::info;

use crate::cache::RuntimeDatabase;
use crate::error::{PlannerError, Result};
use crate::model::SystemIdx;
use crate::provider::DataProvider;
use crate::route::plan_route;
use crate::trade::{plan_trade, SectionOutcome};

/// A user-supplied location, either a bare system name or `System/Station`.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub system: String,
    pub station: Option<String>,
}

/// Splits on the first `/` only, so station names that themselves contain a
/// slash are preserved verbatim in the station half.
pub fn parse_location(raw: &str) -> Result<Location> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(PlannerError::InputInvalid("location is empty".to_string()));
    }
    match raw.split_once('/') {
        Some((system, station)) => Ok(Location {
            system: system.trim().to_string(),
            station: Some(station.trim().to_string()),
        }),
        None => Ok(Location {
            system: raw.to_string(),
            station: None,
        }),
    }
}

/// Parameters controlling one planning run, gathered from the CLI.
pub struct PlanRequest<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub jump_range: f64,
    pub min_range: f64,
    pub min_hop: usize,
    pub deviation: f64,
    pub cargo: i64,
}

/// The full output of a planning run: origin/destination plus one outcome
/// per section.
pub struct PlannerReport {
    pub from: String,
    pub to: String,
    pub sections: Vec<SectionOutcome>,
}

impl fmt::Display for PlannerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Route: {} -> {}", self.from, self.to)?;
        for section in &self.sections {
            match section {
                SectionOutcome::Route(route) => write_route(f, route)?,
                SectionOutcome::NoTrade { from, to } => {
                    writeln!(f, "No Route found for {from} to {to}")?;
                }
            }
        }
        Ok(())
    }
}

/// Renders one section's stop chain. The profit shown at each non-first
/// stop is the profit earned by the immediately preceding leg, accumulated
/// while its BUY lines are emitted — not the section's grand total — per
/// the source's `previousProfit` bookkeeping in `parse_info`.
fn write_route(f: &mut fmt::Formatter<'_>, route: &crate::model::SectionRoute) -> fmt::Result {
    let stops = route.stops();
    let last = stops.len().saturating_sub(1);
    let mut previous_profit = 0i64;
    for (i, stop) in stops.iter().enumerate() {
        writeln!(f, "{stop}")?;
        if i > 0 {
            writeln!(f, "  Profit: {previous_profit}")?;
        }
        if i < last {
            previous_profit = 0;
            if let Some(leg) = route.legs.get(i) {
                for pick in &leg.picks {
                    writeln!(f, "   BUY {} x{}", pick.display_name, pick.count)?;
                    previous_profit += pick.profit;
                }
            }
        }
    }
    Ok(())
}

/// When a location names a specific station (`"System/Station"`), pins that
/// endpoint's `station_names` to the single named station so materialization
/// scans only that docking point, mirroring the source's
/// `firstSystem.stationToScan = [curStation]` / `lastSystem.stationToScan =
/// [targetStation]`, instead of letting the provider enumerate every
/// tradeable station in the system.
fn pin_endpoint_station(
    database: &mut RuntimeDatabase,
    system_route: &[SystemIdx],
    is_origin: bool,
    location: &Location,
) {
    let Some(station) = &location.station else {
        return;
    };
    let idx = if is_origin {
        system_route.first()
    } else {
        system_route.last()
    };
    if let Some(&idx) = idx {
        database.get_mut(idx).station_names = vec![station.clone()];
    }
}

/// Runs the full planning pipeline: resolve the jump route, then optimize
/// trade section by section.
pub fn plan(provider: &dyn DataProvider, request: &PlanRequest<'_>) -> Result<PlannerReport> {
    if request.jump_range <= 0.0 {
        return Err(PlannerError::InputInvalid(format!(
            "jump range must be positive, got {}",
            request.jump_range
        )));
    }
    if request.min_range < 0.0 {
        return Err(PlannerError::InputInvalid(format!(
            "min range must not be negative, got {}",
            request.min_range
        )));
    }
    if request.deviation < 0.0 {
        return Err(PlannerError::InputInvalid(format!(
            "deviation must not be negative, got {}",
            request.deviation
        )));
    }
    if request.cargo <= 0 {
        return Err(PlannerError::InputInvalid(format!(
            "cargo space must be positive, got {}",
            request.cargo
        )));
    }

    let origin = parse_location(request.from)?;
    let destination = parse_location(request.to)?;

    info!(
        "planning route from {} to {} (jump range {} ly)",
        origin.system, destination.system, request.jump_range
    );

    let route_plan = plan_route(
        provider,
        &origin.system,
        &destination.system,
        request.jump_range,
        request.min_range,
        true,
    )?;

    let mut database = route_plan.database;
    pin_endpoint_station(&mut database, &route_plan.system_route, true, &origin);
    pin_endpoint_station(&mut database, &route_plan.system_route, false, &destination);

    let sections = plan_trade(
        &mut database,
        provider,
        &route_plan.system_route,
        request.min_hop,
        request.deviation,
        request.jump_range,
        request.cargo,
    )?;

    Ok(PlannerReport {
        from: origin.system,
        to: destination.system,
        sections,
    })
}
