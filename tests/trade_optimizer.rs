mod common;

use caravan::cache::RuntimeDatabase;
use caravan::model::System;
use caravan::trade::{plan_trade, SectionOutcome};

use crate::common::{coords, deviation_gate_provider, manifest_scenario_provider};

fn route_of(outcome: &SectionOutcome) -> &caravan::model::SectionRoute {
    match outcome {
        SectionOutcome::Route(route) => route,
        SectionOutcome::NoTrade { from, to } => {
            panic!("expected a trade route, got NoTrade {from} -> {to}")
        }
    }
}

/// Scenario 4 (spec §8): cargo exhausted after a single commodity, even
/// though a second commodity would have been profitable too.
#[test]
fn manifest_picking_stops_when_cargo_exhausted() {
    let provider = manifest_scenario_provider();
    let mut database = RuntimeDatabase::new();
    let source = database.add_system(System::new(
        "Source".to_string(),
        coords(0.0, 0.0, 0.0),
        None,
    ));
    let sink = database.add_system(System::new("Sink".to_string(), coords(5.0, 0.0, 0.0), None));

    let outcomes = plan_trade(&mut database, &provider, &[source, sink], 1, 0.0, 10.0, 25).unwrap();
    assert_eq!(outcomes.len(), 1);
    let route = route_of(&outcomes[0]);

    assert_eq!(route.total_profit, 1250);
    assert_eq!(route.legs.len(), 1);
    assert_eq!(route.legs[0].picks.len(), 1);
    assert_eq!(route.legs[0].picks[0].commodity_id, "X");
    assert_eq!(route.legs[0].picks[0].count, 25);
}

/// Scenario 5 (spec §8): cargo large enough that the first commodity's full
/// stock doesn't exhaust the hold, so a second, lower-profit commodity is
/// picked for the remainder.
#[test]
fn manifest_picking_overflows_into_a_second_commodity() {
    let provider = manifest_scenario_provider();
    let mut database = RuntimeDatabase::new();
    let source = database.add_system(System::new(
        "Source".to_string(),
        coords(0.0, 0.0, 0.0),
        None,
    ));
    let sink = database.add_system(System::new("Sink".to_string(), coords(5.0, 0.0, 0.0), None));

    let outcomes = plan_trade(&mut database, &provider, &[source, sink], 1, 0.0, 10.0, 40).unwrap();
    let route = route_of(&outcomes[0]);

    assert_eq!(route.total_profit, 1800);
    let picks = &route.legs[0].picks;
    assert_eq!(picks.len(), 2);
    assert_eq!(
        (
            picks[0].commodity_id.as_str(),
            picks[0].count,
            picks[0].profit
        ),
        ("X", 30, 1500)
    );
    assert_eq!(
        (
            picks[1].commodity_id.as_str(),
            picks[1].count,
            picks[1].profit
        ),
        ("Y", 10, 300)
    );
}

/// No single commodity's manifest pick ever exceeds the cargo capacity
/// handed to `plan_trade`, across a spread of cargo sizes.
#[test]
fn manifest_never_exceeds_cargo_capacity() {
    let provider = manifest_scenario_provider();
    for cargo in [1, 5, 25, 30, 40, 1000] {
        let mut database = RuntimeDatabase::new();
        let source = database.add_system(System::new(
            "Source".to_string(),
            coords(0.0, 0.0, 0.0),
            None,
        ));
        let sink =
            database.add_system(System::new("Sink".to_string(), coords(5.0, 0.0, 0.0), None));
        let outcomes = plan_trade(
            &mut database,
            &provider,
            &[source, sink],
            1,
            0.0,
            10.0,
            cargo,
        )
        .unwrap();
        if let SectionOutcome::Route(route) = &outcomes[0] {
            for leg in &route.legs {
                for pick in &leg.picks {
                    assert!(
                        pick.count <= cargo,
                        "pick {:?} exceeded cargo {cargo}",
                        pick
                    );
                    assert!(
                        pick.profit > 0,
                        "pick {:?} was not strictly profitable",
                        pick
                    );
                }
            }
        }
    }
}

/// Scenario 6 (spec §8), direct-kept case: deviated profit of 2500 does not
/// clear 3x the direct best of 1000, so the direct route wins.
#[test]
fn deviation_gate_keeps_direct_when_not_triple() {
    let provider = deviation_gate_provider(15, 10);
    let mut database = RuntimeDatabase::new();
    let a = database.add_system(System::new("A".to_string(), coords(0.0, 0.0, 0.0), None));
    let m = database.add_system(System::new("M".to_string(), coords(3.0, 0.0, 0.0), None));
    let b = database.add_system(System::new("B".to_string(), coords(6.0, 0.0, 0.0), None));

    let outcomes = plan_trade(&mut database, &provider, &[a, m, b], 1, 0.0, 10.0, 100).unwrap();
    let route = route_of(&outcomes[0]);
    assert_eq!(route.total_profit, 1000);
    assert_eq!(route.legs.len(), 1);
}

/// Scenario 6, deviated-wins case: 3500 clears the 3x(1000) gate.
#[test]
fn deviation_gate_picks_deviated_when_triple() {
    let provider = deviation_gate_provider(20, 15);
    let mut database = RuntimeDatabase::new();
    let a = database.add_system(System::new("A".to_string(), coords(0.0, 0.0, 0.0), None));
    let m = database.add_system(System::new("M".to_string(), coords(3.0, 0.0, 0.0), None));
    let b = database.add_system(System::new("B".to_string(), coords(6.0, 0.0, 0.0), None));

    let outcomes = plan_trade(&mut database, &provider, &[a, m, b], 1, 0.0, 10.0, 100).unwrap();
    let route = route_of(&outcomes[0]);
    assert_eq!(route.total_profit, 3500);
    assert_eq!(route.legs.len(), 2);
}

/// Scenario 3 (spec §8): sectioning a 3-system path with `min_hop = 2`
/// yields two sections overlapping on the middle system.
#[test]
fn min_hop_sections_overlap_on_shared_boundary() {
    let provider = common::colinear_three_system_provider();
    let mut database = RuntimeDatabase::new();
    let alpha = database.add_system(System::new(
        "Alpha".to_string(),
        coords(0.0, 0.0, 0.0),
        None,
    ));
    let gamma = database.add_system(System::new(
        "Gamma".to_string(),
        coords(6.0, 0.0, 0.0),
        None,
    ));
    let beta = database.add_system(System::new(
        "Beta".to_string(),
        coords(12.0, 0.0, 0.0),
        None,
    ));

    let outcomes = plan_trade(
        &mut database,
        &provider,
        &[alpha, gamma, beta],
        2,
        0.0,
        7.0,
        10,
    )
    .unwrap();
    assert_eq!(outcomes.len(), 2);
}
