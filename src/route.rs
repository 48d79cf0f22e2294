//! Route planner: finds a jump-connected path from origin to destination
//! through the neighbor graph, via iterative bidirectional BFS.

use std::collections::{HashMap, VecDeque};

use log::{debug, info};

use crate::cache::RuntimeDatabase;
use crate::error::{PlannerError, Result};
use crate::model::{System, SystemIdx};
use crate::provider::{DataProvider, RadiusOrigin};

/// The ordered system sequence connecting origin and destination, plus the
/// warmed cache it was found in (the trade optimizer continues using the
/// same cache).
pub struct RoutePlan {
    pub system_route: Vec<SystemIdx>,
    pub database: RuntimeDatabase,
}

/// Computes a jump-connected route between two named systems.
///
/// `min_range` is the minimum distance a single jump must cover (default
/// 0). When `calculate` is false, no search runs and the route is exactly
/// `[origin, destination]` — used when the caller wants a direct trade
/// between two endpoints with no intermediate hops.
pub fn plan_route(
    provider: &dyn DataProvider,
    origin_name: &str,
    dest_name: &str,
    jump_capacity: f64,
    min_range: f64,
    calculate: bool,
) -> Result<RoutePlan> {
    let mut database = RuntimeDatabase::new();

    let dest_coords = provider.coord(dest_name).ok_or_else(|| {
        PlannerError::DataMissing(format!("couldn't find target's coordinate: {dest_name}"))
    })?;
    let origin_coords = provider.coord(origin_name).ok_or_else(|| {
        PlannerError::DataMissing(format!("couldn't find current coordinate: {origin_name}"))
    })?;

    let origin_idx = database.add_system(System::new(origin_name.to_string(), origin_coords, None));
    let furthest_dist = origin_coords.euclid(&dest_coords);
    let dest_idx = database.add_system(System::new(
        dest_name.to_string(),
        dest_coords,
        Some(furthest_dist),
    ));

    if !calculate {
        return Ok(RoutePlan {
            system_route: vec![origin_idx, dest_idx],
            database,
        });
    }

    info!("preloading systems within {furthest_dist:.2} ly of {origin_name} and {dest_name}");
    for (name, origin) in [
        (origin_name, RadiusOrigin::Point(origin_coords)),
        (dest_name, RadiusOrigin::Point(dest_coords)),
    ] {
        debug!("preloading radius envelope around {name}");
        let hits = provider.systems_in_radius(origin, furthest_dist, None, true)?;
        for hit in hits {
            database.add_system(System::new(hit.name, hit.coords, Some(hit.distance)));
        }
    }
    database.warm = true;

    database.build_neighbors(jump_capacity, min_range);

    let system_route = match bidirectional_bfs(&database, origin_idx, dest_idx) {
        Some(route) => route,
        None => {
            return Err(PlannerError::NoRoute {
                from: origin_name.to_string(),
                to: dest_name.to_string(),
            })
        }
    };

    Ok(RoutePlan {
        system_route,
        database,
    })
}

/// Iterative bidirectional BFS: two frontier queues, two parent maps keyed
/// by `SystemIdx`, alternating one expansion step per side. Replaces the
/// source's recursive path search with shared mutable lists, per §9.
///
/// Returns `None` (search fails) if either queue empties without the two
/// frontiers meeting. Guarantees a minimum-hop-count path when one exists.
fn bidirectional_bfs(
    database: &RuntimeDatabase,
    start: SystemIdx,
    target: SystemIdx,
) -> Option<Vec<SystemIdx>> {
    if start == target {
        return Some(Vec::new());
    }

    let mut queue_start: VecDeque<SystemIdx> = VecDeque::from([start]);
    let mut queue_end: VecDeque<SystemIdx> = VecDeque::from([target]);
    let mut parent_start: HashMap<SystemIdx, Option<SystemIdx>> = HashMap::from([(start, None)]);
    let mut parent_end: HashMap<SystemIdx, Option<SystemIdx>> = HashMap::from([(target, None)]);

    while !queue_start.is_empty() && !queue_end.is_empty() {
        if let Some(meeting) =
            expand_frontier(database, &mut queue_start, &mut parent_start, &parent_end)
        {
            return Some(reconstruct(meeting, &parent_start, &parent_end));
        }
        if let Some(meeting) =
            expand_frontier(database, &mut queue_end, &mut parent_end, &parent_start)
        {
            return Some(reconstruct(meeting, &parent_start, &parent_end));
        }
    }

    None
}

/// Pops one node from `queue`, pushes its unvisited neighbors, and returns
/// the meeting point's index the moment a neighbor already visited by the
/// other side is found.
fn expand_frontier(
    database: &RuntimeDatabase,
    queue: &mut VecDeque<SystemIdx>,
    parents: &mut HashMap<SystemIdx, Option<SystemIdx>>,
    other_parents: &HashMap<SystemIdx, Option<SystemIdx>>,
) -> Option<SystemIdx> {
    let node = queue.pop_front()?;
    for &neighbor in &database.get(node).neighbors {
        if other_parents.contains_key(&neighbor) {
            parents.entry(neighbor).or_insert(Some(node));
            return Some(neighbor);
        }
        if let std::collections::hash_map::Entry::Vacant(e) = parents.entry(neighbor) {
            e.insert(Some(node));
            queue.push_back(neighbor);
        }
    }
    None
}

fn reconstruct(
    meeting: SystemIdx,
    parent_start: &HashMap<SystemIdx, Option<SystemIdx>>,
    parent_end: &HashMap<SystemIdx, Option<SystemIdx>>,
) -> Vec<SystemIdx> {
    let mut prefix = chain_to_root(meeting, parent_start);
    let mut suffix = chain_to_root(meeting, parent_end);
    suffix.reverse();
    suffix.remove(0); // drop the duplicated meeting point
    prefix.append(&mut suffix);
    prefix
}

fn chain_to_root(
    mut node: SystemIdx,
    parents: &HashMap<SystemIdx, Option<SystemIdx>>,
) -> Vec<SystemIdx> {
    let mut chain = vec![node];
    while let Some(&Some(parent)) = parents.get(&node) {
        chain.push(parent);
        node = parent;
    }
    chain.reverse();
    chain
}
