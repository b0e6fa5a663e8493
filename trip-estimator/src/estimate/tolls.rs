//! Toll plaza reconciliation.
//!
//! Live toll data comes from the provider's along-route POI search, which is
//! noisy in two ways:
//! - categorisation is inconsistent, so a label containing "toll" also
//!   counts as a plaza
//! - one physical plaza is often reported twice (once per carriageway), so
//!   plazas closer than a window along the route are collapsed
//!
//! When the lookup fails the count falls back to one plaza per fixed
//! distance. Reconciliation itself never fails.

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::{Coordinate, PoiRecord, RouteResult};

use super::config::EstimatorConfig;
use super::engine::TollProvider;

/// Provider category code for toll booths.
const TOLL_BOOTH_CATEGORY: &str = "TOLBRD";

/// Average per-plaza toll by axle count. Four or more axles share a rate.
const TOLL_RATES: &[(u32, u32)] = &[(2, 105), (3, 170), (4, 265)];

/// Where the toll count came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TollSource {
    /// Reconciled from the provider's POI search.
    Live,
    /// Estimated from route distance because the lookup failed.
    Heuristic,
}

impl TollSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TollSource::Live => "live",
            TollSource::Heuristic => "heuristic",
        }
    }
}

/// A toll plaza on the route.
#[derive(Debug, Clone, PartialEq)]
pub struct TollCandidate {
    pub name: String,
    pub address: String,
    pub distance_into_route_meters: f64,
    pub coordinate: Option<Coordinate>,
}

impl TollCandidate {
    fn from_poi(poi: PoiRecord) -> Self {
        Self {
            name: poi
                .name
                .or(poi.popular_name)
                .unwrap_or_else(|| "Toll Plaza".to_string()),
            address: poi.address.unwrap_or_default(),
            distance_into_route_meters: poi.distance_meters,
            coordinate: poi.coordinate,
        }
    }
}

/// Toll count and cost for one route.
#[derive(Debug, Clone, PartialEq)]
pub struct TollResult {
    pub count: u32,
    pub cost_per_unit: u32,
    pub total_cost: u64,
    /// Empty when the count is heuristic.
    pub candidates: Vec<TollCandidate>,
    pub source: TollSource,
}

impl TollResult {
    fn live(candidates: Vec<TollCandidate>, cost_per_unit: u32) -> Self {
        let count = candidates.len() as u32;
        Self {
            count,
            cost_per_unit,
            total_cost: u64::from(count) * u64::from(cost_per_unit),
            candidates,
            source: TollSource::Live,
        }
    }

    fn heuristic(count: u32, cost_per_unit: u32) -> Self {
        Self {
            count,
            cost_per_unit,
            total_cost: u64::from(count) * u64::from(cost_per_unit),
            candidates: Vec::new(),
            source: TollSource::Heuristic,
        }
    }
}

/// Per-plaza toll for a vehicle with the given number of axles.
pub fn rate_for_axles(axle_count: u32) -> u32 {
    let key = axle_count.min(4);
    TOLL_RATES
        .iter()
        .find(|(axles, _)| *axles == key)
        .map(|(_, rate)| *rate)
        .unwrap_or(TOLL_RATES[0].1)
}

/// Whether a POI looks like a toll booth.
pub fn is_toll_booth(poi: &PoiRecord) -> bool {
    poi.category.as_deref() == Some(TOLL_BOOTH_CATEGORY)
        || poi
            .name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains("toll"))
}

/// Collapse near-duplicate plazas, keeping the first seen.
///
/// Single greedy pass in input order: a candidate is kept only if no
/// already-kept candidate lies strictly within `window_meters` of it.
pub fn dedup_candidates(
    candidates: impl IntoIterator<Item = TollCandidate>,
    window_meters: f64,
) -> Vec<TollCandidate> {
    let mut unique: Vec<TollCandidate> = Vec::new();
    for candidate in candidates {
        let duplicate = unique.iter().any(|kept| {
            (kept.distance_into_route_meters - candidate.distance_into_route_meters).abs()
                < window_meters
        });
        if !duplicate {
            unique.push(candidate);
        }
    }
    unique
}

/// Fallback plaza count: one per `spacing_km`, rounded down.
pub fn heuristic_count(distance_km: f64, spacing_km: f64) -> u32 {
    let count = (distance_km / spacing_km).floor();
    if count.is_finite() && count > 0.0 {
        count as u32
    } else {
        0
    }
}

/// Reconcile live toll data into a priced result.
pub fn reconcile(pois: Vec<PoiRecord>, axle_count: u32, window_meters: f64) -> TollResult {
    let candidates = pois
        .into_iter()
        .filter(is_toll_booth)
        .map(TollCandidate::from_poi);

    TollResult::live(
        dedup_candidates(candidates, window_meters),
        rate_for_axles(axle_count),
    )
}

/// Look up and price the tolls on a route.
///
/// Any lookup failure, including exceeding the call timeout, degrades to the
/// distance heuristic.
pub async fn estimate_tolls<P: TollProvider>(
    provider: &P,
    route: &RouteResult,
    axle_count: u32,
    config: &EstimatorConfig,
) -> TollResult {
    let lookup = timeout(
        config.call_timeout,
        provider.pois_along(&route.geometry, config.toll_buffer_meters),
    )
    .await;

    let failure = match lookup {
        Ok(Ok(pois)) => {
            let result = reconcile(pois, axle_count, config.toll_dedup_window_meters);
            debug!(plazas = result.count, "reconciled live toll data");
            return result;
        }
        Ok(Err(e)) => e.to_string(),
        Err(_) => format!("timed out after {:?}", config.call_timeout),
    };

    let count = heuristic_count(route.distance_km(), config.heuristic_toll_spacing_km);
    warn!(
        error = %failure,
        estimated_plazas = count,
        "toll lookup failed, using distance heuristic"
    );
    TollResult::heuristic(count, rate_for_axles(axle_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, distance: f64) -> TollCandidate {
        TollCandidate {
            name: name.to_string(),
            address: String::new(),
            distance_into_route_meters: distance,
            coordinate: None,
        }
    }

    fn names(candidates: &[TollCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn rates_by_axle_count() {
        assert_eq!(rate_for_axles(2), 105);
        assert_eq!(rate_for_axles(3), 170);
        assert_eq!(rate_for_axles(4), 265);
        assert_eq!(rate_for_axles(6), 265);
        assert_eq!(rate_for_axles(1), 105);
        assert_eq!(rate_for_axles(0), 105);
    }

    #[test]
    fn toll_booth_detection() {
        assert!(is_toll_booth(&PoiRecord::new(Some("Plaza"), Some("TOLBRD"), 0.0)));
        assert!(is_toll_booth(&PoiRecord::new(Some("NH48 TOLL Plaza"), Some("FUEL"), 0.0)));
        assert!(is_toll_booth(&PoiRecord::new(Some("Tollgate"), None, 0.0)));
        assert!(!is_toll_booth(&PoiRecord::new(Some("Dhaba"), Some("FODCOF"), 0.0)));
        assert!(!is_toll_booth(&PoiRecord::new(None, None, 0.0)));
    }

    #[test]
    fn candidate_name_fallbacks() {
        let mut poi = PoiRecord::new(None, Some("TOLBRD"), 10.0);
        poi.popular_name = Some("Kherki Daula".into());
        assert_eq!(TollCandidate::from_poi(poi).name, "Kherki Daula");

        let poi = PoiRecord::new(None, Some("TOLBRD"), 10.0);
        let c = TollCandidate::from_poi(poi);
        assert_eq!(c.name, "Toll Plaza");
        assert_eq!(c.address, "");
    }

    #[test]
    fn exact_duplicates_collapse() {
        let unique = dedup_candidates(
            vec![candidate("a", 1000.0), candidate("b", 1000.0)],
            500.0,
        );
        assert_eq!(names(&unique), ["a"]);
    }

    #[test]
    fn window_boundary() {
        let unique = dedup_candidates(vec![candidate("a", 0.0), candidate("b", 499.0)], 500.0);
        assert_eq!(names(&unique), ["a"]);

        let unique = dedup_candidates(vec![candidate("a", 0.0), candidate("b", 500.0)], 500.0);
        assert_eq!(names(&unique), ["a", "b"]);
    }

    #[test]
    fn dedup_is_greedy_against_kept_candidates() {
        // b is dropped as a duplicate of a; c is 600 from a and only compared
        // against kept candidates, so it survives even though it is 300 from b.
        let unique = dedup_candidates(
            vec![candidate("a", 0.0), candidate("b", 300.0), candidate("c", 600.0)],
            500.0,
        );
        assert_eq!(names(&unique), ["a", "c"]);
    }

    #[test]
    fn dedup_keeps_provider_order_not_distance_order() {
        let unique = dedup_candidates(
            vec![candidate("late", 5000.0), candidate("early", 100.0), candidate("dup", 4800.0)],
            500.0,
        );
        assert_eq!(names(&unique), ["late", "early"]);
    }

    #[test]
    fn heuristic_counts() {
        assert_eq!(heuristic_count(180.0, 60.0), 3);
        assert_eq!(heuristic_count(179.9, 60.0), 2);
        assert_eq!(heuristic_count(59.0, 60.0), 0);
        assert_eq!(heuristic_count(0.0, 60.0), 0);
        assert_eq!(heuristic_count(100.0, 0.0), 0);
    }

    #[test]
    fn reconcile_filters_dedups_and_prices() {
        let pois = vec![
            PoiRecord::new(Some("Plaza A"), Some("TOLBRD"), 10_000.0),
            PoiRecord::new(Some("Plaza A (return)"), Some("TOLBRD"), 10_300.0),
            PoiRecord::new(Some("Highway Dhaba"), Some("FODCOF"), 20_000.0),
            PoiRecord::new(Some("Manesar Toll"), None, 40_000.0),
        ];

        let result = reconcile(pois, 3, 500.0);
        assert_eq!(result.count, 2);
        assert_eq!(result.cost_per_unit, 170);
        assert_eq!(result.total_cost, 340);
        assert_eq!(result.source, TollSource::Live);
        assert_eq!(names(&result.candidates), ["Plaza A", "Manesar Toll"]);
    }

    #[test]
    fn non_toll_pois_are_not_used_for_dedup() {
        // The dhaba sits within the window of the plaza but is filtered first.
        let pois = vec![
            PoiRecord::new(Some("Highway Dhaba"), Some("FODCOF"), 10_000.0),
            PoiRecord::new(Some("Plaza"), Some("TOLBRD"), 10_200.0),
        ];
        let result = reconcile(pois, 2, 500.0);
        assert_eq!(names(&result.candidates), ["Plaza"]);
    }

    #[test]
    fn source_labels() {
        assert_eq!(TollSource::Live.as_str(), "live");
        assert_eq!(TollSource::Heuristic.as_str(), "heuristic");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn candidates(distances: &[f64]) -> Vec<TollCandidate> {
        distances
            .iter()
            .enumerate()
            .map(|(i, d)| TollCandidate {
                name: format!("plaza-{i}"),
                address: String::new(),
                distance_into_route_meters: *d,
                coordinate: None,
            })
            .collect()
    }

    proptest! {
        /// Kept plazas are pairwise at least one window apart.
        #[test]
        fn kept_plazas_are_separated(distances in prop::collection::vec(0.0f64..200_000.0, 0..40)) {
            let unique = dedup_candidates(candidates(&distances), 500.0);
            for (i, a) in unique.iter().enumerate() {
                for b in &unique[i + 1..] {
                    prop_assert!(
                        (a.distance_into_route_meters - b.distance_into_route_meters).abs() >= 500.0
                    );
                }
            }
        }

        /// Every dropped plaza is within the window of an earlier kept one.
        #[test]
        fn dropped_plazas_have_an_earlier_twin(distances in prop::collection::vec(0.0f64..200_000.0, 0..40)) {
            let input = candidates(&distances);
            let unique = dedup_candidates(input.clone(), 500.0);

            for (i, c) in input.iter().enumerate() {
                if unique.iter().any(|u| u.name == c.name) {
                    continue;
                }
                let twin = input[..i].iter().any(|earlier| {
                    unique.iter().any(|u| u.name == earlier.name)
                        && (earlier.distance_into_route_meters - c.distance_into_route_meters).abs() < 500.0
                });
                prop_assert!(twin, "{} dropped without a kept twin", c.name);
            }
        }

        /// Output preserves the input's relative order.
        #[test]
        fn order_is_preserved(distances in prop::collection::vec(0.0f64..200_000.0, 0..40)) {
            let input = candidates(&distances);
            let unique = dedup_candidates(input.clone(), 500.0);
            let positions: Vec<usize> = unique
                .iter()
                .map(|u| input.iter().position(|c| c.name == u.name).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
