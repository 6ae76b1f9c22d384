use omnibus::catalog::{BusSpec, Catalog, StopSpec};
use omnibus::geo::Coordinates;
use omnibus::model::BusRequest;
use omnibus::routing::{RouteItem, RoutingSettings, TransportRouter};

fn stop(name: &str, lat: f64, lng: f64, distances: &[(&str, u32)]) -> StopSpec {
    StopSpec {
        name: name.to_string(),
        coordinates: Coordinates::new(lat, lng),
        road_distances: distances
            .iter()
            .map(|(to, meters)| (to.to_string(), *meters))
            .collect(),
    }
}

fn bus(name: &str, stops: &[&str], is_roundtrip: bool) -> BusSpec {
    BusSpec::from(BusRequest {
        name: name.to_string(),
        is_roundtrip,
        stops: stops.iter().map(|stop| stop.to_string()).collect(),
    })
}

fn linear_router() -> (Catalog, TransportRouter) {
    let catalog = Catalog::build(
        vec![
            stop("A", 55.0, 37.0, &[("B", 1000)]),
            stop("B", 55.1, 37.0, &[("C", 1000)]),
            stop("C", 55.2, 37.0, &[]),
            stop("Island", 56.0, 38.0, &[]),
        ],
        vec![bus("1", &["A", "B", "C"], false)],
    )
    .unwrap();
    let router = TransportRouter::build(RoutingSettings::new(6, 30.0).unwrap(), &catalog);
    (catalog, router)
}

#[test]
fn single_ride_route_test() {
    let (_, router) = linear_router();
    let itinerary = router.route("A", "C").unwrap();

    assert_eq!(itinerary.items.len(), 2);
    assert!(
        matches!(&itinerary.items[0], RouteItem::Wait { stop_name, time } if stop_name.as_ref() == "A" && *time == 6.0)
    );
    assert!(matches!(
        &itinerary.items[1],
        RouteItem::Ride { bus, span_count: 2, time } if bus.as_ref() == "1" && *time == 4.0
    ));
    assert!((itinerary.total_time - 10.0).abs() < 1e-9);
}

#[test]
fn return_direction_route_test() {
    let (_, router) = linear_router();
    let itinerary = router.route("C", "A").unwrap();
    assert!((itinerary.total_time - 10.0).abs() < 1e-9);
}

#[test]
fn trivial_route_test() {
    let (_, router) = linear_router();
    let itinerary = router.route("B", "B").unwrap();
    assert!(itinerary.items.is_empty());
    assert_eq!(itinerary.total_time, 0.0);
}

#[test]
fn unroutable_pair_test() {
    let (_, router) = linear_router();
    assert!(router.route("A", "Island").is_none());
}

#[test]
fn unknown_stop_test() {
    let (_, router) = linear_router();
    assert!(router.route("A", "Z").is_none());
    assert!(router.route("Z", "A").is_none());
}

#[test]
fn first_item_is_wait_test() {
    let (catalog, router) = linear_router();
    for from in ["A", "B", "C"] {
        for to in ["A", "B", "C"] {
            let itinerary = router.route(from, to).unwrap();
            if let Some(first) = itinerary.items.first() {
                assert!(matches!(first, RouteItem::Wait { .. }));
            }
            assert!(itinerary.items.iter().all(|item| item.time() >= 0.0));
        }
    }
    assert_eq!(catalog.stop_count(), 4);
}

#[test]
fn transfer_beats_staying_aboard_test() {
    // An express line makes A->C cheap; reaching D still needs the local
    // line, so the best route transfers at C and pays a second wait.
    let catalog = Catalog::build(
        vec![
            stop("A", 55.0, 37.0, &[("B", 1000), ("C", 2200)]),
            stop("B", 55.1, 37.0, &[("C", 1000)]),
            stop("C", 55.2, 37.0, &[("D", 1000)]),
            stop("D", 55.3, 37.0, &[]),
        ],
        vec![
            bus("local", &["C", "D"], false),
            bus("express", &["A", "C"], false),
        ],
    )
    .unwrap();
    let router = TransportRouter::build(RoutingSettings::new(2, 30.0).unwrap(), &catalog);

    let itinerary = router.route("A", "D").unwrap();
    let rides: Vec<&str> = itinerary
        .items
        .iter()
        .filter_map(|item| match item {
            RouteItem::Ride { bus, .. } => Some(bus.as_ref()),
            RouteItem::Wait { .. } => None,
        })
        .collect();
    assert_eq!(rides, ["express", "local"]);
    // wait 2 + express 2200 m + wait 2 + local 1000 m, at 500 m/min
    assert!((itinerary.total_time - (2.0 + 4.4 + 2.0 + 2.0)).abs() < 1e-9);
    let summed: f64 = itinerary.items.iter().map(|item| item.time()).sum();
    assert!((summed - itinerary.total_time).abs() < 1e-9);
}
