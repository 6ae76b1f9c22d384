use omnibus::catalog::{BusSpec, Catalog, StopSpec};
use omnibus::geo::Coordinates;
use omnibus::model::BusRequest;
use omnibus::persist;
use omnibus::render::{MapRenderer, RenderSettings, svg};
use omnibus::routing::{RoutingSettings, TransportRouter};
use std::env;
use std::fs;
use std::path::PathBuf;

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

fn settings() -> RenderSettings {
    RenderSettings {
        width: 600.0,
        height: 400.0,
        padding: 50.0,
        line_width: 14.0,
        stop_radius: 5.0,
        bus_label_font_size: 20,
        bus_label_offset: [7.0, 15.0],
        stop_label_font_size: 18,
        stop_label_offset: [7.0, -3.0],
        underlayer_color: svg::Color::Named("white".to_string()),
        underlayer_width: 3.0,
        color_palette: vec![
            svg::Color::Named("green".to_string()),
            svg::Color::Rgb(svg::Rgb {
                red: 255,
                green: 160,
                blue: 0,
            }),
            svg::Color::Rgba(svg::Rgba {
                red: 255,
                green: 200,
                blue: 80,
                opacity: 0.85,
            }),
        ],
    }
}

fn build_state() -> (Catalog, MapRenderer, TransportRouter) {
    let catalog = Catalog::build(
        vec![
            stop("A", 55.0, 37.0, &[("B", 1000)]),
            stop("B", 55.1, 37.0, &[("C", 1000), ("A", 800)]),
            stop("C", 55.2, 37.0, &[]),
            stop("Island", 56.0, 38.0, &[]),
        ],
        vec![
            bus("1", &["A", "B", "C"], false),
            bus("2", &["A", "B", "A"], true),
        ],
    )
    .unwrap();
    let renderer = MapRenderer::new(settings(), &catalog);
    let router = TransportRouter::build(RoutingSettings::new(6, 30.0).unwrap(), &catalog);
    (catalog, renderer, router)
}

fn artifact_path(name: &str) -> PathBuf {
    env::temp_dir().join(format!("omnibus_{name}.db"))
}

#[test]
fn catalog_roundtrip_test() {
    let (catalog, renderer, router) = build_state();
    let path = artifact_path("catalog_roundtrip");
    persist::save(&path, &catalog, &renderer, &router).unwrap();
    let loaded = persist::load(&path).unwrap();

    assert_eq!(loaded.catalog.stops().len(), catalog.stops().len());
    for (original, restored) in catalog.stops().iter().zip(loaded.catalog.stops()) {
        assert_eq!(original.index, restored.index);
        assert_eq!(original.name, restored.name);
        assert_eq!(original.coordinates, restored.coordinates);
    }
    assert_eq!(loaded.catalog.buses().len(), catalog.buses().len());
    for (original, restored) in catalog.buses().iter().zip(loaded.catalog.buses()) {
        assert_eq!(original.name, restored.name);
        assert_eq!(original.stops, restored.stops);
        assert_eq!(original.is_roundtrip, restored.is_roundtrip);
    }
    for from in 0..catalog.stop_count() as u32 {
        for to in 0..catalog.stop_count() as u32 {
            assert_eq!(
                catalog.distance(from, to),
                loaded.catalog.distance(from, to),
                "distance ({from}, {to})"
            );
        }
    }
    assert_eq!(
        catalog.buses_at_stop("B").unwrap(),
        loaded.catalog.buses_at_stop("B").unwrap()
    );
}

#[test]
fn renderer_roundtrip_test() {
    let (catalog, renderer, router) = build_state();
    let path = artifact_path("renderer_roundtrip");
    persist::save(&path, &catalog, &renderer, &router).unwrap();
    let loaded = persist::load(&path).unwrap();

    assert_eq!(&renderer, &loaded.renderer);
    assert_eq!(renderer.render(&catalog), loaded.renderer.render(&loaded.catalog));
}

#[test]
fn router_roundtrip_test() {
    let (catalog, renderer, router) = build_state();
    let path = artifact_path("router_roundtrip");
    persist::save(&path, &catalog, &renderer, &router).unwrap();
    let loaded = persist::load(&path).unwrap();

    assert_eq!(loaded.router.settings(), router.settings());
    assert_eq!(loaded.router.graph(), router.graph());
    assert_eq!(loaded.router.stop_names(), router.stop_names());
    assert_eq!(loaded.router.routes(), router.routes());
}

#[test]
fn unreachable_cells_survive_roundtrip_test() {
    // "Island" is disconnected, so its matrix rows and columns hold unset
    // cells; the restored table must keep the same shape and gaps.
    let (catalog, renderer, router) = build_state();
    let path = artifact_path("unreachable_cells");
    persist::save(&path, &catalog, &renderer, &router).unwrap();
    let loaded = persist::load(&path).unwrap();

    let original = router.routes().data();
    let restored = loaded.router.routes().data();
    assert_eq!(original.len(), restored.len());
    let island = catalog.find_stop("Island").unwrap().index as usize;
    let a = catalog.find_stop("A").unwrap().index as usize;
    assert!(original[2 * a][2 * island].is_none());
    assert!(restored[2 * a][2 * island].is_none());
    assert!(restored[2 * island][2 * island].is_some());
}

#[test]
fn same_answer_after_reload_test() {
    let (catalog, renderer, router) = build_state();
    let path = artifact_path("same_answer");
    let before = router.route("A", "C").unwrap();
    persist::save(&path, &catalog, &renderer, &router).unwrap();
    let loaded = persist::load(&path).unwrap();
    let after = loaded.router.route("A", "C").unwrap();
    assert_eq!(before, after);
}

#[test]
fn deterministic_artifact_test() {
    let (catalog, renderer, router) = build_state();
    let first = artifact_path("determinism_first");
    let second = artifact_path("determinism_second");
    persist::save(&first, &catalog, &renderer, &router).unwrap();

    let (catalog_again, renderer_again, router_again) = build_state();
    persist::save(&second, &catalog_again, &renderer_again, &router_again).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn missing_artifact_test() {
    let path = artifact_path("does_not_exist");
    let _ = fs::remove_file(&path);
    assert!(matches!(persist::load(&path), Err(persist::Error::Io(_))));
}

#[test]
fn truncated_artifact_test() {
    let (catalog, renderer, router) = build_state();
    let path = artifact_path("truncated");
    persist::save(&path, &catalog, &renderer, &router).unwrap();
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
    assert!(matches!(
        persist::load(&path),
        Err(persist::Error::Decode(_))
    ));
}
