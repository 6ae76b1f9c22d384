use omnibus::catalog::{BusSpec, Catalog, StopSpec};
use omnibus::geo::Coordinates;
use omnibus::model::BusRequest;
use omnibus::render::{MapRenderer, RenderSettings, svg};

fn stop(name: &str, lat: f64, lng: f64) -> StopSpec {
    StopSpec {
        name: name.to_string(),
        coordinates: Coordinates::new(lat, lng),
        road_distances: Vec::new(),
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
        underlayer_color: svg::Color::Rgba(svg::Rgba {
            red: 255,
            green: 255,
            blue: 255,
            opacity: 0.85,
        }),
        underlayer_width: 3.0,
        color_palette: vec![
            svg::Color::Named("green".to_string()),
            svg::Color::Rgb(svg::Rgb {
                red: 255,
                green: 160,
                blue: 0,
            }),
        ],
    }
}

fn two_line_catalog() -> Catalog {
    // "9" is ingested before "1" so lexicographic render order differs from
    // ingestion order.
    Catalog::build(
        vec![
            stop("A", 55.0, 37.0),
            stop("B", 55.1, 37.1),
            stop("C", 55.2, 37.2),
        ],
        vec![
            bus("9", &["A", "B"], false),
            bus("1", &["B", "C"], false),
            bus("ghost", &["A"], false),
        ],
    )
    .unwrap()
}

#[test]
fn layer_order_test() {
    let catalog = two_line_catalog();
    let renderer = MapRenderer::new(settings(), &catalog);
    let rendered = renderer.render(&catalog);

    let first_polyline = rendered.find("<polyline").unwrap();
    let last_polyline = rendered.rfind("<polyline").unwrap();
    let first_text = rendered.find("<text").unwrap();
    let first_circle = rendered.find("<circle").unwrap();
    let last_circle = rendered.rfind("<circle").unwrap();
    let last_text = rendered.rfind("<text").unwrap();

    assert!(last_polyline < first_text);
    assert!(first_text < first_circle);
    assert!(last_circle < last_text);
}

#[test]
fn lexicographic_bus_order_test() {
    let catalog = two_line_catalog();
    let renderer = MapRenderer::new(settings(), &catalog);
    let rendered = renderer.render(&catalog);

    // Bus "1" sorts first and takes the first palette color.
    let first_polyline_start = rendered.find("<polyline").unwrap();
    let first_polyline = &rendered[first_polyline_start
        ..first_polyline_start + rendered[first_polyline_start..].find("/>").unwrap()];
    assert!(first_polyline.contains("stroke=\"green\""));

    let label_one = rendered.find(">1</text>").unwrap();
    let label_nine = rendered.find(">9</text>").unwrap();
    assert!(label_one < label_nine);
}

#[test]
fn degenerate_bus_not_drawn_test() {
    let catalog = two_line_catalog();
    let renderer = MapRenderer::new(settings(), &catalog);
    let rendered = renderer.render(&catalog);
    assert!(!rendered.contains("ghost"));
    // Two active buses, one polyline each.
    assert_eq!(rendered.matches("<polyline").count(), 2);
}

#[test]
fn nonroundtrip_labelled_at_both_termini_test() {
    let catalog = Catalog::build(
        vec![stop("A", 55.0, 37.0), stop("B", 55.1, 37.1)],
        vec![bus("5", &["A", "B"], false)],
    )
    .unwrap();
    let renderer = MapRenderer::new(settings(), &catalog);
    let rendered = renderer.render(&catalog);
    // Underlay and overlay at the first stop and at the turnaround.
    assert_eq!(rendered.matches(">5</text>").count(), 4);
}

#[test]
fn roundtrip_labelled_once_test() {
    let catalog = Catalog::build(
        vec![
            stop("A", 55.0, 37.0),
            stop("B", 55.1, 37.1),
            stop("C", 55.2, 37.2),
        ],
        vec![bus("5", &["A", "B", "C", "A"], true)],
    )
    .unwrap();
    let renderer = MapRenderer::new(settings(), &catalog);
    let rendered = renderer.render(&catalog);
    assert_eq!(rendered.matches(">5</text>").count(), 2);
}

#[test]
fn stop_circles_are_white_test() {
    let catalog = two_line_catalog();
    let renderer = MapRenderer::new(settings(), &catalog);
    let rendered = renderer.render(&catalog);
    assert_eq!(rendered.matches("<circle").count(), 3);
    assert_eq!(rendered.matches("r=\"5\" fill=\"white\"").count(), 3);
}

#[test]
fn render_is_reproducible_test() {
    let catalog = two_line_catalog();
    let renderer = MapRenderer::new(settings(), &catalog);
    assert_eq!(renderer.render(&catalog), renderer.render(&catalog));
}

#[test]
fn active_coordinates_follow_ingestion_order_test() {
    let catalog = two_line_catalog();
    let renderer = MapRenderer::new(settings(), &catalog);
    // Bus "9" was ingested first: its expanded sequence A,B,A leads, then
    // "1" contributes B,C,B; the degenerate bus contributes nothing.
    let lats: Vec<f64> = renderer
        .active_coordinates()
        .iter()
        .map(|coordinates| coordinates.lat)
        .collect();
    assert_eq!(lats, [55.0, 55.1, 55.0, 55.1, 55.2, 55.1]);
}

#[test]
fn escaped_names_in_labels_test() {
    let catalog = Catalog::build(
        vec![stop("Fair & Square", 55.0, 37.0), stop("B", 55.1, 37.1)],
        vec![bus("<night>", &["Fair & Square", "B"], false)],
    )
    .unwrap();
    let renderer = MapRenderer::new(settings(), &catalog);
    let rendered = renderer.render(&catalog);
    assert!(rendered.contains(">&lt;night&gt;</text>"));
    assert!(rendered.contains(">Fair &amp; Square</text>"));
}
