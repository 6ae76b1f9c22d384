use std::fmt::{self, Display, Write};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub opacity: f64,
}

/// A paint value: absent, a named color, or an RGB/RGBA value.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Color {
    #[default]
    None,
    Named(String),
    Rgb(Rgb),
    Rgba(Rgba),
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::None => f.write_str("none"),
            Color::Named(name) => f.write_str(name),
            Color::Rgb(rgb) => write!(f, "rgb({},{},{})", rgb.red, rgb.green, rgb.blue),
            Color::Rgba(rgba) => write!(
                f,
                "rgba({},{},{},{})",
                rgba.red, rgba.green, rgba.blue, rgba.opacity
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl Display for LineCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineCap::Butt => f.write_str("butt"),
            LineCap::Round => f.write_str("round"),
            LineCap::Square => f.write_str("square"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineJoin {
    Arcs,
    Bevel,
    Miter,
    MiterClip,
    Round,
}

impl Display for LineJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineJoin::Arcs => f.write_str("arcs"),
            LineJoin::Bevel => f.write_str("bevel"),
            LineJoin::Miter => f.write_str("miter"),
            LineJoin::MiterClip => f.write_str("miter-clip"),
            LineJoin::Round => f.write_str("round"),
        }
    }
}

/// Stroke and fill attributes shared by every drawable element. Attributes
/// that were never set are not emitted.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PathProps {
    fill: Option<Color>,
    stroke: Option<Color>,
    stroke_width: Option<f64>,
    stroke_linecap: Option<LineCap>,
    stroke_linejoin: Option<LineJoin>,
}

impl PathProps {
    fn render(&self, out: &mut String) {
        if let Some(fill) = &self.fill {
            let _ = write!(out, " fill=\"{fill}\"");
        }
        if let Some(stroke) = &self.stroke {
            let _ = write!(out, " stroke=\"{stroke}\"");
        }
        if let Some(width) = self.stroke_width {
            let _ = write!(out, " stroke-width=\"{width}\"");
        }
        if let Some(linecap) = self.stroke_linecap {
            let _ = write!(out, " stroke-linecap=\"{linecap}\"");
        }
        if let Some(linejoin) = self.stroke_linejoin {
            let _ = write!(out, " stroke-linejoin=\"{linejoin}\"");
        }
    }
}

macro_rules! path_props {
    () => {
        pub fn with_fill(mut self, color: Color) -> Self {
            self.props.fill = Some(color);
            self
        }

        pub fn with_stroke(mut self, color: Color) -> Self {
            self.props.stroke = Some(color);
            self
        }

        pub fn with_stroke_width(mut self, width: f64) -> Self {
            self.props.stroke_width = Some(width);
            self
        }

        pub fn with_stroke_linecap(mut self, linecap: LineCap) -> Self {
            self.props.stroke_linecap = Some(linecap);
            self
        }

        pub fn with_stroke_linejoin(mut self, linejoin: LineJoin) -> Self {
            self.props.stroke_linejoin = Some(linejoin);
            self
        }
    };
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f64,
    props: PathProps,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            props: PathProps::default(),
        }
    }

    path_props!();

    fn render(&self, out: &mut String) {
        let _ = write!(
            out,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"",
            self.center.x, self.center.y, self.radius
        );
        self.props.render(out);
        out.push_str(" />");
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
    props: PathProps,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(mut self, point: Point) -> Self {
        self.points.push(point);
        self
    }

    path_props!();

    fn render(&self, out: &mut String) {
        out.push_str("<polyline points=\"");
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{},{}", point.x, point.y);
        }
        out.push('"');
        self.props.render(out);
        out.push_str(" />");
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Text {
    position: Point,
    offset: Point,
    font_size: u32,
    font_family: Option<String>,
    font_weight: Option<String>,
    data: String,
    props: PathProps,
}

impl Text {
    pub fn new() -> Self {
        Self {
            font_size: 1,
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_font_family(mut self, family: &str) -> Self {
        self.font_family = Some(family.to_string());
        self
    }

    pub fn with_font_weight(mut self, weight: &str) -> Self {
        self.font_weight = Some(weight.to_string());
        self
    }

    /// Sets the text content, escaping XML-significant characters on entry.
    pub fn with_data(mut self, data: &str) -> Self {
        self.data.clear();
        for symbol in data.chars() {
            match symbol {
                '"' => self.data.push_str("&quot;"),
                '\'' => self.data.push_str("&apos;"),
                '<' => self.data.push_str("&lt;"),
                '>' => self.data.push_str("&gt;"),
                '&' => self.data.push_str("&amp;"),
                _ => self.data.push(symbol),
            }
        }
        self
    }

    path_props!();

    fn render(&self, out: &mut String) {
        let _ = write!(
            out,
            "<text x=\"{}\" y=\"{}\" dx=\"{}\" dy=\"{}\" font-size=\"{}\"",
            self.position.x, self.position.y, self.offset.x, self.offset.y, self.font_size
        );
        if let Some(family) = &self.font_family {
            let _ = write!(out, " font-family=\"{family}\"");
        }
        if let Some(weight) = &self.font_weight {
            let _ = write!(out, " font-weight=\"{weight}\"");
        }
        self.props.render(out);
        out.push('>');
        out.push_str(&self.data);
        out.push_str("</text>");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Circle(Circle),
    Polyline(Polyline),
    Text(Text),
}

impl From<Circle> for Object {
    fn from(circle: Circle) -> Self {
        Object::Circle(circle)
    }
}

impl From<Polyline> for Object {
    fn from(polyline: Polyline) -> Self {
        Object::Polyline(polyline)
    }
}

impl From<Text> for Object {
    fn from(text: Text) -> Self {
        Object::Text(text)
    }
}

/// An SVG document; elements render in insertion order, one per line.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Document {
    objects: Vec<Object>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: impl Into<Object>) {
        self.objects.push(object.into());
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
        out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n");
        for object in &self.objects {
            out.push_str("  ");
            match object {
                Object::Circle(circle) => circle.render(&mut out),
                Object::Polyline(polyline) => polyline.render(&mut out),
                Object::Text(text) => text.render(&mut out),
            }
            out.push('\n');
        }
        out.push_str("</svg>");
        out
    }
}

#[test]
fn color_format_test() {
    assert_eq!(Color::None.to_string(), "none");
    assert_eq!(Color::Named("white".to_string()).to_string(), "white");
    assert_eq!(
        Color::Rgb(Rgb {
            red: 255,
            green: 16,
            blue: 12
        })
        .to_string(),
        "rgb(255,16,12)"
    );
    assert_eq!(
        Color::Rgba(Rgba {
            red: 255,
            green: 200,
            blue: 80,
            opacity: 0.85
        })
        .to_string(),
        "rgba(255,200,80,0.85)"
    );
}

#[test]
fn text_escape_test() {
    let text = Text::new().with_data("<'Quoted' & \"named\">");
    let mut out = String::new();
    text.render(&mut out);
    assert!(out.contains("&lt;&apos;Quoted&apos; &amp; &quot;named&quot;&gt;"));
}

#[test]
fn document_render_test() {
    let mut document = Document::new();
    document.add(Circle::new(Point::new(20.0, 30.0), 5.0).with_fill(Color::Named("white".into())));
    let rendered = document.render();
    assert!(rendered.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n"));
    assert!(rendered.contains("  <circle cx=\"20\" cy=\"30\" r=\"5\" fill=\"white\" />\n"));
    assert!(rendered.ends_with("</svg>"));
}
