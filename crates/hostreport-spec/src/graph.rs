//! Declarative graph specification.
//!
//! A [`GraphSpec`] describes one report image: where to write it, the time
//! window, the data sources it reads, the values derived from them, and how
//! each value is drawn. It carries no rendering logic; a
//! [`Renderer`](crate::Renderer) translates it into whatever the rendering
//! engine understands.
//!
//! Specs are only constructed through [`GraphSpecBuilder`], which enforces that
//! every derived expression and every drawn element references a name defined
//! earlier in the same spec.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::GraphSpecError;
use crate::time::TimeRange;

/// Data source name used inside every Ganglia RRD file.
pub const DEFAULT_DS_NAME: &str = "sum";

/// Default zoom factor applied to every report image.
pub const DEFAULT_ZOOM: f64 = 2.0;

const VNAME_PATTERN: &str = r"^[A-Za-z0-9_-]{1,255}$";

static VNAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn vname_regex() -> &'static Regex {
    VNAME_REGEX.get_or_init(|| Regex::new(VNAME_PATTERN).expect("invalid regex pattern"))
}

/// Checks if a name can be used as a graph variable name.
pub fn is_valid_vname(name: &str) -> bool {
    vname_regex().is_match(name)
}

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
    Pdf,
    Eps,
}

impl ImageFormat {
    /// Returns the format token passed to the renderer (e.g. "PNG").
    pub fn token(&self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Svg => "SVG",
            ImageFormat::Pdf => "PDF",
            ImageFormat::Eps => "EPS",
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
            ImageFormat::Eps => "eps",
        }
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            "pdf" => Ok(ImageFormat::Pdf),
            "eps" => Ok(ImageFormat::Eps),
            _ => Err(format!("unknown image format: {}", s)),
        }
    }
}

/// Consolidation function used to read a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Consolidation {
    #[default]
    Average,
    Min,
    Max,
    Last,
}

impl Consolidation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Consolidation::Average => "AVERAGE",
            Consolidation::Min => "MIN",
            Consolidation::Max => "MAX",
            Consolidation::Last => "LAST",
        }
    }
}

/// A named series read from a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub name: String,
    pub path: PathBuf,
    /// Data source name inside the file.
    pub ds_name: String,
    pub consolidation: Consolidation,
}

/// Arithmetic operator in a derived expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

/// Arithmetic over previously defined names and constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Var(String),
    Const(f64),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn constant(value: f64) -> Self {
        Expr::Const(value)
    }

    fn binary(self, op: BinaryOp, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Add, rhs)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Sub, rhs)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn mul(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Mul, rhs)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn div(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Div, rhs)
    }

    /// Names referenced by this expression, in evaluation order.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Var(name) => out.push(name),
            Expr::Const(_) => {}
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_references(out);
                rhs.collect_references(out);
            }
        }
    }

    /// Renders the expression in reverse Polish notation (`a,b,-`).
    pub fn to_rpn(&self) -> String {
        let mut tokens = Vec::new();
        self.push_rpn(&mut tokens);
        tokens.join(",")
    }

    fn push_rpn(&self, tokens: &mut Vec<String>) {
        match self {
            Expr::Var(name) => tokens.push(name.clone()),
            Expr::Const(value) => tokens.push(value.to_string()),
            Expr::Binary { op, lhs, rhs } => {
                lhs.push_rpn(tokens);
                rhs.push_rpn(tokens);
                tokens.push(op.symbol().to_string());
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(value) => write!(f, "{}", value),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
        }
    }
}

/// A named value computed from earlier names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    pub name: String,
    pub expr: Expr,
}

/// How an element is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    /// Filled area.
    Area,
    /// Line of the given width in pixels.
    Line { width: u8 },
}

/// One drawn series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub source: String,
    pub color: Color,
    pub legend: String,
    /// Drawn on top of the previous stacked element.
    pub stack: bool,
}

/// Scalar chart directives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directives {
    pub upper_limit: Option<f64>,
    pub lower_limit: Option<f64>,
    /// Do not expand the axis beyond the limits.
    pub rigid: bool,
    /// Image zoom factor.
    pub zoom: Option<f64>,
    /// Smooth the transition between samples.
    pub slope_mode: bool,
}

impl Default for Directives {
    fn default() -> Self {
        Self {
            upper_limit: None,
            lower_limit: None,
            rigid: false,
            zoom: Some(DEFAULT_ZOOM),
            slope_mode: true,
        }
    }
}

/// A complete, validated graph specification.
///
/// Fields are read-only; a spec can only be obtained from
/// [`GraphSpecBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSpec {
    output: PathBuf,
    format: ImageFormat,
    range: TimeRange,
    title: String,
    vertical_label: String,
    sources: Vec<DataSource>,
    derived: Vec<Derived>,
    elements: Vec<Element>,
    directives: Directives,
}

impl GraphSpec {
    /// Creates a new builder.
    pub fn builder(output: impl Into<PathBuf>, range: TimeRange) -> GraphSpecBuilder {
        GraphSpecBuilder::new(output, range)
    }

    /// Path the image is written to.
    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn vertical_label(&self) -> &str {
        &self.vertical_label
    }

    /// Data sources, in definition order.
    pub fn sources(&self) -> &[DataSource] {
        &self.sources
    }

    /// Derived values, in definition order.
    pub fn derived(&self) -> &[Derived] {
        &self.derived
    }

    /// Drawn elements, in draw order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn directives(&self) -> &Directives {
        &self.directives
    }

    /// Returns the data source with the given name.
    pub fn find_source(&self, name: &str) -> Option<&DataSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Returns the derived definition with the given name.
    pub fn find_derived(&self, name: &str) -> Option<&Derived> {
        self.derived.iter().find(|d| d.name == name)
    }

    /// Returns elements drawn as stacked areas, in draw order.
    pub fn stacked_areas(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(|e| e.stack && e.kind == ElementKind::Area)
    }
}

/// Builder for [`GraphSpec`].
///
/// Definitions are checked as they are added; the first violation is kept and
/// returned from [`GraphSpecBuilder::build`].
#[derive(Debug)]
pub struct GraphSpecBuilder {
    spec: GraphSpec,
    defined: HashSet<String>,
    error: Option<GraphSpecError>,
}

impl GraphSpecBuilder {
    /// Creates a builder for an image written to `output` covering `range`.
    pub fn new(output: impl Into<PathBuf>, range: TimeRange) -> Self {
        Self {
            spec: GraphSpec {
                output: output.into(),
                format: ImageFormat::default(),
                range,
                title: String::new(),
                vertical_label: String::new(),
                sources: Vec::new(),
                derived: Vec::new(),
                elements: Vec::new(),
                directives: Directives::default(),
            },
            defined: HashSet::new(),
            error: None,
        }
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.spec.format = format;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.spec.title = title.into();
        self
    }

    pub fn vertical_label(mut self, label: impl Into<String>) -> Self {
        self.spec.vertical_label = label.into();
        self
    }

    pub fn upper_limit(mut self, limit: f64) -> Self {
        self.spec.directives.upper_limit = Some(limit);
        self
    }

    pub fn lower_limit(mut self, limit: f64) -> Self {
        self.spec.directives.lower_limit = Some(limit);
        self
    }

    pub fn rigid(mut self, rigid: bool) -> Self {
        self.spec.directives.rigid = rigid;
        self
    }

    pub fn zoom(mut self, zoom: Option<f64>) -> Self {
        self.spec.directives.zoom = zoom;
        self
    }

    pub fn slope_mode(mut self, enabled: bool) -> Self {
        self.spec.directives.slope_mode = enabled;
        self
    }

    /// Defines a data source reading the default `sum` data source with AVERAGE.
    pub fn def(self, name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        self.def_with(name, path, DEFAULT_DS_NAME, Consolidation::Average)
    }

    /// Defines a data source.
    pub fn def_with(
        mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
        ds_name: impl Into<String>,
        consolidation: Consolidation,
    ) -> Self {
        let name = name.into();
        if self.declare(&name) {
            self.spec.sources.push(DataSource {
                name,
                path: path.as_ref().to_path_buf(),
                ds_name: ds_name.into(),
                consolidation,
            });
        }
        self
    }

    /// Defines a value computed from earlier names.
    pub fn cdef(mut self, name: impl Into<String>, expr: Expr) -> Self {
        let name = name.into();
        for reference in expr.references() {
            self.require(&name, reference);
        }
        if self.declare(&name) {
            self.spec.derived.push(Derived { name, expr });
        }
        self
    }

    /// Draws a stacked area.
    pub fn stacked_area(
        self,
        source: impl Into<String>,
        color: Color,
        legend: impl Into<String>,
    ) -> Self {
        self.element(ElementKind::Area, source, color, legend, true)
    }

    /// Draws an unstacked line.
    pub fn line(
        self,
        width: u8,
        source: impl Into<String>,
        color: Color,
        legend: impl Into<String>,
    ) -> Self {
        self.element(ElementKind::Line { width }, source, color, legend, false)
    }

    /// Draws an element.
    pub fn element(
        mut self,
        kind: ElementKind,
        source: impl Into<String>,
        color: Color,
        legend: impl Into<String>,
        stack: bool,
    ) -> Self {
        let source = source.into();
        let legend = legend.into();
        if self.require(&legend, &source) {
            self.spec.elements.push(Element {
                kind,
                source,
                color,
                legend,
                stack,
            });
        }
        self
    }

    /// Finishes the spec, returning the first invariant violation if any.
    pub fn build(self) -> Result<GraphSpec, GraphSpecError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.spec),
        }
    }

    fn declare(&mut self, name: &str) -> bool {
        if !is_valid_vname(name) {
            self.fail(GraphSpecError::InvalidName {
                name: name.to_string(),
            });
            return false;
        }
        if !self.defined.insert(name.to_string()) {
            self.fail(GraphSpecError::DuplicateName {
                name: name.to_string(),
            });
            return false;
        }
        true
    }

    fn require(&mut self, name: &str, reference: &str) -> bool {
        if self.defined.contains(reference) {
            return true;
        }
        self.fail(GraphSpecError::UndefinedReference {
            name: name.to_string(),
            reference: reference.to_string(),
        });
        false
    }

    fn fail(&mut self, err: GraphSpecError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{CRIMSON, DODGERBLUE};
    use crate::time::{TimePolicy, TimeRange};
    use pretty_assertions::assert_eq;

    fn range() -> TimeRange {
        TimeRange::new(1000, 2000, TimePolicy::Explicit)
    }

    #[test]
    fn test_build_simple_spec() {
        let spec = GraphSpec::builder("/tmp/h_net.png", range())
            .title("h Network")
            .vertical_label("Bytes")
            .def("in", "/data/h/bytes_in.rrd")
            .def("out", "/data/h/bytes_out.rrd")
            .line(1, "in", CRIMSON, "In")
            .line(1, "out", DODGERBLUE, "Out")
            .build()
            .unwrap();

        assert_eq!(spec.sources().len(), 2);
        assert_eq!(spec.find_source("in").unwrap().ds_name, "sum");
        assert_eq!(spec.elements()[1].legend, "Out");
        assert_eq!(spec.stacked_areas().count(), 0);
        assert_eq!(spec.directives().zoom, Some(2.0));
    }

    #[test]
    fn test_element_forward_reference_rejected() {
        let err = GraphSpec::builder("/tmp/x.png", range())
            .stacked_area("used", CRIMSON, "Memory Used")
            .def("used", "/data/used.rrd")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GraphSpecError::UndefinedReference {
                name: "Memory Used".to_string(),
                reference: "used".to_string(),
            }
        );
    }

    #[test]
    fn test_failed_build_yields_no_spec() {
        // An element drawing an undefined name never produces a spec, even when
        // everything else is well formed.
        let result = GraphSpec::builder("/tmp/x.png", range())
            .title("x")
            .def("real", "/data/real.rrd")
            .stacked_area("ghost", CRIMSON, "g")
            .stacked_area("real", DODGERBLUE, "r")
            .build();
        assert!(matches!(
            result,
            Err(GraphSpecError::UndefinedReference { ref reference, .. }) if reference == "ghost"
        ));
    }

    #[test]
    fn test_cdef_dangling_reference_rejected() {
        let err = GraphSpec::builder("/tmp/x.png", range())
            .def("total", "/data/total.rrd")
            .cdef("used", Expr::var("total").sub(Expr::var("free")))
            .build()
            .unwrap_err();
        assert!(matches!(err, GraphSpecError::UndefinedReference { ref reference, .. } if reference == "free"));
    }

    #[test]
    fn test_duplicate_and_invalid_names_rejected() {
        let err = GraphSpec::builder("/tmp/x.png", range())
            .def("a", "/data/a.rrd")
            .def("a", "/data/b.rrd")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GraphSpecError::DuplicateName {
                name: "a".to_string()
            }
        );

        let err = GraphSpec::builder("/tmp/x.png", range())
            .def("dm:0", "/data/a.rrd")
            .build()
            .unwrap_err();
        assert!(matches!(err, GraphSpecError::InvalidName { .. }));
    }

    #[test]
    fn test_expr_rpn_and_references() {
        let used = Expr::var("total")
            .sub(Expr::var("free"))
            .sub(Expr::var("cached"))
            .sub(Expr::var("buffer"));
        assert_eq!(used.to_rpn(), "total,free,-,cached,-,buffer,-");
        assert_eq!(used.references(), vec!["total", "free", "cached", "buffer"]);

        let scaled = Expr::var("_total").mul(Expr::constant(1024.0));
        assert_eq!(scaled.to_rpn(), "_total,1024,*");
        assert_eq!(scaled.to_string(), "(_total * 1024)");
    }

    #[test]
    fn test_image_format_parse() {
        assert_eq!("PNG".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("svg".parse::<ImageFormat>().unwrap().extension(), "svg");
        assert!("gif".parse::<ImageFormat>().is_err());
    }

    #[test]
    fn test_spec_serializes_to_json() {
        let spec = GraphSpec::builder("/tmp/h_cpu.png", range())
            .def("user", "/data/h/cpu_user.rrd")
            .stacked_area("user", CRIMSON, "User CPU")
            .build()
            .unwrap();
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["elements"][0]["color"], "#dc143c");
        assert_eq!(json["elements"][0]["kind"]["type"], "area");
        assert_eq!(json["sources"][0]["consolidation"], "AVERAGE");
        assert_eq!(json["range"]["start"], 1000);
    }
}
