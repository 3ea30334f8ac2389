//! Translation of a [`GraphSpec`] into `rrdtool graph` arguments.

use hostreport_spec::{DataSource, Derived, Element, ElementKind, GraphSpec};

/// Escapes the field separator inside a graph element argument.
fn escape(text: &str) -> String {
    text.replace(':', "\\:")
}

fn def(source: &DataSource) -> String {
    format!(
        "DEF:{}={}:{}:{}",
        source.name,
        escape(&source.path.to_string_lossy()),
        source.ds_name,
        source.consolidation.as_str()
    )
}

fn cdef(derived: &Derived) -> String {
    format!("CDEF:{}={}", derived.name, derived.expr.to_rpn())
}

fn element(element: &Element) -> String {
    let kind = match element.kind {
        ElementKind::Area => "AREA".to_string(),
        ElementKind::Line { width } => format!("LINE{}", width),
    };
    let mut arg = format!(
        "{}:{}{}:{}",
        kind,
        element.source,
        element.color,
        escape(&element.legend)
    );
    if element.stack {
        arg.push_str(":STACK");
    }
    arg
}

/// Returns the arguments following `rrdtool graph` for `spec`.
///
/// The first argument is the output path; options come next, then data
/// sources, derived values and elements in spec order, then the zoom factor.
pub fn graph_args(spec: &GraphSpec) -> Vec<String> {
    let mut args = vec![
        spec.output().to_string_lossy().into_owned(),
        "--imgformat".to_string(),
        spec.format().token().to_string(),
        "--start".to_string(),
        spec.range().start.to_string(),
        "--end".to_string(),
        spec.range().end.to_string(),
        "--vertical-label".to_string(),
        spec.vertical_label().to_string(),
        "--title".to_string(),
        spec.title().to_string(),
    ];

    let directives = spec.directives();
    if let Some(upper) = directives.upper_limit {
        args.push("--upper-limit".to_string());
        args.push(upper.to_string());
    }
    if let Some(lower) = directives.lower_limit {
        args.push("--lower-limit".to_string());
        args.push(lower.to_string());
    }
    if directives.rigid {
        args.push("--rigid".to_string());
    }
    if directives.slope_mode {
        args.push("--slope-mode".to_string());
    }

    args.extend(spec.sources().iter().map(def));
    args.extend(spec.derived().iter().map(cdef));
    args.extend(spec.elements().iter().map(element));

    if let Some(zoom) = directives.zoom {
        args.push("-m".to_string());
        args.push(zoom.to_string());
    }

    args
}
