//! End-to-end plotting: drawing, finishing, saving and style restoration.
//!
//! Rendered figures carry no text (no tick labels, titles or legends), so
//! these tests do not depend on fonts installed on the machine.

use serde_json::{json, Value};
use simplot::charts::{Artist, Location};
use simplot::plotter::{LinesPlotter, ScatterPlotter};
use simplot::style::{self, StyleOverrides, StyleParams};
use simplot::{
    plot, FigureOptions, HistPlotter, LinePlotter, PlotData, PlotError, PlotKind, Plotter, PlotterOptions,
};
use std::path::Path;

fn data(value: Value) -> PlotData {
    PlotData::from_value(value).unwrap()
}

fn options(value: Value) -> FigureOptions {
    serde_json::from_value(value).unwrap()
}

/// Style overrides that turn off every piece of text on the axes.
fn textless() -> PlotterOptions {
    let style: StyleOverrides = json!({
        "xtick.labelbottom": false,
        "ytick.labelleft": false,
        "figure.figsize": [2.0, 1.5]
    })
    .as_object()
    .cloned()
    .unwrap();
    PlotterOptions {
        style,
        ..PlotterOptions::default()
    }
}

fn raster() -> PlotData {
    data(json!({
        "x": [1.0, 5.0, 9.0, 12.5, 20.0],
        "y": [0, 1, 2, 1, 0],
        "c": "k",
        "marker": "|",
        "s": 9
    }))
}

#[test]
fn scatter_saves_png_with_default_name() {
    let dir = tempfile::tempdir().unwrap();
    let out = ScatterPlotter::new(raster(), textless())
        .unwrap()
        .plot(&options(json!({"saveFig": true, "fileDir": dir.path()})))
        .unwrap();

    let expected = dir.path().join("model_output_scatter.png");
    assert_eq!(out.file_name.as_deref(), Some(expected.as_path()));
    assert!(expected.is_file());
    assert!(std::fs::metadata(&expected).unwrap().len() > 0);
    assert_eq!(out.figure.axes.artists.len(), 1);
}

#[test]
fn no_overwrite_numbers_new_files() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(json!({
        "saveFig": true,
        "fileDir": dir.path(),
        "fileName": "trace.png",
        "overwrite": false
    }));

    let names: Vec<_> = (0..3)
        .map(|_| {
            plot(PlotKind::Line, data(json!({"y": [0, 1, 0]})), textless(), &opts)
                .unwrap()
                .file_name
                .unwrap()
        })
        .collect();

    let file = |name: &str| dir.path().join(name);
    assert_eq!(names, vec![file("trace_line.png"), file("trace_line_01.png"), file("trace_line_02.png")]);
}

#[test]
fn histogram_renders_svg_with_description() {
    let dir = tempfile::tempdir().unwrap();
    let hist_data = data(json!({
        "x": [[0.1, 0.2, 0.22, 0.7], [0.5, 0.55, 0.9]],
        "bins": 4,
        "range": [0, 1],
        "histtype": "barstacked",
        "alpha": 0.8
    }));

    let mut plotter = HistPlotter::new(hist_data, textless()).unwrap();
    plotter.draw().unwrap();
    let hist = plotter.histogram().cloned().unwrap();
    assert_eq!(hist.tops[0], vec![3.0, 0.0, 1.0, 0.0]);
    assert_eq!(hist.tops[1], vec![3.0, 0.0, 3.0, 1.0]);

    let mut general = plotter.into_general();
    general
        .finish(&options(json!({
            "saveFig": "spikes.svg",
            "fileType": "svg",
            "fileDesc": "exc",
            "fileDir": dir.path()
        })))
        .unwrap();

    let path = dir.path().join("spikes_exc.svg");
    assert_eq!(general.file_name(), Some(path.as_path()));
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("<rect"));
}

#[test]
fn save_data_writes_parameters_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = data(json!({"x": [0, 1, 2], "y": [3, 4, 5], "color": "r"}));
    plot(
        PlotKind::Line,
        input.clone(),
        textless(),
        &options(json!({"saveData": true, "fileDir": dir.path()})),
    )
    .unwrap();

    let saved = dir.path().join("model_output_line_data.json");
    let reloaded: PlotData = serde_json::from_str(&std::fs::read_to_string(saved).unwrap()).unwrap();
    assert_eq!(reloaded, input);
    // saveFig was not requested.
    assert!(!dir.path().join("model_output_line.png").exists());
}

#[test]
fn data_file_keeps_figure_stem_and_counter() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(json!({
        "saveFig": true,
        "saveData": true,
        "fileName": "run.v2",
        "overwrite": false,
        "fileDir": dir.path()
    }));
    for _ in 0..2 {
        plot(PlotKind::Line, data(json!({"y": [0, 1, 0]})), textless(), &opts).unwrap();
    }

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "run.v2_line.png",
            "run.v2_line_01.png",
            "run.v2_line_01_data.json",
            "run.v2_line_data.json",
        ]
    );
}

#[test]
fn finished_svg_shows_title_legend_and_scalebar_label() {
    let dir = tempfile::tempdir().unwrap();
    let trace = data(json!({"x": [0, 1, 2, 3], "y": [-0.065, -0.06, 0.02, -0.07], "label": "soma"}));
    let out = plot(
        PlotKind::Line,
        trace,
        PlotterOptions::default(),
        &options(json!({
            "title": "Vm",
            "legend": true,
            "scalebar": {"labely": "0.1 mV"},
            "saveFig": true,
            "fileType": "svg",
            "fileDir": dir.path()
        })),
    )
    .unwrap();

    let svg = std::fs::read_to_string(out.file_name.unwrap()).unwrap();
    assert!(svg.contains(">Vm<"));
    assert!(svg.contains(">soma<"));
    assert!(svg.contains(">0.1 mV<"));
}

#[test]
fn style_overrides_apply_while_drawing_and_are_restored() {
    style::reset();
    let mut opts = textless();
    opts.style.insert("lines.linewidth".into(), json!(3.5));
    opts.style.insert("no.such.param".into(), json!(1));

    let plotter = LinePlotter::new(data(json!({"y": [1, 2]})), opts).unwrap();
    assert_eq!(style::current().line_width, 3.5);

    let out = plotter.plot(&FigureOptions::default()).unwrap();
    match &out.figure.axes.artists[0] {
        Artist::Trace(trace) => assert_eq!(trace.line_width, 3.5),
        other => panic!("expected a trace, got {other:?}"),
    }
    assert_eq!(style::current(), StyleParams::default());
}

#[test]
fn failed_save_still_restores_style() {
    style::reset();
    let result = plot(
        PlotKind::Scatter,
        raster(),
        textless(),
        &options(json!({"saveFig": true, "fileType": "tiff"})),
    );
    assert!(matches!(result, Err(PlotError::UnsupportedFileType(t)) if t == "tiff"));
    assert_eq!(style::current(), StyleParams::default());
}

#[test]
fn lines_draw_into_an_existing_figure_with_legend() {
    let first = plot(PlotKind::Line, data(json!({"y": [0, 1], "label": "soma"})), textless(), &FigureOptions::default())
        .unwrap();

    let options = PlotterOptions {
        figure: Some(first.figure),
        ..textless()
    };
    let lines = data(json!({
        "y": [[1, 0], [0.5, 0.5]],
        "label": ["dend", "_hidden"],
        "colors": "b"
    }));
    let out = LinesPlotter::new(lines, options)
        .unwrap()
        .plot(&options_with_legend())
        .unwrap();

    let axes = &out.figure.axes;
    assert_eq!(axes.artists.len(), 3);
    let legend = axes.legend.as_ref().unwrap();
    let labels: Vec<_> = legend.entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["soma", "dend"]);
    assert_eq!(legend.loc, Location::LowerRight);
    assert!(axes.y_scale.inverted);
}

fn options_with_legend() -> FigureOptions {
    options(json!({"legend": {"loc": "lower right"}, "invert_yaxis": true}))
}

#[test]
fn scalebar_hides_y_axis_and_renders() {
    let dir = tempfile::tempdir().unwrap();
    let trace = data(json!({"x": [0, 1, 2, 3], "y": [-0.065, -0.06, 0.02, -0.07]}));
    let out = plot(
        PlotKind::Line,
        trace,
        textless(),
        &options(json!({
            "scalebar": {"labely": ""},
            "saveFig": true,
            "fileType": "bmp",
            "fileDir": dir.path()
        })),
    )
    .unwrap();

    let scalebar = out.figure.axes.scalebar.as_ref().unwrap();
    assert!((scalebar.size_y - 0.1).abs() < 1e-12);
    assert!(out.figure.axes.hide_y_axis);
    assert!(dir.path().join("model_output_line.bmp").is_file());
}

#[test]
fn data_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.json");
    std::fs::write(&path, r#"{"y": [1, 2, 3], "marker": "o"}"#).unwrap();

    let out = plot(PlotKind::Line, path.as_path(), textless(), &FigureOptions::default()).unwrap();
    assert_eq!(out.figure.axes.artists.len(), 1);

    let missing = plot(
        PlotKind::Line,
        Path::new("/no/such/trace.json"),
        textless(),
        &FigureOptions::default(),
    );
    assert!(matches!(missing, Err(PlotError::DataFile { .. })));
}
