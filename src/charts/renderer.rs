//! Static Figure Renderer
//! Draws a retained [`Figure`] through plotters.
//!
//! Layout:
//! 1. Title centered above the axes
//! 2. Axes with tick labels and axis descriptions (each can be hidden)
//! 3. Artists in drawing order: points, traces, bars, step outlines
//! 4. Legend inside the axes at the requested location
//! 5. Scalebar anchored in a corner of the plotting area

use crate::charts::figure::{Artist, AxisScale, Figure};
use crate::charts::legend::{Legend, LegendGlyph};
use crate::charts::scalebar::{format_sig, Scalebar};
use crate::error::{PlotError, Result};
use crate::style::{Marker, StyleParams};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Output formats understood by the plotters backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    #[default]
    Png,
    Jpg,
    Jpeg,
    Bmp,
    Svg,
}

impl FileType {
    pub const SUPPORTED: [FileType; 5] = [Self::Png, Self::Jpg, Self::Jpeg, Self::Bmp, Self::Svg];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Bmp => "bmp",
            Self::Svg => "svg",
        }
    }
}

impl FromStr for FileType {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim_start_matches('.').to_ascii_lowercase();
        Self::SUPPORTED
            .into_iter()
            .find(|t| t.extension() == s)
            .ok_or(PlotError::UnsupportedFileType(s))
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

type Chart2d<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Renders figures to files, strings and pixel buffers.
pub struct FigureRenderer;

impl FigureRenderer {
    /// Render `figure` into `path` using the backend for `file_type`.
    pub fn save(figure: &Figure, path: &Path, file_type: FileType) -> Result<()> {
        let size = figure.pixel_size();
        match file_type {
            FileType::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                Self::draw(figure, &root)?;
                root.present().map_err(PlotError::render)?;
            }
            FileType::Png | FileType::Jpg | FileType::Jpeg | FileType::Bmp => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                Self::draw(figure, &root)?;
                root.present().map_err(PlotError::render)?;
            }
        }
        tracing::debug!(path = %path.display(), width = size.0, height = size.1, "figure rendered");
        Ok(())
    }

    /// Render `figure` as an SVG document.
    pub fn to_svg_string(figure: &Figure) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, figure.pixel_size()).into_drawing_area();
            Self::draw(figure, &root)?;
            root.present().map_err(PlotError::render)?;
        }
        Ok(svg)
    }

    /// Render `figure` into an RGB pixel buffer (row-major, 3 bytes per pixel).
    pub fn to_rgb_buffer(figure: &Figure) -> Result<Vec<u8>> {
        let (width, height) = figure.pixel_size();
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw(figure, &root)?;
            root.present().map_err(PlotError::render)?;
        }
        Ok(buffer)
    }

    /// Draw the whole figure on any plotters drawing area.
    pub fn draw<'r, DB: DrawingBackend + 'r>(figure: &Figure, root: &'r DrawingArea<DB, Shift>) -> Result<()> {
        let style = &figure.style;
        let axes = &figure.axes;
        let px = |points: f64| style.points_to_px(points);
        let font = style.font_family.as_str();

        root.fill(&style.face_color.to_rgb())
            .map_err(PlotError::render)?;

        let x_range = padded(axes.x_scale.chart_range(axes.x_limits(style)));
        let y_range = padded(axes.y_scale.chart_range(axes.y_limits(style)));

        let show_x_ticks = style.x_tick_labels && !axes.hide_x_axis;
        let show_y_ticks = style.y_tick_labels && !axes.hide_y_axis;
        let x_area = if show_x_ticks { px(style.x_tick_label_size * 2.0) } else { 0.0 }
            + if axes.xlabel.is_some() { px(style.label_size * 1.8) } else { 0.0 };
        let y_area = if show_y_ticks { px(style.y_tick_label_size * 4.0) } else { 0.0 }
            + if axes.ylabel.is_some() { px(style.label_size * 1.8) } else { 0.0 };

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(px(8.0) as u32)
            .x_label_area_size(x_area as u32)
            .y_label_area_size(y_area as u32);
        if let Some(title) = &axes.title {
            builder.caption(title, (font, px(style.title_size)));
        }

        let mut chart = builder
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
            .map_err(PlotError::render)?;

        let (x_scale, y_scale) = (axes.x_scale, axes.y_scale);
        let x_formatter = move |v: &f64| format_sig(x_scale.inverse(*v), 4);
        let y_formatter = move |v: &f64| format_sig(y_scale.inverse(*v), 4);

        {
            let mut mesh = chart.configure_mesh();
            if !style.grid {
                mesh.disable_mesh();
            }
            if axes.hide_x_axis {
                mesh.disable_x_axis();
            }
            if axes.hide_y_axis {
                mesh.disable_y_axis();
            }
            mesh.x_labels(if show_x_ticks { 6 } else { 0 })
                .y_labels(if show_y_ticks { 6 } else { 0 })
                .x_label_formatter(&x_formatter)
                .y_label_formatter(&y_formatter)
                .x_label_style((font, px(style.x_tick_label_size)))
                .y_label_style((font, px(style.y_tick_label_size)))
                .axis_desc_style((font, px(style.label_size)));
            if let Some(xlabel) = &axes.xlabel {
                mesh.x_desc(xlabel.as_str());
            }
            if let Some(ylabel) = &axes.ylabel {
                mesh.y_desc(ylabel.as_str());
            }
            mesh.draw().map_err(PlotError::render)?;
        }

        let to_chart = |x: f64, y: f64| -> Option<(f64, f64)> {
            Some((
                to_axis(x, x_scale, x_range)?,
                to_axis(y, y_scale, y_range)?,
            ))
        };

        for artist in &axes.artists {
            match artist {
                Artist::Points(points) => {
                    let glyphs: Vec<Glyph> = points
                        .x
                        .iter()
                        .zip(&points.y)
                        .enumerate()
                        .filter_map(|(i, (&x, &y))| {
                            let area = points.sizes.get(i).copied().unwrap_or(style.marker_size.powi(2));
                            let width = points.line_widths.get(i).copied().unwrap_or(style.line_width);
                            Some(Glyph {
                                at: to_chart(x, y)?,
                                radius: (px(area.max(0.0).sqrt()) / 2.0).round().max(1.0) as i32,
                                color: points.colors.get(i).copied()?.to_rgba(points.alpha),
                                stroke: px(width).round().max(1.0) as u32,
                            })
                        })
                        .collect();
                    draw_markers(&mut chart, points.marker, &glyphs)?;
                }
                Artist::Trace(trace) => {
                    let color = trace.color.to_rgba(trace.alpha);
                    let line_style = ShapeStyle {
                        color,
                        filled: false,
                        stroke_width: px(trace.line_width).round().max(1.0) as u32,
                    };
                    if trace.line_width > 0.0 {
                        for segment in segments(&trace.x, &trace.y, &to_chart) {
                            chart
                                .draw_series(LineSeries::new(segment, line_style))
                                .map_err(PlotError::render)?;
                        }
                    }
                    if trace.marker.is_visible() {
                        let radius = (px(trace.marker_size) / 2.0).round().max(1.0) as i32;
                        let glyphs: Vec<Glyph> = trace
                            .x
                            .iter()
                            .zip(&trace.y)
                            .filter_map(|(&x, &y)| {
                                Some(Glyph {
                                    at: to_chart(x, y)?,
                                    radius,
                                    color,
                                    stroke: line_style.stroke_width,
                                })
                            })
                            .collect();
                        draw_markers(&mut chart, trace.marker, &glyphs)?;
                    }
                }
                Artist::Bars(bars) => {
                    let fill = bars.color.to_rgba(bars.alpha).filled();
                    let rects: Vec<Rectangle<(f64, f64)>> = bars
                        .bars
                        .iter()
                        .filter_map(|bar| {
                            Some(Rectangle::new([to_chart(bar.x0, bar.y0)?, to_chart(bar.x1, bar.y1)?], fill))
                        })
                        .collect();
                    chart.draw_series(rects).map_err(PlotError::render)?;
                }
                Artist::Step(step) => {
                    let color = step.color.to_rgba(step.alpha);
                    let points: Vec<(f64, f64)> =
                        step.points.iter().filter_map(|&(x, y)| to_chart(x, y)).collect();
                    if step.filled {
                        chart
                            .draw_series(std::iter::once(Polygon::new(points, color.filled())))
                            .map_err(PlotError::render)?;
                    } else {
                        let stroke = ShapeStyle {
                            color,
                            filled: false,
                            stroke_width: px(step.line_width).round().max(1.0) as u32,
                        };
                        chart
                            .draw_series(std::iter::once(PathElement::new(points, stroke)))
                            .map_err(PlotError::render)?;
                    }
                }
            }
        }

        if let Some(legend) = axes.legend.as_ref().filter(|l| !l.entries.is_empty()) {
            Self::draw_legend(&mut chart, legend, style)?;
        }

        if let Some(scalebar) = &axes.scalebar {
            let plot_area = chart.plotting_area().get_pixel_range();
            let (x0, y0) = (x_range.0, y_range.0);
            let origin = chart.backend_coord(&(x0, y0));
            let x_end = to_axis(axes.x_scale.inverse(x0) + scalebar.size_x, x_scale, x_range).unwrap_or(x0);
            let y_end = to_axis(axes.y_scale.inverse(y0) + scalebar.size_y, y_scale, y_range).unwrap_or(y0);
            let len_x = (chart.backend_coord(&(x_end, y0)).0 - origin.0).abs();
            let len_y = (chart.backend_coord(&(x0, y_end)).1 - origin.1).abs();
            Self::draw_scalebar(root, scalebar, style, plot_area, (len_x, len_y))?;
        }

        Ok(())
    }

    fn draw_legend<'a, DB: DrawingBackend + 'a>(
        chart: &mut Chart2d<'a, DB>,
        legend: &Legend,
        style: &StyleParams,
    ) -> Result<()> {
        // Legend samples are attached to empty series, one per entry.
        let size = style.points_to_px(legend.font_size) as i32;
        for entry in &legend.entries {
            let color = entry.color.to_rgba(None);
            let anno = chart
                .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())
                .map_err(PlotError::render)?;
            anno.label(entry.label.as_str());
            match entry.glyph {
                LegendGlyph::Line => {
                    anno.legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 2 * size, y)], color.stroke_width(2)));
                }
                LegendGlyph::Marker => {
                    anno.legend(move |(x, y)| Circle::new((x + size, y), (size / 3).max(1), color.filled()));
                }
                LegendGlyph::Patch => {
                    anno.legend(move |(x, y)| {
                        Rectangle::new([(x, y - size / 2), (x + 2 * size, y + size / 2)], color.filled())
                    });
                }
            }
        }

        let font = style.font_family.as_str();
        let (background, border) = if legend.frame_on {
            (
                legend.face_color.to_rgba(Some(legend.frame_alpha)),
                legend.edge_color.to_rgba(Some(legend.frame_alpha)),
            )
        } else {
            (TRANSPARENT, TRANSPARENT)
        };

        chart
            .configure_series_labels()
            .position(legend.loc.series_label_position())
            .label_font((font, style.points_to_px(legend.font_size)))
            .background_style(&background)
            .border_style(&border)
            .draw()
            .map_err(PlotError::render)
    }

    fn draw_scalebar<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        scalebar: &Scalebar,
        style: &StyleParams,
        plot_area: (std::ops::Range<i32>, std::ops::Range<i32>),
        (len_x, len_y): (i32, i32),
    ) -> Result<()> {
        let (xs, ys) = plot_area;
        let font_px = style.points_to_px(style.font_size);
        let pad = (scalebar.pad * font_px).round() as i32;
        let sep = style.points_to_px(scalebar.sep).round() as i32;
        let color = scalebar.color.to_rgba(None);
        let bar_style = color.stroke_width(style.points_to_px(scalebar.width).round().max(1.0) as u32);
        let text = (style.font_family.as_str(), font_px).into_font().color(&color);

        // Corner of the "L": the bars grow away from the anchored edges.
        let (ax, ay) = scalebar.loc.anchor();
        let corner_x = if ax >= 0.5 { xs.end - pad } else { xs.start + pad };
        let corner_y = if ay >= 0.5 { ys.start + pad } else { ys.end - pad };
        let dir_x = if ax >= 0.5 { -1 } else { 1 };
        let dir_y = if ay >= 0.5 { 1 } else { -1 };

        if scalebar.size_x > 0.0 && len_x > 0 {
            let end = (corner_x + dir_x * len_x, corner_y);
            root.draw(&PathElement::new(vec![(corner_x, corner_y), end], bar_style))
                .map_err(PlotError::render)?;
            if let Some(label) = &scalebar.label_x {
                let label_y = corner_y - dir_y * (sep + font_px as i32);
                let label_x = corner_x.min(end.0);
                root.draw(&Text::new(label.clone(), (label_x, label_y), text.clone()))
                    .map_err(PlotError::render)?;
            }
        }

        if scalebar.size_y > 0.0 && len_y > 0 {
            let end = (corner_x, corner_y + dir_y * len_y);
            root.draw(&PathElement::new(vec![(corner_x, corner_y), end], bar_style))
                .map_err(PlotError::render)?;
            if let Some(label) = &scalebar.label_y {
                let label_x = corner_x + dir_x * sep;
                let label_y = (corner_y + end.1) / 2 - font_px as i32 / 2;
                root.draw(&Text::new(label.clone(), (label_x, label_y), text.clone()))
                    .map_err(PlotError::render)?;
            }
        }

        Ok(())
    }
}

/// Widen a zero-width chart range so plotters can map it.
fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    if (hi - lo).abs() > f64::EPSILON {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// Map a data value onto a chart axis, clamping infinities to the range ends.
fn to_axis(v: f64, scale: AxisScale, range: (f64, f64)) -> Option<f64> {
    if v.is_nan() {
        return None;
    }
    let t = scale.forward(v);
    Some(if t == f64::NEG_INFINITY {
        range.0
    } else if t == f64::INFINITY {
        range.1
    } else {
        t
    })
}

/// Split a polyline at missing (NaN) samples.
fn segments<F>(x: &[f64], y: &[f64], to_chart: &F) -> Vec<Vec<(f64, f64)>>
where
    F: Fn(f64, f64) -> Option<(f64, f64)>,
{
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (&x, &y) in x.iter().zip(y) {
        match to_chart(x, y) {
            Some(point) => current.push(point),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Pixel offset from a marker's anchor.
type Offset = (i32, i32);

/// One marker placement, in chart coordinates with a pixel radius.
struct Glyph {
    at: (f64, f64),
    radius: i32,
    color: RGBAColor,
    stroke: u32,
}

/// Draw `marker` at every glyph; each shape is its own series.
fn draw_markers<'a, DB: DrawingBackend + 'a>(
    chart: &mut Chart2d<'a, DB>,
    marker: Marker,
    glyphs: &[Glyph],
) -> Result<()> {
    let at = |g: &Glyph| EmptyElement::<(f64, f64), DB>::at(g.at);
    let fill = |g: &Glyph| g.color.filled();
    let line = |g: &Glyph| g.color.stroke_width(g.stroke);

    let drawn = match marker {
        Marker::None => return Ok(()),
        Marker::Circle => chart.draw_series(glyphs.iter().map(|g| at(g) + Circle::new((0, 0), g.radius, fill(g)))),
        Marker::Point => {
            chart.draw_series(glyphs.iter().map(|g| at(g) + Circle::new((0, 0), (g.radius / 2).max(1), fill(g))))
        }
        Marker::Square => chart.draw_series(glyphs.iter().map(|g| {
            let r = g.radius;
            at(g) + Rectangle::new([(-r, -r), (r, r)], fill(g))
        })),
        Marker::TriangleUp => chart.draw_series(glyphs.iter().map(|g| {
            let r = g.radius;
            at(g) + Polygon::new(vec![(0, -r), (r, r), (-r, r)], fill(g))
        })),
        Marker::TriangleDown => chart.draw_series(glyphs.iter().map(|g| {
            let r = g.radius;
            at(g) + Polygon::new(vec![(0, r), (r, -r), (-r, -r)], fill(g))
        })),
        Marker::TriangleLeft => chart.draw_series(glyphs.iter().map(|g| {
            let r = g.radius;
            at(g) + Polygon::new(vec![(-r, 0), (r, -r), (r, r)], fill(g))
        })),
        Marker::TriangleRight => chart.draw_series(glyphs.iter().map(|g| {
            let r = g.radius;
            at(g) + Polygon::new(vec![(r, 0), (-r, r), (-r, -r)], fill(g))
        })),
        Marker::Diamond => chart.draw_series(glyphs.iter().map(|g| {
            let r = g.radius;
            at(g) + Polygon::new(vec![(0, -r), (r, 0), (0, r), (-r, 0)], fill(g))
        })),
        Marker::Star => chart.draw_series(glyphs.iter().map(|g| at(g) + Polygon::new(star(g.radius), fill(g)))),
        Marker::Cross => chart.draw_series(glyphs.iter().map(|g| {
            let r = g.radius;
            at(g)
                + PathElement::<Offset>::new(vec![(-r, -r), (r, r)], line(g))
                + PathElement::<Offset>::new(vec![(-r, r), (r, -r)], line(g))
        })),
        Marker::Plus => chart.draw_series(glyphs.iter().map(|g| {
            let r = g.radius;
            at(g)
                + PathElement::<Offset>::new(vec![(-r, 0), (r, 0)], line(g))
                + PathElement::<Offset>::new(vec![(0, -r), (0, r)], line(g))
        })),
        Marker::VLine => chart.draw_series(glyphs.iter().map(|g| {
            at(g) + PathElement::<Offset>::new(vec![(0, -g.radius), (0, g.radius)], line(g))
        })),
        Marker::HLine => chart.draw_series(glyphs.iter().map(|g| {
            at(g) + PathElement::<Offset>::new(vec![(-g.radius, 0), (g.radius, 0)], line(g))
        })),
        Marker::Pixel => chart.draw_series(glyphs.iter().map(|g| at(g) + Pixel::<Offset>::new((0, 0), g.color))),
    };
    drawn.map(|_| ()).map_err(PlotError::render)
}

/// Five-pointed star outline, point up, in pixel offsets.
fn star(radius: i32) -> Vec<Offset> {
    let outer = radius as f64;
    let inner = outer * 0.4;
    (0..10)
        .map(|k| {
            let r = if k % 2 == 0 { outer } else { inner };
            let angle = std::f64::consts::FRAC_PI_2 + k as f64 * std::f64::consts::PI / 5.0;
            ((r * angle.cos()).round() as i32, -(r * angle.sin()).round() as i32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::figure::{Bar, BarSet, PointSet, Trace};
    use crate::charts::legend::LegendOptions;
    use crate::charts::scalebar::ScalebarOptions;
    use crate::style::{StyleParams, BLACK, SIM_PALETTE};

    /// A figure with no text at all, so rendering needs no system fonts.
    fn bare_figure() -> Figure {
        let mut style = StyleParams::default();
        style.x_tick_labels = false;
        style.y_tick_labels = false;
        Figure::new((2.0, 1.5), style)
    }

    #[test]
    fn file_types_parse_case_insensitively() {
        assert_eq!("PNG".parse::<FileType>().unwrap(), FileType::Png);
        assert_eq!(".svg".parse::<FileType>().unwrap(), FileType::Svg);
        assert!(matches!(
            "eps".parse::<FileType>(),
            Err(PlotError::UnsupportedFileType(_))
        ));
        assert_eq!(FileType::Jpeg.to_string(), "jpeg");
    }

    #[test]
    fn to_axis_clamps_log_zero() {
        let log = AxisScale { log: true, inverted: false };
        assert_eq!(to_axis(0.0, log, (-1.0, 2.0)), Some(-1.0));
        assert_eq!(to_axis(100.0, log, (-1.0, 2.0)), Some(2.0));
        assert_eq!(to_axis(f64::NAN, log, (-1.0, 2.0)), None);
    }

    #[test]
    fn segments_break_at_nan() {
        let id = |x: f64, y: f64| to_axis(y, AxisScale::default(), (0.0, 1.0)).map(|y| (x, y));
        let parts = segments(&[0.0, 1.0, 2.0, 3.0], &[0.0, f64::NAN, 1.0, 2.0], &id);
        assert_eq!(parts, vec![vec![(0.0, 0.0)], vec![(2.0, 1.0), (3.0, 2.0)]]);
    }

    #[test]
    fn svg_contains_drawn_artists() {
        let mut figure = bare_figure();
        figure.axes.add(Artist::Trace(Trace {
            x: vec![0.0, 1.0, 2.0],
            y: vec![0.0, 1.0, 0.0],
            color: BLACK,
            line_width: 1.0,
            marker: Marker::None,
            marker_size: 6.0,
            alpha: None,
            label: None,
        }));
        figure.axes.add(Artist::Points(PointSet {
            x: vec![0.5, 1.5],
            y: vec![0.5, 0.5],
            sizes: vec![36.0, 36.0],
            colors: vec![BLACK, BLACK],
            marker: Marker::Circle,
            line_widths: vec![1.0, 1.0],
            alpha: None,
            label: None,
        }));
        figure.axes.add(Artist::Bars(BarSet {
            bars: vec![Bar { x0: 0.0, x1: 1.0, y0: 0.0, y1: 1.0 }],
            color: BLACK,
            alpha: Some(0.5),
            label: None,
            horizontal: false,
        }));

        let svg = FigureRenderer::to_svg_string(&figure).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<polyline"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains("<rect"));
    }

    #[test]
    fn svg_carries_title_ticks_legend_and_scalebar_text() {
        let style = StyleParams::default();
        let mut figure = Figure::new((4.0, 3.0), style.clone());
        figure.axes.add(Artist::Trace(Trace {
            x: vec![0.0, 10.0, 20.0, 30.0],
            y: vec![-0.065, -0.06, 0.02, -0.07],
            color: SIM_PALETTE[0],
            line_width: 1.5,
            marker: Marker::Star,
            marker_size: 6.0,
            alpha: None,
            label: Some("soma".to_string()),
        }));
        figure.axes.add(Artist::Points(PointSet {
            x: vec![5.0, 25.0],
            y: vec![0.0, 0.0],
            sizes: vec![25.0, 25.0],
            colors: vec![BLACK, BLACK],
            marker: Marker::VLine,
            line_widths: vec![1.0, 2.0],
            alpha: None,
            label: Some("spikes".to_string()),
        }));
        figure.axes.title = Some("Membrane potential".to_string());

        let legend = Legend::from_axes(&figure.axes, &LegendOptions::default(), &style).unwrap();
        figure.axes.legend = Some(legend);
        let scalebar = Scalebar::build(&mut figure.axes, &ScalebarOptions::default(), &style).unwrap();
        figure.axes.scalebar = Some(scalebar);

        let svg = FigureRenderer::to_svg_string(&figure).unwrap();
        assert!(svg.contains("Membrane potential"));
        assert!(svg.contains(">soma<"));
        assert!(svg.contains(">spikes<"));
        assert!(svg.contains("100 µV"));
        // x tick labels stay visible; the scalebar hides the y axis.
        assert!(svg.contains(">10<"));
    }

    #[test]
    fn bitmap_buffer_has_figure_dimensions() {
        let figure = bare_figure();
        let buffer = FigureRenderer::to_rgb_buffer(&figure).unwrap();
        assert_eq!(buffer.len(), 200 * 150 * 3);
        // White face color fills the background.
        assert!(buffer[..3].iter().all(|&b| b == 255));
    }
}
