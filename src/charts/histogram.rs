//! Histogram Module
//! Binning, normalization and stacking of histogram data, and the layout of
//! the resulting bars or step outlines.

use crate::charts::figure::Bar;
use crate::error::{PlotError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Bins {
    /// Number of equal-width bins over the range.
    Count(usize),
    /// Explicit, increasing bin edges.
    Edges(Vec<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cumulative {
    #[default]
    None,
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistType {
    #[default]
    Bar,
    BarStacked,
    Step,
    StepFilled,
}

impl HistType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bar" => Some(Self::Bar),
            "barstacked" => Some(Self::BarStacked),
            "step" => Some(Self::Step),
            "stepfilled" => Some(Self::StepFilled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Left,
    #[default]
    Mid,
    Right,
}

impl Align {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "mid" => Some(Self::Mid),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vertical" => Some(Self::Vertical),
            "horizontal" => Some(Self::Horizontal),
            _ => None,
        }
    }
}

/// Binning parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BinSpec {
    pub bins: Bins,
    pub range: Option<(f64, f64)>,
    pub weights: Option<Vec<Vec<f64>>>,
    pub density: bool,
    pub cumulative: Cumulative,
    pub stacked: bool,
}

impl Default for BinSpec {
    fn default() -> Self {
        Self {
            bins: Bins::Count(10),
            range: None,
            weights: None,
            density: false,
            cumulative: Cumulative::None,
            stacked: false,
        }
    }
}

/// Binned histogram: one row of bin tops per dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    /// Bin heights, already normalized, accumulated and stacked.
    pub tops: Vec<Vec<f64>>,
}

impl Histogram {
    pub fn compute(datasets: &[Vec<f64>], spec: &BinSpec) -> Result<Self> {
        if let Some(weights) = &spec.weights {
            if weights.len() != datasets.len() {
                return Err(PlotError::length_mismatch("weights", datasets.len(), weights.len()));
            }
            for (w, d) in weights.iter().zip(datasets) {
                if w.len() != d.len() {
                    return Err(PlotError::length_mismatch("weights", d.len(), w.len()));
                }
            }
        }

        let edges = Self::edges(datasets, spec)?;
        let widths: Vec<f64> = edges.windows(2).map(|w| w[1] - w[0]).collect();
        let n_bins = widths.len();

        let mut tops: Vec<Vec<f64>> = datasets
            .iter()
            .enumerate()
            .map(|(k, values)| {
                let weights = spec.weights.as_ref().map(|w| w[k].as_slice());
                bin_counts(values, weights, &edges)
            })
            .collect();

        if spec.density {
            let totals: Vec<f64> = if spec.stacked {
                let all: f64 = tops.iter().flatten().sum();
                vec![all; tops.len()]
            } else {
                tops.iter().map(|row| row.iter().sum()).collect()
            };
            for (row, total) in tops.iter_mut().zip(totals) {
                if total > 0.0 {
                    for (top, width) in row.iter_mut().zip(&widths) {
                        *top /= total * width;
                    }
                }
            }
        }

        if spec.cumulative != Cumulative::None {
            for row in &mut tops {
                if spec.density {
                    for (top, width) in row.iter_mut().zip(&widths) {
                        *top *= width;
                    }
                }
                accumulate(row, spec.cumulative == Cumulative::Reverse);
            }
        }

        if spec.stacked {
            for k in 1..tops.len() {
                let (done, rest) = tops.split_at_mut(k);
                for (top, below) in rest[0].iter_mut().zip(&done[k - 1]) {
                    *top += below;
                }
            }
        }

        debug_assert!(tops.iter().all(|row| row.len() == n_bins));
        Ok(Self { edges, tops })
    }

    fn edges(datasets: &[Vec<f64>], spec: &BinSpec) -> Result<Vec<f64>> {
        match &spec.bins {
            Bins::Edges(edges) => {
                if edges.len() < 2 || edges.windows(2).any(|w| !(w[1] > w[0])) {
                    return Err(PlotError::invalid("bins", "at least two increasing edges"));
                }
                Ok(edges.clone())
            }
            Bins::Count(0) => Err(PlotError::invalid("bins", "a positive bin count")),
            Bins::Count(n) => {
                let (mut lo, mut hi) = match spec.range {
                    Some((lo, hi)) if hi < lo => {
                        return Err(PlotError::invalid("range", "[min, max] with min <= max"))
                    }
                    Some(range) => range,
                    None => datasets
                        .iter()
                        .flatten()
                        .filter(|v| v.is_finite())
                        .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                            None => Some((v, v)),
                            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                        })
                        .unwrap_or((0.0, 1.0)),
                };
                if lo == hi {
                    lo -= 0.5;
                    hi += 0.5;
                }
                let step = (hi - lo) / *n as f64;
                Ok((0..=*n)
                    .map(|i| if i == *n { hi } else { lo + step * i as f64 })
                    .collect())
            }
        }
    }
}

/// Weighted counts; every bin is half-open except the last, which is closed.
fn bin_counts(values: &[f64], weights: Option<&[f64]>, edges: &[f64]) -> Vec<f64> {
    let n_bins = edges.len() - 1;
    let (first, last) = (edges[0], edges[n_bins]);
    let mut counts = vec![0.0; n_bins];

    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() || v < first || v > last {
            continue;
        }
        let idx = edges.partition_point(|&e| e <= v).saturating_sub(1).min(n_bins - 1);
        counts[idx] += weights.map(|w| w[i]).unwrap_or(1.0);
    }
    counts
}

fn accumulate(row: &mut [f64], reverse: bool) {
    let mut running = 0.0;
    if reverse {
        for top in row.iter_mut().rev() {
            running += *top;
            *top = running;
        }
    } else {
        for top in row.iter_mut() {
            running += *top;
            *top = running;
        }
    }
}

/// Drawing parameters that turn a [`Histogram`] into shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistLayout {
    pub histtype: HistType,
    pub align: Align,
    pub orientation: Orientation,
    pub rwidth: Option<f64>,
    pub bottom: f64,
    pub stacked: bool,
}

impl Default for HistLayout {
    fn default() -> Self {
        Self {
            histtype: HistType::Bar,
            align: Align::Mid,
            orientation: Orientation::Vertical,
            rwidth: None,
            bottom: 0.0,
            stacked: false,
        }
    }
}

/// Shapes for one dataset, in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum HistShape {
    Bars(Vec<Bar>),
    Step {
        points: Vec<(f64, f64)>,
        filled: bool,
        baseline: f64,
    },
}

impl HistLayout {
    /// One shape per dataset of `hist`.
    pub fn shapes(&self, hist: &Histogram) -> Vec<HistShape> {
        let shapes = match self.histtype {
            HistType::Bar | HistType::BarStacked => self.bar_shapes(hist),
            HistType::Step | HistType::StepFilled => self.step_shapes(hist),
        };

        if self.orientation == Orientation::Vertical {
            return shapes;
        }
        shapes
            .into_iter()
            .map(|shape| match shape {
                HistShape::Bars(bars) => HistShape::Bars(
                    bars.into_iter()
                        .map(|b| Bar {
                            x0: b.y0,
                            x1: b.y1,
                            y0: b.x0,
                            y1: b.x1,
                        })
                        .collect(),
                ),
                HistShape::Step {
                    points,
                    filled,
                    baseline,
                } => HistShape::Step {
                    points: points.into_iter().map(|(x, y)| (y, x)).collect(),
                    filled,
                    baseline,
                },
            })
            .collect()
    }

    fn stacked(&self) -> bool {
        self.stacked || self.histtype == HistType::BarStacked
    }

    /// Lower edge of every bin for dataset `k`.
    fn base(&self, hist: &Histogram, k: usize) -> Vec<f64> {
        if self.stacked() && k > 0 {
            hist.tops[k - 1].iter().map(|t| t + self.bottom).collect()
        } else {
            vec![self.bottom; hist.edges.len() - 1]
        }
    }

    fn bar_shapes(&self, hist: &Histogram) -> Vec<HistShape> {
        let nx = hist.tops.len().max(1) as f64;
        let stacked = self.stacked();
        let dr = match self.rwidth {
            Some(r) => r.clamp(0.0, 1.0),
            None if hist.tops.len() > 1 && !stacked => 0.8,
            None => 1.0,
        };

        hist.tops
            .iter()
            .enumerate()
            .map(|(k, tops)| {
                let base = self.base(hist, k);
                let bars = hist
                    .edges
                    .windows(2)
                    .enumerate()
                    .map(|(i, edge)| {
                        let total = edge[1] - edge[0];
                        let (width, offset) = if stacked {
                            (dr * total, 0.0)
                        } else {
                            let width = dr * total / nx;
                            (width, -0.5 * dr * total * (1.0 - 1.0 / nx) + k as f64 * width)
                        };
                        let align = match self.align {
                            Align::Left => 0.0,
                            Align::Mid => 0.5 * total,
                            Align::Right => total,
                        };
                        let center = edge[0] + offset + align;
                        Bar {
                            x0: center - width / 2.0,
                            x1: center + width / 2.0,
                            y0: base[i],
                            y1: tops[i] + self.bottom,
                        }
                    })
                    .collect();
                HistShape::Bars(bars)
            })
            .collect()
    }

    fn step_shapes(&self, hist: &Histogram) -> Vec<HistShape> {
        let first_width = hist.edges[1] - hist.edges[0];
        let shift = match self.align {
            Align::Left => -0.5 * first_width,
            Align::Mid => 0.0,
            Align::Right => 0.5 * first_width,
        };
        let edges: Vec<f64> = hist.edges.iter().map(|e| e + shift).collect();
        let filled = self.histtype == HistType::StepFilled;

        hist.tops
            .iter()
            .enumerate()
            .map(|(k, tops)| {
                let base = self.base(hist, k);
                let top: Vec<f64> = tops.iter().map(|t| t + self.bottom).collect();
                let outline = step_vertices(&edges, &top);

                let points = if filled {
                    let mut polygon = outline;
                    polygon.extend(step_vertices(&edges, &base).into_iter().rev());
                    polygon
                } else {
                    let mut path = Vec::with_capacity(outline.len() + 2);
                    path.push((edges[0], base[0]));
                    path.extend(outline);
                    path.push((edges[edges.len() - 1], base[base.len() - 1]));
                    path
                };

                HistShape::Step {
                    points,
                    filled,
                    baseline: self.bottom,
                }
            })
            .collect()
    }
}

/// `(e0, v0) (e1, v0) (e1, v1) ... (en, v[n-1])`
fn step_vertices(edges: &[f64], values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .flat_map(|(i, &v)| [(edges[i], v), (edges[i + 1], v)])
        .collect()
}
