//! General Plotter
//! Figure lifecycle shared by every plot kind: acquire a figure, apply style
//! overrides, let the plot kind draw, then finish (axis formatting, data,
//! legend, scalebar, save, show) and restore the style state.

use crate::charts::{Axes, Figure, FigureRenderer, FileType, Legend, LegendOptions, Scalebar, ScalebarOptions};
use crate::data::{DataLoader, DataSource, PlotData};
use crate::error::Result;
use crate::plotter::{FigureOptions, PlotKind, PlotterConfig, PlotterOptions};
use crate::style::{self, StyleGuard, StyleParams};
use std::path::{Path, PathBuf};

/// Resolved output location of a figure.
struct Target {
    path: PathBuf,
    /// Extension with its leading dot.
    ext: String,
    file_type: FileType,
}

pub struct GeneralPlotter {
    kind: PlotKind,
    data: PlotData,
    figure: Figure,
    /// Style in effect while drawing (global state plus overrides).
    style: StyleParams,
    config: PlotterConfig,
    guard: Option<StyleGuard>,
    file_name: Option<PathBuf>,
}

impl GeneralPlotter {
    /// Resolve the data, apply style overrides and acquire a figure.
    ///
    /// Config style overrides are applied first, then `options.style`. A
    /// supplied figure is drawn into as is; otherwise a new figure is sized
    /// from `options.fig_size` or `figure.figsize`.
    pub fn new(kind: PlotKind, source: impl Into<DataSource>, options: PlotterOptions) -> Result<Self> {
        let data = source.into().resolve()?;

        let mut overrides = options.config.style.clone();
        overrides.extend(options.style);
        let guard = StyleGuard::apply(&overrides)?;
        let style = style::current();

        let figure = match options.figure {
            Some(figure) => figure,
            None => Figure::new(options.fig_size.unwrap_or(style.fig_size), style.clone()),
        };

        tracing::debug!(kind = %kind, keys = data.len(), "plotter created");
        Ok(Self {
            kind,
            data,
            figure,
            style,
            config: options.config,
            guard: Some(guard),
            file_name: None,
        })
    }

    pub fn kind(&self) -> PlotKind {
        self.kind
    }

    pub fn data(&self) -> &PlotData {
        &self.data
    }

    pub fn style(&self) -> &StyleParams {
        &self.style
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn axes_mut(&mut self) -> &mut Axes {
        &mut self.figure.axes
    }

    /// Drawing parameters and the axes to draw them into.
    pub fn parts_mut(&mut self) -> (&PlotData, &StyleParams, &mut Axes) {
        (&self.data, &self.style, &mut self.figure.axes)
    }

    /// Path of the last saved figure.
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn into_figure(self) -> Figure {
        self.figure
    }

    pub fn format_axis(&mut self, opts: &FigureOptions) {
        let axes = &mut self.figure.axes;
        if let Some(title) = &opts.title {
            axes.title = Some(title.clone());
        }
        if let Some(xlabel) = &opts.xlabel {
            axes.xlabel = Some(xlabel.clone());
        }
        if let Some(ylabel) = &opts.ylabel {
            axes.ylabel = Some(ylabel.clone());
        }
        if let Some(xlim) = opts.xlim {
            axes.xlim = Some(xlim);
        }
        if let Some(ylim) = opts.ylim {
            axes.ylim = Some(ylim);
        }
        if opts.invert_yaxis {
            axes.invert_yaxis();
        }
    }

    /// Write the drawing parameters as JSON next to the figure, named from
    /// the figure's stem with a `_data.json` suffix.
    pub fn save_data(&self, opts: &FigureOptions) -> Result<PathBuf> {
        let target = self.target(opts)?;
        self.write_data(&target)
    }

    /// Legend from the labelled artists.
    pub fn add_legend(&mut self, options: &LegendOptions) -> Result<()> {
        let legend = Legend::from_axes(&self.figure.axes, options, &self.style)?;
        self.figure.axes.legend = Some(legend);
        Ok(())
    }

    pub fn add_scalebar(&mut self, options: &ScalebarOptions) -> Result<()> {
        let scalebar = Scalebar::build(&mut self.figure.axes, options, &self.style)?;
        self.figure.axes.scalebar = Some(scalebar);
        Ok(())
    }

    /// Render the figure to a file and return its path.
    ///
    /// The name is `<fileName or default><_fileDesc or _kind>.<fileType>`,
    /// placed under `fileDir`. With `overwrite` off, a two-digit counter is
    /// bumped until the name is free.
    pub fn save_fig(&mut self, opts: &FigureOptions) -> Result<PathBuf> {
        let target = self.target(opts)?;
        self.write_fig(&target)
    }

    /// Resolve the figure path and file type for `opts`. With `overwrite`
    /// off, a stem is taken when its figure or (with `saveData`) its data
    /// file exists.
    fn target(&self, opts: &FigureOptions) -> Result<Target> {
        let file_type: FileType = match opts.file_type.as_ref().or(self.config.file_type.as_ref()) {
            Some(file_type) => file_type.parse()?,
            None => self.style.save_format,
        };
        let ext = format!(".{}", file_type.extension());

        let name = figure_file_name(
            opts.target_name(),
            &self.description(opts),
            &self.config.file_name,
            &ext,
        );
        let mut path = self.output_dir(opts).join(name);
        if !opts.overwrite {
            path = next_free(&path, &ext, |figure| {
                figure.is_file() || (opts.save_data && data_path(figure, &ext).is_file())
            });
        }
        Ok(Target { path, ext, file_type })
    }

    fn write_data(&self, target: &Target) -> Result<PathBuf> {
        let path = data_path(&target.path, &target.ext);
        create_parent(&path)?;
        DataLoader::save(&self.data, &path)?;
        tracing::info!(path = %path.display(), "saved plot data");
        Ok(path)
    }

    fn write_fig(&mut self, target: &Target) -> Result<PathBuf> {
        let path = target.path.clone();
        create_parent(&path)?;
        FigureRenderer::save(&self.figure, &path, target.file_type)?;
        tracing::info!(path = %path.display(), "saved figure");

        self.file_name = Some(path.clone());
        Ok(path)
    }

    /// Open the figure in the system viewer, rendering it to a temporary PNG
    /// when it has not been saved.
    pub fn show_fig(&self) -> Result<PathBuf> {
        let path = match &self.file_name {
            Some(path) => path.clone(),
            None => {
                let path = std::env::temp_dir().join(format!(
                    "simplot_{}_{}.png",
                    self.kind,
                    std::process::id()
                ));
                FigureRenderer::save(&self.figure, &path, FileType::Png)?;
                path
            }
        };
        open::that(&path)?;
        tracing::debug!(path = %path.display(), "opened figure viewer");
        Ok(path)
    }

    /// Run the finishing steps in order, then restore the style state.
    /// The style is restored even when a step fails.
    pub fn finish(&mut self, opts: &FigureOptions) -> Result<()> {
        let result = self.finish_steps(opts);
        self.restore_style();
        result
    }

    fn finish_steps(&mut self, opts: &FigureOptions) -> Result<()> {
        self.format_axis(opts);

        // Data and figure share one resolved stem.
        let target = if opts.save_data || opts.wants_save() {
            Some(self.target(opts)?)
        } else {
            None
        };

        if let Some(target) = target.as_ref().filter(|_| opts.save_data) {
            self.write_data(target)?;
        }
        if let Some(legend) = opts.legend.as_ref().and_then(|l| l.options()) {
            self.add_legend(&legend)?;
        }
        if let Some(scalebar) = opts.scalebar.as_ref().and_then(|s| s.options()) {
            self.add_scalebar(&scalebar)?;
        }
        if let Some(target) = target.as_ref().filter(|_| opts.wants_save()) {
            self.write_fig(target)?;
        }
        if opts.show_fig {
            self.show_fig()?;
        }
        Ok(())
    }

    pub fn restore_style(&mut self) {
        if let Some(guard) = self.guard.take() {
            guard.restore();
        }
    }

    fn description(&self, opts: &FigureOptions) -> String {
        match &opts.file_desc {
            Some(desc) => format!("_{desc}"),
            None => format!("_{}", self.kind),
        }
    }

    fn output_dir(&self, opts: &FigureOptions) -> PathBuf {
        opts.file_dir
            .clone()
            .or_else(|| self.config.file_dir.clone())
            .unwrap_or_default()
    }
}

/// `<name><desc><ext>`, where a name already ending in `ext` loses it first
/// and a missing name falls back to `default_name`.
pub fn figure_file_name(name: Option<&str>, desc: &str, default_name: &str, ext: &str) -> String {
    match name.filter(|n| !n.is_empty()) {
        None => format!("{default_name}{desc}{ext}"),
        Some(name) => {
            let stem = name.strip_suffix(ext).unwrap_or(name);
            format!("{stem}{desc}{ext}")
        }
    }
}

/// First path that does not exist, bumping a trailing `_NN` counter
/// (`_01`, `_02`, ...) on the file stem.
pub fn next_free_path(path: &Path, ext: &str) -> PathBuf {
    next_free(path, ext, |p| p.is_file())
}

fn next_free(path: &Path, ext: &str, taken: impl Fn(&Path) -> bool) -> PathBuf {
    let mut path = path.to_path_buf();
    while taken(&path) {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let stem = name.strip_suffix(ext).unwrap_or(&name);
        path.set_file_name(format!("{}{ext}", bump_counter(stem)));
    }
    path
}

/// `<figure stem>_data.json` beside the figure.
fn data_path(figure: &Path, ext: &str) -> PathBuf {
    let name = figure.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let stem = name.strip_suffix(ext).unwrap_or(name);
    figure.with_file_name(format!("{stem}_data.json"))
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn bump_counter(stem: &str) -> String {
    match stem.rsplit_once('_') {
        Some((base, num)) if !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit()) => {
            match num.parse::<u64>() {
                Ok(n) => format!("{base}_{:02}", n + 1),
                Err(_) => format!("{stem}_01"),
            }
        }
        _ => format!("{stem}_01"),
    }
}
