use crate::efficiency::ScalingCurve;
use crate::error_series::ErrorSeries;
use benchmark_results::RunType;
use log::{debug, warn};
use pgfplots::axis::plot::coordinate::Coordinate2D;
use pgfplots::axis::plot::{Plot2D, PlotKey};
use pgfplots::axis::{Axis, AxisKey};
use pgfplots::{Engine, Picture};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Series starting at one of these dart counts are drawn with markers.
pub const MARKED_DART_COUNTS: [u64; 2] = [1000, 1_000_000];

const AXIS_STYLE: &str = "height=9cm, width=15cm, grid=major, tick align=outside, tick pos=left";

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("failed to write plot {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Consumer of the computed series. Returns the path of the main artifact.
pub trait ChartRenderer {
    fn render_error_series(
        &self,
        run_type: RunType,
        series: &BTreeMap<u32, ErrorSeries>,
    ) -> Result<PathBuf, PlotError>;

    fn render_runtime(&self, curve: &ScalingCurve) -> Result<PathBuf, PlotError>;
}

pub fn error_plot_name(run_type: RunType) -> String {
    format!("pi_error_for_darts_used_{}", run_type.suffix())
}

pub fn runtime_plot_name(run_type: RunType, total_darts: u64) -> String {
    format!(
        "pi_runtime_versus_processor_count_{}_darts_{}",
        total_darts,
        run_type.suffix()
    )
}

fn legend_entries<'a>(entries: impl IntoIterator<Item = &'a String>) -> String {
    let entries: Vec<String> = entries
        .into_iter()
        .map(|entry| format!("{{{}}}", entry))
        .collect();
    format!("legend entries={{{}}}", entries.join(","))
}

/// Log-log error against dart count, one line per processor count.
pub fn error_picture(run_type: RunType, series: &BTreeMap<u32, ErrorSeries>) -> Picture {
    let mut axis = Axis::new();
    axis.set_title(&format!("Errors in Computed Values of Pi: {}", run_type));
    axis.set_x_label("Total Darts Used to Compute Pi");
    axis.set_y_label("Error in Computed Value of Pi");
    axis.add_key(AxisKey::Custom(String::from("xmode=log, ymode=log")));
    axis.add_key(AxisKey::Custom(String::from(AXIS_STYLE)));

    let mut legend = Vec::new();
    for (ranks, s) in series {
        let mut plot = Plot2D::new();
        plot.coordinates = s
            .points
            .iter()
            .map(|p| Coordinate2D::from((p.total_darts as f64, p.error)))
            .collect();
        let marked = s
            .smallest_darts()
            .is_some_and(|darts| MARKED_DART_COUNTS.contains(&darts));
        plot.add_key(PlotKey::Custom(String::from(if marked {
            "mark=*"
        } else {
            "no markers"
        })));
        axis.plots.push(plot);
        legend.push(format!("Ranks: {}", ranks));
    }
    axis.add_key(AxisKey::Custom(legend_entries(&legend)));
    axis.add_key(AxisKey::Custom(String::from("legend pos=outer north east")));
    Picture::from(axis)
}

/// Measured runtime against processor count, with the ideal scaling line.
pub fn runtime_picture(curve: &ScalingCurve) -> Picture {
    let mut axis = Axis::new();
    axis.set_title(&format!(
        "{} Darts Runtime vs. Processor Count: {}",
        curve.total_darts, curve.run_type
    ));
    axis.set_x_label("Processor Count (Ranks)");
    axis.set_y_label("Runtime (seconds)");
    axis.add_key(AxisKey::Custom(String::from(AXIS_STYLE)));

    let mut measured = Plot2D::new();
    measured.coordinates = curve
        .points
        .iter()
        .map(|p| Coordinate2D::from((p.ranks as f64, p.time_taken)))
        .collect();
    measured.add_key(PlotKey::Custom(String::from("mark=*")));

    let mut ideal = Plot2D::new();
    ideal.coordinates = curve
        .points
        .iter()
        .map(|p| Coordinate2D::from((p.ranks as f64, p.ideal_time)))
        .collect();
    ideal.add_key(PlotKey::Custom(String::from("dashed, no markers")));

    axis.plots.push(measured);
    axis.plots.push(ideal);
    let legend = [
        format!("{} Darts", curve.total_darts),
        format!("Ideal Scaling ({} Darts)", curve.total_darts),
    ];
    axis.add_key(AxisKey::Custom(legend_entries(&legend)));
    Picture::from(axis)
}

/// Writes standalone pgfplots sources, optionally compiled to PDF.
pub struct PgfPlotsRenderer {
    folder: PathBuf,
    compile_pdf: bool,
}

impl PgfPlotsRenderer {
    pub fn new(folder: impl AsRef<Path>, compile_pdf: bool) -> Self {
        Self {
            folder: folder.as_ref().to_path_buf(),
            compile_pdf,
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn write_picture(&self, picture: &Picture, jobname: &str) -> Result<PathBuf, PlotError> {
        let tex = self.folder.join(format!("{}.tex", jobname));
        std::fs::write(&tex, picture.standalone_string()).map_err(|source| PlotError::Write {
            path: tex.clone(),
            source,
        })?;
        debug!("Wrote {}", tex.display());

        if self.compile_pdf {
            match picture.to_pdf(&self.folder, jobname, Engine::PdfLatex) {
                Ok(pdf) => debug!("Wrote {}", pdf.display()),
                Err(e) => warn!("Failed to create PDF: {}, {:?}", jobname, e),
            }
        }
        Ok(tex)
    }
}

impl ChartRenderer for PgfPlotsRenderer {
    fn render_error_series(
        &self,
        run_type: RunType,
        series: &BTreeMap<u32, ErrorSeries>,
    ) -> Result<PathBuf, PlotError> {
        self.write_picture(&error_picture(run_type, series), &error_plot_name(run_type))
    }

    fn render_runtime(&self, curve: &ScalingCurve) -> Result<PathBuf, PlotError> {
        self.write_picture(
            &runtime_picture(curve),
            &runtime_plot_name(curve.run_type, curve.total_darts),
        )
    }
}
