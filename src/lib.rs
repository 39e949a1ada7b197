use crate::error::{PhaseError, Result};
use crate::utils::*;
use log::{debug, info, warn};
use plotly::color::NamedColor;
use plotly::common::{Line, Mode, Title};
use plotly::layout::Axis;
use plotly::{Layout, Plot, Scatter};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
pub mod error;
pub mod ode;
pub mod phase_plot;
pub mod utils;
pub mod vdp_solve;

// constants
pub const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
pub const RESULTS_FILE: &str = "results.txt";

/// The phase data: two index-aligned columns read from the same lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub y1: Vec<f64>,
    pub y2: Vec<f64>,
}

/// Labels, colors, and size of the phase portrait.
#[derive(Debug, Clone)]
pub struct PhaseConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// legend entry of the single trace
    pub name: String,
    pub color: NamedColor,
    /// figure size in inches, converted with `dpi`
    pub size: (f64, f64),
    pub dpi: f64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            title: String::from("Van der Pol Oscillator - y1 vs y2"),
            x_label: String::from("y1"),
            y_label: String::from("y2"),
            name: String::from("y1 vs y2"),
            color: NamedColor::Blue,
            size: (8., 6.),
            dpi: 100.,
        }
    }
}

impl PhaseConfig {
    /// Figure width and height in pixels.
    pub fn pixels(&self) -> (usize, usize) {
        (
            (self.size.0 * self.dpi).round() as usize,
            (self.size.1 * self.dpi).round() as usize,
        )
    }
}

impl Dataset {
    /// Initiate an empty Dataset
    /// using the given capacity for the two columns
    pub fn new(capacity: usize) -> Dataset {
        Dataset {
            y1: Vec::with_capacity(capacity),
            y2: Vec::with_capacity(capacity),
        }
    }

    /// Read the two whitespace-separated columns from a text file.
    /// Blank lines are skipped, any other line must hold exactly two floats.
    /// The file is closed when this returns, on success and on error.
    pub fn from_txt<P>(fin: P) -> Result<Dataset>
    where
        P: AsRef<Path>,
    {
        let fin = fin.as_ref();
        let dataset = {
            let file = File::open(fin).map_err(|e| PhaseError::from_io(fin, e))?;
            Dataset::from_reader(BufReader::new(file)).map_err(|e| match e {
                PhaseError::Io { source, .. } => PhaseError::from_io(fin, source),
                other => other,
            })?
        };
        info!("read {} sample pairs from {}", dataset.len(), fin.display());
        Ok(dataset)
    }

    /// Parse any buffered reader, see `from_txt`.
    /// Read failures are reported against the placeholder path "<reader>".
    pub fn from_reader<R: BufRead>(buf: R) -> Result<Dataset> {
        let mut dataset = Dataset::new(1024);
        for (i, l) in buf.lines().enumerate() {
            let l = l.map_err(|e| match e.kind() {
                std::io::ErrorKind::InvalidData => {
                    PhaseError::parse(i + 1, "<invalid utf-8>", e.to_string())
                }
                _ => PhaseError::from_io("<reader>", e),
            })?;
            match parse_pair(&l, i + 1)? {
                Some((y1, y2)) => dataset.push(y1, y2),
                None => debug!("skipping blank line {}", i + 1),
            }
        }
        Ok(dataset)
    }

    /// Write one `y1<TAB>y2` line per sample pair.
    /// Floats use the shortest representation that parses back to the same value.
    pub fn to_txt<P>(&self, fout: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let fout = fout.as_ref();
        let file = File::create(fout).map_err(|e| PhaseError::from_io(fout, e))?;
        let mut buf = BufWriter::new(file);
        for (y1, y2) in self.pairs() {
            writeln!(buf, "{}\t{}", y1, y2).map_err(|e| PhaseError::from_io(fout, e))?;
        }
        buf.flush().map_err(|e| PhaseError::from_io(fout, e))?;
        info!("wrote {} sample pairs to {}", self.len(), fout.display());
        Ok(())
    }

    pub fn push(&mut self, y1: f64, y2: f64) {
        self.y1.push(y1);
        self.y2.push(y2);
    }

    pub fn len(&self) -> usize {
        self.y1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y1.is_empty()
    }

    /// Iterate over the (y1, y2) sample pairs in line order.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.y1.iter().copied().zip(self.y2.iter().copied())
    }

    /// Build the phase portrait, y2 against y1 joined in line order.
    pub fn phase_plot(&self, config: &PhaseConfig) -> Plot {
        let trace = Scatter::new(self.y1.clone(), self.y2.clone())
            .mode(Mode::Lines)
            .name(&config.name)
            .line(Line::new().color(config.color));
        let (width, height) = config.pixels();
        let layout = Layout::new()
            .title(Title::new(&config.title))
            .x_axis(Axis::new().title(Title::new(&config.x_label)).show_grid(true))
            .y_axis(Axis::new().title(Title::new(&config.y_label)).show_grid(true))
            .show_legend(true)
            .width(width)
            .height(height);
        let mut plot = Plot::new();
        plot.add_trace(trace);
        plot.set_layout(layout);
        plot
    }

    /// Build the phase portrait and open it in the default viewer.
    /// Without a display, or when no viewer can be started, only warn and return.
    pub fn show_phase(&self, config: &PhaseConfig) -> Result<()> {
        let plot = self.phase_plot(config);
        if !has_display() {
            warn!("no display available, not showing the phase plot");
            return Ok(());
        }
        let tmp_dir = std::env::temp_dir();
        let (mut file, html) = tempfile::Builder::new()
            .prefix("vdp_phase_")
            .suffix(".html")
            .tempfile()
            .and_then(|f| f.keep().map_err(|e| e.error))
            .map_err(|e| PhaseError::from_io(&tmp_dir, e))?;
        file.write_all(plot.to_html().as_bytes())
            .map_err(|e| PhaseError::from_io(&html, e))?;
        drop(file);
        match open_in_viewer(&html) {
            Ok(()) => info!("showing {} sample pairs from {}", self.len(), html.display()),
            Err(e) => warn!("could not open a viewer for {}: {}", html.display(), e),
        }
        Ok(())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "y1\ty2")?;
        for (y1, y2) in self.pairs() {
            writeln!(f, "{}\t{}", y1, y2)?;
        }
        Ok(())
    }
}
