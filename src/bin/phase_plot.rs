use anyhow::Context;
use log::info;
use vdp_phase::phase_plot::parse_cli;
use vdp_phase::{Dataset, PhaseConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let txtin = parse_cli();
    info!("read data from {}", txtin.display());
    let ds = Dataset::from_txt(&txtin)
        .with_context(|| format!("could not load {}", txtin.display()))?;
    ds.show_phase(&PhaseConfig::default())
        .context("could not show the phase plot")?;
    Ok(())
}
