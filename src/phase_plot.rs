use super::{RESULTS_FILE, VERSION};
use clap::Command;
use std::path::PathBuf;

/// Command line of the phase plot app.
/// The input file is fixed, only help and version are accepted.
pub fn cli() -> Command {
    Command::new("vdp_phase_plot")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about(format!(
            "cli app to plot the Van der Pol phase portrait (y2 vs y1) read from {}",
            RESULTS_FILE
        ))
}

/// Parse the CLI and return the path of the two-column input file.
pub fn parse_cli() -> PathBuf {
    let _ = cli().get_matches();
    PathBuf::from(RESULTS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_accepts_no_arguments() {
        assert!(cli().try_get_matches_from(["phase_plot"]).is_ok());
        assert!(cli()
            .try_get_matches_from(["phase_plot", "other.txt"])
            .is_err());
    }
}
