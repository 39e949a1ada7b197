use super::{RESULTS_FILE, VERSION};
use crate::ode::{Method, StepControl, VanDerPol};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Everything the solver app needs, as parsed from the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveArgs {
    pub system: VanDerPol,
    pub y0: [f64; 2],
    pub t0: f64,
    pub t_end: f64,
    pub method: Method,
    pub control: StepControl,
    pub txtout: PathBuf,
    pub verbose: bool,
}

/// Command line of the solver app.
/// All numeric arguments have defaults, so get_one always returns Some.
pub fn cli() -> Command {
    let arg_mu = Arg::new("mu")
        .help("stiffness parameter of the oscillator")
        .long("mu")
        .num_args(1)
        .allow_hyphen_values(true)
        .value_parser(value_parser!(f64))
        .default_value("6.0");
    let arg_p = Arg::new("p")
        .help("scaling parameter of the second equation")
        .long("p")
        .num_args(1)
        .allow_hyphen_values(true)
        .value_parser(value_parser!(f64))
        .default_value("1.0");
    let arg_y1 = Arg::new("y1")
        .help("initial condition of y1")
        .long("y1")
        .num_args(1)
        .allow_hyphen_values(true)
        .value_parser(value_parser!(f64))
        .default_value("2.0");
    let arg_y2 = Arg::new("y2")
        .help("initial condition of y2")
        .long("y2")
        .num_args(1)
        .allow_hyphen_values(true)
        .value_parser(value_parser!(f64))
        .default_value("0.0");
    let arg_t0 = Arg::new("t0")
        .help("initial time")
        .long("t0")
        .num_args(1)
        .allow_hyphen_values(true)
        .value_parser(value_parser!(f64))
        .default_value("0.0");
    let arg_tend = Arg::new("tend")
        .help("end time")
        .long("tend")
        .num_args(1)
        .allow_hyphen_values(true)
        .value_parser(value_parser!(f64))
        .default_value("20.0");
    let arg_step = Arg::new("step")
        .help("initial step size")
        .short('s')
        .long("step")
        .num_args(1)
        .value_parser(value_parser!(f64))
        .default_value("0.1");
    let arg_tolerance = Arg::new("tolerance")
        .help("local error tolerance for the step size control")
        .short('t')
        .long("tolerance")
        .num_args(1)
        .value_parser(value_parser!(f64))
        .default_value("1e-4");
    let arg_method = Arg::new("method")
        .help("integration method")
        .short('m')
        .long("method")
        .num_args(1)
        .value_parser(["euler", "rk2"])
        .default_value("euler");
    let arg_txtout = Arg::new("output_txtfile")
        .help("name of the output file with the y1 and y2 columns")
        .short('o')
        .long("output")
        .num_args(1)
        .value_parser(value_parser!(PathBuf))
        .default_value(RESULTS_FILE);
    let arg_verbose = Arg::new("verbose")
        .help("print verbose information")
        .short('v')
        .long("verbose")
        .action(ArgAction::SetTrue);
    Command::new("vdp_solve")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli app to integrate the Van der Pol oscillator and save y1 and y2 for the phase plot")
        .arg(arg_mu)
        .arg(arg_p)
        .arg(arg_y1)
        .arg(arg_y2)
        .arg(arg_t0)
        .arg(arg_tend)
        .arg(arg_step)
        .arg(arg_tolerance)
        .arg(arg_method)
        .arg(arg_txtout)
        .arg(arg_verbose)
}

/// Collect the parsed matches into SolveArgs.
/// Only the system parameters are validated here, the solver checks the rest.
pub fn from_matches(cli_args: &ArgMatches) -> crate::error::Result<SolveArgs> {
    let get = |id: &str| *cli_args.get_one::<f64>(id).unwrap();
    let system = VanDerPol::new(get("mu"), get("p"))?;
    let method: Method = cli_args.get_one::<String>("method").unwrap().parse()?;
    let control = StepControl {
        initial_step: get("step"),
        tolerance: get("tolerance"),
        ..StepControl::default()
    };
    let txtout = cli_args
        .get_one::<PathBuf>("output_txtfile")
        .unwrap()
        .to_owned();
    Ok(SolveArgs {
        system,
        y0: [get("y1"), get("y2")],
        t0: get("t0"),
        t_end: get("tend"),
        method,
        control,
        txtout,
        verbose: cli_args.get_flag("verbose"),
    })
}

/// Takes the CLI arguments that control the integration.
pub fn parse_cli() -> crate::error::Result<SolveArgs> {
    from_matches(&cli().get_matches())
}
