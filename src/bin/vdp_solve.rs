use anyhow::Context;
use log::{debug, info};
use vdp_phase::ode::solve;
use vdp_phase::vdp_solve::parse_cli;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_cli()?;

    if args.verbose {
        debug!("{:?}", args);
        println!("mu {}", args.system.mu);
        println!("p {}", args.system.p);
        println!("y0 {:?}", args.y0);
        println!("t0 {}", args.t0);
        println!("t_end {}", args.t_end);
        println!("method {}", args.method);
        println!("initial step {}", args.control.initial_step);
        println!("tolerance {}", args.control.tolerance);
        println!("output {:?}", args.txtout);
    }

    info!(
        "> integrate Van der Pol with mu = {}, p = {} from t = {} to {}",
        args.system.mu, args.system.p, args.t0, args.t_end
    );
    let trajectory = solve(
        &args.system,
        args.method,
        args.t0,
        &args.y0,
        args.t_end,
        &args.control,
    )
    .context("integration failed")?;

    let phase = trajectory.phase(0, 1);
    phase
        .to_txt(&args.txtout)
        .with_context(|| format!("could not save {}", args.txtout.display()))?;
    println!(
        "Results saved to {} ({} points).",
        args.txtout.display(),
        phase.len()
    );
    Ok(())
}
