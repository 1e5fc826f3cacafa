use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use scene_pick::harness::run_repr_refine_scenario;
use scene_pick::options::Options;
use scene_pick::render::{create_backend, BackendKind};
use scene_pick::repr::ReprToken;
use scene_pick::PickError;

/// Run the repr/refine picking scenario and report OK or FAILED.
#[derive(Parser, Debug)]
#[command(name = "scene-pick", version)]
struct Args {
    /// Render without a window. There is no windowed mode; the flag is
    /// accepted for harness compatibility.
    #[arg(long)]
    offscreen: bool,
    /// Target width in pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Target height in pixels.
    #[arg(long)]
    height: Option<u32>,
    /// Write one PNG per captured step into this directory.
    #[arg(long, value_name = "DIR")]
    write: Option<PathBuf>,
    /// TOML options file; command line flags override it.
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,
    /// Backend: `software` or `gpu`.
    #[arg(long, value_parser = parse_backend)]
    backend: Option<BackendKind>,
    /// Default repr of the display collection (e.g. `hull`, `refinedWire`).
    #[arg(long, value_parser = parse_repr)]
    display_repr: Option<ReprToken>,
}

fn parse_backend(s: &str) -> Result<BackendKind, String> {
    s.parse().map_err(|e: PickError| e.to_string())
}

fn parse_repr(s: &str) -> Result<ReprToken, String> {
    s.parse().map_err(|e: PickError| e.to_string())
}

fn resolve_options(args: &Args) -> Result<Options, PickError> {
    let mut options = match &args.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    if let Some(width) = args.width {
        options.render.width = width;
    }
    if let Some(height) = args.height {
        options.render.height = height;
    }
    if let Some(backend) = args.backend {
        options.render.backend = backend;
    }
    if let Some(repr) = args.display_repr {
        options.display.repr = repr;
    }
    Ok(options)
}

fn run(args: &Args) -> Result<bool, PickError> {
    if !args.offscreen {
        log::warn!("no windowed mode available, rendering offscreen");
    }
    let options = resolve_options(args)?;
    let backend = create_backend(options.render.backend)?;
    let report =
        run_repr_refine_scenario(options, backend, args.write.as_deref())?;
    log::info!(
        "{} checks, {} failed",
        report.checks,
        report.failures.len()
    );
    Ok(report.passed())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let passed = match run(&args) {
        Ok(passed) => passed,
        Err(e) if e.is_internal() => {
            log::error!("internal consistency failure, scenario aborted: {e}");
            false
        }
        Err(e) => {
            log::error!("scenario could not run: {e}");
            false
        }
    };
    let verdict = if passed { "OK" } else { "FAILED" };
    let _ = writeln!(std::io::stdout(), "{verdict}");
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
