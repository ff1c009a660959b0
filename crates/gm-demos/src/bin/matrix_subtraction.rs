use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use gm_demos::cli::{self, CommonArgs};
use gm_demos::fixtures::SUBTRACTION_SIZE;
use gm_demos::{logging, runners};

#[derive(Parser)]
#[command(name = "matrix_subtraction", version)]
#[command(about = "Subtract two generated square integer matrices on the GPU")]
#[command(long_about = "
Builds two n x n matrices where A[i] = i + 1 and B[i] = n*n - i over the
row-major index i, subtracts them on the selected backend, and prints the
difference followed by the kernel timing.
")]
struct Cli {
    /// Edge length of the square operands
    #[arg(short = 'n', long, default_value_t = SUBTRACTION_SIZE)]
    size: usize,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.common.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> gm_demos::Result<()> {
    let backend = cli::select_backend(cli.common.backend)?;
    let mut out = io::stdout().lock();
    runners::run_subtraction(cli.size, &mut out, backend.as_ref())?;
    out.flush()?;
    Ok(())
}
