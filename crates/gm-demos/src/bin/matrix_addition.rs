use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use gm_demos::cli::{self, CommonArgs};
use gm_demos::{logging, runners};

#[derive(Parser)]
#[command(name = "matrix_addition", version)]
#[command(about = "Add two square integer matrices read from stdin on the GPU")]
#[command(long_about = "
Reads whitespace-separated integers from stdin: the size n, then the n*n
elements of the first matrix, then the n*n elements of the second, both in
row-major order. Prints the kernel timing followed by the sum.
")]
struct Cli {
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
    runners::run_addition(io::stdin().lock(), &mut out, backend.as_ref())?;
    out.flush()?;
    Ok(())
}
