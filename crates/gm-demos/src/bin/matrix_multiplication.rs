use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use gm_demos::cli::{self, CommonArgs};
use gm_demos::{fixtures, logging, runners};

#[derive(Parser)]
#[command(name = "matrix_multiplication", version)]
#[command(about = "Multiply a fixed 2x3 matrix by a fixed 3x4 matrix on the GPU")]
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
    let (a, b) = fixtures::multiplication_operands();
    let mut out = io::stdout().lock();
    let result = runners::run_multiplication(&a, &b, &mut out, backend.as_ref());
    out.flush()?;
    result
}
