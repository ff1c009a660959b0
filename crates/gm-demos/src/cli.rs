//! Command-line flags shared by the demo binaries.

use clap::{ArgAction, Args, ValueEnum};
use gm_matrix::{ComputeBackend, CpuBackend, GpuContext, WgpuBackend};
use log::{info, warn};

use crate::error::Result;

/// Which compute backend a demo dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendChoice {
    /// GPU when an adapter is present, CPU otherwise
    Auto,
    /// GPU only; fail if no adapter is present
    Gpu,
    /// CPU reference backend
    Cpu,
}

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Compute backend to run the kernel on
    #[arg(long, value_enum, default_value_t = BackendChoice::Auto)]
    pub backend: BackendChoice,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Open the backend named by `choice`.
pub fn select_backend(choice: BackendChoice) -> Result<Box<dyn ComputeBackend>> {
    let backend: Box<dyn ComputeBackend> = match choice {
        BackendChoice::Cpu => Box::new(CpuBackend::new()),
        BackendChoice::Gpu => Box::new(WgpuBackend::new()?),
        BackendChoice::Auto => {
            if GpuContext::is_available() {
                Box::new(WgpuBackend::new()?)
            } else {
                warn!("no GPU adapter found, falling back to the CPU backend");
                Box::new(CpuBackend::new())
            }
        }
    };
    info!("dispatching to the {} backend", backend.name());
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        common: CommonArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["demo"]);
        assert_eq!(cli.common.backend, BackendChoice::Auto);
        assert_eq!(cli.common.verbose, 0);
    }

    #[test]
    fn test_backend_and_verbosity() {
        let cli = TestCli::parse_from(["demo", "--backend", "cpu", "-vv"]);
        assert_eq!(cli.common.backend, BackendChoice::Cpu);
        assert_eq!(cli.common.verbose, 2);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(TestCli::try_parse_from(["demo", "--backend", "metal"]).is_err());
    }

    #[test]
    fn test_select_cpu() {
        let backend = select_backend(BackendChoice::Cpu).unwrap();
        assert_eq!(backend.name(), "cpu");
    }
}
