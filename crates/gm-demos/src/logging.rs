use env_logger::Env;

/// Install the global logger. Output goes to stderr so that stdout carries
/// only the demo's result.
///
/// `RUST_LOG` overrides the level picked from `verbosity`.
pub fn init(verbosity: u8) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level_for(verbosity)))
        .format_timestamp(None)
        .try_init();
}

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(5), "debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(0);
        init(2);
    }
}
