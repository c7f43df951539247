use log::LevelFilter;

/// Initialize logging using env_logger.
/// Defaults to `info`; `RUST_LOG` overrides it,
/// e.g. `RUST_LOG=skillswap_core=debug skillswap profiles`.
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
}
