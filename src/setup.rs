use env_logger::Builder;
use log::LevelFilter;
pub use log::{debug, info, warn};

/// Init the logger, `RUST_LOG` overrides the default `Info` level. Calling it again does nothing.
pub fn init() {
    let mut builder = Builder::new();
    builder.filter(None, LevelFilter::Info).parse_default_env();
    let _ = builder.try_init();
}
