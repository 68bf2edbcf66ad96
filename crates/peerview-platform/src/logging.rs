//! Log sink setup: logcat on Android, `RUST_LOG`-driven stderr elsewhere.
//! Safe to call more than once; later calls are no-ops.

use log::LevelFilter;

pub fn init() {
    init_with_level(LevelFilter::Debug);
}

#[cfg(target_os = "android")]
pub fn init_with_level(level: LevelFilter) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(level)
            .with_tag("peerview"),
    );
}

#[cfg(not(target_os = "android"))]
pub fn init_with_level(level: LevelFilter) {
    // RUST_LOG still wins over the default level.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
