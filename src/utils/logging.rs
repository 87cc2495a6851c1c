//! Logging setup for the `scenesound` command-line tool

/// Install the `scenesound` binary's logger.
///
/// Scheduler skips and placements show up at INFO; set RUST_LOG=debug to see
/// every segment insertion and gain refresh. Library code never calls this.
pub fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {:5} {}] {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        })
        .init();
}
