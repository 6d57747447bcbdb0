use std::io::Write;

use log::LevelFilter;

/// `RUST_LOG` wins; otherwise only warnings and errors from this crate, so
/// the prompt and report on stdout stay readable.
pub fn init_logger() -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Error)
        .filter_module("hyper", LevelFilter::Error)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        });

    builder.try_init()?;
    Ok(())
}
