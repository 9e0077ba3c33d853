use chrono::Local;
use env_logger::fmt::{Color, Style, StyledValue};
use env_logger::{Builder, Logger, Target};
use log::{Level, LevelFilter, SetLoggerError};

/// Installs [`default_logger`] as the global logger.
pub fn init(debug: bool) -> Result<(), SetLoggerError> {
    let logger = default_logger(debug);
    let max_level = logger.filter();

    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(max_level);

    Ok(())
}

/// Logger printing `HH:MM:SS.mmm LEVEL > message` to stderr for this crate only.
pub fn default_logger(debug: bool) -> Logger {
    formatted_local_time_builder("%H:%M:%S.%3f")
        .filter_level(if debug { LevelFilter::Trace } else { LevelFilter::Info })
        .target(Target::Stderr)
        .parse_default_env()
        .build()
}

fn formatted_local_time_builder(fmt: &'static str) -> Builder {
    let mut builder = Builder::new();

    builder.format(move |f, record| {
        use std::io::Write;

        if !is_own_target(record.target()) {
            return Ok(());
        }

        let mut style = f.style();
        let level = colored_level(&mut style, record.level());
        let time = Local::now().format(fmt);

        writeln!(f, "{} {} > {}", time, level, record.args())
    });

    builder
}

fn is_own_target(target: &str) -> bool {
    let crate_target = clap::crate_name!();
    target == crate_target || target.starts_with(&format!("{crate_target}::"))
}

fn colored_level(style: &'_ mut Style, level: Level) -> StyledValue<'_, &'static str> {
    match level {
        Level::Trace => style.set_color(Color::Magenta).value("TRACE"),
        Level::Debug => style.set_color(Color::Blue).value("DEBUG"),
        Level::Info => style.set_color(Color::Green).value("INFO "),
        Level::Warn => style.set_color(Color::Yellow).value("WARN "),
        Level::Error => style.set_color(Color::Red).value("ERROR"),
    }
}

#[cfg(test)]
mod tests {
    use log::{Level, LevelFilter, Log, Metadata};

    use super::{default_logger, is_own_target};

    #[test]
    fn test_own_target() {
        assert!(is_own_target("vidlookup"));
        assert!(is_own_target("vidlookup::flow"));
        assert!(!is_own_target("vidlookupx"));
        assert!(!is_own_target("tokio::runtime"));
    }

    #[test]
    fn test_debug_raises_level() {
        let metadata = Metadata::builder().level(Level::Debug).target("vidlookup::flow").build();

        if std::env::var_os("RUST_LOG").is_none() {
            assert!(!default_logger(false).enabled(&metadata));
            assert_eq!(default_logger(true).filter(), LevelFilter::Trace);
        }
    }
}
