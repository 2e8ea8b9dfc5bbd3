use crate::config::LoggingConfig;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const CRATES: [&str; 3] = ["scholar_node", "scholar_storage", "scholar_badges"];

/// Display the startup banner
pub fn display_boot_banner(version: &str) {
    println!("\n╔════════════════════════════════════════════╗");
    println!("║   🎓 SCHOLAR · peer-review badge service    ║");
    println!("║{:^44}║", format!("v{}", version));
    println!("╚════════════════════════════════════════════╝\n");
}

/// Log level picked by `-v` flags, falling back to the configured level.
pub fn effective_level(config: &LoggingConfig, cli_verbose: u8) -> &str {
    match cli_verbose {
        0 => &config.level,
        1 => "debug",
        _ => "trace",
    }
}

/// Directive string for the workspace crates, used when `RUST_LOG` is unset.
pub fn default_directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the logging system based on configuration
pub fn init_logging(config: &LoggingConfig, cli_verbose: u8) -> anyhow::Result<()> {
    let log_level = effective_level(config, cli_verbose);

    let mut filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_directives(log_level)),
    );
    for (module, level) in &config.module_filters {
        filter = filter.add_directive(format!("{}={}", module, level).parse()?);
    }

    let subscriber = tracing_subscriber::registry().with(filter);

    let file = match &config.file_output {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?,
        ),
        None => None,
    };

    match config.format.as_str() {
        "json" => {
            let json_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true);
            let file_layer = file.map(|f| {
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(f))
                    .with_ansi(false)
            });
            subscriber.with(json_layer).with(file_layer).try_init()?;
        }
        "compact" => {
            let compact_layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_line_number(false)
                .with_file(false);
            let file_layer = file.map(|f| {
                fmt::layer()
                    .compact()
                    .with_writer(Mutex::new(f))
                    .with_ansi(false)
            });
            subscriber.with(compact_layer).with(file_layer).try_init()?;
        }
        _ => {
            // Source locations only help when digging at debug/trace
            let show_location = matches!(log_level, "debug" | "trace");

            let pretty_layer = fmt::layer()
                .with_target(show_location)
                .with_line_number(show_location)
                .with_file(show_location);
            let file_layer = file.map(|f| {
                fmt::layer()
                    .with_writer(Mutex::new(f))
                    .with_ansi(false)
            });
            subscriber.with(pretty_layer).with(file_layer).try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_overrides_config_level() {
        let config = LoggingConfig::default();
        assert_eq!(effective_level(&config, 0), "info");
        assert_eq!(effective_level(&config, 1), "debug");
        assert_eq!(effective_level(&config, 4), "trace");
    }

    #[test]
    fn test_default_directives_cover_workspace() {
        let directives = default_directives("warn");
        assert_eq!(
            directives,
            "scholar_node=warn,scholar_storage=warn,scholar_badges=warn"
        );
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
