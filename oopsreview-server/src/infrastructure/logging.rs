use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub(crate) fn init_logging(default_level: &str) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(default_level))
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    tracing::debug!(default_level, "logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::build_filter;

    #[test]
    fn configured_directives_are_kept() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        let filter = build_filter("oopsreview_server=debug,sqlx=warn");
        let rendered = filter.to_string();
        assert!(rendered.contains("oopsreview_server=debug"));
        assert!(rendered.contains("sqlx=warn"));
    }

    #[test]
    fn unusable_level_falls_back_to_info() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        assert_eq!(build_filter("oopsreview_server=loud").to_string(), "info");
    }
}
