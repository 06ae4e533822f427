use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system.
///
/// `RUST_LOG` wins over the configured level when it is set.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => default_filter(level)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true),
        )
        .try_init()?;

    Ok(())
}

/// Filter for the configured level when `RUST_LOG` is not set
fn default_filter(level: &str) -> Result<EnvFilter> {
    // hyper and reqwest are chatty at debug on every long-poll round
    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("Invalid logging level '{}'", level))?
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);
    Ok(filter)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_quiets_http_crates() {
        let filter = default_filter("debug").unwrap().to_string();
        assert!(filter.contains("hyper=warn"));
        assert!(filter.contains("reqwest=warn"));
        assert!(filter.contains("debug"));
    }

    #[test]
    fn test_operator_filter_is_left_alone() {
        // what init_logging uses when RUST_LOG is set
        let filter = EnvFilter::try_new("reqwest=debug,info").unwrap().to_string();
        assert!(filter.contains("reqwest=debug"));
        assert!(!filter.contains("reqwest=warn"));
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let err = default_filter("very=loud=please").unwrap_err();
        assert!(err.to_string().contains("Invalid logging level"));
    }
}
