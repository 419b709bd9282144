use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::debug;
use saferoute_core::SearchParams;
use saferoute_protocol::Tuning;
use serde::Deserialize;

/// Contents of a `--config` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    tuning: Tuning,
}

/// Default search parameters, optionally overridden by a TOML file.
pub(crate) fn load(path: Option<&Path>) -> Result<SearchParams> {
    let Some(path) = path else {
        return Ok(SearchParams::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let params = parse(&content)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    debug!("loaded tuning from {}: {params:?}", path.display());
    Ok(params)
}

fn parse(content: &str) -> Result<SearchParams> {
    let file: ConfigFile = toml::from_str(content)?;
    let params = file.tuning.layered_over(&SearchParams::default());
    params.validate()?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_argument_uses_defaults() {
        assert_eq!(load(None).expect("defaults"), SearchParams::default());
    }

    #[test]
    fn tuning_table_overrides_defaults() {
        let params = parse(
            r#"
            [tuning]
            k = 3
            radius = 1
            risk_weight = 2
            strict_hazard = true
            "#,
        )
        .expect("valid config");

        assert_eq!(params.k, 3);
        assert_eq!(params.radius, 1);
        assert_eq!(params.risk_weight, 2.0);
        assert!(params.strict_hazard);
        assert_eq!(params.cap, SearchParams::default().cap);
        assert_eq!(params.max_depth, None);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(parse("").expect("empty config"), SearchParams::default());
    }

    #[test]
    fn negative_weight_is_rejected() {
        assert!(parse("[tuning]\nrisk_weight = -1.0\n").is_err());
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(parse("[tunning]\nk = 2\n").is_err());
    }

    #[test]
    fn unreadable_file_reports_its_path() {
        let error = load(Some(Path::new("/nonexistent/saferoute.toml")))
            .expect_err("missing file should fail");
        assert!(format!("{error:#}").contains("saferoute.toml"));
    }
}
