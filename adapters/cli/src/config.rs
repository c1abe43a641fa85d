use std::{fs, path::Path};

use anyhow::{Context, Result};
use forest_survival_core::GameConfig;

/// Reads a TOML game configuration, falling back to defaults without a path.
///
/// Keys missing from the file keep their default values.
pub(crate) fn load(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid configuration in {}", path.display()))
}

fn parse(contents: &str) -> Result<GameConfig> {
    let config: GameConfig =
        toml::from_str(contents).context("failed to parse configuration toml contents")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forest_survival_core::{MovementPolicy, PoolResetPolicy};

    #[test]
    fn missing_path_yields_defaults() {
        let config = load(None).expect("defaults");

        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let config = parse(
            r#"
            movement = "fence_rollback"
            pool = "full"

            [player]
            speed = 3.0

            [spawner]
            interval_ms = 1000
            "#,
        )
        .expect("valid configuration");

        assert_eq!(config.movement, MovementPolicy::FenceRollback);
        assert_eq!(config.pool, PoolResetPolicy::Full);
        assert_eq!(config.player.speed, 3.0);
        assert_eq!(config.player.health, GameConfig::default().player.health);
        assert_eq!(config.spawner.interval_ms, 1000);
        assert_eq!(config.spawner.window_ms, GameConfig::default().spawner.window_ms);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let error = parse("[spawner]\ninterval_ms = 0\n").expect_err("zero interval");

        assert!(format!("{error:#}").contains("interval"));
    }

    #[test]
    fn malformed_toml_is_reported() {
        assert!(parse("movement = ").is_err());
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let error = load(Some(Path::new("does/not/exist.toml"))).expect_err("missing file");

        assert!(format!("{error:#}").contains("does/not/exist.toml"));
    }
}
