use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_TICK_RATE: u32 = 60;
pub const TICK_RATE_ENV_VAR: &str = "ABILITY_TICK_RATE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Logical ticks per second.
    pub tick_rate: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

impl TreeConfig {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            tick_rate: normalize_tick_rate(tick_rate),
        }
    }

    /// Reads the tick rate from `ABILITY_TICK_RATE`, falling back to the
    /// default when it is unset or unusable.
    pub fn from_env() -> Self {
        Self::new(resolve_tick_rate(env::var(TICK_RATE_ENV_VAR)))
    }

    /// Length of one logical tick, in whole nanoseconds so that summing
    /// intervals never drifts.
    pub fn tick_interval(&self) -> Duration {
        let rate = u64::from(normalize_tick_rate(self.tick_rate));
        Duration::from_nanos(1_000_000_000 / rate)
    }
}

fn normalize_tick_rate(tick_rate: u32) -> u32 {
    if tick_rate == 0 {
        warn!(
            fallback = DEFAULT_TICK_RATE,
            "tick_rate_zero_fallback"
        );
        DEFAULT_TICK_RATE
    } else {
        tick_rate
    }
}

fn resolve_tick_rate(var: Result<String, env::VarError>) -> u32 {
    match var {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(rate) => rate,
            Err(_) => {
                warn!(
                    env_var = TICK_RATE_ENV_VAR,
                    value = value.as_str(),
                    "tick_rate_env_invalid_fallback"
                );
                DEFAULT_TICK_RATE
            }
        },
        Err(env::VarError::NotPresent) => DEFAULT_TICK_RATE,
        Err(err) => {
            warn!(
                env_var = TICK_RATE_ENV_VAR,
                error = %err,
                "tick_rate_env_unreadable_fallback"
            );
            DEFAULT_TICK_RATE
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_interval_is_a_sixtieth() {
        let config = TreeConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn test_zero_rate_falls_back() {
        assert_eq!(TreeConfig::new(0).tick_rate, DEFAULT_TICK_RATE);
        let config = TreeConfig { tick_rate: 0 };
        assert_eq!(config.tick_interval(), TreeConfig::default().tick_interval());
    }

    #[test]
    fn test_env_value_parsing() {
        assert_eq!(resolve_tick_rate(Ok("30".to_owned())), 30);
        assert_eq!(resolve_tick_rate(Ok(" 120 ".to_owned())), 120);
        assert_eq!(
            resolve_tick_rate(Ok("fast".to_owned())),
            DEFAULT_TICK_RATE
        );
        assert_eq!(
            resolve_tick_rate(Err(env::VarError::NotPresent)),
            DEFAULT_TICK_RATE
        );
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let config: TreeConfig = serde_yaml::from_str("tick_rate: 30").unwrap();
        assert_eq!(config, TreeConfig::new(30));
        let config: TreeConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, TreeConfig::default());
    }
}
