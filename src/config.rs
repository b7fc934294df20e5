use crate::{
    error::{BadEnvVarSnafu, DeskResult, ParseConfigValueSnafu},
    store::{AlwaysFail, FailWithProbability, FaultInjector, Latency, NeverFail},
};
use dotenvy::var;
use snafu::{OptionExt, ResultExt};
use std::{env::VarError, str::FromStr, sync::Arc, time::Duration};

const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";
const DEFAULT_FAILURE_RATE: f64 = 0.1;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_ip: String,
    store_config: Arc<StoreConfig>,
}

impl RuntimeConfiguration {
    pub fn new() -> DeskResult<Self> {
        Self::from_lookup(|name| match var(name) {
            Ok(value) => Ok(Some(value)),
            Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
            Err(e) => Err(e).context(BadEnvVarSnafu { name }),
        })
    }

    ///`lookup` gives back `Ok(None)` for variables that just aren't set
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> DeskResult<Option<String>>,
    ) -> DeskResult<Self> {
        Ok(Self {
            server_ip: lookup("DESK_SERVER_IP")?.unwrap_or_else(|| DEFAULT_SERVER_IP.to_string()),
            store_config: Arc::new(StoreConfig::from_lookup(&lookup)?),
        })
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }

    pub fn store_config(&self) -> Arc<StoreConfig> {
        self.store_config.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub failure_rate: f64,
    pub simulate_latency: bool,
    pub jitter: Duration,
    pub seed_demo_data: bool,
}

impl StoreConfig {
    fn from_lookup(
        lookup: &impl Fn(&'static str) -> DeskResult<Option<String>>,
    ) -> DeskResult<Self> {
        let failure_rate = parse_or(lookup, "DESK_FAILURE_RATE", DEFAULT_FAILURE_RATE)?;
        snafu::ensure!(
            (0.0..=1.0).contains(&failure_rate),
            ParseConfigValueSnafu {
                name: "DESK_FAILURE_RATE",
                value: failure_rate.to_string(),
            }
        );

        Ok(Self {
            failure_rate,
            simulate_latency: parse_or(lookup, "DESK_SIMULATE_LATENCY", true)?,
            jitter: Duration::from_millis(parse_or(lookup, "DESK_LATENCY_JITTER_MS", 0_u64)?),
            seed_demo_data: parse_or(lookup, "DESK_SEED_DEMO_DATA", true)?,
        })
    }

    pub fn latency(&self) -> Latency {
        if self.simulate_latency {
            Latency::simulated(self.jitter)
        } else {
            Latency::none()
        }
    }

    pub fn fault_injector(&self) -> Box<dyn FaultInjector> {
        if self.failure_rate <= 0.0 {
            Box::new(NeverFail)
        } else if self.failure_rate >= 1.0 {
            Box::new(AlwaysFail)
        } else {
            Box::new(FailWithProbability(self.failure_rate))
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            failure_rate: DEFAULT_FAILURE_RATE,
            simulate_latency: true,
            jitter: Duration::ZERO,
            seed_demo_data: true,
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&'static str) -> DeskResult<Option<String>>,
    name: &'static str,
    default: T,
) -> DeskResult<T> {
    let Some(raw) = lookup(name)? else {
        return Ok(default);
    };

    raw.trim()
        .parse()
        .ok()
        .context(ParseConfigValueSnafu { name, value: raw.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeskError;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&'static str, &str)]) -> DeskResult<RuntimeConfiguration> {
        let env: HashMap<&'static str, String> = pairs
            .iter()
            .map(|(k, v)| (*k, (*v).to_string()))
            .collect();
        RuntimeConfiguration::from_lookup(|name| Ok(env.get(name).cloned()))
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_ip(), DEFAULT_SERVER_IP);
        assert_eq!(*config.store_config(), StoreConfig::default());
    }

    #[test]
    fn reads_every_store_knob() {
        let config = config_from(&[
            ("DESK_SERVER_IP", "0.0.0.0:3000"),
            ("DESK_FAILURE_RATE", "0.5"),
            ("DESK_SIMULATE_LATENCY", "false"),
            ("DESK_LATENCY_JITTER_MS", "25"),
            ("DESK_SEED_DEMO_DATA", "false"),
        ])
        .unwrap();

        assert_eq!(config.server_ip(), "0.0.0.0:3000");
        let store = config.store_config();
        assert!((store.failure_rate - 0.5).abs() < f64::EPSILON);
        assert!(!store.simulate_latency);
        assert_eq!(store.jitter, Duration::from_millis(25));
        assert!(!store.seed_demo_data);
        assert_eq!(store.latency(), Latency::none());
    }

    #[test]
    fn extreme_failure_rates_are_deterministic() {
        use crate::store::StoreOperation;

        let never = config_from(&[("DESK_FAILURE_RATE", "0")]).unwrap();
        let always = config_from(&[("DESK_FAILURE_RATE", "1")]).unwrap();
        for _ in 0..20 {
            assert!(!never.store_config().fault_injector().should_fail(StoreOperation::ListStudents));
            assert!(always.store_config().fault_injector().should_fail(StoreOperation::ListStudents));
        }
    }

    #[test]
    fn rejects_out_of_range_failure_rate() {
        let err = config_from(&[("DESK_FAILURE_RATE", "1.5")]).unwrap_err();
        assert!(matches!(
            err,
            DeskError::ParseConfigValue {
                name: "DESK_FAILURE_RATE",
                ..
            }
        ));
    }

    #[test]
    fn rejects_garbage_booleans() {
        let err = config_from(&[("DESK_SIMULATE_LATENCY", "sometimes")]).unwrap_err();
        assert!(matches!(err, DeskError::ParseConfigValue { value, .. } if value == "sometimes"));
    }
}
