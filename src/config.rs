use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://collectors.au.sumologic.com/receiver/v1/http/";
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_millis(1_000);
pub const DEFAULT_MAX_BATCH_LEN: usize = 100;

/// Settings of a [`Logger`](crate::Logger).
///
/// Every field has a default, so a partial JSON (or any other serde format)
/// document is enough. Durations are expressed in milliseconds.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Base URL of the collector. The collector code is appended to it.
    pub endpoint: String,
    /// Period of the flush scheduler. Zero stands for the default period.
    #[serde(with = "millis")]
    pub sync_interval: Duration,
    /// Maximum number of records sent in a single request.
    pub max_batch_len: usize,
    /// Deadline of a single request. Without one, a request that never
    /// completes blocks every later delivery.
    #[serde(with = "millis_opt")]
    pub request_timeout: Option<Duration>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            sync_interval: DEFAULT_SYNC_INTERVAL,
            max_batch_len: DEFAULT_MAX_BATCH_LEN,
            request_timeout: None,
        }
    }
}

impl LoggerConfig {
    /// `<endpoint>/<collector_code>`, with exactly one slash in between.
    pub fn collector_url(&self, collector_code: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            collector_code.trim_start_matches('/')
        )
    }

    /// A zero period means the default one.
    pub(crate) fn effective_sync_interval(&self) -> Duration {
        if self.sync_interval.is_zero() {
            DEFAULT_SYNC_INTERVAL
        } else {
            self.sync_interval
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

mod millis_opt {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        duration_opt: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match duration_opt {
            Some(duration) => serializer.serialize_some(&(duration.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let millis_opt = Option::<u64>::deserialize(deserializer)?;
        Ok(millis_opt.map(Duration::from_millis))
    }
}
