//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the harness.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Page fetched both directly and through the proxy for the
    /// byte-for-byte fidelity check.
    pub reference_url: String,

    /// Page fetched twice through one proxy instance for the cache
    /// cold/warm comparison.
    pub cache_url: String,

    /// Distinct origins fetched serially and in parallel for the
    /// concurrency comparison. Parallelism equals the list length.
    pub concurrency_urls: Vec<String>,

    /// Socket connect timeout, in seconds. Reads are unbounded: the
    /// protocol is read-until-close, so a fetch ends when the peer
    /// hangs up or the connect never completes.
    pub connect_timeout_secs: u64,

    /// Ceiling on how long a freshly launched proxy gets to bind its
    /// listening socket before the harness proceeds anyway.
    pub settle_secs: u64,

    /// Pause between the graceful interrupt and the unconditional kill
    /// when tearing a proxy instance down.
    pub grace_secs: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            reference_url: "http://info.cern.ch/".to_string(),
            cache_url: "http://www.mit.edu/".to_string(),
            concurrency_urls: vec![
                "http://apache.org/".to_string(),
                "http://www.ox.ac.uk/".to_string(),
                "http://www.ucla.edu".to_string(),
                "http://www.bu.edu".to_string(),
                "http://www.mit.edu/".to_string(),
                "http://info.cern.ch/".to_string(),
                "http://www.foxnews.com/".to_string(),
                "http://www.cnn.com/".to_string(),
                "http://europe.wsj.com/".to_string(),
                "http://www.bbc.co.uk/".to_string(),
            ],
            connect_timeout_secs: 10,
            settle_secs: 2,
            grace_secs: 3,
        }
    }
}

impl HarnessConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }
}
