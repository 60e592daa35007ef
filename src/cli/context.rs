//! Per-invocation state shared by command handlers

use std::cell::OnceCell;

use anyhow::Result;

use super::output::Output;
use crate::api::{HttpClient, SpinnerApi, SpinnerPolicy};
use crate::config::Config;

/// Configuration, output settings and a lazily-built API client.
///
/// The client is only created when a handler first needs it, so argument
/// validation errors never require a token.
pub struct Context {
    pub output: Output,
    config: Config,
    policy: SpinnerPolicy,
    api: OnceCell<SpinnerApi<HttpClient>>,
}

impl Context {
    pub fn new(config: Config, output: Output, no_spinner: bool) -> Self {
        let policy = SpinnerPolicy {
            disabled_by_flag: no_spinner,
            disabled_by_config: !config.spinner,
            machine_output: output.is_json(),
        };

        Self {
            output,
            config,
            policy,
            api: OnceCell::new(),
        }
    }

    /// Returns the API client, building it on first use
    pub fn api(&self) -> Result<&SpinnerApi<HttpClient>> {
        if let Some(api) = self.api.get() {
            return Ok(api);
        }

        let token = self.config.token()?;
        let spinner = self.policy.allows_on_stderr(|key| std::env::var(key).ok());
        self.output.verbose_ctx(
            "api",
            &format!("Connecting to {} (spinner: {})", self.config.base_url, spinner),
        );

        let client = HttpClient::new(&self.config.base_url, token);
        Ok(self.api.get_or_init(|| SpinnerApi::new(client, spinner)))
    }
}
