use config::Config;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    lares: Lares,
}

impl AppConfig {
    pub fn load() -> Self {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    pub fn lares(&self) -> &Lares {
        &self.lares
    }
}

#[derive(Debug, Deserialize)]
pub struct Lares {
    host: String,
    port: u16,
    username: String,
    password: String,
    #[serde(with = "humantime_serde")]
    scan_interval: Duration,
    #[serde(with = "humantime_serde")]
    refresh_timeout: Duration,
    confirm_attempts: usize,
    #[serde(with = "humantime_serde")]
    confirm_delay: Duration,
}

impl Lares {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn scan_interval(&self) -> Duration {
        self.scan_interval
    }

    pub fn refresh_timeout(&self) -> Duration {
        self.refresh_timeout
    }

    pub fn confirm_attempts(&self) -> usize {
        self.confirm_attempts
    }

    pub fn confirm_delay(&self) -> Duration {
        self.confirm_delay
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                lares: Lares {
                    host: "127.0.0.1".to_string(),
                    port: 80,
                    username: "admin".to_string(),
                    password: "lares".to_string(),
                    scan_interval: Duration::from_secs(30),
                    refresh_timeout: Duration::from_secs(10),
                    confirm_attempts: 5,
                    confirm_delay: Duration::from_millis(200),
                },
            },
        }
    }

    pub fn host(mut self, host: &str) -> Self {
        self.config.lares.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.lares.port = port;
        self
    }

    pub fn confirm(mut self, attempts: usize, delay: Duration) -> Self {
        self.config.lares.confirm_attempts = attempts;
        self.config.lares.confirm_delay = delay;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
