use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set (required by DEMO_APP={0})")]
    MissingDatabaseUrl(DemoApp),

    #[error("unknown DEMO_APP '{0}' (expected hello, volumes, netdemo, multi-service or taskapp)")]
    UnknownApp(String),

    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Which demo route table this process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoApp {
    Hello,
    Volumes,
    NetDemo,
    MultiService,
    TaskApp,
}

impl DemoApp {
    pub fn service_name(self) -> &'static str {
        match self {
            DemoApp::Hello => "dockerfile-demo",
            DemoApp::Volumes => "volumes-demo",
            DemoApp::NetDemo => "netdemo-api",
            DemoApp::MultiService => "myapp-api",
            DemoApp::TaskApp => "taskapp-api",
        }
    }

    /// Apps that talk to Postgres and Redis through real clients.
    pub fn needs_database(self) -> bool {
        matches!(self, DemoApp::MultiService | DemoApp::TaskApp)
    }
}

impl fmt::Display for DemoApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DemoApp::Hello => "hello",
            DemoApp::Volumes => "volumes",
            DemoApp::NetDemo => "netdemo",
            DemoApp::MultiService => "multi-service",
            DemoApp::TaskApp => "taskapp",
        };
        f.write_str(name)
    }
}

impl FromStr for DemoApp {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hello" | "dockerfile" => Ok(DemoApp::Hello),
            "volumes" => Ok(DemoApp::Volumes),
            "netdemo" | "network" => Ok(DemoApp::NetDemo),
            "multi-service" | "myapp" => Ok(DemoApp::MultiService),
            "taskapp" | "tasks" => Ok(DemoApp::TaskApp),
            other => Err(ConfigError::UnknownApp(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app: DemoApp,
    pub server_host: String,
    pub server_port: u16,
    pub environment: Option<String>,
    pub database_url: Option<String>,
    pub redis_url: String,

    // Raw TCP probe targets (netdemo)
    pub db_host: String,
    pub db_port: u16,
    pub redis_host: String,
    pub redis_port: u16,
    pub probe_timeout: Duration,
    pub dns_timeout: Duration,
    pub network_info_hosts: Vec<(String, String)>,

    // Volume mount points (volumes)
    pub named_volume_path: String,
    pub bind_mount_path: String,
    pub bind_sample_file: String,
    pub tmpfs_path: String,

    pub cache_ttl: Duration,
    pub list_cache_ttl: Duration,
    pub shutdown_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let string_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let app = match var("DEMO_APP") {
            Some(name) => name.parse()?,
            None => DemoApp::TaskApp,
        };

        let database_url = var("DATABASE_URL");
        if app.needs_database() && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl(app));
        }

        let db_host = string_or("DB_HOST", "postgres");
        let redis_host = string_or("REDIS_HOST", "redis");

        let network_info_hosts = match var("NETWORK_INFO_HOSTS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(|h| (h.to_string(), h.to_string()))
                .collect(),
            None => vec![
                ("proxy (frontend network)".to_string(), "proxy".to_string()),
                ("api (self)".to_string(), "api".to_string()),
                (format!("{} (backend network)", db_host), db_host.clone()),
                (format!("{} (backend network)", redis_host), redis_host.clone()),
            ],
        };

        Ok(Self {
            app,
            server_host: string_or("SERVER_HOST", "0.0.0.0"),
            server_port: parse_or(&var, "PORT", 3000)?,
            environment: var("APP_ENV"),
            database_url,
            redis_url: string_or("REDIS_URL", "redis://redis:6379"),
            db_port: parse_or(&var, "DB_PORT", 5432)?,
            redis_port: parse_or(&var, "REDIS_PORT", 6379)?,
            db_host,
            redis_host,
            probe_timeout: Duration::from_millis(parse_or(&var, "PROBE_TIMEOUT_MS", 3000)?),
            dns_timeout: Duration::from_millis(parse_or(&var, "DNS_TIMEOUT_MS", 2000)?),
            network_info_hosts,
            named_volume_path: string_or("NAMED_VOLUME_PATH", "/data"),
            bind_mount_path: string_or("BIND_MOUNT_PATH", "/app/src"),
            bind_sample_file: string_or("BIND_SAMPLE_FILE", "index.js"),
            tmpfs_path: string_or("TMPFS_PATH", "/tmp"),
            cache_ttl: Duration::from_secs(parse_or(&var, "CACHE_TTL_SECS", 60)?),
            list_cache_ttl: Duration::from_secs(parse_or(&var, "LIST_CACHE_TTL_SECS", 10)?),
            shutdown_timeout: Duration::from_secs(parse_or(&var, "SHUTDOWN_TIMEOUT_SECS", 10)?),
        })
    }

    /// The database URL with credentials replaced, safe to log.
    pub fn masked_database_url(&self) -> Option<String> {
        self.database_url.as_deref().map(mask_credentials)
    }
}

fn parse_or<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

pub fn mask_credentials(url: &str) -> String {
    match regex::Regex::new(r"://.*@") {
        Ok(re) => re.replace(url, "://***@").into_owned(),
        Err(_) => "***".to_string(),
    }
}
