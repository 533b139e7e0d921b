use crate::CacheService;
use async_trait::async_trait;
use dockyard_shared::{CheckStatus, HealthReport, HealthStatus, Liveness};
use futures::future::join_all;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A dependency whose reachability feeds the health report.
#[async_trait]
pub trait DependencyCheck: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> Result<(), String>;
}

pub struct PostgresCheck {
    db: DatabaseConnection,
}

impl PostgresCheck {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DependencyCheck for PostgresCheck {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn check(&self) -> Result<(), String> {
        self.db
            .execute_unprepared("SELECT 1")
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

pub struct RedisCheck {
    cache: Arc<CacheService>,
}

impl RedisCheck {
    pub fn new(cache: Arc<CacheService>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl DependencyCheck for RedisCheck {
    fn name(&self) -> &str {
        "redis"
    }

    async fn check(&self) -> Result<(), String> {
        self.cache.ping().await.map_err(|e| e.to_string())
    }
}

/// How uptime is rendered in a health report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UptimeFormat {
    /// `"12.34"`
    #[default]
    Seconds,
    /// `"12.3s"`
    SecondsWithUnit,
}

/// Process start time.
#[derive(Debug, Clone, Copy)]
pub struct Uptime {
    started_at: Instant,
}

impl Uptime {
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn formatted(&self) -> String {
        self.render(UptimeFormat::Seconds)
    }

    pub fn render(&self, format: UptimeFormat) -> String {
        let secs = self.elapsed().as_secs_f64();
        match format {
            UptimeFormat::Seconds => format!("{:.2}", secs),
            UptimeFormat::SecondsWithUnit => format!("{:.1}s", secs),
        }
    }
}

pub struct HealthService {
    uptime: Uptime,
    environment: Option<String>,
    checks: Vec<Arc<dyn DependencyCheck>>,
    check_timeout: Duration,
    report_uptime: UptimeFormat,
}

impl HealthService {
    pub fn new(uptime: Uptime, environment: Option<String>, check_timeout: Duration) -> Self {
        Self {
            uptime,
            environment,
            checks: Vec::new(),
            check_timeout,
            report_uptime: UptimeFormat::default(),
        }
    }

    pub fn with_report_uptime(mut self, format: UptimeFormat) -> Self {
        self.report_uptime = format;
        self
    }

    pub fn with_check(mut self, check: Arc<dyn DependencyCheck>) -> Self {
        self.checks.push(check);
        self
    }

    pub fn uptime(&self) -> Uptime {
        self.uptime
    }

    pub fn liveness(&self) -> Liveness {
        Liveness::ok(Some(self.uptime.formatted()))
    }

    /// Run every registered check concurrently. The report is healthy only
    /// when all of them pass.
    pub async fn report(&self) -> HealthReport {
        let limit = self.check_timeout;
        let runs = self.checks.iter().map(|check| async move {
            let status = match tokio::time::timeout(limit, check.check()).await {
                Ok(Ok(())) => CheckStatus::Ok,
                Ok(Err(msg)) => CheckStatus::Error(msg),
                Err(_) => CheckStatus::Error(format!("timed out after {}ms", limit.as_millis())),
            };
            (check.name().to_string(), status)
        });

        let mut checks = BTreeMap::new();
        checks.insert("api".to_string(), CheckStatus::Ok);

        let mut healthy = true;
        for (name, status) in join_all(runs).await {
            if let CheckStatus::Error(ref msg) = status {
                log::warn!("Health check '{}' failed: {}", name, msg);
                healthy = false;
            }
            checks.insert(name, status);
        }

        HealthReport {
            status: if healthy {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            uptime: self.uptime.render(self.report_uptime),
            environment: self.environment.clone(),
            checks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};

    struct Fixed {
        name: &'static str,
        outcome: Result<(), String>,
    }

    #[async_trait]
    impl DependencyCheck for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        async fn check(&self) -> Result<(), String> {
            self.outcome.clone()
        }
    }

    struct Hangs;

    #[async_trait]
    impl DependencyCheck for Hangs {
        fn name(&self) -> &str {
            "slow"
        }

        async fn check(&self) -> Result<(), String> {
            std::future::pending().await
        }
    }

    fn service() -> HealthService {
        HealthService::new(Uptime::start(), Some("test".into()), Duration::from_millis(100))
    }

    #[tokio::test]
    async fn all_passing_checks_are_healthy() {
        let health = service()
            .with_check(Arc::new(Fixed { name: "postgres", outcome: Ok(()) }))
            .with_check(Arc::new(Fixed { name: "redis", outcome: Ok(()) }));

        let report = health.report().await;
        assert!(report.is_healthy());
        assert_eq!(report.checks.len(), 3);
        assert!(report.checks.values().all(CheckStatus::is_ok));
        assert_eq!(report.environment.as_deref(), Some("test"));
    }

    #[tokio::test]
    async fn one_failing_check_degrades_report() {
        let health = service()
            .with_check(Arc::new(Fixed { name: "postgres", outcome: Ok(()) }))
            .with_check(Arc::new(Fixed { name: "redis", outcome: Err("connection refused".into()) }));

        let report = health.report().await;
        assert_eq!(report.status, HealthStatus::Degraded);
        assert_eq!(report.checks["redis"], CheckStatus::Error("connection refused".into()));
        assert_eq!(report.checks["api"], CheckStatus::Ok);
    }

    #[tokio::test]
    async fn hanging_check_is_bounded() {
        let report = service().with_check(Arc::new(Hangs)).report().await;
        assert!(!report.is_healthy());
        assert_eq!(report.checks["slow"], CheckStatus::Error("timed out after 100ms".into()));
    }

    #[tokio::test]
    async fn postgres_check_runs_select_one() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        assert!(PostgresCheck::new(db).check().await.is_ok());

        let broken = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Conn(RuntimeErr::Internal("connection refused".into()))])
            .into_connection();
        assert!(PostgresCheck::new(broken).check().await.is_err());
    }

    #[tokio::test]
    async fn redis_check_uses_cache_ping() {
        let live = RedisCheck::new(Arc::new(CacheService::in_memory()));
        assert!(live.check().await.is_ok());

        let missing = RedisCheck::new(Arc::new(CacheService::new(None).unwrap()));
        assert_eq!(missing.check().await, Err("cache is not configured".to_string()));
    }

    #[test]
    fn uptime_has_two_decimals() {
        let formatted = Uptime::start().formatted();
        assert_eq!(formatted.split('.').nth(1).map(str::len), Some(2));
    }

    #[test]
    fn uptime_with_unit_has_one_decimal_and_suffix() {
        let rendered = Uptime::start().render(UptimeFormat::SecondsWithUnit);
        let number = rendered.strip_suffix('s').unwrap();
        assert_eq!(number.split('.').nth(1).map(str::len), Some(1));
    }

    #[tokio::test]
    async fn report_uses_configured_uptime_format() {
        let report = service()
            .with_report_uptime(UptimeFormat::SecondsWithUnit)
            .report()
            .await;
        assert!(report.uptime.ends_with('s'));
        assert!(service().report().await.uptime.parse::<f64>().is_ok());
    }
}
