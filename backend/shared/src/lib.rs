pub mod models;

pub use models::{
    Liveness, CheckStatus, HealthStatus, HealthReport, ProbeResult, NetworkInfo,
    User, NewUser, Task, NewTask, TaskPatch, DataSource, CacheEntry, CacheWrite, ErrorBody,
};
