//! Infrastructure layer: backend adapters, caching, config, and the services
//! the HTTP API calls.

pub mod config;
pub mod data_source;
pub mod query_cache;
pub mod services;
pub mod workers;

pub use config::{AiConfig, AppConfig, BackendConfig, ConfigError};
pub use data_source::{DataResult, DataSource, DataSourceError, InMemoryDataSource, PostgrestDataSource};
pub use query_cache::{QueryCache, QueryKey};
pub use services::{
    Caches, ChangeBus, ChartDataService, EmployeeService, InventoryService, MetricsSync, NotificationService,
    Services, StockAlertGenerator,
};
pub use workers::{ChangeFilter, ChangeWorker, MetricsSyncWorker, WorkerHandle};
