pub mod analysis;
pub mod config;
pub mod domain;
pub mod errors;
pub mod hierarchy;
pub mod ingest;

pub use analysis::{
    round_two, ManagerAverage, ReportingLineExcess, SalaryBand, SalaryBandReport, SalaryGap,
};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::employee::{Employee, EmployeeId};
pub use errors::{HierarchyError, IngestError};
pub use hierarchy::Hierarchy;
