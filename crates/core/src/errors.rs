use std::path::PathBuf;

use thiserror::Error;

use crate::domain::employee::EmployeeId;

/// Structural failures during hierarchy construction. Construction is
/// all-or-nothing: a cycle aborts the build with no partial result.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("cycle detected in manager chain involving employee id={employee_id}")]
    CycleDetected { employee_id: EmployeeId },
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not open employee file `{path}`: {source}")]
    Open { path: PathBuf, source: std::io::Error },
    #[error("failed reading employee data: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid salary at line {line}: `{value}`")]
    InvalidSalary { line: usize, value: String },
}
