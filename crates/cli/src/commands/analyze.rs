use std::path::Path;

use orglens_core::config::{AppConfig, LoadOptions};
use orglens_core::hierarchy::Hierarchy;
use orglens_core::ingest;

use crate::commands::CommandResult;
use crate::report::Findings;

/// Exit codes: 0 success, 2 config, 3 ingest, 4 cycle detected. A
/// cycle means the dataset cannot be analyzed at all; there is no
/// partial output.
pub fn run(
    path: &Path,
    max_depth: Option<u32>,
    json: bool,
    config_path: Option<&Path>,
) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        require_file: config_path.is_some(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "analyze",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };
    crate::init_logging(&config);

    let employees = match ingest::read_employees_from_path(path) {
        Ok(employees) => employees,
        Err(error) => {
            return CommandResult::failure("analyze", "ingest", error.to_string(), 3);
        }
    };
    tracing::info!(count = employees.len(), path = %path.display(), "employee records loaded");

    let hierarchy = match Hierarchy::build(employees) {
        Ok(hierarchy) => hierarchy,
        Err(error) => {
            return CommandResult::failure("analyze", "cycle_detected", error.to_string(), 4);
        }
    };

    let max_allowed = max_depth.unwrap_or(config.policy.max_reporting_depth);
    let findings = Findings::collect(&hierarchy, config.policy.band(), max_allowed);
    tracing::info!(
        employees = hierarchy.len(),
        underpaid = findings.salaries.underpaid.len(),
        overpaid = findings.salaries.overpaid.len(),
        long_lines = findings.long_reporting_lines.len(),
        "analysis complete"
    );

    let output =
        if json { findings.render_json() } else { findings.render_text(&hierarchy) };
    CommandResult::success(output)
}
