use orglens_core::analysis::{
    round_two, ManagerAverage, ReportingLineExcess, SalaryBand, SalaryBandReport,
};
use orglens_core::domain::employee::EmployeeId;
use orglens_core::hierarchy::Hierarchy;
use serde::Serialize;

/// Everything one analysis run produced, ready to render as human
/// text or JSON.
#[derive(Debug, Serialize)]
pub struct Findings {
    pub root: Option<EmployeeId>,
    pub band: SalaryBand,
    pub max_allowed_depth: u32,
    pub averages: Vec<ManagerAverage>,
    pub salaries: SalaryBandReport,
    pub long_reporting_lines: Vec<ReportingLineExcess>,
}

impl Findings {
    pub fn collect(hierarchy: &Hierarchy, band: SalaryBand, max_allowed: u32) -> Self {
        Self {
            root: hierarchy.root().map(|employee| employee.id.clone()),
            band,
            max_allowed_depth: max_allowed,
            averages: hierarchy.direct_subordinate_averages(),
            salaries: hierarchy.check_manager_salaries_with_band(band),
            long_reporting_lines: hierarchy.reporting_lines_over(max_allowed),
        }
    }

    pub fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|error| {
            format!(
                "{{\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        })
    }

    pub fn render_text(&self, hierarchy: &Hierarchy) -> String {
        let mut lines = Vec::new();

        match &self.root {
            Some(root_id) => lines.push(format!("Root: {}", display_of(hierarchy, root_id))),
            None => lines.push("Root: (none)".to_string()),
        }

        lines.push(String::new());
        lines.push(
            "Manager diagnostics (avg of direct subordinates, bounds, manager salary):"
                .to_string(),
        );
        if self.averages.is_empty() {
            lines.push("  (no managers with direct subordinates)".to_string());
        }
        for entry in &self.averages {
            let Some(manager) = hierarchy.employee(&entry.manager_id) else { continue };
            let lower = entry.average * self.band.lower_multiplier;
            let upper = entry.average * self.band.upper_multiplier;
            let verdict = if manager.salary < lower {
                format!("under by {:.2}", round_two(lower - manager.salary))
            } else if manager.salary > upper {
                format!("over by {:.2}", round_two(manager.salary - upper))
            } else {
                "within range".to_string()
            };
            lines.push(format!(
                "  {manager}: salary={:.2}, avg={:.2}, bounds=[{:.2},{:.2}] -> {verdict}",
                manager.salary, entry.average, lower, upper
            ));
        }

        lines.push(String::new());
        lines.push("Managers earning less than they should:".to_string());
        if self.salaries.underpaid.is_empty() {
            lines.push("  (none)".to_string());
        }
        for gap in &self.salaries.underpaid {
            lines.push(format!(
                "  {}: under by {:.2}",
                display_of(hierarchy, &gap.manager_id),
                gap.amount
            ));
        }

        lines.push(String::new());
        lines.push("Managers earning more than they should:".to_string());
        if self.salaries.overpaid.is_empty() {
            lines.push("  (none)".to_string());
        }
        for gap in &self.salaries.overpaid {
            lines.push(format!(
                "  {}: over by {:.2}",
                display_of(hierarchy, &gap.manager_id),
                gap.amount
            ));
        }

        lines.push(String::new());
        lines.push(format!(
            "Employees with reporting line longer than {} (excess shown):",
            self.max_allowed_depth
        ));
        if self.long_reporting_lines.is_empty() {
            lines.push("  (none)".to_string());
        }
        for entry in &self.long_reporting_lines {
            lines.push(format!(
                "  {}: depth {} exceeds by {}",
                display_of(hierarchy, &entry.employee_id),
                entry.depth,
                entry.excess
            ));
        }

        lines.join("\n")
    }
}

fn display_of(hierarchy: &Hierarchy, id: &EmployeeId) -> String {
    match hierarchy.employee(id) {
        Some(employee) => employee.to_string(),
        None => id.to_string(),
    }
}
