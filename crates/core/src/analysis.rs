use std::collections::{HashSet, VecDeque};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::employee::EmployeeId;
use crate::hierarchy::Hierarchy;

/// Salary policy band: a manager must earn between
/// `lower_multiplier` and `upper_multiplier` times the average salary
/// of their direct reports. Defaults to [1.2, 1.5].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SalaryBand {
    pub lower_multiplier: Decimal,
    pub upper_multiplier: Decimal,
}

impl Default for SalaryBand {
    fn default() -> Self {
        Self { lower_multiplier: Decimal::new(12, 1), upper_multiplier: Decimal::new(15, 1) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ManagerAverage {
    pub manager_id: EmployeeId,
    pub average: Decimal,
}

/// A positive deviation from the band, rounded to two decimals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SalaryGap {
    pub manager_id: EmployeeId,
    pub amount: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SalaryBandReport {
    pub underpaid: Vec<SalaryGap>,
    pub overpaid: Vec<SalaryGap>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportingLineExcess {
    pub employee_id: EmployeeId,
    pub depth: u32,
    pub excess: u32,
}

/// Round to 2 decimal places, midpoint away from zero. Deviation
/// amounts are always positive, so this is plain half-up rounding.
pub fn round_two(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl Hierarchy {
    /// Arithmetic mean of each manager's direct-report salaries, full
    /// precision, in input order of the managers. Managers with no
    /// reports are absent rather than zero.
    pub fn direct_subordinate_averages(&self) -> Vec<ManagerAverage> {
        let mut averages = Vec::new();
        for manager in self.employees() {
            let reports = self.direct_reports(&manager.id);
            if reports.is_empty() {
                continue;
            }
            let total: Decimal =
                reports.iter().filter_map(|id| self.employee(id)).map(|e| e.salary).sum();
            let average = total / Decimal::from(reports.len() as u64);
            averages.push(ManagerAverage { manager_id: manager.id.clone(), average });
        }
        averages
    }

    pub fn check_manager_salaries(&self) -> SalaryBandReport {
        self.check_manager_salaries_with_band(SalaryBand::default())
    }

    /// Classifies every manager with subordinates against the band.
    /// Compliant managers appear in neither list; both lists follow
    /// the order of `direct_subordinate_averages`.
    pub fn check_manager_salaries_with_band(&self, band: SalaryBand) -> SalaryBandReport {
        let mut report = SalaryBandReport::default();
        for entry in self.direct_subordinate_averages() {
            let Some(manager) = self.employee(&entry.manager_id) else { continue };
            let lower = entry.average * band.lower_multiplier;
            let upper = entry.average * band.upper_multiplier;
            if manager.salary < lower {
                report.underpaid.push(SalaryGap {
                    manager_id: entry.manager_id,
                    amount: round_two(lower - manager.salary),
                });
            } else if manager.salary > upper {
                report.overpaid.push(SalaryGap {
                    manager_id: entry.manager_id,
                    amount: round_two(manager.salary - upper),
                });
            }
        }
        report
    }

    /// Employees whose depth below the root exceeds `max_allowed`, in
    /// BFS order. Depth is manager hops from the root (root = 0).
    /// With no root the result is empty; employees unreachable from
    /// the root (orphans, disconnected subtrees) are never visited.
    pub fn reporting_lines_over(&self, max_allowed: u32) -> Vec<ReportingLineExcess> {
        let mut result = Vec::new();
        let Some(root) = self.root() else { return result };

        let mut seen: HashSet<&EmployeeId> = HashSet::new();
        let mut queue: VecDeque<(&EmployeeId, u32)> = VecDeque::new();
        seen.insert(&root.id);
        queue.push_back((&root.id, 0));

        while let Some((id, depth)) = queue.pop_front() {
            if depth > max_allowed {
                result.push(ReportingLineExcess {
                    employee_id: id.clone(),
                    depth,
                    excess: depth - max_allowed,
                });
            }
            for report in self.direct_reports(id) {
                if seen.insert(report) {
                    queue.push_back((report, depth + 1));
                }
            }
        }
        result
    }
}
