use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::domain::employee::{Employee, EmployeeId};
use crate::errors::HierarchyError;

/// The built, validated organization. Owns every employee in a single
/// id-keyed index; manager links and direct-report edges are ids
/// resolved through that index, so bidirectional navigation never
/// creates ownership cycles. Read-only after `build`.
#[derive(Debug)]
pub struct Hierarchy {
    index: HashMap<EmployeeId, Employee>,
    order: Vec<EmployeeId>,
    reports: HashMap<EmployeeId, Vec<EmployeeId>>,
    root: Option<EmployeeId>,
}

impl Hierarchy {
    /// Builds the hierarchy in two passes (index, then link) followed
    /// by a cycle check over every manager chain.
    ///
    /// Policy decisions, all logged rather than raised:
    /// - duplicate ids: last record wins in the index, position fixed
    ///   at first occurrence;
    /// - dangling manager id: link dropped, employee becomes an orphan;
    /// - several employees without a manager: the last one in input
    ///   order is the effective root.
    pub fn build(records: Vec<Employee>) -> Result<Self, HierarchyError> {
        let mut index: HashMap<EmployeeId, Employee> = HashMap::with_capacity(records.len());
        let mut order: Vec<EmployeeId> = Vec::with_capacity(records.len());

        for employee in records {
            let id = employee.id.clone();
            if index.insert(id.clone(), employee).is_some() {
                debug!(employee_id = %id, "duplicate employee id, keeping the later record");
            } else {
                order.push(id);
            }
        }

        let mut reports: HashMap<EmployeeId, Vec<EmployeeId>> = HashMap::new();
        let mut root: Option<EmployeeId> = None;

        for id in &order {
            let employee = &index[id];
            match &employee.manager_id {
                Some(manager_id) => {
                    if index.contains_key(manager_id) {
                        reports.entry(manager_id.clone()).or_default().push(id.clone());
                    } else {
                        warn!(
                            employee_id = %id,
                            manager_id = %manager_id,
                            "manager id does not resolve, treating employee as orphan"
                        );
                    }
                }
                None => {
                    if let Some(previous) = root.replace(id.clone()) {
                        debug!(
                            previous_root = %previous,
                            new_root = %id,
                            "multiple employees without a manager, last one wins"
                        );
                    }
                }
            }
        }

        let hierarchy = Self { index, order, reports, root };
        hierarchy.check_cycles()?;
        Ok(hierarchy)
    }

    // Per-employee upward walk with a per-walk visited set. O(V^2)
    // worst case, fine at the thousands-of-records scale this serves.
    fn check_cycles(&self) -> Result<(), HierarchyError> {
        for start in &self.order {
            let mut visiting: HashSet<&EmployeeId> = HashSet::new();
            let mut current = self.index.get(start);
            while let Some(employee) = current {
                let Some(manager_id) = &employee.manager_id else { break };
                if !visiting.insert(&employee.id) {
                    return Err(HierarchyError::CycleDetected {
                        employee_id: employee.id.clone(),
                    });
                }
                current = self.index.get(manager_id);
            }
        }
        Ok(())
    }

    /// The employee with no manager, if any. Absent root is a valid
    /// state (callers must tolerate it).
    pub fn root(&self) -> Option<&Employee> {
        self.root.as_ref().and_then(|id| self.index.get(id))
    }

    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.index.get(id)
    }

    /// Direct reports of `id` in input order; empty for unknown ids
    /// and for employees with no reports.
    pub fn direct_reports(&self, id: &EmployeeId) -> &[EmployeeId] {
        self.reports.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All employees in input order (first occurrence for duplicated
    /// ids). Drives deterministic analysis output.
    pub fn employees(&self) -> impl Iterator<Item = &Employee> {
        self.order.iter().filter_map(|id| self.index.get(id))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::employee::{Employee, EmployeeId};
    use crate::errors::HierarchyError;

    use super::Hierarchy;

    fn employee(id: &str, salary: i64, manager: Option<&str>) -> Employee {
        Employee {
            id: EmployeeId(id.to_string()),
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            salary: Decimal::from(salary),
            manager_id: manager.map(|m| EmployeeId(m.to_string())),
        }
    }

    fn id(value: &str) -> EmployeeId {
        EmployeeId(value.to_string())
    }

    #[test]
    fn builds_index_root_and_report_edges() {
        let hierarchy = Hierarchy::build(vec![
            employee("123", 60000, None),
            employee("124", 45000, Some("123")),
            employee("125", 47000, Some("123")),
            employee("300", 50000, Some("124")),
        ])
        .expect("acyclic input should build");

        assert_eq!(hierarchy.len(), 4);
        assert_eq!(hierarchy.root().map(|e| e.id.clone()), Some(id("123")));
        assert_eq!(hierarchy.direct_reports(&id("123")), &[id("124"), id("125")]);
        assert_eq!(hierarchy.direct_reports(&id("124")), &[id("300")]);
        assert!(hierarchy.direct_reports(&id("300")).is_empty());
        assert!(hierarchy.employee(&id("125")).is_some());
    }

    #[test]
    fn every_employee_is_reachable_by_its_own_id() {
        let records =
            vec![employee("1", 1000, None), employee("2", 2000, Some("1")), employee("3", 3000, Some("2"))];
        let hierarchy = Hierarchy::build(records.clone()).expect("build");

        for record in &records {
            assert_eq!(hierarchy.employee(&record.id), Some(record));
        }
    }

    #[test]
    fn two_cycle_fails_construction() {
        let error = Hierarchy::build(vec![
            employee("1", 1000, Some("2")),
            employee("2", 2000, Some("1")),
        ])
        .expect_err("cycle must abort construction");

        let HierarchyError::CycleDetected { employee_id } = error;
        assert!(employee_id == id("1") || employee_id == id("2"));
    }

    #[test]
    fn self_reference_fails_construction() {
        let error = Hierarchy::build(vec![employee("7", 1000, Some("7"))])
            .expect_err("self-managed employee is a cycle");

        assert_eq!(error, HierarchyError::CycleDetected { employee_id: id("7") });
    }

    #[test]
    fn deep_cycle_below_a_valid_root_is_still_caught() {
        let error = Hierarchy::build(vec![
            employee("1", 1000, None),
            employee("2", 2000, Some("4")),
            employee("3", 3000, Some("2")),
            employee("4", 4000, Some("3")),
        ])
        .expect_err("cycle in a side branch must abort construction");

        assert!(matches!(error, HierarchyError::CycleDetected { .. }));
    }

    #[test]
    fn last_manager_less_employee_wins_as_root() {
        let hierarchy = Hierarchy::build(vec![
            employee("1", 100000, None),
            employee("2", 120000, None),
            employee("3", 30000, Some("1")),
        ])
        .expect("multiple roots are permitted");

        assert_eq!(hierarchy.root().map(|e| e.id.clone()), Some(id("2")));
    }

    #[test]
    fn dangling_manager_reference_is_dropped_silently() {
        let hierarchy = Hierarchy::build(vec![
            employee("1", 100000, None),
            employee("2", 30000, Some("999")),
        ])
        .expect("dangling manager is not an error");

        assert!(hierarchy.direct_reports(&id("999")).is_empty());
        assert!(hierarchy.employee(&id("2")).is_some());
    }

    #[test]
    fn no_root_is_a_valid_state() {
        // Both employees point at a manager that is present, so there
        // is no manager-less record at all: 2 -> 1 -> 999 (dangling).
        let hierarchy = Hierarchy::build(vec![
            employee("1", 1000, Some("999")),
            employee("2", 2000, Some("1")),
        ])
        .expect("orphaned subtree without a root still builds");

        assert!(hierarchy.root().is_none());
    }

    #[test]
    fn duplicate_ids_keep_the_last_record() {
        let hierarchy = Hierarchy::build(vec![
            employee("1", 1000, None),
            employee("2", 2000, Some("1")),
            employee("2", 2500, Some("1")),
        ])
        .expect("duplicates are permitted, last write wins");

        assert_eq!(hierarchy.len(), 2);
        assert_eq!(
            hierarchy.employee(&id("2")).map(|e| e.salary),
            Some(Decimal::from(2500))
        );
        // one parent edge, not two
        assert_eq!(hierarchy.direct_reports(&id("1")), &[id("2")]);
    }

    #[test]
    fn empty_input_builds_an_empty_hierarchy() {
        let hierarchy = Hierarchy::build(Vec::new()).expect("empty input is valid");
        assert!(hierarchy.is_empty());
        assert!(hierarchy.root().is_none());
    }
}
