use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::employee::{Employee, EmployeeId};
use crate::errors::IngestError;

/// Reads employee records from a CSV with the header
/// `Id,firstName,lastName,salary,managerId`. The manager id column
/// may be empty (the root) or missing entirely.
///
/// Lines with fewer than four fields are skipped with a warning; an
/// unparseable salary aborts the read. Field well-formedness ends
/// here: downstream code only checks referential and structural
/// integrity.
pub fn read_employees<R: BufRead>(reader: R) -> Result<Vec<Employee>, IngestError> {
    let mut employees = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line_no == 1 {
            continue; // header
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 4 {
            warn!(line = line_no, content = line, "skipping malformed line");
            continue;
        }

        let salary_field = fields[3].trim();
        let salary = salary_field.parse::<Decimal>().map_err(|_| IngestError::InvalidSalary {
            line: line_no,
            value: salary_field.to_string(),
        })?;

        let manager_id = fields
            .get(4)
            .map(|field| field.trim())
            .filter(|field| !field.is_empty())
            .map(|field| EmployeeId(field.to_string()));

        employees.push(Employee {
            id: EmployeeId(fields[0].trim().to_string()),
            first_name: fields[1].trim().to_string(),
            last_name: fields[2].trim().to_string(),
            salary,
            manager_id,
        });
    }

    Ok(employees)
}

pub fn read_employees_from_path(path: &Path) -> Result<Vec<Employee>, IngestError> {
    let file = File::open(path)
        .map_err(|source| IngestError::Open { path: path.to_path_buf(), source })?;
    read_employees(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use rust_decimal::Decimal;

    use crate::errors::IngestError;

    use super::{read_employees, read_employees_from_path};

    const SAMPLE: &str = "Id,firstName,lastName,salary,managerId\n\
        123,Joe,Doe,60000,\n\
        124,Martin,Chekov,45000,123\n\
        125,Bob,Ronstad,47000,123\n\
        300,Alice,Hasacat,50000,124\n\
        305,Brett,Hardleaf,34000,300\n";

    #[test]
    fn parses_sample_csv() {
        let employees = read_employees(Cursor::new(SAMPLE)).expect("sample parses");

        assert_eq!(employees.len(), 5);
        assert_eq!(employees[0].id.as_str(), "123");
        assert_eq!(employees[0].first_name, "Joe");
        assert_eq!(employees[0].last_name, "Doe");
        assert_eq!(employees[0].salary, Decimal::from(60000));
        assert!(employees[0].manager_id.is_none());
        assert_eq!(employees[3].manager_id.as_ref().map(|m| m.as_str()), Some("124"));
    }

    #[test]
    fn skips_blank_and_short_lines() {
        let csv = "Id,firstName,lastName,salary,managerId\n\
            \n\
            garbage-line\n\
            1,Ada,Root,1000,\n";
        let employees = read_employees(Cursor::new(csv)).expect("short lines are skipped");

        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].id.as_str(), "1");
    }

    #[test]
    fn missing_manager_column_means_no_manager() {
        let csv = "Id,firstName,lastName,salary,managerId\n1,Ada,Root,1000\n";
        let employees = read_employees(Cursor::new(csv)).expect("four-field line parses");

        assert!(employees[0].manager_id.is_none());
    }

    #[test]
    fn invalid_salary_aborts_the_read() {
        let csv = "Id,firstName,lastName,salary,managerId\n1,Ada,Root,not-a-number,\n";
        let error = read_employees(Cursor::new(csv)).expect_err("bad salary must fail");

        assert!(matches!(
            error,
            IngestError::InvalidSalary { line: 2, ref value } if value == "not-a-number"
        ));
    }

    #[test]
    fn fields_are_trimmed_and_decimal_salaries_parse() {
        let csv = "Id,firstName,lastName,salary,managerId\n 1 , Ada , Root , 1000.50 , \n";
        let employees = read_employees(Cursor::new(csv)).expect("padded fields parse");

        assert_eq!(employees[0].id.as_str(), "1");
        assert_eq!(employees[0].salary, Decimal::new(100050, 2));
        assert!(employees[0].manager_id.is_none());
    }

    #[test]
    fn header_only_input_yields_no_records() {
        let employees = read_employees(Cursor::new("Id,firstName,lastName,salary,managerId\n"))
            .expect("header-only input is valid");
        assert!(employees.is_empty());
    }

    #[test]
    fn reads_from_a_file_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("employees.csv");
        fs::write(&path, SAMPLE).expect("write fixture");

        let employees = read_employees_from_path(&path).expect("file parses");
        assert_eq!(employees.len(), 5);
    }

    #[test]
    fn missing_file_surfaces_the_path() {
        let error = read_employees_from_path(std::path::Path::new("/nonexistent/employees.csv"))
            .expect_err("missing file must fail");

        assert!(matches!(error, IngestError::Open { .. }));
        assert!(error.to_string().contains("/nonexistent/employees.csv"));
    }
}
