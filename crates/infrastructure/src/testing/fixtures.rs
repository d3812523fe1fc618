//! Employee fixtures with valid, seed-derived CPFs

use chrono::NaiveDate;
use domain::{
    DateOfBirth, DepartmentId, DocumentNumber, EmailAddress, Employee, EmployeeId, JobTitleId,
    NewEmployee, PersonName, PhoneNumber, PhoneRegion,
};

/// A valid CPF built from `seed`; equal seeds give equal numbers
pub fn cpf(seed: u32) -> DocumentNumber {
    DocumentNumber::from_base(987_650_000 + seed).unwrap()
}

/// Employee `seed` with the address `employee{seed}@acme.com`
pub fn employee(seed: u32) -> Employee {
    employee_with(seed, &format!("employee{seed}@acme.com"))
}

pub fn employee_with(seed: u32, email: &str) -> Employee {
    Employee::create(
        EmployeeId::new(),
        NewEmployee {
            first_name: PersonName::new("Test").unwrap(),
            last_name: PersonName::new(format!("Employee {seed}")).unwrap(),
            email: EmailAddress::new(email).unwrap(),
            document: cpf(seed),
            date_of_birth: DateOfBirth::new(NaiveDate::from_ymd_opt(1990, 1, 15).unwrap())
                .unwrap(),
            phones: vec![PhoneNumber::new("11987654321", PhoneRegion::Brazil).unwrap()],
            job_title_id: JobTitleId::new(),
            job_title_name: "Pleno".to_string(),
            department_id: DepartmentId::new(),
            manager_id: None,
        },
    )
    .unwrap()
}
