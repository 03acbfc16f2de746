//! Interactive console menu over the directory service.
//!
//! # Responsibility
//! - Collect user input and render results for every directory use-case.
//! - Consume only the outcome envelope: handlers branch on the
//!   success/failure discriminant and never assume a payload on failure.

use staffbook_core::{
    Employee, EmployeeId, EmployeeRepository, EmployeeService, Outcome, Payload, SearchCriteria,
    UpdateRequest,
};
use std::io::{self, BufRead, Write};

/// Runs the menu loop until the user exits or stdin closes.
pub fn run<R: EmployeeRepository>(service: &EmployeeService<R>) -> io::Result<()> {
    loop {
        print_main_menu();
        let Some(choice) = prompt("\nEnter your choice (1-8): ")? else {
            break;
        };

        match choice.as_str() {
            "1" => add_employee(service)?,
            "2" => view_all(service),
            "3" => search(service)?,
            "4" => update(service)?,
            "5" => delete(service)?,
            "6" => statistics(service),
            "7" => departments(service),
            "8" => {
                println!("\nThank you for using Staffbook. Goodbye.");
                return Ok(());
            }
            _ => {
                println!("Invalid choice. Please enter a number between 1 and 8.");
                continue;
            }
        }

        if prompt("\nPress Enter to continue...")?.is_none() {
            break;
        }
    }

    Ok(())
}

fn add_employee<R: EmployeeRepository>(service: &EmployeeService<R>) -> io::Result<()> {
    print_banner("ADD NEW EMPLOYEE");

    let Some(first_name) = prompt("First Name: ")? else {
        return Ok(());
    };
    let Some(last_name) = prompt("Last Name: ")? else {
        return Ok(());
    };
    let Some(department) = prompt("Department: ")? else {
        return Ok(());
    };
    let Some(phone_number) = prompt("Phone Number: ")? else {
        return Ok(());
    };

    report(&service.create(&first_name, &last_name, &department, &phone_number));
    Ok(())
}

fn view_all<R: EmployeeRepository>(service: &EmployeeService<R>) {
    print_banner("ALL EMPLOYEES");

    match service.get_all() {
        Outcome::Success {
            payload: Payload::Records(employees),
            ..
        } => display_employees(&employees),
        outcome => report(&outcome),
    }
}

fn search<R: EmployeeRepository>(service: &EmployeeService<R>) -> io::Result<()> {
    print_banner("SEARCH EMPLOYEES");
    println!("1. Search by name");
    println!("2. Filter by department");
    println!("3. Search by name and filter by department");
    println!("4. Show all employees");

    let criteria = loop {
        let Some(choice) = prompt("Enter your search choice (1-4): ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => {
                let Some(term) = prompt("Enter name to search: ")? else {
                    return Ok(());
                };
                break SearchCriteria::new(term, "");
            }
            "2" => {
                show_department_options(service);
                let Some(department) = prompt("Enter department name: ")? else {
                    return Ok(());
                };
                break SearchCriteria::new("", department);
            }
            "3" => {
                let Some(term) = prompt("Enter name to search: ")? else {
                    return Ok(());
                };
                show_department_options(service);
                let Some(department) = prompt("Enter department name: ")? else {
                    return Ok(());
                };
                break SearchCriteria::new(term, department);
            }
            "4" => break SearchCriteria::default(),
            _ => println!("Invalid choice. Please enter 1, 2, 3, or 4."),
        }
    };

    match service.search(&criteria) {
        Outcome::Success {
            payload: Payload::Records(employees),
            ..
        } => display_employees(&employees),
        outcome => report(&outcome),
    }
    Ok(())
}

fn update<R: EmployeeRepository>(service: &EmployeeService<R>) -> io::Result<()> {
    print_banner("UPDATE EMPLOYEE");

    let Some(id) = read_employee_id()? else {
        println!("\nError: Employee ID is required");
        return Ok(());
    };

    let employee = match service.get(id) {
        Outcome::Success {
            payload: Payload::Record(employee),
            ..
        } => employee,
        outcome => {
            report(&outcome);
            return Ok(());
        }
    };

    println!("\nCurrent information for Employee {id}:");
    display_employee(&employee);

    println!("\nEnter new information (leave blank to keep current value):");
    let Some(first_name) = prompt("New First Name: ")? else {
        return Ok(());
    };
    let Some(last_name) = prompt("New Last Name: ")? else {
        return Ok(());
    };
    let Some(department) = prompt("New Department: ")? else {
        return Ok(());
    };
    let Some(phone_number) = prompt("New Phone Number: ")? else {
        return Ok(());
    };

    let request = UpdateRequest::new(
        Some(&first_name),
        Some(&last_name),
        Some(&department),
        Some(&phone_number),
    );
    if !request.has_updates() {
        println!("\nError: No changes provided");
        return Ok(());
    }

    report(&service.update(id, &request));
    Ok(())
}

fn delete<R: EmployeeRepository>(service: &EmployeeService<R>) -> io::Result<()> {
    print_banner("DELETE EMPLOYEE");

    let Some(id) = read_employee_id()? else {
        println!("\nError: Employee ID is required");
        return Ok(());
    };

    let employee = match service.get(id) {
        Outcome::Success {
            payload: Payload::Record(employee),
            ..
        } => employee,
        outcome => {
            report(&outcome);
            return Ok(());
        }
    };

    println!("\nEmployee to be deleted:");
    display_employee(&employee);

    let Some(confirmation) =
        prompt("\nAre you sure you want to delete this employee? (yes/no): ")?
    else {
        return Ok(());
    };

    if matches!(confirmation.to_lowercase().as_str(), "yes" | "y") {
        report(&service.delete(id));
    } else {
        println!("\nDeletion cancelled");
    }
    Ok(())
}

fn statistics<R: EmployeeRepository>(service: &EmployeeService<R>) {
    print_banner("EMPLOYEE STATISTICS");

    match service.statistics() {
        Outcome::Success {
            payload: Payload::Stats(stats),
            ..
        } => {
            println!("\nTotal Employees: {}", stats.total_employees);
            println!("Total Departments: {}", stats.total_departments);
            println!("\nEmployees per Department:");
            println!("{}", "-".repeat(30));
            for (department, count) in &stats.employees_per_department {
                println!("{department}: {count} employee(s)");
            }
        }
        outcome => report(&outcome),
    }
}

fn departments<R: EmployeeRepository>(service: &EmployeeService<R>) {
    print_banner("DEPARTMENTS");

    match service.departments() {
        Outcome::Success {
            payload: Payload::Departments(departments),
            ..
        } => {
            if departments.is_empty() {
                println!("\nNo departments found.");
                return;
            }
            println!();
            for (index, department) in departments.iter().enumerate() {
                println!("{}. {department}", index + 1);
            }
        }
        outcome => report(&outcome),
    }
}

fn show_department_options<R: EmployeeRepository>(service: &EmployeeService<R>) {
    match service.departments() {
        Outcome::Success {
            payload: Payload::Departments(departments),
            ..
        } => {
            if departments.is_empty() {
                return;
            }
            println!("\nAvailable departments:");
            for (index, department) in departments.iter().enumerate() {
                println!("{}. {department}", index + 1);
            }
        }
        outcome => report(&outcome),
    }
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Success { message, .. } => println!("\n{message}"),
        Outcome::Failure { message, errors } => {
            println!("\nError: {message}");
            for error in errors {
                println!("  - {error}");
            }
        }
    }
}

fn display_employees(employees: &[Employee]) {
    if employees.is_empty() {
        println!("\nNo employees found.");
        return;
    }

    println!("\nFound {} employee(s):", employees.len());
    println!("{}", "=".repeat(60));
    for employee in employees {
        display_employee(employee);
    }
}

fn display_employee(employee: &Employee) {
    let id = employee
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("\nEmployee ID: {id}");
    println!("Name: {}", employee.full_name());
    println!("Department: {}", employee.department);
    println!("Phone Number: {}", employee.phone_number);
    println!("{}", "-".repeat(40));
}

fn read_employee_id() -> io::Result<Option<EmployeeId>> {
    loop {
        let Some(input) = prompt("Enter Employee ID: ")? else {
            return Ok(None);
        };
        if input.is_empty() {
            return Ok(None);
        }
        match parse_employee_id(&input) {
            Some(id) => return Ok(Some(id)),
            None => println!("Invalid input. Please enter a valid number."),
        }
    }
}

fn parse_employee_id(input: &str) -> Option<EmployeeId> {
    input.trim().parse::<EmployeeId>().ok()
}

/// Prints `label` without a newline and reads one trimmed line.
/// Returns `None` when stdin is closed.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_main_menu() {
    println!("\n{}", "=".repeat(60));
    println!("{:^60}", "EMPLOYEE MANAGEMENT SYSTEM");
    println!("{}", "=".repeat(60));
    println!("\nMain Menu Options:");
    println!("1. Add New Employee");
    println!("2. View All Employees");
    println!("3. Search Employees");
    println!("4. Update Employee");
    println!("5. Delete Employee");
    println!("6. View Employee Statistics");
    println!("7. View Departments");
    println!("8. Exit");
    println!("{}", "-".repeat(60));
}

fn print_banner(title: &str) {
    println!("\n{}", "=".repeat(40));
    println!("{title:^40}");
    println!("{}", "=".repeat(40));
}
