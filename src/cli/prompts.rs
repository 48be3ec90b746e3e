//! Interactive prompts and terminal output.

use dialoguer::{Confirm, Input, Password, Select};
use edulink_core::FieldErrors;
use edulink_models::{Language, RegistrationRole, Student, UserProfile};

use crate::modules::auth::RegistrationValues;
use crate::router::{Notice, SubmitOutcome};

/// Prompts for free text, pre-filled with what was typed last time.
pub fn text(label: &str, current: &str) -> dialoguer::Result<String> {
    Input::<String>::new()
        .with_prompt(label)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
}

pub fn secret(label: &str) -> dialoguer::Result<String> {
    Password::new()
        .with_prompt(label)
        .allow_empty_password(true)
        .interact()
}

pub fn confirm(label: &str, default: bool) -> dialoguer::Result<bool> {
    Confirm::new()
        .with_prompt(label)
        .default(default)
        .interact()
}

pub fn role(current: RegistrationRole) -> dialoguer::Result<RegistrationRole> {
    let labels: Vec<&str> = RegistrationRole::ALL.iter().map(|r| r.label()).collect();
    let default = RegistrationRole::ALL
        .iter()
        .position(|r| *r == current)
        .unwrap_or(0);

    let index = Select::new()
        .with_prompt("I am a")
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(RegistrationRole::ALL[index])
}

pub fn language(current: Language) -> dialoguer::Result<Language> {
    let labels: Vec<String> = Language::ALL
        .iter()
        .map(|l| format!("{} ({})", l.label(), l.code()))
        .collect();
    let default = Language::ALL
        .iter()
        .position(|l| *l == current)
        .unwrap_or(0);

    let index = Select::new()
        .with_prompt("Language")
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(Language::ALL[index])
}

pub fn registration_field_label(field: &str) -> &'static str {
    match field {
        "firstName" => "First name",
        "lastName" => "Last name",
        "email" => "Email",
        "password" => "Password",
        "confirmPassword" => "Confirm password",
        "studentId" => "Student ID",
        "gradeLevel" => "Grade level",
        "subjects" => "Subjects (comma separated)",
        "childName" => "Child's name",
        "childStudentId" => "Child's student ID",
        _ => "Value",
    }
}

/// Prompts for one registration field, keyed by its camelCase name.
pub fn registration_field(values: &mut RegistrationValues, field: &str) -> dialoguer::Result<()> {
    let label = registration_field_label(field);
    let slot = match field {
        "firstName" => &mut values.first_name,
        "lastName" => &mut values.last_name,
        "email" => &mut values.email,
        "password" => &mut values.password,
        "confirmPassword" => &mut values.confirm_password,
        "studentId" => &mut values.student_id,
        "gradeLevel" => &mut values.grade_level,
        "subjects" => &mut values.subjects,
        "childName" => &mut values.child_name,
        "childStudentId" => &mut values.child_student_id,
        _ => return Ok(()),
    };

    *slot = if field == "password" || field == "confirmPassword" {
        secret(label)?
    } else {
        text(label, slot)?
    };
    Ok(())
}

pub fn print_outcome(outcome: &SubmitOutcome) {
    println!("\n{}", outcome.notice);
    if let Some(route) = outcome.redirect {
        println!("   → {}", route);
    }
}

pub fn print_notice(notice: &Notice) {
    eprintln!("\n{}", notice);
}

pub fn print_field_errors(errors: &FieldErrors) {
    eprintln!("\nPlease correct the following:");
    for (field, messages) in errors.iter() {
        for message in messages {
            eprintln!("   • {}: {}", field, message);
        }
    }
}

pub fn print_profile(profile: &UserProfile) {
    println!("\nProfile");
    println!("   Name:        {}", profile.name);
    println!("   Email:       {}", profile.email);
    println!("   Role:        {}", profile.role);
    println!("   Joined:      {}", profile.join_date);
    println!("   Last login:  {}", profile.last_login);

    let optional = [
        ("Student ID", &profile.student_id),
        ("Grade level", &profile.grade_level),
        ("Subjects", &profile.subjects),
        ("Child", &profile.child_name),
        ("Child's ID", &profile.child_student_id),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            println!("   {:<12} {}", format!("{}:", label), value);
        }
    }
}

pub fn print_student_list(students: &[Student]) {
    println!("\nStudents ({})", students.len());
    println!("   {:<8} {:<28} {:<32} {:<12} Gender", "ID", "Name", "Email", "Born");
    for student in students {
        println!(
            "   {:<8} {:<28} {:<32} {:<12} {}",
            student.id,
            student.full_name(),
            student.email.as_deref().unwrap_or("-"),
            student
                .date_of_birth
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            student.gender.as_deref().unwrap_or("-"),
        );
    }
}

pub fn print_student(student: &Student) {
    println!("\nStudent Profile: {}", student.full_name());
    println!("   Student ID:  {}", student.id);

    let basic = [
        ("Email", student.email.clone()),
        ("Born", student.date_of_birth.map(|d| d.to_string())),
        ("Gender", student.gender.clone()),
        ("Phone", student.contact_number.clone()),
        ("Address", student.address.clone()),
    ];
    for (label, value) in basic {
        if let Some(value) = value {
            println!("   {:<12} {}", format!("{}:", label), value);
        }
    }

    if !student.academic_records.is_empty() {
        println!("\n   Academic records");
        for record in &student.academic_records {
            let enrolled = record
                .enrollment_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            print!("   • Grade {} (enrolled {})", record.grade_level, enrolled);
            if let Some(major) = &record.major {
                print!(", {}", major);
            }
            if let Some(gpa) = &record.gpa {
                print!(", GPA {}", gpa);
            }
            println!();
        }
    }

    if let Some(medical) = &student.medical_info {
        println!("\n   Health");
        if !medical.allergies.trim().is_empty() {
            println!("   Allergies:   {}", medical.allergies);
        }
        if !medical.medical_conditions.trim().is_empty() {
            println!("   Conditions:  {}", medical.medical_conditions);
        }
        println!(
            "   Emergency:   {} ({})",
            medical.emergency_contact_name, medical.emergency_contact_number
        );
    }
}
