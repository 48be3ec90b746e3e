//! Terminal front end: one subcommand per form.

pub mod prompts;

use clap::{Parser, Subcommand};
use edulink_models::RegistrationRole;
use tracing::debug;

use crate::modules::auth::{LoginForm, RegistrationForm};
use crate::modules::profile::ProfileEditor;
use crate::modules::schools::{SchoolRegistrationWizard, WizardStep};
use crate::modules::students::{StudentProfileView, StudentRoster};
use crate::router::SubmitError;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "edulink")]
#[command(about = "Edulink - school accounts from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a student, teacher or parent account
    Register {
        /// Account role (student, teacher or parent); prompted when omitted
        #[arg(short = 'r', long)]
        role: Option<RegistrationRole>,
    },
    /// Register a school and its administrator
    RegisterSchool,
    /// Sign in with email and password
    Login {
        /// Email address (prompted when omitted)
        #[arg(short = 'e', long)]
        email: Option<String>,
    },
    /// Show or edit the profile stored on this device
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Browse the school's students
    Students {
        #[command(subcommand)]
        command: StudentsCommand,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Print the stored profile
    Show,
    /// Edit the stored profile
    Edit,
}

#[derive(Subcommand)]
pub enum StudentsCommand {
    /// List every student
    List,
    /// Show one student's profile
    Show {
        /// Student ID
        id: String,
    },
}

pub async fn run(cli: Cli, state: &AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Register { role } => handle_register(state, role).await,
        Commands::RegisterSchool => handle_register_school(state).await,
        Commands::Login { email } => handle_login(state, email).await,
        Commands::Profile { command } => match command {
            ProfileCommand::Show => handle_profile_show(state),
            ProfileCommand::Edit => handle_profile_edit(state),
        },
        Commands::Students { command } => match command {
            StudentsCommand::List => handle_students_list(state).await,
            StudentsCommand::Show { id } => handle_student_show(state, &id).await,
        },
    }
}

/// Field failures are shown and re-prompted; anything else ends the command.
fn field_failure(error: SubmitError) -> anyhow::Result<Vec<String>> {
    match error.field_errors() {
        Some(fields) if error.notice.is_none() => {
            prompts::print_field_errors(fields);
            Ok(fields.fields().map(str::to_string).collect())
        }
        _ => Err(error.into()),
    }
}

async fn handle_register(state: &AppState, role: Option<RegistrationRole>) -> anyhow::Result<()> {
    let mut form = RegistrationForm::new();
    let role = match role {
        Some(role) => role,
        None => prompts::role(form.selected_role())?,
    };
    form.select_role(role);

    let mut fields: Vec<String> = ["firstName", "lastName", "email", "password", "confirmPassword"]
        .iter()
        .chain(role.specific_fields())
        .map(|f| f.to_string())
        .collect();

    loop {
        for field in &fields {
            prompts::registration_field(form.values_mut(), field)?;
        }

        match form.submit(state).await {
            Ok(outcome) => {
                prompts::print_outcome(&outcome);
                return Ok(());
            }
            Err(error) => {
                fields = field_failure(error)?;
                // A mismatch is fixed by typing both passwords again.
                if fields.iter().any(|f| f == "password" || f == "confirmPassword") {
                    fields.retain(|f| f != "password" && f != "confirmPassword");
                    fields.push("password".to_string());
                    fields.push("confirmPassword".to_string());
                }
            }
        }
    }
}

fn prompt_wizard_step(wizard: &mut SchoolRegistrationWizard) -> dialoguer::Result<()> {
    let step = wizard.step();
    println!("\nStep {} of 3: {}", step.number(), step.title());

    let values = &mut wizard.values;
    match step {
        WizardStep::SchoolDetails => {
            values.school_name = prompts::text("School name", &values.school_name)?;
            values.subdomain = prompts::text("Subdomain", &values.subdomain)?;
        }
        WizardStep::Administrator => {
            values.admin_first_name =
                prompts::text("Administrator first name", &values.admin_first_name)?;
            values.admin_last_name =
                prompts::text("Administrator last name", &values.admin_last_name)?;
            values.email = prompts::text("Email", &values.email)?;
            values.phone = prompts::text("Phone", &values.phone)?;
        }
        WizardStep::Security => {
            values.password = prompts::secret("Password")?;
            values.confirm_password = prompts::secret("Confirm password")?;
            values.language = prompts::language(values.language)?;
        }
    }
    Ok(())
}

async fn handle_register_school(state: &AppState) -> anyhow::Result<()> {
    let mut wizard = SchoolRegistrationWizard::new();

    loop {
        prompt_wizard_step(&mut wizard)?;

        if wizard.step() != WizardStep::Security {
            if wizard.advance_step().is_err()
                && let Some(message) = wizard.step_error()
            {
                eprintln!("\n❌ {}", message);
            }
            continue;
        }

        match wizard.submit(state).await {
            Ok(outcome) => {
                prompts::print_outcome(&outcome);
                return Ok(());
            }
            Err(error) => {
                field_failure(error)?;
                if let Some(step) = wizard.first_step_with_errors() {
                    while wizard.step() > step {
                        wizard.go_back();
                    }
                }
            }
        }
    }
}

async fn handle_login(state: &AppState, email: Option<String>) -> anyhow::Result<()> {
    let mut form = LoginForm::new(state);
    if let Some(email) = email {
        form.values.email = email;
    }

    loop {
        form.values.email = prompts::text("Email", &form.values.email)?;
        form.values.password = prompts::secret("Password")?;
        form.values.remember_me = prompts::confirm("Remember me", form.values.remember_me)?;

        match form.submit(state).await {
            Ok(outcome) => {
                prompts::print_outcome(&outcome);
                return Ok(());
            }
            Err(error) => {
                field_failure(error)?;
            }
        }
    }
}

fn handle_profile_show(state: &AppState) -> anyhow::Result<()> {
    let mut editor = ProfileEditor::new();
    match editor.mount(state).map_err(|e| e.error)? {
        Some(profile) => prompts::print_profile(profile),
        None => println!("No profile stored on this device yet. Register an account first."),
    }
    Ok(())
}

fn handle_profile_edit(state: &AppState) -> anyhow::Result<()> {
    let mut editor = ProfileEditor::new();
    editor.mount(state).map_err(|e| e.error)?;
    if !editor.begin_edit() {
        println!("No profile stored on this device yet. Register an account first.");
        return Ok(());
    }

    if let Some(draft) = editor.draft_mut() {
        draft.first_name = prompts::text("First name", &draft.first_name)?;
        draft.last_name = prompts::text("Last name", &draft.last_name)?;
        draft.email = prompts::text("Email", &draft.email)?;
        draft.role = prompts::text("Role", &draft.role)?;

        for (label, slot) in [
            ("Student ID", &mut draft.student_id),
            ("Grade level", &mut draft.grade_level),
            ("Subjects", &mut draft.subjects),
            ("Child's name", &mut draft.child_name),
            ("Child's student ID", &mut draft.child_student_id),
        ] {
            if let Some(value) = slot {
                *value = prompts::text(label, value)?;
            }
        }
    }

    if !prompts::confirm("Save changes?", true)? {
        editor.cancel_edit();
        debug!("Profile edit cancelled");
        println!("\nNo changes saved.");
        return Ok(());
    }

    if let Some(outcome) = editor.save(state)? {
        prompts::print_outcome(&outcome);
    }
    if let Some(profile) = editor.profile() {
        prompts::print_profile(profile);
    }
    Ok(())
}

/// Prints the failure notice and ends the command with the underlying cause.
fn view_failure(error: SubmitError) -> anyhow::Error {
    if let Some(notice) = &error.notice {
        prompts::print_notice(notice);
    }
    error.error.error
}

async fn handle_students_list(state: &AppState) -> anyhow::Result<()> {
    let mut roster = StudentRoster::new();
    roster.load(state).await.map_err(view_failure)?;

    if roster.is_empty() {
        println!("\nNo students found.");
    } else {
        prompts::print_student_list(roster.students());
    }
    Ok(())
}

async fn handle_student_show(state: &AppState, id: &str) -> anyhow::Result<()> {
    let mut view = StudentProfileView::new();
    let student = view.load(state, id).await.map_err(view_failure)?;
    prompts::print_student(student);
    Ok(())
}
