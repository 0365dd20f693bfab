use anyhow::Result;

use crate::app::App;
use crate::render::terminal::pad;
use crate::OutputFormat;

pub fn run_add(app: &App, name: &str, format: &OutputFormat) -> Result<()> {
    let student = app.engine.create_student(name)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&student)?);
        }
        OutputFormat::Plain => {
            println!("Registered student \"{}\"", student.name);
            println!("  ID: {}", student.id);
        }
    }

    Ok(())
}

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let students = app.engine.list_students()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&students)?);
        }
        OutputFormat::Plain => {
            if students.is_empty() {
                println!("No students yet.");
                return Ok(());
            }
            for student in &students {
                println!(
                    "{} {}  joined {}",
                    pad(&student.name, 24),
                    student.id,
                    student.created_at.format("%Y-%m-%d")
                );
            }
        }
    }

    Ok(())
}
