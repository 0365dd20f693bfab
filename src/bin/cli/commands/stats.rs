use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{pad, paint, truncate, Color};
use crate::OutputFormat;

pub fn run(app: &App, student: Option<&str>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let stats = match student {
        Some(query) => {
            let student = app.resolve_student(Some(query))?;
            vec![app.engine.get_student_stats(student.id)?]
        }
        None => app.engine.list_all_student_stats()?,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            if stats.is_empty() {
                println!("No students yet.");
                return Ok(());
            }

            println!(
                "{:<20} {:>6} {:>6} {:>8} {:>9} {:>9} {:>6} {:>6}  {}",
                "Student", "Logs", "Known", "Unknown", "Mastered", "Strangers", "Level", "XP", "Last active"
            );
            println!("{}", "-".repeat(100));
            for row in &stats {
                let level = row.level.map_or("-".to_string(), |l| l.to_string());
                let xp = row.xp.map_or("-".to_string(), |x| x.to_string());
                let last = row
                    .last_activity
                    .map_or("never".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
                println!(
                    "{} {:>6} {:>6} {:>8} {:>9} {:>9} {:>6} {:>6}  {}",
                    pad(&truncate(&row.name, 20), 20),
                    row.total_logs,
                    row.known_logs,
                    row.unknown_logs,
                    row.mastered_words,
                    row.stranger_words,
                    level,
                    xp,
                    paint(&last, Color::GRAY, use_color)
                );
            }
        }
    }

    Ok(())
}
