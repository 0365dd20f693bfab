use anyhow::Result;

use lexigrow_lib::progress::ReviewOutcome;

use crate::app::App;
use crate::render::terminal::{paint, progress_line, Color};
use crate::{Answer, OutputFormat};

pub fn run(
    app: &App,
    word_query: &str,
    answer: Answer,
    student: Option<&str>,
    key: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let student = app.resolve_student(student)?;
    let word = app.find_word(word_query)?;
    let outcome = match answer {
        Answer::Known => ReviewOutcome::Known,
        Answer::Unknown => ReviewOutcome::Unknown,
    };

    let progress = match key {
        Some(key) => app
            .engine
            .review_word_once(student.id, word.id, outcome, key)?,
        None => app.engine.review_word(student.id, word.id, outcome)?,
    };
    let profile = app.engine.get_profile(student.id)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "progress": progress,
                "profile": profile,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", progress_line(&word.text, &progress, use_color));
            println!(
                "  {} now level {} with {} XP",
                paint(&student.name, Color::BOLD, use_color),
                profile.level,
                profile.xp
            );
        }
    }

    Ok(())
}
