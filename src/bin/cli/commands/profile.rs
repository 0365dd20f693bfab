use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{level_bar, paint, progress_line, word_counts_line, Color};
use crate::OutputFormat;

pub fn run_profile(
    app: &App,
    student: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let student = app.resolve_student(student)?;
    let profile = app.engine.get_profile(student.id)?;
    let stats = app.engine.get_student_stats(student.id)?;
    let events = app
        .engine
        .recent_xp_events(student.id, app.config.recent_events_limit)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "student": student,
                "profile": profile,
                "xpToNextLevel": profile.xp_to_next_level(),
                "masteredCount": stats.mastered_words,
                "strangerCount": stats.stranger_words,
                "recentXpEvents": events,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "{}  Level {}  {} XP",
                paint(&student.name, Color::BOLD, use_color),
                profile.level,
                profile.xp
            );
            println!(
                "  {}  {} XP to level {}",
                level_bar(&profile, use_color),
                profile.xp_to_next_level(),
                profile.level + 1
            );
            println!("  Words learned: {}", profile.total_words_learned);
            println!(
                "  {}",
                word_counts_line(stats.mastered_words, stats.stranger_words, use_color)
            );

            if !events.is_empty() {
                println!();
                println!("Recent XP:");
                for event in &events {
                    println!(
                        "  {} +{:<3} {}",
                        paint(
                            &event.created_at.format("%Y-%m-%d %H:%M").to_string(),
                            Color::GRAY,
                            use_color
                        ),
                        event.points,
                        event.reason
                    );
                }
            }
        }
    }

    Ok(())
}

pub fn run_strangers(
    app: &App,
    student: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let student = app.resolve_student(student)?;
    let strangers = app.engine.list_stranger_words_with_words(student.id)?;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = strangers
                .iter()
                .map(|(progress, word)| {
                    serde_json::json!({
                        "word": word,
                        "progress": progress,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if strangers.is_empty() {
                println!("No stranger words. Nice work!");
                return Ok(());
            }
            for (progress, word) in &strangers {
                println!("{}", progress_line(&word.text, progress, use_color));
                if let Some(gloss) = word.gloss() {
                    println!("    {}", gloss);
                }
            }
        }
    }

    Ok(())
}

pub fn run_due(
    app: &App,
    student: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let student = app.resolve_student(student)?;
    let due = app.engine.list_due_words(student.id)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&due)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due for review.");
                return Ok(());
            }
            for progress in &due {
                let text = match app.engine.get_word(progress.word_id)? {
                    Some(word) => word.text,
                    None => progress.word_id.to_string(),
                };
                println!("{}", progress_line(&text, progress, use_color));
            }
        }
    }

    Ok(())
}

pub fn run_history(
    app: &App,
    student: Option<&str>,
    limit: usize,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let student = app.resolve_student(student)?;
    let logs = app.engine.recent_study_logs(student.id, limit)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&logs)?);
        }
        OutputFormat::Plain => {
            if logs.is_empty() {
                println!("No study activity yet.");
                return Ok(());
            }
            for log in &logs {
                let text = match app.engine.get_word(log.word_id)? {
                    Some(word) => word.text,
                    None => log.word_id.to_string(),
                };
                let action = if log.is_familiar {
                    paint("known  ", Color::GREEN, use_color)
                } else {
                    paint("unknown", Color::RED, use_color)
                };
                println!(
                    "{}  {}  {}",
                    paint(
                        &log.created_at.format("%Y-%m-%d %H:%M").to_string(),
                        Color::GRAY,
                        use_color
                    ),
                    action,
                    text
                );
            }
        }
    }

    Ok(())
}
