use anyhow::Result;

use lexigrow_lib::content::{NewWord, Word, WordOrder};

use crate::app::App;
use crate::render::terminal::{pad, paint, truncate, word_progress_summary, Color};
use crate::OutputFormat;

pub fn run_add(app: &App, new_word: NewWord, format: &OutputFormat, use_color: bool) -> Result<()> {
    let word = app.engine.create_word(new_word)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&word)?);
        }
        OutputFormat::Plain => {
            println!("Added word {}", paint(&word.text, Color::BOLD, use_color));
            println!("  ID: {}", word.id);
        }
    }

    Ok(())
}

pub fn run_list(
    app: &App,
    limit: usize,
    oldest: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let order = if oldest {
        WordOrder::OldestFirst
    } else {
        WordOrder::NewestFirst
    };
    let words = app.engine.list_words(limit, order)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&words)?);
        }
        OutputFormat::Plain => {
            if words.is_empty() {
                println!("The word bank is empty.");
                return Ok(());
            }

            let text_width = words
                .iter()
                .map(|w| w.text.chars().count())
                .max()
                .unwrap_or(4)
                .clamp(4, 24);
            println!("{} {:<18} {}", pad("Word", text_width), "Phonetic", "Meaning");
            println!("{}", "-".repeat(text_width + 50));
            for word in &words {
                // Pad before painting so escape codes don't count towards the width
                let text = pad(&truncate(&word.text, text_width), text_width);
                println!(
                    "{} {} {}",
                    paint(&text, Color::BOLD, use_color),
                    pad(&truncate(word.phonetic.as_deref().unwrap_or(""), 18), 18),
                    truncate(word.gloss().unwrap_or(""), 40)
                );
            }
            println!();
            println!("{} word(s)", words.len());
        }
    }

    Ok(())
}

pub fn run_show(
    app: &App,
    query: &str,
    student: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let word = app.find_word(query)?;

    let Some(student) = student else {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&word)?),
            OutputFormat::Plain => print_word(&word, use_color),
        }
        return Ok(());
    };

    let student = app.resolve_student(Some(student))?;
    let progress = app.engine.get_progress(student.id, word.id)?;
    let profile = app.engine.get_profile(student.id)?;
    let stats = app.engine.get_student_stats(student.id)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "word": word,
                "progress": progress,
                "profile": profile,
                "strangerCount": stats.stranger_words,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            print_word(&word, use_color);
            println!();
            println!(
                "  {}",
                word_progress_summary(&word.text, progress.as_ref(), use_color)
            );
            println!(
                "  {}: level {}, {} XP, {} stranger word(s)",
                paint(&student.name, Color::BOLD, use_color),
                profile.level,
                profile.xp,
                stats.stranger_words
            );
        }
    }

    Ok(())
}

pub fn print_word(word: &Word, use_color: bool) {
    let mut header = paint(&word.text, Color::BOLD, use_color);
    if let Some(phonetic) = &word.phonetic {
        header.push_str(&format!("  {}", phonetic));
    }
    if let Some(pos) = &word.pos {
        header.push_str(&format!("  {}", paint(pos, Color::GRAY, use_color)));
    }
    println!("{}", header);

    let syllables = word.syllable_parts();
    if syllables.len() > 1 {
        println!("  Syllables: {}", syllables.join(" · "));
    }

    let fields = [
        ("Meaning", &word.meaning_en),
        ("释义", &word.meaning_zh),
        ("Example", &word.example_en),
        ("例句", &word.example_zh),
        ("Roots", &word.word_roots),
        ("Mnemonic", &word.mnemonics),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {}: {}", paint(label, Color::CYAN, use_color), value);
        }
    }
}
