use anyhow::{bail, Result};

use lexigrow_lib::content::NewWordSet;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run_create(
    app: &App,
    mut new_set: NewWordSet,
    words: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let texts: Vec<&str> = words
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if texts.is_empty() {
        bail!("A word-set needs at least one word");
    }

    for text in texts {
        new_set.word_ids.push(app.find_word(text)?.id);
    }

    let set = app.engine.create_word_set(new_set, None)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&set)?);
        }
        OutputFormat::Plain => {
            println!(
                "Created word-set {} with {} word(s)",
                paint(&set.name, Color::BOLD, use_color),
                set.word_ids.len()
            );
            println!("  ID: {}", set.id);
        }
    }

    Ok(())
}

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let sets = app.engine.list_word_sets()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&sets)?);
        }
        OutputFormat::Plain => {
            if sets.is_empty() {
                println!("No word-sets yet.");
                return Ok(());
            }
            for set in &sets {
                println!(
                    "{}  {}",
                    paint(&set.name, Color::BOLD, use_color),
                    paint(&format!("{} words", set.word_ids.len()), Color::GRAY, use_color)
                );
                if let Some(description) = &set.description {
                    println!("  {}", description);
                }
            }
        }
    }

    Ok(())
}

pub fn run_show(app: &App, query: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let set = app.find_word_set(query)?;
    let words = app.engine.words_in_set(set.id)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "wordSet": set,
                "words": words,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", paint(&set.name, Color::BOLD, use_color));
            if let Some(description) = &set.description {
                println!("{}", description);
            }
            println!();
            for (index, word) in words.iter().enumerate() {
                println!(
                    "{:>3}. {}  {}",
                    index + 1,
                    paint(&word.text, Color::BOLD, use_color),
                    word.gloss().unwrap_or("")
                );
            }
            for story in [&set.story_en, &set.story_zh].into_iter().flatten() {
                println!();
                println!("{}", story);
            }
        }
    }

    Ok(())
}
