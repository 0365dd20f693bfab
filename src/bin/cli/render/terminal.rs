use lexigrow_lib::progress::{StudentWordProgress, WordStatus};
use lexigrow_lib::xp::{StudentProfile, XP_PER_LEVEL};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap text in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn status_label(status: WordStatus, use_color: bool) -> String {
    match status {
        WordStatus::Mastered => paint("MASTERED", Color::GREEN, use_color),
        WordStatus::Learning => paint("LEARNING", Color::YELLOW, use_color),
    }
}

/// One-line summary of a mastery record
pub fn progress_line(word: &str, progress: &StudentWordProgress, use_color: bool) -> String {
    let mut line = format!(
        "{} {}  familiarity {}/100",
        paint(word, Color::BOLD, use_color),
        status_label(progress.status, use_color),
        progress.familiarity_score
    );
    if progress.is_stranger {
        line.push_str(&format!("  {}", paint("stranger", Color::RED, use_color)));
    }
    if let Some(next) = progress.next_review_at {
        line.push_str(&format!(
            "  {}",
            paint(
                &format!("next review {}", next.format("%Y-%m-%d %H:%M")),
                Color::GRAY,
                use_color
            )
        ));
    }
    line
}

/// A student's standing on one word, or a note that they never reviewed it
pub fn word_progress_summary(
    word: &str,
    progress: Option<&StudentWordProgress>,
    use_color: bool,
) -> String {
    match progress {
        Some(progress) => progress_line(word, progress, use_color),
        None => paint("No study history for this word yet.", Color::GRAY, use_color),
    }
}

/// Mastered and stranger word counts, as shown on the profile
pub fn word_counts_line(mastered: u32, strangers: u32, use_color: bool) -> String {
    format!(
        "Mastered: {}  Strangers: {}",
        paint(&mastered.to_string(), Color::GREEN, use_color),
        paint(&strangers.to_string(), Color::RED, use_color)
    )
}

/// Progress towards the next level, e.g. `[######----] 60/100`
pub fn level_bar(profile: &StudentProfile, use_color: bool) -> String {
    const WIDTH: u32 = 20;
    let into_level = XP_PER_LEVEL - profile.xp_to_next_level();
    let filled = (into_level * WIDTH / XP_PER_LEVEL) as usize;
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(WIDTH as usize - filled)
    );
    format!(
        "[{}] {}/{}",
        paint(&bar, Color::CYAN, use_color),
        into_level,
        XP_PER_LEVEL
    )
}

/// Truncate to a display width, adding an ellipsis
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Left-align to a display width counted in characters, not bytes
pub fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", text, " ".repeat(width - len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn test_level_bar() {
        let now = Utc::now();
        let profile = StudentProfile {
            student_id: Uuid::new_v4(),
            level: 2,
            xp: 160,
            total_words_learned: 3,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(
            level_bar(&profile, false),
            "[############--------] 60/100"
        );

        let fresh = StudentProfile { xp: 0, ..profile };
        assert_eq!(level_bar(&fresh, false), "[--------------------] 0/100");
    }

    #[test]
    fn test_word_progress_summary() {
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap();
        assert_eq!(
            word_progress_summary("tide", None, false),
            "No study history for this word yet."
        );

        let progress = StudentWordProgress {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            word_id: Uuid::new_v4(),
            status: WordStatus::Learning,
            is_stranger: true,
            familiarity_score: 20,
            correct_count: 0,
            wrong_count: 1,
            dont_know_count: 1,
            last_reviewed_at: Some(now),
            next_review_at: Some(now + chrono::Duration::days(1)),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(
            word_progress_summary("tide", Some(&progress), false),
            "tide LEARNING  familiarity 20/100  stranger  next review 2026-03-10 08:00"
        );
    }

    #[test]
    fn test_word_counts_line() {
        assert_eq!(word_counts_line(4, 2, false), "Mastered: 4  Strangers: 2");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("resilience", 6), "resil…");
    }

    #[test]
    fn test_pad_counts_characters() {
        assert_eq!(pad("韧性", 4), "韧性  ");
        assert_eq!(pad("calm", 6), "calm  ");
        assert_eq!(pad("overflowing", 4), "overflowing");
        let painted = paint(&pad("韧性", 4), Color::BOLD, true);
        assert_eq!(painted, "\x1b[1m韧性  \x1b[0m");
    }

    #[test]
    fn test_paint_without_color() {
        assert_eq!(paint("x", Color::RED, false), "x");
        assert_eq!(paint("x", Color::RED, true), "\x1b[31mx\x1b[0m");
    }
}
