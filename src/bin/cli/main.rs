mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lexigrow-cli", about = "LexiGrow vocabulary progress CLI", version)]
struct Cli {
    /// Data directory holding lexigrow.db and lexigrow.toml
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Teacher password, required for teacher commands
    #[arg(long, global = true)]
    teacher_password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Answer {
    /// I know this word
    Known,
    /// I don't know this word
    Unknown,
}

#[derive(Subcommand)]
enum Command {
    /// Word bank
    #[command(subcommand)]
    Word(WordCommand),

    /// Word-sets with stories
    #[command(subcommand)]
    Wordset(WordSetCommand),

    /// Student accounts
    #[command(subcommand)]
    Student(StudentCommand),

    /// Mark a word as known or unknown
    Review {
        /// Word text or id
        word: String,
        /// Review answer
        #[arg(value_enum)]
        answer: Answer,
        /// Student name or id (default: the shared student)
        #[arg(long)]
        student: Option<String>,
        /// Idempotency key; repeating it does not record the review twice
        #[arg(long)]
        key: Option<String>,
    },

    /// Show level, XP and recent awards
    Profile {
        /// Student name or id (default: the shared student)
        #[arg(long)]
        student: Option<String>,
    },

    /// List stranger words, most recent first
    Strangers {
        #[arg(long)]
        student: Option<String>,
    },

    /// List words due for review
    Due {
        #[arg(long)]
        student: Option<String>,
    },

    /// Show the study log
    History {
        #[arg(long)]
        student: Option<String>,
        /// Maximum entries
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Learning statistics per student (teacher only)
    Stats {
        /// Limit to one student
        #[arg(long)]
        student: Option<String>,
    },
}

#[derive(Subcommand)]
enum WordCommand {
    /// Add a word (teacher only)
    Add {
        /// Headword
        text: String,
        #[arg(long)]
        phonetic: Option<String>,
        /// Part of speech
        #[arg(long)]
        pos: Option<String>,
        #[arg(long)]
        meaning_en: Option<String>,
        #[arg(long)]
        meaning_zh: Option<String>,
        #[arg(long)]
        example_en: Option<String>,
        #[arg(long)]
        example_zh: Option<String>,
        /// Syllables separated by '-', e.g. "re-sil-ient"
        #[arg(long)]
        syllables: Option<String>,
        #[arg(long)]
        roots: Option<String>,
        #[arg(long)]
        mnemonics: Option<String>,
    },

    /// List words
    List {
        /// Maximum results
        #[arg(long, default_value = "50")]
        limit: usize,
        /// Oldest first instead of newest first
        #[arg(long)]
        oldest: bool,
    },

    /// Show one word, with a student's progress on it
    Show {
        /// Word text or id
        word: String,
        /// Student name or id; shows their progress on the word
        #[arg(long)]
        student: Option<String>,
    },
}

#[derive(Subcommand)]
enum WordSetCommand {
    /// Create a word-set from existing words (teacher only)
    Create {
        /// Set name
        name: String,
        /// Comma-separated word texts, in order
        #[arg(long)]
        words: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        story_en: Option<String>,
        #[arg(long)]
        story_zh: Option<String>,
    },

    /// List word-sets
    List,

    /// Show a word-set with its words and story
    Show {
        /// Set name or id
        set: String,
    },
}

#[derive(Subcommand)]
enum StudentCommand {
    /// Register a student
    Add { name: String },
    /// List students
    List,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.data_dir.clone())?;
    let password = cli.teacher_password.as_deref();

    match cli.command {
        Command::Word(subcmd) => match subcmd {
            WordCommand::Add {
                text,
                phonetic,
                pos,
                meaning_en,
                meaning_zh,
                example_en,
                example_zh,
                syllables,
                roots,
                mnemonics,
            } => {
                app.require_teacher(password)?;
                let mut new_word = lexigrow_lib::content::NewWord::new(text);
                new_word.phonetic = phonetic;
                new_word.pos = pos;
                new_word.meaning_en = meaning_en;
                new_word.meaning_zh = meaning_zh;
                new_word.example_en = example_en;
                new_word.example_zh = example_zh;
                new_word.syllables = syllables;
                new_word.word_roots = roots;
                new_word.mnemonics = mnemonics;
                commands::words::run_add(&app, new_word, &cli.format, use_color)?;
            }
            WordCommand::List { limit, oldest } => {
                commands::words::run_list(&app, limit, oldest, &cli.format, use_color)?;
            }
            WordCommand::Show { word, student } => {
                commands::words::run_show(&app, &word, student.as_deref(), &cli.format, use_color)?;
            }
        },
        Command::Wordset(subcmd) => match subcmd {
            WordSetCommand::Create {
                name,
                words,
                description,
                story_en,
                story_zh,
            } => {
                app.require_teacher(password)?;
                let new_set = lexigrow_lib::content::NewWordSet {
                    name,
                    description,
                    story_en,
                    story_zh,
                    word_ids: Vec::new(),
                };
                commands::wordsets::run_create(&app, new_set, &words, &cli.format, use_color)?;
            }
            WordSetCommand::List => {
                commands::wordsets::run_list(&app, &cli.format, use_color)?;
            }
            WordSetCommand::Show { set } => {
                commands::wordsets::run_show(&app, &set, &cli.format, use_color)?;
            }
        },
        Command::Student(subcmd) => match subcmd {
            StudentCommand::Add { name } => {
                commands::students::run_add(&app, &name, &cli.format)?;
            }
            StudentCommand::List => {
                commands::students::run_list(&app, &cli.format)?;
            }
        },
        Command::Review {
            word,
            answer,
            student,
            key,
        } => {
            commands::review::run(
                &app,
                &word,
                answer,
                student.as_deref(),
                key.as_deref(),
                &cli.format,
                use_color,
            )?;
        }
        Command::Profile { student } => {
            commands::profile::run_profile(&app, student.as_deref(), &cli.format, use_color)?;
        }
        Command::Strangers { student } => {
            commands::profile::run_strangers(&app, student.as_deref(), &cli.format, use_color)?;
        }
        Command::Due { student } => {
            commands::profile::run_due(&app, student.as_deref(), &cli.format, use_color)?;
        }
        Command::History { student, limit } => {
            commands::profile::run_history(&app, student.as_deref(), limit, &cli.format, use_color)?;
        }
        Command::Stats { student } => {
            app.require_teacher(password)?;
            commands::stats::run(&app, student.as_deref(), &cli.format, use_color)?;
        }
    }

    Ok(())
}
