use std::fmt;
use std::sync::Arc;

use learn_core::model::EnrolledCourse;
use learn_core::{Clock, StaticCatalog};
use services::{LearningHandle, Store, StoreConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DB_URL: &str = "sqlite://learning.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingOperand { command: &'static str, name: &'static str },
    UnknownArg(String),
    InvalidLessonIndex { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingOperand { command, name } => {
                write!(f, "{command} requires <{name}>")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLessonIndex { raw } => write!(f, "invalid lesson index: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [stats]                    [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- enroll <title>             [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- toggle-lesson <title> <n>  [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- reset                      [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEARN_DB_URL, LEARN_STATE_KEY, LEARN_SAVE_DEBOUNCE_MS, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Stats,
    Enroll { title: String },
    ToggleLesson { title: String, lesson_index: u32 },
    Reset,
}

struct Args {
    db_url: String,
    command: Command,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut db_url = std::env::var("LEARN_DB_URL")
            .ok()
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut operands = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--help" | "-h" => return Ok(None),
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => operands.push(arg),
            }
        }

        let command = Self::command(operands)?;
        Ok(Some(Self { db_url, command }))
    }

    fn command(operands: Vec<String>) -> Result<Command, ArgsError> {
        let mut operands = operands.into_iter();
        let command = match operands.next().as_deref() {
            None | Some("stats") => Command::Stats,
            Some("reset") => Command::Reset,
            Some("enroll") => Command::Enroll {
                title: operands.next().ok_or(ArgsError::MissingOperand {
                    command: "enroll",
                    name: "title",
                })?,
            },
            Some("toggle-lesson") => {
                let title = operands.next().ok_or(ArgsError::MissingOperand {
                    command: "toggle-lesson",
                    name: "title",
                })?;
                let raw = operands.next().ok_or(ArgsError::MissingOperand {
                    command: "toggle-lesson",
                    name: "lesson",
                })?;
                let lesson_index = raw
                    .parse()
                    .map_err(|_| ArgsError::InvalidLessonIndex { raw: raw.clone() })?;
                Command::ToggleLesson {
                    title,
                    lesson_index,
                }
            }
            Some(other) => return Err(ArgsError::UnknownArg(other.to_owned())),
        };
        if let Some(extra) = operands.next() {
            return Err(ArgsError::UnknownArg(extra));
        }
        Ok(command)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn print_stats(handle: &LearningHandle) {
    let courses = handle.courses();
    println!("Enrolled courses ({}):", courses.enrolled.len());
    for course in &courses.enrolled {
        let progress = handle.course_progress(&course.title) * 100.0;
        let favorites = courses
            .resource_favorites
            .get(&course.title)
            .map_or(0, std::collections::BTreeSet::len);
        println!(
            "  {:<32} {:>5.1}% lessons  {favorites} favorites  [{}]",
            course.title,
            progress,
            course.level.label()
        );
    }

    let user = handle.user();
    println!();
    println!("Learner:       {} <{}>", user.profile.name, user.profile.email);
    println!(
        "Level:         {} ({} XP, {:.0}% to next)",
        handle.current_level(),
        handle.total_xp(),
        handle.level_progress() * 100.0
    );
    println!(
        "Achievements:  {:.0}% complete, {} points earned",
        handle.completion_rate() * 100.0,
        handle.earned_points()
    );
    let groups = handle.group_aggregate();
    println!(
        "Study groups:  {} of {} joined, {:.1}% average attendance",
        groups.joined, groups.groups, groups.avg_attendance
    );
    println!("Upcoming:      {} sessions", handle.upcoming_sessions().len());

    let badges = handle.sidebar_badges();
    if badges.total() > 0 {
        let counts: Vec<String> = badges
            .iter()
            .map(|(name, count)| format!("{name} {count}"))
            .collect();
        println!("Badges:        {}", counts.join(", "));
    }

    let available = handle.available_courses();
    if !available.is_empty() {
        println!();
        println!("Available to enroll:");
        for title in available {
            println!("  {title}");
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let Some(args) = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?
    else {
        print_usage();
        return Ok(());
    };

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&args.db_url)?;
    tracing::info!(db = %args.db_url, "opening learning store");
    let config = StoreConfig::from_env();
    let store = Store::open_sqlite(&args.db_url, &config).await?;
    let catalog = Arc::new(StaticCatalog::builtin());
    let handle = LearningHandle::new(store, catalog, Clock::default());

    match &args.command {
        Command::Stats => print_stats(&handle),
        Command::Enroll { title } => {
            let enrolled = handle.enroll_from_catalog(title)
                || handle.enroll_course(EnrolledCourse::titled(title.as_str()));
            if enrolled {
                println!("enrolled in {title}");
            } else {
                println!("already enrolled in {title}");
            }
        }
        Command::ToggleLesson {
            title,
            lesson_index,
        } => {
            handle.toggle_lesson_completion(title.as_str(), *lesson_index);
            let done = handle.courses().is_lesson_complete(title, *lesson_index);
            println!(
                "{title} lesson {lesson_index}: {}",
                if done { "complete" } else { "not complete" }
            );
        }
        Command::Reset => {
            handle.reset_course_progress();
            println!("course progress reset to defaults");
        }
    }

    handle.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(args: &[&str]) -> Result<Command, ArgsError> {
        Args::command(args.iter().map(|s| (*s).to_owned()).collect())
    }

    #[test]
    fn stats_is_the_default_command() {
        assert_eq!(command(&[]).unwrap(), Command::Stats);
        assert_eq!(command(&["stats"]).unwrap(), Command::Stats);
    }

    #[test]
    fn toggle_lesson_parses_index() {
        assert_eq!(
            command(&["toggle-lesson", "Rust", "3"]).unwrap(),
            Command::ToggleLesson {
                title: "Rust".into(),
                lesson_index: 3
            }
        );
        assert!(matches!(
            command(&["toggle-lesson", "Rust", "three"]),
            Err(ArgsError::InvalidLessonIndex { .. })
        ));
        assert!(matches!(
            command(&["toggle-lesson", "Rust"]),
            Err(ArgsError::MissingOperand { .. })
        ));
    }

    #[test]
    fn stray_operands_are_rejected() {
        assert!(matches!(
            command(&["reset", "now"]),
            Err(ArgsError::UnknownArg(_))
        ));
        assert!(matches!(command(&["launch"]), Err(ArgsError::UnknownArg(_))));
    }

    #[test]
    fn sqlite_urls_pass_through_and_paths_are_absolutized() {
        assert_eq!(
            normalize_sqlite_url("sqlite://a.db".into()),
            "sqlite://a.db"
        );
        assert!(normalize_sqlite_url("data/a.db".into()).starts_with("sqlite:///"));
    }
}
