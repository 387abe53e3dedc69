mod app;
mod puzzles;
mod render;
mod storage;
mod theme;

use alphaclue_core::{
    author_document, DayKey, Difficulty, Error, Game, MappingGenerator, SessionOptions,
    SystemClock,
};
use app::App;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use storage::FileStorage;
use tracing_subscriber::filter::LevelFilter;

/// Daily alphabet-clue word puzzle
#[derive(Parser)]
#[command(name = "alphaclue", version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    play: PlayArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Play a day's puzzle (default)
    Play(PlayArgs),
    /// Generate reveal mappings for a clue list and write the dated puzzle
    Author(AuthorArgs),
}

#[derive(Args)]
struct PlayArgs {
    /// Day to play, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<DayKey>,

    /// Directory containing puzzles/
    #[arg(long, env = "ALPHACLUE_PUZZLE_DIR", default_value = ".")]
    puzzle_dir: PathBuf,

    /// Where progress is stored
    #[arg(long, env = "ALPHACLUE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Starting level for a fresh session: easy, medium or advanced
    #[arg(long, default_value = "easy")]
    difficulty: Difficulty,

    /// Check letters as they are typed
    #[arg(long)]
    autocheck: bool,

    /// Write debug logs here (defaults to alphaclue.log in the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Args)]
struct AuthorArgs {
    /// Day the puzzle is published, YYYY-MM-DD
    #[arg(long)]
    date: DayKey,

    /// JSON file with the clue list (or a puzzle document to regenerate)
    #[arg(long)]
    clues: PathBuf,

    /// Directory containing puzzles/
    #[arg(long, env = "ALPHACLUE_PUZZLE_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Seed the generator for reproducible mappings
    #[arg(long)]
    seed: Option<u64>,

    /// Replace an existing puzzle for the day
    #[arg(long)]
    force: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Some(Command::Author(args)) => author(args),
        Some(Command::Play(args)) => play(args),
        None => play(cli.play),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_file_logging(path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match File::create(path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_max_level(LevelFilter::DEBUG)
                .try_init();
        }
        Err(e) => eprintln!("Cannot open log file {}: {}", path.display(), e),
    }
}

fn play(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = args.data_dir.unwrap_or_else(FileStorage::default_dir);
    let log_file = args.log_file.unwrap_or_else(|| data_dir.join("alphaclue.log"));
    init_file_logging(&log_file);

    let today = args.date.unwrap_or_else(DayKey::today);
    let mut generator = MappingGenerator::new();
    let puzzle = match puzzles::load_puzzle(&args.puzzle_dir, today, &mut generator) {
        Ok(puzzle) => puzzle,
        Err(Error::PuzzleNotFound(day)) => {
            log::warn!("no puzzle file for {}", day);
            return Err("Puzzle not found for today. Please check back later.".into());
        }
        Err(e) => return Err(e.into()),
    };

    let options = SessionOptions {
        difficulty: args.difficulty,
        autocheck: args.autocheck,
    };
    let storage = FileStorage::open(data_dir.join("progress.json"));
    log::info!("progress stored in {}", storage.path().display());
    let game = Game::start(puzzle, today, options, storage, SystemClock);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;

    let result = run_app(&mut stdout, App::new(game));

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, DisableFocusChange)?;

    result.map_err(Into::into)
}

fn run_app(stdout: &mut io::Stdout, mut app: App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.get_tick_rate();

        render::render(stdout, &app)?;
        stdout.flush()?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(100)))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }

                    match app.handle_key(key) {
                        app::AppAction::Continue => {}
                        app::AppAction::Quit => break,
                    }
                }
                Event::FocusGained => app.set_visible(true),
                Event::FocusLost => app.set_visible(false),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    // Final save with the clock stopped
    app.set_visible(false);
    Ok(())
}

fn author(args: AuthorArgs) -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(LevelFilter::INFO)
        .try_init();

    let clues = puzzles::read_clues(&args.clues)?;
    let mut generator = match args.seed {
        Some(seed) => MappingGenerator::with_seed(seed),
        None => MappingGenerator::new(),
    };
    let doc = author_document(clues, &mut generator)?;
    let path = puzzles::write_puzzle(&args.out_dir, args.date, &doc, args.force)?;

    println!("Puzzle #{} written to {}", args.date.puzzle_number(), path.display());
    for level in Difficulty::all_levels() {
        if let Some(mappings) = &doc.reveal_mappings {
            let mapping = mappings.get(*level);
            println!(
                "  {:<8} {} linked tiles in {} groups",
                level.label(),
                mapping.len(),
                mapping.groups().len()
            );
        }
    }
    Ok(())
}
