use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use orhun_core::core::engine::{CellMark, WordView};
use orhun_core::learning::MasteryStatus;
use orhun_core::{Direction, DrillConfig, DrillEngine, DrillEvent, DrillState, Token};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ORHUN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config();
    info!(data_dir = %config.resolved_data_dir().display(), "opening progress store");
    let mut engine = DrillEngine::open(config);
    engine.start();

    let mut feedback: Vec<String> = Vec::new();
    loop {
        describe_events(&mut engine, &mut feedback);
        render(&engine, &feedback)?;
        feedback.clear();

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();

        match cmd {
            "exit" => break,
            ":stats" => feedback.extend(stats_lines(&engine)),
            ":code" => match engine.export_progress_code() {
                Ok(code) => feedback.push(format!("Progress code: {}", code)),
                Err(e) => feedback.push(format!("Could not export progress: {}", e)),
            },
            ":reset" => {
                engine.reset_progress();
                engine.start();
            }
            s if s.starts_with(":import ") => {
                if let Err(e) = engine.import_progress_code(&s[":import ".len()..]) {
                    feedback.push(format!("Could not import code: {}", e));
                }
            }
            s if s.starts_with(":set ") => feedback.push(apply_setting(&mut engine, &s[":set ".len()..])),
            s if s.starts_with(':') && s.len() > 1 => {
                // Select an option by number: :1, :2 ...
                match s[1..].parse::<usize>() {
                    Ok(n) if n > 0 && n <= engine.current_options().len() => {
                        let token = engine.current_options()[n - 1];
                        feedback.extend(submit(&mut engine, token));
                    }
                    _ => feedback.push(format!("Unknown command '{}'", s)),
                }
            }
            s => {
                for key in s.chars().filter(|c| !c.is_whitespace()) {
                    match engine.resolve_key(key) {
                        Some(token) => feedback.extend(submit(&mut engine, token)),
                        None => feedback.push(format!("'{}' is not one of the options", key)),
                    }
                    if !matches!(engine.state(), DrillState::AwaitingLetter { .. }) {
                        break;
                    }
                }
            }
        }

        show_feedback(&mut engine, &mut feedback)?;
        wait_for_scheduled(&mut engine, &mut feedback)?;
    }

    if let Err(e) = engine.save_progress() {
        eprintln!("[ERROR] Could not save progress: {}", e);
    } else {
        println!("Progress saved.");
    }
    Ok(())
}

fn load_config() -> DrillConfig {
    let Some(path) = std::env::var_os("ORHUN_CONFIG").map(PathBuf::from) else {
        return DrillConfig::default();
    };
    match DrillConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config");
            DrillConfig::default()
        }
    }
}

fn submit(engine: &mut DrillEngine, token: Token) -> Vec<String> {
    match engine.submit_answer(token) {
        Ok(_) => Vec::new(),
        Err(e) => vec![e.to_string()],
    }
}

/// Renders pending events and holds them on screen for their configured
/// pause. Feedback without a pause is left for the next prompt.
fn show_feedback(engine: &mut DrillEngine, feedback: &mut Vec<String>) -> CliResult<()> {
    let pause = describe_events(engine, feedback);
    if pause > 0 {
        render(engine, feedback)?;
        feedback.clear();
        thread::sleep(Duration::from_millis(pause));
    }
    Ok(())
}

/// Sleeps through the word and level transitions.
fn wait_for_scheduled(engine: &mut DrillEngine, feedback: &mut Vec<String>) -> CliResult<()> {
    let mut advanced = false;
    while let Some(delay) = engine.next_due_in() {
        let pause = describe_events(engine, feedback);
        render(engine, feedback)?;
        feedback.clear();
        thread::sleep(Duration::from_millis(delay.max(pause)));
        engine.tick(delay);
        advanced = true;
    }
    if advanced {
        show_feedback(engine, feedback)?;
    }
    Ok(())
}

fn apply_setting(engine: &mut DrillEngine, args: &str) -> String {
    let mut parts = args.split_whitespace();
    let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
        return "Usage: :set <soundEnabled|hintsEnabled|alphabetBarEnabled> on|off".to_string();
    };
    let value = match value {
        "on" | "true" => true,
        "off" | "false" => false,
        other => return format!("Expected on or off, got '{}'", other),
    };
    match engine.set_setting_by_name(name, value) {
        Ok(()) => format!("{} is now {}", name, if value { "on" } else { "off" }),
        Err(e) => e.to_string(),
    }
}

/// Appends a line per notable event and returns the longest pause they ask for.
fn describe_events(engine: &mut DrillEngine, lines: &mut Vec<String>) -> u64 {
    let timing = engine.config().timing;
    let mut pause = 0;
    for event in engine.drain_events() {
        pause = pause.max(timing.pause_after(&event));
        match event {
            DrillEvent::LevelStarted { level, is_level_up: true } => {
                lines.push(format!("Level up! Welcome to level {}.", level))
            }
            DrillEvent::CorrectAnswer { glyph } => lines.push(format!("Correct: {}", glyph)),
            DrillEvent::WrongAnswer { glyph } => lines.push(format!("Wrong, the answer was {}", glyph)),
            DrillEvent::WordComplete => lines.push("Word complete!".to_string()),
            DrillEvent::LevelComplete { bonus_sentence } => {
                lines.push("Level complete!".to_string());
                if let Some(bonus) = bonus_sentence {
                    lines.push(format!("Bonus: {}  {}  ({})", bonus.script, bonus.latin, bonus.meaning));
                }
            }
            DrillEvent::CourseComplete => lines.push("You have finished every level.".to_string()),
            DrillEvent::ProgressReset => lines.push("Progress reset.".to_string()),
            _ => {}
        }
    }
    pause
}

fn stats_lines(engine: &DrillEngine) -> Vec<String> {
    let mut lines = vec!["Letter statistics:".to_string()];
    for row in engine.mastery().report(engine.curriculum()) {
        let status = match row.status {
            MasteryStatus::NotIntroduced => "not introduced",
            MasteryStatus::Learning => "learning",
            MasteryStatus::Mastered => "mastered",
        };
        lines.push(format!("  {} {:<6} {:>3}%  {}", row.glyph, row.latin, row.accuracy, status));
    }
    lines
}

fn render(engine: &DrillEngine, feedback: &[String]) -> CliResult<()> {
    let mut out = stdout();
    execute!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    println!("Orhun Script Trainer. Type letters to answer, ':N' to pick an option, 'exit' to save and quit.");
    println!("Commands: :stats  :code  :import <code>  :reset  :set <name> on|off");
    println!("---------------------------------------------------------------");

    let session = engine.session();
    if let Some(level) = engine.curriculum().level_info(session.current_level) {
        let (done, total) = engine.level_progress();
        println!("Level {}: {} ({}/{} words)", level.number, level.name, done, total);
        println!("{}", level.description);
        if let Some(note) = &level.grammar_note {
            println!("Grammar: {}", note);
        }
    }

    if let Some(view) = engine.word_view() {
        print_word(&view)?;
        if let Some(word) = engine.current_word() {
            if let (Some(root), Some(suffix)) = (&word.root, &word.suffix) {
                println!("Morphology: {} {}", root, suffix);
            }
        }
        let options: Vec<String> = engine
            .current_options()
            .iter()
            .enumerate()
            .map(|(i, token)| format!(":{} {}", i + 1, token))
            .collect();
        println!("\nOptions: {}", options.join("   "));
    }

    if let Some((glyph, text)) = engine.hint() {
        println!("Hint for {}: {}", glyph, text);
    }

    let bar = engine.alphabet_bar();
    if bar.visible {
        println!();
        for item in &bar.items {
            let color = if item.current {
                Color::Yellow
            } else if item.learned {
                Color::Green
            } else {
                Color::DarkGrey
            };
            execute!(out, SetForegroundColor(color), Print(format!("{} ", item.glyph)), ResetColor)?;
        }
        println!();
    }

    println!();
    for line in feedback {
        println!("{}", line);
    }
    print!("\n> ");
    out.flush()?;
    Ok(())
}

fn print_word(view: &WordView) -> CliResult<()> {
    let mut out = stdout();
    let prompt = match view.direction {
        Direction::ScriptToLatin => "Write in Latin letters",
        Direction::LatinToScript => "Write in Orhun script",
    };
    println!("\n{}: \"{}\"", prompt, view.meaning);
    for row in [&view.question, &view.answer] {
        for cell in row {
            let color = match cell.mark {
                CellMark::Completed => Color::Green,
                CellMark::Active => Color::Yellow,
                CellMark::Pending => Color::Grey,
            };
            let text = cell.text.map(String::from).unwrap_or_else(|| "_".to_string());
            execute!(out, SetForegroundColor(color), Print(format!("{} ", text)), ResetColor)?;
        }
        println!();
    }
    Ok(())
}
