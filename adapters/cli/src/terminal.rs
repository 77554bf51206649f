//! Line-oriented terminal backend.

use std::{
    fmt::Write as _,
    io::{self, BufRead, Write},
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result as AnyResult};
use hellas_quest_core::{CategoryFilter, Character, Difficulty, Phase};
use hellas_quest_rendering::{
    power_up_label, FrameInput, HudText, Presentation, RenderingBackend, Scene, Tone,
};

use crate::input::{parse_line, Parsed};

const POWER_UP_KEYS: [&str; 4] = ["h", "s", "t", "d"];

/// Lines typed by the player, or the error that stopped reading.
pub(crate) type InputLines = Receiver<io::Result<String>>;

/// Reads lines from `reader` on a background thread.
///
/// The channel disconnects at end of input or after the first read error.
pub(crate) fn spawn_line_reader<R>(reader: R) -> InputLines
where
    R: BufRead + Send + 'static,
{
    let (sender, lines) = mpsc::channel();
    let _ = thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if sender.send(line).is_err() || failed {
                break;
            }
        }
    });
    lines
}

/// Renders scenes as text and reads one command per line.
///
/// The scene is updated every poll interval whether or not a line arrived, so
/// countdowns, feedback pauses and cooldowns run in wall-clock time. A frame is
/// printed again only when its text changed.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W> {
    lines: InputLines,
    output: W,
    poll_interval: Duration,
}

impl<W> TerminalBackend<W> {
    pub(crate) const fn new(lines: InputLines, output: W) -> Self {
        Self {
            lines,
            output,
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation { title, mut scene } = presentation;
        writeln!(self.output, "{title}")?;

        let mut last_frame = Instant::now();
        let mut shown = String::new();
        loop {
            let frame = render(&scene);
            if frame != shown {
                write!(self.output, "{frame}")?;
                self.output.flush()?;
                shown = frame;
            }

            let mut input = FrameInput::default();
            match self.lines.recv_timeout(self.poll_interval) {
                Ok(line) => {
                    let line = line.context("failed to read player input")?;
                    match parse_line(&line, scene.hud.phase) {
                        Parsed::Action(action) => input.actions.push(action),
                        Parsed::Exit => input.exit_requested = true,
                        Parsed::Idle => {}
                        Parsed::Unknown => {
                            writeln!(self.output, "Unknown command: {}", line.trim())?;
                            shown.clear();
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => input.exit_requested = true,
            }

            let exit = input.exit_requested;
            update_scene(elapsed(&mut last_frame), input, &mut scene);
            if exit {
                if let Some(summary) = scene.game_over {
                    writeln!(
                        self.output,
                        "Final score: {} (level {}). High score: {}.",
                        summary.score, summary.level, summary.high_score
                    )?;
                }
                writeln!(self.output, "Farewell, traveller.")?;
                return Ok(());
            }
        }
    }
}

fn elapsed(last_frame: &mut Instant) -> Duration {
    let now = Instant::now();
    let dt = now.duration_since(*last_frame);
    *last_frame = now;
    dt
}

/// Formats `scene` as the text printed for the current phase.
pub(crate) fn render(scene: &Scene) -> String {
    let mut out = String::new();
    for popup in &scene.popups {
        let _ = writeln!(
            out,
            "{} Achievement unlocked: {} - {}",
            popup.icon, popup.title, popup.description
        );
    }

    match scene.hud.phase {
        Phase::DifficultySelect => {
            if scene.hud.high_score > 0 {
                let _ = write!(out, "\nHigh Score: {}", scene.hud.high_score);
            }
            out.push_str("\nChoose your difficulty:\n");
            for (index, difficulty) in Difficulty::ALL.iter().enumerate() {
                let _ = writeln!(out, "  {}) {}", index + 1, difficulty.label());
            }
        }
        Phase::CategorySelect => {
            out.push_str("\nChoose a period of Greek history:\n");
            for (index, category) in CategoryFilter::ALL.iter().enumerate() {
                let _ = writeln!(out, "  {}) {}", index + 1, category.label());
            }
        }
        Phase::CharacterSelect => {
            out.push_str("\nChoose your hero:\n");
            for (index, character) in Character::ALL.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {}) {} - {}: {}",
                    index + 1,
                    character.name(),
                    character.ability(),
                    character.description()
                );
            }
        }
        Phase::Intro => {
            if let Some(intro) = &scene.intro {
                let _ = writeln!(out, "\n{}\n{}", intro.storyline, intro.ability);
            }
            out.push_str("Press enter to begin your quest.\n");
        }
        Phase::QuestionActive | Phase::Feedback => render_quest(scene, &mut out),
        Phase::GameOver => {
            for message in &scene.feedback {
                let _ = writeln!(out, "{}", message.text);
            }
            if let Some(summary) = scene.game_over {
                let _ = writeln!(
                    out,
                    "\nGame Over! Score: {}  Level: {}  High score: {}",
                    summary.score, summary.level, summary.high_score
                );
            }
            out.push_str("Type 'again' to play again or 'exit' to leave.\n");
        }
    }
    out.push_str("> ");
    out
}

fn render_quest(scene: &Scene, out: &mut String) {
    let hud = HudText::from_snapshot(&scene.hud);
    let warning = if scene.hud.low_time { " (hurry!)" } else { "" };
    let _ = writeln!(
        out,
        "\n{} | {} | {} | {} [{}] | {}{}",
        hud.score, hud.lives, hud.streak, hud.level, hud.progress, hud.time, warning
    );

    if let Some(question) = &scene.question {
        let _ = writeln!(out, "[{}] {}", question.period.display_name(), question.text);
        for (index, option) in question.options.iter().enumerate() {
            let marker = match scene.reveal {
                Some(reveal) if reveal.correct == index => " ✔",
                Some(reveal) if reveal.selected == Some(index) => " ✘",
                _ if option.disabled => " (struck)",
                _ => "",
            };
            let _ = writeln!(out, "  {}) {}{}", index + 1, option.text, marker);
        }
    }

    let buttons: Vec<String> = scene
        .power_ups
        .iter()
        .zip(POWER_UP_KEYS)
        .map(|(button, key)| format!("{key}) {}", power_up_label(button)))
        .collect();
    let _ = writeln!(out, "Power-ups: {}", buttons.join("  "));

    for message in &scene.feedback {
        let prefix = match message.tone {
            Tone::Success => "+",
            Tone::Error => "!",
        };
        let _ = writeln!(out, "{prefix} {}", message.text);
    }
    if scene.hud.phase == Phase::QuestionActive {
        out.push_str("Answer with 1-4, use a power-up, or type 'quit'.\n");
    }
}
