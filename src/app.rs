use crate::character::CharacterState;
use crate::cli::AppConfig;
use crate::grid::Direction;
use crate::render::{RenderEvent, Renderer, TextRenderer};
use crate::session::{Outcome, Session};

use log::{debug, info, warn};
use std::io::{self, BufRead};
use std::str::FromStr;

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Click(usize, usize),
    Hit(i32),
    Tick,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let head = words.next().ok_or("empty command")?;

        let mut number = |name: &str| -> Result<String, String> {
            words.next().map(str::to_owned).ok_or(format!("missing {}", name))
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "w" | "up" => Command::Move(Direction::Up),
            "s" | "down" => Command::Move(Direction::Down),
            "a" | "left" => Command::Move(Direction::Left),
            "d" | "right" => Command::Move(Direction::Right),
            "click" | "c" => {
                let x = number("x")?;
                let y = number("y")?;

                Command::Click(
                    x.parse().map_err(|_| format!("invalid x: {}", x))?,
                    y.parse().map_err(|_| format!("invalid y: {}", y))?,
                )
            }
            "hit" => {
                let amount = number("amount")?;

                Command::Hit(amount.parse().map_err(|_| format!("invalid amount: {}", amount))?)
            }
            "tick" | "t" => Command::Tick,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {}", other)),
        };

        Ok(command)
    }
}

pub struct CrawlerApp {
    config: AppConfig,
}

impl CrawlerApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let stdin = io::stdin();
        let stdout = io::stdout();

        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Drives a session from line-based input until it ends or `quit`.
    pub fn run_with<R: BufRead, W: io::Write>(
        &self,
        input: R,
        output: W,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut session = Session::new(self.config.session.clone())?;
        let mut renderer = TextRenderer::new(output, self.config.renderer.show_stats);

        renderer.initialize(&session)?;
        renderer.handle_event(&RenderEvent::Started)?;
        renderer.update(&session)?;

        for line in input.lines() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    warn!("{}", e);
                    continue;
                }
            };

            debug!("{:?}", command);

            let level = session.character().level();
            let outcome = match command {
                Command::Quit => break,
                Command::Move(direction) => session.request_move(direction),
                Command::Click(x, y) => session.request_move_to(x, y),
                Command::Hit(amount) => {
                    session.apply_damage(amount);
                    Outcome::Ignored
                }
                Command::Tick => {
                    if session.tick() == CharacterState::Clamped {
                        debug!("Position restored inside its tile");
                    }
                    Outcome::Ignored
                }
            };

            renderer.handle_event(&RenderEvent::Command(outcome))?;

            if session.character().level() > level {
                renderer.handle_event(&RenderEvent::LeveledUp)?;
            }

            renderer.update(&session)?;

            if session.is_defeated() {
                renderer.handle_event(&RenderEvent::Defeated)?;
                break;
            }

            if renderer.should_quit() {
                break;
            }
        }

        renderer.handle_event(&RenderEvent::Completed)?;
        renderer.finalize(&session)?;

        info!(
            "Run finished at depth {} (seed {})",
            session.depth(),
            session.seed()
        );

        Ok(())
    }
}
