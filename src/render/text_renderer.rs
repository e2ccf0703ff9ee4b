use super::{RenderEvent, Renderer};
use crate::character::Stat;
use crate::session::{Outcome, Session};

use std::io::{self, Write};

const BAR_WIDTH: usize = 20;

/// ASCII renderer writing the map and stat panel to any writer
pub struct TextRenderer<W: Write> {
    out: W,
    show_stats: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, show_stats: bool) -> Self {
        Self { out, show_stats }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw_map(&mut self, session: &Session) -> io::Result<()> {
        let dungeon = session.dungeon();
        let player = session.character_tile();

        for (x, y, tile) in dungeon {
            let glyph = if player == Some((x, y)) { '@' } else { tile.to_char() };

            write!(self.out, "{}", glyph)?;

            if x + 1 == dungeon.width() {
                writeln!(self.out)?;
            }
        }

        Ok(())
    }

    fn draw_stats(&mut self, session: &Session) -> io::Result<()> {
        let character = session.character();
        let progression = character.progression();

        writeln!(
            self.out,
            "Strength: {}  |  Intelligence: {}  |  Dexterity: {}",
            character.stat(Stat::Strength),
            character.stat(Stat::Intelligence),
            character.stat(Stat::Dexterity),
        )?;
        writeln!(
            self.out,
            "Life: {}  |  Mana: {}  |  Depth: {}",
            character.life(),
            character.stat(Stat::Mana),
            session.depth(),
        )?;

        let filled = (progression.experience as usize * BAR_WIDTH)
            / progression.experience_required.max(1) as usize;
        let filled = filled.min(BAR_WIDTH);

        writeln!(
            self.out,
            "[{}{}] Level {} ({}/{})",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            progression.level,
            progression.experience,
            progression.experience_required,
        )
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    type Error = io::Error;

    fn initialize(&mut self, session: &Session) -> Result<(), Self::Error> {
        writeln!(
            self.out,
            "{} dungeon, seed {}",
            session.dungeon().dimensions(),
            session.seed()
        )
    }

    fn handle_event(&mut self, event: &RenderEvent) -> Result<(), Self::Error> {
        match event {
            RenderEvent::Command(Outcome::Won) => writeln!(self.out, "You found the exit!"),
            RenderEvent::Command(Outcome::Blocked) => writeln!(self.out, "Blocked."),
            RenderEvent::LeveledUp => writeln!(self.out, "Level up!"),
            RenderEvent::Defeated => writeln!(self.out, "Game Over"),
            _ => Ok(()),
        }
    }

    fn update(&mut self, session: &Session) -> Result<(), Self::Error> {
        self.draw_map(session)?;

        if self.show_stats {
            self.draw_stats(session)?;
        }

        self.out.flush()
    }

    fn finalize(&mut self, session: &Session) -> Result<(), Self::Error> {
        let character = session.character();

        writeln!(
            self.out,
            "Cleared {} mazes, reached level {}",
            session.depth(),
            character.level()
        )?;

        self.out.flush()
    }
}
