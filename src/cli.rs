use crate::config::{ConfigError, ExitPolicy, SessionConfig};
use crate::grid::Size;
use std::path::PathBuf;
use structopt::clap::Shell;
use structopt::StructOpt;
use structopt_flags::QuietVerbose;

#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub show_stats: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub renderer: RendererConfig,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "Maze Crawler",
    about = "Walk procedurally carved mazes from the terminal"
)]
pub struct Opt {
    #[structopt(flatten)]
    pub verbose: QuietVerbose,

    #[structopt(
        parse(from_os_str),
        short,
        long,
        help = "JSON session config; flags below override it"
    )]
    config: Option<PathBuf>,

    #[structopt(parse(try_from_str), short, long, help = "Dungeon size in tiles, e.g. 20x15")]
    size: Option<Size>,

    #[structopt(long, help = "World units per tile")]
    tile_size: Option<f32>,

    #[structopt(parse(try_from_str), long, help = "Random seed")]
    seed: Option<u64>,

    #[structopt(
        long,
        possible_values = &["mirrored", "corner-then-interior"],
        help = "Exit placement after a cleared maze"
    )]
    exit_policy: Option<ExitPolicy>,

    #[structopt(long, help = "Hide the stat panel under the map")]
    no_stats: bool,

    #[structopt(long, possible_values = &Shell::variants(), case_insensitive = true, help = "Generate shell completions and exit")]
    pub completions: Option<Shell>,
}

impl Opt {
    pub fn to_app_config(self) -> Result<AppConfig, ConfigError> {
        let mut session = match &self.config {
            Some(path) => SessionConfig::from_file(path)?,
            None => SessionConfig::default(),
        };

        if let Some(size) = self.size {
            session.size = size;
        }
        if let Some(tile_size) = self.tile_size {
            session.tile_size = tile_size;
        }
        if self.seed.is_some() {
            session.seed = self.seed;
        }
        if let Some(exit_policy) = self.exit_policy {
            session.exit_policy = exit_policy;
        }

        session.validate()?;

        Ok(AppConfig {
            session,
            renderer: RendererConfig {
                show_stats: !self.no_stats,
            },
        })
    }
}
