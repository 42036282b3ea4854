//! Command line interface
//!
//! [`Cli`] holds the parsed arguments and [`run`] drives one invocation:
//! load the dump, resolve and render every target, then print or page the
//! result. A target that fails is reported on stderr and skipped; the
//! returned flag tells the caller whether all of them succeeded.

use crate::layout::{JumpPalette, LayoutOptions};
use crate::target::{Dump, ResolveError};
use crate::ui::panes::source::{Highlighter, DEFAULT_SYNTAX_THEME};
use crate::ui::{page, print_lines, tree_lines, Display, DisplayError};
use anyhow::Context;
use clap::{ArgAction, Parser};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::text::Line;
use std::fmt;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use thiserror::Error;

/// Terminal size assumed when stdout is not a terminal
const FALLBACK_SIZE: (usize, usize) = (80, 20);

/// Rows kept free before output is paged
const PAGING_MARGIN: usize = 5;

/// Display the source and bytecode of functions side by side.
///
/// A class TARGET shows all of its methods; a module TARGET shows all of its
/// functions and classes. Targets are displayed in the order given.
#[derive(Parser, Debug)]
#[command(name = "disview", version, about, long_about = None)]
pub struct Cli {
    /// Dotted paths of functions, classes or modules
    #[arg(required = true, value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Disassembly dump to read, `-` for stdin
    #[arg(
        short = 'd',
        long = "dump",
        env = "DISVIEW_DUMP",
        default_value = "dis.json"
    )]
    pub dump: PathBuf,

    /// Syntax highlighting theme
    #[arg(long, env = "DISVIEW_THEME", default_value = DEFAULT_SYNTAX_THEME)]
    pub theme: String,

    /// Always show output in the pager
    #[arg(short = 'p', long = "paging", alias = "pager", overrides_with = "no_paging")]
    pub paging: bool,

    /// Never show output in the pager
    #[arg(
        short = 'P',
        long = "no-paging",
        alias = "no-pager",
        overrides_with = "paging"
    )]
    pub no_paging: bool,

    /// Share of the width given to the source pane
    #[arg(long, default_value_t = 0.5, value_parser = parse_ratio)]
    pub ratio: f64,

    /// Terminal width to lay out for, instead of the detected one
    #[arg(long, value_name = "COLS")]
    pub width: Option<usize>,

    /// Seed for jump colors, for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the module/class/function tree of each target instead
    #[arg(long)]
    pub tree: bool,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// `Some` when paging was forced on or off, `None` to decide by height
    pub fn paging(&self) -> Option<bool> {
        if self.paging {
            Some(true)
        } else if self.no_paging {
            Some(false)
        } else {
            None
        }
    }
}

fn parse_ratio(value: &str) -> Result<f64, String> {
    let ratio: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(format!("ratio must be between 0 and 1, got {}", ratio))
    }
}

/// Why a single target produced no output
#[derive(Debug, Error)]
pub enum TargetError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("cannot display {path}: {source}")]
    Display {
        path: String,
        #[source]
        source: DisplayError,
    },
}

/// Print `error: ...` on stderr, in red when stderr is a terminal
pub fn report_error(err: impl fmt::Display) {
    if io::stderr().is_terminal() {
        eprintln!("\x1b[1;31merror:\x1b[m {err}");
    } else {
        eprintln!("error: {err}");
    }
}

fn terminal_size(is_terminal: bool) -> (usize, usize) {
    if !is_terminal {
        return FALLBACK_SIZE;
    }
    match crossterm::terminal::size() {
        Ok((cols, rows)) => (cols as usize, rows as usize),
        Err(err) => {
            warn!("cannot read terminal size: {}", err);
            FALLBACK_SIZE
        }
    }
}

/// Resolve, expand and render one target
fn render_target<R: Rng + ?Sized>(
    dump: &Dump,
    path: &str,
    options: &LayoutOptions,
    palette: &JumpPalette,
    highlighter: &Highlighter,
    rng: &mut R,
) -> Result<Vec<Display>, TargetError> {
    let target = dump.resolve(path)?;
    let functions = dump.expand(target, rng)?;
    info!("{} expands to {} function(s)", path, functions.len());

    let mut displays = Vec::with_capacity(functions.len());
    for target in &functions {
        let Some(function) = target.function() else {
            continue;
        };
        let file = dump.module_file(&function.module);
        let display = Display::render(function, file, options, palette, highlighter, rng)
            .map_err(|source| TargetError::Display {
                path: target.path.clone(),
                source,
            })?;
        displays.push(display);
    }
    Ok(displays)
}

/// Run one invocation; `Ok(false)` when any target failed
pub fn run(cli: &Cli) -> anyhow::Result<bool> {
    let dump = Dump::load(&cli.dump)?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let is_terminal = io::stdout().is_terminal();
    let (detected_width, rows) = terminal_size(is_terminal);
    let options = LayoutOptions {
        terminal_width: cli.width.unwrap_or(detected_width),
        ratio: cli.ratio,
        ..Default::default()
    };

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut height = 0;
    let mut all_ok = true;

    if cli.tree {
        for path in &cli.targets {
            match dump.resolve(path) {
                Ok(target) => {
                    let tree = tree_lines(&target);
                    height += tree.len();
                    lines.extend(tree);
                }
                Err(err) => {
                    report_error(&err);
                    all_ok = false;
                }
            }
        }
    } else {
        let highlighter = Highlighter::new(&cli.theme)?;
        let palette = JumpPalette::default();

        for path in &cli.targets {
            match render_target(&dump, path, &options, &palette, &highlighter, &mut rng) {
                Ok(displays) => {
                    for display in displays {
                        height += display.height;
                        lines.extend(display.lines);
                    }
                }
                Err(err) => {
                    report_error(&err);
                    all_ok = false;
                }
            }
        }
    }

    let paging = cli
        .paging()
        .unwrap_or(height > rows.saturating_sub(PAGING_MARGIN));
    if paging && is_terminal {
        info!("paging {} lines", lines.len());
        page(lines).context("pager failed")?;
    } else {
        print_lines(&mut io::stdout().lock(), &lines, is_terminal)
            .context("cannot write to stdout")?;
    }

    Ok(all_ok)
}
