use std::{
    error,
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod patrol;

pub use patrol::{
    find_possible_obstructions, patrol, patrol_positions, simulate, Direction, Guard, Patrol,
    PatrolEnd, Position,
};

#[derive(Debug)]
pub enum Error {
    InconsistentRow(usize, usize),
    MultipleGuards(Guard, Guard),
    InvalidChar(char),
    NoGuard,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InconsistentRow(expect_col_n, real_col_n) => write!(
                f,
                "Expect {} columns in this row, given {}.",
                expect_col_n, real_col_n
            ),
            Error::MultipleGuards(guard0, guard1) => write!(
                f,
                "Found multiple guards({}, {}) in given laboratory, expect one only.",
                guard0, guard1
            ),
            Error::InvalidChar(c) => {
                write!(f, "Invalid character({}) in text of laboratory layout.", c)
            }
            Error::NoGuard => write!(f, "There's no guard in given laboratory, but expect one."),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    pub input_path: PathBuf,
}

/// Installs the stderr log subscriber, filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
}

/// Fixed layout of the laboratory. The guard is kept outside, see [`read_lab`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Laboratory {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: usize,
}

impl Laboratory {
    pub fn row_n(&self) -> usize {
        self.row_n
    }

    pub fn col_n(&self) -> usize {
        self.col_n
    }

    pub fn is_inside(&self, pos: &Position) -> bool {
        pos.r() < self.row_n && pos.c() < self.col_n
    }

    pub fn tile(&self, pos: &Position) -> Option<Tile> {
        if self.is_inside(pos) {
            self.tiles.get(pos.r() * self.col_n + pos.c()).copied()
        } else {
            None
        }
    }

    /// Walls and the extra obstruction block the guard, cells off the map never do.
    pub fn is_blocked(&self, pos: &Position, obstruction: Option<&Position>) -> bool {
        obstruction.is_some_and(|obs| obs == pos) || self.tile(pos) == Some(Tile::Wall)
    }

    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == Tile::Empty)
            .map(|(ind, _)| Position::new(ind / self.col_n, ind % self.col_n))
    }
}

struct LaboratoryBuilder {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: Option<usize>,
    guard: Option<Guard>,
}

impl LaboratoryBuilder {
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            row_n: 0,
            col_n: None,
            guard: None,
        }
    }

    pub fn add_row(&mut self, row_text: &str) -> Result<(), Error> {
        let this_col_n = row_text.chars().count();
        let expect_col_n = *self.col_n.get_or_insert(this_col_n);
        if expect_col_n != this_col_n {
            return Err(Error::InconsistentRow(expect_col_n, this_col_n));
        }

        for (ind, c) in row_text.chars().enumerate() {
            match c {
                '.' => self.tiles.push(Tile::Empty),
                '#' => self.tiles.push(Tile::Wall),
                other => {
                    let dir = Direction::from_glyph(other).ok_or(Error::InvalidChar(other))?;
                    let guard = Guard::new(&Position::new(self.row_n, ind), dir);
                    if let Some(last_guard) = self.guard.take() {
                        return Err(Error::MultipleGuards(last_guard, guard));
                    }

                    self.guard = Some(guard);
                    self.tiles.push(Tile::Empty);
                }
            }
        }
        self.row_n += 1;

        Ok(())
    }

    pub fn build(self) -> Result<(Laboratory, Guard), Error> {
        let guard = self.guard.ok_or(Error::NoGuard)?;
        let lab = Laboratory {
            tiles: self.tiles,
            row_n: self.row_n,
            col_n: self.col_n.unwrap_or(0),
        };
        debug!(rows = lab.row_n, cols = lab.col_n, guard = %guard, "Built laboratory");

        Ok((lab, guard))
    }
}

pub fn parse_lab(text: &str) -> Result<(Laboratory, Guard), Error> {
    let mut builder = LaboratoryBuilder::new();
    for line in text.lines().filter(|l| !l.is_empty()) {
        builder.add_row(line)?;
    }

    builder.build()
}

pub fn read_lab<P: AsRef<Path>>(path: P) -> Result<(Laboratory, Guard)> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open given file({}).", path.as_ref().display()))?;
    let reader = BufReader::new(file);
    let mut builder = LaboratoryBuilder::new();
    for (ind, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!(
                "Failed to read line {} from given file({}).",
                ind + 1,
                path.as_ref().display()
            )
        })?;
        if line.is_empty() {
            continue;
        }

        builder
            .add_row(line.as_str())
            .with_context(|| format!("Invalid layout in line {}.", ind + 1))?;
    }

    Ok(builder.build()?)
}
