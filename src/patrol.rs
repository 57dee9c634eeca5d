use std::{collections::HashSet, fmt::Display};

use tracing::{debug, trace};

use crate::Laboratory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "^"),
            Direction::Right => write!(f, ">"),
            Direction::Down => write!(f, "v"),
            Direction::Left => write!(f, "<"),
        }
    }
}

impl Direction {
    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '^' => Some(Direction::Up),
            '>' => Some(Direction::Right),
            'v' => Some(Direction::Down),
            '<' => Some(Direction::Left),
            _ => None,
        }
    }

    pub fn turn_right(&self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    r: usize,
    c: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

impl Position {
    pub fn new(r: usize, c: usize) -> Self {
        Self { r, c }
    }

    pub fn r(&self) -> usize {
        self.r
    }

    pub fn c(&self) -> usize {
        self.c
    }

    // None means the step crosses row 0 or column 0.
    pub fn along(&self, dir: Direction) -> Option<Position> {
        match dir {
            Direction::Up if self.r > 0 => Some(Self::new(self.r - 1, self.c)),
            Direction::Right => Some(Self::new(self.r, self.c + 1)),
            Direction::Down => Some(Self::new(self.r + 1, self.c)),
            Direction::Left if self.c > 0 => Some(Self::new(self.r, self.c - 1)),
            _ => None,
        }
    }
}

/// Position and facing of the guard. Also the key of the visited set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Guard {
    pos: Position,
    dir: Direction,
}

impl Display for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.dir, self.pos)
    }
}

impl Guard {
    pub fn new(pos: &Position, dir: Direction) -> Self {
        Self {
            pos: pos.clone(),
            dir,
        }
    }

    pub fn pos(&self) -> &Position {
        &self.pos
    }

    pub fn dir(&self) -> Direction {
        self.dir
    }

    pub fn ahead_pos(&self) -> Option<Position> {
        self.pos.along(self.dir)
    }

    pub fn turn_right(&mut self) {
        self.dir = self.dir.turn_right();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolEnd {
    Exit,
    Loop,
}

/// Outcome of one patrol run.
#[derive(Debug)]
pub struct Patrol {
    end: PatrolEnd,
    steps: usize,
    visited: HashSet<Guard>,
}

impl Patrol {
    pub fn end(&self) -> PatrolEnd {
        self.end
    }

    /// Number of moves and turns done before the run ended.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// States recorded after each move or turn. The start state is only in
    /// here if the guard came back to it.
    pub fn visited(&self) -> &HashSet<Guard> {
        &self.visited
    }
}

/// Walks the guard until it leaves the laboratory or repeats a state.
///
/// The guard turns right in place whenever the cell ahead is a wall or the
/// optional `obstruction`, otherwise it steps forward. Every move or turn
/// records the new state; recording a state seen before ends the run as a
/// loop. The bounds check comes before each move or turn, so stepping off
/// the map ends the run as an exit.
pub fn patrol(lab: &Laboratory, guard: &Guard, obstruction: Option<&Position>) -> Patrol {
    let mut cur_guard = guard.clone();
    let mut visited = HashSet::new();
    let mut steps = 0;
    while lab.is_inside(cur_guard.pos()) {
        match cur_guard.ahead_pos() {
            Some(ahead_pos) if lab.is_blocked(&ahead_pos, obstruction) => cur_guard.turn_right(),
            Some(ahead_pos) => cur_guard.pos = ahead_pos,
            None => break,
        }
        steps += 1;

        if !visited.insert(cur_guard.clone()) {
            return Patrol {
                end: PatrolEnd::Loop,
                steps,
                visited,
            };
        }
    }

    Patrol {
        end: PatrolEnd::Exit,
        steps,
        visited,
    }
}

/// Returns true if the guard, starting at `start` facing `dir`, patrols forever.
pub fn simulate(
    lab: &Laboratory,
    start: &Position,
    dir: Direction,
    obstruction: Option<&Position>,
) -> bool {
    patrol(lab, &Guard::new(start, dir), obstruction).end() == PatrolEnd::Loop
}

/// Distinct cells the guard stands on, start included, without any obstruction.
pub fn patrol_positions(lab: &Laboratory, guard: &Guard) -> HashSet<Position> {
    let mut positions = patrol(lab, guard, None)
        .visited()
        .iter()
        .map(|g| g.pos())
        .filter(|pos| lab.is_inside(pos))
        .cloned()
        .collect::<HashSet<_>>();
    positions.insert(guard.pos().clone());

    positions
}

/// Every empty cell, except the start, where one extra obstruction makes the guard loop.
pub fn find_possible_obstructions(
    lab: &Laboratory,
    start: &Position,
    dir: Direction,
) -> HashSet<Position> {
    let candidates = lab
        .empty_positions()
        .filter(|pos| pos != start)
        .collect::<Vec<_>>();
    debug!(candidates = candidates.len(), "Searching obstruction positions");

    let loop_positions = candidates
        .into_iter()
        .filter(|pos| {
            let is_loop = simulate(lab, start, dir, Some(pos));
            if is_loop {
                trace!(obstruction = %pos, "Obstruction makes guard loop");
            }
            is_loop
        })
        .collect::<HashSet<_>>();
    debug!(found = loop_positions.len(), "Obstruction search done");

    loop_positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_lab;

    const SAMPLE: &str = "\
....#.....
.........#
..........
..#.......
.......#..
..........
.#..^.....
........#.
#.........
......#...
";

    #[test]
    fn turn_right_is_clockwise() {
        let mut dir = Direction::Up;
        let mut seen = Vec::new();
        for _ in 0..4 {
            dir = dir.turn_right();
            seen.push(dir);
        }
        assert_eq!(
            seen,
            [
                Direction::Right,
                Direction::Down,
                Direction::Left,
                Direction::Up
            ]
        );
    }

    #[test]
    fn along_stops_at_zero_edges() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.along(Direction::Up), None);
        assert_eq!(origin.along(Direction::Left), None);
        assert_eq!(origin.along(Direction::Down), Some(Position::new(1, 0)));
        assert_eq!(origin.along(Direction::Right), Some(Position::new(0, 1)));
    }

    #[test]
    fn corridor_walks_off_the_map() {
        let (lab, guard) = parse_lab(">....\n").unwrap();
        let run = patrol(&lab, &guard, None);
        assert_eq!(run.end(), PatrolEnd::Exit);
        assert_eq!(run.steps(), 5);
        assert!(!simulate(&lab, guard.pos(), Direction::Up, None));
        assert!(!simulate(&lab, guard.pos(), Direction::Left, None));
    }

    #[test]
    fn racetrack_loops() {
        let (lab, guard) = parse_lab(".#..\n.^.#\n#...\n..#.\n").unwrap();
        assert!(simulate(&lab, guard.pos(), guard.dir(), None));
    }

    #[test]
    fn boxed_in_guard_loops_by_turning() {
        let (lab, guard) = parse_lab(".#.\n#^#\n.#.\n").unwrap();
        let run = patrol(&lab, &guard, None);
        assert_eq!(run.end(), PatrolEnd::Loop);
        assert_eq!(run.steps(), 5);
        assert!(run.visited().iter().all(|g| g.pos() == guard.pos()));
    }

    #[test]
    fn obstruction_closes_a_loop() {
        let (lab, guard) = parse_lab(".#..\n.^.#\n....\n..#.\n").unwrap();
        assert!(!simulate(&lab, guard.pos(), guard.dir(), None));
        let obs = Position::new(2, 0);
        assert!(simulate(&lab, guard.pos(), guard.dir(), Some(&obs)));
        assert_eq!(lab.tile(&obs), Some(crate::Tile::Empty));
    }

    #[test]
    fn sample_patrol_positions() {
        let (lab, guard) = parse_lab(SAMPLE).unwrap();
        assert_eq!(patrol_positions(&lab, &guard).len(), 41);
    }

    #[test]
    fn sample_obstructions() {
        let (lab, guard) = parse_lab(SAMPLE).unwrap();
        let found = find_possible_obstructions(&lab, guard.pos(), guard.dir());
        let expect = [(6, 3), (7, 6), (7, 7), (8, 1), (8, 3), (9, 7)]
            .into_iter()
            .map(|(r, c)| Position::new(r, c))
            .collect::<HashSet<_>>();
        assert_eq!(found, expect);
        assert!(!found.contains(guard.pos()));
    }

    #[test]
    fn start_cell_is_never_a_candidate() {
        let (lab, guard) = parse_lab(".#.\n>.#\n.#.\n").unwrap();
        assert!(!simulate(&lab, guard.pos(), guard.dir(), None));
        // A wall on the start would trap the guard once it stepped away.
        assert!(simulate(&lab, guard.pos(), guard.dir(), Some(guard.pos())));
        let found = find_possible_obstructions(&lab, guard.pos(), guard.dir());
        assert!(!found.contains(guard.pos()));
    }
}
