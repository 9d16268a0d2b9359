//! Minimum-cost seam search across an overlap cost map
//!
//! The seam is an 8-connected path from one edge of the map to the opposite
//! edge. Search is A*: every cell of the start edge is seeded with zero
//! accumulated cost, the heuristic is the number of cells left along the
//! travel axis, and the open set is a binary heap ordered by score with the
//! linear cell index as tie-break so the returned path is reproducible for a
//! fixed map.

use crate::quilting::cost::CostMap;
use crate::spatial::Point;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Ordered cells from the seed edge to the goal edge
pub type SeamPath = Vec<Point>;

/// Direction in which a seam crosses its cost map
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// From the top row to the bottom row; separates left from right
    TopToBottom,
    /// From the left column to the right column; separates top from bottom
    LeftToRight,
}

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

#[derive(Clone, Copy, Debug)]
struct Node {
    parent: Option<usize>,
    accumulated: f64,
    score: f64,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            parent: None,
            accumulated: f64::INFINITY,
            score: f64::INFINITY,
        }
    }
}

/// Heap entry; reversed ordering turns the max-heap into a min-heap on
/// `(score, index)`
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    score: f64,
    index: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

/// Grid bookkeeping for one search
struct SeamSearch<'a> {
    costs: &'a CostMap,
    traversal: Traversal,
    width: usize,
    height: usize,
    nodes: Vec<Node>,
    open: BinaryHeap<OpenEntry>,
}

impl<'a> SeamSearch<'a> {
    fn new(costs: &'a CostMap, traversal: Traversal) -> Self {
        let (width, height) = (costs.width(), costs.height());
        Self {
            costs,
            traversal,
            width,
            height,
            nodes: vec![Node::default(); width * height],
            open: BinaryHeap::new(),
        }
    }

    const fn heuristic(&self, x: usize, y: usize) -> f64 {
        match self.traversal {
            Traversal::TopToBottom => (self.height - 1 - y) as f64,
            Traversal::LeftToRight => (self.width - 1 - x) as f64,
        }
    }

    const fn is_goal(&self, x: usize, y: usize) -> bool {
        match self.traversal {
            Traversal::TopToBottom => y == self.height - 1,
            Traversal::LeftToRight => x == self.width - 1,
        }
    }

    fn cost(&self, x: usize, y: usize) -> f64 {
        f64::from(self.costs.get(x, y).unwrap_or(f32::INFINITY))
    }

    const fn position(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    fn open_cell(&mut self, x: usize, y: usize, parent: Option<usize>, accumulated: f64) {
        let index = y * self.width + x;
        let score = accumulated + self.heuristic(x, y);
        if let Some(node) = self.nodes.get_mut(index) {
            *node = Node {
                parent,
                accumulated,
                score,
            };
            self.open.push(OpenEntry { score, index });
        }
    }

    fn seed(&mut self) {
        let seeds = match self.traversal {
            Traversal::TopToBottom => self.width,
            Traversal::LeftToRight => self.height,
        };
        for i in 0..seeds {
            let (x, y) = match self.traversal {
                Traversal::TopToBottom => (i, 0),
                Traversal::LeftToRight => (0, i),
            };
            self.open_cell(x, y, None, 0.0);
        }
    }

    fn run(mut self) -> SeamPath {
        self.seed();

        while let Some(entry) = self.open.pop() {
            let Some(current) = self.nodes.get(entry.index).copied() else {
                continue;
            };
            // Superseded by a cheaper route pushed later
            if current.score.to_bits() != entry.score.to_bits() {
                continue;
            }

            let (x, y) = self.position(entry.index);
            if self.is_goal(x, y) {
                return self.reconstruct(entry.index);
            }

            for (dx, dy) in NEIGHBOURS {
                let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                else {
                    continue;
                };
                if nx >= self.width || ny >= self.height {
                    continue;
                }

                let tentative = current.accumulated + self.cost(nx, ny);
                let known = self
                    .nodes
                    .get(ny * self.width + nx)
                    .map_or(f64::INFINITY, |node| node.accumulated);
                if tentative < known {
                    self.open_cell(nx, ny, Some(entry.index), tentative);
                }
            }
        }

        SeamPath::new()
    }

    fn reconstruct(&self, goal: usize) -> SeamPath {
        let mut path = SeamPath::new();
        let mut cursor = Some(goal);
        // Parent links form a tree for non-negative costs; the bound guards maps that break that
        while let Some(index) = cursor {
            if path.len() >= self.nodes.len() {
                break;
            }
            let (x, y) = self.position(index);
            path.push(Point::new(x as u32, y as u32));
            cursor = self.nodes.get(index).and_then(|node| node.parent);
        }
        path.reverse();
        path
    }
}

/// Find the cheapest path crossing `costs` in the given direction
///
/// Returns cells ordered from the seed edge to the goal edge, or an empty
/// path for an empty map or one with no finite route.
pub fn find_seam(costs: &CostMap, traversal: Traversal) -> SeamPath {
    if costs.is_empty() {
        return SeamPath::new();
    }
    SeamSearch::new(costs, traversal).run()
}

/// Accumulated cost of a seam as the search measures it
///
/// The seed cell is free, so this is the sum over every cell after the first.
pub fn path_cost(costs: &CostMap, path: &[Point]) -> f64 {
    path.iter()
        .skip(1)
        .filter_map(|p| costs.get(p.x as usize, p.y as usize))
        .map(f64::from)
        .sum()
}
