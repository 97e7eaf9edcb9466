// Two-way min-cut hypergraph partitioning based on Fiduccia-Mattheyses:
// https://doi.org/10.1109/DAC.1982.1585498

mod balance;
mod bisection;
mod bucket;
mod error;
mod gain;
mod partition_util;
mod report;

pub use balance::BalanceBounds;
pub use bisection::{
    BisectionPartitioningConfig, InfeasibleMovePolicy, PartitionReport, PassOutcome, StopReason,
};
pub use bucket::GainBuckets;
pub use error::{ParseError, PartitionError};
pub use partition_util::InitialPartitioningMethod;
pub use report::{PartitionResult, Summary};

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One of the two partitions. `A` is partition 0 (`G1` in result files),
/// `B` is partition 1 (`G2`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Side {
    #[default]
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Cell {
    pub name: String,
    pub side: Side,
    /// Set once the cell has been moved in the current pass.
    pub locked: bool,
    pub gain: i32,
    /// Ids of the nets this cell is a pin of, in first-seen order.
    pub nets: Vec<u32>,
}

impl Cell {
    pub fn pin_count(&self) -> usize {
        self.nets.len()
    }
}

#[derive(Clone, Debug)]
pub struct Net {
    pub name: String,
    /// Distinct cell ids, in first-seen order.
    pub cells: Vec<u32>,
    /// How many of `cells` currently sit on each side.
    pub side_count: [u32; 2],
}

impl Net {
    pub fn is_cut(&self) -> bool {
        self.side_count[0] > 0 && self.side_count[1] > 0
    }
}

/// A netlist together with its current two-way partition.
///
/// Cells and nets live in dense arrays and refer to each other by index only.
/// The netlist itself is write-once; after construction only the partition
/// state (sides, locks, gains and the derived counters) changes.
#[derive(Clone, Debug)]
pub struct Hypergraph {
    cells: Vec<Cell>,
    nets: Vec<Net>,
    balance_factor: f64,
    cell_ids: HashMap<String, u32>,
    net_ids: HashMap<String, u32>,
    cut_size: u32,
    side_sizes: [u32; 2],
    max_pin_count: u32,
}

impl Hypergraph {
    pub fn new(balance_factor: f64) -> Self {
        Self {
            cells: vec![],
            nets: vec![],
            balance_factor,
            cell_ids: HashMap::new(),
            net_ids: HashMap::new(),
            cut_size: 0,
            side_sizes: [0, 0],
            max_pin_count: 0,
        }
    }

    /// Parses a netlist: a balance factor followed by `NET <name> <cell>... ;`
    /// records, all whitespace separated.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut tokens = text.split_ascii_whitespace().enumerate();

        let (_, factor) = tokens.next().ok_or(ParseError::MissingBalanceFactor)?;
        let balance_factor = factor
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidBalanceFactor {
                value: factor.to_string(),
            })?;
        if !(balance_factor > 0.0 && balance_factor <= 1.0) {
            return Err(ParseError::BalanceFactorOutOfRange {
                value: balance_factor,
            });
        }

        let mut graph = Hypergraph::new(balance_factor);
        while let Some((pos, token)) = tokens.next() {
            if token != "NET" {
                return Err(ParseError::UnexpectedToken {
                    token: pos,
                    expected: "NET",
                    found: token.to_string(),
                });
            }
            let net_name = match tokens.next() {
                Some((_, name)) if name != ";" => name,
                _ => return Err(ParseError::MissingNetName { token: pos }),
            };
            let net = graph.add_net(net_name);
            loop {
                match tokens.next() {
                    Some((_, ";")) => break,
                    Some((_, cell_name)) => {
                        graph.add_cell_to_net(net, cell_name);
                    }
                    None => {
                        return Err(ParseError::UnterminatedNet {
                            net: net_name.to_string(),
                        })
                    }
                }
            }
        }
        Ok(graph)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, PartitionError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::parse(&text)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("cannot open the input file {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("could not read netlist {}", path.display()))
    }

    /// Returns the id of the net with the given name, creating it on first sight.
    pub fn add_net(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.net_ids.get(name) {
            return id;
        }
        let id = self.nets.len() as u32;
        self.nets.push(Net {
            name: name.to_string(),
            cells: vec![],
            side_count: [0, 0],
        });
        self.net_ids.insert(name.to_string(), id);
        id
    }

    /// Connects the named cell to a net, creating the cell on first sight.
    /// A cell that is already a pin of the net is not added again.
    pub fn add_cell_to_net(&mut self, net: u32, cell_name: &str) -> u32 {
        let cell_id = match self.cell_ids.get(cell_name) {
            Some(&id) => id,
            None => {
                let id = self.cells.len() as u32;
                self.cells.push(Cell {
                    name: cell_name.to_string(),
                    side: Side::A,
                    locked: false,
                    gain: 0,
                    nets: vec![],
                });
                self.cell_ids.insert(cell_name.to_string(), id);
                self.side_sizes[Side::A.index()] += 1;
                id
            }
        };

        let cell = &mut self.cells[cell_id as usize];
        if cell.nets.contains(&net) {
            return cell_id;
        }
        cell.nets.push(net);
        self.max_pin_count = self.max_pin_count.max(cell.pin_count() as u32);

        let net = &mut self.nets[net as usize];
        net.cells.push(cell_id);
        net.side_count[cell.side.index()] += 1;
        if net.side_count[0] > 0 && net.side_count[1] > 0 && net.side_count[cell.side.index()] == 1
        {
            self.cut_size += 1;
        }
        cell_id
    }

    pub fn balance_factor(&self) -> f64 {
        self.balance_factor
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn cell(&self, id: u32) -> &Cell {
        &self.cells[id as usize]
    }

    pub fn net(&self, id: u32) -> &Net {
        &self.nets[id as usize]
    }

    pub fn cell_id(&self, name: &str) -> Option<u32> {
        self.cell_ids.get(name).copied()
    }

    pub fn net_id(&self, name: &str) -> Option<u32> {
        self.net_ids.get(name).copied()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Upper bound on the magnitude of any cell gain.
    pub fn max_pin_count(&self) -> u32 {
        self.max_pin_count
    }

    /// Number of cut nets as last counted.
    pub fn cut_size(&self) -> u32 {
        self.cut_size
    }

    pub fn side_sizes(&self) -> [u32; 2] {
        self.side_sizes
    }

    pub fn side_of(&self, cell_name: &str) -> Option<Side> {
        self.cell_id(cell_name).map(|id| self.cell(id).side)
    }

    /// Names of the cells on the given side, in cell id order.
    pub fn cell_names_on(&self, side: Side) -> impl Iterator<Item = &str> + '_ {
        self.cells
            .iter()
            .filter(move |c| c.side == side)
            .map(|c| c.name.as_str())
    }

    /// Moves a cell to a side and brings all derived counters up to date.
    ///
    /// Every call recounts the whole graph; use [`Hypergraph::assign_all`]
    /// to place several cells at once.
    pub fn assign(&mut self, cell: u32, side: Side) {
        self.assign_all([(cell, side)]);
    }

    /// Moves each listed cell to its side, then recounts once.
    pub fn assign_all<I: IntoIterator<Item = (u32, Side)>>(&mut self, assignment: I) {
        for (cell, side) in assignment {
            self.cells[cell as usize].side = side;
        }
        self.refresh();
    }

    /// Counts the cut nets directly from the cell sides, ignoring all cached
    /// counters.
    pub fn calculate_cut_size(&self) -> u32 {
        self.nets
            .iter()
            .filter(|n| {
                let mut seen = [false, false];
                for &c in n.cells.iter() {
                    seen[self.cells[c as usize].side.index()] = true;
                }
                seen[0] && seen[1]
            })
            .count() as u32
    }

    /// Recomputes net side counts, partition sizes, the cut size and all
    /// gains from the current cell sides.
    pub(crate) fn refresh(&mut self) {
        self.recount_side_counts();
        self.recount_side_sizes();
        self.recount_cut_size();
        self.compute_gains();
    }

    pub(crate) fn recount_side_counts(&mut self) {
        let Hypergraph { cells, nets, .. } = self;
        for net in nets.iter_mut() {
            net.side_count = [0, 0];
            for &c in net.cells.iter() {
                net.side_count[cells[c as usize].side.index()] += 1;
            }
        }
    }

    pub(crate) fn recount_side_sizes(&mut self) {
        let mut sizes = [0, 0];
        for c in self.cells.iter() {
            sizes[c.side.index()] += 1;
        }
        self.side_sizes = sizes;
    }

    pub(crate) fn recount_cut_size(&mut self) {
        self.cut_size = self.nets.iter().filter(|n| n.is_cut()).count() as u32;
    }
}
