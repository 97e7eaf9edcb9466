use thiserror::Error;

/// Errors raised while reading a netlist or a partition result.
///
/// `token` is the zero-based index of the whitespace-delimited token at which
/// the problem was detected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("input is empty, expected a balance factor")]
    MissingBalanceFactor,
    #[error("could not parse balance factor `{value}`")]
    InvalidBalanceFactor { value: String },
    #[error("balance factor {value} is outside of (0, 1]")]
    BalanceFactorOutOfRange { value: f64 },
    #[error("expected `{expected}` at token {token}, found `{found}`")]
    UnexpectedToken {
        token: usize,
        expected: &'static str,
        found: String,
    },
    #[error("net record starting at token {token} has no net name")]
    MissingNetName { token: usize },
    #[error("net `{net}` is not terminated by `;`")]
    UnterminatedNet { net: String },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("could not parse {what} `{value}`")]
    InvalidNumber { what: &'static str, value: String },
    #[error("group {group} declares {declared} cells but lists {listed}")]
    GroupSizeMismatch {
        group: &'static str,
        declared: usize,
        listed: usize,
    },
    #[error("cell `{cell}` is listed in both groups")]
    CellInBothGroups { cell: String },
}

#[derive(Debug, Error)]
pub enum PartitionError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// No unlocked cell could be moved without breaking the balance bounds.
    #[error("no feasible move in pass {pass} at step {step} (partition sizes {sizes:?})")]
    NoFeasibleMove {
        pass: u32,
        step: usize,
        sizes: [u32; 2],
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
