use crate::{Hypergraph, ParseError, Side};
use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};

impl Hypergraph {
    /// Writes the cut size and both groups in the result file format.
    pub fn write_result<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "Cutsize = {}", self.cut_size)?;
        for (label, side) in [("G1", Side::A), ("G2", Side::B)] {
            writeln!(writer, "{label} {}", self.side_sizes[side.index()])?;
            for name in self.cell_names_on(side) {
                write!(writer, "{name} ")?;
            }
            writeln!(writer, ";")?;
        }
        writer.flush()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            cut_size: self.cut_size,
            cell_count: self.cells.len(),
            net_count: self.nets.len(),
            side_sizes: self.side_sizes,
        }
    }
}

/// Final statistics of a run, printable as a report block.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Summary {
    pub cut_size: u32,
    pub cell_count: usize,
    pub net_count: usize,
    pub side_sizes: [u32; 2],
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==================== Summary ====================")?;
        writeln!(f, " Cutsize: {}", self.cut_size)?;
        writeln!(f, " Total cell number: {}", self.cell_count)?;
        writeln!(f, " Total net number:  {}", self.net_count)?;
        writeln!(f, " Cell Number of partition A: {}", self.side_sizes[0])?;
        writeln!(f, " Cell Number of partition B: {}", self.side_sizes[1])?;
        write!(f, "=================================================")
    }
}

/// A partition read back from a result file.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionResult {
    pub cut_size: u32,
    /// Cell names of `G1` and `G2`, in file order.
    pub groups: [Vec<String>; 2],
}

impl PartitionResult {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut tokens = text.split_ascii_whitespace().enumerate();

        expect(&mut tokens, "Cutsize")?;
        expect(&mut tokens, "=")?;
        let cut_size = number(&mut tokens, "cut size")?;

        let mut seen = HashSet::new();
        let mut groups = [vec![], vec![]];
        for (label, group) in ["G1", "G2"].into_iter().zip(groups.iter_mut()) {
            expect(&mut tokens, label)?;
            let declared = number::<usize>(&mut tokens, "group size")?;
            loop {
                match tokens.next() {
                    Some((_, ";")) => break,
                    Some((_, name)) => {
                        if !seen.insert(name) {
                            return Err(ParseError::CellInBothGroups {
                                cell: name.to_string(),
                            });
                        }
                        group.push(name.to_string());
                    }
                    None => return Err(ParseError::UnexpectedEnd { expected: "`;`" }),
                }
            }
            if group.len() != declared {
                return Err(ParseError::GroupSizeMismatch {
                    group: label,
                    declared,
                    listed: group.len(),
                });
            }
        }
        if let Some((pos, token)) = tokens.next() {
            return Err(ParseError::UnexpectedToken {
                token: pos,
                expected: "end of input",
                found: token.to_string(),
            });
        }

        Ok(Self { cut_size, groups })
    }
}

fn expect<'a>(
    tokens: &mut impl Iterator<Item = (usize, &'a str)>,
    expected: &'static str,
) -> Result<(), ParseError> {
    match tokens.next() {
        Some((_, token)) if token == expected => Ok(()),
        Some((pos, token)) => Err(ParseError::UnexpectedToken {
            token: pos,
            expected,
            found: token.to_string(),
        }),
        None => Err(ParseError::UnexpectedEnd { expected }),
    }
}

fn number<'a, T: std::str::FromStr>(
    tokens: &mut impl Iterator<Item = (usize, &'a str)>,
    what: &'static str,
) -> Result<T, ParseError> {
    let (_, token) = tokens
        .next()
        .ok_or(ParseError::UnexpectedEnd { expected: what })?;
    token.parse().map_err(|_| ParseError::InvalidNumber {
        what,
        value: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_format() {
        let mut graph = Hypergraph::parse("0.5 NET n1 a b ; NET n2 b c ;").unwrap();
        graph.assign(2, Side::B);
        let mut out = Vec::new();
        graph.write_result(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Cutsize = 1\nG1 2\na b ;\nG2 1\nc ;\n"
        );
    }

    #[test]
    fn empty_group() {
        let graph = Hypergraph::parse("0.5 NET n1 a ;").unwrap();
        let mut out = Vec::new();
        graph.write_result(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Cutsize = 0\nG1 1\na ;\nG2 0\n;\n"
        );
    }

    #[test]
    fn read_back() {
        let result = PartitionResult::parse("Cutsize = 1\nG1 2\na b ;\nG2 1\nc ;\n").unwrap();
        assert_eq!(result.cut_size, 1);
        assert_eq!(result.groups[0], ["a", "b"]);
        assert_eq!(result.groups[1], ["c"]);
    }

    #[test]
    fn rejects_inconsistent_results() {
        assert_eq!(
            PartitionResult::parse("Cutsize = 0\nG1 1\na ;\nG2 1\na ;\n").unwrap_err(),
            ParseError::CellInBothGroups {
                cell: "a".to_string()
            }
        );
        assert_eq!(
            PartitionResult::parse("Cutsize = 0\nG1 2\na ;\nG2 0\n;\n").unwrap_err(),
            ParseError::GroupSizeMismatch {
                group: "G1",
                declared: 2,
                listed: 1
            }
        );
        assert!(matches!(
            PartitionResult::parse("Cutsize = x").unwrap_err(),
            ParseError::InvalidNumber { .. }
        ));
        assert!(matches!(
            PartitionResult::parse("Cutsize = 0\nG1 0\n;\nG2 0\n").unwrap_err(),
            ParseError::UnexpectedEnd { .. }
        ));
    }

    #[test]
    fn summary_block() {
        let graph = Hypergraph::parse("0.5 NET n1 a b ; NET n2 b c ;").unwrap();
        let text = graph.summary().to_string();
        assert!(text.contains(" Cutsize: 0\n"));
        assert!(text.contains(" Total cell number: 3\n"));
        assert!(text.contains(" Total net number:  2\n"));
        assert!(text.contains(" Cell Number of partition A: 3\n"));
        assert!(text.contains(" Cell Number of partition B: 0\n"));
    }
}
