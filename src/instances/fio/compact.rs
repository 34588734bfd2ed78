//! # Parsing and Writing the Compact Layout
//!
//! The compact layout stores an instance in exactly three lines:
//!
//! ```text
//! n q
//! v_1 v_2 ... v_n
//! w_1 w_2 ... w_n
//! ```
//!
//! Every line is terminated by a newline. With `n = 0` the value and weight
//! lines are empty, but still present.

use std::io::{self, BufRead, Write};

use itertools::Itertools;

use crate::instances::Instance;

use super::{parse_count, parse_int, Error};

/// Writes an instance in the compact layout
pub fn write<W: Write + ?Sized>(writer: &mut W, inst: &Instance) -> io::Result<()> {
    writeln!(writer, "{} {}", inst.n_items(), inst.capacity())?;
    writeln!(writer, "{}", inst.values().iter().format(" "))?;
    writeln!(writer, "{}", inst.weights().iter().format(" "))?;
    writer.flush()
}

/// Parses an instance in the compact layout
///
/// Blank lines after the weight line are tolerated, any other trailing content
/// is an error.
pub fn parse<R: BufRead>(reader: R) -> Result<Instance, Error> {
    let mut lines = reader.lines();
    let mut next_line = |line: usize, what: &str| -> Result<String, Error> {
        lines.next().transpose()?.ok_or_else(|| Error::Compact {
            line,
            reason: format!("input ended before the {what} line"),
        })
    };

    let header = next_line(1, "header")?;
    let (n_items, capacity) = parse_header(&header)?;
    let values = parse_tokens(&next_line(2, "value")?, 2, n_items)?;
    let weights = parse_tokens(&next_line(3, "weight")?, 3, n_items)?;

    for (idx, line) in lines.enumerate() {
        if !line?.trim().is_empty() {
            return Err(Error::Compact {
                line: idx + 4,
                reason: "unexpected content after the weight line".to_owned(),
            });
        }
    }

    Ok(Instance::new(capacity, values, weights))
}

fn parse_header(line: &str) -> Result<(usize, String), Error> {
    let invalid = |reason: String| Error::Compact { line: 1, reason };
    let mut tokens = line.split_whitespace();
    let (Some(n_items), Some(capacity), None) = (tokens.next(), tokens.next(), tokens.next())
    else {
        return Err(invalid(format!(
            "expected item count and capacity, found '{}'",
            line.trim()
        )));
    };
    let n_items =
        parse_count(n_items).ok_or_else(|| invalid(format!("invalid item count '{n_items}'")))?;
    let capacity =
        parse_int(capacity).ok_or_else(|| invalid(format!("invalid capacity '{capacity}'")))?;
    Ok((n_items, capacity))
}

fn parse_tokens(line: &str, line_num: usize, n_items: usize) -> Result<Vec<String>, Error> {
    let tokens: Vec<String> = line.split_whitespace().map(str::to_owned).collect();
    if tokens.len() != n_items {
        return Err(Error::Compact {
            line: line_num,
            reason: format!("expected {n_items} tokens, found {}", tokens.len()),
        });
    }
    Ok(tokens)
}
