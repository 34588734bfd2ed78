//! # Parsing and Writing knapPI Files
//!
//! Internal module for the verbose layout used by the classic 0-1 knapsack
//! benchmark sets (e.g., the `knapPI_*` and low-dimensional instances).
//!
//! The input is a stream of whitespace-separated tokens. Line structure does
//! not matter; any run of whitespace separates two tokens.
//!
//! ```text
//! n q
//! v_1 w_1
//! ...
//! v_n w_n
//! ```
//!
//! `n` (item count) and `q` (capacity) must be integers. Values and weights
//! are kept as opaque tokens and never reinterpreted as numbers. Tokens after
//! the last item are ignored.

use std::io::{self, Write};

use crate::instances::Instance;

use super::{parse_int, Error};

/// Parses a knapPI instance from text
pub fn parse(data: &str) -> Result<Instance, Error> {
    let mut tokens = data.split_whitespace();

    let n_items_token = next_token(&mut tokens, 0, 2)?;
    let n_items = parse_int(n_items_token)
        .filter(|n_items| !n_items.starts_with('-'))
        .ok_or_else(|| Error::Format {
            index: 0,
            token: n_items_token.to_owned(),
            expected: "item count",
        })?;
    let capacity = next_token(&mut tokens, 1, 2)?;
    let capacity = parse_int(capacity).ok_or_else(|| Error::Format {
        index: 1,
        token: capacity.to_owned(),
        expected: "capacity",
    })?;
    // no input can hold as many tokens as a count beyond `usize` demands
    let Ok(n_items) = n_items.parse::<usize>() else {
        return Err(Error::OutOfRange {
            expected: usize::MAX,
            found: 2 + tokens.count(),
        });
    };

    let expected = n_items.saturating_mul(2).saturating_add(2);
    // the declared count is untrusted, so do not let it dictate allocations
    let mut inst = Instance::with_capacity(capacity, n_items.min(data.len() / 2));
    for idx in (2..expected).step_by(2) {
        let value = next_token(&mut tokens, idx, expected)?;
        let weight = next_token(&mut tokens, idx + 1, expected)?;
        inst.push_item(value.to_owned(), weight.to_owned());
    }
    Ok(inst)
}

/// Reads all data from `reader` and parses it as a knapPI instance
pub fn parse_reader<R: io::Read>(mut reader: R) -> Result<Instance, Error> {
    let mut data = String::new();
    reader.read_to_string(&mut data)?;
    parse(&data)
}

/// Gets the token at position `idx`, which is the next one of `tokens`
fn next_token<'data>(
    tokens: &mut impl Iterator<Item = &'data str>,
    idx: usize,
    expected: usize,
) -> Result<&'data str, Error> {
    tokens.next().ok_or(Error::OutOfRange {
        expected,
        found: idx,
    })
}

/// Writes an instance in the knapPI layout, one item per line
pub fn write<W: Write + ?Sized>(writer: &mut W, inst: &Instance) -> io::Result<()> {
    writeln!(writer, "{} {}", inst.n_items(), inst.capacity())?;
    for (value, weight) in inst.iter() {
        writeln!(writer, "{value} {weight}")?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use crate::instances::{fio::Error, Instance};

    use super::{parse, parse_reader, write};

    fn tokens(toks: &[&str]) -> Vec<String> {
        toks.iter().map(|&t| t.to_owned()).collect()
    }

    #[test]
    fn two_items() {
        let inst = parse("2 10 60 10 100 20").unwrap();
        assert_eq!(inst.n_items(), 2);
        assert_eq!(inst.capacity(), "10");
        assert_eq!(inst.values(), tokens(&["60", "100"]));
        assert_eq!(inst.weights(), tokens(&["10", "20"]));
    }

    #[test]
    fn line_structure_irrelevant() {
        let a = parse("2 10\n60 10\n100 20\n").unwrap();
        let b = parse("  2\t10 60\n\n10 100\r\n20").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn no_items() {
        let inst = parse("0 5").unwrap();
        assert_eq!(inst.n_items(), 0);
        assert_eq!(inst.capacity(), "5");
    }

    #[test]
    fn opaque_tokens() {
        let inst = parse("2 100 1.50 0003 7e2 -4").unwrap();
        assert_eq!(inst.values(), tokens(&["1.50", "7e2"]));
        assert_eq!(inst.weights(), tokens(&["0003", "-4"]));
    }

    #[test]
    fn trailing_tokens_ignored() {
        let inst = parse("1 9 3 4\n295\n").unwrap();
        assert_eq!(inst.n_items(), 1);
        assert_eq!(inst.values(), tokens(&["3"]));
        assert_eq!(inst.weights(), tokens(&["4"]));
    }

    #[test]
    fn missing_items() {
        match parse("3 10 60 10 100 20") {
            Err(Error::OutOfRange { expected, found }) => {
                assert_eq!(expected, 8);
                assert_eq!(found, 6);
            }
            res => panic!("unexpected result: {res:?}"),
        }
    }

    #[test]
    fn missing_weight() {
        assert!(matches!(
            parse("1 10 60"),
            Err(Error::OutOfRange {
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn empty_input() {
        assert!(matches!(
            parse(" \n "),
            Err(Error::OutOfRange {
                expected: 2,
                found: 0
            })
        ));
    }

    #[test]
    fn huge_declared_count() {
        assert!(matches!(
            parse(&format!("{} 10 1 2", i64::MAX)),
            Err(Error::OutOfRange { found: 4, .. })
        ));
    }

    #[test]
    fn count_beyond_usize() {
        assert!(matches!(
            parse("100000000000000000000000000 10 1 2 3"),
            Err(Error::OutOfRange {
                expected: usize::MAX,
                found: 5
            })
        ));
    }

    #[test]
    fn large_capacity() {
        let inst = parse("1 100000000000000000000\n3 4\n").unwrap();
        assert_eq!(inst.capacity(), "100000000000000000000");
        assert_eq!(inst.values(), tokens(&["3"]));
        assert_eq!(inst.weights(), tokens(&["4"]));
        let inst = parse("0 +000123456789012345678901234567890").unwrap();
        assert_eq!(inst.capacity(), "123456789012345678901234567890");
        let inst = parse("0 -0042").unwrap();
        assert_eq!(inst.capacity(), "-42");
    }

    #[test]
    fn non_integer_header() {
        match parse("two 10 60 10 100 20") {
            Err(Error::Format { index, token, .. }) => {
                assert_eq!(index, 0);
                assert_eq!(token, "two");
            }
            res => panic!("unexpected result: {res:?}"),
        }
        assert!(matches!(
            parse("2 10.5 60 10 100 20"),
            Err(Error::Format { index: 1, .. })
        ));
        assert!(matches!(parse("-1 10"), Err(Error::Format { index: 0, .. })));
    }

    #[test]
    fn from_reader() {
        let inst = parse_reader(std::io::Cursor::new("1 3\n2 3\n")).unwrap();
        assert_eq!(inst.capacity(), "3");
        let invalid = parse_reader(std::io::Cursor::new(vec![b'1', b' ', 0xff]));
        assert!(matches!(invalid, Err(Error::Io(_))));
    }

    #[test]
    fn write_verbose() {
        let inst = Instance::new("10", tokens(&["60", "100"]), tokens(&["10", "20"]));
        let mut buf = Vec::new();
        write(&mut buf, &inst).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "2 10\n60 10\n100 20\n");
    }
}
