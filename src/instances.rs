//! # Knapsack Instance Representation
//!
//! A knapsack instance as it is found in benchmark files. Item values and
//! weights are kept as the exact text tokens of the input file, so that
//! reformatting never changes their representation.

use std::{io, path::Path};

pub mod fio;

/// A 0-1 knapsack instance
///
/// `values[i]` and `weights[i]` belong to the same item. Both sequences always
/// have exactly [`Instance::n_items`] entries. The capacity is an integer of
/// arbitrary size, kept in canonical decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Instance {
    capacity: String,
    values: Vec<String>,
    weights: Vec<String>,
}

impl Instance {
    /// Creates an instance from parallel value and weight tokens
    ///
    /// # Panics
    ///
    /// If `values` and `weights` have different lengths.
    #[must_use]
    pub fn new<C: Into<String>>(capacity: C, values: Vec<String>, weights: Vec<String>) -> Self {
        assert_eq!(
            values.len(),
            weights.len(),
            "every item needs exactly one value and one weight"
        );
        Self {
            capacity: capacity.into(),
            values,
            weights,
        }
    }

    /// Creates an empty instance with pre-allocated room for `n_items` items
    pub(crate) fn with_capacity(capacity: String, n_items: usize) -> Self {
        Self {
            capacity,
            values: Vec::with_capacity(n_items),
            weights: Vec::with_capacity(n_items),
        }
    }

    /// Appends an item
    pub(crate) fn push_item(&mut self, value: String, weight: String) {
        self.values.push(value);
        self.weights.push(weight);
    }

    /// The number of items in the instance
    #[must_use]
    pub fn n_items(&self) -> usize {
        debug_assert_eq!(self.values.len(), self.weights.len());
        self.values.len()
    }

    /// The knapsack capacity
    #[must_use]
    pub fn capacity(&self) -> &str {
        &self.capacity
    }

    /// The item value tokens, in input order
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The item weight tokens, in input order
    #[must_use]
    pub fn weights(&self) -> &[String] {
        &self.weights
    }

    /// Iterates over `(value, weight)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .zip(&self.weights)
            .map(|(v, w)| (v.as_str(), w.as_str()))
    }

    /// Parses an instance in the verbose knapPI layout from text. See
    /// [`fio::knappi`] for details on the format.
    ///
    /// # Errors
    ///
    /// [`fio::Error::Format`] if the item count or capacity are not integers,
    /// [`fio::Error::OutOfRange`] if the text ends before all items are read.
    pub fn from_knappi_str(data: &str) -> Result<Self, fio::Error> {
        fio::knappi::parse(data)
    }

    /// Parses an instance in the verbose knapPI layout from a reader
    ///
    /// # Errors
    ///
    /// See [`Instance::from_knappi_str`], as well as I/O errors.
    pub fn from_knappi<R: io::Read>(reader: R) -> Result<Self, fio::Error> {
        fio::knappi::parse_reader(reader)
    }

    /// Parses an instance in the verbose knapPI layout from a file path. With
    /// feature `compression` supports bzip2, gzip and xz compression, detected
    /// by the file extension.
    ///
    /// # Errors
    ///
    /// See [`Instance::from_knappi`].
    pub fn from_knappi_path<P: AsRef<Path>>(path: P) -> Result<Self, fio::Error> {
        Self::from_knappi(fio::open_compressed_uncompressed_read(path)?)
    }

    /// Parses an instance in the compact three-line layout from a reader
    ///
    /// # Errors
    ///
    /// [`fio::Error::Compact`] if the input does not follow the layout, or
    /// I/O errors.
    pub fn from_compact<R: io::BufRead>(reader: R) -> Result<Self, fio::Error> {
        fio::compact::parse(reader)
    }

    /// Parses an instance in the compact three-line layout from a file path
    ///
    /// # Errors
    ///
    /// See [`Instance::from_compact`].
    pub fn from_compact_path<P: AsRef<Path>>(path: P) -> Result<Self, fio::Error> {
        Self::from_compact(io::BufReader::new(
            fio::open_compressed_uncompressed_read(path)?,
        ))
    }

    /// Writes the instance in the compact three-line layout
    ///
    /// # Errors
    ///
    /// If writing fails.
    pub fn write_compact<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        fio::compact::write(writer, self)
    }

    /// Writes the instance in the verbose knapPI layout
    ///
    /// # Errors
    ///
    /// If writing fails.
    pub fn write_knappi<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        fio::knappi::write(writer, self)
    }

    /// Writes the instance in the compact layout to a file path. With feature
    /// `compression` the output is compressed according to the file extension.
    /// The file is only created once the whole content is written.
    ///
    /// # Errors
    ///
    /// If the file cannot be created or written.
    pub fn write_compact_path<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        fio::write_atomic(path, |writer| self.write_compact(writer))
    }
}

#[cfg(test)]
mod tests {
    use super::Instance;

    #[test]
    fn iter_pairs() {
        let inst = Instance::new(
            "10",
            vec!["60".to_owned(), "100".to_owned()],
            vec!["10".to_owned(), "20".to_owned()],
        );
        assert_eq!(inst.n_items(), 2);
        let pairs: Vec<_> = inst.iter().collect();
        assert_eq!(pairs, vec![("60", "10"), ("100", "20")]);
    }

    #[test]
    #[should_panic(expected = "every item needs exactly one value and one weight")]
    fn mismatched_lengths() {
        let _ = Instance::new("5", vec!["1".to_owned()], vec![]);
    }
}
