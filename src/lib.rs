//! # kpformat - Reformatting Knapsack Benchmark Instances
//!
//! `kpformat` converts 0-1 knapsack benchmark instances from the verbose
//! layout, where every item sits on its own `value weight` line, into a
//! compact three-line layout:
//!
//! ```text
//! <item_count> <capacity>
//! <value_1> <value_2> ... <value_n>
//! <weight_1> <weight_2> ... <weight_n>
//! ```
//!
//! Single instances are handled through [`instances::Instance`], whole
//! directories through [`convert::reformat_dir`].
//!
//! ## Crate Features
//!
//! - `compression`: transparently read and write `.gz`, `.bz2` and `.xz`
//!   instance files.

pub mod convert;
pub mod instances;
