//! # NACHA Merge
//!
//! An in-memory model of NACHA ACH files and an engine that merges many
//! files into the fewest valid ones.
//!
//! ## Design Principles
//!
//! - **Bottom-up controls**: entries feed batch controls, batch controls feed
//!   the file control; `build` writes them and `validate` recomputes them
//! - **Integer cents**: amounts are `u64` cents, `Money` only at the edges
//! - **Capacity limits**: merged outputs respect a line and dollar ceiling
//! - **No partial results**: a merge either returns valid files or an error
//!
//! ## Example
//!
//! ```no_run
//! use nacha_merge::{import, merge_files};
//! use std::fs::File;
//!
//! let a = import::read_file_csv(File::open("a.csv").unwrap()).unwrap();
//! let b = import::read_file_csv(File::open("b.csv").unwrap()).unwrap();
//! for file in merge_files(&[a, b]).unwrap() {
//!     nacha_merge::writer::write_file(&file, std::io::stdout()).unwrap();
//! }
//! ```

pub mod addenda;
pub mod batch;
pub mod cli;
pub mod control;
pub mod entry;
pub mod error;
mod fields;
pub mod file;
pub mod iat;
pub mod import;
pub mod merge;
pub mod money;
pub mod options;
pub mod record;
pub mod report;
pub mod writer;

pub use addenda::{
    Addenda02, Addenda05, Addenda98, Addenda98Refused, Addenda99, Addenda99Contested,
    Addenda99Dishonored,
};
pub use batch::Batch;
pub use control::{block_count, Totals, BLOCKING_FACTOR, ENTRY_HASH_MODULUS};
pub use entry::EntryDetail;
pub use error::{AchError, Result, MSG_FIELD_INCLUSION};
pub use file::File;
pub use iat::{IatAddenda, IatBatch, IatBatchHeader, IatEntryDetail};
pub use merge::{merge_files, merge_files_with};
pub use money::Money;
pub use options::{Conditions, ValidateOpts, DEFAULT_MAX_LINES};
pub use record::{BatchControl, BatchHeader, FileControl, FileHeader};
