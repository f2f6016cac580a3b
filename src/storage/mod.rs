//! File-backed collaborators of the engine
//!
//! - **input**: CSV loading and validation into work items
//! - **run_folder**: run metadata, control file and output locations
//! - **results**: CSV result sink

pub mod input;
pub mod results;
pub mod run_folder;

pub use input::{InputFile, load_work_items, read_work_items};
pub use results::{CsvResultSink, OUTPUT_COLUMNS};
pub use run_folder::{RunFolder, RunMeta};
