//! Output handling: split spool files and destination uploads

mod cloud;
mod writer;


pub use cloud::{CloudDestination, ObjectUploader};
pub use writer::{FileNaming, FileSet, SplitWriter, SpoolFile};
