//! I/O wrappers shared by the writer and the reader.

mod counting;
mod exact;

pub use counting::CountingWriter;
pub(crate) use exact::ExactReader;
pub(crate) use exact::read_block;
