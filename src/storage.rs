pub mod document_file;
mod memory;
pub mod port;
mod session;

pub use document_file::DocumentFile;
pub use memory::MemoryDocument;
pub use port::{LineFailure, PortError, TechnicalDemandPort};
pub use session::{ApplyOutcome, DocumentStatus, FetchError, apply, fetch, probe};
