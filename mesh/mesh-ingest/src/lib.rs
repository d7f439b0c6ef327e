//! Upload ingestion: file in, statistics and price out.
//!
//! - [`ingest_bytes`] runs the synchronous pipeline on bytes in memory:
//!   format detection, decoding, flattening, measurement
//! - [`UploadSession`] wraps it in the upload state machine
//!   (`NoFile → Parsing → Analyzed | ParseFailed`) with last-file-wins
//!   handling of asynchronous reads
//!
//! Failures never escape as panics. Each one becomes an [`IngestError`]
//! whose [`notice`](IngestError::notice) is what the user sees, and a
//! failed upload leaves no statistics behind.
//!
//! # Example
//!
//! ```
//! use mesh_ingest::UploadSession;
//! use mesh_pricing::{MaterialCatalog, PrintSettings};
//!
//! let session = UploadSession::new();
//! let ticket = session.begin_upload("tri.obj").unwrap();
//! session.finish_upload(ticket, b"v 0 0 0\nv 10 0 0\nv 0 10 0\nf 1 2 3\n");
//!
//! // A flat triangle has no volume: there is nothing to charge for
//! let settings = PrintSettings::default();
//! let estimate = session.quote(&settings, &MaterialCatalog::default()).unwrap();
//! assert!(estimate.total().is_none());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod pipeline;
mod session;

pub use error::{IngestError, IngestResult};
pub use pipeline::{AnalyzedModel, ingest_bytes};
pub use session::{IngestState, UploadOutcome, UploadSession, UploadTicket};
