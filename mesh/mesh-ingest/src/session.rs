//! One upload slot with last-file-wins semantics.
//!
//! Every file selection bumps a generation counter and hands back an
//! [`UploadTicket`] stamped with it. Reading and parsing happen outside the
//! lock; the result is committed only if the ticket's generation is still
//! the current one. A slower, older upload can never overwrite a newer one.
//!
//! ```text
//! NoFile ──begin──▶ Parsing ──finish──▶ Analyzed
//!    ▲                 │                   │
//!    │                 └──────────────▶ ParseFailed
//!    └────clear──────── (any state) ◀──begin── (any state)
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mesh_io::{IoError, MeshFormat};
use mesh_measure::ModelStatistics;
use mesh_pricing::{MaterialCatalog, PriceEstimate, PrintSettings, estimate};
use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info, warn};

use crate::error::{IngestError, IngestResult};
use crate::pipeline::{AnalyzedModel, analyze_bytes};

/// Where a session is in the upload lifecycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum IngestState {
    /// Nothing selected.
    #[default]
    NoFile,
    /// A file was selected and its result is pending.
    Parsing {
        /// Name of the pending file.
        file_name: String,
        /// Generation of the pending upload.
        generation: u64,
    },
    /// The current file was parsed and measured.
    Analyzed(Arc<AnalyzedModel>),
    /// The current file could not be parsed. No statistics are kept.
    ParseFailed {
        /// Name of the failed file.
        file_name: String,
        /// Text to show the user.
        notice: String,
    },
}

impl IngestState {
    /// Short name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoFile => "no_file",
            Self::Parsing { .. } => "parsing",
            Self::Analyzed(_) => "analyzed",
            Self::ParseFailed { .. } => "parse_failed",
        }
    }

    /// The analyzed model, if there is one.
    #[must_use]
    pub fn model(&self) -> Option<&Arc<AnalyzedModel>> {
        match self {
            Self::Analyzed(model) => Some(model),
            _ => None,
        }
    }

    /// Statistics of the analyzed model, if there is one.
    #[must_use]
    pub fn statistics(&self) -> Option<&ModelStatistics> {
        self.model().map(|m| m.statistics())
    }
}

/// Proof that an upload was started, stamped with its generation.
///
/// Consumed when the upload finishes, so a result is committed at most once.
#[derive(Debug)]
#[must_use = "an upload ticket does nothing until it is finished"]
pub struct UploadTicket {
    generation: u64,
    file_name: String,
    format: MeshFormat,
}

impl UploadTicket {
    /// Generation this upload was started at.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Name of the uploaded file.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Format detected from the file name.
    #[must_use]
    pub const fn format(&self) -> MeshFormat {
        self.format
    }
}

/// What happened to a finished upload.
#[derive(Debug)]
pub enum UploadOutcome {
    /// Committed: the session now holds this model.
    Analyzed(Arc<AnalyzedModel>),
    /// Committed: the session is now in [`IngestState::ParseFailed`].
    Failed(IngestError),
    /// A newer upload or a clear happened first. The result was dropped.
    Superseded,
}

impl UploadOutcome {
    /// Whether the result reached the session.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        !matches!(self, Self::Superseded)
    }
}

/// The upload slot of one viewer or form.
///
/// Safe to share between tasks and threads. All derived state belongs to
/// the current upload and is dropped when a new file is selected.
///
/// # Example
///
/// ```
/// use mesh_ingest::{IngestState, UploadOutcome, UploadSession};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let session = UploadSession::new();
/// let obj = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
///
/// let outcome = session.upload("tri.obj", &obj[..]).await.unwrap();
/// assert!(matches!(outcome, UploadOutcome::Analyzed(_)));
/// assert_eq!(session.statistics().unwrap().polygons, 1);
///
/// session.clear();
/// assert_eq!(session.state(), IngestState::NoFile);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct UploadSession {
    generation: AtomicU64,
    state: Mutex<IngestState>,
}

impl UploadSession {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the most recent selection or clear.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> IngestState {
        self.state.lock().clone()
    }

    /// The analyzed model, if the current file has one.
    #[must_use]
    pub fn model(&self) -> Option<Arc<AnalyzedModel>> {
        self.state.lock().model().cloned()
    }

    /// Statistics of the current file, if it has been analyzed.
    #[must_use]
    pub fn statistics(&self) -> Option<ModelStatistics> {
        self.state.lock().statistics().copied()
    }

    /// Price the current model. Returns
    /// [`PriceEstimate::NotComputable`] while nothing is analyzed.
    ///
    /// # Errors
    ///
    /// [`IngestError::Pricing`] for an unknown material or invalid settings.
    pub fn quote(
        &self,
        settings: &PrintSettings,
        catalog: &MaterialCatalog,
    ) -> IngestResult<PriceEstimate> {
        match self.model() {
            Some(model) => model.quote(settings, catalog),
            None => Ok(estimate(None, settings, catalog)?),
        }
    }

    /// Whether `ticket` still belongs to the newest upload.
    #[must_use]
    pub fn is_current(&self, ticket: &UploadTicket) -> bool {
        self.generation() == ticket.generation
    }

    /// Select a new file. Discards all state of the previous file and
    /// invalidates any upload still in flight.
    ///
    /// # Errors
    ///
    /// [`IngestError::Mesh`] with [`IoError::UnsupportedFormat`] if the
    /// extension is not recognized. The session is left untouched.
    pub fn begin_upload(&self, file_name: &str) -> IngestResult<UploadTicket> {
        let format = MeshFormat::from_file_name(file_name).map_err(|e| {
            warn!(file_name, error = %e, "rejected upload");
            IngestError::from(e)
        })?;

        let mut state = self.state.lock();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        *state = IngestState::Parsing {
            file_name: file_name.to_string(),
            generation,
        };
        drop(state);

        info!(file_name, %format, generation, "upload started");
        Ok(UploadTicket {
            generation,
            file_name: file_name.to_string(),
            format,
        })
    }

    /// Finish an upload whose bytes are already in memory.
    pub fn finish_upload(&self, ticket: UploadTicket, bytes: &[u8]) -> UploadOutcome {
        if !self.is_current(&ticket) {
            return self.discard(&ticket);
        }
        let result = analyze_bytes(&ticket.file_name, ticket.format, bytes);
        self.commit(&ticket, result)
    }

    /// Read an upload to completion, then finish it.
    ///
    /// The read is the only suspension point. A stale upload is dropped
    /// without being parsed.
    pub async fn read_and_finish<R>(&self, ticket: UploadTicket, mut reader: R) -> UploadOutcome
    where
        R: AsyncRead + Unpin,
    {
        let mut bytes = Vec::new();
        if let Err(e) = reader.read_to_end(&mut bytes).await {
            return self.commit(&ticket, Err(IoError::from(e).into()));
        }
        debug!(
            file_name = %ticket.file_name,
            bytes = bytes.len(),
            "upload read"
        );
        self.finish_upload(ticket, &bytes)
    }

    /// Select a file and read it to completion.
    ///
    /// # Errors
    ///
    /// Only for an unsupported extension; see [`UploadSession::begin_upload`].
    /// Parse failures are reported through [`UploadOutcome::Failed`].
    pub async fn upload<R>(&self, file_name: &str, reader: R) -> IngestResult<UploadOutcome>
    where
        R: AsyncRead + Unpin,
    {
        let ticket = self.begin_upload(file_name)?;
        Ok(self.read_and_finish(ticket, reader).await)
    }

    /// Remove the current file and invalidate any upload in flight.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        *state = IngestState::NoFile;
        drop(state);
        info!(generation, "upload cleared");
    }

    fn commit(&self, ticket: &UploadTicket, result: IngestResult<AnalyzedModel>) -> UploadOutcome {
        let mut state = self.state.lock();
        // Checked under the lock so a concurrent begin_upload cannot slip in
        if self.generation.load(Ordering::Acquire) != ticket.generation {
            drop(state);
            return self.discard(ticket);
        }

        match result {
            Ok(model) => {
                let model = Arc::new(model);
                *state = IngestState::Analyzed(Arc::clone(&model));
                drop(state);
                info!(
                    file_name = %ticket.file_name,
                    generation = ticket.generation,
                    "upload analyzed"
                );
                UploadOutcome::Analyzed(model)
            }
            Err(error) => {
                *state = IngestState::ParseFailed {
                    file_name: ticket.file_name.clone(),
                    notice: error.notice(),
                };
                drop(state);
                warn!(
                    file_name = %ticket.file_name,
                    generation = ticket.generation,
                    %error,
                    "upload failed"
                );
                UploadOutcome::Failed(error)
            }
        }
    }

    fn discard(&self, ticket: &UploadTicket) -> UploadOutcome {
        debug!(
            file_name = %ticket.file_name,
            generation = ticket.generation,
            current = self.generation(),
            "discarding stale upload"
        );
        UploadOutcome::Superseded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &[u8] = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn begin_moves_to_parsing() {
        let session = UploadSession::new();
        let ticket = session.begin_upload("a.obj").unwrap();

        assert_eq!(ticket.generation(), 1);
        assert_eq!(ticket.format(), MeshFormat::Obj);
        assert_eq!(
            session.state(),
            IngestState::Parsing {
                file_name: "a.obj".into(),
                generation: 1
            }
        );
    }

    #[test]
    fn finish_commits_current_ticket() {
        let session = UploadSession::new();
        let ticket = session.begin_upload("a.obj").unwrap();
        let outcome = session.finish_upload(ticket, TRIANGLE_OBJ);

        assert!(outcome.is_committed());
        assert_eq!(session.state().as_str(), "analyzed");
        assert_eq!(session.statistics().map(|s| s.polygons), Some(1));
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let session = UploadSession::new();
        let old = session.begin_upload("old.obj").unwrap();
        let new = session.begin_upload("new.obj").unwrap();

        assert!(!session.is_current(&old));
        assert!(session.is_current(&new));
        assert!(matches!(
            session.finish_upload(old, TRIANGLE_OBJ),
            UploadOutcome::Superseded
        ));
        assert_eq!(session.state().as_str(), "parsing");
    }

    #[test]
    fn rejected_name_changes_nothing() {
        let session = UploadSession::new();
        assert!(session.begin_upload("model.fbx").is_err());
        assert_eq!(session.generation(), 0);
        assert_eq!(session.state(), IngestState::NoFile);
    }

    #[test]
    fn failure_keeps_no_statistics() {
        let session = UploadSession::new();
        let ticket = session.begin_upload("bad.stl").unwrap();
        // Shorter than the 84-byte binary header
        let outcome = session.finish_upload(ticket, &[0u8; 60]);

        assert!(matches!(outcome, UploadOutcome::Failed(_)));
        assert!(session.statistics().is_none());
        match session.state() {
            IngestState::ParseFailed { file_name, notice } => {
                assert_eq!(file_name, "bad.stl");
                assert!(!notice.is_empty());
            }
            other => panic!("expected ParseFailed, got {other:?}"),
        }
    }
}
