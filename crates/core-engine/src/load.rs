//! Streaming file load.
//!
//! Lines are tokenized as they arrive and appended to the state one at a
//! time, each followed by a `LineParsed` notification, so a shell can paint
//! the top of a large file before the rest has been read. A [`CancelToken`]
//! is checked around every read and every tokenization; once it trips the
//! load returns [`LoadOutcome::Cancelled`] and leaves whatever was appended
//! so far in place.

use std::io;
use std::path::{Path, PathBuf};

use core_events::CancelToken;
use core_state::EngineState;
use core_syntax::LineState;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::{Engine, Notification};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { line_count: usize },
    Cancelled { lines_loaded: usize },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Engine {
    /// Replace the open document with the lines read from `reader`.
    pub async fn open_file<R>(
        &mut self,
        path: impl Into<PathBuf>,
        reader: R,
        cancel: &CancelToken,
    ) -> Result<LoadOutcome, LoadError>
    where
        R: AsyncBufRead + Unpin,
    {
        let path = path.into();
        if cancel.is_cancelled() {
            return Ok(self.cancelled(0));
        }
        self.begin_load(&path);
        let mut reader = reader.lines();
        let mut loaded = 0;
        let mut continuation = None;
        loop {
            if cancel.is_cancelled() {
                return Ok(self.cancelled(loaded));
            }
            let next = reader.next_line().await.map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            if cancel.is_cancelled() {
                return Ok(self.cancelled(loaded));
            }
            let Some(line) = next else {
                break;
            };
            let (doc_line, state) = self.tokenizer.tokenize_line(&line, loaded, continuation);
            if cancel.is_cancelled() {
                return Ok(self.cancelled(loaded));
            }
            continuation = state.clone();
            self.append_loaded(loaded, line, doc_line, state);
            loaded += 1;
        }
        Ok(self.finish_load(loaded))
    }

    /// [`open_file`](Self::open_file) on a file read from disk.
    pub async fn open_path(
        &mut self,
        path: impl AsRef<Path>,
        cancel: &CancelToken,
    ) -> Result<LoadOutcome, LoadError> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        self.open_file(path, BufReader::new(file), cancel).await
    }

    /// Replace the open document with in-memory text. Same pipeline as
    /// [`open_file`](Self::open_file), minus I/O and cancellation.
    pub fn open_content(&mut self, path: impl Into<PathBuf>, content: &str) -> LoadOutcome {
        let path = path.into();
        self.begin_load(&path);
        let mut continuation: Option<LineState> = None;
        let mut loaded = 0;
        for line in content.lines() {
            let (doc_line, state) = self.tokenizer.tokenize_line(line, loaded, continuation);
            continuation = state.clone();
            self.append_loaded(loaded, line.to_string(), doc_line, state);
            loaded += 1;
        }
        self.finish_load(loaded)
    }

    /// Reset to a one-line empty document, every view seeded with the same
    /// placeholder so they agree at each await point of a load.
    fn begin_load(&mut self, path: &Path) {
        let grammar = self.tokenizer.load_grammar_for_path(path).map(str::to_string);
        let (placeholder, state) = self.tokenizer.tokenize_line("", 0, None);
        self.state = EngineState {
            file_path: Some(path.to_path_buf()),
            original_lines: vec![String::new()],
            document_lines: vec![placeholder],
            ..EngineState::default()
        };
        self.action_state = Default::default();
        self.continuations = vec![state];
        info!(target: "engine.load", path = %path.display(), ?grammar, "load_started");
    }

    fn append_loaded(
        &mut self,
        index: usize,
        line: String,
        doc_line: core_syntax::DocumentLine,
        state: Option<LineState>,
    ) {
        if index == 0 {
            // first line replaces the placeholder in every view
            self.state.original_lines.clear();
            self.state.document_lines.clear();
            self.continuations.clear();
        } else {
            self.state.content.push('\n');
        }
        self.state.content.push_str(&line);
        self.state.lines.push_loaded(index, line.clone());
        self.state.original_lines.push(line);
        self.state.document_lines.push(doc_line.clone());
        self.continuations.push(state);

        let every = self.settings.log_every;
        if every > 0 && (index + 1) % every == 0 {
            debug!(target: "engine.load", lines = index + 1, "load_progress");
        }
        self.emit(&[Notification::LineParsed(doc_line)]);
    }

    fn finish_load(&mut self, loaded: usize) -> LoadOutcome {
        // an empty file keeps the placeholder line
        if loaded == 0
            && let Some(line) = self.state.document_lines.first().cloned()
        {
            self.emit(&[Notification::LineParsed(line)]);
        }
        let line_count = self.state.lines.line_count();
        info!(target: "engine.load", line_count, "load_finished");
        self.emit(&[Notification::FinishedParsing { line_count }]);
        LoadOutcome::Loaded { line_count }
    }

    fn cancelled(&self, lines_loaded: usize) -> LoadOutcome {
        info!(target: "engine.load", lines_loaded, "load_cancelled");
        LoadOutcome::Cancelled { lines_loaded }
    }
}
