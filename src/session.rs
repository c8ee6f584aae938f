//! Caller-owned analysis state.
//!
//! Holds the result of the most recent run. Each run replaces the previous
//! result wholesale; there is no incremental update across runs.

use crate::annotator::Annotator;
use crate::normalizer::FrequencyMap;
use crate::pipeline::{LemmaPipeline, PipelineError, Progress};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NotRun,
    Running,
    Completed(Arc<FrequencyMap>),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("An analysis is already running")]
    AlreadyRunning,
}

pub struct AnalysisSession {
    state: SessionState,
    cancel_token: Arc<AtomicBool>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::NotRun,
            cancel_token: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SessionState::Running)
    }

    /// The completed result, if the last run finished.
    pub fn result(&self) -> Option<Arc<FrequencyMap>> {
        match &self.state {
            SessionState::Completed(map) => Some(Arc::clone(map)),
            _ => None,
        }
    }

    /// Token that cancels the current run when set.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_token)
    }

    /// Enter `Running`, dropping any previous result.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.is_running() {
            return Err(SessionError::AlreadyRunning);
        }
        self.cancel_token.store(false, Ordering::SeqCst);
        self.state = SessionState::Running;
        Ok(())
    }

    /// Leave `Running`: `Completed` on success, `NotRun` on failure.
    pub fn finish(
        &mut self,
        outcome: Result<FrequencyMap, PipelineError>,
    ) -> Result<Arc<FrequencyMap>, PipelineError> {
        if !self.is_running() {
            log::warn!("finish() called without a running analysis");
        }
        match outcome {
            Ok(map) => {
                let map = Arc::new(map);
                self.state = SessionState::Completed(Arc::clone(&map));
                Ok(map)
            }
            Err(e) => {
                self.state = SessionState::NotRun;
                Err(e)
            }
        }
    }

    /// Run `pipeline` over `text` and store the outcome.
    pub fn run<A, F>(
        &mut self,
        pipeline: &LemmaPipeline,
        annotator: &A,
        text: &str,
        on_progress: F,
    ) -> Result<Arc<FrequencyMap>, SessionRunError>
    where
        A: Annotator + ?Sized,
        F: FnMut(Progress),
    {
        self.start()?;
        let token = self.cancel_handle();
        let outcome = pipeline.run_with_cancel(annotator, text, &token, on_progress);
        Ok(self.finish(outcome)?)
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionRunError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
