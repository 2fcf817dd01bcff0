//! Lifecycle of a single transcription job.
//!
//! A job moves `Idle -> Submitting -> {Succeeded, Failed} -> Idle`. The work is split in three
//! steps so an event loop stays responsive while the network exchange is pending:
//!
//! 1. [`JobSubmission::begin`] is synchronous. It checks preconditions, captures the payload and
//!    enters `Submitting`.
//! 2. [`PendingJob::send`] is the only suspension point. It borrows nothing from the submission.
//! 3. [`JobSubmission::settle`] records the outcome and returns to `Idle`.
//!
//! One attempt per submit: no retry, no timeout. A caller that drops a [`PendingJob`] before it
//! settles must call [`JobSubmission::abandon`], otherwise the submission stays in flight.

use tracing::{Instrument, Span, debug, info, info_span, warn};
use uuid::Uuid;

use crate::job_result::{JobResponse, JobResult};
use crate::opts::TranscriptionOptions;
use crate::payload::JobRequest;
use crate::selected_file::SelectedFile;
use crate::transport::{ServiceResponse, Transport};
use crate::{Error, Result};

/// Where the submission state machine currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Tracks the in-flight job, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSubmission {
    state: SubmissionState,
    last: Option<SubmissionState>,
}

/// A job that has entered `Submitting` and is ready to go on the wire.
#[derive(Debug)]
pub struct PendingJob {
    request: JobRequest,
    origin: String,
    span: Span,
}

impl JobSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Terminal state of the most recently settled job.
    pub fn last_outcome(&self) -> Option<SubmissionState> {
        self.last
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Validate and capture a job.
    ///
    /// Fails without any state change when no file is selected or another job is in flight.
    pub fn begin(
        &mut self,
        origin: &str,
        selection: Option<&SelectedFile>,
        options: &TranscriptionOptions,
    ) -> Result<PendingJob> {
        if self.is_in_flight() {
            warn!("submit rejected: a job is already in flight");
            return Err(Error::SubmissionInFlight);
        }

        let request = JobRequest::new(selection, options).inspect_err(|_| {
            warn!("submit rejected: no file selected");
        })?;

        let job_id = Uuid::new_v4();
        let span = info_span!("job", %job_id, file = request.video().name());
        span.in_scope(|| {
            info!(
                bytes = request.video().len(),
                language = request.options().language.code(),
                post_processing = request.options().post_processing_enabled,
                "submitting transcription job"
            );
        });

        self.state = SubmissionState::Submitting;
        Ok(PendingJob {
            request,
            origin: origin.to_string(),
            span,
        })
    }

    /// Record the outcome of the in-flight job and return to `Idle`.
    pub fn settle(&mut self, outcome: &Result<JobResult>) -> Result<()> {
        if !self.is_in_flight() {
            return Err(Error::msg("no submission in flight to settle"));
        }

        let terminal = match outcome {
            Ok(_) => SubmissionState::Succeeded,
            Err(_) => SubmissionState::Failed,
        };
        debug!(outcome = ?terminal, "submission settled");
        self.last = Some(terminal);
        self.state = SubmissionState::Idle;
        Ok(())
    }

    /// Give up on the in-flight job without waiting for an answer.
    ///
    /// Records `Failed` and returns to `Idle`. Returns `false` when nothing was in flight.
    pub fn abandon(&mut self) -> bool {
        if !self.is_in_flight() {
            return false;
        }

        warn!("in-flight submission abandoned");
        self.last = Some(SubmissionState::Failed);
        self.state = SubmissionState::Idle;
        true
    }
}

impl PendingJob {
    pub fn request(&self) -> &JobRequest {
        &self.request
    }

    /// Send the job and interpret the service's answer.
    pub async fn send<T>(self, transport: &T) -> Result<JobResult>
    where
        T: Transport,
    {
        let PendingJob {
            request,
            origin,
            span,
        } = self;

        async move {
            let outcome = match transport.post_transcribe(request).await {
                Ok(response) => interpret_response(&origin, &response),
                Err(err) => Err(err),
            };

            match &outcome {
                Ok(result) => info!(
                    video = %result.video_location(),
                    transcript = %result.transcript_location(),
                    "transcription job succeeded"
                ),
                Err(err) => warn!(error = %err, kind = ?err.kind(), "transcription job failed"),
            }
            outcome
        }
        .instrument(span)
        .await
    }
}

/// Turn a settled exchange into a [`JobResult`].
///
/// Any non-2xx status fails without looking at the body. A 2xx body must decode as
/// [`JobResponse`].
pub fn interpret_response(origin: &str, response: &ServiceResponse) -> Result<JobResult> {
    if !response.is_success() {
        return Err(Error::Service {
            status: response.status,
        });
    }

    let decoded = JobResponse::from_slice(&response.body)?;
    JobResult::resolve(origin, &decoded)
}
