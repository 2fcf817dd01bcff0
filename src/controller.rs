//! High-level controller wiring file intake, options, submission and the view together.
//!
//! We expose a single entry point (`Controller`) that an embedding UI drives with discrete
//! events: files chosen, drag stages, option changes, submit and back. Each event handler runs
//! synchronously; the network exchange inside [`Controller::submit`] is the only await.
//!
//! Callers that need to keep processing events while a job is on the wire can use the split
//! form: [`Controller::begin_submit`], [`PendingJob::send`], [`Controller::complete_submit`].
//! A pending job dropped before it settles is released with [`Controller::abandon_submit`];
//! [`Controller::submit`] does this itself when its future is dropped.

use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::file_intake::{DragGesture, DragStage, FileIntake};
use crate::job_result::JobResult;
use crate::language::Language;
use crate::option_panel::OptionPanel;
use crate::opts::TranscriptionOptions;
use crate::selected_file::SelectedFile;
use crate::submission::{JobSubmission, PendingJob, SubmissionState};
use crate::transport::{ReqwestTransport, Transport};
use crate::view_state::{ResultPanel, ViewState, ViewStateMachine};
use crate::{Error, Result};

/// Form data owned by the user's current session.
///
/// A reset assigns [`FormSession::initial`] wholesale, so every field returns to its loaded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSession {
    intake: FileIntake,
    options: TranscriptionOptions,
    option_panel: OptionPanel,
}

impl FormSession {
    pub fn initial(config: &ClientConfig) -> Self {
        let options = config.default_options.clone();
        Self {
            intake: FileIntake::new(config.default_label.clone()),
            option_panel: OptionPanel::new(options.post_processing_enabled),
            options,
        }
    }

    pub fn intake(&self) -> &FileIntake {
        &self.intake
    }

    pub fn options(&self) -> &TranscriptionOptions {
        &self.options
    }

    pub fn option_panel(&self) -> &OptionPanel {
        &self.option_panel
    }
}

/// What a submit attempt came to.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Refused before anything went on the wire (no file, job already in flight, or wrong view).
    Rejected(Error),
    Succeeded(JobResult),
    Failed(Error),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded(_))
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            SubmitOutcome::Rejected(err) | SubmitOutcome::Failed(err) => Some(err),
            SubmitOutcome::Succeeded(_) => None,
        }
    }
}

/// The transcription form controller.
///
/// `Controller` owns every piece of UI state:
/// - the form session (selection, options, option panel)
/// - the submission state machine
/// - the panel view state
/// - the message currently surfaced to the user
///
/// The transport is pluggable so tests can substitute a fake.
pub struct Controller<T: Transport = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
    session: FormSession,
    submission: JobSubmission,
    view: ViewStateMachine,
    notice: Option<String>,
}

impl Controller<ReqwestTransport> {
    /// Create a controller that talks to the service over HTTP.
    pub fn connect(config: ClientConfig) -> Self {
        let transport = ReqwestTransport::new(config.clone());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Controller<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let session = FormSession::initial(&config);
        Self {
            config,
            transport,
            session,
            submission: JobSubmission::new(),
            view: ViewStateMachine::new(),
            notice: None,
        }
    }

    /// Files chosen through the native picker.
    pub fn choose_files(&mut self, files: Vec<SelectedFile>) -> Option<&SelectedFile> {
        self.session.intake.choose(files)
    }

    /// One stage of a drag gesture over the drop zone.
    pub fn handle_drag<E>(&mut self, stage: DragStage, event: &mut E) -> Option<&SelectedFile>
    where
        E: DragGesture + ?Sized,
    {
        self.session.intake.handle_drag(stage, event)
    }

    /// Post-processing toggle changed.
    pub fn set_post_processing(&mut self, enabled: bool) {
        self.session.options.post_processing_enabled = enabled;
        self.session.option_panel.set_visibility(enabled);
    }

    pub fn set_language(&mut self, language: Language) {
        self.session.options.language = language;
    }

    pub fn set_whisper_prompt(&mut self, prompt: impl Into<String>) {
        self.session.options.whisper_prompt = prompt.into();
    }

    pub fn set_post_processing_prompt(&mut self, prompt: impl Into<String>) {
        self.session.options.post_processing_prompt = prompt.into();
    }

    pub fn set_font(&mut self, font: Option<String>) {
        self.session.options.font = font;
    }

    /// Submit the current selection and options, waiting for the service to answer.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let pending = match self.begin_submit() {
            Ok(pending) => pending,
            Err(err) => return SubmitOutcome::Rejected(err),
        };

        let mut in_flight = InFlight {
            controller: self,
            settled: false,
        };
        let outcome = pending.send(&in_flight.controller.transport).await;
        in_flight.settled = true;
        in_flight.controller.complete_submit(outcome)
    }

    /// Validate, capture the job and switch to the progress panel.
    ///
    /// On error the form stays visible and the error's message is surfaced.
    pub fn begin_submit(&mut self) -> Result<PendingJob> {
        if self.view.state() == ViewState::Result {
            return Err(Error::InvalidTransition {
                from: ViewState::Result,
                event: "submit",
            });
        }

        self.notice = None;
        let pending = self
            .submission
            .begin(
                self.config.service_origin(),
                self.session.intake.selection(),
                &self.session.options,
            )
            .inspect_err(|err| self.notice = Some(err.user_message()))?;

        // Not in flight and not on the result panel, so the form is showing.
        self.view.start_submitting()?;
        Ok(pending)
    }

    /// Apply the result of [`PendingJob::send`].
    ///
    /// Success moves to the result panel. Failure restores the form with the selection intact and
    /// an error message surfaced.
    pub fn complete_submit(&mut self, outcome: Result<JobResult>) -> SubmitOutcome {
        if let Err(err) = self.submission.settle(&outcome) {
            return SubmitOutcome::Rejected(err);
        }

        match outcome {
            Ok(job_result) => match self.view.succeed(job_result.clone()) {
                Ok(()) => SubmitOutcome::Succeeded(job_result),
                Err(err) => SubmitOutcome::Failed(err),
            },
            Err(err) => {
                if let Err(view_err) = self.view.fail() {
                    debug!(error = %view_err, "view already left the progress panel");
                }
                self.notice = Some(err.user_message());
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Give up on the job in flight and return to the form with the selection intact.
    ///
    /// Returns `false` when nothing was in flight.
    pub fn abandon_submit(&mut self) -> bool {
        if !self.submission.abandon() {
            return false;
        }

        if let Err(err) = self.view.fail() {
            debug!(error = %err, "view already left the progress panel");
        }
        self.notice = Some(Error::SubmissionAbandoned.user_message());
        true
    }

    /// "Back" from the result panel: show the form and reset all form data.
    pub fn back(&mut self) -> Result<()> {
        self.view.back()?;
        self.session = FormSession::initial(&self.config);
        self.notice = None;
        info!("form reset");
        Ok(())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    pub fn selection(&self) -> Option<&SelectedFile> {
        self.session.intake.selection()
    }

    pub fn label(&self) -> &str {
        self.session.intake.label()
    }

    pub fn options(&self) -> &TranscriptionOptions {
        &self.session.options
    }

    pub fn is_option_panel_visible(&self) -> bool {
        self.session.option_panel.is_visible()
    }

    pub fn view_state(&self) -> ViewState {
        self.view.state()
    }

    pub fn view(&self) -> &ViewStateMachine {
        &self.view
    }

    pub fn result_panel(&self) -> &ResultPanel {
        self.view.result_fields()
    }

    pub fn job_result(&self) -> Option<&JobResult> {
        self.view.job_result()
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission.state()
    }

    /// Message currently surfaced to the user, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

/// Releases the controller if a [`Controller::submit`] future is dropped before it settles.
struct InFlight<'a, T: Transport> {
    controller: &'a mut Controller<T>,
    settled: bool,
}

impl<T: Transport> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            self.controller.abandon_submit();
        }
    }
}
