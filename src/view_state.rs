//! Which of the three panels (form, progress, result) is on screen.

use reqwest::Url;
use tracing::debug;

use crate::job_result::JobResult;
use crate::panel::PanelHandle;
use crate::{Error, Result};

/// The visible panel. Exactly one is shown at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Form,
    Submitting,
    Result,
}

/// Fields of the result panel consumed by the surrounding UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPanel {
    pub video_source: Option<Url>,
    pub download_link: Option<Url>,
}

/// Owns the three panel handles and keeps them consistent with [`ViewState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewStateMachine {
    state: ViewState,
    form: PanelHandle,
    progress: PanelHandle,
    result: PanelHandle,
    result_fields: ResultPanel,
    job_result: Option<JobResult>,
}

impl ViewStateMachine {
    pub const FORM_PANEL: &'static str = "form";
    pub const PROGRESS_PANEL: &'static str = "progress";
    pub const RESULT_PANEL: &'static str = "result";

    pub fn new() -> Self {
        let mut view = Self {
            state: ViewState::Form,
            form: PanelHandle::new(Self::FORM_PANEL, false),
            progress: PanelHandle::new(Self::PROGRESS_PANEL, false),
            result: PanelHandle::new(Self::RESULT_PANEL, false),
            result_fields: ResultPanel::default(),
            job_result: None,
        };
        view.apply(ViewState::Form);
        view
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// `Form -> Submitting`.
    pub fn start_submitting(&mut self) -> Result<()> {
        self.require(ViewState::Form, "start_submitting")?;
        self.apply(ViewState::Submitting);
        Ok(())
    }

    /// `Submitting -> Result`, populating the result panel.
    pub fn succeed(&mut self, job_result: JobResult) -> Result<()> {
        self.require(ViewState::Submitting, "succeed")?;
        self.result_fields = ResultPanel {
            video_source: Some(job_result.video_location().clone()),
            download_link: Some(job_result.transcript_location().clone()),
        };
        self.job_result = Some(job_result);
        self.apply(ViewState::Result);
        Ok(())
    }

    /// `Submitting -> Form`.
    pub fn fail(&mut self) -> Result<()> {
        self.require(ViewState::Submitting, "fail")?;
        self.apply(ViewState::Form);
        Ok(())
    }

    /// `Result -> Form`, discarding the finished job.
    pub fn back(&mut self) -> Result<()> {
        self.require(ViewState::Result, "back")?;
        self.result_fields = ResultPanel::default();
        self.job_result = None;
        self.apply(ViewState::Form);
        Ok(())
    }

    pub fn job_result(&self) -> Option<&JobResult> {
        self.job_result.as_ref()
    }

    pub fn result_fields(&self) -> &ResultPanel {
        &self.result_fields
    }

    pub fn panels(&self) -> [&PanelHandle; 3] {
        [&self.form, &self.progress, &self.result]
    }

    /// The single panel currently shown.
    pub fn visible_panel(&self) -> &PanelHandle {
        match self.state {
            ViewState::Form => &self.form,
            ViewState::Submitting => &self.progress,
            ViewState::Result => &self.result,
        }
    }

    fn require(&self, expected: ViewState, event: &'static str) -> Result<()> {
        if self.state == expected {
            return Ok(());
        }
        Err(Error::InvalidTransition {
            from: self.state,
            event,
        })
    }

    fn apply(&mut self, next: ViewState) {
        debug!(from = ?self.state, to = ?next, "view transition");
        self.state = next;
        self.form.set_visible(next == ViewState::Form);
        self.progress.set_visible(next == ViewState::Submitting);
        self.result.set_visible(next == ViewState::Result);
    }
}

impl Default for ViewStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
