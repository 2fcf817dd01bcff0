//! `subtitler`: a headless controller for a remote video transcription service.
//!
//! This crate provides:
//! - File intake from a picker or drag-and-drop
//! - Transcription options and the post-processing options panel
//! - A typed multipart payload and a single-attempt job submission
//! - A three-panel view state machine (form, progress, result)
//!
//! Decoding, voice separation, VAD, Whisper and subtitle burn-in all happen inside the service;
//! this crate only prepares the job, sends it, and tracks what the user should see.

// High-level API (most consumers should start here).
pub mod config;
pub mod controller;
pub mod opts;

// Form components.
pub mod file_intake;
pub mod language;
pub mod option_panel;
pub mod panel;
pub mod selected_file;

// Job submission and the service contract.
pub mod fonts;
pub mod job_result;
pub mod payload;
pub mod submission;
pub mod transport;

pub mod view_state;

mod error;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

pub use config::ClientConfig;
pub use controller::{Controller, FormSession, SubmitOutcome};
pub use error::{Error, ErrorKind, Result};
pub use file_intake::{DragGesture, DragStage, FileIntake};
pub use job_result::{JobResponse, JobResult};
pub use language::Language;
pub use opts::TranscriptionOptions;
pub use payload::JobRequest;
pub use selected_file::SelectedFile;
pub use submission::{JobSubmission, PendingJob, SubmissionState};
pub use transport::{ReqwestTransport, ServiceResponse, Transport};
pub use view_state::{ResultPanel, ViewState, ViewStateMachine};

#[cfg(feature = "logging")]
pub use logging::init as init_logging;
