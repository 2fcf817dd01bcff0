use std::sync::{Arc, Mutex};

use subtitler::file_intake::DEFAULT_LABEL;
use subtitler::{
    ClientConfig, Controller, DragGesture, DragStage, Error, ErrorKind, JobRequest, Language,
    Result, SelectedFile, ServiceResponse, SubmissionState, SubmitOutcome, TranscriptionOptions,
    Transport, ViewState,
};

const ORIGIN: &str = "http://localhost:8000";
const SUCCESS_BODY: &str =
    r#"{"status":"success","video_url":"/v/1.mp4","transcript_url":"/t/1.json"}"#;

#[derive(Clone, Copy)]
enum Reply {
    Respond(u16, &'static str),
    /// Never answers the first request, then responds like `Respond`.
    HangFirst(u16, &'static str),
    Refuse,
}

/// In-process transport that records every job it is handed.
#[derive(Clone)]
struct FakeTransport {
    reply: Reply,
    calls: Arc<Mutex<Vec<JobRequest>>>,
}

impl FakeTransport {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> Vec<JobRequest> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Transport for FakeTransport {
    async fn post_transcribe(&self, request: JobRequest) -> Result<ServiceResponse> {
        let first = {
            let mut calls = self.calls.lock().expect("calls lock");
            calls.push(request);
            calls.len() == 1
        };
        match self.reply {
            Reply::Respond(status, body) => Ok(ServiceResponse::new(status, body)),
            Reply::HangFirst(status, body) => {
                if first {
                    std::future::pending::<()>().await;
                }
                Ok(ServiceResponse::new(status, body))
            }
            Reply::Refuse => Err(Error::Transport("connection refused".into())),
        }
    }

    async fn get(&self, _path: &str) -> Result<ServiceResponse> {
        Ok(ServiceResponse::new(404, ""))
    }
}

#[derive(Default)]
struct NoopGesture;

impl DragGesture for NoopGesture {
    fn prevent_default(&mut self) {}
    fn stop_propagation(&mut self) {}
}

fn setup(reply: Reply) -> (Controller<FakeTransport>, FakeTransport) {
    let transport = FakeTransport::new(reply);
    let config = ClientConfig::new(ORIGIN).expect("valid origin");
    (Controller::with_transport(config, transport.clone()), transport)
}

fn clip(name: &str) -> SelectedFile {
    SelectedFile::new(name, b"not really a video".to_vec(), "video/mp4")
}

#[tokio::test]
async fn submit_without_file_stays_on_form_and_sends_nothing() {
    let (mut controller, transport) = setup(Reply::Respond(200, SUCCESS_BODY));

    let outcome = controller.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Rejected(Error::NoFileSelected)));
    assert_eq!(controller.view_state(), ViewState::Form);
    assert_eq!(controller.submission_state(), SubmissionState::Idle);
    assert_eq!(controller.notice(), Some("Please select a video file first."));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn successful_submit_goes_through_progress_to_result() -> anyhow::Result<()> {
    let (mut controller, transport) = setup(Reply::Respond(200, SUCCESS_BODY));
    controller.choose_files(vec![clip("ep1.mp4")]);

    let pending = controller.begin_submit()?;
    assert_eq!(controller.view_state(), ViewState::Submitting);
    assert_eq!(
        controller.view().visible_panel().id(),
        subtitler::ViewStateMachine::PROGRESS_PANEL
    );

    let outcome = pending.send(controller.transport()).await;
    let outcome = controller.complete_submit(outcome);

    let result = match outcome {
        SubmitOutcome::Succeeded(result) => result,
        other => panic!("expected success, got {other:?}"),
    };
    assert_eq!(result.video_location().as_str(), format!("{ORIGIN}/v/1.mp4"));
    assert_eq!(
        result.transcript_location().as_str(),
        format!("{ORIGIN}/t/1.json")
    );

    assert_eq!(controller.view_state(), ViewState::Result);
    assert_eq!(controller.job_result(), Some(&result));
    assert_eq!(
        controller.result_panel().download_link.as_ref(),
        Some(result.transcript_location())
    );
    assert_eq!(controller.submission_state(), SubmissionState::Idle);
    assert!(controller.notice().is_none());
    assert_eq!(transport.calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn non_success_status_restores_form_and_keeps_selection() {
    let (mut controller, transport) = setup(Reply::Respond(500, SUCCESS_BODY));
    controller.choose_files(vec![clip("ep1.mp4")]);

    let outcome = controller.submit().await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed(Error::Service { status: 500 })
    ));
    assert_eq!(controller.view_state(), ViewState::Form);
    assert_eq!(controller.selection(), Some(&clip("ep1.mp4")));
    assert_eq!(
        controller.notice(),
        Some("Submission failed: service responded with HTTP 500")
    );
    assert!(controller.job_result().is_none());
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn transport_failure_restores_form_with_detail() {
    let (mut controller, _transport) = setup(Reply::Refuse);
    controller.choose_files(vec![clip("ep1.mp4")]);

    let outcome = controller.submit().await;

    let err = outcome.error().expect("expected an error");
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(controller.view_state(), ViewState::Form);
    assert!(controller.selection().is_some());
    let notice = controller.notice().expect("notice surfaced");
    assert!(notice.starts_with("Submission failed"));
    assert!(notice.contains("connection refused"));
}

#[tokio::test]
async fn success_status_with_unparseable_body_is_a_failure() {
    let (mut controller, _transport) = setup(Reply::Respond(200, r#"{"video_url":"/v"}"#));
    controller.choose_files(vec![clip("ep1.mp4")]);

    let outcome = controller.submit().await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed(Error::MalformedResponse(_))
    ));
    assert_eq!(controller.view_state(), ViewState::Form);
    assert!(controller.selection().is_some());
}

#[tokio::test]
async fn failed_attempt_can_be_resubmitted_without_reselecting() {
    let (mut controller, transport) = setup(Reply::Respond(503, ""));
    controller.choose_files(vec![clip("ep1.mp4")]);

    assert!(!controller.submit().await.is_success());
    assert!(!controller.submit().await.is_success());

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.video().name() == "ep1.mp4"));
}

#[tokio::test]
async fn payload_carries_selection_and_options() {
    let (mut controller, transport) = setup(Reply::Respond(200, SUCCESS_BODY));
    controller.choose_files(vec![clip("ep1.mp4")]);
    controller.set_language(Language::Zh);
    controller.set_whisper_prompt("Bikini Bottom");
    controller.set_post_processing(false);
    controller.set_post_processing_prompt("fix names");

    controller.submit().await;

    let calls = transport.calls();
    let request = calls.first().expect("one request");
    assert_eq!(request.video().name(), "ep1.mp4");
    assert_eq!(
        request.text_fields(),
        vec![
            ("language", "zh".to_string()),
            ("whisper_prompt", "Bikini Bottom".to_string()),
            ("post_processing", "false".to_string()),
            ("post_processing_prompt", "fix names".to_string()),
        ]
    );
}

#[test]
fn second_submit_while_in_flight_is_rejected() -> anyhow::Result<()> {
    let (mut controller, transport) = setup(Reply::Respond(200, SUCCESS_BODY));
    controller.choose_files(vec![clip("ep1.mp4")]);

    let _pending = controller.begin_submit()?;
    let err = controller.begin_submit().unwrap_err();

    assert!(matches!(err, Error::SubmissionInFlight));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(controller.view_state(), ViewState::Submitting);
    assert!(transport.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn dropped_submit_returns_to_form_and_allows_resubmit() {
    let (mut controller, transport) = setup(Reply::HangFirst(200, SUCCESS_BODY));
    controller.choose_files(vec![clip("ep1.mp4")]);

    // Poll the submit once so it reaches the transport, then drop it.
    tokio::select! {
        biased;
        outcome = controller.submit() => panic!("hanging submit settled: {outcome:?}"),
        _ = std::future::ready(()) => {}
    }

    assert_eq!(transport.calls().len(), 1);
    assert_eq!(controller.view_state(), ViewState::Form);
    assert_eq!(controller.submission_state(), SubmissionState::Idle);
    assert_eq!(controller.selection(), Some(&clip("ep1.mp4")));
    assert_eq!(
        controller.notice(),
        Some("Submission failed: abandoned before the service answered")
    );

    assert!(controller.submit().await.is_success());
    assert_eq!(controller.view_state(), ViewState::Result);
    assert_eq!(transport.calls().len(), 2);
}

#[test]
fn abandoning_a_dropped_pending_job_reopens_the_form() -> anyhow::Result<()> {
    let (mut controller, _transport) = setup(Reply::Respond(200, SUCCESS_BODY));
    assert!(!controller.abandon_submit());
    controller.choose_files(vec![clip("ep1.mp4")]);

    drop(controller.begin_submit()?);
    assert!(matches!(
        controller.begin_submit().unwrap_err(),
        Error::SubmissionInFlight
    ));

    assert!(controller.abandon_submit());
    assert_eq!(controller.view_state(), ViewState::Form);
    assert_eq!(controller.submission_state(), SubmissionState::Idle);
    assert!(controller.selection().is_some());

    let _pending = controller.begin_submit()?;
    assert_eq!(controller.view_state(), ViewState::Submitting);
    Ok(())
}

#[tokio::test]
async fn in_flight_job_uses_selection_captured_at_submit() -> anyhow::Result<()> {
    let (mut controller, transport) = setup(Reply::Respond(500, ""));
    controller.choose_files(vec![clip("first.mp4")]);

    let pending = controller.begin_submit()?;
    controller.choose_files(vec![clip("second.mp4")]);
    assert_eq!(pending.request().video().name(), "first.mp4");

    let outcome = pending.send(controller.transport()).await;
    controller.complete_submit(outcome);

    assert_eq!(transport.calls()[0].video().name(), "first.mp4");
    assert_eq!(controller.selection().map(SelectedFile::name), Some("second.mp4"));
    Ok(())
}

#[test]
fn toggling_post_processing_twice_is_idempotent() {
    let (mut controller, _transport) = setup(Reply::Refuse);
    let before = controller.is_option_panel_visible();

    controller.set_post_processing(!before);
    assert_ne!(controller.is_option_panel_visible(), before);
    controller.set_post_processing(before);

    assert_eq!(controller.is_option_panel_visible(), before);
    assert_eq!(controller.options().post_processing_enabled, before);
}

#[tokio::test]
async fn back_from_result_resets_all_form_data() -> anyhow::Result<()> {
    let default_options = TranscriptionOptions {
        post_processing_enabled: false,
        ..TranscriptionOptions::default()
    };
    let config = ClientConfig::new(ORIGIN)?.with_default_options(default_options.clone());
    let mut controller =
        Controller::with_transport(config, FakeTransport::new(Reply::Respond(200, SUCCESS_BODY)));
    let initial = controller.session().clone();
    assert!(!controller.is_option_panel_visible());

    let mut gesture = NoopGesture;
    controller.handle_drag(DragStage::Enter, &mut gesture);
    controller.handle_drag(DragStage::Drop(vec![clip("dropped.mkv")]), &mut gesture);
    controller.set_post_processing(true);
    controller.set_whisper_prompt("names");
    assert!(controller.session().intake().is_file_present());

    assert!(controller.submit().await.is_success());
    controller.back()?;

    assert_eq!(controller.view_state(), ViewState::Form);
    assert!(controller.selection().is_none());
    assert_eq!(controller.label(), DEFAULT_LABEL);
    assert!(!controller.session().intake().is_file_present());
    assert!(!controller.is_option_panel_visible());
    assert_eq!(controller.options(), &default_options);
    assert_eq!(controller.session(), &initial);
    assert!(controller.job_result().is_none());
    Ok(())
}

#[test]
fn back_is_only_accepted_from_result() {
    let (mut controller, _transport) = setup(Reply::Refuse);
    controller.choose_files(vec![clip("ep1.mp4")]);

    let err = controller.back().unwrap_err();

    assert!(matches!(err, Error::InvalidTransition { event: "back", .. }));
    assert!(controller.selection().is_some());
}

#[test]
fn drag_ending_in_leave_changes_no_data() {
    let (mut controller, _transport) = setup(Reply::Refuse);
    controller.choose_files(vec![clip("kept.mp4")]);
    let before = controller.session().clone();
    let mut gesture = NoopGesture;

    controller.handle_drag(DragStage::Enter, &mut gesture);
    controller.handle_drag(DragStage::Over, &mut gesture);
    controller.handle_drag(DragStage::Leave, &mut gesture);

    assert!(!controller.session().intake().is_drag_active());
    assert_eq!(controller.session(), &before);
}
