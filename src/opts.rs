use crate::language::Language;

/// Options that control how the service transcribes a submitted file.
///
/// This struct is the form's *library-level* state, not CLI flags or widgets directly.
/// Frontends map user input into this type so that:
/// - the controller stays reusable outside a particular UI
/// - tests and batch tools can construct options programmatically
///
/// There is no lifecycle beyond the current form session; a reset replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionOptions {
    /// Spoken language of the media.
    pub language: Language,

    /// Prompt forwarded to Whisper to bias vocabulary and spelling. May be empty.
    pub whisper_prompt: String,

    /// Whether the service runs its LLM correction pass over the raw transcript.
    ///
    /// This is also the toggle that drives the post-processing options panel.
    pub post_processing_enabled: bool,

    /// Prompt for the correction pass. May be empty.
    pub post_processing_prompt: String,

    /// Burn-in font chosen by the user.
    ///
    /// Passed through untouched; `None` leaves the choice to the service.
    pub font: Option<String>,
}

impl Default for TranscriptionOptions {
    fn default() -> Self {
        Self {
            language: Language::En,
            whisper_prompt: String::new(),
            post_processing_enabled: true,
            post_processing_prompt: String::new(),
            font: None,
        }
    }
}
