//! The multipart request sent to `POST /transcribe`.
//!
//! Field names live in [`fields`] and are only referenced through [`JobRequest`], so renaming one
//! shows up at every use site.

use reqwest::Body;
use reqwest::multipart::{Form, Part};

use crate::opts::TranscriptionOptions;
use crate::selected_file::SelectedFile;
use crate::{Error, Result};

/// Multipart field names understood by the service.
pub mod fields {
    pub const VIDEO: &str = "video";
    pub const LANGUAGE: &str = "language";
    pub const WHISPER_PROMPT: &str = "whisper_prompt";
    pub const POST_PROCESSING: &str = "post_processing";
    pub const POST_PROCESSING_PROMPT: &str = "post_processing_prompt";
    pub const FONT: &str = "font";
}

/// One transcription job, captured at the moment of submission.
///
/// Construction fails when no file is selected, so a `JobRequest` always carries media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    video: SelectedFile,
    options: TranscriptionOptions,
}

impl JobRequest {
    pub fn new(selection: Option<&SelectedFile>, options: &TranscriptionOptions) -> Result<Self> {
        let video = selection.cloned().ok_or(Error::NoFileSelected)?;
        Ok(Self {
            video,
            options: options.clone(),
        })
    }

    pub fn video(&self) -> &SelectedFile {
        &self.video
    }

    pub fn options(&self) -> &TranscriptionOptions {
        &self.options
    }

    /// The text fields of the payload, in wire order.
    ///
    /// `post_processing` is rendered as `"true"`/`"false"`. `font` is omitted when unset.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let opts = &self.options;
        let mut out = vec![
            (fields::LANGUAGE, opts.language.code().to_string()),
            (fields::WHISPER_PROMPT, opts.whisper_prompt.clone()),
            (
                fields::POST_PROCESSING,
                opts.post_processing_enabled.to_string(),
            ),
            (
                fields::POST_PROCESSING_PROMPT,
                opts.post_processing_prompt.clone(),
            ),
        ];
        if let Some(font) = &opts.font {
            out.push((fields::FONT, font.clone()));
        }
        out
    }

    /// Build the `reqwest` multipart form.
    ///
    /// The video part shares the selection's buffer rather than copying it.
    pub fn into_form(self) -> Result<Form> {
        let content = self.video.content().clone();
        let len = content.len() as u64;
        let video = Part::stream_with_length(Body::from(content), len)
            .file_name(self.video.name().to_string())
            .mime_str(self.video.media_type())
            .map_err(|err| {
                Error::msg(format!(
                    "invalid media type '{}': {err}",
                    self.video.media_type()
                ))
            })?;

        let form = self
            .text_fields()
            .into_iter()
            .fold(Form::new().part(fields::VIDEO, video), |form, (name, value)| {
                form.text(name, value)
            });

        Ok(form)
    }
}
