//! Presentation state for the classify screen as an explicit reducer.
//!
//! Every transition goes through [`ScreenState::update`], which returns the
//! side effect the UI layer has to perform. Each classification request gets a
//! [`RequestToken`]; a finished request is only applied when its token is the
//! latest one issued, so an older, slower request can never overwrite a newer
//! result.

use crate::error::{ClassifyError, ErrorKind};
use crate::models::{ImageRef, Prediction};

pub const ALERT_TITLE: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LoadingModel,
    ReadyIdle,
    Classifying,
    ReadyWithResult,
    ReadyWithError,
}

/// Sequence number of a classification request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(pub u64);

/// Result of one classification attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    Success(Vec<Prediction>),
    Failure { kind: ErrorKind, detail: String },
}

impl From<Result<Vec<Prediction>, ClassifyError>> for ClassificationOutcome {
    fn from(result: Result<Vec<Prediction>, ClassifyError>) -> Self {
        match result {
            Ok(predictions) => ClassificationOutcome::Success(predictions),
            Err(e) => ClassificationOutcome::Failure {
                kind: e.kind(),
                detail: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub detail: String,
}

impl Alert {
    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            title: ALERT_TITLE.to_string(),
            detail: detail.into(),
        }
    }
}

/// Predictions together with the image that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedResult {
    pub image: ImageRef,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone)]
pub enum Event {
    /// Model load finished; the error carries the raw detail
    ModelLoaded(Result<(), String>),
    ImageChosen(ImageRef),
    SelectionCancelled,
    ClassificationFinished {
        token: RequestToken,
        outcome: ClassificationOutcome,
    },
    AlertDismissed,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Classify { token: RequestToken, image: ImageRef },
    Alert(Alert),
}

#[derive(Debug, Clone)]
pub struct ScreenState {
    phase: Phase,
    loading: bool,
    model_ready: bool,
    latest_token: RequestToken,
    in_flight: Option<(RequestToken, ImageRef)>,
    displayed: Option<DisplayedResult>,
    alert: Option<Alert>,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            phase: Phase::LoadingModel,
            loading: true,
            model_ready: false,
            latest_token: RequestToken::default(),
            in_flight: None,
            displayed: None,
            alert: None,
        }
    }
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn model_ready(&self) -> bool {
        self.model_ready
    }

    pub fn displayed(&self) -> Option<&DisplayedResult> {
        self.displayed.as_ref()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Image currently being classified, if any
    pub fn pending_image(&self) -> Option<&ImageRef> {
        self.in_flight.as_ref().map(|(_, image)| image)
    }

    pub fn latest_token(&self) -> RequestToken {
        self.latest_token
    }

    pub fn update(&mut self, event: Event) -> Effect {
        match event {
            Event::ModelLoaded(result) => {
                if self.phase != Phase::LoadingModel {
                    return Effect::None;
                }
                self.phase = Phase::ReadyIdle;
                self.loading = false;
                match result {
                    Ok(()) => {
                        self.model_ready = true;
                        Effect::None
                    }
                    Err(detail) => self.raise(detail),
                }
            }
            Event::ImageChosen(image) => {
                if self.phase == Phase::LoadingModel {
                    tracing::debug!("Ignoring image selection while the model is loading");
                    return Effect::None;
                }
                self.latest_token = RequestToken(self.latest_token.0 + 1);
                let token = self.latest_token;
                self.in_flight = Some((token, image.clone()));
                self.phase = Phase::Classifying;
                self.loading = true;
                Effect::Classify { token, image }
            }
            Event::SelectionCancelled => Effect::None,
            Event::ClassificationFinished { token, outcome } => {
                let image = match self.in_flight.take() {
                    Some((current, image)) if current == token => image,
                    other => {
                        tracing::debug!("Discarding stale classification result {:?}", token);
                        self.in_flight = other;
                        return Effect::None;
                    }
                };
                self.loading = false;
                match outcome {
                    ClassificationOutcome::Success(predictions) => {
                        tracing::info!("{} predictions for {}", predictions.len(), image);
                        self.displayed = Some(DisplayedResult { image, predictions });
                        self.phase = Phase::ReadyWithResult;
                        Effect::None
                    }
                    ClassificationOutcome::Failure { kind, detail } => {
                        tracing::warn!("Classification of {} failed ({}): {}", image, kind, detail);
                        self.phase = Phase::ReadyWithError;
                        self.raise(detail)
                    }
                }
            }
            Event::AlertDismissed => {
                self.alert = None;
                Effect::None
            }
        }
    }

    fn raise(&mut self, detail: String) -> Effect {
        let alert = Alert::error(detail);
        self.alert = Some(alert.clone());
        Effect::Alert(alert)
    }
}
