//! Integration tests for the classify screen reducer.
//!
//! Tests cover:
//! - Model load success and failure
//! - Loading flag across classification success and failure
//! - Picker cancellation leaving state untouched
//! - Overlapping requests resolved by request token
//! - End-to-end failure when the picked file vanishes before it is read

mod common;

use std::sync::Arc;

use snaplabel::classify_image;
use snaplabel::core::{Alert, DisplayedResult};

use common::*;

fn finish(state: &mut ScreenState, token: RequestToken, outcome: ClassificationOutcome) -> Effect {
    state.update(Event::ClassificationFinished { token, outcome })
}

fn choose(state: &mut ScreenState, path: &str) -> RequestToken {
    match state.update(Event::ImageChosen(ImageRef::new(path))) {
        Effect::Classify { token, image } => {
            assert_eq!(image, ImageRef::new(path));
            token
        }
        other => panic!("expected a classify effect, got {:?}", other),
    }
}

#[test]
fn test_starts_loading_model() {
    let state = ScreenState::new();
    assert_eq!(state.phase(), Phase::LoadingModel);
    assert!(state.is_loading());
    assert!(state.displayed().is_none());
}

#[test]
fn test_model_load_success_becomes_idle() {
    let mut state = ScreenState::new();
    let effect = state.update(Event::ModelLoaded(Ok(())));

    assert_eq!(effect, Effect::None);
    assert_eq!(state.phase(), Phase::ReadyIdle);
    assert!(!state.is_loading());
    assert!(state.model_ready());
}

#[test]
fn test_model_load_failure_alerts_and_clears_loading() {
    let mut state = ScreenState::new();
    let effect = state.update(Event::ModelLoaded(Err("weights missing".to_string())));

    assert_eq!(effect, Effect::Alert(Alert::error("weights missing")));
    assert_eq!(state.phase(), Phase::ReadyIdle);
    assert!(!state.is_loading());
    assert!(!state.model_ready());
    assert_eq!(state.alert().map(|a| a.title.as_str()), Some("Error"));
}

#[test]
fn test_selection_ignored_while_model_loads() {
    let mut state = ScreenState::new();
    let effect = state.update(Event::ImageChosen(ImageRef::new("/early.jpg")));
    assert_eq!(effect, Effect::None);
    assert_eq!(state.phase(), Phase::LoadingModel);
}

#[test]
fn test_successful_classification() {
    let mut state = ready_state();

    let token = choose(&mut state, "/photos/cat.jpg");
    assert_eq!(state.phase(), Phase::Classifying);
    assert!(state.is_loading());
    assert_eq!(state.pending_image(), Some(&ImageRef::new("/photos/cat.jpg")));

    let effect = finish(&mut state, token, ClassificationOutcome::Success(cat_predictions()));

    assert_eq!(effect, Effect::None);
    assert_eq!(state.phase(), Phase::ReadyWithResult);
    assert!(!state.is_loading());
    assert_eq!(
        state.displayed(),
        Some(&DisplayedResult {
            image: ImageRef::new("/photos/cat.jpg"),
            predictions: cat_predictions(),
        })
    );
}

#[test]
fn test_failure_keeps_previous_result() {
    let mut state = ready_state();
    let first = choose(&mut state, "/photos/cat.jpg");
    finish(&mut state, first, ClassificationOutcome::Success(cat_predictions()));

    let second = choose(&mut state, "/photos/broken.jpg");
    assert!(state.is_loading());
    let effect = finish(
        &mut state,
        second,
        ClassificationOutcome::Failure {
            kind: ErrorKind::Format,
            detail: "not a valid JPEG image".to_string(),
        },
    );

    assert_eq!(effect, Effect::Alert(Alert::error("not a valid JPEG image")));
    assert_eq!(state.phase(), Phase::ReadyWithError);
    assert!(!state.is_loading());
    // Stale result stays visible, still paired with its own image
    let displayed = state.displayed().unwrap();
    assert_eq!(displayed.image, ImageRef::new("/photos/cat.jpg"));
    assert_eq!(displayed.predictions, cat_predictions());

    state.update(Event::AlertDismissed);
    assert!(state.alert().is_none());
}

#[test]
fn test_cancelled_pick_changes_nothing() {
    let mut state = ready_state();
    let before = format!("{:?}", state);

    let effect = state.update(Event::SelectionCancelled);

    assert_eq!(effect, Effect::None);
    assert_eq!(format!("{:?}", state), before);
    assert!(!state.is_loading());
    assert!(state.alert().is_none());
}

#[test]
fn test_overlapping_requests_latest_wins_when_older_finishes_last() {
    let mut state = ready_state();
    let cat = choose(&mut state, "/photos/cat.jpg");
    let dog = choose(&mut state, "/photos/dog.jpg");
    assert!(dog > cat);

    finish(&mut state, dog, ClassificationOutcome::Success(dog_predictions()));
    assert!(!state.is_loading());

    // Older request resolves afterwards and must not overwrite
    let effect = finish(&mut state, cat, ClassificationOutcome::Success(cat_predictions()));
    assert_eq!(effect, Effect::None);
    let displayed = state.displayed().unwrap();
    assert_eq!(displayed.image, ImageRef::new("/photos/dog.jpg"));
    assert_eq!(displayed.predictions, dog_predictions());
}

#[test]
fn test_overlapping_requests_stale_result_keeps_loading() {
    let mut state = ready_state();
    let cat = choose(&mut state, "/photos/cat.jpg");
    let dog = choose(&mut state, "/photos/dog.jpg");

    finish(
        &mut state,
        cat,
        ClassificationOutcome::Failure {
            kind: ErrorKind::Io,
            detail: "gone".to_string(),
        },
    );
    // Stale failure neither alerts nor ends the loading state
    assert!(state.is_loading());
    assert!(state.alert().is_none());
    assert_eq!(state.phase(), Phase::Classifying);

    finish(&mut state, dog, ClassificationOutcome::Success(dog_predictions()));
    assert!(!state.is_loading());
    assert_eq!(state.phase(), Phase::ReadyWithResult);
}

#[test]
fn test_duplicate_completion_is_ignored() {
    let mut state = ready_state();
    let token = choose(&mut state, "/photos/cat.jpg");
    finish(&mut state, token, ClassificationOutcome::Success(cat_predictions()));

    let effect = finish(
        &mut state,
        token,
        ClassificationOutcome::Failure {
            kind: ErrorKind::Model,
            detail: "late".to_string(),
        },
    );
    assert_eq!(effect, Effect::None);
    assert_eq!(state.phase(), Phase::ReadyWithResult);
}

#[tokio::test]
async fn test_deleted_file_surfaces_io_alert() -> anyhow::Result<()> {
    let img_file = create_test_jpeg(8, 8);
    let path = img_file.path().to_path_buf();
    let model: Arc<dyn Classifier> = FakeClassifier::new(cat_predictions());
    let mut state = ready_state();

    let (token, image) = match state.update(Event::ImageChosen(ImageRef::new(&path))) {
        Effect::Classify { token, image } => (token, image),
        other => panic!("expected a classify effect, got {:?}", other),
    };
    img_file.close()?;

    let outcome: ClassificationOutcome = classify_image(Some(model), image).await.into();
    assert!(matches!(
        outcome,
        ClassificationOutcome::Failure {
            kind: ErrorKind::Io,
            ..
        }
    ));

    let effect = finish(&mut state, token, outcome);
    assert!(matches!(effect, Effect::Alert(_)));
    assert!(!state.is_loading());
    assert_eq!(state.phase(), Phase::ReadyWithError);
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_success_with_real_file() -> anyhow::Result<()> {
    let img_file = create_test_jpeg(24, 24);
    let model: Arc<dyn Classifier> = FakeClassifier::new(cat_predictions());
    let mut state = ready_state();

    let (token, image) = match state.update(Event::ImageChosen(ImageRef::new(img_file.path()))) {
        Effect::Classify { token, image } => (token, image),
        other => panic!("expected a classify effect, got {:?}", other),
    };
    let outcome = classify_image(Some(model), image).await.into();
    finish(&mut state, token, outcome);

    assert_eq!(state.phase(), Phase::ReadyWithResult);
    assert_eq!(state.displayed().unwrap().predictions[0].label, "tabby cat");
    Ok(())
}
