pub mod state;

pub use state::{
    Alert, ClassificationOutcome, DisplayedResult, Effect, Event, Phase, RequestToken, ScreenState,
};
