mod app;
mod message;
mod state;
mod screens;
mod widgets;

pub use app::{GuiConfig, SnapLabelApp, run};
pub use message::{Message, ModelHandle};
pub use state::AppState;
