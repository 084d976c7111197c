use std::convert::Infallible;

use iced::{
    Alignment::Center,
    Element, Length, Task,
    widget::{button, column, container, text},
};
use rfd::{AsyncMessageDialog, MessageButtons, MessageLevel};

use crate::core::{Alert, ClassificationOutcome, Effect, Event, RequestToken, ScreenState};
use crate::gui::{
    AppState,
    screens::{Screen, ScreenMessage},
    widgets::{loading_overlay, prediction_list, thumbnail},
};
use crate::models::ImageRef;
use crate::pipeline::classify_image;
use crate::source::{ImageSource, SourceKind};

#[derive(Debug, Clone, Default)]
pub struct ClassifyScreen {
    state: ScreenState,
}

#[derive(Debug, Clone)]
pub enum ClassifyMessage {
    Pick(SourceKind),
    Acquired(Option<ImageRef>),
    ModelLoaded(Result<(), String>),
    Finished {
        token: RequestToken,
        outcome: ClassificationOutcome,
    },
    AlertDismissed,
}

impl Screen for ClassifyScreen {
    type Message = ClassifyMessage;
    type ParentMessage = Infallible;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let ready = !self.state.is_loading();
        let pick = |kind| ready.then_some(ScreenMessage::ScreenMessage(ClassifyMessage::Pick(kind)));

        let mut content = column![
            text("SnapLabel").size(32),
            button(text("Choose from library"))
                .width(Length::Fill)
                .padding(10)
                .on_press_maybe(pick(SourceKind::Library)),
            button(text("Capture photo"))
                .width(Length::Fill)
                .padding(10)
                .on_press_maybe(pick(SourceKind::Camera)),
        ]
        .spacing(20)
        .padding(20)
        .max_width(420.0)
        .align_x(Center);

        if let Some(result) = self.state.displayed() {
            content = content
                .push(prediction_list(&result.predictions))
                .push(thumbnail(&result.image));
        }

        loading_overlay(
            container(content)
                .center_x(Length::Fill)
                .center_y(Length::Fill),
            self.state.is_loading(),
        )
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        let event = match route(message) {
            Route::Acquire(SourceKind::Library) => {
                return Task::perform(state.library.clone().acquire(), |image| {
                    ScreenMessage::ScreenMessage(ClassifyMessage::Acquired(image))
                });
            }
            Route::Acquire(SourceKind::Camera) => {
                return Task::perform(state.camera.clone().acquire(), |image| {
                    ScreenMessage::ScreenMessage(ClassifyMessage::Acquired(image))
                });
            }
            Route::Reduce(event) => event,
        };

        match self.state.update(event) {
            Effect::None => Task::none(),
            Effect::Classify { token, image } => {
                Task::perform(classify_image(state.model.clone(), image), move |result| {
                    ScreenMessage::ScreenMessage(ClassifyMessage::Finished {
                        token,
                        outcome: result.into(),
                    })
                })
            }
            Effect::Alert(alert) => Task::perform(show_alert(alert), |_| {
                ScreenMessage::ScreenMessage(ClassifyMessage::AlertDismissed)
            }),
        }
    }
}

/// Where a screen message goes: out to an image source, or into the reducer
#[derive(Debug)]
enum Route {
    Acquire(SourceKind),
    Reduce(Event),
}

fn route(message: ClassifyMessage) -> Route {
    let event = match message {
        ClassifyMessage::Pick(kind) => return Route::Acquire(kind),
        ClassifyMessage::Acquired(Some(image)) => Event::ImageChosen(image),
        ClassifyMessage::Acquired(None) => Event::SelectionCancelled,
        ClassifyMessage::ModelLoaded(result) => Event::ModelLoaded(result),
        ClassifyMessage::Finished { token, outcome } => {
            Event::ClassificationFinished { token, outcome }
        }
        ClassifyMessage::AlertDismissed => Event::AlertDismissed,
    };
    Route::Reduce(event)
}

async fn show_alert(alert: Alert) {
    AsyncMessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(alert.title)
        .set_description(alert.detail)
        .set_buttons(MessageButtons::Ok)
        .show()
        .await;
}
