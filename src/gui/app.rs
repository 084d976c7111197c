use iced::{Element, Task};

use super::{AppState, Message, ModelHandle};
use crate::classification::{ModelConfig, load_model};
use crate::gui::screens::{Screen, ScreenMessage, classify_page::{ClassifyMessage, ClassifyScreen}};
use crate::source::CameraCapture;

/// Startup configuration for the desktop app
#[derive(Debug, Clone, Default)]
pub struct GuiConfig {
    pub model: ModelConfig,
    pub capture_command: Option<String>,
}

pub struct SnapLabelApp {
    state: AppState,
    screen: ClassifyScreen,
}

impl SnapLabelApp {
    fn new(model_config: ModelConfig, camera: CameraCapture) -> (Self, Task<Message>) {
        let load = Task::perform(load_model(model_config), |result| {
            Message::ModelLoaded(result.map(ModelHandle).map_err(|e| e.to_string()))
        });
        (
            Self {
                state: AppState::new(camera),
                screen: ClassifyScreen::default(),
            },
            load,
        )
    }

    fn title(&self) -> String {
        "SnapLabel - On-device Photo Classifier".to_string()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ModelLoaded(result) => {
                let result = match result {
                    Ok(ModelHandle(model)) => {
                        self.state.model = Some(model);
                        Ok(())
                    }
                    Err(detail) => {
                        tracing::error!("Model failed to load: {}", detail);
                        Err(detail)
                    }
                };
                self.screen
                    .update(ClassifyMessage::ModelLoaded(result), &mut self.state)
                    .map(Message::ClassifyPage)
            }
            Message::ClassifyPage(ScreenMessage::ScreenMessage(msg)) => self
                .screen
                .update(msg, &mut self.state)
                .map(Message::ClassifyPage),
            Message::ClassifyPage(ScreenMessage::ParentMessage(never)) => match never {},
        }
    }

    fn view(&self) -> Element<'_, Message> {
        self.screen.view().map(Message::ClassifyPage)
    }
}

/// Open the window and block until it is closed
pub fn run(config: GuiConfig) -> anyhow::Result<()> {
    let camera = CameraCapture::new(config.capture_command.clone())?;
    if !camera.is_configured() {
        tracing::warn!("No capture command available, \"Capture photo\" will not return images");
    }
    let model_config = config.model;

    iced::application(
        move || SnapLabelApp::new(model_config.clone(), camera.clone()),
        SnapLabelApp::update,
        SnapLabelApp::view,
    )
    .title(SnapLabelApp::title)
    .window_size((420.0, 720.0))
    .centered()
    .run()?;

    Ok(())
}
