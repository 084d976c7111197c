use iced::{
    Color, ContentFit, Element, Length, Theme,
    widget::{Column, container, container::Style, image::Handle, opaque, stack, text},
};

use crate::models::{ImageRef, Prediction};

/// `label (87.1%)`
pub fn format_prediction(prediction: &Prediction) -> String {
    format!("{} ({:.1}%)", prediction.label, prediction.confidence * 100.0)
}

pub fn prediction_list<'a, Message>(predictions: &[Prediction]) -> Element<'a, Message>
where
    Message: 'a,
{
    Column::with_children(
        predictions
            .iter()
            .map(|prediction| text(format_prediction(prediction)).size(18).into()),
    )
    .spacing(4)
    .into()
}

pub fn thumbnail<'a, Message>(image: &ImageRef) -> Element<'a, Message>
where
    Message: 'a,
{
    iced::widget::image(Handle::from_path(image.path()))
        .width(Length::Fixed(200.0))
        .height(Length::Fixed(250.0))
        .content_fit(ContentFit::Cover)
        .into()
}

fn overlay_style(_theme: &Theme) -> Style {
    Style {
        background: Some(Color::from_rgba8(0, 0, 0, 0.67).into()),
        ..Style::default()
    }
}

/// Covers `content` with a dimmed, input-blocking layer while `loading`
pub fn loading_overlay<'a, Message>(
    content: impl Into<Element<'a, Message>>,
    loading: bool,
) -> Element<'a, Message>
where
    Message: 'a,
{
    if !loading {
        return content.into();
    }

    let overlay = container(text("Loading...").size(20).color(Color::WHITE))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(overlay_style);

    stack![content.into(), opaque(overlay)].into()
}
