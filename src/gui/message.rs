use std::sync::Arc;

use crate::classification::Classifier;
use crate::gui::screens::{ScreenMessage, classify_page::ClassifyScreen};

/// Loaded classifier, cloneable so it can travel inside a message
#[derive(Clone)]
pub struct ModelHandle(pub Arc<dyn Classifier>);

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ModelHandle").field(&self.0.name()).finish()
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    ClassifyPage(ScreenMessage<ClassifyScreen>),
    ModelLoaded(Result<ModelHandle, String>),
}
