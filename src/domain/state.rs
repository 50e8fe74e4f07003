use std::collections::HashSet;

use serde::Serialize;

use crate::app::error::ErrorCode;
use crate::domain::{Item, ItemId, Source, SourceId};

/// Stage of the address-submission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStage {
    #[default]
    Idle,
    Sending,
    Added,
    Failed,
}

impl FormStage {
    /// Stage that entering `self` immediately moves on to, if any.
    pub fn on_enter(self) -> Option<FormStage> {
        match self {
            FormStage::Added => Some(FormStage::Idle),
            FormStage::Idle | FormStage::Sending | FormStage::Failed => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormStage::Idle => "idle",
            FormStage::Sending => "sending",
            FormStage::Added => "added",
            FormStage::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub stage: FormStage,
    pub is_valid: bool,
    pub error_code: Option<ErrorCode>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            stage: FormStage::Idle,
            is_valid: true,
            error_code: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub seen_item_ids: HashSet<ItemId>,
    pub active_detail_item_id: Option<ItemId>,
}

/// The whole application state. Sources and items are kept newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub form: FormState,
    pub sources: Vec<Source>,
    pub items: Vec<Item>,
    pub transport_error_code: Option<ErrorCode>,
    pub ui: UiState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn addresses(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.address.clone()).collect()
    }

    pub fn items_for_source<'a>(
        &'a self,
        source_id: &'a SourceId,
    ) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |i| &i.source_id == source_id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn active_item(&self) -> Option<&Item> {
        self.ui.active_detail_item_id.and_then(|id| self.item(id))
    }

    pub fn is_seen(&self, id: ItemId) -> bool {
        self.ui.seen_item_ids.contains(&id)
    }
}
