use std::fmt;

use crate::app::error::ErrorCode;
use crate::domain::{AppState, FormStage, Item, ItemId, Source};

/// Addressable locations in [`AppState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatePath {
    FormStage,
    FormIsValid,
    FormErrorCode,
    Sources,
    Items,
    TransportErrorCode,
    UiSeenItemIds,
    UiActiveDetailItemId,
}

impl StatePath {
    pub fn as_str(self) -> &'static str {
        match self {
            StatePath::FormStage => "form.stage",
            StatePath::FormIsValid => "form.isValid",
            StatePath::FormErrorCode => "form.errorCode",
            StatePath::Sources => "sources",
            StatePath::Items => "items",
            StatePath::TransportErrorCode => "transportErrorCode",
            StatePath::UiSeenItemIds => "ui.seenItemIds",
            StatePath::UiActiveDetailItemId => "ui.activeDetailItemId",
        }
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single discrete write to the application state.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SetFormStage(FormStage),
    SetFormValid(bool),
    SetFormError(Option<ErrorCode>),
    SetTransportError(Option<ErrorCode>),
    /// Insert a source at the front of `sources`.
    PrependSource(Source),
    /// Insert items at the front of `items`, keeping their relative order.
    PrependItems(Vec<Item>),
    MarkSeen(ItemId),
    SetActiveDetail(Option<ItemId>),
}

impl Mutation {
    pub fn path(&self) -> StatePath {
        match self {
            Mutation::SetFormStage(_) => StatePath::FormStage,
            Mutation::SetFormValid(_) => StatePath::FormIsValid,
            Mutation::SetFormError(_) => StatePath::FormErrorCode,
            Mutation::SetTransportError(_) => StatePath::TransportErrorCode,
            Mutation::PrependSource(_) => StatePath::Sources,
            Mutation::PrependItems(_) => StatePath::Items,
            Mutation::MarkSeen(_) => StatePath::UiSeenItemIds,
            Mutation::SetActiveDetail(_) => StatePath::UiActiveDetailItemId,
        }
    }

    /// Write into `state`; false if the state already held this value.
    pub(super) fn apply_to(&self, state: &mut AppState) -> bool {
        match self {
            Mutation::SetFormStage(stage) => replace(&mut state.form.stage, *stage),
            Mutation::SetFormValid(valid) => replace(&mut state.form.is_valid, *valid),
            Mutation::SetFormError(code) => replace(&mut state.form.error_code, *code),
            Mutation::SetTransportError(code) => replace(&mut state.transport_error_code, *code),
            Mutation::PrependSource(source) => {
                state.sources.insert(0, source.clone());
                true
            }
            Mutation::PrependItems(items) => {
                if items.is_empty() {
                    return false;
                }
                let older = std::mem::take(&mut state.items);
                state.items = items.iter().cloned().chain(older).collect();
                true
            }
            Mutation::MarkSeen(id) => state.ui.seen_item_ids.insert(*id),
            Mutation::SetActiveDetail(id) => replace(&mut state.ui.active_detail_item_id, *id),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
