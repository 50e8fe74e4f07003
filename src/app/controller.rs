//! User-initiated flows: submitting an address and opening an item.

use tracing::{debug, info, warn};

use crate::app::context::AppContext;
use crate::app::error::{ErrorCode, FeedwatchError, Result, ValidationError};
use crate::domain::{AppState, FormStage, Item, ItemId, Source};
use crate::extractor::ExtractedFeed;
use crate::pipeline::merge_new;
use crate::store::Mutation;
use crate::validator::validate;

/// Submit an address and start background polling after the first success.
pub async fn add_source(ctx: &AppContext, input: &str) -> Result<Source> {
    let source = submit(ctx, input).await?;
    ctx.ensure_polling();
    Ok(source)
}

/// Submit an address: validate it, fetch it once, and register it.
///
/// On failure the form is marked failed with the matching code and no
/// source or item is added.
pub async fn submit(ctx: &AppContext, input: &str) -> Result<Source> {
    ctx.store.apply_all([
        Mutation::SetFormStage(FormStage::Sending),
        Mutation::SetTransportError(None),
    ]);

    let outcome = fetch_candidate(ctx, input)
        .await
        .and_then(|(address, feed)| register(ctx, &address, feed));

    match outcome {
        Ok(source) => {
            info!("Added source {}", source.address);
            Ok(source)
        }
        Err(e) => {
            fail(ctx, &e);
            Err(e)
        }
    }
}

async fn fetch_candidate(ctx: &AppContext, input: &str) -> Result<(String, ExtractedFeed)> {
    let existing = ctx.store.read(AppState::addresses);
    let address = validate(input, &existing)?;
    let feed = ctx.pipeline.fetch_feed(&address).await?;
    Ok((address, feed))
}

fn register(ctx: &AppContext, address: &str, feed: ExtractedFeed) -> Result<Source> {
    ctx.store.update(|store| {
        // Another submission may have registered the address while this one was fetching
        if store.state().sources.iter().any(|s| s.address == address) {
            return Err(FeedwatchError::from(ValidationError::Duplicate));
        }

        let source = feed.meta.into_source();
        let items: Vec<Item> = feed
            .entries
            .into_iter()
            .map(|entry| entry.into_item(source.id.clone()))
            .collect();
        let fresh = merge_new(store.state().items_for_source(&source.id), &items);

        store.apply(Mutation::PrependSource(source.clone()));
        store.apply(Mutation::PrependItems(fresh));
        store.apply(Mutation::SetFormValid(true));
        store.apply(Mutation::SetFormError(None));
        store.apply(Mutation::SetFormStage(FormStage::Added));
        Ok(source)
    })
}

fn fail(ctx: &AppContext, err: &FeedwatchError) {
    let code = err.code();
    match code {
        Some(c) if c.is_acquisition() => warn!("Failed to add source: {}", err),
        _ => debug!("Rejected submission: {}", err),
    }

    let mut mutations = vec![Mutation::SetFormValid(false)];
    if let Some(c) = code.filter(|c| c.is_acquisition()) {
        mutations.push(Mutation::SetTransportError(Some(c)));
    }
    mutations.push(Mutation::SetFormError(code));
    mutations.push(Mutation::SetFormStage(FormStage::Failed));
    ctx.store.apply_all(mutations);
}

/// Mark an item as seen and show it as the active detail.
pub fn open_item(ctx: &AppContext, id: ItemId) -> Result<()> {
    ctx.store.update(|store| {
        if store.state().item(id).is_none() {
            return Err(FeedwatchError::ItemNotFound(id.to_string()));
        }
        store.apply(Mutation::MarkSeen(id));
        store.apply(Mutation::SetActiveDetail(Some(id)));
        Ok(())
    })
}

/// Current user-facing failure, network and parsing problems first.
pub fn current_error(state: &AppState) -> Option<ErrorCode> {
    state.transport_error_code.or(state.form.error_code)
}
