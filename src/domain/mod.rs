pub mod item;
pub mod source;
pub mod state;

pub use item::{Entry, Item, ItemId};
pub use source::{Source, SourceId};
pub use state::{AppState, FormStage, FormState, UiState};
