pub mod item;
pub mod source;
pub mod state;
pub mod time;

pub use item::Item;
pub use source::{Country, Source};
pub use state::SourceState;
