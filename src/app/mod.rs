pub mod context;
pub mod error;
pub mod service;

pub use context::AppContext;
pub use error::{BroadsheetError, Result};
pub use service::{FilterOptions, NewsService};
