pub mod types;
pub mod traits;
pub mod utils;
pub mod fetcher;
pub mod media;
pub mod formatter;
pub mod selector;
pub mod dedup;
pub mod relay;
pub mod sources;
pub mod publishers;

pub use types::*;
pub use traits::{ContentSource, Publisher};
pub use fetcher::Fetcher;
pub use formatter::{format_status, FormatError};
pub use selector::Selector;
pub use dedup::ForwardedSet;
pub use relay::Relay;
pub use sources::RedditSource;
pub use publishers::{DryRunPublisher, TwitterPublisher};
