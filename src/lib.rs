pub mod api;
pub mod card;
pub mod card_details;
pub mod config;
pub mod diff;
pub mod error;
pub mod expansions;
pub mod gatherer_controller;
pub mod listing;
pub mod markup;
pub mod output;
pub mod prompt;
pub mod sql;

pub use api::{Catalog, Fetcher, HttpFetcher};
pub use card::{Card, CardSet};
pub use config::{Args, Config, WritePolicy};
pub use error::{Error, FetchError};
pub use gatherer_controller::{run, RunReport};
pub use output::{OutputWriter, SkipReason, WriteOutcome};
pub use prompt::{ConflictPrompt, InquirePrompt};
