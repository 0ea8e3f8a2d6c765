//! Counter feature: the observable model and the fact service it calls.

mod model;
mod service;

pub use model::{CounterModel, Fact, FetchOutcome, FetchSettings, DEFAULT_FETCH_DELAY};
pub use service::{FactError, FactService, NumbersApiClient};
