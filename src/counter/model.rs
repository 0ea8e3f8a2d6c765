//! Observable counter model.

use std::time::Duration;

use parking_lot::Mutex;

use crate::config::{FactsConfig, UiConfig};
use crate::observation::{Animation, Registrar, Tracked, Transaction};

use super::service::FactService;

/// Artificial latency before the fact request is sent.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_secs(1);

/// A fact about a number. Its identity is its text, so the same fact
/// fetched twice is the same displayable item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fact {
    text: String,
}

impl Fact {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn id(&self) -> &str {
        &self.text
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Timing of the fetch-fact action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    pub delay: Duration,
    /// Clear the fact this long after it appeared.
    pub auto_dismiss: Option<Duration>,
    /// Animation for fact changes; `None` applies them immediately.
    pub animation: Option<Animation>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            delay: DEFAULT_FETCH_DELAY,
            auto_dismiss: None,
            animation: Some(Animation::default()),
        }
    }
}

impl FetchSettings {
    pub fn from_config(facts: &FactsConfig, ui: &UiConfig) -> Self {
        Self {
            delay: Duration::from_millis(facts.fetch_delay_ms),
            auto_dismiss: facts.auto_dismiss_ms.map(Duration::from_millis),
            animation: Some(Animation::new(Duration::from_millis(ui.animation_ms))),
        }
    }
}

/// How a call to [`CounterModel::fetch_fact`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(Fact),
    /// The service failed; the error was logged and dropped.
    Failed,
    /// A newer fetch started before this one finished.
    Superseded,
}

/// Counter with an asynchronously loaded fact about its value.
pub struct CounterModel {
    registrar: Registrar,
    count: Tracked<i64>,
    fact: Tracked<Option<Fact>>,
    fact_is_loading: Tracked<bool>,
    /// Generation of the newest fetch. Held while a fetch checks it and
    /// writes, so a superseded fetch cannot interleave a stale write.
    flight: Mutex<u64>,
    settings: FetchSettings,
}

impl Default for CounterModel {
    fn default() -> Self {
        Self::new(FetchSettings::default())
    }
}

impl std::fmt::Debug for CounterModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterModel")
            .field("count", &self.count)
            .field("fact", &self.fact)
            .field("fact_is_loading", &self.fact_is_loading)
            .finish()
    }
}

impl CounterModel {
    pub fn new(settings: FetchSettings) -> Self {
        let registrar = Registrar::new();
        Self {
            count: Tracked::new(&registrar, "count", 0),
            fact: Tracked::new(&registrar, "fact", None),
            fact_is_loading: Tracked::new(&registrar, "fact_is_loading", false),
            registrar,
            flight: Mutex::new(0),
            settings,
        }
    }

    pub fn registrar(&self) -> &Registrar {
        &self.registrar
    }

    pub fn settings(&self) -> FetchSettings {
        self.settings
    }

    pub fn count(&self) -> i64 {
        self.count.get()
    }

    pub fn fact(&self) -> Option<Fact> {
        self.fact.get()
    }

    pub fn fact_is_loading(&self) -> bool {
        self.fact_is_loading.get()
    }

    /// Loading state without recording the read.
    pub fn fact_is_loading_untracked(&self) -> bool {
        self.fact_is_loading.get_untracked()
    }

    pub fn increment(&self) {
        self.registrar.mutate(Transaction::immediate(), || {
            self.count.update(|count| *count += 1);
            self.fact.set(None);
        });
    }

    pub fn decrement(&self) {
        self.registrar.mutate(Transaction::immediate(), || {
            self.count.update(|count| *count -= 1);
            self.fact.set(None);
        });
    }

    /// Hide the current fact, animated. Returns false if none was shown.
    pub fn dismiss_fact(&self) -> bool {
        if self.fact.with_untracked(Option::is_none) {
            return false;
        }
        let transaction = Transaction::with_animation(self.settings.animation);
        self.registrar.mutate(transaction, || self.fact.set(None));
        true
    }

    /// Clear the fact, load a new one for the current count, and show it.
    ///
    /// Starting a fetch supersedes any fetch still in flight: the older one
    /// never writes the model again. `fact_is_loading` is cleared on every
    /// exit path, including the future being dropped, unless a newer fetch
    /// owns it by then.
    pub async fn fetch_fact<S>(&self, service: &S) -> FetchOutcome
    where
        S: FactService + ?Sized,
    {
        let transaction = Transaction::with_animation(self.settings.animation);
        let flight = {
            let mut newest = self.flight.lock();
            *newest += 1;
            self.registrar.mutate(transaction, || {
                self.fact.set(None);
                self.fact_is_loading.set(true);
            });
            *newest
        };
        let loading = scopeguard::guard((), |_| {
            self.if_current(flight, || self.fact_is_loading.set(false));
        });

        tokio::time::sleep(self.settings.delay).await;
        if !self.is_current(flight) {
            return FetchOutcome::Superseded;
        }

        let count = self.count.get_untracked();
        tracing::info!(count, flight, "Fetching fact");
        let fact = match service.fetch(count).await {
            Ok(text) => Fact::new(text),
            Err(err) => {
                tracing::warn!(count, error = %err, "Fact fetch failed");
                return if self.is_current(flight) {
                    FetchOutcome::Failed
                } else {
                    FetchOutcome::Superseded
                };
            }
        };
        let shown = self.if_current(flight, || {
            self.registrar
                .mutate(transaction, || self.fact.set(Some(fact.clone())));
        });
        if !shown {
            return FetchOutcome::Superseded;
        }
        drop(loading);

        if let Some(after) = self.settings.auto_dismiss {
            tokio::time::sleep(after).await;
            self.if_current(flight, || {
                let still_shown = self
                    .fact
                    .with_untracked(|current| current.as_ref() == Some(&fact));
                if still_shown {
                    tracing::debug!(count, "Auto-dismissing fact");
                    self.registrar.mutate(transaction, || self.fact.set(None));
                }
            });
        }

        FetchOutcome::Loaded(fact)
    }

    fn is_current(&self, flight: u64) -> bool {
        *self.flight.lock() == flight
    }

    /// Run `write` only while `flight` is the newest fetch, holding the
    /// flight lock across the check and the write.
    fn if_current(&self, flight: u64, write: impl FnOnce()) -> bool {
        let newest = self.flight.lock();
        if *newest != flight {
            return false;
        }
        write();
        true
    }

    #[cfg(test)]
    pub(crate) fn set_fact_for_test(&self, fact: Option<Fact>, loading: bool) {
        self.registrar.mutate(Transaction::immediate(), || {
            self.fact.set(fact);
            self.fact_is_loading.set(loading);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::FactError;
    use async_trait::async_trait;

    struct Fixed(&'static str);

    #[async_trait]
    impl FactService for Fixed {
        async fn fetch(&self, number: i64) -> Result<String, FactError> {
            Ok(format!("{number} {}", self.0))
        }
    }

    fn instant() -> FetchSettings {
        FetchSettings {
            delay: Duration::ZERO,
            auto_dismiss: None,
            animation: None,
        }
    }

    #[test]
    fn increment_and_decrement_clear_fact() {
        let model = CounterModel::new(instant());
        model.fact.set(Some(Fact::new("old")));
        model.increment();
        assert_eq!(model.count(), 1);
        assert_eq!(model.fact(), None);

        model.fact.set(Some(Fact::new("old")));
        model.decrement();
        model.decrement();
        assert_eq!(model.count(), -1);
        assert_eq!(model.fact(), None);
    }

    #[tokio::test]
    async fn superseded_flight_cannot_write() {
        let model = CounterModel::new(instant());
        model.fetch_fact(&Fixed("first")).await;
        let stale = *model.flight.lock();
        model.fetch_fact(&Fixed("second")).await;

        let mut wrote = false;
        assert!(!model.if_current(stale, || wrote = true));
        assert!(!wrote);
        assert!(model.if_current(stale + 1, || wrote = true));
        assert!(wrote);
        assert_eq!(model.fact(), Some(Fact::new("0 second")));
    }

    #[test]
    fn model_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CounterModel>();
    }

    #[test]
    fn dismiss_clears_only_a_shown_fact() {
        let model = CounterModel::new(instant());
        assert!(!model.dismiss_fact());

        model.fact.set(Some(Fact::new("3 is prime")));
        assert!(model.dismiss_fact());
        assert_eq!(model.fact(), None);
    }

    #[test]
    fn fact_identity_is_its_text() {
        let a = Fact::new("7 is lucky");
        let b = Fact::new("7 is lucky");
        assert_eq!(a.id(), b.id());
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn fetch_sets_fact_for_current_count() {
        let model = CounterModel::new(instant());
        model.increment();
        model.increment();

        let outcome = model.fetch_fact(&Fixed("is even")).await;

        assert_eq!(outcome, FetchOutcome::Loaded(Fact::new("2 is even")));
        assert_eq!(model.fact(), Some(Fact::new("2 is even")));
        assert!(!model.fact_is_loading());
    }

    #[test]
    fn settings_follow_config() {
        let facts = FactsConfig {
            fetch_delay_ms: 250,
            auto_dismiss_ms: Some(4000),
            ..FactsConfig::default()
        };
        let ui = UiConfig {
            animation_ms: 120,
            ..UiConfig::default()
        };
        let settings = FetchSettings::from_config(&facts, &ui);
        assert_eq!(settings.delay, Duration::from_millis(250));
        assert_eq!(settings.auto_dismiss, Some(Duration::from_secs(4)));
        assert_eq!(
            settings.animation,
            Some(Animation::new(Duration::from_millis(120)))
        );
    }
}
