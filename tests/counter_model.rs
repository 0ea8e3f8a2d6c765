mod common;

use common::{model, settings, Reply, ScriptedService};
use counterfact::counter::{Fact, FetchOutcome, FetchSettings};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_count_is_net_sum_and_each_step_clears_fact() {
    let model = model(settings());
    for step in [1, 1, -1, 1, -1, -1, -1] {
        if step > 0 {
            model.increment();
        } else {
            model.decrement();
        }
        assert_eq!(model.fact(), None);
    }
    assert_eq!(model.count(), -1);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_sets_loading_immediately_and_clears_on_success() {
    let model = model(settings());
    let service = Arc::new(ScriptedService::new([Reply::Fact("0 is zero".into())]));

    let task = {
        let (model, service) = (Arc::clone(&model), Arc::clone(&service));
        tokio::spawn(async move { model.fetch_fact(service.as_ref()).await })
    };
    tokio::task::yield_now().await;
    assert!(model.fact_is_loading());
    assert_eq!(model.fact(), None);

    let outcome = task.await.expect("fetch task panicked");
    assert_eq!(outcome, FetchOutcome::Loaded(Fact::new("0 is zero")));
    assert!(!model.fact_is_loading());
    assert_eq!(model.fact().map(|f| f.text().to_string()), Some("0 is zero".into()));
}

#[tokio::test(start_paused = true)]
async fn test_fetch_waits_artificial_delay_before_request() {
    let model = model(settings());
    let service = Arc::new(ScriptedService::new([Reply::Fact("1 is one".into())]));

    let task = {
        let (model, service) = (Arc::clone(&model), Arc::clone(&service));
        tokio::spawn(async move { model.fetch_fact(service.as_ref()).await })
    };
    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(service.calls(), 0);

    task.await.expect("fetch task panicked");
    assert_eq!(service.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_clears_loading_and_leaves_no_fact() {
    let model = model(settings());
    let service = ScriptedService::new([Reply::Status(500)]);

    let outcome = model.fetch_fact(&service).await;

    assert_eq!(outcome, FetchOutcome::Failed);
    assert!(!model.fact_is_loading());
    assert_eq!(model.fact(), None);
}

#[tokio::test(start_paused = true)]
async fn test_empty_reply_counts_as_failure() {
    let model = model(settings());
    let service = ScriptedService::new([]);

    assert_eq!(model.fetch_fact(&service).await, FetchOutcome::Failed);
    assert!(!model.fact_is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_request_uses_count_at_request_time() {
    let model = model(settings());
    let service = Arc::new(ScriptedService::new([Reply::Fact("1 is one".into())]));

    let task = {
        let (model, service) = (Arc::clone(&model), Arc::clone(&service));
        tokio::spawn(async move { model.fetch_fact(service.as_ref()).await })
    };
    tokio::time::sleep(Duration::from_millis(200)).await;
    model.increment();

    task.await.expect("fetch task panicked");
    assert_eq!(service.requests(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn test_second_fetch_during_delay_supersedes_first() {
    let model = model(settings());
    let service = Arc::new(ScriptedService::new([Reply::Fact("only".into())]));

    let spawn_fetch = || {
        let (model, service) = (Arc::clone(&model), Arc::clone(&service));
        tokio::spawn(async move { model.fetch_fact(service.as_ref()).await })
    };
    let first = spawn_fetch();
    tokio::time::sleep(Duration::from_millis(300)).await;
    let second = spawn_fetch();

    assert_eq!(first.await.expect("first panicked"), FetchOutcome::Superseded);
    assert_eq!(
        second.await.expect("second panicked"),
        FetchOutcome::Loaded(Fact::new("only"))
    );
    assert_eq!(service.calls(), 1);
    assert!(!model.fact_is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_superseded_response_never_overwrites_newer_fact() {
    let model = model(settings());
    let service = Arc::new(ScriptedService::new([
        Reply::Delayed(Duration::from_secs(5), "stale".into()),
        Reply::Fact("fresh".into()),
    ]));

    let spawn_fetch = || {
        let (model, service) = (Arc::clone(&model), Arc::clone(&service));
        tokio::spawn(async move { model.fetch_fact(service.as_ref()).await })
    };
    let first = spawn_fetch();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(service.calls(), 1);
    let second = spawn_fetch();

    assert_eq!(
        second.await.expect("second panicked"),
        FetchOutcome::Loaded(Fact::new("fresh"))
    );
    assert_eq!(first.await.expect("first panicked"), FetchOutcome::Superseded);
    assert_eq!(model.fact(), Some(Fact::new("fresh")));
    assert!(!model.fact_is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_aborted_fetch_clears_loading() {
    let model = model(settings());
    let service = Arc::new(ScriptedService::new([Reply::Fact("never".into())]));

    let task = {
        let (model, service) = (Arc::clone(&model), Arc::clone(&service));
        tokio::spawn(async move { model.fetch_fact(service.as_ref()).await })
    };
    tokio::task::yield_now().await;
    assert!(model.fact_is_loading());

    task.abort();
    assert!(task.await.is_err_and(|err| err.is_cancelled()));
    assert!(!model.fact_is_loading());
    assert_eq!(model.fact(), None);
    assert_eq!(service.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_auto_dismiss_clears_fact_after_delay() {
    let model = model(FetchSettings {
        auto_dismiss: Some(Duration::from_secs(4)),
        ..settings()
    });
    let service = Arc::new(ScriptedService::new([Reply::Fact("2 is even".into())]));

    let task = {
        let (model, service) = (Arc::clone(&model), Arc::clone(&service));
        tokio::spawn(async move { model.fetch_fact(service.as_ref()).await })
    };
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(model.fact(), Some(Fact::new("2 is even")));
    assert!(!model.fact_is_loading());

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(model.fact(), None);
    assert_eq!(
        task.await.expect("fetch task panicked"),
        FetchOutcome::Loaded(Fact::new("2 is even"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_auto_dismiss_leaves_newer_fact_alone() {
    let model = model(FetchSettings {
        auto_dismiss: Some(Duration::from_secs(4)),
        ..settings()
    });
    let service = Arc::new(ScriptedService::new([
        Reply::Fact("first".into()),
        Reply::Fact("second".into()),
    ]));

    let spawn_fetch = || {
        let (model, service) = (Arc::clone(&model), Arc::clone(&service));
        tokio::spawn(async move { model.fetch_fact(service.as_ref()).await })
    };
    let first = spawn_fetch();
    tokio::time::sleep(Duration::from_millis(3500)).await;
    let _second = spawn_fetch();

    first.await.expect("first panicked");
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(model.fact(), Some(Fact::new("second")));
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_fact_hides_loaded_fact() {
    let model = model(settings());
    let service = ScriptedService::new([Reply::Fact("3 is prime".into())]);
    model.fetch_fact(&service).await;

    assert!(model.dismiss_fact());
    assert_eq!(model.fact(), None);
    assert!(!model.dismiss_fact());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_fetches_on_worker_threads_settle_consistently() {
    let model = model(FetchSettings {
        delay: Duration::from_millis(200),
        ..settings()
    });
    let service = Arc::new(ScriptedService::new(
        (0..32).map(|i| Reply::Fact(format!("fact {i}"))),
    ));

    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let (model, service) = (Arc::clone(&model), Arc::clone(&service));
            tokio::spawn(async move { model.fetch_fact(service.as_ref()).await })
        })
        .collect();

    let mut loaded = Vec::new();
    for task in tasks {
        if let FetchOutcome::Loaded(fact) = task.await.expect("fetch task panicked") {
            loaded.push(fact);
        }
    }

    assert!(!model.fact_is_loading());
    assert_eq!(service.calls(), 1);
    assert_eq!(loaded.len(), 1, "only the newest fetch may show its fact");
    assert_eq!(model.fact(), loaded.pop());
}
