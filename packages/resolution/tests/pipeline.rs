//! Integration tests for the batch pipeline.
//!
//! These run the full flow over the mocks: query classification, cache
//! consult, contained provider failures, extraction validation, and the
//! two output tables.

use std::time::Duration;

use resolution::testing::{sample_hit, MockChatModel, MockSearchProvider};
use resolution::{
    Confidence, EntitySearcher, QueryKind, Resolver, SearchCache, TemplateError, ERROR_SOURCE,
};
use tempfile::TempDir;

const EMAIL_TEMPLATE: &str = "Get me the email address of {company}";

fn rendered(entity: &str) -> String {
    EMAIL_TEMPLATE.replace("{company}", entity)
}

fn entities(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Resolver over mocks, zero pacing, cache in a temp dir.
fn resolver(
    provider: MockSearchProvider,
    model: MockChatModel,
    dir: &TempDir,
) -> Resolver<MockSearchProvider, MockChatModel> {
    Resolver::new(provider, model, SearchCache::new(dir.path())).with_pace(Duration::ZERO)
}

#[tokio::test]
async fn two_entity_batch_tabulates_valid_and_unparsable_answers() {
    let dir = TempDir::new().unwrap();
    let provider = MockSearchProvider::new()
        .with_hits(
            rendered("Acme Corp"),
            vec![sample_hit(1, "acme.com"), sample_hit(2, "example.com")],
        )
        .with_hits(
            rendered("Beta LLC"),
            vec![sample_hit(1, "beta.io"), sample_hit(2, "example.org")],
        );
    let model = MockChatModel::new()
        .with_response(
            r#"{"extracted_info": "contact@acme.com", "confidence": "HIGH", "source": "acme.com"}"#,
        )
        .with_response("Sorry, I was unable to determine anything useful here.");

    let output = resolver(provider, model, &dir)
        .run(&entities(&["Acme Corp", "Beta LLC"]), EMAIL_TEMPLATE)
        .await
        .unwrap();

    // Raw view: one row per hit, entity order preserved.
    assert_eq!(output.raw.len(), 4);
    assert_eq!(output.raw[0].entity, "Acme Corp");
    assert_eq!(output.raw[2].entity, "Beta LLC");

    // Processed view: one record per entity.
    assert_eq!(output.processed.len(), 2);
    assert_eq!(output.processed[0].extracted_info, "contact@acme.com");
    assert_eq!(output.processed[0].confidence, Confidence::High);
    assert!(output.processed[1].is_not_found());
}

#[tokio::test]
async fn provider_fault_on_one_entity_never_aborts_the_batch() {
    let dir = TempDir::new().unwrap();
    let provider = MockSearchProvider::new()
        .with_hits(rendered("Acme Corp"), vec![sample_hit(1, "acme.com")])
        .fail_query(rendered("Beta LLC"))
        .with_hits(rendered("Gamma Inc"), vec![sample_hit(1, "gamma.dev")]);
    let model = MockChatModel::new().with_default_response(
        r#"{"extracted_info": "something", "confidence": "MEDIUM", "source": "somewhere.com"}"#,
    );

    let output = resolver(provider, model, &dir)
        .run(&entities(&["Acme Corp", "Beta LLC", "Gamma Inc"]), EMAIL_TEMPLATE)
        .await
        .unwrap();

    // The faulted entity contributes zero raw rows but still gets a
    // processed record (extraction ran over its empty hit list).
    assert_eq!(output.raw.len(), 2);
    assert!(output.raw.iter().all(|r| r.entity != "Beta LLC"));
    assert_eq!(output.processed.len(), 3);
    assert_eq!(output.processed[1].entity, "Beta LLC");
}

#[tokio::test]
async fn cache_hit_run_yields_the_same_tables() {
    let dir = TempDir::new().unwrap();
    let names = entities(&["Acme Corp", "Beta LLC"]);

    let provider = MockSearchProvider::new()
        .with_hits(rendered("Acme Corp"), vec![sample_hit(1, "acme.com")])
        .with_hits(rendered("Beta LLC"), vec![sample_hit(1, "beta.io")]);
    let model = MockChatModel::new();
    let resolver = resolver(provider, model, &dir);

    let first = resolver.run(&names, EMAIL_TEMPLATE).await.unwrap();
    let second = resolver.run(&names, EMAIL_TEMPLATE).await.unwrap();

    assert_eq!(first.processed.len(), 2);
    assert_eq!(second.processed.len(), 2);
    assert_eq!(second.raw, first.raw);
}

#[tokio::test]
async fn provider_call_count_is_bounded_by_entity_count() {
    let dir = TempDir::new().unwrap();
    let names = entities(&["Acme Corp", "Beta LLC", "Gamma Inc"]);

    let provider = MockSearchProvider::new();
    let provider_probe = provider.clone();
    let model = MockChatModel::new();
    let model_probe = model.clone();

    let resolver = resolver(provider, model, &dir);
    resolver.run(&names, EMAIL_TEMPLATE).await.unwrap();
    assert_eq!(provider_probe.calls().len(), 3);
    assert_eq!(model_probe.calls().len(), 3);

    // Second run: searches all hit the cache, extraction still recomputes.
    resolver.run(&names, EMAIL_TEMPLATE).await.unwrap();
    assert_eq!(provider_probe.calls().len(), 3);
    assert_eq!(model_probe.calls().len(), 6);
}

#[tokio::test]
async fn malformed_template_fails_the_whole_run_up_front() {
    let dir = TempDir::new().unwrap();
    let provider = MockSearchProvider::new();
    let provider_probe = provider.clone();
    let resolver = resolver(provider, MockChatModel::new(), &dir);

    let err = resolver
        .run(&entities(&["Acme Corp"]), "Get me an email address")
        .await
        .unwrap_err();

    assert!(matches!(err, TemplateError::MissingPlaceholder { .. }));
    assert!(provider_probe.calls().is_empty());
}

#[tokio::test]
async fn model_fault_is_reported_as_the_error_sentinel_row() {
    let dir = TempDir::new().unwrap();
    let provider =
        MockSearchProvider::new().with_hits(rendered("Acme Corp"), vec![sample_hit(1, "acme.com")]);
    let model = MockChatModel::new().failing();

    let output = resolver(provider, model, &dir)
        .run(&entities(&["Acme Corp"]), EMAIL_TEMPLATE)
        .await
        .unwrap();

    assert_eq!(output.processed.len(), 1);
    assert_eq!(output.processed[0].source, ERROR_SOURCE);
    assert_eq!(output.processed[0].confidence, Confidence::Low);
}

#[tokio::test(start_paused = true)]
async fn default_pacing_sleeps_between_entities() {
    // With the clock paused, the default 6 s inter-entity sleeps advance
    // virtual time instantly; three entities cross two pacing gaps.
    let dir = TempDir::new().unwrap();
    let provider = MockSearchProvider::new();
    let model = MockChatModel::new();
    let resolver = Resolver::new(provider, model, SearchCache::new(dir.path()));

    let start = tokio::time::Instant::now();
    resolver
        .run(&entities(&["Acme Corp", "Beta LLC", "Gamma Inc"]), EMAIL_TEMPLATE)
        .await
        .unwrap();

    assert!(start.elapsed() >= Duration::from_secs(12));
}

#[tokio::test]
async fn search_many_flattens_hits_and_drops_zero_hit_entities() {
    let dir = TempDir::new().unwrap();
    let provider = MockSearchProvider::new()
        .with_hits(rendered("Acme Corp"), vec![sample_hit(1, "acme.com"), sample_hit(2, "example.com")]);
    let searcher = EntitySearcher::new(provider, SearchCache::new(dir.path()))
        .with_pace(Duration::ZERO);

    let rows = searcher
        .search_many(&entities(&["Acme Corp", "Beta LLC"]), EMAIL_TEMPLATE)
        .await
        .unwrap();

    // Beta LLC had no hits, so it contributes no rows.
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.entity == "Acme Corp"));
    assert_eq!(rows[0].query, rendered("Acme Corp"));
    assert_eq!((rows[0].position, rows[1].position), (1, 2));
}

#[tokio::test]
async fn error_marked_results_are_not_cached() {
    let dir = TempDir::new().unwrap();
    let provider = MockSearchProvider::new().fail_query(rendered("Acme Corp"));
    let provider_probe = provider.clone();
    let searcher = EntitySearcher::new(provider, SearchCache::new(dir.path()))
        .with_pace(Duration::ZERO);

    let first = searcher.search_one("Acme Corp", EMAIL_TEMPLATE).await.unwrap();
    assert!(first.error.is_some());
    assert!(first.results.is_empty());

    // A failed fetch leaves no slot behind, so the next run retries.
    let second = searcher.search_one("Acme Corp", EMAIL_TEMPLATE).await.unwrap();
    assert!(second.error.is_some());
    assert_eq!(provider_probe.calls().len(), 2);
}

#[tokio::test]
async fn query_kind_drives_cache_partitioning_across_templates() {
    let dir = TempDir::new().unwrap();
    let provider = MockSearchProvider::new();
    let provider_probe = provider.clone();
    let resolver = resolver(provider, MockChatModel::new(), &dir);
    let names = entities(&["Acme Corp"]);

    resolver.run(&names, EMAIL_TEMPLATE).await.unwrap();
    // Same kind, different wording: both classify as email, but the cache
    // key is (entity, kind), so the second run is a hit.
    resolver
        .run(&names, "email and phone contact for {company}")
        .await
        .unwrap();
    assert_eq!(provider_probe.calls().len(), 1);
    assert_eq!(
        QueryKind::from_template("email and phone contact for {company}"),
        QueryKind::Email
    );

    // A different kind misses and issues a fresh provider call.
    resolver
        .run(&names, "street address of {company}")
        .await
        .unwrap();
    assert_eq!(provider_probe.calls().len(), 2);
}
