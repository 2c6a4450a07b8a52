use std::collections::HashSet;
use std::sync::Arc;

use burrow_core::{ReadRepository, ShortCode, ShortenParams, Shortener, ShortenerError};
use burrow_generator::{RandomGenerator, ALPHABET};
use burrow_shortener::ShortenerService;
use burrow_storage::RedbRepository;
use tempfile::TempDir;

type RedbShortener = ShortenerService<RedbRepository, RandomGenerator>;

fn start() -> (TempDir, Arc<RedbShortener>) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let repo = RedbRepository::open(dir.path().join("urls.db")).expect("open store");
    let service = ShortenerService::new(repo, RandomGenerator::default());
    (dir, Arc::new(service))
}

fn params(url: String, custom: Option<&str>) -> ShortenParams {
    ShortenParams {
        original_url: url,
        custom_code: custom.map(|c| ShortCode::new(c).unwrap()),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_generated_codes_are_distinct_and_resolvable() {
    let (_dir, service) = start();
    let mut handles = Vec::with_capacity(1000);

    for i in 0..1000 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            let url = format!("https://example.com/{i}");
            let code = service.shorten(params(url.clone(), None)).await.unwrap();
            (code, url)
        }));
    }

    let mut assigned = Vec::with_capacity(1000);
    for handle in handles {
        assigned.push(handle.await.unwrap());
    }

    let codes: HashSet<&ShortCode> = assigned.iter().map(|(code, _)| code).collect();
    assert_eq!(codes.len(), 1000);

    for (code, url) in &assigned {
        assert_eq!(code.as_str().len(), 6);
        assert!(code.as_str().bytes().all(|b| ALPHABET.contains(&b)));
        assert_eq!(&service.repository().get(code).await.unwrap(), url);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_claims_of_one_custom_code_have_one_winner() {
    let (_dir, service) = start();
    let mut handles = vec![];

    for i in 0..16 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service
                .shorten(params(format!("https://example{i}.com"), Some("docs")))
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(code) => {
                assert_eq!(code.as_str(), "docs");
                winners += 1;
            }
            Err(ShortenerError::CodeTaken(code)) => assert_eq!(code, "docs"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(service.stats(&ShortCode::new_unchecked("docs")).await.unwrap().hits, 0);
}
