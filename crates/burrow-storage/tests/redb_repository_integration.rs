use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use burrow_core::ShortCode;
use burrow_storage::{ReadRepository, RedbRepository, Repository, StorageError};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    path: PathBuf,
    repo: RedbRepository,
}

impl Fixture {
    fn start() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("data").join("urls.db");
        let repo = RedbRepository::open(&path).expect("open store");

        Self {
            _dir: dir,
            path,
            repo,
        }
    }

    /// Drops the current handle and opens the same file again.
    fn reopen(self) -> Self {
        let Fixture { _dir, path, repo } = self;
        drop(repo);
        let repo = RedbRepository::open(&path).expect("reopen store");
        Self { _dir, path, repo }
    }
}

fn code(value: &str) -> ShortCode {
    ShortCode::new_unchecked(value)
}

#[tokio::test]
async fn unsaved_code_is_absent() {
    let fixture = Fixture::start();

    assert!(!fixture.repo.exists(&code("abc123")).await.unwrap());
    let err = fixture.repo.get(&code("abc123")).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
    assert_eq!(fixture.repo.hits(&code("abc123")).await.unwrap(), 0);
}

#[tokio::test]
async fn save_then_resolve_counts_one_hit() {
    let fixture = Fixture::start();
    let short_code = code("abc123");

    fixture
        .repo
        .save(&short_code, "https://example.com")
        .await
        .unwrap();

    assert!(fixture.repo.exists(&short_code).await.unwrap());
    assert_eq!(
        fixture.repo.get(&short_code).await.unwrap(),
        "https://example.com"
    );
    assert_eq!(fixture.repo.hits(&short_code).await.unwrap(), 0);

    fixture.repo.get(&short_code).await.unwrap();
    fixture.repo.increment_hit(&short_code).await.unwrap();

    assert_eq!(fixture.repo.hits(&short_code).await.unwrap(), 1);
}

#[tokio::test]
async fn save_overwrites_existing_mapping() {
    let fixture = Fixture::start();
    let short_code = code("abc123");

    fixture
        .repo
        .save(&short_code, "https://one.example")
        .await
        .unwrap();
    fixture
        .repo
        .save(&short_code, "https://two.example")
        .await
        .unwrap();

    assert_eq!(
        fixture.repo.get(&short_code).await.unwrap(),
        "https://two.example"
    );
}

#[tokio::test]
async fn insert_conflicts_when_code_already_exists() {
    let fixture = Fixture::start();
    let short_code = code("abc123");

    fixture
        .repo
        .insert(&short_code, "https://one.example")
        .await
        .unwrap();

    let err = fixture
        .repo
        .insert(&short_code, "https://two.example")
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));
    assert_eq!(
        fixture.repo.get(&short_code).await.unwrap(),
        "https://one.example"
    );
}

#[tokio::test]
async fn same_url_under_two_codes_is_independent() {
    let fixture = Fixture::start();

    fixture
        .repo
        .save(&code("first"), "https://example.com")
        .await
        .unwrap();
    fixture
        .repo
        .save(&code("second"), "https://example.com")
        .await
        .unwrap();
    fixture.repo.increment_hit(&code("first")).await.unwrap();
    fixture.repo.increment_hit(&code("first")).await.unwrap();

    assert_eq!(fixture.repo.hits(&code("first")).await.unwrap(), 2);
    assert_eq!(fixture.repo.hits(&code("second")).await.unwrap(), 0);
    assert_eq!(
        fixture.repo.get(&code("second")).await.unwrap(),
        "https://example.com"
    );
}

#[tokio::test]
async fn data_survives_reopen() {
    let fixture = Fixture::start();
    let short_code = code("keep-me");

    fixture
        .repo
        .insert(&short_code, "https://example.com/long/path?q=1")
        .await
        .unwrap();
    fixture.repo.increment_hit(&short_code).await.unwrap();
    fixture.repo.increment_hit(&short_code).await.unwrap();

    let fixture = fixture.reopen();

    assert_eq!(
        fixture.repo.get(&short_code).await.unwrap(),
        "https://example.com/long/path?q=1"
    );
    assert_eq!(fixture.repo.hits(&short_code).await.unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_increments_are_not_lost() {
    let fixture = Fixture::start();
    let repo = Arc::new(fixture.repo.clone());
    let short_code = code("hot");
    let mut handles = vec![];

    for _ in 0..200 {
        let repo = Arc::clone(&repo);
        let short_code = short_code.clone();
        handles.push(tokio::spawn(async move {
            repo.increment_hit(&short_code).await.unwrap()
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        seen.insert(handle.await.unwrap());
    }

    // Every increment observed a distinct post-increment value.
    assert_eq!(seen.len(), 200);
    assert_eq!(repo.hits(&short_code).await.unwrap(), 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_of_same_code_have_one_winner() {
    let fixture = Fixture::start();
    let mut handles = vec![];

    for i in 0..16u32 {
        let repo = fixture.repo.clone();
        handles.push(tokio::spawn(async move {
            repo.insert(&code("race"), &format!("https://example{i}.com"))
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => winners += 1,
            Err(StorageError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(winners, 1);
}
