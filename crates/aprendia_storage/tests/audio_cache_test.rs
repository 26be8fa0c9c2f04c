//! Tests for the content-addressed AudioCache.

use aprendia_error::StorageErrorKind;
use aprendia_storage::AudioCache;
use tempfile::TempDir;

fn cache() -> (TempDir, AudioCache) {
    let dir = TempDir::new().expect("temp dir");
    let cache = AudioCache::new(dir.path(), "/audio/");
    (dir, cache)
}

#[tokio::test]
async fn test_same_key_resolves_to_same_path() {
    let (_dir, cache) = cache();

    let first = cache.resolve("es", "Hola, gato.").await.unwrap();
    let second = cache.resolve("es", "Hola, gato.").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_write_twice_is_idempotent_and_overwrites() {
    let (_dir, cache) = cache();

    let first = cache.write("es", "El gato duerme.", b"one").await.unwrap();
    let second = cache.write("es", "El gato duerme.", b"two").await.unwrap();

    assert_eq!(first.path(), second.path());
    assert_eq!(std::fs::read(second.path()).unwrap(), b"two");
}

#[tokio::test]
async fn test_layout_is_locale_partitioned() {
    let (dir, cache) = cache();

    let artifact = cache.write("en", "The cat sleeps.", b"mp3").await.unwrap();
    let file_name = AudioCache::file_name("en", "The cat sleeps.");

    assert_eq!(artifact.path(), &dir.path().join("en").join(&file_name));
    assert_eq!(artifact.url(), &format!("/audio/en/{}", file_name));
    assert!(file_name.starts_with("en_"));
    assert!(file_name.ends_with(".mp3"));
    assert_eq!(file_name.len(), "en_".len() + 16 + ".mp3".len());
}

#[tokio::test]
async fn test_locale_is_part_of_the_key() {
    let (_dir, cache) = cache();

    let en = cache.resolve("en", "no").await.unwrap();
    let es = cache.resolve("es", "no").await.unwrap();

    assert_ne!(en.path(), es.path());
}

#[tokio::test]
async fn test_contains_reports_written_artifacts() {
    let (_dir, cache) = cache();

    assert!(!cache.contains("es", "Adiós").await);
    cache.write("es", "Adiós", b"bytes").await.unwrap();
    assert!(cache.contains("es", "Adiós").await);
}

#[tokio::test]
async fn test_concurrent_writes_of_same_key_agree() {
    let (_dir, cache) = cache();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.write("es", "Buenos días", b"same").await })
        })
        .collect();

    let mut urls = Vec::new();
    for handle in handles {
        urls.push(handle.await.unwrap().unwrap().url().clone());
    }
    urls.dedup();
    assert_eq!(urls.len(), 1);
}

#[tokio::test]
async fn test_locales_cannot_leave_the_root() {
    let outer = TempDir::new().expect("temp dir");
    let cache = AudioCache::new(outer.path().join("audio"), "/audio");
    let absolute = outer.path().display().to_string();

    for locale in ["../..", "../escape", "es/../..", "", ".", absolute.as_str()] {
        let err = cache.write(locale, "Hola", b"bytes").await.unwrap_err();
        assert!(
            matches!(err.kind, StorageErrorKind::InvalidLocale(_)),
            "{:?} should be rejected",
            locale
        );
        assert!(!cache.contains(locale, "Hola").await);
    }

    let entries: Vec<_> = std::fs::read_dir(outer.path()).unwrap().collect();
    assert!(entries.is_empty(), "nothing written beside the root");
}
