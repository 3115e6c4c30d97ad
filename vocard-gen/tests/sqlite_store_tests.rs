//! SQLite asset store tests (on-disk databases in temp dirs)

mod helpers;

use std::sync::Arc;

use helpers::{haus_row, pipeline, CountingAudio, CountingImage};
use tempfile::TempDir;
use vocard_gen::store::SqliteAssetStore;
use vocard_gen::types::{AssetKind, AssetRef, AssetStore, CacheKey};

#[tokio::test]
async fn test_connect_creates_database_and_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("nested").join("vocard.db");

    let store = SqliteAssetStore::connect(&db_path).await.unwrap();

    assert!(db_path.exists());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_put_lookup_and_upsert() {
    let temp = TempDir::new().unwrap();
    let store = SqliteAssetStore::connect(&temp.path().join("vocard.db"))
        .await
        .unwrap();
    let key = CacheKey::for_content(AssetKind::Audio, "das Haus");

    assert_eq!(store.lookup(&key).await.unwrap(), None);

    store.put(&key, &AssetRef::new("audio_a.wav")).await.unwrap();
    assert_eq!(
        store.lookup(&key).await.unwrap(),
        Some(AssetRef::new("audio_a.wav"))
    );

    store.put(&key, &AssetRef::new("audio_b.wav")).await.unwrap();
    assert_eq!(
        store.lookup(&key).await.unwrap(),
        Some(AssetRef::new("audio_b.wav"))
    );
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_cache_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("vocard.db");

    let audio = CountingAudio::new();
    let image = CountingImage::new();
    {
        let store = Arc::new(SqliteAssetStore::connect(&db_path).await.unwrap());
        let first = pipeline(audio.clone(), image.clone(), store).run(vec![haus_row()]).await;
        assert!(first[0].is_ok());
    }

    let store = Arc::new(SqliteAssetStore::connect(&db_path).await.unwrap());
    assert_eq!(store.count().await.unwrap(), 2);
    let second = pipeline(audio.clone(), image.clone(), store).run(vec![haus_row()]).await;

    let card = second.into_iter().next().unwrap().unwrap();
    assert_eq!(card.fields[8], "[sound:audio_0.wav]");
    assert_eq!(audio.calls(), 1);
    assert_eq!(image.calls(), 1);
}
