use media_layout::model::upnp_class;
use media_layout::scan::{FileNameReader, Scanner};
use media_layout::{Layout, LayoutConfig, MemoryStore, Store};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn import(root: &Path) -> MemoryStore {
    let config = LayoutConfig::builtin().unwrap();
    let scanner = Scanner::new(root, FileNameReader::new());
    let files = scanner.scan().unwrap();
    let mut store = MemoryStore::new();
    scanner.import(files, &Layout::new(&config), &mut store).unwrap();
    store
}

#[test]
fn test_playlist_entries_resolve_against_scanned_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "Music/Band/a.mp3", "");
    write(root, "Music/Band/b.flac", "");
    write(
        root,
        "Music/mix.m3u",
        "#EXTM3U\n#EXTINF:100,First\nBand/a.mp3\n#EXTINF:-1,Second,audio/flac\nBand/b.flac\nBand/missing.mp3\nhttp://radio.example/live\n",
    );

    let store = import(root);

    let all = store
        .find_container(&["Playlists", "All Playlists", "mix"])
        .unwrap();
    assert_eq!(all.descriptor.upnp_class, upnp_class::PLAYLIST_CONTAINER);
    let items = store.items_in(all.id);
    let placed: Vec<(&str, Option<u32>)> = items
        .iter()
        .map(|item| (item.object.title.as_str(), item.object.playlist_order))
        .collect();
    assert_eq!(
        placed,
        [
            ("a.mp3", Some(1)),
            ("b.flac", Some(2)),
            ("http://radio.example/live", Some(3)),
        ]
    );

    let by_dir = store
        .find_container(&["Playlists", "Directories", "Music", "mix"])
        .unwrap();
    assert_eq!(store.items_in(by_dir.id).len(), 3);
}

#[test]
fn test_nfo_sidecar_is_merged_before_layout() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "Movies/bbb.mkv", "");
    write(
        root,
        "Movies/bbb.nfo",
        "<movie><title>Big Buck Bunny</title><premiered>2008-05-20</premiered></movie>",
    );

    let store = import(root);

    let location = root.join("Movies/bbb.mkv");
    let stored = store.get_cds_object(&location.to_string_lossy()).unwrap();
    assert_eq!(stored.title, "Big Buck Bunny");
    assert_eq!(stored.upnp_class, upnp_class::MOVIE);

    let all = store.find_container(&["Video", "All Video"]).unwrap();
    let items = store.items_in(all.id);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].object.title, "Big Buck Bunny");
}

#[test]
fn test_unknown_files_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "notes.txt", "hello");

    let scanner = Scanner::new(root, FileNameReader::new());
    assert!(scanner.scan().unwrap().is_empty());
}

#[test]
fn test_scan_requires_a_directory() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("a.mp3");
    fs::write(&file, "").unwrap();

    assert!(Scanner::new(&file, FileNameReader::new()).scan().is_err());
}
