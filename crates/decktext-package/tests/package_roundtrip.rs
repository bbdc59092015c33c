//! Reading hand-assembled packages and round-tripping written ones.

use decktext_core::{parse_document, render_note, text_identities, verify};
use decktext_package::{DatabasePayload, Error, ExtractedPackage, MediaIndexFormat};
use decktext_testing::{DatabaseLayout, MediaEncoding, PackageFixture};
use decktext_types::Guid;

fn write(fixture: PackageFixture) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.apkg");
    fixture.write(&path).unwrap();
    (dir, path)
}

#[test]
fn test_legacy_package_notes() {
    let (_dir, path) = write(
        PackageFixture::new()
            .note("g1", &["Capital of France", "Paris"])
            .note("g2", &["{{c1::Nile}}", ""]),
    );

    let package = ExtractedPackage::open(&path).unwrap();
    assert_eq!(
        package.payload(),
        &DatabasePayload::Legacy("collection.anki2".to_string())
    );

    let notes = package.notes().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(render_note(&notes[0]), "[g1] Capital of France :: Paris");
    assert_eq!(render_note(&notes[1]), "[g2] {{c1::Nile}} ::");
}

#[test]
fn test_anki21_preferred_over_anki2() {
    let (_dir, path) = write(
        PackageFixture::new()
            .layout(DatabaseLayout::Anki21)
            .note("g1", &["A", "B"]),
    );
    let package = ExtractedPackage::open(&path).unwrap();
    assert_eq!(package.payload().file_name(), "collection.anki21");
}

#[test]
fn test_modern_package_with_compressed_binary_media() {
    let (_dir, path) = write(
        PackageFixture::new()
            .layout(DatabaseLayout::Anki21b)
            .media_encoding(MediaEncoding::ZstdBinary)
            .note("modern", &["Front", "Back"])
            .media("cat.jpg", b"meow")
            .media("dog.mp3", b"woof"),
    );

    let package = ExtractedPackage::open(&path).unwrap();
    assert!(matches!(package.payload(), DatabasePayload::Modern(_)));
    assert!(package.database_path().ends_with("collection.decompressed.db"));

    let ids = package.identities().unwrap();
    assert_eq!(ids.len(), 1);
    assert!(ids.contains(&Guid::new("modern")));

    let report = package.media_report();
    assert!(report.compressed);
    assert_eq!(report.format, MediaIndexFormat::Binary);
    assert_eq!(report.entries, 2);
    assert_eq!(package.media_index().get("1"), Some("dog.mp3"));

    assert!(package.workdir().join("cat.jpg").is_file());
    assert!(!package.workdir().join("media").exists());

    let out = tempfile::tempdir().unwrap();
    let copied = package.export_media(out.path()).unwrap();
    assert_eq!(copied, 2);
    assert_eq!(std::fs::read(out.path().join("dog.mp3")).unwrap(), b"woof");
}

#[test]
fn test_media_named_like_members_is_exported() {
    let (_dir, path) = write(
        PackageFixture::new()
            .note("g1", &["A", "B"])
            .media("collection.png", b"logo")
            .media("media", b"audio")
            .media("cat.jpg", b"meow"),
    );

    let package = ExtractedPackage::open(&path).unwrap();
    assert_eq!(package.media_index().len(), 3);

    let out = tempfile::tempdir().unwrap();
    let copied = package.export_media(out.path()).unwrap();
    assert_eq!(copied, 3);
    assert_eq!(std::fs::read(out.path().join("collection.png")).unwrap(), b"logo");
    assert_eq!(std::fs::read(out.path().join("media")).unwrap(), b"audio");
    assert_eq!(std::fs::read(out.path().join("cat.jpg")).unwrap(), b"meow");
    assert!(!out.path().join("collection.anki2").exists());
}

#[test]
fn test_media_never_replaces_the_database() {
    let (_dir, path) = write(
        PackageFixture::new()
            .note("g1", &["A", "B"])
            .media("collection.anki2", b"not a database"),
    );

    let package = ExtractedPackage::open(&path).unwrap();
    let notes = package.notes().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].guid, Guid::new("g1"));

    let out = tempfile::tempdir().unwrap();
    package.export_media(out.path()).unwrap();
    assert!(!out.path().join("collection.anki2").exists());
}

#[test]
fn test_zstd_empty_media_index() {
    let (_dir, path) = write(
        PackageFixture::new()
            .media_encoding(MediaEncoding::ZstdJson)
            .note("g1", &["A", "B"]),
    );
    let package = ExtractedPackage::open(&path).unwrap();
    assert!(package.media_index().is_empty());
    assert_eq!(package.media_report().format, MediaIndexFormat::Json);
}

#[test]
fn test_workdir_removed_on_drop() {
    let (_dir, path) = write(PackageFixture::new().note("g1", &["A", "B"]));
    let package = ExtractedPackage::open(&path).unwrap();
    let workdir = package.workdir().to_path_buf();
    assert!(workdir.exists());
    drop(package);
    assert!(!workdir.exists());
}

#[test]
fn test_missing_database_is_fatal() {
    let (_dir, path) = write(
        PackageFixture::new()
            .layout(DatabaseLayout::Missing)
            .media("a.png", b"x"),
    );
    assert!(matches!(
        ExtractedPackage::open(&path),
        Err(Error::MissingDatabase)
    ));
}

#[test]
fn test_not_a_zip_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.apkg");
    std::fs::write(&path, b"definitely not a zip").unwrap();
    assert!(matches!(
        ExtractedPackage::open(&path),
        Err(Error::CorruptContainer(_))
    ));
}

#[test]
fn test_written_package_verifies_against_its_text() {
    let text = "\
Capital of France :: Paris
{{c1::Berlin}} is in {{c2::Germany}}
[stable] Largest ocean :: Pacific :: by area
";
    let doc = parse_document(text);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geo.apkg");

    let summary = decktext_package::DeckBuilder::new("Geography")
        .with_cards(doc.cards.clone())
        .write_to(&path)
        .unwrap();
    assert_eq!(summary.notes, 3);
    // one card per basic note, one per cloze number
    assert_eq!(summary.cards, 4);
    assert_eq!(summary.arity.basic, 3);

    let package = ExtractedPackage::open(&path).unwrap();
    let report = verify(&text_identities(&doc), &package.identities().unwrap());
    assert!(report.is_success(), "{:?}", report);
    assert!(report.matches.contains(&Guid::new("stable")));

    // Dumped lines carry the same keys and all padded fields.
    let dumped: Vec<String> = package.notes().unwrap().iter().map(render_note).collect();
    assert_eq!(dumped[2], "[stable] Largest ocean :: Pacific :: by area");
    assert!(dumped[0].ends_with("Capital of France :: Paris ::"));
}

#[test]
fn test_deleting_a_card_shows_as_unexpected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.apkg");
    let original = parse_document("A :: 1\nB :: 2\nC :: 3\n");
    decktext_package::DeckBuilder::new("Deck")
        .with_cards(original.cards.clone())
        .write_to(&path)
        .unwrap();

    let edited = parse_document("B :: 2\nC :: 3\nD :: 4\n");
    let package = ExtractedPackage::open(&path).unwrap();
    let report = verify(&text_identities(&edited), &package.identities().unwrap());

    assert_eq!(report.matches.len(), 2);
    assert_eq!(report.missing.len(), 1);
    assert_eq!(report.unexpected.len(), 1);
    assert!(report.unexpected.contains(&original.cards[0].key));
}
