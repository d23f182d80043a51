//! E2E Scenario: creating checkpoints
//!
//! - first deploy records the current counts
//! - an unchanged store produces no new checkpoint
//! - cover images are captured alongside the database

use sfwr::error::Result;
use sfwr::test_utils::StoreFixture;

use crate::require_git;

#[test]
fn test_checkpoint_records_book_count() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    let versioning = fixture.versioning();

    let books = fixture.add_books(&["Dune", "Emma", "Ulysses", "Beloved"]);
    let counts = fixture.open_db().counts()?;
    assert_eq!(counts.books, books);

    let outcome = versioning.create_checkpoint(counts)?;
    assert!(outcome.created());
    assert!(outcome.published);
    let message = outcome.message.clone().unwrap();
    assert!(message.starts_with("[DEPLOY] 4 books, 4 authors - "));

    let history = versioning.list_checkpoints()?;
    assert_eq!(history.len(), 1);
    assert_eq!(Some(history[0].id.clone()), outcome.checkpoint);
    assert_eq!(history[0].message, message);
    assert_eq!(history[0].derived_count, Some(4));
    assert!(!versioning.has_unsaved_changes()?);
    Ok(())
}

#[test]
fn test_unchanged_store_creates_no_checkpoint() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    let versioning = fixture.versioning();
    fixture.add_books(&["Dune"]);

    let counts = fixture.open_db().counts()?;
    let first = versioning.create_checkpoint(counts)?;
    assert!(first.created());

    let second = versioning.create_checkpoint(counts)?;
    assert!(!second.created());
    assert!(second.published);
    assert!(second.message.is_none());
    assert_eq!(versioning.list_checkpoints()?.len(), 1);
    Ok(())
}

#[test]
fn test_checkpoint_includes_cover_images() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    let versioning = fixture.versioning();
    fixture.add_books(&["Dune"]);
    let cover = fixture.write_cover("dune.jpg", b"\xff\xd8cover-v1");

    let first = versioning.create_checkpoint(fixture.open_db().counts()?)?;

    // Only the cover changes: still a new checkpoint.
    std::fs::write(&cover, b"\xff\xd8cover-v2")?;
    let second = versioning.create_checkpoint(fixture.open_db().counts()?)?;
    assert!(second.created());

    let outcome = versioning.rollback(first.checkpoint.as_deref().unwrap())?;
    assert!(outcome.assets_restored);
    assert_eq!(std::fs::read(&cover)?, b"\xff\xd8cover-v1");
    Ok(())
}

#[test]
fn test_rollback_to_checkpoint_without_covers_keeps_going() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    let versioning = fixture.versioning();

    fixture.add_books(&["Dune"]);
    let bare = versioning
        .create_checkpoint(fixture.open_db().counts()?)?
        .checkpoint
        .unwrap();

    fixture.add_books(&["Emma"]);
    let cover = fixture.write_cover("emma.jpg", b"\xff\xd8emma");
    versioning.create_checkpoint(fixture.open_db().counts()?)?;

    let outcome = versioning.rollback(&bare)?;
    assert_eq!(outcome.target, bare);
    assert!(!outcome.assets_restored);
    assert_eq!(fixture.titles(), vec!["Dune"]);
    // Covers added after the target are left alone.
    assert_eq!(std::fs::read(&cover)?, b"\xff\xd8emma");
    Ok(())
}
