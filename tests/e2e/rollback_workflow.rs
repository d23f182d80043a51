//! E2E Scenario: rolling the catalog back
//!
//! - restore an earlier checkpoint and read the older catalog
//! - refuse to discard unsaved changes
//! - unknown checkpoints leave the store untouched
//! - repeating a rollback is refused and leaves the restored content
//! - an unversioned root is reported, not treated as empty history

use sfwr::app::rollback_catalog;
use sfwr::config::Config;
use sfwr::error::{Result, SfwrError};
use sfwr::test_utils::StoreFixture;
use sfwr::versioning::Versioning;

use crate::require_git;

/// Three books checkpointed as A, five books checkpointed as B.
fn two_checkpoints(fixture: &StoreFixture) -> Result<(String, String)> {
    let versioning = fixture.versioning();
    fixture.add_books(&["Book 1", "Book 2", "Book 3"]);
    let a = versioning
        .create_checkpoint(fixture.open_db().counts()?)?
        .checkpoint
        .unwrap();
    fixture.add_books(&["Book 4", "Book 5"]);
    let b = versioning
        .create_checkpoint(fixture.open_db().counts()?)?
        .checkpoint
        .unwrap();
    Ok((a, b))
}

#[test]
fn test_rollback_restores_earlier_catalog() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    let (a, b) = two_checkpoints(&fixture)?;
    let versioning = fixture.versioning();

    let (db, outcome) = rollback_catalog(&versioning, fixture.open_db(), &a)?;
    assert_eq!(outcome.target, a);
    assert_eq!(db.book_count()?, 3);
    db.close()?;

    let titles = fixture.titles();
    assert_eq!(titles, vec!["Book 1", "Book 2", "Book 3"]);
    assert!(!titles.iter().any(|t| t == "Book 4" || t == "Book 5"));

    // History is untouched; B is still reachable.
    let history = versioning.list_checkpoints()?;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, b);
    Ok(())
}

#[test]
fn test_rollback_then_deploy_records_new_checkpoint() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    let (a, _) = two_checkpoints(&fixture)?;
    let versioning = fixture.versioning();

    versioning.rollback(&a)?;
    let outcome = versioning.create_checkpoint(fixture.open_db().counts()?)?;
    assert!(outcome.created());

    let history = versioning.list_checkpoints()?;
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].derived_count, Some(3));
    Ok(())
}

#[test]
fn test_rollback_refuses_unsaved_changes() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    let (a, _) = two_checkpoints(&fixture)?;
    fixture.add_books(&["Unsaved"]);
    let before = fixture.database_bytes();

    let err = fixture.versioning().rollback(&a).unwrap_err();
    assert!(matches!(err, SfwrError::UnsavedChanges(_)), "got {err:?}");
    assert_eq!(fixture.database_bytes(), before);
    Ok(())
}

#[test]
fn test_rollback_unknown_checkpoint_leaves_store() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    two_checkpoints(&fixture)?;
    let before = fixture.database_bytes();

    let err = fixture
        .versioning()
        .rollback("0000000000000000000000000000000000000bad")
        .unwrap_err();
    assert!(matches!(err, SfwrError::RestoreFailed { .. }), "got {err:?}");
    assert_eq!(fixture.database_bytes(), before);
    assert_eq!(fixture.titles().len(), 5);
    Ok(())
}

#[test]
fn test_second_rollback_refused_with_content_unchanged() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    let (a, _) = two_checkpoints(&fixture)?;
    let versioning = fixture.versioning();

    versioning.rollback(&a)?;
    let after_first = fixture.database_bytes();
    assert!(versioning.has_unsaved_changes()?);

    let err = versioning.rollback(&a).unwrap_err();
    assert!(matches!(err, SfwrError::UnsavedChanges(_)), "got {err:?}");
    assert_eq!(fixture.database_bytes(), after_first);
    assert_eq!(fixture.titles().len(), 3);
    Ok(())
}

#[test]
fn test_unversioned_root_is_reported() -> Result<()> {
    require_git!();
    let dir = tempfile::tempdir()?;
    let versioning = Versioning::git(dir.path(), &Config::default());

    assert!(!versioning.is_versioned()?);
    let err = versioning.list_checkpoints().unwrap_err();
    assert!(matches!(err, SfwrError::NotVersioned(_)), "got {err:?}");
    let err = versioning.rollback("0123456789abcdef").unwrap_err();
    assert!(matches!(err, SfwrError::NotVersioned(_)), "got {err:?}");
    Ok(())
}
