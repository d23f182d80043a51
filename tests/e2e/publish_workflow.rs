//! E2E Scenario: publishing checkpoints to the mirror

use sfwr::error::{Result, SfwrError};
use sfwr::test_utils::StoreFixture;

use crate::require_git;

#[test]
fn test_publish_updates_mirror() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    fixture.add_books(&["Dune"]);

    let outcome = fixture
        .versioning()
        .create_checkpoint(fixture.open_db().counts()?)?;

    assert_eq!(fixture.mirror_head(), outcome.checkpoint);
    Ok(())
}

#[test]
fn test_publish_failure_keeps_local_checkpoint() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::without_remote();
    let versioning = fixture.versioning();
    fixture.add_books(&["Dune", "Emma"]);

    let err = versioning
        .create_checkpoint(fixture.open_db().counts()?)
        .unwrap_err();
    let checkpoint = match err {
        SfwrError::PublishFailed {
            checkpoint: Some(id),
            ..
        } => id,
        other => panic!("expected PublishFailed with a checkpoint, got {other:?}"),
    };

    let history = versioning.list_checkpoints()?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, checkpoint);
    assert_eq!(history[0].derived_count, Some(2));

    // Nothing new to record, but publishing is still attempted.
    let err = versioning
        .create_checkpoint(fixture.open_db().counts()?)
        .unwrap_err();
    assert!(matches!(err, SfwrError::PublishFailed { checkpoint: None, .. }));
    Ok(())
}
