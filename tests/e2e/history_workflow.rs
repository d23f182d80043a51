//! E2E Scenario: reading checkpoint history

use std::process::Command;

use sfwr::error::Result;
use sfwr::test_utils::StoreFixture;
use sfwr::versioning::StoreCounts;

use crate::require_git;

#[test]
fn test_history_empty_before_first_checkpoint() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    assert!(fixture.versioning().list_checkpoints()?.is_empty());
    Ok(())
}

#[test]
fn test_history_is_newest_first_and_limited() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    let versioning = fixture.versioning();

    let mut ids = Vec::new();
    for title in ["A", "B", "C"] {
        fixture.add_books(&[title]);
        let outcome = versioning.create_checkpoint(fixture.open_db().counts()?)?;
        ids.push(outcome.checkpoint.unwrap());
    }

    let history = versioning.list_checkpoints()?;
    let listed: Vec<&str> = history.iter().map(|cp| cp.id.as_str()).collect();
    assert_eq!(listed, vec![ids[2].as_str(), ids[1].as_str(), ids[0].as_str()]);
    let counts: Vec<Option<i64>> = history.iter().map(|cp| cp.derived_count).collect();
    assert_eq!(counts, vec![Some(3), Some(2), Some(1)]);

    let latest = versioning.list_checkpoints_limited(1)?;
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].id, ids[2]);
    Ok(())
}

#[test]
fn test_history_skips_unmarked_commits() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    let versioning = fixture.versioning();
    fixture.add_books(&["Dune"]);
    versioning.create_checkpoint(StoreCounts::new(1, 1))?;

    std::fs::write(fixture.root().join("NOTES.md"), "housekeeping\n")?;
    let status = Command::new("git")
        .current_dir(fixture.root())
        .args(["add", "NOTES.md"])
        .status()?;
    assert!(status.success());
    let status = Command::new("git")
        .current_dir(fixture.root())
        .args(["commit", "--quiet", "-m", "Add 12 notes"])
        .status()?;
    assert!(status.success());

    let history = versioning.list_checkpoints()?;
    assert_eq!(history.len(), 1);
    assert!(history[0].message.starts_with("[DEPLOY]"));
    Ok(())
}

#[test]
fn test_history_falls_back_to_unmarked_commits() -> Result<()> {
    require_git!();
    let fixture = StoreFixture::new();
    fixture.add_books(&["Dune", "Emma"]);

    // Catalog history that predates the marker convention.
    for args in [
        &["add", "sfwr_database.db"][..],
        &["commit", "--quiet", "-m", "Import 12 books from spreadsheet"][..],
    ] {
        let status = Command::new("git")
            .current_dir(fixture.root())
            .args(args)
            .status()?;
        assert!(status.success());
    }

    let history = fixture.versioning().list_checkpoints()?;
    assert_eq!(history.len(), 1);
    assert!(!history[0].has_marker("[DEPLOY]"));
    assert_eq!(history[0].message, "Import 12 books from spreadsheet");
    assert_eq!(history[0].derived_count, Some(12));
    Ok(())
}
