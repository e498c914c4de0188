use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

mod common;

#[test]
fn renames_host_files_to_match_the_index() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    common::seed_repository(dir.path(), &[("notes/TODO.md", "notes/todo.md")]);

    let index_before = common::index_bytes(dir.path());

    common::run_unite_command(dir.path(), &["--host", "-f"])
        .assert()
        .success()
        .stdout(predicate::str::contains("renaming:"));

    assert!(dir.path().join("notes").join("TODO.md").exists());
    assert!(!dir.path().join("notes").join("todo.md").exists());

    // the index is the reference in host mode and stays untouched
    assert_eq!(common::index_bytes(dir.path()), index_before);

    Ok(())
}

#[test]
fn renames_host_directories_to_match_the_index() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    common::seed_repository(dir.path(), &[("src/deep/file.txt", "Src/Deep/file.txt")]);

    let index_before = common::index_bytes(dir.path());

    common::run_unite_command(dir.path(), &["--host"])
        .assert()
        .success()
        .stdout(predicate::str::contains("renaming:"));

    assert!(
        dir.path()
            .join("src")
            .join("deep")
            .join("file.txt")
            .exists()
    );
    assert!(!dir.path().join("Src").exists());
    assert_eq!(common::index_bytes(dir.path()), index_before);

    // the corrected layout leaves nothing to reconcile
    common::run_unite_command(dir.path(), &["--host"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    Ok(())
}

#[test]
fn temporary_name_collision_is_probed_past() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    common::seed_repository(dir.path(), &[("notes/TODO.md", "notes/todo.md")]);
    std::fs::write(dir.path().join("notes").join("todo.md.unite0"), "squatter")?;

    common::run_unite_command(dir.path(), &["--host", "-f"])
        .assert()
        .success();

    assert!(dir.path().join("notes").join("TODO.md").exists());
    assert!(dir.path().join("notes").join("todo.md.unite0").exists());

    Ok(())
}
