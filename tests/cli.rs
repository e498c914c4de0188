use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

mod common;

#[test]
fn invalid_repository_aborts_before_touching_anything() -> Result<(), Box<dyn std::error::Error>>
{
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("file.txt"), "content")?;

    common::run_unite_command(dir.path(), &[])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "does not appear to be a valid git repository",
        ));

    assert!(dir.path().join("file.txt").exists());

    Ok(())
}

#[test]
fn repository_path_can_be_given_as_an_argument() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    common::seed_repository(dir.path(), &[("docs/readme.TXT", "docs/README.txt")]);

    let repository_path = dir.path().to_string_lossy().into_owned();
    common::run_unite_command(std::env::temp_dir().as_path(), &[&repository_path])
        .assert()
        .success()
        .stdout(predicate::str::contains("renaming:"));

    assert_eq!(
        common::tracked_paths(dir.path()),
        vec!["docs/README.txt".to_string()]
    );

    Ok(())
}

#[test]
fn directories_only_leaves_file_casing_alone() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    common::seed_repository(
        dir.path(),
        &[
            ("src/deep/a.txt", "Src/Deep/a.txt"),
            ("b.TXT", "b.txt"),
        ],
    );

    common::run_unite_command(dir.path(), &["-d"])
        .assert()
        .success();

    let tracked = common::tracked_paths(dir.path());
    assert!(tracked.contains(&"Src/Deep/a.txt".to_string()));
    assert!(tracked.contains(&"b.TXT".to_string()));

    Ok(())
}

#[test]
fn files_only_reconciles_file_paths() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    common::seed_repository(dir.path(), &[("docs/readme.TXT", "docs/README.txt")]);

    common::run_unite_command(dir.path(), &["-f"])
        .assert()
        .success();

    assert_eq!(
        common::tracked_paths(dir.path()),
        vec!["docs/README.txt".to_string()]
    );

    Ok(())
}
