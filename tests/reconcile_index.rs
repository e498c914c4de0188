use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

mod common;

#[test]
fn reconciles_file_casing_in_the_index() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    common::seed_repository(dir.path(), &[("docs/readme.TXT", "docs/README.txt")]);

    common::run_unite_command(dir.path(), &[])
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
fn reconciles_directory_casing_in_the_index() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    common::seed_repository(dir.path(), &[("src/deep/file.txt", "Src/Deep/file.txt")]);

    common::run_unite_command(dir.path(), &[])
        .assert()
        .success()
        .stdout(predicate::str::contains("renaming:"));

    assert_eq!(
        common::tracked_paths(dir.path()),
        vec!["Src/Deep/file.txt".to_string()]
    );

    Ok(())
}

#[test]
fn second_run_reports_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    common::seed_repository(
        dir.path(),
        &[
            ("src/deep/file.txt", "Src/Deep/file.txt"),
            ("docs/readme.TXT", "docs/README.txt"),
        ],
    );

    common::run_unite_command(dir.path(), &[]).assert().success();

    common::run_unite_command(dir.path(), &[])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    Ok(())
}

#[test]
fn unmatched_directory_entry_warns_and_the_batch_continues()
-> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    common::seed_repository(
        dir.path(),
        &[
            ("ghost/file.txt", "orphan.txt"),
            ("docs/readme.TXT", "docs/README.txt"),
        ],
    );

    common::run_unite_command(dir.path(), &[])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "unable to determine target for index entry [ghost/file.txt]",
        ));

    let tracked = common::tracked_paths(dir.path());
    assert!(tracked.contains(&"ghost/file.txt".to_string()));
    assert!(tracked.contains(&"docs/README.txt".to_string()));

    Ok(())
}

#[test]
fn every_tracked_path_survives_reconciliation() -> Result<(), Box<dyn std::error::Error>> {
    use fake::Fake;
    use fake::faker::lorem::en::Word;

    let dir = TempDir::new()?;

    let entries = (0..5)
        .map(|i| {
            let name = format!("{}_{i}.txt", Word().fake::<String>());
            (name.to_uppercase(), name)
        })
        .collect::<Vec<_>>();
    let seed = entries
        .iter()
        .map(|(index_path, host_path)| (index_path.as_str(), host_path.as_str()))
        .collect::<Vec<_>>();
    common::seed_repository(dir.path(), &seed);

    common::run_unite_command(dir.path(), &[]).assert().success();

    let tracked = common::tracked_paths(dir.path());
    assert_eq!(tracked.len(), entries.len());
    for (index_path, _) in &entries {
        let matches = tracked
            .iter()
            .filter(|path| path.to_lowercase() == index_path.to_lowercase())
            .count();
        assert_eq!(matches, 1, "expected one surviving entry for {index_path}");
    }

    Ok(())
}
