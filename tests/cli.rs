use std::process::Command;

use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;

macro_rules! cargo_run {
    ($cmd:expr, $($args:expr),*) => {
        {
            let mut cmd = Command::cargo_bin($cmd)?;
            $(cmd.arg($args);)*
            cmd.assert()
        }
    };
}

#[test]
fn add_and_list() -> Result<()> {
    let conf_dir = assert_fs::TempDir::new()?;

    cargo_run!("faunara", "-c", conf_dir.path(), "add", "Zebra", "--habitat", "Savanna", "--facts", "Striped")
        .success()
        .stdout(predicate::str::diff("1\n"));
    cargo_run!("faunara", "-c", conf_dir.path(), "add", "Owl", "-a", r#"{"legs": 2}"#)
        .success()
        .stdout(predicate::str::diff("2\n"));

    cargo_run!("faunara", "-c", conf_dir.path(), "list")
        .success()
        .stdout(predicate::str::contains("1\tZebra\t-").and(predicate::str::contains("2\tOwl\t-")));

    cargo_run!("faunara", "-c", conf_dir.path(), "list", "--output-format", "json")
        .success()
        .stdout(predicate::str::contains(r#""habitat": "Savanna""#));

    Ok(())
}

#[test]
fn add_requires_name() -> Result<()> {
    let conf_dir = assert_fs::TempDir::new()?;

    cargo_run!("faunara", "-c", conf_dir.path(), "add", " ")
        .failure()
        .stderr(predicate::str::contains("Name is required"));

    cargo_run!("faunara", "-c", conf_dir.path(), "add", "Cow", "-a", "[1, 2]")
        .failure()
        .stderr(predicate::str::contains("Attributes must be a JSON object or dict."));

    Ok(())
}

#[test]
fn classify_attributes() -> Result<()> {
    let conf_dir = assert_fs::TempDir::new()?;

    cargo_run!("faunara", "-c", conf_dir.path(), "classify", r#"{"legs": 4}"#)
        .failure()
        .stderr(predicate::str::contains("No animals in database to compare"));

    cargo_run!("faunara", "-c", conf_dir.path(), "add", "Spider", "-a", r#"{"legs": 8, "diet": "carnivore"}"#)
        .success();
    cargo_run!("faunara", "-c", conf_dir.path(), "add", "Cow", "-a", r#"{"legs": 4, "diet": "herbivore"}"#)
        .success();

    cargo_run!("faunara", "-c", conf_dir.path(), "classify", r#"{"legs": 4, "diet": "Herbivore"}"#)
        .success()
        .stdout(predicate::str::diff("1.0000\t2\tCow\n"));

    cargo_run!("faunara", "-c", conf_dir.path(), "classify", r#"{"legs": 6}"#, "--output-format", "json")
        .success()
        .stdout(predicate::str::contains(r#""name": "Spider""#));

    Ok(())
}
