use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

mod common;
use common::assertions::*;
use common::fixtures::*;
use common::repository::*;

/// Loads the fixture tutorial with state kept under `home`.
fn load_fixture(home: &TempDir) -> anyhow::Result<TestRepo> {
    let repo = create_tutorial_repo()?;
    tutorial_cmd(home.path())
        .arg("load")
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 'Build a CLI' v1.0.0 (4 steps)"));
    Ok(repo)
}

#[cfg(test)]
mod load_command_tests {
    use super::*;

    #[test]
    fn test_commands_require_loaded_tutorial() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        for command in ["steps", "next", "progress", "diff"] {
            tutorial_cmd(home.path())
                .arg(command)
                .assert()
                .failure()
                .code(1)
                .stdout(error_line())
                .stdout(not_loaded());
        }
        Ok(())
    }

    #[test]
    fn test_load_persists_session_for_later_commands() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let _repo = load_fixture(&home)?;

        assert!(home.path().join("data/git-tutorial/state.json").exists());
        assert!(home.path().join("config/git-tutorial/config.json").exists());

        tutorial_cmd(home.path())
            .arg("steps")
            .assert()
            .success()
            .stdout(predicate::str::contains("Build a CLI v1.0.0"))
            .stdout(predicate::str::contains("[ ] setup Project setup"))
            .stdout(predicate::str::contains("    [ ] library Extract a library"));
        Ok(())
    }

    #[test]
    fn test_load_missing_refs_lists_them_all() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let repo = create_repo_with_missing_refs()?;

        tutorial_cmd(home.path())
            .arg("load")
            .arg(repo.path())
            .assert()
            .failure()
            .stdout(predicate::str::contains("step 'two': nope-2"))
            .stdout(predicate::str::contains("step 'three': nope-3"));

        tutorial_cmd(home.path())
            .arg("steps")
            .assert()
            .failure()
            .stdout(not_loaded());
        Ok(())
    }

    #[test]
    fn test_session_survives_steps_without_config() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let repo = create_repo_with_late_config(true)?;
        tutorial_cmd(home.path())
            .arg("load")
            .arg(repo.path())
            .assert()
            .success();

        tutorial_cmd(home.path())
            .args(["goto", "one"])
            .assert()
            .success()
            .stdout(now_at_step("one"));
        assert!(!repo.path.join("tutorial.yaml").exists());

        tutorial_cmd(home.path())
            .arg("steps")
            .assert()
            .success()
            .stdout(predicate::str::contains("Late config v0.2.0"))
            .stdout(predicate::str::contains("[*] one"));
        tutorial_cmd(home.path())
            .arg("next")
            .assert()
            .success()
            .stdout(now_at_step("two"));
        assert_eq!(head_commit(&repo.path)?, tag_commit(&repo.path, "s2")?);
        tutorial_cmd(home.path())
            .arg("progress")
            .assert()
            .success()
            .stdout(predicate::str::contains("1/2 steps completed"));
        Ok(())
    }

    #[test]
    fn test_close_forgets_session() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let _repo = load_fixture(&home)?;

        tutorial_cmd(home.path())
            .arg("close")
            .assert()
            .success()
            .stdout(predicate::str::contains("Closed tutorial"));
        tutorial_cmd(home.path())
            .arg("steps")
            .assert()
            .failure()
            .stdout(not_loaded());
        Ok(())
    }
}

#[cfg(test)]
mod navigate_command_tests {
    use super::*;

    #[test]
    fn test_next_walks_the_first_path() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let repo = load_fixture(&home)?;

        tutorial_cmd(home.path())
            .arg("next")
            .assert()
            .success()
            .stdout(now_at_step("setup"));
        assert_eq!(head_commit(&repo.path)?, tag_commit(&repo.path, "step-1")?);

        tutorial_cmd(home.path())
            .arg("next")
            .assert()
            .success()
            .stdout(now_at_step("library"));
        assert_eq!(head_commit(&repo.path)?, tag_commit(&repo.path, "step-2")?);

        tutorial_cmd(home.path())
            .arg("steps")
            .assert()
            .success()
            .stdout(predicate::str::contains("[✓] setup"))
            .stdout(predicate::str::contains("[*] library"));
        Ok(())
    }

    #[test]
    fn test_goto_dirty_tree_without_flag_is_cancelled() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let repo = load_fixture(&home)?;
        tutorial_cmd(home.path()).args(["goto", "setup"]).assert().success();
        create_file(&repo.path, "src/main.rs", "// mine\n")?;

        tutorial_cmd(home.path())
            .args(["goto", "library"])
            .assert()
            .success()
            .stdout(predicate::str::contains("uncommitted changes"))
            .stdout(predicate::str::contains("--stash"));

        assert_eq!(head_commit(&repo.path)?, tag_commit(&repo.path, "step-1")?);
        assert_eq!(read_file(&repo.path, "src/main.rs")?, "// mine\n");
        Ok(())
    }

    #[test]
    fn test_goto_stash_and_unstash() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let repo = load_fixture(&home)?;
        tutorial_cmd(home.path()).args(["goto", "setup"]).assert().success();
        create_file(&repo.path, "notes.txt", "keep me\n")?;

        tutorial_cmd(home.path())
            .args(["goto", "tests", "--stash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Stashed your changes"))
            .stdout(now_at_step("tests"));
        assert!(!repo.path.join("notes.txt").exists());

        tutorial_cmd(home.path())
            .arg("unstash")
            .assert()
            .success()
            .stdout(predicate::str::contains("Restored stashed changes"));
        assert_eq!(read_file(&repo.path, "notes.txt")?, "keep me\n");
        Ok(())
    }

    #[test]
    fn test_goto_discard() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let repo = load_fixture(&home)?;
        tutorial_cmd(home.path()).args(["goto", "setup"]).assert().success();
        create_file(&repo.path, "src/main.rs", "// mine\n")?;

        tutorial_cmd(home.path())
            .args(["goto", "library", "--discard"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Discarded uncommitted changes"));
        assert_eq!(read_file(&repo.path, "src/main.rs")?, MAIN_V2);
        Ok(())
    }

    #[test]
    fn test_stash_and_discard_conflict() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        tutorial_cmd(home.path())
            .args(["goto", "setup", "--stash", "--discard"])
            .assert()
            .failure();
        Ok(())
    }

    #[test]
    fn test_goto_unknown_step() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let _repo = load_fixture(&home)?;

        tutorial_cmd(home.path())
            .args(["goto", "nowhere"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("Step 'nowhere' does not exist"));
        Ok(())
    }

    #[test]
    fn test_progress_and_reset() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let _repo = load_fixture(&home)?;
        tutorial_cmd(home.path()).args(["goto", "setup"]).assert().success();
        tutorial_cmd(home.path()).args(["goto", "library"]).assert().success();

        tutorial_cmd(home.path())
            .arg("progress")
            .assert()
            .success()
            .stdout(predicate::str::contains("1/4 steps completed"))
            .stdout(predicate::str::contains("Current step: library"));

        tutorial_cmd(home.path()).arg("reset").assert().success();
        tutorial_cmd(home.path())
            .arg("progress")
            .assert()
            .success()
            .stdout(predicate::str::contains("0/4 steps completed"))
            .stdout(predicate::str::contains("No step visited yet"));
        Ok(())
    }
}

#[cfg(test)]
mod diff_command_tests {
    use super::*;

    #[test]
    fn test_diff_named_step() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let _repo = load_fixture(&home)?;

        tutorial_cmd(home.path())
            .args(["diff", "library"])
            .assert()
            .success()
            .stdout(predicate::str::contains("A  src/lib.rs +3 -0"))
            .stdout(predicate::str::contains("M  src/main.rs +1 -1"))
            .stdout(predicate::str::contains("@@ -1,3 +1,3 @@"))
            .stdout(predicate::str::contains("+pub fn greet()"));
        Ok(())
    }

    #[test]
    fn test_diff_current_step_stat_only() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let _repo = load_fixture(&home)?;
        tutorial_cmd(home.path()).args(["goto", "rename"]).assert().success();

        tutorial_cmd(home.path())
            .args(["diff", "--stat"])
            .assert()
            .success()
            .stdout(predicate::str::contains("R  src/lib.rs → src/core.rs"))
            .stdout(predicate::str::contains("═══").not());
        Ok(())
    }

    #[test]
    fn test_diff_without_current_step() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let _repo = load_fixture(&home)?;

        tutorial_cmd(home.path())
            .arg("diff")
            .assert()
            .failure()
            .stdout(predicate::str::contains("No step is current"));
        Ok(())
    }

    #[test]
    fn test_diff_from_other_step() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let _repo = load_fixture(&home)?;

        tutorial_cmd(home.path())
            .args(["diff", "library", "--from", "library"])
            .assert()
            .success()
            .stdout(predicate::str::contains("introduces no file changes"));
        Ok(())
    }

    #[test]
    fn test_explain_prints_code_refs() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let _repo = load_fixture(&home)?;

        tutorial_cmd(home.path())
            .args(["explain", "library"])
            .assert()
            .success()
            .stdout(predicate::str::contains("# Library"))
            .stdout(predicate::str::contains("Code references"))
            .stdout(predicate::str::contains("src/lib.rs:1-3"))
            .stdout(predicate::str::contains("src/main.rs:2"));
        Ok(())
    }
}

#[cfg(test)]
mod validate_command_tests {
    use super::*;

    #[test]
    fn test_validate_good_file() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let dir = TempDir::new()?;
        create_file(dir.path(), "tutorial.yaml", TUTORIAL_YAML)?;

        tutorial_cmd(home.path())
            .arg("validate")
            .arg(dir.path().join("tutorial.yaml"))
            .assert()
            .success()
            .stdout(predicate::str::contains("is a valid tutorial with 4 step(s)"));
        Ok(())
    }

    #[test]
    fn test_validate_reports_every_error() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let dir = TempDir::new()?;
        create_file(
            dir.path(),
            "tutorial.json",
            r#"{ "name": "x", "steps": [ { "id": "a", "title": "A", "gitRef": "v1", "explanation": "a.md", "parentId": "zzz" }, { "id": "a" } ] }"#,
        )?;

        tutorial_cmd(home.path())
            .arg("validate")
            .arg(dir.path().join("tutorial.json"))
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::contains("description: is required"))
            .stdout(predicate::str::contains("version: is required"))
            .stdout(predicate::str::contains("steps[1].title"))
            .stdout(predicate::str::contains("duplicate step id 'a'"))
            .stdout(predicate::str::contains("parent step 'zzz' does not exist"));
        Ok(())
    }

    #[test]
    fn test_validate_unsupported_extension() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let dir = TempDir::new()?;
        create_file(dir.path(), "tutorial.toml", "name = 'x'")?;

        tutorial_cmd(home.path())
            .arg("validate")
            .arg(dir.path().join("tutorial.toml"))
            .assert()
            .failure()
            .stdout(predicate::str::contains("Unsupported config format"));
        Ok(())
    }
}
