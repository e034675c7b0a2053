use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn taskflow(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("taskflow").expect("binary");
    cmd.arg("--data-dir")
        .arg(data_dir.path().join("data"))
        .arg("--config-dir")
        .arg(data_dir.path());
    cmd
}

#[test]
fn help_works() {
    Command::cargo_bin("taskflow")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("local task tracker"));
}

#[test]
fn subcommand_help_works() {
    for cmd in ["init", "register", "login", "logout", "whoami", "task"] {
        Command::cargo_bin("taskflow")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn init_login_and_board_flow() {
    let dir = TempDir::new().unwrap();

    taskflow(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("taskflow init: initialized"));

    // Second init is a no-op.
    taskflow(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("nothing to do"));

    taskflow(&dir)
        .args(["login", "--email", "john@example.com", "--password", "password123"])
        .assert()
        .success()
        .stdout(contains("welcome back, John Doe"));

    taskflow(&dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains("john@example.com"));

    taskflow(&dir)
        .args(["task", "board"])
        .assert()
        .success()
        .stdout(contains("To Do (1)"))
        .stdout(contains("In Progress (1)"))
        .stdout(contains("Completed (1)"));

    taskflow(&dir)
        .args(["task", "stats", "--json"])
        .assert()
        .success()
        .stdout(contains("\"total\": 3"));
}

#[test]
fn wrong_password_exits_with_auth_code() {
    let dir = TempDir::new().unwrap();

    taskflow(&dir).arg("init").assert().success();

    taskflow(&dir)
        .args(["login", "--email", "john@example.com", "--password", "wrong"])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("invalid email or password"));
}

#[test]
fn task_commands_require_a_session() {
    let dir = TempDir::new().unwrap();

    taskflow(&dir)
        .args(["task", "list"])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("not signed in"));
}

#[test]
fn add_edit_and_remove_a_task() {
    let dir = TempDir::new().unwrap();

    taskflow(&dir).arg("init").assert().success();
    taskflow(&dir)
        .args(["login", "--email", "john@example.com", "--password", "password123"])
        .assert()
        .success();

    taskflow(&dir)
        .args([
            "task",
            "add",
            "Dentist appointment",
            "--category",
            "health",
            "--priority",
            "high",
            "--due",
            "2030-06-01",
        ])
        .assert()
        .success()
        .stdout(contains("created task_"));

    taskflow(&dir)
        .args(["task", "list", "--search", "dentist"])
        .assert()
        .success()
        .stdout(contains("Dentist appointment"))
        .stdout(contains("1 of 4"));

    taskflow(&dir)
        .args(["task", "edit", "task1", "--priority", "low", "--due", "2030-07-01"])
        .assert()
        .success()
        .stdout(contains("updated task1"));

    taskflow(&dir)
        .args(["task", "status", "task1", "completed"])
        .assert()
        .success()
        .stdout(contains("task1 is now Completed"));

    taskflow(&dir)
        .args(["task", "rm", "task3"])
        .assert()
        .success()
        .stdout(contains("deleted task3"));

    taskflow(&dir)
        .args(["task", "rm", "task3"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("task not found"));
}

#[test]
fn short_title_is_rejected_with_user_error() {
    let dir = TempDir::new().unwrap();

    taskflow(&dir).arg("init").assert().success();
    taskflow(&dir)
        .args(["login", "--email", "john@example.com", "--password", "password123"])
        .assert()
        .success();

    taskflow(&dir)
        .args(["task", "add", "ab", "--category", "work"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("title must be at least 3 characters"));
}
