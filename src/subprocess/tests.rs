use super::*;
use crate::mageck::MageckCommands;
use std::path::Path;
use std::time::Duration;

#[cfg(unix)]
#[tokio::test]
async fn test_production_runner_captures_output() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("sh")
        .arg("-c")
        .arg("echo counted; echo 'no reads' >&2; exit 3")
        .build();

    let output = runner.run(command).await.unwrap();
    assert_eq!(output.status, ExitStatus::Error(3));
    assert_eq!(output.stdout.trim(), "counted");
    assert_eq!(output.stderr.trim(), "no reads");
}

#[cfg(unix)]
#[tokio::test]
async fn test_production_runner_inherited_output_is_not_captured() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("echo")
        .arg("progress")
        .inherit_output()
        .build();

    let output = runner.run(command).await.unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_production_runner_respects_working_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("mageck_rep1.count.txt"), "x").unwrap();

    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("ls")
        .current_dir(dir.path())
        .build();

    let output = runner.run(command).await.unwrap();
    assert!(output.status.success());
    assert!(output.stdout.contains("mageck_rep1.count.txt"));
}

#[tokio::test]
async fn test_production_runner_command_not_found() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("mageck-not-installed-12345").build();

    let result = runner.run(command).await;
    assert!(matches!(
        result.unwrap_err(),
        ProcessError::CommandNotFound(_)
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn test_production_runner_timeout() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("sleep")
        .arg("5")
        .timeout(Some(Duration::from_millis(100)))
        .build();

    let result = runner.run(command).await;
    assert!(matches!(result.unwrap_err(), ProcessError::Timeout(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn test_mageck_step_against_real_process() {
    let dir = tempfile::TempDir::new().unwrap();
    let commands = MageckCommands::new("false");
    let command = commands.replicate_test("mageck_D_S_rep1", dir.path());

    let outcome = SubprocessManager::production()
        .mageck()
        .run_step(MageckStep::Test, command)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        StepOutcome::Failed {
            exit_code: Some(1),
            stderr: String::new(),
        }
    );
}

#[tokio::test]
async fn test_mageck_step_success() {
    let (manager, mut mock) = SubprocessManager::mock();
    mock.expect_command("mageck")
        .for_step(MageckStep::Count)
        .returns_success()
        .finish();

    let command = MageckCommands::default().replicate_count(
        Path::new("/data/lib.txt"),
        Path::new("/data/1_S1.fastq.gz"),
        Path::new("/data/2_S2.fastq.gz"),
        "mageck_D_S_rep1",
        Path::new("/data/rep1"),
    );
    let outcome = manager
        .mageck()
        .run_step(MageckStep::Count, command)
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(mock.steps_called(), vec!["count"]);
}

#[tokio::test]
async fn test_mageck_step_failure_keeps_stderr() {
    let (manager, mut mock) = SubprocessManager::mock();
    mock.expect_command("mageck")
        .returns_exit_code(2)
        .returns_stderr("Error: library file not found\n")
        .finish();

    let command = MageckCommands::default().replicate_test("p", Path::new("/data/rep1"));
    let outcome = manager
        .mageck()
        .run_step(MageckStep::Test, command)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        StepOutcome::Failed {
            exit_code: Some(2),
            stderr: "Error: library file not found\n".to_string(),
        }
    );
}

#[tokio::test]
async fn test_mageck_step_not_installed_is_an_error() {
    let (manager, mut mock) = SubprocessManager::mock();
    mock.expect_command("mageck").not_installed().finish();

    let command = MageckCommands::default().replicate_test("p", Path::new("/data/rep1"));
    let result = manager.mageck().run_step(MageckStep::Test, command).await;

    assert!(matches!(
        result.unwrap_err(),
        ProcessError::CommandNotFound(program) if program == "mageck"
    ));
}

#[tokio::test]
async fn test_mock_step_filter_and_unscripted_calls() {
    let mut mock = MockProcessRunner::new();
    mock.expect_command("mageck")
        .for_step(MageckStep::Count)
        .finish();

    let commands = MageckCommands::default();
    let count = commands.design_count(
        Path::new("lib.txt"),
        Path::new("out/mageck"),
        Path::new("out/design.tsv"),
    );
    let test = commands.design_test(Path::new("out/mageck"), Path::new("out"));

    assert!(mock.run(count).await.is_ok());
    assert!(matches!(
        mock.run(test).await.unwrap_err(),
        ProcessError::MockExpectationNotMet(_)
    ));
    assert_eq!(mock.steps_called(), vec!["count", "test"]);
}

#[test]
fn test_process_command_builder() {
    let command = ProcessCommandBuilder::new("mageck")
        .arg("count")
        .path_arg(Path::new("/data/a.fastq.gz"))
        .current_dir(Path::new("/tmp"))
        .timeout(Some(Duration::from_secs(30)))
        .build();

    assert_eq!(command.program, "mageck");
    assert_eq!(command.args, vec!["count", "/data/a.fastq.gz"]);
    assert_eq!(command.working_dir, Some(std::path::PathBuf::from("/tmp")));
    assert_eq!(command.timeout, Some(Duration::from_secs(30)));
    assert!(!command.inherit_output);
}

#[test]
fn test_step_names() {
    assert_eq!(MageckStep::Count.to_string(), "count");
    assert_eq!(MageckStep::Test.as_str(), "test");
}
