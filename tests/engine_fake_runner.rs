mod common;
use crate::common::builders::{inspect_registry, RegistryBuilder};
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::time::Duration;

use taskchain::engine::{Engine, EngineOptions, InvocationState};
use taskchain::errors::TaskchainError;
use taskchain::exec::{cancel_pair, CancelSignal};
use taskchain_test_utils::fake_runner::ScriptedRunner;

type TestResult = Result<(), Box<dyn Error>>;

fn quiet() -> EngineOptions {
    EngineOptions {
        echo_commands: false,
    }
}

#[tokio::test]
async fn inspect_runs_every_check_in_order() -> TestResult {
    init_tracing();
    let registry = inspect_registry();
    let runner = ScriptedRunner::new();
    let mut engine = Engine::new(&registry, runner.clone(), quiet());

    let report = engine.invoke("inspect", &mut CancelSignal::never()).await?;

    assert_eq!(
        runner.commands(),
        vec!["black --check src", "flake8 src", "mypy src"]
    );
    assert_eq!(report.root, "inspect");
    assert_eq!(report.targets, vec!["check", "lint", "typecheck", "inspect"]);
    assert_eq!(report.steps_run, 3);
    assert_eq!(engine.state(), InvocationState::Succeeded);
    Ok(())
}

#[tokio::test]
async fn failing_lint_stops_typecheck_and_inspect() -> TestResult {
    init_tracing();
    let registry = inspect_registry();
    let runner = ScriptedRunner::new().exit_with("flake8 src", 1);
    let mut engine = Engine::new(&registry, runner.clone(), quiet());

    let err = engine
        .invoke("inspect", &mut CancelSignal::never())
        .await
        .unwrap_err();

    match err {
        TaskchainError::StepFailure { ref target, step, status } => {
            assert_eq!(target, "lint");
            assert_eq!(step, 0);
            assert_eq!(status, 1);
        }
        ref other => panic!("expected StepFailure, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 1);
    assert_eq!(runner.commands(), vec!["black --check src", "flake8 src"]);
    assert_eq!(engine.state(), InvocationState::Failed);
    Ok(())
}

#[tokio::test]
async fn failure_at_step_k_skips_rest_of_target_and_later_targets() -> TestResult {
    let registry = RegistryBuilder::new()
        .target("build", &[], &["gen", "compile", "link", "strip"])
        .target("test", &["build"], &["run tests"])
        .build();
    let runner = ScriptedRunner::new().exit_with("compile", 2);
    let mut engine = Engine::new(&registry, runner.clone(), quiet());

    let err = engine
        .invoke("test", &mut CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TaskchainError::StepFailure { ref target, step: 1, status: 2 } if target == "build"
    ));
    assert_eq!(runner.commands(), vec!["gen", "compile"]);
    Ok(())
}

#[tokio::test]
async fn unknown_dependency_runs_nothing() -> TestResult {
    let registry = RegistryBuilder::new()
        .target("first", &[], &["echo first"])
        .target("root", &["first", "ghost"], &["echo root"])
        .build();
    let runner = ScriptedRunner::new();
    let mut engine = Engine::new(&registry, runner.clone(), quiet());

    let err = engine
        .invoke("root", &mut CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(err, TaskchainError::UnknownTarget { ref name, .. } if name == "ghost"));
    assert_eq!(err.exit_code(), 2);
    assert!(runner.commands().is_empty());
    assert_eq!(engine.state(), InvocationState::Failed);
    Ok(())
}

#[tokio::test]
async fn cycle_runs_nothing() -> TestResult {
    let registry = RegistryBuilder::new()
        .target("a", &["b"], &["echo a"])
        .target("b", &["a"], &["echo b"])
        .build();
    let runner = ScriptedRunner::new();
    let mut engine = Engine::new(&registry, runner.clone(), quiet());

    let err = engine
        .invoke("a", &mut CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(err, TaskchainError::CyclicDependency { .. }));
    assert!(runner.commands().is_empty());
    Ok(())
}

#[tokio::test]
async fn grouping_target_counts_as_succeeded_for_dependents() -> TestResult {
    let registry = RegistryBuilder::new()
        .target("fmt", &[], &["black src"])
        .target("checks", &["fmt"], &[])
        .target("release", &["checks"], &["publish"])
        .build();
    let runner = ScriptedRunner::new();
    let mut engine = Engine::new(&registry, runner.clone(), quiet());

    let report = engine.invoke("release", &mut CancelSignal::never()).await?;

    assert_eq!(runner.commands(), vec!["black src", "publish"]);
    assert_eq!(report.targets, vec!["fmt", "checks", "release"]);
    Ok(())
}

#[tokio::test]
async fn diamond_runs_shared_dependency_once() -> TestResult {
    let registry = RegistryBuilder::new()
        .target("c", &[], &["make c"])
        .target("a", &["c"], &["make a"])
        .target("b", &["c"], &["make b"])
        .target("root", &["a", "b"], &[])
        .build();
    let runner = ScriptedRunner::new();
    let mut engine = Engine::new(&registry, runner.clone(), quiet());

    engine.invoke("root", &mut CancelSignal::never()).await?;

    assert_eq!(runner.commands(), vec!["make c", "make a", "make b"]);
    Ok(())
}

#[tokio::test]
async fn each_invocation_recomputes_and_reruns() -> TestResult {
    let registry = inspect_registry();
    let runner = ScriptedRunner::new();
    let mut engine = Engine::new(&registry, runner.clone(), quiet());

    engine.invoke("lint", &mut CancelSignal::never()).await?;
    engine.invoke("lint", &mut CancelSignal::never()).await?;

    assert_eq!(runner.commands(), vec!["flake8 src", "flake8 src"]);
    Ok(())
}

#[tokio::test]
async fn cancellation_mid_step_aborts_with_cancelled() -> TestResult {
    init_tracing();
    let registry = RegistryBuilder::new()
        .target("serve", &[], &["start server", "never reached"])
        .target("after", &["serve"], &["echo after"])
        .build();
    let runner = ScriptedRunner::new().hang_on("start server");
    let (handle, mut cancel) = cancel_pair();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    });

    let mut engine = Engine::new(&registry, runner.clone(), quiet());
    let err = with_timeout(engine.invoke("after", &mut cancel))
        .await
        .unwrap_err();

    match err {
        TaskchainError::Cancelled { ref target, step } => {
            assert_eq!(target, "serve");
            assert_eq!(step, 0);
        }
        ref other => panic!("expected Cancelled, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 130);
    assert_eq!(runner.commands(), vec!["start server"]);
    assert_eq!(engine.state(), InvocationState::Cancelled);
    Ok(())
}

#[tokio::test]
async fn cancellation_before_start_runs_nothing() -> TestResult {
    let registry = inspect_registry();
    let runner = ScriptedRunner::new();
    let (handle, mut cancel) = cancel_pair();
    handle.cancel();

    let mut engine = Engine::new(&registry, runner.clone(), quiet());
    let err = engine.invoke("inspect", &mut cancel).await.unwrap_err();

    assert!(matches!(
        err,
        TaskchainError::Cancelled { ref target, step: 0 } if target == "check"
    ));
    assert!(runner.commands().is_empty());
    Ok(())
}

#[tokio::test]
async fn resolve_and_execute_can_be_driven_separately() -> TestResult {
    let registry = inspect_registry();
    let runner = ScriptedRunner::new();
    let mut engine = Engine::new(&registry, runner.clone(), quiet());

    assert_eq!(engine.state(), InvocationState::Idle);
    let plan = engine.resolve("typecheck")?;
    assert_eq!(engine.state(), InvocationState::Resolving);

    let report = engine.execute(&plan, &mut CancelSignal::never()).await?;
    assert_eq!(report.steps_run, 1);
    assert_eq!(engine.state(), InvocationState::Succeeded);
    assert!(engine.state().is_terminal());

    let recorded = engine.into_runner().executed();
    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].target, "typecheck");
    assert_eq!(recorded[0].index, 0);
    Ok(())
}
