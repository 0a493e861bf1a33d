// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::io::Write as _;

use mockito::Matcher;
use r2r_console::backend::BackendClient;
use r2r_console::commands::{dev, report_failure, status, task, AutofixArgs, TaskArgs};
use r2r_console::config::ConsoleConfig;
use r2r_console::ConsoleError;

fn client_for(url: &str) -> BackendClient {
    let config = ConsoleConfig {
        backend_url: url.to_string(),
        ..ConsoleConfig::default()
    };
    BackendClient::new(&config).unwrap()
}

fn text(out: Vec<u8>) -> String {
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_status_reports_health_fields() {
    let mut server = mockito::Server::new_async().await;
    let _health = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"agents":42,"swarm_active":true,"rag_docs":7,"version":"3.9.5"}"#)
        .create_async()
        .await;
    let _diag = server
        .mock("GET", "/api/diagnostics")
        .with_status(200)
        .with_body(r#"{"db":"connected"}"#)
        .create_async()
        .await;

    let mut out = Vec::new();
    status::run(&client_for(&server.url()), &mut out).await.unwrap();
    let output = text(out);

    assert!(output.contains("ONLINE"));
    assert!(output.contains("42"));
    assert!(output.contains("ACTIVE"));
    assert!(output.contains('7'));
    assert!(output.contains("3.9.5"));
    assert!(output.contains("connected"));
}

#[tokio::test]
async fn test_status_survives_diagnostics_failure() {
    let mut server = mockito::Server::new_async().await;
    let _health = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"agents":42,"swarm_active":false,"rag_docs":7,"version":"3.9.5"}"#)
        .create_async()
        .await;
    let _diag = server
        .mock("GET", "/api/diagnostics")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let mut out = Vec::new();
    status::run(&client_for(&server.url()), &mut out).await.unwrap();
    let output = text(out);

    assert!(output.contains("Agents: "));
    assert!(output.contains("42"));
    assert!(output.contains("RESTRICTED"));
    assert!(output.contains("unknown"));
}

#[tokio::test]
async fn test_status_offline() {
    let mut out = Vec::new();
    status::run(&client_for("http://127.0.0.1:1"), &mut out)
        .await
        .unwrap();
    let output = text(out);

    assert!(output.contains("OFFLINE"));
    assert!(output.contains("http://127.0.0.1:1"));
}

#[tokio::test]
async fn test_task_success_output() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/tasks")
        .with_status(200)
        .with_body(r#"{"status":"completed","result":{"reasoning":"Done."}}"#)
        .create_async()
        .await;

    let args = TaskArgs {
        description: vec!["build".to_string(), "a login page".to_string()],
        file: None,
    };
    let mut out = Vec::new();
    task::handle_command(args, &client_for(&server.url()), &mut out)
        .await
        .unwrap();
    let output = text(out);

    assert!(output.contains("Done."));
    assert!(!output.contains('✗'));
}

#[tokio::test]
async fn test_task_rejection_line_has_detail() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/tasks")
        .with_status(500)
        .with_body(r#"{"detail":"overloaded"}"#)
        .create_async()
        .await;

    let args = TaskArgs {
        description: vec!["build a login page".to_string()],
        file: None,
    };
    let mut out = Vec::new();
    let err = task::handle_command(args, &client_for(&server.url()), &mut out)
        .await
        .unwrap_err();
    report_failure(&mut out, "Task failed", &err).unwrap();

    let output = text(out);
    let error_line = output.lines().last().unwrap();
    assert!(error_line.contains("Task failed"));
    assert!(error_line.contains("overloaded"));
}

#[tokio::test]
async fn test_empty_directive_never_reaches_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tasks")
        .expect(0)
        .create_async()
        .await;

    let args = TaskArgs {
        description: vec!["   ".to_string()],
        file: None,
    };
    let mut out = Vec::new();
    let err = task::handle_command(args, &client_for(&server.url()), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::InvalidInput(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_task_attaches_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "TypeError: x is undefined").unwrap();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tasks")
        .match_body(Matcher::Regex(
            "explain this.*TypeError: x is undefined".to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"status":"completed"}"#)
        .create_async()
        .await;

    let args = TaskArgs {
        description: vec!["explain this".to_string()],
        file: Some(file.path().to_path_buf()),
    };
    let mut out = Vec::new();
    task::handle_command(args, &client_for(&server.url()), &mut out)
        .await
        .unwrap();

    assert!(text(out).contains("Task complete."));
    mock.assert_async().await;
}

#[cfg(unix)]
#[tokio::test]
async fn test_autofix_passing_suite_skips_swarm() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tasks")
        .expect(0)
        .create_async()
        .await;

    let args = AutofixArgs {
        test_command: "true".to_string(),
    };
    let mut out = Vec::new();
    dev::autofix(args, &client_for(&server.url()), &mut out)
        .await
        .unwrap();

    assert!(text(out).contains("No healing required"));
    mock.assert_async().await;
}

#[cfg(unix)]
#[tokio::test]
async fn test_autofix_forwards_failure_output() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tasks")
        .match_body(Matcher::Regex("FIX THIS ERROR: .*assertion failed".to_string()))
        .with_status(200)
        .with_body(r#"{"status":"completed","result":{"reasoning":"Patch: guard null user"}}"#)
        .create_async()
        .await;

    let args = AutofixArgs {
        test_command: "echo 'assertion failed: left == right'; exit 1".to_string(),
    };
    let mut out = Vec::new();
    dev::autofix(args, &client_for(&server.url()), &mut out)
        .await
        .unwrap();

    let output = text(out);
    assert!(output.contains("Failures detected"));
    assert!(output.contains("Patch: guard null user"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rebuild_with_missing_compose_file_is_tool_failure() {
    let args = dev::RebuildArgs {
        prune: false,
        compose_file: "/nonexistent/r2r/docker-compose.yml".into(),
    };
    let mut out = Vec::new();
    let err = dev::rebuild(args, &mut out).await.unwrap_err();
    assert!(matches!(err, ConsoleError::LocalToolFailure { .. }));
}

#[tokio::test]
async fn test_unreachable_failure_adds_hint() {
    let args = TaskArgs {
        description: vec!["build a login page".to_string()],
        file: None,
    };
    let mut out = Vec::new();
    let err = task::handle_command(args, &client_for("http://127.0.0.1:1"), &mut out)
        .await
        .unwrap_err();
    assert!(err.is_unreachable());

    let mut report = Vec::new();
    report_failure(&mut report, "Task failed", &err).unwrap();
    let report = text(report);
    assert_eq!(report.lines().count(), 2);
    assert!(report.contains("Task failed"));
    assert!(report.contains("Is the backend running?"));
}

#[test]
fn test_local_failure_has_no_hint() {
    let err = ConsoleError::InvalidInput("directive must not be empty".to_string());
    let mut report = Vec::new();
    report_failure(&mut report, "Task failed", &err).unwrap();
    let report = text(report);
    assert_eq!(report.lines().count(), 1);
    assert!(!report.contains("Is the backend running?"));
}
