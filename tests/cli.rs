use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const PETSTORE: &str = r#"openapi: 3.0.3
info:
  title: Petstore
  version: 1.0.0
paths:
  /pets/{id}:
    get:
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: string
        - name: X-Request-Id
          in: header
          schema:
            type: string
            format: uuid
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                type: object
                properties:
                  name:
                    type: string
"#;

fn examples_cmd() -> Command {
    let mut command = Command::cargo_bin("openapi-examples").unwrap();
    command.args(["generate", "microcks-api-examples"]);
    command
}

fn petstore_file() -> (TempDir, std::path::PathBuf) {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("petstore.yaml");
    fs::write(&path, PETSTORE).unwrap();
    (directory, path)
}

#[test]
fn renders_examples_from_file() {
    let (_directory, path) = petstore_file();
    examples_cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "apiVersion: mocks.microcks.io/v1alpha1\nkind: APIExamples\nmetadata:\n  name: Petstore\n",
        ))
        .stdout(predicate::str::contains("  'GET /pets/{id}':\n    Example:\n"))
        .stdout(predicate::str::contains("          id: string\n"))
        .stdout(predicate::str::contains("        code: 200\n"));
}

#[test]
fn reads_specification_from_stdin() {
    examples_cmd()
        .write_stdin(PETSTORE)
        .assert()
        .success()
        .stdout(predicate::str::contains("'GET /pets/{id}'"));
}

#[test]
fn output_is_deterministic() {
    let (_directory, path) = petstore_file();
    let first = examples_cmd().arg(&path).output().unwrap();
    let second = examples_cmd().arg(&path).output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn routes_header_parameters_when_asked() {
    let (_directory, path) = petstore_file();
    examples_cmd()
        .arg(&path)
        .arg("--header-parameters")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "        headers:\n          X-Request-Id: 3fa85f64-5717-4562-b3fc-2c963f66afa6\n",
        ));
}

#[test]
fn json_format_with_compact_bodies() {
    let (_directory, path) = petstore_file();
    examples_cmd()
        .arg(&path)
        .args(["--format", "json", "--compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"GET /pets/{id}\""))
        .stdout(predicate::str::contains(r#""body": "{\"name\":\"string\"}""#));
}

#[test]
fn missing_file_fails() {
    let directory = TempDir::new().unwrap();
    examples_cmd()
        .arg(directory.path().join("missing.yaml"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("provided file path does not exist"));
}

#[test]
fn unparseable_specification_fails() {
    examples_cmd()
        .write_stdin("openapi: [3.0.0\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error parsing OpenAPI content"));
}

#[test]
fn swagger_document_fails_model_build() {
    examples_cmd()
        .write_stdin("swagger: '2.0'\ninfo:\n  title: Old\n  version: '1'\npaths: {}\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot create v3 model from document"));
}
