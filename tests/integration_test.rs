use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};

fn restclient(server: &Server) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("restclient"));
    cmd.env_remove("RESTCLIENT_TIMEOUT")
        .env("RESTCLIENT_BASE_URL", format!("{}/api/", server.url()));
    cmd
}

#[test]
fn test_get_prints_collection() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/api/widgets")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 1, "name": "bolt"}, {"id": 2, "name": "nut"}]"#)
        .create();

    restclient(&server)
        .args(["get", "widgets"])
        .assert()
        .success()
        .stdout(predicates::str::contains("\"bolt\""))
        .stdout(predicates::str::contains("\"nut\""));

    mock.assert();
}

#[test]
fn test_get_buffered_prints_same_collection() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/api/widgets")
        .with_status(200)
        .with_body(r#"[{"id": 1, "name": "bolt"}]"#)
        .create();

    restclient(&server)
        .args(["--buffered", "get", "widgets"])
        .assert()
        .success()
        .stdout(predicates::str::contains("\"bolt\""));
}

#[test]
fn test_get_server_error_fails() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/api/widgets")
        .with_status(500)
        .create();

    restclient(&server)
        .args(["get", "widgets"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("500"));
}

#[test]
fn test_post_prints_created_resource() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/api/widgets")
        .match_header("content-type", "application/json")
        .match_body(Matcher::JsonString(r#"{"name": "gear"}"#.to_string()))
        .with_status(201)
        .with_body(r#"{"id": 3, "name": "gear"}"#)
        .create();

    restclient(&server)
        .args(["post", "widgets", "--data", r#"{"name": "gear"}"#])
        .assert()
        .success()
        .stdout(predicates::str::contains("\"id\": 3"));

    mock.assert();
}

#[test]
fn test_post_rejects_invalid_json_data() {
    let server = Server::new();

    restclient(&server)
        .args(["post", "widgets", "--data", "{oops"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("not valid JSON"));
}

#[test]
fn test_delete_success_is_silent() {
    let mut server = Server::new();
    let mock = server
        .mock("DELETE", "/api/widgets/3")
        .with_status(204)
        .create();

    restclient(&server)
        .args(["delete", "widgets/3"])
        .assert()
        .success()
        .stdout(predicates::str::is_empty());

    mock.assert();
}

#[test]
fn test_delete_not_found_fails() {
    let mut server = Server::new();
    let _mock = server
        .mock("DELETE", "/api/widgets/404")
        .with_status(404)
        .create();

    restclient(&server)
        .args(["delete", "widgets/404"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("404"));
}

#[test]
fn test_invalid_base_url_fails_before_any_request() {
    Command::new(cargo::cargo_bin!("restclient"))
        .args(["--base-url", "not a uri", "get", "widgets"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid base address"));
}

#[test]
fn test_missing_base_url_fails() {
    Command::new(cargo::cargo_bin!("restclient"))
        .env_remove("RESTCLIENT_BASE_URL")
        .args(["get", "widgets"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("No base URL"));
}

#[test]
fn test_delete_not_modified_fails() {
    let mut server = Server::new();
    let _mock = server
        .mock("DELETE", "/api/widgets/3")
        .with_status(304)
        .create();

    restclient(&server)
        .args(["delete", "widgets/3"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("304"));
}

#[test]
fn test_zero_timeout_is_rejected() {
    let server = Server::new();

    restclient(&server)
        .args(["--timeout", "0", "get", "widgets"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("at least one second"));
}
