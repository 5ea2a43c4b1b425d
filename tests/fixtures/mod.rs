#![allow(dead_code)]

use kafka_connect_exporter::Host;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Connector name with the task states its status endpoint reports.
pub type FakeConnector<'a> = (&'a str, &'a [&'a str]);

pub fn host_of(server: &MockServer) -> Host {
    Host::parse(server.uri()).expect("mock server uri is a valid host")
}

pub fn status_body(connector: &str, states: &[&str]) -> serde_json::Value {
    let tasks: Vec<serde_json::Value> = states
        .iter()
        .enumerate()
        .map(|(id, state)| json!({ "id": id, "state": state, "worker_id": "10.0.0.1:8083" }))
        .collect();

    json!({
        "name": connector,
        "connector": { "state": "RUNNING", "worker_id": "10.0.0.1:8083" },
        "tasks": tasks,
    })
}

/// Mounts a healthy Kafka Connect host serving `connectors` on `server`.
pub async fn mount_connect_host(server: &MockServer, connectors: &[FakeConnector<'_>]) {
    let names: Vec<&str> = connectors.iter().map(|(name, _)| *name).collect();
    Mock::given(method("GET"))
        .and(path("/connectors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(names))
        .mount(server)
        .await;

    for (name, states) in connectors {
        mount_status(server, name, ResponseTemplate::new(200).set_body_json(status_body(name, states))).await;
    }
}

pub async fn mount_status(server: &MockServer, connector: &str, response: ResponseTemplate) {
    let host = host_of(server);
    let url = host.connector_status_url(connector).expect("status url for connector");
    Mock::given(method("GET"))
        .and(path(url.path()))
        .respond_with(response)
        .mount(server)
        .await;
}

pub async fn mount_failing_host(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/connectors"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}
