use serde::{Deserialize, Serialize};

/// Body of `GET /connectors/{name}/status`.
///
/// Missing fields take their defaults and unknown fields are ignored, so partial or newer
/// payloads still decode.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorStatus {
    pub name: String,
    pub connector: ConnectorState,
    pub tasks: Vec<TaskStatus>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorState {
    pub state: String,
    pub worker_id: String,
}

/// One element of a connector's task list as reported at query time.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskStatus {
    pub id: i64,
    pub state: String,
    pub worker_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

#[cfg(test)]
mod tests {
    use claim::*;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_decode_full_connector_status() {
        let body = r#"{
            "name": "orders-sink",
            "connector": { "state": "RUNNING", "worker_id": "10.0.0.7:8083" },
            "tasks": [
                { "id": 0, "state": "RUNNING", "worker_id": "10.0.0.7:8083" },
                { "id": 1, "state": "FAILED", "worker_id": "10.0.0.8:8083", "trace": "org.apache.kafka..." }
            ],
            "type": "sink"
        }"#;

        let actual: ConnectorStatus = assert_ok!(serde_json::from_str(body));
        assert_eq!(
            actual,
            ConnectorStatus {
                name: "orders-sink".to_string(),
                connector: ConnectorState {
                    state: "RUNNING".to_string(),
                    worker_id: "10.0.0.7:8083".to_string(),
                },
                tasks: vec![
                    TaskStatus {
                        id: 0,
                        state: "RUNNING".to_string(),
                        worker_id: "10.0.0.7:8083".to_string(),
                        trace: None,
                    },
                    TaskStatus {
                        id: 1,
                        state: "FAILED".to_string(),
                        worker_id: "10.0.0.8:8083".to_string(),
                        trace: Some("org.apache.kafka...".to_string()),
                    },
                ],
            }
        );
    }

    #[test]
    fn test_decode_sparse_connector_status() {
        let body = r#"{ "name": "connector1", "tasks": [{ "state": "RUNNING" }, { "state": "FAILED" }] }"#;
        let actual: ConnectorStatus = assert_ok!(serde_json::from_str(body));
        assert_eq!(actual.name, "connector1");
        assert_eq!(actual.connector, ConnectorState::default());
        assert_eq!(actual.tasks.len(), 2);
        assert_eq!(actual.tasks[1].state, "FAILED");
        assert_none!(actual.tasks[1].trace.as_ref());
    }
}
