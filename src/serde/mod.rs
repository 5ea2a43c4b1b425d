use std::fmt;
use std::time::Duration;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serializer};

use crate::connect::Host;

pub fn serialize_duration_secs<S: Serializer>(that: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(that.as_secs())
}

pub fn deserialize_duration_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let secs: u64 = Deserialize::deserialize(deserializer)?;
    Ok(Duration::from_secs(secs))
}

pub fn serialize_hosts<S: Serializer>(that: &[Host], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(that.len()))?;
    for host in that {
        seq.serialize_element(host.as_str())?;
    }
    seq.end()
}

/// Accepts either a comma-separated string (as given in `KAFKA_CONNECT_HOSTS`) or a sequence of
/// host urls. Entries are trimmed and empty entries dropped.
pub fn deserialize_hosts<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Host>, D::Error> {
    deserializer.deserialize_any(HostsVisitor)
}

struct HostsVisitor;

impl HostsVisitor {
    fn parse_host<E: de::Error>(host: &str) -> Result<Option<Host>, E> {
        let host = host.trim();
        if host.is_empty() {
            return Ok(None);
        }

        Host::parse(host).map(Some).map_err(de::Error::custom)
    }
}

impl<'de> Visitor<'de> for HostsVisitor {
    type Value = Vec<Host>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a comma-separated list or sequence of Kafka Connect host urls")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        let mut hosts = Vec::new();
        for host in value.split(',') {
            hosts.extend(Self::parse_host::<E>(host)?);
        }
        Ok(hosts)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut hosts = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(host) = seq.next_element::<String>()? {
            hosts.extend(Self::parse_host::<A::Error>(&host)?);
        }
        Ok(hosts)
    }
}

#[cfg(test)]
mod tests {
    use claim::*;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Hosts {
        #[serde(serialize_with = "serialize_hosts", deserialize_with = "deserialize_hosts")]
        hosts: Vec<Host>,
    }

    fn labels(hosts: &Hosts) -> Vec<&str> {
        hosts.hosts.iter().map(|h| h.as_str()).collect()
    }

    #[test]
    fn test_deserialize_comma_separated_hosts() {
        let actual: Hosts = assert_ok!(serde_json::from_str(
            r#"{ "hosts": "http://connect-1:8083, http://connect-2:8083,," }"#
        ));
        assert_eq!(labels(&actual), vec!["http://connect-1:8083", "http://connect-2:8083"]);
    }

    #[test]
    fn test_deserialize_host_sequence() {
        let actual: Hosts = assert_ok!(serde_json::from_str(r#"{ "hosts": ["http://a:8083", "http://b:8083"] }"#));
        assert_eq!(labels(&actual), vec!["http://a:8083", "http://b:8083"]);

        let json = assert_ok!(serde_json::to_string(&actual));
        assert_eq!(json, r#"{"hosts":["http://a:8083","http://b:8083"]}"#);
    }

    #[test]
    fn test_reject_invalid_host() {
        assert_err!(serde_json::from_str::<Hosts>(r#"{ "hosts": "http://ok:8083,not a url" }"#));
    }
}
