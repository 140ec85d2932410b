/// Flat key/value observability tags emitted by every operation and
/// consumed by an external telemetry collector. Fire-and-forget: a sink
/// must never affect control flow or return an error.
pub trait MetricsSink {
    fn emit(&self, operation: &str, tags: &[(&str, String)]);
}

/// Default sink writing tags through the `log` facade.
pub struct LogSink;

pub static LOG_SINK: LogSink = LogSink;

impl MetricsSink for LogSink {
    fn emit(&self, operation: &str, tags: &[(&str, String)]) {
        let mut payload = serde_json::Map::new();
        for (key, value) in tags {
            payload.insert((*key).to_string(), serde_json::Value::String(value.clone()));
        }
        log::info!("metric {} {}", operation, serde_json::Value::Object(payload));
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::MetricsSink;
    use std::cell::RefCell;

    /// Records emissions so tests can assert on them.
    pub struct RecordingSink {
        pub emitted: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            RecordingSink {
                emitted: RefCell::new(Vec::new()),
            }
        }
    }

    impl MetricsSink for RecordingSink {
        fn emit(&self, operation: &str, tags: &[(&str, String)]) {
            self.emitted.borrow_mut().push((
                operation.to_string(),
                tags.iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            ));
        }
    }
}
