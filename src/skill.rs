//! The custom skill batch contract: one request body in, one response body
//! out, with each record succeeding or failing on its own.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{RecordError, SkillError};
use crate::json;
use crate::model::{BatchRequest, BatchResponse, OutputRecord, Record, RecordData};
use crate::provider::EmbeddingProvider;

/// Embed every record of a raw batch request and render the batch response.
///
/// Only an unreadable body fails the batch. Per-record failures end up in that
/// record's `errors` list.
pub async fn handle(provider: &dyn EmbeddingProvider, body: &[u8]) -> Result<String, SkillError> {
    let request = parse_batch(body).inspect_err(|e| {
        if let SkillError::InvalidBody { reason } = e {
            warn!(reason = %reason, "rejecting batch");
        }
    })?;
    info!(records = request.values.len(), "embeddings skill invoked");

    let mut values = Vec::with_capacity(request.values.len());
    for entry in request.values {
        values.push(process(provider, entry).await);
    }

    let failed = values.iter().filter(|r| !r.is_success()).count();
    let body = json::to_string(&BatchResponse { values })?;
    info!(failed, "batch result ready for custom skill");
    Ok(body)
}

/// Parse a request body into a batch. The body must be a JSON object with a
/// `values` array.
pub fn parse_batch(body: &[u8]) -> Result<BatchRequest, SkillError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(SkillError::InvalidBody {
            reason: "empty body".to_owned(),
        });
    }
    serde_json::from_slice(body).map_err(|e| SkillError::InvalidBody {
        reason: e.to_string(),
    })
}

/// Embed one batch entry. Never fails: errors become the record's `errors`
/// entry. An entry that is not an object has no id and is echoed as `null`.
pub async fn process(provider: &dyn EmbeddingProvider, entry: Value) -> OutputRecord {
    let Record { record_id, data } = match Record::try_from(entry) {
        Ok(record) => record,
        Err(e) => return failed(Value::Null, &e),
    };
    match embed_record(provider, data).await {
        Ok(vector) => OutputRecord::success(record_id, vector),
        Err(e) => failed(record_id, &e),
    }
}

fn failed(record_id: Value, err: &RecordError) -> OutputRecord {
    warn!(record_id = %record_id, error = %err, "record failed");
    OutputRecord::failure(record_id, format!("Error: {err}"))
}

async fn embed_record(
    provider: &dyn EmbeddingProvider,
    data: Option<Value>,
) -> Result<Vec<f64>, RecordError> {
    let data = data.ok_or(RecordError::MissingData)?;
    let RecordData { text, input_type } =
        serde_json::from_value(data).map_err(|e| RecordError::InvalidData(e.to_string()))?;
    debug!(input_type = %input_type, "embedding record");
    Ok(provider.embed(&text, &input_type).await?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::mock::{FailingEmbeddingProvider, MockEmbeddingProvider};
    use crate::model::Outcome;

    async fn run(provider: &dyn EmbeddingProvider, body: Value) -> BatchResponse {
        let body = serde_json::to_vec(&body).unwrap();
        let out = handle(provider, &body).await.unwrap();
        serde_json::from_str(&out).unwrap()
    }

    #[tokio::test]
    async fn single_record_round_trip() {
        let provider = MockEmbeddingProvider::new(vec![0.1, 0.2, 0.3]);
        let out = handle(
            &provider,
            br#"{"values":[{"recordId":"1","data":{"text":"hello"}}]}"#,
        )
        .await
        .unwrap();
        assert_eq!(
            out,
            r#"{"values":[{"recordId":"1","data":{"vector":[0.1,0.2,0.3]}}]}"#
        );
    }

    #[tokio::test]
    async fn provider_failure_becomes_record_error() {
        let out = handle(
            &FailingEmbeddingProvider,
            br#"{"values":[{"recordId":"1","data":{"text":"hello"}}]}"#,
        )
        .await
        .unwrap();
        assert_eq!(
            out,
            r#"{"values":[{"recordId":"1","errors":[{"message":"Error: API error: mock failure"}]}]}"#
        );
    }

    #[tokio::test]
    async fn missing_text_only_fails_its_record() {
        let provider = MockEmbeddingProvider::new(vec![1.0]);
        let response = run(
            &provider,
            json!({"values": [
                {"recordId": "a", "data": {"text": "first"}},
                {"recordId": "b", "data": {"input_type": "search_document"}},
                {"recordId": "c", "data": {"text": "third"}}
            ]}),
        )
        .await;

        let ids: Vec<_> = response.values.iter().map(|r| r.record_id.clone()).collect();
        assert_eq!(ids, vec![json!("a"), json!("b"), json!("c")]);
        assert!(response.values[0].is_success());
        assert!(response.values[2].is_success());
        assert_eq!(
            response.values[1],
            OutputRecord::failure(json!("b"), "Error: missing field `text`")
        );
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn missing_or_malformed_data_fails_the_record() {
        let provider = MockEmbeddingProvider::new(vec![1.0]);
        let response = run(
            &provider,
            json!({"values": [
                {"recordId": "no-data"},
                {"recordId": "null-data", "data": null},
                {"recordId": "number-text", "data": {"text": 42}},
                {"recordId": "string-data", "data": "hello"}
            ]}),
        )
        .await;

        assert_eq!(response.values.len(), 4);
        assert_eq!(
            response.values[0],
            OutputRecord::failure(json!("no-data"), "Error: record has no `data` object")
        );
        assert_eq!(
            response.values[1],
            OutputRecord::failure(json!("null-data"), "Error: record has no `data` object")
        );
        for record in &response.values[2..] {
            match &record.outcome {
                Outcome::Failure { errors } => {
                    assert_eq!(errors.len(), 1);
                    assert!(errors[0].message.starts_with("Error: invalid type"));
                }
                Outcome::Success { .. } => panic!("expected failure for {}", record.record_id),
            }
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn non_object_entries_fail_in_place() {
        let provider = MockEmbeddingProvider::new(vec![1.0]);
        let out = handle(
            &provider,
            br#"{"values":[{"recordId":"1","data":{"text":"a"}},null,"junk"]}"#,
        )
        .await
        .unwrap();
        let response: BatchResponse = serde_json::from_str(&out).unwrap();

        assert_eq!(response.values.len(), 3);
        assert_eq!(response.values[0], OutputRecord::success(json!("1"), vec![1.0]));
        for record in &response.values[1..] {
            assert_eq!(
                *record,
                OutputRecord::failure(Value::Null, "Error: record is not an object")
            );
        }
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn input_type_defaults_and_passes_through() {
        let provider = MockEmbeddingProvider::new(vec![1.0]);
        run(
            &provider,
            json!({"values": [
                {"recordId": "1", "data": {"text": "q"}},
                {"recordId": "2", "data": {"text": "d", "input_type": "search_document"}},
                {"recordId": "3", "data": {"text": "x", "input_type": "not-a-real-type"}}
            ]}),
        )
        .await;

        assert_eq!(
            provider.input_types(),
            vec![
                "search_query".to_owned(),
                "search_document".to_owned(),
                "not-a-real-type".to_owned()
            ]
        );
    }

    #[tokio::test]
    async fn record_ids_pass_through_untouched() {
        let provider = MockEmbeddingProvider::new(vec![1.0]);
        let response = run(
            &provider,
            json!({"values": [
                {"recordId": 17, "data": {"text": "a"}},
                {"data": {"text": "b"}},
                {"recordId": "17", "data": {"text": "c"}}
            ]}),
        )
        .await;

        let ids: Vec<_> = response.values.iter().map(|r| r.record_id.clone()).collect();
        assert_eq!(ids, vec![json!(17), Value::Null, json!("17")]);
    }

    #[tokio::test]
    async fn every_output_has_exactly_one_of_data_or_errors() {
        let provider = MockEmbeddingProvider::new(vec![0.5]);
        let body = serde_json::to_vec(&json!({"values": [
            {"recordId": "1", "data": {"text": "ok"}},
            {"recordId": "2", "data": {}},
            {"recordId": "3"}
        ]}))
        .unwrap();
        let out: Value = serde_json::from_str(&handle(&provider, &body).await.unwrap()).unwrap();

        for record in out["values"].as_array().unwrap() {
            let has_data = record.get("data").is_some();
            let has_errors = record.get("errors").is_some();
            assert!(has_data ^ has_errors, "bad record: {record}");
        }
    }

    #[tokio::test]
    async fn empty_values_yield_empty_response() {
        let provider = MockEmbeddingProvider::new(vec![1.0]);
        let out = handle(&provider, br#"{"values":[]}"#).await.unwrap();
        assert_eq!(out, r#"{"values":[]}"#);
    }

    #[test]
    fn unreadable_bodies_fail_the_batch() {
        let bodies: [&[u8]; 8] = [
            b"",
            b"   \n",
            b"not json",
            b"{\"values\":",
            b"null",
            b"[]",
            b"{}",
            b"{\"values\": \"nope\"}",
        ];
        for body in bodies {
            let err = parse_batch(body).err().unwrap_or_else(|| {
                panic!("expected failure for {:?}", String::from_utf8_lossy(body))
            });
            assert!(matches!(err, SkillError::InvalidBody { .. }));
        }
    }
}
