use std::time::Duration;

use pretty_assertions::assert_eq;
use report_core::{Job, JobMode, ResultItem, SummaryRequest, SummaryRow};
use report_engine::{ClientSettings, FailureKind, ReportApi, ReqwestReportApi, SummaryOutcome};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestReportApi {
    let settings = ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    };
    ReqwestReportApi::new(&settings).expect("valid settings")
}

fn refunds_job() -> Job {
    Job {
        query: "refunds".to_string(),
        mode: JobMode::PureSimilarity,
        result_limit: Some(5),
    }
}

#[tokio::test]
async fn start_analysis_posts_query_and_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start_analysis"))
        .and(body_json(json!({
            "query": "refunds",
            "useLLM": false,
            "resultLimit": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "started"})))
        .expect(1)
        .mount(&server)
        .await;

    let ack = api_for(&server)
        .start_analysis(&refunds_job())
        .await
        .expect("start ok");
    assert_eq!(ack.message.as_deref(), Some("started"));
}

#[tokio::test]
async fn progress_is_decoded_with_unknown_file_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "progress": 100,
            "results": [
                {"result": "Refunds within 30 days", "relevance": 0.9, "file_name": "policy.pdf"},
                {"result": "Untitled match", "relevance": 0.4}
            ],
            "full_summary": "Two sources",
            "file_summaries": ["Policy text"],
            "file_names": ["policy.pdf"]
        })))
        .mount(&server)
        .await;

    let snapshot = api_for(&server).poll_progress().await.expect("progress ok");
    assert!(snapshot.terminal());
    assert_eq!(
        snapshot.results,
        vec![
            ResultItem::new("Refunds within 30 days", 0.9, Some("policy.pdf")),
            ResultItem::new("Untitled match", 0.4, None),
        ]
    );
    assert_eq!(snapshot.results[1].file_name_or_unknown(), "Unknown");
    assert_eq!(snapshot.full_summary.as_deref(), Some("Two sources"));
    assert_eq!(snapshot.file_summaries.len(), 1);
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_progress"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = api_for(&server).poll_progress().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn malformed_progress_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"progress": 140})))
        .mount(&server)
        .await;

    let err = api_for(&server).poll_progress().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/get_progress"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).poll_progress().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_server_hits_the_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_progress"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"progress": 10}))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: server.uri(),
        request_timeout: Some(Duration::from_millis(100)),
        ..ClientSettings::default()
    };
    let api = ReqwestReportApi::new(&settings).expect("valid settings");
    let err = api.poll_progress().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn summary_sends_rows_and_reads_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_summary"))
        .and(body_json(json!({
            "query": "refunds",
            "data": [
                {"result": "Refunds within 30 days", "file_name": "policy.pdf", "relevance": 0.875}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "formatted_output": "<p>Refunds take 30 days.</p>"
        })))
        .mount(&server)
        .await;

    let request = SummaryRequest {
        query: "refunds".to_string(),
        rows: vec![SummaryRow {
            result_text: "Refunds within 30 days".to_string(),
            file_name: "policy.pdf".to_string(),
            relevance: 0.875,
        }],
    };
    let outcome = api_for(&server)
        .generate_summary(&request)
        .await
        .expect("summary ok");
    assert_eq!(
        outcome,
        SummaryOutcome::Ready {
            formatted_output: "<p>Refunds take 30 days.</p>".to_string()
        }
    );
}

#[tokio::test]
async fn summary_rejection_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "model unavailable"
        })))
        .mount(&server)
        .await;

    let request = SummaryRequest {
        query: "refunds".to_string(),
        rows: Vec::new(),
    };
    let outcome = api_for(&server).generate_summary(&request).await.unwrap();
    assert_eq!(
        outcome,
        SummaryOutcome::Rejected {
            error: "model unavailable".to_string()
        }
    );
}

#[test]
fn invalid_base_url_is_rejected_up_front() {
    let settings = ClientSettings {
        base_url: "::not a url".to_string(),
        ..ClientSettings::default()
    };
    let err = ReqwestReportApi::new(&settings).unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
