use serde_json::json;
use std::time::Duration;
use thumbnail_generator::{
    config::{PollPolicy, ProviderConfig},
    driver::JobDriver,
    models::GenerationRequest,
    provider::{MockPredictionClient, Prediction, PredictionClient, PredictionOutput},
    session::Session,
    Error,
};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CREATE_PATH: &str = "/v1/models/black-forest-labs/flux-1.1-pro/predictions";

fn instant_policy() -> PollPolicy {
    PollPolicy {
        interval: Duration::ZERO,
        max_attempts: 60,
    }
}

fn http_driver(server: &MockServer, token: Option<&str>) -> JobDriver {
    let config = ProviderConfig {
        api_token: token.map(str::to_string),
        base_url: server.uri(),
        ..ProviderConfig::default()
    };
    JobDriver::new(
        Box::new(PredictionClient::new(config).unwrap()),
        instant_policy(),
    )
}

async fn mount_create(server: &MockServer, id: &str) {
    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": id,
            "status": "starting"
        })))
        .mount(server)
        .await;
}

fn poll_path(id: &str) -> String {
    format!("/v1/predictions/{}", id)
}

#[tokio::test]
async fn test_full_generation_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .and(body_partial_json(json!({
            "input": { "prompt": "YouTube thumbnail with text \"Rust in 100 seconds\", \
                                  bold dramatic high contrast cinematic lighting intense colors impactful, \
                                  16:9 aspect ratio, high quality, professional YouTube thumbnail" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "p-1",
            "status": "starting"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(poll_path("p-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p-1",
            "status": "processing"
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(poll_path("p-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p-1",
            "status": "succeeded",
            "output": ["https://cdn.test/a.png", "https://cdn.test/b.png", "https://cdn.test/c.png"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(http_driver(&server, Some("r8_test")));
    let thumbnails = session
        .generate(GenerationRequest::new("Rust in 100 seconds").with_style("bold"))
        .await
        .unwrap()
        .to_vec();

    assert_eq!(
        thumbnails,
        vec![
            "https://cdn.test/a.png",
            "https://cdn.test/b.png",
            "https://cdn.test/c.png"
        ]
    );
}

#[tokio::test]
async fn test_single_url_output_is_normalized() {
    let server = MockServer::start().await;
    mount_create(&server, "p-2").await;

    Mock::given(method("GET"))
        .and(path(poll_path("p-2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p-2",
            "status": "succeeded",
            "output": "https://cdn.test/only.png"
        })))
        .mount(&server)
        .await;

    let urls = http_driver(&server, Some("r8_test"))
        .run_generation("a prompt", 1)
        .await
        .unwrap();

    assert_eq!(urls, vec!["https://cdn.test/only.png"]);
}

#[tokio::test]
async fn test_timeout_issues_exactly_max_polls() {
    let server = MockServer::start().await;
    mount_create(&server, "p-3").await;

    Mock::given(method("GET"))
        .and(path(poll_path("p-3")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p-3",
            "status": "processing"
        })))
        .expect(60)
        .mount(&server)
        .await;

    let err = http_driver(&server, Some("r8_test"))
        .run_generation("a prompt", 3)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { attempts: 60 }));
}

#[tokio::test]
async fn test_failed_prediction_reports_provider_message() {
    let server = MockServer::start().await;
    mount_create(&server, "p-4").await;

    Mock::given(method("GET"))
        .and(path(poll_path("p-4")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p-4",
            "status": "failed",
            "error": "bad prompt"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = http_driver(&server, Some("r8_test"))
        .run_generation("a prompt", 3)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::GenerationFailed(ref m) if m == "bad prompt"));
}

#[tokio::test]
async fn test_poll_http_error_becomes_provider_error() {
    let server = MockServer::start().await;
    mount_create(&server, "p-5").await;

    Mock::given(method("GET"))
        .and(path(poll_path("p-5")))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let err = http_driver(&server, Some("r8_test"))
        .run_generation("a prompt", 3)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Provider(_)));
}

#[tokio::test]
async fn test_create_error_payload_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "Invalid version or not permitted"
        })))
        .mount(&server)
        .await;

    let err = http_driver(&server, Some("r8_test"))
        .submit("a prompt", 3)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Provider(ref m) if m == "Invalid version or not permitted"));
}

#[tokio::test]
async fn test_transport_failure_while_polling_is_provider_error() {
    let server = MockServer::start().await;
    mount_create(&server, "p-6").await;

    let prediction = http_driver(&server, Some("r8_test"))
        .submit("a prompt", 3)
        .await
        .unwrap();

    // Status checks go to a host where nothing listens.
    let unreachable = ProviderConfig {
        api_token: Some("r8_test".to_string()),
        base_url: "http://127.0.0.1:9".to_string(),
        ..ProviderConfig::default()
    };
    let driver = JobDriver::new(
        Box::new(PredictionClient::new(unreachable).unwrap()),
        instant_policy(),
    );

    let err = driver.await_completion(&prediction.id).await.unwrap_err();

    match err {
        Error::Provider(message) => assert!(message.starts_with("Network error"), "{}", message),
        other => panic!("expected provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_credential_surfaces_configuration_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = Session::new(http_driver(&server, None));
    let err = session
        .generate(GenerationRequest::new("Rust in 100 seconds"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Configuration(_)));
    assert!(session.thumbnails().is_empty());
}

#[tokio::test]
async fn test_generate_then_refine_with_mock_provider() {
    let provider = MockPredictionClient::new()
        .with_poll_response(Prediction::processing("mock-prediction-1"))
        .with_poll_response(Prediction::succeeded(
            "mock-prediction-1",
            PredictionOutput::Many(vec!["1.png".to_string(), "2.png".to_string()]),
        ))
        .with_poll_response(Prediction::succeeded(
            "mock-prediction-2",
            PredictionOutput::Single("3.png".to_string()),
        ));
    let probe = provider.clone();

    let mut session =
        Session::new(JobDriver::new(Box::new(provider), instant_policy())).with_num_outputs(2);

    session
        .generate(
            GenerationRequest::new("Budget travel")
                .with_context("beach at sunset")
                .with_reference_url("https://youtu.be/xyz"),
        )
        .await
        .unwrap();
    session.select(1).unwrap();
    let refined = session.refine("add a plane").await.unwrap().to_vec();

    assert_eq!(refined, vec!["3.png"]);
    assert_eq!(probe.get_create_count(), 2);
    assert_eq!(probe.get_poll_count(), 3);

    let prompts = probe.prompts();
    assert!(prompts[0].contains("inspired by video style from https://youtu.be/xyz"));
    assert_eq!(
        prompts[1],
        "Refine YouTube thumbnail: add a plane, Original text: \"Budget travel\", \
         beach at sunset, 16:9 aspect ratio, high quality, professional YouTube thumbnail"
    );
}
