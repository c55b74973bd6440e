//! Contract cases against an in-process mock of the LMIS REST API
//!
//! The mock answers the four endpoints the way a correctly seeded dev/UAT
//! server does, so every case must pass; variants of it break one promise
//! at a time.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use lmis_harness::api::{
    fixtures, run_case, run_suite, ContractCase, ContractTargets, Credentials, LmisClient,
};
use lmis_harness::common::config::Config;
use lmis_harness::Error;

/// `superuser:password1`
const SUPERUSER_AUTH: &str = "Basic c3VwZXJ1c2VyOnBhc3N3b3JkMQ==";

/// What the mock server should get wrong
#[derive(Default, Clone, Copy)]
struct Faults {
    create_status_ok: bool,
    null_requisition_id: bool,
    draft_status: bool,
    superuser_last_name_usr: bool,
    drop_via_program: bool,
    tb_renamed_ptv: bool,
    tb_under_mmia: bool,
    emergency: bool,
    echo_other_id: bool,
    program_code_mmia: bool,
    agent_code_f11: bool,
}

#[derive(Default)]
struct MockApi {
    faults: Faults,
    synced_events: Mutex<Vec<Value>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == SUPERUSER_AUTH)
        .unwrap_or(false)
}

fn mystique_programs(faults: Faults) -> Vec<Value> {
    let tb_code = if faults.tb_renamed_ptv { "PTV" } else { "TB" };
    let tb_parent = if faults.tb_under_mmia { "MMIA" } else { "ESS_MEDS" };
    let mut programs = vec![
        json!({ "programCode": "ESS_MEDS", "parentCode": null, "programName": "ESS_MEDS" }),
        json!({ "programCode": "MMIA", "parentCode": null, "programName": "MMIA" }),
        json!({ "programCode": tb_code, "parentCode": tb_parent, "programName": tb_code }),
    ];
    if !faults.drop_via_program {
        programs.push(json!({ "programCode": "VIA", "parentCode": null, "programName": "VIA" }));
    }
    programs
}

async fn login(
    State(api): State<Arc<MockApi>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    match (body["username"].as_str(), body["password"].as_str()) {
        (Some("superuser"), Some("password1")) => (
            StatusCode::OK,
            Json(json!({
                "userInformation": {
                    "userName": "superuser",
                    "userFirstName": "Super",
                    "userLastName": if api.faults.superuser_last_name_usr { "Usr" } else { "User" },
                    "facilityCode": "F10",
                    "facilityId": 408,
                    "facilityName": "Marracuene"
                },
                "facilitySupportedPrograms": []
            })),
        ),
        (Some("mystique"), Some("password1")) => (
            StatusCode::OK,
            Json(json!({
                "userInformation": {
                    "userName": "mystique",
                    "userFirstName": "Raven",
                    "userLastName": "Darkholme",
                    "facilityCode": "HF2",
                    "facilityId": "2"
                },
                "facilitySupportedPrograms": mystique_programs(api.faults)
            })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "bad credentials" })),
        ),
    }
}

async fn create_requisition(
    State(api): State<Arc<MockApi>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    if body["programCode"] != "ESS_MEDS" || body["products"][0]["productCode"] != "P74" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad requisition" })));
    }

    let status = if api.faults.create_status_ok {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let id = if api.faults.null_requisition_id {
        Value::Null
    } else {
        json!(1042)
    };
    (status, Json(json!({ "requisitionId": id })))
}

async fn fetch_requisition(
    State(api): State<Arc<MockApi>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    let faults = api.faults;
    let status = if faults.draft_status {
        "INITIATED"
    } else {
        "AUTHORIZED"
    };
    (
        StatusCode::OK,
        Json(json!({
            "requisition": {
                "id": if faults.echo_other_id { id + 1 } else { id },
                "programCode": if faults.program_code_mmia { "MMIA" } else { "ESS_MEDS" },
                "agentCode": if faults.agent_code_f11 { "F11" } else { "F10" },
                "emergency": faults.emergency,
                "requisitionStatus": status
            }
        })),
    )
}

async fn sync_stock_cards(
    State(api): State<Arc<MockApi>>,
    Path(facility_id): Path<String>,
    headers: HeaderMap,
    Json(events): Json<Vec<Value>>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    if facility_id != "408" {
        return StatusCode::NOT_FOUND;
    }
    api.synced_events.lock().extend(events);
    StatusCode::OK
}

async fn serve(faults: Faults) -> (String, Arc<MockApi>) {
    let api = Arc::new(MockApi {
        faults,
        ..MockApi::default()
    });
    let app = Router::new()
        .route("/rest-api/login", post(login))
        .route("/rest-api/requisitions", post(create_requisition))
        .route("/rest-api/requisitions/:id", get(fetch_requisition))
        .route("/rest-api/facilities/:id/stockCards", post(sync_stock_cards))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), api)
}

fn targets(base_url: &str, account: Credentials) -> ContractTargets {
    let timeout = Duration::from_secs(5);
    ContractTargets {
        dev: LmisClient::new(base_url, timeout).unwrap(),
        uat: LmisClient::new(base_url, timeout).unwrap(),
        account,
    }
}

fn superuser() -> Credentials {
    fixtures::superuser()
}

/// Run one case against a mock with the given faults and return the
/// contract violation message
async fn violation(faults: Faults, case: ContractCase) -> String {
    let (url, _api) = serve(faults).await;
    match run_case(&targets(&url, superuser()), case).await {
        Err(Error::Contract(message)) => message,
        other => panic!("expected a contract violation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_all_cases_pass_against_seeded_server() {
    let (url, api) = serve(Faults::default()).await;
    let results = run_suite(&targets(&url, superuser()), &ContractCase::ALL).await;

    for result in &results {
        assert!(result.passed, "{:?}: {:?}", result.case, result.error);
    }
    assert_eq!(results.len(), 4);

    let synced = api.synced_events.lock();
    assert_eq!(synced.len(), 3);
    assert_eq!(synced[0]["occurred"], "20151010T030530Z");
    assert_eq!(synced[2]["reasonName"], "STOLEN");
}

#[tokio::test]
async fn test_login_decodes_identity() {
    let (url, _api) = serve(Faults::default()).await;
    let client = LmisClient::new(&url, Duration::from_secs(5)).unwrap();

    let response = client.login(&fixtures::mystique()).await.unwrap();
    assert_eq!(response.user_information.identity(), fixtures::mystique_identity());
    assert_eq!(response.facility_supported_programs.len(), 4);
    assert_eq!(
        response.program("TB").and_then(|p| p.parent_code.as_deref()),
        Some("ESS_MEDS")
    );
}

#[tokio::test]
async fn test_wrong_create_status_fails_the_case() {
    let (url, _api) = serve(Faults {
        create_status_ok: true,
        ..Faults::default()
    })
    .await;

    let err = run_case(&targets(&url, superuser()), ContractCase::RequisitionRoundTrip)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnexpectedStatus {
            expected: 201,
            actual: 200,
            ..
        }
    ));
}

#[tokio::test]
async fn test_null_requisition_id_fails_the_case() {
    let (url, _api) = serve(Faults {
        null_requisition_id: true,
        ..Faults::default()
    })
    .await;

    let err = run_case(&targets(&url, superuser()), ContractCase::RequisitionRoundTrip)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Contract(m) if m.contains("requisitionId")));
}

#[tokio::test]
async fn test_wrong_status_field_names_expected_and_actual() {
    let (url, _api) = serve(Faults {
        draft_status: true,
        ..Faults::default()
    })
    .await;

    let err = run_case(&targets(&url, superuser()), ContractCase::RequisitionRoundTrip)
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("requisitionStatus"), "{message}");
    assert!(message.contains("Authorized"), "{message}");
}

#[tokio::test]
async fn test_rejected_credentials_fail_stock_card_sync() {
    let (url, api) = serve(Faults::default()).await;

    let err = run_case(
        &targets(&url, Credentials::new("test_user", "testuser")),
        ContractCase::StockCardSync,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::UnexpectedStatus { actual: 401, .. }));
    assert!(api.synced_events.lock().is_empty());
}

#[tokio::test]
async fn test_uat_environment_still_authenticates_as_superuser() {
    let (url, api) = serve(Faults::default()).await;
    let config = Config::parse(&format!(
        r#"
environment = "uat"

[api]
dev_url = "{url}"
uat_url = "{url}"
request_timeout_secs = 5
"#
    ))
    .unwrap();
    assert_eq!(config.environment.credentials().username, "test_user");

    let targets = ContractTargets::from_config(&config).unwrap();
    assert_eq!(targets.account, fixtures::superuser());

    let results = run_suite(&targets, &ContractCase::ALL).await;
    for result in &results {
        assert!(result.passed, "{:?}: {:?}", result.case, result.error);
    }
    assert_eq!(api.synced_events.lock().len(), 3);
}

#[tokio::test]
async fn test_superuser_identity_must_match_exactly() {
    let message = violation(
        Faults {
            superuser_last_name_usr: true,
            ..Faults::default()
        },
        ContractCase::SuperuserLogin,
    )
    .await;
    assert!(message.starts_with("userInformation:"), "{message}");
    assert!(message.contains("\"Usr\""), "{message}");
}

#[tokio::test]
async fn test_supported_program_count_is_checked() {
    let message = violation(
        Faults {
            drop_via_program: true,
            ..Faults::default()
        },
        ContractCase::SupportedPrograms,
    )
    .await;
    assert!(message.contains("facilitySupportedPrograms.length"), "{message}");
    assert!(message.contains("expected 4, got 3"), "{message}");
}

#[tokio::test]
async fn test_missing_tb_program_is_checked() {
    let message = violation(
        Faults {
            tb_renamed_ptv: true,
            ..Faults::default()
        },
        ContractCase::SupportedPrograms,
    )
    .await;
    assert!(message.contains("program TB"), "{message}");
}

#[tokio::test]
async fn test_tb_parent_code_is_checked() {
    let message = violation(
        Faults {
            tb_under_mmia: true,
            ..Faults::default()
        },
        ContractCase::SupportedPrograms,
    )
    .await;
    assert!(message.contains("TB.parentCode"), "{message}");
    assert!(message.contains("MMIA"), "{message}");
}

#[tokio::test]
async fn test_fetched_requisition_fields_are_checked() {
    let cases = [
        (
            Faults {
                emergency: true,
                ..Faults::default()
            },
            "requisition.emergency",
        ),
        (
            Faults {
                echo_other_id: true,
                ..Faults::default()
            },
            "requisition.id",
        ),
        (
            Faults {
                program_code_mmia: true,
                ..Faults::default()
            },
            "requisition.programCode",
        ),
        (
            Faults {
                agent_code_f11: true,
                ..Faults::default()
            },
            "requisition.agentCode",
        ),
    ];

    for (faults, field) in cases {
        let message = violation(faults, ContractCase::RequisitionRoundTrip).await;
        assert!(message.starts_with(field), "{field}: {message}");
    }
}
