// ABOUTME: Integration tests for NRM session bootstrap and request encoding.
// ABOUTME: Uses a scripted transport in place of a live OESS installation.

mod support;

use oess_cm::adapter::AdapterError;
use oess_cm::nrm::{NrmClient, Session, SessionError};
use oess_cm::provision::ErrorKind;
use support::scripted_nrm::{Reply, ScriptedNrm};
use support::{CONTROL_URL, init_tracing};

async fn establish(nrm: &ScriptedNrm, workgroup: &str) -> Result<Session<ScriptedNrm>, SessionError> {
    Session::establish_with(CONTROL_URL, NrmClient::new(nrm.clone()), workgroup).await
}

#[tokio::test]
async fn resolves_workgroup_by_exact_name() {
    init_tracing();
    let nrm = ScriptedNrm::new().on(
        "get_workgroups",
        r#"{"results":[{"name":"NSI-test","workgroup_id":3},{"name":"NSI","workgroup_id":"11"}]}"#,
    );

    let session = establish(&nrm, "NSI").await.unwrap();
    assert_eq!(session.workgroup().name, "NSI");
    assert_eq!(session.workgroup_id().as_str(), "11");
    assert_eq!(session.control_url(), CONTROL_URL);
    assert_eq!(nrm.actions(), vec!["handshake", "get_workgroups"]);
}

#[tokio::test]
async fn handshake_is_a_get_of_the_control_url() {
    let nrm = ScriptedNrm::new();
    establish(&nrm, "NSI").await.unwrap();
    assert_eq!(nrm.requests()[0], "");
    assert_eq!(
        nrm.requests()[1],
        "services/data.cgi?action=get_workgroups"
    );
}

#[tokio::test]
async fn rejected_credentials_are_an_authentication_error() {
    let nrm = ScriptedNrm::new().reply("handshake", None, Reply::Unauthorized);

    let err = establish(&nrm, "NSI").await.unwrap_err();
    assert!(matches!(err, SessionError::Authentication { .. }));
    assert_eq!(nrm.count("get_workgroups"), 0);

    let err = AdapterError::from(err);
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn missing_workgroup_is_a_configuration_error() {
    let nrm = ScriptedNrm::new();

    let err = establish(&nrm, "nsi").await.unwrap_err();
    assert!(matches!(err, SessionError::UnknownWorkgroup(ref name) if name == "nsi"));
    assert_eq!(AdapterError::from(err).kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn empty_workgroup_list_is_a_configuration_error() {
    let nrm = ScriptedNrm::new().on("get_workgroups", r#"{"results":[]}"#);
    let err = establish(&nrm, "NSI").await.unwrap_err();
    assert!(matches!(err, SessionError::UnknownWorkgroup(_)));
}

#[tokio::test]
async fn server_errors_during_bootstrap_stay_remote() {
    let nrm = ScriptedNrm::new().reply(
        "get_workgroups",
        None,
        Reply::Status(500, "Internal Server Error".to_string()),
    );
    let err = establish(&nrm, "NSI").await.unwrap_err();
    assert!(matches!(err, SessionError::Nrm(_)));
    assert_eq!(AdapterError::from(err).kind(), ErrorKind::Remote);
}

#[tokio::test]
async fn session_url_must_be_plain_http() {
    use oess_cm::nrm::{Credentials, SessionConfig};

    let config = SessionConfig::new(
        "https://oess.example.net/oess/",
        Credentials::new("nsi", "secret"),
        "NSI",
    );
    let err = Session::establish(&config).await.unwrap_err();
    assert!(matches!(err, SessionError::Configuration(_)));
}
