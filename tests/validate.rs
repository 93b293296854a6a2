// ABOUTME: Integration tests for endpoint validation against the NRM.
// ABOUTME: Covers unknown interfaces, busy VLANs and concurrent two-ended checks.

mod support;

use oess_cm::provision::{ErrorKind, ProvisionError, validate_each, validate_pair, validate_target};
use support::init_tracing;
use support::scripted_nrm::ScriptedNrm;

#[tokio::test]
async fn free_vlan_on_known_interface_validates() {
    init_tracing();
    let nrm = ScriptedNrm::new().with_switch("sw1", &["eth0", "eth1"]);
    let session = nrm.session().await;

    let ep = validate_target(&session, "sw1:eth0#100").await.unwrap();
    assert_eq!(ep.switch(), "sw1");
    assert_eq!(ep.interface(), "eth0");
    assert_eq!(ep.vlan().value(), 100);
    assert_eq!(
        nrm.requests_for("is_vlan_tag_available"),
        vec!["services/data.cgi?action=is_vlan_tag_available&node=sw1&vlan=100&interface=eth0"]
    );
}

#[tokio::test]
async fn unknown_interface_fails_without_asking_about_the_vlan() {
    let nrm = ScriptedNrm::new().with_switch("sw1", &["eth1"]);
    let session = nrm.session().await;

    let err = validate_target(&session, "sw1:eth0#100").await.unwrap_err();
    assert!(matches!(
        err,
        ProvisionError::UnknownInterface { ref switch, ref interface }
            if switch == "sw1" && interface == "eth0"
    ));
    assert_eq!(nrm.count("is_vlan_tag_available"), 0);
}

#[tokio::test]
async fn busy_vlan_is_reported_with_its_tag() {
    let nrm = ScriptedNrm::new()
        .with_switch("sw1", &["eth0"])
        .on("is_vlan_tag_available", r#"{"results":[{"available":0}]}"#);
    let session = nrm.session().await;

    let err = validate_target(&session, "sw1:eth0#100").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::VlanUnavailable);
    assert!(err.to_string().contains("100"));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn availability_answer_as_single_object_is_understood() {
    let nrm = ScriptedNrm::new()
        .with_switch("sw1", &["eth0"])
        .on("is_vlan_tag_available", r#"{"results":{"available":true}}"#);
    let session = nrm.session().await;

    assert!(validate_target(&session, "sw1:eth0#100").await.is_ok());
}

#[tokio::test]
async fn availability_without_result_means_unknown_interface() {
    let nrm = ScriptedNrm::new()
        .with_switch("sw1", &["eth0"])
        .on(
            "is_vlan_tag_available",
            r#"{"results":[],"error":"no such interface"}"#,
        );
    let session = nrm.session().await;

    let err = validate_target(&session, "sw1:eth0#100").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownInterface);
}

#[tokio::test]
async fn malformed_target_makes_no_remote_call() {
    let nrm = ScriptedNrm::new().with_switch("sw1", &["eth0"]);
    let session = nrm.session().await;

    let err = validate_target(&session, "sw1-eth0-100").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedEndpoint);
    assert!(nrm.requests().is_empty());
}

#[tokio::test]
async fn both_ends_are_checked() {
    let nrm = ScriptedNrm::new()
        .with_switch("sw1", &["eth0"])
        .with_switch("sw2", &["eth1"]);
    let session = nrm.session().await;

    let (source, dest) = validate_each(&session, "sw1:eth0#100", "sw2:eth1#200").await;
    assert_eq!(source.unwrap().switch(), "sw1");
    assert_eq!(dest.unwrap().vlan().value(), 200);
    assert_eq!(nrm.count("get_node_interfaces"), 2);
    assert_eq!(nrm.count("is_vlan_tag_available"), 2);
}

#[tokio::test]
async fn source_error_wins_when_both_ends_fail() {
    let nrm = ScriptedNrm::new()
        .with_switch("sw1", &["eth9"])
        .with_switch("sw2", &["eth1"])
        .on_query(
            "is_vlan_tag_available",
            "node=sw2",
            r#"{"results":[{"available":0}]}"#,
        );
    let session = nrm.session().await;

    let err = validate_pair(&session, "sw1:eth0#100", "sw2:eth1#100")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownInterface);
}

#[tokio::test]
async fn destination_error_surfaces_when_source_is_fine() {
    let nrm = ScriptedNrm::new()
        .with_switch("sw1", &["eth0"])
        .with_switch("sw2", &["eth1"])
        .on_query(
            "is_vlan_tag_available",
            "node=sw2",
            r#"{"results":[{"available":"0"}]}"#,
        );
    let session = nrm.session().await;

    let err = validate_pair(&session, "sw1:eth0#100", "sw2:eth1#100")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProvisionError::VlanUnavailable { ref switch, .. } if switch == "sw2"
    ));
}
