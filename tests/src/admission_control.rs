//! Admission Control Scenarios
//!
//! The QoF announces its default slice at start-up; the NTN-QoF answers any
//! trigger by pushing the full budget table to both classifiers.

use integration_tests::{
    init_test_logging, ntn_config, qof_config, spawn_ntn, spawn_qof, wait_for_condition,
    MockClassifier, MockClassifierConfig, MockClassifierEvent, MockNtn, MockNtnEvent,
    DEFAULT_POLL_INTERVAL, DEFAULT_TEST_TIMEOUT, GNB_N3,
};
use ntnqof_common::{ControlPlane, NTN_ADMISSION_CONTROL_PATH};
use ntnqof_ntn::{AdmissionControl, AdmissionRequest, ClassifierSide};
use tokio::time::timeout;

async fn classifiers() -> (MockClassifier, MockClassifier) {
    let ran = MockClassifier::start(MockClassifierConfig::new(ClassifierSide::Ran))
        .await
        .expect("Failed to start RAN classifier");
    let cn = MockClassifier::start(MockClassifierConfig::new(ClassifierSide::Cn))
        .await
        .expect("Failed to start CN classifier");
    (ran, cn)
}

/// Direct trigger: each side gets its own direction's budget
#[tokio::test]
async fn test_admission_broadcast_per_direction() {
    init_test_logging();
    let (ran, cn) = classifiers().await;
    let ntn = spawn_ntn(&ntn_config(ran.port(), cn.port()))
        .await
        .expect("Failed to start NTN-QoF");

    let response = reqwest::Client::new()
        .post(ntn.url(NTN_ADMISSION_CONTROL_PATH))
        .send()
        .await
        .expect("Trigger failed");
    assert_eq!(response.status(), 200);

    let cn_event = timeout(DEFAULT_TEST_TIMEOUT, cn.next_event())
        .await
        .expect("Timeout waiting for CN classifier")
        .expect("No CN event");
    assert_eq!(
        cn_event,
        MockClassifierEvent::Admission(AdmissionRequest {
            controls: vec![AdmissionControl {
                slice_id: 1,
                throughput: 100,
                endpoint: "B".to_string(),
            }],
            slice_aware: true,
        })
    );

    let ran_event = timeout(DEFAULT_TEST_TIMEOUT, ran.next_event())
        .await
        .expect("Timeout waiting for RAN classifier")
        .expect("No RAN event");
    assert_eq!(
        ran_event,
        MockClassifierEvent::Admission(AdmissionRequest {
            controls: vec![AdmissionControl {
                slice_id: 1,
                throughput: 50,
                endpoint: "A".to_string(),
            }],
            slice_aware: true,
        })
    );
}

/// QoF start-up announcement reaches the NTN-QoF
#[tokio::test]
async fn test_default_slice_announced_to_ntn() {
    init_test_logging();
    let ntn = MockNtn::start().await.expect("Failed to start mock NTN-QoF");
    let (_qof, relay) = spawn_qof(&qof_config(&ntn.uri()))
        .await
        .expect("Failed to start QoF");

    assert!(relay.announce_default_slice().await);
    assert_eq!(
        ntn.events().await,
        vec![MockNtnEvent::AdmissionControl(ControlPlane {
            ran: GNB_N3.to_string(),
            cn: "10.2.0.1".to_string(),
            id: 1,
        })]
    );
}

/// Announcement through a real NTN-QoF triggers the classifier broadcast
#[tokio::test]
async fn test_default_slice_triggers_classifier_broadcast() {
    init_test_logging();
    let (ran, cn) = classifiers().await;
    let ntn = spawn_ntn(&ntn_config(ran.port(), cn.port()))
        .await
        .expect("Failed to start NTN-QoF");
    let (_qof, relay) = spawn_qof(&qof_config(&ntn.uri()))
        .await
        .expect("Failed to start QoF");

    assert!(relay.announce_default_slice().await);
    wait_for_condition(
        || async { ran.admissions().await.len() == 1 && cn.admissions().await.len() == 1 },
        DEFAULT_TEST_TIMEOUT,
        DEFAULT_POLL_INTERVAL,
    )
    .await
    .expect("Both classifiers should receive admission control");
}

/// Unreachable NTN-QoF: the announcement fails without panicking
#[tokio::test]
async fn test_announcement_to_unreachable_ntn() {
    init_test_logging();
    let (_qof, relay) = spawn_qof(&qof_config("http://127.0.0.1:1"))
        .await
        .expect("Failed to start QoF");
    assert!(!relay.announce_default_slice().await);
}
