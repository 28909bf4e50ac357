//! Behavioural tests for the [`Portal`] facade over the in-memory backend.
//!
//! These exercise the ledger contract end to end: duplicate detection,
//! removal reporting, FIFO waitlists, document assembly and concurrent
//! registration of the same pair.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

use std::sync::Arc;

use portal_core::{DocumentOutcome, MemoryStore, Portal, PortalError};
use portal_types::{Course, CourseCode, GraduationPath, RegistrationStatus, Student, StudentId};
use rust_decimal::Decimal;

const S1: &str = "1111111111";
const S2: &str = "2222222222";
const S3: &str = "3333333333";

fn student(id: &str) -> Student {
    Student {
        id: StudentId::from(id),
        name: format!("N{id}"),
        login: format!("ls{id}"),
        program: "Prog1".to_owned(),
        branch: None,
    }
}

fn course(code: &str) -> Course {
    Course {
        code: CourseCode::from(code),
        name: format!("C{code}"),
        credits: Decimal::new(10, 0),
    }
}

fn portal() -> Portal<MemoryStore> {
    let store = MemoryStore::new();
    for id in [S1, S2, S3] {
        store.add_student(student(id)).expect("seed student");
    }
    for code in ["CCC111", "CCC222", "CCC333", "CCC444"] {
        store.add_course(course(code)).expect("seed course");
    }
    Portal::new(store)
}

fn sid(id: &str) -> StudentId {
    StudentId::from(id)
}

fn code(c: &str) -> CourseCode {
    CourseCode::from(c)
}

#[tokio::test]
async fn registering_twice_is_a_duplicate() {
    let portal = portal();

    let first = portal.register(&sid(S1), &code("CCC111")).await;
    assert!(first.success);
    assert_eq!(first.affected, 1);

    let second = portal
        .try_register_with_status(&sid(S1), &code("CCC111"), RegistrationStatus::Registered)
        .await;
    assert!(matches!(second, Err(PortalError::DuplicateRegistration { .. })));

    let outcome = portal.register(&sid(S1), &code("CCC111")).await;
    assert!(!outcome.success);
    assert!(outcome.error.is_some());
}

#[tokio::test]
async fn duplicate_is_detected_across_statuses() {
    let portal = portal();
    portal
        .try_register_with_status(&sid(S1), &code("CCC111"), RegistrationStatus::Waiting)
        .await
        .unwrap();

    let again = portal
        .try_register_with_status(&sid(S1), &code("CCC111"), RegistrationStatus::Registered)
        .await;
    assert!(matches!(again, Err(PortalError::DuplicateRegistration { .. })));
}

#[tokio::test]
async fn unregistering_an_absent_pair_reports_nothing_removed() {
    let portal = portal();

    let result = portal.try_unregister(&sid(S1), &code("CCC111")).await;
    assert!(matches!(result, Err(PortalError::NotFoundOnRemoval { .. })));

    let outcome = portal.unregister(&sid(S1), &code("CCC111")).await;
    assert!(!outcome.success);
}

#[tokio::test]
async fn unknown_student_or_course_is_referential() {
    let portal = portal();

    let unknown_student = portal
        .try_register_with_status(&sid("0000000000"), &code("CCC111"), RegistrationStatus::Registered)
        .await;
    assert!(matches!(unknown_student, Err(PortalError::Referential { .. })));

    let unknown_course = portal.register(&sid(S1), &code("NOPE00")).await;
    assert!(!unknown_course.success);
    assert_eq!(
        unknown_course.to_json().unwrap(),
        r#"{"success":false,"error":"unknown course \"NOPE00\""}"#
    );
}

#[tokio::test]
async fn register_unregister_then_document_shows_course_absent() {
    let portal = portal();

    assert!(portal.register(&sid(S1), &code("CCC111")).await.success);
    let doc = portal.try_student_document(&sid(S1)).await.unwrap();
    assert_eq!(doc.registered.len(), 1);

    assert!(portal.unregister(&sid(S1), &code("CCC111")).await.success);
    let doc = portal.try_student_document(&sid(S1)).await.unwrap();
    assert!(doc.registered.iter().all(|r| r.code != code("CCC111")));
    assert!(doc.registered.is_empty());
}

#[tokio::test]
async fn waitlist_positions_are_fifo_without_gaps() {
    let portal = portal();
    let course = code("CCC333");
    for s in [S1, S2, S3] {
        portal
            .try_register_with_status(&sid(s), &course, RegistrationStatus::Waiting)
            .await
            .unwrap();
    }

    assert_eq!(portal.position_of(&sid(S1), &course).await.unwrap(), Some(1));
    assert_eq!(portal.position_of(&sid(S2), &course).await.unwrap(), Some(2));
    assert_eq!(portal.position_of(&sid(S3), &course).await.unwrap(), Some(3));

    portal.try_unregister(&sid(S1), &course).await.unwrap();

    assert_eq!(portal.position_of(&sid(S1), &course).await.unwrap(), None);
    assert_eq!(portal.position_of(&sid(S2), &course).await.unwrap(), Some(1));
    assert_eq!(portal.position_of(&sid(S3), &course).await.unwrap(), Some(2));

    let waitlist = portal.waitlist(&course).await.unwrap();
    let order: Vec<(&str, u32)> = waitlist
        .iter()
        .map(|p| (p.student.as_str(), p.position))
        .collect();
    assert_eq!(order, vec![(S2, 1), (S3, 2)]);
}

#[tokio::test]
async fn resolving_positions_never_reorders() {
    let portal = portal();
    let course = code("CCC333");
    for s in [S2, S1] {
        portal
            .try_register_with_status(&sid(s), &course, RegistrationStatus::Waiting)
            .await
            .unwrap();
    }

    for _ in 0..3 {
        assert_eq!(portal.position_of(&sid(S2), &course).await.unwrap(), Some(1));
        assert_eq!(portal.position_of(&sid(S1), &course).await.unwrap(), Some(2));
    }
}

#[tokio::test]
async fn promotion_is_a_status_only_update() {
    let portal = portal();
    let course = code("CCC333");
    for s in [S1, S2] {
        portal
            .try_register_with_status(&sid(s), &course, RegistrationStatus::Waiting)
            .await
            .unwrap();
    }

    let outcome = portal.promote(&sid(S1), &course).await;
    assert!(outcome.success);

    assert_eq!(portal.position_of(&sid(S1), &course).await.unwrap(), None);
    assert_eq!(portal.position_of(&sid(S2), &course).await.unwrap(), Some(1));

    let missing = portal.try_promote(&sid(S3), &course).await;
    assert!(matches!(missing, Err(PortalError::NotFoundOnRemoval { .. })));
}

#[tokio::test]
async fn seated_student_cannot_be_moved_back_into_the_queue() {
    let portal = portal();
    let course = code("CCC333");
    assert!(portal.register(&sid(S1), &course).await.success);
    portal
        .try_register_with_status(&sid(S2), &course, RegistrationStatus::Waiting)
        .await
        .unwrap();

    let rejected = portal.try_promote(&sid(S1), &course).await;
    assert!(matches!(rejected, Err(PortalError::NotWaiting { .. })));
    let outcome = portal.promote(&sid(S1), &course).await;
    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("is not waiting"));

    assert_eq!(portal.position_of(&sid(S1), &course).await.unwrap(), None);
    assert_eq!(portal.position_of(&sid(S2), &course).await.unwrap(), Some(1));

    assert!(portal.unregister(&sid(S1), &course).await.success);
    portal
        .try_register_with_status(&sid(S1), &course, RegistrationStatus::Waiting)
        .await
        .unwrap();
    assert_eq!(portal.position_of(&sid(S2), &course).await.unwrap(), Some(1));
    assert_eq!(portal.position_of(&sid(S1), &course).await.unwrap(), Some(2));
}

#[tokio::test]
async fn unknown_student_document_is_not_found() {
    let portal = portal();

    let result = portal.try_student_document(&sid("0000000000")).await;
    assert!(matches!(result, Err(PortalError::NotFound { .. })));

    match portal.student_document(&sid("0000000000")).await {
        DocumentOutcome::Failed { student, error } => {
            assert_eq!(student.as_str(), "0000000000");
            assert_eq!(error, "does not exist");
        }
        DocumentOutcome::Found(_) => panic!("expected a failure payload"),
    }
}

#[tokio::test]
async fn document_collapses_fan_out() {
    let portal = portal();
    let store = portal.backend();
    store.record_finished(&sid(S1), &code("CCC111"), "5").unwrap();
    store.record_finished(&sid(S1), &code("CCC222"), "U").unwrap();
    portal.register(&sid(S1), &code("CCC333")).await;

    let doc = portal.try_student_document(&sid(S1)).await.unwrap();
    assert_eq!(doc.finished.len(), 2);
    assert_eq!(doc.registered.len(), 1);
    assert_eq!(doc.registered[0].status, RegistrationStatus::Registered);
    assert_eq!(doc.registered[0].position, None);
    assert_eq!(doc.registered[0].course, "CCCC333");
}

#[tokio::test]
async fn document_reports_waiting_position_and_graduation_facts() {
    let portal = portal();
    let store = portal.backend();
    store
        .set_graduation_path(GraduationPath {
            student: sid(S2),
            seminar_courses: 0,
            math_credits: Decimal::ZERO,
            research_credits: Decimal::ZERO,
            total_credits: Decimal::new(10, 0),
            qualified: false,
        })
        .unwrap();
    portal
        .try_register_with_status(&sid(S1), &code("CCC444"), RegistrationStatus::Waiting)
        .await
        .unwrap();
    portal
        .try_register_with_status(&sid(S2), &code("CCC444"), RegistrationStatus::Waiting)
        .await
        .unwrap();

    let outcome = portal.student_document(&sid(S2)).await;
    let doc = outcome.document().expect("document");
    assert_eq!(doc.registered[0].position, Some(2));
    assert_eq!(doc.total_credits, Some(Decimal::new(10, 0)));
    assert_eq!(doc.can_graduate, Some(false));

    let json: serde_json::Value = serde_json::from_str(&outcome.to_json().unwrap()).unwrap();
    assert_eq!(json["registered"][0]["status"], "waiting");
    assert_eq!(json["canGraduate"], false);
}

#[tokio::test]
async fn document_without_graduation_facts_has_nulls_not_zeros() {
    let portal = portal();
    let doc = portal.try_student_document(&sid(S3)).await.unwrap();

    assert!(doc.finished.is_empty());
    assert!(doc.registered.is_empty());
    assert_eq!(doc.seminar_courses, None);
    assert_eq!(doc.total_credits, None);
    assert_eq!(doc.can_graduate, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registration_of_one_pair_succeeds_once() {
    let portal = Arc::new(portal());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let portal = Arc::clone(&portal);
        handles.push(tokio::spawn(async move {
            portal
                .try_register_with_status(&sid(S1), &code("CCC111"), RegistrationStatus::Registered)
                .await
        }));
    }

    let mut successes = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(PortalError::DuplicateRegistration { .. }) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(portal.backend().registration_count().unwrap(), 1);
}
