mod test_utils;

use std::{sync::Arc, time::Duration};

use form_intake::{
    entities::{contact_message::ContactMessageForm, submission::SubmissionStatus},
    errors::AppError,
    use_cases::contact::ContactHandler,
};
use futures::future::join_all;
use test_utils::*;

#[actix_rt::test]
async fn valid_contact_is_stored_once() {
    let app = TestApp::new(&test_config());

    let response = app.contact_handler()
        .submit(contact_form("ada@example.com", "Hello there"), "10.0.0.1")
        .await
        .unwrap();

    assert_eq!(response.status, SubmissionStatus::Success);
    let rows = app.contact_repo.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(response.id, Some(rows[0].id));
    assert_eq!(rows[0].name, "Ada Lovelace");
    assert_eq!(rows[0].email, "ada@example.com");
    assert_eq!(rows[0].message, "Hello there");
}

#[actix_rt::test]
async fn identical_resubmission_is_a_duplicate() {
    let app = TestApp::new(&config_without_cooldown());
    let handler = app.contact_handler();

    let first = handler.submit(contact_form("ada@example.com", "Same words"), "10.0.0.1").await.unwrap();
    let second = handler.submit(contact_form("ada@example.com", "Same words"), "10.0.0.1").await.unwrap();

    assert_eq!(first.status, SubmissionStatus::Success);
    assert_eq!(second.status, SubmissionStatus::Duplicate);
    assert_eq!(second.message, "This message was already received earlier.");
    assert_eq!(second.id, None);
    assert_eq!(app.contact_repo.count_for("ada@example.com", "Same words"), 1);
}

#[actix_rt::test]
async fn cooldown_is_checked_before_duplicates() {
    let app = TestApp::new(&test_config());
    let handler = app.contact_handler();

    handler.submit(contact_form("ada@example.com", "Same words"), "10.0.0.1").await.unwrap();
    let second = handler.submit(contact_form("ada@example.com", "Same words"), "10.0.0.1").await;

    assert!(matches!(second, Err(AppError::RateLimited { .. })));
    assert_eq!(app.contact_repo.rows().len(), 1);
}

#[actix_rt::test]
async fn honeypot_short_circuits_everything() {
    let config = test_config();
    let guard = guard_for(&config);
    let limiter = guard.ip_limiter().clone();
    let verifier = Arc::new(StaticMailVerifier::accept_all());

    // no expectations: any store call panics
    let repo = MockContactRepo::new();
    let handler = ContactHandler::new(repo, verifier.clone(), guard);

    let mut form = contact_form("ada@example.com", "Buy now");
    form.website = Some("http://spam.example".into());

    let result = handler.submit(form, "10.0.0.1").await;

    assert!(matches!(result, Err(AppError::SpamDetected)));
    assert_eq!(limiter.tracked_keys(), 0);
    assert_eq!(verifier.lookups(), 0);
}

#[actix_rt::test]
async fn honeypot_wins_over_invalid_fields() {
    let app = TestApp::new(&test_config());

    let form = ContactMessageForm {
        website: Some("filled".into()),
        ..Default::default()
    };

    let result = app.contact_handler().submit(form, "10.0.0.1").await;

    assert!(matches!(result, Err(AppError::SpamDetected)));
    assert!(app.contact_repo.rows().is_empty());
}

#[actix_rt::test]
async fn malformed_email_has_no_side_effects() {
    let config = test_config();
    let guard = guard_for(&config);
    let limiter = guard.ip_limiter().clone();
    let verifier = Arc::new(StaticMailVerifier::accept_all());
    let handler = ContactHandler::new(MockContactRepo::new(), verifier.clone(), guard);

    let result = handler.submit(contact_form("not-an-email", "Hello"), "10.0.0.1").await;

    match result {
        Err(AppError::ValidationError(errors)) => {
            assert_eq!(errors[0].field, "email");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(limiter.attempts("10.0.0.1"), 0);
    assert_eq!(verifier.lookups(), 0);
}

#[actix_rt::test]
async fn domain_without_mx_is_rejected() {
    let config = test_config();
    let guard = guard_for(&config);
    let limiter = guard.ip_limiter().clone();
    let verifier = Arc::new(StaticMailVerifier::rejecting(&["nomail.example"]));
    let repo = InMemoryContactRepo::default();
    let handler = ContactHandler::new(repo.clone(), verifier.clone(), guard);

    let result = handler.submit(contact_form("ada@nomail.example", "Hello"), "10.0.0.1").await;

    match result {
        Err(err @ AppError::ValidationError(_)) => {
            assert_eq!(err.public_message(), "Invalid or non-existent email address.");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(verifier.lookups(), 1);
    assert_eq!(limiter.attempts("10.0.0.1"), 0);
    assert!(repo.rows().is_empty());
}

#[actix_rt::test]
async fn sixth_submission_from_one_ip_is_rate_limited() {
    let app = TestApp::new(&test_config());
    let handler = app.contact_handler();

    for i in 0..5 {
        let form = contact_form(&format!("user{i}@example.com"), &format!("Message {i}"));
        let response = handler.submit(form, "10.0.0.1").await.unwrap();
        assert_eq!(response.status, SubmissionStatus::Success, "attempt {}", i + 1);
    }

    let sixth = handler.submit(contact_form("user5@example.com", "Message 5"), "10.0.0.1").await;

    match sixth {
        Err(AppError::RateLimited { message, retry_after }) => {
            assert_eq!(message, "Too many requests from your IP. Please try again later.");
            assert!(retry_after.is_some());
        }
        other => panic!("expected rate limit, got {other:?}"),
    }
    assert_eq!(app.contact_repo.rows().len(), 5);
}

#[actix_rt::test]
async fn same_email_within_cooldown_is_rate_limited() {
    let app = TestApp::new(&test_config());
    let handler = app.contact_handler();

    handler.submit(contact_form("ada@example.com", "First question"), "10.0.0.1").await.unwrap();
    let second = handler.submit(contact_form("ada@example.com", "Second question"), "10.0.0.2").await;

    match second {
        Err(AppError::RateLimited { message, .. }) => {
            assert!(message.starts_with("You must wait"), "{message}");
        }
        other => panic!("expected rate limit, got {other:?}"),
    }
    assert_eq!(app.contact_repo.rows().len(), 1);
    // the second IP was still charged
    assert_eq!(app.limiter.attempts("10.0.0.2"), 1);
}

#[actix_rt::test]
async fn cooldown_ignores_email_case() {
    let app = TestApp::new(&test_config());
    let handler = app.contact_handler();

    handler.submit(contact_form("Ada@Example.com", "First"), "10.0.0.1").await.unwrap();
    let second = handler.submit(contact_form("ada@example.com", "Second"), "10.0.0.2").await;

    assert!(matches!(second, Err(AppError::RateLimited { .. })));
}

#[actix_rt::test]
async fn old_submission_does_not_block_new_one() {
    let app = TestApp::new(&test_config());
    app.contact_repo.seed("ada@example.com", "Last week", Duration::from_secs(120));

    let response = app.contact_handler()
        .submit(contact_form("ada@example.com", "Follow-up"), "10.0.0.1")
        .await
        .unwrap();

    assert_eq!(response.status, SubmissionStatus::Success);
    assert_eq!(app.contact_repo.rows().len(), 2);
}

#[actix_rt::test]
async fn distinct_ips_submit_concurrently() {
    let app = TestApp::new(&test_config());
    let handler = app.contact_handler();

    let ips: Vec<String> = (0..10).map(|i| format!("192.0.2.{i}")).collect();
    let submissions = ips.iter().enumerate().map(|(i, ip)| {
        handler.submit(
            contact_form(&format!("visitor{i}@example.com"), &format!("Hi from {i}")),
            ip,
        )
    });

    let results = join_all(submissions).await;

    assert!(results.iter().all(|r| matches!(r, Ok(resp) if resp.status == SubmissionStatus::Success)));
    assert_eq!(app.contact_repo.rows().len(), 10);
    assert_eq!(app.limiter.tracked_keys(), 10);
}

#[actix_rt::test]
async fn fields_are_trimmed_before_storage() {
    let app = TestApp::new(&test_config());

    let form = ContactMessageForm {
        name: "  Ada  ".into(),
        email: " ada@example.com ".into(),
        message: "\n Hello \n".into(),
        website: Some("".into()),
    };

    app.contact_handler().submit(form, "10.0.0.1").await.unwrap();

    let rows = app.contact_repo.rows();
    assert_eq!(rows[0].name, "Ada");
    assert_eq!(rows[0].email, "ada@example.com");
    assert_eq!(rows[0].message, "Hello");
}

#[actix_rt::test]
async fn storage_failure_hides_details() {
    let app = TestApp::new(&test_config());
    app.contact_repo.set_failing(true);

    let err = app.contact_handler()
        .submit(contact_form("ada@example.com", "Hello"), "10.0.0.1")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::StorageFailure(_)));
    assert_eq!(err.public_message(), "Server error. Please try again later.");
}
