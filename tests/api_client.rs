//! Envelope handling, error classification and background helpers against
//! the mock backend

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{context, spawn_backend, GOOD_TOKEN};
use dino::api::dto::NoteQuery;
use dino::forms::NoteForm;
use dino::models::NoteKind;
use dino::notify::{describe, Action, ToastCenter};
use dino::{ApiError, BootPolicy, ErrorKind, MemoryStore};

fn signed_in(url: &str) -> dino::AppContext {
    context(url, Arc::new(MemoryStore::with_token(GOOD_TOKEN)), BootPolicy::TrustToken)
}

#[tokio::test]
async fn test_list_unwraps_envelope() {
    let (url, _) = spawn_backend().await;
    let ctx = signed_in(&url);

    let classes = ctx.api.classes().await.unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].code, "DINO01");
    assert_eq!(classes[0].professor_display(), "Prof. Rex");
}

#[tokio::test]
async fn test_rejected_envelope() {
    let (url, _) = spawn_backend().await;
    let ctx = signed_in(&url);

    let err = ctx.api.join_class("DINO01").await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { .. }));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.server_message(), Some("Turma cheia"));
    assert_eq!(
        describe(&err, Action::Other("join the class")),
        vec!["Limite de alunos atingido"]
    );

    // The session survives a rejection
    assert_eq!(ctx.session.token().as_deref(), Some(GOOD_TOKEN));
}

#[tokio::test]
async fn test_server_error() {
    let (url, _) = spawn_backend().await;
    let ctx = signed_in(&url);

    let err = ctx.api.content_stats().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.kind(), ErrorKind::Server);

    let mut toasts = ToastCenter::new();
    toasts.api_error(&err, Action::Other("load statistics"));
    assert_eq!(toasts.visible().len(), 1);
    assert_eq!(toasts.visible()[0].message, "Server error. Try again later");
}

#[tokio::test]
async fn test_undecodable_body() {
    let (url, _) = spawn_backend().await;
    let ctx = signed_in(&url);

    let err = ctx.api.progress().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(err.kind(), ErrorKind::Unexpected);
}

#[tokio::test]
async fn test_unreachable_backend() {
    let ctx = signed_in("http://127.0.0.1:9/api");

    let err = ctx.api.classes().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(
        describe(&err, Action::Other("load classes")),
        vec!["Connection error. Check your internet connection"]
    );
}

#[tokio::test]
async fn test_create_note_from_form() {
    let (url, backend) = spawn_backend().await;
    let ctx = signed_in(&url);

    let form = NoteForm {
        title: "Jurássico".into(),
        content: "Período entre o Triássico e o Cretáceo".into(),
        content_type: NoteKind::Video,
        class_id: Some(1),
        content_id: None,
    };
    let note = ctx
        .api
        .create_note(&form.validate().unwrap())
        .await
        .unwrap();
    assert_eq!(note.id, 42);
    assert_eq!(note.content_type, NoteKind::Video);

    let sent = backend.created_notes.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["content_type"], "video");
    assert_eq!(sent[0]["class_id"], 1);
    assert!(sent[0].get("content_id").is_none());
}

#[tokio::test]
async fn test_unhandled_method_is_http_error() {
    let (url, _) = spawn_backend().await;
    let ctx = signed_in(&url);

    // The mock only accepts POST on /notes
    let err = ctx
        .api
        .notes(NoteQuery {
            class_id: Some(1),
            content_id: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(405));
}

#[tokio::test]
async fn test_autosave_debounces_to_one_write() {
    let (url, backend) = spawn_backend().await;
    let ctx = signed_in(&url);

    ctx.autosave.edit(5, "Tira");
    ctx.autosave.edit(5, "Tiranossauro");
    ctx.autosave.edit(5, "Tiranossauro rex");
    assert!(ctx.autosave.is_pending(5));

    tokio::time::sleep(Duration::from_millis(400)).await;

    let saves = backend.autosaves.lock().unwrap().clone();
    assert_eq!(saves, vec![(5, "Tiranossauro rex".to_string())]);
    assert!(!ctx.autosave.is_pending(5));
    assert!(ctx.autosave.last_saved(5).is_some());
}

#[tokio::test]
async fn test_autosave_flush_on_shutdown() {
    let (url, backend) = spawn_backend().await;
    let ctx = signed_in(&url);

    ctx.autosave.edit(9, "rascunho");
    ctx.shutdown().await;

    let saves = backend.autosaves.lock().unwrap().clone();
    assert_eq!(saves, vec![(9, "rascunho".to_string())]);
}

#[tokio::test]
async fn test_unread_poller_refresh() {
    let (url, _) = spawn_backend().await;
    let ctx = signed_in(&url);
    ctx.initialize().await;

    let rx = ctx.unread.subscribe();
    ctx.unread.refresh().await;
    assert_eq!(*rx.borrow(), 4);
}
