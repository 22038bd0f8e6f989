//! In-process mock of the platform backend

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use dino::{AppContext, BootPolicy, Config, KeyValueStore};

pub const GOOD_TOKEN: &str = "tok-123";
pub const PASSWORD: &str = "Rex#2024";

/// What the mock saw
#[derive(Clone, Default)]
pub struct Backend {
    pub autosaves: Arc<Mutex<Vec<(i64, String)>>>,
    pub created_notes: Arc<Mutex<Vec<Value>>>,
    pub profile_updates: Arc<Mutex<Vec<Value>>>,
    pub password_changes: Arc<Mutex<Vec<Value>>>,
}

type Reply = (StatusCode, Json<Value>);

fn ok(data: Value) -> Reply {
    (StatusCode::OK, Json(json!({ "success": true, "data": data })))
}

fn unauthorized() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": "Token inválido" })),
    )
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", GOOD_TOKEN))
        .unwrap_or(false)
}

pub fn ana() -> Value {
    json!({
        "id": 7,
        "username": "ana",
        "email": "ana@escola.br",
        "user_type": "aluno",
        "age": 19,
        "institution": "UFRJ",
        "created_at": "2024-02-01T10:00:00.000Z"
    })
}

async fn login(Json(body): Json<Value>) -> Reply {
    if body["password"] == PASSWORD {
        ok(json!({ "user": ana(), "tokens": { "token": GOOD_TOKEN } }))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Credenciais inválidas" })),
        )
    }
}

async fn register(Json(body): Json<Value>) -> Reply {
    if body["email"] == "taken@escola.br" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "success": false, "message": "Email já cadastrado" })),
        );
    }
    let mut user = ana();
    user["username"] = body["username"].clone();
    user["email"] = body["email"].clone();
    user["user_type"] = body["user_type"].clone();
    ok(json!({ "user": user, "tokens": { "token": GOOD_TOKEN } }))
}

async fn profile(headers: HeaderMap) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    ok(ana())
}

async fn update_profile(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    backend.profile_updates.lock().unwrap().push(body.clone());
    let mut user = ana();
    for field in ["username", "email", "age", "institution"] {
        if let Some(value) = body.get(field) {
            user[field] = value.clone();
        }
    }
    ok(json!({ "user": user }))
}

async fn change_password(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    backend.password_changes.lock().unwrap().push(body.clone());
    if body["current_password"] != PASSWORD {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Senha atual incorreta" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Senha alterada com sucesso" })),
    )
}

async fn classes(headers: HeaderMap) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    ok(json!([
        {
            "id": 1,
            "name": "Paleontologia I",
            "description": "Introdução aos dinossauros",
            "code": "DINO01",
            "professor_id": 3,
            "professor_name": "Prof. Rex",
            "created_at": "2024-01-10 09:00:00",
            "updated_at": "2024-01-10 09:00:00"
        }
    ]))
}

async fn join_class(headers: HeaderMap) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": false,
            "message": "Turma cheia",
            "errors": [{ "msg": "Limite de alunos atingido" }]
        })),
    )
}

async fn content_stats() -> Reply {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": "boom" })),
    )
}

async fn autosave(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let content = body["content"].as_str().unwrap_or_default().to_string();
    backend.autosaves.lock().unwrap().push((id, content));
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Nota salva automaticamente" })),
    )
}

async fn create_note(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    backend.created_notes.lock().unwrap().push(body.clone());
    ok(json!({
        "id": 42,
        "title": body["title"],
        "content": body["content"],
        "content_type": body["content_type"],
        "created_at": "2024-03-01 12:00:00",
        "updated_at": "2024-03-01 12:00:00"
    }))
}

async fn unread_count(headers: HeaderMap) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    ok(json!({ "count": 4 }))
}

async fn garbage() -> (StatusCode, &'static str) {
    (StatusCode::OK, "<html>not json</html>")
}

fn router(backend: Backend) -> Router {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/profile", get(profile).put(update_profile))
        .route("/auth/change-password", put(change_password))
        .route("/classes", get(classes))
        .route("/classes/join", post(join_class))
        .route("/content/stats", get(content_stats))
        .route("/notes", post(create_note))
        .route("/notes/:id/autosave", put(autosave))
        .route("/notifications/unread-count", get(unread_count))
        .route("/progress", get(garbage))
        .with_state(backend);

    Router::new().nest("/api", api)
}

/// Serve the mock on an ephemeral port and return its `/api` base URL
pub async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(backend.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), backend)
}

/// Context over `store` talking to `base_url`
pub fn context(base_url: &str, store: Arc<dyn KeyValueStore>, policy: BootPolicy) -> AppContext {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.request_timeout_secs = 5;
    config.session.boot_policy = policy;
    config.autosave.delay_ms = 50;
    AppContext::with_store(config, store).unwrap()
}
