//! In-process stand-in for the school backend.
//!
//! Every request is recorded (method, path, query, Authorization header) so
//! tests can assert on exactly what the console sent.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use school_admin::api::ApiClient;
use school_admin::session::{FileSessionStore, SessionContext};
use school_admin::App;

pub const PASSWORD: &str = "secret";
pub const TAKEN_EMAIL: &str = "taken@school.test";
/// Teacher creates with this email fail on the picture and on a field no form has
pub const BAD_PICTURE_EMAIL: &str = "bad-picture@school.test";

#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

/// A decoded request body: multipart text fields (files as `file:<name>`)
/// or a JSON object flattened to strings
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub path: String,
    pub fields: BTreeMap<String, String>,
}

#[derive(Default)]
pub struct MockState {
    hits: Mutex<Vec<Hit>>,
    submissions: Mutex<Vec<Submission>>,
}

pub struct MockBackend {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;

        let state = Arc::new(MockState::default());
        let app = router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}/api/", port),
            state,
        })
    }

    /// App with an in-memory session pointed at this backend
    pub fn app(&self) -> App {
        let api = ApiClient::new(&self.base_url, SessionContext::in_memory())
            .expect("mock base url is valid");
        App::new(api)
    }

    /// App whose session lives in a fresh directory on disk
    pub fn app_with_file_session(&self, dir: &std::path::Path) -> App {
        let session = SessionContext::new(Arc::new(FileSessionStore::new(dir)));
        App::new(ApiClient::new(&self.base_url, session).expect("mock base url is valid"))
    }

    /// Log the app in as the fixture user for a role name
    pub async fn login_as(&self, app: &App, role: &str) {
        app.login(&email_for(role), PASSWORD)
            .await
            .expect("fixture login succeeds");
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.state.hits.lock().unwrap().clone()
    }

    pub fn hits_for(&self, method: &str, path: &str) -> Vec<Hit> {
        self.hits()
            .into_iter()
            .filter(|h| h.method == method && h.path == path)
            .collect()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.state.submissions.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        self.state.hits.lock().unwrap().clear();
        self.state.submissions.lock().unwrap().clear();
    }
}

pub fn email_for(role: &str) -> String {
    format!("{}@school.test", role)
}

/// Config directory removed when the handle drops, failed assertions included
pub fn scratch_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("school-admin-")
        .tempdir()
        .expect("failed to create temp directory")
}

/// Small image file for upload fields
pub fn picture() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("picture-")
        .suffix(".png")
        .tempfile()
        .expect("failed to create temp file");
    std::io::Write::write_all(&mut file, &[0x89, b'P', b'N', b'G']).expect("failed to write picture");
    file
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/user", get(current_user))
        .route("/api/teachers", get(list_teachers).post(create_teacher))
        .route(
            "/api/teachers/:id",
            get(show_teacher).post(update_teacher).delete(delete_record),
        )
        .route("/api/students", get(list_students).post(create_student))
        .route("/api/students/:id", get(show_student).delete(delete_record))
        .route("/api/school-classes", get(list_classes).post(create_class))
        .route("/api/school-classes/:id", get(show_class).put(update_class))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Arc<MockState>>, req: Request, next: Next) -> Response {
    let hit = Hit {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        query: req.uri().query().map(str::to_string),
        authorization: req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state.hits.lock().unwrap().push(hit);
    next.run(req).await
}

fn unauthenticated() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthenticated." }))).into_response()
}

/// Tokens are `token-<role>`
fn role_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer token-")
        .map(str::to_string)
}

fn user(role: &str) -> Value {
    json!({
        "id": 1,
        "name": format!("{} user", role),
        "email": email_for(role),
        "role": role,
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let role = email.strip_suffix("@school.test").unwrap_or_default();
    if password != PASSWORD || role.is_empty() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response();
    }

    Json(json!({
        "token": format!("token-{}", role),
        "user": user(role),
    }))
    .into_response()
}

async fn current_user(headers: HeaderMap) -> Response {
    match role_from(&headers) {
        Some(role) => Json(user(&role)).into_response(),
        None => unauthenticated(),
    }
}

fn teacher(id: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Teacher {}", id),
        "email": format!("t{}@school.test", id),
        "subject": "Maths",
        "phone": null,
    })
}

/// Bare array unless a page is requested
async fn list_teachers(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if role_from(&headers).is_none() {
        return unauthenticated();
    }

    match params.get("page").and_then(|p| p.parse::<u32>().ok()) {
        Some(page) => Json(json!({
            "data": [teacher(page * 10)],
            "current_page": page,
            "last_page": 3,
            "total": 21,
        }))
        .into_response(),
        None => Json(json!([teacher(1), teacher(2)])).into_response(),
    }
}

async fn show_teacher(Path(id): Path<u32>) -> Response {
    Json(json!({ "data": teacher(id) })).into_response()
}

async fn read_multipart(path: String, mut multipart: Multipart) -> Submission {
    let mut fields = BTreeMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let value = match field.file_name() {
            Some(file_name) => format!("file:{}", file_name),
            None => field.text().await.unwrap(),
        };
        fields.insert(name, value);
    }
    Submission { path, fields }
}

fn store(state: &MockState, submission: Submission) {
    state.submissions.lock().unwrap().push(submission);
}

fn email_taken() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "message": "The email has already been taken.",
            "errors": { "email": ["The email has already been taken."] }
        })),
    )
        .into_response()
}

fn picture_rejected() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "message": "The given data was invalid.",
            "errors": {
                "profile_picture": ["The profile picture must be an image."],
                "school_id": ["The selected school is closed."]
            }
        })),
    )
        .into_response()
}

async fn create_teacher(State(state): State<Arc<MockState>>, multipart: Multipart) -> Response {
    let submission = read_multipart("/api/teachers".to_string(), multipart).await;
    let email = submission.fields.get("email").cloned().unwrap_or_default();
    store(&state, submission);

    match email.as_str() {
        TAKEN_EMAIL => return email_taken(),
        BAD_PICTURE_EMAIL => return picture_rejected(),
        _ => {}
    }
    (StatusCode::CREATED, Json(json!({ "data": teacher(99) }))).into_response()
}

async fn update_teacher(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u32>,
    multipart: Multipart,
) -> Response {
    let submission = read_multipart(format!("/api/teachers/{}", id), multipart).await;
    store(&state, submission);
    Json(json!({ "data": teacher(id) })).into_response()
}

async fn delete_record() -> StatusCode {
    StatusCode::NO_CONTENT
}

fn student(id: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Student {}", id),
        "email": format!("s{}@school.test", id),
        "roll_number": format!("R-{}", id),
        "date_of_birth": "2012-04-01T00:00:00.000000Z",
        "class": "5",
        "section": "A",
    })
}

/// Always paginated
async fn list_students(Query(params): Query<HashMap<String, String>>) -> Response {
    let page = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1u32);
    Json(json!({
        "data": [student(1), student(2)],
        "current_page": page,
        "last_page": 2,
        "total": 4,
    }))
    .into_response()
}

async fn show_student(Path(id): Path<u32>) -> Response {
    Json(student(id)).into_response()
}

async fn create_student(State(state): State<Arc<MockState>>, multipart: Multipart) -> Response {
    let submission = read_multipart("/api/students".to_string(), multipart).await;
    store(&state, submission);
    (StatusCode::CREATED, Json(student(7))).into_response()
}

fn class(id: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Grade {}", id),
        "numeric_name": id,
        "capacity": 40,
        "class_teacher_id": 1,
        "class_teacher": teacher(1),
    })
}

async fn list_classes() -> Response {
    Json(json!([class(1), class(2)])).into_response()
}

async fn show_class(Path(id): Path<u32>) -> Response {
    Json(json!({ "data": class(id) })).into_response()
}

fn flatten(path: String, body: &Value) -> Submission {
    let fields = body
        .as_object()
        .map(|object| {
            object
                .iter()
                .map(|(k, v)| {
                    let text = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), text)
                })
                .collect()
        })
        .unwrap_or_default();
    Submission { path, fields }
}

async fn create_class(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    store(&state, flatten("/api/school-classes".to_string(), &body));
    (StatusCode::CREATED, Json(class(3))).into_response()
}

async fn update_class(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u32>,
    Json(body): Json<Value>,
) -> Response {
    store(&state, flatten(format!("/api/school-classes/{}", id), &body));
    Json(class(id)).into_response()
}
