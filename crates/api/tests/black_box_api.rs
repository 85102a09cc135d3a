use chrono::{Duration as ChronoDuration, Utc};
use dashgate_api::config::ApiConfig;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

const SECRET: &str = "test-secret";
const ADMIN: (&str, &str) = ("root", "root-password");

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let config = ApiConfig::for_secret(SECRET).with_admin(ADMIN.0, ADMIN.1);
        let app = dashgate_api::app::build_app(&config).expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn login_response(&self, login: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/providers/native/login"))
            .json(&json!({ "login": login, "password": password }))
            .send()
            .await
            .unwrap()
    }

    /// Log in and return the access token.
    async fn login(&self, login: &str, password: &str) -> String {
        let res = self.login_response(login, password).await;
        assert_eq!(res.status(), StatusCode::OK, "login of {login} failed");
        let body: Value = res.json().await.unwrap();
        body["accessToken"]["token"].as_str().unwrap().to_string()
    }

    async fn post(&self, token: &str, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn put(&self, token: &str, path: &str, body: Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, token: &str, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn viewer_role() -> Value {
    json!({
        "kind": "Role",
        "metadata": { "name": "viewer" },
        "spec": { "permissions": [{ "action": "read", "kind": "Dashboard" }] }
    })
}

fn binding(name: &str, role: &str, user: &str) -> Value {
    json!({
        "kind": "RoleBinding",
        "metadata": { "name": name },
        "spec": { "role": role, "subjects": [{ "kind": "user", "name": user }] }
    })
}

fn user(login: &str, password: &str) -> Value {
    json!({
        "kind": "User",
        "metadata": { "name": login },
        "spec": { "password": password }
    })
}

fn mint_access_token(secret: &str, login: &str) -> String {
    let now = Utc::now();
    let claims = json!({
        "sub": login,
        "typ": "access",
        "iat": now.timestamp(),
        "exp": (now + ChronoDuration::minutes(10)).timestamp(),
        "jti": "00000000-0000-0000-0000-000000000000",
    });

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

/// `name=value` pairs from every `Set-Cookie` header of a response.
fn set_cookies(res: &reqwest::Response) -> Vec<(String, String)> {
    res.headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Admin sets up role `viewer` in p1, user alice and binding b1.
async fn seed_viewer(srv: &TestServer, admin: &str) {
    let res = srv.post(admin, "/api/v1/projects/p1/roles", viewer_role()).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = srv.post(admin, "/api/v1/users", user("alice", "alice-pw")).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = srv
        .post(admin, "/api/v1/projects/p1/rolebindings", binding("b1", "viewer", "alice"))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .get(srv.url("/api/v1/me/permissions"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let srv = TestServer::spawn().await;

    let wrong_password = srv.login_response(ADMIN.0, "nope").await;
    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    let wrong_password = wrong_password.bytes().await.unwrap();

    let unknown_user = srv.login_response("mallory", "nope").await;
    assert_eq!(unknown_user.status(), StatusCode::BAD_REQUEST);
    let unknown_user = unknown_user.bytes().await.unwrap();

    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn login_sets_session_cookies_usable_for_auth() {
    let srv = TestServer::spawn().await;

    let res = srv.login_response(ADMIN.0, ADMIN.1).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookies = set_cookies(&res);
    let body: Value = res.json().await.unwrap();

    let names: Vec<&str> = cookies.iter().map(|(k, _)| k.as_str()).collect();
    assert!(names.contains(&"jwtPayload"));
    assert!(names.contains(&"jwtSignature"));
    assert!(names.contains(&"jwtRefreshToken"));
    assert_eq!(body["accessToken"]["kind"], "access");
    assert_eq!(body["refreshToken"]["kind"], "refresh");

    let header = cookies
        .iter()
        .filter(|(k, _)| k == "jwtPayload" || k == "jwtSignature")
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("; ");

    let res = srv
        .client
        .get(srv.url("/api/v1/me/permissions"))
        .header(reqwest::header::COOKIE, header)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["login"], ADMIN.0);
}

#[tokio::test]
async fn refresh_token_mints_a_new_access_token() {
    let srv = TestServer::spawn().await;

    let res = srv.login_response(ADMIN.0, ADMIN.1).await;
    let body: Value = res.json().await.unwrap();
    let refresh = body["refreshToken"]["token"].as_str().unwrap().to_string();
    let access = body["accessToken"]["token"].as_str().unwrap().to_string();

    let res = srv
        .client
        .post(srv.url("/api/auth/refresh"))
        .json(&json!({ "refreshToken": refresh }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let renewed = body["accessToken"]["token"].as_str().unwrap();

    let res = srv.get(renewed, "/api/v1/me/permissions").await;
    assert_eq!(res.status(), StatusCode::OK);

    // An access token can't stand in for a refresh token, nor the reverse.
    let res = srv
        .client
        .post(srv.url("/api/auth/refresh"))
        .json(&json!({ "refreshToken": access }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv.get(&refresh, "/api/v1/me/permissions").await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv.client.post(srv.url("/api/auth/refresh")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tokens_signed_with_another_secret_are_rejected() {
    let srv = TestServer::spawn().await;

    let forged = mint_access_token("other-secret", ADMIN.0);
    let res = srv.get(&forged, "/api/v1/me/permissions").await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Same claims under the right key are accepted: the token is the capability.
    let genuine = mint_access_token(SECRET, ADMIN.0);
    let res = srv.get(&genuine, "/api/v1/me/permissions").await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn binding_grants_role_permissions_in_its_project() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(ADMIN.0, ADMIN.1).await;
    seed_viewer(&srv, &admin).await;

    let alice = srv.login("alice", "alice-pw").await;
    let res = srv.get(&alice, "/api/v1/me/permissions").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["permissions"],
        json!([{ "scope": { "project": "p1" }, "action": "read", "kind": "Dashboard" }])
    );

    // Reading dashboards doesn't extend to managing roles.
    let res = srv.get(&alice, "/api/v1/projects/p1/roles").await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Deleting the binding revokes the grant on the next request.
    let res = srv
        .client
        .delete(srv.url("/api/v1/projects/p1/rolebindings/b1"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv.get(&alice, "/api/v1/me/permissions").await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["permissions"], json!([]));
}

#[tokio::test]
async fn binding_to_missing_role_or_user_is_rejected() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(ADMIN.0, ADMIN.1).await;
    seed_viewer(&srv, &admin).await;

    let res = srv
        .post(&admin, "/api/v1/projects/p1/rolebindings", binding("b2", "ghost", "alice"))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let res = srv
        .post(&admin, "/api/v1/projects/p1/rolebindings", binding("b3", "viewer", "nobody"))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv.get(&admin, "/api/v1/projects/p1/rolebindings/b2").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn binding_role_is_immutable() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(ADMIN.0, ADMIN.1).await;
    seed_viewer(&srv, &admin).await;

    let res = srv
        .post(
            &admin,
            "/api/v1/projects/p1/roles",
            json!({ "kind": "Role", "metadata": { "name": "editor" }, "spec": { "permissions": [] } }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = srv
        .put(&admin, "/api/v1/projects/p1/rolebindings/b1", binding("b1", "editor", "alice"))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "spec.role can't be updated");

    // Subjects can change.
    let res = srv
        .put(&admin, "/api/v1/projects/p1/rolebindings/b1", binding("b1", "viewer", ADMIN.0))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["metadata"]["version"], 1);
}

#[tokio::test]
async fn route_and_body_identity_must_agree() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(ADMIN.0, ADMIN.1).await;
    seed_viewer(&srv, &admin).await;

    let res = srv
        .put(&admin, "/api/v1/projects/p1/rolebindings/b1", binding("b2", "viewer", "alice"))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut body = viewer_role();
    body["metadata"]["project"] = json!("p2");
    let res = srv.post(&admin, "/api/v1/projects/p1/roles", body).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(ADMIN.0, ADMIN.1).await;

    let res = srv
        .post(
            &admin,
            "/api/v1/projects/p1/roles",
            json!({ "kind": "Dashboard", "metadata": { "name": "d1" } }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .post(&admin, "/api/v1/projects/p1/rolebindings", viewer_role())
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        "wrong entity format, attempting RoleBinding format, received 'Role'"
    );
}

#[tokio::test]
async fn users_without_grants_are_forbidden() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(ADMIN.0, ADMIN.1).await;
    let res = srv.post(&admin, "/api/v1/users", user("bob", "bob-pw")).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert!(created["spec"].get("password").is_none());

    let bob = srv.login("bob", "bob-pw").await;
    let res = srv.post(&bob, "/api/v1/globalroles", viewer_role()).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let res = srv.get(&bob, "/api/v1/users").await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn global_binding_applies_in_every_project() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(ADMIN.0, ADMIN.1).await;

    let res = srv.post(&admin, "/api/v1/globalroles", viewer_role()).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = srv.post(&admin, "/api/v1/users", user("carol", "carol-pw")).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = srv
        .post(&admin, "/api/v1/globalrolebindings", binding("everywhere", "viewer", "carol"))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = srv.get(&admin, "/api/v1/globalrolebindings?namePrefix=every").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let carol = srv.login("carol", "carol-pw").await;
    let res = srv.get(&carol, "/api/v1/me/permissions").await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["permissions"],
        json!([{ "scope": "global", "action": "read", "kind": "Dashboard" }])
    );
}
