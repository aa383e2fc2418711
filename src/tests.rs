//! Integration tests for the PitCrew backend.

use std::sync::{Arc, Mutex};

use axum::{Json, Router};
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::notify::Notifier;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_options(Some("test-api-key".to_string()), None).await
    }

    async fn with_options(psk: Option<String>, webhook_url: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        // Create config
        let config = Config {
            api_psk: psk.clone(),
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            webhook_url: webhook_url.clone(),
        };

        let state = AppState {
            repo,
            notifier: Notifier::new(webhook_url),
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /api/teams as `user`; returns the full response.
    async fn create_team_resp(&self, user: &str, name: &str, role: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/teams"))
            .header("x-acting-user", user)
            .json(&json!({ "name": name, "role": role }))
            .send()
            .await
            .unwrap()
    }

    /// Create a team and return its id, asserting success.
    async fn create_team(&self, user: &str, name: &str, role: &str) -> String {
        let resp = self.create_team_resp(user, name, role).await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Submit a join request as `user`; returns the full response.
    async fn submit_resp(&self, team_id: &str, user: &str, role: &str) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/api/teams/{}/requests", team_id)))
            .header("x-acting-user", user)
            .json(&json!({ "role": role }))
            .send()
            .await
            .unwrap()
    }

    /// Submit a join request and return the request id, asserting success.
    async fn submit(&self, team_id: &str, user: &str, role: &str) -> String {
        let resp = self.submit_resp(team_id, user, role).await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn accept_resp(&self, request_id: &str, actor: &str) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/api/requests/{}/accept", request_id)))
            .header("x-acting-user", actor)
            .send()
            .await
            .unwrap()
    }

    /// Submit and immediately accept a join request, asserting success.
    async fn join(&self, team_id: &str, user: &str, role: &str, leader: &str) {
        let request_id = self.submit(team_id, user, role).await;
        let resp = self.accept_resp(&request_id, leader).await;
        assert_eq!(resp.status(), 200);
    }

    async fn reject_resp(&self, request_id: &str, actor: &str) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/api/requests/{}/reject", request_id)))
            .header("x-acting-user", actor)
            .send()
            .await
            .unwrap()
    }

    async fn get_json(&self, path: &str) -> Value {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }

    /// Build a core-complete team of 4: driver (leader), electronics,
    /// programmer, one mechanic. Returns the team id.
    async fn build_core_team(&self, prefix: &str) -> String {
        let leader = format!("{}-leader", prefix);
        let team_id = self
            .create_team(&leader, &format!("{} team", prefix), "driver")
            .await;
        self.join(&team_id, &format!("{}-elec", prefix), "electronics", &leader)
            .await;
        self.join(&team_id, &format!("{}-prog", prefix), "programmer", &leader)
            .await;
        self.join(
            &team_id,
            &format!("{}-mech1", prefix),
            "mechanics_designer",
            &leader,
        )
        .await;
        team_id
    }
}

/// Spawn a tiny webhook capture server; returns its URL and the captured
/// payloads.
async fn spawn_webhook_capture() -> (String, Arc<Mutex<Vec<Value>>>) {
    let events: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
    let captured = events.clone();

    let app = Router::new().route(
        "/hook",
        axum::routing::post(move |Json(body): Json<Value>| {
            let captured = captured.clone();
            async move {
                captured.lock().unwrap().push(body);
                "OK"
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/hook", addr), events)
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::new().await;

    // Request without API key
    let client = Client::new();
    let resp = client
        .get(fixture.url("/api/datastore"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_invalid_psk() {
    let fixture = TestFixture::new().await;

    let client = Client::new();
    let resp = client
        .get(fixture.url("/api/datastore"))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_missing_acting_user() {
    let fixture = TestFixture::new().await;

    // PSK is present (default client headers) but x-acting-user is not.
    let resp = fixture
        .client
        .post(fixture.url("/api/teams"))
        .json(&json!({ "name": "Headless", "role": "driver" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_role_catalog() {
    let fixture = TestFixture::new().await;

    let body = fixture.get_json("/api/roles").await;
    assert_eq!(body["success"], true);
    let roles = body["data"].as_array().unwrap();
    assert_eq!(roles.len(), 4);
    assert_eq!(roles[0]["id"], "driver");
    assert_eq!(roles[0]["unique"], true);
    assert_eq!(roles[0]["maxPerTeam"], 1);
    assert_eq!(roles[3]["id"], "mechanics_designer");
    assert_eq!(roles[3]["unique"], false);
    assert_eq!(roles[3]["maxPerTeam"], 2);

    // Localized labels differ.
    let ar = fixture.get_json("/api/roles?lang=ar").await;
    assert_ne!(ar["data"][0]["label"], body["data"][0]["label"]);

    // Unknown language is rejected.
    let resp = fixture
        .client
        .get(fixture.url("/api/roles?lang=fr"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_create_team() {
    let fixture = TestFixture::new().await;

    let resp = fixture.create_team_resp("alice", "Red Rockets", "driver").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Red Rockets");
    assert_eq!(body["data"]["leaderId"], "alice");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["memberCount"], 1);

    let team_id = body["data"]["id"].as_str().unwrap();

    // Team detail shows the leader on the roster and the derived view.
    let detail = fixture.get_json(&format!("/api/teams/{}", team_id)).await;
    let members = detail["data"]["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["userId"], "alice");
    assert_eq!(members[0]["role"], "driver");

    let composition = &detail["data"]["composition"];
    assert_eq!(composition["memberCount"], 1);
    assert_eq!(composition["coreComplete"], false);
    assert_eq!(composition["acceptingMembers"], true);
    let available: Vec<&str> = composition["availableRoles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        available,
        vec!["electronics", "programmer", "mechanics_designer"]
    );
    let missing: Vec<&str> = composition["missingRoles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        missing,
        vec!["electronics", "programmer", "mechanics_designer"]
    );
}

#[tokio::test]
async fn test_create_team_invalid_role() {
    let fixture = TestFixture::new().await;

    let resp = fixture.create_team_resp("alice", "Bad Role", "navigator").await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_ROLE");
    assert_eq!(body["error"]["details"]["role"], "navigator");

    // Empty name fails input validation.
    let resp2 = fixture.create_team_resp("alice", "   ", "driver").await;
    assert_eq!(resp2.status(), 400);
    let body2: Value = resp2.json().await.unwrap();
    assert_eq!(body2["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_duplicate_leadership() {
    let fixture = TestFixture::new().await;

    fixture.create_team("alice", "First Team", "driver").await;

    let resp = fixture.create_team_resp("alice", "Second Team", "programmer").await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "DUPLICATE_LEADERSHIP");
}

#[tokio::test]
async fn test_staged_growth_to_full_team() {
    let fixture = TestFixture::new().await;
    let team_id = fixture.build_core_team("grow").await;

    // Core complete at 4; only the repeatable role is still admissible.
    let comp = fixture
        .get_json(&format!("/api/teams/{}/composition", team_id))
        .await;
    assert_eq!(comp["data"]["memberCount"], 4);
    assert_eq!(comp["data"]["coreComplete"], true);
    assert_eq!(comp["data"]["acceptingMembers"], true);
    let available = comp["data"]["availableRoles"].as_array().unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0], "mechanics_designer");

    // The fifth seat goes to the second mechanic.
    fixture
        .join(&team_id, "grow-mech2", "mechanics_designer", "grow-leader")
        .await;

    let comp = fixture
        .get_json(&format!("/api/teams/{}/composition", team_id))
        .await;
    assert_eq!(comp["data"]["memberCount"], 5);
    assert_eq!(comp["data"]["acceptingMembers"], false);
    assert!(comp["data"]["availableRoles"].as_array().unwrap().is_empty());

    // A sixth acceptance fails on capacity, whatever the role.
    let request_id = fixture.submit(&team_id, "grow-late", "mechanics_designer").await;
    let resp = fixture.accept_resp(&request_id, "grow-leader").await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "CAPACITY_EXCEEDED");
}

#[tokio::test]
async fn test_accept_taken_unique_role() {
    let fixture = TestFixture::new().await;

    let team_id = fixture.create_team("lead", "Solo", "driver").await;

    // Submission succeeds even though the role is already held: the
    // composition check is deferred to acceptance.
    let request_id = fixture.submit(&team_id, "second-driver", "driver").await;

    let resp = fixture.accept_resp(&request_id, "lead").await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "ROLE_ALREADY_TAKEN");
    assert_eq!(body["error"]["details"]["role"], "driver");

    // A failed acceptance leaves the request pending for the leader.
    let requests = fixture
        .get_json(&format!("/api/teams/{}/requests?status=pending", team_id))
        .await;
    let pending = requests["data"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["id"].as_str().unwrap(), request_id);
}

#[tokio::test]
async fn test_submit_request_errors() {
    let fixture = TestFixture::new().await;

    let team_id = fixture.create_team("lead", "Gatekeepers", "driver").await;

    // Unknown team.
    let resp = fixture.submit_resp("no-such-team", "eve", "programmer").await;
    assert_eq!(resp.status(), 404);

    // Unknown role tag.
    let resp = fixture.submit_resp(&team_id, "eve", "navigator").await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_ROLE");

    // Duplicate pending for the same pair.
    fixture.submit(&team_id, "eve", "programmer").await;
    let resp = fixture.submit_resp(&team_id, "eve", "electronics").await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "DUPLICATE_PENDING");

    // Team members cannot request to join another team.
    let other_team = fixture.create_team("other-lead", "Rivals", "driver").await;
    let resp = fixture.submit_resp(&other_team, "lead", "programmer").await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "ALREADY_ON_A_TEAM");
}

#[tokio::test]
async fn test_no_resubmission_after_decision() {
    let fixture = TestFixture::new().await;

    let team_id = fixture.create_team("lead", "Deciders", "driver").await;

    // Rejected pair cannot resubmit.
    let rejected_id = fixture.submit(&team_id, "rej-user", "programmer").await;
    let resp = fixture.reject_resp(&rejected_id, "lead").await;
    assert_eq!(resp.status(), 200);

    let resp = fixture.submit_resp(&team_id, "rej-user", "programmer").await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "ALREADY_REJECTED");

    // Approved pair cannot resubmit either. The pair check runs before the
    // membership rule, so the specific ALREADY_APPROVED code surfaces even
    // though the requester is also on the team.
    let approved_id = fixture.submit(&team_id, "app-user", "programmer").await;
    let resp = fixture.accept_resp(&approved_id, "lead").await;
    assert_eq!(resp.status(), 200);

    let resp = fixture.submit_resp(&team_id, "app-user", "electronics").await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "ALREADY_APPROVED");
}

#[tokio::test]
async fn test_reject_idempotence() {
    let fixture = TestFixture::new().await;

    let team_id = fixture.create_team("lead", "Rejectors", "driver").await;
    let request_id = fixture.submit(&team_id, "hopeful", "programmer").await;

    let resp = fixture.reject_resp(&request_id, "lead").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "rejected");
    assert_eq!(body["data"]["decidedBy"], "lead");

    // Second reject fails and the terminal state never changes. The message
    // reports the status as stored, not the one read before the flip.
    let resp = fixture.reject_resp(&request_id, "lead").await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_PENDING");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("already rejected"),
        "unexpected message: {}",
        body["error"]["message"]
    );

    let requests = fixture
        .get_json(&format!("/api/teams/{}/requests", team_id))
        .await;
    assert_eq!(requests["data"][0]["status"], "rejected");

    // Accepting a rejected request fails the same way.
    let resp = fixture.accept_resp(&request_id, "lead").await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_PENDING");

    // And rejecting an approved request reports the approved status.
    let accepted_id = fixture.submit(&team_id, "joiner", "programmer").await;
    let resp = fixture.accept_resp(&accepted_id, "lead").await;
    assert_eq!(resp.status(), 200);

    let resp = fixture.reject_resp(&accepted_id, "lead").await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_PENDING");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("already approved"),
        "unexpected message: {}",
        body["error"]["message"]
    );
}

#[tokio::test]
async fn test_request_not_found() {
    let fixture = TestFixture::new().await;

    let resp = fixture.accept_resp("no-such-request", "lead").await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let resp = fixture.reject_resp("no-such-request", "lead").await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_concurrent_accepts_race_for_last_unique_role() {
    let fixture = TestFixture::new().await;

    let team_id = fixture.create_team("race-lead", "Racers", "driver").await;

    // Two pending requests both asking for electronics.
    let first = fixture.submit(&team_id, "racer-a", "electronics").await;
    let second = fixture.submit(&team_id, "racer-b", "electronics").await;

    let (resp_a, resp_b) = tokio::join!(
        fixture.accept_resp(&first, "race-lead"),
        fixture.accept_resp(&second, "race-lead")
    );

    let statuses = [resp_a.status().as_u16(), resp_b.status().as_u16()];
    assert!(statuses.contains(&200), "one accept must win: {:?}", statuses);
    assert!(statuses.contains(&409), "one accept must lose: {:?}", statuses);

    let loser = if resp_a.status() == 409 { resp_a } else { resp_b };
    let body: Value = loser.json().await.unwrap();
    assert_eq!(body["error"]["code"], "ROLE_ALREADY_TAKEN");

    // Exactly one membership was inserted.
    let detail = fixture.get_json(&format!("/api/teams/{}", team_id)).await;
    let members = detail["data"]["members"].as_array().unwrap();
    assert_eq!(members.len(), 2);

    // The losing request is still pending, not silently auto-rejected.
    let pending = fixture
        .get_json(&format!("/api/teams/{}/requests?status=pending", team_id))
        .await;
    assert_eq!(pending["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_direct_member_add() {
    let fixture = TestFixture::new().await;

    let team_id = fixture.create_team("lead", "Direct", "driver").await;

    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/teams/{}/members", team_id)))
        .header("x-acting-user", "admin")
        .json(&json!({ "userId": "walk-on", "role": "electronics" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["userId"], "walk-on");
    assert_eq!(body["data"]["role"], "electronics");

    // The same composition rules apply as on acceptance.
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/teams/{}/members", team_id)))
        .header("x-acting-user", "admin")
        .json(&json!({ "userId": "second-elec", "role": "electronics" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "ROLE_ALREADY_TAKEN");

    // The global one-team-per-user rule applies too.
    let other = fixture.create_team("other-lead", "Other", "driver").await;
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/teams/{}/members", other)))
        .header("x-acting-user", "admin")
        .json(&json!({ "userId": "walk-on", "role": "programmer" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "ALREADY_ON_A_TEAM");
}

#[tokio::test]
async fn test_team_status_update() {
    let fixture = TestFixture::new().await;

    let team_id = fixture.create_team("lead", "Status Crew", "driver").await;

    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/teams/{}/status", team_id)))
        .header("x-acting-user", "admin")
        .json(&json!({ "status": "approved" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "approved");

    // Unknown status tag fails validation.
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/teams/{}/status", team_id)))
        .header("x-acting-user", "admin")
        .json(&json!({ "status": "disqualified" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_team_delete_cascades() {
    let fixture = TestFixture::new().await;

    let team_id = fixture.create_team("lead", "Doomed", "driver").await;
    fixture.submit(&team_id, "hopeful", "programmer").await;
    fixture
        .client
        .put(fixture.url(&format!("/api/teams/{}/attendance", team_id)))
        .header("x-acting-user", "lead")
        .json(&json!({ "memberId": "lead", "day": 1, "present": true }))
        .send()
        .await
        .unwrap();

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/teams/{}", team_id)))
        .header("x-acting-user", "admin")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/teams/{}", team_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Memberships and requests are gone with the team; the former leader can
    // found a new team again.
    let datastore = fixture.get_json("/api/datastore").await;
    assert!(datastore["data"]["teams"].as_array().unwrap().is_empty());
    assert!(datastore["data"]["members"].as_array().unwrap().is_empty());
    assert!(datastore["data"]["requests"].as_array().unwrap().is_empty());

    fixture.create_team("lead", "Phoenix", "driver").await;
}

#[tokio::test]
async fn test_attendance_upsert_and_violations() {
    let fixture = TestFixture::new().await;
    let team_id = fixture.create_team("lead", "Attendees", "driver").await;

    let set = |member: &str, day: i64, present: bool| {
        let fixture = &fixture;
        let team_id = team_id.clone();
        let member = member.to_string();
        async move {
            let resp = fixture
                .client
                .put(fixture.url(&format!("/api/teams/{}/attendance", team_id)))
                .header("x-acting-user", "lead")
                .json(&json!({ "memberId": member, "day": day, "present": present }))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), 200);
        }
    };

    // present, absent, present over three days: one absence, a warning only.
    set("lead", 1, true).await;
    set("lead", 2, false).await;
    set("lead", 3, true).await;

    let violations = fixture
        .get_json(&format!("/api/teams/{}/attendance/violations", team_id))
        .await;
    assert!(violations["data"].as_array().unwrap().is_empty());

    // A second absent day tips the member into violation.
    set("lead", 4, false).await;

    let violations = fixture
        .get_json(&format!("/api/teams/{}/attendance/violations", team_id))
        .await;
    let list = violations["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["memberId"], "lead");
    assert_eq!(list[0]["absences"], 2);

    // Upsert overwrites: flipping day 4 back to present clears the violation
    // without creating a duplicate record.
    set("lead", 4, true).await;

    let violations = fixture
        .get_json(&format!("/api/teams/{}/attendance/violations", team_id))
        .await;
    assert!(violations["data"].as_array().unwrap().is_empty());

    let records = fixture
        .get_json(&format!("/api/teams/{}/attendance", team_id))
        .await;
    assert_eq!(records["data"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_member_absence_count() {
    let fixture = TestFixture::new().await;
    let team_id = fixture.create_team("lead", "Counters", "driver").await;

    let set = |member: &str, day: i64, present: bool| {
        let fixture = &fixture;
        let team_id = team_id.clone();
        let member = member.to_string();
        async move {
            let resp = fixture
                .client
                .put(fixture.url(&format!("/api/teams/{}/attendance", team_id)))
                .header("x-acting-user", "lead")
                .json(&json!({ "memberId": member, "day": day, "present": present }))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), 200);
        }
    };

    // No records yet: zero absences, no violation.
    let summary = fixture
        .get_json(&format!("/api/teams/{}/attendance/lead", team_id))
        .await;
    assert_eq!(summary["data"]["memberId"], "lead");
    assert_eq!(summary["data"]["absences"], 0);
    assert_eq!(summary["data"]["violation"], false);

    // One absence is a warning, not a violation.
    set("lead", 1, false).await;
    set("lead", 2, true).await;

    let summary = fixture
        .get_json(&format!("/api/teams/{}/attendance/lead", team_id))
        .await;
    assert_eq!(summary["data"]["absences"], 1);
    assert_eq!(summary["data"]["violation"], false);

    // A second absence crosses the threshold.
    set("lead", 3, false).await;

    let summary = fixture
        .get_json(&format!("/api/teams/{}/attendance/lead", team_id))
        .await;
    assert_eq!(summary["data"]["absences"], 2);
    assert_eq!(summary["data"]["violation"], true);

    // Another member's days never bleed into the count.
    set("other", 1, false).await;

    let summary = fixture
        .get_json(&format!("/api/teams/{}/attendance/lead", team_id))
        .await;
    assert_eq!(summary["data"]["absences"], 2);
}

#[tokio::test]
async fn test_attendance_validation() {
    let fixture = TestFixture::new().await;
    let team_id = fixture.create_team("lead", "Validators", "driver").await;

    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/teams/{}/attendance", team_id)))
        .header("x-acting-user", "lead")
        .json(&json!({ "memberId": "lead", "day": 0, "present": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/teams/{}/attendance", team_id)))
        .header("x-acting-user", "lead")
        .json(&json!({ "memberId": "", "day": 1, "present": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_datastore_snapshot_and_revision() {
    let fixture = TestFixture::new().await;

    let initial = fixture.get_json("/api/datastore/revision").await;
    let initial_revision = initial["data"]["revisionId"].as_i64().unwrap();

    let team_id = fixture.create_team("lead", "Snapshot", "driver").await;
    fixture.submit(&team_id, "hopeful", "programmer").await;

    let datastore = fixture.get_json("/api/datastore").await;
    assert_eq!(datastore["success"], true);
    assert!(datastore["data"]["schemaVersion"].is_number());
    assert_eq!(datastore["data"]["teams"].as_array().unwrap().len(), 1);
    assert_eq!(datastore["data"]["members"].as_array().unwrap().len(), 1);
    assert_eq!(datastore["data"]["requests"].as_array().unwrap().len(), 1);

    // Two writes, two revision bumps.
    let revision = datastore["data"]["revisionId"].as_i64().unwrap();
    assert_eq!(revision, initial_revision + 2);
    assert_eq!(datastore["revisionId"].as_i64().unwrap(), revision);
}

#[tokio::test]
async fn test_notifications_delivered() {
    let (webhook_url, events) = spawn_webhook_capture().await;
    let fixture =
        TestFixture::with_options(Some("test-api-key".to_string()), Some(webhook_url)).await;

    let team_id = fixture.create_team("lead", "Notified", "driver").await;

    let accepted = fixture.submit(&team_id, "joiner", "electronics").await;
    let resp = fixture.accept_resp(&accepted, "lead").await;
    assert_eq!(resp.status(), 200);

    let rejected = fixture.submit(&team_id, "loser", "programmer").await;
    let resp = fixture.reject_resp(&rejected, "lead").await;
    assert_eq!(resp.status(), 200);

    // Delivery is fire-and-forget; give the spawned tasks a moment.
    tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 2);
    let kinds: Vec<&str> = captured
        .iter()
        .map(|e| e["event"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"member_added"));
    assert!(kinds.contains(&"request_rejected"));
    for event in captured.iter() {
        assert_eq!(event["teamId"].as_str().unwrap(), team_id);
        assert!(event["sentAt"].is_string());
    }
}

#[tokio::test]
async fn test_team_list_and_not_found() {
    let fixture = TestFixture::new().await;

    fixture.create_team("alice", "Alpha", "driver").await;
    fixture.create_team("bob", "Beta", "programmer").await;

    let teams = fixture.get_json("/api/teams").await;
    assert_eq!(teams["data"].as_array().unwrap().len(), 2);

    let resp = fixture
        .client
        .get(fixture.url("/api/teams/no-such-team"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let resp = fixture
        .client
        .get(fixture.url("/api/teams/no-such-team/composition"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
