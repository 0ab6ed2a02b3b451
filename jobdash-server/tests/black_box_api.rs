use jobdash_client::DashboardClient;
use jobdash_core::domain::job::JobStatus;
use jobdash_core::dto::job::{CreateJob, JobQuery};
use jobdash_core::query::SortKey;
use jobdash_server::api::create_router;
use jobdash_server::state::AppState;
use reqwest::StatusCode;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port
        let app = create_router(AppState::in_memory());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn client(&self) -> DashboardClient {
        DashboardClient::new(&self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn create(client: &str, job_id: Option<&str>, job_name: &str, parameters: &str) -> CreateJob {
    CreateJob {
        client: client.to_string(),
        job_id: job_id.map(str::to_string),
        job_name: job_name.to_string(),
        parameters: parameters.to_string(),
    }
}

#[tokio::test]
async fn add_retry_and_list_over_http() {
    let server = TestServer::spawn().await;
    let client = server.client();

    let added = client
        .add_job(&create("Acme", Some("1"), "Cost Metrics Scan", "a, b ,,c"))
        .await
        .unwrap();
    assert_eq!(added.status, JobStatus::Pending);
    assert_eq!(added.retry_count, 0);
    assert_eq!(added.parameters, vec!["a", "b", "c"]);

    client
        .add_job(&create("Globex", None, "Inventory Fetch", ""))
        .await
        .unwrap();

    for _ in 0..2 {
        client.retry_job(2, None).await.unwrap();
    }
    let retried = client
        .retry_job(2, Some("Retried by operator".to_string()))
        .await
        .unwrap();
    assert_eq!(retried.retry_count, 3);
    assert_eq!(retried.status, JobStatus::Retried);
    assert_eq!(retried.message, "Retried by operator");

    let by_retries = client
        .list_jobs(&JobQuery::default().with_sort(SortKey::RetryCount))
        .await
        .unwrap();
    let ids: Vec<_> = by_retries.iter().map(|j| j.job_id).collect();
    assert_eq!(ids, vec![2, 1]);

    let acme = client
        .list_jobs(&JobQuery::default().with_client("Acme"))
        .await
        .unwrap();
    assert_eq!(acme.len(), 1);
    assert_eq!(acme[0].client, "Acme");

    let nobody = client
        .list_jobs(&JobQuery::default().with_client("acme"))
        .await
        .unwrap();
    assert!(nobody.is_empty());

    let options = client.job_options().await.unwrap();
    assert_eq!(options.clients, vec!["Acme", "Globex"]);
}

#[tokio::test]
async fn errors_are_typed_and_leave_state_unchanged() {
    let server = TestServer::spawn().await;
    let client = server.client();

    client
        .add_job(&create("Acme", Some("5"), "Scan", ""))
        .await
        .unwrap();

    let duplicate = client
        .add_job(&create("Other", Some("5"), "Scan", ""))
        .await
        .unwrap_err();
    assert!(duplicate.is_invalid_request());

    let blank = client
        .add_job(&create("  ", Some("6"), "Scan", ""))
        .await
        .unwrap_err();
    assert!(blank.is_invalid_request());

    let missing = client.retry_job(99, None).await.unwrap_err();
    assert!(missing.is_not_found());

    let jobs = client.list_jobs(&JobQuery::default()).await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].retry_count, 0);
}

#[tokio::test]
async fn dashboard_page_and_forms() {
    let server = TestServer::spawn().await;
    let http = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let res = http
        .post(format!("{}/jobs", server.base_url))
        .form(&[
            ("client", "Acme"),
            ("job_id", "3"),
            ("job_name", "Scan"),
            ("parameters", "-k eastus, -t 80%"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/?added=3");

    let res = http
        .post(format!("{}/jobs/3/retry?client=Acme", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/?client=Acme&retried=3");

    let page = http
        .get(format!("{}/?client=Acme&retried=3", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let body = page.text().await.unwrap();
    assert!(body.contains("Job 3 marked for retry."));
    assert!(body.contains("<td>-k eastus,-t 80%</td>"));
    assert!(body.contains("<td>Retried</td>"));

    let missing = http
        .post(format!("{}/jobs/42/retry", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(missing.text().await.unwrap().contains("Job 42 not found"));

    let invalid = http
        .post(format!("{}/jobs", server.base_url))
        .form(&[("client", "Acme"), ("job_id", ""), ("job_name", "Scan")])
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    assert!(
        invalid
            .text()
            .await
            .unwrap()
            .contains("Please fill in Client, Job ID, and Job Name.")
    );
}

#[tokio::test]
async fn retry_accepts_empty_body_and_rejects_bad_ids_as_json() {
    let server = TestServer::spawn().await;
    server
        .client()
        .add_job(&create("Acme", Some("1"), "Scan", ""))
        .await
        .unwrap();
    let http = reqwest::Client::new();

    let res = http
        .post(format!("{}/api/jobs/1/retry", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let job: serde_json::Value = res.json().await.unwrap();
    assert_eq!(job["message"], "Retried");
    assert_eq!(job["retry_count"], 1);

    let res = http
        .post(format!("{}/api/jobs/abc/retry", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn add_form_keeps_active_filters() {
    let server = TestServer::spawn().await;
    let http = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let res = http
        .post(format!("{}/jobs?client=Acme&sort=job_id", server.base_url))
        .form(&[("client", "Acme"), ("job_id", "8"), ("job_name", "Scan")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        res.headers()["location"],
        "/?client=Acme&sort=job_id&added=8"
    );

    let res = http
        .post(format!("{}/jobs?client=Acme&sort=job_id", server.base_url))
        .form(&[("client", "Globex"), ("job_id", "8"), ("job_name", "Scan")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.text().await.unwrap();
    assert!(body.contains("Job ID 8 already exists"));
    assert!(body.contains("<option value=\"Acme\" selected>Acme</option>"));
    assert!(body.contains("<option value=\"job_id\" selected>Job ID</option>"));
}

#[tokio::test]
async fn health_check() {
    let server = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", server.base_url))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["jobs"], 0);
}
