//! Dashboard Page
//!
//! Server-rendered HTML view of the job board: filter and sort controls,
//! the job table with a retry button per row, and the add-job form.
//! Form posts redirect back to the page; validation and not-found errors
//! are rendered inline.

use axum::{
    Form,
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use jobdash_core::domain::job::{JobRecord, JobStatus};
use jobdash_core::dto::job::{CreateJob, JobOptions, JobQuery};
use jobdash_core::query::SortKey;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::service::job_service::{self, JobError};
use crate::state::AppState;

/// Query keys used for post-redirect notices; never carried over as filters
const NOTICE_KEYS: [&str; 2] = ["added", "retried"];

#[derive(Debug, Default, Deserialize)]
pub struct Notice {
    added: Option<i64>,
    retried: Option<i64>,
}

impl Notice {
    fn text(&self) -> Option<String> {
        match (self.added, self.retried) {
            (Some(id), _) => Some(format!("Job {} added successfully.", id)),
            (None, Some(id)) => Some(format!("Job {} marked for retry.", id)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddJobForm {
    #[serde(default)]
    client: String,
    #[serde(default)]
    job_id: String,
    #[serde(default)]
    job_name: String,
    #[serde(default)]
    parameters: String,
}

/// Everything one render of the page needs
struct PageContext<'a> {
    query: &'a JobQuery,
    preserved_query: String,
    notice: Option<String>,
    error: Option<String>,
    form: AddJobForm,
    status: StatusCode,
}

/// GET /
pub async fn show_dashboard(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
    Query(query): Query<JobQuery>,
    Query(notice): Query<Notice>,
) -> Response {
    let ctx = PageContext {
        query: &query,
        preserved_query: preserved_query(raw.as_deref()),
        notice: notice.text(),
        error: None,
        form: AddJobForm::default(),
        status: StatusCode::OK,
    };

    render(&state, ctx).await
}

/// POST /jobs
///
/// Like the retry buttons, the add form posts to a URL carrying the page's
/// filters, so both the redirect and an inline error keep the current view.
pub async fn submit_job(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
    Query(query): Query<JobQuery>,
    Form(form): Form<AddJobForm>,
) -> Response {
    let preserved = preserved_query(raw.as_deref());
    let req = CreateJob {
        client: form.client.clone(),
        job_id: Some(form.job_id.clone()),
        job_name: form.job_name.clone(),
        parameters: form.parameters.clone(),
    };

    match job_service::add_job(&state, req).await {
        Ok(job) => redirect_with_notice(&preserved, "added", job.job_id),
        Err(err) => {
            let err = ApiError::from(err);
            if matches!(err, ApiError::RepositoryError(_)) {
                return error_page(err);
            }

            let ctx = PageContext {
                query: &query,
                preserved_query: preserved,
                notice: None,
                error: Some(err.public_message()),
                form,
                status: err.status_code(),
            };
            render(&state, ctx).await
        }
    }
}

/// POST /jobs/{job_id}/retry
///
/// The form action carries the page's filters in its query string so the
/// redirect lands on the same view.
pub async fn submit_retry(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    RawQuery(raw): RawQuery,
    Query(query): Query<JobQuery>,
) -> Response {
    let preserved = preserved_query(raw.as_deref());

    match job_service::retry_job(&state, job_id, None).await {
        Ok(job) => redirect_with_notice(&preserved, "retried", job.job_id),
        Err(err) => {
            let err = ApiError::from(err);
            if matches!(err, ApiError::RepositoryError(_)) {
                return error_page(err);
            }

            let ctx = PageContext {
                query: &query,
                preserved_query: preserved,
                notice: None,
                error: Some(err.public_message()),
                form: AddJobForm::default(),
                status: err.status_code(),
            };
            render(&state, ctx).await
        }
    }
}

fn redirect_with_notice(preserved: &str, key: &str, job_id: i64) -> Response {
    Redirect::to(&notice_location(preserved, key, job_id)).into_response()
}

fn notice_location(preserved: &str, key: &str, job_id: i64) -> String {
    let separator = if preserved.is_empty() { "" } else { "&" };
    format!("/?{}{}{}={}", preserved, separator, key, job_id)
}

async fn render(state: &AppState, mut ctx: PageContext<'_>) -> Response {
    let jobs = match job_service::list_jobs(state, ctx.query).await {
        Ok(jobs) => jobs,
        // A malformed filter still shows the full table
        Err(JobError::ValidationError(msg)) => {
            if ctx.error.is_none() {
                ctx.error = Some(msg);
            }
            match job_service::list_jobs(state, &JobQuery::default()).await {
                Ok(jobs) => jobs,
                Err(err) => return error_page(err.into()),
            }
        }
        Err(err) => return error_page(err.into()),
    };

    let options = match job_service::job_options(state).await {
        Ok(options) => options,
        Err(err) => return error_page(err.into()),
    };

    let status = ctx.status;
    (status, Html(render_page(&ctx, &jobs, &options))).into_response()
}

fn error_page(err: ApiError) -> Response {
    tracing::error!("Dashboard request failed: {:?}", err);
    let status = err.status_code();
    let body = format!(
        "<!DOCTYPE html><html><head><title>Job Dashboard</title></head><body>\
         <h1>Job Dashboard</h1><p class=\"error\">{}</p><p><a href=\"/\">Back</a></p></body></html>",
        escape_html(&err.public_message())
    );
    (status, Html(body)).into_response()
}

/// Raw query string without the notice keys
fn preserved_query(raw: Option<&str>) -> String {
    raw.unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            !NOTICE_KEYS.contains(&key)
        })
        .collect::<Vec<_>>()
        .join("&")
}

// =============================================================================
// Rendering
// =============================================================================

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 1.5rem; }
.scroll-container { overflow-x: auto; width: 100%; }
table { border-collapse: collapse; font-size: 14px; white-space: nowrap; }
th, td { border-bottom: 1px solid #ddd; padding: 0.35rem 0.6rem; text-align: left; }
th { background: #f4f4f4; }
.notice { color: #1a7f37; }
.error { color: #cf222e; }
form.inline { display: inline; margin: 0; }
fieldset { margin-bottom: 1rem; }
"#;

fn render_page(ctx: &PageContext<'_>, jobs: &[JobRecord], options: &JobOptions) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Job Dashboard</title>\n");
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));
    html.push_str("<h1>Job Dashboard</h1>\n<p><a href=\"/\">Refresh</a></p>\n");

    if let Some(notice) = &ctx.notice {
        html.push_str(&format!("<p class=\"notice\">{}</p>\n", escape_html(notice)));
    }
    if let Some(error) = &ctx.error {
        html.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(error)));
    }

    render_filters(&mut html, ctx.query, options);
    render_table(&mut html, jobs, &ctx.preserved_query);
    render_add_form(&mut html, &ctx.form, &ctx.preserved_query);

    html.push_str("</body>\n</html>\n");
    html
}

fn render_filters(html: &mut String, query: &JobQuery, options: &JobOptions) {
    html.push_str("<form method=\"get\" action=\"/\">\n<fieldset>\n<legend>Filter &amp; Sort Jobs</legend>\n");

    let selected_client = query.client.as_deref().unwrap_or_default();
    let mut clients = options.clients.clone();
    if !selected_client.is_empty() && !clients.iter().any(|c| c == selected_client) {
        clients.push(selected_client.to_string());
    }
    html.push_str("<label>Client <select name=\"client\">");
    push_option(html, "", "All", selected_client.is_empty());
    for client in &clients {
        push_option(html, client, client, client == selected_client);
    }
    html.push_str("</select></label>\n");

    let selected_status = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<JobStatus>().ok());
    let mut statuses = options.statuses.clone();
    if let Some(status) = selected_status
        && !statuses.contains(&status)
    {
        statuses.push(status);
    }
    html.push_str("<label>Status <select name=\"status\">");
    push_option(html, "", "All", selected_status.is_none());
    for status in &statuses {
        push_option(html, status.as_str(), status.as_str(), Some(*status) == selected_status);
    }
    html.push_str("</select></label>\n");

    push_input(html, "text", "job_name", "Job Name contains", query.job_name.as_deref());
    push_input(html, "text", "ref_num", "Reference Number", query.ref_num.as_deref());
    push_input(html, "date", "from", "Executed from", query.from.as_deref());
    push_input(html, "date", "to", "to", query.to.as_deref());

    let selected_sort = query.sort.as_deref().and_then(|s| s.parse::<SortKey>().ok());
    html.push_str("<label>Sort by <select name=\"sort\">");
    push_option(html, "", "Insertion order", selected_sort.is_none());
    for key in SortKey::ALL {
        push_option(html, key.as_str(), key.label(), Some(key) == selected_sort);
    }
    html.push_str("</select></label>\n");

    html.push_str("<button type=\"submit\">Apply</button>\n</fieldset>\n</form>\n");
}

fn action_with_query(path: &str, preserved_query: &str) -> String {
    if preserved_query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, preserved_query)
    }
}

fn render_table(html: &mut String, jobs: &[JobRecord], preserved_query: &str) {
    html.push_str("<h2>Job Execution Table</h2>\n");

    if jobs.is_empty() {
        html.push_str("<p>No jobs available for the selected filter.</p>\n");
        return;
    }

    html.push_str("<div class=\"scroll-container\">\n<table>\n<thead><tr>");
    for header in [
        "Client",
        "JobID",
        "JobName",
        "Parameters",
        "Status",
        "Message",
        "ExecutedDateTime",
        "RefNum",
        "RetryCount",
        "Action",
    ] {
        html.push_str(&format!("<th>{}</th>", header));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for job in jobs {
        let job_id = job.job_id.to_string();
        let parameters = job.parameters.join(",");
        let executed = job
            .executed_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        let retry_count = job.retry_count.to_string();

        html.push_str("<tr>");
        for cell in [
            job.client.as_str(),
            job_id.as_str(),
            job.job_name.as_str(),
            parameters.as_str(),
            job.status.as_str(),
            job.message.as_str(),
            executed.as_str(),
            job.ref_num.as_deref().unwrap_or_default(),
            retry_count.as_str(),
        ] {
            html.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        html.push_str(&format!(
            "<td><form class=\"inline\" method=\"post\" action=\"{}\">\
             <button type=\"submit\" title=\"Retry Job {}\">Retry</button></form></td>",
            escape_attr(&action_with_query(
                &format!("/jobs/{}/retry", job.job_id),
                preserved_query
            )),
            job.job_id
        ));
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</div>\n");
}

fn render_add_form(html: &mut String, form: &AddJobForm, preserved_query: &str) {
    html.push_str(&format!(
        "<h2>Add New Job</h2>\n<form method=\"post\" action=\"{}\">\n<fieldset>\n",
        escape_attr(&action_with_query("/jobs", preserved_query))
    ));
    push_input(html, "text", "client", "Client Name", Some(&form.client));
    push_input(html, "text", "job_id", "Job ID", Some(&form.job_id));
    push_input(html, "text", "job_name", "Job Name", Some(&form.job_name));
    push_input(
        html,
        "text",
        "parameters",
        "Parameters (comma-separated, e.g. -k eastus, -d prod)",
        Some(&form.parameters),
    );
    html.push_str("<button type=\"submit\">Add Job</button>\n</fieldset>\n</form>\n");
}

fn push_option(html: &mut String, value: &str, label: &str, selected: bool) {
    html.push_str(&format!(
        "<option value=\"{}\"{}>{}</option>",
        escape_attr(value),
        if selected { " selected" } else { "" },
        escape_html(label)
    ));
}

fn push_input(html: &mut String, kind: &str, name: &str, label: &str, value: Option<&str>) {
    html.push_str(&format!(
        "<label>{} <input type=\"{}\" name=\"{}\" value=\"{}\"></label>\n",
        escape_html(label),
        kind,
        name,
        escape_attr(value.unwrap_or_default())
    ));
}

fn escape_html(text: &str) -> String {
    text.chars()
        .fold(String::with_capacity(text.len()), |mut escaped, ch| {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                _ => escaped.push(ch),
            }
            escaped
        })
}

fn escape_attr(text: &str) -> String {
    text.chars()
        .fold(String::with_capacity(text.len()), |mut escaped, ch| {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                _ => escaped.push(ch),
            }
            escaped
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record() -> JobRecord {
        JobRecord {
            client: "<Acme & Co>".to_string(),
            job_id: 3,
            job_name: "Scan".to_string(),
            parameters: vec!["-k eastus".to_string(), "-t 80%".to_string()],
            status: JobStatus::Failed,
            message: "Failed: Timeout".to_string(),
            executed_at: Some(Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap()),
            ref_num: None,
            retry_count: 1,
        }
    }

    fn context(query: &JobQuery) -> PageContext<'_> {
        PageContext {
            query,
            preserved_query: "client=Acme&sort=job_id".to_string(),
            notice: Some("Job 3 marked for retry.".to_string()),
            error: None,
            form: AddJobForm::default(),
            status: StatusCode::OK,
        }
    }

    #[test]
    fn test_preserved_query_drops_notice_keys() {
        assert_eq!(
            preserved_query(Some("client=Acme&retried=4&sort=job_id&added=2")),
            "client=Acme&sort=job_id"
        );
        assert_eq!(preserved_query(None), "");
        assert_eq!(preserved_query(Some("retried=1")), "");
    }

    #[test]
    fn test_notice_location_keeps_filters() {
        assert_eq!(notice_location("", "added", 3), "/?added=3");
        assert_eq!(
            notice_location("client=Acme&sort=job_id", "added", 3),
            "/?client=Acme&sort=job_id&added=3"
        );
    }

    #[test]
    fn test_notice_text() {
        let added = Notice { added: Some(2), retried: None };
        assert_eq!(added.text().as_deref(), Some("Job 2 added successfully."));
        assert_eq!(Notice::default().text(), None);
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_html("<b>&"), "&lt;b&gt;&amp;");
        assert_eq!(escape_attr("\"x'"), "&quot;x&#39;");
    }

    #[test]
    fn test_page_renders_row_and_escapes_user_text() {
        let query = JobQuery::default();
        let options = JobOptions {
            clients: vec!["<Acme & Co>".to_string()],
            statuses: vec![JobStatus::Failed],
        };

        let html = render_page(&context(&query), &[record()], &options);

        assert!(html.contains("<td>&lt;Acme &amp; Co&gt;</td>"));
        assert!(html.contains("<td>-k eastus,-t 80%</td>"));
        assert!(html.contains("<td>2024-02-03 04:05:06</td>"));
        assert!(html.contains("action=\"/jobs/3/retry?client=Acme&amp;sort=job_id\""));
        assert!(html.contains("action=\"/jobs?client=Acme&amp;sort=job_id\""));
        assert!(html.contains("Job 3 marked for retry."));
        assert!(!html.contains("<Acme"));
    }

    #[test]
    fn test_empty_table_message() {
        let query = JobQuery::default().with_client("Nobody");
        let html = render_page(&context(&query), &[], &JobOptions::default());
        assert!(html.contains("No jobs available for the selected filter."));
        // The selected client stays selectable even with no rows
        assert!(html.contains("<option value=\"Nobody\" selected>Nobody</option>"));
    }
}
