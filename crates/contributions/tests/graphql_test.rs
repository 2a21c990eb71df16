use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use startpage_contributions::ContributionsClient;

async fn start_mock(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn calendar_handler(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("bearer ghp_test");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"})));
    }

    if body["variables"]["login"] != "octocat" {
        return (
            StatusCode::OK,
            Json(json!({
                "data": {"user": null},
                "errors": [{"message": "Could not resolve to a User with the login of 'ghost'."}]
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "data": {"user": {"contributionsCollection": {"contributionCalendar": {
                "totalContributions": 12,
                "weeks": [
                    {"contributionDays": [
                        {"contributionCount": 4, "date": "2026-10-12"},
                        {"contributionCount": 8, "date": "2026-10-13"}
                    ]}
                ]
            }}}}
        })),
    )
}

fn router() -> Router {
    Router::new().route("/graphql", post(calendar_handler))
}

#[tokio::test]
async fn test_fetch_calendar() {
    let base = start_mock(router()).await;
    let client = ContributionsClient::with_base_url("octocat", base);

    let calendar = client.fetch_calendar("ghp_test").await.unwrap();
    assert_eq!(calendar.total_contributions, 12);
    assert_eq!(calendar.weeks[0].contribution_days.len(), 2);
}

#[tokio::test]
async fn test_graphql_error_is_surfaced() {
    let base = start_mock(router()).await;
    let client = ContributionsClient::with_base_url("ghost", base);

    let err = client.fetch_calendar("ghp_test").await.unwrap_err();
    assert!(err.to_string().contains("Could not resolve to a User"));
}

#[tokio::test]
async fn test_http_error_is_surfaced() {
    let base = start_mock(router()).await;
    let client = ContributionsClient::with_base_url("octocat", base);

    let err = client.fetch_calendar("wrong").await.unwrap_err();
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_today_count_uses_utc_date() {
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let router = Router::new().route(
        "/graphql",
        post(move || {
            let today = today.clone();
            async move {
                Json(json!({
                    "data": {"user": {"contributionsCollection": {"contributionCalendar": {
                        "totalContributions": 9,
                        "weeks": [{"contributionDays": [{"contributionCount": 9, "date": today}]}]
                    }}}}
                }))
            }
        }),
    );
    let base = start_mock(router).await;
    let client = ContributionsClient::with_base_url("octocat", base);

    let summary = client.recent_contributions("ghp_test", 6).await.unwrap();
    assert_eq!(summary.today_count, 9);
    assert_eq!(summary.weeks.len(), 1);
}
