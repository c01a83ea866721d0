//! Read-only admin views and the access check in front of them.
//!
//! Access is whatever the operator configured in [`AdminAccess`]; with no
//! explicit choice the views stay closed.

use crate::app::server::AppState;
use crate::config::AdminAccess;
use crate::core::{DrawResults, Storage};
use crate::utils::error::{DrawError, ErrorBody};
use axum::extract::{Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::fmt::Write;

pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    pub token: Option<String>,
}

fn deny(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Query string is only read in token mode, so a malformed query never
/// blocks the other modes.
pub async fn require_admin<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    match state.admin_access.as_ref() {
        AdminAccess::TrustedNetwork => next.run(request).await,
        AdminAccess::Disabled => {
            tracing::debug!("Admin view requested but admin access is disabled");
            deny(StatusCode::FORBIDDEN, "管理页面未启用")
        }
        AdminAccess::Token(expected) => {
            let query_token = Query::<AdminQuery>::try_from_uri(request.uri())
                .ok()
                .and_then(|Query(query)| query.token);
            let provided = headers
                .get(ADMIN_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok())
                .or(query_token.as_deref());

            match provided {
                Some(token) if constant_time_eq(token.as_bytes(), expected.as_bytes()) => {
                    next.run(request).await
                }
                Some(_) => {
                    tracing::warn!("Invalid admin token provided");
                    deny(StatusCode::UNAUTHORIZED, "管理口令错误")
                }
                None => deny(StatusCode::UNAUTHORIZED, "需要管理口令"),
            }
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub async fn admin_page<S: Storage + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Html<String>, DrawError> {
    let results = state.service.results().await?;
    Ok(Html(render_results_page(&results)))
}

pub async fn admin_raw<S: Storage + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<DrawResults>, DrawError> {
    Ok(Json(state.service.results().await?))
}

pub fn render_results_page(results: &DrawResults) -> String {
    let mut rows = String::new();
    for (name, task) in results.iter() {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_html(name),
            escape_html(task)
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="zh">
<head><meta charset="utf-8"><title>任务分配结果</title></head>
<body>
<h2>✅ 任务分配结果</h2>
<p>已抽取：{count}</p>
<table border="1" cellpadding="10" style="border-collapse: collapse;">
  <tr><th>姓名</th><th>任务</th></tr>
  {rows}
</table>
<br>
<a href="/">← 返回抽签</a> |
<a href="/admin/raw">查看原始 JSON</a>
</body>
</html>
"#,
        count = results.len(),
        rows = rows
    )
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
