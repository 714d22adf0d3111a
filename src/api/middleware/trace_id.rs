//! Trace ID 中间件
//! 为每个请求生成唯一的 trace_id，用于全链路追踪

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// 请求扩展中的 trace_id
#[derive(Debug, Clone)]
pub struct TraceId(pub String);

/// Trace ID 生成器
pub struct TraceIdGenerator;

impl TraceIdGenerator {
    pub fn generate() -> String {
        Uuid::new_v4().to_string()
    }

    /// 优先使用调用方传入的 trace_id，否则生成新的
    pub fn get_or_generate(req: &Request) -> String {
        req.headers()
            .get(TRACE_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|s| !s.is_empty() && s.len() <= 128)
            .map(str::to_string)
            .unwrap_or_else(Self::generate)
    }
}

/// 写入请求扩展和响应头，并输出一条访问日志
pub async fn trace_id_middleware(mut req: Request, next: Next) -> Response {
    let trace_id = TraceIdGenerator::get_or_generate(&req);
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = std::time::Instant::now();

    req.extensions_mut().insert(TraceId(trace_id.clone()));

    let mut response = next.run(req).await;

    tracing::info!(
        trace_id = %trace_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "http_request"
    );

    if let Ok(header_value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, header_value);
    }

    response
}
