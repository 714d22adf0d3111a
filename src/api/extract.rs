//! 请求提取器
//!
//! JSON 体、路径参数、查询串解析失败统一返回 400 + 错误信封，并带上请求的 trace_id。

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::{request::Parts, Extensions},
    Json,
};
use serde::de::DeserializeOwned;

use super::middleware::TraceId;
use crate::error::AppError;

#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[derive(Debug)]
pub struct ApiPath<T>(pub T);

#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

fn rejected(err: AppError, extensions: &Extensions) -> AppError {
    match extensions.get::<TraceId>() {
        Some(trace) => err.with_trace_id(trace.0.clone()),
        None => err,
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let trace = req.extensions().get::<TraceId>().cloned();
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                let err = AppError::from(rejection);
                Err(match trace {
                    Some(trace) => err.with_trace_id(trace.0),
                    None => err,
                })
            }
        }
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(rejected(rejection.into(), &parts.extensions)),
        }
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(rejected(rejection.into(), &parts.extensions)),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}
