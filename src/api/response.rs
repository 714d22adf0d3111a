//! 统一 API 响应格式
//!
//! 所有 API 接口使用统一的响应格式：{ code, message, data }
//! 错误响应格式见 `AppError`：{ code: "error_code", message, trace_id? }

use axum::Json;
use serde::Serialize;

use crate::error::AppError;

/// 统一成功响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            message: "success".to_string(),
            data,
        }
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// 辅助函数：将数据包装为统一响应格式
pub fn success_response<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}
