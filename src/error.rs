use std::io;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{aggregator::AggregationError, api::ApiResponse};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 缺少必要配置或配置无法解析，启动时致命
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error(transparent)]
    Render(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl IntoResponse for Error {
    /// 所有错误统一返回 500 和 `{success: false, error}`，不区分 4xx
    fn into_response(self) -> Response {
        match &self {
            Error::Aggregation(e) => tracing::error!(%e, "aggregation error"),
            Error::InvalidParam(e) => tracing::warn!(%e, "invalid request parameter"),
            e => tracing::error!(%e, "request failed"),
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::failure(self.to_string())),
        )
            .into_response()
    }
}
