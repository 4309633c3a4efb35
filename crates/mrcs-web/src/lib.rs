//! # MRCS Web
//!
//! HTTP服务层：单页预测表单、预测与模型信息API、健康检查。

pub mod form;
pub mod handlers;
pub mod server;

pub use server::{AppState, WebServer};
