use std::sync::Arc;

use crate::Catalog;

/// 应用状态
pub struct AppState {
    /// 动物图鉴
    pub catalog: Catalog,
    /// 图片匹配的置信度阈值
    pub threshold: f64,
    /// 请求体大小上限，单位为字节
    pub body_limit: usize,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(catalog: Catalog, threshold: f64, body_limit: usize) -> Arc<Self> {
        Arc::new(AppState { catalog, threshold, body_limit })
    }
}
