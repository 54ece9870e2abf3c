use std::sync::Arc;

use crate::contents::RemoteContentsManager;

/// Web 应用全局状态
///
/// 职责：持有启动后只读的内容管理器，通过 Arc 注入到各个 Handler 中。
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<RemoteContentsManager>,
}
