//! 设备层错误类型定义

use bhand_protocol::CommandError;
use thiserror::Error;

/// 设备层错误类型
///
/// 任何错误都不会触发设备关停；设备唯一的恢复动作是外部显式调用
/// `idle()`，绝不自动执行。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// 命令解析/校验错误
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}
