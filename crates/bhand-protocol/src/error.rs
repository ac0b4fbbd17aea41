//! 协议层错误类型定义

use thiserror::Error;

/// 命令解析/校验错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// 未识别的控制模式字节
    ///
    /// 统一命令中的模式字节不在已定义范围内。上层应中止本周期
    /// 剩余手指的处理（fail-fast），已处理手指的状态保持不变。
    #[error("unrecognized command mode: {value} (finger {finger})")]
    UnrecognizedMode { finger: usize, value: i8 },

    /// 命令向量长度与手指数量不符
    ///
    /// 任一类型命令向量的长度 ≠ 4 时，本周期的命令应用整体中止，
    /// 之前的状态保持不变（不允许部分应用）。
    #[error("command vector size mismatch for {stream:?}: expected {expected}, got {actual}")]
    SizeMismatch {
        stream: crate::command::StreamKind,
        expected: usize,
        actual: usize,
    },
}
