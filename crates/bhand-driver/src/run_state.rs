//! 顶层运行模式与初始化子状态
//!
//! 嵌套枚举令非法组合不可表示：初始化子状态只存在于
//! `RunMode::Initialize` 内部，顶层 Idle/Run 下无子状态可言。

/// 初始化序列的子状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    /// 发出张开命令（手指 0..=2 速度 -1.0）
    InitFingers,
    /// 等待手指 0..=2 停止运动
    SeekFingers,
    /// 等待 spread 停止运动
    SeekSpread,
    /// 发出闭合命令（手指 0..=2 速度 +1.0）并进入 Run
    InitClose,
}

/// 顶层运行模式
///
/// 生命周期：构造时为 Idle；`initialize()` / `idle()` / `run()`
/// 显式触发转移，初始化序列完成后自动进入 Run。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// 不应用任何命令；所有手指模式读作 Idle
    #[default]
    Idle,
    /// 初始化序列进行中
    Initialize(InitState),
    /// 正常命令处理
    Run,
}

impl RunMode {
    pub fn is_run(self) -> bool {
        self == RunMode::Run
    }

    pub fn is_idle(self) -> bool {
        self == RunMode::Idle
    }

    pub fn is_initializing(self) -> bool {
        matches!(self, RunMode::Initialize(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(RunMode::default(), RunMode::Idle);
        assert!(RunMode::default().is_idle());
    }

    #[test]
    fn test_predicates() {
        assert!(RunMode::Run.is_run());
        assert!(RunMode::Initialize(InitState::SeekFingers).is_initializing());
        assert!(!RunMode::Initialize(InitState::SeekFingers).is_run());
    }
}
