//! 命令消息定义
//!
//! 控制核心每周期最多消费五路命令更新：
//!
//! - 四路独立的按类型命令向量（力矩/位置/速度/梯形），每路携带
//!   每个手指一个标量，"newest value wins"
//! - 一路统一命令 [`HandCommand`]，携带每手指 (模式, 数值) 对，
//!   模式可为 no-op（保持不变）

use crate::N_FINGERS;

/// 按类型命令流的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StreamKind {
    /// 直接力矩流
    Torque,
    /// 位置 PID 流
    Position,
    /// 速度流
    Velocity,
    /// 梯形轨迹目标流
    Trapezoidal,
}

/// 统一手部命令
///
/// 模式字节保持原始形式（i8），在命令复用器边界解析；
/// 解析失败即 UnrecognizedMode，中止剩余手指的处理。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandCommand {
    /// 每手指原始模式字节
    pub mode: [i8; N_FINGERS],
    /// 每手指命令标量（含义取决于模式）
    pub cmd: [f64; N_FINGERS],
}

impl Default for HandCommand {
    /// 默认命令：所有手指保持不变（no-op）
    fn default() -> Self {
        Self {
            mode: [crate::RawMode::Same as i8; N_FINGERS],
            cmd: [0.0; N_FINGERS],
        }
    }
}

impl HandCommand {
    /// 构造一条对单个手指生效的命令，其余手指保持不变
    pub fn for_finger(finger: usize, mode: crate::RawMode, cmd: f64) -> Self {
        assert!(finger < N_FINGERS, "finger index out of range: {finger}");
        let mut command = Self::default();
        command.mode[finger] = mode as i8;
        command.cmd[finger] = cmd;
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawMode;

    #[test]
    fn test_default_is_all_same() {
        let cmd = HandCommand::default();
        assert_eq!(cmd.mode, [-1; 4]);
        assert_eq!(cmd.cmd, [0.0; 4]);
    }

    #[test]
    fn test_for_finger() {
        let cmd = HandCommand::for_finger(1, RawMode::Velocity, -1.0);
        assert_eq!(cmd.mode, [-1, 3, -1, -1]);
        assert_eq!(cmd.cmd[1], -1.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_hand_command_serde_roundtrip() {
        let cmd = HandCommand::for_finger(0, RawMode::Pid, 1.5);
        let json = serde_json::to_string(&cmd).unwrap();
        let back: HandCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
