//! 状态反馈消息定义

use crate::{ControlMode, N_FINGERS, N_JOINTS};

/// 关节状态快照（每周期由关节状态缓冲填充）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointState {
    /// 关节角度（rad）
    pub position: [f64; N_JOINTS],
    /// 关节角速度（rad/s，指数平滑后）
    pub velocity: [f64; N_JOINTS],
    /// 关节测量力矩（N·m）
    pub effort: [f64; N_JOINTS],
}

impl Default for JointState {
    fn default() -> Self {
        Self {
            position: [0.0; N_JOINTS],
            velocity: [0.0; N_JOINTS],
            effort: [0.0; N_JOINTS],
        }
    }
}

/// 手部状态反馈
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandStatus {
    /// 每手指当前控制模式
    pub mode: [ControlMode; N_FINGERS],
    /// 每手指温度（°C）；仿真中为常量 25.0
    pub temperature: [f64; N_FINGERS],
}

impl Default for HandStatus {
    fn default() -> Self {
        Self {
            mode: [ControlMode::Idle; N_FINGERS],
            temperature: [25.0; N_FINGERS],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_state_default() {
        let state = JointState::default();
        assert_eq!(state.position, [0.0; 8]);
        assert_eq!(state.velocity, [0.0; 8]);
    }

    #[test]
    fn test_hand_status_default() {
        let status = HandStatus::default();
        assert_eq!(status.mode, [ControlMode::Idle; 4]);
        assert_eq!(status.temperature, [25.0; 4]);
    }
}
