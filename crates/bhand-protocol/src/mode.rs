//! 控制模式定义
//!
//! 两层表示：
//!
//! - [`RawMode`]: 中间件消息中的原始模式字节（i8），包含 `Same`（保持不变）
//! - [`ControlMode`]: 设备内部的类型安全模式，`Same` 在解析边界被消解

use num_enum::TryFromPrimitive;

use crate::CommandError;

/// 统一命令中的原始模式字节
///
/// 取值与中间件消息常量一致。`Same` 表示该手指保持上一周期的模式
/// 与设定值不变（no-op）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum RawMode {
    /// 保持上一模式（no-op）
    Same = -1,
    /// 空闲：输出零力矩
    Idle = 0,
    /// 直接力矩
    Torque = 1,
    /// 位置 PID
    Pid = 2,
    /// 速度
    Velocity = 3,
    /// 梯形轨迹
    Trapezoidal = 4,
}

impl RawMode {
    /// 从原始字节解析，失败时报告手指索引
    pub fn parse(finger: usize, value: i8) -> Result<Self, CommandError> {
        Self::try_from(value).map_err(|_| CommandError::UnrecognizedMode { finger, value })
    }
}

/// 设备内部的控制模式
///
/// 每个手指在任意时刻只处于其中一个模式；模式切换只能由命令复用器驱动。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlMode {
    /// 空闲：输出零力矩
    #[default]
    Idle,
    /// 直接力矩
    Torque,
    /// 位置 PID
    Pid,
    /// 速度
    Velocity,
    /// 梯形轨迹
    Trapezoidal,
}

impl ControlMode {
    /// 原始模式到内部模式的映射
    ///
    /// `RawMode::Same` 没有对应的内部模式，返回 `None`。
    pub fn from_raw(raw: RawMode) -> Option<Self> {
        match raw {
            RawMode::Same => None,
            RawMode::Idle => Some(ControlMode::Idle),
            RawMode::Torque => Some(ControlMode::Torque),
            RawMode::Pid => Some(ControlMode::Pid),
            RawMode::Velocity => Some(ControlMode::Velocity),
            RawMode::Trapezoidal => Some(ControlMode::Trapezoidal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_mode_from_i8() {
        assert_eq!(RawMode::try_from(-1i8).unwrap(), RawMode::Same);
        assert_eq!(RawMode::try_from(0i8).unwrap(), RawMode::Idle);
        assert_eq!(RawMode::try_from(1i8).unwrap(), RawMode::Torque);
        assert_eq!(RawMode::try_from(2i8).unwrap(), RawMode::Pid);
        assert_eq!(RawMode::try_from(3i8).unwrap(), RawMode::Velocity);
        assert_eq!(RawMode::try_from(4i8).unwrap(), RawMode::Trapezoidal);
        assert!(RawMode::try_from(5i8).is_err());
    }

    #[test]
    fn test_raw_mode_parse_reports_finger() {
        let err = RawMode::parse(2, 99).unwrap_err();
        assert_eq!(
            err,
            CommandError::UnrecognizedMode {
                finger: 2,
                value: 99
            }
        );
    }

    #[test]
    fn test_control_mode_from_raw() {
        assert_eq!(ControlMode::from_raw(RawMode::Same), None);
        assert_eq!(
            ControlMode::from_raw(RawMode::Idle),
            Some(ControlMode::Idle)
        );
        assert_eq!(
            ControlMode::from_raw(RawMode::Trapezoidal),
            Some(ControlMode::Trapezoidal)
        );
    }

    #[test]
    fn test_control_mode_default_is_idle() {
        assert_eq!(ControlMode::default(), ControlMode::Idle);
    }
}
