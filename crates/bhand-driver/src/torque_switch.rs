//! TorqueSwitch Simulator - 机械脱开状态机
//!
//! 复现真实欠驱动手 TorqueSwitch 机构的行为：内侧链节受阻前，
//! 外侧链节位置按固定关节比与其线性耦合；当内侧链节遇到超过
//! "breakaway" 阈值的力矩时，TorqueSwitch 脱开，外侧链节开始
//! 独立向内运动。
//!
//! 该阈值模型是对真实机械行为的刻意简化；下游依赖其确切的
//! 脱开时机，重新实现必须保持此策略不变。
//!
//! 每手指一台状态机（仅卷曲手指 0..=2；spread 不经过此机构）：
//!
//! - **Coupled → Breakaway**: link torque 超过脱开阈值
//! - **Breakaway → Coupled**: 手指力矩为负（张开）且 medial 角度
//!   大于 0.01 rad（未完全闭合）

use tracing::debug;

/// 两指关节间的传动比（distal 保持在 medial 角度的 1/3）
pub const FINGER_JOINT_RATIO: f64 = 1.0 / 3.0;

/// 耦合两指关节的刚性比例增益
pub const KNUCKLE_GAIN: f64 = 10.0;

/// 解除脱开所需的最小 medial 角度 (rad)
const RELEASE_ANGLE: f64 = 0.01;

/// 一个手指两关节的输出力
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointForces {
    /// medial 关节力矩 (N·m)
    pub medial: f64,
    /// distal 关节力矩 (N·m)
    pub distal: f64,
}

/// 每手指 TorqueSwitch 状态
///
/// 脱开角度快照只在 Breakaway 变体中存在，不会以松散字段的形式
/// 游离于状态之外。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TorqueSwitch {
    /// 耦合（初始状态）：distal 刚性跟随 medial
    Coupled,
    /// 脱开：distal 独立闭合，角度被持续锁存
    Breakaway {
        /// 脱开期间最后锁存的 distal 角度 (rad)
        latched_angle: f64,
    },
}

impl Default for TorqueSwitch {
    fn default() -> Self {
        TorqueSwitch::Coupled
    }
}

impl TorqueSwitch {
    pub fn new() -> Self {
        TorqueSwitch::Coupled
    }

    /// 是否处于脱开状态
    pub fn is_engaged(&self) -> bool {
        matches!(self, TorqueSwitch::Breakaway { .. })
    }

    /// 推进状态机一个周期并计算两关节的输出力
    ///
    /// # 参数
    ///
    /// - `finger`: 手指索引（仅用于日志）
    /// - `finger_torque`: 控制律输出的手指级力矩
    /// - `link_torque`: medial 关节的反作用力矩（脱开检测输入）
    /// - `medial_pos` / `distal_pos`: 两关节当前角度
    /// - `breakaway_torque`: 脱开力矩阈值
    pub fn apply(
        &mut self,
        finger: usize,
        finger_torque: f64,
        link_torque: f64,
        medial_pos: f64,
        distal_pos: f64,
        breakaway_torque: f64,
    ) -> JointForces {
        // 状态转移
        match self {
            TorqueSwitch::Coupled => {
                if link_torque > breakaway_torque {
                    debug!(finger = finger + 1, "enabling torque switch");
                    // 锁存角以当前 distal 角度起步，首个闭合周期会立即刷新
                    *self = TorqueSwitch::Breakaway {
                        latched_angle: distal_pos,
                    };
                }
            }
            TorqueSwitch::Breakaway { .. } => {
                if finger_torque < 0.0 && medial_pos > RELEASE_ANGLE {
                    debug!(finger = finger + 1, "disabling torque switch");
                    *self = TorqueSwitch::Coupled;
                }
            }
        }

        // 输出
        match self {
            TorqueSwitch::Coupled => JointForces {
                medial: finger_torque,
                distal: KNUCKLE_GAIN * (FINGER_JOINT_RATIO * medial_pos - distal_pos),
            },
            TorqueSwitch::Breakaway { latched_angle } => {
                if finger_torque > 0.0 {
                    // 闭合：medial 钳制在脱开力矩，distal 独立收紧
                    *latched_angle = distal_pos;
                    JointForces {
                        medial: breakaway_torque,
                        distal: FINGER_JOINT_RATIO * finger_torque,
                    }
                } else {
                    // 张开：medial 不钳制以允许回退，distal 保持锁存角
                    JointForces {
                        medial: finger_torque,
                        distal: KNUCKLE_GAIN * (*latched_angle - distal_pos),
                    }
                }
            }
        }
    }
}
