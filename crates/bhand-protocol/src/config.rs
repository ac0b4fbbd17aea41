//! 全局增益配置
//!
//! 进程级配置：构造/配置阶段可变，控制评估期间只读。
//! 默认值即真实设备仿真使用的标定值。

use crate::N_JOINTS;

/// 手部控制核心配置
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandConfig {
    /// 位置环比例增益 (Nm/rad)
    pub p_gain: f64,
    /// 位置环微分增益 (Nm/(rad/s))
    pub d_gain: f64,
    /// 速度环增益
    pub velocity_gain: f64,

    /// TorqueSwitch 脱开力矩阈值 (N·m)
    pub breakaway_torque: f64,
    /// 停止力矩 (N·m)
    pub stop_torque: f64,
    /// 每关节力矩上限 (N·m)
    pub joint_torque_max: [f64; N_JOINTS],

    /// 梯形轨迹最大速度 (rad/s)
    pub trap_max_velocity: f64,
    /// 梯形轨迹最大加速度 (rad/s²)
    pub trap_max_acceleration: f64,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            p_gain: 25.0,
            d_gain: 1.0,
            velocity_gain: 0.1,
            breakaway_torque: 2.5,
            stop_torque: 3.0,
            joint_torque_max: [1.5; N_JOINTS],
            trap_max_velocity: 1.0,
            trap_max_acceleration: 0.1,
        }
    }
}

impl HandConfig {
    /// 设置位置环增益
    pub fn with_gains(mut self, p_gain: f64, d_gain: f64) -> Self {
        self.p_gain = p_gain;
        self.d_gain = d_gain;
        self
    }

    /// 设置速度环增益
    pub fn with_velocity_gain(mut self, velocity_gain: f64) -> Self {
        self.velocity_gain = velocity_gain;
        self
    }

    /// 设置脱开力矩阈值
    pub fn with_breakaway_torque(mut self, breakaway_torque: f64) -> Self {
        self.breakaway_torque = breakaway_torque;
        self
    }

    /// 设置停止力矩
    pub fn with_stop_torque(mut self, stop_torque: f64) -> Self {
        self.stop_torque = stop_torque;
        self
    }

    /// 设置每关节力矩上限
    pub fn with_joint_torque_max(mut self, joint_torque_max: [f64; N_JOINTS]) -> Self {
        self.joint_torque_max = joint_torque_max;
        self
    }

    /// 判断测量力矩是否在该关节的限幅内
    pub fn within_torque_limits(&self, joint_id: usize, torque: f64) -> bool {
        torque.abs() <= self.joint_torque_max[joint_id]
    }
}
