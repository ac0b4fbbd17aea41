//! 物理引擎接口
//!
//! 控制核心与物理仿真之间的缝隙。每个控制周期：
//!
//! - 读侧：关节角度、角速度、关节自身轴上的已施加力矩，以及
//!   用于脱开检测的反作用力矩投影
//! - 写侧：每关节一个力/力矩命令，无论模式每周期都会写入
//!   （Idle 写零）
//!
//! 关节动力学本身不在本 crate 范围内，由实现方提供。

use bhand_protocol::N_JOINTS;

/// 物理/关节协作方接口
pub trait HandPhysics {
    /// 关节角度（rad）
    fn position(&self, joint: usize) -> f64;

    /// 关节角速度（rad/s，未平滑的原始值）
    fn velocity(&self, joint: usize) -> f64;

    /// 上一周期施加在关节自身轴上的力矩（N·m）
    fn applied_force(&self, joint: usize) -> f64;

    /// 关节的反作用力矩投影（N·m）
    ///
    /// 对 medial 关节即 link torque，对 distal 关节即 fingertip torque，
    /// 用于 TorqueSwitch 的脱开检测。
    fn reaction_torque(&self, joint: usize) -> f64;

    /// 向关节写入本周期的力/力矩命令（N·m）
    fn set_force(&mut self, joint: usize, force: f64);
}

/// 确定性的内存物理后端
///
/// 不做任何动力学积分：各读数由测试/宿主显式设置，写入的力命令
/// 被记录下来供断言。本 crate 本身就是仿真器，mock 同时服务于
/// 单元测试与下游消费者的干跑。
#[derive(Debug, Clone, Default)]
pub struct MockPhysics {
    position: [f64; N_JOINTS],
    velocity: [f64; N_JOINTS],
    applied: [f64; N_JOINTS],
    reaction: [f64; N_JOINTS],
    commanded: [f64; N_JOINTS],
}

impl MockPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置关节角度
    pub fn set_position(&mut self, joint: usize, position: f64) {
        self.position[joint] = position;
    }

    /// 设置关节角速度
    pub fn set_velocity(&mut self, joint: usize, velocity: f64) {
        self.velocity[joint] = velocity;
    }

    /// 设置所有关节角速度
    pub fn set_all_velocities(&mut self, velocity: f64) {
        self.velocity = [velocity; N_JOINTS];
    }

    /// 设置关节已施加力矩读数
    pub fn set_applied_force(&mut self, joint: usize, torque: f64) {
        self.applied[joint] = torque;
    }

    /// 设置关节反作用力矩读数
    pub fn set_reaction_torque(&mut self, joint: usize, torque: f64) {
        self.reaction[joint] = torque;
    }

    /// 上一周期写入该关节的力命令
    pub fn commanded_force(&self, joint: usize) -> f64 {
        self.commanded[joint]
    }
}

impl HandPhysics for MockPhysics {
    fn position(&self, joint: usize) -> f64 {
        self.position[joint]
    }

    fn velocity(&self, joint: usize) -> f64 {
        self.velocity[joint]
    }

    fn applied_force(&self, joint: usize) -> f64 {
        self.applied[joint]
    }

    fn reaction_torque(&self, joint: usize) -> f64 {
        self.reaction[joint]
    }

    fn set_force(&mut self, joint: usize, force: f64) {
        self.commanded[joint] = force;
    }
}
