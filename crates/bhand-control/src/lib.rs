//! bhand-control - 纯控制数学层
//!
//! 包含两部分无状态副作用的控制计算：
//!
//! - **梯形轨迹** (`trapezoid`): 速度/加速度受限的点到点轨迹生成器
//! - **控制律** (`law`): (模式, 设定值, 当前状态) → 手指级力矩 的纯函数

pub mod law;
pub mod trapezoid;

pub use law::finger_torque;
pub use trapezoid::TrapezoidalProfile;
