//! bhand-driver - 欠驱动仿真手的设备层
//!
//! 固定周期、单线程协作式执行的控制核心。宿主调度器每个控制周期
//! 依次调用四个步骤：
//!
//! ```text
//! read_sim   → 从物理引擎读取关节状态（速度指数平滑）
//! write_sim  → 控制律求值 + TorqueSwitch 仿真 → 向物理引擎写关节力
//! read_device  → 发布关节状态/手部状态/质心遥测
//! write_device → 命令复用 + 初始化状态机推进
//! ```
//!
//! 周期内所有状态同步推进，无内部并发；命令按 "newest value wins"
//! 非阻塞轮询消费。
//!
//! # 模块
//!
//! - `device`: [`HandSimDevice`] 本体与周期方法
//! - `mux`: 五路命令流的复用归约器
//! - `torque_switch`: 机械脱开（breakaway）状态机
//! - `run_state`: 顶层运行模式与初始化子状态
//! - `physics`: 物理引擎接口与内存 mock
//! - `ports`: 非阻塞命令/遥测端口

pub mod builder;
pub mod device;
pub mod error;
pub mod mux;
pub mod physics;
pub mod ports;
pub mod run_state;
pub mod torque_switch;

pub use builder::{HandEndpoints, HandSimDeviceBuilder};
pub use device::{ComProvider, HandSimDevice};
pub use error::DriverError;
pub use mux::{CommandMux, CycleInputs, TrapRequest};
pub use physics::{HandPhysics, MockPhysics};
pub use ports::{InputPort, OutputPort};
pub use run_state::{InitState, RunMode};
pub use torque_switch::{JointForces, TorqueSwitch};
