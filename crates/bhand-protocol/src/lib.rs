//! bhand-protocol - 欠驱动仿真手的数据模型层
//!
//! 定义手部控制核心使用的命令/状态消息结构、控制模式枚举、
//! 手指与关节的映射关系以及全局增益配置。
//!
//! 本层无状态、无 I/O：
//!
//! - **模式** (`mode`): 类型安全的控制模式，以及来自中间件的原始模式字节解析
//! - **命令** (`command`): 统一命令与四路独立命令向量
//! - **状态** (`status`): 关节状态与手部状态反馈
//! - **配置** (`config`): 全局增益（构造时设定，之后只读）
//! - **映射** (`finger`): 手指索引到 medial/distal 关节 ID 的映射

pub mod command;
pub mod config;
pub mod error;
pub mod finger;
pub mod mode;
pub mod status;

pub use command::{HandCommand, StreamKind};
pub use config::HandConfig;
pub use error::CommandError;
pub use finger::{FingerJoints, finger_joint_ids};
pub use mode::{ControlMode, RawMode};
pub use status::{HandStatus, JointState};

/// 逻辑手指数量（3 个卷曲手指 + 1 个展开自由度）
pub const N_FINGERS: usize = 4;

/// 物理关节数量
pub const N_JOINTS: usize = 8;

/// 展开（spread）自由度对应的手指索引
pub const SPREAD_FINGER: usize = 3;
