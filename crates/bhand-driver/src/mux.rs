//! 命令复用器
//!
//! 把五路输入归约为每手指一个 (模式, 设定值) 对：
//!
//! 1. 按类型流先行：四路命令向量无条件落入对应的设定值向量，
//!    与手指当前模式无关（"last-received setpoint for that type"）
//! 2. 统一命令其后：逐手指解析原始模式字节，`Same` 跳过，其余
//!    切换模式并把随行数值写入该模式的向量——同周期冲突时
//!    统一命令是最后一次写入，胜出
//!
//! 手指的生效设定值始终是其**当前模式**对应向量中的条目。
//!
//! 长度校验对所有到场的按类型流先行完成，任何一路不合法则本周期
//! 不发生任何变更；统一命令中出现无法解析的模式字节则立即中止，
//! 已处理手指的变更保留。
//!
//! 切入梯形模式（或梯形模式下收到新目标）时返回 [`TrapRequest`]，
//! 由设备层据此重建轨迹。

use bhand_protocol::{CommandError, ControlMode, HandCommand, N_FINGERS, RawMode, StreamKind};

/// 梯形轨迹重建请求
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrapRequest {
    /// 手指索引
    pub finger: usize,
    /// 轨迹终点 (rad)
    pub target: f64,
}

/// 一个控制周期内到场的命令更新
///
/// 每路 `None` 表示该流本周期无新数据，对应设定值保持不变。
#[derive(Debug, Clone, Default)]
pub struct CycleInputs {
    /// 直接力矩向量
    pub torque: Option<Vec<f64>>,
    /// 位置 PID 目标向量
    pub position: Option<Vec<f64>>,
    /// 速度目标向量
    pub velocity: Option<Vec<f64>>,
    /// 梯形轨迹目标向量
    pub trapezoidal: Option<Vec<f64>>,
    /// 统一命令
    pub unified: Option<HandCommand>,
}

/// 五路命令流的复用归约器
///
/// 持有每手指当前模式与各类型的最近设定值。设定值跨周期保持，
/// 模式切换时沿用该类型最后一次收到的值。
#[derive(Debug, Clone, Default)]
pub struct CommandMux {
    mode: [ControlMode; N_FINGERS],
    torque_cmd: [f64; N_FINGERS],
    position_cmd: [f64; N_FINGERS],
    velocity_cmd: [f64; N_FINGERS],
    trap_cmd: [f64; N_FINGERS],
}

fn check_len(stream: StreamKind, values: &Option<Vec<f64>>) -> Result<(), CommandError> {
    match values {
        Some(v) if v.len() != N_FINGERS => Err(CommandError::SizeMismatch {
            stream,
            expected: N_FINGERS,
            actual: v.len(),
        }),
        _ => Ok(()),
    }
}

impl CommandMux {
    pub fn new() -> Self {
        Self::default()
    }

    /// 手指当前控制模式
    pub fn mode(&self, finger: usize) -> ControlMode {
        self.mode[finger]
    }

    /// 所有手指的控制模式
    pub fn modes(&self) -> [ControlMode; N_FINGERS] {
        self.mode
    }

    /// 手指当前模式下的设定值
    pub fn command(&self, finger: usize) -> f64 {
        match self.mode[finger] {
            ControlMode::Idle | ControlMode::Torque => self.torque_cmd[finger],
            ControlMode::Pid => self.position_cmd[finger],
            ControlMode::Velocity => self.velocity_cmd[finger],
            ControlMode::Trapezoidal => self.trap_cmd[finger],
        }
    }

    /// 将手指置为 Idle（力矩设定清零）
    pub fn set_idle(&mut self, finger: usize) {
        self.mode[finger] = ControlMode::Idle;
        self.torque_cmd[finger] = 0.0;
    }

    /// 仅切换手指模式，设定值沿用该类型最后一次存入的值
    pub fn set_mode(&mut self, finger: usize, mode: ControlMode) {
        if mode == ControlMode::Idle {
            self.set_idle(finger);
        } else {
            self.mode[finger] = mode;
        }
    }

    /// 内部通道：切换手指模式并写入对应设定值
    ///
    /// 供统一命令处理与 open/close 等便捷操作使用，绕过消息边界
    /// 的解析。梯形模式的轨迹重建由调用方负责。
    pub fn set_mode_and_cmd(&mut self, finger: usize, mode: ControlMode, cmd: f64) {
        self.mode[finger] = mode;
        match mode {
            ControlMode::Idle => self.torque_cmd[finger] = 0.0,
            ControlMode::Torque => self.torque_cmd[finger] = cmd,
            ControlMode::Pid => self.position_cmd[finger] = cmd,
            ControlMode::Velocity => self.velocity_cmd[finger] = cmd,
            ControlMode::Trapezoidal => self.trap_cmd[finger] = cmd,
        }
    }

    /// 消费一个周期的命令更新
    ///
    /// 返回需要重建梯形轨迹的手指列表。长度不合法返回
    /// [`CommandError::SizeMismatch`] 且不做任何变更；模式字节不可
    /// 解析返回 [`CommandError::UnrecognizedMode`]，此前已处理手指
    /// 的变更保留。
    pub fn apply(&mut self, inputs: CycleInputs) -> Result<Vec<TrapRequest>, CommandError> {
        check_len(StreamKind::Torque, &inputs.torque)?;
        check_len(StreamKind::Position, &inputs.position)?;
        check_len(StreamKind::Velocity, &inputs.velocity)?;
        check_len(StreamKind::Trapezoidal, &inputs.trapezoidal)?;

        // 按类型流无条件落入设定值向量
        if let Some(v) = &inputs.torque {
            self.torque_cmd.copy_from_slice(v);
        }
        if let Some(v) = &inputs.position {
            self.position_cmd.copy_from_slice(v);
        }
        if let Some(v) = &inputs.velocity {
            self.velocity_cmd.copy_from_slice(v);
        }
        if let Some(v) = &inputs.trapezoidal {
            self.trap_cmd.copy_from_slice(v);
        }

        // 统一命令最后写入：同周期冲突时胜出
        let mut reinit = [false; N_FINGERS];
        if let Some(unified) = &inputs.unified {
            for finger in 0..N_FINGERS {
                let raw = RawMode::parse(finger, unified.mode[finger])?;
                let Some(mode) = ControlMode::from_raw(raw) else {
                    continue;
                };
                self.set_mode_and_cmd(finger, mode, unified.cmd[finger]);
                if mode == ControlMode::Trapezoidal {
                    reinit[finger] = true;
                }
            }
        }

        // 梯形流带来新目标的手指（处于梯形模式者）也需要重建轨迹
        if inputs.trapezoidal.is_some() {
            for finger in 0..N_FINGERS {
                if self.mode[finger] == ControlMode::Trapezoidal {
                    reinit[finger] = true;
                }
            }
        }

        Ok((0..N_FINGERS)
            .filter(|&finger| reinit[finger])
            .map(|finger| TrapRequest {
                finger,
                target: self.trap_cmd[finger],
            })
            .collect())
    }
}
