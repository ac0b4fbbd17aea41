//! 手部仿真设备本体
//!
//! 周期流程（由宿主调度器驱动，单线程协作式）：
//!
//! 1. [`HandSimDevice::read_sim`]: 从物理引擎读入关节状态，速度做
//!    指数平滑（0.9 旧值 + 0.1 新值）
//! 2. [`HandSimDevice::write_sim`]: 控制律求值 → TorqueSwitch /
//!    spread 约束 → 向物理引擎写入全部 8 个关节力（Idle 写零）
//! 3. [`HandSimDevice::read_device`]: 按 20 ms 节流发布关节状态、
//!    手部状态与质心遥测
//! 4. [`HandSimDevice::write_device`]: 消费命令端口、推进初始化
//!    状态机
//!
//! 时间一律由调用方以 [`Duration`]（仿真时钟）传入，设备内部不取
//! 壁钟，便于确定性测试与仿真时间缩放。

use std::time::Duration;

use nalgebra::Vector3;
use tracing::{debug, error, info};

use bhand_control::{TrapezoidalProfile, finger_torque};
use bhand_protocol::{
    ControlMode, HandCommand, HandConfig, HandStatus, JointState, N_FINGERS, N_JOINTS,
    SPREAD_FINGER, finger_joint_ids,
};

use crate::error::DriverError;
use crate::mux::{CommandMux, CycleInputs};
use crate::physics::HandPhysics;
use crate::ports::{InputPort, OutputPort};
use crate::run_state::{InitState, RunMode};
use crate::torque_switch::TorqueSwitch;

/// 速度指数平滑中旧值的权重
const VELOCITY_SMOOTHING: f64 = 0.9;

/// spread 双关节对称约束的比例增益（无微分项）
const SPREAD_CONSTRAINT_GAIN: f64 = 100.0;

/// "停止运动" 判定的速度阈值 (rad/s)
const DONE_MOVING_VELOCITY: f64 = 0.01;

/// 初始化序列张开/闭合使用的速度设定值 (rad/s)
const INIT_VELOCITY: f64 = 1.0;

/// 遥测发布的最小间隔
const PUBLISH_PERIOD: Duration = Duration::from_millis(20);

/// 质心计算回调：关节角度 → 质心坐标
///
/// 质心的具体计算（连杆质量/几何）由宿主提供，设备只负责在遥测
/// 节拍上调用并发布。
pub type ComProvider = Box<dyn Fn(&[f64; N_JOINTS]) -> Vector3<f64> + Send>;

/// 欠驱动仿真手设备
///
/// 泛型于物理后端 [`HandPhysics`]；所有周期状态都在结构体内，
/// 不含内部并发。
pub struct HandSimDevice<P: HandPhysics> {
    config: HandConfig,
    physics: P,

    // 关节状态缓冲（每周期由 read_sim 写入一次）
    joint_position: [f64; N_JOINTS],
    joint_velocity: [f64; N_JOINTS],
    joint_torque: [f64; N_JOINTS],
    reaction_torque: [f64; N_JOINTS],

    mux: CommandMux,
    torque_switch: [TorqueSwitch; 3],
    profiles: [TrapezoidalProfile; N_FINGERS],
    trap_start: [Duration; N_FINGERS],
    run_mode: RunMode,

    // 命令输入端口（newest value wins）
    torque_in: InputPort<Vec<f64>>,
    position_in: InputPort<Vec<f64>>,
    velocity_in: InputPort<Vec<f64>>,
    trapezoidal_in: InputPort<Vec<f64>>,
    unified_in: InputPort<HandCommand>,

    // 遥测输出端口（非阻塞，可丢弃）
    joint_state_out: OutputPort<JointState>,
    status_out: OutputPort<HandStatus>,
    com_out: OutputPort<Vector3<f64>>,
    com_provider: Option<ComProvider>,
    last_publish: Option<Duration>,
}

/// 构造参数（由 builder 组装）
pub(crate) struct DeviceParts<P: HandPhysics> {
    pub config: HandConfig,
    pub physics: P,
    pub torque_in: InputPort<Vec<f64>>,
    pub position_in: InputPort<Vec<f64>>,
    pub velocity_in: InputPort<Vec<f64>>,
    pub trapezoidal_in: InputPort<Vec<f64>>,
    pub unified_in: InputPort<HandCommand>,
    pub joint_state_out: OutputPort<JointState>,
    pub status_out: OutputPort<HandStatus>,
    pub com_out: OutputPort<Vector3<f64>>,
    pub com_provider: Option<ComProvider>,
}

impl<P: HandPhysics> HandSimDevice<P> {
    pub(crate) fn from_parts(parts: DeviceParts<P>) -> Self {
        let profile =
            TrapezoidalProfile::new(parts.config.trap_max_velocity, parts.config.trap_max_acceleration);

        Self {
            config: parts.config,
            physics: parts.physics,
            joint_position: [0.0; N_JOINTS],
            joint_velocity: [0.0; N_JOINTS],
            joint_torque: [0.0; N_JOINTS],
            reaction_torque: [0.0; N_JOINTS],
            mux: CommandMux::new(),
            torque_switch: [TorqueSwitch::new(); 3],
            profiles: [profile; N_FINGERS],
            trap_start: [Duration::ZERO; N_FINGERS],
            run_mode: RunMode::Idle,
            torque_in: parts.torque_in,
            position_in: parts.position_in,
            velocity_in: parts.velocity_in,
            trapezoidal_in: parts.trapezoidal_in,
            unified_in: parts.unified_in,
            joint_state_out: parts.joint_state_out,
            status_out: parts.status_out,
            com_out: parts.com_out,
            com_provider: parts.com_provider,
            last_publish: None,
        }
    }

    // ---- 生命周期 ----

    /// 启动初始化序列（张开 → 等待停止 → 等待 spread → 闭合 → Run）
    pub fn initialize(&mut self) {
        info!("hand initialization requested");
        self.run_mode = RunMode::Initialize(InitState::InitFingers);
    }

    /// 进入 Idle：不再应用任何命令，所有手指模式置为 Idle
    pub fn idle(&mut self) {
        info!("hand idle requested");
        self.run_mode = RunMode::Idle;
        for finger in 0..N_FINGERS {
            self.mux.set_idle(finger);
        }
    }

    /// 直接进入 Run（跳过初始化序列）
    pub fn run(&mut self) {
        info!("hand run requested");
        self.run_mode = RunMode::Run;
    }

    /// 当前顶层运行模式
    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    // ---- 便捷命令 ----

    /// 张开卷曲手指（速度模式，-1.0 rad/s）
    pub fn open(&mut self) {
        for finger in 0..SPREAD_FINGER {
            self.mux
                .set_mode_and_cmd(finger, ControlMode::Velocity, -INIT_VELOCITY);
        }
    }

    /// 闭合卷曲手指（速度模式，+1.0 rad/s）
    pub fn close(&mut self) {
        for finger in 0..SPREAD_FINGER {
            self.mux
                .set_mode_and_cmd(finger, ControlMode::Velocity, INIT_VELOCITY);
        }
    }

    /// 将单个手指置为 Idle
    pub fn set_idle_mode(&mut self, finger: usize) {
        self.mux.set_idle(finger);
    }

    /// 将手指切入直接力矩模式，沿用力矩流最后一次收到的值
    pub fn set_torque_mode(&mut self, finger: usize) {
        self.mux.set_mode(finger, ControlMode::Torque);
    }

    /// 将手指切入位置 PID 模式，沿用位置流最后一次收到的值
    pub fn set_position_mode(&mut self, finger: usize) {
        self.mux.set_mode(finger, ControlMode::Pid);
    }

    /// 将手指切入速度模式，沿用速度流最后一次收到的值
    pub fn set_velocity_mode(&mut self, finger: usize) {
        self.mux.set_mode(finger, ControlMode::Velocity);
    }

    /// 将手指切入梯形轨迹模式
    ///
    /// 轨迹从当前 medial 角度出发，驶向梯形流最后一次收到的目标。
    pub fn set_trapezoidal_mode(&mut self, finger: usize, now: Duration) {
        self.mux.set_mode(finger, ControlMode::Trapezoidal);
        let target = self.mux.command(finger);
        self.reset_profile(finger, target, now);
    }

    // ---- 周期步骤 ----

    /// 从物理引擎读入关节状态
    ///
    /// 速度做指数平滑；测量力矩超限时告警（不截断、不关停）。
    pub fn read_sim(&mut self) {
        for joint in 0..N_JOINTS {
            self.joint_position[joint] = self.physics.position(joint);
            self.joint_velocity[joint] = VELOCITY_SMOOTHING * self.joint_velocity[joint]
                + (1.0 - VELOCITY_SMOOTHING) * self.physics.velocity(joint);
            self.joint_torque[joint] = self.physics.applied_force(joint);
            self.reaction_torque[joint] = self.physics.reaction_torque(joint);

            if !self
                .config
                .within_torque_limits(joint, self.joint_torque[joint])
            {
                tracing::warn!(
                    joint,
                    torque = self.joint_torque[joint],
                    "measured joint torque exceeds limit"
                );
            }
        }
    }

    /// 控制律求值并向物理引擎写入关节力
    ///
    /// 每周期写满全部 8 个关节；Idle 手指写零。
    pub fn write_sim(&mut self, now: Duration) {
        let mut forces = [0.0; N_JOINTS];

        for finger in 0..N_FINGERS {
            let joints = finger_joint_ids(finger);

            // 卷曲手指建模为单自由度：位置/速度取两关节之和
            let (pos, vel) = if finger == SPREAD_FINGER {
                (
                    self.joint_position[joints.medial],
                    self.joint_velocity[joints.medial],
                )
            } else {
                (
                    self.joint_position[joints.medial] + self.joint_position[joints.distal],
                    self.joint_velocity[joints.medial] + self.joint_velocity[joints.distal],
                )
            };

            let elapsed = now
                .checked_sub(self.trap_start[finger])
                .unwrap_or_default()
                .as_secs_f64();
            let torque = finger_torque(
                self.effective_mode(finger),
                self.mux.command(finger),
                pos,
                vel,
                &self.profiles[finger],
                elapsed,
                &self.config,
            );

            if finger == SPREAD_FINGER {
                // 双近端关节对称约束，共享手指力矩，约束力反号施加
                let constraint = SPREAD_CONSTRAINT_GAIN
                    * (self.joint_position[joints.medial] - self.joint_position[joints.distal]);
                forces[joints.medial] = torque - constraint;
                forces[joints.distal] = torque + constraint;
            } else {
                let joint_forces = self.torque_switch[finger].apply(
                    finger,
                    torque,
                    self.reaction_torque[joints.medial],
                    self.joint_position[joints.medial],
                    self.joint_position[joints.distal],
                    self.config.breakaway_torque,
                );
                forces[joints.medial] = joint_forces.medial;
                forces[joints.distal] = joint_forces.distal;
            }
        }

        for (joint, &force) in forces.iter().enumerate() {
            self.physics.set_force(joint, force);
        }
    }

    /// 发布遥测
    ///
    /// 关节状态与手部状态按 20 ms 节流；质心每周期发布。
    pub fn read_device(&mut self, now: Duration) {
        if let Some(provider) = &self.com_provider {
            self.com_out.send(provider(&self.joint_position));
        }

        let due = match self.last_publish {
            None => true,
            Some(last) => now.checked_sub(last).unwrap_or_default() >= PUBLISH_PERIOD,
        };
        if !due {
            return;
        }
        self.last_publish = Some(now);

        self.joint_state_out.send(JointState {
            position: self.joint_position,
            velocity: self.joint_velocity,
            effort: self.joint_torque,
        });
        self.status_out.send(HandStatus {
            mode: self.effective_modes(),
            ..Default::default()
        });
    }

    /// 消费命令端口并推进初始化状态机
    ///
    /// 命令错误不关停设备：SizeMismatch 下本周期无任何变更，
    /// UnrecognizedMode 下已处理手指的变更保留。
    pub fn write_device(&mut self, now: Duration) -> Result<(), DriverError> {
        match self.run_mode {
            RunMode::Idle | RunMode::Initialize(_) => {
                // 非 Run 模式不应用外部命令；排空端口维持 newest-wins
                self.drain_command_ports();
                if let RunMode::Initialize(state) = self.run_mode {
                    self.advance_init(state);
                }
                Ok(())
            }
            RunMode::Run => {
                let inputs = CycleInputs {
                    torque: self.torque_in.read_newest(),
                    position: self.position_in.read_newest(),
                    velocity: self.velocity_in.read_newest(),
                    trapezoidal: self.trapezoidal_in.read_newest(),
                    unified: self.unified_in.read_newest(),
                };
                let requests = self.mux.apply(inputs).inspect_err(|err| {
                    error!(%err, "command rejected");
                })?;
                for request in requests {
                    self.reset_profile(request.finger, request.target, now);
                }
                Ok(())
            }
        }
    }

    // ---- 查询 ----

    /// 手指的对外可见控制模式（顶层 Idle 时一律读作 Idle）
    pub fn effective_mode(&self, finger: usize) -> ControlMode {
        if self.run_mode.is_idle() {
            ControlMode::Idle
        } else {
            self.mux.mode(finger)
        }
    }

    /// 所有手指的对外可见控制模式
    pub fn effective_modes(&self) -> [ControlMode; N_FINGERS] {
        if self.run_mode.is_idle() {
            [ControlMode::Idle; N_FINGERS]
        } else {
            self.mux.modes()
        }
    }

    /// 手指的梯形轨迹生成器（只读）
    pub fn profile(&self, finger: usize) -> &TrapezoidalProfile {
        &self.profiles[finger]
    }

    /// 关节角度缓冲
    pub fn joint_positions(&self) -> &[f64; N_JOINTS] {
        &self.joint_position
    }

    /// 关节角速度缓冲（平滑后）
    pub fn joint_velocities(&self) -> &[f64; N_JOINTS] {
        &self.joint_velocity
    }

    /// 手指是否已停止运动（两关节平滑速度均低于阈值）
    ///
    /// 纯速度阈值判定，带符号比较，不含超时保护。
    pub fn done_moving(&self, finger: usize) -> bool {
        let joints = finger_joint_ids(finger);
        self.joint_velocity[joints.medial] < DONE_MOVING_VELOCITY
            && self.joint_velocity[joints.distal] < DONE_MOVING_VELOCITY
    }

    /// 物理后端（测试/宿主回读用）
    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// 物理后端的可变引用
    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    // ---- 内部 ----

    fn drain_command_ports(&mut self) {
        self.torque_in.read_newest();
        self.position_in.read_newest();
        self.velocity_in.read_newest();
        self.trapezoidal_in.read_newest();
        self.unified_in.read_newest();
    }

    /// 从当前 medial 角度重建梯形轨迹并重置起始时刻
    fn reset_profile(&mut self, finger: usize, target: f64, now: Duration) {
        let joints = finger_joint_ids(finger);
        self.profiles[finger].set_profile(self.joint_position[joints.medial], target);
        self.trap_start[finger] = now;
    }

    fn advance_init(&mut self, state: InitState) {
        match state {
            InitState::InitFingers => {
                debug!("init: opening fingers");
                self.open();
                self.run_mode = RunMode::Initialize(InitState::SeekFingers);
            }
            InitState::SeekFingers => {
                if (0..SPREAD_FINGER).all(|finger| self.done_moving(finger)) {
                    debug!("init: fingers stopped, seeking spread");
                    self.run_mode = RunMode::Initialize(InitState::SeekSpread);
                }
            }
            InitState::SeekSpread => {
                if self.done_moving(SPREAD_FINGER) {
                    // spread 停止后在同一周期完成闭合并交出控制权
                    self.run_mode = RunMode::Initialize(InitState::InitClose);
                    self.advance_init(InitState::InitClose);
                }
            }
            InitState::InitClose => {
                debug!("init: closing fingers, entering run mode");
                self.close();
                self.run_mode = RunMode::Run;
                info!("hand initialization complete");
            }
        }
    }
}
