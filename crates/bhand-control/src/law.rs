//! Control Law - 每手指控制律求值
//!
//! (模式, 设定值, 合成位置, 合成速度) → 手指级标量力矩 的纯函数。
//!
//! 对卷曲手指（0..=2），`pos`/`vel` 是 medial 与 distal 关节读数之和，
//! 把耦合手指建模为单自由度；对 spread（手指 3）只取 medial 读数。
//!
//! # 控制律
//!
//! | 模式        | 输出力矩                                            |
//! |-------------|-----------------------------------------------------|
//! | Idle        | 0                                                   |
//! | Trapezoidal | p·(profile.pos(t) - pos) + d·(profile.vel(t) - vel) |
//! | Pid         | p·(cmd - pos) - d·vel                               |
//! | Velocity    | v_gain·(cmd - vel)                                  |
//! | Torque      | cmd                                                 |
//!
//! 模式在命令复用器边界已解析为类型安全枚举，此处不存在未识别模式。

use bhand_protocol::{ControlMode, HandConfig};

use crate::TrapezoidalProfile;

/// 计算单个手指的控制力矩
///
/// # 参数
///
/// - `mode`: 当前控制模式
/// - `cmd`: 当前设定值（含义取决于模式）
/// - `pos` / `vel`: 合成关节位置/速度
/// - `profile`: 该手指的梯形轨迹生成器
/// - `elapsed`: 自轨迹初始化起经过的时间（秒）
/// - `config`: 全局增益
pub fn finger_torque(
    mode: ControlMode,
    cmd: f64,
    pos: f64,
    vel: f64,
    profile: &TrapezoidalProfile,
    elapsed: f64,
    config: &HandConfig,
) -> f64 {
    match mode {
        ControlMode::Idle => 0.0,
        ControlMode::Trapezoidal => {
            config.p_gain * (profile.pos(elapsed) - pos)
                + config.d_gain * (profile.vel(elapsed) - vel)
        }
        ControlMode::Pid => config.p_gain * (cmd - pos) - config.d_gain * vel,
        ControlMode::Velocity => config.velocity_gain * (cmd - vel),
        ControlMode::Torque => cmd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> TrapezoidalProfile {
        TrapezoidalProfile::new(1.0, 0.1)
    }

    #[test]
    fn test_idle_outputs_zero() {
        let config = HandConfig::default();
        let torque = finger_torque(ControlMode::Idle, 5.0, 1.0, 1.0, &profile(), 0.0, &config);
        assert_eq!(torque, 0.0);
    }

    #[test]
    fn test_torque_passes_command_through() {
        let config = HandConfig::default();
        let torque = finger_torque(ControlMode::Torque, 5.0, 1.0, 1.0, &profile(), 0.0, &config);
        assert_eq!(torque, 5.0);
    }

    #[test]
    fn test_pid_law() {
        // p=25, d=1: 25*(2.0 - 0.5) - 1*0.3 = 37.2
        let config = HandConfig::default();
        let torque = finger_torque(ControlMode::Pid, 2.0, 0.5, 0.3, &profile(), 0.0, &config);
        assert!((torque - 37.2).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_law() {
        // v_gain=0.1: 0.1*(-1.0 - 0.2) = -0.12
        let config = HandConfig::default();
        let torque = finger_torque(
            ControlMode::Velocity,
            -1.0,
            0.0,
            0.2,
            &profile(),
            0.0,
            &config,
        );
        assert!((torque - (-0.12)).abs() < 1e-12);
    }

    #[test]
    fn test_trapezoidal_tracks_profile_start() {
        // t=0 时轨迹停在起点、速度为 0，位置一致则力矩为 0
        let config = HandConfig::default();
        let mut profile = profile();
        profile.set_profile(0.4, 1.5);

        let torque = finger_torque(
            ControlMode::Trapezoidal,
            1.5,
            0.4,
            0.0,
            &profile,
            0.0,
            &config,
        );
        assert!(torque.abs() < 1e-9);
    }

    #[test]
    fn test_trapezoidal_pulls_toward_setpoint() {
        // 实际位置落后于轨迹设定 → 正向力矩
        let config = HandConfig::default();
        let mut profile = profile();
        profile.set_profile(0.0, 1.5);

        let mid = profile.duration() / 2.0;
        let torque = finger_torque(
            ControlMode::Trapezoidal,
            1.5,
            0.0,
            0.0,
            &profile,
            mid,
            &config,
        );
        assert!(torque > 0.0);
    }
}
