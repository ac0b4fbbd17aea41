//! 设备整周期集成测试
//!
//! 按宿主调度器的真实顺序驱动设备：
//! read_sim → write_sim → read_device → write_device

use std::time::Duration;

use bhand_driver::{DriverError, HandEndpoints, HandSimDevice, HandSimDeviceBuilder, MockPhysics};
use bhand_protocol::{CommandError, ControlMode, HandCommand, RawMode, StreamKind};

const CYCLE: Duration = Duration::from_millis(1);

fn build() -> (HandSimDevice<MockPhysics>, HandEndpoints) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    HandSimDeviceBuilder::new().build(MockPhysics::new())
}

/// 推进一个完整控制周期
fn step(device: &mut HandSimDevice<MockPhysics>, now: Duration) -> Result<(), DriverError> {
    device.read_sim();
    device.write_sim(now);
    device.read_device(now);
    device.write_device(now)
}

#[test]
fn test_initialization_lands_in_run_within_three_cycles() {
    let (mut device, _endpoints) = build();

    // 所有关节速度 0.005 rad/s，低于 0.01 的停止阈值
    device.physics_mut().set_all_velocities(0.005);
    device.initialize();

    let mut now = Duration::ZERO;
    for cycle in 0..3 {
        step(&mut device, now).unwrap();
        now += CYCLE;
        if device.run_mode().is_run() {
            assert!(cycle <= 2, "landed in run after cycle {cycle}");
        }
    }
    assert!(device.run_mode().is_run());

    // 初始化收尾即闭合命令：卷曲手指处于速度模式，+1.0
    for finger in 0..3 {
        assert_eq!(device.effective_mode(finger), ControlMode::Velocity);
    }
}

#[test]
fn test_initialization_waits_for_moving_fingers() {
    let (mut device, _endpoints) = build();

    // 手指持续运动（平滑后远超阈值），初始化停在 SeekFingers
    device.physics_mut().set_all_velocities(1.0);
    device.initialize();

    let mut now = Duration::ZERO;
    for _ in 0..10 {
        step(&mut device, now).unwrap();
        now += CYCLE;
    }
    assert!(device.run_mode().is_initializing());
}

#[test]
fn test_breakaway_scenario_clamps_medial_and_drives_distal() {
    let (mut device, endpoints) = build();
    device.run();

    // 手指 0 力矩模式 cmd=5.0；medial 关节 (id 2) 反作用力矩 3.0 > 2.5
    endpoints
        .command_tx
        .send(HandCommand::for_finger(0, RawMode::Torque, 5.0))
        .unwrap();
    device.physics_mut().set_reaction_torque(2, 3.0);

    step(&mut device, Duration::ZERO).unwrap(); // 命令在本周期末落地
    step(&mut device, CYCLE).unwrap();

    // 脱开：medial 钳制在 2.5，distal = 5.0/3
    assert!((device.physics().commanded_force(2) - 2.5).abs() < 1e-9);
    assert!((device.physics().commanded_force(5) - 5.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_idle_mid_run_zeroes_all_finger_torques() {
    let (mut device, endpoints) = build();
    device.run();

    endpoints
        .command_tx
        .send(HandCommand {
            mode: [1, 1, 1, 1],
            cmd: [1.0, 1.0, 1.0, 1.0],
        })
        .unwrap();
    let mut now = Duration::ZERO;
    step(&mut device, now).unwrap();
    now += CYCLE;
    step(&mut device, now).unwrap();
    assert_eq!(device.physics().commanded_force(2), 1.0);

    device.idle();
    now += CYCLE;
    step(&mut device, now).unwrap();
    for joint in 0..8 {
        assert_eq!(device.physics().commanded_force(joint), 0.0, "joint {joint}");
    }
}

#[test]
fn test_size_mismatch_leaves_state_unchanged() {
    let (mut device, endpoints) = build();
    device.run();

    endpoints
        .command_tx
        .send(HandCommand::for_finger(1, RawMode::Pid, 0.8))
        .unwrap();
    step(&mut device, Duration::ZERO).unwrap();
    assert_eq!(device.effective_mode(1), ControlMode::Pid);

    // 长度非法的速度向量 + 本应切换模式的统一命令：本周期全部拒绝
    endpoints.velocity_tx.send(vec![1.0, 2.0]).unwrap();
    endpoints
        .command_tx
        .send(HandCommand::for_finger(1, RawMode::Torque, 9.0))
        .unwrap();
    let err = step(&mut device, CYCLE).unwrap_err();
    assert_eq!(
        err,
        DriverError::Command(CommandError::SizeMismatch {
            stream: StreamKind::Velocity,
            expected: 4,
            actual: 2,
        })
    );
    assert_eq!(device.effective_mode(1), ControlMode::Pid);
}

#[test]
fn test_repeated_unified_command_is_idempotent() {
    let (mut device, endpoints) = build();
    device.run();
    device.physics_mut().set_position(3, 0.2);

    let cmd = HandCommand::for_finger(1, RawMode::Pid, 1.5);
    endpoints.command_tx.send(cmd).unwrap();
    step(&mut device, Duration::ZERO).unwrap();
    step(&mut device, CYCLE).unwrap();
    let first = device.physics().commanded_force(3);

    // 同一命令重发一遍，输出力不变
    endpoints.command_tx.send(cmd).unwrap();
    step(&mut device, 2 * CYCLE).unwrap();
    step(&mut device, 3 * CYCLE).unwrap();
    assert_eq!(device.physics().commanded_force(3), first);
}

#[test]
fn test_trapezoidal_round_trip_starts_at_rest() {
    let (mut device, endpoints) = build();
    device.run();
    device.physics_mut().set_position(2, 0.4);

    endpoints
        .command_tx
        .send(HandCommand::for_finger(0, RawMode::Trapezoidal, 1.5))
        .unwrap();
    step(&mut device, Duration::ZERO).unwrap();

    let profile = device.profile(0);
    assert!((profile.pos(0.0) - 0.4).abs() < 1e-9);
    assert!(profile.vel(0.0).abs() < 1e-9);
    assert!((profile.target() - 1.5).abs() < 1e-9);
}

#[test]
fn test_newest_command_wins_within_one_cycle() {
    let (mut device, endpoints) = build();
    device.run();
    endpoints
        .command_tx
        .send(HandCommand::for_finger(0, RawMode::Torque, 1.0))
        .unwrap();
    step(&mut device, Duration::ZERO).unwrap();

    // 一个周期内积压两条力矩向量，只有最新一条生效
    endpoints.torque_tx.send(vec![0.3, 0.0, 0.0, 0.0]).unwrap();
    endpoints.torque_tx.send(vec![0.9, 0.0, 0.0, 0.0]).unwrap();
    step(&mut device, CYCLE).unwrap();
    step(&mut device, 2 * CYCLE).unwrap();

    assert_eq!(device.physics().commanded_force(2), 0.9);
}

#[test]
fn test_commands_ignored_while_idle() {
    let (mut device, endpoints) = build();

    endpoints
        .command_tx
        .send(HandCommand::for_finger(0, RawMode::Torque, 5.0))
        .unwrap();
    step(&mut device, Duration::ZERO).unwrap();

    // Idle 下命令被排空但不应用；进入 Run 后也不会追溯生效
    device.run();
    step(&mut device, CYCLE).unwrap();
    assert_eq!(device.effective_mode(0), ControlMode::Idle);
    assert_eq!(device.physics().commanded_force(2), 0.0);
}
