//! 设备构造器
//!
//! 组装命令/遥测通道并返回 (设备, 宿主端点) 对：设备持有输入端口
//! 与输出端口，宿主通过 [`HandEndpoints`] 注入命令、消费遥测。
//! 命令通道容量 8（newest-wins 下积压无意义），遥测通道容量 64。

use crossbeam_channel::{Receiver, Sender};
use nalgebra::Vector3;

use bhand_protocol::{HandCommand, HandConfig, HandStatus, JointState, N_JOINTS};

use crate::device::{ComProvider, DeviceParts, HandSimDevice};
use crate::physics::HandPhysics;
use crate::ports::{input_channel, output_channel};

const COMMAND_CAPACITY: usize = 8;
const TELEMETRY_CAPACITY: usize = 64;

/// 宿主侧通道端点
///
/// 发送端对应设备的五路命令输入，接收端对应三路遥测输出。
/// 任意一端可以被丢弃：设备端口对断开免疫。
pub struct HandEndpoints {
    /// 直接力矩向量（每手指一个标量）
    pub torque_tx: Sender<Vec<f64>>,
    /// 位置 PID 目标向量
    pub position_tx: Sender<Vec<f64>>,
    /// 速度目标向量
    pub velocity_tx: Sender<Vec<f64>>,
    /// 梯形轨迹目标向量
    pub trapezoidal_tx: Sender<Vec<f64>>,
    /// 统一 (模式, 数值) 命令
    pub command_tx: Sender<HandCommand>,

    /// 关节状态遥测
    pub joint_state_rx: Receiver<JointState>,
    /// 手部状态遥测
    pub status_rx: Receiver<HandStatus>,
    /// 质心遥测（未配置 provider 时始终为空）
    pub com_rx: Receiver<Vector3<f64>>,
}

/// [`HandSimDevice`] 构造器
#[derive(Default)]
pub struct HandSimDeviceBuilder {
    config: HandConfig,
    com_provider: Option<ComProvider>,
}

impl HandSimDeviceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 覆盖默认增益配置
    pub fn config(mut self, config: HandConfig) -> Self {
        self.config = config;
        self
    }

    /// 注册质心计算回调（关节角度 → 质心坐标）
    pub fn com_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn(&[f64; N_JOINTS]) -> Vector3<f64> + Send + 'static,
    {
        self.com_provider = Some(Box::new(provider));
        self
    }

    /// 组装设备与宿主端点
    pub fn build<P: HandPhysics>(self, physics: P) -> (HandSimDevice<P>, HandEndpoints) {
        let (torque_tx, torque_in) = input_channel(COMMAND_CAPACITY);
        let (position_tx, position_in) = input_channel(COMMAND_CAPACITY);
        let (velocity_tx, velocity_in) = input_channel(COMMAND_CAPACITY);
        let (trapezoidal_tx, trapezoidal_in) = input_channel(COMMAND_CAPACITY);
        let (command_tx, unified_in) = input_channel(COMMAND_CAPACITY);

        let (joint_state_out, joint_state_rx) = output_channel(TELEMETRY_CAPACITY);
        let (status_out, status_rx) = output_channel(TELEMETRY_CAPACITY);
        let (com_out, com_rx) = output_channel(TELEMETRY_CAPACITY);

        let device = HandSimDevice::from_parts(DeviceParts {
            config: self.config,
            physics,
            torque_in,
            position_in,
            velocity_in,
            trapezoidal_in,
            unified_in,
            joint_state_out,
            status_out,
            com_out,
            com_provider: self.com_provider,
        });

        let endpoints = HandEndpoints {
            torque_tx,
            position_tx,
            velocity_tx,
            trapezoidal_tx,
            command_tx,
            joint_state_rx,
            status_rx,
            com_rx,
        };

        (device, endpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::MockPhysics;
    use std::time::Duration;

    #[test]
    fn test_build_default_is_idle() {
        let (device, _endpoints) = HandSimDeviceBuilder::new().build(MockPhysics::new());
        assert!(device.run_mode().is_idle());
    }

    #[test]
    fn test_com_provider_publishes_on_read_device() {
        let (mut device, endpoints) = HandSimDeviceBuilder::new()
            .com_provider(|positions| Vector3::new(positions[0], 0.0, 1.0))
            .build(MockPhysics::new());

        device.physics_mut().set_position(0, 0.25);
        device.read_sim();
        device.read_device(Duration::ZERO);

        let com = endpoints.com_rx.try_recv().unwrap();
        assert_eq!(com, Vector3::new(0.25, 0.0, 1.0));
    }

    #[test]
    fn test_telemetry_throttled_to_publish_period() {
        let (mut device, endpoints) = HandSimDeviceBuilder::new().build(MockPhysics::new());

        device.read_device(Duration::from_millis(0));
        device.read_device(Duration::from_millis(10)); // 20ms 未到，跳过
        device.read_device(Duration::from_millis(25));

        assert_eq!(endpoints.joint_state_rx.try_iter().count(), 2);
    }
}
