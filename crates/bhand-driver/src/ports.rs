//! 非阻塞命令/遥测端口
//!
//! 基于 crossbeam-channel 的有界通道封装：
//!
//! - [`InputPort`]: "read newest" 语义——排空通道，只保留最新一条；
//!   本周期没有新数据时返回 `None`，上一设定值自然保持
//! - [`OutputPort`]: 非阻塞发送——消费端落后时丢弃本条消息，
//!   绝不阻塞控制周期

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::trace;

/// 命令输入端口（newest value wins）
#[derive(Debug, Clone)]
pub struct InputPort<T> {
    rx: Receiver<T>,
}

impl<T> InputPort<T> {
    /// 读取最新一条消息，丢弃更早的积压
    ///
    /// 通道为空或发送端已关闭时返回 `None`。
    pub fn read_newest(&self) -> Option<T> {
        let mut newest = None;
        while let Ok(value) = self.rx.try_recv() {
            newest = Some(value);
        }
        newest
    }
}

/// 遥测输出端口（非阻塞，可丢弃）
#[derive(Debug, Clone)]
pub struct OutputPort<T> {
    tx: Sender<T>,
}

impl<T> OutputPort<T> {
    /// 非阻塞发送；通道满或已断开时丢弃
    pub fn send(&self, value: T) {
        match self.tx.try_send(value) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => trace!("telemetry consumer lagging, message dropped"),
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

/// 创建一对 (发送端, 输入端口)
pub fn input_channel<T>(capacity: usize) -> (Sender<T>, InputPort<T>) {
    let (tx, rx) = bounded(capacity);
    (tx, InputPort { rx })
}

/// 创建一对 (输出端口, 接收端)
pub fn output_channel<T>(capacity: usize) -> (OutputPort<T>, Receiver<T>) {
    let (tx, rx) = bounded(capacity);
    (OutputPort { tx }, rx)
}
