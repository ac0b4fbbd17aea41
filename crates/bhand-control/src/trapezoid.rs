//! Trapezoidal Profile - 梯形速度轨迹生成器
//!
//! 给定起点与目标位置，在最大速度/最大加速度约束下生成时间索引的
//! 位置/速度设定值：匀加速 → 匀速 → 匀减速。行程过短达不到最大
//! 速度时退化为三角形轨迹（加速后立即减速）。
//!
//! # 算法
//!
//! ```text
//! 加速段  (0 ≤ t < t_acc):            s(t) = ½·a·t²
//! 匀速段  (t_acc ≤ t < t_acc + t_cr): s(t) = s_acc + v_peak·(t - t_acc)
//! 减速段  (其余, t ≤ duration):       s(t) = |d| - ½·a·(duration - t)²
//! ```
//!
//! 边界行为：t ≤ 0 时停在起点，t ≥ duration 时保持在终点（速度为 0）。
//! 起始速度恒为 0：轨迹总是从当前位置静止出发。

/// 梯形速度轨迹
///
/// 一个实例绑定一组 (max_velocity, max_acceleration) 约束；
/// `set_profile` 可随时用新的起点/终点重新初始化。
#[derive(Debug, Clone, Copy)]
pub struct TrapezoidalProfile {
    max_velocity: f64,
    max_acceleration: f64,

    start: f64,
    /// 行程方向（+1/-1；零行程时为 0）
    dir: f64,
    /// 行程长度 |end - start|
    distance: f64,
    /// 加速段时长（等于减速段时长）
    t_acc: f64,
    /// 匀速段时长（三角形轨迹时为 0）
    t_cruise: f64,
    /// 峰值速度（可能低于 max_velocity）
    v_peak: f64,
}

impl TrapezoidalProfile {
    /// 创建新的轨迹生成器
    ///
    /// # Panics
    ///
    /// `max_velocity` 或 `max_acceleration` 非正时 panic。
    pub fn new(max_velocity: f64, max_acceleration: f64) -> Self {
        assert!(
            max_velocity > 0.0,
            "max_velocity must be positive, got: {max_velocity}"
        );
        assert!(
            max_acceleration > 0.0,
            "max_acceleration must be positive, got: {max_acceleration}"
        );

        Self {
            max_velocity,
            max_acceleration,
            start: 0.0,
            dir: 0.0,
            distance: 0.0,
            t_acc: 0.0,
            t_cruise: 0.0,
            v_peak: 0.0,
        }
    }

    /// 用新的起点/终点重新初始化轨迹
    ///
    /// 起始速度恒为 0；重入梯形模式时必须从当前位置重新初始化，
    /// 绝不复用陈旧轨迹。
    pub fn set_profile(&mut self, start: f64, end: f64) {
        let delta = end - start;

        self.start = start;
        self.distance = delta.abs();
        self.dir = if delta > 0.0 {
            1.0
        } else if delta < 0.0 {
            -1.0
        } else {
            0.0
        };

        if self.distance == 0.0 {
            self.t_acc = 0.0;
            self.t_cruise = 0.0;
            self.v_peak = 0.0;
            return;
        }

        let a = self.max_acceleration;
        // 达到 max_velocity 所需的加速时间与距离
        let t_full = self.max_velocity / a;
        let d_full = 0.5 * a * t_full * t_full;

        if 2.0 * d_full >= self.distance {
            // 三角形轨迹：行程不足以到达最大速度
            self.t_acc = (self.distance / a).sqrt();
            self.t_cruise = 0.0;
            self.v_peak = a * self.t_acc;
        } else {
            self.t_acc = t_full;
            self.v_peak = self.max_velocity;
            self.t_cruise = (self.distance - 2.0 * d_full) / self.max_velocity;
        }
    }

    /// 轨迹总时长（秒）
    pub fn duration(&self) -> f64 {
        2.0 * self.t_acc + self.t_cruise
    }

    /// t 秒时的位置设定值
    pub fn pos(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, self.duration());
        let a = self.max_acceleration;

        let s = if t < self.t_acc {
            0.5 * a * t * t
        } else if t < self.t_acc + self.t_cruise {
            0.5 * a * self.t_acc * self.t_acc + self.v_peak * (t - self.t_acc)
        } else {
            let remaining = self.duration() - t;
            self.distance - 0.5 * a * remaining * remaining
        };

        self.start + self.dir * s
    }

    /// t 秒时的速度设定值
    pub fn vel(&self, t: f64) -> f64 {
        if t <= 0.0 || t >= self.duration() {
            return 0.0;
        }
        let a = self.max_acceleration;

        let v = if t < self.t_acc {
            a * t
        } else if t < self.t_acc + self.t_cruise {
            self.v_peak
        } else {
            a * (self.duration() - t)
        };

        self.dir * v
    }

    /// 轨迹终点位置
    pub fn target(&self) -> f64 {
        self.start + self.dir * self.distance
    }
}
