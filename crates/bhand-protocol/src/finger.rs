//! 手指索引到物理关节 ID 的映射
//!
//! 8 个物理关节按如下规则分配给 4 个逻辑手指：
//!
//! - 手指 0..=2（卷曲手指）: medial = i + 2, distal = i + 5
//! - 手指 3（spread）: 两个近端关节 0 和 1（并非 medial/distal 对，
//!   只是复用同一结构表示）

use crate::N_FINGERS;

/// 一个手指对应的关节 ID 对
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerJoints {
    /// 近端（medial）关节 ID；对 spread 而言是第一个近端关节
    pub medial: usize,
    /// 远端（distal）关节 ID；对 spread 而言是第二个近端关节
    pub distal: usize,
}

/// 根据手指索引解析关节 ID 对
///
/// # Panics
///
/// `finger >= 4` 属于调用方的编程契约违例（合法手指索引域是 0..=3），
/// 在此断言而不是静默处理。
pub fn finger_joint_ids(finger: usize) -> FingerJoints {
    assert!(
        finger < N_FINGERS,
        "finger index out of range: {finger} (expected 0..{N_FINGERS})"
    );

    if finger < 3 {
        FingerJoints {
            medial: finger + 2,
            distal: finger + 5,
        }
    } else {
        FingerJoints {
            medial: 0,
            distal: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curling_finger_ids() {
        assert_eq!(
            finger_joint_ids(0),
            FingerJoints {
                medial: 2,
                distal: 5
            }
        );
        assert_eq!(
            finger_joint_ids(1),
            FingerJoints {
                medial: 3,
                distal: 6
            }
        );
        assert_eq!(
            finger_joint_ids(2),
            FingerJoints {
                medial: 4,
                distal: 7
            }
        );
    }

    #[test]
    fn test_spread_finger_ids() {
        assert_eq!(
            finger_joint_ids(3),
            FingerJoints {
                medial: 0,
                distal: 1
            }
        );
    }

    #[test]
    #[should_panic(expected = "finger index out of range")]
    fn test_out_of_range_panics() {
        finger_joint_ids(4);
    }
}
