//! The YJ10 register map.
//!
//! Addresses are fixed by the arm's firmware. Holding registers carry the
//! live joint and clamper values, input registers the read-only calibration
//! and limit constants (PWM bounds per joint, clamper maximum current).

use crate::core::modbus::{Address, Quantity, Value};

pub const INPUT_REGISTER_COUNT: usize = 35;
pub const HOLDING_REGISTER_COUNT: usize = 12;

/// Joints driven by the arm. Holding slot 5 follows them but is not fitted
/// on this model.
pub const JOINT_COUNT: usize = 5;

/// Highest index accepted by [`Yj10Arm::write_joint`](crate::core::Yj10Arm::write_joint)
/// and [`Yj10Arm::joint`](crate::core::Yj10Arm::joint).
pub const MAX_JOINT_INDEX: usize = 5;

pub const JOINT_PWM_BASE: Address = 0x00;
pub const CLAMPER_INSTRUCTION: Address = 0x06;
pub const CLAMPER_STATE: Address = 0x07;
pub const CLAMPER_CLOSING_CURRENT: Address = 0x08;
pub const CLAMPER_CURRENT: Address = 0x0A;

/// [`ReadClamper`](crate::core::Yj10Arm::read_clamper) covers the instruction,
/// state, closing current and current registers.
pub const CLAMPER_BLOCK_BASE: Address = CLAMPER_INSTRUCTION;
pub const CLAMPER_BLOCK_LENGTH: Quantity = 5;

/// Safe joint PWM range given by the arm's documentation. Not enforced here.
pub const PWM_MIN: u16 = 500;
pub const PWM_MAX: u16 = 2500;

/// Whether a joint PWM value lies within the arm's documented range.
pub fn pwm_in_range(pwm: Value) -> bool {
    (PWM_MIN..=PWM_MAX).contains(&pwm)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blocks_fit_the_holding_bank() {
        assert!(JOINT_PWM_BASE as usize + JOINT_COUNT <= HOLDING_REGISTER_COUNT);
        assert!(
            CLAMPER_BLOCK_BASE as usize + CLAMPER_BLOCK_LENGTH as usize <= HOLDING_REGISTER_COUNT
        );
        assert!((CLAMPER_CURRENT as usize) < HOLDING_REGISTER_COUNT);
        assert!(MAX_JOINT_INDEX < CLAMPER_INSTRUCTION as usize);
    }

    #[test]
    fn pwm_range_is_inclusive() {
        assert!(pwm_in_range(PWM_MIN));
        assert!(pwm_in_range(1500));
        assert!(pwm_in_range(PWM_MAX));
        assert!(!pwm_in_range(PWM_MIN - 1));
        assert!(!pwm_in_range(PWM_MAX + 1));
        assert!(!pwm_in_range(0));
    }
}
