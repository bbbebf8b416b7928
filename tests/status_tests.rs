// tests/status_tests.rs
// Sensor status decoding, the status line and the control-blocking policy.

#[cfg(test)]
mod tests {
    use robot_console::core::status::{
        battery_summary, BlockReason, MessageConstants, SensorConstants, SensorStatusBits,
        SystemStatus, CONST_CHARGING, CONST_COLLISION, CONST_IN_CS, CONST_USER_STOP,
    };
    use rstest::{fixture, rstest};

    const CHARGING: u32 = 0x0001;
    const IN_CS: u32 = 0x0002;
    const COLLISION: u32 = 0x0010;
    const USER_STOP: u32 = 0x0040;

    fn bits() -> SensorStatusBits {
        let constants: MessageConstants = [
            (CONST_CHARGING, CHARGING),
            (CONST_IN_CS, IN_CS),
            (CONST_COLLISION, COLLISION),
            (CONST_USER_STOP, USER_STOP),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), i64::from(value)))
        .collect();
        SensorStatusBits::from_constants(&constants).unwrap()
    }

    #[fixture]
    fn resolved() -> SystemStatus {
        let mut status = SystemStatus::new();
        status.resolve_constants(bits());
        status
    }

    #[rstest]
    #[case(0, "Normal")]
    #[case(COLLISION | IN_CS, "COLLIDED!, Docked")]
    #[case(IN_CS | CHARGING, "Docked")]
    #[case(USER_STOP, "STOPPED")]
    #[case(COLLISION | IN_CS | USER_STOP, "COLLIDED!, Docked, STOPPED")]
    fn status_line(mut resolved: SystemStatus, #[case] word: u32, #[case] expected: &str) {
        assert!(resolved.on_sensor_status(word));
        assert_eq!(resolved.summary().to_string(), expected);
    }

    #[rstest]
    fn stopped_hides_soft_estop(mut resolved: SystemStatus) {
        resolved.on_soft_estop(true);
        assert_eq!(resolved.summary().to_string(), "Soft emergency stop engaged");
        resolved.on_sensor_status(USER_STOP);
        assert_eq!(resolved.summary().to_string(), "STOPPED");
    }

    #[test]
    fn word_before_constants_is_applied_on_resolution() {
        let mut status = SystemStatus::new();
        assert!(!status.on_sensor_status(COLLISION));
        assert!(!status.on_sensor_status(IN_CS));
        assert_eq!(status.constants(), SensorConstants::Unresolved);
        assert_eq!(status.summary().to_string(), "Normal");

        // latest word wins
        assert!(status.resolve_constants(bits()));
        assert!(status.is_docked());
        assert!(!status.flags().collision);
    }

    #[rstest]
    fn constants_resolve_once(mut resolved: SystemStatus) {
        let other = SensorStatusBits { charging: 4, in_cs: 8, collision: 16, user_stop: 32 };
        assert!(!resolved.resolve_constants(other));
        assert_eq!(resolved.constants(), SensorConstants::Resolved(bits()));
    }

    #[test]
    fn missing_constant_leaves_bits_unresolved() {
        let mut constants = MessageConstants::new();
        constants.insert(CONST_CHARGING.to_string(), 1);
        constants.insert(CONST_IN_CS.to_string(), 2);
        assert!(SensorStatusBits::from_constants(&constants).is_none());
    }

    #[rstest]
    #[case(CHARGING | USER_STOP, true, Some(BlockReason::Charging))]
    #[case(USER_STOP, true, Some(BlockReason::Stopped))]
    #[case(0, true, Some(BlockReason::SoftEstop))]
    #[case(IN_CS | COLLISION, false, None)]
    fn block_reason_precedence(
        mut resolved: SystemStatus,
        #[case] word: u32,
        #[case] soft_estop: bool,
        #[case] expected: Option<BlockReason>,
    ) {
        resolved.on_sensor_status(word);
        resolved.on_soft_estop(soft_estop);
        let block = resolved.block_status();
        assert_eq!(block.reason, expected);
        assert_eq!(block.blocked(), expected.is_some());
    }

    #[rstest]
    #[case(false, false, false, "Normal")]
    #[case(true, true, false, "BATTERY LOW! [Charging]")]
    #[case(false, true, true, "Fully charged [Charging]")]
    #[case(false, true, false, "[Charging]")]
    fn battery_line(#[case] low: bool, #[case] charging: bool, #[case] full: bool, #[case] expected: &str) {
        assert_eq!(battery_summary(low, charging, full), expected);
    }
}
