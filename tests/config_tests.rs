// tests/config_tests.rs

#[cfg(test)]
mod tests {
    use robot_console::{ConsoleConfig, ConsoleError};

    #[test]
    fn shipped_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/console.yaml");
        let config = ConsoleConfig::from_yaml_file(path).unwrap();
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn partial_documents_keep_defaults() {
        let config = ConsoleConfig::from_yaml_str(
            "ros:\n  topics:\n    cmd_vel: /mobile_base/cmd_vel\nui:\n  pick_radius: 0.5\n",
        )
        .unwrap();
        assert_eq!(config.ros.topics.cmd_vel, "/mobile_base/cmd_vel");
        assert_eq!(config.ros.topics.cmd_mode, "/hrp/cmd_mode");
        assert_eq!(config.ui.pick_radius, 0.5);
        assert_eq!(config.ui.notice_timeout_ms, 5000);
        assert_eq!(config.driving.speed_presets.len(), 3);
    }

    #[test]
    fn out_of_range_speed_is_rejected() {
        let err = ConsoleConfig::from_yaml_str("driving:\n  default_speed: 3\n").unwrap_err();
        assert!(matches!(err, ConsoleError::ConfigError(msg) if msg.contains("default_speed")));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = ConsoleConfig::from_yaml_file("/nonexistent/console.yaml").unwrap_err();
        assert!(matches!(err, ConsoleError::ConfigError(_)));
    }
}
