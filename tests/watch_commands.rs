#[cfg(test)]
mod tests {
    use chrono::Duration;
    use restwatch::commands::watch::{RefreshThrottle, WatchCommand};
    use restwatch::libs::messages::Message;
    use std::path::PathBuf;
    use std::time::Instant;

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(WatchCommand::parse(""), Ok(None));
        assert_eq!(WatchCommand::parse("   "), Ok(None));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(WatchCommand::parse("p"), Ok(Some(WatchCommand::TogglePause)));
        assert_eq!(WatchCommand::parse("pause"), Ok(Some(WatchCommand::TogglePause)));
        assert_eq!(WatchCommand::parse(" s "), Ok(Some(WatchCommand::Status)));
        assert_eq!(WatchCommand::parse("r"), Ok(Some(WatchCommand::Report)));
        assert_eq!(WatchCommand::parse("h"), Ok(Some(WatchCommand::Help)));
        assert_eq!(WatchCommand::parse("?"), Ok(Some(WatchCommand::Help)));
        assert_eq!(WatchCommand::parse("q"), Ok(Some(WatchCommand::Quit)));
        assert_eq!(WatchCommand::parse("exit"), Ok(Some(WatchCommand::Quit)));
    }

    #[test]
    fn test_parse_margin() {
        assert_eq!(
            WatchCommand::parse("m 30"),
            Ok(Some(WatchCommand::SetMargin(Duration::seconds(30))))
        );
        assert_eq!(
            WatchCommand::parse("margin   5"),
            Ok(Some(WatchCommand::SetMargin(Duration::seconds(5))))
        );

        for input in ["m", "m 0", "m -1", "m abc", "m 1.5"] {
            assert!(
                matches!(WatchCommand::parse(input), Err(Message::InvalidMargin(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_export() {
        assert_eq!(WatchCommand::parse("e"), Ok(Some(WatchCommand::Export(None))));
        assert_eq!(
            WatchCommand::parse("e reports/today.csv"),
            Ok(Some(WatchCommand::Export(Some(PathBuf::from("reports/today.csv")))))
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            WatchCommand::parse("launch now"),
            Err(Message::UnknownCommand("launch".to_string()))
        );
    }

    #[test]
    fn test_refresh_throttle_first_update_is_drawn() {
        let mut throttle = RefreshThrottle::new(std::time::Duration::from_secs(1));
        let start = Instant::now();

        assert!(throttle.ready(start));
        assert!(!throttle.ready(start + std::time::Duration::from_millis(300)));
        assert!(!throttle.ready(start + std::time::Duration::from_millis(999)));
        assert!(throttle.ready(start + std::time::Duration::from_secs(1)));
    }

    #[test]
    fn test_refresh_throttle_follows_wall_time_not_update_count() {
        // Updates arriving every 300ms still redraw about once per second.
        let mut throttle = RefreshThrottle::new(std::time::Duration::from_secs(1));
        let start = Instant::now();

        let drawn: Vec<u64> = (0..10u64)
            .map(|i| i * 300)
            .filter(|ms| throttle.ready(start + std::time::Duration::from_millis(*ms)))
            .collect();

        assert_eq!(drawn, vec![0, 1_200, 2_400]);
    }
}
