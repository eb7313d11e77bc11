#[cfg(test)]
mod tests {
    use restwatch::libs::messages::Message;
    use restwatch::{msg_error_anyhow, msg_info, msg_print, msg_success, msg_warning};

    #[test]
    fn test_error_anyhow_carries_message() {
        let error = msg_error_anyhow!(Message::ConfigInvalid("break_duration".to_string()));

        assert_eq!(error.to_string(), "❌ Invalid configuration: break_duration");
    }

    #[test]
    fn test_display_macros_work_as_match_arms() {
        for outcome in [Ok(()), Err("disk full")] {
            match outcome {
                Ok(()) => msg_success!(Message::ConfigSaved),
                Err(e) => msg_warning!(Message::ExportFailed(e.to_string()), true),
            }
        }
        msg_info!(Message::BreakFinished);
        msg_print!("plain text", true);
    }
}
