#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use restwatch::libs::activity::{ActivitySink, ActivitySource, ChannelSource};
    use restwatch::libs::clock::{Clock, ManualClock, SystemClock};
    use restwatch::libs::config::TrackerConfig;
    use restwatch::libs::error::TrackerError;
    use restwatch::libs::history::ActivityState;
    use restwatch::libs::scheduler::{ManualScheduler, Scheduler, TokioScheduler};
    use restwatch::libs::tracker::{Tracker, TrackerEvent};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::{broadcast, oneshot};
    use tokio::time::timeout;

    const WAIT: std::time::Duration = std::time::Duration::from_secs(2);

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn manual_tracker(config: &TrackerConfig) -> (Tracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(t0()));
        let tracker = Tracker::new(config, clock.clone(), Arc::new(ManualScheduler::new())).unwrap();
        (tracker, clock)
    }

    async fn next_state_change(events: &mut broadcast::Receiver<TrackerEvent>) -> (ActivityState, NaiveDateTime) {
        loop {
            match timeout(WAIT, events.recv()).await.expect("timed out waiting for event") {
                Ok(TrackerEvent::StateChanged { state, at }) => return (state, at),
                Ok(_) => continue,
                Err(e) => panic!("event stream failed: {e}"),
            }
        }
    }

    #[tokio::test]
    async fn test_channel_source_feeds_tracker() {
        let (tracker, _clock) = manual_tracker(&TrackerConfig::default());
        let mut events = tracker.subscribe();

        let (source, feed) = ChannelSource::new();
        tracker.attach(Box::new(source)).unwrap();

        assert!(feed.notify(t0() + Duration::seconds(1)));

        let (state, at) = next_state_change(&mut events).await;
        assert_eq!(state, ActivityState::Active);
        assert_eq!(at, t0() + Duration::seconds(1));
        assert_eq!(tracker.history().len(), 1);
    }

    #[tokio::test]
    async fn test_channel_source_reactivates_after_inactivity() {
        let (tracker, clock) = manual_tracker(&TrackerConfig::default());
        let mut events = tracker.subscribe();
        let (source, feed) = ChannelSource::new();
        tracker.attach(Box::new(source)).unwrap();
        tracker.start();
        assert_eq!(next_state_change(&mut events).await.0, ActivityState::Active);

        clock.advance(Duration::seconds(11));
        tracker.tick();
        assert_eq!(next_state_change(&mut events).await.0, ActivityState::Inactive);

        feed.notify(clock.advance(Duration::seconds(1)));
        let (state, at) = next_state_change(&mut events).await;
        assert_eq!(state, ActivityState::Active);
        assert_eq!(at, t0() + Duration::seconds(12));
    }

    /// Reports one input the moment it is attached.
    struct OneShotSource;

    impl ActivitySource for OneShotSource {
        fn start(self: Box<Self>, sink: ActivitySink) -> Result<(), TrackerError> {
            sink.observe_now();
            Ok(())
        }
    }

    #[test]
    fn test_observe_now_uses_tracker_clock() {
        let (tracker, clock) = manual_tracker(&TrackerConfig::default());
        clock.advance(Duration::seconds(3));

        tracker.attach(Box::new(OneShotSource)).unwrap();

        let history = tracker.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].timestamp, t0() + Duration::seconds(3));
        assert_eq!(tracker.status().last_activity, t0() + Duration::seconds(3));
    }

    #[test]
    fn test_channel_source_requires_runtime() {
        let (tracker, _clock) = manual_tracker(&TrackerConfig::default());
        let (source, _feed) = ChannelSource::new();

        let result = tracker.attach(Box::new(source));
        assert!(matches!(result, Err(TrackerError::ActivitySource(_))));
    }

    #[tokio::test]
    async fn test_tokio_scheduler_runs_task() {
        let scheduler = TokioScheduler::current();
        let (tx, rx) = oneshot::channel();

        let task = scheduler.schedule_delayed(
            std::time::Duration::from_millis(10),
            Box::new(move || {
                let _ = tx.send(());
            }),
        );

        timeout(WAIT, rx).await.unwrap().unwrap();
        assert!(!task.is_cancelled());
    }

    #[tokio::test]
    async fn test_tokio_scheduler_cancel() {
        let scheduler = TokioScheduler::current();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();

        let task = scheduler.schedule_delayed(
            std::time::Duration::from_millis(50),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        task.cancel();
        assert!(task.is_cancelled());

        tokio::time::sleep(std::time::Duration::from_millis(150)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_manual_scheduler_runs_on_demand() {
        let scheduler = ManualScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));

        for delay in [5, 10] {
            let counter = runs.clone();
            scheduler.schedule_delayed(
                std::time::Duration::from_secs(delay),
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }
        let cancelled = scheduler.schedule_delayed(std::time::Duration::from_secs(1), Box::new(|| {}));
        cancelled.cancel();

        assert_eq!(scheduler.pending(), 2);
        assert_eq!(
            scheduler.pending_delays(),
            vec![std::time::Duration::from_secs(5), std::time::Duration::from_secs(10)]
        );
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        assert_eq!(scheduler.run_pending(), 2);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test]
    async fn test_heartbeat_ticks_until_stopped() {
        let config = TrackerConfig {
            tick_interval: 10,
            breaks_enabled: false,
            ..TrackerConfig::default()
        };
        let started = std::time::Instant::now();
        let tracker = Tracker::new(&config, Arc::new(SystemClock::new()), Arc::new(ManualScheduler::new())).unwrap();
        tracker.start();

        let (stop_tx, stop_rx) = oneshot::channel();
        let heartbeat = tokio::spawn(tracker.clone().run_heartbeat(stop_rx));

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        stop_tx.send(()).unwrap();
        timeout(WAIT, heartbeat).await.unwrap().unwrap();
        let measured = Duration::from_std(started.elapsed()).unwrap();

        let status = tracker.status();
        assert!(status.active_duration > Duration::zero());
        assert!(status.active_duration + status.inactive_duration <= measured);

        let frozen = tracker.status().active_duration;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(tracker.status().active_duration, frozen);
    }

    #[tokio::test]
    async fn test_system_tracker_break_completes() {
        let config = TrackerConfig {
            tick_interval: 50,
            break_threshold: 1,
            break_duration: 1,
            ..TrackerConfig::default()
        };
        let tracker = Tracker::system(&config).unwrap();
        let mut events = tracker.subscribe();
        tracker.start();

        let (stop_tx, stop_rx) = oneshot::channel();
        let heartbeat = tokio::spawn(tracker.clone().run_heartbeat(stop_rx));

        let mut required = None;
        let finished = loop {
            match timeout(std::time::Duration::from_secs(5), events.recv())
                .await
                .expect("timed out waiting for break")
            {
                Ok(TrackerEvent::BreakRequired(id)) => required = Some(id),
                Ok(TrackerEvent::BreakFinished(id)) => break id,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(e) => panic!("event stream failed: {e}"),
            }
        };
        stop_tx.send(()).unwrap();
        timeout(WAIT, heartbeat).await.unwrap().unwrap();

        assert_eq!(required, Some(finished));
        assert_eq!(tracker.pending_break(), None);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();

        let mut previous = first;
        for _ in 0..1_000 {
            let reading = clock.now();
            assert!(reading >= previous);
            previous = reading;
        }

        std::thread::sleep(std::time::Duration::from_millis(20));
        assert!(clock.now() - first >= Duration::milliseconds(20));
    }
}
