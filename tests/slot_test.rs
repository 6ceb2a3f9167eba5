#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use promise_slot::{delay, failed, join_all, ready, Status};
    use std::time::{Duration, Instant};

    #[test]
    fn an_immediate_failure_unwraps_verbatim() {
        let handle = failed::<(), String>(String::from("E1"));
        assert_eq!(handle.waiter().take(), Err(String::from("E1")));
    }

    #[test]
    fn a_zero_delay_settles_on_the_next_opportunity() {
        let handle = delay::<String>(Duration::ZERO);
        assert_eq!(block_on(handle.waiter()), Ok(()));
        assert_eq!(handle.status(), Status::Succeeded);
    }

    #[test]
    fn a_join_completes_with_the_slowest_child_not_the_sum() {
        let started = Instant::now();
        let children = [
            delay::<String>(Duration::from_millis(200)),
            delay::<String>(Duration::from_millis(300)),
            delay::<String>(Duration::from_millis(100)),
        ];
        let joined = join_all(&children).unwrap();
        assert_eq!(block_on(joined.waiter()), Ok(()));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(300));
        assert!(
            elapsed < Duration::from_millis(550),
            "took {elapsed:?}; the children did not run independently"
        );
    }

    #[test]
    fn a_join_with_an_eager_child_waits_only_for_the_slow_one() {
        let started = Instant::now();
        let children = [ready::<String>(), delay(Duration::from_millis(50))];
        let joined = join_all(&children).unwrap();
        assert_eq!(block_on(joined.waiter()), Ok(()));
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn a_join_fails_without_waiting_for_pending_children() {
        let started = Instant::now();
        let children = [
            failed::<(), String>(String::from("first")),
            delay::<String>(Duration::from_millis(500)),
        ];
        let joined = join_all(&children).unwrap();
        assert_eq!(block_on(joined.waiter()), Err(String::from("first")));
        assert!(started.elapsed() < Duration::from_millis(200));
    }
}
