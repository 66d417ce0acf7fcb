/// Polls `condition` until it holds, sleeping `duration` between checks.
/// Panics once `attempts` checks have failed.
#[macro_export]
macro_rules! await_async_for {
    ($condition: expr, $attempts: literal, $duration: expr) => {{
        let mut attempts_ = $attempts;
        loop {
            if $condition {
                break;
            };
            if attempts_ == 0 {
                panic!("No attempts left, but the condition is not satisfied");
            };
            attempts_ -= 1;
            tokio::time::sleep($duration).await;
        }
    }};
}
