use std::time::Duration;

use gpui::{AsyncApp, Context, Task, WeakEntity};

/// Runs the most recently scheduled callback once `delay` passes without another schedule.
pub struct Debounce {
    delay: Duration,
    scheduled: Option<Task<()>>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            scheduled: None,
        }
    }

    pub fn schedule<T: 'static>(
        &mut self,
        context: &mut Context<T>,
        run: impl FnOnce(&mut T, &mut Context<T>) + 'static,
    ) {
        let delay = self.delay;
        // dropping the previous task cancels it
        self.scheduled = Some(context.spawn(
            async move |this: WeakEntity<T>, context: &mut AsyncApp| {
                context.background_executor().timer(delay).await;
                if let Err(error) = this.update(context, run) {
                    log::warn!("[debounce] target released before refresh: {error}");
                }
            },
        ));
    }

    pub fn cancel(&mut self) {
        self.scheduled = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gpui::{AppContext, Context, Entity, TestAppContext};

    use super::Debounce;

    const DELAY: Duration = Duration::from_millis(20);

    struct Refreshes {
        debounce: Debounce,
        seen: Vec<u32>,
    }

    impl Refreshes {
        fn schedule(&mut self, value: u32, context: &mut Context<Self>) {
            self.debounce
                .schedule(context, move |this, _| this.seen.push(value));
        }
    }

    fn refreshes(cx: &mut TestAppContext) -> Entity<Refreshes> {
        cx.new(|_| Refreshes {
            debounce: Debounce::new(DELAY),
            seen: Vec::new(),
        })
    }

    fn settle(cx: &mut TestAppContext) {
        cx.run_until_parked();
        cx.executor().advance_clock(DELAY * 2);
        cx.run_until_parked();
    }

    #[gpui::test]
    fn newer_schedule_replaces_pending_one(cx: &mut TestAppContext) {
        let refreshes = refreshes(cx);
        refreshes.update(cx, |refreshes, context| {
            refreshes.schedule(1, context);
            refreshes.schedule(2, context);
        });
        settle(cx);
        refreshes.read_with(cx, |refreshes, _| assert_eq!(refreshes.seen, vec![2]));
    }

    #[gpui::test]
    fn nothing_runs_before_the_delay(cx: &mut TestAppContext) {
        let refreshes = refreshes(cx);
        refreshes.update(cx, |refreshes, context| refreshes.schedule(1, context));
        cx.run_until_parked();
        refreshes.read_with(cx, |refreshes, _| assert!(refreshes.seen.is_empty()));

        settle(cx);
        refreshes.read_with(cx, |refreshes, _| assert_eq!(refreshes.seen, vec![1]));
    }

    #[gpui::test]
    fn cancel_drops_scheduled_run(cx: &mut TestAppContext) {
        let refreshes = refreshes(cx);
        refreshes.update(cx, |refreshes, context| {
            refreshes.schedule(1, context);
            refreshes.debounce.cancel();
        });
        settle(cx);
        refreshes.read_with(cx, |refreshes, _| assert!(refreshes.seen.is_empty()));
    }
}
