#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::*;

    #[derive(Default)]
    struct TestHost {
        calls: Vec<&'static str>,
        events: Vec<AccessibilityEvent>,
        pending_frames: u32,
        refuse_delayed: bool,
    }

    impl Host for TestHost {
        fn dispatch_accessibility_event(&mut self, event: AccessibilityEvent) {
            self.events.push(event);
        }

        fn request_invalidate(&mut self) {
            self.calls.push("invalidate");
        }

        fn post_frame_callback(&mut self) {
            self.calls.push("post_frame");
            self.pending_frames += 1;
        }

        fn remove_frame_callback(&mut self) {
            self.calls.push("remove_frame");
            self.pending_frames = 0;
        }

        fn post_delayed(&mut self, _delay: Duration) -> bool {
            self.calls.push("post_delayed");
            !self.refuse_delayed
        }

        fn remove_delayed_callbacks(&mut self) -> bool {
            self.calls.push("remove_delayed");
            true
        }

        fn location_on_screen(&self) -> (i32, i32) {
            (10, 20)
        }

        fn is_focused(&self) -> bool {
            true
        }

        fn show_soft_input(&mut self) {
            self.calls.push("show_soft_input");
        }

        fn hide_soft_input(&mut self) {
            self.calls.push("hide_soft_input");
        }

        fn restart_input(&mut self) {
            self.calls.push("restart_input");
        }
    }

    #[test]
    fn test_frame_posted_twice_is_pending_once() {
        let mut host = TestHost::default();
        let mut scheduler = CallbackScheduler::new();

        scheduler.post_frame(&mut host);
        scheduler.post_frame(&mut host);

        assert_eq!(host.pending_frames, 1);
        assert!(scheduler.frame_fired());
        // A second firing of a callback that is no longer pending is stale.
        assert!(!scheduler.frame_fired());
    }

    #[test]
    fn test_removed_frame_does_not_fire() {
        let mut host = TestHost::default();
        let mut scheduler = CallbackScheduler::new();

        scheduler.post_frame(&mut host);
        scheduler.remove_frame(&mut host);

        assert_eq!(host.pending_frames, 0);
        assert!(!scheduler.frame_fired());
    }

    #[test]
    fn test_refused_delayed_is_not_pending() {
        let mut host = TestHost {
            refuse_delayed: true,
            ..TestHost::default()
        };
        let mut scheduler = CallbackScheduler::new();

        assert!(!scheduler.post_delayed(&mut host, Duration::from_millis(50)));
        assert!(!scheduler.delayed_pending());
        assert_eq!(host.calls, ["remove_delayed", "post_delayed"]);
    }

    #[test]
    fn test_cancel_all_clears_both() {
        let mut host = TestHost::default();
        let mut scheduler = CallbackScheduler::new();
        scheduler.post_frame(&mut host);
        scheduler.post_delayed(&mut host, Duration::from_millis(5));

        scheduler.cancel_all(&mut host);

        assert!(!scheduler.frame_pending());
        assert!(!scheduler.delayed_pending());
    }

    #[test]
    fn test_soft_input_runs_after_finish() {
        let mut host = TestHost::default();
        let mut scheduler = CallbackScheduler::new();

        let mut ctx = CallbackCtx::new(&mut host, &mut scheduler);
        ctx.show_soft_input();
        ctx.request_invalidate();
        ctx.restart_input();
        ctx.finish();

        assert_eq!(host.calls, ["invalidate", "show_soft_input", "restart_input"]);
    }

    #[test]
    fn test_ctx_text_changed_skips_identical() {
        let mut host = TestHost::default();
        let mut scheduler = CallbackScheduler::new();

        let mut ctx = CallbackCtx::new(&mut host, &mut scheduler);
        assert!(!ctx.send_text_changed(VirtualViewId(1), "same", "same"));
        assert!(ctx.send_text_changed(VirtualViewId(1), "same", "sane"));
        ctx.finish();

        assert_eq!(host.events.len(), 1);
        assert_eq!(host.events[0].from_index, Some(2));
    }

    #[test]
    fn test_ctx_exposes_host_queries() {
        let mut host = TestHost::default();
        let mut scheduler = CallbackScheduler::new();

        let ctx = CallbackCtx::new(&mut host, &mut scheduler);
        assert_eq!(ctx.location_on_screen(), (10, 20));
        assert!(ctx.is_focused());
    }

    #[test]
    fn test_measure_spec_modes() {
        let spec = MeasureSpec::at_most(300);
        assert_eq!(spec.mode(), MeasureMode::AtMost);
        assert_eq!(spec.size(), 300);
        assert_eq!(spec.resolve_size(500), 300);
        assert_eq!(spec.resolve_size(120), 120);
        assert_eq!(spec.default_size(42), 300);

        let spec = MeasureSpec::exactly(64);
        assert_eq!(spec.resolve_size(500), 64);

        let spec = MeasureSpec::unspecified();
        assert_eq!(spec.resolve_size(500), 500);
        assert_eq!(spec.default_size(42), 42);

        assert_eq!(MeasureSpec::exactly(10).0, (1 << 30) | 10);
    }

    #[test]
    fn test_default_host_measure_uses_default_size() {
        let mut host = TestHost::default();
        let size = host.default_measure(MeasureSpec::exactly(200), MeasureSpec::unspecified());
        assert_eq!(size, (200, 0));
    }

    #[test]
    fn test_motion_action_masks_pointer_index() {
        assert_eq!(MotionAction::from_masked(0x0105), MotionAction::PointerDown);
        assert!(MotionAction::HoverMove.is_hover());
        assert!(!MotionAction::Move.is_hover());
    }

    #[test]
    fn test_virtual_child() {
        assert_eq!(HOST_ROOT.virtual_child(), None);
        assert_eq!(VirtualViewId(7).virtual_child(), Some(VirtualViewId(7)));
        assert_eq!(HOST_ROOT.to_string(), "host");
        assert_eq!(VirtualViewId(7).to_string(), "v7");
    }

    #[test]
    fn test_rect_offset_and_contains() {
        let r = IntRect::new(0, 0, 10, 10).offset(5, 5);
        assert_eq!(r, IntRect::new(5, 5, 15, 15));
        assert!(r.contains(Vec2 { x: 5.0, y: 14.9 }));
        assert!(!r.contains(Vec2 { x: 15.0, y: 6.0 }));
    }
}
