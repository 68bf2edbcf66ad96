/// Consumed-or-default: the peer answers first; the host default runs only
/// if the peer did not consume the event.
pub fn consumed_or_default(peer_consumed: bool, host_default: impl FnOnce() -> bool) -> bool {
    peer_consumed || host_default()
}

/// The peer's measurement if it has one, the host default otherwise.
pub fn measured_or_default(
    peer: Option<(i32, i32)>,
    host_default: impl FnOnce() -> (i32, i32),
) -> (i32, i32) {
    peer.unwrap_or_else(host_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_skipped_when_consumed() {
        let mut ran = false;
        assert!(consumed_or_default(true, || {
            ran = true;
            false
        }));
        assert!(!ran);
    }

    #[test]
    fn default_decides_when_not_consumed() {
        assert!(consumed_or_default(false, || true));
        assert!(!consumed_or_default(false, || false));
    }

    #[test]
    fn measurement_falls_back() {
        assert_eq!(measured_or_default(Some((4, 5)), || (0, 0)), (4, 5));
        assert_eq!(measured_or_default(None, || (7, 8)), (7, 8));
    }
}
