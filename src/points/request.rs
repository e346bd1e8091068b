/// Identifies one point request by the order it was triggered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Tracks the most recently triggered request.
///
/// Responses are accepted by trigger order, not arrival order: only the
/// holder of the newest token may apply its result.
#[derive(Debug, Default)]
pub struct LatestRequest {
    issued: u64,
    in_flight: bool,
}

impl LatestRequest {
    pub const fn new() -> Self {
        Self {
            issued: 0,
            in_flight: false,
        }
    }

    /// Start a new request, superseding any request still in flight.
    pub const fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        self.in_flight = true;
        RequestToken(self.issued)
    }

    pub const fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.issued
    }

    /// Settle the request for `token`. Returns false for superseded tokens,
    /// whose result must be dropped.
    pub const fn complete(&mut self, token: RequestToken) -> bool {
        if !self.is_latest(token) {
            return false;
        }
        self.in_flight = false;
        true
    }

    pub const fn in_flight(&self) -> bool {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_token_is_accepted() {
        let mut requests = LatestRequest::new();
        let token = requests.issue();

        assert!(requests.in_flight());
        assert!(requests.complete(token));
        assert!(!requests.in_flight());
    }

    #[test]
    fn test_superseded_token_is_rejected_in_any_arrival_order() {
        let mut requests = LatestRequest::new();
        let first = requests.issue();
        let second = requests.issue();

        assert!(requests.complete(second));
        assert!(!requests.complete(first));

        let third = requests.issue();
        let fourth = requests.issue();
        assert!(!requests.complete(third));
        assert!(requests.in_flight());
        assert!(requests.complete(fourth));
    }
}
