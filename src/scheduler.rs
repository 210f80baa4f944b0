/// Handle for one pending frame callback. A token stays valid until it fires
/// or is cancelled; afterwards it never matches a live request again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

pub trait FrameScheduler {
    /// Ask for a callback on the next frame.
    fn request_frame(&mut self) -> FrameToken;

    fn cancel_frame(&mut self, token: FrameToken);
}

/// Frame requests collected during one frame and fired on the next.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameToken>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn is_pending(&self, token: FrameToken) -> bool {
        self.pending.contains(&token)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Takes every request made before this call. Requests made while the
    /// returned tokens are being handled wait for the following frame.
    pub fn fire(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken(self.next_id);
        self.pending.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending.retain(|pending| *pending != token);
    }
}
