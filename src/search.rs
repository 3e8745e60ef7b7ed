use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Search box text that is only handed to the listing once typing pauses.
#[derive(Debug, Clone)]
pub struct DebouncedInput {
    draft: String,
    committed: String,
    last_edit: Option<Instant>,
    delay: Duration,
}

impl DebouncedInput {
    pub fn new(delay: Duration) -> Self {
        Self {
            draft: String::new(),
            committed: String::new(),
            last_edit: None,
            delay,
        }
    }

    pub fn text(&self) -> &str {
        &self.draft
    }

    pub fn push(&mut self, c: char, now: Instant) {
        self.draft.push(c);
        self.last_edit = Some(now);
    }

    pub fn pop(&mut self, now: Instant) {
        if self.draft.pop().is_some() {
            self.last_edit = Some(now);
        }
    }

    pub fn clear(&mut self, now: Instant) {
        if !self.draft.is_empty() {
            self.draft.clear();
            self.last_edit = Some(now);
        }
    }

    /// Returns the draft once it has been quiet for the debounce delay and
    /// differs from what was last committed.
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        let edited = self.last_edit?;
        if now.duration_since(edited) < self.delay {
            return None;
        }
        self.last_edit = None;
        if self.draft == self.committed {
            return None;
        }
        self.committed = self.draft.clone();
        Some(&self.committed)
    }

    /// Commits immediately, e.g. when the user presses Enter.
    pub fn flush(&mut self) -> Option<&str> {
        self.last_edit = None;
        if self.draft == self.committed {
            return None;
        }
        self.committed = self.draft.clone();
        Some(&self.committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waits_for_quiet_period() {
        let start = Instant::now();
        let mut input = DebouncedInput::new(DEFAULT_DEBOUNCE);
        input.push('a', start);
        input.push('l', start + Duration::from_millis(100));

        assert_eq!(input.poll(start + Duration::from_millis(350)), None);
        assert_eq!(input.poll(start + Duration::from_millis(400)), Some("al"));
        assert_eq!(input.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_edit_back_to_committed_value_is_silent() {
        let start = Instant::now();
        let mut input = DebouncedInput::new(DEFAULT_DEBOUNCE);
        input.push('a', start);
        assert_eq!(input.flush(), Some("a"));

        input.push('b', start);
        input.pop(start);
        assert_eq!(input.poll(start + Duration::from_secs(1)), None);
        assert_eq!(input.text(), "a");
    }

    #[test]
    fn test_clear_commits_empty() {
        let start = Instant::now();
        let mut input = DebouncedInput::new(Duration::ZERO);
        input.push('x', start);
        input.poll(start);
        input.clear(start);
        assert_eq!(input.poll(start), Some(""));
    }

    #[test]
    fn test_nothing_typed() {
        let mut input = DebouncedInput::new(DEFAULT_DEBOUNCE);
        assert_eq!(input.poll(Instant::now()), None);
        assert_eq!(input.flush(), None);
    }
}
