use std::fmt;

/// Trailing-edge debounce driven by the caller's clock.
///
/// Every `call` replaces the pending arguments and pushes the deadline to
/// `now + wait`; `poll` fires the wrapped function once the deadline has
/// been reached.
///
/// ```
/// use page_behavior::Debounce;
///
/// let mut hits = Vec::new();
/// let mut debounced = Debounce::new(100, |value: u32| hits.push(value));
/// debounced.call(0, 1);
/// debounced.call(40, 2);
/// assert!(!debounced.poll(139));
/// assert!(debounced.poll(140));
/// drop(debounced);
/// assert_eq!(hits, vec![2]);
/// ```
pub struct Debounce<A, F>
where
    F: FnMut(A),
{
    wait_ms: i64,
    func: F,
    pending: Option<(i64, A)>,
}

impl<A, F> Debounce<A, F>
where
    F: FnMut(A),
{
    pub fn new(wait_ms: i64, func: F) -> Self {
        Self {
            wait_ms: wait_ms.max(0),
            func,
            pending: None,
        }
    }

    pub fn wait_ms(&self) -> i64 {
        self.wait_ms
    }

    pub fn call(&mut self, now_ms: i64, args: A) {
        self.pending = Some((now_ms.saturating_add(self.wait_ms), args));
    }

    /// Returns `true` when the wrapped function ran.
    pub fn poll(&mut self, now_ms: i64) -> bool {
        match self.pending.take() {
            Some((deadline, args)) if now_ms >= deadline => {
                (self.func)(args);
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    pub fn next_deadline(&self) -> Option<i64> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

impl<A, F> fmt::Debug for Debounce<A, F>
where
    F: FnMut(A),
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounce")
            .field("wait_ms", &self.wait_ms)
            .field("next_deadline", &self.next_deadline())
            .finish()
    }
}

/// Leading-edge throttle: the first call runs immediately, later calls are
/// dropped until `limit` has elapsed since the last run.
pub struct Throttle<A, F>
where
    F: FnMut(A),
{
    limit_ms: i64,
    func: F,
    last_run: Option<i64>,
    _args: std::marker::PhantomData<fn(A)>,
}

impl<A, F> Throttle<A, F>
where
    F: FnMut(A),
{
    pub fn new(limit_ms: i64, func: F) -> Self {
        Self {
            limit_ms: limit_ms.max(0),
            func,
            last_run: None,
            _args: std::marker::PhantomData,
        }
    }

    pub fn limit_ms(&self) -> i64 {
        self.limit_ms
    }

    /// Returns `true` when the wrapped function ran.
    pub fn call(&mut self, now_ms: i64, args: A) -> bool {
        let open = self
            .last_run
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.limit_ms);
        if !open {
            return false;
        }
        self.last_run = Some(now_ms);
        (self.func)(args);
        true
    }
}

impl<A, F> fmt::Debug for Throttle<A, F>
where
    F: FnMut(A),
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttle")
            .field("limit_ms", &self.limit_ms)
            .field("last_run", &self.last_run)
            .finish()
    }
}
