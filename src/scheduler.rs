use std::fmt;

pub type TimerId = i64;

/// Default delay between animation frames, in milliseconds.
pub(crate) const FRAME_DELAY_MS: i64 = 16;

/// Deferred controller work. Tasks are data so that any [`Scheduler`]
/// implementation can queue them without owning callbacks.
///
/// `generation` names the `init` that queued the task; a task from an
/// earlier generation is dropped when it comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Recompute the navigation bar's scrolled state.
    ScrollEffectFrame { generation: u64 },
    /// Advance one in-flight smooth-scroll animation.
    SmoothScrollFrame { generation: u64, animation: u64 },
    /// Recompute which navigation link is active.
    ActiveNavRecompute { generation: u64 },
}

impl Task {
    pub fn generation(&self) -> u64 {
        match *self {
            Self::ScrollEffectFrame { generation }
            | Self::SmoothScrollFrame { generation, .. }
            | Self::ActiveNavRecompute { generation } => generation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Timeout,
    AnimationFrame,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TimerId,
    pub due_at: i64,
    pub order: i64,
    pub kind: TaskKind,
    pub task: Task,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: TimerId,
    pub due_at: i64,
    pub order: i64,
    pub kind: TaskKind,
    pub task: Task,
}

/// The "run on next frame" / "run after delay" capability the controllers
/// depend on, plus the clock they read.
///
/// Tasks due at the same time run in scheduling order.
pub trait Scheduler: fmt::Debug {
    fn now_ms(&self) -> i64;

    /// Moves the clock. Implementations may refuse to go backwards.
    fn set_now_ms(&mut self, now_ms: i64);

    fn set_timeout(&mut self, task: Task, delay_ms: i64) -> TimerId;

    fn request_animation_frame(&mut self, task: Task) -> TimerId;

    fn cancel(&mut self, id: TimerId) -> bool;

    fn clear_all(&mut self) -> usize;

    /// Pending work sorted by `(due_at, order)`.
    fn pending(&self) -> Vec<PendingTimer>;

    /// Removes and returns the earliest task, optionally only if it is due
    /// at or before `due_limit`.
    fn take_next(&mut self, due_limit: Option<i64>) -> Option<ScheduledTask>;
}

/// Deterministic scheduler driven by a virtual millisecond clock.
#[derive(Debug)]
pub struct VirtualScheduler {
    task_queue: Vec<ScheduledTask>,
    now_ms: i64,
    frame_interval_ms: i64,
    next_timer_id: TimerId,
    next_task_order: i64,
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::new(FRAME_DELAY_MS)
    }
}

impl VirtualScheduler {
    pub fn new(frame_interval_ms: i64) -> Self {
        Self {
            task_queue: Vec::new(),
            now_ms: 0,
            frame_interval_ms: frame_interval_ms.max(1),
            next_timer_id: 1,
            next_task_order: 0,
        }
    }

    pub fn frame_interval_ms(&self) -> i64 {
        self.frame_interval_ms
    }

    fn allocate_timer_id(&mut self) -> TimerId {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        id
    }

    fn allocate_task_order(&mut self) -> i64 {
        let order = self.next_task_order;
        self.next_task_order += 1;
        order
    }

    fn push(&mut self, task: Task, kind: TaskKind, delay_ms: i64) -> TimerId {
        let due_at = self.now_ms.saturating_add(delay_ms.max(0));
        let id = self.allocate_timer_id();
        let order = self.allocate_task_order();
        self.task_queue.push(ScheduledTask {
            id,
            due_at,
            order,
            kind,
            task,
        });
        id
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }
}

impl Scheduler for VirtualScheduler {
    fn now_ms(&self) -> i64 {
        self.now_ms
    }

    fn set_now_ms(&mut self, now_ms: i64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn set_timeout(&mut self, task: Task, delay_ms: i64) -> TimerId {
        self.push(task, TaskKind::Timeout, delay_ms)
    }

    fn request_animation_frame(&mut self, task: Task) -> TimerId {
        self.push(task, TaskKind::AnimationFrame, self.frame_interval_ms)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.task_queue.len();
        self.task_queue.retain(|task| task.id != id);
        self.task_queue.len() != before
    }

    fn clear_all(&mut self) -> usize {
        let cleared = self.task_queue.len();
        self.task_queue.clear();
        cleared
    }

    fn pending(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
                kind: task.kind,
                task: task.task,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    fn take_next(&mut self, due_limit: Option<i64>) -> Option<ScheduledTask> {
        let idx = self.next_task_index(due_limit)?;
        Some(self.task_queue.remove(idx))
    }
}
