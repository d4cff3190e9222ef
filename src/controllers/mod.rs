use super::*;

pub(crate) mod active_nav;
pub(crate) mod entrance;
pub(crate) mod media;
pub(crate) mod menu;
pub(crate) mod scroll_effect;
pub(crate) mod smooth_scroll;

use active_nav::ActiveNavController;
use entrance::EntranceController;
use media::MediaController;
use menu::MenuController;
use scroll_effect::ScrollEffectController;
use smooth_scroll::SmoothScrollController;

/// The composition root. A controller whose required elements are missing
/// stays `None` and never registers anything.
#[derive(Debug, Default)]
pub(crate) struct Controllers {
    generation: u64,
    pub(crate) menu: Option<MenuController>,
    pub(crate) scroll_effect: Option<ScrollEffectController>,
    pub(crate) smooth_scroll: Option<SmoothScrollController>,
    pub(crate) active_nav: Option<ActiveNavController>,
    pub(crate) media: Option<MediaController>,
    pub(crate) entrance: Option<EntranceController>,
}

impl Controllers {
    pub(crate) fn init(host: &mut Host, config: &PageConfig) -> Result<Self> {
        host.generation += 1;
        let controllers = Self {
            generation: host.generation,
            menu: MenuController::init(host, config)?,
            scroll_effect: ScrollEffectController::init(host, config)?,
            smooth_scroll: SmoothScrollController::init(host, config)?,
            active_nav: ActiveNavController::init(host, config)?,
            media: MediaController::init(host, config)?,
            entrance: EntranceController::init(host, config)?,
        };
        host.trace_line(format!(
            "[init] generation={} menu={} scroll_effect={} smooth_scroll={} active_nav={} media={} entrance={}",
            controllers.generation,
            controllers.menu.is_some(),
            controllers.scroll_effect.is_some(),
            controllers.smooth_scroll.is_some(),
            controllers.active_nav.is_some(),
            controllers.media.is_some(),
            controllers.entrance.is_some(),
        ));
        Ok(controllers)
    }

    pub(crate) fn handle_event(&mut self, host: &mut Host, handler: Handler, event: &mut EventState) -> Result<()> {
        match handler {
            Handler::ToggleMenu
            | Handler::CloseMenuFromLink
            | Handler::CloseMenuOnOutsideClick
            | Handler::CloseMenuOnEscape => match self.menu.as_mut() {
                Some(menu) => menu.handle_event(host, handler, event),
                None => Ok(()),
            },
            Handler::ScrollEffect => {
                if let Some(scroll_effect) = self.scroll_effect.as_mut() {
                    scroll_effect.on_scroll(host);
                }
                Ok(())
            }
            Handler::SmoothScrollAnchor => match self.smooth_scroll.as_mut() {
                Some(smooth_scroll) => smooth_scroll.on_anchor_click(host, event),
                None => Ok(()),
            },
            Handler::ActiveNavScroll => {
                if let Some(active_nav) = self.active_nav.as_mut() {
                    active_nav.on_scroll(host);
                }
                Ok(())
            }
            Handler::MediaLoadError => match self.media.as_mut() {
                Some(media) => media.on_load_error(host),
                None => Ok(()),
            },
        }
    }

    /// Runs a scheduled task. `timestamp` is the task's due time, which is
    /// what animation-frame callbacks receive. Tasks queued before the last
    /// teardown are dropped.
    pub(crate) fn run_task(&mut self, host: &mut Host, task: Task, timestamp: i64) -> Result<()> {
        if task.generation() != self.generation {
            host.trace_timer_line(format!(
                "[timer] drop stale task={task:?} generation={}",
                self.generation
            ));
            return Ok(());
        }
        match task {
            Task::ScrollEffectFrame { .. } => match self.scroll_effect.as_mut() {
                Some(scroll_effect) => scroll_effect.on_frame(host),
                None => Ok(()),
            },
            Task::SmoothScrollFrame { animation, .. } => match self.smooth_scroll.as_mut() {
                Some(smooth_scroll) => {
                    smooth_scroll.on_frame(host, animation, timestamp);
                    Ok(())
                }
                None => Ok(()),
            },
            Task::ActiveNavRecompute { .. } => match self.active_nav.as_mut() {
                Some(active_nav) => active_nav.on_timer(host),
                None => Ok(()),
            },
        }
    }

    pub(crate) fn deliver_intersection(
        &mut self,
        host: &mut Host,
        owner: ObserverOwner,
        entry: IntersectionEntry,
    ) -> Result<()> {
        match owner {
            ObserverOwner::Media => match self.media.as_mut() {
                Some(media) => media.on_intersection(host, entry),
                None => Ok(()),
            },
            ObserverOwner::Entrance => match self.entrance.as_mut() {
                Some(entrance) => entrance.on_intersection(host, entry),
                None => Ok(()),
            },
        }
    }

    pub(crate) fn teardown(self, host: &mut Host) {
        let subscriptions = [
            self.menu.map(|c| c.subscriptions),
            self.scroll_effect.map(|c| c.subscriptions),
            self.smooth_scroll.map(|c| c.subscriptions),
            self.active_nav.map(|c| c.subscriptions),
            self.media.map(|c| c.subscriptions),
            self.entrance.map(|c| c.subscriptions),
        ];
        let mut released = 0usize;
        for subscription in subscriptions.into_iter().flatten().flatten() {
            host.unsubscribe(subscription);
            released += 1;
        }
        host.trace_line(format!("[teardown] released={released}"));
    }

    pub(crate) fn is_menu_open(&self) -> bool {
        self.menu.as_ref().is_some_and(|menu| menu.is_open())
    }
}
