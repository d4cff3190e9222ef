use super::*;

/// Mobile navigation menu. The open flag is mirrored on the trigger, the
/// panel, the navigation bar, `aria-expanded` and the body scroll lock.
#[derive(Debug)]
pub(crate) struct MenuController {
    trigger: NodeId,
    panel: NodeId,
    navbar: Option<NodeId>,
    body: Option<NodeId>,
    open: bool,
    pub(crate) subscriptions: Vec<Subscription>,
}

impl MenuController {
    pub(crate) fn init(host: &mut Host, config: &PageConfig) -> Result<Option<Self>> {
        let trigger = host.query(&config.menu_trigger_selector)?;
        let panel = host.query(&config.menu_panel_selector)?;
        let (Some(trigger), Some(panel)) = (trigger, panel) else {
            return Ok(None);
        };
        let navbar = host.query(&config.navbar_selector)?;
        let body = host.dom.body();

        if host.dom.attr(trigger, "aria-expanded").is_none() {
            host.dom.set_attr(trigger, "aria-expanded", "false")?;
        }

        let root = host.dom.root;
        let mut subscriptions = vec![host.add_listener(EventTarget::Node(trigger), "click", Handler::ToggleMenu)];
        for link in host.query_all(&config.nav_link_selector)? {
            subscriptions.push(host.add_listener(EventTarget::Node(link), "click", Handler::CloseMenuFromLink));
        }
        subscriptions.push(host.add_listener(
            EventTarget::Node(root),
            "click",
            Handler::CloseMenuOnOutsideClick,
        ));
        subscriptions.push(host.add_listener(EventTarget::Node(root), "keydown", Handler::CloseMenuOnEscape));

        Ok(Some(Self {
            trigger,
            panel,
            navbar,
            body,
            open: false,
            subscriptions,
        }))
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn handle_event(&mut self, host: &mut Host, handler: Handler, event: &EventState) -> Result<()> {
        match handler {
            Handler::ToggleMenu => self.toggle(host),
            Handler::CloseMenuFromLink => self.close(host),
            Handler::CloseMenuOnOutsideClick => {
                let Some(target) = event.target_node() else {
                    return Ok(());
                };
                let inside = host.dom.contains(self.trigger, target) || host.dom.contains(self.panel, target);
                if self.open && !inside {
                    self.close(host)?;
                }
                Ok(())
            }
            Handler::CloseMenuOnEscape => {
                if self.open && event.key.as_deref() == Some("Escape") {
                    self.close(host)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn toggle(&mut self, host: &mut Host) -> Result<()> {
        self.apply(host, !self.open)
    }

    /// Idempotent.
    pub(crate) fn close(&mut self, host: &mut Host) -> Result<()> {
        self.apply(host, false)
    }

    fn apply(&mut self, host: &mut Host, open: bool) -> Result<()> {
        self.open = open;
        host.dom.class_set(self.trigger, "active", open)?;
        host.dom.class_set(self.panel, "active", open)?;
        if let Some(navbar) = self.navbar {
            host.dom.class_set(navbar, "menu-open", open)?;
        }
        host.dom
            .set_attr(self.trigger, "aria-expanded", if open { "true" } else { "false" })?;
        if let Some(body) = self.body {
            host.dom.style_set(body, "overflow", if open { "hidden" } else { "" })?;
        }
        host.trace_line(format!("[menu] open={open}"));
        Ok(())
    }
}
