use super::*;

const HIDDEN_OPACITY: &str = "0";
const HIDDEN_TRANSFORM: &str = "translateY(30px)";
const REVEAL_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RevealState {
    Pending,
    Revealed,
}

/// One-shot reveal of content blocks as they scroll into view.
#[derive(Debug)]
pub(crate) struct EntranceController {
    states: HashMap<NodeId, RevealState>,
    pub(crate) subscriptions: Vec<Subscription>,
}

impl EntranceController {
    pub(crate) fn init(host: &mut Host, config: &PageConfig) -> Result<Option<Self>> {
        let elements = host.query_all(&config.animated_selector)?;
        if elements.is_empty() {
            return Ok(None);
        }

        let options = IntersectionOptions {
            threshold: config.reveal_threshold,
            root_margin_bottom: config.reveal_root_margin_bottom,
        };
        let mut states = HashMap::new();
        let mut subscriptions = Vec::with_capacity(elements.len());
        for element in elements {
            host.dom.style_set(element, "opacity", HIDDEN_OPACITY)?;
            host.dom.style_set(element, "transform", HIDDEN_TRANSFORM)?;
            host.dom.style_set(element, "transition", REVEAL_TRANSITION)?;
            subscriptions.push(host.observe(ObserverOwner::Entrance, element, options));
            states.insert(element, RevealState::Pending);
        }
        Ok(Some(Self { states, subscriptions }))
    }

    pub(crate) fn on_intersection(&mut self, host: &mut Host, entry: IntersectionEntry) -> Result<()> {
        if !entry.is_intersecting {
            return Ok(());
        }
        let Some(state) = self.states.get_mut(&entry.target) else {
            return Ok(());
        };
        if *state == RevealState::Revealed {
            return Ok(());
        }
        *state = RevealState::Revealed;

        host.dom.class_add(entry.target, "visible")?;
        host.dom.style_set(entry.target, "opacity", "1")?;
        host.dom.style_set(entry.target, "transform", "translateY(0)")?;
        host.observers.unobserve(ObserverOwner::Entrance, entry.target);
        let label = host.dom.node_label(entry.target);
        host.trace_line(format!("[entrance] revealed {label}"));
        Ok(())
    }

    pub(crate) fn state_of(&self, node: NodeId) -> Option<RevealState> {
        self.states.get(&node).copied()
    }
}
