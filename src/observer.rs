use super::*;

/// Observation options: `threshold` is the visible fraction that counts as
/// intersecting, `root_margin_bottom` grows (or, when negative, shrinks)
/// the bottom edge of the viewport rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionOptions {
    pub threshold: f64,
    pub root_margin_bottom: f64,
}

impl Default for IntersectionOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin_bottom: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ObserverOwner {
    Media,
    Entrance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ObservationId(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct IntersectionEntry {
    pub(crate) target: NodeId,
    pub(crate) ratio: f64,
    pub(crate) is_intersecting: bool,
}

#[derive(Debug, Clone)]
struct Observation {
    id: ObservationId,
    owner: ObserverOwner,
    target: NodeId,
    options: IntersectionOptions,
    last_intersecting: Option<bool>,
}

#[derive(Debug, Default)]
pub(crate) struct ObserverRegistry {
    observations: Vec<Observation>,
    next_id: u64,
}

pub(crate) fn is_intersecting(ratio: f64, threshold: f64) -> bool {
    ratio > 0.0 && ratio >= threshold
}

/// Visible fraction of `layout` inside `[view_top, view_bottom)`.
pub(crate) fn intersection_ratio(layout: Option<LayoutBox>, view_top: f64, view_bottom: f64) -> f64 {
    let Some(layout) = layout else {
        return 0.0;
    };
    let top = layout.top;
    let bottom = layout.top + layout.height.max(0.0);
    if layout.height <= 0.0 {
        return if top >= view_top && top < view_bottom { 1.0 } else { 0.0 };
    }
    let overlap = bottom.min(view_bottom) - top.max(view_top);
    if overlap <= 0.0 {
        0.0
    } else {
        (overlap / layout.height).clamp(0.0, 1.0)
    }
}

impl ObserverRegistry {
    pub(crate) fn observe(
        &mut self,
        owner: ObserverOwner,
        target: NodeId,
        options: IntersectionOptions,
    ) -> ObservationId {
        self.next_id += 1;
        let id = ObservationId(self.next_id);
        self.observations.push(Observation {
            id,
            owner,
            target,
            options,
            last_intersecting: None,
        });
        id
    }

    pub(crate) fn unobserve(&mut self, owner: ObserverOwner, target: NodeId) -> usize {
        let before = self.observations.len();
        self.observations
            .retain(|observation| !(observation.owner == owner && observation.target == target));
        before - self.observations.len()
    }

    pub(crate) fn remove(&mut self, id: ObservationId) -> bool {
        let before = self.observations.len();
        self.observations.retain(|observation| observation.id != id);
        self.observations.len() != before
    }

    pub(crate) fn is_observing(&self, target: NodeId) -> bool {
        self.observations
            .iter()
            .any(|observation| observation.target == target)
    }

    pub(crate) fn len(&self) -> usize {
        self.observations.len()
    }

    /// Entries for observations seen for the first time or whose
    /// intersecting state flipped since the last evaluation.
    pub(crate) fn collect_changes<F>(&mut self, ratio_of: F) -> Vec<(ObserverOwner, IntersectionEntry)>
    where
        F: Fn(NodeId, &IntersectionOptions) -> f64,
    {
        let mut out = Vec::new();
        for observation in &mut self.observations {
            let ratio = ratio_of(observation.target, &observation.options);
            let intersecting = is_intersecting(ratio, observation.options.threshold);
            if observation.last_intersecting == Some(intersecting) {
                continue;
            }
            observation.last_intersecting = Some(intersecting);
            out.push((
                observation.owner,
                IntersectionEntry {
                    target: observation.target,
                    ratio,
                    is_intersecting: intersecting,
                },
            ));
        }
        out
    }

    /// Unconditional entries for every observation of `target`.
    pub(crate) fn forced(&mut self, target: NodeId, ratio: f64) -> Vec<(ObserverOwner, IntersectionEntry)> {
        let ratio = ratio.clamp(0.0, 1.0);
        self.observations
            .iter_mut()
            .filter(|observation| observation.target == target)
            .map(|observation| {
                let intersecting = is_intersecting(ratio, observation.options.threshold);
                observation.last_intersecting = Some(intersecting);
                (
                    observation.owner,
                    IntersectionEntry {
                        target,
                        ratio,
                        is_intersecting: intersecting,
                    },
                )
            })
            .collect()
    }
}
