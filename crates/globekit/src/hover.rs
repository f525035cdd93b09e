use crate::config::DeviceClass;

/// Cursor style the host should show. Only the host touches window state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorRequest {
    Pointer,
    Default,
    /// Touch devices have no cursor to change
    #[default]
    Unchanged,
}

/// A change of hover ownership that must be reported to the host exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTransition<K> {
    /// `marker` now owns the hover. `replaced` lost it without a leave of its own.
    Entered { marker: K, replaced: Option<K> },
    Left { marker: K },
}

impl<K> HoverTransition<K> {
    pub fn cursor(&self, device: DeviceClass) -> CursorRequest {
        match (device, self) {
            (DeviceClass::Mobile, _) => CursorRequest::Unchanged,
            (DeviceClass::Desktop, HoverTransition::Entered { .. }) => CursorRequest::Pointer,
            (DeviceClass::Desktop, HoverTransition::Left { .. }) => CursorRequest::Default,
        }
    }
}

/// Single owner of the shared hover callback.
///
/// Overlapping markers can deliver enter(B) before leave(A); the last enter
/// wins and the stale leave is swallowed, so at most one marker is hovered.
#[derive(Debug, Clone)]
pub struct HoverRouter<K> {
    owner: Option<K>,
}

impl<K> Default for HoverRouter<K> {
    fn default() -> Self {
        Self { owner: None }
    }
}

impl<K: Copy + PartialEq> HoverRouter<K> {
    pub fn owner(&self) -> Option<K> {
        self.owner
    }

    pub fn is_hovered(&self, marker: K) -> bool {
        self.owner == Some(marker)
    }

    pub fn enter(&mut self, marker: K) -> HoverTransition<K> {
        let replaced = self.owner.replace(marker).filter(|prev| *prev != marker);
        HoverTransition::Entered { marker, replaced }
    }

    /// `None` when `marker` does not own the hover (stale or duplicate leave).
    pub fn leave(&mut self, marker: K) -> Option<HoverTransition<K>> {
        if self.owner == Some(marker) {
            self.owner = None;
            Some(HoverTransition::Left { marker })
        } else {
            None
        }
    }

    /// Marker is going away (filtered out); close its hover if it had one.
    pub fn remove(&mut self, marker: K) -> Option<HoverTransition<K>> {
        self.leave(marker)
    }

    /// Fold one frame's pick result in. Only a change of target produces a transition.
    pub fn track(&mut self, hit: Option<K>) -> Option<HoverTransition<K>> {
        match (self.owner, hit) {
            (current, next) if current == next => None,
            (_, Some(next)) => Some(self.enter(next)),
            (Some(current), None) => self.leave(current),
            (None, None) => None,
        }
    }

    /// Close whatever hover is open before the engine goes away.
    pub fn teardown(&mut self) -> Option<HoverTransition<K>> {
        self.owner.take().map(|marker| HoverTransition::Left { marker })
    }
}
