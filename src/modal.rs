//! Detail modal lifecycle and the global input bindings it owns.
//!
//! While the detail view is mounted it listens for two global inputs: a
//! pointer-down anywhere outside its panel and the Escape key. Both are
//! registered in `Listeners` when the view mounts and released when it
//! unmounts. `DetailView::unmount` consumes the view, so a closed modal can
//! never keep a binding alive.

use std::collections::BTreeMap;

/// Global inputs a mounted view can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GlobalBinding {
    OutsidePointerDown,
    Escape,
}

/// Registry of active global bindings, reference-counted per binding.
#[derive(Debug, Default)]
pub struct Listeners {
    active: BTreeMap<GlobalBinding, usize>,
}

impl Listeners {
    pub fn register(&mut self, binding: GlobalBinding) {
        *self.active.entry(binding).or_insert(0) += 1;
    }

    pub fn unregister(&mut self, binding: GlobalBinding) {
        if let Some(count) = self.active.get_mut(&binding) {
            *count -= 1;
            if *count == 0 {
                self.active.remove(&binding);
            }
        }
    }

    pub fn is_registered(&self, binding: GlobalBinding) -> bool {
        self.active.contains_key(&binding)
    }

    /// Total number of live registrations.
    pub fn len(&self) -> usize {
        self.active.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

const DETAIL_BINDINGS: [GlobalBinding; 2] =
    [GlobalBinding::OutsidePointerDown, GlobalBinding::Escape];

/// A mounted detail view for the movie at `index`.
#[derive(Debug, PartialEq)]
pub struct DetailView {
    pub index: usize,
    /// Vertical scroll of the panel body, in lines.
    pub scroll: u16,
    /// Slide-in progress, 0.0 → 1.0.
    pub slide: f32,
}

impl DetailView {
    pub fn mount(index: usize, listeners: &mut Listeners) -> Self {
        for binding in DETAIL_BINDINGS {
            listeners.register(binding);
        }
        Self {
            index,
            scroll: 0,
            slide: 0.0,
        }
    }

    pub fn unmount(self, listeners: &mut Listeners) {
        for binding in DETAIL_BINDINGS {
            listeners.unregister(binding);
        }
    }
}

/// Modal state. A selection exists exactly when the modal is open.
#[derive(Debug, Default, PartialEq)]
pub enum Modal {
    #[default]
    Closed,
    Open(DetailView),
}

impl Modal {
    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open(_))
    }

    /// Index of the selected movie, if the modal is open.
    pub fn selected(&self) -> Option<usize> {
        match self {
            Modal::Open(view) => Some(view.index),
            Modal::Closed => None,
        }
    }

    pub fn view(&self) -> Option<&DetailView> {
        match self {
            Modal::Open(view) => Some(view),
            Modal::Closed => None,
        }
    }

    pub fn view_mut(&mut self) -> Option<&mut DetailView> {
        match self {
            Modal::Open(view) => Some(view),
            Modal::Closed => None,
        }
    }
}
