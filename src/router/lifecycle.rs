use std::collections::BTreeMap;

use super::page::PageId;

/// Authorization collaborator consulted before entering a protected page.
pub trait AuthGate {
    fn is_authenticated(&self) -> bool;

    /// Asks the collaborator to surface its login prompt.
    fn request_login(&mut self);
}

/// Per-page setup run after every successful navigation to that page.
///
/// Initializers may be invoked repeatedly and must tolerate it. Long-running
/// work is handed to the services' own scheduler; the router never waits.
pub trait PageInitializer<S> {
    fn initialize(&mut self, services: &mut S);
}

impl<S, F> PageInitializer<S> for F
where
    F: FnMut(&mut S),
{
    fn initialize(&mut self, services: &mut S) {
        self(services)
    }
}

pub struct InitializerRegistry<S> {
    entries: BTreeMap<PageId, Box<dyn PageInitializer<S>>>,
}

impl<S> Default for InitializerRegistry<S> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<S> InitializerRegistry<S> {
    /// Registers (or replaces) the initializer for `page`.
    pub fn register(&mut self, page: PageId, initializer: impl PageInitializer<S> + 'static) {
        self.entries.insert(page, Box::new(initializer));
    }

    pub fn has_initializer(&self, page: PageId) -> bool {
        self.entries.contains_key(&page)
    }

    pub fn registered(&self) -> impl Iterator<Item = PageId> + '_ {
        self.entries.keys().copied()
    }

    /// Runs the initializer for `page` if one is registered.
    pub(crate) fn run(&mut self, page: PageId, services: &mut S) -> bool {
        let Some(initializer) = self.entries.get_mut(&page) else {
            return false;
        };
        initializer.initialize(services);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::InitializerRegistry;
    use crate::router::PageId;

    #[test]
    fn closures_register_as_initializers() {
        let mut registry = InitializerRegistry::<Vec<PageId>>::default();
        registry.register(PageId::Blog, |seen: &mut Vec<PageId>| seen.push(PageId::Blog));

        let mut seen = Vec::new();
        assert!(registry.run(PageId::Blog, &mut seen));
        assert!(!registry.run(PageId::Home, &mut seen));
        assert_eq!(seen, vec![PageId::Blog]);
        assert!(registry.has_initializer(PageId::Blog));
        assert!(!registry.has_initializer(PageId::Home));
    }
}
