//! LIFO stack of containers at one (bay, cell)

use super::container::{Container, ContainerId};

/// Bounded LIFO stack
///
/// The height bound can be lifted temporarily with
/// [`allow_overstack`](Stack::allow_overstack) while a retrieval parks
/// containers on a scratch cell.
#[derive(Debug, Clone)]
pub struct Stack {
    items: Vec<Container>,
    max_tiers: usize,
    overstack_allowed: bool,
}

impl Stack {
    /// Empty stack holding at most `max_tiers` containers
    pub fn new(max_tiers: usize) -> Self {
        Self {
            items: Vec::with_capacity(max_tiers),
            max_tiers,
            overstack_allowed: false,
        }
    }

    /// Push on top; returns the new tier, or hands the container back if
    /// the stack is full
    pub fn push(&mut self, container: Container) -> Result<usize, Container> {
        if !self.overstack_allowed && self.items.len() >= self.max_tiers {
            return Err(container);
        }
        self.items.push(container);
        Ok(self.items.len())
    }

    /// Remove the top container
    pub fn pop(&mut self) -> Option<Container> {
        self.items.pop()
    }

    /// Top container
    pub fn top(&self) -> Option<&Container> {
        self.items.last()
    }

    /// Current height
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is stacked
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether another container fits under the normal bound
    pub fn has_room(&self) -> bool {
        self.items.len() < self.max_tiers
    }

    /// Normal height bound
    pub fn max_tiers(&self) -> usize {
        self.max_tiers
    }

    /// Whether `id` is somewhere in this stack
    pub fn contains(&self, id: ContainerId) -> bool {
        self.items.iter().any(|c| c.id() == id)
    }

    /// Bottom-to-top view
    pub fn iter(&self) -> impl Iterator<Item = &Container> {
        self.items.iter()
    }

    /// Lift the height bound
    pub fn allow_overstack(&mut self) {
        self.overstack_allowed = true;
    }

    /// Restore the height bound
    pub fn disallow_overstack(&mut self) {
        self.overstack_allowed = false;
    }

    /// Whether the height bound is currently lifted
    pub fn is_overstack_allowed(&self) -> bool {
        self.overstack_allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::yard::container::{ContainerFactory, ContainerSize, ContainerType};

    #[test]
    fn test_bounded_push() {
        let mut factory = ContainerFactory::new();
        let mut stack = Stack::new(2);

        assert_eq!(stack.push(factory.create(ContainerType::Laden, ContainerSize::TwentyFt)), Ok(1));
        assert_eq!(stack.push(factory.create(ContainerType::Laden, ContainerSize::TwentyFt)), Ok(2));
        let rejected = stack
            .push(factory.create(ContainerType::Empty, ContainerSize::TwentyFt))
            .unwrap_err();
        assert_eq!(rejected.id().serial(), 3);
        assert_eq!(stack.len(), 2);
        assert!(!stack.has_room());
    }

    #[test]
    fn test_overstack_window() {
        let mut factory = ContainerFactory::new();
        let mut stack = Stack::new(1);
        stack.push(factory.create(ContainerType::Laden, ContainerSize::TwentyFt)).unwrap();

        stack.allow_overstack();
        assert_eq!(stack.push(factory.create(ContainerType::Laden, ContainerSize::TwentyFt)), Ok(2));
        stack.disallow_overstack();

        assert!(stack.push(factory.create(ContainerType::Laden, ContainerSize::TwentyFt)).is_err());
        assert_eq!(stack.pop().map(|c| c.id().serial()), Some(2));
    }
}
