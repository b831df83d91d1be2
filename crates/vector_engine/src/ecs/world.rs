//! ECS World implementation
//!
//! Entities come from a generational slotmap arena, so a destroyed entity's
//! id is never observably reused: stale ids (for example a lingering parent
//! link) simply stop resolving. Component columns are `SecondaryMap`s keyed
//! by entity, registered lazily per component type.

use slotmap::{new_key_type, SecondaryMap, SlotMap};
use std::any::{Any, TypeId};
use std::collections::HashMap;

new_key_type! {
    /// Entity identifier: an opaque generational key
    pub struct Entity;
}

/// Marker trait for components
pub trait Component: 'static + Send + Sync {}

/// Type-erased column interface so the world can clear all components of a
/// destroyed entity without knowing their types
trait AnyColumn: Any + Send + Sync {
    fn remove_entity(&mut self, entity: Entity);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Column<T: Component>(SecondaryMap<Entity, T>);

impl<T: Component> AnyColumn for Column<T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.0.remove(entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// ECS World containing all entities and components
#[derive(Default)]
pub struct World {
    entities: SlotMap<Entity, ()>,
    columns: HashMap<TypeId, Box<dyn AnyColumn>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        self.entities.insert(())
    }

    /// Destroy an entity and detach all of its components
    pub fn destroy_entity(&mut self, entity: Entity) {
        if self.entities.remove(entity).is_some() {
            for column in self.columns.values_mut() {
                column.remove_entity(entity);
            }
        }
    }

    /// Whether the entity is still alive
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Add a component to an entity, replacing any previous value
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) {
        if !self.entities.contains_key(entity) {
            return;
        }
        let column = self
            .columns
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Column::<T>(SecondaryMap::new())));
        if let Some(column) = column.as_any_mut().downcast_mut::<Column<T>>() {
            column.0.insert(entity, component);
        }
    }

    /// Remove a component from an entity, returning it if present
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.column_mut::<T>()?.remove(entity)
    }

    /// Get a component from an entity
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.column::<T>()?.get(entity)
    }

    /// Get a mutable component from an entity
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.column_mut::<T>()?.get_mut(entity)
    }

    /// All entities currently carrying component `T`
    ///
    /// Order follows the arena and is stable within a frame.
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.column::<T>()
            .map(|column| column.keys().collect())
            .unwrap_or_default()
    }

    /// Iterate entities carrying component `T` together with the component
    pub fn iter_components<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.column::<T>().into_iter().flat_map(SecondaryMap::iter)
    }

    fn column<T: Component>(&self) -> Option<&SecondaryMap<Entity, T>> {
        self.columns
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<Column<T>>()
            .map(|c| &c.0)
    }

    fn column_mut<T: Component>(&mut self) -> Option<&mut SecondaryMap<Entity, T>> {
        self.columns
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<Column<T>>()
            .map(|c| &mut c.0)
    }
}
