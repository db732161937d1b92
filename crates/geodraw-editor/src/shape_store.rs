//! The editable shape collection.

use geodraw_core::{shared, Geometry, Shared, ShapeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ShapeModel;

/// Shapes keyed by id, with draw order preserved
#[derive(Debug)]
pub struct ShapeStore {
    shapes: HashMap<ShapeId, Shared<ShapeModel>>,
    draw_order: Vec<ShapeId>,
    next_id: u64,
}

#[derive(Serialize, Deserialize)]
struct StoreDocument {
    next_id: u64,
    shapes: Vec<ShapeModel>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self {
            shapes: HashMap::new(),
            draw_order: Vec::new(),
            next_id: 1,
        }
    }

    /// Generates a new unique ID.
    pub fn generate_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Sets the next ID to be generated.
    pub fn set_next_id(&mut self, id: u64) {
        self.next_id = id;
    }

    /// Adds a new shape and returns its id.
    pub fn add(&mut self, geometry: Geometry) -> ShapeId {
        let id = self.generate_id();
        self.insert(shared(ShapeModel::new(id, geometry)));
        id
    }

    /// Inserts an existing shape, keeping its id. Re-inserting a shape that
    /// is already present replaces it without changing its draw position.
    pub fn insert(&mut self, shape: Shared<ShapeModel>) {
        self.insert_at(self.draw_order.len(), shape);
    }

    /// Inserts a shape at a draw position, clamped to the end of the order.
    /// A shape that is already present is replaced in place.
    pub fn insert_at(&mut self, index: usize, shape: Shared<ShapeModel>) {
        let id = shape.borrow().id();
        if self.shapes.insert(id, shape).is_none() {
            let index = index.min(self.draw_order.len());
            self.draw_order.insert(index, id);
        }
        if id.0 >= self.next_id {
            self.next_id = id.0 + 1;
        }
    }

    /// Draw position of a shape
    pub fn position(&self, id: ShapeId) -> Option<usize> {
        self.draw_order.iter().position(|other| *other == id)
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Shared<ShapeModel>> {
        let shape = self.shapes.remove(&id)?;
        self.draw_order.retain(|other| *other != id);
        Some(shape)
    }

    pub fn get(&self, id: ShapeId) -> Option<Shared<ShapeModel>> {
        self.shapes.get(&id).cloned()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shape ids in draw order
    pub fn ids(&self) -> &[ShapeId] {
        &self.draw_order
    }

    /// Shapes in draw order
    pub fn iter(&self) -> impl Iterator<Item = &Shared<ShapeModel>> {
        self.draw_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Serialize the collection, preserving ids and draw order.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let document = StoreDocument {
            next_id: self.next_id,
            shapes: self.iter().map(|shape| shape.borrow().clone()).collect(),
        };
        serde_json::to_string_pretty(&document)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let document: StoreDocument = serde_json::from_str(json)?;
        let mut store = Self::new();
        for shape in document.shapes {
            store.insert(shared(shape));
        }
        store.next_id = store.next_id.max(document.next_id);
        Ok(store)
    }
}

impl Default for ShapeStore {
    fn default() -> Self {
        Self::new()
    }
}
