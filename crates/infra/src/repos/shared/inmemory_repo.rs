use careercare_domain::{Entity, ID};
use std::sync::Mutex;

/// Useful functions for creating inmemory repositories

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    collection.push(val.clone());
}

pub fn find<T: Clone + Entity<ID>>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = collection.lock().unwrap();
    collection.iter().find(|v| &v.id() == val_id).cloned()
}

pub fn find_by<T: Clone + Entity<ID>, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    mut compare: F,
) -> Vec<T> {
    let collection = collection.lock().unwrap();
    let mut items = Vec::new();
    for item in collection.iter() {
        if compare(item) {
            items.push(item.clone());
        }
    }
    items
}

/// Applies `update` to the item with the given id if it also matches
/// `condition`, and reports whether an update happened. The conditional
/// check and the write run under one lock, which mirrors the conditional
/// UPDATE of the sql repositories.
pub fn update_if<T, F, U>(
    val_id: &ID,
    collection: &Mutex<Vec<T>>,
    condition: F,
    update: U,
) -> bool
where
    T: Clone + Entity<ID>,
    F: Fn(&T) -> bool,
    U: Fn(&mut T),
{
    let mut collection = collection.lock().unwrap();
    for item in collection.iter_mut() {
        if &item.id() == val_id && condition(item) {
            update(item);
            return true;
        }
    }
    false
}
