use crate::scene::ObjectPath;

/// A typed pick target resolved from raw GPU pick IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget<'a> {
    /// No target (background).
    None,
    /// A draw item and, if written, the coarse element under the pixel.
    Object {
        /// Object owning the draw item.
        path: &'a ObjectPath,
        /// Instance of an instanced draw item.
        instance: Option<u32>,
        /// Coarse face index.
        element: Option<u32>,
    },
}

impl PickTarget<'_> {
    /// Returns `true` if this target is `None`.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Maps raw pick IDs written by the ID pass to typed [`PickTarget`] values.
///
/// IDs are contiguous and 1-based:
/// - prim id `0` -> background
/// - prim id `n` -> draw item `n - 1` of the pass
/// - element id `0` -> no element, `n` -> coarse face `n - 1`
#[derive(Debug, Clone, Default)]
pub struct PickMap {
    entries: Vec<(ObjectPath, Option<u32>)>,
}

impl PickMap {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a draw item; returns the raw prim id it must write.
    pub fn push(&mut self, path: ObjectPath, instance: Option<u32>) -> u32 {
        self.entries.push((path, instance));
        self.entries.len() as u32
    }

    /// Number of registered draw items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no draw item has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode a coarse element index for the element channel.
    #[must_use]
    pub fn encode_element(element: u32) -> u32 {
        element + 1
    }

    /// Resolve raw ids read back from the pick buffer.
    #[must_use]
    pub fn resolve(&self, raw_prim: u32, raw_element: u32) -> PickTarget<'_> {
        if raw_prim == 0 {
            return PickTarget::None;
        }
        match self.entries.get((raw_prim - 1) as usize) {
            Some((path, instance)) => PickTarget::Object {
                path,
                instance: *instance,
                element: raw_element.checked_sub(1),
            },
            None => PickTarget::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_one_based() {
        let mut map = PickMap::new();
        let a = map.push(ObjectPath::new("/a").unwrap(), None);
        let b = map.push(ObjectPath::new("/b").unwrap(), Some(3));
        assert_eq!((a, b), (1, 2));
        assert!(map.resolve(0, 5).is_none());
        assert!(map.resolve(9, 1).is_none());
        let b_path = ObjectPath::new("/b").unwrap();
        assert_eq!(
            map.resolve(b, PickMap::encode_element(4)),
            PickTarget::Object {
                path: &b_path,
                instance: Some(3),
                element: Some(4),
            }
        );
        assert!(matches!(
            map.resolve(a, 0),
            PickTarget::Object { element: None, .. }
        ));
    }
}
