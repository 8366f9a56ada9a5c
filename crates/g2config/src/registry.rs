//! Handle registry: an arena of live documents addressed by generation-checked handles.

use g2config_core::ConfigHandle;

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Arena of values addressed by [`ConfigHandle`].
///
/// Removing a value bumps its slot's generation before the slot is reused,
/// so stale handles miss instead of aliasing the new occupant.
pub struct HandleRegistry<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
    /// Generation given to freshly allocated slots.
    seed: u32,
}

impl<T> HandleRegistry<T> {
    /// Create an empty registry.
    ///
    /// `seed` is the generation of new slots. Engines pass distinct seeds so
    /// a handle from one engine is very unlikely to be live in another.
    pub fn new(seed: u32) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            seed: seed.max(1),
        }
    }

    /// Store a value. Returns `None` only when the index space is exhausted.
    pub fn insert(&mut self, value: T) -> Option<ConfigHandle> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = u32::try_from(self.slots.len())
                    .ok()
                    .filter(|i| *i < u32::MAX)?;
                self.slots.push(Slot {
                    generation: self.seed,
                    value: None,
                });
                index
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.value = Some(value);
        self.live += 1;
        Some(ConfigHandle::from_parts(index, slot.generation))
    }

    fn slot(&self, handle: ConfigHandle) -> Option<&Slot<T>> {
        let slot = self.slots.get(handle.index()? as usize)?;
        (slot.generation == handle.generation()).then_some(slot)
    }

    fn slot_mut(&mut self, handle: ConfigHandle) -> Option<&mut Slot<T>> {
        let slot = self.slots.get_mut(handle.index()? as usize)?;
        if slot.generation == handle.generation() {
            Some(slot)
        } else {
            None
        }
    }

    pub fn get(&self, handle: ConfigHandle) -> Option<&T> {
        self.slot(handle)?.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: ConfigHandle) -> Option<&mut T> {
        self.slot_mut(handle)?.value.as_mut()
    }

    pub fn contains(&self, handle: ConfigHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Remove a value and retire its handle.
    pub fn remove(&mut self, handle: ConfigHandle) -> Option<T> {
        let index = handle.index()?;
        let slot = self.slot_mut(handle)?;
        let value = slot.value.take()?;
        slot.generation = next_generation(slot.generation);
        self.free.push(index);
        self.live -= 1;
        Some(value)
    }

    /// Remove every value, retiring all handles. Returns how many were live.
    pub fn clear(&mut self) -> usize {
        let closed = self.live;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = next_generation(slot.generation);
                self.free.push(index as u32);
            }
        }
        self.live = 0;
        closed
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

fn next_generation(generation: u32) -> u32 {
    generation.wrapping_add(1).max(1)
}
