//! Object table
//!
//! A fixed-capacity arena of host-visible objects indexed by object id.
//! Each slot remembers which configuration command created it, so an id
//! bound by one command cannot be resolved as another kind of object.

/// Identifies the configuration command that owns a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObjectKind(&'static str);

impl ObjectKind {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

/// Errors from allocating or resolving an object id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AllocError {
    /// Object id is beyond the table capacity
    OutOfRange { oid: u8, capacity: usize },
    /// Object id is already bound to a different kind
    KindMismatch { oid: u8, bound: ObjectKind },
    /// Object id has not been configured
    NotAllocated { oid: u8 },
}

#[derive(Debug)]
struct Slot<T> {
    kind: ObjectKind,
    object: T,
}

/// Fixed-capacity object table
#[derive(Debug)]
pub struct ObjectTable<T, const N: usize> {
    slots: [Option<Slot<T>>; N],
}

impl<T, const N: usize> Default for ObjectTable<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> ObjectTable<T, N> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Number of allocated slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn index(oid: u8) -> Result<usize, AllocError> {
        let idx = oid as usize;
        if idx >= N {
            return Err(AllocError::OutOfRange { oid, capacity: N });
        }
        Ok(idx)
    }

    /// Allocate the slot for `oid`, or re-resolve it if `kind` already owns it
    ///
    /// `init` runs only once the slot is known to be usable. A previous
    /// object of the same kind is dropped before `init` runs, so hardware it
    /// holds is released before the replacement claims it.
    pub fn allocate(
        &mut self,
        oid: u8,
        kind: ObjectKind,
        init: impl FnOnce() -> T,
    ) -> Result<&mut T, AllocError> {
        let idx = Self::index(oid)?;

        if let Some(slot) = &self.slots[idx] {
            if slot.kind != kind {
                return Err(AllocError::KindMismatch {
                    oid,
                    bound: slot.kind,
                });
            }
        }

        self.slots[idx] = None;
        let slot = self.slots[idx].insert(Slot {
            kind,
            object: init(),
        });
        Ok(&mut slot.object)
    }

    /// Resolve `oid` as an object of `kind`
    pub fn lookup(&self, oid: u8, kind: ObjectKind) -> Result<&T, AllocError> {
        let idx = Self::index(oid)?;
        match &self.slots[idx] {
            Some(slot) if slot.kind == kind => Ok(&slot.object),
            Some(slot) => Err(AllocError::KindMismatch {
                oid,
                bound: slot.kind,
            }),
            None => Err(AllocError::NotAllocated { oid }),
        }
    }

    /// Every allocated object of `kind`, with its object id
    pub fn iter_kind_mut(&mut self, kind: ObjectKind) -> impl Iterator<Item = (u8, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(move |(idx, slot)| match slot {
                Some(slot) if slot.kind == kind => Some((idx as u8, &mut slot.object)),
                _ => None,
            })
    }
}
