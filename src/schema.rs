//! Schema model for master (composite) elements.
//!
//! A master element type is a plain struct implementing [`Master`]. Its
//! [`ElementDesc`] lists the child IDs it understands, and
//! [`Master::field`] hands the parser a typed mutable accessor for one child
//! field. The [`ebml_master!`](crate::ebml_master) macro writes both from a
//! single declaration.
//!
//! Storage conventions:
//! - singular fields are `Option<T>`, where `Some` means "already set",
//! - multiple fields are [`List<'a, T>`], an arena slice sized by the
//!   parser's counting pass plus the number of entries written,
//! - strings and binary payloads are `&'a [u8]` borrowed from the element
//!   buffer.

use bumpalo::Bump;
use std::fmt;
use std::ops::Deref;

/// Native value type of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Payload is a sequence of child elements.
    Master,
    UInt,
    SInt,
    Float,
    String,
    Binary,
    /// Payload is itself an encoded element ID.
    EbmlId,
}

/// One child field of a master element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDesc {
    pub id: u32,
    pub name: &'static str,
    pub multiple: bool,
    pub kind: ElementKind,
}

/// Static description of a master element type.
#[derive(Debug)]
pub struct ElementDesc {
    pub name: &'static str,
    /// Size of the native struct. Array budgets are applied through
    /// [`MasterField::elem_size`], which reports the same value for a list
    /// of this type.
    pub size: usize,
    pub fields: &'static [FieldDesc],
}

impl ElementDesc {
    /// Position of the field with the given child ID.
    #[inline]
    pub fn field_index(&self, id: u32) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    pub fn field(&self, id: u32) -> Option<&FieldDesc> {
        self.fields.iter().find(|f| f.id == id)
    }
}

/// A native struct populated from a master element.
///
/// `'a` is the lifetime of the arena holding the element buffer and every
/// array allocated while parsing.
pub trait Master<'a> {
    /// The element's schema.
    fn desc(&self) -> &'static ElementDesc;

    /// Mutable accessor for the field storing child `id`, or `None` when the
    /// type has no such field.
    fn field(&mut self, id: u32) -> Option<FieldMut<'_, 'a>>;
}

/// Storage of a multi-valued field: an exactly sized arena slice and the
/// number of entries written so far.
///
/// Dereferences to the written entries, in stream order.
pub struct List<'a, T> {
    items: &'a mut [T],
    len: usize,
}

impl<'a, T> List<'a, T> {
    /// Number of slots allocated by the parser.
    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.len]
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.len >= self.items.len()
    }
}

impl<'a, T: Default> List<'a, T> {
    /// Replaces the storage with `count` default slots from `arena`.
    pub(crate) fn reserve(&mut self, arena: &'a Bump, count: usize) {
        self.items = arena.alloc_slice_fill_default(count);
        self.len = 0;
    }

    /// Writes the next slot. Returns `false` when every slot is taken.
    pub(crate) fn push(&mut self, value: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.items[self.len] = value;
        self.len += 1;
        true
    }
}

impl<'a, T> Default for List<'a, T> {
    fn default() -> Self {
        Self {
            items: &mut [],
            len: 0,
        }
    }
}

impl<'a, T> Deref for List<'a, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<'a, 'l, T> IntoIterator for &'l List<'a, T> {
    type Item = &'l T;
    type IntoIter = std::slice::Iter<'l, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for List<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Storage of one scalar field.
pub enum Slot<'s, 'a, T> {
    One(&'s mut Option<T>),
    Many(&'s mut List<'a, T>),
}

impl<'s, 'a, T: Default> Slot<'s, 'a, T> {
    fn is_set(&self) -> bool {
        match self {
            Slot::One(value) => value.is_some(),
            Slot::Many(_) => false,
        }
    }

    fn reserve(&mut self, arena: &'a Bump, count: usize) {
        if let Slot::Many(list) = self {
            list.reserve(arena, count);
        }
    }

    /// Stores a decoded value. Returns `false` when a list has no free slot.
    pub(crate) fn store(self, value: T) -> bool {
        match self {
            Slot::One(slot) => {
                *slot = Some(value);
                true
            }
            Slot::Many(list) => list.push(value),
        }
    }
}

/// Storage of a master child field, type-erased over the child struct.
pub trait MasterField<'a> {
    /// Size of one child struct.
    fn elem_size(&self) -> usize;

    /// Allocates `count` child slots; a no-op for singular fields.
    fn reserve(&mut self, arena: &'a Bump, count: usize);

    /// Whether a singular child is already present.
    fn is_set(&self) -> bool;

    /// Returns a fresh child to populate, or `None` when no slot is left.
    fn begin(&mut self) -> Option<&mut dyn Master<'a>>;

    /// Keeps the child returned by the last `begin`.
    fn commit(&mut self);

    /// Discards the child returned by the last `begin`.
    fn abandon(&mut self);
}

impl<'a, C: Master<'a> + Default> MasterField<'a> for Option<C> {
    fn elem_size(&self) -> usize {
        std::mem::size_of::<C>()
    }

    fn reserve(&mut self, _arena: &'a Bump, _count: usize) {}

    fn is_set(&self) -> bool {
        self.is_some()
    }

    fn begin(&mut self) -> Option<&mut dyn Master<'a>> {
        Some(self.insert(C::default()))
    }

    fn commit(&mut self) {}

    fn abandon(&mut self) {
        *self = None;
    }
}

impl<'a, C: Master<'a> + Default> MasterField<'a> for List<'a, C> {
    fn elem_size(&self) -> usize {
        std::mem::size_of::<C>()
    }

    fn reserve(&mut self, arena: &'a Bump, count: usize) {
        List::reserve(self, arena, count);
    }

    fn is_set(&self) -> bool {
        false
    }

    fn begin(&mut self) -> Option<&mut dyn Master<'a>> {
        if self.is_full() {
            return None;
        }
        Some(&mut self.items[self.len])
    }

    fn commit(&mut self) {
        self.len += 1;
    }

    fn abandon(&mut self) {
        if !self.is_full() {
            self.items[self.len] = C::default();
        }
    }
}

/// Typed mutable access to one field of a master struct.
pub enum FieldMut<'s, 'a> {
    UInt(Slot<'s, 'a, u64>),
    SInt(Slot<'s, 'a, i64>),
    Float(Slot<'s, 'a, f64>),
    /// String and binary payloads.
    Bytes(Slot<'s, 'a, &'a [u8]>),
    EbmlId(Slot<'s, 'a, u32>),
    Master(&'s mut dyn MasterField<'a>),
}

impl<'s, 'a> FieldMut<'s, 'a> {
    /// Whether a singular field already holds a value.
    pub fn is_set(&self) -> bool {
        match self {
            FieldMut::UInt(s) => s.is_set(),
            FieldMut::SInt(s) => s.is_set(),
            FieldMut::Float(s) => s.is_set(),
            FieldMut::Bytes(s) => s.is_set(),
            FieldMut::EbmlId(s) => s.is_set(),
            FieldMut::Master(m) => m.is_set(),
        }
    }

    /// Size of one stored value.
    pub fn elem_size(&self) -> usize {
        match self {
            FieldMut::UInt(_) => std::mem::size_of::<u64>(),
            FieldMut::SInt(_) => std::mem::size_of::<i64>(),
            FieldMut::Float(_) => std::mem::size_of::<f64>(),
            FieldMut::Bytes(_) => std::mem::size_of::<&[u8]>(),
            FieldMut::EbmlId(_) => std::mem::size_of::<u32>(),
            FieldMut::Master(m) => m.elem_size(),
        }
    }

    /// Whether this accessor stores values of `kind`.
    pub fn accepts(&self, kind: ElementKind) -> bool {
        matches!(
            (self, kind),
            (FieldMut::UInt(_), ElementKind::UInt)
                | (FieldMut::SInt(_), ElementKind::SInt)
                | (FieldMut::Float(_), ElementKind::Float)
                | (FieldMut::Bytes(_), ElementKind::String | ElementKind::Binary)
                | (FieldMut::EbmlId(_), ElementKind::EbmlId)
                | (FieldMut::Master(_), ElementKind::Master)
        )
    }

    pub(crate) fn reserve(&mut self, arena: &'a Bump, count: usize) {
        match self {
            FieldMut::UInt(s) => s.reserve(arena, count),
            FieldMut::SInt(s) => s.reserve(arena, count),
            FieldMut::Float(s) => s.reserve(arena, count),
            FieldMut::Bytes(s) => s.reserve(arena, count),
            FieldMut::EbmlId(s) => s.reserve(arena, count),
            FieldMut::Master(m) => m.reserve(arena, count),
        }
    }
}
