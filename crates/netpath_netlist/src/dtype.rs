//! Hardware data types and the central type registry.
//!
//! Every variable vertex references a [`DType`] through the [`DTypeDb`].
//! Types are registered under the elaborator-assigned string id while the
//! XML is loaded (two passes, because a type's children may be declared
//! after the type that references them) and are immutable afterwards.
//! Child links are [`DTypeId`] handles into the registry, so any number of
//! variables can share a type; entries are never removed, which keeps the
//! handles valid for the registry's lifetime.

use crate::ids::DTypeId;
use indexmap::IndexMap;
use netpath_source::Location;
use serde::{Deserialize, Serialize};

/// A named member of a struct or union type.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Member {
    /// The member name.
    pub name: String,
    /// Where the member is declared.
    pub location: Location,
    /// The member's type.
    pub dtype: DTypeId,
}

/// A named value of an enumeration type.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct EnumItem {
    /// The item name.
    pub name: String,
    /// The item's integer value.
    pub value: u64,
}

/// A hardware data type.
///
/// Child references (`target`, `element`, `underlying`, member types) are
/// `None` only between the two loader passes; after loading they are
/// guaranteed to be resolved.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DType {
    /// A scalar or packed-vector type such as `logic` or `[31:0] logic`.
    Basic {
        /// The type name.
        name: String,
        /// Where the type is declared.
        location: Location,
        /// The packed `(left, right)` range, when the type is a vector.
        range: Option<(u32, u32)>,
    },
    /// A reference to another type introduced by a typedef.
    Ref {
        /// The typedef name.
        name: String,
        /// Where the typedef is declared.
        location: Location,
        /// The referenced type.
        target: Option<DTypeId>,
    },
    /// A packed or unpacked array of another type.
    Array {
        /// Where the array type is declared.
        location: Location,
        /// The high bound of the array range.
        high: u64,
        /// The low bound of the array range.
        low: u64,
        /// `true` for packed arrays.
        packed: bool,
        /// The element type.
        element: Option<DTypeId>,
    },
    /// A structure type with ordered members.
    Struct {
        /// The struct name, absent for inline anonymous structs.
        name: Option<String>,
        /// Where the struct is declared.
        location: Location,
        /// The members, in declaration order.
        members: Vec<Member>,
    },
    /// A union type with ordered members.
    Union {
        /// The union name, absent for inline anonymous unions.
        name: Option<String>,
        /// Where the union is declared.
        location: Location,
        /// The members, in declaration order.
        members: Vec<Member>,
    },
    /// An enumeration type.
    Enum {
        /// The enum name.
        name: String,
        /// Where the enum is declared.
        location: Location,
        /// The underlying value type.
        underlying: Option<DTypeId>,
        /// The enumerated items, in declaration order.
        items: Vec<EnumItem>,
    },
    /// A reference to an interface; only present in non-flat netlists.
    InterfaceRef {
        /// The interface name, when reported.
        name: Option<String>,
        /// Where the reference occurs.
        location: Location,
    },
}

impl DType {
    /// Returns the user-facing name of the type, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            DType::Basic { name, .. } | DType::Ref { name, .. } | DType::Enum { name, .. } => {
                Some(name)
            }
            DType::Struct { name, .. } | DType::Union { name, .. } => name.as_deref(),
            DType::InterfaceRef { name, .. } => name.as_deref(),
            DType::Array { .. } => None,
        }
    }

    /// Returns where the type is declared.
    pub fn location(&self) -> Location {
        match self {
            DType::Basic { location, .. }
            | DType::Ref { location, .. }
            | DType::Array { location, .. }
            | DType::Struct { location, .. }
            | DType::Union { location, .. }
            | DType::Enum { location, .. }
            | DType::InterfaceRef { location, .. } => *location,
        }
    }
}

/// The central registry of data types, keyed by the elaborator's string id.
///
/// Preserves insertion order for deterministic listings; lookup by string
/// id is constant-time. [`DTypeId`] handles are indices into the insertion
/// order and remain valid for the registry's lifetime.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct DTypeDb {
    types: IndexMap<String, DType>,
}

impl DTypeDb {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type under the elaborator's string id and returns its
    /// handle. Registering an id twice keeps the first entry.
    pub fn insert(&mut self, xml_id: &str, dtype: DType) -> DTypeId {
        let entry = self.types.entry(xml_id.to_string());
        let index = entry.index();
        entry.or_insert(dtype);
        DTypeId::from_raw(index as u32)
    }

    /// Looks up the handle registered for an elaborator string id.
    pub fn lookup_xml_id(&self, xml_id: &str) -> Option<DTypeId> {
        self.types
            .get_index_of(xml_id)
            .map(|i| DTypeId::from_raw(i as u32))
    }

    /// Returns the type with the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from this registry.
    pub fn get(&self, id: DTypeId) -> &DType {
        self.types
            .get_index(id.index())
            .map(|(_, t)| t)
            .expect("dtype id out of range")
    }

    /// Returns a mutable reference to the type with the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from this registry.
    pub fn get_mut(&mut self, id: DTypeId) -> &mut DType {
        self.types
            .get_index_mut(id.index())
            .map(|(_, t)| t)
            .expect("dtype id out of range")
    }

    /// Finds the first registered type with the given user-facing name.
    pub fn find_by_name(&self, name: &str) -> Option<DTypeId> {
        self.types
            .values()
            .position(|t| t.name() == Some(name))
            .map(|i| DTypeId::from_raw(i as u32))
    }

    /// Returns the bit width of a type.
    ///
    /// `Basic` is `|left - right| + 1` (or 1 without a range); arrays
    /// multiply the element width by the range size; structs sum their
    /// members; unions take the widest member; refs and enums delegate.
    /// Unresolved child references count as zero, but never survive loading.
    pub fn width(&self, id: DTypeId) -> u64 {
        match self.get(id) {
            DType::Basic { range: Some((l, r)), .. } => u64::from(l.abs_diff(*r)) + 1,
            DType::Basic { range: None, .. } => 1,
            DType::Array {
                high, low, element, ..
            } => {
                let element_width = element.map_or(0, |e| self.width(e));
                element_width * (high.abs_diff(*low) + 1)
            }
            DType::Struct { members, .. } => members.iter().map(|m| self.width(m.dtype)).sum(),
            DType::Union { members, .. } => members
                .iter()
                .map(|m| self.width(m.dtype))
                .max()
                .unwrap_or(0),
            DType::Ref { target, .. } => target.map_or(0, |t| self.width(t)),
            DType::Enum { underlying, .. } => underlying.map_or(0, |u| self.width(u)),
            DType::InterfaceRef { .. } => 0,
        }
    }

    /// Returns the bit width of the first type with the given name, if any.
    pub fn width_of_name(&self, name: &str) -> Option<u64> {
        self.find_by_name(name).map(|id| self.width(id))
    }

    /// Renders a type the way a designer would write it, e.g.
    /// `[31:0] logic [8:0]` for an unpacked array of a packed vector.
    pub fn dtype_str(&self, id: DTypeId) -> String {
        match self.get(id) {
            DType::Basic {
                name,
                range: Some((l, r)),
                ..
            } => format!("[{l}:{r}] {name}"),
            DType::Basic { name, .. } => name.clone(),
            DType::Ref { name, .. } => name.clone(),
            DType::Array {
                high,
                low,
                packed,
                element,
                ..
            } => {
                let element_str = element.map_or_else(|| "?".to_string(), |e| self.dtype_str(e));
                if *packed {
                    format!("[{high}:{low}] {element_str}")
                } else {
                    format!("{element_str} [{high}:{low}]")
                }
            }
            DType::Struct { name, .. } => match name {
                Some(n) => format!("struct {n}"),
                None => "struct".to_string(),
            },
            DType::Union { name, .. } => match name {
                Some(n) => format!("union {n}"),
                None => "union".to_string(),
            },
            DType::Enum { name, .. } => format!("enum {name}"),
            DType::InterfaceRef { .. } => "ifaceref".to_string(),
        }
    }

    /// Returns `true` if every child reference in the registry is resolved.
    pub fn fully_resolved(&self) -> bool {
        self.types.values().all(|t| match t {
            DType::Ref { target, .. } => target.is_some(),
            DType::Array { element, .. } => element.is_some(),
            DType::Enum { underlying, .. } => underlying.is_some(),
            _ => true,
        })
    }

    /// Returns the number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types have been registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over `(DTypeId, &DType)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (DTypeId, &DType)> {
        self.types
            .values()
            .enumerate()
            .map(|(i, t)| (DTypeId::from_raw(i as u32), t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(name: &str, range: Option<(u32, u32)>) -> DType {
        DType::Basic {
            name: name.to_string(),
            location: Location::DUMMY,
            range,
        }
    }

    #[test]
    fn insert_and_lookup() {
        let mut db = DTypeDb::new();
        let id = db.insert("1", basic("logic", None));
        assert_eq!(db.lookup_xml_id("1"), Some(id));
        assert_eq!(db.lookup_xml_id("2"), None);
        assert_eq!(db.get(id).name(), Some("logic"));
    }

    #[test]
    fn insert_twice_keeps_first() {
        let mut db = DTypeDb::new();
        let a = db.insert("1", basic("logic", None));
        let b = db.insert("1", basic("other", None));
        assert_eq!(a, b);
        assert_eq!(db.len(), 1);
        assert_eq!(db.get(a).name(), Some("logic"));
    }

    #[test]
    fn width_basic() {
        let mut db = DTypeDb::new();
        let scalar = db.insert("1", basic("logic", None));
        let vector = db.insert("2", basic("logic", Some((31, 0))));
        let reversed = db.insert("3", basic("logic", Some((0, 31))));
        assert_eq!(db.width(scalar), 1);
        assert_eq!(db.width(vector), 32);
        assert_eq!(db.width(reversed), 32);
    }

    #[test]
    fn width_array() {
        let mut db = DTypeDb::new();
        let elem = db.insert("1", basic("logic", Some((31, 0))));
        let arr = db.insert(
            "2",
            DType::Array {
                location: Location::DUMMY,
                high: 8,
                low: 0,
                packed: false,
                element: Some(elem),
            },
        );
        assert_eq!(db.width(arr), 32 * 9);
    }

    #[test]
    fn width_struct_sums_members() {
        let mut db = DTypeDb::new();
        let byte = db.insert("1", basic("logic", Some((7, 0))));
        let bit = db.insert("2", basic("logic", None));
        let s = db.insert(
            "3",
            DType::Struct {
                name: Some("packet_t".to_string()),
                location: Location::DUMMY,
                members: vec![
                    Member {
                        name: "data".to_string(),
                        location: Location::DUMMY,
                        dtype: byte,
                    },
                    Member {
                        name: "valid".to_string(),
                        location: Location::DUMMY,
                        dtype: bit,
                    },
                ],
            },
        );
        assert_eq!(db.width(s), 9);
    }

    #[test]
    fn width_union_takes_widest() {
        let mut db = DTypeDb::new();
        let byte = db.insert("1", basic("logic", Some((7, 0))));
        let word = db.insert("2", basic("logic", Some((15, 0))));
        let u = db.insert(
            "3",
            DType::Union {
                name: None,
                location: Location::DUMMY,
                members: vec![
                    Member {
                        name: "b".to_string(),
                        location: Location::DUMMY,
                        dtype: byte,
                    },
                    Member {
                        name: "w".to_string(),
                        location: Location::DUMMY,
                        dtype: word,
                    },
                ],
            },
        );
        assert_eq!(db.width(u), 16);
    }

    #[test]
    fn width_ref_and_enum_delegate() {
        let mut db = DTypeDb::new();
        let base = db.insert("1", basic("logic", Some((3, 0))));
        let r = db.insert(
            "2",
            DType::Ref {
                name: "nibble_t".to_string(),
                location: Location::DUMMY,
                target: Some(base),
            },
        );
        let e = db.insert(
            "3",
            DType::Enum {
                name: "state_t".to_string(),
                location: Location::DUMMY,
                underlying: Some(base),
                items: vec![EnumItem {
                    name: "IDLE".to_string(),
                    value: 0,
                }],
            },
        );
        assert_eq!(db.width(r), 4);
        assert_eq!(db.width(e), 4);
    }

    #[test]
    fn find_by_name_first_in_insertion_order() {
        let mut db = DTypeDb::new();
        let first = db.insert("1", basic("logic", None));
        db.insert("2", basic("logic", Some((7, 0))));
        assert_eq!(db.find_by_name("logic"), Some(first));
        assert_eq!(db.find_by_name("missing"), None);
        assert_eq!(db.width_of_name("logic"), Some(1));
    }

    #[test]
    fn dtype_str_rendering() {
        let mut db = DTypeDb::new();
        let vector = db.insert("1", basic("logic", Some((31, 0))));
        let arr = db.insert(
            "2",
            DType::Array {
                location: Location::DUMMY,
                high: 8,
                low: 0,
                packed: false,
                element: Some(vector),
            },
        );
        let packed = db.insert(
            "3",
            DType::Array {
                location: Location::DUMMY,
                high: 1,
                low: 0,
                packed: true,
                element: Some(vector),
            },
        );
        assert_eq!(db.dtype_str(vector), "[31:0] logic");
        assert_eq!(db.dtype_str(arr), "[31:0] logic [8:0]");
        assert_eq!(db.dtype_str(packed), "[1:0] [31:0] logic");
    }

    #[test]
    fn fully_resolved_tracks_children() {
        let mut db = DTypeDb::new();
        let r = db.insert(
            "1",
            DType::Ref {
                name: "t".to_string(),
                location: Location::DUMMY,
                target: None,
            },
        );
        assert!(!db.fully_resolved());
        let base = db.insert("2", basic("logic", None));
        if let DType::Ref { target, .. } = db.get_mut(r) {
            *target = Some(base);
        }
        assert!(db.fully_resolved());
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut db = DTypeDb::new();
        db.insert("b", basic("second", None));
        db.insert("a", basic("first", None));
        let names: Vec<_> = db.iter().map(|(_, t)| t.name().unwrap()).collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn serde_roundtrip() {
        let mut db = DTypeDb::new();
        db.insert("1", basic("logic", Some((7, 0))));
        let json = serde_json::to_string(&db).unwrap();
        let back: DTypeDb = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.width_of_name("logic"), Some(8));
    }
}
