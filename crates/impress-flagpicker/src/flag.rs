//! Core flag types.
//!
//! A [`FlagType`] describes a closed set of named bitmask members. A
//! [`FlagValue`] is a composite of those members, tagged with its type so
//! that values of unrelated types can never be mixed silently.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{FlagError, Result};

/// One named member of a flag type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagMember {
    type_name: Arc<str>,
    name: String,
    bits: u64,
    description: Option<String>,
    display_name: Option<String>,
}

impl FlagMember {
    /// Name of the type this member belongs to.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Declared member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw bit pattern.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Whether this member is the "no selection" sentinel.
    pub fn is_zero(&self) -> bool {
        self.bits == 0
    }

    /// Description annotation, if declared.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Display-name annotation, if declared.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

#[derive(Debug)]
struct FlagTypeInner {
    name: Arc<str>,
    members: Vec<FlagMember>,
}

/// A bitmask enumeration type: a name plus its members in declared order.
///
/// Two `FlagType`s are the same type when they share a name and declare the
/// same members in the same order. Clones of one instance compare without
/// walking the members.
#[derive(Debug, Clone)]
pub struct FlagType {
    inner: Arc<FlagTypeInner>,
}

impl FlagType {
    /// Start describing a flag type.
    pub fn builder(name: impl Into<String>) -> FlagTypeBuilder {
        FlagTypeBuilder::new(name)
    }

    /// Build a type from plain `(name, bits)` pairs.
    ///
    /// # Examples
    /// ```
    /// use impress_flagpicker::FlagType;
    /// let ty = FlagType::new("Permissions", [("None", 0), ("Read", 1), ("Write", 2)]).unwrap();
    /// assert_eq!(ty.members().len(), 3);
    /// ```
    pub fn new<'a>(
        name: impl Into<String>,
        members: impl IntoIterator<Item = (&'a str, u64)>,
    ) -> Result<Self> {
        members
            .into_iter()
            .fold(FlagTypeBuilder::new(name), |b, (n, bits)| b.member(n, bits))
            .build()
    }

    /// Qualified type name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// All members in declared order, zero members included.
    pub fn members(&self) -> &[FlagMember] {
        &self.inner.members
    }

    /// Look up a member by exact name.
    pub fn member(&self, name: &str) -> Option<&FlagMember> {
        self.inner.members.iter().find(|m| m.name == name)
    }

    /// Members whose value is exactly zero.
    pub fn zero_members(&self) -> impl Iterator<Item = &FlagMember> {
        self.inner.members.iter().filter(|m| m.is_zero())
    }

    /// Members whose value is non-zero, in declared order.
    pub fn non_zero_members(&self) -> impl Iterator<Item = &FlagMember> {
        self.inner.members.iter().filter(|m| !m.is_zero())
    }

    /// A value of this type with the given bits.
    pub fn value(&self, bits: u64) -> FlagValue {
        FlagValue {
            ty: self.clone(),
            bits,
        }
    }

    /// The bitwise-empty value of this type.
    pub fn empty(&self) -> FlagValue {
        self.value(0)
    }

    /// The value combining the named members.
    pub fn value_of_names<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<FlagValue> {
        let mut value = self.empty();
        for name in names {
            let member = self.member(name).ok_or_else(|| FlagError::UnknownMember {
                type_name: self.name().to_string(),
                name: name.to_string(),
            })?;
            value = value.union(member)?;
        }
        Ok(value)
    }

    /// Whether `other` is the same type.
    pub fn is_same_type(&self, other: &FlagType) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.name() == other.name() && self.members() == other.members())
    }

    pub(crate) fn check_member(&self, member: &FlagMember) -> Result<()> {
        if self.members().contains(member) {
            Ok(())
        } else {
            Err(FlagError::mismatch(self.name(), member.type_name()))
        }
    }
}

impl PartialEq for FlagType {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_type(other)
    }
}

impl Eq for FlagType {}

// Equal types always share a name
impl Hash for FlagType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

struct PendingMember {
    name: String,
    bits: u64,
    description: Option<String>,
    display_name: Option<String>,
}

/// Builder for runtime-described flag types.
///
/// `description` and `display_name` annotate the most recently added member.
pub struct FlagTypeBuilder {
    name: String,
    members: Vec<PendingMember>,
}

impl FlagTypeBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Add a member.
    pub fn member(mut self, name: impl Into<String>, bits: u64) -> Self {
        self.members.push(PendingMember {
            name: name.into(),
            bits,
            description: None,
            display_name: None,
        });
        self
    }

    /// Attach a description annotation to the last member.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        if let Some(last) = self.members.last_mut() {
            last.description = Some(text.into());
        }
        self
    }

    /// Attach a display-name annotation to the last member.
    pub fn display_name(mut self, text: impl Into<String>) -> Self {
        if let Some(last) = self.members.last_mut() {
            last.display_name = Some(text.into());
        }
        self
    }

    /// Finish the type. Only member names are checked here; member-count and
    /// zero-member rules are enforced when the type is assigned to a model.
    pub fn build(self) -> Result<FlagType> {
        let mut seen = HashSet::new();
        for pending in &self.members {
            if !seen.insert(pending.name.as_str()) {
                return Err(FlagError::DuplicateMember {
                    type_name: self.name.clone(),
                    member: pending.name.clone(),
                });
            }
        }
        Ok(self.finish())
    }

    /// Finish without the name check, for sources that already guarantee
    /// unique names.
    pub(crate) fn finish(self) -> FlagType {
        let type_name: Arc<str> = Arc::from(self.name);
        let members = self
            .members
            .into_iter()
            .map(|pending| FlagMember {
                type_name: Arc::clone(&type_name),
                name: pending.name,
                bits: pending.bits,
                description: pending.description,
                display_name: pending.display_name,
            })
            .collect();

        FlagType {
            inner: Arc::new(FlagTypeInner {
                name: type_name,
                members,
            }),
        }
    }
}

/// A composite value: zero or more members of one flag type OR-ed together.
#[derive(Clone)]
pub struct FlagValue {
    ty: FlagType,
    bits: u64,
}

impl FlagValue {
    /// The type this value belongs to.
    pub fn flag_type(&self) -> &FlagType {
        &self.ty
    }

    /// Raw composite bits.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Whether no bit is set.
    pub fn is_zero(&self) -> bool {
        self.bits == 0
    }

    /// True iff every bit of `member` is set in this value.
    pub fn has_all(&self, member: &FlagMember) -> Result<bool> {
        self.ty.check_member(member)?;
        Ok(self.bits & member.bits == member.bits)
    }

    /// This value with `member`'s bits added.
    pub fn union(&self, member: &FlagMember) -> Result<FlagValue> {
        self.ty.check_member(member)?;
        Ok(self.ty.value(self.bits | member.bits))
    }

    /// This value with exactly `member`'s bits cleared.
    pub fn without(&self, member: &FlagMember) -> Result<FlagValue> {
        self.ty.check_member(member)?;
        Ok(self.ty.value(self.bits & !member.bits))
    }

    /// Members of the value's type fully contained in it, in declared order.
    pub fn members(&self) -> impl Iterator<Item = &FlagMember> {
        self.ty
            .non_zero_members()
            .filter(move |m| self.bits & m.bits == m.bits)
    }
}

impl PartialEq for FlagValue {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits && self.ty == other.ty
    }
}

impl Eq for FlagValue {}

impl Hash for FlagValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.hash(state);
        self.bits.hash(state);
    }
}

impl fmt::Debug for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.ty.name(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permissions() -> FlagType {
        FlagType::new(
            "Permissions",
            [("None", 0), ("Read", 1), ("Write", 2), ("Execute", 4)],
        )
        .unwrap()
    }

    #[test]
    fn member_lookup() {
        let ty = permissions();
        assert_eq!(ty.member("Write").unwrap().bits(), 2);
        assert!(ty.member("write").is_none());
        assert!(ty.member("None").unwrap().is_zero());
    }

    #[test]
    fn zero_and_non_zero_split() {
        let ty = permissions();
        let zero: Vec<&str> = ty.zero_members().map(|m| m.name()).collect();
        let rest: Vec<&str> = ty.non_zero_members().map(|m| m.name()).collect();
        assert_eq!(zero, vec!["None"]);
        assert_eq!(rest, vec!["Read", "Write", "Execute"]);
    }

    #[test]
    fn union_and_without() {
        let ty = permissions();
        let read = ty.member("Read").unwrap();
        let write = ty.member("Write").unwrap();

        let rw = ty.empty().union(read).unwrap().union(write).unwrap();
        assert_eq!(rw.bits(), 3);
        assert!(rw.has_all(read).unwrap());

        let w = rw.without(read).unwrap();
        assert_eq!(w.bits(), 2);
        assert!(!w.has_all(read).unwrap());
        assert!(w.has_all(write).unwrap());
    }

    #[test]
    fn has_all_requires_every_bit() {
        let ty = FlagType::new("Rw", [("Read", 1), ("Write", 2), ("ReadWrite", 3)]).unwrap();
        let read = ty.value(1);
        assert!(!read.has_all(ty.member("ReadWrite").unwrap()).unwrap());
        assert!(ty.value(3).has_all(ty.member("ReadWrite").unwrap()).unwrap());
    }

    #[test]
    fn cross_type_operations_fail() {
        let ty = permissions();
        let colors = FlagType::new("Colors", [("Red", 1), ("Green", 2)]).unwrap();
        let red = colors.member("Red").unwrap();

        let err = ty.empty().union(red).unwrap_err();
        assert!(matches!(err, FlagError::TypeMismatch { .. }));
        assert!(ty.empty().has_all(red).is_err());
        assert!(ty.empty().without(red).is_err());
    }

    #[test]
    fn duplicate_member_rejected() {
        let err = FlagType::new("Dup", [("A", 1), ("A", 2)]).unwrap_err();
        assert!(matches!(err, FlagError::DuplicateMember { .. }));
    }

    #[test]
    fn annotations_attach_to_last_member() {
        let ty = FlagType::builder("Annotated")
            .member("Read", 1)
            .description("Can read")
            .member("Write", 2)
            .display_name("Write access")
            .build()
            .unwrap();
        let read = ty.member("Read").unwrap();
        let write = ty.member("Write").unwrap();
        assert_eq!(read.description(), Some("Can read"));
        assert_eq!(read.display_name(), None);
        assert_eq!(write.display_name(), Some("Write access"));
    }

    #[test]
    fn identity_is_name_and_members() {
        let a = permissions();
        let b = permissions();
        assert_eq!(a, b);
        assert_eq!(a.value(3), b.value(3));
        assert_ne!(a.value(3), a.value(1));

        let other = FlagType::new("Permissions", [("Delete", 8)]).unwrap();
        assert_ne!(a, other);
        assert_ne!(a.value(8), other.value(8));
    }

    #[test]
    fn same_named_member_of_other_type_rejected() {
        let ty = permissions();
        let other = FlagType::new("Permissions", [("Read", 1), ("Delete", 8)]).unwrap();
        let delete = other.member("Delete").unwrap();
        let err = ty.empty().union(delete).unwrap_err();
        assert!(matches!(err, FlagError::TypeMismatch { .. }));
        // An identical member declaration is interchangeable
        assert!(ty.empty().union(other.member("Read").unwrap()).is_ok());
    }

    #[test]
    fn value_members_in_declared_order() {
        let ty = permissions();
        let value = ty.value_of_names(["Execute", "Read"]).unwrap();
        let names: Vec<&str> = value.members().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Read", "Execute"]);
    }
}
