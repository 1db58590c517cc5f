//! Flag set model: type validation and value transitions.
//!
//! The model holds the assigned [`FlagType`], its zero member (the "no
//! selection" sentinel, if any) and its non-zero members. It owns no value;
//! callers pass the current composite in and get the next one back.

use crate::error::{FlagError, Result};
use crate::flag::{FlagMember, FlagType, FlagValue};

/// Outcome of toggling one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The composite to show. Equal to the previous composite when rejected.
    pub value: Option<FlagValue>,
    /// False when the toggle would empty a type that has no zero member.
    pub accepted: bool,
}

/// Validated flag type plus the pure value-transition rules.
#[derive(Debug, Clone, Default)]
pub struct FlagSetModel {
    ty: Option<FlagType>,
    zero: Option<FlagMember>,
    members: Vec<FlagMember>,
}

impl FlagSetModel {
    /// Create a model with no type assigned.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a type, or clear it with `None`.
    ///
    /// The type must declare at least one member and at most one zero
    /// member. On error the model is left exactly as it was.
    pub fn set_type(&mut self, ty: Option<FlagType>) -> Result<()> {
        let Some(ty) = ty else {
            *self = Self::default();
            return Ok(());
        };

        if ty.members().is_empty() {
            return Err(FlagError::NoMembers {
                type_name: ty.name().to_string(),
            });
        }

        let zeros: Vec<&FlagMember> = ty.zero_members().collect();
        if zeros.len() > 1 {
            return Err(FlagError::MultipleZeroMembers {
                type_name: ty.name().to_string(),
                members: zeros.iter().map(|m| m.name().to_string()).collect(),
            });
        }

        let zero = zeros.first().map(|m| (*m).clone());
        let members = ty.non_zero_members().cloned().collect();
        tracing::debug!(
            type_name = ty.name(),
            has_zero = zero.is_some(),
            "flag type assigned"
        );

        self.zero = zero;
        self.members = members;
        self.ty = Some(ty);
        Ok(())
    }

    /// The assigned type.
    pub fn flag_type(&self) -> Option<&FlagType> {
        self.ty.as_ref()
    }

    /// The zero member, if the type declares one.
    pub fn zero_member(&self) -> Option<&FlagMember> {
        self.zero.as_ref()
    }

    /// Non-zero members in declared order.
    pub fn members(&self) -> &[FlagMember] {
        &self.members
    }

    /// Value a freshly assigned type starts with: the zero member if there is
    /// one, otherwise the first non-zero member.
    pub fn initial_value(&self) -> Option<FlagValue> {
        let ty = self.ty.as_ref()?;
        match (&self.zero, self.members.first()) {
            (Some(_), _) => Some(ty.empty()),
            (None, Some(first)) => Some(ty.value(first.bits())),
            (None, None) => None,
        }
    }

    /// Compute the composite after `toggled` is checked or unchecked.
    ///
    /// Reaching bitwise zero without a zero member is refused: the result
    /// carries the previous composite and `accepted == false`.
    pub fn next_value(
        &self,
        current: Option<&FlagValue>,
        toggled: &FlagMember,
        checked: bool,
    ) -> Result<Transition> {
        let ty = self.ty.as_ref().ok_or(FlagError::NoTypeAssigned)?;
        if let Some(current) = current {
            self.check_type(current)?;
        }

        let base = current.cloned().unwrap_or_else(|| ty.empty());
        let computed = if checked {
            base.union(toggled)?
        } else {
            base.without(toggled)?
        };

        if !computed.is_zero() {
            return Ok(Transition {
                value: Some(computed),
                accepted: true,
            });
        }

        match self.zero {
            Some(_) => Ok(Transition {
                value: Some(ty.empty()),
                accepted: true,
            }),
            None => Ok(Transition {
                value: current.cloned(),
                accepted: false,
            }),
        }
    }

    /// Validate a directly assigned value.
    ///
    /// `None` becomes the zero member when there is one. A value of another
    /// type, or an empty value without a zero member, is an error.
    pub fn coerce(&self, candidate: Option<FlagValue>) -> Result<Option<FlagValue>> {
        let Some(candidate) = candidate else {
            return Ok(match (&self.ty, &self.zero) {
                (Some(ty), Some(_)) => Some(ty.empty()),
                _ => None,
            });
        };

        self.check_type(&candidate)?;
        if candidate.is_zero() && self.zero.is_none() {
            return Err(FlagError::InvalidZero {
                type_name: candidate.flag_type().name().to_string(),
            });
        }
        Ok(Some(candidate))
    }

    fn check_type(&self, value: &FlagValue) -> Result<()> {
        let ty = self.ty.as_ref().ok_or(FlagError::NoTypeAssigned)?;
        if ty.is_same_type(value.flag_type()) {
            Ok(())
        } else {
            Err(FlagError::mismatch(ty.name(), value.flag_type().name()))
        }
    }
}
