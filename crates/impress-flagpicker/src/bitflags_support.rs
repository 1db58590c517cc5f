//! Interop with types generated by the `bitflags` macro.

use bitflags::Flags;

use crate::error::{FlagError, Result};
use crate::flag::{FlagType, FlagValue};

impl FlagType {
    /// Describe a `bitflags` type, named after its Rust type name.
    ///
    /// Unnamed flags (`const _ = ...`) are skipped.
    pub fn of<F>() -> FlagType
    where
        F: Flags,
        F::Bits: Into<u64>,
    {
        // Member names are Rust constants, so they are already unique
        F::FLAGS
            .iter()
            .filter(|flag| !flag.name().is_empty())
            .fold(FlagType::builder(std::any::type_name::<F>()), |b, flag| {
                b.member(flag.name(), flag.value().bits().into())
            })
            .finish()
    }
}

impl FlagValue {
    /// Convert a `bitflags` value into a tagged composite value.
    pub fn from_flags<F>(flags: F) -> FlagValue
    where
        F: Flags,
        F::Bits: Into<u64>,
    {
        FlagType::of::<F>().value(flags.bits().into())
    }

    /// Convert back into a `bitflags` value, checking the type.
    pub fn to_flags<F>(&self) -> Result<F>
    where
        F: Flags,
        F::Bits: Into<u64> + TryFrom<u64>,
    {
        let expected = FlagType::of::<F>();
        if !self.flag_type().is_same_type(&expected) {
            return Err(FlagError::mismatch(expected.name(), self.flag_type().name()));
        }
        let bits = <F::Bits as TryFrom<u64>>::try_from(self.bits()).map_err(|_| {
            FlagError::BitsOutOfRange {
                type_name: expected.name().to_string(),
                bits: self.bits(),
            }
        })?;
        Ok(F::from_bits_retain(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitflags::bitflags;

    bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct Access: u8 {
            const NONE = 0;
            const READ = 1;
            const WRITE = 1 << 1;
            const EXECUTE = 1 << 2;
        }
    }

    bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct Colors: u32 {
            const RED = 1;
            const GREEN = 2;
        }
    }

    #[test]
    fn describes_members_in_order() {
        let ty = FlagType::of::<Access>();
        let names: Vec<&str> = ty.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["NONE", "READ", "WRITE", "EXECUTE"]);
        assert_eq!(ty.zero_members().count(), 1);
        assert!(ty.name().ends_with("Access"));
    }

    #[test]
    fn value_conversion() {
        let value = FlagValue::from_flags(Access::READ | Access::EXECUTE);
        assert_eq!(value.bits(), 5);
        assert_eq!(value.to_flags::<Access>().unwrap(), Access::READ | Access::EXECUTE);
    }

    #[test]
    fn conversion_checks_type() {
        let value = FlagValue::from_flags(Colors::RED);
        let err = value.to_flags::<Access>().unwrap_err();
        assert!(matches!(err, FlagError::TypeMismatch { .. }));
    }

    #[test]
    fn conversion_rejects_same_named_runtime_type() {
        let lookalike = FlagType::new(std::any::type_name::<Access>(), [("READ", 1)]).unwrap();
        let err = lookalike.value(1).to_flags::<Access>().unwrap_err();
        assert!(matches!(err, FlagError::TypeMismatch { .. }));
    }

    #[test]
    fn conversion_checks_width() {
        let value = FlagType::of::<Access>().value(0x1_00);
        let err = value.to_flags::<Access>().unwrap_err();
        assert!(matches!(err, FlagError::BitsOutOfRange { bits: 0x100, .. }));
    }
}
