//! Text form of flag values.
//!
//! Values render as member names joined by `", "` (for example `Read, Write`).
//! The zero value renders as the zero member's name, or `0` when the type has
//! none. Bits not covered by any member are appended in hex.

use std::fmt;

use crate::error::{FlagError, Result};
use crate::flag::{FlagType, FlagValue};

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ty = self.flag_type();
        if self.is_zero() {
            return match ty.zero_members().next() {
                Some(zero) => f.write_str(zero.name()),
                None => f.write_str("0"),
            };
        }

        // Prefer wide members first so composite aliases win over their parts
        let mut by_width: Vec<_> = ty.non_zero_members().collect();
        by_width.sort_by(|a, b| b.bits().count_ones().cmp(&a.bits().count_ones()));

        let mut remaining = self.bits();
        let mut chosen = Vec::new();
        for member in by_width {
            if remaining & member.bits() == member.bits() {
                remaining &= !member.bits();
                chosen.push(member.name());
            }
        }

        // Emit in declared order
        let mut first = true;
        for member in ty.non_zero_members() {
            if chosen.contains(&member.name()) {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(member.name())?;
                first = false;
            }
        }
        if remaining != 0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{:#x}", remaining)?;
        }
        Ok(())
    }
}

impl FlagType {
    /// Parse a value from its text form.
    ///
    /// Grammar: items separated by `,` or `|`; each item is a member name
    /// (case insensitive) or an integer literal (decimal or `0x` hex).
    /// An empty string is the empty value.
    ///
    /// # Examples
    /// ```
    /// use impress_flagpicker::FlagType;
    /// let ty = FlagType::new("Permissions", [("Read", 1), ("Write", 2)]).unwrap();
    /// assert_eq!(ty.parse_value("read | Write").unwrap().bits(), 3);
    /// assert!(ty.parse_value("Delete").is_err());
    /// ```
    pub fn parse_value(&self, input: &str) -> Result<FlagValue> {
        let mut bits = 0u64;
        for item in input.split([',', '|']) {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            bits |= self.parse_item(item)?;
        }
        Ok(self.value(bits))
    }

    fn parse_item(&self, item: &str) -> Result<u64> {
        if let Some(member) = self
            .members()
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(item))
        {
            return Ok(member.bits());
        }

        let numeric = match item.strip_prefix("0x").or_else(|| item.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => item.parse::<u64>().ok(),
        };
        numeric.ok_or_else(|| FlagError::UnknownMember {
            type_name: self.name().to_string(),
            name: item.to_string(),
        })
    }
}
