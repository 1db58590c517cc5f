//! Toggle entries and their sync with the composite value.
//!
//! Every checked-state write goes through [`ToggleCollection::set_checked`],
//! whether it comes from the user or from [`ToggleCollection::reflect_value`].
//! While a reflection runs the collection is "syncing", and the change events
//! its own writes produce are dropped instead of being handed back as input.

use crate::config::SelectionMode;
use crate::error::{FlagError, Result};
use crate::flag::{FlagMember, FlagValue};
use crate::model::FlagSetModel;
use crate::names::NameResolver;

/// One toggle, bound to a single non-zero member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleEntry {
    member: FlagMember,
    label: String,
    checked: bool,
}

impl ToggleEntry {
    /// The member this toggle stands for.
    pub fn member(&self) -> &FlagMember {
        &self.member
    }

    /// Bits of the bound member.
    pub fn bits(&self) -> u64 {
        self.member.bits()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }
}

/// A genuine user toggle, ready for the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleInput {
    pub index: usize,
    pub member: FlagMember,
    pub checked: bool,
}

/// The toggle entries of one selector.
#[derive(Debug, Default)]
pub struct ToggleCollection {
    mode: SelectionMode,
    entries: Vec<ToggleEntry>,
    syncing: bool,
    suppressed: usize,
}

impl ToggleCollection {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn entries(&self) -> &[ToggleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a model-to-toggle reflection is in progress.
    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    /// Change events dropped during reflections so far.
    pub fn suppressed_events(&self) -> usize {
        self.suppressed
    }

    /// Index of the toggle bound to the member named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.member.name() == name)
    }

    /// Replace every entry with one per non-zero member of `model`, all
    /// unchecked, labeled with `resolver`.
    pub fn rebuild(&mut self, model: &FlagSetModel, resolver: &NameResolver) {
        self.entries.clear();
        self.entries.extend(model.members().iter().map(|member| ToggleEntry {
            label: resolver.label(member),
            member: member.clone(),
            checked: false,
        }));
        tracing::debug!(count = self.entries.len(), "toggles rebuilt");
    }

    /// Recompute every label with `resolver`, keeping entries and state.
    pub fn relabel(&mut self, resolver: &NameResolver) {
        for entry in &mut self.entries {
            entry.label = resolver.label(&entry.member);
        }
    }

    /// Project `value` onto the toggles: an entry is checked iff all of its
    /// member's bits are set. An absent value unchecks everything.
    ///
    /// In exclusive mode, when some entry's bits equal the value exactly, only
    /// those entries are checked. Picking an alias such as `ReadWrite = 3`
    /// then shows one radio button instead of three.
    ///
    /// Never produces [`ToggleInput`].
    pub fn reflect_value(&mut self, value: Option<&FlagValue>) -> Result<()> {
        let exact = match (self.mode, value) {
            (SelectionMode::Exclusive, Some(v)) => {
                self.entries.iter().any(|e| e.bits() == v.bits())
            }
            _ => false,
        };

        let targets = self
            .entries
            .iter()
            .map(|entry| match value {
                Some(v) => {
                    let contained = v.has_all(&entry.member)?;
                    Ok(if exact { entry.bits() == v.bits() } else { contained })
                }
                None => Ok(false),
            })
            .collect::<Result<Vec<bool>>>()?;

        let previous = std::mem::replace(&mut self.syncing, true);
        let result = targets
            .into_iter()
            .enumerate()
            .try_for_each(|(index, checked)| self.set_checked(index, checked).map(|_| ()));
        self.syncing = previous;
        result
    }

    /// Write one entry's checked state.
    ///
    /// Returns the input to act on when the state actually changed outside a
    /// reflection; `None` when nothing changed or the event was suppressed.
    pub fn set_checked(&mut self, index: usize, checked: bool) -> Result<Option<ToggleInput>> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(FlagError::IndexOutOfRange { index, len })?;

        if entry.checked == checked {
            return Ok(None);
        }
        entry.checked = checked;

        if self.syncing {
            self.suppressed += 1;
            tracing::trace!(index, checked, "suppressed toggle event during sync");
            return Ok(None);
        }

        Ok(Some(ToggleInput {
            index,
            member: entry.member.clone(),
            checked,
        }))
    }
}
