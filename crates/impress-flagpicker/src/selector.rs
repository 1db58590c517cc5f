//! The flag selection widget.
//!
//! [`FlagSelector`] is the control a host binds to: a flag type, a composite
//! value, a naming strategy, a flow direction and a payload-free change
//! event. It comes in two variants sharing the same model and sync:
//!
//! - check list ([`SelectionMode::Multiple`]): independent toggles, any
//!   combination of members
//! - radio group ([`SelectionMode::Exclusive`]): checking one toggle clears
//!   the others in the same transition
//!
//! Rendering is left to the host. It reads [`FlagSelector::toggles`] and
//! forwards user clicks to [`FlagSelector::toggle`].

use std::fmt;

use crate::config::{FlowDirection, SelectionMode, SelectorConfig};
use crate::error::{FlagError, Result};
use crate::flag::{FlagMember, FlagType, FlagValue};
use crate::model::FlagSetModel;
use crate::names::NameResolver;
use crate::toggles::{ToggleCollection, ToggleEntry, ToggleInput};

/// Handle for removing a change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&FlagSelector)>;

/// A flag-selection control.
pub struct FlagSelector {
    mode: SelectionMode,
    model: FlagSetModel,
    toggles: ToggleCollection,
    value: Option<FlagValue>,
    resolver: NameResolver,
    flow_direction: FlowDirection,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl FlagSelector {
    /// Create a selector with no type assigned.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            model: FlagSetModel::new(),
            toggles: ToggleCollection::new(mode),
            value: None,
            resolver: NameResolver::default(),
            flow_direction: FlowDirection::default(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Independent check boxes.
    pub fn check_list() -> Self {
        Self::new(SelectionMode::Multiple)
    }

    /// Mutually exclusive radio buttons.
    pub fn radio_group() -> Self {
        Self::new(SelectionMode::Exclusive)
    }

    /// Create a selector from loaded settings.
    pub fn from_config(config: &SelectorConfig) -> Self {
        let mut selector = Self::new(config.mode);
        selector.flow_direction = config.flow_direction;
        selector.resolver = config.name_style.into();
        selector
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// The assigned flag type.
    pub fn flag_type(&self) -> Option<&FlagType> {
        self.model.flag_type()
    }

    /// Assign a flag type, or clear it with `None`.
    ///
    /// Toggles are rebuilt from scratch and the value resets to the type's
    /// initial value (see [`FlagSetModel::initial_value`]). A rejected type
    /// leaves the selector untouched.
    pub fn set_flag_type(&mut self, ty: Option<FlagType>) -> Result<()> {
        self.model.set_type(ty)?;
        self.toggles.rebuild(&self.model, &self.resolver);
        let initial = self.model.initial_value();
        self.commit(initial)
    }

    /// Return to the unset state.
    pub fn clear_type(&mut self) -> Result<()> {
        self.set_flag_type(None)
    }

    /// The current composite value.
    pub fn value(&self) -> Option<&FlagValue> {
        self.value.as_ref()
    }

    /// Assign the composite value directly.
    ///
    /// `None` selects the zero member when the type has one. Listeners are
    /// notified only if the value actually changed.
    pub fn set_value(&mut self, value: Option<FlagValue>) -> Result<()> {
        let coerced = self.model.coerce(value)?;
        self.commit(coerced)
    }

    /// Members fully contained in the current value, in declared order.
    pub fn selected_members(&self) -> impl Iterator<Item = &FlagMember> {
        self.value.iter().flat_map(|v| v.members())
    }

    pub fn name_resolver(&self) -> &NameResolver {
        &self.resolver
    }

    /// Change the naming strategy and relabel the existing toggles.
    pub fn set_name_resolver(&mut self, resolver: NameResolver) {
        tracing::debug!(?resolver, "name resolver changed");
        self.resolver = resolver;
        self.toggles.relabel(&self.resolver);
    }

    pub fn flow_direction(&self) -> FlowDirection {
        self.flow_direction
    }

    pub fn set_flow_direction(&mut self, direction: FlowDirection) {
        self.flow_direction = direction;
    }

    /// Toggles in declared member order.
    pub fn toggles(&self) -> &[ToggleEntry] {
        self.toggles.entries()
    }

    pub fn toggle_collection(&self) -> &ToggleCollection {
        &self.toggles
    }

    /// Register a change listener.
    ///
    /// The event carries no payload. Listeners receive the selector itself,
    /// already updated, and re-read whatever they need from it.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&FlagSelector) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// A toggle changed state in the host UI.
    ///
    /// Events that match the toggle's current state are ignored, which keeps
    /// hosts that echo programmatic updates back from looping.
    pub fn toggle(&mut self, index: usize, checked: bool) -> Result<()> {
        match self.toggles.set_checked(index, checked)? {
            Some(input) => self.handle_toggle(input),
            None => Ok(()),
        }
    }

    /// [`FlagSelector::toggle`] by member name.
    pub fn toggle_by_name(&mut self, name: &str, checked: bool) -> Result<()> {
        let ty = self.model.flag_type().ok_or(FlagError::NoTypeAssigned)?;
        let index = self
            .toggles
            .position(name)
            .ok_or_else(|| FlagError::UnknownMember {
                type_name: ty.name().to_string(),
                name: name.to_string(),
            })?;
        self.toggle(index, checked)
    }

    fn handle_toggle(&mut self, input: ToggleInput) -> Result<()> {
        // Radio groups drop the other members before adding the new one
        let base = match (self.mode, input.checked) {
            (SelectionMode::Exclusive, true) => None,
            _ => self.value.clone(),
        };

        let transition = self
            .model
            .next_value(base.as_ref(), &input.member, input.checked)?;

        if transition.accepted {
            return self.commit(transition.value);
        }

        tracing::debug!(
            member = input.member.name(),
            "toggle would leave no selection; reverting"
        );
        self.toggles.reflect_value(self.value.as_ref())
    }

    fn commit(&mut self, value: Option<FlagValue>) -> Result<()> {
        self.toggles.reflect_value(value.as_ref())?;
        if self.value == value {
            return Ok(());
        }

        let shown = value.as_ref().map(ToString::to_string).unwrap_or_default();
        tracing::debug!(value = %shown, "selection changed");
        self.value = value;

        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in &mut listeners {
            listener(self);
        }
        self.listeners = listeners;
        Ok(())
    }
}

impl Default for FlagSelector {
    fn default() -> Self {
        Self::check_list()
    }
}

impl fmt::Debug for FlagSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSelector")
            .field("mode", &self.mode)
            .field("flag_type", &self.model.flag_type().map(|t| t.name()))
            .field("value", &self.value)
            .field("resolver", &self.resolver)
            .field("flow_direction", &self.flow_direction)
            .field("toggles", &self.toggles.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
