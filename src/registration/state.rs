//! Declared and used middleware registrations.

use crate::error::Error;

use super::TypeKey;

/// Tracks which middleware registrations were declared by discovery and
/// which were activated since.
///
/// Both sets only grow. A declared type moves to used at most once: a second
/// activation is an error and leaves the state untouched. Owned by the
/// [`AppBuilder`](crate::AppBuilder) and then by the [`App`](crate::App) it
/// builds, so every host starts from an empty state.
#[derive(Clone, Debug, Default)]
pub struct RegistrationState {
    declared: Vec<TypeKey>,
    used: Vec<TypeKey>,
}

impl RegistrationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key` to the declared set. Returns `false` if it was already there.
    pub fn declare(&mut self, key: TypeKey) -> bool {
        if self.declared.contains(&key) {
            return false;
        }
        self.declared.push(key);
        true
    }

    pub fn is_declared(&self, key: TypeKey) -> bool {
        self.declared.contains(&key)
    }

    pub fn is_used(&self, key: TypeKey) -> bool {
        self.used.contains(&key)
    }

    /// Declared middleware, in discovery order.
    pub fn declared(&self) -> &[TypeKey] {
        &self.declared
    }

    /// Activated middleware, in activation order.
    pub fn used(&self) -> &[TypeKey] {
        &self.used
    }

    /// Declared but not yet activated, in discovery order.
    pub fn unused(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.declared.iter().copied().filter(|key| !self.is_used(*key))
    }

    /// Fails with [`Error::DuplicateActivation`] if `key` was already activated.
    pub fn ensure_unused(&self, key: TypeKey) -> Result<(), Error> {
        if self.is_used(key) {
            return Err(Error::DuplicateActivation { name: key.short_name() });
        }
        Ok(())
    }

    /// Records `key` as activated.
    ///
    /// Callers check [`ensure_unused`](Self::ensure_unused) first and install
    /// the middleware in between; this only appends.
    pub(crate) fn mark_used(&mut self, key: TypeKey) {
        debug_assert!(!self.is_used(key), "{} marked used twice", key.name());
        self.used.push(key);
    }

    /// Fails with [`Error::IncompleteRegistration`] naming every declared
    /// middleware that was never activated.
    pub fn validate(&self) -> Result<(), Error> {
        let names: Vec<_> = self.unused().map(|key| key.name()).collect();
        if !names.is_empty() {
            return Err(Error::IncompleteRegistration { names });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn declare_is_idempotent() {
        let mut state = RegistrationState::new();
        assert!(state.declare(TypeKey::of::<A>()));
        assert!(!state.declare(TypeKey::of::<A>()));
        assert_eq!(state.declared().len(), 1);
    }

    #[test]
    fn second_activation_fails_and_keeps_used_size() {
        let mut state = RegistrationState::new();
        state.ensure_unused(TypeKey::of::<A>()).unwrap();
        state.mark_used(TypeKey::of::<A>());

        let err = state.ensure_unused(TypeKey::of::<A>()).unwrap_err();
        assert!(matches!(err, Error::DuplicateActivation { name: "A" }));
        assert_eq!(state.used().len(), 1);
    }

    #[test]
    fn validate_passes_when_all_declared_are_used() {
        let mut state = RegistrationState::new();
        state.declare(TypeKey::of::<A>());
        state.declare(TypeKey::of::<B>());
        state.mark_used(TypeKey::of::<B>());
        state.mark_used(TypeKey::of::<A>());

        assert!(state.validate().is_ok());
    }

    #[test]
    fn validate_names_only_the_unused() {
        let mut state = RegistrationState::new();
        state.declare(TypeKey::of::<A>());
        state.declare(TypeKey::of::<B>());
        state.mark_used(TypeKey::of::<A>());

        let Err(Error::IncompleteRegistration { names }) = state.validate() else {
            panic!("expected incomplete registration");
        };
        assert_eq!(names, vec![TypeKey::of::<B>().name()]);
    }

    #[test]
    fn used_but_undeclared_does_not_fail_validation() {
        let mut state = RegistrationState::new();
        state.mark_used(TypeKey::of::<A>());
        assert!(state.validate().is_ok());
        assert!(!state.is_declared(TypeKey::of::<A>()));
    }
}
