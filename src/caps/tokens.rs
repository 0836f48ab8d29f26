//! Capability tokens.

use std::fmt;
use std::marker::PhantomData;

/// Proof that a gate check passed.
///
/// Only [`CapabilityAuthority`](super::authority::CapabilityAuthority) can
/// build one (`new` is `pub(super)`), and it is neither `Clone` nor `Copy`,
/// so a token handed to the dispatcher cannot be reused for another
/// invocation.
///
/// ```ignore
/// let grant: Cap<InvokeCap> = authority.authorize(spec, &invocation).await?;
/// registry.dispatch(ctx, route, grant).await;
/// ```
pub struct Cap<T: Capability> {
    scope: T::Scope,
    _marker: PhantomData<T>,
}

impl<T: Capability> Cap<T> {
    #[inline]
    pub(super) fn new(scope: T::Scope) -> Self {
        Self {
            scope,
            _marker: PhantomData,
        }
    }

    /// What the token was granted for.
    #[inline]
    pub fn scope(&self) -> &T::Scope {
        &self.scope
    }

    #[inline]
    pub fn into_scope(self) -> T::Scope {
        self.scope
    }
}

impl<T: Capability> fmt::Debug for Cap<T>
where
    T::Scope: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cap")
            .field("capability", &T::NAME)
            .field("scope", &self.scope)
            .finish()
    }
}

impl<T: Capability> fmt::Display for Cap<T>
where
    T::Scope: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cap<{}>({})", T::NAME, self.scope)
    }
}

/// A kind of authorization the authority can grant.
pub trait Capability: 'static + Send + Sync {
    /// What a grant is scoped to: a principal, a permission, a command.
    type Scope: Clone + Send + Sync;

    /// Name used in grant/denial logs.
    const NAME: &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Principal;

    struct MemberCap;
    impl Capability for MemberCap {
        type Scope = Principal;
        const NAME: &'static str = "test:member";
    }

    #[test]
    fn cap_exposes_scope() {
        let cap = Cap::<MemberCap>::new(Principal::from(42u64));
        assert_eq!(*cap.scope(), Principal::from(42u64));
        assert_eq!(cap.into_scope(), Principal::from(42u64));
    }

    #[test]
    fn cap_formats_with_capability_name() {
        let cap = Cap::<MemberCap>::new(Principal::from(42u64));
        assert_eq!(cap.to_string(), "Cap<test:member>(42)");
        assert!(format!("{cap:?}").contains("test:member"));
    }

    #[test]
    fn cap_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Cap<MemberCap>>();
    }
}
