/// The extension seam described by the callback policy: a statically-bound
/// set of hooks invoked on structural events, so augmented trees (interval,
/// sum, rank metadata) can ride along with the balancing machinery without
/// reimplementing it.
///
/// Every method has a no-op default, so an implementor only overrides the
/// events it cares about; unused hooks are inlined away entirely rather than
/// costing a vtable dispatch, matching the "zero-cost when unused, statically
/// resolvable" requirement.
///
/// Callbacks may read tree state (via the element they're handed) but must
/// not mutate linkage — doing so from inside a callback races the fixup walk
/// that invoked it and is not supported.
pub trait Callbacks<E> {
    /// `n` was just attached as a red leaf, before insert-fixup runs.
    #[inline]
    fn leaf_inserted(&mut self, n: &E) {
        let _ = n;
    }

    /// A left rotation just completed; `n` is the node that moved *down*
    /// (the subtree's former root), not the one that moved up.
    #[inline]
    fn rotated_left(&mut self, n: &E) {
        let _ = n;
    }

    /// Symmetric to [`Callbacks::rotated_left`].
    #[inline]
    fn rotated_right(&mut self, n: &E) {
        let _ = n;
    }

    /// Two-child deletion relinked `a` (the node being removed) into `b`'s
    /// former position (`b` was the in-order successor). Fired exactly once,
    /// at the moment of exchange, before the splice and delete-fixup.
    #[inline]
    fn swapped(&mut self, a: &E, b: &E) {
        let (_, _) = (a, b);
    }

    /// `n` is about to be detached at the end of removal.
    #[inline]
    fn delete_leaf(&mut self, n: &E) {
        let _ = n;
    }
}

/// The default, no-op callback policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallbacks;

impl<E> Callbacks<E> for NoopCallbacks {}
