//! Group-traversal order: which group(s) get refined on a given
//! iteration of the outer optimizer loop.

/// How the outer loop picks which group(s) to refine each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Flatten every group's searched parameters into one and refine them
    /// all together, every iteration.
    Global,
    /// Visit every group once per iteration, in order.
    Cyclical,
    /// Refine only the group with the largest smoothed precision (the
    /// one that has shrunk the least so far).
    WeakestGroup,
    /// Same idea as `WeakestGroup` but at per-parameter granularity: the
    /// single searched parameter, across all groups, with the largest
    /// smoothed precision is refined on its own.
    WeakestDimension,
}
