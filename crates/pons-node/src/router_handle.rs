//! Index into the simulator's router table.
//!
//! A `Node` never owns or back-points to its `Router` (per the no-back-
//! pointer rule for arena-held objects); it carries only this handle, which
//! the owning simulator resolves against its router arena.

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouterHandle(pub u32);

impl RouterHandle {
    pub const INVALID: RouterHandle = RouterHandle(u32::MAX);

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for RouterHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl From<u32> for RouterHandle {
    fn from(n: u32) -> Self {
        RouterHandle(n)
    }
}
