//! Strongly typed vehicle identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a vehicle registered in the storage sink.
///
/// Ids are assigned by whoever owns the vehicle registry; the generator only
/// ever checks that an id exists before writing points for it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct VehicleId(pub u32);

impl VehicleId {
    /// Mix into a 64-bit seed (see [`crate::VehicleRng::new`]).
    #[inline(always)]
    pub fn as_u64(self) -> u64 {
        self.0 as u64
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VehicleId({})", self.0)
    }
}

impl From<u32> for VehicleId {
    #[inline(always)]
    fn from(id: u32) -> VehicleId {
        VehicleId(id)
    }
}

impl TryFrom<i64> for VehicleId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: i64) -> Result<VehicleId, Self::Error> {
        u32::try_from(n).map(VehicleId)
    }
}
