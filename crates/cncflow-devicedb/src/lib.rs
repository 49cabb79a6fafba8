//! # CNCFlow Device Database
//!
//! Machine and machine profile travel-limit records, the store that holds
//! them, and the update forms that edit them.

pub mod error;
pub mod forms;
pub mod model;
pub mod store;

pub use error::{DeviceError, DeviceResult, ProfileError, ProfileResult};
pub use forms::{coerce_number, LimitFields, MachineProfileUpdateForm, MachineUpdateForm};
pub use model::{
    MachineProfileRecord, MachineProfileUpdate, MachineRecord, MachineUpdate, TravelLimits,
};
pub use store::RecordStore;
