mod basis_info;
mod device_info;
mod general_info;
mod output;
mod zone;

pub use basis_info::BasisInfo;
pub use device_info::{DeviceInfo, MANUFACTURER};
pub use general_info::GeneralInfo;
pub use output::{OUTPUT_CONTROL, OUTPUT_OFF, OUTPUT_OFF_VALUE, OUTPUT_ON, OUTPUT_ON_VALUE, OutputStatus};
pub use zone::{Zone, ZoneStatus};
