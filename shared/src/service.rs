//! 领域服务层
//!
//! 每个服务只是 `ApiClient` 上的一层薄类型封装：不做校验、不重试、不缓存。

mod auth;
mod booking;
mod rental;
mod staff;
mod vehicle;

pub use auth::AuthService;
pub use booking::BookingService;
pub use rental::RentalService;
pub use staff::StaffService;
pub use vehicle::VehicleService;

use crate::error::{ClientError, ClientResult};
use crate::model::Id;

/// 依赖站点的接口在发请求前检查 stationId
fn require_station(station_id: Option<Id>) -> ClientResult<Id> {
    station_id.ok_or_else(|| ClientError::validation("stationId", "Missing stationId in user"))
}
