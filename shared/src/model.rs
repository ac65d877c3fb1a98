//! 领域模型
//!
//! 所有线上类型均为 camelCase JSON。后端数据质量参差，因此结构体普遍带
//! `#[serde(default)]`，单个缺失字段不会让整条记录解析失败；展示用的字符串和
//! 读数再经过 [`lenient`]，`null` 或类型不符的值退回默认值。

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::date;

pub type Id = i64;

/// 展示字段的宽松反序列化
///
/// 与 [`date::lenient`] 同一思路：先读成 `serde_json::Value`，无法识别的值落到默认值。
/// 数值读数四舍五入后截断到目标范围。
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::VehicleStatus;

    fn text(raw: Value) -> Option<String> {
        match raw {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn reading(raw: &Value, max: f64) -> Option<f64> {
        let n = match raw {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then(|| n.round().clamp(0.0, max))
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(text(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(text(Value::deserialize(deserializer)?))
    }

    /// 电量百分比，0-100
    pub fn percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        Ok(opt_percent(deserializer)?.unwrap_or_default())
    }

    pub fn opt_percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(reading(&raw, 100.0).map(|n| n as u8))
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        Ok(opt_count(deserializer)?.unwrap_or_default())
    }

    pub fn opt_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(reading(&raw, u32::MAX as f64).map(|n| n as u32))
    }

    /// `null` 与非字符串视为 `Unknown`
    pub fn status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<VehicleStatus, D::Error> {
        match Value::deserialize(deserializer)? {
            raw @ Value::String(_) => Ok(serde_json::from_value(raw).unwrap_or_default()),
            _ => Ok(VehicleStatus::Unknown),
        }
    }
}

// =========================================================
// 车辆 (Vehicle)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VehicleStatus {
    #[serde(alias = "available", alias = "AVAILABLE", alias = "Ready", alias = "ready")]
    Available,
    #[serde(alias = "booked", alias = "BOOKED", alias = "Reserved", alias = "reserved")]
    Booked,
    #[serde(
        alias = "inUse",
        alias = "in_use",
        alias = "IN_USE",
        alias = "Rented",
        alias = "rented"
    )]
    InUse,
    #[serde(alias = "maintenance", alias = "MAINTENANCE")]
    Maintenance,
    #[serde(alias = "damaged", alias = "DAMAGED")]
    Damaged,
    /// 无法识别的状态字符串，只做展示，不参与任何操作
    #[default]
    #[serde(other)]
    Unknown,
}

impl VehicleStatus {
    /// 查询参数中使用的规范名
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "Available",
            VehicleStatus::Booked => "Booked",
            VehicleStatus::InUse => "InUse",
            VehicleStatus::Maintenance => "Maintenance",
            VehicleStatus::Damaged => "Damaged",
            VehicleStatus::Unknown => "Unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "Ready",
            VehicleStatus::Booked => "Booked",
            VehicleStatus::InUse => "Rented",
            VehicleStatus::Maintenance => "Maintenance",
            VehicleStatus::Damaged => "Damaged",
            VehicleStatus::Unknown => "Unknown",
        }
    }

    /// DaisyUI 徽章类
    pub fn badge_class(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "badge badge-success",
            VehicleStatus::Booked => "badge badge-warning",
            VehicleStatus::InUse => "badge badge-info",
            VehicleStatus::Maintenance => "badge badge-neutral",
            VehicleStatus::Damaged => "badge badge-error",
            VehicleStatus::Unknown => "badge badge-ghost",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vehicle {
    pub id: Id,
    #[serde(deserialize_with = "lenient::string")]
    pub license_plate: String,
    #[serde(deserialize_with = "lenient::string")]
    pub brand: String,
    #[serde(deserialize_with = "lenient::string")]
    pub model: String,
    /// 0-100
    #[serde(deserialize_with = "lenient::percent")]
    pub battery_level: u8,
    #[serde(deserialize_with = "lenient::count")]
    pub odometer: u32,
    #[serde(deserialize_with = "lenient::status")]
    pub status: VehicleStatus,
    pub station_id: Option<Id>,
    pub current_booking_id: Option<Id>,
    pub current_rental_id: Option<Id>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub image_url: Option<String>,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.brand.trim(), self.model.trim());
        let name = name.trim();
        if name.is_empty() {
            self.license_plate.clone()
        } else {
            name.to_string()
        }
    }
}

/// 新建 / 更新车辆的请求体
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDraft {
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub battery_level: u8,
    pub odometer: u32,
    pub status: VehicleStatus,
    pub station_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// =========================================================
// 预订与租赁 (Booking / Rental)
// =========================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Booking {
    pub id: Id,
    pub vehicle_id: Id,
    pub customer_id: Id,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub customer_name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub vehicle_model: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub license_plate: Option<String>,
    #[serde(with = "date::lenient")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(with = "date::lenient")]
    pub end_time: Option<NaiveDateTime>,
    #[serde(deserialize_with = "lenient::string")]
    pub status: String,
    pub rental: Option<Rental>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub vehicle_id: Id,
    pub customer_id: Id,
    #[serde(with = "date::lenient")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(with = "date::lenient")]
    pub end_time: Option<NaiveDateTime>,
}

/// 一次租赁：取车时创建，还车时补全
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rental {
    pub id: Id,
    pub booking_id: Id,
    pub vehicle_id: Id,
    pub customer_id: Id,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub customer_name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub staff_name: Option<String>,
    #[serde(with = "date::lenient")]
    pub pickup_time: Option<NaiveDateTime>,
    #[serde(with = "date::lenient")]
    pub return_time: Option<NaiveDateTime>,
    #[serde(deserialize_with = "lenient::opt_count")]
    pub pickup_odometer: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_percent")]
    pub pickup_battery_level: Option<u8>,
    #[serde(deserialize_with = "lenient::opt_count")]
    pub return_odometer: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_percent")]
    pub return_battery_level: Option<u8>,
    pub pickup_notes: Option<String>,
    pub return_notes: Option<String>,
    pub renter_signature: Option<String>,
    pub staff_signature: Option<String>,
    pub pickup_image_urls: Vec<String>,
    pub return_image_urls: Vec<String>,
    pub distance: Option<f64>,
    pub total_fee: Option<f64>,
}

impl Rental {
    /// 对外展示的租赁编号
    pub fn code(&self) -> String {
        format!("RT-{}", self.id)
    }

    pub fn is_returned(&self) -> bool {
        self.return_time.is_some()
    }
}

/// 还车表单的上下文信息
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckinInfo {
    pub rental_id: Id,
    pub booking_id: Id,
    pub vehicle_id: Id,
    #[serde(deserialize_with = "lenient::string")]
    pub license_plate: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vehicle_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub customer_name: String,
    #[serde(deserialize_with = "lenient::count")]
    pub pickup_odometer: u32,
    #[serde(deserialize_with = "lenient::percent")]
    pub pickup_battery_level: u8,
    #[serde(with = "date::lenient")]
    pub pickup_time: Option<NaiveDateTime>,
    #[serde(with = "date::lenient")]
    pub expected_return_time: Option<NaiveDateTime>,
    pub estimated_fee: Option<f64>,
}

// =========================================================
// 员工与站点 (Staff)
// =========================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaffDashboard {
    pub station_id: Id,
    #[serde(alias = "totalVehicles", deserialize_with = "lenient::count")]
    pub vehicles: u32,
    #[serde(alias = "totalBookings", deserialize_with = "lenient::count")]
    pub bookings: u32,
    pub vehicle_list: Vec<Vehicle>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub id: Id,
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub role: String,
    pub station_id: Option<Id>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub phone_number: Option<String>,
}

impl UserProfile {
    /// 头像缩写：首词与末词的首字母，单词时取前两个字符，空名返回 `?`
    pub fn initials(&self) -> String {
        let words: Vec<&str> = self.full_name.split_whitespace().collect();
        let initials: String = match words.as_slice() {
            [] => return "?".to_string(),
            [single] => single.chars().take(2).collect(),
            [first, .., last] => first.chars().take(1).chain(last.chars().take(1)).collect(),
        };
        initials.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_does_not_fail_list() {
        let json = r#"[
            {"id": 1, "licensePlate": "51A-123", "status": "Available"},
            {"id": 2, "licensePlate": "51A-456", "status": "Teleported"},
            {"id": 3, "licensePlate": "51A-789", "status": "in_use"}
        ]"#;
        let list: Vec<Vehicle> = serde_json::from_str(json).unwrap();
        assert_eq!(list[0].status, VehicleStatus::Available);
        assert_eq!(list[1].status, VehicleStatus::Unknown);
        assert_eq!(list[2].status, VehicleStatus::InUse);
    }

    #[test]
    fn test_malformed_fields_do_not_fail_list() {
        let json = r#"[
            {"id": 1, "licensePlate": "51A-123", "brand": "VinFast", "batteryLevel": 80, "odometer": 1200, "status": "Available"},
            {"id": 2, "licensePlate": "51A-456", "brand": null, "model": 34, "batteryLevel": 87.5, "odometer": -5, "status": null},
            {"id": 3, "licensePlate": null, "batteryLevel": 140, "odometer": "15000", "status": 7, "imageUrl": false}
        ]"#;
        let list: Vec<Vehicle> = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 3);

        assert_eq!(list[0].brand, "VinFast");
        assert_eq!(list[0].status, VehicleStatus::Available);

        assert_eq!(list[1].brand, "");
        assert_eq!(list[1].model, "34");
        assert_eq!(list[1].battery_level, 88);
        assert_eq!(list[1].odometer, 0);
        assert_eq!(list[1].status, VehicleStatus::Unknown);

        assert_eq!(list[2].license_plate, "");
        assert_eq!(list[2].battery_level, 100);
        assert_eq!(list[2].odometer, 15000);
        assert_eq!(list[2].status, VehicleStatus::Unknown);
        assert!(list[2].image_url.is_none());
    }

    #[test]
    fn test_checkin_info_and_profile_tolerate_nulls() {
        let json = r#"{
            "rentalId": 5, "customerName": null, "vehicleName": null,
            "pickupOdometer": 12000.4, "pickupBatteryLevel": null
        }"#;
        let info: CheckinInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.rental_id, 5);
        assert_eq!(info.customer_name, "");
        assert_eq!(info.pickup_odometer, 12000);
        assert_eq!(info.pickup_battery_level, 0);

        let json = r#"{"id": 9, "email": "a@b.c", "fullName": null, "role": null, "phoneNumber": 84901234567}"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(user.full_name, "");
        assert_eq!(user.initials(), "?");
        assert_eq!(user.phone_number.as_deref(), Some("84901234567"));

        let json = r#"{"id": 11, "pickupOdometer": null, "returnBatteryLevel": 55.6, "customerName": null}"#;
        let rental: Rental = serde_json::from_str(json).unwrap();
        assert_eq!(rental.pickup_odometer, None);
        assert_eq!(rental.return_battery_level, Some(56));
        assert_eq!(rental.customer_name, None);
    }

    #[test]
    fn test_display_name_falls_back_to_plate() {
        let mut v = Vehicle {
            license_plate: "30F-999".into(),
            ..Default::default()
        };
        assert_eq!(v.display_name(), "30F-999");
        v.brand = "VinFast".into();
        v.model = "VF e34".into();
        assert_eq!(v.display_name(), "VinFast VF e34");
    }

    #[test]
    fn test_initials() {
        let mut user = UserProfile::default();
        assert_eq!(user.initials(), "?");
        user.full_name = "minh".into();
        assert_eq!(user.initials(), "MI");
        user.full_name = "Nguyen Van An".into();
        assert_eq!(user.initials(), "NA");
    }

    #[test]
    fn test_booking_with_embedded_rental() {
        let json = r#"{
            "id": 7, "vehicleId": 3, "customerId": 9, "status": "Confirmed",
            "startTime": "2024-06-01T09:00:00", "endTime": "bogus",
            "rental": {"id": 11, "pickupOdometer": 12000, "pickupImageUrls": ["front/a.jpg"]}
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert!(booking.start_time.is_some());
        assert!(booking.end_time.is_none());
        let rental = booking.rental.unwrap();
        assert_eq!(rental.code(), "RT-11");
        assert_eq!(rental.pickup_odometer, Some(12000));
        assert!(!rental.is_returned());
    }
}
