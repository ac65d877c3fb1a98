//! 车队列表视图模型：状态筛选、汇总计数、状态到操作的映射

use std::fmt;
use std::str::FromStr;

use crate::model::{Id, Vehicle, VehicleStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Ready,
    Booked,
    Rented,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Ready,
        StatusFilter::Booked,
        StatusFilter::Rented,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Ready => "ready",
            StatusFilter::Booked => "booked",
            StatusFilter::Rented => "rented",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All vehicles",
            StatusFilter::Ready => "Ready",
            StatusFilter::Booked => "Booked",
            StatusFilter::Rented => "Rented",
        }
    }

    pub fn matches(&self, status: VehicleStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Ready => status == VehicleStatus::Available,
            StatusFilter::Booked => status == VehicleStatus::Booked,
            StatusFilter::Rented => status == VehicleStatus::InUse,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusFilter::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown status filter: {}", s))
    }
}

pub fn filter_vehicles<'a>(list: &'a [Vehicle], filter: StatusFilter) -> Vec<&'a Vehicle> {
    list.iter().filter(|v| filter.matches(v.status)).collect()
}

// =========================================================
// 汇总计数
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FleetStats {
    pub ready: usize,
    pub booked: usize,
    pub rented: usize,
    pub total: usize,
}

impl FleetStats {
    pub fn from_vehicles(list: &[Vehicle]) -> Self {
        list.iter().fold(
            FleetStats {
                total: list.len(),
                ..Default::default()
            },
            |mut acc, v| {
                match v.status {
                    VehicleStatus::Available => acc.ready += 1,
                    VehicleStatus::Booked => acc.booked += 1,
                    VehicleStatus::InUse => acc.rented += 1,
                    _ => {}
                }
                acc
            },
        )
    }

    /// 与 `filter_vehicles(list, filter).len()` 恒等
    pub fn count(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.total,
            StatusFilter::Ready => self.ready,
            StatusFilter::Booked => self.booked,
            StatusFilter::Rented => self.rented,
        }
    }
}

// =========================================================
// 状态 → 操作
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleAction {
    /// 已预订：交车给租客
    Checkout { booking_id: Id },
    /// 租用中：接收还车
    Return { rental_id: Id },
}

impl VehicleAction {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleAction::Checkout { .. } => "Hand over vehicle",
            VehicleAction::Return { .. } => "Receive return",
        }
    }
}

/// 缺少关联单据时不提供操作
pub fn next_action(vehicle: &Vehicle) -> Option<VehicleAction> {
    match vehicle.status {
        VehicleStatus::Booked => vehicle
            .current_booking_id
            .map(|booking_id| VehicleAction::Checkout { booking_id }),
        VehicleStatus::InUse => vehicle
            .current_rental_id
            .map(|rental_id| VehicleAction::Return { rental_id }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(id: Id, status: VehicleStatus) -> Vehicle {
        Vehicle {
            id,
            status,
            ..Default::default()
        }
    }

    fn fleet() -> Vec<Vehicle> {
        vec![
            vehicle(1, VehicleStatus::Available),
            vehicle(2, VehicleStatus::Available),
            vehicle(3, VehicleStatus::Booked),
            vehicle(4, VehicleStatus::InUse),
            vehicle(5, VehicleStatus::Maintenance),
            vehicle(6, VehicleStatus::Unknown),
        ]
    }

    #[test]
    fn test_filter_lengths_match_counts() {
        let list = fleet();
        let stats = FleetStats::from_vehicles(&list);
        for filter in StatusFilter::ALL {
            let filtered = filter_vehicles(&list, filter);
            assert_eq!(filtered.len(), stats.count(filter), "filter {}", filter);
            assert!(filtered.iter().all(|v| list.iter().any(|s| s.id == v.id)));
            assert!(filtered.iter().all(|v| filter.matches(v.status)));
        }
        assert_eq!(stats, FleetStats { ready: 2, booked: 1, rented: 1, total: 6 });
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!("Rented".parse::<StatusFilter>(), Ok(StatusFilter::Rented));
        assert!("parked".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_next_action() {
        let mut v = vehicle(1, VehicleStatus::Booked);
        assert_eq!(next_action(&v), None);
        v.current_booking_id = Some(8);
        assert_eq!(next_action(&v), Some(VehicleAction::Checkout { booking_id: 8 }));

        v.status = VehicleStatus::InUse;
        v.current_rental_id = Some(20);
        assert_eq!(next_action(&v), Some(VehicleAction::Return { rental_id: 20 }));

        v.status = VehicleStatus::Damaged;
        assert_eq!(next_action(&v), None);
    }
}
