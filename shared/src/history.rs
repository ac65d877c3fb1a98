//! 交易历史视图模型
//!
//! 历史记录由带有租赁信息的预订派生：取车产生一条 `checkout`，还车产生一条 `checkin`。

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::{Booking, Id};

pub const ROWS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Checkout,
    Checkin,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Checkout => "checkout",
            TransactionKind::Checkin => "checkin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Checkout => "Check-out",
            TransactionKind::Checkin => "Check-in",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub kind: TransactionKind,
    pub rental_id: Id,
    pub rental_code: String,
    pub vehicle_id: Id,
    pub vehicle_model: String,
    pub license_plate: String,
    pub renter_name: String,
    pub staff_name: String,
    pub timestamp: NaiveDateTime,
    pub odometer: Option<u32>,
    pub battery_level: Option<u8>,
    pub notes: String,
}

/// 没有时间戳的事件无法排序和按日期筛选，直接忽略
pub fn rows_from_bookings(bookings: &[Booking]) -> Vec<HistoryRow> {
    let mut rows: Vec<HistoryRow> = bookings
        .iter()
        .filter_map(|b| b.rental.as_ref().map(|r| (b, r)))
        .flat_map(|(booking, rental)| {
            let base = |kind, timestamp, odometer, battery_level, notes: &Option<String>| HistoryRow {
                kind,
                rental_id: rental.id,
                rental_code: rental.code(),
                vehicle_id: booking.vehicle_id,
                vehicle_model: booking.vehicle_model.clone().unwrap_or_default(),
                license_plate: booking.license_plate.clone().unwrap_or_default(),
                renter_name: rental
                    .customer_name
                    .clone()
                    .or_else(|| booking.customer_name.clone())
                    .unwrap_or_default(),
                staff_name: rental.staff_name.clone().unwrap_or_default(),
                timestamp,
                odometer,
                battery_level,
                notes: notes.clone().unwrap_or_default(),
            };

            let pickup = rental.pickup_time.map(|t| {
                base(
                    TransactionKind::Checkout,
                    t,
                    rental.pickup_odometer,
                    rental.pickup_battery_level,
                    &rental.pickup_notes,
                )
            });
            let ret = rental.return_time.map(|t| {
                base(
                    TransactionKind::Checkin,
                    t,
                    rental.return_odometer,
                    rental.return_battery_level,
                    &rental.return_notes,
                )
            });
            pickup.into_iter().chain(ret)
        })
        .collect();

    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    rows
}

// =========================================================
// 查询条件
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Checkout,
    Checkin,
}

impl TypeFilter {
    pub const ALL: [TypeFilter; 3] = [TypeFilter::All, TypeFilter::Checkout, TypeFilter::Checkin];

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Checkout => "checkout",
            TypeFilter::Checkin => "checkin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TypeFilter::All => "All types",
            TypeFilter::Checkout => "Check-out",
            TypeFilter::Checkin => "Check-in",
        }
    }

    fn matches(&self, kind: TransactionKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Checkout => kind == TransactionKind::Checkout,
            TypeFilter::Checkin => kind == TransactionKind::Checkin,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeFilter::ALL
            .into_iter()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| format!("unknown type filter: {}", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryQuery {
    pub search: String,
    pub kind: TypeFilter,
    /// 闭区间
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl HistoryQuery {
    pub fn matches(&self, row: &HistoryRow) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || [&row.license_plate, &row.renter_name, &row.rental_code]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));

        let date = row.timestamp.date();
        let after_from = self.date_from.is_none_or(|from| date >= from);
        let before_to = self.date_to.is_none_or(|to| date <= to);

        matches_search && self.kind.matches(row.kind) && after_from && before_to
    }

    pub fn apply<'a>(&self, rows: &'a [HistoryRow]) -> Vec<&'a HistoryRow> {
        rows.iter().filter(|r| self.matches(r)).collect()
    }
}

// =========================================================
// 分页
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 从 1 开始
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// 页码被钳制到 [1, total_pages]；空集合时为 1/1
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * per_page;

    Page {
        items: items.iter().skip(start).take(per_page).cloned().collect(),
        page,
        total_pages,
        total_items: items.len(),
    }
}

// =========================================================
// 当日统计
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayStats {
    pub checkouts: usize,
    pub checkins: usize,
    pub vehicles: usize,
}

pub fn day_stats(rows: &[HistoryRow], day: NaiveDate) -> DayStats {
    let today: Vec<&HistoryRow> = rows.iter().filter(|r| r.timestamp.date() == day).collect();
    let vehicles: BTreeSet<Id> = today.iter().map(|r| r.vehicle_id).collect();

    DayStats {
        checkouts: today
            .iter()
            .filter(|r| r.kind == TransactionKind::Checkout)
            .count(),
        checkins: today
            .iter()
            .filter(|r| r.kind == TransactionKind::Checkin)
            .count(),
        vehicles: vehicles.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::{parse_date, parse_datetime};
    use crate::model::Rental;

    fn booking(id: Id, vehicle_id: Id, plate: &str, renter: &str, pickup: &str, ret: Option<&str>) -> Booking {
        Booking {
            id,
            vehicle_id,
            license_plate: Some(plate.to_string()),
            customer_name: Some(renter.to_string()),
            rental: Some(Rental {
                id: 2024000 + id,
                booking_id: id,
                vehicle_id,
                pickup_time: parse_datetime(pickup),
                return_time: ret.and_then(parse_datetime),
                pickup_odometer: Some(12500),
                return_odometer: ret.map(|_| 12850),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn rows() -> Vec<HistoryRow> {
        let bookings = vec![
            booking(1, 1, "59T2-87343", "Nguyen Van B", "2024-01-15T08:00:00", Some("2024-01-17T08:00:00")),
            booking(2, 2, "51F-12345", "Tran Thi C", "2024-01-16T09:00:00", Some("2024-01-18T10:00:00")),
            booking(3, 3, "30A-99999", "Le Van D", "2024-01-17T14:00:00", None),
            Booking { id: 4, ..Default::default() },
        ];
        rows_from_bookings(&bookings)
    }

    #[test]
    fn test_rows_derived_newest_first() {
        let rows = rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].kind, TransactionKind::Checkin);
        assert_eq!(rows[0].license_plate, "51F-12345");
        assert!(rows.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        let checkin = rows.iter().find(|r| r.kind == TransactionKind::Checkin).unwrap();
        assert_eq!(checkin.odometer, Some(12850));
    }

    #[test]
    fn test_search_type_and_dates() {
        let rows = rows();

        let q = HistoryQuery {
            search: "rt-2024001".into(),
            ..Default::default()
        };
        assert_eq!(q.apply(&rows).len(), 2);

        let q = HistoryQuery {
            search: "tran".into(),
            kind: TypeFilter::Checkin,
            ..Default::default()
        };
        assert_eq!(q.apply(&rows).len(), 1);

        let q = HistoryQuery {
            date_from: parse_date("2024-01-16"),
            date_to: parse_date("2024-01-17"),
            ..Default::default()
        };
        // 16 日取车、17 日还车、17 日取车
        assert_eq!(q.apply(&rows).len(), 3);
    }

    #[test]
    fn test_paginate_clamps() {
        let items: Vec<u32> = (1..=23).collect();
        let p = paginate(&items, 3, ROWS_PER_PAGE);
        assert_eq!(p.items, vec![21, 22, 23]);
        assert_eq!(p.total_pages, 3);

        let p = paginate(&items, 99, ROWS_PER_PAGE);
        assert_eq!(p.page, 3);
        let p = paginate::<u32>(&[], 0, ROWS_PER_PAGE);
        assert_eq!((p.page, p.total_pages, p.items.len()), (1, 1, 0));
    }

    #[test]
    fn test_day_stats() {
        let rows = rows();
        let stats = day_stats(&rows, parse_date("2024-01-17").unwrap());
        assert_eq!(stats, DayStats { checkouts: 1, checkins: 1, vehicles: 2 });
    }
}
