//! 车辆检查流程（取车 / 还车）
//!
//! 表单状态机：`Idle → Validating → Submitting → Succeeded`，任何失败都回到 `Idle`
//! 且保留全部输入。校验失败不会发出任何网络请求；一次提交只构造一个请求体。
//!
//! 表单对预览句柄类型 `P` 泛型：浏览器端是持有 object URL 的 RAII 类型，
//! 替换或移除图片时旧句柄被 drop，预览随之释放。

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{ClientError, ClientResult, ValidationError};
use crate::model::{CheckinInfo, Id, Rental, Vehicle};
use crate::protocol::{CheckinRequest, CheckoutRequest};
use crate::request::HttpClient;
use crate::service::RentalService;

// =========================================================
// 常量定义
// =========================================================

/// 单张图片上限 5 MiB
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
/// 提交成功后延迟跳转
pub const SUCCESS_REDIRECT_DELAY: Duration = Duration::from_millis(800);

// =========================================================
// 图片槽位与检查项
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImageSlot {
    Front,
    Rear,
    Left,
    Right,
    Interior,
}

impl ImageSlot {
    pub fn key(&self) -> &'static str {
        match self {
            ImageSlot::Front => "front",
            ImageSlot::Rear => "rear",
            ImageSlot::Left => "left",
            ImageSlot::Right => "right",
            ImageSlot::Interior => "interior",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImageSlot::Front => "Front view",
            ImageSlot::Rear => "Rear view",
            ImageSlot::Left => "Left side",
            ImageSlot::Right => "Right side",
            ImageSlot::Interior => "Interior",
        }
    }

    pub fn field(&self) -> String {
        format!("images.{}", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckItem {
    NoScratches,
    NoDamage,
    Clean,
    NoIndicators,
    ChargingCable,
}

impl CheckItem {
    /// 提交体 `checklist` 中的键
    pub fn key(&self) -> &'static str {
        match self {
            CheckItem::NoScratches => "noScratches",
            CheckItem::NoDamage => "noDamage",
            CheckItem::Clean => "clean",
            CheckItem::NoIndicators => "noIndicators",
            CheckItem::ChargingCable => "chargingCable",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckItem::NoScratches => "No new scratches",
            CheckItem::NoDamage => "No body damage",
            CheckItem::Clean => "Interior clean",
            CheckItem::NoIndicators => "No warning indicators on dashboard",
            CheckItem::ChargingCable => "Charging cable present",
        }
    }

    pub fn field(&self) -> String {
        format!("checklist.{}", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectionKind {
    Checkout,
    Return,
}

impl InspectionKind {
    pub fn slots(&self) -> &'static [ImageSlot] {
        match self {
            InspectionKind::Checkout => &[ImageSlot::Front, ImageSlot::Rear],
            InspectionKind::Return => &[
                ImageSlot::Front,
                ImageSlot::Rear,
                ImageSlot::Left,
                ImageSlot::Right,
                ImageSlot::Interior,
            ],
        }
    }

    pub fn checklist(&self) -> &'static [CheckItem] {
        match self {
            InspectionKind::Checkout => &[],
            InspectionKind::Return => &[
                CheckItem::NoScratches,
                CheckItem::NoDamage,
                CheckItem::Clean,
                CheckItem::NoIndicators,
                CheckItem::ChargingCable,
            ],
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            InspectionKind::Checkout => "Vehicle handed over successfully",
            InspectionKind::Return => "Return inspection completed",
        }
    }
}

// =========================================================
// 表单状态
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
}

/// 已选择、尚未上传的图片
#[derive(Debug)]
pub struct PendingImage<P> {
    pub file_name: String,
    pub size_bytes: u64,
    pub preview: P,
}

/// 通过校验后的读数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readings {
    pub odometer: u32,
    pub battery: u8,
}

/// 提交对象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectionTarget {
    Checkout {
        booking_id: Id,
        user_id: Id,
        vehicle_id: Id,
    },
    Return {
        rental_id: Id,
    },
}

/// 一次提交唯一的请求体
#[derive(Debug, Clone, PartialEq)]
pub enum InspectionPayload {
    Checkout(CheckoutRequest),
    Return { rental_id: Id, request: CheckinRequest },
}

#[derive(Debug)]
pub struct InspectionForm<P> {
    kind: InspectionKind,
    phase: Phase,
    images: BTreeMap<ImageSlot, PendingImage<P>>,
    checklist: BTreeMap<CheckItem, bool>,
    odometer: String,
    battery: String,
    notes: String,
    staff_notes: String,
    renter_signature: Option<String>,
    staff_signature: Option<String>,
}

impl<P> InspectionForm<P> {
    pub fn new(kind: InspectionKind) -> Self {
        Self {
            kind,
            phase: Phase::Idle,
            images: BTreeMap::new(),
            checklist: kind.checklist().iter().map(|item| (*item, false)).collect(),
            odometer: String::new(),
            battery: String::new(),
            notes: String::new(),
            staff_notes: String::new(),
            renter_signature: None,
            staff_signature: None,
        }
    }

    /// 取车：以车辆当前读数预填
    pub fn checkout(vehicle: &Vehicle) -> Self {
        let mut form = Self::new(InspectionKind::Checkout);
        form.odometer = format_thousands(vehicle.odometer);
        form.battery = vehicle.battery_level.to_string();
        form
    }

    /// 还车：以取车时读数预填，员工按实际值修改
    pub fn checkin(info: &CheckinInfo) -> Self {
        let mut form = Self::new(InspectionKind::Return);
        form.odometer = format_thousands(info.pickup_odometer);
        form.battery = info.pickup_battery_level.to_string();
        form
    }

    // --- Accessors ---

    pub fn kind(&self) -> InspectionKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&PendingImage<P>> {
        self.images.get(&slot)
    }

    pub fn is_checked(&self, item: CheckItem) -> bool {
        self.checklist.get(&item).copied().unwrap_or(false)
    }

    pub fn odometer(&self) -> &str {
        &self.odometer
    }

    pub fn battery(&self) -> &str {
        &self.battery
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn staff_notes(&self) -> &str {
        &self.staff_notes
    }

    pub fn renter_signature(&self) -> Option<&str> {
        self.renter_signature.as_deref()
    }

    pub fn staff_signature(&self) -> Option<&str> {
        self.staff_signature.as_deref()
    }

    /// (已完成, 总数)：图片槽位 + 检查项
    pub fn progress(&self) -> (usize, usize) {
        let slots = self.kind.slots();
        let filled = slots.iter().filter(|s| self.images.contains_key(s)).count();
        let checked = self.checklist.values().filter(|v| **v).count();
        (filled + checked, slots.len() + self.checklist.len())
    }

    pub fn is_submit_disabled(&self) -> bool {
        matches!(self.phase, Phase::Submitting | Phase::Succeeded)
    }

    fn is_editable(&self) -> bool {
        self.phase == Phase::Idle
    }

    // =========================================================
    // 编辑操作（仅 Idle）
    // =========================================================

    /// 放入图片；替换时旧预览被释放，其他槽位不受影响
    pub fn set_image(&mut self, slot: ImageSlot, image: PendingImage<P>) -> Result<(), ValidationError> {
        if !self.kind.slots().contains(&slot) {
            return Err(ValidationError::new(slot.field(), "This photo is not part of the inspection"));
        }
        if image.size_bytes > MAX_IMAGE_BYTES {
            return Err(ValidationError::new(slot.field(), "Image must be 5MB or smaller"));
        }
        if !self.is_editable() {
            return Err(ValidationError::new(slot.field(), "Form is locked while submitting"));
        }
        self.images.insert(slot, image);
        Ok(())
    }

    pub fn remove_image(&mut self, slot: ImageSlot) {
        if self.is_editable() {
            self.images.remove(&slot);
        }
    }

    /// 翻转一个检查项，返回新值
    pub fn toggle(&mut self, item: CheckItem) -> bool {
        let next = !self.is_checked(item);
        self.set_check(item, next);
        self.is_checked(item)
    }

    pub fn set_check(&mut self, item: CheckItem, value: bool) {
        if !self.is_editable() {
            return;
        }
        if let Some(flag) = self.checklist.get_mut(&item) {
            *flag = value;
        }
    }

    pub fn set_odometer(&mut self, value: &str) {
        if self.is_editable() {
            self.odometer = value.to_string();
        }
    }

    pub fn set_battery(&mut self, value: &str) {
        if self.is_editable() {
            self.battery = value.to_string();
        }
    }

    pub fn set_notes(&mut self, value: &str) {
        if self.is_editable() {
            self.notes = value.to_string();
        }
    }

    pub fn set_staff_notes(&mut self, value: &str) {
        if self.is_editable() {
            self.staff_notes = value.to_string();
        }
    }

    /// 空白签名视为未签
    pub fn set_renter_signature(&mut self, value: Option<String>) {
        if self.is_editable() {
            self.renter_signature = value.filter(|s| !s.trim().is_empty());
        }
    }

    pub fn set_staff_signature(&mut self, value: Option<String>) {
        if self.is_editable() {
            self.staff_signature = value.filter(|s| !s.trim().is_empty());
        }
    }

    // =========================================================
    // 校验与提交
    // =========================================================

    /// 按固定顺序校验：图片 → 检查项 → 里程 → 电量 → 租客签名 → 员工签名
    ///
    /// 电量被钳制到 [0, 100] 并写回输入框。
    pub fn validate(&mut self) -> Result<Readings, ValidationError> {
        for slot in self.kind.slots() {
            if !self.images.contains_key(slot) {
                return Err(ValidationError::new(
                    slot.field(),
                    format!("Please add the {} photo", slot.label().to_lowercase()),
                ));
            }
        }

        for item in self.kind.checklist() {
            if !self.is_checked(*item) {
                return Err(ValidationError::new(
                    item.field(),
                    format!("Please confirm: {}", item.label()),
                ));
            }
        }

        let odometer = parse_odometer(&self.odometer).ok_or_else(|| {
            ValidationError::new("odometer", "Odometer must be a non-negative whole number")
        })?;

        let battery = parse_battery(&self.battery)
            .ok_or_else(|| ValidationError::new("battery", "Battery level must be a number"))?;
        self.battery = battery.to_string();

        if self.renter_signature.is_none() {
            return Err(ValidationError::new("renterSignature", "Renter signature is required"));
        }
        if self.staff_signature.is_none() {
            return Err(ValidationError::new("staffSignature", "Staff signature is required"));
        }

        Ok(Readings { odometer, battery })
    }

    /// 校验并构造唯一的请求体，成功后进入 `Submitting`
    pub fn begin_submit(&mut self, target: InspectionTarget) -> Result<InspectionPayload, ValidationError> {
        if self.phase != Phase::Idle {
            return Err(ValidationError::new("form", "Submission already in progress"));
        }
        let target_matches = matches!(
            (self.kind, target),
            (InspectionKind::Checkout, InspectionTarget::Checkout { .. })
                | (InspectionKind::Return, InspectionTarget::Return { .. })
        );
        if !target_matches {
            return Err(ValidationError::new("form", "Inspection target does not match the form"));
        }

        self.phase = Phase::Validating;
        let readings = match self.validate() {
            Ok(r) => r,
            Err(e) => {
                self.phase = Phase::Idle;
                return Err(e);
            }
        };

        let payload = self.build_payload(target, readings);
        self.phase = Phase::Submitting;
        Ok(payload)
    }

    /// 提交结束：成功进入 `Succeeded`，失败回到 `Idle` 且输入保持不变
    pub fn finish(&mut self, succeeded: bool) {
        if self.phase != Phase::Submitting {
            return;
        }
        self.phase = if succeeded { Phase::Succeeded } else { Phase::Idle };
    }

    /// 图片引用 `"<slot>/<file name>"`，按槽位顺序
    pub fn image_references(&self) -> Vec<String> {
        self.kind
            .slots()
            .iter()
            .filter_map(|slot| {
                self.images
                    .get(slot)
                    .map(|img| format!("{}/{}", slot.key(), img.file_name))
            })
            .collect()
    }

    fn build_payload(&self, target: InspectionTarget, readings: Readings) -> InspectionPayload {
        let renter_signature = self.renter_signature.clone().unwrap_or_default();
        let staff_signature = self.staff_signature.clone().unwrap_or_default();

        match target {
            InspectionTarget::Checkout {
                booking_id,
                user_id,
                vehicle_id,
            } => InspectionPayload::Checkout(CheckoutRequest {
                booking_id,
                user_id,
                vehicle_id,
                pickup_battery_level: readings.battery,
                odometer_before_pickup: readings.odometer,
                pickup_notes: self.notes.trim().to_string(),
                pickup_image_urls: self.image_references(),
                renter_signature,
                staff_signature,
            }),
            InspectionTarget::Return { rental_id } => InspectionPayload::Return {
                rental_id,
                request: CheckinRequest {
                    return_battery_level: readings.battery,
                    odometer_after_return: readings.odometer,
                    return_notes: self.notes.trim().to_string(),
                    staff_notes: self.staff_notes.trim().to_string(),
                    return_image_urls: self.image_references(),
                    checklist: self
                        .checklist
                        .iter()
                        .map(|(item, v)| (item.key().to_string(), *v))
                        .collect(),
                    renter_signature,
                    staff_signature,
                },
            },
        }
    }
}

// =========================================================
// 提交驱动
// =========================================================

/// 完整执行一次提交；界面层在异步任务两端分别调用 `begin_submit` / `finish`
pub async fn submit<P, C: HttpClient>(
    form: &mut InspectionForm<P>,
    target: InspectionTarget,
    rentals: &RentalService<'_, C>,
) -> ClientResult<Option<Rental>> {
    let payload = form.begin_submit(target).map_err(ClientError::from)?;
    let result = rentals.submit(&payload).await;
    form.finish(result.is_ok());
    result
}

// =========================================================
// 读数解析
// =========================================================

/// 非负整数，允许千分位分隔（`12,500`、`12.500`、`12 500`）
pub fn parse_odometer(raw: &str) -> Option<u32> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok();
    }

    let sep = s.chars().find(|c| !c.is_ascii_digit())?;
    if !matches!(sep, ',' | '.' | ' ' | '\u{a0}') {
        return None;
    }
    let groups: Vec<&str> = s.split(sep).collect();
    let (head, rest) = groups.split_first()?;
    let head_ok = (1..=3).contains(&head.len()) && head.chars().all(|c| c.is_ascii_digit());
    let rest_ok = rest
        .iter()
        .all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()));
    if !head_ok || !rest_ok {
        return None;
    }
    groups.concat().parse().ok()
}

/// 任意数字，四舍五入后钳制到 [0, 100]；允许结尾 `%`
pub fn parse_battery(raw: &str) -> Option<u8> {
    let s = raw.trim().trim_end_matches('%').trim();
    let value: f64 = s.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(0.0, 100.0) as u8)
}

pub fn format_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
