use super::*;
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::request::{HttpMethod, MockHttpClient};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

const BASE: &str = "http://localhost:3000/api";

// =========================================================
// 辅助函数
// =========================================================

/// 被 drop 时计数的预览句柄
struct Preview {
    released: Rc<Cell<u32>>,
}

impl Drop for Preview {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

fn image(name: &str, released: &Rc<Cell<u32>>) -> PendingImage<Preview> {
    PendingImage {
        file_name: name.to_string(),
        size_bytes: 1024,
        preview: Preview {
            released: released.clone(),
        },
    }
}

fn plain(name: &str) -> PendingImage<()> {
    PendingImage {
        file_name: name.to_string(),
        size_bytes: 2048,
        preview: (),
    }
}

fn filled_return_form() -> InspectionForm<()> {
    let mut form = InspectionForm::new(InspectionKind::Return);
    for slot in InspectionKind::Return.slots() {
        form.set_image(*slot, plain(&format!("{}.jpg", slot.key()))).unwrap();
    }
    for item in InspectionKind::Return.checklist() {
        form.set_check(*item, true);
    }
    form.set_odometer("12500");
    form.set_battery("72");
    form.set_renter_signature(Some("data:image/png;base64,renter".into()));
    form.set_staff_signature(Some("data:image/png;base64,staff".into()));
    form
}

fn api() -> ApiClient<MockHttpClient> {
    ApiClient::new(MockHttpClient::new(), &ClientConfig::default()).with_token(Some("t".into()))
}

// =========================================================
// 编辑操作
// =========================================================

#[test]
fn test_replacing_image_releases_only_that_slot() {
    let released = Rc::new(Cell::new(0));
    let mut form = InspectionForm::new(InspectionKind::Return);
    form.set_image(ImageSlot::Front, image("front-1.jpg", &released)).unwrap();
    form.set_image(ImageSlot::Left, image("left-1.jpg", &released)).unwrap();
    assert_eq!(released.get(), 0);

    form.set_image(ImageSlot::Front, image("front-2.jpg", &released)).unwrap();
    assert_eq!(released.get(), 1);
    assert_eq!(form.image(ImageSlot::Front).unwrap().file_name, "front-2.jpg");
    assert_eq!(form.image(ImageSlot::Left).unwrap().file_name, "left-1.jpg");

    form.remove_image(ImageSlot::Left);
    assert_eq!(released.get(), 2);
    assert!(form.image(ImageSlot::Left).is_none());

    drop(form);
    assert_eq!(released.get(), 3);
}

#[test]
fn test_rejects_oversized_and_foreign_slot() {
    let mut form = InspectionForm::<()>::new(InspectionKind::Checkout);

    let too_big = PendingImage {
        file_name: "huge.jpg".into(),
        size_bytes: MAX_IMAGE_BYTES + 1,
        preview: (),
    };
    let err = form.set_image(ImageSlot::Front, too_big).unwrap_err();
    assert_eq!(err.field, "images.front");

    let err = form.set_image(ImageSlot::Interior, plain("i.jpg")).unwrap_err();
    assert_eq!(err.field, "images.interior");
    assert!(form.image(ImageSlot::Interior).is_none());
}

#[test]
fn test_toggle_flips_exactly_one_flag() {
    let mut form = InspectionForm::<()>::new(InspectionKind::Return);
    assert!(form.toggle(CheckItem::Clean));
    assert!(form.is_checked(CheckItem::Clean));
    assert!(!form.is_checked(CheckItem::NoDamage));
    assert!(!form.toggle(CheckItem::Clean));

    // 取车没有检查项
    let mut checkout = InspectionForm::<()>::new(InspectionKind::Checkout);
    assert!(!checkout.toggle(CheckItem::Clean));
}

#[test]
fn test_blank_signature_is_none() {
    let mut form = InspectionForm::<()>::new(InspectionKind::Checkout);
    form.set_renter_signature(Some("   ".into()));
    assert!(form.renter_signature().is_none());
}

// =========================================================
// 校验
// =========================================================

#[test]
fn test_validation_order() {
    let mut form = filled_return_form();
    form.remove_image(ImageSlot::Interior);
    form.set_check(CheckItem::NoDamage, false);
    form.set_odometer("abc");
    assert_eq!(form.validate().unwrap_err().field, "images.interior");

    form.set_image(ImageSlot::Interior, plain("in.jpg")).unwrap();
    assert_eq!(form.validate().unwrap_err().field, "checklist.noDamage");

    form.set_check(CheckItem::NoDamage, true);
    assert_eq!(form.validate().unwrap_err().field, "odometer");

    form.set_odometer("12,500");
    form.set_battery("full");
    assert_eq!(form.validate().unwrap_err().field, "battery");

    form.set_battery("80");
    form.set_renter_signature(None);
    assert_eq!(form.validate().unwrap_err().field, "renterSignature");

    form.set_renter_signature(Some("sig".into()));
    form.set_staff_signature(None);
    assert_eq!(form.validate().unwrap_err().field, "staffSignature");
}

#[test]
fn test_battery_is_clamped_and_written_back() {
    let mut form = filled_return_form();
    form.set_battery("150");
    assert_eq!(form.validate().unwrap().battery, 100);
    assert_eq!(form.battery(), "100");

    form.set_battery("-5");
    assert_eq!(form.validate().unwrap().battery, 0);
    assert_eq!(form.battery(), "0");
}

#[test]
fn test_parse_odometer() {
    assert_eq!(parse_odometer("12500"), Some(12500));
    assert_eq!(parse_odometer(" 12,500 "), Some(12500));
    assert_eq!(parse_odometer("1.234.567"), Some(1_234_567));
    assert_eq!(parse_odometer("0"), Some(0));
    assert_eq!(parse_odometer("-5"), None);
    assert_eq!(parse_odometer("12,50"), None);
    assert_eq!(parse_odometer("12.5"), None);
    assert_eq!(parse_odometer(""), None);
    assert_eq!(format_thousands(12500), "12,500");
    assert_eq!(format_thousands(999), "999");
    assert_eq!(format_thousands(1_234_567), "1,234,567");
}

#[test]
fn test_prefill_from_vehicle() {
    let vehicle = Vehicle {
        odometer: 12500,
        battery_level: 95,
        ..Default::default()
    };
    let form = InspectionForm::<()>::checkout(&vehicle);
    assert_eq!(form.odometer(), "12,500");
    assert_eq!(form.battery(), "95");
    assert_eq!(form.progress(), (0, 2));
}

// =========================================================
// 提交
// =========================================================

#[test]
fn test_begin_submit_locks_form() {
    let mut form = filled_return_form();
    let target = InspectionTarget::Return { rental_id: 7 };

    let payload = form.begin_submit(target).unwrap();
    assert!(matches!(payload, InspectionPayload::Return { rental_id: 7, .. }));
    assert_eq!(form.phase(), Phase::Submitting);
    assert!(form.is_submit_disabled());

    let err = form.begin_submit(target).unwrap_err();
    assert_eq!(err.field, "form");

    form.set_odometer("1");
    assert_eq!(form.odometer(), "12500");

    form.finish(false);
    assert_eq!(form.phase(), Phase::Idle);
    assert!(!form.is_submit_disabled());
}

#[test]
fn test_mismatched_target_is_refused() {
    let mut form = filled_return_form();
    let err = form
        .begin_submit(InspectionTarget::Checkout {
            booking_id: 1,
            user_id: 1,
            vehicle_id: 1,
        })
        .unwrap_err();
    assert_eq!(err.field, "form");
    assert_eq!(form.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_unchecked_flag_sends_nothing() {
    let api = api();
    let rentals = RentalService::new(&api);
    let mut form = filled_return_form();
    form.set_check(CheckItem::ChargingCable, false);

    let err = submit(&mut form, InspectionTarget::Return { rental_id: 7 }, &rentals)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(ref v) if v.field == "checklist.chargingCable"));
    assert_eq!(api.http().request_count(), 0);
    assert_eq!(form.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_return_submission_sends_one_checkin() {
    let api = api();
    api.http().mock_response(
        HttpMethod::Post,
        &format!("{}/Rentals/7/checkin", BASE),
        200,
        json!({"success": true, "message": "Checked in", "data": null}),
    );
    let rentals = RentalService::new(&api);
    let mut form = filled_return_form();
    form.set_notes("Minor dust on seats");
    form.set_staff_notes("Customer returned early");

    let result = submit(&mut form, InspectionTarget::Return { rental_id: 7 }, &rentals).await;
    assert!(result.is_ok());
    assert_eq!(form.phase(), Phase::Succeeded);
    assert_eq!(api.http().request_count(), 1);

    let body = api.http().last_body().unwrap();
    assert_eq!(body["odometerAfterReturn"], 12500);
    assert_eq!(body["returnBatteryLevel"], 72);
    assert_eq!(body["returnNotes"], "Minor dust on seats");
    assert_eq!(body["staffNotes"], "Customer returned early");
    assert_eq!(body["renterSignature"], "data:image/png;base64,renter");
    assert_eq!(body["staffSignature"], "data:image/png;base64,staff");
    assert_eq!(
        body["returnImageUrls"],
        json!(["front/front.jpg", "rear/rear.jpg", "left/left.jpg", "right/right.jpg", "interior/interior.jpg"])
    );
    assert_eq!(body["checklist"]["chargingCable"], true);
    assert_eq!(body["checklist"].as_object().unwrap().len(), 5);
}

#[tokio::test]
async fn test_failed_submission_keeps_values() {
    let api = api();
    api.http().mock_response(
        HttpMethod::Post,
        &format!("{}/Rentals/checkout", BASE),
        409,
        json!({"success": false, "message": "Booking already picked up"}),
    );
    let rentals = RentalService::new(&api);

    let mut form = InspectionForm::<()>::checkout(&Vehicle {
        odometer: 8000,
        battery_level: 90,
        ..Default::default()
    });
    form.set_image(ImageSlot::Front, plain("f.jpg")).unwrap();
    form.set_image(ImageSlot::Rear, plain("r.jpg")).unwrap();
    form.set_renter_signature(Some("r".into()));
    form.set_staff_signature(Some("s".into()));

    let target = InspectionTarget::Checkout {
        booking_id: 5,
        user_id: 9,
        vehicle_id: 3,
    };
    let err = submit(&mut form, target, &rentals).await.unwrap_err();
    assert_eq!(err, ClientError::api(409, "Booking already picked up"));
    assert_eq!(form.phase(), Phase::Idle);
    assert_eq!(form.odometer(), "8,000");
    assert!(form.image(ImageSlot::Rear).is_some());

    let body = api.http().last_body().unwrap();
    assert_eq!(body["bookingId"], 5);
    assert_eq!(body["userId"], 9);
    assert_eq!(body["odometerBeforePickup"], 8000);
    assert_eq!(body["pickupBatteryLevel"], 90);
}

#[test]
fn test_redirect_delay() {
    assert_eq!(SUCCESS_REDIRECT_DELAY.as_millis(), 800);
}
