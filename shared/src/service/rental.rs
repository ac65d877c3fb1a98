use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::inspection::InspectionPayload;
use crate::model::{CheckinInfo, Id, Rental};
use crate::protocol::{CheckinRequest, CheckoutRequest};
use crate::request::{HttpClient, HttpMethod};

pub struct RentalService<'a, C: HttpClient> {
    api: &'a ApiClient<C>,
}

impl<'a, C: HttpClient> RentalService<'a, C> {
    pub fn new(api: &'a ApiClient<C>) -> Self {
        Self { api }
    }

    pub async fn get(&self, id: Id) -> ClientResult<Rental> {
        self.api.get(&format!("/Rentals/{}", id), &[]).await
    }

    pub async fn checkin_info(&self, id: Id) -> ClientResult<CheckinInfo> {
        self.api
            .get(&format!("/Rentals/{}/checkin-info", id), &[])
            .await
    }

    pub async fn checkin(&self, id: Id, request: &CheckinRequest) -> ClientResult<Option<Rental>> {
        let body = serde_json::to_value(request)?;
        self.api
            .request_optional(
                HttpMethod::Post,
                &format!("/Rentals/{}/checkin", id),
                Some(body),
                &[],
            )
            .await
    }

    pub async fn checkout(&self, request: &CheckoutRequest) -> ClientResult<Option<Rental>> {
        self.api.send(request).await
    }

    pub async fn submit(&self, payload: &InspectionPayload) -> ClientResult<Option<Rental>> {
        match payload {
            InspectionPayload::Checkout(req) => self.checkout(req).await,
            InspectionPayload::Return { rental_id, request } => {
                self.checkin(*rental_id, request).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::request::MockHttpClient;
    use serde_json::json;

    const BASE: &str = "http://localhost:3000/api";

    fn api() -> ApiClient<MockHttpClient> {
        ApiClient::new(MockHttpClient::new(), &ClientConfig::default()).with_token(Some("t".into()))
    }

    #[tokio::test]
    async fn test_checkin_info() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Get,
            &format!("{}/Rentals/12/checkin-info", BASE),
            200,
            json!({"success": true, "data": {
                "rentalId": 12, "licensePlate": "51F-877", "customerName": "Nguyen B",
                "pickupOdometer": 12000, "pickupBatteryLevel": 95,
                "pickupTime": "2025-10-25T10:35:00"
            }}),
        );

        let info = RentalService::new(&api).checkin_info(12).await.unwrap();
        assert_eq!(info.rental_id, 12);
        assert_eq!(info.pickup_odometer, 12000);
        assert!(info.pickup_time.is_some());
        assert!(info.expected_return_time.is_none());
    }

    #[tokio::test]
    async fn test_checkout_posts_to_fixed_path() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Post,
            &format!("{}/Rentals/checkout", BASE),
            200,
            json!({"success": true, "message": "ok", "data": {"id": 40, "bookingId": 5}}),
        );

        let req = CheckoutRequest {
            booking_id: 5,
            user_id: 9,
            vehicle_id: 3,
            pickup_battery_level: 95,
            odometer_before_pickup: 12500,
            pickup_notes: String::new(),
            pickup_image_urls: vec!["front/a.jpg".into(), "rear/b.jpg".into()],
            renter_signature: "data:r".into(),
            staff_signature: "data:s".into(),
        };
        let rental = RentalService::new(&api).checkout(&req).await.unwrap().unwrap();
        assert_eq!(rental.code(), "RT-40");

        let body = api.http().last_body().unwrap();
        assert_eq!(body["odometerBeforePickup"], 12500);
        assert_eq!(body["pickupImageUrls"][1], "rear/b.jpg");
    }

    #[tokio::test]
    async fn test_get_rental() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Get,
            &format!("{}/Rentals/40", BASE),
            200,
            json!({"data": {"id": 40, "bookingId": 5, "returnTime": "2025-10-26T08:00:00"}}),
        );
        let rental = RentalService::new(&api).get(40).await.unwrap();
        assert_eq!(rental.booking_id, 5);
        assert!(rental.is_returned());
        assert_eq!(
            api.http().last_call(),
            Some(("GET".to_string(), format!("{}/Rentals/40", BASE)))
        );
        assert_eq!(api.http().last_body(), None);
    }
}
