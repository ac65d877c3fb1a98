use serde::Serialize;

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::model::{Booking, BookingDraft, Id};
use crate::request::{HttpClient, HttpMethod};

pub struct BookingService<'a, C: HttpClient> {
    api: &'a ApiClient<C>,
}

impl<'a, C: HttpClient> BookingService<'a, C> {
    pub fn new(api: &'a ApiClient<C>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ClientResult<Vec<Booking>> {
        self.api.get("/bookings", &[]).await
    }

    pub async fn get(&self, id: Id) -> ClientResult<Booking> {
        self.api.get(&format!("/bookings/{}", id), &[]).await
    }

    pub async fn create(&self, draft: &BookingDraft) -> ClientResult<Booking> {
        self.api.post("/bookings", draft).await
    }

    pub async fn update(&self, id: Id, draft: &BookingDraft) -> ClientResult<Option<Booking>> {
        let body = serde_json::to_value(draft)?;
        self.api
            .request_optional(HttpMethod::Put, &format!("/bookings/{}", id), Some(body), &[])
            .await
    }

    pub async fn cancel(&self, id: Id) -> ClientResult<()> {
        self.api.delete(&format!("/bookings/{}", id)).await
    }

    pub async fn confirm_delivery(&self, id: Id) -> ClientResult<()> {
        self.api
            .request_empty(
                HttpMethod::Post,
                &format!("/bookings/{}/confirm-delivery", id),
                None,
                &[],
            )
            .await
    }

    pub async fn confirm_return<B: Serialize>(&self, id: Id, body: &B) -> ClientResult<()> {
        let body = serde_json::to_value(body)?;
        self.api
            .request_empty(
                HttpMethod::Post,
                &format!("/bookings/{}/confirm-return", id),
                Some(body),
                &[],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ClientError;
    use crate::request::MockHttpClient;
    use serde_json::json;

    const BASE: &str = "http://localhost:3000/api";

    fn api() -> ApiClient<MockHttpClient> {
        ApiClient::new(MockHttpClient::new(), &ClientConfig::default()).with_token(Some("t".into()))
    }

    #[tokio::test]
    async fn test_list_bookings() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Get,
            &format!("{}/bookings", BASE),
            200,
            json!({"success": true, "data": [{"id": 1, "vehicleId": 2, "status": "Confirmed"}]}),
        );
        let list = BookingService::new(&api).list().await.unwrap();
        assert_eq!(list[0].vehicle_id, 2);
        assert!(list[0].rental.is_none());
    }

    #[tokio::test]
    async fn test_confirm_return_posts_body() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Post,
            &format!("{}/bookings/9/confirm-return", BASE),
            200,
            json!({"success": true}),
        );
        BookingService::new(&api)
            .confirm_return(9, &json!({"note": "ok"}))
            .await
            .unwrap();
        assert_eq!(api.http().last_body(), Some(json!({"note": "ok"})));
    }

    #[tokio::test]
    async fn test_cancel_expired_session() {
        let api = api();
        api.http()
            .mock_raw(HttpMethod::Delete, &format!("{}/bookings/3", BASE), 401, "");
        let err = BookingService::new(&api).cancel(3).await.unwrap_err();
        assert_eq!(err, ClientError::AuthExpired);
    }

    fn draft() -> BookingDraft {
        BookingDraft {
            vehicle_id: 4,
            customer_id: 9,
            start_time: crate::date::parse_datetime("2025-10-25T09:00:00"),
            end_time: None,
        }
    }

    #[tokio::test]
    async fn test_get_booking_by_id() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Get,
            &format!("{}/bookings/7", BASE),
            200,
            json!({"data": {"id": 7, "vehicleId": 4, "customerName": "Tran C"}}),
        );
        let booking = BookingService::new(&api).get(7).await.unwrap();
        assert_eq!(booking.customer_name.as_deref(), Some("Tran C"));
        assert_eq!(
            api.http().last_call(),
            Some(("GET".to_string(), format!("{}/bookings/7", BASE)))
        );
    }

    #[tokio::test]
    async fn test_create_posts_draft() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Post,
            &format!("{}/bookings", BASE),
            200,
            json!({"data": {"id": 21, "vehicleId": 4, "customerId": 9}}),
        );
        let booking = BookingService::new(&api).create(&draft()).await.unwrap();
        assert_eq!(booking.id, 21);
        assert_eq!(
            api.http().last_body(),
            Some(json!({
                "vehicleId": 4, "customerId": 9,
                "startTime": "2025-10-25T09:00:00", "endTime": null
            }))
        );
    }

    #[tokio::test]
    async fn test_update_puts_draft_and_tolerates_empty_data() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Put,
            &format!("{}/bookings/21", BASE),
            200,
            json!({"success": true, "data": null}),
        );
        let updated = BookingService::new(&api).update(21, &draft()).await.unwrap();
        assert!(updated.is_none());
        assert_eq!(
            api.http().last_call(),
            Some(("PUT".to_string(), format!("{}/bookings/21", BASE)))
        );
        assert_eq!(api.http().last_body().unwrap()["vehicleId"], 4);
    }

    #[tokio::test]
    async fn test_confirm_delivery_has_no_body() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Post,
            &format!("{}/bookings/21/confirm-delivery", BASE),
            200,
            json!({"success": true}),
        );
        BookingService::new(&api).confirm_delivery(21).await.unwrap();
        assert_eq!(
            api.http().last_call(),
            Some(("POST".to_string(), format!("{}/bookings/21/confirm-delivery", BASE)))
        );
        assert_eq!(api.http().last_body(), None);
    }
}
