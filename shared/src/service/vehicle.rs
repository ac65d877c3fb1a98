use super::require_station;
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::model::{Id, Vehicle, VehicleDraft, VehicleStatus};
use crate::request::{HttpClient, HttpMethod};

pub struct VehicleService<'a, C: HttpClient> {
    api: &'a ApiClient<C>,
}

impl<'a, C: HttpClient> VehicleService<'a, C> {
    pub fn new(api: &'a ApiClient<C>) -> Self {
        Self { api }
    }

    /// 站点下的全部车辆
    pub async fn list(&self, station_id: Option<Id>) -> ClientResult<Vec<Vehicle>> {
        let station_id = require_station(station_id)?;
        self.api
            .get("/Vehicles", &[("stationId", station_id.to_string())])
            .await
    }

    pub async fn get(&self, id: Id) -> ClientResult<Vehicle> {
        self.api.get(&format!("/Vehicles/{}", id), &[]).await
    }

    pub async fn list_by_status(&self, status: VehicleStatus) -> ClientResult<Vec<Vehicle>> {
        self.api
            .get("/vehicles", &[("status", status.as_str().to_string())])
            .await
    }

    pub async fn create(&self, draft: &VehicleDraft) -> ClientResult<Vehicle> {
        self.api.post("/vehicles", draft).await
    }

    /// 部分后端更新后不回传实体
    pub async fn update(&self, id: Id, draft: &VehicleDraft) -> ClientResult<Option<Vehicle>> {
        let body = serde_json::to_value(draft)?;
        self.api
            .request_optional(HttpMethod::Put, &format!("/vehicles/{}", id), Some(body), &[])
            .await
    }

    pub async fn delete(&self, id: Id) -> ClientResult<()> {
        self.api.delete(&format!("/vehicles/{}", id)).await
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
    async fn test_list_requires_station() {
        let api = api();
        let err = VehicleService::new(&api).list(None).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref v) if v.field == "stationId"));
        assert_eq!(api.http().request_count(), 0);
    }

    #[tokio::test]
    async fn test_list_by_station() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Get,
            &format!("{}/Vehicles?stationId=4", BASE),
            200,
            json!({"success": true, "data": [
                {"id": 1, "licensePlate": "51A-1", "status": "Available", "batteryLevel": 90},
                {"id": 2, "licensePlate": "51A-2", "status": "InUse", "currentRentalId": 8}
            ]}),
        );

        let list = VehicleService::new(&api).list(Some(4)).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].current_rental_id, Some(8));
    }

    #[tokio::test]
    async fn test_update_without_data() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Put,
            &format!("{}/vehicles/5", BASE),
            200,
            json!({"success": true, "message": "updated"}),
        );

        let draft = VehicleDraft {
            license_plate: "51A-5".into(),
            status: VehicleStatus::Maintenance,
            ..Default::default()
        };
        let updated = VehicleService::new(&api).update(5, &draft).await.unwrap();
        assert!(updated.is_none());
        assert_eq!(api.http().last_body().unwrap()["status"], "Maintenance");
    }

    #[tokio::test]
    async fn test_list_by_status_query() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Get,
            &format!("{}/vehicles?status=Booked", BASE),
            200,
            json!({"data": []}),
        );
        let list = VehicleService::new(&api)
            .list_by_status(VehicleStatus::Booked)
            .await
            .unwrap();
        assert!(list.is_empty());
    }
}
