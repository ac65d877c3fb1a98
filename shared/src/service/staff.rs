use super::require_station;
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::model::{Id, StaffDashboard, Vehicle};
use crate::request::HttpClient;

pub struct StaffService<'a, C: HttpClient> {
    api: &'a ApiClient<C>,
}

impl<'a, C: HttpClient> StaffService<'a, C> {
    pub fn new(api: &'a ApiClient<C>) -> Self {
        Self { api }
    }

    pub async fn dashboard(&self, station_id: Option<Id>) -> ClientResult<StaffDashboard> {
        let station_id = require_station(station_id)?;
        self.api
            .get("/staff/dashboard", &[("stationId", station_id.to_string())])
            .await
    }

    pub async fn dashboard_vehicles(&self, station_id: Option<Id>) -> ClientResult<Vec<Vehicle>> {
        let station_id = require_station(station_id)?;
        self.api
            .get(
                "/staff/dashboard/vehicles",
                &[("stationId", station_id.to_string())],
            )
            .await
    }
}
