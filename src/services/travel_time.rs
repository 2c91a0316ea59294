use super::{Coordinate, GoogleMapsService, ProviderError, TransportMode, TravelTime};

use async_trait::async_trait;
use log::*;
use serde::Deserialize;

#[async_trait]
pub trait TravelTimeService: Send + Sync {
    /// Trip duration from `origin` to `destination` using `mode`.
    async fn travel_time(
        &self,
        origin: &str,
        destination: Coordinate,
        mode: TransportMode,
    ) -> TravelTime;
}

#[derive(Debug, Deserialize)]
pub(crate) struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    duration: Option<MatrixValue>,
}

#[derive(Debug, Deserialize)]
struct MatrixValue {
    value: f64,
}

impl DistanceMatrixResponse {
    /// Duration of the single origin/destination pair. A route-level status
    /// such as `ZERO_RESULTS` is a valid answer meaning "no route".
    pub(crate) fn into_travel_time(self) -> Result<TravelTime, ProviderError> {
        if self.status != "OK" {
            return Err(ProviderError::from_status(self.status, self.error_message));
        }
        let element = self
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| ProviderError::Malformed("empty distance matrix".to_string()))?;
        if element.status != "OK" {
            debug!("Distance matrix element status {}.", element.status);
            return Ok(TravelTime::Unreachable);
        }
        Ok(element
            .duration
            .map_or(TravelTime::Unreachable, |d| TravelTime::Seconds(d.value)))
    }
}

#[async_trait]
impl TravelTimeService for GoogleMapsService {
    async fn travel_time(
        &self,
        origin: &str,
        destination: Coordinate,
        mode: TransportMode,
    ) -> TravelTime {
        let destination_param = destination.to_string();
        let mode_param = mode.to_string();
        let request = async {
            self.get_json::<DistanceMatrixResponse>(
                "distancematrix/json",
                &[
                    ("origins", origin),
                    ("destinations", destination_param.as_str()),
                    ("mode", mode_param.as_str()),
                ],
            )
            .await?
            .into_travel_time()
        };
        match self.with_deadline(request).await {
            Ok(time) => {
                trace!("{} from {:?} to {}: {:?}.", mode, origin, destination, time);
                time
            }
            Err(why) => {
                warn!(
                    "Travel time lookup from {:?} to {} by {} failed: {}",
                    origin, destination, mode, why
                );
                TravelTime::Unreachable
            }
        }
    }
}
