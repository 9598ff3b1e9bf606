//! End-to-end checks of the prediction boundary: registry snapshot in,
//! forecast out, with the heuristic estimator absorbing service outages.

use serde_json::json;
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use energiapp_core::domain::{DeviceType, EfficiencyRating, NewDevice};
use energiapp_core::ml::{
    FallbackPredictor, HeuristicPredictor, MlServiceClient, PredictionProvider,
    PredictionRequest, HEURISTIC_MODEL_TYPE,
};
use energiapp_core::repo::{DeviceRegistry, InMemoryRegistry};

fn fridge() -> NewDevice {
    NewDevice {
        name: "Fridge".to_string(),
        device_type: DeviceType::Refrigerator,
        rated_power_watts: 150.0,
        controllable: false,
        efficiency: EfficiencyRating::APlus,
    }
}

#[tokio::test]
async fn service_answers_when_healthy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [
                { "timestamp": "2024-03-10T12:00:00Z", "predicted_consumption": 0.5 }
            ],
            "model_type": "uk_dale_trained"
        })))
        .mount(&server)
        .await;

    let registry = InMemoryRegistry::new();
    let user = Uuid::new_v4();
    registry.add_device(user, fridge()).await.unwrap();
    let devices = registry.list_devices(user).await.unwrap();

    let predictor = FallbackPredictor::new(
        Box::new(MlServiceClient::new(server.uri(), Duration::from_secs(5)).unwrap()),
        Box::new(HeuristicPredictor::new(devices.clone())),
    );

    let request = PredictionRequest::for_devices(&devices, 1);
    assert_eq!(request.total_device_power, 150.0);

    let forecast = predictor.predict(&request).await.unwrap();
    assert_eq!(forecast.model_type, "uk_dale_trained");
}

#[tokio::test]
async fn heuristic_absorbs_a_dead_service() {
    // nothing listens at this address; the client's own timeout applies
    let client = MlServiceClient::new("http://127.0.0.1:9", Duration::from_secs(5)).unwrap();

    let registry = InMemoryRegistry::new();
    let user = Uuid::new_v4();
    registry.add_device(user, fridge()).await.unwrap();
    let devices = registry.list_devices(user).await.unwrap();

    let predictor =
        FallbackPredictor::new(Box::new(client), Box::new(HeuristicPredictor::new(devices)));

    let request = PredictionRequest {
        hours_ahead: 24,
        ..Default::default()
    };
    let forecast = predictor.predict(&request).await.unwrap();

    assert_eq!(forecast.model_type, HEURISTIC_MODEL_TYPE);
    assert_eq!(forecast.predictions.len(), 24);
    // fridge: 150 W around the clock is 3.6 kWh/day
    assert!((forecast.total_kwh() - 3.6).abs() < 1e-9);
}

#[tokio::test]
async fn toggling_a_device_flows_through_to_the_fallback_forecast() {
    let registry = InMemoryRegistry::new();
    let user = Uuid::new_v4();
    let device = registry.add_device(user, fridge()).await.unwrap();
    registry.toggle_status(user, device.id).await.unwrap();

    let devices = registry.list_devices(user).await.unwrap();
    let predictor = HeuristicPredictor::new(devices);

    let forecast = predictor
        .predict(&PredictionRequest {
            hours_ahead: 24,
            ..Default::default()
        })
        .await
        .unwrap();

    // the only device is off: the forecast exists but carries zero energy
    assert_eq!(forecast.predictions.len(), 24);
    assert_eq!(forecast.total_kwh(), 0.0);
}
