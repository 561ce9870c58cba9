use crate::application::market_data::{OhlcGateway, ProviderRoutes};
use crate::config::Config;
use crate::domain::market::AssetClass;
use crate::domain::ports::CandleProvider;
use crate::infrastructure::binance::BinanceCandleProvider;
use crate::infrastructure::core::HttpClientFactory;
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::polygon::PolygonCandleProvider;
use crate::infrastructure::twelvedata::TwelveDataCandleProvider;
use reqwest::Client;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ServiceFactory;

impl ServiceFactory {
    /// Crypto goes to Binance only; forex and metals try TwelveData, then
    /// Polygon. Providers without a credential are left out.
    pub fn create_routes(config: &Config, client: Client) -> ProviderRoutes {
        let providers = &config.providers;

        let crypto: Vec<Arc<dyn CandleProvider>> = vec![Arc::new(
            BinanceCandleProvider::builder()
                .base_url(providers.binance.base_url.clone())
                .client(client.clone())
                .build(),
        )];

        let mut forex_metal: Vec<Arc<dyn CandleProvider>> = Vec::new();
        if providers.twelvedata.is_configured() {
            forex_metal.push(Arc::new(TwelveDataCandleProvider::new(
                client.clone(),
                providers.twelvedata.api_key.clone(),
                providers.twelvedata.base_url.clone(),
            )));
        } else {
            warn!("ServiceFactory: TWELVEDATA_API_KEY not set, TwelveData disabled");
        }
        if providers.polygon.is_configured() {
            forex_metal.push(Arc::new(PolygonCandleProvider::new(
                client,
                providers.polygon.api_key.clone(),
                providers.polygon.base_url.clone(),
            )));
        } else {
            warn!("ServiceFactory: POLYGON_API_KEY not set, Polygon disabled");
        }

        let routes = ProviderRoutes::new(crypto, forex_metal);
        info!(
            "ServiceFactory: routes crypto={:?} forex_metal={:?}",
            routes.provider_names(AssetClass::Crypto),
            routes.provider_names(AssetClass::ForexMetal)
        );
        routes
    }

    pub fn create_gateway(config: &Config, metrics: Option<Metrics>) -> OhlcGateway {
        let timeout = config.provider_timeout();
        let client = HttpClientFactory::create_client(timeout);
        let gateway = OhlcGateway::new(Self::create_routes(config, client), timeout);

        match metrics {
            Some(metrics) => gateway.with_metrics(metrics),
            None => gateway,
        }
    }
}
