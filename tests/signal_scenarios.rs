use chrono::{TimeZone, Utc};
use rustsignal::application::SignalService;
use rustsignal::application::formatting::format_signal;
use rustsignal::application::market_data::{OhlcGateway, ProviderRoutes};
use rustsignal::application::signals::DecisionEngine;
use rustsignal::config::SignalEnvConfig;
use rustsignal::domain::errors::{MarketDataError, SignalError};
use rustsignal::domain::market::{CandleSeries, CanonicalSymbol, Timeframe};
use rustsignal::domain::ports::CandleProvider;
use rustsignal::domain::signal::{Decision, NeutralReason};
use rustsignal::infrastructure::mock::{MockCandleProvider, candles_from_closes};
use std::sync::Arc;
use std::time::Duration;

const NOW: i64 = 1_704_067_200;

/// 60 bars rising steadily from 100 to 120.
fn rise_100_to_120() -> Vec<f64> {
    (0..60).map(|i| 100.0 + 20.0 * i as f64 / 59.0).collect()
}

fn series(closes: &[f64], timeframe: Timeframe) -> CandleSeries {
    let candles = candles_from_closes(closes, NOW - timeframe.to_seconds(), timeframe, 0.05);
    CandleSeries::from_unsorted(candles, usize::MAX).unwrap()
}

#[test]
fn test_rising_fifteen_minute_series_is_buy() {
    let result = DecisionEngine::default().decide(
        &series(&rise_100_to_120(), Timeframe::FifteenMin),
        Timeframe::FifteenMin,
        false,
    );

    let ind = result.indicators;
    assert!(ind.ema20.unwrap() > ind.ema50.unwrap());
    assert!(ind.rsi14.unwrap() >= 55.0);
    assert_eq!(result.decision, Decision::Buy);

    let levels = result.levels.unwrap();
    assert_eq!(levels.entry, 120.0);
    assert!(levels.stop_loss < levels.entry);
    assert!(levels.entry < levels.take_profit1);
    assert!(levels.take_profit1 < levels.take_profit2);
}

#[test]
fn test_every_short_series_is_neutral_without_levels() {
    let engine = DecisionEngine::new(60);
    let closes = rise_100_to_120();
    for len in 1..60 {
        let result = engine.decide(&series(&closes[..len], Timeframe::OneHour), Timeframe::OneHour, false);
        assert_eq!(result.decision, Decision::Neutral, "len {}", len);
        assert!(result.levels.is_none());
        assert!(result.entry().is_none() && result.stop_loss().is_none());
        assert!(result.take_profit1().is_none() && result.take_profit2().is_none());
        assert!(matches!(
            result.neutral_reason,
            Some(NeutralReason::InsufficientHistory { required: 60, .. })
        ));
    }
}

#[test]
fn test_formatter_levels_line_tracks_decision() {
    let engine = DecisionEngine::default();
    let symbol = CanonicalSymbol::parse("BTCUSDT").unwrap();

    let buy = engine.decide(&series(&rise_100_to_120(), Timeframe::FifteenMin), Timeframe::FifteenMin, false);
    let text = format_signal(&buy, &symbol, Timeframe::FifteenMin);
    assert!(text.contains("SIGNAL: BUY"));
    assert!(text.lines().last().unwrap().starts_with("Entry: 120.00  SL: "));

    let neutral = engine.decide(&series(&[100.0; 60], Timeframe::FifteenMin), Timeframe::FifteenMin, false);
    let text = format_signal(&neutral, &symbol, Timeframe::FifteenMin);
    assert!(!text.contains("Entry:"));

    let labels: Vec<&str> = text
        .lines()
        .map(|line| line.split(':').next().unwrap())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Time (UTC)",
            "Symbol",
            "Interval",
            "Close",
            "EMA20",
            "EMA50",
            "RSI14",
            "MACD(12,26,9)",
            "ATR14",
            "SIGNAL"
        ]
    );
}

fn service(provider: MockCandleProvider) -> SignalService {
    let routes = ProviderRoutes::new(Vec::new(), vec![Arc::new(provider) as Arc<dyn CandleProvider>]);
    SignalService::new(
        OhlcGateway::new(routes, Duration::from_secs(2)),
        SignalEnvConfig::default(),
    )
}

#[tokio::test]
async fn test_arabic_gold_on_the_hour_end_to_end() {
    let candles = candles_from_closes(
        &rise_100_to_120().iter().map(|c| c * 20.0).collect::<Vec<_>>(),
        NOW - 3_600,
        Timeframe::OneHour,
        0.5,
    );
    let svc = service(MockCandleProvider::with_candles("twelvedata", &candles));
    let now = Utc.timestamp_opt(NOW, 0).unwrap();

    let report = svc.signal_at("ذهب", Some("عالساعة"), now).await.unwrap();
    assert_eq!(report.symbol.as_str(), "XAUUSD");
    assert_eq!(report.timeframe, Timeframe::OneHour);
    assert_eq!(report.provider_used, "twelvedata");
    assert!(!report.signal.stale);
    assert!(report.text.contains("Symbol: XAUUSD\nInterval: 1h\nClose: 2400.00"));
}

#[tokio::test]
async fn test_stale_data_still_produces_a_decision() {
    let candles = candles_from_closes(&rise_100_to_120(), NOW - 5 * 3_600, Timeframe::OneHour, 0.05);
    let svc = service(MockCandleProvider::with_candles("twelvedata", &candles));
    let now = Utc.timestamp_opt(NOW, 0).unwrap();

    let report = svc.signal_at("gold", Some("1h"), now).await.unwrap();
    assert!(report.signal.stale);
    assert_eq!(report.signal.decision, Decision::Buy);
}

#[tokio::test]
async fn test_failing_providers_surface_no_data() {
    let svc = service(MockCandleProvider::failing("twelvedata"));

    let err = svc.signal("silver", Some("1d")).await.unwrap_err();
    assert!(matches!(
        err,
        SignalError::MarketData(MarketDataError::NoDataForTimeframe {
            timeframe: Timeframe::OneDay,
            ..
        })
    ));
}
