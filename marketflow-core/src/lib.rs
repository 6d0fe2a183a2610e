//! MarketFlow Core — domain types, data acquisition, stores, schema
//! normalization, indicator enrichment, and close-price forecasting.
//!
//! This crate contains mechanisms only:
//! - Domain types (raw bars, symbol mapping)
//! - Provider trait + Yahoo Finance implementation
//! - Resilient fetcher with bounded linear-backoff retry
//! - Raw / processed / forecast stores and the missing-symbol log
//! - Schema normalizer (heterogeneous provider columns → canonical frame)
//! - Indicator kernels (EMA, RSI, ATR, VWAP) and frame enrichment
//! - Seasonal-trend forecast model
//!
//! Orchestration policy — stage sequencing, pacing, skip-existing — lives
//! in `marketflow-pipeline`.

pub mod data;
pub mod domain;
pub mod forecast;
pub mod indicators;
pub mod normalize;
